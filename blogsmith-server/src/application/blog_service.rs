use std::sync::Arc;

use chrono::Utc;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::data::blog_repository::BlogRepository;
use crate::data::template_repository::TemplateRepository;
use crate::domain::blog::{
    Blog, BlogDetail, BlogSummary, BlogUpdate, PublishCustomization, Visibility, unslug,
};
use crate::domain::error::DomainError;
use crate::domain::listing::{BlogListQuery, Page};
use crate::infrastructure::generation::ContentGenerator;

#[derive(Debug, Clone)]
pub struct NewBlog {
    pub topic: String,
    pub tone: String,
    pub length: i32,
}

pub fn generation_prompt(tone: &str, length: i32) -> String {
    format!("Create the blog about following topic with tone {tone} and with the length {length}")
}

#[derive(Clone)]
pub struct BlogService {
    repo: Arc<dyn BlogRepository>,
    templates: Arc<dyn TemplateRepository>,
    generator: Arc<dyn ContentGenerator>,
}

impl BlogService {
    pub fn new(
        repo: Arc<dyn BlogRepository>,
        templates: Arc<dyn TemplateRepository>,
        generator: Arc<dyn ContentGenerator>,
    ) -> Self {
        Self {
            repo,
            templates,
            generator,
        }
    }

    async fn load(&self, id: Uuid) -> Result<Blog, DomainError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or(DomainError::BlogNotFound(id))
    }

    async fn persist(&self, blog: &Blog) -> Result<Blog, DomainError> {
        self.repo
            .save(blog)
            .await?
            .ok_or(DomainError::BlogNotFound(blog.id))
    }

    async fn with_template(&self, blog: Blog) -> Result<BlogDetail, DomainError> {
        let template_details = match blog.template {
            Some(template_id) => self.templates.find_by_id(template_id).await?,
            None => None,
        };
        Ok(BlogDetail {
            blog,
            template_details,
        })
    }

    /// Generates the body through the generation service and stores a new
    /// draft. Nothing is stored when generation fails.
    #[instrument(skip(self))]
    pub async fn create_blog(&self, input: NewBlog) -> Result<Blog, DomainError> {
        let topic = input.topic.trim();
        let tone = input.tone.trim();
        if topic.is_empty() || tone.is_empty() || input.length <= 0 {
            return Err(DomainError::Validation(
                "topic, tone and length are required".to_string(),
            ));
        }

        let system_prompt = generation_prompt(tone, input.length);
        let content = self.generator.generate(&system_prompt, topic).await?;
        if content.trim().is_empty() {
            return Err(DomainError::Upstream(
                "generation service returned no text".to_string(),
            ));
        }

        let blog = Blog::new(topic.to_string(), tone.to_string(), input.length, content);
        self.repo.create(blog).await
    }

    pub async fn get_blog(&self, id: Uuid) -> Result<BlogDetail, DomainError> {
        let blog = self.load(id).await?;
        self.with_template(blog).await
    }

    pub async fn list_blogs(&self, query: BlogListQuery) -> Result<Page<BlogSummary>, DomainError> {
        self.repo.list(&query).await
    }

    /// Partial update. `isPublic` is not written directly: it goes through the
    /// same transition as publish/unpublish. Changing the author or topic of a
    /// published blog re-derives its public path.
    #[instrument(skip(self, update))]
    pub async fn update_blog(&self, id: Uuid, mut update: BlogUpdate) -> Result<Blog, DomainError> {
        if update.length.is_some_and(|n| n < 0) {
            return Err(DomainError::Validation(
                "length must be a positive word count".to_string(),
            ));
        }

        let mut blog = self.load(id).await?;
        let desired = update.is_public.take().map(|public| {
            if public {
                Visibility::Published
            } else {
                Visibility::Draft
            }
        });
        let identity_changed = blog.apply_update(update);

        match desired {
            Some(visibility) => Self::transition(&mut blog, visibility),
            None if identity_changed && blog.visibility() == Visibility::Published => {
                blog.refresh_public_path();
            }
            None => {}
        }

        self.persist(&blog).await
    }

    /// The single entry point for visibility changes.
    #[instrument(skip(self, customization))]
    pub async fn set_visibility(
        &self,
        id: Uuid,
        visibility: Visibility,
        customization: Option<PublishCustomization>,
    ) -> Result<Blog, DomainError> {
        let mut blog = self.load(id).await?;
        if let Some(customization) = customization {
            blog.apply_customization(customization);
        }
        Self::transition(&mut blog, visibility);

        let saved = self.persist(&blog).await?;
        info!(
            blog_id = %saved.id,
            is_public = saved.is_public,
            public_path = saved.public_path.as_deref().unwrap_or_default(),
            "visibility changed"
        );
        Ok(saved)
    }

    fn transition(blog: &mut Blog, visibility: Visibility) {
        match visibility {
            Visibility::Published => blog.publish(Utc::now()),
            Visibility::Draft => blog.unpublish(),
        }
    }

    pub async fn publish_blog(
        &self,
        id: Uuid,
        customization: PublishCustomization,
    ) -> Result<Blog, DomainError> {
        self.set_visibility(id, Visibility::Published, Some(customization))
            .await
    }

    pub async fn unpublish_blog(&self, id: Uuid) -> Result<Blog, DomainError> {
        self.set_visibility(id, Visibility::Draft, None).await
    }

    /// Resolves a public URL's slug segments back to a published blog.
    pub async fn get_public_blog(
        &self,
        author_segment: &str,
        topic_segment: &str,
    ) -> Result<BlogDetail, DomainError> {
        let author = unslug(author_segment);
        let topic = unslug(topic_segment);
        let blog = self
            .repo
            .find_public(&author, &topic)
            .await?
            .ok_or(DomainError::PublicBlogNotFound { author, topic })?;
        self.with_template(blog).await
    }

    #[instrument(skip(self))]
    pub async fn delete_blog(&self, id: Uuid) -> Result<(), DomainError> {
        if self.repo.delete(id).await? {
            Ok(())
        } else {
            Err(DomainError::BlogNotFound(id))
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::data::memory::{MemoryBlogRepository, MemoryTemplateRepository};
    use crate::domain::blog::Author;
    use crate::domain::listing::{BlogSortField, Pagination, SortOrder};
    use crate::domain::template::{NewTemplate, Template};
    use crate::infrastructure::generation::StaticGenerator;

    pub(crate) fn author(name: &str) -> Author {
        Author {
            name: name.to_string(),
            image: "avatar.png".to_string(),
            id: None,
        }
    }

    struct Fixture {
        service: BlogService,
        blogs: MemoryBlogRepository,
        templates: MemoryTemplateRepository,
    }

    fn fixture_with(generator: StaticGenerator) -> Fixture {
        let blogs = MemoryBlogRepository::new();
        let templates = MemoryTemplateRepository::new();
        let service = BlogService::new(
            Arc::new(blogs.clone()),
            Arc::new(templates.clone()),
            Arc::new(generator),
        );
        Fixture {
            service,
            blogs,
            templates,
        }
    }

    fn fixture() -> Fixture {
        fixture_with(StaticGenerator::text("# Generated\n\nBody"))
    }

    async fn draft(f: &Fixture, topic: &str) -> Blog {
        f.service
            .create_blog(NewBlog {
                topic: topic.to_string(),
                tone: "friendly".to_string(),
                length: 300,
            })
            .await
            .unwrap()
    }

    fn by_author(name: &str) -> PublishCustomization {
        PublishCustomization {
            author: Some(author(name)),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn create_blog_uses_generated_text() {
        let generator = StaticGenerator::text("generated body");
        let f = fixture_with(generator.clone());
        let blog = draft(&f, "Rust Widgets").await;

        assert_eq!(blog.content, "generated body");
        assert!(!blog.is_public);
        assert_eq!(
            generator.prompts(),
            vec![(generation_prompt("friendly", 300), "Rust Widgets".to_string())]
        );
    }

    #[tokio::test]
    async fn create_blog_requires_all_fields() {
        let f = fixture();
        let err = f
            .service
            .create_blog(NewBlog {
                topic: "  ".into(),
                tone: "casual".into(),
                length: 100,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        let err = f
            .service
            .create_blog(NewBlog {
                topic: "Topic".into(),
                tone: "casual".into(),
                length: 0,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(f.blogs.len(), 0);
    }

    #[tokio::test]
    async fn failed_generation_persists_nothing() {
        let f = fixture_with(StaticGenerator::failing("quota exceeded"));
        let err = f
            .service
            .create_blog(NewBlog {
                topic: "Topic".into(),
                tone: "casual".into(),
                length: 100,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::Upstream(_)));
        assert_eq!(f.blogs.len(), 0);
    }

    #[tokio::test]
    async fn blank_generation_is_an_upstream_failure() {
        let f = fixture_with(StaticGenerator::text("   "));
        let err = f
            .service
            .create_blog(NewBlog {
                topic: "Topic".into(),
                tone: "casual".into(),
                length: 100,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Upstream(_)));
    }

    #[tokio::test]
    async fn publish_unknown_blog_is_not_found() {
        let f = fixture();
        let id = Uuid::new_v4();
        let err = f
            .service
            .publish_blog(id, PublishCustomization::default())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::BlogNotFound(missing) if missing == id));
    }

    #[tokio::test]
    async fn publish_derives_path_and_applies_customization() {
        let f = fixture();
        let blog = draft(&f, "My Great Post").await;
        let published = f
            .service
            .publish_blog(
                blog.id,
                PublishCustomization {
                    author: Some(author("Jane O'Brien")),
                    accent_color: Some("#2563eb".into()),
                    cover_image: Some(String::new()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert!(published.is_public);
        assert!(published.published_at.is_some());
        assert_eq!(
            published.public_path.as_deref(),
            Some("/public/blog/jane-o-brien/my-great-post")
        );
        assert_eq!(published.accent_color.as_deref(), Some("#2563eb"));
        assert!(published.cover_image.is_none());
    }

    #[tokio::test]
    async fn publish_with_empty_author_name_uses_fallback() {
        let f = fixture();
        let blog = draft(&f, "My Great Post").await;
        let published = f
            .service
            .publish_blog(blog.id, by_author(""))
            .await
            .unwrap();
        assert_eq!(
            published.public_path.as_deref(),
            Some("/public/blog/author/my-great-post")
        );
    }

    #[tokio::test]
    async fn republish_keeps_path_and_refreshes_timestamp() {
        let f = fixture();
        let blog = draft(&f, "Topic").await;
        let first = f
            .service
            .publish_blog(blog.id, by_author("Jane"))
            .await
            .unwrap();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let between = Utc::now();
        let second = f
            .service
            .publish_blog(blog.id, PublishCustomization::default())
            .await
            .unwrap();

        assert_eq!(first.public_path, second.public_path);
        assert!(first.published_at.unwrap() < between);
        assert!(second.published_at.unwrap() >= between);
        assert!(second.is_public);
    }

    #[tokio::test]
    async fn colliding_public_paths_conflict() {
        let f = fixture();
        let first = draft(&f, "Rust Tips").await;
        let second = draft(&f, "rust tips!").await;

        f.service
            .publish_blog(first.id, by_author("Jane Doe"))
            .await
            .unwrap();
        let err = f
            .service
            .publish_blog(second.id, by_author("JANE DOE"))
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::Conflict(_)));
        let untouched = f.blogs.find_by_id(second.id).await.unwrap().unwrap();
        assert!(!untouched.is_public);
        assert!(untouched.public_path.is_none());
        let owner = f.blogs.find_by_id(first.id).await.unwrap().unwrap();
        assert_eq!(
            owner.public_path.as_deref(),
            Some("/public/blog/jane-doe/rust-tips")
        );
    }

    #[tokio::test]
    async fn public_lookup_resolves_slugs_and_template() {
        let f = fixture();
        let template = f
            .templates
            .create(Template::new(NewTemplate {
                name: "Oceanic".into(),
                ..Default::default()
            }))
            .await
            .unwrap();
        let blog = draft(&f, "My Great Post").await;
        f.service
            .publish_blog(
                blog.id,
                PublishCustomization {
                    template: Some(template.id),
                    ..by_author("Jane Doe")
                },
            )
            .await
            .unwrap();

        let found = f
            .service
            .get_public_blog("jane-doe", "my-great-post")
            .await
            .unwrap();
        assert_eq!(found.blog.id, blog.id);
        assert_eq!(found.template_details.map(|t| t.id), Some(template.id));
    }

    #[tokio::test]
    async fn public_lookup_never_returns_drafts() {
        let f = fixture();
        let mut blog = Blog::new("Hidden".into(), "casual".into(), 100, "body".into());
        blog.author = Some(author("Jane"));
        blog.public_path = Some("/public/blog/jane/hidden".into());
        f.blogs.insert(blog);

        let err = f
            .service
            .get_public_blog("jane", "hidden")
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::PublicBlogNotFound { .. }));
    }

    #[tokio::test]
    async fn unpublish_through_update_keeps_path_but_hides_blog() {
        let f = fixture();
        let blog = draft(&f, "Topic").await;
        let published = f
            .service
            .publish_blog(blog.id, by_author("Jane"))
            .await
            .unwrap();
        assert!(f.service.get_public_blog("jane", "topic").await.is_ok());

        let updated = f
            .service
            .update_blog(
                blog.id,
                BlogUpdate {
                    is_public: Some(false),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert!(!updated.is_public);
        assert_eq!(updated.public_path, published.public_path);
        assert_eq!(updated.published_at, published.published_at);
        let err = f.service.get_public_blog("jane", "topic").await.unwrap_err();
        assert!(matches!(err, DomainError::PublicBlogNotFound { .. }));
    }

    #[tokio::test]
    async fn publish_through_update_applies_full_side_effects() {
        let f = fixture();
        let blog = draft(&f, "Topic").await;
        let updated = f
            .service
            .update_blog(
                blog.id,
                BlogUpdate {
                    author: Some(author("Sam")),
                    is_public: Some(true),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert!(updated.is_public);
        assert!(updated.published_at.is_some());
        assert_eq!(updated.public_path.as_deref(), Some("/public/blog/sam/topic"));
    }

    #[tokio::test]
    async fn renaming_published_blog_moves_its_path() {
        let f = fixture();
        let blog = draft(&f, "Old Title").await;
        f.service
            .publish_blog(blog.id, by_author("Jane"))
            .await
            .unwrap();

        let updated = f
            .service
            .update_blog(
                blog.id,
                BlogUpdate {
                    topic: Some("New Title".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.public_path.as_deref(), Some("/public/blog/jane/new-title"));
        assert!(f.service.get_public_blog("jane", "new-title").await.is_ok());
    }

    #[tokio::test]
    async fn editing_a_draft_leaves_path_untouched() {
        let f = fixture();
        let blog = draft(&f, "Topic").await;
        let updated = f
            .service
            .update_blog(
                blog.id,
                BlogUpdate {
                    topic: Some("Another".into()),
                    content: Some("rewritten".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.topic, "Another");
        assert_eq!(updated.content, "rewritten");
        assert!(updated.public_path.is_none());
    }

    #[tokio::test]
    async fn update_rejects_negative_length() {
        let f = fixture();
        let blog = draft(&f, "Topic").await;
        let err = f
            .service
            .update_blog(
                blog.id,
                BlogUpdate {
                    length: Some(-5),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn get_blog_tolerates_dangling_template() {
        let f = fixture();
        let blog = draft(&f, "Topic").await;
        let dangling = Uuid::new_v4();
        f.service
            .update_blog(
                blog.id,
                BlogUpdate {
                    template: Some(dangling),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let detail = f.service.get_blog(blog.id).await.unwrap();
        assert_eq!(detail.blog.template, Some(dangling));
        assert!(detail.template_details.is_none());
    }

    #[tokio::test]
    async fn list_filters_sorts_and_counts() {
        let f = fixture();
        for topic in ["Blue widgets", "Garden tools", "WIDGETS at scale", "Red Widgets"] {
            draft(&f, topic).await;
        }

        let page = f
            .service
            .list_blogs(BlogListQuery {
                pagination: Pagination::new(Some(1), Some(2)),
                search: Some("widgets".into()),
                sort: BlogSortField::Topic,
                order: SortOrder::Desc,
            })
            .await
            .unwrap();

        assert_eq!(page.total, 3);
        let topics: Vec<_> = page.data.iter().map(|b| b.topic.as_str()).collect();
        assert_eq!(topics, vec!["WIDGETS at scale", "Red Widgets"]);

        let second = f
            .service
            .list_blogs(BlogListQuery {
                pagination: Pagination::new(Some(2), Some(2)),
                search: Some("widgets".into()),
                sort: BlogSortField::Topic,
                order: SortOrder::Desc,
            })
            .await
            .unwrap();
        assert_eq!(second.total, 3);
        assert_eq!(second.data.len(), 1);
        assert_eq!(second.data[0].topic, "Blue widgets");
    }

    #[tokio::test]
    async fn delete_reports_missing_blog() {
        let f = fixture();
        let blog = draft(&f, "Topic").await;
        f.service.delete_blog(blog.id).await.unwrap();
        let err = f.service.delete_blog(blog.id).await.unwrap_err();
        assert!(matches!(err, DomainError::BlogNotFound(_)));
    }
}
