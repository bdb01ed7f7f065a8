//! In-memory repositories for service and handler tests.
//!
//! They keep the contract of the PostgreSQL repositories, including the
//! sparse uniqueness of `public_path` and the listing order rules.

use std::cmp::Ordering;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use uuid::Uuid;

use crate::data::blog_repository::BlogRepository;
use crate::data::template_repository::TemplateRepository;
use crate::domain::blog::{Blog, BlogSummary};
use crate::domain::error::DomainError;
use crate::domain::listing::{
    BlogListQuery, BlogSortField, Page, Pagination, SortOrder, TemplateListQuery,
};
use crate::domain::template::Template;

fn contains_ignore_case(haystack: &str, needle: Option<&str>) -> bool {
    match needle {
        Some(needle) => haystack.to_lowercase().contains(&needle.to_lowercase()),
        None => true,
    }
}

fn page_of<T>(items: Vec<T>, pagination: Pagination) -> Vec<T> {
    items
        .into_iter()
        .skip(pagination.offset() as usize)
        .take(pagination.limit() as usize)
        .collect()
}

#[derive(Clone, Default)]
pub struct MemoryBlogRepository {
    blogs: Arc<RwLock<Vec<Blog>>>,
}

impl MemoryBlogRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.blogs.read().len()
    }

    /// Stores a blog as-is, bypassing the service layer.
    pub fn insert(&self, blog: Blog) {
        self.blogs.write().push(blog);
    }

    fn check_public_path(blogs: &[Blog], blog: &Blog) -> Result<(), DomainError> {
        let Some(path) = blog.public_path.as_deref() else {
            return Ok(());
        };
        let taken = blogs
            .iter()
            .any(|other| other.id != blog.id && other.public_path.as_deref() == Some(path));
        if taken {
            Err(DomainError::Conflict(format!(
                "public path {path} is already taken"
            )))
        } else {
            Ok(())
        }
    }
}

fn summary(blog: &Blog) -> BlogSummary {
    BlogSummary {
        id: blog.id,
        topic: blog.topic.clone(),
        tone: blog.tone.clone(),
        length: blog.length,
        is_public: blog.is_public,
        template: blog.template,
        cover_image: blog.cover_image.clone(),
        author: blog.author.clone(),
        published_at: blog.published_at,
        public_path: blog.public_path.clone(),
        created_at: blog.created_at,
        updated_at: blog.updated_at,
    }
}

/// Same ordering as `ORDER BY <column> <dir> NULLS LAST`.
fn compare_blogs(a: &Blog, b: &Blog, field: BlogSortField, order: SortOrder) -> Ordering {
    let directed = |ord: Ordering| match order {
        SortOrder::Asc => ord,
        SortOrder::Desc => ord.reverse(),
    };
    match field {
        BlogSortField::CreatedAt => directed(a.created_at.cmp(&b.created_at)),
        BlogSortField::UpdatedAt => directed(a.updated_at.cmp(&b.updated_at)),
        BlogSortField::PublishedAt => match (a.published_at, b.published_at) {
            (Some(x), Some(y)) => directed(x.cmp(&y)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        },
        BlogSortField::Topic => directed(a.topic.cmp(&b.topic)),
        BlogSortField::Tone => directed(a.tone.cmp(&b.tone)),
        BlogSortField::Length => directed(a.length.cmp(&b.length)),
    }
}

#[async_trait]
impl BlogRepository for MemoryBlogRepository {
    async fn create(&self, blog: Blog) -> Result<Blog, DomainError> {
        let mut blogs = self.blogs.write();
        Self::check_public_path(&blogs, &blog)?;
        blogs.push(blog.clone());
        Ok(blog)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Blog>, DomainError> {
        Ok(self.blogs.read().iter().find(|b| b.id == id).cloned())
    }

    async fn find_public(
        &self,
        author_name: &str,
        topic: &str,
    ) -> Result<Option<Blog>, DomainError> {
        let author_name = author_name.to_lowercase();
        let topic = topic.to_lowercase();
        Ok(self
            .blogs
            .read()
            .iter()
            .filter(|b| b.is_public)
            .filter(|b| b.author_name().map(str::to_lowercase) == Some(author_name.clone()))
            .filter(|b| b.topic.to_lowercase() == topic)
            .max_by_key(|b| b.published_at)
            .cloned())
    }

    async fn save(&self, blog: &Blog) -> Result<Option<Blog>, DomainError> {
        let mut blogs = self.blogs.write();
        Self::check_public_path(&blogs, blog)?;
        let Some(slot) = blogs.iter_mut().find(|b| b.id == blog.id) else {
            return Ok(None);
        };
        *slot = blog.clone();
        slot.updated_at = Utc::now();
        Ok(Some(slot.clone()))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let mut blogs = self.blogs.write();
        let before = blogs.len();
        blogs.retain(|b| b.id != id);
        Ok(blogs.len() < before)
    }

    async fn list(&self, query: &BlogListQuery) -> Result<Page<BlogSummary>, DomainError> {
        let mut matching: Vec<Blog> = self
            .blogs
            .read()
            .iter()
            .filter(|b| contains_ignore_case(&b.topic, query.search.as_deref()))
            .cloned()
            .collect();
        matching.sort_by(|a, b| compare_blogs(a, b, query.sort, query.order));
        let total = matching.len() as i64;
        let data = page_of(matching, query.pagination)
            .iter()
            .map(summary)
            .collect();
        Ok(Page { data, total })
    }
}

#[derive(Clone, Default)]
pub struct MemoryTemplateRepository {
    templates: Arc<RwLock<Vec<Template>>>,
}

impl MemoryTemplateRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TemplateRepository for MemoryTemplateRepository {
    async fn create(&self, template: Template) -> Result<Template, DomainError> {
        self.templates.write().push(template.clone());
        Ok(template)
    }

    async fn insert_many(&self, templates: Vec<Template>) -> Result<usize, DomainError> {
        let count = templates.len();
        self.templates.write().extend(templates);
        Ok(count)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Template>, DomainError> {
        Ok(self.templates.read().iter().find(|t| t.id == id).cloned())
    }

    async fn save(&self, template: &Template) -> Result<Option<Template>, DomainError> {
        let mut templates = self.templates.write();
        let Some(slot) = templates.iter_mut().find(|t| t.id == template.id) else {
            return Ok(None);
        };
        *slot = template.clone();
        Ok(Some(slot.clone()))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let mut templates = self.templates.write();
        let before = templates.len();
        templates.retain(|t| t.id != id);
        Ok(templates.len() < before)
    }

    async fn count(&self) -> Result<i64, DomainError> {
        Ok(self.templates.read().len() as i64)
    }

    async fn list(
        &self,
        query: &TemplateListQuery,
        system_names: &[String],
    ) -> Result<Page<Template>, DomainError> {
        let mut matching: Vec<Template> = self
            .templates
            .read()
            .iter()
            .filter(|t| contains_ignore_case(&t.name, query.search.as_deref()))
            .cloned()
            .collect();
        let group = |t: &Template| u8::from(!system_names.contains(&t.name));
        matching.sort_by(|a, b| {
            group(a)
                .cmp(&group(b))
                .then_with(|| b.created_at.cmp(&a.created_at))
        });
        let total = matching.len() as i64;
        Ok(Page {
            data: page_of(matching, query.pagination),
            total,
        })
    }
}
