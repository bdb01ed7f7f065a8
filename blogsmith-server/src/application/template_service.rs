use std::sync::Arc;

use tracing::{info, instrument};
use uuid::Uuid;

use crate::data::template_repository::TemplateRepository;
use crate::domain::error::DomainError;
use crate::domain::listing::{Page, TemplateListQuery};
use crate::domain::system_templates::SystemTemplate;
use crate::domain::template::{
    NewTemplate, Template, TemplateListItem, TemplateUpdate, system_template_names,
};

#[derive(Clone)]
pub struct TemplateService {
    repo: Arc<dyn TemplateRepository>,
}

impl TemplateService {
    pub fn new(repo: Arc<dyn TemplateRepository>) -> Self {
        Self { repo }
    }

    /// Inserts the built-in templates when the table is empty. Returns how
    /// many were inserted.
    #[instrument(skip(self, seeds))]
    pub async fn seed_system_templates_if_needed(
        &self,
        seeds: &[SystemTemplate],
    ) -> Result<usize, DomainError> {
        if self.repo.count().await? > 0 {
            return Ok(0);
        }
        let templates = seeds
            .iter()
            .map(|seed| Template::new(seed.to_new_template()))
            .collect();
        let inserted = self.repo.insert_many(templates).await?;
        info!(inserted, "seeded system templates");
        Ok(inserted)
    }

    #[instrument(skip(self, input))]
    pub async fn create_template(&self, input: NewTemplate) -> Result<Template, DomainError> {
        if input.name.trim().is_empty() {
            return Err(DomainError::Validation("template name is required".into()));
        }
        self.repo.create(Template::new(input)).await
    }

    pub async fn get_template(&self, id: Uuid) -> Result<Template, DomainError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or(DomainError::TemplateNotFound(id))
    }

    pub async fn list_templates(
        &self,
        query: TemplateListQuery,
    ) -> Result<Page<TemplateListItem>, DomainError> {
        let page = self.repo.list(&query, &system_template_names()).await?;
        Ok(Page {
            data: page
                .data
                .into_iter()
                .map(Template::into_list_item)
                .collect(),
            total: page.total,
        })
    }

    #[instrument(skip(self, update))]
    pub async fn update_template(
        &self,
        id: Uuid,
        update: TemplateUpdate,
    ) -> Result<Template, DomainError> {
        if update.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
            return Err(DomainError::Validation("template name cannot be blank".into()));
        }
        let mut template = self.get_template(id).await?;
        template.apply_update(update);
        self.repo
            .save(&template)
            .await?
            .ok_or(DomainError::TemplateNotFound(id))
    }

    /// Blogs that reference the template keep their now dangling reference.
    #[instrument(skip(self))]
    pub async fn delete_template(&self, id: Uuid) -> Result<(), DomainError> {
        if self.repo.delete(id).await? {
            Ok(())
        } else {
            Err(DomainError::TemplateNotFound(id))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::memory::MemoryTemplateRepository;
    use crate::domain::listing::Pagination;
    use crate::domain::system_templates::SYSTEM_TEMPLATES;
    use chrono::{Duration, Utc};

    fn service() -> (TemplateService, MemoryTemplateRepository) {
        let repo = MemoryTemplateRepository::new();
        (TemplateService::new(Arc::new(repo.clone())), repo)
    }

    fn named(name: &str, age_minutes: i64) -> Template {
        let mut template = Template::new(NewTemplate {
            name: name.to_string(),
            ..Default::default()
        });
        template.created_at = Utc::now() - Duration::minutes(age_minutes);
        template
    }

    #[tokio::test]
    async fn seeding_is_idempotent() {
        let (service, repo) = service();
        let first = service
            .seed_system_templates_if_needed(SYSTEM_TEMPLATES)
            .await
            .unwrap();
        let second = service
            .seed_system_templates_if_needed(SYSTEM_TEMPLATES)
            .await
            .unwrap();

        assert_eq!(first, SYSTEM_TEMPLATES.len());
        assert_eq!(second, 0);
        assert_eq!(repo.count().await.unwrap(), SYSTEM_TEMPLATES.len() as i64);
    }

    #[tokio::test]
    async fn seeding_skips_non_empty_table() {
        let (service, repo) = service();
        repo.create(named("Mine", 0)).await.unwrap();
        let inserted = service
            .seed_system_templates_if_needed(SYSTEM_TEMPLATES)
            .await
            .unwrap();
        assert_eq!(inserted, 0);
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn listing_puts_system_templates_first() {
        let (service, repo) = service();
        repo.create(named("User Newest", 1)).await.unwrap();
        repo.create(named("Oceanic", 30)).await.unwrap();
        repo.create(named("User Oldest", 60)).await.unwrap();
        repo.create(named("Modern Glass", 10)).await.unwrap();

        let page = service
            .list_templates(TemplateListQuery::default())
            .await
            .unwrap();
        let names: Vec<_> = page.data.iter().map(|t| t.template.name.as_str()).collect();

        assert_eq!(page.total, 4);
        assert_eq!(
            names,
            vec!["Modern Glass", "Oceanic", "User Newest", "User Oldest"]
        );
        assert!(page.data[0].is_system && !page.data[2].is_system);
    }

    #[tokio::test]
    async fn listing_searches_names_and_pages() {
        let (service, repo) = service();
        for (i, name) in ["Card One", "card two", "Paper"].iter().enumerate() {
            repo.create(named(name, i as i64)).await.unwrap();
        }
        let page = service
            .list_templates(TemplateListQuery {
                pagination: Pagination::new(Some(1), Some(1)),
                search: Some("CARD".into()),
            })
            .await
            .unwrap();

        assert_eq!(page.total, 2);
        assert_eq!(page.data.len(), 1);
        assert_eq!(page.data[0].template.name, "Card One");
    }

    #[tokio::test]
    async fn create_requires_name() {
        let (service, _) = service();
        let err = service
            .create_template(NewTemplate::default())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn update_and_delete_report_missing_templates() {
        let (service, _) = service();
        let created = service
            .create_template(NewTemplate {
                name: "Mine".into(),
                ..Default::default()
            })
            .await
            .unwrap();

        let updated = service
            .update_template(
                created.id,
                TemplateUpdate {
                    description: Some("warm".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.description.as_deref(), Some("warm"));

        service.delete_template(created.id).await.unwrap();
        assert!(matches!(
            service.get_template(created.id).await,
            Err(DomainError::TemplateNotFound(_))
        ));
        assert!(matches!(
            service.delete_template(created.id).await,
            Err(DomainError::TemplateNotFound(_))
        ));
    }
}
