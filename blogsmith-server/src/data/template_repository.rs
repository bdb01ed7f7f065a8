use crate::data::contains_pattern;
use crate::domain::error::DomainError;
use crate::domain::listing::{Page, TemplateListQuery};
use crate::domain::template::{Template, TemplateStyle};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::types::Json;
use tracing::{error, info};
use uuid::Uuid;

const TEMPLATE_COLUMNS: &str = "id, name, description, style, preview_image, created_at";

#[async_trait]
pub trait TemplateRepository: Send + Sync {
    async fn create(&self, template: Template) -> Result<Template, DomainError>;
    async fn insert_many(&self, templates: Vec<Template>) -> Result<usize, DomainError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Template>, DomainError>;
    async fn save(&self, template: &Template) -> Result<Option<Template>, DomainError>;
    async fn delete(&self, id: Uuid) -> Result<bool, DomainError>;
    async fn count(&self) -> Result<i64, DomainError>;
    /// Templates named in `system_names` come first, newest first within
    /// each group.
    async fn list(
        &self,
        query: &TemplateListQuery,
        system_names: &[String],
    ) -> Result<Page<Template>, DomainError>;
}

#[derive(sqlx::FromRow)]
struct TemplateRow {
    id: Uuid,
    name: String,
    description: Option<String>,
    style: Json<TemplateStyle>,
    preview_image: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<TemplateRow> for Template {
    fn from(row: TemplateRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            description: row.description,
            style: row.style.0,
            preview_image: row.preview_image,
            created_at: row.created_at,
        }
    }
}

#[derive(Clone)]
pub struct PostgresTemplateRepository {
    pool: PgPool,
}

impl PostgresTemplateRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn db_error(context: &str, e: sqlx::Error) -> DomainError {
    error!("db error {}: {}", context, e);
    DomainError::Internal(format!("database error: {}", e))
}

const INSERT_TEMPLATE: &str = r#"
    INSERT INTO templates (id, name, description, style, preview_image, created_at)
    VALUES ($1, $2, $3, $4, $5, $6)
"#;

#[async_trait]
impl TemplateRepository for PostgresTemplateRepository {
    async fn create(&self, template: Template) -> Result<Template, DomainError> {
        sqlx::query(INSERT_TEMPLATE)
            .bind(template.id)
            .bind(&template.name)
            .bind(&template.description)
            .bind(Json(&template.style))
            .bind(&template.preview_image)
            .bind(template.created_at)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("creating template", e))?;

        info!(template_id = %template.id, name = %template.name, "template created");
        Ok(template)
    }

    async fn insert_many(&self, templates: Vec<Template>) -> Result<usize, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| db_error("opening transaction", e))?;

        for template in &templates {
            sqlx::query(INSERT_TEMPLATE)
                .bind(template.id)
                .bind(&template.name)
                .bind(&template.description)
                .bind(Json(&template.style))
                .bind(&template.preview_image)
                .bind(template.created_at)
                .execute(&mut *tx)
                .await
                .map_err(|e| db_error("inserting template batch", e))?;
        }

        tx.commit()
            .await
            .map_err(|e| db_error("committing template batch", e))?;
        Ok(templates.len())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Template>, DomainError> {
        let sql = format!("SELECT {TEMPLATE_COLUMNS} FROM templates WHERE id = $1");
        let row = sqlx::query_as::<_, TemplateRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("finding template", e))?;
        Ok(row.map(Template::from))
    }

    async fn save(&self, template: &Template) -> Result<Option<Template>, DomainError> {
        let sql = format!(
            r#"
            UPDATE templates
            SET name = $1, description = $2, style = $3, preview_image = $4
            WHERE id = $5
            RETURNING {TEMPLATE_COLUMNS}
            "#
        );
        let row = sqlx::query_as::<_, TemplateRow>(&sql)
            .bind(&template.name)
            .bind(&template.description)
            .bind(Json(&template.style))
            .bind(&template.preview_image)
            .bind(template.id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("updating template", e))?;

        if row.is_some() {
            info!(template_id = %template.id, "template updated");
        }
        Ok(row.map(Template::from))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let deleted = sqlx::query("DELETE FROM templates WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("deleting template", e))?;

        if deleted.rows_affected() > 0 {
            info!(template_id = %id, "template deleted");
        }
        Ok(deleted.rows_affected() > 0)
    }

    async fn count(&self) -> Result<i64, DomainError> {
        sqlx::query_scalar("SELECT COUNT(*) FROM templates")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("counting templates", e))
    }

    async fn list(
        &self,
        query: &TemplateListQuery,
        system_names: &[String],
    ) -> Result<Page<Template>, DomainError> {
        let pattern = query.search.as_deref().map(contains_pattern);
        let sql = format!(
            "SELECT {TEMPLATE_COLUMNS} FROM templates \
             WHERE ($1::text IS NULL OR name ILIKE $1) \
             ORDER BY CASE WHEN name = ANY($2) THEN 0 ELSE 1 END, created_at DESC, id \
             LIMIT $3 OFFSET $4"
        );
        let rows = sqlx::query_as::<_, TemplateRow>(&sql)
            .bind(pattern.as_deref())
            .bind(system_names)
            .bind(query.pagination.limit())
            .bind(query.pagination.offset())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("listing templates", e))?;

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM templates WHERE ($1::text IS NULL OR name ILIKE $1)",
        )
        .bind(pattern.as_deref())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("counting templates", e))?;

        Ok(Page {
            data: rows.into_iter().map(Template::from).collect(),
            total,
        })
    }
}
