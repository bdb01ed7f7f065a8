use crate::data::contains_pattern;
use crate::domain::blog::{Author, Blog, BlogSummary};
use crate::domain::error::DomainError;
use crate::domain::listing::{BlogListQuery, Page};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::types::Json;
use tracing::{error, info, warn};
use uuid::Uuid;

const PUBLIC_PATH_CONSTRAINT: &str = "blogs_public_path_key";

const BLOG_COLUMNS: &str = "id, content, topic, tone, length, is_public, template_id, \
     cover_image, accent_color, custom_css, author, published_at, public_path, \
     created_at, updated_at";

const SUMMARY_COLUMNS: &str = "id, topic, tone, length, is_public, template_id, cover_image, \
     author, published_at, public_path, created_at, updated_at";

#[async_trait]
pub trait BlogRepository: Send + Sync {
    async fn create(&self, blog: Blog) -> Result<Blog, DomainError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Blog>, DomainError>;
    /// Public blog whose author name and topic equal the given strings,
    /// ignoring case.
    async fn find_public(&self, author_name: &str, topic: &str)
    -> Result<Option<Blog>, DomainError>;
    /// Persists every mutable field. `None` when the blog no longer exists.
    async fn save(&self, blog: &Blog) -> Result<Option<Blog>, DomainError>;
    async fn delete(&self, id: Uuid) -> Result<bool, DomainError>;
    async fn list(&self, query: &BlogListQuery) -> Result<Page<BlogSummary>, DomainError>;
}

#[derive(sqlx::FromRow)]
struct BlogRow {
    id: Uuid,
    content: String,
    topic: String,
    tone: String,
    length: i32,
    is_public: bool,
    template_id: Option<Uuid>,
    cover_image: Option<String>,
    accent_color: Option<String>,
    custom_css: Option<String>,
    author: Option<Json<Author>>,
    published_at: Option<DateTime<Utc>>,
    public_path: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<BlogRow> for Blog {
    fn from(row: BlogRow) -> Self {
        Self {
            id: row.id,
            content: row.content,
            topic: row.topic,
            tone: row.tone,
            length: row.length,
            is_public: row.is_public,
            template: row.template_id,
            cover_image: row.cover_image,
            accent_color: row.accent_color,
            custom_css: row.custom_css,
            author: row.author.map(|Json(author)| author),
            published_at: row.published_at,
            public_path: row.public_path,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct BlogSummaryRow {
    id: Uuid,
    topic: String,
    tone: String,
    length: i32,
    is_public: bool,
    template_id: Option<Uuid>,
    cover_image: Option<String>,
    author: Option<Json<Author>>,
    published_at: Option<DateTime<Utc>>,
    public_path: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<BlogSummaryRow> for BlogSummary {
    fn from(row: BlogSummaryRow) -> Self {
        Self {
            id: row.id,
            topic: row.topic,
            tone: row.tone,
            length: row.length,
            is_public: row.is_public,
            template: row.template_id,
            cover_image: row.cover_image,
            author: row.author.map(|Json(author)| author),
            published_at: row.published_at,
            public_path: row.public_path,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Clone)]
pub struct PostgresBlogRepository {
    pool: PgPool,
}

impl PostgresBlogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_write_error(e: sqlx::Error, blog: &Blog) -> DomainError {
    let violated = e.as_database_error().and_then(|db| db.constraint());
    if violated == Some(PUBLIC_PATH_CONSTRAINT) {
        let path = blog.public_path.as_deref().unwrap_or_default();
        warn!(blog_id = %blog.id, public_path = %path, "public path already taken");
        DomainError::Conflict(format!("public path {path} is already taken"))
    } else {
        error!("failed to write blog {}: {}", blog.id, e);
        DomainError::Internal(format!("database error: {}", e))
    }
}

#[async_trait]
impl BlogRepository for PostgresBlogRepository {
    async fn create(&self, blog: Blog) -> Result<Blog, DomainError> {
        sqlx::query(
            r#"
            INSERT INTO blogs (id, content, topic, tone, length, is_public, template_id,
                cover_image, accent_color, custom_css, author, published_at, public_path,
                created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $14)
            "#,
        )
        .bind(blog.id)
        .bind(&blog.content)
        .bind(&blog.topic)
        .bind(&blog.tone)
        .bind(blog.length)
        .bind(blog.is_public)
        .bind(blog.template)
        .bind(&blog.cover_image)
        .bind(&blog.accent_color)
        .bind(&blog.custom_css)
        .bind(blog.author.clone().map(Json))
        .bind(blog.published_at)
        .bind(&blog.public_path)
        .bind(blog.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error(e, &blog))?;

        info!(blog_id = %blog.id, topic = %blog.topic, "blog created");
        Ok(blog)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Blog>, DomainError> {
        let sql = format!("SELECT {BLOG_COLUMNS} FROM blogs WHERE id = $1");
        let row = sqlx::query_as::<_, BlogRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                error!("db error find_by_id {}: {}", id, e);
                DomainError::Internal(e.to_string())
            })?;
        Ok(row.map(Blog::from))
    }

    async fn find_public(
        &self,
        author_name: &str,
        topic: &str,
    ) -> Result<Option<Blog>, DomainError> {
        let sql = format!(
            "SELECT {BLOG_COLUMNS} FROM blogs \
             WHERE is_public = TRUE \
               AND lower(author->>'name') = lower($1) \
               AND lower(topic) = lower($2) \
             ORDER BY published_at DESC NULLS LAST \
             LIMIT 1"
        );
        let row = sqlx::query_as::<_, BlogRow>(&sql)
            .bind(author_name)
            .bind(topic)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                error!("db error find_public {}/{}: {}", author_name, topic, e);
                DomainError::Internal(e.to_string())
            })?;
        Ok(row.map(Blog::from))
    }

    async fn save(&self, blog: &Blog) -> Result<Option<Blog>, DomainError> {
        let now = Utc::now();
        let sql = format!(
            r#"
            UPDATE blogs
            SET
                content = $1,
                topic = $2,
                tone = $3,
                length = $4,
                is_public = $5,
                template_id = $6,
                cover_image = $7,
                accent_color = $8,
                custom_css = $9,
                author = $10,
                published_at = $11,
                public_path = $12,
                updated_at = $13
            WHERE id = $14
            RETURNING {BLOG_COLUMNS}
            "#
        );
        let row = sqlx::query_as::<_, BlogRow>(&sql)
            .bind(&blog.content)
            .bind(&blog.topic)
            .bind(&blog.tone)
            .bind(blog.length)
            .bind(blog.is_public)
            .bind(blog.template)
            .bind(&blog.cover_image)
            .bind(&blog.accent_color)
            .bind(&blog.custom_css)
            .bind(blog.author.clone().map(Json))
            .bind(blog.published_at)
            .bind(&blog.public_path)
            .bind(now)
            .bind(blog.id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_write_error(e, blog))?;

        if row.is_some() {
            info!(blog_id = %blog.id, is_public = blog.is_public, "blog saved");
        }

        Ok(row.map(Blog::from))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let deleted = sqlx::query("DELETE FROM blogs WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        if deleted.rows_affected() > 0 {
            info!(blog_id = %id, "blog deleted");
        }
        Ok(deleted.rows_affected() > 0)
    }

    async fn list(&self, query: &BlogListQuery) -> Result<Page<BlogSummary>, DomainError> {
        let pattern = query.search.as_deref().map(contains_pattern);
        // Sort column and direction come from closed enums.
        let sql = format!(
            "SELECT {SUMMARY_COLUMNS} FROM blogs \
             WHERE ($1::text IS NULL OR topic ILIKE $1) \
             ORDER BY {} {} NULLS LAST, id \
             LIMIT $2 OFFSET $3",
            query.sort.column(),
            query.order.as_sql()
        );

        let rows = sqlx::query_as::<_, BlogSummaryRow>(&sql)
            .bind(pattern.as_deref())
            .bind(query.pagination.limit())
            .bind(query.pagination.offset())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                error!("db error while listing blogs: {}", e);
                DomainError::Internal(e.to_string())
            })?;

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM blogs WHERE ($1::text IS NULL OR topic ILIKE $1)",
        )
        .bind(pattern.as_deref())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            error!("db error while counting blogs: {}", e);
            DomainError::Internal(e.to_string())
        })?;

        Ok(Page {
            data: rows.into_iter().map(BlogSummary::from).collect(),
            total,
        })
    }
}
