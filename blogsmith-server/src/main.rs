mod application;
mod data;
mod domain;
mod infrastructure;
mod presentation;

use std::sync::Arc;

use application::blog_service::BlogService;
use application::template_service::TemplateService;
use data::blog_repository::PostgresBlogRepository;
use data::template_repository::PostgresTemplateRepository;
use domain::system_templates::SYSTEM_TEMPLATES;
use infrastructure::config::AppConfig;
use infrastructure::database::{create_pool, run_migrations};
use infrastructure::generation::GeminiClient;
use infrastructure::logging::init_logging;
use presentation::server::start_rest_server;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let config = AppConfig::from_env()?;
    let pool = create_pool(&config.database_url).await?;
    run_migrations(&pool).await?;

    let blog_repo = Arc::new(PostgresBlogRepository::new(pool.clone()));
    let template_repo = Arc::new(PostgresTemplateRepository::new(pool.clone()));
    let generator = Arc::new(GeminiClient::new(
        &config.gemini_base_url,
        config.gemini_model.clone(),
        config.gemini_api_key.clone(),
    ));

    let template_service = TemplateService::new(template_repo.clone());
    template_service
        .seed_system_templates_if_needed(SYSTEM_TEMPLATES)
        .await?;

    let blog_service = BlogService::new(blog_repo, template_repo, generator);

    start_rest_server(config, blog_service, template_service).await
}
