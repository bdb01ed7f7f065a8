use crate::application::blog_service::BlogService;
use crate::application::template_service::TemplateService;
use crate::domain::error::DomainError;
use crate::infrastructure::config::AppConfig;
use crate::presentation::handlers;
use crate::presentation::middleware::RequestTrace;
use actix_cors::Cors;
use actix_web::middleware::DefaultHeaders;
use actix_web::{App, HttpResponse, HttpServer, Responder, web};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

pub async fn start_rest_server(
    config: AppConfig,
    blog_service: BlogService,
    template_service: TemplateService,
) -> anyhow::Result<()> {
    let bind_address = (config.host.clone(), config.port);
    info!(host = %bind_address.0, port = bind_address.1, "HTTP server starting");

    let blogs = web::Data::new(blog_service);
    let templates = web::Data::new(template_service);

    HttpServer::new(move || {
        let cors = build_cors(&config);

        App::new()
            .wrap(RequestTrace)
            .wrap(
                DefaultHeaders::new()
                    .add(("X-Content-Type-Options", "nosniff"))
                    .add(("Referrer-Policy", "no-referrer"))
                    .add(("Permissions-Policy", "geolocation=()"))
                    .add(("Cross-Origin-Opener-Policy", "same-origin")),
            )
            .wrap(cors)
            .app_data(blogs.clone())
            .app_data(templates.clone())
            .configure(configure_api)
    })
    .bind(bind_address)?
    .run()
    .await
    .map_err(anyhow::Error::new)?;

    Ok(())
}

/// Routes and extractor settings shared by the server and the handler tests.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _| {
        DomainError::Validation(format!("invalid JSON body: {err}")).into()
    }))
    .app_data(web::QueryConfig::default().error_handler(|err, _| {
        DomainError::Validation(format!("invalid query string: {err}")).into()
    }))
    .app_data(web::PathConfig::default().error_handler(|err, _| {
        DomainError::Validation(format!("invalid path parameter: {err}")).into()
    }))
    .service(
        web::scope("/api")
            .route("/health", web::get().to(health))
            .service(handlers::blog::scope())
            .service(handlers::template::scope()),
    );
}

fn build_cors(config: &AppConfig) -> Cors {
    let mut cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE"])
        .allowed_headers(vec![
            actix_web::http::header::CONTENT_TYPE,
            actix_web::http::header::AUTHORIZATION,
        ])
        .supports_credentials()
        .max_age(3600);

    for origin in &config.cors_origins {
        cors = cors.allowed_origin(origin);
    }

    cors
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
}

async fn health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "ok",
        timestamp: Utc::now(),
    })
}
