use crate::application::template_service::TemplateService;
use crate::domain::error::DomainError;
use crate::domain::template::{NewTemplate, TemplateUpdate};
use crate::presentation::dto::{DataResponse, ListTemplatesQuery};
use crate::presentation::handlers::request_id;
use actix_web::{HttpRequest, HttpResponse, Scope, delete, get, post, put, web};
use tracing::info;
use uuid::Uuid;

pub fn scope() -> Scope {
    web::scope("/templates")
        .service(create_template)
        .service(list_templates)
        .service(get_template)
        .service(update_template)
        .service(delete_template)
}

#[post("")]
async fn create_template(
    req: HttpRequest,
    templates: web::Data<TemplateService>,
    payload: web::Json<NewTemplate>,
) -> Result<HttpResponse, DomainError> {
    let template = templates.create_template(payload.into_inner()).await?;

    info!(
        request_id = %request_id(&req),
        template_id = %template.id,
        "template created"
    );

    Ok(HttpResponse::Created().json(DataResponse::new(template)))
}

#[get("")]
async fn list_templates(
    templates: web::Data<TemplateService>,
    query: web::Query<ListTemplatesQuery>,
) -> Result<HttpResponse, DomainError> {
    let page = templates.list_templates(query.into_inner().into()).await?;
    Ok(HttpResponse::Ok().json(page))
}

#[get("/{id}")]
async fn get_template(
    templates: web::Data<TemplateService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, DomainError> {
    let template = templates.get_template(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(DataResponse::new(template)))
}

#[put("/{id}")]
async fn update_template(
    req: HttpRequest,
    templates: web::Data<TemplateService>,
    path: web::Path<Uuid>,
    payload: web::Json<TemplateUpdate>,
) -> Result<HttpResponse, DomainError> {
    let template = templates
        .update_template(path.into_inner(), payload.into_inner())
        .await?;

    info!(
        request_id = %request_id(&req),
        template_id = %template.id,
        "template updated"
    );

    Ok(HttpResponse::Ok().json(DataResponse::new(template)))
}

#[delete("/{id}")]
async fn delete_template(
    req: HttpRequest,
    templates: web::Data<TemplateService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, DomainError> {
    let template_id = path.into_inner();
    templates.delete_template(template_id).await?;

    info!(
        request_id = %request_id(&req),
        template_id = %template_id,
        "template deleted"
    );

    Ok(HttpResponse::Ok().json(serde_json::json!({ "message": "Template deleted" })))
}
