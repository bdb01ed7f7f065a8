use crate::application::blog_service::BlogService;
use crate::domain::blog::{BlogUpdate, PublishCustomization};
use crate::domain::error::DomainError;
use crate::domain::listing::BlogListQuery;
use crate::presentation::dto::{CreateBlogRequest, DataResponse, ListBlogsQuery};
use crate::presentation::handlers::request_id;
use actix_web::{HttpRequest, HttpResponse, Scope, delete, get, post, put, web};
use tracing::info;
use uuid::Uuid;

pub fn scope() -> Scope {
    web::scope("/blog")
        .service(list_blogs)
        .service(create_blog)
        .service(get_public_blog)
        .service(get_blog)
        .service(update_blog)
        .service(delete_blog)
        .service(publish_blog)
        .service(unpublish_blog)
}

#[post("")]
async fn create_blog(
    req: HttpRequest,
    blogs: web::Data<BlogService>,
    payload: web::Json<CreateBlogRequest>,
) -> Result<HttpResponse, DomainError> {
    let blog = blogs.create_blog(payload.into_inner().into()).await?;

    info!(
        request_id = %request_id(&req),
        blog_id = %blog.id,
        "blog created"
    );

    Ok(HttpResponse::Created().json(DataResponse::with_message(
        "Blog created successfully",
        blog,
    )))
}

#[get("")]
async fn list_blogs(
    blogs: web::Data<BlogService>,
    query: web::Query<ListBlogsQuery>,
) -> Result<HttpResponse, DomainError> {
    let query = BlogListQuery::try_from(query.into_inner())?;
    let page = blogs.list_blogs(query).await?;
    Ok(HttpResponse::Ok().json(page))
}

#[get("/public/{author}/{topic}")]
async fn get_public_blog(
    req: HttpRequest,
    blogs: web::Data<BlogService>,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, DomainError> {
    let (author, topic) = path.into_inner();
    let detail = blogs.get_public_blog(&author, &topic).await?;

    info!(
        request_id = %request_id(&req),
        blog_id = %detail.blog.id,
        "public blog served"
    );

    Ok(HttpResponse::Ok().json(DataResponse::new(detail)))
}

#[get("/{id}")]
async fn get_blog(
    blogs: web::Data<BlogService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, DomainError> {
    let detail = blogs.get_blog(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(DataResponse::new(detail)))
}

#[put("/{id}")]
async fn update_blog(
    req: HttpRequest,
    blogs: web::Data<BlogService>,
    path: web::Path<Uuid>,
    payload: web::Json<BlogUpdate>,
) -> Result<HttpResponse, DomainError> {
    let blog = blogs
        .update_blog(path.into_inner(), payload.into_inner())
        .await?;

    info!(
        request_id = %request_id(&req),
        blog_id = %blog.id,
        "blog updated"
    );

    Ok(HttpResponse::Ok().json(DataResponse::with_message("Saved", blog)))
}

#[delete("/{id}")]
async fn delete_blog(
    req: HttpRequest,
    blogs: web::Data<BlogService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, DomainError> {
    let blog_id = path.into_inner();
    blogs.delete_blog(blog_id).await?;

    info!(
        request_id = %request_id(&req),
        blog_id = %blog_id,
        "blog deleted"
    );

    Ok(HttpResponse::NoContent().finish())
}

#[put("/{id}/publish")]
async fn publish_blog(
    req: HttpRequest,
    blogs: web::Data<BlogService>,
    path: web::Path<Uuid>,
    body: web::Bytes,
) -> Result<HttpResponse, DomainError> {
    let customization = publish_customization(&body)?;
    let blog = blogs.publish_blog(path.into_inner(), customization).await?;

    info!(
        request_id = %request_id(&req),
        blog_id = %blog.id,
        public_path = blog.public_path.as_deref().unwrap_or_default(),
        "blog published"
    );

    Ok(HttpResponse::Ok().json(DataResponse::with_message("Blog published", blog)))
}

/// An empty body publishes without customization; anything else must parse.
fn publish_customization(body: &[u8]) -> Result<PublishCustomization, DomainError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(PublishCustomization::default());
    }
    serde_json::from_slice(body)
        .map_err(|e| DomainError::Validation(format!("invalid JSON body: {e}")))
}

#[put("/{id}/unpublish")]
async fn unpublish_blog(
    req: HttpRequest,
    blogs: web::Data<BlogService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, DomainError> {
    let blog = blogs.unpublish_blog(path.into_inner()).await?;

    info!(
        request_id = %request_id(&req),
        blog_id = %blog.id,
        "blog unpublished"
    );

    Ok(HttpResponse::Ok().json(DataResponse::with_message("Blog unpublished", blog)))
}
