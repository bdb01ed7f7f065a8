use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde_json::json;
use uuid::Uuid;

use crate::error::ClientError;
use crate::models::{
    Blog, BlogDetail, BlogSummary, BlogUpdate, ListBlogsParams, ListTemplatesParams, NewTemplate,
    Page, PublishCustomization, Template, TemplateListItem, TemplateUpdate,
};

const PUBLIC_PREFIX: &str = "/public/blog/";

/// HTTP client for the blogsmith REST API.
#[derive(Clone)]
pub struct BlogsmithClient {
    client: Client,
    base_url: String,
}

#[derive(serde::Deserialize)]
struct Envelope<T> {
    data: T,
}

impl BlogsmithClient {
    pub fn connect(endpoint: &str) -> Result<Self, ClientError> {
        let base_url = endpoint.trim_end_matches('/').to_string();
        Url::parse(&base_url).map_err(|e| ClientError::InvalidUrl(format!("{endpoint}: {e}")))?;
        Ok(Self {
            client: Client::builder().build()?,
            base_url,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api{}", self.base_url, path)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ClientError> {
        let resp = request.send().await?;
        if !resp.status().is_success() {
            return Err(ClientError::from_http_response(resp).await);
        }
        Ok(resp.json::<T>().await?)
    }

    async fn send_data<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, ClientError> {
        self.send::<Envelope<T>>(request).await.map(|e| e.data)
    }

    async fn send_empty(&self, request: RequestBuilder) -> Result<(), ClientError> {
        let resp = request.send().await?;
        if !resp.status().is_success() {
            return Err(ClientError::from_http_response(resp).await);
        }
        Ok(())
    }

    // ======================= Blogs =======================

    pub async fn create_blog(
        &self,
        topic: &str,
        tone: &str,
        length: i32,
    ) -> Result<Blog, ClientError> {
        let body = json!({ "topic": topic, "tone": tone, "length": length });
        self.send_data(self.client.post(self.url("/blog")).json(&body))
            .await
    }

    pub async fn list_blogs(
        &self,
        params: &ListBlogsParams,
    ) -> Result<Page<BlogSummary>, ClientError> {
        self.send(self.client.get(self.url("/blog")).query(params))
            .await
    }

    pub async fn get_blog(&self, id: Uuid) -> Result<BlogDetail, ClientError> {
        self.send_data(self.client.get(self.url(&format!("/blog/{id}"))))
            .await
    }

    pub async fn update_blog(&self, id: Uuid, update: &BlogUpdate) -> Result<Blog, ClientError> {
        self.send_data(
            self.client
                .put(self.url(&format!("/blog/{id}")))
                .json(update),
        )
        .await
    }

    pub async fn delete_blog(&self, id: Uuid) -> Result<(), ClientError> {
        self.send_empty(self.client.delete(self.url(&format!("/blog/{id}"))))
            .await
    }

    pub async fn publish_blog(
        &self,
        id: Uuid,
        customization: &PublishCustomization,
    ) -> Result<Blog, ClientError> {
        self.send_data(
            self.client
                .put(self.url(&format!("/blog/{id}/publish")))
                .json(customization),
        )
        .await
    }

    pub async fn unpublish_blog(&self, id: Uuid) -> Result<Blog, ClientError> {
        self.send_data(
            self.client
                .put(self.url(&format!("/blog/{id}/unpublish"))),
        )
        .await
    }

    pub async fn get_public_blog(
        &self,
        author_slug: &str,
        topic_slug: &str,
    ) -> Result<BlogDetail, ClientError> {
        let mut url = Url::parse(&self.url("/blog/public"))
            .map_err(|e| ClientError::InvalidUrl(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidUrl(self.base_url.clone()))?
            .push(author_slug)
            .push(topic_slug);
        self.send_data(self.client.get(url)).await
    }

    /// Resolves a stored `publicPath` such as `/public/blog/jane-doe/rust-tips`.
    pub async fn public_blog_by_path(&self, path: &str) -> Result<BlogDetail, ClientError> {
        let (author, topic) = split_public_path(path)?;
        self.get_public_blog(author, topic).await
    }

    // ======================= Templates =======================

    pub async fn create_template(&self, template: &NewTemplate) -> Result<Template, ClientError> {
        self.send_data(self.client.post(self.url("/templates")).json(template))
            .await
    }

    pub async fn list_templates(
        &self,
        params: &ListTemplatesParams,
    ) -> Result<Page<TemplateListItem>, ClientError> {
        self.send(self.client.get(self.url("/templates")).query(params))
            .await
    }

    pub async fn get_template(&self, id: Uuid) -> Result<Template, ClientError> {
        self.send_data(self.client.get(self.url(&format!("/templates/{id}"))))
            .await
    }

    pub async fn update_template(
        &self,
        id: Uuid,
        update: &TemplateUpdate,
    ) -> Result<Template, ClientError> {
        self.send_data(
            self.client
                .put(self.url(&format!("/templates/{id}")))
                .json(update),
        )
        .await
    }

    pub async fn delete_template(&self, id: Uuid) -> Result<(), ClientError> {
        self.send_empty(self.client.delete(self.url(&format!("/templates/{id}"))))
            .await
    }
}

fn split_public_path(path: &str) -> Result<(&str, &str), ClientError> {
    let rest = path
        .strip_prefix(PUBLIC_PREFIX)
        .ok_or_else(|| ClientError::InvalidPublicPath(path.to_string()))?;
    match rest.trim_end_matches('/').split_once('/') {
        Some((author, topic)) if !author.is_empty() && !topic.is_empty() && !topic.contains('/') => {
            Ok((author, topic))
        }
        _ => Err(ClientError::InvalidPublicPath(path.to_string())),
    }
}
