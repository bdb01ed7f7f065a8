use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::domain::template::Template;

pub const PUBLIC_PATH_PREFIX: &str = "/public/blog";
const AUTHOR_FALLBACK_SLUG: &str = "author";
const TOPIC_FALLBACK_SLUG: &str = "blog";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Blog {
    pub id: Uuid,
    pub content: String,
    pub topic: String,
    pub tone: String,
    pub length: i32,
    pub is_public: bool,
    pub template: Option<Uuid>,
    pub cover_image: Option<String>,
    pub accent_color: Option<String>,
    #[serde(rename = "customCSS")]
    pub custom_css: Option<String>,
    pub author: Option<Author>,
    pub published_at: Option<DateTime<Utc>>,
    pub public_path: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Listing projection; listings never carry the body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogSummary {
    pub id: Uuid,
    pub topic: String,
    pub tone: String,
    pub length: i32,
    pub is_public: bool,
    pub template: Option<Uuid>,
    pub cover_image: Option<String>,
    pub author: Option<Author>,
    pub published_at: Option<DateTime<Utc>>,
    pub public_path: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A blog with its template reference resolved. `templateDetails` is null when
/// the referenced template no longer exists.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogDetail {
    #[serde(flatten)]
    pub blog: Blog,
    pub template_details: Option<Template>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Draft,
    Published,
}

/// Presentation fields applied on publish. Empty strings count as absent.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishCustomization {
    #[serde(default, deserialize_with = "blank_uuid_as_none")]
    pub template: Option<Uuid>,
    #[serde(default)]
    pub cover_image: Option<String>,
    #[serde(default)]
    pub accent_color: Option<String>,
    #[serde(default, rename = "customCSS")]
    pub custom_css: Option<String>,
    #[serde(default)]
    pub author: Option<Author>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogUpdate {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default)]
    pub tone: Option<String>,
    #[serde(default)]
    pub length: Option<i32>,
    #[serde(default, deserialize_with = "blank_uuid_as_none")]
    pub template: Option<Uuid>,
    #[serde(default)]
    pub cover_image: Option<String>,
    #[serde(default)]
    pub accent_color: Option<String>,
    #[serde(default, rename = "customCSS")]
    pub custom_css: Option<String>,
    #[serde(default)]
    pub author: Option<Author>,
    #[serde(default)]
    pub is_public: Option<bool>,
}

impl Blog {
    pub fn new(topic: String, tone: String, length: i32, content: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            content,
            topic,
            tone,
            length,
            is_public: false,
            template: None,
            cover_image: None,
            accent_color: None,
            custom_css: None,
            author: None,
            published_at: None,
            public_path: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn visibility(&self) -> Visibility {
        if self.is_public {
            Visibility::Published
        } else {
            Visibility::Draft
        }
    }

    pub fn author_name(&self) -> Option<&str> {
        self.author.as_ref().map(|a| a.name.as_str())
    }

    pub fn apply_customization(&mut self, customization: PublishCustomization) {
        if let Some(template) = customization.template {
            self.template = Some(template);
        }
        if let Some(cover_image) = provided(customization.cover_image) {
            self.cover_image = Some(cover_image);
        }
        if let Some(accent_color) = provided(customization.accent_color) {
            self.accent_color = Some(accent_color);
        }
        if let Some(custom_css) = provided(customization.custom_css) {
            self.custom_css = Some(custom_css);
        }
        if let Some(author) = customization.author {
            self.author = Some(author);
        }
    }

    /// Applies every provided field except `is_public`, which is a visibility
    /// transition. Returns true when the author name or topic changed.
    pub fn apply_update(&mut self, update: BlogUpdate) -> bool {
        let before = (self.author_name().map(str::to_owned), self.topic.clone());

        if let Some(content) = provided(update.content) {
            self.content = content;
        }
        if let Some(topic) = provided(update.topic) {
            self.topic = topic;
        }
        if let Some(tone) = provided(update.tone) {
            self.tone = tone;
        }
        if let Some(length) = update.length.filter(|n| *n > 0) {
            self.length = length;
        }
        self.apply_customization(PublishCustomization {
            template: update.template,
            cover_image: update.cover_image,
            accent_color: update.accent_color,
            custom_css: update.custom_css,
            author: update.author,
        });

        before.0.as_deref() != self.author_name() || before.1 != self.topic
    }

    /// Draft -> Published, or Published -> Published on republish.
    pub fn publish(&mut self, now: DateTime<Utc>) {
        self.is_public = true;
        self.published_at = Some(now);
        self.refresh_public_path();
    }

    /// Published -> Draft. The stored path and timestamp are kept; public
    /// lookups gate on `is_public` alone.
    pub fn unpublish(&mut self) {
        self.is_public = false;
    }

    pub fn refresh_public_path(&mut self) {
        self.public_path = Some(public_path(self.author_name(), &self.topic));
    }
}

/// Reads an optional template id where `""` and null both mean "not provided".
fn blank_uuid_as_none<'de, D>(deserializer: D) -> Result<Option<Uuid>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(raw) if !raw.trim().is_empty() => Uuid::parse_str(raw.trim())
            .map(Some)
            .map_err(serde::de::Error::custom),
        _ => Ok(None),
    }
}

fn provided(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Lowercases, collapses every run of characters outside `[a-z0-9]` into one
/// hyphen and never emits a leading or trailing hyphen.
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut pending_hyphen = false;
    for c in input.to_lowercase().chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c);
        } else {
            pending_hyphen = true;
        }
    }
    slug
}

pub fn public_path(author_name: Option<&str>, topic: &str) -> String {
    let author = author_name
        .map(slugify)
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| AUTHOR_FALLBACK_SLUG.to_string());
    let topic = Some(slugify(topic))
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| TOPIC_FALLBACK_SLUG.to_string());
    format!("{PUBLIC_PATH_PREFIX}/{author}/{topic}")
}

/// Approximate inverse of [`slugify`] for a single public path segment.
pub fn unslug(segment: &str) -> String {
    segment.replace('-', " ")
}
