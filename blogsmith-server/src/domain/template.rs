use std::collections::HashSet;

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::domain::system_templates::SYSTEM_TEMPLATES;

/// Visual style of a template. Consumers attach ad hoc keys such as
/// `borderRadius`; those are kept in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub style: TemplateStyle,
    pub preview_image: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Listing row: system membership is computed per query, never stored.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateListItem {
    #[serde(flatten)]
    pub template: Template,
    pub is_system: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTemplate {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub style: TemplateStyle,
    #[serde(default)]
    pub preview_image: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub style: Option<TemplateStyle>,
    #[serde(default)]
    pub preview_image: Option<String>,
}

static SYSTEM_TEMPLATE_NAMES: Lazy<HashSet<&'static str>> =
    Lazy::new(|| SYSTEM_TEMPLATES.iter().map(|t| t.name).collect());

pub fn system_template_names() -> Vec<String> {
    SYSTEM_TEMPLATES.iter().map(|t| t.name.to_string()).collect()
}

pub fn is_system_name(name: &str) -> bool {
    SYSTEM_TEMPLATE_NAMES.contains(name)
}

impl Template {
    pub fn new(input: NewTemplate) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: input.name,
            description: input.description,
            style: input.style,
            preview_image: input.preview_image,
            created_at: Utc::now(),
        }
    }

    pub fn is_system(&self) -> bool {
        is_system_name(&self.name)
    }

    pub fn apply_update(&mut self, update: TemplateUpdate) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(description) = update.description {
            self.description = Some(description);
        }
        if let Some(style) = update.style {
            self.style = style;
        }
        if let Some(preview_image) = update.preview_image {
            self.preview_image = Some(preview_image);
        }
    }

    pub fn into_list_item(self) -> TemplateListItem {
        let is_system = self.is_system();
        TemplateListItem {
            template: self,
            is_system,
        }
    }
}
