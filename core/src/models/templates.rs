use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::{Validate, ValidationError};

use crate::schema::rules;

/// A declared template variable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateVariable {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
}

impl TemplateVariable {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            default_value: None,
        }
    }

    pub fn with_default(name: impl Into<String>, default_value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            default_value: Some(default_value.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateVersion {
    pub id: String,
    #[serde(default)]
    pub version: Option<i64>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub published_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub variables: Vec<TemplateVariable>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub draft_version: Option<TemplateVersion>,
    #[serde(default)]
    pub published_version: Option<TemplateVersion>,
    #[serde(default)]
    pub template_versions: Vec<TemplateVersion>,
}

/// Template listings arrive either as a page object or, from older
/// deployments, as a bare array.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum TemplateListing {
    Page {
        content: Vec<Template>,
        #[serde(rename = "totalElements", default)]
        total_elements: Option<u64>,
    },
    List(Vec<Template>),
}

impl TemplateListing {
    pub fn into_templates(self) -> Vec<Template> {
        match self {
            TemplateListing::Page { content, .. } => content,
            TemplateListing::List(list) => list,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelTemplate {
    #[serde(default)]
    pub id: Option<String>,
    pub channel: String,
    #[serde(default)]
    pub configuration: Value,
    #[serde(default)]
    pub template_version_id: Option<String>,
}

/// Result of creating a template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedTemplate {
    pub template_id: String,
    pub template_name: String,
    pub draft_version_id: String,
    #[serde(default)]
    pub channel_template_list: Vec<ChannelTemplate>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTemplateRequest {
    #[validate(custom(function = "rules::not_blank"))]
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag_names: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variables: Option<Vec<TemplateVariable>>,
    /// Channel name (`EMAIL`, `SMS`, ...) to channel configuration.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "valid_configurations"))]
    pub configurations: Option<BTreeMap<String, Value>>,
}

impl CreateTemplateRequest {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTemplateRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "rules::not_blank"))]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag_names: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variables: Option<Vec<TemplateVariable>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "valid_configurations"))]
    pub configurations: Option<BTreeMap<String, Value>>,
}

/// Channel templates keyed by channel name, sent as a flat JSON object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Validate)]
#[serde(transparent)]
pub struct CreateChannelTemplatesRequest {
    #[validate(custom(function = "valid_channel_templates"))]
    pub channels: BTreeMap<String, Value>,
}

impl CreateChannelTemplatesRequest {
    pub fn channel(mut self, channel: impl Into<String>, configuration: Value) -> Self {
        self.channels.insert(channel.into(), configuration);
        self
    }
}

fn valid_configurations(configurations: &BTreeMap<String, Value>) -> Result<(), ValidationError> {
    if configurations.values().all(Value::is_object) {
        Ok(())
    } else {
        Err(rules::fail("configuration", "every channel configuration must be a JSON object"))
    }
}

fn valid_channel_templates(channels: &BTreeMap<String, Value>) -> Result<(), ValidationError> {
    if channels.is_empty() {
        return Err(rules::fail("empty", "at least one channel template is required"));
    }
    valid_configurations(channels)
}

/// Filters for listing templates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateQuery {
    pub tag_names: Option<String>,
    pub search: Option<String>,
    pub sort: Option<String>,
    pub page: Option<u32>,
    pub size: Option<u32>,
}

/// Filters for listing the channel templates of a template version.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelTemplateQuery {
    pub channel: Option<String>,
    pub search: Option<String>,
    pub sort: Option<String>,
    pub page: Option<u32>,
    pub size: Option<u32>,
}
