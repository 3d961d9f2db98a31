use serde::{Deserialize, Serialize};

use tvpanel_core::config::DEFAULT_POLLING_INTERVAL_SECS;

use super::product::default_true;

/// Screen layout template of a panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum LayoutType {
    #[default]
    #[serde(rename = "layout_1")]
    Layout1,
    #[serde(rename = "layout_2")]
    Layout2,
    #[serde(rename = "layout_3")]
    Layout3,
    #[serde(rename = "layout_4")]
    Layout4,
}

/// A content slot rendered on a physical TV.
/// Belongs to one department.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Panel {
    pub id: String,
    pub name: String,
    pub department_id: String,

    #[serde(default)]
    pub layout_type: LayoutType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footer_text: Option<String>,

    /// TV re-fetch cadence in seconds.
    #[serde(default = "default_polling_interval")]
    pub polling_interval: u64,

    #[serde(default)]
    pub is_default: bool,

    #[serde(default)]
    pub display_order: i64,

    #[serde(default = "default_true")]
    pub active: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_at: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_at: Option<String>,
}

fn default_polling_interval() -> u64 {
    DEFAULT_POLLING_INTERVAL_SECS
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePanel {
    pub name: String,
    pub department_id: String,
    #[serde(default)]
    pub layout_type: LayoutType,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub footer_text: Option<String>,
    #[serde(default = "default_polling_interval")]
    pub polling_interval: u64,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default)]
    pub display_order: i64,
}
