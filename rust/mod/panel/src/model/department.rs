use serde::{Deserialize, Serialize};

use super::product::default_true;

/// A shop section owning one or more TV panels.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Department {
    pub id: String,
    pub name: String,

    #[serde(default)]
    pub code: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// CSS color used by the admin dashboard and TV header.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,

    /// Product-name keywords used to fill the department's panels.
    #[serde(default)]
    pub keywords: Vec<String>,

    #[serde(default = "default_true")]
    pub active: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_at: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_at: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDepartment {
    pub name: String,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
}
