use serde::{Deserialize, Serialize};

use super::Position;

/// A sellable item shown on TV panels (butcher counter cuts).
/// PK = id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,

    /// Shop code printed next to the name (e.g. scale PLU).
    pub code: String,

    pub name: String,

    /// Free-text grouping label ("Bovinos", "Suínos", ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,

    #[serde(default)]
    pub price: f64,

    /// Default slot when an association does not override it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,

    #[serde(default = "default_true")]
    pub active: bool,

    /// Sale unit, e.g. "kg" or "un".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_at: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_at: Option<String>,
}

pub(crate) fn default_true() -> bool {
    true
}

/// Input for creating a product.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProduct {
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub position: Option<Position>,
    #[serde(default = "default_true")]
    pub active: bool,
    #[serde(default)]
    pub unit: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let p: Product = serde_json::from_str(r#"{"id":"p1","code":"101","name":"Alcatra"}"#).unwrap();
        assert!(p.active);
        assert_eq!(p.price, 0.0);
        assert_eq!(p.position, None);
        assert_eq!(p.department, None);
    }

    #[test]
    fn serializes_camel_case() {
        let p = Product {
            id: "p1".into(),
            code: "101".into(),
            name: "Alcatra".into(),
            department: Some("Bovinos".into()),
            price: 49.9,
            position: Some(3),
            active: true,
            unit: Some("kg".into()),
            create_at: Some("2024-01-01T00:00:00Z".into()),
            update_at: None,
        };
        let json = serde_json::to_value(&p).unwrap();
        assert_eq!(json["createAt"], "2024-01-01T00:00:00Z");
        assert!(json.get("updateAt").is_none());
        assert_eq!(json["position"], 3);
    }
}
