use serde::{Deserialize, Serialize};

/// Upper bound on page size; larger requests are clamped.
pub const MAX_PAGE_SIZE: usize = 500;

/// Parameters for list operations.
#[derive(Debug, Clone, Deserialize)]
pub struct ListParams {
    /// Maximum number of results to return.
    #[serde(default = "default_limit")]
    pub limit: usize,

    /// Offset for pagination.
    #[serde(default)]
    pub offset: usize,
}

fn default_limit() -> usize {
    50
}

impl Default for ListParams {
    fn default() -> Self {
        Self {
            limit: default_limit(),
            offset: 0,
        }
    }
}

/// Result wrapper for list operations.
#[derive(Debug, Clone, Serialize)]
pub struct ListResult<T: Serialize> {
    pub items: Vec<T>,
    pub total: usize,
}

impl<T: Serialize> ListResult<T> {
    /// Slice an already-loaded collection according to `params`.
    ///
    /// KV scans load every record anyway; pagination only controls how
    /// much goes back to the caller. `total` is the unsliced count.
    pub fn paginate(all: Vec<T>, params: &ListParams) -> Self {
        let total = all.len();
        let limit = params.limit.min(MAX_PAGE_SIZE);
        let items = all.into_iter().skip(params.offset).take(limit).collect();
        Self { items, total }
    }
}

/// Generate a new random ID (UUIDv4, no dashes).
pub fn new_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// Get the current time as an RFC 3339 string.
pub fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339()
}

/// Merge a JSON patch into a base value (RFC 7386).
///
/// `null` removes a key, objects merge recursively, anything else
/// replaces.
pub fn merge_patch(base: &mut serde_json::Value, patch: &serde_json::Value) {
    let (Some(base_obj), Some(patch_obj)) = (base.as_object_mut(), patch.as_object()) else {
        *base = patch.clone();
        return;
    };

    for (key, value) in patch_obj {
        if value.is_null() {
            base_obj.remove(key);
        } else if value.is_object() {
            let entry = base_obj
                .entry(key.clone())
                .or_insert_with(|| serde_json::Value::Object(serde_json::Map::new()));
            merge_patch(entry, value);
        } else {
            base_obj.insert(key.clone(), value.clone());
        }
    }
}
