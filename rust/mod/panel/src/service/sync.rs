use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use tvpanel_core::ServiceError;

use super::PanelService;
use super::panel::by_display_order;
use crate::keywords::{KeywordMatcher, default_keywords, normalize_name};
use crate::model::{Department, Panel, Product};

fn default_exact() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncRequest {
    #[serde(default = "default_exact")]
    pub exact_match: bool,
}

impl Default for SyncRequest {
    fn default() -> Self {
        Self { exact_match: true }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoCategorizeRequest {
    pub department_id: String,
    #[serde(default = "default_exact")]
    pub exact_match: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncResult {
    pub removed_count: usize,
    pub added_count: usize,
    pub panel: String,
    pub department: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoCategorizeResult {
    pub categorized_count: usize,
    pub department: String,
    pub panel: String,
    pub sync_removed: usize,
    pub sync_added: usize,
}

/// Per normalized name, the most expensive product; the first one seen
/// wins a tie.
fn pick_by_name<'a>(
    products: impl IntoIterator<Item = &'a Product>,
) -> BTreeMap<String, &'a Product> {
    let mut picked: BTreeMap<String, &Product> = BTreeMap::new();
    for product in products {
        let key = normalize_name(&product.name);
        if picked.get(&key).is_none_or(|prev| product.price > prev.price) {
            picked.insert(key, product);
        }
    }
    picked
}

impl PanelService {
    /// The department's default panel: active, `isDefault`, lowest display
    /// order first.
    pub fn default_panel(&self, department_id: &str) -> Result<Option<Panel>, ServiceError> {
        let mut panels = self
            .panels
            .filter(|p| p.department_id == department_id && p.is_default && p.active)?;
        by_display_order(&mut panels);
        Ok(panels.into_iter().next())
    }

    /// Attach every active product matching `matcher` that is not on the
    /// panel yet. Names already on the panel are skipped, and among
    /// same-named candidates only the most expensive one is attached.
    fn attach_matching(
        &self,
        panel: &Panel,
        matcher: &KeywordMatcher,
        products: &[Product],
    ) -> Result<usize, ServiceError> {
        let by_id: HashMap<&str, &Product> = products.iter().map(|p| (p.id.as_str(), p)).collect();
        let placements = self.associations.filter(|a| a.panel_id == panel.id)?;
        let on_panel: HashSet<&str> = placements.iter().map(|a| a.product_id.as_str()).collect();
        let names_on_panel: HashSet<String> = placements
            .iter()
            .filter_map(|a| by_id.get(a.product_id.as_str()))
            .map(|p| normalize_name(&p.name))
            .collect();

        let mut candidates: Vec<&Product> = products
            .iter()
            .filter(|p| p.active && !on_panel.contains(p.id.as_str()) && matcher.matches(&p.name))
            .filter(|p| !names_on_panel.contains(&normalize_name(&p.name)))
            .collect();
        candidates.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));

        let ids: Vec<String> = pick_by_name(candidates)
            .into_values()
            .map(|p| p.id.clone())
            .collect();
        Ok(self.add_products_to_panel(&panel.id, &ids)?.added_count)
    }

    /// Make the panel's placements follow the keywords: detach products
    /// whose name no longer matches, keep one placement per name (the most
    /// expensive product), then attach matching products not yet shown.
    fn sync_with(
        &self,
        department: &Department,
        panel: &Panel,
        matcher: &KeywordMatcher,
    ) -> Result<SyncResult, ServiceError> {
        let products = self.products.all()?;
        let by_id: HashMap<&str, &Product> = products.iter().map(|p| (p.id.as_str(), p)).collect();

        let mut removed: Vec<String> = Vec::new();
        let mut kept: HashMap<String, (String, f64)> = HashMap::new();
        for placement in self.list_panel_associations(&panel.id)? {
            let product = by_id.get(placement.product_id.as_str());
            let name = product.map(|p| p.name.as_str()).unwrap_or_default();
            if !matcher.matches(name) {
                removed.push(placement.id);
                continue;
            }
            let price = product.map(|p| p.price).unwrap_or_default();
            match kept.entry(normalize_name(name)) {
                Entry::Occupied(mut slot) if price > slot.get().1 => {
                    let (loser, _) = slot.insert((placement.id, price));
                    removed.push(loser);
                }
                Entry::Occupied(_) => removed.push(placement.id),
                Entry::Vacant(slot) => {
                    slot.insert((placement.id, price));
                }
            }
        }
        self.associations.remove_many(removed.iter().map(String::as_str))?;

        let added_count = self.attach_matching(panel, matcher, &products)?;
        info!(
            panel = %panel.id,
            removed = removed.len(),
            added = added_count,
            "panel synced with department keywords"
        );
        Ok(SyncResult {
            removed_count: removed.len(),
            added_count,
            panel: panel.name.clone(),
            department: department.name.clone(),
        })
    }

    /// Re-sync an active panel with its department's keywords.
    pub fn sync_panel(
        &self,
        department_id: &str,
        panel_id: &str,
        request: &SyncRequest,
    ) -> Result<SyncResult, ServiceError> {
        let (department, panel) = self.department_panel(department_id, panel_id)?;
        let matcher = KeywordMatcher::new(department.keywords.as_slice(), request.exact_match);
        if matcher.is_empty() {
            return Err(ServiceError::Validation(format!(
                "department '{}' has no keywords",
                department.name
            )));
        }
        self.sync_with(&department, &panel, &matcher)
    }

    /// Fill the department's default panel with matching products, then
    /// sync it. Stock departments without keywords fall back to the
    /// built-in list for their code.
    pub fn auto_categorize(
        &self,
        request: &AutoCategorizeRequest,
    ) -> Result<AutoCategorizeResult, ServiceError> {
        if request.department_id.trim().is_empty() {
            return Err(ServiceError::Validation("departmentId is required".into()));
        }
        let department = self.departments.get(&request.department_id)?;
        let panel = self.default_panel(&department.id)?.ok_or_else(|| {
            ServiceError::Validation(format!(
                "department '{}' has no default panel",
                department.name
            ))
        })?;

        let matcher = if department.keywords.is_empty() {
            KeywordMatcher::new(default_keywords(&department.code), request.exact_match)
        } else {
            KeywordMatcher::new(department.keywords.as_slice(), request.exact_match)
        };
        if matcher.is_empty() {
            return Err(ServiceError::Validation(format!(
                "department '{}' has no keywords",
                department.name
            )));
        }

        let products = self.products.all()?;
        let categorized_count = self.attach_matching(&panel, &matcher, &products)?;
        let sync = self.sync_with(&department, &panel, &matcher)?;
        debug!(department = %department.id, categorized_count, "auto-categorized");

        Ok(AutoCategorizeResult {
            categorized_count,
            department: department.name,
            panel: panel.name,
            sync_removed: sync.removed_count,
            sync_added: sync.added_count,
        })
    }

    /// Keyword edits re-sync the department's default panel. An empty
    /// keyword list leaves the panel alone.
    pub(super) fn resync_default_panel(
        &self,
        department: &Department,
        exact_match: bool,
    ) -> Result<Option<SyncResult>, ServiceError> {
        if department.keywords.is_empty() {
            return Ok(None);
        }
        let Some(panel) = self.default_panel(&department.id)? else {
            return Ok(None);
        };
        let matcher = KeywordMatcher::new(department.keywords.as_slice(), exact_match);
        self.sync_with(department, &panel, &matcher).map(Some)
    }
}
