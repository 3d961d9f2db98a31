use serde::Serialize;

use crate::layout::grid::GRID_SLOTS;
use crate::model::PanelProduct;

/// Summary numbers shown on the panel admin page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelStats {
    pub total: usize,
    pub active: usize,
    pub inactive: usize,
    /// Sum of active prices.
    pub total_value: f64,
    /// Mean active price, 0 with no active products.
    pub average_price: f64,
    pub occupied_positions: usize,
    /// Grid slots left, never negative.
    pub available_positions: usize,
}

impl PanelStats {
    pub fn from_products(products: &[PanelProduct]) -> Self {
        let active: Vec<&PanelProduct> = products.iter().filter(|p| p.active).collect();
        let total_value: f64 = active.iter().map(|p| p.price).sum();
        let average_price = if active.is_empty() {
            0.0
        } else {
            total_value / active.len() as f64
        };

        Self {
            total: products.len(),
            active: active.len(),
            inactive: products.len() - active.len(),
            total_value,
            average_price,
            occupied_positions: active.len(),
            available_positions: GRID_SLOTS.saturating_sub(active.len()),
        }
    }
}

/// Format a price in Brazilian reais: `R$ 1.234,50`.
pub fn format_price(value: f64) -> String {
    let cents = (value.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();
    let fraction = cents % 100;

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 && cents > 0 { "-" } else { "" };
    format!("{sign}R$ {grouped},{fraction:02}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(price: f64, active: bool) -> PanelProduct {
        PanelProduct {
            id: "x".into(),
            code: "X".into(),
            name: "Fraldinha".into(),
            price,
            position: None,
            active,
            unit: None,
        }
    }

    #[test]
    fn stats_count_only_active_values() {
        let stats = PanelStats::from_products(&[item(10.0, true), item(30.0, true), item(99.0, false)]);
        assert_eq!(stats.total, 3);
        assert_eq!(stats.active, 2);
        assert_eq!(stats.inactive, 1);
        assert_eq!(stats.total_value, 40.0);
        assert_eq!(stats.average_price, 20.0);
        assert_eq!(stats.occupied_positions, 2);
        assert_eq!(stats.available_positions, 22);
    }

    #[test]
    fn stats_on_empty_panel() {
        let stats = PanelStats::from_products(&[]);
        assert_eq!(stats.average_price, 0.0);
        assert_eq!(stats.available_positions, GRID_SLOTS);
    }

    #[test]
    fn available_positions_floor_at_zero() {
        let products: Vec<PanelProduct> = (0..30).map(|_| item(1.0, true)).collect();
        assert_eq!(PanelStats::from_products(&products).available_positions, 0);
    }

    #[test]
    fn price_formatting() {
        assert_eq!(format_price(0.0), "R$ 0,00");
        assert_eq!(format_price(12.5), "R$ 12,50");
        assert_eq!(format_price(1234.5), "R$ 1.234,50");
        assert_eq!(format_price(1_234_567.891), "R$ 1.234.567,89");
        assert_eq!(format_price(-3.2), "-R$ 3,20");
    }
}
