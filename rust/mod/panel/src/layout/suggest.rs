use std::collections::HashSet;

use crate::model::{Position, ProductPanelAssociation};

/// Highest position [`suggest_available_positions`] will consider.
///
/// Independent of the 24-slot TV grid: positions above 24 are accepted as
/// staging slots but are never rendered.
pub const SUGGESTION_CEILING: Position = 100;

pub const DEFAULT_SUGGESTION_LIMIT: usize = 5;

/// Up to `limit` free positions, lowest first, scanning 1..=100.
pub fn suggest_available_positions(
    existing: &[ProductPanelAssociation],
    limit: usize,
) -> Vec<Position> {
    let occupied: HashSet<Position> = existing.iter().filter_map(|a| a.position).collect();

    (1..=SUGGESTION_CEILING)
        .filter(|p| !occupied.contains(p))
        .take(limit)
        .collect()
}

/// The next position to hand out: the first hole in the occupied
/// sequence, or one past the highest position. Empty panels start at 1.
pub fn suggest_next_position(existing: &[ProductPanelAssociation]) -> Position {
    let mut positions: Vec<Position> = existing.iter().filter_map(|a| a.position).collect();
    positions.sort_unstable();

    let Some(&last) = positions.last() else {
        return 1;
    };

    positions
        .windows(2)
        .find(|pair| pair[1] > pair[0].saturating_add(1))
        .map(|pair| pair[0] + 1)
        .unwrap_or(last.saturating_add(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn occupied(positions: &[Option<Position>]) -> Vec<ProductPanelAssociation> {
        positions
            .iter()
            .enumerate()
            .map(|(i, p)| ProductPanelAssociation::new(format!("a{i}"), format!("p{i}"), "panel", *p))
            .collect()
    }

    #[test]
    fn next_fills_first_gap() {
        assert_eq!(suggest_next_position(&occupied(&[Some(1), Some(2), Some(4)])), 3);
    }

    #[test]
    fn next_extends_tail() {
        assert_eq!(suggest_next_position(&occupied(&[Some(1), Some(2), Some(3)])), 4);
    }

    #[test]
    fn next_on_empty_is_one() {
        assert_eq!(suggest_next_position(&[]), 1);
        assert_eq!(suggest_next_position(&occupied(&[None, None])), 1);
    }

    #[test]
    fn next_ignores_input_order() {
        assert_eq!(suggest_next_position(&occupied(&[Some(5), None, Some(3), Some(4)])), 6);
        assert_eq!(suggest_next_position(&occupied(&[Some(9), Some(2)])), 3);
    }

    #[test]
    fn available_skips_occupied() {
        let existing = occupied(&[Some(1), Some(3), None, Some(4)]);
        assert_eq!(suggest_available_positions(&existing, 5), vec![2, 5, 6, 7, 8]);
    }

    #[test]
    fn next_saturates_at_extremes() {
        assert_eq!(suggest_next_position(&occupied(&[Some(Position::MAX)])), Position::MAX);
        assert_eq!(
            suggest_next_position(&occupied(&[Some(Position::MIN), Some(5)])),
            Position::MIN + 1
        );
        assert_eq!(
            suggest_next_position(&occupied(&[Some(Position::MAX - 1), Some(Position::MAX)])),
            Position::MAX
        );
    }

    #[test]
    fn available_respects_limit() {
        assert_eq!(suggest_available_positions(&[], 2), vec![1, 2]);
        assert!(suggest_available_positions(&[], 0).is_empty());
    }

    #[test]
    fn available_stops_at_ceiling() {
        let full: Vec<Option<Position>> = (1..=98).map(Some).collect();
        let existing = occupied(&full);
        assert_eq!(suggest_available_positions(&existing, 5), vec![99, 100]);
    }
}
