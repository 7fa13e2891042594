//! Pure planning half of run reconciliation.
//!
//! Reconciliation guarantees that every store required by a weekday
//! template has exactly one line per metal in the run. The database side
//! (lookups, idempotent inserts) lives in the repository layer; this
//! module computes *what* is missing and in which order lines display.

use std::collections::HashSet;

use crate::picking::Metal;
use crate::types::DbId;

/// Identity of a line within a run: the (store, metal) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LineKey {
    pub store_id: DbId,
    pub metal: Metal,
}

/// The full key set a run needs: two lines per required store, one per
/// metal, in template order.
pub fn required_line_keys(store_ids: &[DbId]) -> Vec<LineKey> {
    store_ids
        .iter()
        .flat_map(|&store_id| Metal::ALL.map(|metal| LineKey { store_id, metal }))
        .collect()
}

/// Set difference: required keys that have no existing line yet.
///
/// Order follows `required`, so inserts happen in template order.
pub fn missing_line_keys(required: &[LineKey], existing: &[LineKey]) -> Vec<LineKey> {
    let have: HashSet<LineKey> = existing.iter().copied().collect();
    required
        .iter()
        .filter(|key| !have.contains(key))
        .copied()
        .collect()
}

/// Display order shared by server responses and client caches: store code
/// lexicographic, then metal (ZILVER before STAAL). Lines whose store join
/// is not populated yet sort with an empty code, matching how a feed
/// insert appears before the next full reload.
pub fn line_display_order(a: (&str, Metal), b: (&str, Metal)) -> std::cmp::Ordering {
    a.0.cmp(b.0).then(a.1.cmp(&b.1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cmp::Ordering;

    #[test]
    fn two_keys_per_store_one_per_metal() {
        let keys = required_line_keys(&[10, 20]);
        assert_eq!(keys.len(), 4);
        assert_eq!(
            keys,
            vec![
                LineKey { store_id: 10, metal: Metal::Zilver },
                LineKey { store_id: 10, metal: Metal::Staal },
                LineKey { store_id: 20, metal: Metal::Zilver },
                LineKey { store_id: 20, metal: Metal::Staal },
            ]
        );
    }

    #[test]
    fn empty_template_requires_nothing() {
        assert!(required_line_keys(&[]).is_empty());
    }

    #[test]
    fn missing_keys_is_a_set_difference() {
        let required = required_line_keys(&[10, 20]);
        let existing = vec![
            LineKey { store_id: 10, metal: Metal::Zilver },
            LineKey { store_id: 20, metal: Metal::Staal },
        ];
        let missing = missing_line_keys(&required, &existing);
        assert_eq!(
            missing,
            vec![
                LineKey { store_id: 10, metal: Metal::Staal },
                LineKey { store_id: 20, metal: Metal::Zilver },
            ]
        );
    }

    #[test]
    fn nothing_missing_when_all_lines_exist() {
        let required = required_line_keys(&[10]);
        let missing = missing_line_keys(&required, &required);
        assert!(missing.is_empty());
    }

    #[test]
    fn extra_existing_lines_are_ignored() {
        // A line for a store no longer in the template must not affect the plan.
        let required = required_line_keys(&[10]);
        let mut existing = required.clone();
        existing.push(LineKey { store_id: 99, metal: Metal::Zilver });
        assert!(missing_line_keys(&required, &existing).is_empty());
    }

    #[test]
    fn display_order_sorts_by_code_then_metal() {
        assert_eq!(
            line_display_order(("AMS", Metal::Staal), ("RTM", Metal::Zilver)),
            Ordering::Less
        );
        assert_eq!(
            line_display_order(("AMS", Metal::Zilver), ("AMS", Metal::Staal)),
            Ordering::Less
        );
        assert_eq!(
            line_display_order(("", Metal::Zilver), ("AMS", Metal::Zilver)),
            Ordering::Less
        );
    }
}
