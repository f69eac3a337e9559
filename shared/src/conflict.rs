use serde::{Deserialize, Serialize};

use crate::cart::{LineItem, ServiceSelection};

/// How an incoming selection relates to the current cart contents.
#[derive(Debug, Clone, PartialEq)]
pub enum Classification {
    /// No line item shares the selection's service. Plain append.
    NoConflict,
    /// The equality rule holds against exactly this item. Not a user-facing
    /// conflict: the caller routes straight to `add_or_merge`, which
    /// increments the quantity silently.
    ExactMatch { item_id: String },
    /// Same service, but no exact schedule match. The guest has to decide.
    Conflict(ConflictCase),
}

/// A pending conflict awaiting guest resolution.
///
/// Snapshots the originating selection and every same-service line item as
/// candidates, held immutably so the modal renders a consistent choice even
/// while resolution is in progress. Dropping the case cancels it with zero
/// cart mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConflictCase {
    selection: ServiceSelection,
    candidates: Vec<LineItem>,
}

impl ConflictCase {
    pub(crate) fn new(selection: ServiceSelection, candidates: Vec<LineItem>) -> Self {
        Self { selection, candidates }
    }

    pub fn selection(&self) -> &ServiceSelection {
        &self.selection
    }

    pub fn candidates(&self) -> &[LineItem] {
        &self.candidates
    }

    pub fn is_candidate(&self, item_id: &str) -> bool {
        self.candidates.iter().any(|item| item.item_id == item_id)
    }
}

/// Classify a selection against the cart.
///
/// An exact match wins even when other bookings of the same service exist:
/// "one more guest on the exact same booking" must never pop the conflict
/// modal, and bookings with a different schedule must never merge silently.
pub fn classify(selection: &ServiceSelection, items: &[LineItem]) -> Classification {
    if let Some(item) = items.iter().find(|item| selection.matches(item)) {
        return Classification::ExactMatch { item_id: item.item_id.clone() };
    }

    let candidates: Vec<LineItem> = items
        .iter()
        .filter(|item| item.service_id == selection.service_id)
        .cloned()
        .collect();

    if candidates.is_empty() {
        Classification::NoConflict
    } else {
        Classification::Conflict(ConflictCase::new(selection.clone(), candidates))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::test_support::selection;
    use crate::cart::CartState;
    use crate::timeslot::TimeSlot;

    fn cart_with(selections: Vec<ServiceSelection>) -> CartState {
        let mut cart = CartState::new();
        for sel in selections {
            cart.add_or_merge(sel).unwrap();
        }
        cart
    }

    #[test]
    fn test_no_shared_service_is_no_conflict() {
        let cart = cart_with(vec![selection(7, Some("2024-06-01"), Some(TimeSlot::TenAm), 2)]);
        let sel = selection(8, Some("2024-06-01"), Some(TimeSlot::TenAm), 1);
        assert_eq!(classify(&sel, cart.items()), Classification::NoConflict);
    }

    #[test]
    fn test_exact_match_iff_service_date_and_time_equal() {
        let cart = cart_with(vec![selection(7, Some("2024-06-01"), Some(TimeSlot::TenAm), 2)]);
        let item_id = cart.items()[0].item_id.clone();

        // All three equal, including quantity differences being irrelevant
        let same = selection(7, Some("2024-06-01"), Some(TimeSlot::TenAm), 5);
        assert_eq!(
            classify(&same, cart.items()),
            Classification::ExactMatch { item_id: item_id.clone() }
        );

        // Any differing field downgrades to a conflict
        for sel in [
            selection(7, Some("2024-06-02"), Some(TimeSlot::TenAm), 1),
            selection(7, Some("2024-06-01"), Some(TimeSlot::ElevenAm), 1),
            selection(7, None, Some(TimeSlot::TenAm), 1),
            selection(7, Some("2024-06-01"), None, 1),
            selection(7, None, None, 1),
        ] {
            match classify(&sel, cart.items()) {
                Classification::Conflict(case) => {
                    assert_eq!(case.candidates().len(), 1);
                    assert!(case.is_candidate(&item_id));
                }
                other => panic!("expected conflict, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_both_unset_schedules_are_an_exact_match() {
        let cart = cart_with(vec![selection(7, None, None, 1)]);
        let sel = selection(7, None, None, 2);
        assert!(matches!(
            classify(&sel, cart.items()),
            Classification::ExactMatch { .. }
        ));
    }

    #[test]
    fn test_conflict_returns_all_same_service_candidates() {
        let cart = cart_with(vec![
            selection(7, Some("2024-06-01"), Some(TimeSlot::TenAm), 2),
            selection(7, Some("2024-06-02"), Some(TimeSlot::TenAm), 1),
            selection(9, Some("2024-06-01"), Some(TimeSlot::TenAm), 1),
        ]);

        let sel = selection(7, Some("2024-06-03"), Some(TimeSlot::Noon), 1);
        match classify(&sel, cart.items()) {
            Classification::Conflict(case) => {
                assert_eq!(case.candidates().len(), 2);
                assert!(case.candidates().iter().all(|item| item.service_id == 7));
                assert_eq!(case.selection(), &sel);
            }
            other => panic!("expected conflict, got {:?}", other),
        }
    }

    #[test]
    fn test_exact_match_wins_over_sibling_conflict() {
        // A matching booking and another booking of the same service on a
        // different day: the add is still the silent-merge path.
        let cart = cart_with(vec![
            selection(7, Some("2024-06-01"), Some(TimeSlot::TenAm), 2),
            selection(7, Some("2024-06-02"), Some(TimeSlot::TenAm), 1),
        ]);
        let matching_id = cart.items()[0].item_id.clone();

        let sel = selection(7, Some("2024-06-01"), Some(TimeSlot::TenAm), 1);
        assert_eq!(
            classify(&sel, cart.items()),
            Classification::ExactMatch { item_id: matching_id }
        );
    }

    #[test]
    fn test_classify_on_empty_cart() {
        let sel = selection(7, Some("2024-06-01"), Some(TimeSlot::TenAm), 1);
        assert_eq!(classify(&sel, &[]), Classification::NoConflict);
    }
}
