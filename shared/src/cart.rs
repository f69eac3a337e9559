use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::timeslot::TimeSlot;

/// VAT rate applied to the cart subtotal (5%, the resort's configured rate).
pub const DEFAULT_VAT_RATE: f64 = 0.05;

/// Errors raised by cart operations and conflict resolution.
///
/// Validation and precondition failures are blocking: the action is refused
/// before any state mutation, and the cart is left exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    #[error("cart item not found: {0}")]
    ItemNotFound(String),
    #[error("guest count must be at least 1")]
    QuantityNotPositive,
    #[error("a booking date and time slot are required")]
    ScheduleRequired,
    #[error("booking {0} is not part of this conflict")]
    NotACandidate(String),
    #[error("this choice requires selecting an existing booking")]
    TargetRequired,
}

/// A single request to add or modify cart content: one service, an optional
/// booking date and time slot, and a guest count. Built per user action and
/// never persisted directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceSelection {
    pub service_id: u32,
    /// Denormalized display fields carried onto the line item.
    pub service_name: String,
    pub unit_price: f64,
    pub date: Option<NaiveDate>,
    pub time: Option<TimeSlot>,
    pub quantity: u32,
}

impl ServiceSelection {
    /// The equality rule that defines "the same booking": service, date and
    /// time must all be equal, a `None` date/time only matching `None`.
    /// Partial matches (same service, different schedule) are conflicts,
    /// never merges.
    pub fn matches(&self, item: &LineItem) -> bool {
        self.service_id == item.service_id && self.date == item.date && self.time == item.time
    }

    pub fn validate(&self) -> Result<(), CartError> {
        if self.quantity == 0 {
            return Err(CartError::QuantityNotPositive);
        }
        Ok(())
    }

    /// Validation for the booking flow, where a concrete schedule is
    /// mandatory before anything reaches the cart.
    pub fn validate_scheduled(&self) -> Result<(), CartError> {
        self.validate()?;
        if self.date.is_none() || self.time.is_none() {
            return Err(CartError::ScheduleRequired);
        }
        Ok(())
    }
}

/// One entry in the cart: a service booked for a (possibly unset) date and
/// time slot, with a guest count. `item_id` is opaque and stable for the
/// lifetime of the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub item_id: String,
    pub service_id: u32,
    pub service_name: String,
    pub unit_price: f64,
    pub date: Option<NaiveDate>,
    pub time: Option<TimeSlot>,
    pub quantity: u32,
}

impl LineItem {
    /// Generate an id for a locally created line item.
    pub fn generate_id() -> String {
        format!("item::{}", Uuid::new_v4())
    }

    pub fn line_subtotal(&self) -> f64 {
        self.unit_price * self.quantity as f64
    }
}

/// Aggregate cart totals, always recomputed from the line items.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Totals {
    pub subtotal: f64,
    pub vat: f64,
    pub total: f64,
}

/// The booking-in-progress: an insertion-ordered list of line items owned by
/// one session. Totals are derived on demand and never stored, so they
/// cannot drift from the items.
#[derive(Debug, Clone, PartialEq)]
pub struct CartState {
    items: Vec<LineItem>,
    vat_rate: f64,
}

impl CartState {
    pub fn new() -> Self {
        Self::with_vat_rate(DEFAULT_VAT_RATE)
    }

    pub fn with_vat_rate(vat_rate: f64) -> Self {
        Self { items: Vec::new(), vat_rate }
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn vat_rate(&self) -> f64 {
        self.vat_rate
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn item(&self, item_id: &str) -> Option<&LineItem> {
        self.items.iter().find(|item| item.item_id == item_id)
    }

    /// Total guest count across all line items, shown on the cart badge.
    pub fn guest_count(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }

    /// Add a selection to the cart. An exact match (per the equality rule)
    /// silently absorbs the selection's quantity; anything else becomes a
    /// new line item appended in insertion order.
    pub fn add_or_merge(&mut self, selection: ServiceSelection) -> Result<&LineItem, CartError> {
        selection.validate()?;

        if let Some(index) = self.items.iter().position(|item| selection.matches(item)) {
            // Saturating keeps the count positive even on absurd inputs.
            self.items[index].quantity =
                self.items[index].quantity.saturating_add(selection.quantity);
            return Ok(&self.items[index]);
        }

        self.items.push(LineItem {
            item_id: LineItem::generate_id(),
            service_id: selection.service_id,
            service_name: selection.service_name,
            unit_price: selection.unit_price,
            date: selection.date,
            time: selection.time,
            quantity: selection.quantity,
        });
        Ok(self.items.last().expect("item was just pushed"))
    }

    /// Replace an item's quantity. Zero removes the item: a line item is
    /// never kept with a non-positive guest count.
    pub fn set_quantity(&mut self, item_id: &str, quantity: u32) -> Result<(), CartError> {
        let index = self.position(item_id)?;
        if quantity == 0 {
            self.items.remove(index);
        } else {
            self.items[index].quantity = quantity;
        }
        Ok(())
    }

    pub fn remove(&mut self, item_id: &str) -> Result<LineItem, CartError> {
        let index = self.position(item_id)?;
        Ok(self.items.remove(index))
    }

    /// Overwrite an item's schedule and quantity without re-running merge
    /// logic. The caller is responsible for having resolved any collision
    /// this edit could create (see the resolver's sibling re-check).
    pub fn edit(
        &mut self,
        item_id: &str,
        date: Option<NaiveDate>,
        time: Option<TimeSlot>,
        quantity: u32,
    ) -> Result<(), CartError> {
        if quantity == 0 {
            return Err(CartError::QuantityNotPositive);
        }
        let index = self.position(item_id)?;
        let item = &mut self.items[index];
        item.date = date;
        item.time = time;
        item.quantity = quantity;
        Ok(())
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Recompute aggregate totals from the current items. Pure: no side
    /// effects, identical results until the next mutation.
    pub fn totals(&self) -> Totals {
        let subtotal: f64 = self.items.iter().map(LineItem::line_subtotal).sum();
        let vat = subtotal * self.vat_rate;
        Totals { subtotal, vat, total: subtotal + vat }
    }

    /// Adopt a line item that already has an identity, i.e. a server cart
    /// row being mirrored locally.
    pub(crate) fn adopt(&mut self, item: LineItem) {
        self.items.push(item);
    }

    fn position(&self, item_id: &str) -> Result<usize, CartError> {
        self.items
            .iter()
            .position(|item| item.item_id == item_id)
            .ok_or_else(|| CartError::ItemNotFound(item_id.to_string()))
    }
}

impl Default for CartState {
    fn default() -> Self {
        Self::new()
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::selection;
    use super::*;

    #[test]
    fn test_add_to_empty_cart_creates_one_item() {
        // Scenario A: empty cart, one scheduled selection
        let mut cart = CartState::new();
        let item = cart
            .add_or_merge(selection(7, Some("2024-06-01"), Some(TimeSlot::TenAm), 2))
            .unwrap()
            .clone();

        assert_eq!(cart.items().len(), 1);
        assert_eq!(item.quantity, 2);
        assert_eq!(item.date, Some("2024-06-01".parse().unwrap()));
        assert_eq!(item.time, Some(TimeSlot::TenAm));
    }

    #[test]
    fn test_exact_match_merges_quantity_without_new_item() {
        // Scenario B: identical selection again increments in place
        let mut cart = CartState::new();
        cart.add_or_merge(selection(7, Some("2024-06-01"), Some(TimeSlot::TenAm), 2))
            .unwrap();
        let first_id = cart.items()[0].item_id.clone();

        let merged = cart
            .add_or_merge(selection(7, Some("2024-06-01"), Some(TimeSlot::TenAm), 1))
            .unwrap();

        assert_eq!(merged.item_id, first_id);
        assert_eq!(merged.quantity, 3);
        assert_eq!(cart.items().len(), 1);
    }

    #[test]
    fn test_unset_schedule_only_matches_unset() {
        let mut cart = CartState::new();
        cart.add_or_merge(selection(7, None, None, 1)).unwrap();

        // Same service with a concrete schedule is a different booking
        cart.add_or_merge(selection(7, Some("2024-06-01"), Some(TimeSlot::TenAm), 1))
            .unwrap();
        assert_eq!(cart.items().len(), 2);

        // A second unscheduled add merges into the first item
        cart.add_or_merge(selection(7, None, None, 2)).unwrap();
        assert_eq!(cart.items().len(), 2);
        assert_eq!(cart.items()[0].quantity, 3);
    }

    #[test]
    fn test_merge_saturates_instead_of_overflowing() {
        let mut cart = CartState::new();
        cart.add_or_merge(selection(7, None, None, u32::MAX - 1)).unwrap();

        let merged = cart.add_or_merge(selection(7, None, None, 5)).unwrap();
        assert_eq!(merged.quantity, u32::MAX);
        assert_eq!(cart.items().len(), 1);
    }

    #[test]
    fn test_zero_quantity_selection_rejected() {
        let mut cart = CartState::new();
        let err = cart
            .add_or_merge(selection(7, None, None, 0))
            .unwrap_err();
        assert_eq!(err, CartError::QuantityNotPositive);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_validate_scheduled_requires_date_and_time() {
        assert_eq!(
            selection(7, None, Some(TimeSlot::TenAm), 1).validate_scheduled(),
            Err(CartError::ScheduleRequired)
        );
        assert_eq!(
            selection(7, Some("2024-06-01"), None, 1).validate_scheduled(),
            Err(CartError::ScheduleRequired)
        );
        assert!(selection(7, Some("2024-06-01"), Some(TimeSlot::TenAm), 1)
            .validate_scheduled()
            .is_ok());
    }

    #[test]
    fn test_set_quantity_zero_removes_item() {
        // Scenario E
        let mut cart = CartState::new();
        cart.add_or_merge(selection(7, Some("2024-06-01"), Some(TimeSlot::TenAm), 2))
            .unwrap();
        let id = cart.items()[0].item_id.clone();

        cart.set_quantity(&id, 0).unwrap();
        assert!(cart.is_empty());
        assert_eq!(cart.totals().subtotal, 0.0);
    }

    #[test]
    fn test_operations_on_unknown_item_report_not_found() {
        let mut cart = CartState::new();
        cart.add_or_merge(selection(7, None, None, 1)).unwrap();
        let before = cart.clone();

        assert_eq!(
            cart.set_quantity("item::missing", 3),
            Err(CartError::ItemNotFound("item::missing".to_string()))
        );
        assert!(cart.remove("item::missing").is_err());
        assert!(cart
            .edit("item::missing", None, None, 1)
            .is_err());
        assert_eq!(cart, before);
    }

    #[test]
    fn test_edit_overwrites_without_merging() {
        let mut cart = CartState::new();
        cart.add_or_merge(selection(7, Some("2024-06-01"), Some(TimeSlot::TenAm), 2))
            .unwrap();
        let id = cart.items()[0].item_id.clone();

        cart.edit(&id, Some("2024-06-02".parse().unwrap()), Some(TimeSlot::FourPm), 5)
            .unwrap();

        let item = cart.item(&id).unwrap();
        assert_eq!(item.date, Some("2024-06-02".parse().unwrap()));
        assert_eq!(item.time, Some(TimeSlot::FourPm));
        assert_eq!(item.quantity, 5);
        assert_eq!(cart.items().len(), 1);
    }

    #[test]
    fn test_edit_to_zero_quantity_rejected() {
        let mut cart = CartState::new();
        cart.add_or_merge(selection(7, None, None, 2)).unwrap();
        let id = cart.items()[0].item_id.clone();

        assert_eq!(cart.edit(&id, None, None, 0), Err(CartError::QuantityNotPositive));
        assert_eq!(cart.item(&id).unwrap().quantity, 2);
    }

    #[test]
    fn test_totals_formula_and_purity() {
        let mut cart = CartState::new();
        let mut pricey = selection(1, None, None, 2);
        pricey.unit_price = 150.0;
        cart.add_or_merge(pricey).unwrap();
        let mut second = selection(2, None, None, 1);
        second.unit_price = 80.0;
        cart.add_or_merge(second).unwrap();

        let totals = cart.totals();
        assert_eq!(totals.subtotal, 380.0);
        assert_eq!(totals.vat, 19.0);
        assert_eq!(totals.total, 399.0);
        // Idempotent until the next mutation
        assert_eq!(cart.totals(), totals);
    }

    #[test]
    fn test_insertion_order_is_stable() {
        let mut cart = CartState::new();
        for service_id in [3, 1, 2] {
            cart.add_or_merge(selection(service_id, None, None, 1)).unwrap();
        }
        let order: Vec<u32> = cart.items().iter().map(|i| i.service_id).collect();
        assert_eq!(order, vec![3, 1, 2]);
    }

    #[test]
    fn test_guest_count_sums_quantities() {
        let mut cart = CartState::new();
        cart.add_or_merge(selection(1, None, None, 2)).unwrap();
        cart.add_or_merge(selection(2, None, None, 3)).unwrap();
        assert_eq!(cart.guest_count(), 5);
    }
}
