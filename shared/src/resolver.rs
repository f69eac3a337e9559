use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::cart::{CartError, CartState, ServiceSelection};
use crate::conflict::ConflictCase;
use crate::timeslot::TimeSlot;

/// The guest's decision for a presented conflict, as emitted by the modal.
///
/// A typed command rather than a set of callbacks: the presentation layer
/// collects the choice, the resolver applies it, and the outcome below tells
/// the UI what actually happened.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ConflictChoice {
    /// Keep both bookings: add the new selection as its own line item.
    CreateNew,
    /// Fold the new guests into an existing booking; its schedule stays
    /// authoritative and the new selection's date/time are discarded.
    AddToExisting { item_id: String },
    /// Reschedule an existing booking to the given date/time/quantity.
    EditExisting {
        item_id: String,
        date: NaiveDate,
        time: TimeSlot,
        quantity: u32,
    },
}

/// What a resolution did to the cart.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolutionOutcome {
    Created { item_id: String },
    Merged { item_id: String, quantity: u32 },
    Edited { item_id: String },
    /// The edit would have produced a second identical booking; nothing was
    /// applied and this fresh case needs its own resolution.
    Conflict(ConflictCase),
}

/// Add the conflicting selection as a separate line item. The selection is
/// guaranteed by construction not to exact-match anything (otherwise
/// `classify` would have returned `ExactMatch`), so this always creates.
pub fn resolve_create_new(
    cart: &mut CartState,
    case: ConflictCase,
) -> Result<ResolutionOutcome, CartError> {
    let before = cart.items().len();
    let item = cart.add_or_merge(case.selection().clone())?;
    let item_id = item.item_id.clone();
    debug_assert_eq!(cart.items().len(), before + 1);
    Ok(ResolutionOutcome::Created { item_id })
}

/// Increase an existing candidate booking's guest count by the selection's
/// requested quantity. Item count never changes.
pub fn resolve_add_to_existing(
    cart: &mut CartState,
    case: &ConflictCase,
    chosen_item_id: &str,
    additional_quantity: u32,
) -> Result<ResolutionOutcome, CartError> {
    if additional_quantity == 0 {
        return Err(CartError::QuantityNotPositive);
    }
    if !case.is_candidate(chosen_item_id) {
        return Err(CartError::NotACandidate(chosen_item_id.to_string()));
    }

    let current = cart
        .item(chosen_item_id)
        .ok_or_else(|| CartError::ItemNotFound(chosen_item_id.to_string()))?
        .quantity;
    let quantity = current.saturating_add(additional_quantity);
    cart.set_quantity(chosen_item_id, quantity)?;
    Ok(ResolutionOutcome::Merged { item_id: chosen_item_id.to_string(), quantity })
}

/// Reschedule an existing candidate booking.
///
/// The new schedule is re-checked against the target's siblings: if it lands
/// exactly on another booking of the same service, nothing is applied and a
/// fresh conflict is returned instead — the cart must never hold two
/// identical line items, and merging without asking would silently collapse
/// bookings the guest chose to keep distinct.
pub fn resolve_edit_existing(
    cart: &mut CartState,
    case: &ConflictCase,
    chosen_item_id: &str,
    date: NaiveDate,
    time: TimeSlot,
    quantity: u32,
) -> Result<ResolutionOutcome, CartError> {
    if quantity == 0 {
        return Err(CartError::QuantityNotPositive);
    }
    if !case.is_candidate(chosen_item_id) {
        return Err(CartError::NotACandidate(chosen_item_id.to_string()));
    }
    let target = cart
        .item(chosen_item_id)
        .ok_or_else(|| CartError::ItemNotFound(chosen_item_id.to_string()))?;

    let attempted = ServiceSelection {
        service_id: target.service_id,
        service_name: target.service_name.clone(),
        unit_price: target.unit_price,
        date: Some(date),
        time: Some(time),
        quantity,
    };

    let collides = cart
        .items()
        .iter()
        .any(|item| item.item_id != chosen_item_id && attempted.matches(item));
    if collides {
        let siblings = cart
            .items()
            .iter()
            .filter(|item| {
                item.item_id != chosen_item_id && item.service_id == attempted.service_id
            })
            .cloned()
            .collect();
        return Ok(ResolutionOutcome::Conflict(ConflictCase::new(attempted, siblings)));
    }

    cart.edit(chosen_item_id, Some(date), Some(time), quantity)?;
    Ok(ResolutionOutcome::Edited { item_id: chosen_item_id.to_string() })
}

/// Apply a guest's choice to a presented case.
///
/// The additional quantity for `AddToExisting` is the case selection's own
/// requested quantity; an empty target id is refused before anything runs.
pub fn apply_choice(
    cart: &mut CartState,
    case: &ConflictCase,
    choice: &ConflictChoice,
) -> Result<ResolutionOutcome, CartError> {
    match choice {
        ConflictChoice::CreateNew => resolve_create_new(cart, case.clone()),
        ConflictChoice::AddToExisting { item_id } => {
            if item_id.is_empty() {
                return Err(CartError::TargetRequired);
            }
            resolve_add_to_existing(cart, case, item_id, case.selection().quantity)
        }
        ConflictChoice::EditExisting { item_id, date, time, quantity } => {
            if item_id.is_empty() {
                return Err(CartError::TargetRequired);
            }
            resolve_edit_existing(cart, case, item_id, *date, *time, *quantity)
        }
    }
}
