//! Domain core shared between the booking front-end and its tests.
//!
//! Everything with real decision logic lives here, framework-free: the cart
//! line-item model and its equality rule, the conflict detector, the
//! conflict resolver, the time-slot enumeration, and the wire types for the
//! backend cart/checkout API. The Yew layer renders and forwards choices;
//! it never re-implements any of this.

pub mod cart;
pub mod conflict;
pub mod resolver;
pub mod timeslot;
pub mod wire;

pub use cart::{CartError, CartState, LineItem, ServiceSelection, Totals, DEFAULT_VAT_RATE};
pub use conflict::{classify, Classification, ConflictCase};
pub use resolver::{
    apply_choice, resolve_add_to_existing, resolve_create_new, resolve_edit_existing,
    ConflictChoice, ResolutionOutcome,
};
pub use timeslot::TimeSlot;
pub use wire::{
    parse_money, AddToCartRequest, CartItemSnapshot, CartPayload, CartSnapshot, CheckoutRequest,
    CheckoutResponse, OrderDetail, ServiceSummary, UpdateCartItemRequest,
};
