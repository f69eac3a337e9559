pub mod booking_form;
pub mod cart_view;
pub mod checkout_form;
pub mod conflict_modal;
