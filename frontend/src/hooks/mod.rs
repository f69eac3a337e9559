pub mod use_cart;
