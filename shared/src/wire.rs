use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::cart::{CartState, LineItem, Totals};
use crate::timeslot::TimeSlot;

/// One line of the server's cart, money fields as decimal strings the way
/// the backend serializes them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItemSnapshot {
    pub id: i64,
    pub service_id: u32,
    pub service_name: String,
    pub service_price: String,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub booking_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub booking_time: Option<TimeSlot>,
    pub subtotal: String,
}

impl CartItemSnapshot {
    pub fn to_line_item(&self) -> LineItem {
        LineItem {
            item_id: self.id.to_string(),
            service_id: self.service_id,
            service_name: self.service_name.clone(),
            unit_price: parse_money(&self.service_price),
            date: self.booking_date,
            time: self.booking_time,
            quantity: self.quantity,
        }
    }
}

/// The backend's authoritative view of the active cart. After any round
/// trip the client adopts these totals as-is instead of recomputing them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartSnapshot {
    pub id: i64,
    pub subtotal: String,
    pub vat: String,
    pub total: String,
    #[serde(default)]
    pub items: Vec<CartItemSnapshot>,
}

impl CartSnapshot {
    /// Server-computed totals, parsed from their decimal-string form.
    pub fn totals(&self) -> Totals {
        Totals {
            subtotal: parse_money(&self.subtotal),
            vat: parse_money(&self.vat),
            total: parse_money(&self.total),
        }
    }
}

impl CartState {
    /// Rebuild the local line-item mirror from a server snapshot, preserving
    /// the server's item order and ids.
    pub fn from_snapshot(snapshot: &CartSnapshot) -> CartState {
        let mut cart = CartState::new();
        for item in &snapshot.items {
            cart.adopt(item.to_line_item());
        }
        cart
    }
}

/// The backend answers cart mutations either with the cart itself or with a
/// `{ message, data }` wrapper; accept both.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum CartPayload {
    Wrapped {
        data: CartSnapshot,
        #[serde(default)]
        message: Option<String>,
    },
    Bare(CartSnapshot),
}

impl CartPayload {
    pub fn into_snapshot(self) -> CartSnapshot {
        match self {
            CartPayload::Wrapped { data, .. } => data,
            CartPayload::Bare(snapshot) => snapshot,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddToCartRequest {
    pub service_id: u32,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub booking_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub booking_time: Option<TimeSlot>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateCartItemRequest {
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub booking_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub booking_time: Option<TimeSlot>,
}

/// Guest contact details submitted at checkout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckoutRequest {
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_requests: Option<String>,
}

/// A completed (or pending-payment) order as returned by checkout and the
/// order endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderDetail {
    pub id: i64,
    pub order_number: String,
    pub subtotal: String,
    pub vat: String,
    pub total: String,
    pub status: String,
    #[serde(default)]
    pub payment_completed: bool,
    #[serde(default)]
    pub items: Vec<CartItemSnapshot>,
}

/// Checkout either hands back the order directly or a hosted-payment
/// redirect; a redirect means the browser must navigate away and no further
/// cart mutation is valid until the guest returns.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum CheckoutResponse {
    Redirect { stripe_checkout_url: String },
    Order(OrderDetail),
}

/// A bookable service as listed by the catalogue endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceSummary {
    pub id: u32,
    pub name: String,
    pub price: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl ServiceSummary {
    pub fn unit_price(&self) -> f64 {
        parse_money(&self.price)
    }
}

/// Decimal-string money fields; unparsable input counts as zero, matching
/// how the pages treated missing server totals.
pub fn parse_money(s: &str) -> f64 {
    s.trim().parse::<f64>().unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot_json() -> &'static str {
        r#"{
            "id": 42,
            "subtotal": "300.00",
            "vat": "15.00",
            "total": "315.00",
            "items": [
                {
                    "id": 11,
                    "service_id": 7,
                    "service_name": "Desert Safari",
                    "service_price": "150.00",
                    "quantity": 2,
                    "booking_date": "2024-06-01",
                    "booking_time": "10:00",
                    "subtotal": "300.00"
                }
            ]
        }"#
    }

    #[test]
    fn test_snapshot_parses_and_mirrors_into_cart_state() {
        let snapshot: CartSnapshot = serde_json::from_str(snapshot_json()).unwrap();
        assert_eq!(snapshot.totals().total, 315.0);

        let cart = CartState::from_snapshot(&snapshot);
        assert_eq!(cart.items().len(), 1);
        let item = &cart.items()[0];
        assert_eq!(item.item_id, "11");
        assert_eq!(item.unit_price, 150.0);
        assert_eq!(item.time, Some(TimeSlot::TenAm));
        assert_eq!(item.line_subtotal(), 300.0);
    }

    #[test]
    fn test_wrapped_and_bare_payloads_both_accepted() {
        let bare: CartPayload = serde_json::from_str(snapshot_json()).unwrap();
        assert_eq!(bare.into_snapshot().id, 42);

        let wrapped_json = format!(r#"{{"message": "Item added", "data": {}}}"#, snapshot_json());
        let wrapped: CartPayload = serde_json::from_str(&wrapped_json).unwrap();
        assert_eq!(wrapped.into_snapshot().id, 42);
    }

    #[test]
    fn test_add_request_omits_unset_schedule() {
        let request = AddToCartRequest {
            service_id: 7,
            quantity: 2,
            booking_date: None,
            booking_time: None,
        };
        let json = serde_json::to_string(&request).unwrap();
        assert_eq!(json, r#"{"service_id":7,"quantity":2}"#);

        let request = AddToCartRequest {
            service_id: 7,
            quantity: 2,
            booking_date: Some("2024-06-01".parse().unwrap()),
            booking_time: Some(TimeSlot::TenAm),
        };
        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains(r#""booking_date":"2024-06-01""#));
        assert!(json.contains(r#""booking_time":"10:00""#));
    }

    #[test]
    fn test_checkout_response_redirect_or_order() {
        let redirect: CheckoutResponse =
            serde_json::from_str(r#"{"stripe_checkout_url": "https://checkout.stripe.com/s/abc"}"#)
                .unwrap();
        assert_eq!(
            redirect,
            CheckoutResponse::Redirect {
                stripe_checkout_url: "https://checkout.stripe.com/s/abc".to_string()
            }
        );

        let order_json = r#"{
            "id": 5,
            "order_number": "AH-2024-0005",
            "subtotal": "300.00",
            "vat": "15.00",
            "total": "315.00",
            "status": "pending",
            "payment_completed": false,
            "items": []
        }"#;
        match serde_json::from_str::<CheckoutResponse>(order_json).unwrap() {
            CheckoutResponse::Order(order) => assert_eq!(order.order_number, "AH-2024-0005"),
            other => panic!("expected order, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_money_tolerates_garbage() {
        assert_eq!(parse_money("120.50"), 120.5);
        assert_eq!(parse_money(" 7 "), 7.0);
        assert_eq!(parse_money(""), 0.0);
        assert_eq!(parse_money("n/a"), 0.0);
    }
}
