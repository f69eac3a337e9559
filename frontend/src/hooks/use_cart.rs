use shared::{
    apply_choice, classify, AddToCartRequest, CartError, CartSnapshot, CartState, CheckoutRequest,
    CheckoutResponse, Classification, ConflictCase, ConflictChoice, LineItem, OrderDetail,
    ResolutionOutcome, ServiceSelection, Totals, UpdateCartItemRequest,
};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::services::api::ApiClient;

/// Snapshot of the cart session handed to the view on every render.
#[derive(Clone, PartialEq)]
pub struct CartSessionState {
    pub items: Vec<LineItem>,
    /// Server totals after a round trip; locally recomputed only before the
    /// first snapshot arrives.
    pub totals: Totals,
    pub guest_count: u32,
    pub loading: bool,
    /// A mutation is in flight; duplicate submissions are suppressed.
    pub busy: bool,
    pub pending_conflict: Option<ConflictCase>,
    pub error: Option<String>,
    pub notice: Option<String>,
    pub last_order: Option<OrderDetail>,
}

pub struct UseCartResult {
    pub state: CartSessionState,
    pub actions: UseCartActions,
}

#[derive(Clone)]
pub struct UseCartActions {
    pub refresh: Callback<()>,
    pub add_selection: Callback<ServiceSelection>,
    pub resolve_conflict: Callback<ConflictChoice>,
    pub dismiss_conflict: Callback<()>,
    pub set_quantity: Callback<(String, u32)>,
    pub remove_item: Callback<String>,
    pub clear_cart: Callback<()>,
    pub checkout: Callback<CheckoutRequest>,
}

/// What the add flow should do for a selection against the current cart.
#[derive(Debug, Clone, PartialEq)]
enum AddPlan {
    /// Same service, different schedule: park the case for the modal.
    Present(ConflictCase),
    /// Exact schedule match: update the existing item to the merged count.
    Merge { item_id: String, quantity: u32 },
    /// Nothing related in the cart: plain add.
    Create,
}

/// Classify a selection against the cart and turn the result into the
/// backend command the session should issue. Pure; the caller decides when
/// (and whether) to go to the network.
fn plan_add(cart: &CartState, selection: &ServiceSelection) -> Result<AddPlan, CartError> {
    selection.validate()?;
    match classify(selection, cart.items()) {
        Classification::Conflict(case) => Ok(AddPlan::Present(case)),
        Classification::ExactMatch { item_id } => {
            // Run the merge on a scratch copy to get the combined count the
            // server should store.
            let mut working = cart.clone();
            let quantity = working.add_or_merge(selection.clone())?.quantity;
            Ok(AddPlan::Merge { item_id, quantity })
        }
        Classification::NoConflict => Ok(AddPlan::Create),
    }
}

/// The state handles every cart flow touches, bundled so the callbacks stay
/// readable.
#[derive(Clone)]
struct SessionHandles {
    cart: UseStateHandle<CartState>,
    server_totals: UseStateHandle<Option<Totals>>,
    busy: UseStateHandle<bool>,
    pending_conflict: UseStateHandle<Option<ConflictCase>>,
    error: UseStateHandle<Option<String>>,
    notice: UseStateHandle<Option<String>>,
    last_order: UseStateHandle<Option<OrderDetail>>,
}

impl SessionHandles {
    /// Adopt a server snapshot wholesale: items, ids and totals are the
    /// server's word, never a local recomputation.
    fn adopt_snapshot(&self, snapshot: &CartSnapshot) {
        self.cart.set(CartState::from_snapshot(snapshot));
        self.server_totals.set(Some(snapshot.totals()));
    }

    fn succeed(&self, message: &str) {
        self.error.set(None);
        self.notice.set(Some(message.to_string()));
    }

    /// A mutation failed on the wire: surface the error, then re-fetch the
    /// active cart so no half-applied local edit survives.
    async fn fail_and_reconcile(&self, api: &ApiClient, message: String) {
        gloo::console::error!("Cart request failed:", message.clone());
        self.error.set(Some(message));
        self.notice.set(None);
        if let Ok(snapshot) = api.get_active_cart().await {
            self.adopt_snapshot(&snapshot);
        }
    }
}

// The action callbacks are rebuilt every render so each closure captures the
// handles of the render it shipped with. A memoized closure would keep
// dereferencing the mount-time state snapshot and classify every add against
// an empty cart.
#[hook]
pub fn use_cart(api_client: &ApiClient) -> UseCartResult {
    let cart = use_state(CartState::new);
    let server_totals = use_state(|| Option::<Totals>::None);
    let loading = use_state(|| true);
    let busy = use_state(|| false);
    let pending_conflict = use_state(|| Option::<ConflictCase>::None);
    let error = use_state(|| Option::<String>::None);
    let notice = use_state(|| Option::<String>::None);
    let last_order = use_state(|| Option::<OrderDetail>::None);

    let handles = SessionHandles {
        cart: cart.clone(),
        server_totals: server_totals.clone(),
        busy: busy.clone(),
        pending_conflict: pending_conflict.clone(),
        error: error.clone(),
        notice: notice.clone(),
        last_order: last_order.clone(),
    };

    // Load the active cart once on mount and on demand.
    let refresh = {
        let api_client = api_client.clone();
        let handles = handles.clone();
        let loading = loading.clone();

        Callback::from(move |_: ()| {
            let api_client = api_client.clone();
            let handles = handles.clone();
            let loading = loading.clone();

            spawn_local(async move {
                loading.set(true);
                match api_client.get_active_cart().await {
                    Ok(snapshot) => handles.adopt_snapshot(&snapshot),
                    Err(e) => {
                        gloo::console::error!("Failed to load cart:", e.clone());
                        handles.error.set(Some(e));
                    }
                }
                loading.set(false);
            });
        })
    };

    // The booking flow: classify the selection, then either merge silently,
    // append, or hand the decision to the conflict modal. Only the server's
    // confirmation mutates visible state.
    let add_selection = {
        let api_client = api_client.clone();
        let handles = handles.clone();

        Callback::from(move |selection: ServiceSelection| {
            if *handles.busy {
                gloo::console::warn!("Ignoring add while a cart request is in flight");
                return;
            }

            match plan_add(&handles.cart, &selection) {
                Err(e) => handles.error.set(Some(e.to_string())),
                Ok(AddPlan::Present(case)) => {
                    // No network yet; the guest decides first.
                    handles.pending_conflict.set(Some(case));
                }
                Ok(AddPlan::Merge { item_id, quantity }) => {
                    let api_client = api_client.clone();
                    let handles = handles.clone();
                    handles.busy.set(true);
                    spawn_local(async move {
                        let request = UpdateCartItemRequest {
                            quantity,
                            booking_date: None,
                            booking_time: None,
                        };
                        match api_client.update_cart_item(&item_id, &request).await {
                            Ok(snapshot) => {
                                handles.adopt_snapshot(&snapshot);
                                handles.succeed("Service added to cart!");
                            }
                            Err(e) => handles.fail_and_reconcile(&api_client, e).await,
                        }
                        handles.busy.set(false);
                    });
                }
                Ok(AddPlan::Create) => {
                    let request = AddToCartRequest {
                        service_id: selection.service_id,
                        quantity: selection.quantity,
                        booking_date: selection.date,
                        booking_time: selection.time,
                    };

                    let api_client = api_client.clone();
                    let handles = handles.clone();
                    handles.busy.set(true);
                    spawn_local(async move {
                        match api_client.add_to_cart(&request).await {
                            Ok(snapshot) => {
                                handles.adopt_snapshot(&snapshot);
                                handles.succeed("Service added to cart!");
                            }
                            Err(e) => handles.fail_and_reconcile(&api_client, e).await,
                        }
                        handles.busy.set(false);
                    });
                }
            }
        })
    };

    // Apply the guest's choice for the presented conflict. The resolver runs
    // on a scratch copy: it validates the choice and computes the command,
    // while the cart on screen only changes with the server's snapshot.
    let resolve_conflict = {
        let api_client = api_client.clone();
        let handles = handles.clone();

        Callback::from(move |choice: ConflictChoice| {
            if *handles.busy {
                return;
            }
            let Some(case) = (*handles.pending_conflict).clone() else {
                return;
            };

            let mut working = (*handles.cart).clone();
            let outcome = match apply_choice(&mut working, &case, &choice) {
                Ok(outcome) => outcome,
                Err(e) => {
                    // Precondition failure: the case stays presented.
                    handles.error.set(Some(e.to_string()));
                    return;
                }
            };

            match outcome {
                ResolutionOutcome::Conflict(fresh) => {
                    // The edit landed on a sibling booking; ask again.
                    handles.pending_conflict.set(Some(fresh));
                }
                ResolutionOutcome::Created { .. } => {
                    handles.pending_conflict.set(None);
                    let selection = case.selection().clone();
                    let request = AddToCartRequest {
                        service_id: selection.service_id,
                        quantity: selection.quantity,
                        booking_date: selection.date,
                        booking_time: selection.time,
                    };

                    let api_client = api_client.clone();
                    let handles = handles.clone();
                    handles.busy.set(true);
                    spawn_local(async move {
                        match api_client.add_to_cart(&request).await {
                            Ok(snapshot) => {
                                handles.adopt_snapshot(&snapshot);
                                handles.succeed("Added as a separate booking.");
                            }
                            Err(e) => handles.fail_and_reconcile(&api_client, e).await,
                        }
                        handles.busy.set(false);
                    });
                }
                ResolutionOutcome::Merged { item_id, quantity } => {
                    handles.pending_conflict.set(None);
                    let request = UpdateCartItemRequest {
                        quantity,
                        booking_date: None,
                        booking_time: None,
                    };

                    let api_client = api_client.clone();
                    let handles = handles.clone();
                    handles.busy.set(true);
                    spawn_local(async move {
                        match api_client.update_cart_item(&item_id, &request).await {
                            Ok(snapshot) => {
                                handles.adopt_snapshot(&snapshot);
                                handles.succeed("Guests added to your existing booking.");
                            }
                            Err(e) => handles.fail_and_reconcile(&api_client, e).await,
                        }
                        handles.busy.set(false);
                    });
                }
                ResolutionOutcome::Edited { item_id } => {
                    handles.pending_conflict.set(None);
                    let ConflictChoice::EditExisting { date, time, quantity, .. } = choice else {
                        return;
                    };
                    let request = UpdateCartItemRequest {
                        quantity,
                        booking_date: Some(date),
                        booking_time: Some(time),
                    };

                    let api_client = api_client.clone();
                    let handles = handles.clone();
                    handles.busy.set(true);
                    spawn_local(async move {
                        match api_client.update_cart_item(&item_id, &request).await {
                            Ok(snapshot) => {
                                handles.adopt_snapshot(&snapshot);
                                handles.succeed("Booking updated.");
                            }
                            Err(e) => handles.fail_and_reconcile(&api_client, e).await,
                        }
                        handles.busy.set(false);
                    });
                }
            }
        })
    };

    // Cancelled: drop the case, zero cart mutation.
    let dismiss_conflict = {
        let pending_conflict = pending_conflict.clone();
        Callback::from(move |_: ()| {
            pending_conflict.set(None);
        })
    };

    let set_quantity = {
        let api_client = api_client.clone();
        let handles = handles.clone();

        Callback::from(move |(item_id, quantity): (String, u32)| {
            if *handles.busy {
                return;
            }
            let mut working = (*handles.cart).clone();
            if let Err(e) = working.set_quantity(&item_id, quantity) {
                handles.error.set(Some(e.to_string()));
                return;
            }

            let api_client = api_client.clone();
            let handles = handles.clone();
            handles.busy.set(true);
            spawn_local(async move {
                let result = if quantity == 0 {
                    match api_client.remove_cart_item(&item_id).await {
                        Ok(Some(snapshot)) => Ok(snapshot),
                        Ok(None) => api_client.get_active_cart().await,
                        Err(e) => Err(e),
                    }
                } else {
                    let request = UpdateCartItemRequest {
                        quantity,
                        booking_date: None,
                        booking_time: None,
                    };
                    api_client.update_cart_item(&item_id, &request).await
                };

                match result {
                    Ok(snapshot) => {
                        handles.adopt_snapshot(&snapshot);
                        handles.succeed("Cart updated.");
                    }
                    Err(e) => handles.fail_and_reconcile(&api_client, e).await,
                }
                handles.busy.set(false);
            });
        })
    };

    let remove_item = {
        let api_client = api_client.clone();
        let handles = handles.clone();

        Callback::from(move |item_id: String| {
            if *handles.busy {
                return;
            }
            let mut working = (*handles.cart).clone();
            if let Err(e) = working.remove(&item_id) {
                handles.error.set(Some(e.to_string()));
                return;
            }

            let api_client = api_client.clone();
            let handles = handles.clone();
            handles.busy.set(true);
            spawn_local(async move {
                let result = match api_client.remove_cart_item(&item_id).await {
                    Ok(Some(snapshot)) => Ok(snapshot),
                    Ok(None) => api_client.get_active_cart().await,
                    Err(e) => Err(e),
                };
                match result {
                    Ok(snapshot) => {
                        handles.adopt_snapshot(&snapshot);
                        handles.succeed("Item removed from your cart.");
                    }
                    Err(e) => handles.fail_and_reconcile(&api_client, e).await,
                }
                handles.busy.set(false);
            });
        })
    };

    let clear_cart = {
        let api_client = api_client.clone();
        let handles = handles.clone();

        Callback::from(move |_: ()| {
            if *handles.busy {
                return;
            }
            let api_client = api_client.clone();
            let handles = handles.clone();
            handles.busy.set(true);
            spawn_local(async move {
                match api_client.clear_cart().await {
                    Ok(()) => {
                        handles.cart.set(CartState::new());
                        handles.server_totals.set(None);
                        handles.succeed("All items removed from your cart.");
                    }
                    Err(e) => handles.fail_and_reconcile(&api_client, e).await,
                }
                handles.busy.set(false);
            });
        })
    };

    // Checkout: an order response closes the session; a redirect response
    // navigates to the hosted payment page, after which no further cart
    // mutation is valid until the guest returns.
    let checkout = {
        let api_client = api_client.clone();
        let handles = handles.clone();

        Callback::from(move |request: CheckoutRequest| {
            if *handles.busy {
                return;
            }
            if handles.cart.is_empty() {
                handles.error.set(Some("Your cart is empty.".to_string()));
                return;
            }

            let api_client = api_client.clone();
            let handles = handles.clone();
            handles.busy.set(true);
            spawn_local(async move {
                match api_client.checkout(&request).await {
                    Ok(CheckoutResponse::Redirect { stripe_checkout_url }) => {
                        // Keep busy set: the page is about to unload.
                        if let Some(window) = web_sys::window() {
                            let _ = window.location().set_href(&stripe_checkout_url);
                        }
                    }
                    Ok(CheckoutResponse::Order(order)) => {
                        handles.succeed(&format!("Booking {} created.", order.order_number));
                        handles.last_order.set(Some(order));
                        handles.cart.set(CartState::new());
                        handles.server_totals.set(None);
                        handles.busy.set(false);
                    }
                    Err(e) => {
                        handles.fail_and_reconcile(&api_client, e).await;
                        handles.busy.set(false);
                    }
                }
            });
        })
    };

    let state = CartSessionState {
        items: cart.items().to_vec(),
        totals: (*server_totals).unwrap_or_else(|| cart.totals()),
        guest_count: cart.guest_count(),
        loading: *loading,
        busy: *busy,
        pending_conflict: (*pending_conflict).clone(),
        error: (*error).clone(),
        notice: (*notice).clone(),
        last_order: (*last_order).clone(),
    };

    let actions = UseCartActions {
        refresh,
        add_selection,
        resolve_conflict,
        dismiss_conflict,
        set_quantity,
        remove_item,
        clear_cart,
        checkout,
    };

    UseCartResult { state, actions }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{CartItemSnapshot, TimeSlot};

    fn snapshot_with_item() -> CartSnapshot {
        CartSnapshot {
            id: 1,
            subtotal: "300.00".to_string(),
            vat: "15.00".to_string(),
            total: "315.00".to_string(),
            items: vec![CartItemSnapshot {
                id: 11,
                service_id: 7,
                service_name: "Desert Safari".to_string(),
                service_price: "150.00".to_string(),
                quantity: 2,
                booking_date: Some("2024-06-01".parse().unwrap()),
                booking_time: Some(TimeSlot::TenAm),
                subtotal: "300.00".to_string(),
            }],
        }
    }

    fn selection(date: &str, time: TimeSlot, quantity: u32) -> ServiceSelection {
        ServiceSelection {
            service_id: 7,
            service_name: "Desert Safari".to_string(),
            unit_price: 150.0,
            date: Some(date.parse().unwrap()),
            time: Some(time),
            quantity,
        }
    }

    #[test]
    fn test_identical_add_against_loaded_cart_plans_a_merge() {
        // The cart mirrored from the server snapshot already holds this
        // exact booking, so adding it again must update the existing item
        // rather than issue a second add.
        let cart = CartState::from_snapshot(&snapshot_with_item());

        let plan = plan_add(&cart, &selection("2024-06-01", TimeSlot::TenAm, 1)).unwrap();
        assert_eq!(
            plan,
            AddPlan::Merge { item_id: "11".to_string(), quantity: 3 }
        );
    }

    #[test]
    fn test_differing_schedule_against_loaded_cart_plans_a_conflict() {
        let cart = CartState::from_snapshot(&snapshot_with_item());

        match plan_add(&cart, &selection("2024-06-02", TimeSlot::TenAm, 1)).unwrap() {
            AddPlan::Present(case) => {
                assert_eq!(case.candidates().len(), 1);
                assert!(case.is_candidate("11"));
            }
            other => panic!("expected a conflict to present, got {:?}", other),
        }
    }

    #[test]
    fn test_unrelated_service_plans_a_plain_create() {
        let cart = CartState::from_snapshot(&snapshot_with_item());
        let mut unrelated = selection("2024-06-01", TimeSlot::TenAm, 1);
        unrelated.service_id = 9;

        assert_eq!(plan_add(&cart, &unrelated).unwrap(), AddPlan::Create);
    }

    #[test]
    fn test_plan_add_on_empty_cart_always_creates() {
        let cart = CartState::new();
        let plan = plan_add(&cart, &selection("2024-06-01", TimeSlot::TenAm, 2)).unwrap();
        assert_eq!(plan, AddPlan::Create);
    }

    #[test]
    fn test_plan_add_rejects_zero_quantity() {
        let cart = CartState::from_snapshot(&snapshot_with_item());
        assert!(plan_add(&cart, &selection("2024-06-01", TimeSlot::TenAm, 0)).is_err());
    }
}
