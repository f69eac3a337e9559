use shared::{LineItem, Totals};
use web_sys::MouseEvent;
use yew::prelude::*;

use crate::services::date_utils::schedule_label;

#[derive(Properties, PartialEq)]
pub struct CartViewProps {
    pub items: Vec<LineItem>,
    pub totals: Totals,
    pub busy: bool,
    pub on_set_quantity: Callback<(String, u32)>,
    pub on_remove: Callback<String>,
    pub on_clear: Callback<()>,
}

/// The cart: line items in insertion order, a quantity stepper per item,
/// and the totals block. Totals come from the session (the server's figures
/// after any round trip) and are never computed here.
#[function_component(CartView)]
pub fn cart_view(props: &CartViewProps) -> Html {
    if props.items.is_empty() {
        return html! {
            <div class="cart-empty">{"Your cart is empty."}</div>
        };
    }

    let on_clear_click = {
        let on_clear = props.on_clear.clone();
        Callback::from(move |_: MouseEvent| on_clear.emit(()))
    };

    html! {
        <div class="cart">
            <div class="cart-items">
                {for props.items.iter().map(|item| {
                    let decrement = {
                        let on_set_quantity = props.on_set_quantity.clone();
                        let item_id = item.item_id.clone();
                        let quantity = item.quantity;
                        Callback::from(move |_: MouseEvent| {
                            // Quantity 0 removes the item outright
                            on_set_quantity.emit((item_id.clone(), quantity - 1));
                        })
                    };
                    let increment = {
                        let on_set_quantity = props.on_set_quantity.clone();
                        let item_id = item.item_id.clone();
                        let quantity = item.quantity;
                        Callback::from(move |_: MouseEvent| {
                            on_set_quantity.emit((item_id.clone(), quantity + 1));
                        })
                    };
                    let remove = {
                        let on_remove = props.on_remove.clone();
                        let item_id = item.item_id.clone();
                        Callback::from(move |_: MouseEvent| on_remove.emit(item_id.clone()))
                    };

                    html! {
                        <div class="cart-item" key={item.item_id.clone()}>
                            <div class="cart-item-details">
                                <span class="cart-item-name">{&item.service_name}</span>
                                <span class="cart-item-schedule">
                                    {schedule_label(item.date, item.time)}
                                </span>
                            </div>
                            <div class="cart-item-controls">
                                <div class="quantity-stepper">
                                    <button type="button" onclick={decrement} disabled={props.busy}>
                                        {"-"}
                                    </button>
                                    <span>{item.quantity}</span>
                                    <button type="button" onclick={increment} disabled={props.busy}>
                                        {"+"}
                                    </button>
                                </div>
                                <span class="cart-item-subtotal">
                                    {format!("AED {:.2}", item.line_subtotal())}
                                </span>
                                <button
                                    type="button"
                                    class="btn btn-link"
                                    onclick={remove}
                                    disabled={props.busy}
                                >
                                    {"Remove"}
                                </button>
                            </div>
                        </div>
                    }
                })}
            </div>

            <div class="cart-totals">
                <div class="totals-row">
                    <span>{"Subtotal"}</span>
                    <span>{format!("AED {:.2}", props.totals.subtotal)}</span>
                </div>
                <div class="totals-row">
                    <span>{"VAT"}</span>
                    <span>{format!("AED {:.2}", props.totals.vat)}</span>
                </div>
                <div class="totals-row total">
                    <span>{"Total"}</span>
                    <span>{format!("AED {:.2}", props.totals.total)}</span>
                </div>
            </div>

            <button
                type="button"
                class="btn btn-secondary"
                onclick={on_clear_click}
                disabled={props.busy}
            >
                {"Clear Cart"}
            </button>
        </div>
    }
}
