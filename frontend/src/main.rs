mod components;
mod hooks;
mod services;

use shared::ServiceSummary;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use components::booking_form::BookingForm;
use components::cart_view::CartView;
use components::checkout_form::CheckoutForm;
use components::conflict_modal::ConflictModal;
use hooks::use_cart::use_cart;
use services::api::ApiClient;

#[function_component(App)]
fn app() -> Html {
    let api_client = ApiClient::new();
    let cart = use_cart(&api_client);

    let catalogue = use_state(Vec::<ServiceSummary>::new);
    let catalogue_loading = use_state(|| true);

    // Load the catalogue and the active cart once on mount.
    {
        let api_client = api_client.clone();
        let catalogue = catalogue.clone();
        let catalogue_loading = catalogue_loading.clone();
        let refresh = cart.actions.refresh.clone();

        use_effect_with((), move |_| {
            refresh.emit(());
            spawn_local(async move {
                match api_client.list_services().await {
                    Ok(services) => catalogue.set(services),
                    Err(e) => gloo::console::error!("Failed to load services:", e),
                }
                catalogue_loading.set(false);
            });
            || ()
        });
    }

    let state = &cart.state;

    html! {
        <div class="app">
            <header class="app-header">
                <h1>{"Azure Horizon"}</h1>
                <div class="cart-badge">
                    {format!("{} guest{}", state.guest_count,
                        if state.guest_count == 1 { "" } else { "s" })}
                </div>
            </header>

            {if let Some(error) = state.error.as_ref() {
                html! { <div class="banner error">{error}</div> }
            } else { html! {} }}
            {if let Some(notice) = state.notice.as_ref() {
                html! { <div class="banner notice">{notice}</div> }
            } else { html! {} }}

            <main class="app-main">
                <section class="services">
                    <h2>{"Services"}</h2>
                    {if *catalogue_loading {
                        html! { <div class="placeholder">{"Loading services..."}</div> }
                    } else if catalogue.is_empty() {
                        html! { <div class="placeholder">{"No services available right now."}</div> }
                    } else {
                        html! {
                            <div class="service-grid">
                                {for catalogue.iter().map(|service| html! {
                                    <div class="service-card" key={service.id}>
                                        <h3>{&service.name}</h3>
                                        {if let Some(description) = service.description.as_ref() {
                                            html! { <p class="service-description">{description}</p> }
                                        } else { html! {} }}
                                        <span class="service-price">
                                            {format!("AED {:.2} per guest", service.unit_price())}
                                        </span>
                                        <BookingForm
                                            service={service.clone()}
                                            busy={state.busy}
                                            on_book={cart.actions.add_selection.clone()}
                                        />
                                    </div>
                                })}
                            </div>
                        }
                    }}
                </section>

                <section class="cart-panel">
                    <h2>{"Your Cart"}</h2>
                    {if state.loading {
                        html! { <div class="placeholder">{"Loading your cart..."}</div> }
                    } else {
                        html! {
                            <CartView
                                items={state.items.clone()}
                                totals={state.totals}
                                busy={state.busy}
                                on_set_quantity={cart.actions.set_quantity.clone()}
                                on_remove={cart.actions.remove_item.clone()}
                                on_clear={cart.actions.clear_cart.clone()}
                            />
                        }
                    }}

                    {if !state.items.is_empty() {
                        html! {
                            <CheckoutForm
                                busy={state.busy}
                                on_checkout={cart.actions.checkout.clone()}
                            />
                        }
                    } else { html! {} }}

                    {if let Some(order) = state.last_order.as_ref() {
                        html! {
                            <div class="order-confirmation">
                                <h3>{format!("Booking {} confirmed", order.order_number)}</h3>
                                <p>{format!("Status: {}", order.status)}</p>
                                <p>{format!("Total: AED {}", order.total)}</p>
                            </div>
                        }
                    } else { html! {} }}
                </section>
            </main>

            {if let Some(conflict) = state.pending_conflict.as_ref() {
                html! {
                    <ConflictModal
                        conflict={conflict.clone()}
                        busy={state.busy}
                        on_confirm={cart.actions.resolve_conflict.clone()}
                        on_cancel={cart.actions.dismiss_conflict.clone()}
                    />
                }
            } else { html! {} }}
        </div>
    }
}

fn main() {
    yew::Renderer::<App>::new().render();
}
