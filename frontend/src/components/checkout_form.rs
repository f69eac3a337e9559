use shared::CheckoutRequest;
use web_sys::HtmlInputElement;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct CheckoutFormProps {
    pub busy: bool,
    pub on_checkout: Callback<CheckoutRequest>,
}

/// Guest contact details for checkout. Required fields block submission
/// locally; everything else (pricing, payment) is the backend's call.
#[function_component(CheckoutForm)]
pub fn checkout_form(props: &CheckoutFormProps) -> Html {
    let name = use_state(String::new);
    let email = use_state(String::new);
    let phone = use_state(String::new);
    let special_requests = use_state(String::new);
    let form_error = use_state(|| Option::<String>::None);

    let text_input = |state: &UseStateHandle<String>| {
        let state = state.clone();
        let form_error = form_error.clone();
        Callback::from(move |e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            state.set(input.value());
            form_error.set(None);
        })
    };

    let on_name_change = text_input(&name);
    let on_email_change = text_input(&email);
    let on_phone_change = text_input(&phone);
    let on_requests_change = text_input(&special_requests);

    let on_submit = {
        let name = name.clone();
        let email = email.clone();
        let phone = phone.clone();
        let special_requests = special_requests.clone();
        let form_error = form_error.clone();
        let on_checkout = props.on_checkout.clone();

        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();

            if name.trim().is_empty() || email.trim().is_empty() || phone.trim().is_empty() {
                form_error.set(Some("Name, email and phone are required.".to_string()));
                return;
            }
            if !email.contains('@') {
                form_error.set(Some("Please enter a valid email address.".to_string()));
                return;
            }

            let requests = special_requests.trim();
            on_checkout.emit(CheckoutRequest {
                customer_name: name.trim().to_string(),
                customer_email: email.trim().to_string(),
                customer_phone: phone.trim().to_string(),
                special_requests: if requests.is_empty() {
                    None
                } else {
                    Some(requests.to_string())
                },
            });
        })
    };

    html! {
        <form class="checkout-form" onsubmit={on_submit}>
            {if let Some(error) = (*form_error).as_ref() {
                html! { <div class="form-message error">{error}</div> }
            } else { html! {} }}

            <div class="form-group">
                <label for="customer-name">{"Full name"}</label>
                <input
                    type="text"
                    id="customer-name"
                    value={(*name).clone()}
                    onchange={on_name_change}
                    disabled={props.busy}
                />
            </div>

            <div class="form-group">
                <label for="customer-email">{"Email"}</label>
                <input
                    type="email"
                    id="customer-email"
                    value={(*email).clone()}
                    onchange={on_email_change}
                    disabled={props.busy}
                />
            </div>

            <div class="form-group">
                <label for="customer-phone">{"Phone"}</label>
                <input
                    type="tel"
                    id="customer-phone"
                    value={(*phone).clone()}
                    onchange={on_phone_change}
                    disabled={props.busy}
                />
            </div>

            <div class="form-group">
                <label for="special-requests">{"Special requests (optional)"}</label>
                <input
                    type="text"
                    id="special-requests"
                    value={(*special_requests).clone()}
                    onchange={on_requests_change}
                    disabled={props.busy}
                />
            </div>

            <button type="submit" class="btn btn-primary" disabled={props.busy}>
                {if props.busy { "Processing..." } else { "Proceed to Payment" }}
            </button>
        </form>
    }
}
