use shared::{ServiceSelection, ServiceSummary, TimeSlot};
use web_sys::{HtmlSelectElement, MouseEvent};
use yew::prelude::*;

use crate::services::date_utils::upcoming_dates;

#[derive(Properties, PartialEq)]
pub struct BookingFormProps {
    pub service: ServiceSummary,
    pub busy: bool,
    pub on_book: Callback<ServiceSelection>,
}

/// Date/time/guest pickers for one service. Submission is blocked until
/// both a date and a time slot are chosen: an unscheduled selection never
/// reaches the cart from here.
#[function_component(BookingForm)]
pub fn booking_form(props: &BookingFormProps) -> Html {
    let date = use_state(String::new);
    let time = use_state(String::new);
    let quantity = use_state(|| 1u32);
    let form_error = use_state(|| Option::<String>::None);

    let on_date_change = {
        let date = date.clone();
        let form_error = form_error.clone();
        Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            date.set(select.value());
            form_error.set(None);
        })
    };

    let on_time_change = {
        let time = time.clone();
        let form_error = form_error.clone();
        Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            time.set(select.value());
            form_error.set(None);
        })
    };

    let decrement = {
        let quantity = quantity.clone();
        Callback::from(move |_: MouseEvent| {
            if *quantity > 1 {
                quantity.set(*quantity - 1);
            }
        })
    };

    let increment = {
        let quantity = quantity.clone();
        Callback::from(move |_: MouseEvent| {
            if *quantity < 10 {
                quantity.set(*quantity + 1);
            }
        })
    };

    let on_book_click = {
        let service = props.service.clone();
        let on_book = props.on_book.clone();
        let date = date.clone();
        let time = time.clone();
        let quantity = quantity.clone();
        let form_error = form_error.clone();

        Callback::from(move |_: MouseEvent| {
            let parsed_date = date.parse().ok();
            let parsed_time = TimeSlot::from_display(&time);

            let selection = ServiceSelection {
                service_id: service.id,
                service_name: service.name.clone(),
                unit_price: service.unit_price(),
                date: parsed_date,
                time: parsed_time,
                quantity: *quantity,
            };

            // Blocking validation: surface the problem, submit nothing.
            if let Err(e) = selection.validate_scheduled() {
                form_error.set(Some(e.to_string()));
                return;
            }

            form_error.set(None);
            on_book.emit(selection);
        })
    };

    let today = chrono::Local::now().date_naive();

    html! {
        <div class="booking-form">
            {if let Some(error) = (*form_error).as_ref() {
                html! { <div class="form-message error">{error}</div> }
            } else { html! {} }}

            <div class="form-row">
                <div class="form-group">
                    <label>{"Date"}</label>
                    <select onchange={on_date_change}>
                        <option value="" selected={date.is_empty()}>{"Select date"}</option>
                        {for upcoming_dates(today).iter().map(|option| html! {
                            <option
                                value={option.value.to_string()}
                                selected={option.value.to_string() == *date}
                            >
                                {&option.label}
                            </option>
                        })}
                    </select>
                </div>

                <div class="form-group">
                    <label>{"Time"}</label>
                    <select onchange={on_time_change}>
                        <option value="" selected={time.is_empty()}>{"Select time"}</option>
                        {for TimeSlot::ALL.iter().map(|slot| html! {
                            <option
                                value={slot.display()}
                                selected={slot.display() == *time}
                            >
                                {slot.display()}
                            </option>
                        })}
                    </select>
                </div>
            </div>

            <div class="form-group">
                <label>{"Guests"}</label>
                <div class="quantity-stepper">
                    <button type="button" onclick={decrement} disabled={*quantity <= 1}>{"-"}</button>
                    <span>{*quantity}</span>
                    <button type="button" onclick={increment} disabled={*quantity >= 10}>{"+"}</button>
                </div>
            </div>

            <button
                type="button"
                class="btn btn-primary"
                onclick={on_book_click}
                disabled={props.busy}
            >
                {if props.busy { "Adding..." } else { "Book Now" }}
            </button>
        </div>
    }
}
