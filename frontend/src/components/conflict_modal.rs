use shared::{ConflictCase, ConflictChoice, LineItem, TimeSlot};
use web_sys::{HtmlSelectElement, MouseEvent};
use yew::prelude::*;

use crate::services::date_utils::{schedule_label, upcoming_dates};

/// The three resolution strategies the guest can pick from.
#[derive(Debug, Clone, Copy, PartialEq)]
enum ResolutionAction {
    CreateNew,
    AddToExisting,
    EditExisting,
}

#[derive(Properties, PartialEq)]
pub struct ConflictModalProps {
    pub conflict: ConflictCase,
    pub busy: bool,
    /// Emits the guest's completed choice; the session hook applies it.
    pub on_confirm: Callback<ConflictChoice>,
    pub on_cancel: Callback<()>,
}

/// Modal shown when a selection clashes with existing bookings of the same
/// service. Renders the attempted booking, the candidates, and the three
/// strategies; Confirm stays disabled until the choice is complete, so an
/// incomplete action can never reach the resolver.
#[function_component(ConflictModal)]
pub fn conflict_modal(props: &ConflictModalProps) -> Html {
    let action = use_state(|| Option::<ResolutionAction>::None);
    let chosen_item = use_state(|| Option::<String>::None);
    let edit_date = use_state(String::new);
    let edit_time = use_state(String::new);
    let edit_quantity = use_state(|| 1u32);

    // Fresh case, fresh form.
    use_effect_with(props.conflict.clone(), {
        let action = action.clone();
        let chosen_item = chosen_item.clone();
        let edit_date = edit_date.clone();
        let edit_time = edit_time.clone();
        let edit_quantity = edit_quantity.clone();
        move |_| {
            action.set(None);
            chosen_item.set(None);
            edit_date.set(String::new());
            edit_time.set(String::new());
            edit_quantity.set(1);
            || ()
        }
    });

    let candidates = props.conflict.candidates();
    let selection = props.conflict.selection();

    let prefill_edit_form = {
        let edit_date = edit_date.clone();
        let edit_time = edit_time.clone();
        let edit_quantity = edit_quantity.clone();
        move |item: &LineItem| {
            edit_date.set(item.date.map(|d| d.to_string()).unwrap_or_default());
            edit_time.set(item.time.map(|t| t.display().to_string()).unwrap_or_default());
            edit_quantity.set(item.quantity);
        }
    };

    let select_action = {
        let action = action.clone();
        let chosen_item = chosen_item.clone();
        let first_candidate = candidates.first().cloned();
        let prefill_edit_form = prefill_edit_form.clone();
        Callback::from(move |picked: ResolutionAction| {
            action.set(Some(picked));
            if matches!(picked, ResolutionAction::AddToExisting | ResolutionAction::EditExisting) {
                if let Some(first) = &first_candidate {
                    chosen_item.set(Some(first.item_id.clone()));
                    if picked == ResolutionAction::EditExisting {
                        prefill_edit_form(first);
                    }
                }
            } else {
                chosen_item.set(None);
            }
        })
    };

    let on_candidate_change = {
        let chosen_item = chosen_item.clone();
        let action = action.clone();
        let candidates = candidates.to_vec();
        Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            let item_id = select.value();
            chosen_item.set(Some(item_id.clone()));
            if *action == Some(ResolutionAction::EditExisting) {
                if let Some(item) = candidates.iter().find(|c| c.item_id == item_id) {
                    prefill_edit_form(item);
                }
            }
        })
    };

    let on_date_change = {
        let edit_date = edit_date.clone();
        Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            edit_date.set(select.value());
        })
    };

    let on_time_change = {
        let edit_time = edit_time.clone();
        Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            edit_time.set(select.value());
        })
    };

    let decrement_guests = {
        let edit_quantity = edit_quantity.clone();
        Callback::from(move |_: MouseEvent| {
            if *edit_quantity > 1 {
                edit_quantity.set(*edit_quantity - 1);
            }
        })
    };

    let increment_guests = {
        let edit_quantity = edit_quantity.clone();
        Callback::from(move |_: MouseEvent| {
            if *edit_quantity < 10 {
                edit_quantity.set(*edit_quantity + 1);
            }
        })
    };

    // The choice this form currently describes, if it is complete.
    let pending_choice: Option<ConflictChoice> = match *action {
        Some(ResolutionAction::CreateNew) => Some(ConflictChoice::CreateNew),
        Some(ResolutionAction::AddToExisting) => {
            (*chosen_item).clone().map(|item_id| ConflictChoice::AddToExisting { item_id })
        }
        Some(ResolutionAction::EditExisting) => {
            let item_id = (*chosen_item).clone();
            let date = edit_date.parse().ok();
            let time = TimeSlot::from_display(&edit_time);
            match (item_id, date, time) {
                (Some(item_id), Some(date), Some(time)) => Some(ConflictChoice::EditExisting {
                    item_id,
                    date,
                    time,
                    quantity: *edit_quantity,
                }),
                _ => None,
            }
        }
        None => None,
    };

    let on_confirm_click = {
        let on_confirm = props.on_confirm.clone();
        let pending_choice = pending_choice.clone();
        Callback::from(move |_: MouseEvent| {
            if let Some(choice) = &pending_choice {
                on_confirm.emit(choice.clone());
            }
        })
    };

    let on_cancel_click = {
        let on_cancel = props.on_cancel.clone();
        Callback::from(move |_: MouseEvent| {
            on_cancel.emit(());
        })
    };

    let action_button = |this: ResolutionAction, title: &str, hint: String| {
        let select_action = select_action.clone();
        let class = if *action == Some(this) {
            "conflict-action selected"
        } else {
            "conflict-action"
        };
        html! {
            <button
                type="button"
                class={class}
                onclick={Callback::from(move |_: MouseEvent| select_action.emit(this))}
            >
                <div class="conflict-action-title">{title}</div>
                <div class="conflict-action-hint">{hint}</div>
            </button>
        }
    };

    let today = chrono::Local::now().date_naive();

    html! {
        <div class="modal-overlay">
            <div class="modal conflict-modal">
                <h3 class="modal-title">
                    {format!("{} - Booking Conflict", selection.service_name)}
                </h3>

                <div class="conflict-new-booking">
                    <h4>{"You're trying to add:"}</h4>
                    <p>{schedule_label(selection.date, selection.time)}</p>
                    <p>{format!("{} guest{}", selection.quantity, if selection.quantity > 1 { "s" } else { "" })}</p>
                </div>

                <div class="conflict-existing">
                    <h4>
                        {format!("Existing booking{} in cart:", if candidates.len() > 1 { "s" } else { "" })}
                    </h4>
                    {for candidates.iter().map(|item| html! {
                        <div class="conflict-existing-item">
                            <p>{schedule_label(item.date, item.time)}</p>
                            <p>{format!("{} guest{}", item.quantity, if item.quantity > 1 { "s" } else { "" })}</p>
                        </div>
                    })}
                </div>

                <div class="conflict-actions">
                    <label>{"What would you like to do?"}</label>
                    {action_button(
                        ResolutionAction::CreateNew,
                        "Create separate booking",
                        format!("Add as new item for {}", schedule_label(selection.date, selection.time)),
                    )}
                    {action_button(
                        ResolutionAction::AddToExisting,
                        "Add to existing booking",
                        "Increase guest count for an existing booking".to_string(),
                    )}
                    {action_button(
                        ResolutionAction::EditExisting,
                        "Edit existing booking",
                        "Change date or time of an existing booking".to_string(),
                    )}
                </div>

                {if matches!(*action, Some(ResolutionAction::AddToExisting | ResolutionAction::EditExisting))
                    && candidates.len() > 1 {
                    html! {
                        <div class="form-group">
                            <label>{"Select which booking:"}</label>
                            <select onchange={on_candidate_change.clone()}>
                                {for candidates.iter().map(|item| html! {
                                    <option
                                        value={item.item_id.clone()}
                                        selected={Some(&item.item_id) == (*chosen_item).as_ref()}
                                    >
                                        {format!(
                                            "{} - {} guest{}",
                                            schedule_label(item.date, item.time),
                                            item.quantity,
                                            if item.quantity > 1 { "s" } else { "" }
                                        )}
                                    </option>
                                })}
                            </select>
                        </div>
                    }
                } else { html! {} }}

                {if *action == Some(ResolutionAction::EditExisting) {
                    html! {
                        <div class="conflict-edit-form">
                            <label>{"Edit booking details:"}</label>
                            <div class="form-row">
                                <div class="form-group">
                                    <label>{"Date"}</label>
                                    <select onchange={on_date_change}>
                                        {for upcoming_dates(today).iter().map(|option| html! {
                                            <option
                                                value={option.value.to_string()}
                                                selected={option.value.to_string() == *edit_date}
                                            >
                                                {&option.label}
                                            </option>
                                        })}
                                    </select>
                                </div>
                                <div class="form-group">
                                    <label>{"Time"}</label>
                                    <select onchange={on_time_change}>
                                        {for TimeSlot::ALL.iter().map(|slot| html! {
                                            <option
                                                value={slot.display()}
                                                selected={slot.display() == *edit_time}
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
                                    <button
                                        type="button"
                                        onclick={decrement_guests}
                                        disabled={*edit_quantity <= 1}
                                    >{"-"}</button>
                                    <span>{*edit_quantity}</span>
                                    <button
                                        type="button"
                                        onclick={increment_guests}
                                        disabled={*edit_quantity >= 10}
                                    >{"+"}</button>
                                </div>
                            </div>
                        </div>
                    }
                } else { html! {} }}

                <div class="modal-buttons">
                    <button type="button" class="btn btn-secondary" onclick={on_cancel_click}>
                        {"Cancel"}
                    </button>
                    <button
                        type="button"
                        class="btn btn-primary"
                        onclick={on_confirm_click}
                        disabled={pending_choice.is_none() || props.busy}
                    >
                        {"Confirm"}
                    </button>
                </div>
            </div>
        </div>
    }
}
