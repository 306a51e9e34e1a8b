use dioxus::prelude::*;

use shamba_common::buy_request::{
    validate_county, validate_product, validate_quantity, BuyRequestForm, UNITS,
};
use shamba_common::county::KENYAN_COUNTIES;
use shamba_common::site::page_title;
use shamba_common::validation::validate_email_or_phone;

use super::shared_state::{use_analytics, use_api, use_consent};

#[component]
pub fn BuyRequestView() -> Element {
    let api = use_api();
    let analytics = use_analytics();
    let consent = use_consent();
    let mut form = use_signal(BuyRequestForm::new);

    let submit = move |evt: FormEvent| {
        evt.prevent_default();
        let Some(request) = form.write().begin_submit() else {
            return;
        };
        let api = api.clone();
        let analytics = analytics.clone();
        spawn(async move {
            let result = api.create_buy_request(&request).await;
            let posted = result.is_ok();
            form.write().finish_submit(result);
            if posted {
                analytics.track_event(
                    consent.peek().value(),
                    "buy_request_posted",
                    &[("county", request.county.as_str())],
                );
            }
        });
    };

    let state = form.read().clone();
    let title = page_title(Some("Post a Buy Request"));

    rsx! {
        document::Title { "{title}" }
        section { class: "buy-request-view",
            h1 { "Tell farmers what you need" }
            p { class: "lead",
                "Post what you want to buy and sellers near you will get in touch."
            }
            if state.was_submitted() {
                p { class: "success-message", role: "status",
                    "Your request is live. Sellers will contact you soon."
                }
            }
            form { class: "buy-request-form", onsubmit: submit,
                div { class: "form-group",
                    label { r#for: "br-product", "What do you want to buy?" }
                    input {
                        id: "br-product",
                        r#type: "text",
                        placeholder: "e.g. Irish potatoes",
                        value: "{state.product.value}",
                        oninput: move |evt| form.write().product.set_value(evt.value(), validate_product),
                        onblur: move |_| form.write().product.blur(validate_product),
                    }
                    FieldError { message: state.product.visible_error().map(String::from) }
                }
                div { class: "form-row",
                    div { class: "form-group",
                        label { r#for: "br-quantity", "Quantity" }
                        input {
                            id: "br-quantity",
                            r#type: "number",
                            min: "1",
                            value: "{state.quantity.value}",
                            oninput: move |evt| form.write().quantity.set_value(evt.value(), validate_quantity),
                            onblur: move |_| form.write().quantity.blur(validate_quantity),
                        }
                        FieldError { message: state.quantity.visible_error().map(String::from) }
                    }
                    div { class: "form-group",
                        label { r#for: "br-unit", "Unit" }
                        select {
                            id: "br-unit",
                            value: "{state.unit}",
                            onchange: move |evt| form.write().unit = evt.value(),
                            for unit in UNITS {
                                option { value: unit, selected: unit == state.unit, "{unit}" }
                            }
                        }
                    }
                }
                div { class: "form-group",
                    label { r#for: "br-county", "Delivery county" }
                    select {
                        id: "br-county",
                        value: "{state.county.value}",
                        onchange: move |evt| form.write().county.set_value(evt.value(), validate_county),
                        onblur: move |_| form.write().county.blur(validate_county),
                        option { value: "", "Choose a county" }
                        for county in KENYAN_COUNTIES {
                            option { value: county, selected: county == state.county.value, "{county}" }
                        }
                    }
                    FieldError { message: state.county.visible_error().map(String::from) }
                }
                div { class: "form-group",
                    label { r#for: "br-contact", "Email or phone" }
                    input {
                        id: "br-contact",
                        r#type: "text",
                        placeholder: "you@example.com or 0712 345 678",
                        value: "{state.contact.value}",
                        oninput: move |evt| form.write().contact.set_value(evt.value(), validate_email_or_phone),
                        onblur: move |_| form.write().contact.blur(validate_email_or_phone),
                    }
                    FieldError { message: state.contact.visible_error().map(String::from) }
                }
                div { class: "form-group",
                    label { r#for: "br-notes", "Notes (optional)" }
                    textarea {
                        id: "br-notes",
                        value: "{state.notes}",
                        oninput: move |evt| form.write().notes = evt.value(),
                    }
                }
                if let Some(err) = state.error.as_ref() {
                    p { class: "error-message", role: "alert", "{err}" }
                }
                button {
                    r#type: "submit",
                    class: "btn btn-primary",
                    disabled: state.is_submitting(),
                    if state.is_submitting() { "Posting..." } else { "Post Request" }
                }
            }
        }
    }
}

/// Inline message under a field; renders nothing when there is no error.
#[component]
pub fn FieldError(#[props(!optional)] message: Option<String>) -> Element {
    match message {
        Some(message) => rsx! { span { class: "field-error", "{message}" } },
        None => rsx! {},
    }
}
