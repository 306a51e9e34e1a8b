use dioxus::prelude::*;

use shamba_common::auth_form::{AuthField, AuthForm, AuthMode};
use shamba_common::site::{page_title, paths};

use super::app::Route;
use super::shared_state::{use_analytics, use_api, use_consent};

/// Log-in and sign-up share one page; `?mode=signup` picks the latter.
#[component]
pub fn LoginPage(mode: String) -> Element {
    let auth_mode = AuthMode::from_query(&format!("mode={mode}"));
    let api = use_api();
    let analytics = use_analytics();
    let consent = use_consent();
    let nav = use_navigator();
    let mut form = use_signal(|| AuthForm::new(auth_mode));

    use_effect(use_reactive((&auth_mode,), move |(auth_mode,)| {
        if form.peek().mode != auth_mode {
            form.set(AuthForm::new(auth_mode));
        }
    }));

    let submit = move |evt: FormEvent| {
        evt.prevent_default();
        let Some(request) = form.write().begin_submit() else {
            return;
        };
        let api = api.clone();
        let analytics = analytics.clone();
        spawn(async move {
            let mode = form.peek().mode;
            let result = api.authenticate(mode, &request).await;
            if form.write().finish_submit(result) {
                let event = match mode {
                    AuthMode::Login => "login",
                    AuthMode::Signup => "sign_up",
                };
                analytics.track_event(consent.peek().value(), event, &[("method", "email")]);
                nav.push(Route::Browse {});
            }
        });
    };

    let state = form.read().clone();
    let title = page_title(Some(match state.mode {
        AuthMode::Login => "Log In",
        AuthMode::Signup => "Sign Up",
    }));

    rsx! {
        document::Title { "{title}" }
        section { class: "auth-view",
            h1 { "{state.mode.heading()}" }
            form { class: "auth-form", onsubmit: submit,
                AuthFields {
                    form: state.clone(),
                    on_input: move |(field, value): (AuthField, String)| form.write().input(field, value),
                    on_blur: move |field: AuthField| form.write().blur(field),
                }
                if let Some(err) = state.error.as_ref() {
                    p { class: "error-message", role: "alert", "{err}" }
                }
                button {
                    r#type: "submit",
                    class: "btn btn-primary btn-block",
                    disabled: state.is_submitting(),
                    if state.is_submitting() { "Please wait..." } else { "{state.mode.submit_label()}" }
                }
            }
            p { class: "auth-switch",
                {match state.mode {
                    AuthMode::Login => rsx! {
                        "New to Shamba? "
                        Link { to: paths::SIGNUP, "Create an account" }
                    },
                    AuthMode::Signup => rsx! {
                        "Already have an account? "
                        Link { to: paths::LOGIN, "Log in" }
                    },
                }}
            }
        }
    }
}

/// The mode's inputs with their inline errors. Plain inputs only.
#[component]
pub fn AuthFields(
    form: AuthForm,
    on_input: EventHandler<(AuthField, String)>,
    on_blur: EventHandler<AuthField>,
) -> Element {
    let strength = form.password_strength();
    rsx! {
        for field in AuthField::for_mode(form.mode).iter().copied() {
            div { key: "{field.label()}", class: "form-group",
                label { "{field.label()}" }
                input {
                    r#type: field.input_type(),
                    name: field.label(),
                    value: "{form.field(field).value}",
                    oninput: move |evt| on_input.call((field, evt.value())),
                    onblur: move |_| on_blur.call(field),
                }
                if field == AuthField::Password {
                    if let Some(strength) = strength {
                        span { class: "password-strength strength-{strength.label()}",
                            "Password strength: {strength.label()}"
                        }
                    }
                }
                if let Some(err) = form.field(field).visible_error() {
                    span { class: "field-error", "{err}" }
                }
            }
        }
    }
}
