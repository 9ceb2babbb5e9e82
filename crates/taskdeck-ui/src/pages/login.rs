use web_sys::{HtmlInputElement, SubmitEvent};
use yew::{
    Callback, Html, InputEvent, Properties, TargetCast, UseStateHandle, classes,
    function_component, html, use_state,
};

use crate::api;
use crate::app::Notice;
use crate::session::{self, Session};

#[derive(Properties, PartialEq)]
pub struct LoginPageProps {
    pub api_base: String,
    pub on_authed: Callback<Session>,
    pub on_notice: Callback<Notice>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum AuthMode {
    Login,
    Register,
}

fn bind_input(state: &UseStateHandle<String>) -> Callback<InputEvent> {
    let state = state.clone();
    Callback::from(move |event: InputEvent| {
        let value = event.target_unchecked_into::<HtmlInputElement>().value();
        state.set(value);
    })
}

#[function_component(LoginPage)]
pub fn login_page(props: &LoginPageProps) -> Html {
    let mode = use_state(|| AuthMode::Login);
    let email = use_state(String::new);
    let password = use_state(String::new);
    let confirm = use_state(String::new);
    let username = use_state(String::new);
    let error = use_state(|| None::<String>);
    let busy = use_state(|| false);

    let set_mode = |next: AuthMode| {
        let mode = mode.clone();
        let error = error.clone();
        Callback::from(move |_| {
            mode.set(next);
            error.set(None);
        })
    };

    let onsubmit = {
        let mode = mode.clone();
        let email = email.clone();
        let password = password.clone();
        let confirm = confirm.clone();
        let username = username.clone();
        let error = error.clone();
        let busy = busy.clone();
        let api_base = props.api_base.clone();
        let on_authed = props.on_authed.clone();
        let on_notice = props.on_notice.clone();

        Callback::from(move |event: SubmitEvent| {
            event.prevent_default();
            if *busy {
                return;
            }

            let email_value = email.trim().to_string();
            let password_value = (*password).clone();
            let username_value = username.trim().to_string();

            if email_value.is_empty() || password_value.is_empty() {
                error.set(Some("Email and password are required.".to_string()));
                return;
            }
            if *mode == AuthMode::Register {
                if username_value.is_empty() {
                    error.set(Some("Username is required.".to_string()));
                    return;
                }
                if password_value != *confirm {
                    error.set(Some("Passwords do not match.".to_string()));
                    return;
                }
            }

            error.set(None);
            busy.set(true);

            let mode_value = *mode;
            let error = error.clone();
            let busy = busy.clone();
            let api_base = api_base.clone();
            let on_authed = on_authed.clone();
            let on_notice = on_notice.clone();

            wasm_bindgen_futures::spawn_local(async move {
                let result = match mode_value {
                    AuthMode::Login => {
                        api::login(&api_base, &email_value, &password_value).await
                    }
                    AuthMode::Register => {
                        api::register(
                            &api_base,
                            &username_value,
                            &email_value,
                            &password_value,
                            None,
                        )
                        .await
                    }
                };
                busy.set(false);

                match result {
                    Ok(response) if response.success && response.token.is_some() => {
                        let token = response.token.unwrap_or_default();
                        let user = response.user.unwrap_or_default();
                        let username = if user.username.is_empty() {
                            username_value
                        } else {
                            user.username
                        };
                        let email = if user.email.is_empty() {
                            email_value
                        } else {
                            user.email
                        };

                        session::save(&token, &email, &username);
                        on_authed.emit(Session {
                            token,
                            email,
                            username,
                        });
                    }
                    Ok(response) => {
                        let message = response
                            .message
                            .unwrap_or_else(|| "Authentication failed.".to_string());
                        error.set(Some(message));
                    }
                    Err(message) => {
                        tracing::error!(%message, "auth request failed");
                        on_notice.emit(Notice::error(message));
                    }
                }
            });
        })
    };

    let registering = *mode == AuthMode::Register;
    let submit_label = if registering { "Create account" } else { "Log in" };

    html! {
        <div class="page login">
            <div class="panel auth-panel">
                <div class="auth-tabs">
                    <button
                        class={classes!("tab", (!registering).then_some("active"))}
                        onclick={set_mode(AuthMode::Login)}
                    >
                        { "Log in" }
                    </button>
                    <button
                        class={classes!("tab", registering.then_some("active"))}
                        onclick={set_mode(AuthMode::Register)}
                    >
                        { "Register" }
                    </button>
                </div>

                <form {onsubmit}>
                    {
                        if registering {
                            html! {
                                <label class="field">
                                    { "Username" }
                                    <input
                                        type="text"
                                        value={(*username).clone()}
                                        oninput={bind_input(&username)}
                                    />
                                </label>
                            }
                        } else {
                            html! {}
                        }
                    }
                    <label class="field">
                        { "Email" }
                        <input
                            type="email"
                            value={(*email).clone()}
                            oninput={bind_input(&email)}
                        />
                    </label>
                    <label class="field">
                        { "Password" }
                        <input
                            type="password"
                            value={(*password).clone()}
                            oninput={bind_input(&password)}
                        />
                    </label>
                    {
                        if registering {
                            html! {
                                <label class="field">
                                    { "Confirm password" }
                                    <input
                                        type="password"
                                        value={(*confirm).clone()}
                                        oninput={bind_input(&confirm)}
                                    />
                                </label>
                            }
                        } else {
                            html! {}
                        }
                    }
                    {
                        if let Some(message) = (*error).clone() {
                            html! { <div class="form-error">{ message }</div> }
                        } else {
                            html! {}
                        }
                    }
                    <button class="btn primary" type="submit" disabled={*busy}>
                        { submit_label }
                    </button>
                </form>
            </div>
        </div>
    }
}
