use web_sys::{HtmlInputElement, HtmlTextAreaElement, SubmitEvent};
use yew::{
    Callback, Html, InputEvent, Properties, TargetCast, UseStateHandle, function_component, html,
    use_effect_with, use_state,
};

use crate::api::{self, AbortGuard, ProfileUpdate};
use crate::app::{Notice, ThemeMode};

#[derive(Properties, PartialEq)]
pub struct SettingsPageProps {
    pub api_base: String,
    pub token: String,
    pub theme: ThemeMode,
    pub on_toggle_theme: Callback<()>,
    pub on_logout: Callback<()>,
    pub on_notice: Callback<Notice>,
}

fn bind_input(state: &UseStateHandle<String>) -> Callback<InputEvent> {
    let state = state.clone();
    Callback::from(move |event: InputEvent| {
        let value = event.target_unchecked_into::<HtmlInputElement>().value();
        state.set(value);
    })
}

#[function_component(SettingsPage)]
pub fn settings_page(props: &SettingsPageProps) -> Html {
    let username = use_state(String::new);
    let email = use_state(String::new);
    let bio = use_state(String::new);
    let role = use_state(String::new);
    let loading = use_state(|| true);
    let saving = use_state(|| false);

    {
        let username = username.clone();
        let email = email.clone();
        let bio = bio.clone();
        let role = role.clone();
        let loading = loading.clone();
        let on_notice = props.on_notice.clone();
        let api_base = props.api_base.clone();
        let token = props.token.clone();

        use_effect_with((api_base, token), move |(api_base, token)| {
            let guard = AbortGuard::new();
            let cleanup_guard = guard.clone();
            let api_base = api_base.clone();
            let token = token.clone();

            wasm_bindgen_futures::spawn_local(async move {
                match api::fetch_profile(&api_base, &token).await {
                    Ok(user) => {
                        if !guard.is_armed() {
                            return;
                        }
                        username.set(user.username);
                        email.set(user.email);
                        bio.set(user.bio);
                        role.set(user.role);
                        loading.set(false);
                    }
                    Err(error) => {
                        tracing::error!(%error, "profile fetch failed");
                        if guard.is_armed() {
                            loading.set(false);
                            on_notice.emit(Notice::error(error));
                        }
                    }
                }
            });

            move || cleanup_guard.disarm()
        });
    }

    let onsubmit = {
        let username = username.clone();
        let email = email.clone();
        let bio = bio.clone();
        let role = role.clone();
        let saving = saving.clone();
        let on_notice = props.on_notice.clone();
        let api_base = props.api_base.clone();
        let token = props.token.clone();

        Callback::from(move |event: SubmitEvent| {
            event.prevent_default();
            if *saving {
                return;
            }

            let username_value = username.trim().to_string();
            let email_value = email.trim().to_string();
            if username_value.is_empty() || email_value.is_empty() {
                on_notice.emit(Notice::error("Username and email are required."));
                return;
            }

            saving.set(true);

            let bio_value = (*bio).clone();
            let role_value = (*role).clone();
            let saving = saving.clone();
            let on_notice = on_notice.clone();
            let api_base = api_base.clone();
            let token = token.clone();

            wasm_bindgen_futures::spawn_local(async move {
                let update = ProfileUpdate {
                    token: &token,
                    username: &username_value,
                    email: &email_value,
                    bio: &bio_value,
                    role: &role_value,
                };
                match api::update_profile(&api_base, &update).await {
                    Ok(_) => {
                        on_notice.emit(Notice::success("Profile saved"));
                    }
                    Err(error) => {
                        tracing::error!(%error, "profile update failed");
                        on_notice.emit(Notice::error(error));
                    }
                }
                saving.set(false);
            });
        })
    };

    let oninput_bio = {
        let bio = bio.clone();
        Callback::from(move |event: InputEvent| {
            let value = event.target_unchecked_into::<HtmlTextAreaElement>().value();
            bio.set(value);
        })
    };

    let on_toggle_theme = props.on_toggle_theme.clone();
    let on_logout = props.on_logout.clone();

    html! {
        <div class="page settings">
            <div class="panel">
                <div class="header">{ "Profile" }</div>
                {
                    if *loading {
                        html! { <div class="board-empty">{ "Loading profile…" }</div> }
                    } else {
                        html! {
                            <form {onsubmit}>
                                <label class="field">
                                    { "Username" }
                                    <input
                                        type="text"
                                        value={(*username).clone()}
                                        oninput={bind_input(&username)}
                                    />
                                </label>
                                <label class="field">
                                    { "Email" }
                                    <input
                                        type="email"
                                        value={(*email).clone()}
                                        oninput={bind_input(&email)}
                                    />
                                </label>
                                <label class="field">
                                    { "Bio" }
                                    <textarea value={(*bio).clone()} oninput={oninput_bio} />
                                </label>
                                <label class="field">
                                    { "Role" }
                                    <input
                                        type="text"
                                        value={(*role).clone()}
                                        oninput={bind_input(&role)}
                                    />
                                </label>
                                <button class="btn primary" type="submit" disabled={*saving}>
                                    { if *saving { "Saving…" } else { "Save profile" } }
                                </button>
                            </form>
                        }
                    }
                }
            </div>

            <div class="panel">
                <div class="header">{ "Appearance" }</div>
                <div class="settings-row">
                    <span>{ format!("Current theme: {}", props.theme.storage_value()) }</span>
                    <button class="btn" onclick={move |_| on_toggle_theme.emit(())}>
                        { format!("Switch to {}", props.theme.toggle_label().to_lowercase()) }
                    </button>
                </div>
            </div>

            <div class="panel">
                <div class="header">{ "Session" }</div>
                <div class="settings-row">
                    <span>{ "Sign out of this browser." }</span>
                    <button class="btn danger" onclick={move |_| on_logout.emit(())}>
                        { "Log out" }
                    </button>
                </div>
            </div>
        </div>
    }
}
