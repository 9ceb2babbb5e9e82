use chrono::{Local, NaiveDate, Utc};
use gloo::storage::{LocalStorage, Storage};
use gloo::timers::future::TimeoutFuture;
use taskdeck_core::config::ClientConfig;
use taskdeck_core::filter::{StatusFilter, filter_tasks};
use taskdeck_core::store::TaskStore;
use taskdeck_core::task::{Task, TaskId, TaskPatch};
use yew::{
    Callback, Html, classes, function_component, html, use_effect_with, use_memo, use_mut_ref,
    use_state,
};
use yew_router::prelude::{BrowserRouter, Redirect, Routable, Switch};

use crate::api::{self, AbortGuard, TaskDraft};
use crate::components::Navbar;
use crate::pages::{DashboardPage, LoginPage, NotFoundPage, SettingsPage, TasksPage};
use crate::session;

const APP_CONFIG_TOML: &str = include_str!("../assets/app.toml");
const THEME_STORAGE_KEY: &str = "color-theme";

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum ThemeMode {
    Light,
    Dark,
}

impl ThemeMode {
    pub fn as_class(self) -> &'static str {
        match self {
            Self::Light => "theme-light",
            Self::Dark => "theme-dark",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    pub fn storage_value(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    pub fn toggle_label(self) -> &'static str {
        match self {
            Self::Light => "Dark",
            Self::Dark => "Light",
        }
    }
}

fn load_theme_mode() -> ThemeMode {
    let stored = LocalStorage::raw()
        .get_item(THEME_STORAGE_KEY)
        .ok()
        .flatten();
    match stored.as_deref() {
        Some("dark") => ThemeMode::Dark,
        _ => ThemeMode::Light,
    }
}

fn save_theme_mode(theme: ThemeMode) {
    let _ = LocalStorage::raw().set_item(THEME_STORAGE_KEY, theme.storage_value());
}

fn client_config() -> ClientConfig {
    ClientConfig::parse(APP_CONFIG_TOML).unwrap_or_else(|error| {
        tracing::error!(%error, "invalid embedded client config; using defaults");
        ClientConfig::default()
    })
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

#[derive(Clone, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

#[derive(Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

impl Notice {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            text: text.into(),
        }
    }

    fn as_class(&self) -> &'static str {
        match self.kind {
            NoticeKind::Success => "notice ok",
            NoticeKind::Error => "notice danger",
        }
    }
}

#[derive(Clone, Routable, PartialEq)]
pub enum Route {
    #[at("/")]
    Dashboard,
    #[at("/login")]
    Login,
    #[at("/tasks")]
    Tasks,
    #[at("/settings")]
    Settings,
    #[not_found]
    #[at("/404")]
    NotFound,
}

#[function_component(App)]
pub fn app() -> Html {
    let config = use_memo((), |_| client_config());
    let theme = use_state(load_theme_mode);
    let session_state = use_state(session::load);
    let store = use_state(TaskStore::new);
    let status_filter = use_state(|| StatusFilter::All);
    let refresh_tick = use_state(|| 0_u64);
    let notice = use_state(|| None::<Notice>);
    let notice_seq = use_mut_ref(|| 0_u64);
    let dragging = use_state(|| None::<TaskId>);

    {
        let theme = theme.clone();
        use_effect_with(*theme, move |theme| {
            save_theme_mode(*theme);
            tracing::debug!(theme = theme.storage_value(), "persisted theme");
            || ()
        });
    }

    let show_notice = {
        let notice = notice.clone();
        let notice_seq = notice_seq.clone();
        let notice_ms = config.notice_ms;
        Callback::from(move |next: Notice| {
            let seq = {
                let mut current = notice_seq.borrow_mut();
                *current = current.wrapping_add(1);
                *current
            };
            notice.set(Some(next));

            let notice = notice.clone();
            let notice_seq = notice_seq.clone();
            wasm_bindgen_futures::spawn_local(async move {
                TimeoutFuture::new(notice_ms).await;
                if *notice_seq.borrow() == seq {
                    notice.set(None);
                }
            });
        })
    };

    // Full fetch-and-replace keyed on the reload tick. The guard makes
    // sure a response that lands after this effect is torn down never
    // writes state.
    {
        let store = store.clone();
        let config = config.clone();
        let show_notice = show_notice.clone();
        let token = session_state.as_ref().map(|s| s.token.clone());

        use_effect_with((token, *refresh_tick), move |(token, tick)| {
            let guard = AbortGuard::new();
            let cleanup_guard = guard.clone();

            if let Some(token) = token.clone() {
                let store = store.clone();
                let show_notice = show_notice.clone();
                let base = config.api_base.clone();
                let tick = *tick;

                wasm_bindgen_futures::spawn_local(async move {
                    tracing::info!(tick, "refreshing task list");
                    match api::fetch_tasks(&base, &token).await {
                        Ok(tasks) => {
                            if !guard.is_armed() {
                                tracing::debug!("dropping stale task list response");
                                return;
                            }
                            let mut next = (*store).clone();
                            next.replace_all(tasks);
                            store.set(next);
                        }
                        Err(error) => {
                            tracing::error!(%error, "task list fetch failed");
                            if guard.is_armed() {
                                show_notice.emit(Notice::error(error));
                            }
                        }
                    }
                });
            }

            move || cleanup_guard.disarm()
        });
    }

    let on_toggle_theme = {
        let theme = theme.clone();
        Callback::from(move |_| {
            theme.set((*theme).next());
        })
    };

    let on_search = {
        let store = store.clone();
        Callback::from(move |query: String| {
            let mut next = (*store).clone();
            next.set_search_query(query);
            store.set(next);
        })
    };

    let on_filter = {
        let status_filter = status_filter.clone();
        Callback::from(move |filter: StatusFilter| {
            status_filter.set(filter);
        })
    };

    let on_drag_start = {
        let dragging = dragging.clone();
        Callback::from(move |id: TaskId| {
            dragging.set(Some(id));
        })
    };

    let on_drag_end = {
        let dragging = dragging.clone();
        Callback::from(move |()| {
            dragging.set(None);
        })
    };

    // Drag result over the visible list. Applied to the in-memory store
    // only; the ordering is not sent to the server and reverts on the
    // next refresh.
    let on_reorder = {
        let store = store.clone();
        Callback::from(move |order: Vec<TaskId>| {
            let mut next = (*store).clone();
            next.reorder(&order);
            store.set(next);
            tracing::debug!(count = order.len(), "applied transient reorder");
        })
    };

    let on_create = {
        let store = store.clone();
        let refresh_tick = refresh_tick.clone();
        let show_notice = show_notice.clone();
        let config = config.clone();
        let session_state = session_state.clone();

        Callback::from(move |draft: TaskDraft| {
            let Some(session) = (*session_state).clone() else {
                return;
            };

            let store = store.clone();
            let refresh_tick = refresh_tick.clone();
            let show_notice = show_notice.clone();
            let base = config.api_base.clone();

            wasm_bindgen_futures::spawn_local(async move {
                match api::create_task(&base, &session.token, &draft, today()).await {
                    Ok(ack) => {
                        // Applied only after the server confirms; a
                        // declined create leaves the list as it was. The
                        // provisional id is swapped for the server's when
                        // the ack carries one, and the snapshot that
                        // follows the tick bump replaces the task with
                        // the server's copy either way.
                        let mut provisional = Task::new_local(
                            draft.title.clone(),
                            draft.description.clone(),
                            draft.due_date,
                            Utc::now().timestamp_millis(),
                        );
                        provisional.day = draft.day.clone();
                        provisional.window = draft.window.clone();
                        provisional.priority = draft.priority;
                        let local_id = provisional.id.clone();

                        let mut next = (*store).clone();
                        next.add(provisional);
                        if let Some(remote) = ack.remote_id() {
                            next.promote_id(&local_id, remote);
                        }
                        store.set(next);
                        show_notice.emit(Notice::success("Task added"));
                        refresh_tick.set((*refresh_tick).saturating_add(1));
                    }
                    Err(error) => {
                        tracing::error!(%error, "task create failed");
                        show_notice.emit(Notice::error(error));
                    }
                }
            });
        })
    };

    let on_update = {
        let store = store.clone();
        let refresh_tick = refresh_tick.clone();
        let show_notice = show_notice.clone();
        let config = config.clone();
        let session_state = session_state.clone();

        Callback::from(move |(id, patch): (TaskId, TaskPatch)| {
            let Some(session) = (*session_state).clone() else {
                return;
            };

            let store = store.clone();
            let refresh_tick = refresh_tick.clone();
            let show_notice = show_notice.clone();
            let base = config.api_base.clone();

            wasm_bindgen_futures::spawn_local(async move {
                match api::update_task(&base, &session.token, &id, &patch).await {
                    Ok(_) => {
                        let mut next = (*store).clone();
                        next.edit(&id, patch);
                        store.set(next);
                        show_notice.emit(Notice::success("Task updated"));
                        refresh_tick.set((*refresh_tick).saturating_add(1));
                    }
                    Err(error) => {
                        tracing::error!(%error, task = %id, "task update failed");
                        show_notice.emit(Notice::error(error));
                    }
                }
            });
        })
    };

    let on_toggle = {
        let store = store.clone();
        let refresh_tick = refresh_tick.clone();
        let show_notice = show_notice.clone();
        let config = config.clone();
        let session_state = session_state.clone();

        Callback::from(move |id: TaskId| {
            let Some(session) = (*session_state).clone() else {
                return;
            };

            let store = store.clone();
            let refresh_tick = refresh_tick.clone();
            let show_notice = show_notice.clone();
            let base = config.api_base.clone();

            wasm_bindgen_futures::spawn_local(async move {
                match api::toggle_task_completion(&base, &session.token, &id).await {
                    Ok(_) => {
                        let mut next = (*store).clone();
                        next.toggle_completion(&id);
                        store.set(next);
                        refresh_tick.set((*refresh_tick).saturating_add(1));
                    }
                    Err(error) => {
                        tracing::error!(%error, task = %id, "toggle completion failed");
                        show_notice.emit(Notice::error(error));
                    }
                }
            });
        })
    };

    let on_delete = {
        let store = store.clone();
        let refresh_tick = refresh_tick.clone();
        let show_notice = show_notice.clone();
        let config = config.clone();
        let session_state = session_state.clone();

        Callback::from(move |id: TaskId| {
            let Some(session) = (*session_state).clone() else {
                return;
            };

            let store = store.clone();
            let refresh_tick = refresh_tick.clone();
            let show_notice = show_notice.clone();
            let base = config.api_base.clone();

            wasm_bindgen_futures::spawn_local(async move {
                match api::delete_task(&base, &session.token, &id).await {
                    Ok(_) => {
                        let mut next = (*store).clone();
                        next.remove(&id);
                        store.set(next);
                        show_notice.emit(Notice::success("Task deleted"));
                        refresh_tick.set((*refresh_tick).saturating_add(1));
                    }
                    Err(error) => {
                        tracing::error!(%error, task = %id, "task delete failed");
                        show_notice.emit(Notice::error(error));
                    }
                }
            });
        })
    };

    let on_authed = {
        let session_state = session_state.clone();
        let refresh_tick = refresh_tick.clone();
        Callback::from(move |session: session::Session| {
            session_state.set(Some(session));
            refresh_tick.set((*refresh_tick).saturating_add(1));
        })
    };

    let on_logout = {
        let session_state = session_state.clone();
        let store = store.clone();
        Callback::from(move |()| {
            session::clear();
            session_state.set(None);
            store.set(TaskStore::new());
            tracing::info!("logged out");
        })
    };

    let visible_tasks = filter_tasks(
        store.tasks(),
        *status_filter,
        store.search_query(),
        today(),
    );

    let render = {
        let all_tasks = store.tasks().to_vec();
        let search = store.search_query().to_string();
        let status_filter = *status_filter;
        let theme_mode = *theme;
        let dragging = (*dragging).clone();
        let api_base = config.api_base.clone();
        let token = session_state
            .as_ref()
            .map(|session| session.token.clone());
        let on_authed = on_authed.clone();
        let on_search = on_search.clone();
        let on_filter = on_filter.clone();
        let on_create = on_create.clone();
        let on_update = on_update.clone();
        let on_toggle = on_toggle.clone();
        let on_delete = on_delete.clone();
        let on_reorder = on_reorder.clone();
        let on_drag_start = on_drag_start.clone();
        let on_drag_end = on_drag_end.clone();
        let on_toggle_theme = on_toggle_theme.clone();
        let on_logout = on_logout.clone();
        let show_notice = show_notice.clone();

        move |route: Route| -> Html {
            // Token presence is re-derived from storage on every
            // protected-route render.
            let authenticated = session::load().is_some();

            match route {
                Route::Login => {
                    if authenticated {
                        html! { <Redirect<Route> to={Route::Dashboard} /> }
                    } else {
                        html! {
                            <LoginPage
                                api_base={api_base.clone()}
                                on_authed={on_authed.clone()}
                                on_notice={show_notice.clone()}
                            />
                        }
                    }
                }
                Route::Dashboard => {
                    if !authenticated {
                        html! { <Redirect<Route> to={Route::Login} /> }
                    } else {
                        html! { <DashboardPage tasks={all_tasks.clone()} /> }
                    }
                }
                Route::Tasks => {
                    if !authenticated {
                        html! { <Redirect<Route> to={Route::Login} /> }
                    } else {
                        html! {
                            <TasksPage
                                tasks={visible_tasks.clone()}
                                filter={status_filter}
                                search={search.clone()}
                                dragging={dragging.clone()}
                                on_search={on_search.clone()}
                                on_filter={on_filter.clone()}
                                on_create={on_create.clone()}
                                on_update={on_update.clone()}
                                on_toggle={on_toggle.clone()}
                                on_delete={on_delete.clone()}
                                on_reorder={on_reorder.clone()}
                                on_drag_start={on_drag_start.clone()}
                                on_drag_end={on_drag_end.clone()}
                            />
                        }
                    }
                }
                Route::Settings => match (&token, authenticated) {
                    (Some(token), true) => html! {
                        <SettingsPage
                            api_base={api_base.clone()}
                            token={token.clone()}
                            theme={theme_mode}
                            on_toggle_theme={on_toggle_theme.clone()}
                            on_logout={on_logout.clone()}
                            on_notice={show_notice.clone()}
                        />
                    },
                    _ => html! { <Redirect<Route> to={Route::Login} /> },
                },
                Route::NotFound => html! { <NotFoundPage /> },
            }
        }
    };

    let authenticated = session_state.is_some();
    let username = session_state
        .as_ref()
        .map(|session| session.username.clone());

    html! {
        <BrowserRouter>
            <div class={classes!("app", theme.as_class())}>
                <Navbar
                    {authenticated}
                    {username}
                    theme={*theme}
                    on_toggle_theme={on_toggle_theme.clone()}
                    on_logout={on_logout.clone()}
                />
                {
                    if let Some(notice) = (*notice).clone() {
                        html! { <div class={notice.as_class()}>{ notice.text }</div> }
                    } else {
                        html! {}
                    }
                }
                <main class="content">
                    <Switch<Route> render={render} />
                </main>
            </div>
        </BrowserRouter>
    }
}
