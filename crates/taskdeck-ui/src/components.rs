use chrono::Weekday;
use taskdeck_core::stats::{CompletionSummary, PriorityQuadrants};
use taskdeck_core::task::{Task, TaskId, TaskStatus};
use web_sys::DragEvent;
use yew::{Callback, Html, Properties, classes, function_component, html};
use yew_router::prelude::Link;

use crate::app::{Route, ThemeMode};

#[derive(Properties, PartialEq)]
pub struct NavbarProps {
    pub authenticated: bool,
    pub username: Option<String>,
    pub theme: ThemeMode,
    pub on_toggle_theme: Callback<()>,
    pub on_logout: Callback<()>,
}

#[function_component(Navbar)]
pub fn navbar(props: &NavbarProps) -> Html {
    let on_toggle_theme = props.on_toggle_theme.clone();
    let on_logout = props.on_logout.clone();

    html! {
        <nav class="navbar">
            <div class="brand">{ "taskdeck" }</div>
            {
                if props.authenticated {
                    html! {
                        <div class="nav-links">
                            <Link<Route> classes="item" to={Route::Dashboard}>{ "Dashboard" }</Link<Route>>
                            <Link<Route> classes="item" to={Route::Tasks}>{ "Tasks" }</Link<Route>>
                            <Link<Route> classes="item" to={Route::Settings}>{ "Settings" }</Link<Route>>
                        </div>
                    }
                } else {
                    html! {}
                }
            }
            <div class="nav-actions">
                <button class="btn" onclick={move |_| on_toggle_theme.emit(())}>
                    { props.theme.toggle_label() }
                </button>
                {
                    match (&props.username, props.authenticated) {
                        (Some(username), true) if !username.is_empty() => {
                            html! { <span class="badge">{ username }</span> }
                        }
                        _ => html! {},
                    }
                }
                {
                    if props.authenticated {
                        html! {
                            <button class="btn" onclick={move |_| on_logout.emit(())}>
                                { "Log out" }
                            </button>
                        }
                    } else {
                        html! {}
                    }
                }
            </div>
        </nav>
    }
}

#[derive(Properties, PartialEq)]
pub struct TaskBoardProps {
    pub tasks: Vec<Task>,
    pub dragging: Option<TaskId>,
    pub on_drag_start: Callback<TaskId>,
    pub on_drag_end: Callback<()>,
    /// Emitted on drop over a card; payload is the drop target's id.
    pub on_drop_on: Callback<TaskId>,
    pub on_edit: Callback<Task>,
    pub on_toggle: Callback<TaskId>,
    pub on_delete: Callback<TaskId>,
}

#[function_component(TaskBoard)]
pub fn task_board(props: &TaskBoardProps) -> Html {
    html! {
        <div class="panel task-board">
            <div class="header">
                <span>{ "Tasks" }</span>
                <span class="badge">{ props.tasks.len() }</span>
            </div>
            {
                if props.tasks.is_empty() {
                    html! { <div class="board-empty">{ "No tasks match the current view." }</div> }
                } else {
                    html! {
                        <>
                            {
                                for props.tasks.iter().map(|task| {
                                    let task_id = task.id.clone();
                                    let task_for_edit = task.clone();
                                    let on_edit = props.on_edit.clone();
                                    let on_toggle = props.on_toggle.clone();
                                    let on_delete = props.on_delete.clone();
                                    let on_drag_start = props.on_drag_start.clone();
                                    let on_drag_end = props.on_drag_end.clone();
                                    let on_drop_on = props.on_drop_on.clone();
                                    let is_dragging = props.dragging.as_ref() == Some(&task.id);

                                    let drag_id = task_id.clone();
                                    let ondragstart = Callback::from(move |event: DragEvent| {
                                        if let Some(data_transfer) = event.data_transfer() {
                                            let _ = data_transfer.set_data("text/plain", &drag_id.to_string());
                                            data_transfer.set_drop_effect("move");
                                        }
                                        on_drag_start.emit(drag_id.clone());
                                    });

                                    let ondragend = Callback::from(move |_: DragEvent| {
                                        on_drag_end.emit(());
                                    });

                                    let ondragover = Callback::from(|event: DragEvent| {
                                        event.prevent_default();
                                    });

                                    let drop_id = task_id.clone();
                                    let ondrop = Callback::from(move |event: DragEvent| {
                                        event.prevent_default();
                                        event.stop_propagation();
                                        on_drop_on.emit(drop_id.clone());
                                    });

                                    let toggle_id = task_id.clone();
                                    let delete_id = task_id.clone();
                                    let toggle_label = if task.is_completed() { "Reopen" } else { "Done" };

                                    html! {
                                        <div
                                            class={classes!("task-card", is_dragging.then_some("dragging"))}
                                            draggable="true"
                                            {ondragstart}
                                            {ondragend}
                                            {ondragover}
                                            {ondrop}
                                        >
                                            <div class="task-card-title">
                                                <span class={status_dot_class(task.status)}></span>
                                                { &task.title }
                                            </div>
                                            {
                                                if task.description.is_empty() {
                                                    html! {}
                                                } else {
                                                    html! { <div class="task-card-desc">{ &task.description }</div> }
                                                }
                                            }
                                            <div class="task-card-meta">
                                                <span class="badge">{ task.status.to_string() }</span>
                                                {
                                                    if let Some(due) = task.due_date {
                                                        html! { <span class="badge">{ format!("due:{}", due.format("%Y-%m-%d")) }</span> }
                                                    } else {
                                                        html! {}
                                                    }
                                                }
                                                {
                                                    if let Some(priority) = task.priority {
                                                        html! { <span class="badge">{ format!("{priority:?}").to_lowercase() }</span> }
                                                    } else {
                                                        html! {}
                                                    }
                                                }
                                                {
                                                    if let Some(window) = &task.window {
                                                        html! { <span class="badge">{ window_label(window) }</span> }
                                                    } else {
                                                        html! {}
                                                    }
                                                }
                                            </div>
                                            <div class="task-card-actions">
                                                <button class="btn" onclick={move |_| on_edit.emit(task_for_edit.clone())}>{ "Edit" }</button>
                                                <button class="btn ok" onclick={move |_| on_toggle.emit(toggle_id.clone())}>{ toggle_label }</button>
                                                <button class="btn danger" onclick={move |_| on_delete.emit(delete_id.clone())}>{ "Delete" }</button>
                                            </div>
                                        </div>
                                    }
                                })
                            }
                        </>
                    }
                }
            }
        </div>
    }
}

fn status_dot_class(status: TaskStatus) -> &'static str {
    match status {
        TaskStatus::Pending => "dot pending",
        TaskStatus::Incomplete => "dot open",
        TaskStatus::InProgress => "dot active",
        TaskStatus::Completed => "dot done",
    }
}

fn window_label(window: &taskdeck_core::task::TimeWindow) -> String {
    let fmt = |value: chrono::DateTime<chrono::Utc>| value.format("%H:%M").to_string();
    match (window.start, window.end) {
        (Some(start), Some(end)) => format!("{}–{}", fmt(start), fmt(end)),
        (Some(start), None) => format!("from {}", fmt(start)),
        (None, Some(end)) => format!("until {}", fmt(end)),
        (None, None) => String::new(),
    }
}

#[derive(Properties, PartialEq)]
pub struct SummaryCardsProps {
    pub summary: CompletionSummary,
}

#[function_component(SummaryCards)]
pub fn summary_cards(props: &SummaryCardsProps) -> Html {
    let card = |label: &str, value: usize, class: &'static str| {
        html! {
            <div class={classes!("summary-card", class)}>
                <div class="summary-value">{ value }</div>
                <div class="summary-label">{ label }</div>
            </div>
        }
    };

    html! {
        <div class="summary-cards">
            { card("Open", props.summary.open, "open") }
            { card("Completed", props.summary.completed, "done") }
            { card("Overdue", props.summary.overdue, "late") }
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct WeekdayChartProps {
    pub load: Vec<(Weekday, usize)>,
}

#[function_component(WeekdayChart)]
pub fn weekday_chart(props: &WeekdayChartProps) -> Html {
    let max = props
        .load
        .iter()
        .map(|(_, count)| *count)
        .max()
        .unwrap_or(0)
        .max(1);

    html! {
        <div class="panel">
            <div class="header">{ "Weekly load" }</div>
            <div class="weekday-chart">
                {
                    for props.load.iter().map(|(weekday, count)| {
                        let height = (count * 100) / max;
                        html! {
                            <div class="weekday-slot">
                                <div class="weekday-bar-track">
                                    <div
                                        class="weekday-bar"
                                        style={format!("height:{height}%;")}
                                        title={count.to_string()}
                                    ></div>
                                </div>
                                <div class="weekday-label">{ format!("{weekday}") }</div>
                            </div>
                        }
                    })
                }
            </div>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct QuadrantGridProps {
    pub quadrants: PriorityQuadrants,
}

#[function_component(QuadrantGrid)]
pub fn quadrant_grid(props: &QuadrantGridProps) -> Html {
    let q = &props.quadrants;
    let cell = |label: &str, open: usize, done: usize| {
        html! {
            <div class="quadrant-cell">
                <div class="quadrant-label">{ label }</div>
                <div class="quadrant-counts">
                    <span class="badge">{ format!("open {open}") }</span>
                    <span class="badge">{ format!("done {done}") }</span>
                </div>
            </div>
        }
    };

    html! {
        <div class="panel">
            <div class="header">{ "Priorities" }</div>
            <div class="quadrant-grid">
                { cell("High", q.high_open, q.high_done) }
                { cell("Medium", q.medium_open, q.medium_done) }
                { cell("Low", q.low_open, q.low_done) }
            </div>
        </div>
    }
}
