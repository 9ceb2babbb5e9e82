use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use taskdeck_core::filter::StatusFilter;
use taskdeck_core::task::{Task, TaskId, TaskPatch, TaskPriority, TimeWindow};
use web_sys::{Event, HtmlInputElement, HtmlSelectElement, HtmlTextAreaElement, SubmitEvent};
use yew::{
    Callback, Html, InputEvent, Properties, TargetCast, UseStateHandle, classes,
    function_component, html, use_state,
};

use crate::api::TaskDraft;
use crate::components::TaskBoard;

#[derive(Properties, PartialEq)]
pub struct TasksPageProps {
    /// Already filtered by status and search.
    pub tasks: Vec<Task>,
    pub filter: StatusFilter,
    pub search: String,
    pub dragging: Option<TaskId>,
    pub on_search: Callback<String>,
    pub on_filter: Callback<StatusFilter>,
    pub on_create: Callback<TaskDraft>,
    pub on_update: Callback<(TaskId, TaskPatch)>,
    pub on_toggle: Callback<TaskId>,
    pub on_delete: Callback<TaskId>,
    pub on_reorder: Callback<Vec<TaskId>>,
    pub on_drag_start: Callback<TaskId>,
    pub on_drag_end: Callback<()>,
}

#[derive(Clone, PartialEq)]
enum EditorMode {
    Add,
    Edit(TaskId),
}

/// Raw form values, kept as strings until submit.
#[derive(Clone, Default, PartialEq)]
struct FormState {
    title: String,
    description: String,
    due: String,
    day: String,
    priority: String,
    start: String,
    end: String,
    error: Option<String>,
}

#[derive(Clone, PartialEq)]
struct Editor {
    mode: EditorMode,
    form: FormState,
}

impl FormState {
    fn from_task(task: &Task) -> Self {
        let fmt_bound = |value: DateTime<Utc>| value.format("%Y-%m-%dT%H:%M").to_string();
        Self {
            title: task.title.clone(),
            description: task.description.clone(),
            due: task
                .due_date
                .map(|date| date.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            day: task.day.clone().unwrap_or_default(),
            priority: task
                .priority
                .map(|priority| format!("{priority:?}").to_lowercase())
                .unwrap_or_default(),
            start: task
                .window
                .as_ref()
                .and_then(|window| window.start)
                .map(fmt_bound)
                .unwrap_or_default(),
            end: task
                .window
                .as_ref()
                .and_then(|window| window.end)
                .map(fmt_bound)
                .unwrap_or_default(),
            error: None,
        }
    }
}

/// Validated form output shared by the add and edit paths.
struct FormValues {
    title: String,
    description: String,
    due_date: Option<NaiveDate>,
    day: Option<String>,
    window: Option<TimeWindow>,
    priority: Option<TaskPriority>,
}

fn parse_window_bound(raw: &str) -> Result<Option<DateTime<Utc>>, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M")
        .map(|value| Some(value.and_utc()))
        .map_err(|_| "Time bounds must look like 2025-06-01T09:00.".to_string())
}

fn parse_priority(raw: &str) -> Option<TaskPriority> {
    match raw {
        "high" => Some(TaskPriority::High),
        "medium" => Some(TaskPriority::Medium),
        "low" => Some(TaskPriority::Low),
        _ => None,
    }
}

fn validate(form: &FormState) -> Result<FormValues, String> {
    let title = form.title.trim().to_string();
    if title.is_empty() {
        return Err("Title is required.".to_string());
    }

    let due = form.due.trim();
    let due_date = if due.is_empty() {
        None
    } else {
        Some(
            NaiveDate::parse_from_str(due, "%Y-%m-%d")
                .map_err(|_| "Due date must look like 2025-06-01.".to_string())?,
        )
    };

    let start = parse_window_bound(&form.start)?;
    let end = parse_window_bound(&form.end)?;
    let window = if start.is_some() || end.is_some() {
        let window = TimeWindow { start, end };
        if !window.is_ordered() {
            return Err("The end time must not be before the start time.".to_string());
        }
        Some(window)
    } else {
        None
    };

    let day = form.day.trim();
    Ok(FormValues {
        title,
        description: form.description.trim().to_string(),
        due_date,
        day: (!day.is_empty()).then(|| day.to_string()),
        window,
        priority: parse_priority(&form.priority),
    })
}

fn edit_field<F>(editor: &UseStateHandle<Option<Editor>>, apply: F) -> Callback<InputEvent>
where
    F: Fn(&mut FormState, String) + 'static,
{
    let editor = editor.clone();
    Callback::from(move |event: InputEvent| {
        let value = event.target_unchecked_into::<HtmlInputElement>().value();
        if let Some(mut next) = (*editor).clone() {
            apply(&mut next.form, value);
            editor.set(Some(next));
        }
    })
}

fn edit_text_area<F>(editor: &UseStateHandle<Option<Editor>>, apply: F) -> Callback<InputEvent>
where
    F: Fn(&mut FormState, String) + 'static,
{
    let editor = editor.clone();
    Callback::from(move |event: InputEvent| {
        let value = event.target_unchecked_into::<HtmlTextAreaElement>().value();
        if let Some(mut next) = (*editor).clone() {
            apply(&mut next.form, value);
            editor.set(Some(next));
        }
    })
}

#[function_component(TasksPage)]
pub fn tasks_page(props: &TasksPageProps) -> Html {
    let editor = use_state(|| None::<Editor>);

    let open_add = {
        let editor = editor.clone();
        Callback::from(move |_| {
            editor.set(Some(Editor {
                mode: EditorMode::Add,
                form: FormState::default(),
            }));
        })
    };

    let open_edit = {
        let editor = editor.clone();
        Callback::from(move |task: Task| {
            editor.set(Some(Editor {
                mode: EditorMode::Edit(task.id.clone()),
                form: FormState::from_task(&task),
            }));
        })
    };

    let close_editor = {
        let editor = editor.clone();
        Callback::from(move |_| {
            editor.set(None);
        })
    };

    let oninput_search = {
        let on_search = props.on_search.clone();
        Callback::from(move |event: InputEvent| {
            let value = event.target_unchecked_into::<HtmlInputElement>().value();
            on_search.emit(value);
        })
    };

    // Splices the dragged id ahead of the drop target in the visible
    // order and hands the result up.
    let on_drop_on = {
        let tasks = props.tasks.clone();
        let dragging = props.dragging.clone();
        let on_reorder = props.on_reorder.clone();
        let on_drag_end = props.on_drag_end.clone();
        Callback::from(move |target: TaskId| {
            let Some(source) = dragging.clone() else {
                return;
            };
            if source == target {
                on_drag_end.emit(());
                return;
            }

            let mut order: Vec<TaskId> = tasks.iter().map(|task| task.id.clone()).collect();
            order.retain(|id| *id != source);
            let index = order
                .iter()
                .position(|id| *id == target)
                .unwrap_or(order.len());
            order.insert(index, source);

            on_reorder.emit(order);
            on_drag_end.emit(());
        })
    };

    let onsubmit = {
        let editor = editor.clone();
        let on_create = props.on_create.clone();
        let on_update = props.on_update.clone();
        Callback::from(move |event: SubmitEvent| {
            event.prevent_default();
            let Some(current) = (*editor).clone() else {
                return;
            };

            match validate(&current.form) {
                Ok(values) => {
                    match &current.mode {
                        EditorMode::Add => {
                            on_create.emit(TaskDraft {
                                title: values.title,
                                description: values.description,
                                due_date: values.due_date,
                                day: values.day,
                                window: values.window,
                                priority: values.priority,
                            });
                        }
                        EditorMode::Edit(id) => {
                            // Every field is sent; absent optional values
                            // clear the corresponding task field.
                            let patch = TaskPatch {
                                title: Some(values.title),
                                description: Some(values.description),
                                due_date: Some(values.due_date),
                                day: Some(values.day),
                                window: Some(values.window),
                                priority: Some(values.priority),
                                status: None,
                            };
                            on_update.emit((id.clone(), patch));
                        }
                    }
                    editor.set(None);
                }
                Err(message) => {
                    let mut next = current;
                    next.form.error = Some(message);
                    editor.set(Some(next));
                }
            }
        })
    };

    let filter_tabs = {
        let active = props.filter;
        let on_filter = props.on_filter.clone();
        html! {
            <div class="filter-tabs">
                {
                    for StatusFilter::all_options().iter().map(|option| {
                        let option = *option;
                        let on_filter = on_filter.clone();
                        html! {
                            <button
                                class={classes!("tab", (option == active).then_some("active"))}
                                onclick={Callback::from(move |_| on_filter.emit(option))}
                            >
                                { option.label() }
                            </button>
                        }
                    })
                }
            </div>
        }
    };

    let editor_modal = if let Some(current) = (*editor).clone() {
        let heading = match &current.mode {
            EditorMode::Add => "Add task",
            EditorMode::Edit(_) => "Edit task",
        };
        let form = &current.form;

        let onchange_priority = {
            let editor = editor.clone();
            Callback::from(move |event: Event| {
                let value = event.target_unchecked_into::<HtmlSelectElement>().value();
                if let Some(mut next) = (*editor).clone() {
                    next.form.priority = value;
                    editor.set(Some(next));
                }
            })
        };

        html! {
            <div class="modal-backdrop">
                <div class="panel modal">
                    <div class="header">
                        <span>{ heading }</span>
                        <button class="btn" onclick={close_editor.clone()}>{ "Close" }</button>
                    </div>
                    <form {onsubmit}>
                        <label class="field">
                            { "Title" }
                            <input
                                type="text"
                                value={form.title.clone()}
                                oninput={edit_field(&editor, |form, value| form.title = value)}
                            />
                        </label>
                        <label class="field">
                            { "Description" }
                            <textarea
                                value={form.description.clone()}
                                oninput={edit_text_area(&editor, |form, value| {
                                    form.description = value;
                                })}
                            />
                        </label>
                        <div class="field-row">
                            <label class="field">
                                { "Due date" }
                                <input
                                    type="date"
                                    value={form.due.clone()}
                                    oninput={edit_field(&editor, |form, value| form.due = value)}
                                />
                            </label>
                            <label class="field">
                                { "Day" }
                                <input
                                    type="text"
                                    placeholder="e.g. Monday"
                                    value={form.day.clone()}
                                    oninput={edit_field(&editor, |form, value| form.day = value)}
                                />
                            </label>
                            <label class="field">
                                { "Priority" }
                                <select value={form.priority.clone()} onchange={onchange_priority}>
                                    <option value="" selected={form.priority.is_empty()}>{ "None" }</option>
                                    <option value="high" selected={form.priority == "high"}>{ "High" }</option>
                                    <option value="medium" selected={form.priority == "medium"}>{ "Medium" }</option>
                                    <option value="low" selected={form.priority == "low"}>{ "Low" }</option>
                                </select>
                            </label>
                        </div>
                        <div class="field-row">
                            <label class="field">
                                { "Starts" }
                                <input
                                    type="datetime-local"
                                    value={form.start.clone()}
                                    oninput={edit_field(&editor, |form, value| form.start = value)}
                                />
                            </label>
                            <label class="field">
                                { "Ends" }
                                <input
                                    type="datetime-local"
                                    value={form.end.clone()}
                                    oninput={edit_field(&editor, |form, value| form.end = value)}
                                />
                            </label>
                        </div>
                        {
                            if let Some(message) = form.error.clone() {
                                html! { <div class="form-error">{ message }</div> }
                            } else {
                                html! {}
                            }
                        }
                        <button class="btn primary" type="submit">{ "Save" }</button>
                    </form>
                </div>
            </div>
        }
    } else {
        html! {}
    };

    html! {
        <div class="page tasks">
            <div class="toolbar">
                <input
                    class="search"
                    type="search"
                    placeholder="Search tasks"
                    value={props.search.clone()}
                    oninput={oninput_search}
                />
                { filter_tabs }
                <button class="btn primary" onclick={open_add}>{ "Add task" }</button>
            </div>
            <TaskBoard
                tasks={props.tasks.clone()}
                dragging={props.dragging.clone()}
                on_drag_start={props.on_drag_start.clone()}
                on_drag_end={props.on_drag_end.clone()}
                {on_drop_on}
                on_edit={open_edit}
                on_toggle={props.on_toggle.clone()}
                on_delete={props.on_delete.clone()}
            />
            { editor_modal }
        </div>
    }
}
