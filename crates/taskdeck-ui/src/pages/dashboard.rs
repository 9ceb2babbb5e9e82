use chrono::Local;
use taskdeck_core::stats::{completion_summary, priority_quadrants, weekday_load};
use taskdeck_core::task::Task;
use yew::{Html, Properties, function_component, html};

use crate::components::{QuadrantGrid, SummaryCards, WeekdayChart};

#[derive(Properties, PartialEq)]
pub struct DashboardPageProps {
    pub tasks: Vec<Task>,
}

#[function_component(DashboardPage)]
pub fn dashboard_page(props: &DashboardPageProps) -> Html {
    let today = Local::now().date_naive();
    let summary = completion_summary(&props.tasks, today);
    let load = weekday_load(&props.tasks).to_vec();
    let quadrants = priority_quadrants(&props.tasks);

    html! {
        <div class="page dashboard">
            <SummaryCards {summary} />
            <div class="dashboard-widgets">
                <WeekdayChart {load} />
                <QuadrantGrid {quadrants} />
            </div>
        </div>
    }
}
