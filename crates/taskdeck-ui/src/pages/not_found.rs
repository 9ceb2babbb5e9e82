use yew::{Html, function_component, html};
use yew_router::prelude::Link;

use crate::app::Route;

#[function_component(NotFoundPage)]
pub fn not_found_page() -> Html {
    html! {
        <div class="page not-found">
            <h1>{ "404" }</h1>
            <p>{ "This page does not exist." }</p>
            <Link<Route> classes="btn" to={Route::Dashboard}>{ "Back to dashboard" }</Link<Route>>
        </div>
    }
}
