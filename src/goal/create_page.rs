//! Defines the route handler for the page for creating a new savings goal.

use axum::response::{IntoResponse, Response};
use maud::{Markup, html};

use crate::{
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, base,
        field_error, loading_spinner,
    },
    navigation::NavBar,
    validation::ValidationErrors,
};

/// The form for creating a savings goal.
///
/// When a submission fails validation the endpoint re-renders this fragment
/// with the user's input and the error messages filled in.
pub(crate) fn goal_form(title: &str, target: &str, errors: &ValidationErrors) -> Markup {
    html! {
        form
            hx-post=(endpoints::GOALS_API)
            hx-target-error="#alert-container"
            hx-indicator="#indicator"
            class="w-full space-y-4 md:space-y-6"
        {
            h2 class="text-xl font-bold" { "New Savings Goal" }

            div
            {
                label
                    for="title"
                    class=(FORM_LABEL_STYLE)
                {
                    "Title"
                }

                input
                    id="title"
                    type="text"
                    name="title"
                    placeholder="Emergency fund"
                    required
                    autofocus
                    maxlength="100"
                    value=(title)
                    class=(FORM_TEXT_INPUT_STYLE);

                (field_error(errors.field("title")))
            }

            div
            {
                label
                    for="target"
                    class=(FORM_LABEL_STYLE)
                {
                    "Target Amount"
                }

                input
                    id="target"
                    type="number"
                    name="target"
                    step="0.01"
                    min="0.01"
                    placeholder="0.00"
                    required
                    value=(target)
                    class=(FORM_TEXT_INPUT_STYLE);

                (field_error(errors.field("target")))
            }

            button type="submit" id="submit-button" tabindex="0" class=(BUTTON_PRIMARY_STYLE)
            {
                span
                    id="indicator"
                    class="inline htmx-indicator"
                {
                    (loading_spinner())
                }
                " Create Goal"
            }
        }
    }
}

fn new_goal_view() -> Markup {
    let nav_bar = NavBar::new(endpoints::NEW_GOAL_VIEW).into_html();
    let form = goal_form("", "", &ValidationErrors::default());

    let content = html! {
        (nav_bar)
        div class=(FORM_CONTAINER_STYLE) { (form) }
    };

    base("Create Goal", &content)
}

/// Renders the page for creating a savings goal.
pub async fn get_new_goal_page() -> Response {
    new_goal_view().into_response()
}
