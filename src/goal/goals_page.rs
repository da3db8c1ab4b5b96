//! Defines the route handler for the page listing the user's savings goals.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    auth::UserID,
    endpoints,
    goal::{GoalSummary, GoalWithHistory, list_goals_with_history},
    html::{
        COMPLETED_BADGE_STYLE, PAGE_CONTAINER_STYLE, base, format_currency, progress_bar,
    },
    navigation::NavBar,
};

fn goal_card(goal_with_history: &GoalWithHistory) -> Markup {
    let goal = &goal_with_history.goal;
    let summary = GoalSummary::compute(goal.target, &goal_with_history.transactions);
    let detail_url = endpoints::format_endpoint(endpoints::GOAL_DETAIL_VIEW, goal.id);

    html! {
        a
            href=(detail_url)
            class="block w-full p-6 bg-white border border-gray-200 rounded-lg shadow-sm
                hover:bg-gray-100 dark:bg-gray-800 dark:border-gray-700 dark:hover:bg-gray-700"
        {
            div class="flex items-center justify-between mb-2"
            {
                h5 class="text-xl font-bold tracking-tight truncate" { (goal.title) }

                @if summary.is_completed {
                    span class=(COMPLETED_BADGE_STYLE) { "Completed" }
                }
            }

            p class="mb-2 text-sm text-gray-500 dark:text-gray-400"
            {
                (format_currency(summary.current))
                " of "
                (format_currency(goal.target))

                @if summary.excess > 0.0 {
                    " (" (format_currency(summary.excess)) " over)"
                }
            }

            (progress_bar(summary.progress, summary.is_completed))
        }
    }
}

fn goals_view(goals: &[GoalWithHistory]) -> Markup {
    let nav_bar = NavBar::new(endpoints::GOALS_VIEW).into_html();

    let content = html! {
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full max-w-2xl space-y-4"
            {
                div class="flex items-center justify-between"
                {
                    h1 class="text-2xl font-bold" { "Savings Goals" }

                    a
                        href=(endpoints::NEW_GOAL_VIEW)
                        class="px-4 py-2 bg-blue-500 dark:bg-blue-600 hover:bg-blue-600
                            hover:dark:bg-blue-700 text-white rounded"
                    {
                        "New Goal"
                    }
                }

                @if goals.is_empty() {
                    p class="text-gray-500 dark:text-gray-400"
                    {
                        "You have no savings goals yet. Create one to start tracking your savings."
                    }
                } @else {
                    @for goal in goals {
                        (goal_card(goal))
                    }
                }
            }
        }
    };

    base("Goals", &content)
}

/// The state needed for the goals page.
#[derive(Clone)]
pub struct GoalsPageState {
    /// The app's SQLite database connection.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for GoalsPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Renders the page listing the logged-in user's savings goals.
pub async fn get_goals_page(
    State(state): State<GoalsPageState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Response, Error> {
    let goals = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        list_goals_with_history(user_id, &connection)?
    };

    Ok(goals_view(&goals).into_response())
}
