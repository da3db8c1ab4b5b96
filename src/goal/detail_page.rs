//! Defines the route handler for the page showing a single savings goal.
//!
//! The page shows the goal's progress, its full transaction history and the
//! form for recording a new deposit or withdrawal.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    auth::UserID,
    database_id::GoalId,
    endpoints,
    goal::{GoalSummary, SavingsGoal, get_goal},
    html::{
        COMPLETED_BADGE_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE,
        TABLE_ROW_STYLE, base, format_currency, progress_bar,
    },
    navigation::NavBar,
    transaction::{Transaction, TransactionKind, list_transactions, transaction_form},
    validation::ValidationErrors,
};

fn history_table(transactions: &[Transaction]) -> Markup {
    html! {
        @if transactions.is_empty() {
            p class="text-gray-500 dark:text-gray-400"
            {
                "No transactions yet. Record a deposit to get started."
            }
        } @else {
            div class="relative overflow-x-auto shadow-md sm:rounded-lg w-full"
            {
                table class="w-full text-sm text-left rtl:text-right text-gray-500 dark:text-gray-400"
                {
                    thead class=(TABLE_HEADER_STYLE)
                    {
                        tr
                        {
                            th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Kind" }
                            th scope="col" class=(format!("{TABLE_CELL_STYLE} text-right")) { "Amount" }
                        }
                    }

                    tbody
                    {
                        @for transaction in transactions {
                            tr class=(TABLE_ROW_STYLE)
                            {
                                td class=(TABLE_CELL_STYLE) { (transaction.created_at.date()) }
                                td class=(TABLE_CELL_STYLE)
                                {
                                    @match transaction.kind {
                                        TransactionKind::Deposit => "Deposit",
                                        TransactionKind::Withdrawal => "Withdrawal",
                                    }
                                }
                                td class=(format!("{TABLE_CELL_STYLE} text-right"))
                                {
                                    @match transaction.kind {
                                        TransactionKind::Deposit => (format_currency(transaction.amount)),
                                        TransactionKind::Withdrawal => (format!("-{}", format_currency(transaction.amount))),
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

fn summary_section(goal: &SavingsGoal, summary: &GoalSummary) -> Markup {
    html! {
        div class="w-full p-6 bg-white border border-gray-200 rounded-lg shadow-sm dark:bg-gray-800 dark:border-gray-700 space-y-2"
        {
            div class="flex items-center justify-between"
            {
                h1 class="text-2xl font-bold truncate" { (goal.title) }

                @if summary.is_completed {
                    span class=(COMPLETED_BADGE_STYLE) { "Completed" }
                }
            }

            p class="text-sm text-gray-500 dark:text-gray-400"
            {
                (format_currency(summary.current))
                " of "
                (format_currency(goal.target))
                " saved"
            }

            (progress_bar(summary.progress, summary.is_completed))

            @if summary.excess > 0.0 {
                p class="text-sm text-green-600 dark:text-green-400"
                {
                    (format_currency(summary.excess)) " over your target"
                }
            } @else {
                p class="text-sm text-gray-500 dark:text-gray-400"
                {
                    (format_currency(summary.remaining)) " to go"
                }
            }
        }
    }
}

fn goal_detail_view(goal: &SavingsGoal, transactions: &[Transaction]) -> Markup {
    let nav_bar = NavBar::new(endpoints::GOALS_VIEW).into_html();
    let summary = GoalSummary::compute(goal.target, transactions);

    let content = html! {
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full max-w-2xl space-y-6"
            {
                (summary_section(goal, &summary))

                (transaction_form(goal.id, "", None, &ValidationErrors::default()))

                (history_table(transactions))
            }
        }
    };

    base(&goal.title, &content)
}

/// The state needed for the goal detail page.
#[derive(Clone)]
pub struct GoalDetailPageState {
    /// The app's SQLite database connection.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for GoalDetailPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Renders the page for a single savings goal.
///
/// # Errors
///
/// Returns a [Error::NotFound] if the goal does not exist or belongs to
/// another user, which renders as the 404 page.
pub async fn get_goal_detail_page(
    State(state): State<GoalDetailPageState>,
    Path(goal_id): Path<GoalId>,
    Extension(user_id): Extension<UserID>,
) -> Result<Response, Error> {
    let (goal, transactions) = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        let goal = get_goal(goal_id, user_id, &connection)?;
        let transactions = list_transactions(goal_id, &connection)?;

        (goal, transactions)
    };

    Ok(goal_detail_view(&goal, &transactions).into_response())
}
