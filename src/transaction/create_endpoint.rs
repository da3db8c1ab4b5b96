//! Defines the route handler that records a deposit or withdrawal against a goal.

use std::{
    str::FromStr,
    sync::{Arc, Mutex},
};

use axum::{
    Extension, Form,
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    auth::UserID,
    database_id::GoalId,
    endpoints,
    transaction::{TransactionKind, append_transaction, transaction_form},
    validation::validate_transaction_input,
};

/// The state needed to record a transaction.
#[derive(Clone)]
pub struct CreateTransactionEndpointState {
    /// The app's SQLite database connection.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateTransactionEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The raw data entered by the user in the transaction form.
///
/// Both fields are kept as strings so that malformed input is reported as a
/// validation error against the field instead of a 422 response.
#[derive(Clone, Deserialize)]
pub struct NewTransactionForm {
    /// The amount of money to move, as entered.
    pub amount: String,
    /// Either "deposit" or "withdrawal".
    pub kind: String,
}

/// Handle transaction form submissions for a goal.
///
/// The balance check and the insert are serialised per database connection,
/// so two racing withdrawals can never both pass the overdraft check. On
/// success the client is redirected back to the goal's page.
///
/// An overdrawing withdrawal or an unknown goal never records anything and is
/// reported back to the client as an alert.
pub async fn create_transaction_endpoint(
    State(state): State<CreateTransactionEndpointState>,
    Path(goal_id): Path<GoalId>,
    Extension(user_id): Extension<UserID>,
    Form(new_transaction): Form<NewTransactionForm>,
) -> Response {
    let amount = new_transaction.amount.trim().parse::<f64>().ok();
    let kind = TransactionKind::from_str(new_transaction.kind.trim()).ok();

    let errors = validate_transaction_input(amount, new_transaction.kind.trim());
    if !errors.is_empty() {
        return transaction_form(goal_id, &new_transaction.amount, kind, &errors).into_response();
    }

    // Validation guarantees both fields parsed.
    let (Some(amount), Some(kind)) = (amount, kind) else {
        return transaction_form(goal_id, &new_transaction.amount, kind, &errors).into_response();
    };

    let mut connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match append_transaction(user_id, goal_id, amount, kind, &mut connection) {
        Ok(transaction) => {
            tracing::info!(
                "recorded {} of {} against goal {}",
                transaction.kind,
                transaction.amount,
                goal_id
            );
            (
                HxRedirect(endpoints::format_endpoint(
                    endpoints::GOAL_DETAIL_VIEW,
                    goal_id,
                )),
                StatusCode::SEE_OTHER,
            )
                .into_response()
        }
        Err(error @ Error::InsufficientBalance { .. }) => {
            tracing::info!("rejected overdrawing withdrawal against goal {goal_id}: {error}");
            error.into_alert_response()
        }
        Err(error) => {
            tracing::error!("An unexpected error occurred while recording a transaction: {error}");
            error.into_alert_response()
        }
    }
}
