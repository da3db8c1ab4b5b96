//! Defines the core data model and database queries for goal transactions.
//!
//! Transactions are append-only: once recorded they are never edited or
//! deleted, so a goal's balance can always be re-derived from its history.

use std::{fmt::Display, str::FromStr};

use rusqlite::{
    Connection, Row, TransactionBehavior,
    types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{
    Error, UserID,
    database_id::{GoalId, TransactionId},
};

/// Whether a transaction pays money into a goal or takes money out of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Money paid into the goal.
    Deposit,
    /// Money taken out of the goal.
    Withdrawal,
}

impl TransactionKind {
    /// The string stored in the database and submitted by forms.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Deposit => "deposit",
            TransactionKind::Withdrawal => "withdrawal",
        }
    }
}

impl Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The error returned when parsing a transaction kind from an unknown string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown transaction kind {0:?}, expected \"deposit\" or \"withdrawal\"")]
pub struct ParseKindError(String);

impl FromStr for TransactionKind {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "deposit" => Ok(TransactionKind::Deposit),
            "withdrawal" => Ok(TransactionKind::Withdrawal),
            other => Err(ParseKindError(other.to_owned())),
        }
    }
}

impl ToSql for TransactionKind {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for TransactionKind {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|error| FromSqlError::Other(Box::new(error)))
    }
}

/// A deposit into, or withdrawal from, a savings goal.
///
/// A transaction belongs to exactly one goal and has no independent
/// lifecycle. Use [append_transaction] to record one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// The ID of the goal this transaction belongs to.
    pub goal_id: GoalId,
    /// The amount of money moved, always positive.
    pub amount: f64,
    /// Whether the amount was paid in or taken out.
    pub kind: TransactionKind,
    /// When the transaction was recorded.
    pub created_at: OffsetDateTime,
}

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                goal_id INTEGER NOT NULL,
                amount REAL NOT NULL,
                kind TEXT NOT NULL,
                created_at TEXT NOT NULL,
                FOREIGN KEY(goal_id) REFERENCES goal(id)
                )",
        (),
    )?;

    Ok(())
}

/// Convert a database row into a [Transaction].
///
/// Expects the columns id, goal_id, amount, kind and created_at, in that
/// order.
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    Ok(Transaction {
        id: row.get(0)?,
        goal_id: row.get(1)?,
        amount: row.get(2)?,
        kind: row.get(3)?,
        created_at: row.get(4)?,
    })
}

/// Get all transactions for a goal in the order they were recorded.
///
/// Insertion order is chronological order, so this is also the order the
/// overdraft check replays when deriving the balance.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn list_transactions(goal_id: GoalId, connection: &Connection) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare(
            "SELECT id, goal_id, amount, kind, created_at FROM \"transaction\"
             WHERE goal_id = :goal_id
             ORDER BY id ASC",
        )?
        .query_map(&[(":goal_id", &goal_id)], map_transaction_row)?
        .map(|row| row.map_err(|error| error.into()))
        .collect()
}

/// Derive a goal's current balance from its recorded transactions.
///
/// Deposits add, withdrawals subtract. A goal with no transactions has a
/// balance of zero.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn current_balance(goal_id: GoalId, connection: &Connection) -> Result<f64, Error> {
    connection
        .query_row(
            "SELECT COALESCE(SUM(CASE WHEN kind = 'deposit' THEN amount ELSE -amount END), 0.0)
             FROM \"transaction\"
             WHERE goal_id = :goal_id",
            &[(":goal_id", &goal_id)],
            |row| row.get(0),
        )
        .map_err(|error| error.into())
}

/// Append a transaction to a goal, rejecting withdrawals that would overdraw it.
///
/// The balance check and the insert happen inside a single exclusive SQLite
/// transaction so that two racing withdrawals against the same goal can
/// never both pass the check. Callers hold the connection mutex for the
/// whole call, which serialises check-and-append within this process; the
/// SQLite transaction covers any other process sharing the database file.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `goal_id` does not refer to a goal owned by `user_id`,
/// - [Error::InsufficientBalance] if a withdrawal exceeds the goal's balance,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn append_transaction(
    user_id: UserID,
    goal_id: GoalId,
    amount: f64,
    kind: TransactionKind,
    connection: &mut Connection,
) -> Result<Transaction, Error> {
    let db_transaction = connection.transaction_with_behavior(TransactionBehavior::Immediate)?;

    // A goal owned by another user is reported as missing so IDs cannot be probed.
    let owned_goals: i64 = db_transaction.query_row(
        "SELECT COUNT(id) FROM goal WHERE id = :goal_id AND user_id = :user_id",
        &[(":goal_id", &goal_id), (":user_id", &user_id.as_i64())],
        |row| row.get(0),
    )?;

    if owned_goals == 0 {
        return Err(Error::NotFound);
    }

    if kind == TransactionKind::Withdrawal {
        let available = db_transaction
            .query_row(
                "SELECT COALESCE(SUM(CASE WHEN kind = 'deposit' THEN amount ELSE -amount END), 0.0)
                 FROM \"transaction\"
                 WHERE goal_id = :goal_id",
                &[(":goal_id", &goal_id)],
                |row| row.get(0),
            )
            .map_err(Error::from)?;

        if amount > available {
            // Dropping the SQLite transaction rolls it back, so nothing is committed.
            return Err(Error::InsufficientBalance {
                requested: amount,
                available,
            });
        }
    }

    let transaction = db_transaction
        .prepare(
            "INSERT INTO \"transaction\" (goal_id, amount, kind, created_at)
             VALUES (?1, ?2, ?3, ?4)
             RETURNING id, goal_id, amount, kind, created_at",
        )?
        .query_row(
            (goal_id, amount, kind, OffsetDateTime::now_utc()),
            map_transaction_row,
        )
        .map_err(Error::from)?;

    db_transaction.commit()?;

    Ok(transaction)
}
