//! Defines the core data model and database queries for savings goals.

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{
    Error, UserID,
    database_id::GoalId,
    transaction::{Transaction, list_transactions},
};

/// A savings target that a user pays money into over time.
///
/// The title and target are fixed at creation and a goal is never deleted.
/// The goal's balance is not stored here: it is derived from the goal's
/// transaction history (see [crate::goal::progress]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingsGoal {
    /// The ID of the goal.
    pub id: GoalId,
    /// The ID of the user who owns the goal.
    pub user_id: UserID,
    /// A short name for what is being saved for.
    pub title: String,
    /// The amount of money to save, in dollars.
    pub target: f64,
    /// When the goal was created.
    pub created_at: OffsetDateTime,
}

/// A savings goal together with its full transaction history, oldest first.
#[derive(Debug, Clone, PartialEq)]
pub struct GoalWithHistory {
    /// The goal itself.
    pub goal: SavingsGoal,
    /// Every transaction recorded against the goal, in insertion order.
    pub transactions: Vec<Transaction>,
}

/// Create the goal table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_goal_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS goal (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                title TEXT NOT NULL,
                target REAL NOT NULL,
                created_at TEXT NOT NULL,
                FOREIGN KEY(user_id) REFERENCES user(id)
                )",
        (),
    )?;

    Ok(())
}

/// Convert a database row into a [SavingsGoal].
///
/// Expects the columns id, user_id, title, target and created_at, in that
/// order.
pub fn map_goal_row(row: &Row) -> Result<SavingsGoal, rusqlite::Error> {
    Ok(SavingsGoal {
        id: row.get(0)?,
        user_id: UserID::new(row.get(1)?),
        title: row.get(2)?,
        target: row.get(3)?,
        created_at: row.get(4)?,
    })
}

/// Create and insert a new savings goal for `user_id`.
///
/// The caller must validate `title` and `target` first
/// (see [crate::validation::validate_goal_input]).
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn create_goal(
    user_id: UserID,
    title: &str,
    target: f64,
    connection: &Connection,
) -> Result<SavingsGoal, Error> {
    connection
        .prepare(
            "INSERT INTO goal (user_id, title, target, created_at)
             VALUES (?1, ?2, ?3, ?4)
             RETURNING id, user_id, title, target, created_at",
        )?
        .query_row(
            (user_id.as_i64(), title, target, OffsetDateTime::now_utc()),
            map_goal_row,
        )
        .map_err(|error| error.into())
}

/// Get the goal with `goal_id` owned by `user_id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if the goal does not exist or belongs to another user,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn get_goal(goal_id: GoalId, user_id: UserID, connection: &Connection) -> Result<SavingsGoal, Error> {
    connection
        .prepare(
            "SELECT id, user_id, title, target, created_at FROM goal
             WHERE id = :id AND user_id = :user_id",
        )?
        .query_row(
            &[(":id", &goal_id), (":user_id", &user_id.as_i64())],
            map_goal_row,
        )
        .map_err(|error| error.into())
}

/// Get all goals owned by `user_id`, oldest first, each with its full
/// transaction history.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn list_goals_with_history(
    user_id: UserID,
    connection: &Connection,
) -> Result<Vec<GoalWithHistory>, Error> {
    let goals: Vec<SavingsGoal> = connection
        .prepare(
            "SELECT id, user_id, title, target, created_at FROM goal
             WHERE user_id = :user_id
             ORDER BY id ASC",
        )?
        .query_map(&[(":user_id", &user_id.as_i64())], map_goal_row)?
        .collect::<Result<_, _>>()?;

    goals
        .into_iter()
        .map(|goal| {
            let transactions = list_transactions(goal.id, connection)?;
            Ok(GoalWithHistory { goal, transactions })
        })
        .collect()
}

#[cfg(test)]
mod goal_tests {
    use rusqlite::Connection;

    use crate::{
        Error, PasswordHash, UserID,
        auth::create_user,
        db::initialize,
        transaction::{TransactionKind, append_transaction},
    };

    use super::{create_goal, get_goal, list_goals_with_history};

    fn get_test_db_and_user() -> (Connection, UserID) {
        let conn = Connection::open_in_memory().expect("Could not open in-memory SQLite database");
        initialize(&conn).expect("Could not initialize database");

        let user = create_user(
            "jane@example.com",
            PasswordHash::new_unchecked("hunter2"),
            &conn,
        )
        .expect("Could not create test user");

        (conn, user.id)
    }

    #[test]
    fn create_goal_assigns_id() {
        let (conn, user_id) = get_test_db_and_user();

        let goal = create_goal(user_id, "House deposit", 500_000.0, &conn).unwrap();

        assert!(goal.id > 0);
        assert_eq!(goal.user_id, user_id);
        assert_eq!(goal.title, "House deposit");
        assert_eq!(goal.target, 500_000.0);
    }

    #[test]
    fn get_goal_returns_created_goal() {
        let (conn, user_id) = get_test_db_and_user();
        let created = create_goal(user_id, "Holiday", 3_000.0, &conn).unwrap();

        let got = get_goal(created.id, user_id, &conn).unwrap();

        assert_eq!(got, created);
    }

    #[test]
    fn get_goal_fails_with_unknown_id() {
        let (conn, user_id) = get_test_db_and_user();

        let result = get_goal(999, user_id, &conn);

        assert_eq!(result, Err(Error::NotFound));
    }

    #[test]
    fn get_goal_hides_other_users_goals() {
        let (conn, user_id) = get_test_db_and_user();
        let goal = create_goal(user_id, "Holiday", 3_000.0, &conn).unwrap();
        let other_user = create_user(
            "john@example.com",
            PasswordHash::new_unchecked("hunter2"),
            &conn,
        )
        .unwrap();

        let result = get_goal(goal.id, other_user.id, &conn);

        assert_eq!(result, Err(Error::NotFound));
    }

    #[test]
    fn list_goals_returns_only_own_goals_with_history() {
        let (mut conn, user_id) = get_test_db_and_user();
        let goal = create_goal(user_id, "Holiday", 3_000.0, &conn).unwrap();
        append_transaction(user_id, goal.id, 250.0, TransactionKind::Deposit, &mut conn).unwrap();

        let other_user = create_user(
            "john@example.com",
            PasswordHash::new_unchecked("hunter2"),
            &conn,
        )
        .unwrap();
        create_goal(other_user.id, "Car", 20_000.0, &conn).unwrap();

        let goals = list_goals_with_history(user_id, &conn).unwrap();

        assert_eq!(goals.len(), 1);
        assert_eq!(goals[0].goal, goal);
        assert_eq!(goals[0].transactions.len(), 1);
        assert_eq!(goals[0].transactions[0].amount, 250.0);
    }

    #[test]
    fn list_goals_returns_empty_for_new_user() {
        let (conn, user_id) = get_test_db_and_user();

        let goals = list_goals_with_history(user_id, &conn).unwrap();

        assert!(goals.is_empty());
    }
}
