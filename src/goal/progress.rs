//! Pure functions deriving a goal's balance and progress from its
//! transaction history.
//!
//! Nothing here is stored: every figure is recomputed from the immutable
//! transaction list, so recomputing is always safe and idempotent. The
//! authoritative overdraft check lives in the database layer
//! ([crate::transaction::append_transaction]); these functions only
//! re-derive the same figures for display.

use crate::transaction::{Transaction, TransactionKind};

/// Sum a goal's transactions into its current balance.
///
/// Deposits add, withdrawals subtract. The final sum does not depend on
/// order, but the history is kept ordered for display and for the
/// append-time overdraft check, which depends on balance-so-far.
pub fn balance(transactions: &[Transaction]) -> f64 {
    transactions
        .iter()
        .fold(0.0, |total, transaction| match transaction.kind {
            TransactionKind::Deposit => total + transaction.amount,
            TransactionKind::Withdrawal => total - transaction.amount,
        })
}

/// The percentage of `target` that has been saved, clamped to [0, 100].
///
/// Overshoot past the target still reads 100; report it via [excess]
/// instead. `target` is validated to be at least one cent before a goal can
/// exist, so division by zero cannot happen here.
pub fn progress(current: f64, target: f64) -> f64 {
    (current / target * 100.0).clamp(0.0, 100.0)
}

/// How much is still needed to reach `target`, never negative.
pub fn remaining(current: f64, target: f64) -> f64 {
    (target - current).max(0.0)
}

/// How far `current` has overshot `target`, never negative.
pub fn excess(current: f64, target: f64) -> f64 {
    (current - target).max(0.0)
}

/// The derived figures for one goal, computed in a single pass over its
/// transaction history.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GoalSummary {
    /// The goal's current balance.
    pub current: f64,
    /// Percentage saved, clamped to [0, 100].
    pub progress: f64,
    /// The amount still needed to reach the target.
    pub remaining: f64,
    /// The amount saved past the target.
    pub excess: f64,
    /// Whether the goal has been fully funded.
    pub is_completed: bool,
}

impl GoalSummary {
    /// Derive the summary for a goal with `target` from its transactions.
    pub fn compute(target: f64, transactions: &[Transaction]) -> Self {
        let current = balance(transactions);
        let progress = progress(current, target);

        Self {
            current,
            progress,
            remaining: remaining(current, target),
            excess: excess(current, target),
            is_completed: progress >= 100.0,
        }
    }
}
