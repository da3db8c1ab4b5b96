//! Pure input checkers for the app's forms.
//!
//! Each validator inspects an input shape and returns a [ValidationErrors]
//! map keyed by field name. Validators have no side effects and apply the
//! same rule set regardless of call site, so the creation forms and any
//! programmatic caller reject exactly the same inputs. Inputs that fail
//! validation must never reach the database layer.

use std::{collections::BTreeMap, str::FromStr};

use email_address::EmailAddress;
use unicode_segmentation::UnicodeSegmentation;

use crate::transaction::TransactionKind;

/// The maximum length of a goal title in grapheme clusters.
pub const MAX_TITLE_LENGTH: usize = 100;

/// The smallest amount of money accepted for goal targets and transaction
/// amounts (one cent).
pub const MIN_AMOUNT: f64 = 0.01;

/// The minimum number of characters for a new password.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Human-readable error messages keyed by the form field they apply to.
///
/// Fields are stored in a sorted map so that error rendering is
/// deterministic.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ValidationErrors(BTreeMap<&'static str, String>);

impl ValidationErrors {
    /// Record an error message against `field`, keeping the first message if
    /// the field already has one.
    pub(crate) fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_insert_with(|| message.into());
    }

    /// The error message for `field`, if that field failed validation.
    pub fn field(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    /// Whether every field passed validation.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Check the inputs for creating a savings goal.
///
/// `target` should be `None` when the submitted value could not be parsed as
/// a number. A malformed target is reported the same way as an out-of-range
/// one, keyed against the target field.
pub fn validate_goal_input(title: &str, target: Option<f64>) -> ValidationErrors {
    let mut errors = ValidationErrors::default();

    if title.is_empty() {
        errors.add("title", "Title is required");
    } else if title.graphemes(true).count() > MAX_TITLE_LENGTH {
        errors.add(
            "title",
            format!("Title must be at most {MAX_TITLE_LENGTH} characters"),
        );
    }

    match target {
        None => errors.add("target", "Target must be a number"),
        Some(target) if !target.is_finite() || target < MIN_AMOUNT => {
            errors.add("target", "Target must be at least $0.01");
        }
        Some(_) => {}
    }

    errors
}

/// Check the inputs for appending a transaction to a savings goal.
///
/// `amount` should be `None` when the submitted value could not be parsed as
/// a number. `kind` is matched against the closed set of transaction kinds;
/// any other string is rejected.
pub fn validate_transaction_input(amount: Option<f64>, kind: &str) -> ValidationErrors {
    let mut errors = ValidationErrors::default();

    match amount {
        None => errors.add("amount", "Amount must be a number"),
        Some(amount) if !amount.is_finite() || amount < MIN_AMOUNT => {
            errors.add("amount", "Amount must be at least $0.01");
        }
        Some(_) => {}
    }

    if TransactionKind::from_str(kind).is_err() {
        errors.add("kind", "Kind must be either a deposit or a withdrawal");
    }

    errors
}

/// Check the inputs for registering a new user.
///
/// A password/confirmation mismatch is reported against the confirmation
/// field so the error appears next to the input the user needs to fix.
pub fn validate_registration(email: &str, password: &str, confirm_password: &str) -> ValidationErrors {
    let mut errors = validate_email(email);

    if password.chars().count() < MIN_PASSWORD_LENGTH {
        errors.add(
            "password",
            format!("Password must be at least {MIN_PASSWORD_LENGTH} characters"),
        );
    }

    if password != confirm_password {
        errors.add("confirm_password", "Passwords do not match");
    }

    errors
}

/// Check the inputs for logging in.
///
/// Log in only checks the shape of the inputs. Whether the credentials match
/// a registered user is checked against the database afterwards.
pub fn validate_log_in(email: &str, password: &str) -> ValidationErrors {
    let mut errors = validate_email(email);

    if password.is_empty() {
        errors.add("password", "Password is required");
    }

    errors
}

fn validate_email(email: &str) -> ValidationErrors {
    let mut errors = ValidationErrors::default();

    if email.is_empty() {
        errors.add("email", "Email is required");
    } else if !EmailAddress::is_valid(email) {
        errors.add("email", "Enter a valid email address");
    }

    errors
}



#[cfg(test)]
mod credentials_tests {
    use super::{validate_log_in, validate_registration};

    #[test]
    fn registration_accepts_valid_input() {
        let errors = validate_registration("jane@example.com", "hunter2!", "hunter2!");

        assert!(errors.is_empty(), "want no errors, got {errors:?}");
    }

    #[test]
    fn registration_rejects_malformed_email() {
        let errors = validate_registration("not-an-email", "hunter2!", "hunter2!");

        assert!(errors.field("email").is_some());
    }

    #[test]
    fn registration_rejects_short_password() {
        let errors = validate_registration("jane@example.com", "abc", "abc");

        assert!(errors.field("password").is_some());
    }

    #[test]
    fn registration_reports_mismatch_on_confirmation_field() {
        let errors = validate_registration("jane@example.com", "hunter2!", "hunter3!");

        assert!(errors.field("confirm_password").is_some());
        assert!(errors.field("password").is_none());
    }

    #[test]
    fn log_in_rejects_empty_password() {
        let errors = validate_log_in("jane@example.com", "");

        assert!(errors.field("password").is_some());
    }

    #[test]
    fn log_in_rejects_empty_email() {
        let errors = validate_log_in("", "hunter2!");

        assert!(errors.field("email").is_some());
    }
}
