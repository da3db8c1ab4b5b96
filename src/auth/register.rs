//! The registration page and the route that creates new user accounts.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;
use time::Duration;

use crate::{
    AppState, Error,
    auth::{
        DEFAULT_COOKIE_DURATION, PasswordHash, create_user, invalidate_auth_cookie,
        set_auth_cookie,
    },
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, base, confirm_password_input, email_input, loading_spinner,
        log_in_register, password_input,
    },
    validation::{MIN_PASSWORD_LENGTH, ValidationErrors, validate_registration},
};

fn register_form(email: &str, errors: &ValidationErrors) -> Markup {
    html! {
        form
            hx-post=(endpoints::USERS)
            hx-indicator="#indicator"
            hx-disabled-elt="#email, #password, #confirm-password, #submit-button"
            class="space-y-4 md:space-y-6"
        {
            (email_input(email, errors.field("email")))
            (password_input(MIN_PASSWORD_LENGTH, errors.field("password")))
            (confirm_password_input(MIN_PASSWORD_LENGTH, errors.field("confirm_password")))

            button
                type="submit" id="submit-button" tabindex="0"
                class=(BUTTON_PRIMARY_STYLE)
            {
                span class="inline htmx-indicator" id="indicator"
                {
                    (loading_spinner())
                }
                "Create an account"
            }

            p class="text-sm font-light text-gray-500 dark:text-gray-400" {
                "Already have an account? "
                a
                    href=(endpoints::LOG_IN_VIEW) tabindex="0"
                    class="font-semibold leading-6 text-blue-600 hover:text-blue-500 dark:text-blue-500 dark:hover:text-blue-400"
                {
                  "Log in here"
                }
            }
        }
    }
}

/// Display the registration page.
pub async fn get_register_page() -> Response {
    let register_form = register_form("", &ValidationErrors::default());
    let content = log_in_register("Create an account", &register_form);
    base("Register", &content).into_response()
}

/// The state needed to register a new user.
#[derive(Clone)]
pub struct RegisterState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// The duration for which cookies used for authentication are valid.
    pub cookie_duration: Duration,
    /// The app's SQLite database connection.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl RegisterState {
    /// Create the registration state with the default cookie duration.
    pub fn new(cookie_key: Key, db_connection: Arc<Mutex<Connection>>) -> Self {
        Self {
            cookie_key,
            cookie_duration: DEFAULT_COOKIE_DURATION,
            db_connection,
        }
    }
}

impl FromRef<AppState> for RegisterState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            cookie_duration: state.cookie_duration,
            db_connection: state.db_connection.clone(),
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<RegisterState> for Key {
    fn from_ref(state: &RegisterState) -> Self {
        state.cookie_key.clone()
    }
}

/// The raw data entered by the user in the registration form.
#[derive(Clone, Deserialize)]
pub struct RegisterForm {
    /// The email address to register with.
    pub email: String,
    /// The password for the new account.
    pub password: String,
    /// The password typed a second time, which must match `password`.
    pub confirm_password: String,
}

/// Handler for registration requests via the POST method.
///
/// On success the user is created, logged in and redirected to the goals
/// page. Otherwise, the form is returned with error messages against the
/// offending fields.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same thread.
pub async fn register_user(
    State(state): State<RegisterState>,
    jar: PrivateCookieJar,
    Form(form): Form<RegisterForm>,
) -> Response {
    let errors = validate_registration(&form.email, &form.password, &form.confirm_password);
    if !errors.is_empty() {
        return register_form(&form.email, &errors).into_response();
    }

    let password_hash =
        match PasswordHash::from_raw_password(&form.password, PasswordHash::DEFAULT_COST) {
            Ok(password_hash) => password_hash,
            Err(error) => {
                tracing::error!("Error hashing password: {error}");
                return error.into_response();
            }
        };

    let user = match create_user(
        &form.email,
        password_hash,
        &state
            .db_connection
            .lock()
            .expect("Could not acquire lock to database connection"),
    ) {
        Ok(user) => user,
        Err(Error::DuplicateEmail) => {
            let mut errors = ValidationErrors::default();
            errors.add("email", "This email address is already registered");
            return register_form(&form.email, &errors).into_response();
        }
        Err(error) => {
            tracing::error!("Error creating user: {error}");
            return error.into_response();
        }
    };

    set_auth_cookie(jar.clone(), user.id, state.cookie_duration)
        .map(|updated_jar| {
            (
                StatusCode::SEE_OTHER,
                HxRedirect(endpoints::GOALS_VIEW.to_owned()),
                updated_jar,
            )
        })
        .map_err(|err| {
            tracing::error!("Error setting auth cookie: {err}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                HxRedirect(endpoints::INTERNAL_ERROR_VIEW.to_owned()),
                invalidate_auth_cookie(jar),
            )
        })
        .into_response()
}

#[cfg(test)]
mod register_page_tests {
    use axum::http::{StatusCode, header::CONTENT_TYPE};

    use crate::{
        endpoints,
        test_utils::{assert_valid_html, parse_html_document},
    };

    use super::get_register_page;

    #[tokio::test]
    async fn register_page_displays_form() {
        let response = get_register_page().await;

        assert_eq!(response.status(), StatusCode::OK);
        assert!(
            response
                .headers()
                .get(CONTENT_TYPE)
                .unwrap()
                .to_str()
                .unwrap()
                .starts_with("text/html")
        );

        let document = parse_html_document(response).await;
        assert_valid_html(&document);

        let form_selector = scraper::Selector::parse("form").unwrap();
        let forms = document.select(&form_selector).collect::<Vec<_>>();
        assert_eq!(forms.len(), 1, "want 1 form, got {}", forms.len());
        let form = forms.first().unwrap();
        assert_eq!(form.value().attr("hx-post"), Some(endpoints::USERS));

        let password_selector = scraper::Selector::parse("input[type=password]").unwrap();
        let password_inputs = form.select(&password_selector).collect::<Vec<_>>();
        assert_eq!(
            password_inputs.len(),
            2,
            "want password and confirm password inputs, got {}",
            password_inputs.len()
        );
    }
}

#[cfg(test)]
mod register_user_tests {
    use std::sync::{Arc, Mutex};

    use axum::{Router, http::StatusCode, routing::post};
    use axum_htmx::HX_REDIRECT;
    use axum_test::TestServer;
    use rusqlite::Connection;
    use scraper::{Html, Selector};

    use crate::{
        app_state::create_cookie_key,
        auth::{cookie::COOKIE_TOKEN, user::create_user_table},
        endpoints,
    };

    use super::{RegisterState, register_user};

    fn get_test_server() -> TestServer {
        let connection =
            Connection::open_in_memory().expect("Could not open in-memory SQLite database");
        create_user_table(&connection).expect("Could not create user table");
        let state = RegisterState::new(
            create_cookie_key("foobar"),
            Arc::new(Mutex::new(connection)),
        );

        let app = Router::new()
            .route(endpoints::USERS, post(register_user))
            .with_state(state);

        TestServer::new(app).expect("Could not create test server.")
    }

    fn field_errors(body: &str, field_id: &str) -> Vec<String> {
        let fragment = Html::parse_fragment(body);
        let selector =
            Selector::parse(&format!("input#{field_id} + p.text-red-500.text-base")).unwrap();

        fragment
            .select(&selector)
            .map(|error| error.text().collect::<String>().trim().to_owned())
            .collect()
    }

    #[tokio::test]
    async fn register_succeeds_and_logs_in() {
        let server = get_test_server();
        let form = [
            ("email", "jane@example.com"),
            ("password", "hunter22"),
            ("confirm_password", "hunter22"),
        ];

        let response = server.post(endpoints::USERS).form(&form).await;

        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(response.header(HX_REDIRECT), endpoints::GOALS_VIEW);
        assert!(!response.cookie(COOKIE_TOKEN).value().is_empty());
    }

    #[tokio::test]
    async fn register_fails_with_mismatched_passwords() {
        let server = get_test_server();
        let form = [
            ("email", "jane@example.com"),
            ("password", "hunter22"),
            ("confirm_password", "hunter23"),
        ];

        let response = server.post(endpoints::USERS).form(&form).await;

        response.assert_status_ok();
        let errors = field_errors(&response.text(), "confirm-password");
        assert_eq!(errors, vec!["Passwords do not match".to_owned()]);
    }

    #[tokio::test]
    async fn register_fails_with_short_password() {
        let server = get_test_server();
        let form = [
            ("email", "jane@example.com"),
            ("password", "abc"),
            ("confirm_password", "abc"),
        ];

        let response = server.post(endpoints::USERS).form(&form).await;

        response.assert_status_ok();
        let errors = field_errors(&response.text(), "password");
        assert_eq!(
            errors,
            vec!["Password must be at least 6 characters".to_owned()]
        );
    }

    #[tokio::test]
    async fn register_fails_with_invalid_email() {
        let server = get_test_server();
        let form = [
            ("email", "not-an-email"),
            ("password", "hunter22"),
            ("confirm_password", "hunter22"),
        ];

        let response = server.post(endpoints::USERS).form(&form).await;

        response.assert_status_ok();
        let errors = field_errors(&response.text(), "email");
        assert_eq!(errors, vec!["Enter a valid email address".to_owned()]);
    }

    #[tokio::test]
    async fn register_fails_with_duplicate_email() {
        let server = get_test_server();
        let form = [
            ("email", "jane@example.com"),
            ("password", "hunter22"),
            ("confirm_password", "hunter22"),
        ];
        server
            .post(endpoints::USERS)
            .form(&form)
            .await
            .assert_status(StatusCode::SEE_OTHER);

        let response = server.post(endpoints::USERS).form(&form).await;

        response.assert_status_ok();
        let errors = field_errors(&response.text(), "email");
        assert_eq!(
            errors,
            vec!["This email address is already registered".to_owned()]
        );
    }
}
