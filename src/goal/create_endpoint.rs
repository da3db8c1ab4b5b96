//! Defines the route handler that creates a new savings goal.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Form,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    auth::UserID,
    endpoints,
    goal::{create_goal, create_page::goal_form},
    validation::validate_goal_input,
};

/// The state needed to create a savings goal.
#[derive(Clone)]
pub struct CreateGoalEndpointState {
    /// The app's SQLite database connection.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateGoalEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The raw data entered by the user in the new goal form.
///
/// The target is kept as a string so that a malformed number is reported as a
/// validation error against the target field instead of a 422 response.
#[derive(Clone, Deserialize)]
pub struct NewGoalForm {
    /// The goal's display name.
    pub title: String,
    /// The amount of money the user wants to save, as entered.
    pub target: String,
}

/// Handle new goal form submissions.
///
/// On success the client is redirected to the goals page. If validation
/// fails the form is re-rendered with error messages against the offending
/// fields and the user's input preserved.
pub async fn create_goal_endpoint(
    State(state): State<CreateGoalEndpointState>,
    Extension(user_id): Extension<UserID>,
    Form(new_goal): Form<NewGoalForm>,
) -> Response {
    let title = new_goal.title.trim();
    let target = new_goal.target.trim().parse::<f64>().ok();

    let errors = validate_goal_input(title, target);
    if !errors.is_empty() {
        return goal_form(title, &new_goal.target, &errors).into_response();
    }

    // Validation guarantees the target parsed.
    let Some(target) = target else {
        return goal_form(title, &new_goal.target, &errors).into_response();
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match create_goal(user_id, title, target, &connection) {
        Ok(goal) => {
            tracing::info!("created goal {} for user {}", goal.id, user_id);
            (
                HxRedirect(endpoints::GOALS_VIEW.to_owned()),
                StatusCode::SEE_OTHER,
            )
                .into_response()
        }
        Err(error) => {
            tracing::error!("An unexpected error occurred while creating a goal: {error}");
            error.into_alert_response()
        }
    }
}

#[cfg(test)]
mod create_goal_endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::{Router, extract::Request, http::StatusCode, middleware, routing::post};
    use axum_htmx::HX_REDIRECT;
    use axum_test::TestServer;
    use rusqlite::Connection;
    use scraper::{Html, Selector};

    use crate::{
        auth::{PasswordHash, UserID, create_user},
        db::initialize,
        endpoints,
        goal::list_goals_with_history,
    };

    use super::{CreateGoalEndpointState, create_goal_endpoint};

    fn get_test_server() -> (TestServer, CreateGoalEndpointState, UserID) {
        let connection =
            Connection::open_in_memory().expect("Could not open in-memory SQLite database");
        initialize(&connection).expect("Could not initialize database");
        let user = create_user(
            "jane@example.com",
            PasswordHash::new_unchecked("hunter2"),
            &connection,
        )
        .expect("Could not create test user");

        let state = CreateGoalEndpointState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let user_id = user.id;
        let app = Router::new()
            .route(endpoints::GOALS_API, post(create_goal_endpoint))
            .layer(middleware::from_fn(
                move |mut request: Request, next: middleware::Next| async move {
                    request.extensions_mut().insert(user_id);
                    next.run(request).await
                },
            ))
            .with_state(state.clone());

        let server = TestServer::new(app).expect("Could not create test server.");

        (server, state, user_id)
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
    async fn create_goal_succeeds_and_redirects() {
        let (server, state, user_id) = get_test_server();
        let form = [("title", "Emergency fund"), ("target", "5000")];

        let response = server.post(endpoints::GOALS_API).form(&form).await;

        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(response.header(HX_REDIRECT), endpoints::GOALS_VIEW);

        let connection = state.db_connection.lock().unwrap();
        let goals = list_goals_with_history(user_id, &connection).unwrap();
        assert_eq!(goals.len(), 1);
        assert_eq!(goals[0].goal.title, "Emergency fund");
        assert_eq!(goals[0].goal.target, 5000.0);
    }

    #[tokio::test]
    async fn create_goal_rejects_empty_title() {
        let (server, state, user_id) = get_test_server();
        let form = [("title", ""), ("target", "5000")];

        let response = server.post(endpoints::GOALS_API).form(&form).await;

        response.assert_status_ok();
        let errors = field_errors(&response.text(), "title");
        assert_eq!(errors, vec!["Title is required".to_owned()]);

        let connection = state.db_connection.lock().unwrap();
        assert!(
            list_goals_with_history(user_id, &connection)
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn create_goal_rejects_zero_target() {
        let (server, _, _) = get_test_server();
        let form = [("title", "Emergency fund"), ("target", "0")];

        let response = server.post(endpoints::GOALS_API).form(&form).await;

        response.assert_status_ok();
        let errors = field_errors(&response.text(), "target");
        assert_eq!(errors, vec!["Target must be at least $0.01".to_owned()]);
    }

    #[tokio::test]
    async fn create_goal_rejects_unparseable_target() {
        let (server, _, _) = get_test_server();
        let form = [("title", "Emergency fund"), ("target", "lots")];

        let response = server.post(endpoints::GOALS_API).form(&form).await;

        response.assert_status_ok();
        let errors = field_errors(&response.text(), "target");
        assert_eq!(errors, vec!["Target must be a number".to_owned()]);
    }

    #[tokio::test]
    async fn create_goal_preserves_input_on_error() {
        let (server, _, _) = get_test_server();
        let form = [("title", "Emergency fund"), ("target", "-5")];

        let response = server.post(endpoints::GOALS_API).form(&form).await;

        response.assert_status_ok();
        let fragment = Html::parse_fragment(&response.text());
        let title_selector = Selector::parse("input#title").unwrap();
        let title_input = fragment.select(&title_selector).next().unwrap();
        assert_eq!(title_input.value().attr("value"), Some("Emergency fund"));
    }
}
