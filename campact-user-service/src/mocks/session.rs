use crate::mocks::MatchExtension;
use crate::session::SESSIONS_PATH;
use mockito::{Mock, Server};
use serde_json::Value;

/// Mock the session document of `cookie_name=session_id`.
pub fn get_session(
    server: &mut Server,
    cookie_name: &str,
    session_id: &str,
    session: &Value,
) -> Mock {
    server
        .mock("GET", SESSIONS_PATH)
        .match_session_cookie(cookie_name, session_id)
        .with_status(200)
        .with_header("Content-Type", "application/json")
        .with_body(session.to_string())
        .create()
}

/// Mock an unknown session.
pub fn get_session_not_found(server: &mut Server, cookie_name: &str, session_id: &str) -> Mock {
    server
        .mock("GET", SESSIONS_PATH)
        .match_session_cookie(cookie_name, session_id)
        .with_status(404)
        .create()
}

/// Mock the deletion of `cookie_name=session_id`, answering with `status`.
pub fn delete_session(
    server: &mut Server,
    cookie_name: &str,
    session_id: &str,
    status: usize,
) -> Mock {
    server
        .mock("DELETE", SESSIONS_PATH)
        .match_session_cookie(cookie_name, session_id)
        .with_status(status)
        .create()
}
