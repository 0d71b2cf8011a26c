#![allow(dead_code)]

use campact_user_service::mocks;
use campact_user_service::{Account, HttpClient, Session};
use std::sync::Arc;

pub const SESSION_ID: &str = "123456abcdef";
pub const SESSION_COOKIE_NAME: &str = "cus-session";
pub const USER_ID: &str = "test@example.org";

/// Create a mock server and a client pointing at it.
pub fn new_mock_client_and_server() -> (Arc<HttpClient>, mocks::mockito::Server) {
    let server = mocks::new();
    let client = HttpClient::new(mocks::config(&server)).expect("Failed to build client");
    (Arc::new(client), server)
}

pub fn new_session(client: Arc<HttpClient>) -> Session {
    Session::new(client, SESSION_ID, SESSION_COOKIE_NAME)
}

pub fn new_account(client: Arc<HttpClient>) -> Account {
    Account::new(client, USER_ID)
}
