use crate::account::account_path;
use mockito::{Mock, Server};
use serde_json::Value;

/// Mock the account document of `user_id`.
pub fn get_account(server: &mut Server, user_id: &str, account: &Value) -> Mock {
    server
        .mock("GET", format!("/{}", account_path(user_id)).as_str())
        .with_status(200)
        .with_header("Content-Type", "application/json")
        .with_body(account.to_string())
        .create()
}

/// Mock a request on the raw, already encoded, account `path` answering with `status`.
pub fn get_account_path_status(server: &mut Server, path: &str, status: usize) -> Mock {
    server.mock("GET", path).with_status(status).create()
}
