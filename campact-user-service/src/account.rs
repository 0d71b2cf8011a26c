use crate::client::{HttpClient, RequestOptions};
use crate::document::{DocumentCell, dig, dig_str};
use crate::error::Result;
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use serde_json::Value;
use std::sync::Arc;

pub(crate) const ACCOUNTS_PATH: &str = "v1/accounts";

const NEWSLETTER_SUBSCRIPTION: &str = "newsletter";
const PREFILL_ALLOWED: &str = "allowed";

/// Characters escaped in a path segment. `@` is kept since user ids are email
/// addresses.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}')
    .add(b'\\')
    .add(b'^')
    .add(b'|');

/// Path of the account document of `user_id`.
pub(crate) fn account_path(user_id: &str) -> String {
    format!(
        "{ACCOUNTS_PATH}/{}",
        utf8_percent_encode(user_id, PATH_SEGMENT)
    )
}

/// User account identified by the user id (an email address).
///
/// The account document is fetched on first access and reused afterwards.
#[derive(Debug)]
pub struct Account {
    client: Arc<HttpClient>,
    user_id: String,
    document: DocumentCell,
}

impl Account {
    #[must_use]
    pub fn new(client: Arc<HttpClient>, user_id: impl Into<String>) -> Self {
        Self {
            client,
            user_id: user_id.into(),
            document: DocumentCell::new(),
        }
    }

    #[must_use]
    pub fn client(&self) -> &Arc<HttpClient> {
        &self.client
    }

    #[must_use]
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Whether the service knows this account.
    ///
    /// # Errors
    /// Returns error if fetching the account failed.
    pub fn exists(&self) -> Result<bool> {
        Ok(dig(&*self.account()?, "/id").is_some())
    }

    /// Name object (first name, last name, title, ...).
    ///
    /// # Errors
    /// Returns error if fetching the account failed.
    pub fn name(&self) -> Result<Option<Value>> {
        self.field("/name")
    }

    /// # Errors
    /// Returns error if fetching the account failed.
    pub fn email(&self) -> Result<Option<String>> {
        Ok(dig_str(&*self.account()?, "/emailaddress/emailaddress"))
    }

    /// Postal address object.
    ///
    /// # Errors
    /// Returns error if fetching the account failed.
    pub fn address(&self) -> Result<Option<Value>> {
        self.field("/postaladdress")
    }

    /// # Errors
    /// Returns error if fetching the account failed.
    pub fn preferences(&self) -> Result<Option<Value>> {
        self.field("/preferences")
    }

    /// Donor class information.
    ///
    /// # Errors
    /// Returns error if fetching the account failed.
    pub fn donor_info(&self) -> Result<Option<Value>> {
        self.field("/donorclass")
    }

    /// Whether one of the email subscriptions is the newsletter.
    ///
    /// # Errors
    /// Returns error if fetching the account failed.
    pub fn subscribed_to_newsletter(&self) -> Result<bool> {
        let account = self.account()?;
        let subscribed = dig(&account, "/emailaddress/subscriptions")
            .and_then(Value::as_array)
            .is_some_and(|subscriptions| {
                subscriptions.iter().any(|subscription| {
                    subscription.get("type").and_then(Value::as_str)
                        == Some(NEWSLETTER_SUBSCRIPTION)
                })
            });
        Ok(subscribed)
    }

    /// Whether the user opted in to having forms prefilled.
    ///
    /// # Errors
    /// Returns error if fetching the account failed.
    pub fn allow_prefill(&self) -> Result<bool> {
        Ok(
            dig_str(&*self.account()?, "/preferences/prefill_forms").as_deref()
                == Some(PREFILL_ALLOWED),
        )
    }

    fn field(&self, pointer: &str) -> Result<Option<Value>> {
        Ok(dig(&*self.account()?, pointer).cloned())
    }

    fn account(&self) -> Result<Arc<Value>> {
        self.document.get_or_fetch(|| {
            Ok(self
                .client
                .get(&account_path(&self.user_id), &RequestOptions::default())?
                .into_document())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_email_is_kept() {
        assert_eq!(
            account_path("test@example.org"),
            "v1/accounts/test@example.org"
        );
    }

    #[test]
    fn slash_is_escaped() {
        assert_eq!(
            account_path("foo@example.com/secrets"),
            "v1/accounts/foo@example.com%2Fsecrets"
        );
    }

    #[test]
    fn control_characters_are_escaped() {
        let path = account_path("\t\r");
        assert_eq!(path, "v1/accounts/%09%0D");
        assert!(!path.bytes().any(|b| b.is_ascii_control()));
    }

    #[test]
    fn traversal_and_query_characters_are_escaped() {
        assert_eq!(
            account_path("../admin?x=1#y"),
            "v1/accounts/..%2Fadmin%3Fx=1%23y"
        );
        assert_eq!(account_path("a b%"), "v1/accounts/a%20b%25");
    }
}
