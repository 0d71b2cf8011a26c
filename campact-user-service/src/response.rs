//! Classification of the service's responses.

use crate::error::{Error, ResponseError, Result};
use serde_json::Value;

/// Result of a request that did not fail.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// 200 with a json body. An empty body is an empty object.
    Document(Value),
    /// Any other 2xx status.
    Accepted,
    /// 404, or a status outside of the 200..=599 range.
    NotFound,
}

impl Outcome {
    /// Whether the request succeeded.
    #[must_use]
    pub fn is_success(&self) -> bool {
        !matches!(self, Outcome::NotFound)
    }

    /// The document, treating every non document outcome as an empty object.
    #[must_use]
    pub fn into_document(self) -> Value {
        match self {
            Outcome::Document(v) => v,
            Outcome::Accepted | Outcome::NotFound => Value::Object(serde_json::Map::new()),
        }
    }
}

/// Map a status code and body to an [`Outcome`].
///
/// # Errors
/// Returns [`Error::Response`] for 3xx, 5xx and 4xx other than 404, and
/// [`Error::Json`] if a 200 body is not valid utf-8 json.
pub fn classify(status_code: u16, body: &[u8]) -> Result<Outcome> {
    match status_code {
        200 => {
            if body.iter().all(u8::is_ascii_whitespace) {
                return Ok(Outcome::Document(Value::Object(serde_json::Map::new())));
            }
            Ok(Outcome::Document(serde_json::from_slice(body)?))
        }
        201..=299 => Ok(Outcome::Accepted),
        404 => Ok(Outcome::NotFound),
        300..=599 => Err(Error::Response(ResponseError {
            status_code,
            body: String::from_utf8_lossy(body).into_owned(),
        })),
        _ => {
            tracing::warn!("Treating unexpected status {status_code} as not found");
            Ok(Outcome::NotFound)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn ok_parses_json() {
        let outcome = classify(200, br#"{"a_field":"foo","another_field":"bar"}"#);
        assert_eq!(
            outcome.unwrap(),
            Outcome::Document(json!({"a_field": "foo", "another_field": "bar"}))
        );
    }

    #[test]
    fn ok_with_empty_body_is_empty_object() {
        assert_eq!(
            classify(200, b"").unwrap(),
            Outcome::Document(json!({}))
        );
    }

    #[test]
    fn ok_with_invalid_json_fails() {
        assert!(matches!(
            classify(200, b"not json"),
            Err(Error::Json(_))
        ));
    }

    #[test]
    fn ok_with_invalid_utf8_fails() {
        assert!(matches!(
            classify(200, b"{\"a\":\"\xff\xfe\"}"),
            Err(Error::Json(_))
        ));
    }

    #[test]
    fn other_success_is_accepted() {
        for status in 201..=299 {
            assert_eq!(
                classify(status, b"ignored").unwrap(),
                Outcome::Accepted,
                "status {status}"
            );
        }
    }

    #[test]
    fn not_found_is_absent() {
        assert_eq!(
            classify(404, b"nope").unwrap(),
            Outcome::NotFound
        );
    }

    #[test]
    fn error_statuses_carry_status_and_body() {
        for status in (300..=599).filter(|s| *s != 404) {
            let err = classify(status, b"An error occurred").unwrap_err();
            let Error::Response(err) = err else {
                panic!("status {status} did not produce a response error");
            };
            assert_eq!(err.status_code, status);
            assert_eq!(err.body, "An error occurred");
        }
    }

    #[test]
    fn out_of_range_statuses_are_absent() {
        for status in [0, 100, 101, 199, 600, 999] {
            assert_eq!(
                classify(status, b"").unwrap(),
                Outcome::NotFound,
                "status {status}"
            );
        }
    }

    #[test]
    fn outcome_helpers() {
        assert!(Outcome::Accepted.is_success());
        assert!(Outcome::Document(json!({})).is_success());
        assert!(!Outcome::NotFound.is_success());
        assert_eq!(Outcome::NotFound.into_document(), json!({}));
        assert_eq!(Outcome::Accepted.into_document(), json!({}));
        assert_eq!(
            Outcome::Document(json!({"id": 1})).into_document(),
            json!({"id": 1})
        );
    }
}
