//! Table-level errors and the mapping from Salesforce error codes.
//!
//! A failing REST call comes back as [`client::Error::Api`] whose message is
//! the raw response body, normally a JSON array such as
//! `[{"errorCode":"MALFORMED_ID","message":"..."}]`. [`classify`] reads the
//! first element and turns known codes into typed variants; everything it
//! cannot place is handed back as [`Error::Client`].

use serde_json::Value;

use crate::client;
use crate::client::wire::ErrorPayload;

/// Errors returned by [`TableService`](crate::TableService).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No record matched, or the remote reported `NOT_FOUND`.
    #[error("not found: {0}")]
    NotFound(String),

    /// The record exists but is in the recycle bin.
    #[error("entity is deleted: {0}")]
    EntityIsDeleted(String),

    /// A lookup or master-detail value points at an invalid record.
    #[error("invalid cross reference key: {0}")]
    InvalidCrossReference(String),

    /// Bad field name or an operator the field does not support.
    #[error("invalid field: {0}")]
    InvalidField(String),

    #[error("required field missing: {0}")]
    RequiredFieldMissing(String),

    #[error("malformed query: {0}")]
    MalformedQuery(String),

    #[error("malformed id: {0}")]
    MalformedId(String),

    /// The error body was not JSON. Carries the raw body.
    #[error("error message received was not valid JSON. Message: {0}")]
    JsonParse(String),

    /// A transport error that could not be classified.
    #[error(transparent)]
    Client(client::Error),
}

impl Error {
    /// Kind of a code-mapped error, `None` for `JsonParse` and `Client`.
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            Error::NotFound(_) => Some(ErrorKind::NotFound),
            Error::EntityIsDeleted(_) => Some(ErrorKind::EntityIsDeleted),
            Error::InvalidCrossReference(_) => Some(ErrorKind::InvalidCrossReference),
            Error::InvalidField(_) => Some(ErrorKind::InvalidField),
            Error::RequiredFieldMissing(_) => Some(ErrorKind::RequiredFieldMissing),
            Error::MalformedQuery(_) => Some(ErrorKind::MalformedQuery),
            Error::MalformedId(_) => Some(ErrorKind::MalformedId),
            Error::JsonParse(_) | Error::Client(_) => None,
        }
    }
}

/// The error categories a Salesforce `errorCode` can be mapped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotFound,
    EntityIsDeleted,
    InvalidCrossReference,
    InvalidField,
    RequiredFieldMissing,
    MalformedQuery,
    MalformedId,
}

/// Salesforce `errorCode` values with a typed counterpart.
pub const REMOTE_ERROR_CODES: &[(&str, ErrorKind)] = &[
    ("ENTITY_IS_DELETED", ErrorKind::EntityIsDeleted),
    ("INVALID_CROSS_REFERENCE_KEY", ErrorKind::InvalidCrossReference),
    ("INVALID_ID_FIELD", ErrorKind::InvalidField),
    ("INVALID_QUERY_FILTER_OPERATOR", ErrorKind::InvalidField),
    ("REQUIRED_FIELD_MISSING", ErrorKind::RequiredFieldMissing),
    ("MALFORMED_QUERY", ErrorKind::MalformedQuery),
    ("MALFORMED_ID", ErrorKind::MalformedId),
    ("NOT_FOUND", ErrorKind::NotFound),
];

impl ErrorKind {
    /// Look up a remote error code.
    pub fn from_code(code: &str) -> Option<Self> {
        REMOTE_ERROR_CODES
            .iter()
            .find(|(known, _)| *known == code)
            .map(|(_, kind)| *kind)
    }

    /// Build the matching [`Error`] variant.
    pub fn into_error(self, message: String) -> Error {
        match self {
            ErrorKind::NotFound => Error::NotFound(message),
            ErrorKind::EntityIsDeleted => Error::EntityIsDeleted(message),
            ErrorKind::InvalidCrossReference => Error::InvalidCrossReference(message),
            ErrorKind::InvalidField => Error::InvalidField(message),
            ErrorKind::RequiredFieldMissing => Error::RequiredFieldMissing(message),
            ErrorKind::MalformedQuery => Error::MalformedQuery(message),
            ErrorKind::MalformedId => Error::MalformedId(message),
        }
    }
}

/// Map a transport error onto the table-level taxonomy.
///
/// Only [`client::Error::Api`] bodies are inspected. A body that is not JSON
/// becomes [`Error::JsonParse`]; an empty body, an unexpected shape, a
/// missing `errorCode` or an unknown code leaves the original error intact.
pub fn classify(err: client::Error) -> Error {
    let raw = match &err {
        client::Error::Api { message, .. } => message.clone(),
        _ => return Error::Client(err),
    };

    let decoded: Value = match serde_json::from_str(&raw) {
        Ok(value) => value,
        Err(_) => return Error::JsonParse(raw),
    };

    if is_falsy(&decoded) {
        return Error::Client(err);
    }

    // Only the first element has to be an error object.
    let first = match decoded {
        Value::Array(items) => items
            .into_iter()
            .next()
            .and_then(|item| serde_json::from_value::<ErrorPayload>(item).ok()),
        _ => None,
    };

    let Some(ErrorPayload {
        error_code: Some(code),
        message,
    }) = first
    else {
        return Error::Client(err);
    };

    match ErrorKind::from_code(&code) {
        Some(kind) => {
            let message = format_message(&message.unwrap_or_default());
            tracing::warn!(%code, ?kind, %message, "classified Salesforce error");
            kind.into_error(message)
        }
        None => Error::Client(err),
    }
}

/// Salesforce messages embed literal `\n` sequences; flatten them.
fn format_message(message: &str) -> String {
    message.replace("\\n", " - ")
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty() || s == "0",
        Value::Array(items) => items.is_empty(),
        Value::Object(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api(message: &str) -> client::Error {
        client::Error::Api {
            status: 400,
            message: message.to_string(),
        }
    }

    fn body(code: &str, message: &str) -> String {
        serde_json::json!([{ "errorCode": code, "message": message }]).to_string()
    }

    #[test]
    fn every_known_code_maps_to_its_kind() {
        for (code, kind) in REMOTE_ERROR_CODES {
            let err = classify(api(&body(code, r"first\nsecond")));
            assert_eq!(err.kind(), Some(*kind), "code {code}");
            assert!(
                err.to_string().ends_with("first - second"),
                "code {code}: {err}"
            );
        }
    }

    #[test]
    fn malformed_id_message_is_flattened() {
        let err = classify(api(r#"[{"errorCode":"MALFORMED_ID","message":"bad\\nid"}]"#));
        assert!(
            matches!(err, Error::MalformedId(ref m) if m == "bad - id"),
            "expected MalformedId, got: {err:?}"
        );
    }

    #[test]
    fn both_invalid_field_codes_share_a_kind() {
        assert_eq!(
            ErrorKind::from_code("INVALID_ID_FIELD"),
            Some(ErrorKind::InvalidField)
        );
        assert_eq!(
            ErrorKind::from_code("INVALID_QUERY_FILTER_OPERATOR"),
            Some(ErrorKind::InvalidField)
        );
    }

    #[test]
    fn real_newlines_are_left_alone() {
        let err = classify(api(&body("NOT_FOUND", "line one\nline two")));
        assert!(matches!(err, Error::NotFound(ref m) if m == "line one\nline two"));
    }

    #[test]
    fn unknown_code_passes_through() {
        let raw = body("INVALID_SESSION_ID", "Session expired or invalid");
        let err = classify(api(&raw));
        assert!(
            matches!(err, Error::Client(client::Error::Api { ref message, status: 400 }) if *message == raw),
            "expected passthrough, got: {err:?}"
        );
    }

    #[test]
    fn missing_error_code_passes_through() {
        let err = classify(api(r#"[{"message":"something"}]"#));
        assert!(matches!(err, Error::Client(client::Error::Api { .. })));
    }

    #[test]
    fn non_json_body_is_a_parse_error() {
        let err = classify(api("<html>Service Unavailable</html>"));
        assert!(
            matches!(err, Error::JsonParse(ref m) if m == "<html>Service Unavailable</html>"),
            "expected JsonParse, got: {err:?}"
        );
    }

    #[test]
    fn empty_body_is_a_parse_error() {
        assert!(matches!(classify(api("")), Error::JsonParse(_)));
    }

    #[test]
    fn empty_array_passes_through() {
        let err = classify(api("[]"));
        assert!(matches!(
            err,
            Error::Client(client::Error::Api { ref message, .. }) if message == "[]"
        ));
    }

    #[test]
    fn falsy_scalars_pass_through() {
        for raw in ["null", "false", "0", "\"\"", "\"0\""] {
            let err = classify(api(raw));
            assert!(matches!(err, Error::Client(_)), "{raw}: {err:?}");
        }
    }

    #[test]
    fn object_body_passes_through() {
        let err = classify(api(r#"{"error":"invalid_grant"}"#));
        assert!(matches!(err, Error::Client(client::Error::Api { .. })));
    }

    #[test]
    fn only_the_first_error_is_used() {
        let raw = serde_json::json!([
            { "errorCode": "REQUIRED_FIELD_MISSING", "message": "Name" },
            { "errorCode": "MALFORMED_ID", "message": "ignored" }
        ])
        .to_string();
        assert!(matches!(
            classify(api(&raw)),
            Error::RequiredFieldMissing(ref m) if m == "Name"
        ));
    }

    #[test]
    fn trailing_elements_of_another_shape_are_ignored() {
        let err = classify(api(r#"[{"errorCode":"MALFORMED_ID","message":"bad"}, "extra"]"#));
        assert!(
            matches!(err, Error::MalformedId(ref m) if m == "bad"),
            "expected MalformedId, got: {err:?}"
        );
    }

    #[test]
    fn null_message_classifies_with_empty_text() {
        let err = classify(api(r#"[{"errorCode":"MALFORMED_ID","message":null}]"#));
        assert!(
            matches!(err, Error::MalformedId(ref m) if m.is_empty()),
            "expected MalformedId, got: {err:?}"
        );
    }

    #[test]
    fn first_element_not_an_object_passes_through() {
        let err = classify(api(r#"["oops", {"errorCode":"MALFORMED_ID","message":"x"}]"#));
        assert!(matches!(err, Error::Client(client::Error::Api { .. })));
    }

    #[test]
    fn non_api_errors_are_not_inspected() {
        let err = classify(client::Error::UnexpectedResponse("x".into()));
        assert!(matches!(
            err,
            Error::Client(client::Error::UnexpectedResponse(_))
        ));
    }

    #[test]
    fn kind_is_none_for_unclassified_errors() {
        assert_eq!(Error::JsonParse("x".into()).kind(), None);
        assert_eq!(classify(api("[]")).kind(), None);
    }
}
