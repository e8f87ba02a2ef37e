//! Internal wire types for serde deserialization.
//!
//! These types match the raw JSON structure from the Salesforce REST API
//! and are not exposed publicly.

use serde::Deserialize;
use serde_json::Value;

/// Body of a `POST sobjects/<table>` or `PATCH sobjects/<table>/<field>/<id>`.
#[derive(Debug, Deserialize)]
pub(crate) struct SaveResponse {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub created: Option<bool>,
    #[serde(default)]
    pub errors: Vec<Value>,
}

/// One element of the error array Salesforce returns with a failing status.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorPayload {
    #[serde(rename = "errorCode", default)]
    pub error_code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}
