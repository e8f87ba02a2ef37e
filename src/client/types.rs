//! Public data types for the Salesforce REST API.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One remote entity, keyed by field API name.
///
/// Query results also carry an `attributes` object with the sObject type and
/// resource URL; it is left in place.
pub type Record = Map<String, Value>;

/// Response of the `query` and `queryMore` resources.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResult {
    #[serde(default)]
    pub total_size: u64,
    #[serde(default = "default_done")]
    pub done: bool,
    #[serde(default)]
    pub next_records_url: Option<String>,
    #[serde(default)]
    pub records: Vec<Record>,
}

fn default_done() -> bool {
    true
}

impl QueryResult {
    /// Number of records in this batch.
    pub fn count(&self) -> usize {
        self.records.len()
    }

    /// First record of this batch, if any.
    pub fn first(&self) -> Option<&Record> {
        self.records.first()
    }
}

/// Outcome of a successful create or upsert.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveResult {
    /// Id of the saved record.
    pub id: String,
    /// `true` for an insert, `false` for an update. `None` when the remote
    /// did not say.
    #[serde(default)]
    pub created: Option<bool>,
    /// The record as re-read after the write.
    pub data: Record,
}
