//! CRUD operations against one Salesforce table.
//!
//! Every transport failure is passed through [`classify`] exactly once, at
//! the call site, so callers only ever see [`Error`].

use serde_json::Value;

use crate::client::wire::SaveResponse;
use crate::client::{
    self, Method, Order, QueryResult, Record, SalesforceClient, SaveResult, SoqlQuery, SoqlValue,
};
use crate::error::{Error, classify};

impl SalesforceClient {
    /// Operate on the table (sObject type) called `name`.
    pub fn table(&self, name: &str) -> TableService<'_> {
        TableService::new(self, name)
    }
}

/// Typed access to one remote table.
///
/// Holds a base query that the builder methods narrow; `find`, `find_many`
/// and `get` run on top of it.
#[derive(Debug, Clone)]
pub struct TableService<'a> {
    client: &'a SalesforceClient,
    query: SoqlQuery,
}

impl<'a> TableService<'a> {
    pub fn new(client: &'a SalesforceClient, table: &str) -> Self {
        Self {
            client,
            query: SoqlQuery::new(table),
        }
    }

    /// Table name.
    pub fn name(&self) -> &str {
        self.query.table()
    }

    /// The base query as it stands.
    pub fn query(&self) -> &SoqlQuery {
        &self.query
    }

    // ── Query building ──────────────────────────────────────────────────

    /// Replace the projection. An empty list keeps `Id`.
    pub fn select<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.query.set_fields(fields);
        self
    }

    pub fn where_eq(mut self, field: &str, value: impl Into<SoqlValue>) -> Self {
        self.query.push_eq(field, value);
        self
    }

    pub fn where_in<I, V>(mut self, field: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<SoqlValue>,
    {
        self.query.push_in(field, values);
        self
    }

    pub fn order_by(mut self, field: &str, order: Order) -> Self {
        self.query.push_order(field, order);
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.query.limit = Some(limit);
        self
    }

    // ── Reads ───────────────────────────────────────────────────────────

    /// First record where `field_name = id`.
    ///
    /// String ids are quoted in the SOQL, numeric ones are not.
    pub async fn find(&self, id: impl Into<SoqlValue>, field_name: &str) -> Result<Record, Error> {
        let id = id.into();
        let shown = id.to_plain();
        let mut query = self.query.clone();
        query.push_eq(field_name, id);

        let result = self.run(&query).await?;
        result.records.into_iter().next().ok_or_else(|| {
            Error::NotFound(format!("A record with the ID '{shown}' could not be found"))
        })
    }

    /// Shorthand for `find(id, "Id")`.
    pub async fn find_by_id(&self, id: &str) -> Result<Record, Error> {
        self.find(id, "Id").await
    }

    /// All records where `field_name IN (ids)`.
    pub async fn find_many<I, V>(&self, ids: I, field_name: &str) -> Result<Vec<Record>, Error>
    where
        I: IntoIterator<Item = V>,
        V: Into<SoqlValue>,
    {
        let mut query = self.query.clone();
        query.push_in(field_name, ids);

        let result = self.run(&query).await?;
        if result.records.is_empty() {
            return Err(Error::NotFound(
                "No record(s) with the specified ID(s) could be found".to_string(),
            ));
        }
        Ok(result.records)
    }

    /// Run the base query. Returns only the first batch.
    pub async fn get(&self) -> Result<QueryResult, Error> {
        self.run(&self.query).await
    }

    /// Run the base query and follow `nextRecordsUrl` until done.
    pub async fn get_all(&self) -> Result<Vec<Record>, Error> {
        let mut result = self.get().await?;
        let mut records = std::mem::take(&mut result.records);

        while !result.done {
            let Some(next) = result.next_records_url.take() else {
                break;
            };
            tracing::debug!(table = self.name(), %next, "fetching next batch");
            result = self.client.query_more(&next).await.map_err(classify)?;
            records.append(&mut result.records);
        }
        Ok(records)
    }

    async fn run(&self, query: &SoqlQuery) -> Result<QueryResult, Error> {
        let soql = query.to_soql();
        tracing::debug!(table = self.name(), %soql, "executing query");
        self.client.query(&soql).await.map_err(classify)
    }

    /// Re-read one record after a write, ignoring filters on the base query.
    async fn refetch(&self, id: &str, field_name: &str) -> Result<Record, Error> {
        let mut query = SoqlQuery::new(self.name());
        query.set_fields(self.query.fields.iter().cloned());
        query.push_eq(field_name, id);

        let result = self.run(&query).await?;
        result.records.into_iter().next().ok_or_else(|| {
            Error::NotFound(format!("A record with the ID '{id}' could not be found"))
        })
    }

    // ── Writes ──────────────────────────────────────────────────────────

    /// Insert a record.
    ///
    /// Returns `None` when Salesforce answers without `success: true` but
    /// also without an error status.
    pub async fn create(&self, data: &Record) -> Result<Option<SaveResult>, Error> {
        let body = self
            .client
            .sobjects(Method::POST, &[self.name()], Some(data))
            .await
            .map_err(classify)?;

        match body {
            Some(body) => self.saved(body).await,
            None => Ok(None),
        }
    }

    /// Patch the record with `id` and return it as re-read.
    pub async fn update(&self, id: &str, data: &Record) -> Result<Record, Error> {
        self.client
            .sobjects(Method::PATCH, &[self.name(), id], Some(data))
            .await
            .map_err(classify)?;

        self.refetch(id, "Id").await
    }

    /// Upsert keyed on the external id `field = id`.
    ///
    /// Same `None` contract as [`create`](Self::create). Older API versions
    /// answer an update with 204 and no body; the record is then re-read by
    /// the external id.
    pub async fn create_or_update(
        &self,
        field: &str,
        id: &str,
        data: &Record,
    ) -> Result<Option<SaveResult>, Error> {
        let body = self
            .client
            .sobjects(Method::PATCH, &[self.name(), field, id], Some(data))
            .await
            .map_err(classify)?;

        match body {
            Some(body) => self.saved(body).await,
            None => {
                let data = self.refetch(id, field).await?;
                let id = record_id(&data)?;
                Ok(Some(SaveResult {
                    id,
                    created: Some(false),
                    data,
                }))
            }
        }
    }

    /// Delete the record with `id`.
    pub async fn delete(&self, id: &str) -> Result<bool, Error> {
        self.client
            .sobjects(Method::DELETE, &[self.name(), id], None)
            .await
            .map_err(classify)?;
        Ok(true)
    }

    async fn saved(&self, body: Value) -> Result<Option<SaveResult>, Error> {
        // A body we cannot read as a save result counts as "no success".
        let response: SaveResponse = match serde_json::from_value(body) {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(table = self.name(), error = %e, "unreadable save response");
                return Ok(None);
            }
        };

        if !response.success {
            tracing::warn!(
                table = self.name(),
                errors = ?response.errors,
                "save reported no success"
            );
            return Ok(None);
        }

        let id = response.id.ok_or_else(|| {
            Error::Client(client::Error::UnexpectedResponse(
                "save succeeded without an id".to_string(),
            ))
        })?;
        let data = self.refetch(&id, "Id").await?;
        Ok(Some(SaveResult {
            id,
            created: response.created,
            data,
        }))
    }
}

fn record_id(record: &Record) -> Result<String, Error> {
    record
        .get("Id")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| {
            Error::Client(client::Error::UnexpectedResponse(
                "record has no Id field".to_string(),
            ))
        })
}
