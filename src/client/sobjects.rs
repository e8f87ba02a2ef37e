//! `query` and `sobjects` resources.

use serde_json::Value;

use super::error::Error;
use super::types::{QueryResult, Record};
use super::{Method, SalesforceClient};

impl SalesforceClient {
    /// Run a SOQL statement.
    pub async fn query(&self, soql: &str) -> Result<QueryResult, Error> {
        let mut url = self.endpoint(["query"])?;
        url.query_pairs_mut().append_pair("q", soql);
        let resp = self.send(self.request(Method::GET, url)).await?;
        Ok(resp.json().await?)
    }

    /// Fetch the next batch of a query using its `nextRecordsUrl`.
    pub async fn query_more(&self, next_records_url: &str) -> Result<QueryResult, Error> {
        let url = self.resolve(next_records_url)?;
        let resp = self.send(self.request(Method::GET, url)).await?;
        Ok(resp.json().await?)
    }

    /// Call `sobjects/<segments..>` with the given method and optional JSON
    /// body.
    ///
    /// Returns `None` when the server answers without a body, as it does for
    /// successful updates and deletes.
    pub async fn sobjects<S: AsRef<str>>(
        &self,
        method: Method,
        segments: &[S],
        body: Option<&Record>,
    ) -> Result<Option<Value>, Error> {
        let url = self.endpoint(
            std::iter::once("sobjects").chain(segments.iter().map(AsRef::as_ref)),
        )?;
        let mut request = self.request(method, url);
        if let Some(body) = body {
            request = request.json(body);
        }
        let resp = self.send(request).await?;
        Self::optional_json(resp).await
    }
}
