//! Typed table-level access to the Salesforce REST API.
//!
//! ```rust,ignore
//! use sftable::{SalesforceClient, Record};
//!
//! let client = SalesforceClient::new("https://acme.my.salesforce.com", token)?;
//! let accounts = client.table("Account").select(["Id", "Name"]);
//!
//! let acme = accounts.find_by_id("001000000000001AAA").await?;
//! let mut data = Record::new();
//! data.insert("Name".into(), "Acme Corp".into());
//! accounts.update("001000000000001AAA", &data).await?;
//! ```
//!
//! Remote failures surface as [`Error`]; known Salesforce error codes become
//! dedicated variants (see [`ErrorKind`]).

pub mod client;
pub mod error;
pub mod table;

pub use client::{
    DEFAULT_API_VERSION, Method, Order, QueryResult, Record, SalesforceClient, SaveResult,
    SoqlQuery, SoqlQueryBuilder, SoqlValue,
};
pub use error::{Error, ErrorKind, classify};
pub use table::TableService;
