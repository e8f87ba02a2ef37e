use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde::Serialize;
use sftable::{Error, Record, SalesforceClient, TableService};

#[derive(Parser, Debug)]
#[command(name = "sftable")]
#[command(about = "Read and write Salesforce records", long_about = None)]
struct Args {
    /// Org instance URL, e.g. https://acme.my.salesforce.com
    #[arg(long, env = "SALESFORCE_INSTANCE_URL")]
    instance_url: String,

    /// OAuth access token
    #[arg(long, env = "SALESFORCE_ACCESS_TOKEN", hide_env_values = true)]
    access_token: String,

    /// REST API version
    #[arg(long, env = "SALESFORCE_API_VERSION", default_value = sftable::DEFAULT_API_VERSION)]
    api_version: String,

    /// Log level
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Table (sObject type) to operate on
    #[arg(short, long)]
    table: String,

    /// Comma-separated fields to read back (default: Id)
    #[arg(long, value_delimiter = ',')]
    fields: Vec<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch one record
    Find {
        id: String,
        /// Field to match the id against
        #[arg(long, default_value = "Id")]
        field: String,
    },
    /// Fetch every record matching any of the ids
    FindMany {
        #[arg(required = true)]
        ids: Vec<String>,
        #[arg(long, default_value = "Id")]
        field: String,
    },
    /// Run a filtered query
    Query {
        /// FIELD=VALUE equality filter, repeatable
        #[arg(long = "where", value_parser = parse_condition)]
        conditions: Vec<(String, String)>,
        #[arg(long)]
        limit: Option<u64>,
        /// Follow pagination to the last batch
        #[arg(long)]
        all: bool,
    },
    /// Insert a record from a JSON object
    Create {
        #[arg(value_parser = parse_record)]
        data: Record,
    },
    /// Patch a record by Id
    Update {
        id: String,
        #[arg(value_parser = parse_record)]
        data: Record,
    },
    /// Insert or update keyed on an external id field
    Upsert {
        field: String,
        id: String,
        #[arg(value_parser = parse_record)]
        data: Record,
    },
    /// Delete a record by Id
    Delete { id: String },
}

fn parse_condition(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((field, value)) if !field.trim().is_empty() => {
            Ok((field.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected FIELD=VALUE, got '{raw}'")),
    }
}

fn parse_record(raw: &str) -> Result<Record, String> {
    serde_json::from_str(raw).map_err(|e| format!("expected a JSON object: {e}"))
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error + Send + Sync>> {
    let args = Args::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(format!("sftable={}", args.log_level).parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let client = SalesforceClient::new(&args.instance_url, args.access_token.as_str())?
        .with_api_version(&args.api_version);

    tracing::debug!(
        instance_url = %client.instance_url(),
        api_version = client.api_version(),
        table = %args.table,
        "Starting sftable"
    );

    let table = client.table(&args.table).select(args.fields.clone());
    match run(table, args.command).await {
        Ok(code) => Ok(code),
        Err(err) => {
            tracing::error!(error = %err, kind = ?err.kind(), "request failed");
            Ok(ExitCode::FAILURE)
        }
    }
}

async fn run(table: TableService<'_>, command: Command) -> Result<ExitCode, Error> {
    match command {
        Command::Find { id, field } => print(&table.find(&id, &field).await?),
        Command::FindMany { ids, field } => print(&table.find_many(&ids, &field).await?),
        Command::Query {
            conditions,
            limit,
            all,
        } => {
            let mut table = table;
            for (field, value) in conditions {
                table = table.where_eq(&field, value);
            }
            if let Some(limit) = limit {
                table = table.limit(limit);
            }
            if all {
                print(&table.get_all().await?)
            } else {
                print(&table.get().await?)
            }
        }
        Command::Create { data } => saved(table.create(&data).await?),
        Command::Update { id, data } => print(&table.update(&id, &data).await?),
        Command::Upsert { field, id, data } => {
            saved(table.create_or_update(&field, &id, &data).await?)
        }
        Command::Delete { id } => print(&table.delete(&id).await?),
    }
}

fn saved<T: Serialize>(result: Option<T>) -> Result<ExitCode, Error> {
    match result {
        Some(result) => print(&result),
        None => {
            println!("false");
            Ok(ExitCode::FAILURE)
        }
    }
}

fn print<T: Serialize>(value: &T) -> Result<ExitCode, Error> {
    let out = serde_json::to_string_pretty(value)
        .map_err(|e| Error::Client(sftable::client::Error::Json(e)))?;
    println!("{out}");
    Ok(ExitCode::SUCCESS)
}
