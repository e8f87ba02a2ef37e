//! SOQL query builder.

use std::fmt;

/// A literal on the right-hand side of a SOQL condition.
#[derive(Debug, Clone, PartialEq)]
pub enum SoqlValue {
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Null,
}

impl fmt::Display for SoqlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SoqlValue::String(s) => write!(f, "'{}'", escape(s)),
            SoqlValue::Integer(n) => write!(f, "{n}"),
            SoqlValue::Float(n) => write!(f, "{n}"),
            SoqlValue::Boolean(b) => write!(f, "{b}"),
            SoqlValue::Null => f.write_str("null"),
        }
    }
}

impl SoqlValue {
    /// The value as a user would write it, without SOQL quoting.
    pub fn to_plain(&self) -> String {
        match self {
            SoqlValue::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

/// Escape a string for use inside a single-quoted SOQL literal.
fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out
}

impl From<&str> for SoqlValue {
    fn from(s: &str) -> Self {
        SoqlValue::String(s.to_string())
    }
}

impl From<String> for SoqlValue {
    fn from(s: String) -> Self {
        SoqlValue::String(s)
    }
}

impl From<&String> for SoqlValue {
    fn from(s: &String) -> Self {
        SoqlValue::String(s.clone())
    }
}

impl From<i64> for SoqlValue {
    fn from(n: i64) -> Self {
        SoqlValue::Integer(n)
    }
}

impl From<i32> for SoqlValue {
    fn from(n: i32) -> Self {
        SoqlValue::Integer(n.into())
    }
}

impl From<f64> for SoqlValue {
    fn from(n: f64) -> Self {
        SoqlValue::Float(n)
    }
}

impl From<bool> for SoqlValue {
    fn from(b: bool) -> Self {
        SoqlValue::Boolean(b)
    }
}

/// Sort direction for `ORDER BY`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    Asc,
    Desc,
}

impl Order {
    pub(crate) fn as_str(&self) -> &str {
        match self {
            Order::Asc => "ASC",
            Order::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Condition {
    Eq(String, SoqlValue),
    In(String, Vec<SoqlValue>),
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::Eq(field, value) => write!(f, "{field} = {value}"),
            Condition::In(field, values) => {
                write!(f, "{field} IN (")?;
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{value}")?;
                }
                f.write_str(")")
            }
        }
    }
}

/// A `SELECT .. FROM` statement against one table.
///
/// Renders with [`SoqlQuery::to_soql`] (or `Display`).
#[derive(Debug, Clone, PartialEq)]
pub struct SoqlQuery {
    pub(crate) table: String,
    pub(crate) fields: Vec<String>,
    pub(crate) conditions: Vec<Condition>,
    pub(crate) order_by: Vec<(String, Order)>,
    pub(crate) limit: Option<u64>,
}

impl SoqlQuery {
    /// Start a query selecting `Id` from `table`.
    pub fn new(table: &str) -> Self {
        Self {
            table: table.to_string(),
            fields: vec!["Id".to_string()],
            conditions: Vec::new(),
            order_by: Vec::new(),
            limit: None,
        }
    }

    /// Create a new query builder.
    pub fn builder(table: &str) -> SoqlQueryBuilder {
        SoqlQueryBuilder {
            query: SoqlQuery::new(table),
        }
    }

    /// Table this query reads from.
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Render the statement.
    pub fn to_soql(&self) -> String {
        self.to_string()
    }

    pub(crate) fn set_fields<I, S>(&mut self, fields: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let fields: Vec<String> = fields.into_iter().map(Into::into).collect();
        if !fields.is_empty() {
            self.fields = fields;
        }
    }

    pub(crate) fn push_eq(&mut self, field: &str, value: impl Into<SoqlValue>) {
        self.conditions
            .push(Condition::Eq(field.to_string(), value.into()));
    }

    pub(crate) fn push_in<I, V>(&mut self, field: &str, values: I)
    where
        I: IntoIterator<Item = V>,
        V: Into<SoqlValue>,
    {
        let values = values.into_iter().map(Into::into).collect();
        self.conditions.push(Condition::In(field.to_string(), values));
    }

    pub(crate) fn push_order(&mut self, field: &str, order: Order) {
        self.order_by.push((field.to_string(), order));
    }
}

impl fmt::Display for SoqlQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SELECT {} FROM {}", self.fields.join(", "), self.table)?;

        for (i, condition) in self.conditions.iter().enumerate() {
            let keyword = if i == 0 { "WHERE" } else { "AND" };
            write!(f, " {keyword} {condition}")?;
        }

        if !self.order_by.is_empty() {
            let order: Vec<String> = self
                .order_by
                .iter()
                .map(|(field, dir)| format!("{field} {}", dir.as_str()))
                .collect();
            write!(f, " ORDER BY {}", order.join(", "))?;
        }

        if let Some(limit) = self.limit {
            write!(f, " LIMIT {limit}")?;
        }
        Ok(())
    }
}

/// Builder for [`SoqlQuery`].
pub struct SoqlQueryBuilder {
    query: SoqlQuery,
}

impl SoqlQueryBuilder {
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

    pub fn build(self) -> SoqlQuery {
        self.query
    }
}
