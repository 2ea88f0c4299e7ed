//! Query executor - validation, execution and result shaping
//!
//! Every client statement goes validator → connection check → prepared
//! execution with bound parameters → normalization. Failures at any step
//! end up in the envelope's `error` field; nothing is raised to the caller.

use gateway_common::{QueryEnvelope, Row};
use serde_json::Value;
use std::borrow::Cow;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

use crate::connection::ConnectionManager;
use crate::error::{GatewayError, GatewayResult};
use crate::normalize::normalize;
use crate::session::ResultSet;
use crate::validator::StatementValidator;

/// Rows and timing of one successful execution
#[derive(Debug)]
struct QueryOutput {
    data: Vec<Row>,
    columns: Vec<String>,
    execution_time: f64,
}

/// Runs validated read-only statements on the shared session
pub struct QueryExecutor {
    validator: Arc<dyn StatementValidator>,
    connections: Arc<ConnectionManager>,
}

impl QueryExecutor {
    pub fn new(validator: Arc<dyn StatementValidator>, connections: Arc<ConnectionManager>) -> Self {
        Self {
            validator,
            connections,
        }
    }

    /// Execute a statement and wrap the outcome in a [`QueryEnvelope`]
    pub async fn execute_query(&self, sql: &str, params: &[Value]) -> QueryEnvelope {
        into_envelope(self.run(sql, params).await)
    }

    async fn run(&self, sql: &str, params: &[Value]) -> GatewayResult<QueryOutput> {
        self.validator.check(sql).map_err(GatewayError::Rejected)?;

        let mut slot = self.connections.ensure_connected().await?;
        let session = slot.as_mut().ok_or(GatewayError::NotConnected)?;

        let sql = if params.is_empty() {
            Cow::Borrowed(sql)
        } else {
            positional_placeholders(sql)
        };

        let started = Instant::now();
        let result = session.fetch(&sql, params).await?;
        let (data, columns) = shape_rows(result);
        let execution_time = started.elapsed().as_secs_f64();

        Ok(QueryOutput {
            data,
            columns,
            execution_time,
        })
    }
}

/// Accept format-style placeholders: `%s` becomes `?` and `%%` becomes `%`
///
/// Only applied when parameters are supplied, so a parameterless statement
/// such as `LIKE 'a%s'` reaches the server untouched.
fn positional_placeholders(sql: &str) -> Cow<'_, str> {
    if !sql.contains('%') {
        return Cow::Borrowed(sql);
    }

    let mut out = String::with_capacity(sql.len());
    let mut chars = sql.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '%' {
            match chars.peek() {
                Some('s') => {
                    chars.next();
                    out.push('?');
                    continue;
                }
                Some('%') => {
                    chars.next();
                    out.push('%');
                    continue;
                }
                _ => {}
            }
        }
        out.push(c);
    }
    Cow::Owned(out)
}

/// Turn positional rows into name-keyed rows of normalized values
fn shape_rows(result: ResultSet) -> (Vec<Row>, Vec<String>) {
    let ResultSet { columns, rows } = result;
    let columns = unique_column_names(columns);
    let data = rows
        .iter()
        .map(|cells| {
            columns
                .iter()
                .zip(cells)
                .map(|(name, cell)| (name.clone(), normalize(cell)))
                .collect::<Row>()
        })
        .collect();
    (data, columns)
}

/// Make repeated column names distinct (`id`, `id_2`, `id_3`, ...) so no
/// value of a join is dropped from the keyed rows
fn unique_column_names(columns: Vec<String>) -> Vec<String> {
    let mut taken: HashSet<String> = columns.iter().cloned().collect();
    if taken.len() == columns.len() {
        return columns;
    }

    let mut seen = HashSet::new();
    columns
        .into_iter()
        .map(|name| {
            if seen.insert(name.clone()) {
                return name;
            }
            let mut n = 2;
            loop {
                let candidate = format!("{}_{}", name, n);
                if taken.insert(candidate.clone()) {
                    seen.insert(candidate.clone());
                    return candidate;
                }
                n += 1;
            }
        })
        .collect()
}

/// The one place where query errors become envelopes
fn into_envelope(result: GatewayResult<QueryOutput>) -> QueryEnvelope {
    match result {
        Ok(output) => {
            tracing::info!(
                "Query succeeded, returned {} rows in {:.3} seconds",
                output.data.len(),
                output.execution_time
            );
            QueryEnvelope::success(output.data, output.columns, output.execution_time)
        }
        // Already logged at warn level by the validator
        Err(e @ GatewayError::Rejected(_)) => QueryEnvelope::failure(e.to_string()),
        Err(e) => {
            tracing::error!("Query failed: {}", e);
            QueryEnvelope::failure(e.to_string())
        }
    }
}
