//! Driver seam - sessions and the connectors that open them
//!
//! The connection manager only talks to these traits, so the MySQL driver
//! can be swapped for another backend (or an in-memory fake in tests).

use async_trait::async_trait;
use serde_json::Value;

use crate::error::GatewayResult;
use crate::normalize::DbValue;

/// Rows and column names produced by one statement
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSet {
    /// Column names in declaration order, from the statement descriptor
    pub columns: Vec<String>,
    /// Rows in the order the database returned them
    pub rows: Vec<Vec<DbValue>>,
}

/// One live database link
#[async_trait]
pub trait Session: Send {
    /// Returns false once the link is known to be closed
    async fn is_open(&mut self) -> bool;

    /// Execute a statement with positional parameters and fetch every row
    async fn fetch(&mut self, sql: &str, params: &[Value]) -> GatewayResult<ResultSet>;

    /// Release the link
    async fn close(self: Box<Self>);
}

/// Opens new sessions against a configured database
#[async_trait]
pub trait Connector: Send + Sync {
    async fn connect(&self) -> GatewayResult<Box<dyn Session>>;

    /// Human-readable target for logs; never includes credentials
    fn describe(&self) -> String;
}
