//! Wire types exchanged between the gateway and its clients

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// One result row: column name to normalized value, in column order
pub type Row = serde_json::Map<String, Value>;

// ============================================================================
// Requests
// ============================================================================

/// Body of `POST /api/query`
///
/// The server reads the body loosely so that a wrongly typed `sql` or
/// `params` still gets an envelope; this is the shape clients send.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueryRequest {
    #[serde(default)]
    pub sql: Option<String>,
    #[serde(default)]
    pub params: Option<Vec<Value>>,
}

impl QueryRequest {
    pub fn new(sql: impl Into<String>, params: Vec<Value>) -> Self {
        Self {
            sql: Some(sql.into()),
            params: Some(params),
        }
    }
}

/// Body of `POST /api/reports/:name`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportRequest {
    #[serde(default)]
    pub params: Vec<Value>,
}

// ============================================================================
// Envelopes
// ============================================================================

/// Result of a query: success flag, rows, columns, timing and error
///
/// On failure `data` and `columns` are null and `error` is set; on success
/// `error` is null.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryEnvelope {
    pub success: bool,
    pub data: Option<Vec<Row>>,
    pub columns: Option<Vec<String>>,
    pub error: Option<String>,
    /// Wall-clock seconds spent executing and fetching
    pub execution_time: f64,
    pub row_count: usize,
}

impl QueryEnvelope {
    pub fn success(data: Vec<Row>, columns: Vec<String>, execution_time: f64) -> Self {
        Self {
            success: true,
            row_count: data.len(),
            data: Some(data),
            columns: Some(columns),
            error: None,
            execution_time,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            columns: None,
            error: Some(error.into()),
            execution_time: 0.0,
            row_count: 0,
        }
    }
}

/// One column as reported by the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSchema {
    pub name: String,
    /// Declared type, e.g. `varchar(64)` or `int unsigned`
    #[serde(rename = "type")]
    pub data_type: String,
    pub nullable: bool,
    /// Key role: `PRI`, `UNI`, `MUL` or empty
    pub key: String,
    pub default: Option<String>,
    pub comment: Option<String>,
}

/// One table with its comment and columns in physical order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSchema {
    pub comment: Option<String>,
    pub columns: Vec<ColumnSchema>,
}

/// Result of schema introspection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaEnvelope {
    pub success: bool,
    pub tables: BTreeMap<String, TableSchema>,
    pub error: Option<String>,
}

impl SchemaEnvelope {
    pub fn success(tables: BTreeMap<String, TableSchema>) -> Self {
        Self {
            success: true,
            tables,
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            tables: BTreeMap::new(),
            error: Some(error.into()),
        }
    }
}

/// Body of `GET /api/health`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub success: bool,
    pub message: String,
}

/// Catalogue entry returned by `GET /api/reports`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportInfo {
    pub name: String,
    pub description: String,
    pub params: Vec<String>,
}
