//! Gateway Common - Shared pieces of the SQL gateway and its client
//!
//! - **Types**: request bodies and response envelopes of the HTTP API
//! - **Initialization**: [`init_tracing`] for consistent logging setup

pub mod init;
pub mod types;

// Re-export commonly used items at crate root
pub use init::init_tracing;
pub use types::{
    ColumnSchema, HealthResponse, QueryEnvelope, QueryRequest, ReportInfo, ReportRequest, Row,
    SchemaEnvelope, TableSchema,
};
