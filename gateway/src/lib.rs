//! SQL Gateway Library
//!
//! A read-only SQL query gateway: validates client statements, executes
//! them against MySQL with bound parameters and returns normalized rows in
//! a uniform envelope. Also introspects the database schema.
//!
//! # Usage as Library
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use sql_gateway::{AppState, BlocklistValidator, GatewayConfig, MySqlConnector};
//!
//! let config = GatewayConfig::load(None)?;
//! let state = AppState::new(
//!     Arc::new(MySqlConnector::new(&config.database)),
//!     Arc::new(BlocklistValidator::new()),
//!     config.database.name.clone(),
//! );
//! let envelope = state.executor.execute_query("SELECT 1 AS x", &[]).await;
//! ```

pub mod config;
pub mod connection;
pub mod error;
pub mod executor;
pub mod mysql;
pub mod normalize;
pub mod reports;
pub mod schema;
pub mod server;
pub mod session;
pub mod validator;

// Re-export the main component types
pub use config::GatewayConfig;
pub use connection::ConnectionManager;
pub use error::{GatewayError, GatewayResult, Rejection};
pub use executor::QueryExecutor;
pub use mysql::MySqlConnector;
pub use normalize::{normalize, DbValue, TimeValue};
pub use schema::SchemaIntrospector;
pub use server::AppState;
pub use session::{Connector, ResultSet, Session};
pub use validator::{BlocklistValidator, StatementValidator};
