//! Shared application state

use std::sync::Arc;

use crate::connection::ConnectionManager;
use crate::executor::QueryExecutor;
use crate::schema::SchemaIntrospector;
use crate::session::Connector;
use crate::validator::StatementValidator;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Owner of the single database session
    pub connections: Arc<ConnectionManager>,
    /// Validated query execution
    pub executor: Arc<QueryExecutor>,
    /// Catalog introspection
    pub schema: Arc<SchemaIntrospector>,
}

impl AppState {
    /// Wire the gateway components around one connector
    pub fn new(
        connector: Arc<dyn Connector>,
        validator: Arc<dyn StatementValidator>,
        database: impl Into<String>,
    ) -> Self {
        let connections = Arc::new(ConnectionManager::new(connector));
        let executor = Arc::new(QueryExecutor::new(validator, connections.clone()));
        let schema = Arc::new(SchemaIntrospector::new(connections.clone(), database));

        Self {
            connections,
            executor,
            schema,
        }
    }
}
