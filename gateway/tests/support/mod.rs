//! In-memory stand-in for a MySQL server
//!
//! Answers registered statements and the two catalog queries, records what
//! was executed, and can drop or refuse connections on demand.

#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use sql_gateway::{
    AppState, BlocklistValidator, Connector, DbValue, GatewayError, GatewayResult, ResultSet,
    Session,
};

#[derive(Default)]
struct FakeState {
    /// Sessions opened under an older generation report themselves closed
    generation: u64,
    refuse_connections: bool,
    fail_catalog: bool,
    connects: usize,
    in_flight: usize,
    max_in_flight: usize,
    executed: Vec<(String, Vec<Value>)>,
    responses: HashMap<String, ResultSet>,
    tables: Vec<FakeTable>,
}

struct FakeTable {
    name: String,
    comment: Option<String>,
    columns: Vec<Vec<DbValue>>,
}

/// Shared handle to the fake server
#[derive(Clone, Default)]
pub struct FakeDatabase {
    state: Arc<Mutex<FakeState>>,
}

impl FakeDatabase {
    /// A fake that answers `SELECT 1 AS x`
    pub fn new() -> Self {
        Self::default().with_response(
            "SELECT 1 AS x",
            ResultSet {
                columns: vec!["x".to_string()],
                rows: vec![vec![DbValue::Int(1)]],
            },
        )
    }

    pub fn with_response(self, sql: &str, result: ResultSet) -> Self {
        self.state
            .lock()
            .unwrap()
            .responses
            .insert(sql.trim().to_string(), result);
        self
    }

    /// Add a table; each column row is
    /// `[name, type, is_nullable, key, default, comment]`
    pub fn with_table(self, name: &str, comment: Option<&str>, columns: Vec<Vec<DbValue>>) -> Self {
        self.state.lock().unwrap().tables.push(FakeTable {
            name: name.to_string(),
            comment: comment.map(str::to_string),
            columns,
        });
        self
    }

    pub fn connector(&self) -> Arc<dyn Connector> {
        Arc::new(FakeConnector {
            state: self.state.clone(),
        })
    }

    /// Gateway state wired to this fake with the default validator
    pub fn app_state(&self, database: &str) -> AppState {
        AppState::new(self.connector(), Arc::new(BlocklistValidator::new()), database)
    }

    pub fn connects(&self) -> usize {
        self.state.lock().unwrap().connects
    }

    /// Most statements ever running at the same time
    pub fn max_in_flight(&self) -> usize {
        self.state.lock().unwrap().max_in_flight
    }

    pub fn executed(&self) -> Vec<(String, Vec<Value>)> {
        self.state.lock().unwrap().executed.clone()
    }

    /// Close every open session from the server side
    pub fn kill_sessions(&self) {
        self.state.lock().unwrap().generation += 1;
    }

    pub fn refuse_connections(&self, refuse: bool) {
        self.state.lock().unwrap().refuse_connections = refuse;
    }

    pub fn fail_catalog(&self, fail: bool) {
        self.state.lock().unwrap().fail_catalog = fail;
    }
}

/// Text column row for [`FakeDatabase::with_table`]
pub fn column(
    name: &str,
    data_type: &str,
    nullable: bool,
    key: &str,
    default: Option<&str>,
    comment: &str,
) -> Vec<DbValue> {
    vec![
        DbValue::Text(name.to_string()),
        DbValue::Text(data_type.to_string()),
        DbValue::Text(if nullable { "YES" } else { "NO" }.to_string()),
        DbValue::Text(key.to_string()),
        default
            .map(|d| DbValue::Text(d.to_string()))
            .unwrap_or(DbValue::Null),
        DbValue::Text(comment.to_string()),
    ]
}

struct FakeConnector {
    state: Arc<Mutex<FakeState>>,
}

#[async_trait]
impl Connector for FakeConnector {
    async fn connect(&self) -> GatewayResult<Box<dyn Session>> {
        let mut state = self.state.lock().unwrap();
        if state.refuse_connections {
            return Err(GatewayError::Connection(
                "Can't connect to MySQL server on 'fake'".to_string(),
            ));
        }
        state.connects += 1;
        Ok(Box::new(FakeSession {
            state: self.state.clone(),
            generation: state.generation,
        }))
    }

    fn describe(&self) -> String {
        "fake".to_string()
    }
}

struct FakeSession {
    state: Arc<Mutex<FakeState>>,
    generation: u64,
}

impl FakeSession {
    fn enter(&self) {
        let mut state = self.state.lock().unwrap();
        state.in_flight += 1;
        state.max_in_flight = state.max_in_flight.max(state.in_flight);
    }

    fn leave(&self) {
        self.state.lock().unwrap().in_flight -= 1;
    }

    fn answer(&self, sql: &str, params: &[Value]) -> GatewayResult<ResultSet> {
        let mut state = self.state.lock().unwrap();
        if state.generation != self.generation {
            return Err(GatewayError::Execution(
                "Lost connection to MySQL server during query".to_string(),
            ));
        }
        if let Some(bad) = params.iter().find(|p| p.is_array() || p.is_object()) {
            return Err(GatewayError::UnsupportedParam(bad.to_string()));
        }
        state.executed.push((sql.to_string(), params.to_vec()));

        if sql.contains("information_schema.tables") {
            if state.fail_catalog {
                return Err(GatewayError::Execution(
                    "SELECT command denied to user".to_string(),
                ));
            }
            return Ok(ResultSet {
                columns: vec!["TABLE_NAME".into(), "TABLE_COMMENT".into()],
                rows: state
                    .tables
                    .iter()
                    .map(|t| {
                        vec![
                            DbValue::Text(t.name.clone()),
                            t.comment.clone().map(DbValue::Text).unwrap_or(DbValue::Null),
                        ]
                    })
                    .collect(),
            });
        }

        if sql.contains("information_schema.columns") {
            let table = params.get(1).and_then(Value::as_str).unwrap_or_default();
            let rows = state
                .tables
                .iter()
                .find(|t| t.name == table)
                .map(|t| t.columns.clone())
                .unwrap_or_default();
            return Ok(ResultSet {
                columns: [
                    "COLUMN_NAME",
                    "COLUMN_TYPE",
                    "IS_NULLABLE",
                    "COLUMN_KEY",
                    "COLUMN_DEFAULT",
                    "COLUMN_COMMENT",
                ]
                .iter()
                .map(|c| c.to_string())
                .collect(),
                rows,
            });
        }

        state.responses.get(sql.trim()).cloned().ok_or_else(|| {
            GatewayError::Execution(format!(
                "You have an error in your SQL syntax near '{}'",
                sql.trim()
            ))
        })
    }
}

#[async_trait]
impl Session for FakeSession {
    async fn is_open(&mut self) -> bool {
        self.state.lock().unwrap().generation == self.generation
    }

    async fn fetch(&mut self, sql: &str, params: &[Value]) -> GatewayResult<ResultSet> {
        self.enter();
        // Give other tasks a chance to run while this statement is in flight
        tokio::task::yield_now().await;
        let result = self.answer(sql, params);
        tokio::task::yield_now().await;
        self.leave();
        result
    }

    async fn close(self: Box<Self>) {}
}
