//! MySQL sessions backed by sqlx
//!
//! Statements are prepared first so the column list comes from the
//! statement descriptor even when no rows match. Cells are decoded by the
//! server-reported type name into [`DbValue`].

use async_trait::async_trait;
use serde_json::Value;
use sqlx::mysql::types::MySqlTime;
use sqlx::mysql::{MySqlArguments, MySqlColumn, MySqlConnectOptions, MySqlConnection, MySqlRow};
use sqlx::query::Query;
use sqlx::{Column, Connection, Executor, MySql, Row, Statement, TypeInfo, ValueRef};

use crate::config::DatabaseConfig;
use crate::error::{GatewayError, GatewayResult};
use crate::normalize::{DbValue, TimeValue};
use crate::session::{Connector, ResultSet, Session};

/// Opens MySQL sessions from a [`DatabaseConfig`]
pub struct MySqlConnector {
    options: MySqlConnectOptions,
    target: String,
}

impl MySqlConnector {
    pub fn new(config: &DatabaseConfig) -> Self {
        let options = MySqlConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .username(&config.user)
            .password(&config.password)
            .database(&config.name)
            .charset(&config.charset);

        Self {
            options,
            target: config.redacted_url(),
        }
    }
}

#[async_trait]
impl Connector for MySqlConnector {
    async fn connect(&self) -> GatewayResult<Box<dyn Session>> {
        let conn = MySqlConnection::connect_with(&self.options)
            .await
            .map_err(|e| GatewayError::Connection(e.to_string()))?;
        Ok(Box::new(MySqlSession { conn }))
    }

    fn describe(&self) -> String {
        self.target.clone()
    }
}

/// A single MySQL connection
pub struct MySqlSession {
    conn: MySqlConnection,
}

#[async_trait]
impl Session for MySqlSession {
    async fn is_open(&mut self) -> bool {
        self.conn.ping().await.is_ok()
    }

    async fn fetch(&mut self, sql: &str, params: &[Value]) -> GatewayResult<ResultSet> {
        let statement = (&mut self.conn).prepare(sql).await?;
        let columns: Vec<String> = statement
            .columns()
            .iter()
            .map(|c| c.name().to_string())
            .collect();

        let mut query = statement.query();
        for param in params {
            query = bind_param(query, param)?;
        }

        let rows = query
            .fetch_all(&mut self.conn)
            .await?
            .iter()
            .map(decode_row)
            .collect::<GatewayResult<Vec<_>>>()?;

        Ok(ResultSet { columns, rows })
    }

    async fn close(self: Box<Self>) {
        if let Err(e) = self.conn.close().await {
            tracing::debug!("Error while closing MySQL session: {}", e);
        }
    }
}

/// Bind one JSON parameter positionally
fn bind_param<'q>(
    query: Query<'q, MySql, MySqlArguments>,
    value: &Value,
) -> GatewayResult<Query<'q, MySql, MySqlArguments>> {
    match value {
        Value::Null => Ok(query.bind(None::<String>)),
        Value::Bool(b) => Ok(query.bind(*b)),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(query.bind(i))
            } else if let Some(u) = n.as_u64() {
                Ok(query.bind(u))
            } else if let Some(f) = n.as_f64() {
                Ok(query.bind(f))
            } else {
                Err(GatewayError::UnsupportedParam(format!("number {}", n)))
            }
        }
        Value::String(s) => Ok(query.bind(s.clone())),
        Value::Array(_) => Err(GatewayError::UnsupportedParam("array".to_string())),
        Value::Object(_) => Err(GatewayError::UnsupportedParam("object".to_string())),
    }
}

fn decode_row(row: &MySqlRow) -> GatewayResult<Vec<DbValue>> {
    row.columns()
        .iter()
        .map(|column| decode_cell(row, column))
        .collect()
}

/// How a column's cells are read, from the server-reported type name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CellKind {
    /// `TINYINT(1)`, signed or unsigned
    Flag,
    Signed,
    Unsigned,
    Year,
    Float,
    Double,
    Decimal,
    Date,
    DateTime,
    Time,
    Binary,
    Text,
}

fn cell_kind(type_name: &str) -> CellKind {
    match type_name {
        "BOOLEAN" => CellKind::Flag,
        "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "BIGINT" => CellKind::Signed,
        name if name.ends_with(" UNSIGNED") => CellKind::Unsigned,
        "YEAR" => CellKind::Year,
        "FLOAT" => CellKind::Float,
        "DOUBLE" => CellKind::Double,
        "DECIMAL" => CellKind::Decimal,
        "DATE" => CellKind::Date,
        "DATETIME" | "TIMESTAMP" => CellKind::DateTime,
        "TIME" => CellKind::Time,
        "BINARY" | "VARBINARY" | "TINYBLOB" | "BLOB" | "MEDIUMBLOB" | "LONGBLOB" | "BIT"
        | "GEOMETRY" => CellKind::Binary,
        // CHAR, VARCHAR, TEXT, ENUM, SET, JSON, ...
        _ => CellKind::Text,
    }
}

fn decode_cell(row: &MySqlRow, column: &MySqlColumn) -> GatewayResult<DbValue> {
    let is_null = row
        .try_get_raw(column.ordinal())
        .map_err(|e| decode_error(column, e))?
        .is_null();
    if is_null {
        return Ok(DbValue::Null);
    }

    let value = match cell_kind(column.type_info().name()) {
        // sqlx reports TINYINT(1) UNSIGNED as BOOLEAN too, and the
        // checked signed read refuses it
        CellKind::Flag => match get::<i64>(row, column) {
            Ok(v) => DbValue::Int(v),
            Err(_) => DbValue::UInt(get_unchecked(row, column)?),
        },
        CellKind::Signed => DbValue::Int(get(row, column)?),
        CellKind::Unsigned => DbValue::UInt(get(row, column)?),
        CellKind::Year => DbValue::UInt(u64::from(get_unchecked::<u16>(row, column)?)),
        CellKind::Float => DbValue::Float(get(row, column)?),
        CellKind::Double => DbValue::Double(get(row, column)?),
        CellKind::Decimal => DbValue::Decimal(get_unchecked(row, column)?),
        CellKind::Date => match get(row, column) {
            Ok(date) => DbValue::Date(date),
            Err(_) => DbValue::Text(raw_temporal(&get_unchecked::<Vec<u8>>(row, column)?, false)),
        },
        CellKind::DateTime => match get(row, column) {
            Ok(dt) => DbValue::DateTime(dt),
            Err(_) => DbValue::Text(raw_temporal(&get_unchecked::<Vec<u8>>(row, column)?, true)),
        },
        CellKind::Time => DbValue::Time(time_value(&get::<MySqlTime>(row, column)?)),
        CellKind::Binary => DbValue::Bytes(get_unchecked(row, column)?),
        CellKind::Text => match get_unchecked::<String>(row, column) {
            Ok(text) => DbValue::Text(text),
            Err(_) => DbValue::Bytes(get_unchecked(row, column)?),
        },
    };

    Ok(value)
}

fn time_value(t: &MySqlTime) -> TimeValue {
    TimeValue {
        negative: t.is_negative(),
        hours: t.hours(),
        minutes: t.minutes(),
        seconds: t.seconds(),
        microseconds: t.microseconds(),
    }
}

/// Render a DATE or DATETIME chrono refuses, such as `0000-00-00` or a date
/// with a zero month or day
///
/// A binary-protocol value is a length byte (0, 4, 7 or 11) followed by
/// year (LE), month, day, hour, minute, second and microseconds (LE).
/// Anything else is text sent by the server.
fn raw_temporal(raw: &[u8], with_time: bool) -> String {
    let body = match raw.split_first() {
        Some((&len, rest)) if matches!(len, 0 | 4 | 7 | 11) && rest.len() == len as usize => rest,
        _ => return String::from_utf8_lossy(raw).into_owned(),
    };

    let byte = |i: usize| body.get(i).copied().unwrap_or(0);
    let year = u16::from_le_bytes([byte(0), byte(1)]);
    let date = format!("{:04}-{:02}-{:02}", year, byte(2), byte(3));
    if !with_time {
        return date;
    }

    let mut text = format!("{}T{:02}:{:02}:{:02}", date, byte(4), byte(5), byte(6));
    let micros = u32::from_le_bytes([byte(7), byte(8), byte(9), byte(10)]);
    if micros != 0 {
        text.push_str(&format!(".{:06}", micros));
    }
    text
}
