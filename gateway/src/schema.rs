//! Schema introspector - tables and columns from `information_schema`
//!
//! Issues fixed catalog queries only, so it does not go through the
//! statement validator. The description is rebuilt on every call and is
//! all-or-nothing: any failure discards what was collected.

use gateway_common::{ColumnSchema, SchemaEnvelope, TableSchema};
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::connection::ConnectionManager;
use crate::error::{GatewayError, GatewayResult};
use crate::normalize::DbValue;

const TABLES_SQL: &str = "\
SELECT table_name, table_comment \
FROM information_schema.tables \
WHERE table_schema = ?";

const COLUMNS_SQL: &str = "\
SELECT column_name, column_type, is_nullable, column_key, column_default, column_comment \
FROM information_schema.columns \
WHERE table_schema = ? AND table_name = ? \
ORDER BY ordinal_position";

/// Builds a [`SchemaEnvelope`] for the configured database
pub struct SchemaIntrospector {
    connections: Arc<ConnectionManager>,
    database: String,
}

impl SchemaIntrospector {
    pub fn new(connections: Arc<ConnectionManager>, database: impl Into<String>) -> Self {
        Self {
            connections,
            database: database.into(),
        }
    }

    pub fn database(&self) -> &str {
        &self.database
    }

    /// Describe every table of the database
    pub async fn get_table_schema(&self) -> SchemaEnvelope {
        match self.collect().await {
            Ok(tables) => {
                tracing::info!("Loaded schema of {} tables", tables.len());
                SchemaEnvelope::success(tables)
            }
            Err(e) => {
                tracing::error!("Schema introspection failed: {}", e);
                SchemaEnvelope::failure(e.to_string())
            }
        }
    }

    async fn collect(&self) -> GatewayResult<BTreeMap<String, TableSchema>> {
        let mut slot = self.connections.ensure_connected().await?;
        let session = slot.as_mut().ok_or(GatewayError::NotConnected)?;

        let table_rows = session.fetch(TABLES_SQL, &[json!(self.database)]).await?;

        let mut tables = BTreeMap::new();
        for row in &table_rows.rows {
            let name = required_text(row, 0, "table_name")?;
            let comment = optional_text(row, 1);

            let column_rows = session
                .fetch(COLUMNS_SQL, &[json!(self.database), json!(name)])
                .await?;
            let columns = column_rows
                .rows
                .iter()
                .map(|r| column_from_row(r))
                .collect::<GatewayResult<Vec<_>>>()?;

            tables.insert(name, TableSchema { comment, columns });
        }

        Ok(tables)
    }
}

fn column_from_row(row: &[DbValue]) -> GatewayResult<ColumnSchema> {
    Ok(ColumnSchema {
        name: required_text(row, 0, "column_name")?,
        data_type: required_text(row, 1, "column_type")?,
        nullable: optional_text(row, 2).is_some_and(|v| v.eq_ignore_ascii_case("YES")),
        key: optional_text(row, 3).unwrap_or_default(),
        default: optional_text(row, 4),
        comment: optional_text(row, 5),
    })
}

fn optional_text(row: &[DbValue], idx: usize) -> Option<String> {
    row.get(idx).and_then(DbValue::to_normalized)
}

fn required_text(row: &[DbValue], idx: usize, column: &str) -> GatewayResult<String> {
    optional_text(row, idx).ok_or_else(|| GatewayError::Decode {
        column: column.to_string(),
        message: "unexpected NULL in catalog row".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_from_row() {
        let row = vec![
            DbValue::Text("dept_id".into()),
            DbValue::Text("int unsigned".into()),
            DbValue::Text("NO".into()),
            DbValue::Text("PRI".into()),
            DbValue::Null,
            DbValue::Text("department id".into()),
        ];
        let column = column_from_row(&row).unwrap();
        assert_eq!(column.name, "dept_id");
        assert_eq!(column.data_type, "int unsigned");
        assert!(!column.nullable);
        assert_eq!(column.key, "PRI");
        assert_eq!(column.default, None);
        assert_eq!(column.comment.as_deref(), Some("department id"));
    }

    #[test]
    fn test_binary_catalog_text_and_nullable() {
        let row = vec![
            DbValue::Bytes(b"parent_dept_id".to_vec()),
            DbValue::Bytes(b"int".to_vec()),
            DbValue::Text("YES".into()),
            DbValue::Text(String::new()),
            DbValue::Text("0".into()),
            DbValue::Text(String::new()),
        ];
        let column = column_from_row(&row).unwrap();
        assert_eq!(column.name, "parent_dept_id");
        assert!(column.nullable);
        assert_eq!(column.key, "");
        assert_eq!(column.default.as_deref(), Some("0"));
    }

    #[test]
    fn test_null_column_name_is_error() {
        let row = vec![DbValue::Null, DbValue::Text("int".into())];
        assert!(matches!(
            column_from_row(&row),
            Err(GatewayError::Decode { .. })
        ));
    }
}
