//! Schema introspection against the in-memory fake server

mod support;

use support::{column, FakeDatabase};

fn sample_database() -> FakeDatabase {
    FakeDatabase::new()
        .with_table(
            "department",
            Some("departments"),
            vec![
                column("dept_id", "int", false, "PRI", None, "department id"),
                column("parent_dept_id", "int", true, "MUL", None, ""),
                column("dept_name", "varchar(64)", false, "", None, "name"),
            ],
        )
        .with_table(
            "customer",
            None,
            vec![
                column("customer_id", "int", false, "PRI", None, ""),
                column("level", "tinyint", false, "", Some("1"), ""),
            ],
        )
}

#[tokio::test]
async fn describes_tables_and_columns_in_order() {
    let db = sample_database();
    let state = db.app_state("bi");

    let envelope = state.schema.get_table_schema().await;

    assert!(envelope.success, "error: {:?}", envelope.error);
    assert_eq!(envelope.error, None);
    assert_eq!(envelope.tables.len(), 2);

    let department = &envelope.tables["department"];
    assert_eq!(department.comment.as_deref(), Some("departments"));
    let names: Vec<_> = department.columns.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["dept_id", "parent_dept_id", "dept_name"]);
    assert_eq!(department.columns[0].key, "PRI");
    assert!(!department.columns[0].nullable);
    assert!(department.columns[1].nullable);
    assert_eq!(department.columns[2].data_type, "varchar(64)");

    let customer = &envelope.tables["customer"];
    assert_eq!(customer.comment, None);
    assert_eq!(customer.columns[1].default.as_deref(), Some("1"));
}

#[tokio::test]
async fn catalog_queries_are_scoped_to_database() {
    let db = sample_database();
    let state = db.app_state("warehouse");

    assert!(state.schema.get_table_schema().await.success);

    let executed = db.executed();
    assert_eq!(executed.len(), 3);
    for (_, params) in &executed {
        assert_eq!(params[0], "warehouse");
    }
}

#[tokio::test]
async fn introspection_is_idempotent() {
    let db = sample_database();
    let state = db.app_state("bi");

    let first = state.schema.get_table_schema().await;
    let second = state.schema.get_table_schema().await;

    assert_eq!(first, second);
    assert_eq!(db.connects(), 1);
}

#[tokio::test]
async fn failure_discards_partial_results() {
    let db = sample_database();
    db.fail_catalog(true);
    let state = db.app_state("bi");

    let envelope = state.schema.get_table_schema().await;

    assert!(!envelope.success);
    assert!(envelope.tables.is_empty());
    assert!(envelope.error.unwrap().contains("denied"));
}

#[tokio::test]
async fn introspection_reconnects_after_session_closed() {
    let db = sample_database();
    let state = db.app_state("bi");

    assert!(state.schema.get_table_schema().await.success);
    db.kill_sessions();
    assert!(state.schema.get_table_schema().await.success);
    assert_eq!(db.connects(), 2);
}

#[tokio::test]
async fn empty_database_has_no_tables() {
    let db = FakeDatabase::new();
    let state = db.app_state("bi");

    let envelope = state.schema.get_table_schema().await;
    assert!(envelope.success);
    assert!(envelope.tables.is_empty());
}
