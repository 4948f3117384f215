use chub_database::*;

const TABLE_V1: Migration =
    Migration::new("demo", "0001-table", "DEFINE TABLE IF NOT EXISTS demo SCHEMALESS;");

#[tokio::test]
async fn connect_in_memory_and_health_check() {
    let db = Database::builder()
        .url("mem://")
        .session("test_ns", "test_db")
        .init()
        .await
        .expect("connect to mem://");

    db.health().await.expect("health check");
}

#[tokio::test]
async fn missing_parameters_fail_validation() {
    let err = Database::builder().init().await.unwrap_err();
    assert!(matches!(err, DatabaseError::Settings { .. }));

    let err = Database::builder().url("mem://").init().await.unwrap_err();
    assert!(matches!(err, DatabaseError::Settings { .. }));
}

#[tokio::test]
async fn migrations_are_recorded_with_checksum() {
    let db = Database::builder()
        .url("mem://")
        .session("test_ns", "migrations")
        .migrations([TABLE_V1])
        .init()
        .await
        .expect("first init applies migrations");

    let mut response = db
        .query("SELECT VALUE checksum FROM migration WHERE slice = 'demo'")
        .await
        .expect("query migrations");
    let checksums: Vec<String> = response.take(0).expect("take checksums");
    assert_eq!(checksums, vec![TABLE_V1.checksum()]);
}

#[tokio::test]
async fn invalid_migration_version_is_rejected() {
    let err = Database::builder()
        .url("mem://")
        .session("test_ns", "invalid")
        .migrations([Migration::new("demo", "table", "DEFINE TABLE demo;")])
        .init()
        .await
        .unwrap_err();

    assert!(matches!(err, DatabaseError::Migration { .. }));
}

#[tokio::test]
async fn unique_index_violation_is_a_duplicate() {
    let db = Database::builder()
        .url("mem://")
        .session("test_ns", "duplicates")
        .migrations([Migration::new(
            "demo",
            "0001-unique",
            "DEFINE TABLE IF NOT EXISTS demo SCHEMAFULL;
            DEFINE FIELD IF NOT EXISTS code ON demo TYPE int;
            DEFINE INDEX IF NOT EXISTS demo_code_idx ON demo FIELDS code UNIQUE;",
        )])
        .init()
        .await
        .expect("init with unique index");

    let insert = || async {
        db.query("CREATE demo CONTENT { code: 1 } RETURN NONE")
            .await
            .map_err(|e| DatabaseError::from_engine(e, "insert"))?
            .check()
            .map_err(|e| DatabaseError::from_engine(surrealdb::Error::from(e), "insert"))?;
        Ok::<_, DatabaseError>(())
    };

    insert().await.expect("first insert");
    let err = insert().await.unwrap_err();
    assert_eq!(err.duplicate_index(), Some("demo_code_idx"));
}
