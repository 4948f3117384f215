#![allow(dead_code)]

use chub_customer::MIGRATIONS;
use chub_database::Database;

pub async fn memory_database() -> Database {
    Database::builder()
        .url("mem://")
        .session("test", "customers")
        .migrations(MIGRATIONS.iter().copied())
        .init()
        .await
        .expect("in-memory database")
}
