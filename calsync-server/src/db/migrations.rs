//! Schema migrations for both table families
//!
//! Idempotent `CREATE TABLE IF NOT EXISTS`; existing tables are left alone.

use sqlx::mysql::MySqlPool;

use super::repos::DbError;

const EVENT_COLUMNS_DDL: &str = r#"
    `id` BIGINT NOT NULL AUTO_INCREMENT PRIMARY KEY,
    `title` VARCHAR(255) NULL,
    `tooltip` VARCHAR(255) NULL,
    `color` VARCHAR(32) NULL,
    `start` DATETIME NULL,
    `end` DATETIME NULL,
    `allDay` BOOLEAN NULL,
    `recurring` BOOLEAN NULL,
    `recurringException` VARCHAR(1024) NULL,
    `recurringExceptionRule` VARCHAR(1024) NULL,
    `resource` BIGINT NULL,
    `timezone` VARCHAR(64) NULL,
    `dragBetweenResources` BOOLEAN NULL,
    `dragInTime` BOOLEAN NULL,
    `resize` BOOLEAN NULL,
    `editable` BOOLEAN NULL,
    `cssClass` VARCHAR(255) NULL"#;

const RESOURCE_COLUMNS_DDL: &str = r#"
    `id` BIGINT NOT NULL AUTO_INCREMENT PRIMARY KEY,
    `name` VARCHAR(255) NULL,
    `color` VARCHAR(32) NULL,
    `cssClass` VARCHAR(255) NULL,
    `eventCreation` BOOLEAN NULL,
    `eventDragBetweenResources` BOOLEAN NULL,
    `eventDragInTime` BOOLEAN NULL,
    `eventResize` BOOLEAN NULL"#;

/// DDL for every table, in creation order
pub fn statements() -> Vec<String> {
    vec![
        format!("CREATE TABLE IF NOT EXISTS resources ({}\n)", RESOURCE_COLUMNS_DDL),
        format!("CREATE TABLE IF NOT EXISTS events ({}\n)", EVENT_COLUMNS_DDL),
        format!(
            "CREATE TABLE IF NOT EXISTS bryntum_scheduler_resources ({}\n)",
            RESOURCE_COLUMNS_DDL
        ),
        format!(
            "CREATE TABLE IF NOT EXISTS bryntum_scheduler_events ({},\n    `exceptionDates` TEXT NULL\n)",
            EVENT_COLUMNS_DDL
        ),
    ]
}

/// Run all migrations
pub async fn run(pool: &MySqlPool) -> Result<(), DbError> {
    tracing::info!("Running schema migrations...");

    for statement in statements() {
        sqlx::query(&statement).execute(pool).await?;
    }

    tracing::info!("Schema migrations complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Table;

    #[test]
    fn ddl_covers_every_allow_listed_column() {
        let ddl = statements();
        let tables = [
            Table::Resources,
            Table::Events,
            Table::SchedulerResources,
            Table::SchedulerEvents,
        ];

        for (statement, table) in ddl.iter().zip(tables) {
            assert!(statement.contains(&format!("EXISTS {} (", table.name())));
            for column in table.columns() {
                assert!(
                    statement.contains(&format!("`{}`", column.name)),
                    "{} missing from {}",
                    column.name,
                    table.name()
                );
            }
        }
    }

    #[test]
    fn legacy_events_have_no_exception_dates() {
        let ddl = statements();
        assert!(!ddl[1].contains("exceptionDates"));
        assert!(ddl[3].contains("`exceptionDates` TEXT"));
    }
}
