//! MySQL repository
//!
//! Statements are assembled with `QueryBuilder`: column names come from the
//! allow-list in [`crate::db::schema`], every value is a bound parameter.

use async_trait::async_trait;
use sqlx::mysql::{MySql, MySqlPool};
use sqlx::QueryBuilder;

use super::{DbError, LegacyRepository, SchedulerRepository};
use crate::db::{Entity, Record, SqlValue, Table};
use crate::models::{EventRow, ResourceRow};

/// Repository over a MySQL pool, serving both table families
#[derive(Clone)]
pub struct MySqlRepository {
    pool: MySqlPool,
}

impl MySqlRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }

    async fn fetch_events(&self, table: Table) -> Result<Vec<EventRow>, DbError> {
        let sql = format!("SELECT * FROM {}", table.name());
        let rows = sqlx::query_as::<_, EventRow>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn fetch_resources(&self, table: Table) -> Result<Vec<ResourceRow>, DbError> {
        let sql = format!("SELECT * FROM {}", table.name());
        let rows = sqlx::query_as::<_, ResourceRow>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn insert(&self, table: Table, record: &Record) -> Result<i64, DbError> {
        let mut qb = QueryBuilder::<MySql>::new(format!("INSERT INTO {} (", table.name()));
        for (i, (column, _)) in record.iter().enumerate() {
            if i > 0 {
                qb.push(", ");
            }
            qb.push(quote(column.name));
        }
        qb.push(") VALUES (");
        for (i, (_, value)) in record.iter().enumerate() {
            if i > 0 {
                qb.push(", ");
            }
            push_value(&mut qb, value);
        }
        qb.push(")");

        let result = qb.build().execute(&self.pool).await?;
        let id = result.last_insert_id();
        tracing::debug!(table = table.name(), id, "inserted row");

        i64::try_from(id).map_err(|_| DbError::InvalidValue {
            column: "id".to_owned(),
            reason: format!("insert id {} out of range", id),
        })
    }

    async fn update(&self, table: Table, id: i64, record: &Record) -> Result<(), DbError> {
        if record.is_empty() {
            return Ok(());
        }

        let mut qb = QueryBuilder::<MySql>::new(format!("UPDATE {} SET ", table.name()));
        for (i, (column, value)) in record.iter().enumerate() {
            if i > 0 {
                qb.push(", ");
            }
            qb.push(quote(column.name));
            qb.push(" = ");
            push_value(&mut qb, value);
        }
        qb.push(" WHERE id = ");
        qb.push_bind(id);

        let result = qb.build().execute(&self.pool).await?;
        tracing::debug!(table = table.name(), id, rows = result.rows_affected(), "updated row");
        Ok(())
    }

    async fn delete(&self, table: Table, ids: &[i64]) -> Result<u64, DbError> {
        if ids.is_empty() {
            return Ok(0);
        }

        let mut qb = QueryBuilder::<MySql>::new(format!("DELETE FROM {} WHERE id IN (", table.name()));
        let mut list = qb.separated(", ");
        for id in ids {
            list.push_bind(*id);
        }
        list.push_unseparated(")");

        let result = qb.build().execute(&self.pool).await?;
        tracing::debug!(table = table.name(), rows = result.rows_affected(), "deleted rows");
        Ok(result.rows_affected())
    }
}

#[async_trait]
impl LegacyRepository for MySqlRepository {
    async fn list_resources(&self) -> Result<Vec<ResourceRow>, DbError> {
        self.fetch_resources(Table::Resources).await
    }

    async fn list_events(&self) -> Result<Vec<EventRow>, DbError> {
        self.fetch_events(Table::Events).await
    }

    async fn add_event(&self, event: &Record) -> Result<i64, DbError> {
        self.insert(Table::Events, event).await
    }

    async fn update_event(&self, id: i64, event: &Record) -> Result<(), DbError> {
        self.update(Table::Events, id, event).await
    }

    async fn delete_event(&self, id: i64) -> Result<(), DbError> {
        self.delete(Table::Events, &[id]).await.map(|_| ())
    }
}

#[async_trait]
impl SchedulerRepository for MySqlRepository {
    async fn load_resources(&self) -> Result<Vec<ResourceRow>, DbError> {
        self.fetch_resources(Table::SchedulerResources).await
    }

    async fn load_events(&self) -> Result<Vec<EventRow>, DbError> {
        self.fetch_events(Table::SchedulerEvents).await
    }

    async fn insert_record(&self, entity: Entity, record: &Record) -> Result<i64, DbError> {
        self.insert(entity.table(), record).await
    }

    async fn update_record(&self, entity: Entity, id: i64, record: &Record) -> Result<(), DbError> {
        self.update(entity.table(), id, record).await
    }

    async fn remove_records(&self, entity: Entity, ids: &[i64]) -> Result<u64, DbError> {
        self.delete(entity.table(), ids).await
    }
}

fn quote(name: &str) -> String {
    format!("`{}`", name)
}

fn push_value(qb: &mut QueryBuilder<'_, MySql>, value: &SqlValue) {
    match value.clone() {
        SqlValue::Null => qb.push_bind(None::<String>),
        SqlValue::Text(s) => qb.push_bind(s),
        SqlValue::Integer(i) => qb.push_bind(i),
        SqlValue::Bool(b) => qb.push_bind(b),
        SqlValue::Timestamp(t) => qb.push_bind(t),
    };
}
