//! In-memory repository
//!
//! Stores both table families in `BTreeMap`s behind a tokio `RwLock`, with
//! auto-increment ids starting at 1. Behaves like the MySQL repository for
//! everything the handlers can observe: unknown ids are silently ignored by
//! updates and deletes, and each call commits on its own.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{DbError, LegacyRepository, SchedulerRepository};
use crate::db::{Entity, Record};
use crate::models::{EventRow, ResourceRow};

#[derive(Debug)]
struct TableData<T> {
    rows: BTreeMap<i64, T>,
    next_id: i64,
}

impl<T> Default for TableData<T> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            next_id: 1,
        }
    }
}

impl<T: Clone> TableData<T> {
    fn insert(&mut self, row: impl FnOnce(i64) -> T) -> i64 {
        let id = self.next_id;
        self.next_id += 1;
        self.rows.insert(id, row(id));
        id
    }

    fn all(&self) -> Vec<T> {
        self.rows.values().cloned().collect()
    }

    fn remove(&mut self, ids: &[i64]) -> u64 {
        ids.iter().filter(|id| self.rows.remove(*id).is_some()).count() as u64
    }
}

#[derive(Debug, Default)]
struct Family {
    events: TableData<EventRow>,
    resources: TableData<ResourceRow>,
}

impl Family {
    fn insert(&mut self, entity: Entity, record: &Record) -> i64 {
        match entity {
            Entity::Events => self.events.insert(|id| {
                let mut row = EventRow { id, ..Default::default() };
                row.apply(record);
                row
            }),
            Entity::Resources => self.resources.insert(|id| {
                let mut row = ResourceRow { id, ..Default::default() };
                row.apply(record);
                row
            }),
        }
    }

    fn update(&mut self, entity: Entity, id: i64, record: &Record) {
        match entity {
            Entity::Events => {
                if let Some(row) = self.events.rows.get_mut(&id) {
                    row.apply(record);
                }
            }
            Entity::Resources => {
                if let Some(row) = self.resources.rows.get_mut(&id) {
                    row.apply(record);
                }
            }
        }
    }

    fn remove(&mut self, entity: Entity, ids: &[i64]) -> u64 {
        match entity {
            Entity::Events => self.events.remove(ids),
            Entity::Resources => self.resources.remove(ids),
        }
    }
}

/// In-memory repository serving both table families.
///
/// Cloning shares the underlying data.
#[derive(Clone, Default)]
pub struct MemoryRepository {
    legacy: Arc<RwLock<Family>>,
    scheduler: Arc<RwLock<Family>>,
}

impl MemoryRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a legacy resource row, returning its id.
    pub async fn seed_resource(&self, record: &Record) -> i64 {
        self.legacy.write().await.insert(Entity::Resources, record)
    }
}

#[async_trait]
impl LegacyRepository for MemoryRepository {
    async fn list_resources(&self) -> Result<Vec<ResourceRow>, DbError> {
        Ok(self.legacy.read().await.resources.all())
    }

    async fn list_events(&self) -> Result<Vec<EventRow>, DbError> {
        Ok(self.legacy.read().await.events.all())
    }

    async fn add_event(&self, event: &Record) -> Result<i64, DbError> {
        Ok(self.legacy.write().await.insert(Entity::Events, event))
    }

    async fn update_event(&self, id: i64, event: &Record) -> Result<(), DbError> {
        self.legacy.write().await.update(Entity::Events, id, event);
        Ok(())
    }

    async fn delete_event(&self, id: i64) -> Result<(), DbError> {
        self.legacy.write().await.remove(Entity::Events, &[id]);
        Ok(())
    }
}

#[async_trait]
impl SchedulerRepository for MemoryRepository {
    async fn load_resources(&self) -> Result<Vec<ResourceRow>, DbError> {
        Ok(self.scheduler.read().await.resources.all())
    }

    async fn load_events(&self) -> Result<Vec<EventRow>, DbError> {
        Ok(self.scheduler.read().await.events.all())
    }

    async fn insert_record(&self, entity: Entity, record: &Record) -> Result<i64, DbError> {
        Ok(self.scheduler.write().await.insert(entity, record))
    }

    async fn update_record(&self, entity: Entity, id: i64, record: &Record) -> Result<(), DbError> {
        self.scheduler.write().await.update(entity, id, record);
        Ok(())
    }

    async fn remove_records(&self, entity: Entity, ids: &[i64]) -> Result<u64, DbError> {
        Ok(self.scheduler.write().await.remove(entity, ids))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Table;
    use serde_json::json;

    fn partial(table: Table, value: serde_json::Value) -> Record {
        Record::partial(table, value.as_object().unwrap()).unwrap()
    }

    #[tokio::test]
    async fn ids_increment_per_table() {
        let repo = MemoryRepository::new();
        let event = partial(Table::SchedulerEvents, json!({"title": "a"}));
        let resource = partial(Table::SchedulerResources, json!({"name": "r"}));

        assert_eq!(repo.insert_record(Entity::Events, &event).await.unwrap(), 1);
        assert_eq!(repo.insert_record(Entity::Events, &event).await.unwrap(), 2);
        assert_eq!(repo.insert_record(Entity::Resources, &resource).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn families_are_independent() {
        let repo = MemoryRepository::new();
        let event = Record::full_row(Table::Events, &json!({"title": "legacy"})).unwrap();
        repo.add_event(&event).await.unwrap();

        assert_eq!(repo.list_events().await.unwrap().len(), 1);
        assert!(repo.load_events().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_and_delete_ignore_unknown_ids() {
        let repo = MemoryRepository::new();
        let record = partial(Table::SchedulerEvents, json!({"title": "ghost"}));

        repo.update_record(Entity::Events, 99, &record).await.unwrap();
        assert_eq!(repo.remove_records(Entity::Events, &[99]).await.unwrap(), 0);
        assert!(repo.load_events().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_touches_only_given_columns() {
        let repo = MemoryRepository::new();
        let id = repo
            .insert_record(
                Entity::Resources,
                &partial(Table::SchedulerResources, json!({"name": "Room", "color": "red"})),
            )
            .await
            .unwrap();

        repo.update_record(
            Entity::Resources,
            id,
            &partial(Table::SchedulerResources, json!({"color": "blue"})),
        )
        .await
        .unwrap();

        let rows = repo.load_resources().await.unwrap();
        assert_eq!(rows[0].name.as_deref(), Some("Room"));
        assert_eq!(rows[0].color.as_deref(), Some("blue"));
    }
}
