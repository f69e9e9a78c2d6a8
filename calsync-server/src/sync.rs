//! Batch reconciliation for `/sync`
//!
//! Each entity group runs its phases in order: added, removed, updated.
//! Inside a phase every record is an independent statement and all of them
//! are in flight at once. There is no transaction: a failure in a later phase
//! leaves earlier phases committed, and the caller only learns that the batch
//! failed.

use futures::future::try_join_all;
use serde_json::{Map, Value};

use crate::db::{DbError, Entity, Record, SchedulerRepository};
use crate::models::sync::PHANTOM_ID_KEY;
use crate::models::{GroupRows, PhantomMapping, SyncRequest, SyncResponse, TableChanges};

/// Apply every group of `request` and build the id-mapping response.
pub async fn apply_sync(
    repo: &dyn SchedulerRepository,
    request: SyncRequest,
) -> Result<SyncResponse, DbError> {
    let resources = match request.resources {
        Some(changes) => apply_table_changes(repo, Entity::Resources, changes).await?,
        None => None,
    };

    let events = match request.events {
        Some(changes) => apply_table_changes(repo, Entity::Events, changes).await?,
        None => None,
    };

    Ok(SyncResponse {
        request_id: request.request_id,
        success: true,
        resources: resources.map(GroupRows::new),
        events: events.map(GroupRows::new),
    })
}

/// Apply one group. Returns id mappings only when the group carried `added`.
pub async fn apply_table_changes(
    repo: &dyn SchedulerRepository,
    entity: Entity,
    changes: TableChanges,
) -> Result<Option<Vec<PhantomMapping>>, DbError> {
    let rows = match changes.added {
        Some(added) => Some(insert_records(repo, entity, added).await?),
        None => None,
    };

    if let Some(removed) = changes.removed {
        remove_records(repo, entity, &removed).await?;
    }

    if let Some(updated) = changes.updated {
        update_records(repo, entity, updated).await?;
    }

    Ok(rows)
}

async fn insert_records(
    repo: &dyn SchedulerRepository,
    entity: Entity,
    added: Vec<Map<String, Value>>,
) -> Result<Vec<PhantomMapping>, DbError> {
    let inserts = added.into_iter().map(|mut fields| async move {
        let phantom_id = fields.remove(PHANTOM_ID_KEY).unwrap_or(Value::Null);
        fields.remove("id");

        let record = Record::partial(entity.table(), &fields)?;
        let id = repo.insert_record(entity, &record).await?;
        Ok::<_, DbError>(PhantomMapping { phantom_id, id })
    });

    let rows = try_join_all(inserts).await?;
    tracing::debug!(table = entity.table().name(), count = rows.len(), "records added");
    Ok(rows)
}

async fn remove_records(
    repo: &dyn SchedulerRepository,
    entity: Entity,
    removed: &[Map<String, Value>],
) -> Result<(), DbError> {
    let ids = removed
        .iter()
        .map(record_id)
        .collect::<Result<Vec<_>, _>>()?;

    let count = repo.remove_records(entity, &ids).await?;
    tracing::debug!(table = entity.table().name(), count, "records removed");
    Ok(())
}

async fn update_records(
    repo: &dyn SchedulerRepository,
    entity: Entity,
    updated: Vec<Map<String, Value>>,
) -> Result<(), DbError> {
    let updates = updated.into_iter().map(|mut fields| async move {
        let id = record_id(&fields)?;
        fields.remove("id");

        let record = Record::partial(entity.table(), &fields)?;
        repo.update_record(entity, id, &record).await
    });

    try_join_all(updates).await?;
    Ok(())
}

/// Read the `id` key of a removed/updated record.
fn record_id(fields: &Map<String, Value>) -> Result<i64, DbError> {
    let invalid = |reason: &str| DbError::InvalidValue {
        column: "id".to_owned(),
        reason: reason.to_owned(),
    };

    match fields.get("id") {
        Some(Value::Number(n)) => n.as_i64().ok_or_else(|| invalid("expected an integer")),
        Some(Value::String(s)) => s.trim().parse().map_err(|_| invalid("expected an integer")),
        Some(_) => Err(invalid("expected an integer")),
        None => Err(invalid("missing")),
    }
}
