//! Table and column allow-lists
//!
//! Client payloads are mapped onto columns through these descriptors only.
//! A key that is not listed here never reaches a SQL statement.

/// Storage type of a column, used to coerce JSON values before binding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Text,
    Integer,
    Bool,
    Timestamp,
    /// Structured value stored as JSON text
    Json,
}

/// A writable column
#[derive(Debug, PartialEq, Eq)]
pub struct Column {
    pub name: &'static str,
    pub kind: ColumnKind,
}

const fn col(name: &'static str, kind: ColumnKind) -> Column {
    Column { name, kind }
}

/// The 16 columns shared by both event tables, followed by any extras
macro_rules! event_columns {
    ($($extra:expr),* $(,)?) => {
        &[
            col("title", ColumnKind::Text),
            col("tooltip", ColumnKind::Text),
            col("color", ColumnKind::Text),
            col("start", ColumnKind::Timestamp),
            col("end", ColumnKind::Timestamp),
            col("allDay", ColumnKind::Bool),
            col("recurring", ColumnKind::Bool),
            col("recurringException", ColumnKind::Text),
            col("recurringExceptionRule", ColumnKind::Text),
            col("resource", ColumnKind::Integer),
            col("timezone", ColumnKind::Text),
            col("dragBetweenResources", ColumnKind::Bool),
            col("dragInTime", ColumnKind::Bool),
            col("resize", ColumnKind::Bool),
            col("editable", ColumnKind::Bool),
            col("cssClass", ColumnKind::Text),
            $($extra,)*
        ]
    };
}

/// Event columns in the fixed order used by the legacy insert/update statements.
pub const EVENT_COLUMNS: &[Column] = event_columns!();

/// Scheduler events carry `exceptionDates` on top of the legacy columns.
pub const SCHEDULER_EVENT_COLUMNS: &[Column] = event_columns!(col("exceptionDates", ColumnKind::Json));

pub const RESOURCE_COLUMNS: &[Column] = &[
    col("name", ColumnKind::Text),
    col("color", ColumnKind::Text),
    col("cssClass", ColumnKind::Text),
    col("eventCreation", ColumnKind::Bool),
    col("eventDragBetweenResources", ColumnKind::Bool),
    col("eventDragInTime", ColumnKind::Bool),
    col("eventResize", ColumnKind::Bool),
];

/// The four physical tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Events,
    Resources,
    SchedulerEvents,
    SchedulerResources,
}

impl Table {
    pub fn name(self) -> &'static str {
        match self {
            Self::Events => "events",
            Self::Resources => "resources",
            Self::SchedulerEvents => "bryntum_scheduler_events",
            Self::SchedulerResources => "bryntum_scheduler_resources",
        }
    }

    pub fn columns(self) -> &'static [Column] {
        match self {
            Self::Events => EVENT_COLUMNS,
            Self::SchedulerEvents => SCHEDULER_EVENT_COLUMNS,
            Self::Resources | Self::SchedulerResources => RESOURCE_COLUMNS,
        }
    }

    /// Look up an allow-listed column by its wire name.
    pub fn column(self, name: &str) -> Option<&'static Column> {
        self.columns().iter().find(|c| c.name == name)
    }
}

/// Entity group inside a `/sync` request, bound to the scheduler tables
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Resources,
    Events,
}

impl Entity {
    pub fn table(self) -> Table {
        match self {
            Self::Resources => Table::SchedulerResources,
            Self::Events => Table::SchedulerEvents,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_events_have_sixteen_columns() {
        assert_eq!(EVENT_COLUMNS.len(), 16);
        assert!(Table::Events.column("exceptionDates").is_none());
    }

    #[test]
    fn scheduler_events_extend_legacy_columns() {
        assert_eq!(SCHEDULER_EVENT_COLUMNS.len(), 17);
        assert_eq!(&SCHEDULER_EVENT_COLUMNS[..16], EVENT_COLUMNS);
        assert_eq!(
            Table::SchedulerEvents.column("exceptionDates").map(|c| c.kind),
            Some(ColumnKind::Json)
        );
    }

    #[test]
    fn entity_maps_to_scheduler_tables() {
        assert_eq!(Entity::Events.table().name(), "bryntum_scheduler_events");
        assert_eq!(Entity::Resources.table().name(), "bryntum_scheduler_resources");
    }

    #[test]
    fn unknown_column_is_not_found() {
        assert!(Table::Resources.column("id").is_none());
        assert!(Table::Resources.column("name; DROP TABLE resources").is_none());
    }
}
