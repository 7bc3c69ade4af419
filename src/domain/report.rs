use serde_json::Value;

use super::{EntityType, SnapshotRecord, KEY_FIELD};

/// One worksheet: a header row plus one row per cached entity
#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    pub name: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl Sheet {
    /// Build a sheet from cached records.
    ///
    /// The key column comes first, the remaining columns are the sorted union
    /// of every payload's fields. Rows are ordered by key; a record missing a
    /// column gets a null cell.
    pub fn from_records(entity: EntityType, mut records: Vec<SnapshotRecord>) -> Self {
        records.sort_by(|a, b| a.key.cmp(&b.key));

        let mut columns: Vec<String> = records
            .iter()
            .flat_map(|r| r.payload.keys())
            .filter(|k| k.as_str() != KEY_FIELD)
            .cloned()
            .collect::<std::collections::BTreeSet<_>>()
            .into_iter()
            .collect();
        columns.insert(0, KEY_FIELD.to_string());

        let rows = records
            .into_iter()
            .map(|record| {
                columns
                    .iter()
                    .map(|column| match record.payload.get(column) {
                        Some(value) => value.clone(),
                        None if column == KEY_FIELD => Value::String(record.key.clone()),
                        None => Value::Null,
                    })
                    .collect()
            })
            .collect();

        Self {
            name: entity.as_str().to_string(),
            columns,
            rows,
        }
    }
}

/// Multi-sheet report built from the snapshot cache
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Report {
    pub sheets: Vec<Sheet>,
}

impl Report {
    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }
}
