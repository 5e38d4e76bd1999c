use crate::{
    engine::{LocaleMerge, ReadField, CURRENT_PREFIX, FALLBACK_PREFIX},
    Record,
};

use quire_core::{driver::Row, stmt::Value};

use indexmap::IndexMap;
use serde_json::Value as Json;

/// Prefix of the parent key selections used to attach related records.
pub(super) const KEY_PREFIX: &str = "_key_";

/// Prefix of the child key selections used to group related records by
/// parent.
pub(super) const LINK_PREFIX: &str = "_link_";

/// A record read from a row, with the internal key selections split off.
#[derive(Debug)]
pub(super) struct Loaded {
    pub(super) record: Record,

    /// `_key_` and `_link_` selections, by alias
    pub(super) keys: IndexMap<String, Value>,
}

/// Rebuilds a record from a row following the read plan, then collapses the
/// per-locale selections.
pub(super) fn record(mut row: Row, plan: &[ReadField], merge: &LocaleMerge<'_>) -> Loaded {
    let mut record = Record::new();
    let mut current = Record::new();
    let mut fallback = Record::new();

    for field in plan {
        let name = field.name();

        match field {
            ReadField::Column(_) | ReadField::Title => {
                record.insert(name.to_string(), take(&mut row, name).to_json());
            }
            ReadField::Localized(_) => {
                record.insert(name.to_string(), Json::Null);
                current.insert(name.to_string(), overlay(&mut row, CURRENT_PREFIX, name, false));
                fallback.insert(name.to_string(), overlay(&mut row, FALLBACK_PREFIX, name, false));
            }
            ReadField::Structured { .. } => {
                let value = structured(take(&mut row, name));
                let current_overlay = overlay(&mut row, CURRENT_PREFIX, name, true);
                let fallback_overlay = overlay(&mut row, FALLBACK_PREFIX, name, true);

                // Overlays only apply to structural values
                if value.is_object() || value.is_array() {
                    current.insert(name.to_string(), current_overlay);
                    fallback.insert(name.to_string(), fallback_overlay);
                }

                record.insert(name.to_string(), value);
            }
            ReadField::Opaque(_) => {
                record.insert(name.to_string(), Json::Null);
            }
        }
    }

    let keys = row
        .into_iter()
        .filter(|(alias, _)| alias.starts_with(KEY_PREFIX) || alias.starts_with(LINK_PREFIX))
        .collect();

    Loaded {
        record: merge.merge(record, &current, &fallback),
        keys,
    }
}

fn take(row: &mut Row, alias: &str) -> Value {
    row.get_mut(alias).map(std::mem::take).unwrap_or_default()
}

fn overlay(row: &mut Row, prefix: &str, name: &str, parse: bool) -> Json {
    let value = take(row, &format!("{prefix}{name}"));

    if parse {
        structured(value)
    } else {
        value.to_json()
    }
}

/// Drivers without a JSON type return structured columns as text.
fn structured(value: Value) -> Json {
    match value {
        Value::String(text) => serde_json::from_str(&text).unwrap_or(Json::String(text)),
        value => value.to_json(),
    }
}
