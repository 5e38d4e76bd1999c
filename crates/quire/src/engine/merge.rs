use crate::{Config, Record};

use quire_core::schema::{Collection, Shape};

use indexmap::IndexMap;
use serde_json::{Map, Value as Json};

/// Collapses per-locale values into one value per field.
///
/// Flat fields take `current ?? fallback ?? existing ?? null`. Fields whose
/// existing value is structural (object or array) have the overlays merged
/// into their `{"$i18n": true}` markers, leaf by leaf.
#[derive(Debug, Clone, Default)]
pub struct LocaleMerge<'a> {
    /// Shapes of structured fields. Fields without one are walked by
    /// following the markers.
    shapes: IndexMap<&'a str, &'a Shape>,

    max_depth: usize,
}

/// Merges with the default depth budget, following markers only.
pub fn merge_locales(row: Record, current: &Record, fallback: &Record) -> Record {
    LocaleMerge::new(Config::DEFAULT_MAX_MERGE_DEPTH).merge(row, current, fallback)
}

impl<'a> LocaleMerge<'a> {
    pub fn new(max_depth: usize) -> Self {
        Self {
            shapes: IndexMap::new(),
            max_depth,
        }
    }

    /// Uses the declared shapes of the collection's structured fields.
    pub fn for_collection(collection: &'a Collection, max_depth: usize) -> Self {
        let shapes = collection
            .fields
            .values()
            .filter_map(|field| Some((field.name.as_str(), &field.structure.as_ref()?.shape)))
            .collect();

        Self { shapes, max_depth }
    }

    pub fn merge(&self, mut row: Record, current: &Record, fallback: &Record) -> Record {
        let keys = current.keys().chain(fallback.keys().filter(|k| !current.contains_key(*k)));

        for key in keys.cloned().collect::<Vec<_>>() {
            let cur = current.get(&key).filter(|v| !v.is_null());
            let fb = fallback.get(&key).filter(|v| !v.is_null());
            let shape = self.shapes.get(key.as_str()).copied();
            let slot = row.entry(key).or_insert(Json::Null);
            let existing = slot.take();

            *slot = if existing.is_object() || existing.is_array() {
                let walk = Walk {
                    max_depth: self.max_depth,
                };
                walk.merge(existing, shape, cur, fb, 0)
            } else {
                cur.or(fb).cloned().unwrap_or(existing)
            };
        }

        row
    }
}

struct Walk {
    max_depth: usize,
}

impl Walk {
    fn merge(
        &self,
        value: Json,
        shape: Option<&Shape>,
        cur: Option<&Json>,
        fb: Option<&Json>,
        depth: usize,
    ) -> Json {
        if depth >= self.max_depth {
            tracing::trace!(depth, "structured merge depth exceeded; keeping value");
            return value;
        }

        if is_marker(&value) || matches!(shape, Some(Shape::Localized)) {
            return leaf(value, cur, fb);
        }

        match (value, shape) {
            (value, Some(Shape::Plain)) => value,
            (Json::Object(object), Some(Shape::Object(fields))) => {
                Json::Object(self.merge_object(object, |key| fields.get(key), cur, fb, depth))
            }
            (Json::Object(object), None) => {
                Json::Object(self.merge_object(object, |_| None, cur, fb, depth))
            }
            (Json::Array(items), Some(Shape::Blocks(variants))) => {
                Json::Array(self.merge_blocks(items, Some(variants), cur, fb, depth))
            }
            (Json::Array(items), Some(Shape::Array(element))) => {
                Json::Array(self.merge_indexed(items, Some(element), cur, fb, depth))
            }
            (Json::Array(items), None) if is_block_overlay(cur, fb) => {
                Json::Array(self.merge_blocks(items, None, cur, fb, depth))
            }
            (Json::Array(items), None) => {
                Json::Array(self.merge_indexed(items, None, cur, fb, depth))
            }
            // Stored value does not match the declared shape
            (value, _) => value,
        }
    }

    fn merge_object<'s>(
        &self,
        object: Map<String, Json>,
        shape: impl Fn(&str) -> Option<&'s Shape>,
        cur: Option<&Json>,
        fb: Option<&Json>,
        depth: usize,
    ) -> Map<String, Json> {
        object
            .into_iter()
            .map(|(key, value)| {
                let merged = self.merge(
                    value,
                    shape(&key),
                    child(cur, &key),
                    child(fb, &key),
                    depth + 1,
                );
                (key, merged)
            })
            .collect()
    }

    fn merge_indexed(
        &self,
        items: Vec<Json>,
        element: Option<&Shape>,
        cur: Option<&Json>,
        fb: Option<&Json>,
        depth: usize,
    ) -> Vec<Json> {
        items
            .into_iter()
            .enumerate()
            .map(|(index, item)| {
                let cur = cur.and_then(|cur| cur.get(index));
                let fb = fb.and_then(|fb| fb.get(index));
                self.merge(item, element, cur, fb, depth + 1)
            })
            .collect()
    }

    /// Blocks are `{"id", "type", "values"}` objects; overlays are keyed by
    /// block id and hold the localized `values`.
    fn merge_blocks(
        &self,
        items: Vec<Json>,
        variants: Option<&IndexMap<String, Shape>>,
        cur: Option<&Json>,
        fb: Option<&Json>,
        depth: usize,
    ) -> Vec<Json> {
        items
            .into_iter()
            .map(|block| {
                let Json::Object(mut block) = block else {
                    return block;
                };

                let id = block.get("id").map(key_of);
                let kind = block.get("type").and_then(Json::as_str);
                let shape = match (variants, kind) {
                    (Some(variants), Some(kind)) => match variants.get(kind) {
                        Some(shape) => Some(shape),
                        // Unknown block types are kept as stored
                        None => return Json::Object(block),
                    },
                    _ => None,
                };

                let cur = id.as_deref().and_then(|id| child(cur, id));
                let fb = id.as_deref().and_then(|id| child(fb, id));

                if let Some(values) = block.remove("values") {
                    let merged = self.merge(values, shape, cur, fb, depth + 1);
                    block.insert("values".to_string(), merged);
                }

                Json::Object(block)
            })
            .collect()
    }
}

/// A localized leaf: the current value, else the fallback, else null.
/// Non-marker values already merged are kept when no overlay has a value.
fn leaf(value: Json, cur: Option<&Json>, fb: Option<&Json>) -> Json {
    let cur = cur.filter(|v| !v.is_null());
    let fb = fb.filter(|v| !v.is_null());

    match cur.or(fb) {
        Some(overlay) => overlay.clone(),
        None if is_marker(&value) => Json::Null,
        None => value,
    }
}

fn is_marker(value: &Json) -> bool {
    value
        .get(Shape::MARKER)
        .and_then(Json::as_bool)
        .unwrap_or(false)
}

fn child<'v>(overlay: Option<&'v Json>, key: &str) -> Option<&'v Json> {
    overlay?.get(key)
}

fn is_block_overlay(cur: Option<&Json>, fb: Option<&Json>) -> bool {
    cur.or(fb).is_some_and(Json::is_object)
}

fn key_of(id: &Json) -> String {
    match id {
        Json::String(id) => id.clone(),
        id => id.to_string(),
    }
}
