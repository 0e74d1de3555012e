//! Normalization of loosely-shaped backend records.
//!
//! The backend returns records whose field names drift between
//! deployments (`file_id` vs `_id` vs `uuid`, `name` vs `filename`, ...).
//! Records are treated as open key/value bags and resolved through fixed
//! priority chains; the first non-null value wins. Nothing here fails:
//! missing or malformed fields fall back to sentinel values.

use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// Placeholder shown for absent display fields.
pub const MISSING: &str = "—";

/// `process` value of the NER stage inside a record's `results`.
pub const NER_PROCESS: &str = "NER";

/// Keys that may hold the record collection in a listing response.
pub const COLLECTION_KEYS: &[&str] = &[
    "items", "results", "data", "files", "rows", "documents", "records", "list",
];

pub const ID_KEYS: &[&str] = &["file_id", "_id", "id", "uuid"];
pub const NAME_KEYS: &[&str] = &["name", "filename", "file_name"];
pub const CREATED_KEYS: &[&str] = &["creation_date", "created_at", "created", "date"];
/// Top-level fallbacks for the extracted payload, tried after `results`.
pub const EXTRACTED_KEYS: &[&str] = &["extracted", "entities", "result", "data"];
pub const PICTURE_KEY: &str = "picture_id";

/// Pipeline stage of a record, derived from the presence of its picture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Status {
    #[serde(rename = "Procesado")]
    Processed,
    #[serde(rename = "Procesando")]
    Processing,
}

impl Status {
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Processed => "Procesado",
            Status::Processing => "Procesando",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity, display fields and extracted payload of one raw record.
///
/// Borrows the payload from the record it was built from.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRecord<'a> {
    pub id: String,
    /// True when no identity field was present and `id` is a placeholder.
    pub id_generated: bool,
    pub name: String,
    pub created: String,
    pub status: Status,
    pub picture_id: Option<String>,
    pub extracted: Option<&'a Value>,
}

/// Flatten a listing response into its records.
///
/// Arrays are used as-is. Objects are probed for the first array under
/// [`COLLECTION_KEYS`]; failing that, an object whose values are all
/// objects (or arrays) is read as an id-keyed dictionary of records.
/// Anything else yields no records.
pub fn coerce_records(listing: &Value) -> Vec<&Value> {
    match listing {
        Value::Array(items) => items.iter().collect(),
        Value::Object(map) => {
            for key in COLLECTION_KEYS {
                if let Some(Value::Array(items)) = map.get(*key) {
                    return items.iter().collect();
                }
            }
            let all_records = !map.is_empty()
                && map
                    .values()
                    .all(|v| matches!(v, Value::Object(_) | Value::Array(_)));
            if all_records {
                map.values().collect()
            } else {
                Vec::new()
            }
        }
        _ => Vec::new(),
    }
}

/// First non-null value among `keys`, in priority order.
pub fn first_present<'a>(record: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    let map = record.as_object()?;
    keys.iter()
        .filter_map(|k| map.get(*k))
        .find(|v| !v.is_null())
}

/// Render a scalar JSON value as display text.
///
/// Strings are taken verbatim; everything else uses its JSON form.
pub fn display_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn text_or(record: &Value, keys: &[&str], default: &str) -> String {
    first_present(record, keys)
        .map(display_text)
        .unwrap_or_else(|| default.to_string())
}

/// Resolve the extracted-content payload of a record.
///
/// Order: the `data` of the NER entry in `results`, the first `results`
/// entry with data, then the top-level [`EXTRACTED_KEYS`].
pub fn pick_extracted(record: &Value) -> Option<&Value> {
    if let Some(Value::Array(results)) = record.get("results") {
        // Only the first NER entry counts, even when its data is null.
        let ner = results
            .iter()
            .find(|entry| entry.get("process").and_then(Value::as_str) == Some(NER_PROCESS))
            .and_then(entry_data);
        if let Some(data) = ner.or_else(|| results.iter().find_map(entry_data)) {
            return Some(data);
        }
    }
    first_present(record, EXTRACTED_KEYS)
}

fn entry_data(entry: &Value) -> Option<&Value> {
    entry.get("data").filter(|d| !d.is_null())
}

/// Normalize one raw record.
pub fn normalize_record(record: &Value) -> NormalizedRecord<'_> {
    let (id, id_generated) = match first_present(record, ID_KEYS) {
        Some(v) => (display_text(v), false),
        None => (uuid::Uuid::new_v4().to_string(), true),
    };

    let picture_id = first_present(record, &[PICTURE_KEY]).map(display_text);
    let status = if picture_id.is_some() {
        Status::Processed
    } else {
        Status::Processing
    };

    NormalizedRecord {
        id,
        id_generated,
        name: text_or(record, NAME_KEYS, MISSING),
        created: text_or(record, CREATED_KEYS, MISSING),
        status,
        picture_id,
        extracted: pick_extracted(record),
    }
}
