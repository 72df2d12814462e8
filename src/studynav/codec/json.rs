//! JSON collection files: `{"items": [ ... ]}`, pretty-printed with two-space
//! indentation. Field order follows the struct definitions in `model`.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::error::Result;
use crate::model::Record;

#[derive(Serialize)]
struct CollectionOut<'a, R> {
    items: &'a [R],
}

// The first prototype stored a bare array; both shapes are accepted on read.
// An object without `items` is neither and fails to decode.
#[derive(Deserialize)]
#[serde(untagged)]
enum CollectionIn {
    Wrapped { items: Vec<Value> },
    Bare(Vec<Value>),
}

pub fn encode_collection<R: Record>(records: &[R]) -> Result<String> {
    let mut out = serde_json::to_string_pretty(&CollectionOut { items: records })?;
    out.push('\n');
    Ok(out)
}

/// Decode a collection. Items that fail to decode are skipped with a warning;
/// only a document that is not a collection at all is an error.
pub fn decode_collection<R: Record>(content: &str) -> Result<Vec<R>> {
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }

    let items = match serde_json::from_str::<CollectionIn>(content)? {
        CollectionIn::Wrapped { items } => items,
        CollectionIn::Bare(items) => items,
    };

    let mut records = Vec::with_capacity(items.len());
    for (position, item) in items.into_iter().enumerate() {
        match serde_json::from_value::<R>(item) {
            Ok(record) => records.push(record),
            Err(err) => warn!(
                kind = R::KIND.label(),
                position,
                error = %err,
                "skipping undecodable record"
            ),
        }
    }
    Ok(records)
}
