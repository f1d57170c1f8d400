//! Page merge algorithm

use crate::error::{Error, Result};
use crate::types::{JsonObject, JsonValue};

/// What the merge produced
#[derive(Debug, Clone, PartialEq)]
pub enum Merged {
    /// A single logical value
    Value(JsonValue),
    /// Shapes could not be combined; the pages are returned untouched
    Unmerged {
        /// Why the pages were left alone
        reason: &'static str,
        /// The original pages
        pages: Vec<JsonValue>,
    },
}

impl Merged {
    /// Collapse into a value, turning unmerged pages into an array
    pub fn into_value(self) -> JsonValue {
        match self {
            Merged::Value(value) => value,
            Merged::Unmerged { pages, .. } => JsonValue::Array(pages),
        }
    }
}

/// Merge pages, returning the raw page array when shapes are mixed
pub fn merge(pages: Vec<JsonValue>) -> JsonValue {
    merge_pages(pages).into_value()
}

/// Merge pages, failing with `Error::Normalization` when shapes are mixed
pub fn merge_strict(pages: Vec<JsonValue>) -> Result<JsonValue> {
    match merge_pages(pages) {
        Merged::Value(value) => Ok(value),
        Merged::Unmerged { reason, pages } => Err(Error::normalization(format!(
            "{reason} across {} pages",
            pages.len()
        ))),
    }
}

/// Merge pages and report whether they could be combined
pub fn merge_pages(mut pages: Vec<JsonValue>) -> Merged {
    if pages.len() == 1 {
        return Merged::Value(pages.swap_remove(0));
    }
    if pages.is_empty() {
        return Merged::Value(JsonValue::Array(pages));
    }
    if pages.iter().all(|page| page == &pages[0]) {
        return Merged::Value(pages.swap_remove(0));
    }

    let mut combined_object = JsonObject::new();
    let mut combined_array = Vec::new();

    let mut saw_scalar = false;

    for page in &pages {
        match page {
            JsonValue::Array(items) => combined_array.extend(items.iter().cloned()),
            JsonValue::Object(map) => merge_object(&mut combined_object, map),
            _ => {
                saw_scalar = true;
                break;
            }
        }
    }

    if saw_scalar {
        return Merged::Unmerged {
            reason: "scalar page",
            pages,
        };
    }
    if !combined_object.is_empty() && !combined_array.is_empty() {
        return Merged::Unmerged {
            reason: "mixed object and array pages",
            pages,
        };
    }
    if !combined_object.is_empty() {
        return Merged::Value(JsonValue::Object(combined_object));
    }
    if !combined_array.is_empty() {
        return Merged::Value(JsonValue::Array(combined_array));
    }

    Merged::Unmerged {
        reason: "no mergeable content",
        pages,
    }
}

/// Array values extend an existing array under the same key; anything
/// else overwrites.
fn merge_object(into: &mut JsonObject, page: &JsonObject) {
    for (key, value) in page {
        match (into.get_mut(key), value) {
            (Some(JsonValue::Array(existing)), JsonValue::Array(more)) => {
                existing.extend(more.iter().cloned());
            }
            _ => {
                into.insert(key.clone(), value.clone());
            }
        }
    }
}
