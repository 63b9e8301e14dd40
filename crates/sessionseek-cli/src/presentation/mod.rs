pub mod highlight;
pub mod plain;

use anyhow::Result;
use serde::Serialize;

/// Pretty JSON, with grouped sessions kept in ranked order.
pub fn to_json<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}
