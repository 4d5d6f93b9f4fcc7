//! Field decoders for nullable backend columns.

use serde::{Deserialize, Deserializer};

/// `deserialize_with` target that reads `null` as the type's default. Pair it
/// with `#[serde(default)]` so a missing field decodes the same way.
pub fn default_on_null<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
