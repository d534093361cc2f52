//! Deserialize helpers shared by the payload types

use serde::{Deserialize, Deserializer};

/// Treat an explicit `null` like a missing field. Pair with `#[serde(default)]`
/// so one record with a `null` does not sink the whole list.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
