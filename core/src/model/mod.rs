pub mod driver;
pub mod stint;

pub use driver::{Driver, DriverNumber, InvalidDriverNumber};
pub use stint::{Compound, Stint};

use serde::{Deserialize, Deserializer};

/// Reads an explicit JSON `null` the same way as a missing field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
