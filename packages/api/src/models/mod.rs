//! Wire models.
//!
//! The backend is loose about JSON types (ids are UUID strings or integers,
//! flags arrive as booleans, strings or numbers), so deserialization here is
//! deliberately forgiving in shape and strict in meaning.

mod catalogue;
mod progress;
mod unit;
mod user;

pub use catalogue::{
    CatalogueEntry, CatalogueKind, CataloguePage, DownloadJob, JobState, JobStatus,
    PerformanceCriterion, UnitElement, UnitElements, CATALOGUE_PAGE_SIZE,
};
pub use progress::{Ack, GuestProgress, GuestProgressUpdate, TransferRequest};
pub use unit::{Quest, Unit, UnitQuery};
pub use user::{
    normalize_admin_flag, Credentials, Level, LoginResponse, Registration, TokenResponse,
    UserRecord,
};

pub(crate) mod de {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    /// Accept `"abc"` or `42` as a string id.
    pub fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::String(s) => Ok(s),
            Value::Number(n) => Ok(n.to_string()),
            other => Err(serde::de::Error::custom(format!(
                "expected string or number id, got {other}"
            ))),
        }
    }

    /// Treat `null` like a missing field.
    pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: Default + Deserialize<'de>,
    {
        Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
    }
}
