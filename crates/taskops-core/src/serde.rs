// Module name shadows the `serde` crate — use `::serde` for the external crate.

/// Serialize/deserialize `DateTime<Utc>` as integer epoch milliseconds.
/// Matches the browser-side `Date.now()` representation used on the chat wire.
/// Use with `#[serde(with = "taskops_core::serde::epoch_ms")]`.
pub mod epoch_ms {
    use ::serde::{Deserialize, Deserializer, Serializer};
    use chrono::{DateTime, Utc};

    pub fn serialize<S>(dt: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        s.serialize_i64(dt.timestamp_millis())
    }

    pub fn deserialize<'de, D>(d: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let ms = i64::deserialize(d)?;
        DateTime::<Utc>::from_timestamp_millis(ms)
            .ok_or_else(|| ::serde::de::Error::custom("timestamp out of range"))
    }
}
