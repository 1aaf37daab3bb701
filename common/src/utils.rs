use chrono::{Local, TimeZone};

use crate::{config::STROOPS_PER_LUMEN, time::TimestampSeconds};

// Serialize a u64 as a decimal string
// The ledger's JSON rendition carries 64-bit integers as strings so that
// consumers with 53-bit numbers never silently lose precision
pub mod u64_string {
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &u64, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&value.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(u64),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Text(text) => text.parse().map_err(Error::custom),
            Raw::Number(value) => Ok(value),
        }
    }
}

// Same as above for the ledger's 128-bit signed integers
pub mod i128_string {
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &i128, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&value.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i128, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(i64),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Text(text) => text.parse().map_err(Error::custom),
            Raw::Number(value) => Ok(value as i128),
        }
    }
}

// Normalize a user-provided RPC endpoint into a usable https URL
pub fn sanitize_rpc_address(target: &str) -> String {
    let target = target.trim().trim_end_matches('/');
    if target.starts_with("http://") || target.starts_with("https://") {
        target.to_owned()
    } else {
        format!("https://{}", target)
    }
}

// Human readable amount with 7 decimals, e.g. 1000000 -> "0.1000000 XLM"
pub fn format_lumens(stroops: i128) -> String {
    let negative = stroops < 0;
    let value = stroops.unsigned_abs();
    let per_lumen = STROOPS_PER_LUMEN as u128;
    format!(
        "{}{}.{:07} XLM",
        if negative { "-" } else { "" },
        value / per_lumen,
        value % per_lumen
    )
}

// Local date/time for a ledger timestamp, used by UIs listing notes
pub fn format_timestamp(timestamp: TimestampSeconds) -> String {
    match Local.timestamp_opt(timestamp as i64, 0) {
        chrono::LocalResult::Single(datetime) => {
            datetime.format("%Y-%m-%d %H:%M:%S").to_string()
        }
        _ => format!("{}", timestamp),
    }
}
