use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use thiserror::Error;

use crate::crypto::{Address, AddressError};

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("Type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: ValueType, found: String },
    #[error("Integer out of range for {}", _0)]
    OutOfRange(ValueType),
    #[error(transparent)]
    InvalidAddress(#[from] AddressError),
    #[error("Missing field '{}' in ledger map", _0)]
    MissingField(&'static str),
    #[error("Unexpected value shape: {}", _0)]
    UnexpectedShape(String),
}

// Declared argument types, used to check dynamically typed inputs
// before they are encoded into a ledger value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    Bool,
    Void,
    U32,
    U64,
    I128,
    String,
    Symbol,
    Address,
    Vec,
    Map,
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Bool => "bool",
            Self::Void => "void",
            Self::U32 => "u32",
            Self::U64 => "u64",
            Self::I128 => "i128",
            Self::String => "string",
            Self::Symbol => "symbol",
            Self::Address => "address",
            Self::Vec => "vec",
            Self::Map => "map",
        };
        write!(f, "{}", name)
    }
}

/// The ledger's self-describing value format.
///
/// This is a boundary type: it exists between the client and the RPC
/// service, and domain code never holds one past the result decoder.
/// The serde form matches the ledger's JSON rendition, with 64-bit and
/// 128-bit integers carried as decimal strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScValue {
    Bool(bool),
    Void,
    U32(u32),
    #[serde(with = "crate::utils::u64_string")]
    U64(u64),
    #[serde(with = "crate::utils::i128_string")]
    I128(i128),
    String(String),
    Symbol(String),
    Address(Address),
    Vec(Vec<ScValue>),
    Map(Vec<ScMapEntry>),
}

// Ledger maps are ordered lists of key/value pairs, not hash maps
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScMapEntry {
    pub key: ScValue,
    pub val: ScValue,
}

impl ScValue {
    pub fn u32(value: u32) -> Self {
        Self::U32(value)
    }

    pub fn u64(value: u64) -> Self {
        Self::U64(value)
    }

    pub fn i128(value: i128) -> Self {
        Self::I128(value)
    }

    pub fn string(value: impl Into<String>) -> Self {
        Self::String(value.into())
    }

    pub fn symbol(value: impl Into<String>) -> Self {
        Self::Symbol(value.into())
    }

    pub fn address(value: Address) -> Self {
        Self::Address(value)
    }

    pub fn value_type(&self) -> ValueType {
        match self {
            Self::Bool(_) => ValueType::Bool,
            Self::Void => ValueType::Void,
            Self::U32(_) => ValueType::U32,
            Self::U64(_) => ValueType::U64,
            Self::I128(_) => ValueType::I128,
            Self::String(_) => ValueType::String,
            Self::Symbol(_) => ValueType::Symbol,
            Self::Address(_) => ValueType::Address,
            Self::Vec(_) => ValueType::Vec,
            Self::Map(_) => ValueType::Map,
        }
    }

    /// Encode a dynamically typed input against a declared type.
    ///
    /// The runtime shape of `raw` must match `ty` exactly: a negative
    /// integer declared unsigned, a fractional number declared integer or a
    /// string declared bool all fail here, synchronously, before any
    /// network call has been made.
    pub fn from_parts(raw: Value, ty: ValueType) -> Result<Self, CodecError> {
        let mismatch = |raw: &Value| CodecError::TypeMismatch {
            expected: ty,
            found: json_kind(raw).to_owned(),
        };

        match ty {
            ValueType::Bool => raw.as_bool().map(Self::Bool).ok_or_else(|| mismatch(&raw)),
            ValueType::Void => {
                if raw.is_null() {
                    Ok(Self::Void)
                } else {
                    Err(mismatch(&raw))
                }
            }
            ValueType::U32 => match raw.as_u64() {
                Some(value) if value <= u32::MAX as u64 => Ok(Self::U32(value as u32)),
                Some(_) => Err(CodecError::OutOfRange(ty)),
                None if raw.is_i64() => Err(CodecError::OutOfRange(ty)),
                None => Err(mismatch(&raw)),
            },
            ValueType::U64 => match raw.as_u64() {
                Some(value) => Ok(Self::U64(value)),
                None if raw.is_i64() => Err(CodecError::OutOfRange(ty)),
                None => Err(mismatch(&raw)),
            },
            ValueType::I128 => match &raw {
                Value::Number(number) => number
                    .as_i64()
                    .map(|v| Self::I128(v as i128))
                    .or_else(|| number.as_u64().map(|v| Self::I128(v as i128)))
                    .ok_or_else(|| mismatch(&raw)),
                // decimal strings are the precision-safe input form
                Value::String(text) => text
                    .parse::<i128>()
                    .map(Self::I128)
                    .map_err(|_| mismatch(&raw)),
                _ => Err(mismatch(&raw)),
            },
            ValueType::String => raw
                .as_str()
                .map(Self::string)
                .ok_or_else(|| mismatch(&raw)),
            ValueType::Symbol => raw
                .as_str()
                .map(Self::symbol)
                .ok_or_else(|| mismatch(&raw)),
            ValueType::Address => match raw.as_str() {
                Some(text) => Ok(Self::Address(text.parse::<Address>()?)),
                None => Err(mismatch(&raw)),
            },
            ValueType::Vec => match raw {
                Value::Array(items) => items
                    .into_iter()
                    .map(Self::from_native)
                    .collect::<Result<Vec<_>, _>>()
                    .map(Self::Vec),
                other => Err(mismatch(&other)),
            },
            ValueType::Map => match raw {
                Value::Object(entries) => {
                    let mut map = Vec::with_capacity(entries.len());
                    for (key, val) in entries {
                        map.push(ScMapEntry {
                            key: Self::symbol(key),
                            val: Self::from_native(val)?,
                        });
                    }
                    Ok(Self::Map(map))
                }
                other => Err(mismatch(&other)),
            },
        }
    }

    // Best effort typing for composite elements: integers become the widest
    // kind, strings stay plain strings. Address/symbol distinctions need a
    // declared type.
    fn from_native(raw: Value) -> Result<Self, CodecError> {
        let ty = match &raw {
            Value::Null => ValueType::Void,
            Value::Bool(_) => ValueType::Bool,
            Value::Number(number) if number.as_u64().is_some() => ValueType::U64,
            Value::Number(_) => ValueType::I128,
            Value::String(_) => ValueType::String,
            Value::Array(_) => ValueType::Vec,
            Value::Object(_) => ValueType::Map,
        };
        Self::from_parts(raw, ty)
    }

    /// Inverse of [`ScValue::from_parts`]: back to the native
    /// representation. `from_parts(v.to_native(), v.value_type())`
    /// reproduces `v` for every scalar value.
    pub fn to_native(&self) -> Value {
        match self {
            Self::Bool(value) => Value::Bool(*value),
            Self::Void => Value::Null,
            Self::U32(value) => Value::from(*value),
            Self::U64(value) => Value::from(*value),
            Self::I128(value) => Value::String(value.to_string()),
            Self::String(value) | Self::Symbol(value) => Value::String(value.clone()),
            Self::Address(address) => Value::String(address.encode()),
            Self::Vec(items) => Value::Array(items.iter().map(Self::to_native).collect()),
            Self::Map(entries) => {
                let mut object = serde_json::Map::with_capacity(entries.len());
                for entry in entries {
                    let key = match &entry.key {
                        Self::String(text) | Self::Symbol(text) => text.clone(),
                        other => other.to_native().to_string(),
                    };
                    object.insert(key, entry.val.to_native());
                }
                Value::Object(object)
            }
        }
    }

    pub fn is_void(&self) -> bool {
        matches!(self, Self::Void)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Self::U32(value) => Some(*value as u64),
            Self::U64(value) => Some(*value),
            _ => None,
        }
    }

    // Every unsigned kind widens losslessly into i128
    pub fn as_i128(&self) -> Option<i128> {
        match self {
            Self::U32(value) => Some(*value as i128),
            Self::U64(value) => Some(*value as i128),
            Self::I128(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(value) | Self::Symbol(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_address(&self) -> Option<&Address> {
        match self {
            Self::Address(address) => Some(address),
            _ => None,
        }
    }

    pub fn as_vec(&self) -> Option<&[ScValue]> {
        match self {
            Self::Vec(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&[ScMapEntry]> {
        match self {
            Self::Map(entries) => Some(entries),
            _ => None,
        }
    }

    // Field lookup over a ledger map with string/symbol keys,
    // preserving the ledger's entry order
    pub fn map_fields(&self) -> Option<IndexMap<&str, &ScValue>> {
        let entries = self.as_map()?;
        let mut fields = IndexMap::with_capacity(entries.len());
        for entry in entries {
            if let Some(key) = entry.key.as_str() {
                fields.insert(key, &entry.val);
            }
        }
        Some(fields)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
