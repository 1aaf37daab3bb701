use serde::{Deserialize, Serialize};

use crate::{
    crypto::Address,
    time::TimestampSeconds,
    value::{CodecError, ScValue},
};

/// A note record as stored by the contract.
///
/// Identity is the pair (owner, id); the id is assigned by the contract and
/// never by the client. Deleting a note flips `active` to false, the record
/// itself stays on the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: u64,
    pub owner: Address,
    pub title: String,
    pub content_ref: String,
    pub created_at: TimestampSeconds,
    pub active: bool,
}

impl TryFrom<&ScValue> for Note {
    type Error = CodecError;

    // The contract returns a note as a map with symbol keys
    fn try_from(value: &ScValue) -> Result<Self, Self::Error> {
        let fields = value.map_fields().ok_or_else(|| {
            CodecError::UnexpectedShape(format!("expected a map, found {}", value.value_type()))
        })?;

        let field = |name: &'static str| {
            fields
                .get(name)
                .copied()
                .ok_or(CodecError::MissingField(name))
        };

        Ok(Self {
            id: field("id")?
                .as_u64()
                .ok_or(CodecError::MissingField("id"))?,
            owner: field("owner")?
                .as_address()
                .cloned()
                .ok_or(CodecError::MissingField("owner"))?,
            title: field("title")?
                .as_str()
                .map(str::to_owned)
                .ok_or(CodecError::MissingField("title"))?,
            content_ref: field("content_ref")?
                .as_str()
                .map(str::to_owned)
                .ok_or(CodecError::MissingField("content_ref"))?,
            created_at: field("created_at")?
                .as_u64()
                .ok_or(CodecError::MissingField("created_at"))?,
            active: field("active")?
                .as_bool()
                .ok_or(CodecError::MissingField("active"))?,
        })
    }
}
