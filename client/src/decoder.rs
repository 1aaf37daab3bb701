// Decoding of confirmed-transaction and simulation payloads back into
// domain values.
//
// The contract return value lives in the execution metadata
// (`result_meta.soroban_meta.return_value`), not in the top-level result
// code. An absent or oddly shaped substructure is ledger data missing, not
// a technical failure, so every function here degrades to a neutral value
// instead of erroring.

use log::debug;
use nota_common::{
    api::{GetTransactionResult, SimulateTransactionResult},
    crypto::Address,
    note::Note,
    value::ScValue,
};

// Walk the metadata of a confirmed transaction down to the return value
pub fn return_value(result: &GetTransactionResult) -> Option<&ScValue> {
    result
        .result_meta
        .as_ref()?
        .soroban_meta
        .as_ref()?
        .return_value
        .as_ref()
}

// Return value of a simulation, None when the simulation errored
pub fn simulation_value(result: &SimulateTransactionResult) -> Option<&ScValue> {
    if let Some(error) = &result.error {
        debug!("Simulation reported an error: {}", error);
        return None;
    }
    result.return_value.as_ref()
}

pub fn decode_u64(value: Option<&ScValue>) -> Option<u64> {
    value?.as_u64()
}

// Widens every unsigned kind into i128, the precision-safe representation
pub fn decode_i128(value: Option<&ScValue>) -> Option<i128> {
    value?.as_i128()
}

pub fn decode_bool(value: Option<&ScValue>) -> Option<bool> {
    value?.as_bool()
}

pub fn decode_address(value: Option<&ScValue>) -> Option<Address> {
    value?.as_address().cloned()
}

// A single note; void means the contract had nothing for this id
pub fn decode_note(value: &ScValue) -> Option<Note> {
    if value.is_void() {
        return None;
    }
    match Note::try_from(value) {
        Ok(note) => Some(note),
        Err(error) => {
            debug!("Skipping undecodable note record: {}", error);
            None
        }
    }
}

// A list of notes, in ledger order. Entries that fail to decode are
// skipped rather than poisoning the whole list.
pub fn decode_notes(value: &ScValue) -> Vec<Note> {
    match value.as_vec() {
        Some(items) => items.iter().filter_map(decode_note).collect(),
        None => Vec::new(),
    }
}

// The (count, active_count) pair of get_user_stats
pub fn decode_stats(value: &ScValue) -> Option<(u64, u64)> {
    let items = value.as_vec()?;
    match items {
        [total, active] => Some((total.as_u64()?, active.as_u64()?)),
        _ => None,
    }
}
