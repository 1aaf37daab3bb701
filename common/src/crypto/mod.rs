mod address;
mod hash;

pub use address::{Address, AddressError, AddressKind};
pub use hash::TxHash;
