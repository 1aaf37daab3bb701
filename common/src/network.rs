use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{MAINNET_PASSPHRASE, TESTNET_PASSPHRASE};

#[derive(Debug, Error)]
#[error("Invalid network '{}'", _0)]
pub struct InvalidNetwork(String);

// Which ledger network an envelope is bound to
// The passphrase is mixed into the signature payload, so an envelope
// signed for one network can never be replayed on the other
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Network {
    Mainnet,
    Testnet,
}

impl Network {
    pub fn passphrase(&self) -> &'static str {
        match self {
            Self::Mainnet => MAINNET_PASSPHRASE,
            Self::Testnet => TESTNET_PASSPHRASE,
        }
    }

    pub fn is_mainnet(&self) -> bool {
        matches!(self, Self::Mainnet)
    }
}

impl Default for Network {
    fn default() -> Self {
        // development default, like every other piece of tooling around here
        Self::Testnet
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mainnet => write!(f, "mainnet"),
            Self::Testnet => write!(f, "testnet"),
        }
    }
}

impl FromStr for Network {
    type Err = InvalidNetwork;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mainnet" => Ok(Self::Mainnet),
            "testnet" => Ok(Self::Testnet),
            _ => Err(InvalidNetwork(s.to_owned())),
        }
    }
}
