//! Transactions, blocks and transaction identifiers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::protocol::operations::Operation;
use crate::utils::constants::TRANSACTION_ID_SIZE;

// ═══════════════════════════════════════════════════════════════════════════════
// TRANSACTION ID
// ═══════════════════════════════════════════════════════════════════════════════

/// Truncated SHA-256 digest identifying a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct TransactionId([u8; TRANSACTION_ID_SIZE]);

impl TransactionId {
    /// Id carried by operations that do not belong to a transaction
    pub const ZERO: Self = Self([0u8; TRANSACTION_ID_SIZE]);

    /// Create from raw bytes
    pub const fn new(bytes: [u8; TRANSACTION_ID_SIZE]) -> Self {
        Self(bytes)
    }

    /// Create from a byte slice
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let raw: [u8; TRANSACTION_ID_SIZE] = bytes.try_into().map_err(|_| {
            Error::invalid_argument(
                "id",
                format!(
                    "transaction id must be {} bytes, got {}",
                    TRANSACTION_ID_SIZE,
                    bytes.len()
                ),
            )
        })?;
        Ok(Self(raw))
    }

    /// Get raw bytes
    pub fn as_bytes(&self) -> &[u8; TRANSACTION_ID_SIZE] {
        &self.0
    }

    /// Whether this is the reserved zero id
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; TRANSACTION_ID_SIZE]
    }

    /// Lowercase hex representation
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl FromStr for TransactionId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let bytes = hex::decode(s)
            .map_err(|e| Error::invalid_argument("id", format!("invalid hex: {}", e)))?;
        Self::from_slice(&bytes)
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl Serialize for TransactionId {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for TransactionId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// TRANSACTION
// ═══════════════════════════════════════════════════════════════════════════════

/// The signed part of a transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnsignedTransaction {
    /// Low 16 bits of a recent block number
    pub ref_block_num: u16,
    /// Prefix of the referenced block id
    pub ref_block_prefix: u32,
    /// Expiration time
    pub expiration: DateTime<Utc>,
    /// Operations in execution order
    pub operations: Vec<Operation>,
}

/// A transaction as included in a block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedTransaction {
    /// Low 16 bits of a recent block number
    pub ref_block_num: u16,
    /// Prefix of the referenced block id
    pub ref_block_prefix: u32,
    /// Expiration time
    pub expiration: DateTime<Utc>,
    /// Operations in execution order
    pub operations: Vec<Operation>,
    /// Hex-encoded signatures
    pub signatures: Vec<String>,
}

impl SignedTransaction {
    /// Body covered by the transaction id
    pub fn unsigned(&self) -> UnsignedTransaction {
        UnsignedTransaction {
            ref_block_num: self.ref_block_num,
            ref_block_prefix: self.ref_block_prefix,
            expiration: self.expiration,
            operations: self.operations.clone(),
        }
    }

    /// Transaction id: leading bytes of the SHA-256 of the encoded body
    pub fn id(&self) -> Result<TransactionId> {
        let body = bincode::serialize(&self.unsigned())
            .map_err(|e| Error::Serialization(e.to_string()))?;
        let digest = Sha256::digest(&body);
        TransactionId::from_slice(&digest[..TRANSACTION_ID_SIZE])
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// BLOCK
// ═══════════════════════════════════════════════════════════════════════════════

/// A produced block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedBlock {
    /// Hex id of the previous block
    pub previous: String,
    /// Production time
    pub timestamp: DateTime<Utc>,
    /// Producing witness
    pub witness: String,
    /// Included transactions
    pub transactions: Vec<SignedTransaction>,
}
