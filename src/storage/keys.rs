//! Key layout of the range history store.
//!
//! All integers are big-endian so that byte order equals numeric order and
//! range scans walk records in chain order.

use crate::error::{Error, Result};
use crate::protocol::TransactionId;

/// Size of an operations-column key
pub const OPERATION_KEY_SIZE: usize = 8;

/// Key of an operation: `block ++ position_in_block`
pub fn operation_key(block: u32, position: u32) -> [u8; OPERATION_KEY_SIZE] {
    let mut key = [0u8; OPERATION_KEY_SIZE];
    key[..4].copy_from_slice(&block.to_be_bytes());
    key[4..].copy_from_slice(&position.to_be_bytes());
    key
}

/// Parse `(block, position_in_block)` from an operations-column key
pub fn decode_operation_key(bytes: &[u8]) -> Option<(u32, u32)> {
    if bytes.len() != OPERATION_KEY_SIZE {
        return None;
    }
    let block = u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
    let position = u32::from_be_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);
    Some((block, position))
}

/// Prefix shared by every history entry of one account: `len ++ account`
pub fn account_history_prefix(account: &str) -> Result<Vec<u8>> {
    let len = u8::try_from(account.len()).map_err(|_| {
        Error::invalid_argument("account", format!("account name too long: {}", account.len()))
    })?;
    let mut prefix = Vec::with_capacity(1 + account.len() + 4);
    prefix.push(len);
    prefix.extend_from_slice(account.as_bytes());
    Ok(prefix)
}

/// Key of an account history entry: `len ++ account ++ sequence`
pub fn account_history_key(account: &str, sequence: u32) -> Result<Vec<u8>> {
    let mut key = account_history_prefix(account)?;
    key.extend_from_slice(&sequence.to_be_bytes());
    Ok(key)
}

/// Parse the sequence number from an account history key under `prefix`
pub fn decode_account_sequence(prefix: &[u8], key: &[u8]) -> Option<u32> {
    let rest = key.strip_prefix(prefix)?;
    let raw: [u8; 4] = rest.try_into().ok()?;
    Some(u32::from_be_bytes(raw))
}

/// Key of a transaction locator
pub fn transaction_key(id: &TransactionId) -> Vec<u8> {
    id.as_bytes().to_vec()
}

/// Value of a transaction locator: `block ++ trx_in_block`
pub fn transaction_locator_value(block: u32, trx_in_block: u32) -> [u8; OPERATION_KEY_SIZE] {
    operation_key(block, trx_in_block)
}

/// Parse `(block, trx_in_block)` from a transaction locator value
pub fn decode_transaction_locator(bytes: &[u8]) -> Option<(u32, u32)> {
    decode_operation_key(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_key_encoding() {
        let key = operation_key(12345, 7);
        assert_eq!(decode_operation_key(&key), Some((12345, 7)));
        assert_eq!(decode_operation_key(&key[..7]), None);
    }

    #[test]
    fn test_sort_order() {
        // Big-endian ensures lexicographic sort = numeric sort
        assert!(operation_key(1, 300) < operation_key(2, 0));
        assert!(operation_key(256, 0) > operation_key(255, 9));
        assert!(account_history_key("bob", 255).unwrap() < account_history_key("bob", 256).unwrap());
    }

    #[test]
    fn test_account_prefixes_do_not_overlap() {
        // "bob" must not be a prefix of "bobby"'s entries
        let bob = account_history_prefix("bob").unwrap();
        let bobby = account_history_key("bobby", 0).unwrap();
        assert!(!bobby.starts_with(&bob));
    }

    #[test]
    fn test_account_sequence_decoding() {
        let prefix = account_history_prefix("alice").unwrap();
        let key = account_history_key("alice", 42).unwrap();
        assert_eq!(decode_account_sequence(&prefix, &key), Some(42));

        let other = account_history_key("carol", 42).unwrap();
        assert_eq!(decode_account_sequence(&prefix, &other), None);
    }

    #[test]
    fn test_account_name_too_long() {
        let name = "a".repeat(300);
        assert!(account_history_prefix(&name).is_err());
    }
}
