//! API limits and storage constants.
//!
//! All service-wide constants are defined here for easy auditing.

// ═══════════════════════════════════════════════════════════════════════════════
// REQUEST LIMITS
// ═══════════════════════════════════════════════════════════════════════════════

/// Maximum number of entries a bounded history query may request
pub const MAX_HISTORY_LIMIT: u32 = 10_000;

// ═══════════════════════════════════════════════════════════════════════════════
// PROTOCOL CONSTANTS
// ═══════════════════════════════════════════════════════════════════════════════

/// Size of a transaction id in bytes
pub const TRANSACTION_ID_SIZE: usize = 20;

/// Longest account name accepted by the protocol
pub const MAX_ACCOUNT_NAME_LENGTH: usize = 16;

// ═══════════════════════════════════════════════════════════════════════════════
// API NAMES
// ═══════════════════════════════════════════════════════════════════════════════

/// Name under which the query methods are registered on the JSON-RPC surface
pub const API_NAME: &str = "account_history_api";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limits() {
        assert_eq!(MAX_HISTORY_LIMIT, 10_000);
        assert!(MAX_ACCOUNT_NAME_LENGTH < u8::MAX as usize);
    }
}
