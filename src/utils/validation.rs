//! Request validation for the history queries.
//!
//! Every check here runs before any index or store lookup, so a rejected
//! request never touches storage.

use crate::error::{Error, Result};
use crate::utils::constants::{MAX_ACCOUNT_NAME_LENGTH, MAX_HISTORY_LIMIT};

// ═══════════════════════════════════════════════════════════════════════════════
// LIMIT VALIDATION
// ═══════════════════════════════════════════════════════════════════════════════

/// Validate that a bounded query does not request more than the maximum
pub fn validate_history_limit(limit: u32) -> Result<()> {
    if limit > MAX_HISTORY_LIMIT {
        return Err(Error::invalid_argument(
            "limit",
            format!("limit of {} is greater than maximum allowed {}", limit, MAX_HISTORY_LIMIT),
        ));
    }
    Ok(())
}

/// Validate the `(start, limit)` window of an account history request.
///
/// The window end-point must be at least as large as the requested count.
pub fn validate_account_history_window(start: u32, limit: u32) -> Result<()> {
    validate_history_limit(limit)?;

    if start < limit {
        return Err(Error::invalid_argument(
            "start",
            format!("start {} must be greater than or equal to limit {}", start, limit),
        ));
    }

    Ok(())
}

/// Validate the arguments of a virtual operation enumeration
pub fn validate_block_range(block_range_begin: u32, block_range_end: u32, limit: u32) -> Result<()> {
    if block_range_begin > block_range_end {
        return Err(Error::invalid_argument(
            "block_range_begin",
            format!(
                "block range must be upward: begin {} is past end {}",
                block_range_begin, block_range_end
            ),
        ));
    }

    if limit == 0 {
        return Err(Error::invalid_argument("limit", "limit must be at least 1"));
    }

    validate_history_limit(limit)
}

// ═══════════════════════════════════════════════════════════════════════════════
// ACCOUNT VALIDATION
// ═══════════════════════════════════════════════════════════════════════════════

/// Validate an account name against the protocol's naming rules
pub fn validate_account_name(account: &str) -> Result<()> {
    if account.is_empty() || account.len() > MAX_ACCOUNT_NAME_LENGTH {
        return Err(Error::invalid_argument(
            "account",
            format!(
                "account name must be 1 to {} characters, got {}",
                MAX_ACCOUNT_NAME_LENGTH,
                account.len()
            ),
        ));
    }

    let valid_chars = account
        .bytes()
        .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-' || b == b'.');
    if !valid_chars {
        return Err(Error::invalid_argument(
            "account",
            format!("account name {:?} contains invalid characters", account),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_history_limit() {
        assert!(validate_history_limit(0).is_ok());
        assert!(validate_history_limit(MAX_HISTORY_LIMIT).is_ok());

        let err = validate_history_limit(MAX_HISTORY_LIMIT + 1).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn test_account_history_window() {
        assert!(validate_account_history_window(5, 3).is_ok());
        assert!(validate_account_history_window(3, 3).is_ok());
        assert!(validate_account_history_window(0, 0).is_ok());

        let err = validate_account_history_window(2, 3).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument { ref name, .. } if name == "start"));

        let err = validate_account_history_window(u32::MAX, 10_001).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument { ref name, .. } if name == "limit"));
    }

    #[test]
    fn test_block_range() {
        assert!(validate_block_range(1, 10, 100).is_ok());
        assert!(validate_block_range(10, 10, 1).is_ok());
        assert!(validate_block_range(11, 10, 1).is_err());
        assert!(validate_block_range(1, 10, 0).is_err());
        assert!(validate_block_range(1, 10, 10_001).is_err());
    }

    #[test]
    fn test_account_name() {
        assert!(validate_account_name("alice").is_ok());
        assert!(validate_account_name("hive.fund").is_ok());
        assert!(validate_account_name("steem-dev-42").is_ok());
        assert!(validate_account_name("").is_err());
        assert!(validate_account_name("Alice").is_err());
        assert!(validate_account_name("a-very-long-account-name").is_err());
    }
}
