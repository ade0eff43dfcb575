//! Virtual operation classification.
//!
//! Only a fixed set of virtual kinds can be selected by name. Every other kind,
//! including the remaining protocol-virtual ones, classifies with an empty name
//! and falls back to the virtual flag stored on its record. A record of an
//! unnamed kind stored as virtual is therefore reported as virtual but never
//! matches a name filter.

use std::collections::BTreeSet;

use crate::history::types::OperationRecord;
use crate::protocol::Operation;

/// Names accepted by the `enum_virtual_ops` filter
pub const VIRTUAL_OPERATION_NAMES: [&str; 23] = [
    "fill_convert_request_operation",
    "author_reward_operation",
    "curation_reward_operation",
    "comment_reward_operation",
    "liquidity_reward_operation",
    "interest_operation",
    "fill_vesting_withdraw_operation",
    "fill_order_operation",
    "shutdown_witness_operation",
    "fill_transfer_from_savings_operation",
    "hardfork_operation",
    "comment_payout_update_operation",
    "return_vesting_delegation_operation",
    "comment_benefactor_reward_operation",
    "producer_reward_operation",
    "clear_null_account_balance_operation",
    "proposal_pay_operation",
    "sps_fund_operation",
    "hardfork_hive_operation",
    "hardfork_hive_restore_operation",
    "delayed_voting_operation",
    "consolidate_treasury_balance_operation",
    "effective_comment_vote_operation",
];

/// Outcome of classifying a record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    /// Whether the record counts as virtual
    pub is_virtual: bool,
    /// Filter name, empty for unnamed kinds
    pub name: &'static str,
}

/// Filter name of a whitelisted virtual kind
pub fn virtual_op_name(op: &Operation) -> Option<&'static str> {
    match op {
        Operation::FillConvertRequest(_)
        | Operation::AuthorReward(_)
        | Operation::CurationReward(_)
        | Operation::CommentReward(_)
        | Operation::LiquidityReward(_)
        | Operation::Interest(_)
        | Operation::FillVestingWithdraw(_)
        | Operation::FillOrder(_)
        | Operation::ShutdownWitness(_)
        | Operation::FillTransferFromSavings(_)
        | Operation::Hardfork(_)
        | Operation::CommentPayoutUpdate(_)
        | Operation::ReturnVestingDelegation(_)
        | Operation::CommentBenefactorReward(_)
        | Operation::ProducerReward(_)
        | Operation::ClearNullAccountBalance(_)
        | Operation::ProposalPay(_)
        | Operation::SpsFund(_)
        | Operation::HardforkHive(_)
        | Operation::HardforkHiveRestore(_)
        | Operation::DelayedVoting(_)
        | Operation::ConsolidateTreasuryBalance(_)
        | Operation::EffectiveCommentVote(_) => Some(op.name()),

        Operation::Vote(_)
        | Operation::Comment(_)
        | Operation::Transfer(_)
        | Operation::TransferToVesting(_)
        | Operation::WithdrawVesting(_)
        | Operation::LimitOrderCreate(_)
        | Operation::LimitOrderCancel(_)
        | Operation::FeedPublish(_)
        | Operation::Convert(_)
        | Operation::AccountCreate(_)
        | Operation::AccountWitnessVote(_)
        | Operation::CustomJson(_)
        | Operation::ClaimRewardBalance(_)
        | Operation::DelegateVestingShares(_)
        | Operation::TransferToSavings(_)
        | Operation::TransferFromSavings(_)
        | Operation::AccountCreated(_)
        | Operation::IneffectiveDeleteComment(_)
        | Operation::ChangedRecoveryAccount(_) => None,
    }
}

/// Classify a record
pub fn classify(record: &OperationRecord) -> Classification {
    match virtual_op_name(&record.op) {
        Some(name) => Classification {
            is_virtual: true,
            name,
        },
        None => Classification {
            is_virtual: record.virtual_op,
            name: "",
        },
    }
}

/// Whether a record passes an optional name filter
pub fn matches_filter(classification: &Classification, filter: Option<&BTreeSet<String>>) -> bool {
    match filter {
        Some(names) => !classification.name.is_empty() && names.contains(classification.name),
        None => true,
    }
}
