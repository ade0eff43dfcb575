//! Operation kinds recorded in the chain history.
//!
//! `Operation` is a closed enumeration: every kind the history can contain is a
//! variant here, and every `match` over it is exhaustive. User-authored kinds
//! come first, followed by the system-generated (virtual) kinds.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::protocol::asset::{Asset, Price};

// ═══════════════════════════════════════════════════════════════════════════════
// USER OPERATIONS
// ═══════════════════════════════════════════════════════════════════════════════

/// Vote on a post or comment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteOperation {
    /// Voting account
    pub voter: String,
    /// Author of the voted content
    pub author: String,
    /// Permlink of the voted content
    pub permlink: String,
    /// Vote weight in basis points, negative for downvotes
    pub weight: i16,
}

/// Publish or edit a post or comment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentOperation {
    /// Parent author, empty for root posts
    pub parent_author: String,
    /// Parent permlink or category
    pub parent_permlink: String,
    /// Author
    pub author: String,
    /// Permlink
    pub permlink: String,
    /// Title
    pub title: String,
    /// Body
    pub body: String,
    /// Free-form JSON metadata
    pub json_metadata: String,
}

/// Transfer liquid funds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferOperation {
    /// Sender
    pub from: String,
    /// Receiver
    pub to: String,
    /// Amount
    pub amount: Asset,
    /// Memo
    pub memo: String,
}

/// Power up liquid funds into vesting shares
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferToVestingOperation {
    /// Sender
    pub from: String,
    /// Receiver of the vesting shares
    pub to: String,
    /// Amount
    pub amount: Asset,
}

/// Start a power down
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawVestingOperation {
    /// Account powering down
    pub account: String,
    /// Total shares to withdraw
    pub vesting_shares: Asset,
}

/// Place an order on the internal market
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LimitOrderCreateOperation {
    /// Order owner
    pub owner: String,
    /// Owner-assigned order id
    pub orderid: u32,
    /// Amount offered
    pub amount_to_sell: Asset,
    /// Minimum amount accepted
    pub min_to_receive: Asset,
    /// Cancel unless filled immediately
    pub fill_or_kill: bool,
    /// Order expiration
    pub expiration: DateTime<Utc>,
}

/// Cancel an open market order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LimitOrderCancelOperation {
    /// Order owner
    pub owner: String,
    /// Order id
    pub orderid: u32,
}

/// Witness price feed update
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedPublishOperation {
    /// Publishing witness
    pub publisher: String,
    /// Published exchange rate
    pub exchange_rate: Price,
}

/// Request a conversion of dollar tokens into liquid tokens
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConvertOperation {
    /// Requesting account
    pub owner: String,
    /// Owner-assigned request id
    pub requestid: u32,
    /// Amount to convert
    pub amount: Asset,
}

/// Create a new account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountCreateOperation {
    /// Creation fee
    pub fee: Asset,
    /// Paying account
    pub creator: String,
    /// Name of the new account
    pub new_account_name: String,
    /// Free-form JSON metadata
    pub json_metadata: String,
}

/// Approve or revoke a witness vote
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountWitnessVoteOperation {
    /// Voting account
    pub account: String,
    /// Witness voted for
    pub witness: String,
    /// Approve or revoke
    pub approve: bool,
}

/// Application-defined JSON payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomJsonOperation {
    /// Accounts that signed with active authority
    pub required_auths: Vec<String>,
    /// Accounts that signed with posting authority
    pub required_posting_auths: Vec<String>,
    /// Application id
    pub id: String,
    /// Payload
    pub json: String,
}

/// Claim pending rewards into balances
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimRewardBalanceOperation {
    /// Claiming account
    pub account: String,
    /// Liquid reward claimed
    pub reward_hive: Asset,
    /// Dollar reward claimed
    pub reward_hbd: Asset,
    /// Vesting reward claimed
    pub reward_vests: Asset,
}

/// Delegate vesting shares to another account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelegateVestingSharesOperation {
    /// Delegating account
    pub delegator: String,
    /// Receiving account
    pub delegatee: String,
    /// Delegated shares
    pub vesting_shares: Asset,
}

/// Move funds into savings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferToSavingsOperation {
    /// Sender
    pub from: String,
    /// Savings owner
    pub to: String,
    /// Amount
    pub amount: Asset,
    /// Memo
    pub memo: String,
}

/// Start a delayed withdrawal from savings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferFromSavingsOperation {
    /// Savings owner
    pub from: String,
    /// Owner-assigned request id
    pub request_id: u32,
    /// Receiver
    pub to: String,
    /// Amount
    pub amount: Asset,
    /// Memo
    pub memo: String,
}

// ═══════════════════════════════════════════════════════════════════════════════
// VIRTUAL OPERATIONS
// ═══════════════════════════════════════════════════════════════════════════════

/// A conversion request matured
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FillConvertRequestOperation {
    /// Requesting account
    pub owner: String,
    /// Request id
    pub requestid: u32,
    /// Amount converted
    pub amount_in: Asset,
    /// Amount received
    pub amount_out: Asset,
}

/// Author payout of a post
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorRewardOperation {
    /// Author
    pub author: String,
    /// Permlink
    pub permlink: String,
    /// Dollar part
    pub hbd_payout: Asset,
    /// Liquid part
    pub hive_payout: Asset,
    /// Vesting part
    pub vesting_payout: Asset,
}

/// Curator payout of a post
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurationRewardOperation {
    /// Curator
    pub curator: String,
    /// Reward in vesting shares
    pub reward: Asset,
    /// Curated content author
    pub comment_author: String,
    /// Curated content permlink
    pub comment_permlink: String,
}

/// Total payout of a post
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentRewardOperation {
    /// Author
    pub author: String,
    /// Permlink
    pub permlink: String,
    /// Payout value in dollar tokens
    pub payout: Asset,
}

/// Liquidity provider reward
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiquidityRewardOperation {
    /// Rewarded account
    pub owner: String,
    /// Payout
    pub payout: Asset,
}

/// Interest paid on dollar balances
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterestOperation {
    /// Account receiving interest
    pub owner: String,
    /// Interest paid
    pub interest: Asset,
}

/// One installment of a power down
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FillVestingWithdrawOperation {
    /// Account powering down
    pub from_account: String,
    /// Receiving account
    pub to_account: String,
    /// Shares withdrawn
    pub withdrawn: Asset,
    /// Amount deposited
    pub deposited: Asset,
}

/// Two market orders matched
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FillOrderOperation {
    /// Owner of the taking order
    pub current_owner: String,
    /// Taking order id
    pub current_orderid: u32,
    /// Amount paid by the taker
    pub current_pays: Asset,
    /// Owner of the resting order
    pub open_owner: String,
    /// Resting order id
    pub open_orderid: u32,
    /// Amount paid by the resting order
    pub open_pays: Asset,
}

/// A witness was shut down for missing blocks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShutdownWitnessOperation {
    /// Witness account
    pub owner: String,
}

/// A savings withdrawal matured
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FillTransferFromSavingsOperation {
    /// Savings owner
    pub from: String,
    /// Receiver
    pub to: String,
    /// Amount
    pub amount: Asset,
    /// Request id
    pub request_id: u32,
    /// Memo
    pub memo: String,
}

/// A hardfork was applied
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HardforkOperation {
    /// Hardfork number
    pub hardfork_id: u32,
}

/// A post's payout state changed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentPayoutUpdateOperation {
    /// Author
    pub author: String,
    /// Permlink
    pub permlink: String,
}

/// Delegated shares returned to the delegator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReturnVestingDelegationOperation {
    /// Delegator
    pub account: String,
    /// Returned shares
    pub vesting_shares: Asset,
}

/// Beneficiary payout of a post
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentBenefactorRewardOperation {
    /// Beneficiary
    pub benefactor: String,
    /// Author
    pub author: String,
    /// Permlink
    pub permlink: String,
    /// Dollar part
    pub hbd_payout: Asset,
    /// Liquid part
    pub hive_payout: Asset,
    /// Vesting part
    pub vesting_payout: Asset,
}

/// Block producer reward
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProducerRewardOperation {
    /// Producing witness
    pub producer: String,
    /// Reward
    pub vesting_shares: Asset,
}

/// Balances sent to the null account were destroyed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClearNullAccountBalanceOperation {
    /// Cleared amounts per symbol
    pub total_cleared: Vec<Asset>,
}

/// Treasury proposal payment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalPayOperation {
    /// Proposal receiver
    pub receiver: String,
    /// Treasury account paying
    pub payer: String,
    /// Payment
    pub payment: Asset,
}

/// Inflation added to the treasury
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpsFundOperation {
    /// Treasury account
    pub fund_account: String,
    /// Funds added
    pub additional_funds: Asset,
}

/// Balances moved to the treasury at the chain split
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HardforkHiveOperation {
    /// Affected account
    pub account: String,
    /// Treasury account
    pub treasury: String,
    /// Dollar tokens moved
    pub hbd_transferred: Asset,
    /// Liquid tokens moved
    pub hive_transferred: Asset,
    /// Shares converted
    pub vests_converted: Asset,
}

/// Balances restored from the treasury
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HardforkHiveRestoreOperation {
    /// Affected account
    pub account: String,
    /// Treasury account
    pub treasury: String,
    /// Dollar tokens restored
    pub hbd_transferred: Asset,
    /// Liquid tokens restored
    pub hive_transferred: Asset,
}

/// Governance voting power became effective
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelayedVotingOperation {
    /// Voter
    pub voter: String,
    /// Shares that became effective
    pub votes: u64,
}

/// Treasury balances consolidated
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsolidateTreasuryBalanceOperation {
    /// Moved amounts per symbol
    pub total_moved: Vec<Asset>,
}

/// Effective weight of a vote
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectiveCommentVoteOperation {
    /// Voter
    pub voter: String,
    /// Author
    pub author: String,
    /// Permlink
    pub permlink: String,
    /// Curation weight
    pub weight: u64,
    /// Reward shares
    pub rshares: i64,
    /// Total vote weight on the content
    pub total_vote_weight: u64,
}

/// An account was created
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountCreatedOperation {
    /// New account
    pub new_account_name: String,
    /// Creator
    pub creator: String,
    /// Initial vesting shares
    pub initial_vesting_shares: Asset,
}

/// A comment deletion had no effect
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IneffectiveDeleteCommentOperation {
    /// Author
    pub author: String,
    /// Permlink
    pub permlink: String,
}

/// A recovery account change took effect
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangedRecoveryAccountOperation {
    /// Account
    pub account: String,
    /// Previous recovery account
    pub old_recovery_account: String,
    /// New recovery account
    pub new_recovery_account: String,
}

// ═══════════════════════════════════════════════════════════════════════════════
// OPERATION
// ═══════════════════════════════════════════════════════════════════════════════

/// All operation kinds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operation {
    // User operations
    /// Vote
    #[serde(rename = "vote_operation")]
    Vote(VoteOperation),
    /// Comment
    #[serde(rename = "comment_operation")]
    Comment(CommentOperation),
    /// Transfer
    #[serde(rename = "transfer_operation")]
    Transfer(TransferOperation),
    /// Power up
    #[serde(rename = "transfer_to_vesting_operation")]
    TransferToVesting(TransferToVestingOperation),
    /// Power down
    #[serde(rename = "withdraw_vesting_operation")]
    WithdrawVesting(WithdrawVestingOperation),
    /// Market order
    #[serde(rename = "limit_order_create_operation")]
    LimitOrderCreate(LimitOrderCreateOperation),
    /// Market order cancel
    #[serde(rename = "limit_order_cancel_operation")]
    LimitOrderCancel(LimitOrderCancelOperation),
    /// Price feed
    #[serde(rename = "feed_publish_operation")]
    FeedPublish(FeedPublishOperation),
    /// Conversion request
    #[serde(rename = "convert_operation")]
    Convert(ConvertOperation),
    /// Account creation
    #[serde(rename = "account_create_operation")]
    AccountCreate(AccountCreateOperation),
    /// Witness vote
    #[serde(rename = "account_witness_vote_operation")]
    AccountWitnessVote(AccountWitnessVoteOperation),
    /// Custom JSON
    #[serde(rename = "custom_json_operation")]
    CustomJson(CustomJsonOperation),
    /// Reward claim
    #[serde(rename = "claim_reward_balance_operation")]
    ClaimRewardBalance(ClaimRewardBalanceOperation),
    /// Delegation
    #[serde(rename = "delegate_vesting_shares_operation")]
    DelegateVestingShares(DelegateVestingSharesOperation),
    /// Savings deposit
    #[serde(rename = "transfer_to_savings_operation")]
    TransferToSavings(TransferToSavingsOperation),
    /// Savings withdrawal request
    #[serde(rename = "transfer_from_savings_operation")]
    TransferFromSavings(TransferFromSavingsOperation),

    // Virtual operations
    /// Conversion filled
    #[serde(rename = "fill_convert_request_operation")]
    FillConvertRequest(FillConvertRequestOperation),
    /// Author reward
    #[serde(rename = "author_reward_operation")]
    AuthorReward(AuthorRewardOperation),
    /// Curation reward
    #[serde(rename = "curation_reward_operation")]
    CurationReward(CurationRewardOperation),
    /// Comment reward
    #[serde(rename = "comment_reward_operation")]
    CommentReward(CommentRewardOperation),
    /// Liquidity reward
    #[serde(rename = "liquidity_reward_operation")]
    LiquidityReward(LiquidityRewardOperation),
    /// Interest
    #[serde(rename = "interest_operation")]
    Interest(InterestOperation),
    /// Power down installment
    #[serde(rename = "fill_vesting_withdraw_operation")]
    FillVestingWithdraw(FillVestingWithdrawOperation),
    /// Order fill
    #[serde(rename = "fill_order_operation")]
    FillOrder(FillOrderOperation),
    /// Witness shutdown
    #[serde(rename = "shutdown_witness_operation")]
    ShutdownWitness(ShutdownWitnessOperation),
    /// Savings withdrawal filled
    #[serde(rename = "fill_transfer_from_savings_operation")]
    FillTransferFromSavings(FillTransferFromSavingsOperation),
    /// Hardfork marker
    #[serde(rename = "hardfork_operation")]
    Hardfork(HardforkOperation),
    /// Payout update
    #[serde(rename = "comment_payout_update_operation")]
    CommentPayoutUpdate(CommentPayoutUpdateOperation),
    /// Delegation returned
    #[serde(rename = "return_vesting_delegation_operation")]
    ReturnVestingDelegation(ReturnVestingDelegationOperation),
    /// Beneficiary reward
    #[serde(rename = "comment_benefactor_reward_operation")]
    CommentBenefactorReward(CommentBenefactorRewardOperation),
    /// Producer reward
    #[serde(rename = "producer_reward_operation")]
    ProducerReward(ProducerRewardOperation),
    /// Null account cleared
    #[serde(rename = "clear_null_account_balance_operation")]
    ClearNullAccountBalance(ClearNullAccountBalanceOperation),
    /// Proposal payment
    #[serde(rename = "proposal_pay_operation")]
    ProposalPay(ProposalPayOperation),
    /// Treasury funding
    #[serde(rename = "sps_fund_operation")]
    SpsFund(SpsFundOperation),
    /// Chain split balance move
    #[serde(rename = "hardfork_hive_operation")]
    HardforkHive(HardforkHiveOperation),
    /// Chain split balance restore
    #[serde(rename = "hardfork_hive_restore_operation")]
    HardforkHiveRestore(HardforkHiveRestoreOperation),
    /// Delayed voting power
    #[serde(rename = "delayed_voting_operation")]
    DelayedVoting(DelayedVotingOperation),
    /// Treasury consolidation
    #[serde(rename = "consolidate_treasury_balance_operation")]
    ConsolidateTreasuryBalance(ConsolidateTreasuryBalanceOperation),
    /// Effective vote
    #[serde(rename = "effective_comment_vote_operation")]
    EffectiveCommentVote(EffectiveCommentVoteOperation),
    /// Account created
    #[serde(rename = "account_created_operation")]
    AccountCreated(AccountCreatedOperation),
    /// Ineffective comment deletion
    #[serde(rename = "ineffective_delete_comment_operation")]
    IneffectiveDeleteComment(IneffectiveDeleteCommentOperation),
    /// Recovery account changed
    #[serde(rename = "changed_recovery_account_operation")]
    ChangedRecoveryAccount(ChangedRecoveryAccountOperation),
}

impl Operation {
    /// Canonical name of the operation kind
    pub fn name(&self) -> &'static str {
        match self {
            Self::Vote(_) => "vote_operation",
            Self::Comment(_) => "comment_operation",
            Self::Transfer(_) => "transfer_operation",
            Self::TransferToVesting(_) => "transfer_to_vesting_operation",
            Self::WithdrawVesting(_) => "withdraw_vesting_operation",
            Self::LimitOrderCreate(_) => "limit_order_create_operation",
            Self::LimitOrderCancel(_) => "limit_order_cancel_operation",
            Self::FeedPublish(_) => "feed_publish_operation",
            Self::Convert(_) => "convert_operation",
            Self::AccountCreate(_) => "account_create_operation",
            Self::AccountWitnessVote(_) => "account_witness_vote_operation",
            Self::CustomJson(_) => "custom_json_operation",
            Self::ClaimRewardBalance(_) => "claim_reward_balance_operation",
            Self::DelegateVestingShares(_) => "delegate_vesting_shares_operation",
            Self::TransferToSavings(_) => "transfer_to_savings_operation",
            Self::TransferFromSavings(_) => "transfer_from_savings_operation",
            Self::FillConvertRequest(_) => "fill_convert_request_operation",
            Self::AuthorReward(_) => "author_reward_operation",
            Self::CurationReward(_) => "curation_reward_operation",
            Self::CommentReward(_) => "comment_reward_operation",
            Self::LiquidityReward(_) => "liquidity_reward_operation",
            Self::Interest(_) => "interest_operation",
            Self::FillVestingWithdraw(_) => "fill_vesting_withdraw_operation",
            Self::FillOrder(_) => "fill_order_operation",
            Self::ShutdownWitness(_) => "shutdown_witness_operation",
            Self::FillTransferFromSavings(_) => "fill_transfer_from_savings_operation",
            Self::Hardfork(_) => "hardfork_operation",
            Self::CommentPayoutUpdate(_) => "comment_payout_update_operation",
            Self::ReturnVestingDelegation(_) => "return_vesting_delegation_operation",
            Self::CommentBenefactorReward(_) => "comment_benefactor_reward_operation",
            Self::ProducerReward(_) => "producer_reward_operation",
            Self::ClearNullAccountBalance(_) => "clear_null_account_balance_operation",
            Self::ProposalPay(_) => "proposal_pay_operation",
            Self::SpsFund(_) => "sps_fund_operation",
            Self::HardforkHive(_) => "hardfork_hive_operation",
            Self::HardforkHiveRestore(_) => "hardfork_hive_restore_operation",
            Self::DelayedVoting(_) => "delayed_voting_operation",
            Self::ConsolidateTreasuryBalance(_) => "consolidate_treasury_balance_operation",
            Self::EffectiveCommentVote(_) => "effective_comment_vote_operation",
            Self::AccountCreated(_) => "account_created_operation",
            Self::IneffectiveDeleteComment(_) => "ineffective_delete_comment_operation",
            Self::ChangedRecoveryAccount(_) => "changed_recovery_account_operation",
        }
    }

    /// Whether the kind is generated by the chain rather than signed by a user
    pub fn is_virtual(&self) -> bool {
        match self {
            Self::Vote(_)
            | Self::Comment(_)
            | Self::Transfer(_)
            | Self::TransferToVesting(_)
            | Self::WithdrawVesting(_)
            | Self::LimitOrderCreate(_)
            | Self::LimitOrderCancel(_)
            | Self::FeedPublish(_)
            | Self::Convert(_)
            | Self::AccountCreate(_)
            | Self::AccountWitnessVote(_)
            | Self::CustomJson(_)
            | Self::ClaimRewardBalance(_)
            | Self::DelegateVestingShares(_)
            | Self::TransferToSavings(_)
            | Self::TransferFromSavings(_) => false,

            Self::FillConvertRequest(_)
            | Self::AuthorReward(_)
            | Self::CurationReward(_)
            | Self::CommentReward(_)
            | Self::LiquidityReward(_)
            | Self::Interest(_)
            | Self::FillVestingWithdraw(_)
            | Self::FillOrder(_)
            | Self::ShutdownWitness(_)
            | Self::FillTransferFromSavings(_)
            | Self::Hardfork(_)
            | Self::CommentPayoutUpdate(_)
            | Self::ReturnVestingDelegation(_)
            | Self::CommentBenefactorReward(_)
            | Self::ProducerReward(_)
            | Self::ClearNullAccountBalance(_)
            | Self::ProposalPay(_)
            | Self::SpsFund(_)
            | Self::HardforkHive(_)
            | Self::HardforkHiveRestore(_)
            | Self::DelayedVoting(_)
            | Self::ConsolidateTreasuryBalance(_)
            | Self::EffectiveCommentVote(_)
            | Self::AccountCreated(_)
            | Self::IneffectiveDeleteComment(_)
            | Self::ChangedRecoveryAccount(_) => true,
        }
    }

    /// Accounts whose history records this operation
    pub fn impacted_accounts(&self) -> BTreeSet<String> {
        let names: Vec<&str> = match self {
            Self::Vote(op) => vec![&op.voter, &op.author],
            Self::Comment(op) if op.parent_author.is_empty() => vec![&op.author],
            Self::Comment(op) => vec![&op.author, &op.parent_author],
            Self::Transfer(op) => vec![&op.from, &op.to],
            Self::TransferToVesting(op) => vec![&op.from, &op.to],
            Self::WithdrawVesting(op) => vec![&op.account],
            Self::LimitOrderCreate(op) => vec![&op.owner],
            Self::LimitOrderCancel(op) => vec![&op.owner],
            Self::FeedPublish(op) => vec![&op.publisher],
            Self::Convert(op) => vec![&op.owner],
            Self::AccountCreate(op) => vec![&op.creator, &op.new_account_name],
            Self::AccountWitnessVote(op) => vec![&op.account, &op.witness],
            Self::CustomJson(op) => op
                .required_auths
                .iter()
                .chain(op.required_posting_auths.iter())
                .map(String::as_str)
                .collect(),
            Self::ClaimRewardBalance(op) => vec![&op.account],
            Self::DelegateVestingShares(op) => vec![&op.delegator, &op.delegatee],
            Self::TransferToSavings(op) => vec![&op.from, &op.to],
            Self::TransferFromSavings(op) => vec![&op.from, &op.to],
            Self::FillConvertRequest(op) => vec![&op.owner],
            Self::AuthorReward(op) => vec![&op.author],
            Self::CurationReward(op) => vec![&op.curator, &op.comment_author],
            Self::CommentReward(op) => vec![&op.author],
            Self::LiquidityReward(op) => vec![&op.owner],
            Self::Interest(op) => vec![&op.owner],
            Self::FillVestingWithdraw(op) => vec![&op.from_account, &op.to_account],
            Self::FillOrder(op) => vec![&op.current_owner, &op.open_owner],
            Self::ShutdownWitness(op) => vec![&op.owner],
            Self::FillTransferFromSavings(op) => vec![&op.from, &op.to],
            Self::Hardfork(_) => Vec::new(),
            Self::CommentPayoutUpdate(op) => vec![&op.author],
            Self::ReturnVestingDelegation(op) => vec![&op.account],
            Self::CommentBenefactorReward(op) => vec![&op.benefactor, &op.author],
            Self::ProducerReward(op) => vec![&op.producer],
            Self::ClearNullAccountBalance(_) => vec!["null"],
            Self::ProposalPay(op) => vec![&op.receiver, &op.payer],
            Self::SpsFund(op) => vec![&op.fund_account],
            Self::HardforkHive(op) => vec![&op.account, &op.treasury],
            Self::HardforkHiveRestore(op) => vec![&op.account, &op.treasury],
            Self::DelayedVoting(op) => vec![&op.voter],
            Self::ConsolidateTreasuryBalance(_) => Vec::new(),
            Self::EffectiveCommentVote(op) => vec![&op.voter, &op.author],
            Self::AccountCreated(op) => vec![&op.new_account_name, &op.creator],
            Self::IneffectiveDeleteComment(op) => vec![&op.author],
            Self::ChangedRecoveryAccount(op) => vec![
                &op.account,
                &op.old_recovery_account,
                &op.new_recovery_account,
            ],
        };

        names
            .into_iter()
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect()
    }
}
