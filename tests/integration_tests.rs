//! Integration tests for the account history API.
//!
//! Every scenario runs against both engines fed from the same chain.

use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};
use serde_json::json;

use account_history_api::chain::ChainDatabase;
use account_history_api::history::{
    AccountHistoryApi, EnumVirtualOpsArgs, GetAccountHistoryArgs, GetOpsInBlockArgs,
    GetTransactionArgs, HistoryBackend, HistoryBackends, RangeHistorySource, RangeHistoryStore,
    VirtualOperation,
};
use account_history_api::protocol::{
    Asset, Operation, ProducerRewardOperation, SignedBlock, SignedTransaction, TransactionId,
    TransferOperation,
};
use account_history_api::rpc::dispatch;
use account_history_api::storage::InMemoryStore;
use account_history_api::ErrorKind;

// ═══════════════════════════════════════════════════════════════════════════════
// TEST HELPERS
// ═══════════════════════════════════════════════════════════════════════════════

const BLOCKS: u32 = 3;

fn transfer_trx(block: u32, index: u32) -> SignedTransaction {
    SignedTransaction {
        ref_block_num: block as u16,
        ref_block_prefix: 0,
        expiration: Utc.with_ymd_and_hms(2024, 1, 1, 0, 1, 0).unwrap(),
        operations: vec![Operation::Transfer(TransferOperation {
            from: "alice".into(),
            to: "bob".into(),
            amount: Asset::hive(1_000),
            memo: format!("payment {}-{}", block, index),
        })],
        signatures: vec!["00".into()],
    }
}

fn producer_reward(block: u32) -> Operation {
    Operation::ProducerReward(ProducerRewardOperation {
        producer: format!("witness-{}", block),
        vesting_shares: Asset::vests(1_000),
    })
}

fn block(block_num: u32) -> SignedBlock {
    SignedBlock {
        previous: format!("{:08x}", block_num - 1),
        timestamp: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
            + Duration::seconds(3 * i64::from(block_num)),
        witness: format!("witness-{}", block_num),
        transactions: vec![transfer_trx(block_num, 0), transfer_trx(block_num, 1)],
    }
}

/// Chain of three blocks, each with two alice->bob transfers and a producer reward
struct Fixture {
    database: Arc<ChainDatabase>,
    range_store: Arc<RangeHistoryStore>,
}

impl Fixture {
    fn new() -> Self {
        Self::with_transaction_index(true)
    }

    fn with_transaction_index(enabled: bool) -> Self {
        let database = Arc::new(ChainDatabase::with_transaction_index(enabled));
        let range_store = Arc::new(RangeHistoryStore::new(Arc::new(InMemoryStore::new())));

        for block_num in 1..=BLOCKS {
            let block = block(block_num);
            let vops = vec![VirtualOperation::block_level(producer_reward(block_num))];
            range_store.import_block(block_num, &block, &vops).unwrap();
            assert_eq!(database.push_block(block, &vops).unwrap(), block_num);
        }

        Self {
            database,
            range_store,
        }
    }

    fn primary(&self) -> AccountHistoryApi {
        AccountHistoryApi::new(HistoryBackends {
            database: Arc::clone(&self.database),
            chain_history_enabled: true,
            range_store: None,
        })
        .unwrap()
    }

    fn range(&self) -> AccountHistoryApi {
        let source: Arc<dyn RangeHistorySource> = self.range_store.clone();
        AccountHistoryApi::new(HistoryBackends {
            database: Arc::clone(&self.database),
            chain_history_enabled: false,
            range_store: Some(source),
        })
        .unwrap()
    }

    fn both(&self) -> [AccountHistoryApi; 2] {
        [self.primary(), self.range()]
    }

    fn trx_id(&self, block_num: u32, index: u32) -> TransactionId {
        transfer_trx(block_num, index).id().unwrap()
    }
}

fn history_args(account: &str, start: u32, limit: u32) -> GetAccountHistoryArgs {
    GetAccountHistoryArgs {
        account: account.into(),
        start,
        limit,
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// BACKEND SELECTION
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_backend_selection() {
    let fixture = Fixture::new();
    assert_eq!(fixture.primary().backend(), HistoryBackend::Primary);
    assert_eq!(fixture.range().backend(), HistoryBackend::Range);

    let source: Arc<dyn RangeHistorySource> = fixture.range_store.clone();
    let both = AccountHistoryApi::new(HistoryBackends {
        database: Arc::clone(&fixture.database),
        chain_history_enabled: true,
        range_store: Some(source),
    })
    .unwrap();
    assert_eq!(both.backend(), HistoryBackend::Range);

    let neither = AccountHistoryApi::new(HistoryBackends {
        database: Arc::clone(&fixture.database),
        chain_history_enabled: false,
        range_store: None,
    });
    assert_eq!(neither.err().map(|e| e.kind()), Some(ErrorKind::FatalConfiguration));
}

// ═══════════════════════════════════════════════════════════════════════════════
// GET_OPS_IN_BLOCK
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_ops_in_block() {
    let fixture = Fixture::new();
    let [primary, range] = fixture.both();

    for api in [&primary, &range] {
        let all = api
            .get_ops_in_block(&GetOpsInBlockArgs {
                block_num: 2,
                only_virtual: false,
            })
            .unwrap();
        assert_eq!(all.ops.len(), 3);
        assert!(all.ops.iter().all(|op| op.block == 2));
        assert_eq!(all.ops[2].op.name(), "producer_reward_operation");
        assert_eq!(all.ops[2].trx_in_block, 2);
        assert!(all.ops[2].trx_id.is_zero());

        let virtual_only = api
            .get_ops_in_block(&GetOpsInBlockArgs {
                block_num: 2,
                only_virtual: true,
            })
            .unwrap();
        assert_eq!(virtual_only.ops.len(), 1);
        assert!(virtual_only.ops[0].virtual_op);
    }

    let args = GetOpsInBlockArgs {
        block_num: 3,
        only_virtual: false,
    };
    assert_eq!(primary.get_ops_in_block(&args).unwrap(), range.get_ops_in_block(&args).unwrap());
}

#[test]
fn test_ops_in_unknown_block_is_empty() {
    let fixture = Fixture::new();
    for api in fixture.both() {
        let result = api
            .get_ops_in_block(&GetOpsInBlockArgs {
                block_num: 99,
                only_virtual: false,
            })
            .unwrap();
        assert!(result.ops.is_empty());
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// GET_TRANSACTION
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_get_transaction() {
    let fixture = Fixture::new();
    let id = fixture.trx_id(2, 1);

    for api in fixture.both() {
        let annotated = api.get_transaction(&GetTransactionArgs { id }).unwrap();
        assert_eq!(annotated.transaction_id, id);
        assert_eq!(annotated.block_num, 2);
        assert_eq!(annotated.transaction_num, 1);
        assert_eq!(annotated.transaction, transfer_trx(2, 1));
    }
}

#[test]
fn test_get_transaction_unknown() {
    let fixture = Fixture::new();
    let id = transfer_trx(42, 0).id().unwrap();

    for api in fixture.both() {
        let err = api.get_transaction(&GetTransactionArgs { id }).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}

#[test]
fn test_get_transaction_without_index() {
    let fixture = Fixture::with_transaction_index(false);
    let id = fixture.trx_id(1, 0);

    let err = fixture.primary().get_transaction(&GetTransactionArgs { id }).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnsupportedOperation);
}

// ═══════════════════════════════════════════════════════════════════════════════
// GET_ACCOUNT_HISTORY
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_account_history_window() {
    let fixture = Fixture::new();
    let [primary, range] = fixture.both();

    for api in [&primary, &range] {
        let history = api.get_account_history(&history_args("alice", 5, 3)).unwrap();
        assert_eq!(history.history.keys().copied().collect::<Vec<_>>(), vec![3, 4, 5]);
        let blocks: Vec<u32> = history.history.values().map(|op| op.block).collect();
        assert_eq!(blocks, vec![2, 3, 3]);

        let oldest = api.get_account_history(&history_args("alice", 1, 1)).unwrap();
        let first = oldest.history.get(&1).unwrap();
        assert_eq!(first.block, 1);
        assert_eq!(first.trx_in_block, 1);
    }

    let args = history_args("alice", 5, 5);
    assert_eq!(
        primary.get_account_history(&args).unwrap(),
        range.get_account_history(&args).unwrap()
    );
}

#[test]
fn test_account_history_start_past_end() {
    let fixture = Fixture::new();
    for api in fixture.both() {
        let history = api.get_account_history(&history_args("alice", u32::MAX, 100)).unwrap();
        assert_eq!(history.history.len(), 6);

        let producer = api.get_account_history(&history_args("witness-2", 10, 10)).unwrap();
        assert_eq!(producer.history.len(), 1);

        let nobody = api.get_account_history(&history_args("carol", 10, 10)).unwrap();
        assert!(nobody.history.is_empty());
    }
}

#[test]
fn test_account_history_rejects_bad_window() {
    let fixture = Fixture::new();
    for api in fixture.both() {
        let err = api
            .get_account_history(&history_args("alice", u32::MAX, 10_001))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);

        let err = api.get_account_history(&history_args("alice", 1, 5)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);

        let err = api.get_account_history(&history_args("Alice!", 10, 5)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// ENUM_VIRTUAL_OPS
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_enum_virtual_ops_single_page() {
    let fixture = Fixture::new();
    let page = fixture
        .range()
        .enum_virtual_ops(&EnumVirtualOpsArgs::new(1, BLOCKS + 1, 100))
        .unwrap();

    assert_eq!(page.ops.len(), 3);
    assert!(page.ops.iter().all(|op| op.virtual_op));
    assert_eq!(page.ops.iter().map(|op| op.block).collect::<Vec<_>>(), vec![1, 2, 3]);
    assert!(page.is_terminal(BLOCKS + 1));
}

#[test]
fn test_enum_virtual_ops_pagination() {
    let fixture = Fixture::new();
    let api = fixture.range();
    let end = BLOCKS + 1;

    let mut args = EnumVirtualOpsArgs::new(1, end, 1);
    let mut seen = Vec::new();
    let mut pages = 0;
    loop {
        let page = api.enum_virtual_ops(&args).unwrap();
        pages += 1;
        seen.extend(page.ops.iter().map(|op| op.block));
        if page.is_terminal(end) {
            break;
        }
        assert_eq!(page.next_operation_begin, 0);
        args = args.resume_from(&page);
    }

    assert_eq!(seen, vec![1, 2, 3]);
    assert_eq!(pages, 3);
}

#[test]
fn test_enum_virtual_ops_filter() {
    let fixture = Fixture::new();
    let api = fixture.range();

    let rewards = api
        .enum_virtual_ops(
            &EnumVirtualOpsArgs::new(1, BLOCKS + 1, 100).with_filter(["producer_reward_operation"]),
        )
        .unwrap();
    assert_eq!(rewards.ops.len(), 3);

    let fills = api
        .enum_virtual_ops(&EnumVirtualOpsArgs::new(1, BLOCKS + 1, 100).with_filter(["fill_order_operation"]))
        .unwrap();
    assert!(fills.ops.is_empty());
    assert!(fills.is_terminal(BLOCKS + 1));
}

#[test]
fn test_enum_virtual_ops_empty_range() {
    let fixture = Fixture::new();
    let page = fixture.range().enum_virtual_ops(&EnumVirtualOpsArgs::new(2, 2, 10)).unwrap();
    assert!(page.ops.is_empty());
    assert_eq!((page.next_block_range_begin, page.next_operation_begin), (2, 0));
}

#[test]
fn test_enum_virtual_ops_validation_and_support() {
    let fixture = Fixture::new();

    let err = fixture
        .primary()
        .enum_virtual_ops(&EnumVirtualOpsArgs::new(1, 2, 10))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnsupportedOperation);

    for api in fixture.both() {
        let err = api.enum_virtual_ops(&EnumVirtualOpsArgs::new(3, 1, 10)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);

        let err = api.enum_virtual_ops(&EnumVirtualOpsArgs::new(1, 2, 10_001)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// CROSS-CUTTING
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_queries_are_idempotent() {
    let fixture = Fixture::new();
    for api in fixture.both() {
        let args = history_args("bob", 5, 4);
        assert_eq!(api.get_account_history(&args).unwrap(), api.get_account_history(&args).unwrap());

        let args = GetOpsInBlockArgs {
            block_num: 1,
            only_virtual: false,
        };
        assert_eq!(api.get_ops_in_block(&args).unwrap(), api.get_ops_in_block(&args).unwrap());
    }
}

#[test]
fn test_json_rpc_round_trip() {
    let fixture = Fixture::new();
    let api = fixture.range();

    let result = dispatch(
        &api,
        "account_history_api.get_account_history",
        json!({"account": "alice", "start": 5, "limit": 2}),
    )
    .unwrap();
    let history = result["history"].as_object().unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history["5"]["op"]["transfer_operation"]["from"], "alice");

    let id = fixture.trx_id(3, 0);
    let result = dispatch(&api, "account_history_api.get_transaction", json!({ "id": id.to_hex() }))
        .unwrap();
    assert_eq!(result["block_num"], 3);

    let result = dispatch(
        &api,
        "account_history_api.enum_virtual_ops",
        json!({
            "block_range_begin": 1,
            "block_range_end": 4,
            "limit": 2,
            "filter": ["producer_reward_operation"]
        }),
    )
    .unwrap();
    assert_eq!(result["ops"].as_array().unwrap().len(), 2);
    assert_eq!(result["next_block_range_begin"], 3);
}
