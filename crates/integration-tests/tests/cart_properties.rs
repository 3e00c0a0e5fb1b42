//! Property tests: cart invariants over random operation sequences.
//!
//! After every operation:
//! - no two lines share a product ID
//! - every quantity is at least one and within the product's stock
//! - a failed operation left the state exactly as it was
//! - storage holds exactly the current state

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use std::collections::HashSet;

use proptest::prelude::*;
use rocket_cart::{CartState, DEFAULT_STORAGE_KEY, MemoryStorage};
use rocket_cart_integration_tests::{TestContext, pid, shoe_catalog};

/// Products in `shoe_catalog()` plus one the catalog does not know.
const IDS: [&str; 4] = ["P1", "P2", "P3", "P404"];

fn stock_of(id: &str) -> u32 {
    match id {
        "P1" => 5,
        "P2" => 3,
        "P3" => 1,
        _ => 0,
    }
}

#[derive(Debug, Clone)]
enum Op {
    Add(usize),
    Remove(usize),
    Set(usize, i64),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (0..IDS.len()).prop_map(Op::Add),
        1 => (0..IDS.len()).prop_map(Op::Remove),
        2 => (0..IDS.len(), -2_i64..8).prop_map(|(i, n)| Op::Set(i, n)),
    ]
}

fn check_invariants(state: &CartState) -> Result<(), TestCaseError> {
    let mut seen = HashSet::new();
    for item in state {
        let id = item.product_id().as_str();
        prop_assert!(seen.insert(id.to_string()), "duplicate line for {}", id);
        prop_assert!(item.quantity().get() >= 1);
        prop_assert!(
            item.quantity().get() <= stock_of(id),
            "{} has {} units but only {} in stock",
            id,
            item.quantity(),
            stock_of(id)
        );
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn test_invariants_hold_for_any_sequence(ops in prop::collection::vec(op_strategy(), 0..40)) {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();

        runtime.block_on(async {
            let ctx = TestContext::new(shoe_catalog(), MemoryStorage::new()).await;

            for op in ops {
                let before = ctx.store.snapshot();
                let result = match op {
                    Op::Add(i) => ctx.store.add_item(&pid(IDS[i])).await,
                    Op::Remove(i) => ctx.store.remove_item(&pid(IDS[i])).await,
                    Op::Set(i, amount) => ctx.store.set_quantity(&pid(IDS[i]), amount).await,
                };
                let after = ctx.store.snapshot();

                check_invariants(&after)?;
                if result.is_err() {
                    prop_assert_eq!(&after, &before);
                }

                if let Some(stored) = ctx.storage.get(DEFAULT_STORAGE_KEY).await {
                    let restored: CartState = serde_json::from_str(&stored).unwrap();
                    prop_assert_eq!(&restored, &after);
                } else {
                    prop_assert!(after.is_empty());
                }
            }
            Ok::<(), TestCaseError>(())
        })?;
    }
}
