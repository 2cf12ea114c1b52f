//! Adversarial tests for the sale engine.
//!
//! Attack vectors tested:
//! - Concurrent buyers racing for the last items
//! - Ledger failures after a refund was already delivered
//! - Buyers that refuse refunds
//! - Payments and timestamps at the numeric extremes
//! - Clocks that run backwards after a sale

use std::collections::BTreeSet;
use std::sync::Arc;
use std::thread;

use proptest::prelude::*;
use stepmint_core::error::{LedgerError, PayoutError, SaleError};
use stepmint_core::traits::IssuanceLedger;
use stepmint_core::types::{Address, Amount};
use stepmint_sale::{MemoryLedger, MemoryTreasury, SaleEngine, SalePhase};
use stepmint_tests::helpers::*;

// ---------------------------------------------------------------------------
// Concurrency
// ---------------------------------------------------------------------------

#[test]
fn concurrent_buyers_get_dense_unique_ids() {
    let cfg = sale_config(1_000, 0, 1, 0, 0, 50);
    let engine = Arc::new(memory_engine(&cfg));

    let handles: Vec<_> = (1..=8u8)
        .map(|seed| {
            let engine = Arc::clone(&engine);
            thread::spawn(move || {
                let mut won = Vec::new();
                for _ in 0..20 {
                    match engine.purchase(addr(seed), 1_000, 10) {
                        Ok(id) => won.push(id),
                        Err(SaleError::SoldOut { cap }) => assert_eq!(cap, 50),
                        Err(e) => panic!("unexpected error: {e}"),
                    }
                }
                won
            })
        })
        .collect();

    let mut ids = BTreeSet::new();
    for h in handles {
        for id in h.join().unwrap() {
            assert!(ids.insert(id), "item {id} issued twice");
        }
    }

    assert_eq!(ids, (0..50).collect::<BTreeSet<_>>());
    assert_eq!(engine.state().issued_count, 50);
    assert_eq!(engine.phase(10), SalePhase::Exhausted);
    assert_eq!(engine.state().proceeds, 50 * 1_000);
}

#[test]
fn concurrent_prices_follow_the_step() {
    // No decay: every sale must settle at start + k * step for k = 0..cap.
    let cfg = sale_config(100, 0, 1, 0, 7, 30);
    let engine = Arc::new(memory_engine(&cfg));

    let handles: Vec<_> = (1..=6u8)
        .map(|seed| {
            let engine = Arc::clone(&engine);
            thread::spawn(move || {
                (0..10)
                    .filter_map(|_| engine.settle(addr(seed), 10_000, 5).ok())
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let mut purchases: Vec<_> = handles.into_iter().flat_map(|h| h.join().unwrap()).collect();
    purchases.sort_by_key(|p| p.item);

    assert_eq!(purchases.len(), 30);
    for (k, p) in purchases.iter().enumerate() {
        assert_eq!(p.item, k as u64);
        assert_eq!(p.price, 100 + 7 * k as Amount);
        assert_eq!(p.price + p.refund, 10_000);
    }
}

// ---------------------------------------------------------------------------
// Collaborator failures
// ---------------------------------------------------------------------------

#[test]
fn ledger_failure_after_refund_is_fully_reversed() {
    let cfg = sale_config(100, 0, 1, 1, 5, 3);
    let ledger = FlakyLedger { inner: MemoryLedger::new(), fail_on: Some(1) };
    let engine = SaleEngine::new(&cfg, ledger, CountingTreasury::default()).unwrap();
    let buyer = addr(1);

    engine.purchase(buyer, 200, 10).unwrap();
    let before = engine.state();

    let err = engine.purchase(buyer, 200, 12).unwrap_err();
    assert!(matches!(
        err,
        SaleError::IssuanceFailed { item: 1, source: LedgerError::Unavailable(_) }
    ));
    assert_eq!(engine.state(), before);

    engine.inspect(|ledger, treasury| {
        assert_eq!(treasury.payouts, 2);
        assert_eq!(treasury.reversals, 1);
        // Only the first purchase's refund (200 - 90) survives.
        assert_eq!(treasury.inner.credited(&buyer), 110);
        assert_eq!(ledger.balance_of(&buyer), 1);
        assert_eq!(ledger.owner_of(1), None);
    });
}

#[test]
fn exact_payment_never_touches_treasury() {
    let cfg = sale_config(100, 0, 1, 1, 5, 3);
    let engine = SaleEngine::new(&cfg, MemoryLedger::new(), CountingTreasury::default()).unwrap();

    let price = engine.quote(30).unwrap();
    engine.purchase(addr(1), price, 30).unwrap();
    assert_eq!(engine.inspect(|_, t| t.payouts), 0);
}

#[test]
fn refusing_buyer_cannot_overpay_but_others_can() {
    let cfg = sale_config(100, 0, 1, 1, 5, 3);
    let mut treasury = MemoryTreasury::new();
    treasury.refuse(addr(66));
    let engine = SaleEngine::new(&cfg, MemoryLedger::new(), treasury).unwrap();

    let err = engine.purchase(addr(66), 1_000, 10).unwrap_err();
    assert_eq!(
        err,
        SaleError::RefundFailed { to: addr(66), amount: 910, source: PayoutError::Rejected(addr(66)) }
    );
    assert_eq!(engine.state().issued_count, 0);

    // Item 0 is still the next item for the next buyer.
    assert_eq!(engine.purchase(addr(2), 1_000, 10).unwrap(), 0);
}

// ---------------------------------------------------------------------------
// Numeric extremes
// ---------------------------------------------------------------------------

#[test]
fn huge_decay_never_makes_item_unpurchasable() {
    // elapsed * decay_rate overflows u128; the price must clamp to the floor.
    let cfg = sale_config(1_000, 0, 3, Amount::MAX, 0, 1);
    let engine = memory_engine(&cfg);
    assert_eq!(engine.quote(u64::MAX).unwrap(), 3);
    assert_eq!(engine.purchase(addr(1), 3, u64::MAX).unwrap(), 0);
}

#[test]
fn max_payment_refunds_everything_above_price() {
    let cfg = sale_config(10, 0, 10, 0, 0, 1);
    let engine = memory_engine(&cfg);
    let p = engine.settle(addr(1), Amount::MAX, 0).unwrap();
    assert_eq!(p.refund, Amount::MAX - 10);
}

#[test]
fn clock_running_backwards_is_rejected() {
    let cfg = sale_config(100, 0, 1, 1, 5, 5);
    let engine = memory_engine(&cfg);
    engine.purchase(addr(1), 100, 50).unwrap();

    let err = engine.purchase(addr(1), 1_000, 49).unwrap_err();
    assert_eq!(err, SaleError::NotStarted { start: 50, now: 49 });
    assert_eq!(engine.phase(49), SalePhase::NotStarted);
    assert_eq!(engine.state().issued_count, 1);
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Failed purchases of any kind leave state, ledger and treasury unchanged.
    #[test]
    fn failures_are_atomic(
        ops in prop::collection::vec((0u8..5, 0u128..400, 0u64..20, any::<bool>()), 1..60),
        fail_on in prop::option::of(0u64..6),
    ) {
        let cfg = sale_config(300, 5, 2, 3, 11, 6);
        let mut inner = MemoryTreasury::new();
        inner.refuse(addr(4));
        let treasury = CountingTreasury { inner, ..CountingTreasury::default() };
        let ledger = FlakyLedger { inner: MemoryLedger::new(), fail_on };
        let engine = SaleEngine::new(&cfg, ledger, treasury).unwrap();

        let mut now = 0u64;
        for (seed, payment, dt, rewind) in ops {
            // Occasionally step the clock back to hit the time gate.
            now = if rewind { now.saturating_sub(dt) } else { now + dt };
            let buyer = Address([seed; 20]);
            let state_before = engine.state();
            let paid_before = engine.inspect(|_, t| t.inner.total_paid());
            let owners_before = engine.inspect(|l, _| l.inner.len());

            match engine.settle(buyer, payment, now) {
                Ok(p) => {
                    prop_assert_eq!(p.item, state_before.issued_count);
                    prop_assert_eq!(engine.state().issued_count, state_before.issued_count + 1);
                    prop_assert_eq!(engine.inspect(|_, t| t.inner.total_paid()), paid_before + p.refund);
                    prop_assert_eq!(engine.owner_of(p.item), Some(buyer));
                }
                Err(_) => {
                    prop_assert_eq!(engine.state(), state_before);
                    prop_assert_eq!(engine.inspect(|_, t| t.inner.total_paid()), paid_before);
                    prop_assert_eq!(engine.inspect(|l, _| l.inner.len()), owners_before);
                }
            }
            prop_assert!(engine.state().issued_count <= 6);
        }
    }

    /// After every successful sale the anchor is never below the floor.
    #[test]
    fn anchor_stays_above_floor(
        floor in 0u128..1_000,
        extra in 0u128..1_000,
        rate in 0u128..50,
        step in 0u128..50,
        gaps in prop::collection::vec(0u64..100, 1..20),
    ) {
        let cfg = sale_config(floor + extra, 0, floor, rate, step, 64);
        let engine = memory_engine(&cfg);
        let mut now = 0;
        for gap in gaps {
            now += gap;
            let p = engine.settle(addr(1), Amount::MAX / 2, now).unwrap();
            prop_assert!(p.price >= floor);
            prop_assert!(engine.state().anchor_price >= floor);
            prop_assert_eq!(engine.state().anchor_price, p.price + step);
        }
    }
}
