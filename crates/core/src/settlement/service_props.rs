//! Property-based tests for the settlement lifecycle.

use proptest::prelude::*;
use rust_decimal::Decimal;

use duet_shared::types::{Currency, UserId};

use crate::couple::Couple;
use crate::settlement::balance::calculate_balance;
use crate::settlement::capacity::verify_capacity;
use crate::settlement::request::{Selection, build_request};
use crate::settlement::service::SettlementWorkflow;
use crate::settlement::types::{SettlementAction, SettlementItem, SettlementStatus};
use crate::settlement::unsettled::unsettled;
use crate::transaction::Transaction;
use crate::transaction::test_support::expense;

fn arb_status() -> impl Strategy<Value = SettlementStatus> {
    prop_oneof![
        Just(SettlementStatus::Pending),
        Just(SettlementStatus::Confirmed),
        Just(SettlementStatus::Cancelled),
    ]
}

/// Whole-won expenses, each paid by the first or second partner.
fn arb_expenses() -> impl Strategy<Value = Vec<(bool, i64)>> {
    prop::collection::vec((any::<bool>(), 1i64..5_000_000i64), 1..15)
}

fn build(specs: &[(bool, i64)], couple: &Couple) -> Vec<Transaction> {
    specs
        .iter()
        .map(|(first, whole)| {
            let payer = if *first { couple.user1_id } else { couple.user2_id };
            expense(payer, Decimal::new(*whole, 0), Currency::Krw)
        })
        .collect()
}

fn confirmed_items(action: &SettlementAction) -> Vec<SettlementItem> {
    match action {
        SettlementAction::Confirm { items, .. } => items.clone(),
        SettlementAction::Cancel { .. } => Vec::new(),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Confirm and cancel succeed exactly when the transition table allows them.
    #[test]
    fn prop_actions_follow_transition_table(status in arb_status()) {
        let couple = Couple::new(UserId::new(), UserId::new());
        let txs = build(&[(true, 1000)], &couple);
        let candidates = unsettled(&txs, &[], Currency::Krw);
        let request = build_request(&candidates, &[Selection::whole(txs[0].id)], Currency::Krw, "").unwrap();
        let mut settlement = SettlementWorkflow::create(&couple, couple.user2_id, request).unwrap();
        settlement.status = status;

        let confirm = SettlementWorkflow::confirm(&settlement, couple.user1_id);
        prop_assert_eq!(
            confirm.is_ok(),
            SettlementWorkflow::is_valid_transition(status, SettlementStatus::Confirmed)
        );

        let cancel = SettlementWorkflow::cancel(&settlement, couple.user2_id);
        prop_assert_eq!(
            cancel.is_ok(),
            SettlementWorkflow::is_valid_transition(status, SettlementStatus::Cancelled)
        );
    }

    /// Pending, confirm, then reverse: the balance clears on confirm and is
    /// restored once the settlement is cancelled.
    #[test]
    fn prop_lifecycle_clears_and_restores_balance(specs in arb_expenses()) {
        let couple = Couple::new(UserId::new(), UserId::new());
        let (a, b) = (couple.user1_id, couple.user2_id);
        let txs = build(&specs, &couple);
        let before = calculate_balance(&txs, &[], a, b, Currency::Krw);

        let candidates = unsettled(&txs, &[], Currency::Krw);
        prop_assume!(!candidates.is_empty());
        let selections: Vec<Selection> = candidates
            .iter()
            .map(|c| Selection::whole(c.transaction.id))
            .collect();
        let request = build_request(&candidates, &selections, Currency::Krw, "all").unwrap();

        let mut settlement = SettlementWorkflow::create(&couple, a, request).unwrap();
        prop_assert_eq!(settlement.status, SettlementStatus::Pending);

        // Pending items do not count yet.
        let pending = calculate_balance(&txs, &[], a, b, Currency::Krw);
        prop_assert_eq!(&pending, &before);

        prop_assert!(verify_capacity(&txs, &[], &settlement.staged_items).is_ok());
        let confirm = SettlementWorkflow::confirm(&settlement, b).unwrap();
        settlement.apply(&confirm);
        let items = confirmed_items(&confirm);
        prop_assert_eq!(settlement.status, SettlementStatus::Confirmed);

        let after = calculate_balance(&txs, &items, a, b, Currency::Krw);
        prop_assert!(after.is_settled());

        // A second request for the same remainder no longer fits.
        prop_assert!(verify_capacity(&txs, &items, &settlement.staged_items).is_err());

        let cancel = SettlementWorkflow::cancel(&settlement, a).unwrap();
        settlement.apply(&cancel);
        prop_assert_eq!(settlement.status, SettlementStatus::Cancelled);

        let restored = calculate_balance(&txs, &[], a, b, Currency::Krw);
        prop_assert_eq!(restored, before);
    }
}
