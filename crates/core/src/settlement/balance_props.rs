//! Property-based tests for balance and unsettled calculations.

use chrono::Utc;
use proptest::prelude::*;
use rust_decimal::Decimal;

use duet_shared::types::{Currency, SettlementId, SettlementItemId, UserId};

use crate::currency::{round2, round_whole};
use crate::settlement::balance::calculate_balance;
use crate::settlement::request::{Selection, build_request};
use crate::settlement::share::other_share;
use crate::settlement::types::SettlementItem;
use crate::settlement::unsettled::unsettled;
use crate::transaction::test_support::{converted, expense};
use crate::transaction::{SplitType, Transaction};

/// Shape of a generated expense, independent of the user IDs.
#[derive(Debug, Clone)]
struct ExpenseShape {
    paid_by_first: bool,
    amount: Decimal,
    split: u8,
    ratio: u8,
    percent: u8,
    foreign: bool,
}

fn arb_shape() -> impl Strategy<Value = ExpenseShape> {
    (
        any::<bool>(),
        1i64..10_000_000i64,
        0u8..4,
        0u8..=100,
        0u8..=100,
        any::<bool>(),
    )
        .prop_map(|(paid_by_first, whole, split, ratio, percent, foreign)| ExpenseShape {
            paid_by_first,
            amount: Decimal::new(whole, 0),
            split,
            ratio,
            percent,
            foreign,
        })
}

fn arb_shapes() -> impl Strategy<Value = Vec<ExpenseShape>> {
    prop::collection::vec(arb_shape(), 1..20)
}

/// Builds a KRW-displayable expense; foreign ones are USD with a stored KRW conversion.
fn build(shape: &ExpenseShape, a: UserId, b: UserId) -> Transaction {
    let payer = if shape.paid_by_first { a } else { b };
    let mut tx = if shape.foreign {
        let usd = shape.amount / Decimal::ONE_HUNDRED;
        converted(expense(payer, usd, Currency::Usd), Currency::Krw, Decimal::new(13517, 1))
    } else {
        expense(payer, shape.amount, Currency::Krw)
    };

    tx.split_type = match shape.split {
        0 => SplitType::FiftyFifty,
        1 => SplitType::Custom,
        2 => SplitType::PaidForSelf,
        _ => SplitType::PaidForPartner,
    };
    tx.split_ratio = shape.ratio;
    if tx.split_type == SplitType::Custom && shape.percent % 2 == 0 {
        let payer_part = tx.amount * Decimal::from(shape.percent) / Decimal::ONE_HUNDRED;
        tx.split_amount = Some(round2(payer_part));
    }
    tx
}

fn settle_fully(txs: &[Transaction]) -> Vec<SettlementItem> {
    let settlement_id = SettlementId::new();
    txs.iter()
        .map(|tx| SettlementItem {
            id: SettlementItemId::new(),
            settlement_id,
            transaction_id: tx.id,
            amount: other_share(tx, tx.amount),
            currency: tx.currency,
            created_at: Utc::now(),
        })
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Swapping viewpoints yields the same amount with the direction reversed.
    #[test]
    fn prop_balance_is_zero_sum(shapes in arb_shapes()) {
        let (a, b) = (UserId::new(), UserId::new());
        let txs: Vec<Transaction> = shapes.iter().map(|s| build(s, a, b)).collect();

        let from_a = calculate_balance(&txs, &[], a, b, Currency::Krw);
        let from_b = calculate_balance(&txs, &[], b, a, Currency::Krw);

        prop_assert_eq!(from_a.amount, from_b.amount);
        if !from_a.is_settled() {
            prop_assert_eq!(from_a.owe_from, from_b.owe_from);
            prop_assert_eq!(from_a.owe_to, from_b.owe_to);
            prop_assert_ne!(from_a.owe_from, from_a.owe_to);
        }
    }

    /// Settling every share exactly leaves nothing owed or unsettled.
    #[test]
    fn prop_full_settlement_clears_balance(shapes in arb_shapes()) {
        let (a, b) = (UserId::new(), UserId::new());
        let txs: Vec<Transaction> = shapes.iter().map(|s| build(s, a, b)).collect();
        let items = settle_fully(&txs);

        let balance = calculate_balance(&txs, &items, a, b, Currency::Krw);

        prop_assert!(balance.is_settled());
        prop_assert!(unsettled(&txs, &items, Currency::Krw).is_empty());
    }

    /// Reported amounts are whole units.
    #[test]
    fn prop_reported_amounts_are_whole(shapes in arb_shapes()) {
        let (a, b) = (UserId::new(), UserId::new());
        let txs: Vec<Transaction> = shapes.iter().map(|s| build(s, a, b)).collect();

        let balance = calculate_balance(&txs, &[], a, b, Currency::Krw);
        prop_assert!(balance.amount.fract().is_zero());
        prop_assert!(balance.amount >= Decimal::ZERO);

        for entry in unsettled(&txs, &[], Currency::Krw) {
            prop_assert!(entry.other_share.fract().is_zero());
            prop_assert!(entry.settled_amount.fract().is_zero());
            prop_assert!(entry.remaining.fract().is_zero());
            prop_assert!(entry.remaining_unrounded > Decimal::ZERO);
            prop_assert_eq!(entry.remaining, round_whole(entry.remaining_unrounded));
        }
    }

    /// Expenses with no conversion path never change the outcome.
    #[test]
    fn prop_unconvertible_expenses_are_ignored(shapes in arb_shapes(), stray in 1i64..1_000_000i64) {
        let (a, b) = (UserId::new(), UserId::new());
        let txs: Vec<Transaction> = shapes.iter().map(|s| build(s, a, b)).collect();
        let mut with_stray = txs.clone();
        with_stray.push(expense(a, Decimal::new(stray, 2), Currency::Jpy));

        let before = calculate_balance(&txs, &[], a, b, Currency::Krw);
        let after = calculate_balance(&with_stray, &[], a, b, Currency::Krw);

        prop_assert_eq!(before.amount, after.amount);
        prop_assert_eq!(after.excluded.len(), 1);
        prop_assert_eq!(
            unsettled(&txs, &[], Currency::Krw).len(),
            unsettled(&with_stray, &[], Currency::Krw).len()
        );
    }

    /// Each confirmed partial payment lowers the remainder until the
    /// transaction drops out of the unsettled list.
    #[test]
    fn prop_partial_settlement_is_monotonic(
        whole in 2i64..1_000_000i64,
        payments in prop::collection::vec(1i64..200_000i64, 1..12),
    ) {
        let a = UserId::new();
        let tx = expense(a, Decimal::new(whole, 0), Currency::Krw);
        let share = other_share(&tx, tx.amount);
        let txs = vec![tx.clone()];

        let mut items = Vec::new();
        let mut settled = Decimal::ZERO;
        let mut last = unsettled(&txs, &items, Currency::Krw)[0].remaining_unrounded;

        for payment in payments {
            let amount = Decimal::new(payment, 0);
            settled += amount;
            items.push(SettlementItem {
                id: SettlementItemId::new(),
                settlement_id: SettlementId::new(),
                transaction_id: tx.id,
                amount,
                currency: Currency::Krw,
                created_at: Utc::now(),
            });

            let list = unsettled(&txs, &items, Currency::Krw);
            if settled >= share {
                prop_assert!(list.is_empty());
                break;
            }
            prop_assert_eq!(list.len(), 1);
            prop_assert!(list[0].remaining_unrounded < last);
            prop_assert_eq!(list[0].remaining_unrounded, share - settled);
            last = list[0].remaining_unrounded;
        }
    }

    /// With a cent-denominated display currency, any balance still owed can
    /// be requested, and settling every candidate clears it.
    #[test]
    fn prop_cent_balances_are_always_settleable(
        expenses in prop::collection::vec((any::<bool>(), 1i64..500i64), 1..12),
    ) {
        let (a, b) = (UserId::new(), UserId::new());
        let txs: Vec<Transaction> = expenses
            .iter()
            .map(|(first, cents)| {
                let payer = if *first { a } else { b };
                expense(payer, Decimal::new(*cents, 2), Currency::Usd)
            })
            .collect();

        let balance = calculate_balance(&txs, &[], a, b, Currency::Usd);
        let list = unsettled(&txs, &[], Currency::Usd);
        prop_assert_eq!(list.len(), txs.len());
        if !balance.is_settled() {
            prop_assert!(!list.is_empty());
        }

        let selections: Vec<Selection> = list
            .iter()
            .map(|c| Selection::whole(c.transaction.id))
            .collect();
        let request = build_request(&list, &selections, Currency::Usd, "").unwrap();
        prop_assert!(request.total_amount > Decimal::ZERO);

        let settlement_id = SettlementId::new();
        let items: Vec<SettlementItem> = request
            .items
            .iter()
            .map(|staged| SettlementItem::from_staged(settlement_id, staged, Utc::now()))
            .collect();

        prop_assert!(calculate_balance(&txs, &items, a, b, Currency::Usd).is_settled());
        prop_assert!(unsettled(&txs, &items, Currency::Usd).is_empty());
    }
}
