//! Property tests for exchange invariants.
//!
//! Uses proptest to verify:
//! 1. Conservation — pooled tokens always equal the sum of locked margin
//!    while prices are unchanged
//! 2. Index consistency — every open position appears in exactly one owner
//!    list and one future list
//! 3. Settlement equivalence — batched settlement reaches the same terminal
//!    state as a one-shot sweep
//! 4. Registry monotonicity — duplicates never advance the club index

use proptest::prelude::*;
use clubex_core::{
    AccountId, Amount, ClubId, EngineConfig, EngineError, Exchange, FutureId, InMemoryLedger,
    PositionSide, SettlementProgress, StaticAccess,
};

const DAY: i64 = 86_400;
const NOW: i64 = 1_700_000_000;

fn admin() -> AccountId {
    AccountId::from("admin")
}

fn account(i: usize) -> AccountId {
    AccountId::new(format!("user-{i}"))
}

/// Exchange with `users` funded accounts, two clubs, and one open future.
fn exchange(users: usize) -> Exchange<InMemoryLedger, StaticAccess> {
    let mut ledger = InMemoryLedger::new();
    for i in 0..users {
        ledger.credit(&account(i), Amount::from_whole(1_000_000));
        ledger.approve(&account(i), Amount::from_whole(1_000_000));
    }
    let access = StaticAccess::new(AccountId::from("owner"), admin());
    let mut ex = Exchange::new(
        EngineConfig::default(),
        ledger,
        access,
        AccountId::from("treasury"),
    );
    ex.register_club(&admin(), "Real Madrid", "RMA").unwrap();
    ex.register_club(&admin(), "FC Barcelona", "FCB").unwrap();
    ex.register_future_date(&admin(), NOW + 30 * DAY).unwrap();
    ex
}

// ── Strategies ───────────────────────────────────────────────────────

fn arb_quantity() -> impl Strategy<Value = u64> {
    1u64..500
}

/// (user index, club index, quantity, long?) per opened position.
fn arb_opens() -> impl Strategy<Value = Vec<(usize, u64, u64, bool)>> {
    prop::collection::vec((0usize..4, 0u64..2, arb_quantity(), any::<bool>()), 1..24)
}

fn open_all(
    ex: &mut Exchange<InMemoryLedger, StaticAccess>,
    opens: &[(usize, u64, u64, bool)],
) -> Vec<clubex_core::PositionId> {
    opens
        .iter()
        .map(|(user, club, qty, long)| {
            let side = if *long {
                PositionSide::Long
            } else {
                PositionSide::Short
            };
            ex.open_position(
                &account(*user),
                NOW,
                ClubId(*club),
                *qty,
                side,
                Amount::from_whole(1),
                FutureId(0),
            )
            .unwrap()
        })
        .collect()
}

// ── 1. Conservation ──────────────────────────────────────────────────

proptest! {
    /// While prices are unchanged, pooled tokens equal the sum of locked
    /// margin after any interleaving of opens and closes.
    #[test]
    fn conservation_under_opens_and_closes(
        opens in arb_opens(),
        close_mask in prop::collection::vec(any::<bool>(), 24),
    ) {
        let mut ex = exchange(4);
        let ids = open_all(&mut ex, &opens);
        prop_assert_eq!(ex.ledger().pooled(), ex.total_locked_margin());

        for (i, id) in ids.iter().enumerate() {
            if close_mask.get(i).copied().unwrap_or(false) {
                let owner = account(opens[i].0);
                ex.close_position(&owner, *id).unwrap();
            }
        }
        prop_assert_eq!(ex.ledger().pooled(), ex.total_locked_margin());
    }

    /// Amounts transferred in equal locked margin plus refunds paid out.
    #[test]
    fn transfers_balance_margin_plus_refunds(opens in arb_opens()) {
        let mut ex = exchange(4);
        let funded = Amount::from_whole(1_000_000);
        let ids = open_all(&mut ex, &opens);

        // Close every other position; at an unchanged price each refund
        // equals its locked margin, restoring the payer's balance exactly.
        for (i, id) in ids.iter().enumerate() {
            if i % 2 == 0 {
                ex.close_position(&account(opens[i].0), *id).unwrap();
            }
        }

        // Total spent by users == still-locked margin + refunds returned.
        let mut spent = Amount::ZERO;
        for u in 0..4 {
            let balance = ex.ledger().balance_of(&account(u));
            spent = spent.checked_add(funded.saturating_sub(balance)).unwrap();
        }
        let locked = ex.total_locked_margin();
        prop_assert_eq!(spent, locked);
        prop_assert_eq!(ex.ledger().pooled(), locked);
    }
}

// ── 2. Index consistency ─────────────────────────────────────────────

proptest! {
    /// Every open position appears exactly once across all user lists and
    /// exactly once in its future's list.
    #[test]
    fn indices_are_consistent(opens in arb_opens()) {
        let mut ex = exchange(4);
        open_all(&mut ex, &opens);

        let all = ex.get_all_positions();
        let mut from_users = 0usize;
        for u in 0..4 {
            from_users += ex.get_user_open_positions(&account(u)).len();
        }
        prop_assert_eq!(all.len(), from_users);
        prop_assert_eq!(all.len(), opens.len());
    }
}

// ── 3. Settlement equivalence ────────────────────────────────────────

proptest! {
    /// Batched settlement with any batch size reaches the same holdings and
    /// the same executed flag as a single unbounded sweep.
    #[test]
    fn batched_settlement_matches_one_shot(
        opens in arb_opens(),
        batch in 1usize..6,
    ) {
        let mut one_shot = exchange(4);
        open_all(&mut one_shot, &opens);
        let progress = one_shot.execute_future_batch(FutureId(0), usize::MAX).unwrap();
        prop_assert_eq!(progress, SettlementProgress::Settled { folded: opens.len() });

        let mut batched = exchange(4);
        open_all(&mut batched, &opens);
        loop {
            match batched.execute_future_batch(FutureId(0), batch).unwrap() {
                SettlementProgress::Settled { .. } => break,
                SettlementProgress::InProgress { folded, .. } => {
                    prop_assert!(folded > 0, "settlement must make progress");
                }
            }
        }

        for u in 0..4 {
            for club in 0..2 {
                prop_assert_eq!(
                    one_shot.get_user_stock(&account(u), ClubId(club)),
                    batched.get_user_stock(&account(u), ClubId(club))
                );
            }
            prop_assert!(batched.get_user_open_positions(&account(u)).is_empty());
        }
        prop_assert!(batched.get_future(FutureId(0)).unwrap().executed);
    }

    /// After settlement, a second execute always fails and holdings do not
    /// change.
    #[test]
    fn settled_future_is_terminal(opens in arb_opens()) {
        let mut ex = exchange(4);
        open_all(&mut ex, &opens);
        ex.execute_future_batch(FutureId(0), usize::MAX).unwrap();

        let snapshot: Vec<(u64, u64)> = (0..4)
            .flat_map(|u| (0..2).map(move |c| (u, c)))
            .map(|(u, c)| ex.get_user_stock(&account(u), ClubId(c)))
            .collect();

        prop_assert_eq!(
            ex.execute_future(FutureId(0)),
            Err(EngineError::FutureAlreadyExecuted(FutureId(0)))
        );

        let after: Vec<(u64, u64)> = (0..4)
            .flat_map(|u| (0..2).map(move |c| (u, c)))
            .map(|(u, c)| ex.get_user_stock(&account(u), ClubId(c)))
            .collect();
        prop_assert_eq!(snapshot, after);
    }
}

// ── 4. Registry monotonicity ─────────────────────────────────────────

proptest! {
    /// Registering the same club repeatedly never advances the index past
    /// the first success.
    #[test]
    fn duplicate_registration_never_advances_index(attempts in 1usize..10) {
        let mut ex = exchange(1);
        let before = ex.get_club_index();
        for _ in 0..attempts {
            let result = ex.register_club(&admin(), "Real Madrid", "RMA");
            prop_assert!(
                matches!(result, Err(EngineError::DuplicateClub { .. })),
                "expected Err(EngineError::DuplicateClub), got {:?}",
                result
            );
        }
        prop_assert_eq!(ex.get_club_index(), before);
    }
}
