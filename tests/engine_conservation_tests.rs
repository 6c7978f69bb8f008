//! Стресс-тест сохранения фишек: случайные (но воспроизводимые) раздачи,
//! после КАЖДОГО действия `стеки + нераспределённый банк == константа`,
//! после каждой раздачи стеки снова дают полную сумму фишек в игре.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use holdem_engine::domain::{
    blinds::AnteType,
    chips::Chips,
    player::PlayerStatus,
    table::{Table, TableConfig, TableStakes, TableType},
};
use holdem_engine::domain::player::PlayerAtTable;
use holdem_engine::engine::{
    actions::{PlayerAction, PlayerActionKind},
    game_loop::{apply_action, check_chip_conservation, start_hand, HandStatus},
};
use holdem_engine::infra::rng::DeterministicRng;

const PLAYERS: usize = 4;
const START_STACK: u64 = 2_000;
const TOTAL: u64 = PLAYERS as u64 * START_STACK;

fn make_table() -> Table {
    let config = TableConfig {
        max_seats: PLAYERS as u8,
        table_type: TableType::Cash,
        stakes: TableStakes::new(Chips(25), Chips(50), AnteType::None, Chips::ZERO),
    };
    let mut table = Table::new(1, "stress".to_string(), config);
    for seat in 0..PLAYERS {
        table.seats[seat] = Some(PlayerAtTable::new(seat as u64 + 1, Chips(START_STACK)));
    }
    table
}

/// Выбрать случайное легальное действие для текущего актёра.
fn random_action(
    table: &Table,
    engine: &holdem_engine::engine::HandEngine,
    policy_rng: &mut StdRng,
) -> PlayerAction {
    let seat = engine.current_actor.expect("актёр задан, пока раздача идёт");
    let player = table.seats[seat as usize].as_ref().unwrap();
    let player_id = player.player_id;

    let to_call = engine
        .betting
        .current_bet
        .saturating_sub(player.current_bet);
    let bb = table.config.stakes.big_blind;

    let mut candidates: Vec<PlayerActionKind> = Vec::new();
    if to_call.is_zero() {
        candidates.push(PlayerActionKind::Check);
        if engine.betting.current_bet.is_zero() && player.stack >= bb {
            candidates.push(PlayerActionKind::Bet(bb));
        }
    } else {
        candidates.push(PlayerActionKind::Call);
        candidates.push(PlayerActionKind::Fold);
        // Мин-рейз, если стек позволяет без олл-ина.
        let raise_to = engine.betting.current_bet + engine.betting.min_raise;
        let diff = raise_to.saturating_sub(player.current_bet);
        if player.stack > diff {
            candidates.push(PlayerActionKind::Raise(raise_to));
        }
    }
    if !player.stack.is_zero() {
        candidates.push(PlayerActionKind::AllIn);
    }

    let kind = candidates[policy_rng.gen_range(0..candidates.len())];
    PlayerAction {
        player_id,
        seat,
        kind,
    }
}

#[test]
fn chips_are_conserved_across_random_hands() {
    for seed in 0..5u64 {
        let mut table = make_table();
        let mut policy_rng = StdRng::seed_from_u64(seed * 7 + 1);

        for hand_no in 0..40u64 {
            let active = table
                .seats
                .iter()
                .filter_map(|s| s.as_ref())
                .filter(|p| !p.stack.is_zero() && p.status != PlayerStatus::SittingOut)
                .count();
            if active < 2 {
                break; // кэш-стол опустел — кто-то собрал все фишки
            }

            let mut deck_rng = DeterministicRng::from_seed(seed * 1_000 + hand_no);
            let mut engine = start_hand(&mut table, &mut deck_rng, hand_no + 1).unwrap();

            check_chip_conservation(&table, &engine, Chips(TOTAL))
                .expect("после блайндов деньги сходятся");

            let mut finished = None;
            for _step in 0..500 {
                let action = random_action(&table, &engine, &mut policy_rng);
                match apply_action(&mut table, &mut engine, action).unwrap() {
                    HandStatus::Ongoing => {
                        check_chip_conservation(&table, &engine, Chips(TOTAL))
                            .expect("после каждого действия деньги сходятся");
                    }
                    HandStatus::Finished(summary, _) => {
                        finished = Some(summary);
                        break;
                    }
                }
            }
            let summary = finished.expect("раздача обязана закончиться за 500 шагов");

            // После распределения все фишки снова в стеках.
            assert_eq!(table.total_stacks(), Chips(TOTAL));
            assert_eq!(engine.ledger.total(), Chips::ZERO);
            engine.ledger.check_integrity().expect("ledger цел");

            // Выигрыши в summary согласованы с банком раздачи.
            let won: Chips = summary.results.iter().map(|r| r.won).sum();
            assert_eq!(won, summary.total_pot, "банк разошёлся без остатка");
        }
    }
}
