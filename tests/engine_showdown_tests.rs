//! Шоудаун-тесты через настоящий game loop с детерминированной колодой.
//!
//! DummyRng не перемешивает, поэтому расклад известен заранее
//! (верх колоды — туз пик, дальше по убыванию пики):
//!   seat0 ← As Js, seat1 ← Ks Ts, seat2 ← Qs 9s;
//!   борд (с учётом burn): 7s 6s 5s | 3s | Ah.
//! У всех флеш в пиках; старшинство: seat0 (A+J) > seat1 (K+T) > seat2 (Q+9).

use holdem_engine::domain::{
    blinds::AnteType,
    chips::Chips,
    hand::Street,
    player::PlayerAtTable,
    table::{Table, TableConfig, TableStakes, TableType},
};
use holdem_engine::engine::{
    actions::{PlayerAction, PlayerActionKind},
    game_loop::{apply_action, check_chip_conservation, start_hand, HandStatus},
    hand_history::HandEventKind,
    RandomSource,
};
use holdem_engine::eval::HandCategory;

#[derive(Default)]
struct DummyRng;

impl RandomSource for DummyRng {
    fn shuffle<T>(&mut self, _slice: &mut [T]) {
        // no-op: канонический порядок колоды
    }
}

fn make_table(stacks: &[u64]) -> Table {
    let config = TableConfig {
        max_seats: stacks.len() as u8,
        table_type: TableType::Cash,
        stakes: TableStakes::new(Chips(50), Chips(100), AnteType::None, Chips::ZERO),
    };
    let mut table = Table::new(7, "showdown".to_string(), config);
    for (seat, &stack) in stacks.iter().enumerate() {
        table.seats[seat] = Some(PlayerAtTable::new(seat as u64 + 1, Chips(stack)));
    }
    table
}

fn act(seat: u8, kind: PlayerActionKind) -> PlayerAction {
    PlayerAction {
        player_id: seat as u64 + 1,
        seat,
        kind,
    }
}

fn check_down(
    table: &mut Table,
    engine: &mut holdem_engine::engine::HandEngine,
    order: &[u8],
) -> Option<holdem_engine::domain::hand::HandSummary> {
    // Прочекать одну улицу в заданном порядке; вернёт итог, если раздача кончилась.
    for &seat in order {
        match apply_action(table, engine, act(seat, PlayerActionKind::Check)).unwrap() {
            HandStatus::Ongoing => {}
            HandStatus::Finished(summary, _) => return Some(summary),
        }
    }
    None
}

/// Полная раздача до шоудауна: сильнейший флеш забирает банк.
#[test]
fn full_hand_to_showdown_best_flush_wins() {
    let mut table = make_table(&[10_000, 10_000, 10_000]);
    let mut engine = start_hand(&mut table, &mut DummyRng, 1).unwrap();

    // Префлоп: все уравнивают по 100.
    apply_action(&mut table, &mut engine, act(0, PlayerActionKind::Call)).unwrap();
    apply_action(&mut table, &mut engine, act(1, PlayerActionKind::Call)).unwrap();
    apply_action(&mut table, &mut engine, act(2, PlayerActionKind::Check)).unwrap();

    // Флоп/тёрн прочекиваются, на ривере раздача заканчивается.
    assert!(check_down(&mut table, &mut engine, &[1, 2, 0]).is_none());
    assert!(check_down(&mut table, &mut engine, &[1, 2, 0]).is_none());
    let summary = check_down(&mut table, &mut engine, &[1, 2, 0]).expect("ривер закрывает раздачу");

    assert_eq!(summary.street_reached, Street::Showdown);
    assert_eq!(summary.total_pot, Chips(300));
    assert_eq!(summary.board.len(), 5);

    // Побеждает seat 0 (игрок 1) с тузовым флешом.
    let winner = summary.results.iter().find(|r| r.is_winner).unwrap();
    assert_eq!(winner.player_id, 1);
    assert_eq!(winner.won, Chips(300));
    assert_eq!(
        winner.rank.unwrap().category(),
        HandCategory::Flush,
        "у победителя флеш в пиках"
    );

    // Проигравшие ничего не получили.
    for r in &summary.results {
        if r.player_id != 1 {
            assert!(!r.is_winner);
            assert_eq!(r.won, Chips::ZERO);
        }
    }

    // Деньги сошлись: 10_200 + 9_900 + 9_900 = 30_000.
    assert_eq!(table.seats[0].as_ref().unwrap().stack, Chips(10_200));
    assert_eq!(table.seats[1].as_ref().unwrap().stack, Chips(9_900));
    assert_eq!(table.seats[2].as_ref().unwrap().stack, Chips(9_900));
    check_chip_conservation(&table, &engine, Chips(30_000)).expect("фишки сохраняются");

    // Колода осталась разбиением 52 карт.
    assert!(engine.deck.is_partition_intact());
    assert_eq!(engine.deck.burned.len(), 3, "по одной сожжённой на улицу");
}

/// Спецсценарий сайд-потов: A=100 олл-ин, B и C доигрывают side pot 400.
/// A берёт только main (300), хотя его рука лучшая из всех не-участников side.
#[test]
fn all_in_player_wins_only_main_pot() {
    // seat0 = A (100), seat1 = B (500), seat2 = C (500).
    let mut table = make_table(&[100, 500, 500]);
    let mut engine = start_hand(&mut table, &mut DummyRng, 1).unwrap();

    // A олл-ин 100, B рейзит до 300, C коллирует.
    apply_action(&mut table, &mut engine, act(0, PlayerActionKind::AllIn)).unwrap();
    apply_action(
        &mut table,
        &mut engine,
        act(1, PlayerActionKind::Raise(Chips(300))),
    )
    .unwrap();
    let status = apply_action(&mut table, &mut engine, act(2, PlayerActionKind::Call)).unwrap();

    // B и C без фишек решений не имеют только если олл-ин; тут у них стеки
    // остались — доигрываем флоп/тёрн/ривер чеками.
    let summary = match status {
        HandStatus::Finished(summary, _) => summary,
        HandStatus::Ongoing => {
            assert_eq!(
                engine.ledger.pots()[0].amount(),
                Chips(300),
                "main pot: 100 × 3"
            );
            assert_eq!(engine.ledger.pots()[0].cap, Some(Chips(100)));
            assert_eq!(
                engine.ledger.pots()[1].amount(),
                Chips(400),
                "side pot: 200 + 200"
            );
            assert!(!engine.ledger.pots()[1].eligible.contains(&0));

            let mut summary = None;
            for _ in 0..3 {
                if let Some(s) = check_down(&mut table, &mut engine, &[1, 2]) {
                    summary = Some(s);
                    break;
                }
            }
            summary.expect("раздача доиграна до шоудауна")
        }
    };

    // Руки: A = As Js (лучший флеш), B = Ks Ts, C = Qs 9s.
    // A выигрывает main pot 300 (ограничен eligibility),
    // B выигрывает side pot 400.
    assert_eq!(summary.total_pot, Chips(700));

    assert_eq!(table.seats[0].as_ref().unwrap().stack, Chips(300));
    assert_eq!(table.seats[1].as_ref().unwrap().stack, Chips(600));
    assert_eq!(table.seats[2].as_ref().unwrap().stack, Chips(200));

    let a = &summary.results[0];
    assert!(a.is_winner);
    assert_eq!(a.won, Chips(300));

    let b = &summary.results[1];
    assert!(b.is_winner);
    assert_eq!(b.won, Chips(400));

    let c = &summary.results[2];
    assert!(!c.is_winner);
    assert_eq!(c.won, Chips::ZERO);

    check_chip_conservation(&table, &engine, Chips(1_100)).expect("фишки сохраняются");
    assert!(summary.eliminated.is_empty(), "у всех остались фишки");
}

/// Fold-out: рейзер забирает банк без шоудауна, включая свою неуравненную ставку.
#[test]
fn fold_out_awards_pot_without_showdown() {
    let mut table = make_table(&[10_000, 10_000]);
    let mut engine = start_hand(&mut table, &mut DummyRng, 1).unwrap();

    // Хедз-ап: seat0 (дилер/SB) рейзит до 300, seat1 (BB) фолдит.
    apply_action(
        &mut table,
        &mut engine,
        act(0, PlayerActionKind::Raise(Chips(300))),
    )
    .unwrap();
    let status = apply_action(&mut table, &mut engine, act(1, PlayerActionKind::Fold)).unwrap();

    let summary = match status {
        HandStatus::Finished(summary, _) => summary,
        HandStatus::Ongoing => panic!("после фолда раздача должна закончиться"),
    };

    assert_eq!(summary.street_reached, Street::Showdown);
    // Банк 400 = 300 (seat0) + 100 (BB seat1), всё уходит seat0.
    assert_eq!(summary.total_pot, Chips(400));
    let winner = summary.results.iter().find(|r| r.is_winner).unwrap();
    assert_eq!(winner.player_id, 1);
    assert_eq!(winner.won, Chips(400));
    assert!(winner.rank.is_none(), "шоудауна не было — рука не вскрыта");

    assert_eq!(table.seats[0].as_ref().unwrap().stack, Chips(10_100));
    assert_eq!(table.seats[1].as_ref().unwrap().stack, Chips(9_900));
    check_chip_conservation(&table, &engine, Chips(20_000)).expect("фишки сохраняются");
}

/// История раздачи фиксирует выплаты попотно.
#[test]
fn hand_history_records_per_pot_awards() {
    let mut table = make_table(&[100, 500, 500]);
    let mut engine = start_hand(&mut table, &mut DummyRng, 1).unwrap();

    apply_action(&mut table, &mut engine, act(0, PlayerActionKind::AllIn)).unwrap();
    apply_action(
        &mut table,
        &mut engine,
        act(1, PlayerActionKind::Raise(Chips(300))),
    )
    .unwrap();
    apply_action(&mut table, &mut engine, act(2, PlayerActionKind::Call)).unwrap();
    for _ in 0..3 {
        if check_down(&mut table, &mut engine, &[1, 2]).is_some() {
            break;
        }
    }

    let awards: Vec<_> = engine
        .history
        .events
        .iter()
        .filter_map(|e| match &e.kind {
            HandEventKind::PotAwarded { level, winners } => Some((*level, winners.clone())),
            _ => None,
        })
        .collect();

    assert_eq!(awards.len(), 2, "две выплаты: main и side");
    assert_eq!(awards[0].0, 0);
    assert_eq!(awards[0].1, vec![(0, 1, Chips(300))]);
    assert_eq!(awards[1].0, 1);
    assert_eq!(awards[1].1, vec![(1, 2, Chips(400))]);
}
