//! Тесты ошибок движка: действия вне раздачи, несуществующие места,
//! повторный старт, неизменность состояния при отказе.

use holdem_engine::domain::{
    blinds::AnteType,
    chips::Chips,
    player::PlayerAtTable,
    table::{Table, TableConfig, TableStakes, TableType},
};
use holdem_engine::engine::{
    actions::{PlayerAction, PlayerActionKind},
    errors::EngineError,
    game_loop::{apply_action, start_hand, HandStatus},
    RandomSource,
};

#[derive(Default)]
struct DummyRng;

impl RandomSource for DummyRng {
    fn shuffle<T>(&mut self, _slice: &mut [T]) {}
}

fn make_table(max_seats: u8, stacks: &[u64]) -> Table {
    let config = TableConfig {
        max_seats,
        table_type: TableType::Cash,
        stakes: TableStakes::new(Chips(50), Chips(100), AnteType::None, Chips::ZERO),
    };
    let mut table = Table::new(3, "errors".to_string(), config);
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

#[test]
fn action_without_active_hand_is_rejected() {
    let mut table = make_table(2, &[10_000, 10_000]);
    let mut engine = start_hand(&mut table, &mut DummyRng, 1).unwrap();

    // Доигрываем раздачу фолдом.
    let status = apply_action(&mut table, &mut engine, act(0, PlayerActionKind::Fold)).unwrap();
    assert!(matches!(status, HandStatus::Finished(..)));
    assert!(!table.hand_in_progress);

    // После завершения любое действие отбивается.
    assert!(matches!(
        apply_action(&mut table, &mut engine, act(1, PlayerActionKind::Check)),
        Err(EngineError::NoActiveHand)
    ));
}

#[test]
fn invalid_and_empty_seats_are_rejected() {
    // 4 места, заняты только 0 и 1.
    let mut table = make_table(4, &[10_000, 10_000]);
    let mut engine = start_hand(&mut table, &mut DummyRng, 1).unwrap();

    // Место за пределами стола.
    assert!(matches!(
        apply_action(&mut table, &mut engine, act(9, PlayerActionKind::Call)),
        Err(EngineError::InvalidSeat(9))
    ));

    // Валидный индекс, но место пустое.
    assert!(matches!(
        apply_action(&mut table, &mut engine, act(3, PlayerActionKind::Call)),
        Err(EngineError::EmptySeat)
    ));
}

#[test]
fn failed_action_leaves_engine_untouched() {
    let mut table = make_table(3, &[10_000, 10_000, 10_000]);
    let mut engine = start_hand(&mut table, &mut DummyRng, 1).unwrap();

    let actor_before = engine.current_actor;
    let to_act_before = engine.betting.to_act.clone();
    let pot_before = engine.ledger.total();
    let history_len = engine.history.events.len();

    // Серия заведомо нелегальных действий.
    let _ = apply_action(&mut table, &mut engine, act(0, PlayerActionKind::Check));
    let _ = apply_action(
        &mut table,
        &mut engine,
        act(0, PlayerActionKind::Raise(Chips(101))),
    );
    let _ = apply_action(&mut table, &mut engine, act(2, PlayerActionKind::Call));

    assert_eq!(engine.current_actor, actor_before);
    assert_eq!(engine.betting.to_act, to_act_before);
    assert_eq!(engine.ledger.total(), pot_before);
    assert_eq!(
        engine.history.events.len(),
        history_len,
        "отказанные действия не попадают в историю"
    );
}

#[test]
fn folded_player_cannot_act_again() {
    let mut table = make_table(3, &[10_000, 10_000, 10_000]);
    let mut engine = start_hand(&mut table, &mut DummyRng, 1).unwrap();

    apply_action(&mut table, &mut engine, act(0, PlayerActionKind::Fold)).unwrap();

    // Ход уже у seat 1; от seat 0 любое действие — stale.
    assert!(matches!(
        apply_action(&mut table, &mut engine, act(0, PlayerActionKind::Call)),
        Err(EngineError::NotPlayersTurn(1))
    ));
}

#[test]
fn call_with_nothing_to_call_is_rejected() {
    let mut table = make_table(3, &[10_000, 10_000, 10_000]);
    let mut engine = start_hand(&mut table, &mut DummyRng, 1).unwrap();

    // Доходим до флопа.
    apply_action(&mut table, &mut engine, act(0, PlayerActionKind::Call)).unwrap();
    apply_action(&mut table, &mut engine, act(1, PlayerActionKind::Call)).unwrap();
    apply_action(&mut table, &mut engine, act(2, PlayerActionKind::Check)).unwrap();

    // Ставки нет — коллировать нечего.
    assert!(matches!(
        apply_action(&mut table, &mut engine, act(1, PlayerActionKind::Call)),
        Err(EngineError::CannotCall)
    ));
}
