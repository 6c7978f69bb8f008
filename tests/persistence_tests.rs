//! Тесты персистентности: снапшот раздачи посреди улицы, JSON round-trip,
//! эквивалентность по эффекту и инварианты сразу после restore.

use holdem_engine::domain::{
    blinds::AnteType,
    chips::Chips,
    player::PlayerAtTable,
    table::{Table, TableConfig, TableStakes, TableType},
};
use holdem_engine::engine::{
    actions::{PlayerAction, PlayerActionKind},
    game_loop::{apply_action, start_hand, HandStatus},
    RandomSource,
};
use holdem_engine::infra::persistence::{
    verify_restored, HandEngineSnapshot, InMemoryPokerStorage, PokerStorage,
};

#[derive(Default)]
struct DummyRng;

impl RandomSource for DummyRng {
    fn shuffle<T>(&mut self, _slice: &mut [T]) {}
}

fn make_table(stacks: &[u64]) -> Table {
    let config = TableConfig {
        max_seats: stacks.len() as u8,
        table_type: TableType::Cash,
        stakes: TableStakes::new(Chips(50), Chips(100), AnteType::None, Chips::ZERO),
    };
    let mut table = Table::new(5, "persist".to_string(), config);
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

/// Снапшот посреди раздачи → JSON → restore: обе копии доигрывают
/// одинаковую последовательность действий с одинаковым итогом.
#[test]
fn snapshot_roundtrip_preserves_hand_state() {
    let mut table = make_table(&[10_000, 10_000, 10_000]);
    let mut engine = start_hand(&mut table, &mut DummyRng, 1).unwrap();

    // Немного действий: колл + рейз.
    apply_action(&mut table, &mut engine, act(0, PlayerActionKind::Call)).unwrap();
    apply_action(
        &mut table,
        &mut engine,
        act(1, PlayerActionKind::Raise(Chips(300))),
    )
    .unwrap();

    // Замораживаем: снапшот + копия стола.
    let json = HandEngineSnapshot::from_engine(&engine)
        .to_json()
        .expect("сериализация снапшота");
    let snapshot = HandEngineSnapshot::from_json(&json).expect("десериализация снапшота");
    let mut restored_table = table.clone();
    let mut restored_engine = snapshot.into_engine();

    // Инварианты держатся сразу после restore.
    verify_restored(&restored_table, &restored_engine, Chips(30_000))
        .expect("восстановленная раздача целостна");
    assert_eq!(restored_engine.current_actor, engine.current_actor);
    assert_eq!(restored_engine.betting, engine.betting);
    assert_eq!(restored_engine.deck, engine.deck);
    assert_eq!(restored_engine.ledger, engine.ledger);

    // Доигрываем одинаково в обеих вселенных.
    let script = [
        act(2, PlayerActionKind::Call),
        act(0, PlayerActionKind::Call),
        // Флоп: чеки до конца.
        act(1, PlayerActionKind::Check),
        act(2, PlayerActionKind::Check),
        act(0, PlayerActionKind::Check),
        act(1, PlayerActionKind::Check),
        act(2, PlayerActionKind::Check),
        act(0, PlayerActionKind::Check),
        act(1, PlayerActionKind::Check),
        act(2, PlayerActionKind::Check),
        act(0, PlayerActionKind::Check),
    ];

    let mut original_summary = None;
    let mut restored_summary = None;
    for action in script {
        if original_summary.is_none() {
            if let HandStatus::Finished(s, _) =
                apply_action(&mut table, &mut engine, action).unwrap()
            {
                original_summary = Some(s);
            }
        }
        if restored_summary.is_none() {
            if let HandStatus::Finished(s, _) =
                apply_action(&mut restored_table, &mut restored_engine, action).unwrap()
            {
                restored_summary = Some(s);
            }
        }
    }

    let original_summary = original_summary.expect("оригинал доигран");
    let restored_summary = restored_summary.expect("копия доиграна");
    assert_eq!(original_summary, restored_summary, "эквивалентность по эффекту");

    // Финальные стеки совпадают по всем местам.
    for (a, b) in table.seats.iter().zip(restored_table.seats.iter()) {
        assert_eq!(
            a.as_ref().map(|p| p.stack),
            b.as_ref().map(|p| p.stack)
        );
    }
}

/// Снапшот хранит колоду целиком: все три коллекции.
#[test]
fn snapshot_keeps_deck_partition() {
    let mut table = make_table(&[10_000, 10_000]);
    let mut engine = start_hand(&mut table, &mut DummyRng, 1).unwrap();

    // Доходим до флопа: одна сожжённая, 4 + 3 розданных карты.
    apply_action(&mut table, &mut engine, act(0, PlayerActionKind::Call)).unwrap();
    apply_action(&mut table, &mut engine, act(1, PlayerActionKind::Check)).unwrap();

    let snapshot = HandEngineSnapshot::from_engine(&engine);
    assert_eq!(snapshot.deck.burned.len(), 1);
    assert_eq!(snapshot.deck.dealt.len(), 7);
    assert!(snapshot.deck.is_partition_intact());

    let restored = snapshot.into_engine();
    assert!(restored.eval_cache.is_empty(), "кэш оценок не переезжает");
}

/// Абстракция хранилища: стол и активная раздача сохраняются и читаются.
#[test]
fn in_memory_storage_roundtrip() {
    let mut storage = InMemoryPokerStorage::new();

    let mut table = make_table(&[10_000, 10_000]);
    let engine = start_hand(&mut table, &mut DummyRng, 1).unwrap();

    storage.save_table(&table);
    storage.save_active_hand(table.id, Some(HandEngineSnapshot::from_engine(&engine)));

    let loaded_table = storage.load_table(table.id).expect("стол сохранён");
    assert_eq!(loaded_table, table);

    let loaded_hand = storage
        .load_active_hand(table.id)
        .expect("активная раздача сохранена");
    assert_eq!(loaded_hand.hand_id, 1);
    assert_eq!(loaded_hand.deck, engine.deck);

    // Очистка активной раздачи.
    storage.save_active_hand(table.id, None);
    assert!(storage.load_active_hand(table.id).is_none());

    // Неизвестный стол — None.
    assert!(storage.load_table(999).is_none());
}
