//! Тесты событийного слоя: типизированные события доходят до нескольких
//! независимых подписчиков, по одной раздаче — полный ожидаемый набор.

use std::cell::RefCell;
use std::rc::Rc;

use holdem_engine::domain::{
    blinds::AnteType,
    chips::Chips,
    hand::Street,
    player::PlayerAtTable,
    table::{Table, TableConfig, TableStakes, TableType},
};
use holdem_engine::engine::{
    actions::{PlayerAction, PlayerActionKind},
    events::{CollectingSink, EventBus, EventSink, GameEvent},
    table_manager::TableManager,
    RandomSource,
};
use holdem_engine::time_ctrl::TimeRules;

#[derive(Default)]
struct DummyRng;

impl RandomSource for DummyRng {
    fn shuffle<T>(&mut self, _slice: &mut [T]) {}
}

/// Подписчик с разделяемым буфером, чтобы читать события после move в bus.
struct SharedSink(Rc<RefCell<Vec<GameEvent>>>);

impl EventSink for SharedSink {
    fn publish(&mut self, event: &GameEvent) {
        self.0.borrow_mut().push(event.clone());
    }
}

fn make_table(stacks: &[u64]) -> Table {
    let config = TableConfig {
        max_seats: stacks.len() as u8,
        table_type: TableType::Cash,
        stakes: TableStakes::new(Chips(50), Chips(100), AnteType::None, Chips::ZERO),
    };
    let mut table = Table::new(4, "events".to_string(), config);
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
fn event_bus_fans_out_to_all_subscribers() {
    let mut bus = EventBus::new();
    let a = Rc::new(RefCell::new(Vec::new()));
    let b = Rc::new(RefCell::new(Vec::new()));
    bus.subscribe(Box::new(SharedSink(a.clone())));
    bus.subscribe(Box::new(SharedSink(b.clone())));
    assert_eq!(bus.subscriber_count(), 2);

    let event = GameEvent::HandStarted {
        table_id: 1,
        hand_id: 9,
    };
    bus.emit(&event);

    assert_eq!(*a.borrow(), vec![event.clone()]);
    assert_eq!(*b.borrow(), vec![event]);
}

#[test]
fn collecting_sink_accumulates_events() {
    let mut sink = CollectingSink::default();
    let event = GameEvent::RoundCompleted {
        table_id: 1,
        street: Street::Flop,
    };
    sink.publish(&event);
    assert_eq!(sink.events, vec![event]);
}

/// Полная прочеканная раздача порождает весь закрытый набор событий
/// в правильном порядке.
#[test]
fn full_hand_emits_expected_event_sequence() {
    let received = Rc::new(RefCell::new(Vec::new()));

    let mut manager = TableManager::new(TimeRules::standard());
    manager.subscribe(Box::new(SharedSink(received.clone())));
    manager.add_table(make_table(&[10_000, 10_000, 10_000]));

    manager.start_hand(4, &mut DummyRng, 1).unwrap();

    // Префлоп + три прочеканные улицы.
    for action in [
        act(0, PlayerActionKind::Call),
        act(1, PlayerActionKind::Call),
        act(2, PlayerActionKind::Check),
        act(1, PlayerActionKind::Check),
        act(2, PlayerActionKind::Check),
        act(0, PlayerActionKind::Check),
        act(1, PlayerActionKind::Check),
        act(2, PlayerActionKind::Check),
        act(0, PlayerActionKind::Check),
        act(1, PlayerActionKind::Check),
        act(2, PlayerActionKind::Check),
        act(0, PlayerActionKind::Check),
    ] {
        manager.apply_action(4, action).unwrap();
    }

    let events = received.borrow();

    // HandStarted ровно один и первый.
    assert!(matches!(events[0], GameEvent::HandStarted { hand_id: 1, .. }));

    // Три выдачи борда: флоп (3 карты), тёрн (1), ривер (1).
    let boards: Vec<(Street, usize)> = events
        .iter()
        .filter_map(|e| match e {
            GameEvent::CommunityCardsDealt { street, cards, .. } => Some((*street, cards.len())),
            _ => None,
        })
        .collect();
    assert_eq!(
        boards,
        vec![(Street::Flop, 3), (Street::Turn, 1), (Street::River, 1)]
    );

    // Четыре завершённых раунда ставок.
    let rounds = events
        .iter()
        .filter(|e| matches!(e, GameEvent::RoundCompleted { .. }))
        .count();
    assert_eq!(rounds, 4);

    // Распределение банка и завершение раздачи.
    let pot = events
        .iter()
        .find_map(|e| match e {
            GameEvent::PotDistributed { winners, .. } => Some(winners.clone()),
            _ => None,
        })
        .expect("банк распределён");
    assert_eq!(pot, vec![(1, Chips(300))], "победитель — игрок 1");

    assert!(matches!(
        events.last().unwrap(),
        GameEvent::HandFinished { hand_id: 1, .. }
    ));
}
