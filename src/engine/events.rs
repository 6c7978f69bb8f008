use serde::{Deserialize, Serialize};

use crate::domain::card::Card;
use crate::domain::chips::Chips;
use crate::domain::hand::Street;
use crate::domain::{HandId, PlayerId, TableId};

/// Закрытый набор событий для внешних подписчиков (UI, статистика,
/// турнирный слой). Доставка best-effort и неблокирующая: ядро никогда
/// не ждёт результата подписчика.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub enum GameEvent {
    HandStarted {
        table_id: TableId,
        hand_id: HandId,
    },
    CommunityCardsDealt {
        table_id: TableId,
        street: Street,
        cards: Vec<Card>,
    },
    RoundCompleted {
        table_id: TableId,
        street: Street,
    },
    PotDistributed {
        table_id: TableId,
        level: u32,
        winners: Vec<(PlayerId, Chips)>,
    },
    PlayerEliminated {
        table_id: TableId,
        player_id: PlayerId,
    },
    HandFinished {
        table_id: TableId,
        hand_id: HandId,
    },
}

/// Подписчик на события. Возвращаемого значения нет намеренно:
/// корректность ядра не может зависеть от слушателя.
pub trait EventSink {
    fn publish(&mut self, event: &GameEvent);
}

/// Рассылка события нескольким независимым подписчикам.
#[derive(Default)]
pub struct EventBus {
    sinks: Vec<Box<dyn EventSink>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, sink: Box<dyn EventSink>) {
        self.sinks.push(sink);
    }

    pub fn subscriber_count(&self) -> usize {
        self.sinks.len()
    }

    pub fn emit(&mut self, event: &GameEvent) {
        for sink in self.sinks.iter_mut() {
            sink.publish(event);
        }
    }
}

/// Подписчик-накопитель для тестов и отладки.
#[derive(Default)]
pub struct CollectingSink {
    pub events: Vec<GameEvent>,
}

impl EventSink for CollectingSink {
    fn publish(&mut self, event: &GameEvent) {
        self.events.push(event.clone());
    }
}
