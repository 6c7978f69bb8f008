use serde::{Deserialize, Serialize};

use crate::domain::card::Card;
use crate::domain::chips::Chips;
use crate::domain::hand::Street;
use crate::domain::{HandId, PlayerId, SeatIndex, TableId};
use crate::engine::actions::PlayerActionKind;

/// Тип события в раздаче (аудит-лог внутри одной раздачи).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub enum HandEventKind {
    /// Новая раздача началась.
    HandStarted { table_id: TableId, hand_id: HandId },

    /// Кнопка/блайнды/анте.
    BlindsPosted {
        dealer: SeatIndex,
        small_blind: Option<(SeatIndex, Chips)>,
        big_blind: Option<(SeatIndex, Chips)>,
        ante: Vec<(SeatIndex, Chips)>,
    },

    /// Игрок получил карманные карты.
    HoleCardsDealt { seat: SeatIndex, cards: Vec<Card> },

    /// Раунд ставок на улице завершён.
    RoundCompleted { street: Street },

    /// Открыта очередная порция общих карт (в tranche — только новые).
    BoardDealt { street: Street, cards: Vec<Card> },

    /// Действие игрока.
    PlayerActed {
        player_id: PlayerId,
        seat: SeatIndex,
        action: PlayerActionKind,
        new_stack: Chips,
        /// Как вклад разложился по потам: (уровень, сумма).
        pot_breakdown: Vec<(u32, Chips)>,
        pot_after: Chips,
    },

    /// Переход на новую улицу.
    StreetChanged { street: Street },

    /// Шоудаун — открытие карт.
    ShowdownReveal {
        seat: SeatIndex,
        player_id: PlayerId,
        hole_cards: Vec<Card>,
        rank_value: u32,
    },

    /// Выплата одного пота (main или side) его победителям.
    PotAwarded {
        level: u32,
        winners: Vec<(SeatIndex, PlayerId, Chips)>,
    },

    /// Игрок вылетел по итогам раздачи (стек 0).
    PlayerEliminated { seat: SeatIndex, player_id: PlayerId },

    /// Раздача завершена.
    HandFinished { hand_id: HandId, table_id: TableId },
}

/// Событие в раздаче с порядковым номером.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct HandEvent {
    pub index: u32,
    pub kind: HandEventKind,
}

/// Полная история раздачи.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct HandHistory {
    pub events: Vec<HandEvent>,
}

impl HandHistory {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn push(&mut self, kind: HandEventKind) {
        let idx = self.events.len() as u32;
        self.events.push(HandEvent { index: idx, kind });
    }
}

impl Default for HandHistory {
    fn default() -> Self {
        Self::new()
    }
}
