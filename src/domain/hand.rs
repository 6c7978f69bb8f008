use serde::{Deserialize, Serialize};

use crate::domain::card::Card;
use crate::domain::chips::Chips;
use crate::domain::{HandId, PlayerId, TableId};

/// Улица раздачи.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum Street {
    Preflop,
    Flop,
    Turn,
    River,
    Showdown,
}

impl Street {
    /// Индекс улицы ставок (0..3) для тегирования вкладов в ledger.
    /// На Showdown ставок уже не бывает.
    pub fn betting_index(self) -> Option<usize> {
        match self {
            Street::Preflop => Some(0),
            Street::Flop => Some(1),
            Street::Turn => Some(2),
            Street::River => Some(3),
            Street::Showdown => None,
        }
    }
}

/// Ранг руки — упакованный u32, см. eval::hand_rank.
/// Сравнение как целых чисел даёт строгий total order.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HandRank(pub u32);

/// Результат конкретного игрока в раздаче.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerHandResult {
    pub player_id: PlayerId,
    /// Итоговый ранг руки (если дошёл до шоудауна).
    pub rank: Option<HandRank>,
    /// Сколько фишек игрок забрал из банков этой раздачи.
    pub won: Chips,
    /// Является ли игрок победителем хотя бы одного пота (включая сплит).
    pub is_winner: bool,
}

/// Краткое описание завершённой раздачи. Это же потребляет турнирный слой.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct HandSummary {
    pub hand_id: HandId,
    pub table_id: TableId,
    pub street_reached: Street,
    pub board: Vec<Card>,
    pub total_pot: Chips,
    pub results: Vec<PlayerHandResult>,
    /// Кто вылетел по итогам раздачи (стек стал 0).
    pub eliminated: Vec<PlayerId>,
}
