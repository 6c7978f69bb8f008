use serde::{Deserialize, Serialize};

use crate::domain::blinds::AnteType;
use crate::domain::card::Card;
use crate::domain::chips::Chips;
use crate::domain::hand::Street;
use crate::domain::player::PlayerAtTable;
use crate::domain::{HandId, TableId};

/// Индекс места за столом (0..max_seats-1).
pub type SeatIndex = u8;

/// Тип стола.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum TableType {
    Cash,
    Tournament,
}

/// Состояние стола как целого (не раздачи).
/// Pause приостанавливает только отсчёт таймера хода; уже принятая
/// в обработку операция всегда доводится до конца.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum TableStatus {
    /// Стол собран, раздачи ещё не начинались.
    Lobby,
    /// Идёт обычная игра.
    Playing,
    /// Стол на паузе.
    Paused,
}

/// Конфиг стола: сколько мест, какие ставки.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TableConfig {
    /// Максимальное количество мест за столом (обычно 2–9).
    pub max_seats: u8,
    pub table_type: TableType,
    /// Размеры блайндов/анте для кеш-стола или текущего уровня турнира.
    pub stakes: TableStakes,
}

/// Стейки стола (SB/BB/ante).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TableStakes {
    pub small_blind: Chips,
    pub big_blind: Chips,
    pub ante_type: AnteType,
    pub ante: Chips,
}

impl TableStakes {
    pub fn new(sb: Chips, bb: Chips, ante_type: AnteType, ante: Chips) -> Self {
        Self {
            small_blind: sb,
            big_blind: bb,
            ante_type,
            ante,
        }
    }
}

/// Основное состояние стола.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Table {
    pub id: TableId,
    pub name: String,
    pub config: TableConfig,

    /// Места за столом: индекс вектора = SeatIndex.
    /// None — место пустое.
    pub seats: Vec<Option<PlayerAtTable>>,

    /// Общие карты борда (0–5 карт).
    pub board: Vec<Card>,

    /// Индекс дилерской кнопки или None, если раздача ещё не начиналась.
    pub dealer_button: Option<SeatIndex>,

    /// ID текущей раздачи (если она идёт).
    pub current_hand_id: Option<HandId>,

    /// Текущая улица раздачи.
    pub street: Street,

    pub status: TableStatus,

    /// Идёт ли сейчас раздача (true), либо стол ждёт начала новой.
    pub hand_in_progress: bool,
}

impl Table {
    /// Создать пустой стол с заданной конфигурацией.
    pub fn new(id: TableId, name: String, config: TableConfig) -> Self {
        let seats = vec![None; config.max_seats as usize];
        Self {
            id,
            name,
            config,
            seats,
            board: Vec::new(),
            dealer_button: None,
            current_hand_id: None,
            street: Street::Preflop,
            status: TableStatus::Lobby,
            hand_in_progress: false,
        }
    }

    pub fn max_seats(&self) -> u8 {
        self.config.max_seats
    }

    pub fn seated_count(&self) -> usize {
        self.seats.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_seat_empty(&self, index: SeatIndex) -> bool {
        self.seats
            .get(index as usize)
            .map(|s| s.is_none())
            .unwrap_or(true)
    }

    /// Сумма всех стеков за столом (для проверок сохранения фишек).
    pub fn total_stacks(&self) -> Chips {
        self.seats
            .iter()
            .filter_map(|s| s.as_ref())
            .map(|p| p.stack)
            .sum()
    }
}
