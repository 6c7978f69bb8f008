use serde::{Deserialize, Serialize};

use crate::domain::card::Card;
use crate::domain::chips::Chips;
use crate::domain::PlayerId;

/// Статус игрока именно в контексте стола/раздачи.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum PlayerStatus {
    /// Игрок активен в текущей раздаче.
    Active,
    /// Игрок сфолдил и больше не претендует на банк.
    Folded,
    /// Игрок в олл-ине — не может больше делать ставки.
    AllIn,
    /// Игрок сидит за столом, но не участвует в раздаче (sit out).
    SittingOut,
    /// Игрок вылетел (нулевой стек).
    Busted,
}

/// Состояние игрока за конкретным столом.
///
/// Ядро не владеет жизненным циклом игрока: это запись player provider'а,
/// которую движок читает и мутирует через свои операции. Все перекрёстные
/// ссылки на игрока — только через PlayerId / SeatIndex.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerAtTable {
    pub player_id: PlayerId,
    /// Текущий стек за столом.
    pub stack: Chips,
    /// Ставка в текущем раунде (для удобства движка).
    pub current_bet: Chips,
    pub status: PlayerStatus,
    /// Карманные карты (0 или 2 для холдема).
    pub hole_cards: Vec<Card>,
}

impl PlayerAtTable {
    pub fn new(player_id: PlayerId, stack: Chips) -> Self {
        Self {
            player_id,
            stack,
            current_bet: Chips::ZERO,
            status: PlayerStatus::Active,
            hole_cards: Vec::new(),
        }
    }

    pub fn is_in_hand(&self) -> bool {
        matches!(self.status, PlayerStatus::Active | PlayerStatus::AllIn)
    }

    /// Может ли игрок ещё делать действия в этом раунде.
    pub fn can_act(&self) -> bool {
        matches!(self.status, PlayerStatus::Active)
    }
}
