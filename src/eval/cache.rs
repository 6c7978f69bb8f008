use std::collections::HashMap;

use crate::domain::card::{Card, Suit};
use crate::domain::hand::HandRank;

use super::evaluator::{evaluate_best_hand, EvalError};

/// Канонический ключ набора карт: коды карт (1..52, 6 бит) по возрастанию,
/// упакованные в u64. До 7 карт — 42 бита, влезает с запасом. Сдвиг на +1
/// гарантирует, что наборы разной длины не коллидируют.
pub type CardSetKey = u64;

fn card_code(card: &Card) -> u64 {
    let suit_idx = match card.suit {
        Suit::Clubs => 0u64,
        Suit::Diamonds => 1,
        Suit::Hearts => 2,
        Suit::Spades => 3,
    };
    suit_idx * 13 + (card.rank.value() as u64 - 2) + 1
}

/// Построить ключ из hole + board. Порядок карт на ключ не влияет.
pub fn canonical_key(hole: &[Card], board: &[Card]) -> CardSetKey {
    let mut codes: Vec<u64> = hole.iter().chain(board.iter()).map(card_code).collect();
    codes.sort_unstable();
    codes.into_iter().fold(0u64, |key, code| (key << 6) | code)
}

/// Мемо-кэш оценок в пределах одной раздачи.
///
/// Вставка строго insert-once на ключ; кэш живёт вместе с HandEngine
/// и не сериализуется (восстанавливается пустым — это просто мемо).
#[derive(Debug, Default)]
pub struct EvalCache {
    map: HashMap<CardSetKey, HandRank>,
}

impl EvalCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn clear(&mut self) {
        self.map.clear();
    }

    /// Оценить руку через кэш. Ошибки размера руки не кэшируются.
    pub fn evaluate(&mut self, hole: &[Card], board: &[Card]) -> Result<HandRank, EvalError> {
        let key = canonical_key(hole, board);
        if let Some(rank) = self.map.get(&key) {
            return Ok(*rank);
        }
        let rank = evaluate_best_hand(hole, board)?;
        self.map.insert(key, rank);
        Ok(rank)
    }
}
