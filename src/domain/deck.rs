use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::card::{Card, Rank, Suit};

/// Ошибки колоды: запросили больше карт, чем осталось.
/// Движок НИКОГДА не перетасовывает колоду посреди раздачи — это
/// раскрыло бы информацию об уже розданных картах.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum DeckError {
    #[error("В колоде осталось {remaining} карт, запрошено {requested}")]
    InsufficientCards { requested: usize, remaining: usize },
}

/// Колода карт. Три коллекции в любой момент времени образуют
/// разбиение всех 52 карт без пересечений:
///   - `undealt` — ещё в колоде (верх колоды — конец вектора);
///   - `dealt` — уже на руках или на борде;
///   - `burned` — сожжены, не видны никому.
///
/// Перемешивание делает engine (через RNG из infra), НЕ здесь.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Deck {
    pub undealt: Vec<Card>,
    pub dealt: Vec<Card>,
    pub burned: Vec<Card>,
}

impl Deck {
    /// Стандартная 52-карточная колода в порядке:
    /// Clubs 2..A, Diamonds 2..A, Hearts 2..A, Spades 2..A.
    pub fn standard_52() -> Self {
        let mut undealt = Vec::with_capacity(52);
        for suit in Suit::ALL {
            for rank in Rank::ALL {
                undealt.push(Card::new(rank, suit));
            }
        }
        Deck {
            undealt,
            dealt: Vec::new(),
            burned: Vec::new(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.undealt.len()
    }

    pub fn is_empty(&self) -> bool {
        self.undealt.is_empty()
    }

    /// Сдать одну карту сверху колоды.
    pub fn deal_one(&mut self) -> Result<Card, DeckError> {
        let card = self.undealt.pop().ok_or(DeckError::InsufficientCards {
            requested: 1,
            remaining: 0,
        })?;
        self.dealt.push(card);
        Ok(card)
    }

    /// Сдать n карт сверху. Либо все n, либо ошибка — частичной сдачи нет.
    pub fn deal_n(&mut self, n: usize) -> Result<Vec<Card>, DeckError> {
        if self.undealt.len() < n {
            return Err(DeckError::InsufficientCards {
                requested: n,
                remaining: self.undealt.len(),
            });
        }
        let mut taken = Vec::with_capacity(n);
        for _ in 0..n {
            taken.push(self.deal_one()?);
        }
        Ok(taken)
    }

    /// Сжечь одну карту: уходит в burned и не видна никому.
    pub fn burn_one(&mut self) -> Result<(), DeckError> {
        let card = self.undealt.pop().ok_or(DeckError::InsufficientCards {
            requested: 1,
            remaining: 0,
        })?;
        self.burned.push(card);
        Ok(())
    }

    /// Собрать все три коллекции обратно в одну перед новой раздачей.
    /// Вызывается ТОЛЬКО между раздачами; перетасовку делает engine.
    pub fn restore_for_new_hand(&mut self) {
        self.undealt.append(&mut self.dealt);
        self.undealt.append(&mut self.burned);
    }

    /// Проверка инварианта разбиения: 52 уникальные карты суммарно.
    pub fn is_partition_intact(&self) -> bool {
        let total = self.undealt.len() + self.dealt.len() + self.burned.len();
        if total != 52 {
            return false;
        }
        let mut seen = [false; 52];
        for card in self
            .undealt
            .iter()
            .chain(self.dealt.iter())
            .chain(self.burned.iter())
        {
            let suit_idx = match card.suit {
                Suit::Clubs => 0,
                Suit::Diamonds => 1,
                Suit::Hearts => 2,
                Suit::Spades => 3,
            };
            let idx = suit_idx * 13 + (card.rank.value() as usize - 2);
            if seen[idx] {
                return false;
            }
            seen[idx] = true;
        }
        true
    }
}
