use thiserror::Error;

use crate::domain::card::{Card, Rank, Suit};
use crate::domain::hand::HandRank;

use super::hand_rank::HandCategory;
use super::lookup_tables::{detect_straight, rank_to_bit, RankMask};

/// Ошибки оценки руки.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum EvalError {
    #[error("Неверное количество карт: hole={hole}, всего={total} (нужно 2 карманные, всего от 2 до 7)")]
    InvalidHandSize { hole: usize, total: usize },
}

/// Главная функция: вычислить лучшую 5-карточную руку из hole + board.
///
/// Требования:
///   - `hole.len() == 2`;
///   - суммарно от 2 до 7 карт (борд 0..5).
///
/// При менее чем 5 картах оценивается лучшая частичная комбинация
/// (пары/старшая карта; стрит и флеш из неполной руки не собрать).
pub fn evaluate_best_hand(hole: &[Card], board: &[Card]) -> Result<HandRank, EvalError> {
    let total = hole.len() + board.len();
    if hole.len() != 2 || total > 7 {
        return Err(EvalError::InvalidHandSize {
            hole: hole.len(),
            total,
        });
    }

    let mut all_cards = Vec::with_capacity(total);
    all_cards.extend_from_slice(hole);
    all_cards.extend_from_slice(board);

    Ok(best_of_all_5card_combinations(&all_cards))
}

/// Перебираем все комбинации 5 карт из N (N=5–7) и выбираем лучшую.
/// При N < 5 оцениваем все карты разом.
fn best_of_all_5card_combinations(cards: &[Card]) -> HandRank {
    let n = cards.len();
    if n <= 5 {
        return evaluate_hand_slice(cards);
    }

    let mut best: Option<HandRank> = None;

    for a in 0..(n - 4) {
        for b in (a + 1)..(n - 3) {
            for c in (b + 1)..(n - 2) {
                for d in (c + 1)..(n - 1) {
                    for e in (d + 1)..n {
                        let five = [cards[a], cards[b], cards[c], cards[d], cards[e]];
                        let r = evaluate_hand_slice(&five);
                        if best.map_or(true, |best_r| r > best_r) {
                            best = Some(r);
                        }
                    }
                }
            }
        }
    }

    best.expect("должна быть хотя бы одна 5-карточная комбинация")
}

/// Оценка комбинации из 2–5 карт.
fn evaluate_hand_slice(cards: &[Card]) -> HandRank {
    debug_assert!((2..=5).contains(&cards.len()));

    // Подсчёт мастей.
    let mut suit_counts = [0u8; 4]; // 0:clubs,1:diamonds,2:hearts,3:spades

    // Подсчёт рангов.
    let mut rank_counts = [0u8; 15]; // индексы 0..14, используем 2..14
    let mut rank_mask: RankMask = 0;

    for card in cards.iter() {
        let suit_idx = match card.suit {
            Suit::Clubs => 0,
            Suit::Diamonds => 1,
            Suit::Hearts => 2,
            Suit::Spades => 3,
        };
        suit_counts[suit_idx] += 1;

        rank_counts[card.rank.value() as usize] += 1;
        rank_mask |= rank_to_bit(card.rank);
    }

    // Флеш и стрит существуют только для полной пятёрки.
    let is_flush = suit_counts.iter().any(|&c| c == 5);
    let straight_high_rank = if cards.len() == 5 {
        detect_straight(rank_mask)
    } else {
        None
    };

    // Список (rank, count) для анализа пар/сетов/каре.
    #[derive(Clone, Copy)]
    struct RankCount {
        rank: Rank,
        count: u8,
    }

    let mut rc_list: Vec<RankCount> = Vec::with_capacity(5);
    for r_val in (2usize..=14usize).rev() {
        let c = rank_counts[r_val];
        if c > 0 {
            let rank = Rank::from_value(r_val as u8).unwrap_or(Rank::Two);
            rc_list.push(RankCount { rank, count: c });
        }
    }

    // Сортируем сначала по количеству (desc), затем по рангу (desc).
    rc_list.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| b.rank.cmp(&a.rank)));

    // Straight flush / royal flush.
    if is_flush {
        if let Some(high) = straight_high_rank {
            let ranks = straight_rank_array(high);
            let category = if high == Rank::Ace {
                HandCategory::RoyalFlush
            } else {
                HandCategory::StraightFlush
            };
            return HandRank::from_category_and_ranks(category, ranks);
        }
    }

    // Four of a kind.
    if rc_list[0].count == 4 {
        let four = rc_list[0].rank;
        let kicker = rc_list.get(1).map(|rc| rc.rank).unwrap_or(Rank::Two);
        // младшие ранги забиваем «мусором» — они не сравниваются
        let ranks = [four, kicker, Rank::Two, Rank::Two, Rank::Two];
        return HandRank::from_category_and_ranks(HandCategory::FourOfAKind, ranks);
    }

    // Full house: 3+2.
    if rc_list[0].count == 3 && rc_list.get(1).map(|rc| rc.count) == Some(2) {
        let trips = rc_list[0].rank;
        let pair = rc_list[1].rank;
        let ranks = [trips, pair, Rank::Two, Rank::Two, Rank::Two];
        return HandRank::from_category_and_ranks(HandCategory::FullHouse, ranks);
    }

    // Flush.
    if is_flush {
        let mut flush_cards: Vec<Card> = cards.to_vec();
        flush_cards.sort_by(|a, b| b.rank.cmp(&a.rank));
        let ranks = [
            flush_cards[0].rank,
            flush_cards[1].rank,
            flush_cards[2].rank,
            flush_cards[3].rank,
            flush_cards[4].rank,
        ];
        return HandRank::from_category_and_ranks(HandCategory::Flush, ranks);
    }

    // Straight.
    if let Some(high) = straight_high_rank {
        let ranks = straight_rank_array(high);
        return HandRank::from_category_and_ranks(HandCategory::Straight, ranks);
    }

    // Three of a kind.
    if rc_list[0].count == 3 {
        let trips = rc_list[0].rank;
        let kicker1 = rc_list.get(1).map(|rc| rc.rank).unwrap_or(Rank::Two);
        let kicker2 = rc_list.get(2).map(|rc| rc.rank).unwrap_or(Rank::Two);
        let ranks = [trips, kicker1, kicker2, Rank::Two, Rank::Two];
        return HandRank::from_category_and_ranks(HandCategory::ThreeOfAKind, ranks);
    }

    // Two pair.
    if rc_list[0].count == 2 && rc_list.get(1).map(|rc| rc.count) == Some(2) {
        let pair1 = rc_list[0].rank;
        let pair2 = rc_list[1].rank;
        let kicker = rc_list.get(2).map(|rc| rc.rank).unwrap_or(Rank::Two);
        let ranks = [pair1, pair2, kicker, Rank::Two, Rank::Two];
        return HandRank::from_category_and_ranks(HandCategory::TwoPair, ranks);
    }

    // One pair.
    if rc_list[0].count == 2 {
        let pair = rc_list[0].rank;
        let kicker1 = rc_list.get(1).map(|rc| rc.rank).unwrap_or(Rank::Two);
        let kicker2 = rc_list.get(2).map(|rc| rc.rank).unwrap_or(Rank::Two);
        let kicker3 = rc_list.get(3).map(|rc| rc.rank).unwrap_or(Rank::Two);
        let ranks = [pair, kicker1, kicker2, kicker3, Rank::Two];
        return HandRank::from_category_and_ranks(HandCategory::OnePair, ranks);
    }

    // High card: берём топ-5 рангов по убыванию, недостающее добиваем.
    let mut ranks_only: Vec<Rank> = rc_list.iter().map(|rc| rc.rank).collect();
    ranks_only.sort_by(|a, b| b.cmp(a));
    while ranks_only.len() < 5 {
        ranks_only.push(Rank::Two);
    }
    let ranks = [
        ranks_only[0],
        ranks_only[1],
        ranks_only[2],
        ranks_only[3],
        ranks_only[4],
    ];
    HandRank::from_category_and_ranks(HandCategory::HighCard, ranks)
}

/// Построить массив рангов [r0..r4] для стрита с заданной старшей картой.
fn straight_rank_array(high: Rank) -> [Rank; 5] {
    match high {
        // wheel: A2345, туз считается единицей и идёт последним
        Rank::Five => [Rank::Five, Rank::Four, Rank::Three, Rank::Two, Rank::Ace],
        Rank::Six => [Rank::Six, Rank::Five, Rank::Four, Rank::Three, Rank::Two],
        Rank::Seven => [Rank::Seven, Rank::Six, Rank::Five, Rank::Four, Rank::Three],
        Rank::Eight => [Rank::Eight, Rank::Seven, Rank::Six, Rank::Five, Rank::Four],
        Rank::Nine => [Rank::Nine, Rank::Eight, Rank::Seven, Rank::Six, Rank::Five],
        Rank::Ten => [Rank::Ten, Rank::Nine, Rank::Eight, Rank::Seven, Rank::Six],
        Rank::Jack => [Rank::Jack, Rank::Ten, Rank::Nine, Rank::Eight, Rank::Seven],
        Rank::Queen => [Rank::Queen, Rank::Jack, Rank::Ten, Rank::Nine, Rank::Eight],
        Rank::King => [Rank::King, Rank::Queen, Rank::Jack, Rank::Ten, Rank::Nine],
        Rank::Ace => [Rank::Ace, Rank::King, Rank::Queen, Rank::Jack, Rank::Ten],
        _ => [high, Rank::Four, Rank::Three, Rank::Two, Rank::Two],
    }
}
