use serde::{Deserialize, Serialize};

use crate::domain::chips::Chips;
use crate::domain::tournament::{Tournament, TournamentError};
use crate::domain::PlayerId;

/// Таблица процентов призовых по местам (1-е, 2-е, ...). Сумма = 100.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PayoutTable {
    pub percents: Vec<u8>,
}

impl PayoutTable {
    pub fn new(percents: Vec<u8>) -> Result<Self, TournamentError> {
        if percents.is_empty() {
            return Err(TournamentError::InvalidConfig(
                "PayoutTable: empty percents".into(),
            ));
        }
        let sum: u32 = percents.iter().map(|p| *p as u32).sum();
        if sum != 100 {
            return Err(TournamentError::InvalidConfig(format!(
                "PayoutTable: percents sum = {sum}, expected 100"
            )));
        }
        Ok(Self { percents })
    }

    /// Разложить призовой фонд по местам в целых фишках.
    ///
    /// Каждое место получает floor(pool * pct / 100); весь остаток от
    /// округления уходит первому месту — сумма выплат всегда равна фонду
    /// фишка в фишку.
    pub fn compute(&self, prize_pool: Chips) -> Vec<Chips> {
        let mut amounts: Vec<Chips> = self
            .percents
            .iter()
            .map(|&pct| Chips(prize_pool.0 * pct as u64 / 100))
            .collect();

        let paid: u64 = amounts.iter().map(|c| c.0).sum();
        let remainder = prize_pool.0 - paid;
        if let Some(first) = amounts.first_mut() {
            first.0 += remainder;
        }

        amounts
    }
}

/// Выплата одному игроку по итогам турнира.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerPayout {
    pub player_id: PlayerId,
    pub place: u32,
    pub amount: Chips,
}

/// Распределить призовой фонд завершённого турнира по местам.
///
/// Если призовых мест больше, чем было участников, невостребованные
/// доли достаются победителю (фонд всё равно сходится точно).
pub fn distribute_prizes(
    tournament: &Tournament,
    prize_pool: Chips,
) -> Result<Vec<PlayerPayout>, TournamentError> {
    if !tournament.is_finished() {
        return Err(TournamentError::InvalidStatus {
            expected: crate::domain::tournament::TournamentStatus::Finished,
            found: tournament.status,
        });
    }

    let table = PayoutTable::new(tournament.config.payout_percents.clone())?;
    let amounts = table.compute(prize_pool);

    let mut payouts: Vec<PlayerPayout> = Vec::new();
    let mut unclaimed = Chips::ZERO;

    for (idx, &amount) in amounts.iter().enumerate() {
        let place = idx as u32 + 1;
        let player = tournament
            .registrations
            .values()
            .find(|reg| reg.finishing_place == Some(place));

        match player {
            Some(reg) => payouts.push(PlayerPayout {
                player_id: reg.player_id,
                place,
                amount,
            }),
            None => unclaimed += amount,
        }
    }

    if !unclaimed.is_zero() {
        if let Some(first) = payouts.iter_mut().find(|p| p.place == 1) {
            first.amount += unclaimed;
        }
    }

    payouts.sort_by_key(|p| p.place);
    Ok(payouts)
}
