use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::domain::chips::Chips;
use crate::domain::hand::{HandRank, Street};
use crate::domain::SeatIndex;
use crate::engine::errors::IntegrityError;

/// Вклад одного игрока в один пот, с разбивкой по улицам (для аудита).
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PotShare {
    pub total: Chips,
    /// preflop / flop / turn / river.
    pub by_street: [Chips; 4],
}

impl PotShare {
    fn add(&mut self, amount: Chips, street_idx: usize) {
        self.total += amount;
        self.by_street[street_idx] += amount;
    }

    /// Снять `excess` фишек, забирая с поздних улиц к ранним.
    /// Возвращает снятую часть как отдельный PotShare.
    fn split_off_excess(&mut self, excess: Chips) -> PotShare {
        let mut moved = PotShare::default();
        let mut left = excess;
        for idx in (0..4).rev() {
            if left.is_zero() {
                break;
            }
            let take = self.by_street[idx].min(left);
            if take.is_zero() {
                continue;
            }
            self.by_street[idx] -= take;
            moved.by_street[idx] += take;
            left -= take;
        }
        self.total -= excess - left;
        moved.total = excess - left;
        moved
    }
}

/// Выплата по одному поту.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PotPayout {
    pub level: u32,
    pub amount: Chips,
    /// Победители пота с точными долями (включая «лишние» фишки сплита).
    pub winners: Vec<(SeatIndex, Chips)>,
}

/// Один пот: main (level 0) либо side (level > 0).
///
/// `cap` — максимальный вклад ОДНОГО игрока в этот пот («полоса» между
/// границами олл-инов). None — верхний открытый пот без ограничения;
/// такой пот в ledger ровно один, последний.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Pot {
    pub level: u32,
    pub cap: Option<Chips>,
    pub contributions: HashMap<SeatIndex, PotShare>,
    /// Кто претендует на этот пот. Фолд убирает отсюда, фишки остаются.
    pub eligible: BTreeSet<SeatIndex>,
    pub distributed: bool,
    /// Итог распределения (если уже состоялось).
    pub payout: Option<PotPayout>,
}

impl Pot {
    fn open(level: u32) -> Self {
        Self {
            level,
            cap: None,
            contributions: HashMap::new(),
            eligible: BTreeSet::new(),
            distributed: false,
            payout: None,
        }
    }

    /// Сумма пота — всегда ровно сумма вкладов (инвариант структурный).
    pub fn amount(&self) -> Chips {
        self.contributions.values().map(|s| s.total).sum()
    }

    pub fn share_of(&self, seat: SeatIndex) -> Chips {
        self.contributions
            .get(&seat)
            .map(|s| s.total)
            .unwrap_or(Chips::ZERO)
    }

    pub fn is_main(&self) -> bool {
        self.level == 0
    }
}

/// Ledger банков раздачи: main pot + упорядоченные side pots.
///
/// Поля приватные: инварианты (ровно один открытый пот, монотонная
/// eligibility, posted = поты + paid) охраняются операциями.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PotLedger {
    pots: Vec<Pot>,
    total_posted: Chips,
    total_paid: Chips,
}

impl Default for PotLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl PotLedger {
    pub fn new() -> Self {
        Self {
            pots: vec![Pot::open(0)],
            total_posted: Chips::ZERO,
            total_paid: Chips::ZERO,
        }
    }

    pub fn pots(&self) -> &[Pot] {
        &self.pots
    }

    pub fn main_pot(&self) -> &Pot {
        &self.pots[0]
    }

    /// Нераспределённый остаток банка.
    pub fn total(&self) -> Chips {
        self.total_posted - self.total_paid
    }

    pub fn total_posted(&self) -> Chips {
        self.total_posted
    }

    pub fn total_paid(&self) -> Chips {
        self.total_paid
    }

    /// Суммарный вклад игрока во все поты.
    pub fn seat_total(&self, seat: SeatIndex) -> Chips {
        self.pots.iter().map(|p| p.share_of(seat)).sum()
    }

    /// Провести вклад игрока по потам.
    ///
    /// Порядок детерминированный: main pot, затем side pots по возрастанию
    /// уровня; каждый capped-пот добирается до своего cap, остаток целиком
    /// поглощает открытый пот. Возвращает разбивку (уровень, сумма) для
    /// аудита и истории раздачи.
    pub fn post_contribution(
        &mut self,
        seat: SeatIndex,
        amount: Chips,
        street: Street,
    ) -> Vec<(u32, Chips)> {
        let mut breakdown = Vec::new();
        if amount.is_zero() {
            return breakdown;
        }

        let street_idx = street.betting_index().unwrap_or(3);
        let mut remaining = amount;
        self.total_posted += amount;

        for pot in self.pots.iter_mut() {
            let take = match pot.cap {
                Some(cap) => cap.saturating_sub(pot.share_of(seat)).min(remaining),
                None => remaining,
            };
            if take.is_zero() {
                continue;
            }
            pot.contributions.entry(seat).or_default().add(take, street_idx);
            pot.eligible.insert(seat);
            breakdown.push((pot.level, take));
            remaining -= take;
            if remaining.is_zero() {
                break;
            }
        }

        debug_assert!(remaining.is_zero(), "открытый пот обязан поглотить остаток");
        breakdown
    }

    /// Фолд: игрок теряет право на все поты; его фишки остаются в банке.
    pub fn mark_folded(&mut self, seat: SeatIndex) {
        for pot in self.pots.iter_mut() {
            pot.eligible.remove(&seat);
        }
    }

    /// Олл-ин: потолок игрока = его суммарный вклад на данный момент.
    ///
    /// Находим пот, внутри которого лежит эта граница, и режем его на два:
    /// нижняя часть получает cap = граница, излишки уже внесённого другими
    /// переезжают в новый пот уровнем выше. Игрок теряет eligibility на всё,
    /// что выше границы, — он никогда не претендует на больше, чем внёс.
    pub fn resolve_all_in(&mut self, seat: SeatIndex) {
        let ceiling = self.seat_total(seat);
        let mut acc = Chips::ZERO;
        let mut action: Option<(usize, Chips)> = None;

        for (idx, pot) in self.pots.iter().enumerate() {
            match pot.cap {
                Some(cap) => {
                    if (acc + cap).0 <= ceiling.0 {
                        acc += cap;
                        continue;
                    }
                    action = Some((idx, ceiling - acc));
                    break;
                }
                None => {
                    action = Some((idx, ceiling - acc));
                    break;
                }
            }
        }

        let (idx, boundary) = match action {
            Some(a) => a,
            None => return,
        };

        if boundary.is_zero() {
            // Потолок совпал с границей потов — резать нечего,
            // просто снимаем претензии на всё, что выше.
            for pot in self.pots[idx..].iter_mut() {
                pot.eligible.remove(&seat);
            }
            return;
        }

        self.split_pot(idx, boundary);
        for pot in self.pots[idx + 1..].iter_mut() {
            pot.eligible.remove(&seat);
        }
    }

    /// Разрезать пот idx по границе per-player вклада `boundary`.
    fn split_pot(&mut self, idx: usize, boundary: Chips) {
        let upper_cap = self.pots[idx].cap.map(|c| c - boundary);
        let mut upper = Pot {
            level: 0, // перенумеруем ниже
            cap: upper_cap,
            contributions: HashMap::new(),
            eligible: BTreeSet::new(),
            distributed: false,
            payout: None,
        };

        {
            let lower = &mut self.pots[idx];
            lower.cap = Some(boundary);
            for (&s, share) in lower.contributions.iter_mut() {
                if share.total.0 > boundary.0 {
                    let moved = share.split_off_excess(share.total - boundary);
                    if lower.eligible.contains(&s) {
                        upper.eligible.insert(s);
                    }
                    upper.contributions.insert(s, moved);
                }
            }
        }

        self.pots.insert(idx + 1, upper);
        for (i, pot) in self.pots.iter_mut().enumerate() {
            pot.level = i as u32;
        }
    }

    /// Распределить все поты по рангам шоудауна.
    ///
    /// Для каждого пота (main первым, затем side по возрастанию уровня)
    /// претенденты = eligible ∩ ranks; платим лучшему рангу среди них.
    /// Сплит: floor(amount/N) каждому, остаток по одной фишке победителям
    /// в порядке возрастания seat (детерминированно). Пустые поты просто
    /// закрываются. Повторный вызов — no-op с прежним результатом.
    pub fn distribute_all(
        &mut self,
        ranks: &HashMap<SeatIndex, HandRank>,
    ) -> Result<Vec<PotPayout>, IntegrityError> {
        if self.pots.iter().all(|p| p.distributed) {
            log::warn!("[pot] повторное распределение — возвращаем прежний результат");
            return Ok(self.pots.iter().filter_map(|p| p.payout.clone()).collect());
        }

        let mut payouts = Vec::new();

        for i in 0..self.pots.len() {
            if self.pots[i].distributed {
                if let Some(p) = self.pots[i].payout.clone() {
                    payouts.push(p);
                }
                continue;
            }

            let amount = self.pots[i].amount();
            if amount.is_zero() {
                self.pots[i].distributed = true;
                continue;
            }

            // BTreeSet отдаёт seats по возрастанию — порядок сплита фиксирован.
            let candidates: Vec<SeatIndex> = self.pots[i]
                .eligible
                .iter()
                .copied()
                .filter(|s| ranks.contains_key(s))
                .collect();

            if candidates.is_empty() {
                return Err(IntegrityError::NoEligibleWinner {
                    level: self.pots[i].level,
                });
            }

            let best = candidates
                .iter()
                .map(|s| ranks[s])
                .max()
                .expect("candidates не пуст");
            let winners: Vec<SeatIndex> = candidates
                .iter()
                .copied()
                .filter(|s| ranks[s] == best)
                .collect();

            let n = winners.len() as u64;
            let share = amount.0 / n;
            let remainder = amount.0 % n;

            let winner_payouts: Vec<(SeatIndex, Chips)> = winners
                .iter()
                .enumerate()
                .map(|(k, &s)| {
                    let extra = if (k as u64) < remainder { 1 } else { 0 };
                    (s, Chips(share + extra))
                })
                .collect();

            debug_assert_eq!(
                winner_payouts.iter().map(|(_, c)| c.0).sum::<u64>(),
                amount.0,
                "сплит обязан сойтись фишка в фишку"
            );

            let payout = PotPayout {
                level: self.pots[i].level,
                amount,
                winners: winner_payouts,
            };

            self.total_paid += amount;
            self.pots[i].distributed = true;
            self.pots[i].payout = Some(payout.clone());
            payouts.push(payout);
        }

        Ok(payouts)
    }

    /// Отдать весь нераспределённый банк одному игроку
    /// (все остальные сфолдили; сюда же попадает возврат неуравненной ставки).
    pub fn sweep_to(&mut self, seat: SeatIndex) -> Chips {
        let mut total = Chips::ZERO;
        for pot in self.pots.iter_mut() {
            if pot.distributed {
                continue;
            }
            let amount = pot.amount();
            pot.distributed = true;
            if amount.is_zero() {
                continue;
            }
            pot.payout = Some(PotPayout {
                level: pot.level,
                amount,
                winners: vec![(seat, amount)],
            });
            total += amount;
        }
        self.total_paid += total;
        total
    }

    /// Явная проверка инвариантов ledger'а.
    pub fn check_integrity(&self) -> Result<(), IntegrityError> {
        let undistributed: u64 = self
            .pots
            .iter()
            .filter(|p| !p.distributed)
            .map(|p| p.amount().0)
            .sum();
        let expected = self.total_posted.0 - self.total_paid.0;
        if undistributed != expected {
            return Err(IntegrityError::PotTotalsMismatch {
                pots: undistributed,
                posted: self.total_posted.0,
                paid: self.total_paid.0,
            });
        }

        // Монотонность: претендент на старший пот обязан претендовать
        // и на все младшие.
        for i in 1..self.pots.len() {
            for &seat in &self.pots[i].eligible {
                if !self.pots[i - 1].eligible.contains(&seat) {
                    return Err(IntegrityError::EligibilityNotMonotonic {
                        seat,
                        level: self.pots[i].level,
                        lower: self.pots[i - 1].level,
                    });
                }
            }
        }

        Ok(())
    }
}
