use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::blinds::{BlindLevel, BlindStructure};
use crate::domain::chips::Chips;
use crate::domain::{PlayerId, TournamentId};

/// Конфигурация одностолового турнира (sit&go).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TournamentConfig {
    pub name: String,
    pub description: Option<String>,

    /// Размер стартового стека.
    pub starting_stack: Chips,

    /// Максимальное количество игроков (2–9, один стол).
    pub max_players: u32,

    /// Минимальное количество игроков для старта.
    pub min_players_to_start: u32,

    /// Структура блайндов/анте и их длительности.
    pub blind_structure: BlindStructure,

    /// Проценты призовых по местам (1-е, 2-е, ...), сумма = 100.
    pub payout_percents: Vec<u8>,
}

impl TournamentConfig {
    /// Жёсткая валидация конфига турнира.
    pub fn validate_full(&self) -> Result<(), TournamentError> {
        if self.name.trim().is_empty() {
            return Err(TournamentError::InvalidConfig(
                "TournamentConfig: name is empty".into(),
            ));
        }

        if self.starting_stack.0 == 0 {
            return Err(TournamentError::InvalidConfig(
                "TournamentConfig: starting_stack = 0".into(),
            ));
        }

        if self.max_players < 2 || self.max_players > 9 {
            return Err(TournamentError::InvalidConfig(
                "TournamentConfig: max_players must be in [2, 9]".into(),
            ));
        }

        if self.min_players_to_start < 2 {
            return Err(TournamentError::InvalidConfig(
                "TournamentConfig: min_players_to_start < 2".into(),
            ));
        }

        if self.min_players_to_start > self.max_players {
            return Err(TournamentError::InvalidConfig(
                "TournamentConfig: min_players_to_start > max_players".into(),
            ));
        }

        self.blind_structure
            .validate()
            .map_err(TournamentError::InvalidConfig)?;

        if self.payout_percents.is_empty() {
            return Err(TournamentError::InvalidConfig(
                "TournamentConfig: payout_percents is empty".into(),
            ));
        }

        let sum: u32 = self.payout_percents.iter().map(|p| *p as u32).sum();
        if sum != 100 {
            return Err(TournamentError::InvalidConfig(format!(
                "TournamentConfig: payout_percents sum = {sum}, expected 100"
            )));
        }

        if self.payout_percents.len() as u32 > self.max_players {
            return Err(TournamentError::InvalidConfig(
                "TournamentConfig: more payout places than players".into(),
            ));
        }

        Ok(())
    }
}

/// Статус турнира.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum TournamentStatus {
    Registering,
    Running,
    Finished,
}

/// Игрок в турнире (регистрация).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerRegistration {
    pub player_id: PlayerId,
    /// Вылетел ли игрок.
    pub is_busted: bool,
    /// Итоговое место в турнире (1 = победитель, N = первый вылет).
    pub finishing_place: Option<u32>,
}

/// Событие, которое произошло при тиковом обновлении по времени.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum TournamentTimeEvent {
    None,
    LevelAdvanced {
        from: u32,
        to: u32,
        new_blinds: BlindLevel,
    },
}

/// Основной объект турнира.
///
/// Слой потребляет от движка только итоги раздач (кто сколько выиграл,
/// кто вылетел); движок о турнире ничего не знает.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub config: TournamentConfig,
    pub status: TournamentStatus,
    pub registrations: HashMap<PlayerId, PlayerRegistration>,
    pub current_level: u32,

    /// Фактическое время старта турнира (Unix timestamp, секунды).
    pub started_at_ts: Option<u64>,

    /// Время начала текущего уровня.
    pub level_started_at_ts: Option<u64>,

    /// Общее количество участников на момент старта.
    ///
    /// Нужно для детерминированного проставления мест:
    /// первый вылетевший → место = total_entries, победитель → место = 1.
    pub total_entries: u32,

    /// Сколько игроков уже вылетело (для подсчёта мест).
    pub finished_count: u32,

    /// Победитель турнира (если уже известен).
    pub winner_id: Option<PlayerId>,
}

impl Tournament {
    pub fn new(id: TournamentId, config: TournamentConfig) -> Result<Self, TournamentError> {
        config.validate_full()?;

        Ok(Self {
            id,
            config,
            status: TournamentStatus::Registering,
            registrations: HashMap::new(),
            current_level: 1,
            started_at_ts: None,
            level_started_at_ts: None,
            total_entries: 0,
            finished_count: 0,
            winner_id: None,
        })
    }

    pub fn current_blind_level(&self) -> &BlindLevel {
        self.config
            .blind_structure
            .level_by_number(self.current_level)
            .expect("Tournament.current_level must be valid")
    }

    /// Можно ли стартовать турнир: набран минимум игроков.
    pub fn can_start_now(&self) -> bool {
        self.status == TournamentStatus::Registering
            && self.active_player_count() as u32 >= self.config.min_players_to_start
    }

    /// Помечает турнир как запущенный.
    pub fn start(&mut self, now_ts: u64) -> Result<(), TournamentError> {
        if !self.can_start_now() {
            return Err(TournamentError::InvalidStatusForStart {
                status: self.status,
            });
        }

        self.status = TournamentStatus::Running;
        self.started_at_ts = Some(now_ts);
        self.level_started_at_ts = Some(now_ts);
        self.current_level = 1;

        // Фиксируем количество участников на момент старта,
        // чтобы потом корректно выдавать места.
        self.total_entries = self.active_player_count() as u32;
        self.finished_count = 0;
        self.winner_id = None;

        Ok(())
    }

    /// Регистрируем игрока (пока турнир в статусе Registering).
    pub fn register_player(&mut self, player_id: PlayerId) -> Result<(), TournamentError> {
        if self.status != TournamentStatus::Registering {
            return Err(TournamentError::InvalidStatus {
                expected: TournamentStatus::Registering,
                found: self.status,
            });
        }

        if self.registrations.len() as u32 >= self.config.max_players {
            return Err(TournamentError::TournamentFull {
                tournament_id: self.id,
            });
        }

        if self.registrations.contains_key(&player_id) {
            return Err(TournamentError::AlreadyRegistered {
                player_id,
                tournament_id: self.id,
            });
        }

        let reg = PlayerRegistration {
            player_id,
            is_busted: false,
            finishing_place: None,
        };

        self.registrations.insert(player_id, reg);
        Ok(())
    }

    /// Активные (не вылетевшие) игроки.
    pub fn active_players(&self) -> impl Iterator<Item = &PlayerRegistration> {
        self.registrations.values().filter(|r| !r.is_busted)
    }

    pub fn active_player_count(&self) -> usize {
        self.active_players().count()
    }

    pub fn is_finished(&self) -> bool {
        self.status == TournamentStatus::Finished
    }

    /// Пометить игрока как выбывшего (BUST).
    ///
    /// Вызывается, когда по итогам раздачи стек игрока стал 0.
    /// Метод сам назначит место; если после вылета останется один
    /// активный игрок — турнир автоматически завершится.
    ///
    /// Возвращает место, которое получил игрок.
    pub fn mark_player_busted(&mut self, player_id: PlayerId) -> Result<u32, TournamentError> {
        if self.status != TournamentStatus::Running {
            return Err(TournamentError::InvalidStatus {
                expected: TournamentStatus::Running,
                found: self.status,
            });
        }

        // Нельзя выбивать последнего игрока — защита от некорректных вызовов.
        if self.active_player_count() <= 1 {
            return Err(TournamentError::CannotBustLastPlayer {
                tournament_id: self.id,
            });
        }

        let total_entries = self.total_entries;
        let finished_count = self.finished_count;

        let reg = self
            .registrations
            .get_mut(&player_id)
            .ok_or(TournamentError::NotRegistered {
                player_id,
                tournament_id: self.id,
            })?;

        if reg.is_busted {
            return Err(TournamentError::AlreadyBusted {
                player_id,
                tournament_id: self.id,
            });
        }

        // finishing_place = общее число участников - сколько уже вылетело.
        let finishing_place = total_entries.saturating_sub(finished_count);

        reg.is_busted = true;
        reg.finishing_place = Some(finishing_place);

        self.finished_count = self.finished_count.saturating_add(1);

        self.check_and_finish_if_needed();

        Ok(finishing_place)
    }

    /// Тиковое обновление по времени: поднимает уровень блайндов,
    /// если по расписанию положено. Перерывы этот слой не ведёт.
    pub fn apply_time_tick(&mut self, now_ts: u64) -> TournamentTimeEvent {
        if self.status != TournamentStatus::Running {
            return TournamentTimeEvent::None;
        }

        let started_at = match self.started_at_ts {
            Some(ts) => ts,
            None => return TournamentTimeEvent::None,
        };

        let total_elapsed_minutes = (now_ts.saturating_sub(started_at) / 60) as u32;
        let target_level = self
            .config
            .blind_structure
            .level_for_elapsed_minutes(total_elapsed_minutes)
            .level;

        if target_level > self.current_level {
            let from = self.current_level;
            self.current_level = target_level;
            self.level_started_at_ts = Some(now_ts);
            let new_blinds = self.current_blind_level().clone();
            TournamentTimeEvent::LevelAdvanced {
                from,
                to: target_level,
                new_blinds,
            }
        } else {
            TournamentTimeEvent::None
        }
    }

    /// Если остался один активный игрок — завершить турнир.
    fn check_and_finish_if_needed(&mut self) {
        if self.status == TournamentStatus::Finished {
            return;
        }

        let mut active_ids: Vec<PlayerId> = self.active_players().map(|r| r.player_id).collect();

        match active_ids.len() {
            0 => {
                self.status = TournamentStatus::Finished;
                self.winner_id = None;
            }
            1 => {
                active_ids.sort_unstable();
                let winner = active_ids[0];

                self.status = TournamentStatus::Finished;
                self.winner_id = Some(winner);

                if let Some(reg) = self.registrations.get_mut(&winner) {
                    if reg.finishing_place.is_none() {
                        reg.finishing_place = Some(1);
                    }
                }
            }
            _ => {}
        }
    }
}

/// Ошибки турнирного слоя.
#[derive(Debug, Error, Clone)]
pub enum TournamentError {
    #[error("Tournament is full: id={tournament_id}")]
    TournamentFull { tournament_id: TournamentId },

    #[error("Player {player_id} is already registered in tournament {tournament_id}")]
    AlreadyRegistered {
        player_id: PlayerId,
        tournament_id: TournamentId,
    },

    #[error("Player {player_id} is not registered in tournament {tournament_id}")]
    NotRegistered {
        player_id: PlayerId,
        tournament_id: TournamentId,
    },

    #[error("Player {player_id} is already busted in tournament {tournament_id}")]
    AlreadyBusted {
        player_id: PlayerId,
        tournament_id: TournamentId,
    },

    #[error("Cannot bust last remaining player in tournament {tournament_id}")]
    CannotBustLastPlayer { tournament_id: TournamentId },

    #[error("Invalid tournament status, expected {expected:?}, found {found:?}")]
    InvalidStatus {
        expected: TournamentStatus,
        found: TournamentStatus,
    },

    #[error("Invalid tournament status for start: {status:?}")]
    InvalidStatusForStart { status: TournamentStatus },

    #[error("Invalid tournament config: {0}")]
    InvalidConfig(String),
}
