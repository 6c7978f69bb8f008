//! Контроль времени хода (shot clock + time bank).
//!
//! Здесь собраны:
//! - правила (`TimeRules`);
//! - банк времени игроков (`TimeBank`);
//! - таймер текущего хода (`TurnClock`);
//! - фасад `TimeController` для менеджера столов.
//!
//! Сам wall-clock снаружи: внешний коллаборатор подаёт прошедшие секунды
//! через `on_time_passed`, а полный таймаут превращается в принудительный
//! Fold, который идёт через обычный путь обработки действий.

pub mod clock;
pub mod time_bank;
pub mod time_rules;

pub use clock::{TimeoutState, TurnClock};
pub use time_bank::{PlayerTimeBank, TimeBank};
pub use time_rules::{TimeProfile, TimeRules};

use crate::domain::PlayerId;

/// Какое авто-действие нужно сделать при полном истечении времени.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AutoActionDecision {
    /// Время не вышло — действий со стороны движка не требуется.
    None,
    /// Базовое время и таймбанк исчерпаны — принудительный Fold.
    TimeoutFold,
}

/// Высокоуровневый контроллер времени для стола.
#[derive(Clone, Debug)]
pub struct TimeController {
    pub rules: TimeRules,
    pub bank: TimeBank,
    pub clock: TurnClock,
    /// Пауза стола: тики времени игнорируются, состояние хода не трогаем.
    paused: bool,
}

impl TimeController {
    /// Создать контроллер с заданными правилами (например, `TimeRules::standard()`).
    pub fn new(rules: TimeRules) -> Self {
        Self {
            rules,
            bank: TimeBank::new(),
            clock: TurnClock::new(),
            paused: false,
        }
    }

    /// Инициализировать банк для набора игроков (при старте стола/турнира).
    pub fn init_players<I>(&mut self, players: I)
    where
        I: IntoIterator<Item = PlayerId>,
    {
        self.bank.init_for_players(&self.rules, players);
    }

    /// Начать отсчёт хода конкретного игрока.
    pub fn start_turn(&mut self, player_id: PlayerId) {
        self.clock.start_turn(player_id, &self.rules);
    }

    /// Игрок успел сделать действие — таймер текущего хода очищается.
    pub fn on_manual_action(&mut self, player_id: PlayerId) {
        if self.clock.current_player == Some(player_id) {
            self.clock.clear();
        }
    }

    /// Принудительно снять таймер (раздача закончилась, актёра нет).
    pub fn clear_turn(&mut self) {
        self.clock.clear();
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// «Протекание» времени для текущего актёра.
    ///
    /// `delta_secs` — сколько секунд прошло с последнего обновления.
    /// Возвращает, нужно ли триггерить принудительный Fold.
    pub fn on_time_passed(&mut self, delta_secs: i32) -> AutoActionDecision {
        if self.paused {
            return AutoActionDecision::None;
        }
        match self
            .clock
            .elapse_for_current(delta_secs, &self.rules, &mut self.bank)
        {
            TimeoutState::Ongoing
            | TimeoutState::NoActivePlayer
            | TimeoutState::UsedExtraTime { .. } => AutoActionDecision::None,
            TimeoutState::TimedOut => AutoActionDecision::TimeoutFold,
        }
    }
}
