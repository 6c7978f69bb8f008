use thiserror::Error;

use crate::domain::deck::DeckError;
use crate::domain::{PlayerId, SeatIndex, TableId};
use crate::eval::EvalError;

/// Ошибки движка покера (валидация: вина вызывающего, состояние не меняется).
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Стол {0} не найден")]
    TableNotFound(TableId),

    #[error("Место {0} не существует за столом")]
    InvalidSeat(SeatIndex),

    #[error("В этом месте нет игрока")]
    EmptySeat,

    #[error("Игрок {0} не найден за столом")]
    PlayerNotAtTable(PlayerId),

    #[error("Недостаточно активных игроков для раздачи")]
    NotEnoughPlayers,

    #[error("Раздача уже идёт")]
    HandAlreadyInProgress,

    #[error("Раздача не активна")]
    NoActiveHand,

    #[error("Сейчас не ход игрока с id={0}")]
    NotPlayersTurn(PlayerId),

    #[error("Недопустимое действие в текущем состоянии раздачи")]
    IllegalAction,

    #[error("Недостаточно фишек для этой ставки")]
    NotEnoughChips,

    #[error("Ставка меньше минимальной ({min})")]
    BetTooSmall { min: u64 },

    #[error("Размер рейза слишком мал")]
    RaiseTooSmall,

    #[error("Невозможно выполнить check — нужно хотя бы уравнять ставку")]
    CannotCheck,

    #[error("Невозможно выполнить call — нет ставки для уравнивания")]
    CannotCall,

    #[error(transparent)]
    Deck(#[from] DeckError),

    #[error(transparent)]
    Eval(#[from] EvalError),

    #[error(transparent)]
    Integrity(#[from] IntegrityError),

    #[error("Внутренняя ошибка: {0}")]
    Internal(&'static str),
}

/// Ошибки целостности: «такого не бывает, если инварианты держатся».
/// В продакшене стол с такой ошибкой останавливается — корректность
/// денег важнее продолжения игры.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IntegrityError {
    #[error("Сумма нераспределённых потов {pots} не сходится: внесено {posted}, выплачено {paid}")]
    PotTotalsMismatch { pots: u64, posted: u64, paid: u64 },

    #[error("Пот уровня {level} не пуст, но не имеет ни одного допустимого претендента")]
    NoEligibleWinner { level: u32 },

    #[error("Нарушено сохранение фишек: ожидалось {expected}, фактически {actual}")]
    ChipConservationViolated { expected: u64, actual: u64 },

    #[error("Немонотонная eligibility: seat {seat} допущен к уровню {level}, но не к уровню {lower}")]
    EligibilityNotMonotonic {
        seat: SeatIndex,
        level: u32,
        lower: u32,
    },

    #[error("Колода не образует разбиение 52 карт (undealt+dealt+burned = {actual})")]
    DeckPartitionBroken { actual: usize },
}
