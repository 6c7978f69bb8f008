//! Покерный движок: ставки, переход улиц, pot ledger, шоудаун.
//!
//! Высокоуровневый объект: `HandEngine`
//! Основные операции:
//!   - `start_hand` — запустить новую раздачу
//!   - `apply_action` — применить действие игрока
//!   - `advance_if_needed` — переход улиц / завершение раздачи
//!
//! Вся последовательность мутаций одного стола линейна: операции
//! принимают `&mut` и обрабатываются строго по одной.

pub mod actions;
pub mod betting;
pub mod errors;
pub mod events;
pub mod game_loop;
pub mod hand_history;
pub mod positions;
pub mod pot_ledger;
pub mod table_manager;
pub mod validation;

pub use actions::{PlayerAction, PlayerActionKind};
pub use errors::{EngineError, IntegrityError};
pub use events::{CollectingSink, EventBus, EventSink, GameEvent};
pub use game_loop::{advance_if_needed, apply_action, start_hand, HandEngine, HandStatus};
pub use hand_history::{HandEvent, HandEventKind, HandHistory};
pub use pot_ledger::{Pot, PotLedger, PotPayout, PotShare};
pub use table_manager::{ManagerError, TableManager};

/// RNG-интерфейс движка. Реализации живут в infra
/// (SystemRng поверх `rand`, DeterministicRng для тестов/реплея).
pub trait RandomSource {
    fn shuffle<T>(&mut self, slice: &mut [T]);
}
