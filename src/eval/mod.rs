//! Модуль оценки силы покерных рук (Texas Hold'em).
//!
//! Основная функция:
//!   `evaluate_best_hand(hole, board) -> Result<HandRank, EvalError>`
//!
//! Функция чистая; для повторных вызовов внутри одной раздачи есть
//! мемо-кэш `EvalCache` по каноническому ключу набора карт.

pub mod cache;
pub mod evaluator;
pub mod hand_rank;
pub mod lookup_tables;

pub use cache::EvalCache;
pub use evaluator::{evaluate_best_hand, EvalError};
pub use hand_rank::{describe_hand, hand_category, HandCategory};
