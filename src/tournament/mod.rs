//! Турнирный слой поверх движка одной раздачи.
//!
//! Слой одностороннего потребления: он получает итоги раздач
//! (`HandSummary`) и тики времени, а движок о турнире не знает ничего.
//!
//! - `runtime` — одностоловый турнир: посадка, эскалация блайндов,
//!   фиксация вылетов и мест;
//! - `payouts` — точное целочисленное распределение призового фонда.

pub mod payouts;
pub mod runtime;

pub use payouts::{distribute_prizes, PayoutTable, PlayerPayout};
pub use runtime::TournamentRuntime;
