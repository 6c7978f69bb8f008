//! Движок Texas Hold'em для одного стола.
//!
//! Слои:
//!   - `domain` — карты, колода, фишки, игроки, стол, блайнды, турнирные данные;
//!   - `eval` — оценка силы рук (10 категорий, строгий total order);
//!   - `engine` — раунды ставок, pot ledger с сайд-потами, game loop,
//!     история раздачи, типизированные события, менеджер столов;
//!   - `infra` — RNG, генерация ID, снапшоты и абстракция хранилища;
//!   - `time_ctrl` — shot clock и таймбанк;
//!   - `tournament` — турнирный слой поверх повторяющихся раздач.
//!
//! Ядро синхронно и не делает ввода-вывода: сеть, таймеры и персистентность —
//! внешние коллабораторы, которые подают действия и забирают события.

pub mod domain;
pub mod engine;
pub mod eval;
pub mod infra;
pub mod time_ctrl;
pub mod tournament;
