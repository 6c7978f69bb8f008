//! Инфраструктурный слой вокруг покерного движка:
//! - RNG-реализации для движка (системный и детерминированный);
//! - криптографическая деривация seed'ов;
//! - генерация ID;
//! - снапшоты раздач и абстракция хранилища.

pub mod ids;
pub mod persistence;
pub mod rng;
pub mod rng_seed;

pub use ids::IdGenerator;
pub use persistence::{HandEngineSnapshot, InMemoryPokerStorage, PokerStorage};
pub use rng::{DeterministicRng, SystemRng};
pub use rng_seed::RngSeed;
