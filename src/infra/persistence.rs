use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::chips::Chips;
use crate::domain::deck::Deck;
use crate::domain::table::Table;
use crate::domain::tournament::Tournament;
use crate::domain::{HandId, SeatIndex, TableId, TournamentId};
use crate::engine::betting::BettingState;
use crate::engine::errors::IntegrityError;
use crate::engine::game_loop::{check_chip_conservation, HandEngine};
use crate::engine::hand_history::HandHistory;
use crate::engine::pot_ledger::PotLedger;
use crate::eval::EvalCache;

/// Снапшот HandEngine: «замороженная» раздача, всё, что нужно для
/// восстановления эквивалентного по эффекту движка.
///
/// Мемо-кэш оценок не сериализуется: после restore он пуст и заполняется
/// заново — на результаты это не влияет.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HandEngineSnapshot {
    pub table_id: TableId,
    pub hand_id: HandId,
    pub deck: Deck,
    pub betting: BettingState,
    pub ledger: PotLedger,
    pub current_actor: Option<SeatIndex>,
    pub history: HandHistory,
}

impl HandEngineSnapshot {
    /// Упаковать живой HandEngine в снапшот для хранения.
    pub fn from_engine(engine: &HandEngine) -> Self {
        Self {
            table_id: engine.table_id,
            hand_id: engine.hand_id,
            deck: engine.deck.clone(),
            betting: engine.betting.clone(),
            ledger: engine.ledger.clone(),
            current_actor: engine.current_actor,
            history: engine.history.clone(),
        }
    }

    /// Развернуть снапшот обратно в HandEngine (в памяти).
    pub fn into_engine(self) -> HandEngine {
        HandEngine {
            table_id: self.table_id,
            hand_id: self.hand_id,
            deck: self.deck,
            betting: self.betting,
            ledger: self.ledger,
            current_actor: self.current_actor,
            history: self.history,
            eval_cache: EvalCache::new(),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Проверка восстановленной раздачи: все числовые инварианты обязаны
/// держаться сразу после restore.
pub fn verify_restored(
    table: &Table,
    engine: &HandEngine,
    expected_total_chips: Chips,
) -> Result<(), IntegrityError> {
    if !engine.deck.is_partition_intact() {
        return Err(IntegrityError::DeckPartitionBroken {
            actual: engine.deck.undealt.len() + engine.deck.dealt.len() + engine.deck.burned.len(),
        });
    }
    check_chip_conservation(table, engine, expected_total_chips)
}

/// Абстракция хранилища для покера.
///
/// Формат на диске не навязывается: trait описывает только контракт
/// «сохранить/загрузить эквивалентное состояние». In-memory реализация —
/// для тестов и локального запуска.
pub trait PokerStorage {
    /// Загрузить стол.
    fn load_table(&self, id: TableId) -> Option<Table>;

    /// Сохранить стол.
    fn save_table(&mut self, table: &Table);

    /// Загрузить активную раздачу для стола (если она есть).
    fn load_active_hand(&self, table_id: TableId) -> Option<HandEngineSnapshot>;

    /// Сохранить / очистить активную раздачу.
    fn save_active_hand(&mut self, table_id: TableId, snapshot: Option<HandEngineSnapshot>);

    /// Загрузить турнир.
    fn load_tournament(&self, id: TournamentId) -> Option<Tournament>;

    /// Сохранить турнир.
    fn save_tournament(&mut self, tournament: &Tournament);
}

/// Простая in-memory реализация для тестов и локального запуска.
#[derive(Debug, Default)]
pub struct InMemoryPokerStorage {
    tables: HashMap<TableId, Table>,
    active_hands: HashMap<TableId, HandEngineSnapshot>,
    tournaments: HashMap<TournamentId, Tournament>,
}

impl InMemoryPokerStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PokerStorage for InMemoryPokerStorage {
    fn load_table(&self, id: TableId) -> Option<Table> {
        self.tables.get(&id).cloned()
    }

    fn save_table(&mut self, table: &Table) {
        self.tables.insert(table.id, table.clone());
    }

    fn load_active_hand(&self, table_id: TableId) -> Option<HandEngineSnapshot> {
        self.active_hands.get(&table_id).cloned()
    }

    fn save_active_hand(&mut self, table_id: TableId, snapshot: Option<HandEngineSnapshot>) {
        if let Some(s) = snapshot {
            self.active_hands.insert(table_id, s);
        } else {
            self.active_hands.remove(&table_id);
        }
    }

    fn load_tournament(&self, id: TournamentId) -> Option<Tournament> {
        self.tournaments.get(&id).cloned()
    }

    fn save_tournament(&mut self, tournament: &Tournament) {
        self.tournaments.insert(tournament.id, tournament.clone());
    }
}
