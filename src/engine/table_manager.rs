use std::collections::HashMap;

use crate::domain::table::{Table, TableStatus};
use crate::domain::{HandId, SeatIndex, TableId};
use crate::engine::actions::{PlayerAction, PlayerActionKind};
use crate::engine::events::{EventBus, EventSink, GameEvent};
use crate::engine::hand_history::HandEventKind;
use crate::engine::{self, EngineError, HandEngine, HandStatus, RandomSource};
use crate::time_ctrl::{AutoActionDecision, TimeController, TimeRules};

/// Ошибки уровня менеджера столов (над движком одной раздачи).
#[derive(Debug)]
pub enum ManagerError {
    /// Стол с таким ID не найден.
    TableNotFound(TableId),

    /// Для стола ещё не запущена раздача (нет HandEngine).
    NoActiveHand(TableId),

    /// Проброшенная ошибка из движка.
    Engine(EngineError),
}

impl From<EngineError> for ManagerError {
    fn from(e: EngineError) -> Self {
        ManagerError::Engine(e)
    }
}

/// Внутренний объект: один стол + опционально активный движок раздачи
/// + контроллер времени хода.
struct ManagedTable {
    table: Table,
    engine: Option<HandEngine>,
    time: TimeController,
    /// Сколько событий истории уже транслировано подписчикам.
    history_cursor: usize,
}

impl ManagedTable {
    fn new(table: Table, rules: TimeRules) -> Self {
        Self {
            table,
            engine: None,
            time: TimeController::new(rules),
            history_cursor: 0,
        }
    }
}

/// Менеджер столов — точка сериализации.
///
/// Все мутации стола (действия игроков И таймауты) проходят через `&mut
/// self`, то есть выстраиваются в одну линейную очередь. Гонка «игрок
/// успел в последний момент vs таймер» решается порядком вызовов: кто
/// первым вошёл, тот и ходит, опоздавшее действие отбивает проверка
/// current_actor в движке.
pub struct TableManager {
    tables: HashMap<TableId, ManagedTable>,
    events: EventBus,
    time_rules: TimeRules,
}

impl TableManager {
    pub fn new(time_rules: TimeRules) -> Self {
        Self {
            tables: HashMap::new(),
            events: EventBus::new(),
            time_rules,
        }
    }

    /// Подписать внешнего слушателя на события всех столов менеджера.
    pub fn subscribe(&mut self, sink: Box<dyn EventSink>) {
        self.events.subscribe(sink);
    }

    /// Добавить стол под его TableId. Существующий стол заменяется.
    pub fn add_table(&mut self, table: Table) {
        let id = table.id;
        let players: Vec<_> = table
            .seats
            .iter()
            .filter_map(|s| s.as_ref().map(|p| p.player_id))
            .collect();
        let mut managed = ManagedTable::new(table, self.time_rules.clone());
        managed.time.init_players(players);
        self.tables.insert(id, managed);
    }

    pub fn has_table(&self, table_id: TableId) -> bool {
        self.tables.contains_key(&table_id)
    }

    pub fn table(&self, table_id: TableId) -> Option<&Table> {
        self.tables.get(&table_id).map(|mt| &mt.table)
    }

    pub fn table_mut(&mut self, table_id: TableId) -> Option<&mut Table> {
        self.tables.get_mut(&table_id).map(|mt| &mut mt.table)
    }

    pub fn has_active_hand(&self, table_id: TableId) -> bool {
        self.tables
            .get(&table_id)
            .map(|mt| mt.engine.is_some() && mt.table.hand_in_progress)
            .unwrap_or(false)
    }

    pub fn hand_engine(&self, table_id: TableId) -> Option<&HandEngine> {
        self.tables.get(&table_id).and_then(|mt| mt.engine.as_ref())
    }

    pub fn hand_engine_mut(&mut self, table_id: TableId) -> Option<&mut HandEngine> {
        self.tables
            .get_mut(&table_id)
            .and_then(|mt| mt.engine.as_mut())
    }

    /// Текущий актёр на столе (если есть активная раздача).
    pub fn current_actor_seat(&self, table_id: TableId) -> Option<SeatIndex> {
        self.hand_engine(table_id).and_then(|e| e.current_actor)
    }

    /// Запустить новую раздачу на конкретном столе.
    ///
    /// Если уже блайнды посадили всех в олл-ин, борд добегается сразу и
    /// раздача может вернуться завершённой.
    pub fn start_hand<R: RandomSource>(
        &mut self,
        table_id: TableId,
        rng: &mut R,
        hand_id: HandId,
    ) -> Result<HandStatus, ManagerError> {
        let mt = self
            .tables
            .get_mut(&table_id)
            .ok_or(ManagerError::TableNotFound(table_id))?;

        let mut engine = engine::start_hand(&mut mt.table, rng, hand_id)?;
        mt.history_cursor = 0;

        let status = if engine.betting.is_round_complete() {
            engine::advance_if_needed(&mut mt.table, &mut engine)?
        } else {
            HandStatus::Ongoing
        };

        mt.engine = Some(engine);
        self.drain_events(table_id);
        self.sync_clock(table_id, &status);
        Ok(status)
    }

    /// Применить действие игрока на конкретном столе.
    pub fn apply_action(
        &mut self,
        table_id: TableId,
        action: PlayerAction,
    ) -> Result<HandStatus, ManagerError> {
        let mt = self
            .tables
            .get_mut(&table_id)
            .ok_or(ManagerError::TableNotFound(table_id))?;

        let engine = mt
            .engine
            .as_mut()
            .ok_or(ManagerError::NoActiveHand(table_id))?;

        let status = engine::apply_action(&mut mt.table, engine, action)?;
        mt.time.on_manual_action(action.player_id);

        // HandEngine остаётся внутри и после завершения раздачи:
        // историю и ledger можно читать до следующего start_hand.
        self.drain_events(table_id);
        self.sync_clock(table_id, &status);
        Ok(status)
    }

    /// Подать в менеджер прошедшее wall-clock время.
    ///
    /// Таймаут превращается в принудительный Fold текущего актёра и идёт
    /// через тот же `apply_action`, что и настоящие действия, — порядок
    /// мутаций остаётся линейным.
    pub fn on_time_passed(
        &mut self,
        table_id: TableId,
        delta_secs: i32,
    ) -> Result<Option<HandStatus>, ManagerError> {
        let mt = self
            .tables
            .get_mut(&table_id)
            .ok_or(ManagerError::TableNotFound(table_id))?;

        if mt.table.status == TableStatus::Paused {
            return Ok(None);
        }

        let decision = mt.time.on_time_passed(delta_secs);
        if decision != AutoActionDecision::TimeoutFold {
            return Ok(None);
        }

        let forced = mt.engine.as_ref().and_then(|e| e.current_actor).and_then(|seat| {
            mt.table.seats[seat as usize]
                .as_ref()
                .map(|p| PlayerAction {
                    player_id: p.player_id,
                    seat,
                    kind: PlayerActionKind::Fold,
                })
        });

        match forced {
            Some(action) => {
                log::warn!(
                    "[manager] стол {table_id}: таймаут, принудительный fold seat {}",
                    action.seat
                );
                self.apply_action(table_id, action).map(Some)
            }
            None => Ok(None),
        }
    }

    /// Пауза приостанавливает ТОЛЬКО отсчёт таймера хода.
    pub fn pause_table(&mut self, table_id: TableId) -> Result<(), ManagerError> {
        let mt = self
            .tables
            .get_mut(&table_id)
            .ok_or(ManagerError::TableNotFound(table_id))?;
        mt.table.status = TableStatus::Paused;
        mt.time.pause();
        Ok(())
    }

    pub fn resume_table(&mut self, table_id: TableId) -> Result<(), ManagerError> {
        let mt = self
            .tables
            .get_mut(&table_id)
            .ok_or(ManagerError::TableNotFound(table_id))?;
        mt.table.status = TableStatus::Playing;
        mt.time.resume();
        Ok(())
    }

    /// Запустить/остановить таймер под текущего актёра.
    fn sync_clock(&mut self, table_id: TableId, status: &HandStatus) {
        let Some(mt) = self.tables.get_mut(&table_id) else {
            return;
        };
        match status {
            HandStatus::Finished(..) => mt.time.clear_turn(),
            HandStatus::Ongoing => {
                let actor = mt
                    .engine
                    .as_ref()
                    .and_then(|e| e.current_actor)
                    .and_then(|seat| {
                        mt.table.seats[seat as usize]
                            .as_ref()
                            .map(|p| p.player_id)
                    });
                match actor {
                    Some(player_id) => mt.time.start_turn(player_id),
                    None => mt.time.clear_turn(),
                }
            }
        }
    }

    /// Транслировать свежие события истории раздачи подписчикам.
    /// Доставка best-effort: ядро не читает ответов слушателей.
    fn drain_events(&mut self, table_id: TableId) {
        let Some(mt) = self.tables.get_mut(&table_id) else {
            return;
        };
        let Some(engine) = mt.engine.as_ref() else {
            return;
        };

        let tid = mt.table.id;
        let mut out = Vec::new();
        for event in &engine.history.events[mt.history_cursor..] {
            if let Some(ev) = map_history_event(tid, &event.kind) {
                out.push(ev);
            }
        }
        mt.history_cursor = engine.history.events.len();

        for ev in out {
            self.events.emit(&ev);
        }
    }
}

/// Свёртка внутренней истории раздачи в закрытый набор внешних событий.
fn map_history_event(table_id: TableId, kind: &HandEventKind) -> Option<GameEvent> {
    match kind {
        HandEventKind::HandStarted { hand_id, .. } => Some(GameEvent::HandStarted {
            table_id,
            hand_id: *hand_id,
        }),
        HandEventKind::BoardDealt { street, cards } => Some(GameEvent::CommunityCardsDealt {
            table_id,
            street: *street,
            cards: cards.clone(),
        }),
        HandEventKind::RoundCompleted { street } => Some(GameEvent::RoundCompleted {
            table_id,
            street: *street,
        }),
        HandEventKind::PotAwarded { level, winners } => Some(GameEvent::PotDistributed {
            table_id,
            level: *level,
            winners: winners
                .iter()
                .map(|&(_, player_id, amount)| (player_id, amount))
                .collect(),
        }),
        HandEventKind::PlayerEliminated { player_id, .. } => Some(GameEvent::PlayerEliminated {
            table_id,
            player_id: *player_id,
        }),
        HandEventKind::HandFinished { hand_id, .. } => Some(GameEvent::HandFinished {
            table_id,
            hand_id: *hand_id,
        }),
        _ => None,
    }
}
