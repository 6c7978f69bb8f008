use crate::domain::blinds::BlindLevel;
use crate::domain::chips::Chips;
use crate::domain::hand::HandSummary;
use crate::domain::player::PlayerAtTable;
use crate::domain::table::{Table, TableConfig, TableStakes, TableType};
use crate::domain::tournament::{Tournament, TournamentError, TournamentTimeEvent};
use crate::domain::{HandId, PlayerId, TableId};
use crate::tournament::payouts::{distribute_prizes, PlayerPayout};

/// Одностоловый турнирный рантайм: держит `Tournament` и его стол,
/// синхронизирует ставки стола с уровнем блайндов и фиксирует вылеты.
///
/// Раздачи играет движок (`engine::start_hand` / `apply_action` или
/// `TableManager`); рантайм потребляет только их итоги.
pub struct TournamentRuntime {
    pub tournament: Tournament,
    pub table: Table,
    hand_counter: u64,
}

impl TournamentRuntime {
    /// Собрать турнирный стол из зарегистрированных игроков.
    ///
    /// Игроки сортируются по id для детерминированной посадки;
    /// всем выдаётся стартовый стек, ставки — с первого уровня блайндов.
    pub fn new(tournament: Tournament, table_id: TableId) -> Result<Self, TournamentError> {
        let mut player_ids: Vec<PlayerId> = tournament
            .registrations
            .values()
            .filter(|reg| !reg.is_busted)
            .map(|reg| reg.player_id)
            .collect();
        player_ids.sort_unstable();

        if player_ids.is_empty() {
            return Err(TournamentError::InvalidConfig(
                "TournamentRuntime: нет зарегистрированных игроков".into(),
            ));
        }

        let first_level = tournament.config.blind_structure.first_level().clone();
        let config = TableConfig {
            max_seats: tournament.config.max_players as u8,
            table_type: TableType::Tournament,
            stakes: stakes_from_level(&first_level),
        };

        let table_name = format!("T{}-Table", tournament.id);
        let mut table = Table::new(table_id, table_name, config);

        for (seat, player_id) in player_ids.iter().enumerate() {
            table.seats[seat] = Some(PlayerAtTable::new(
                *player_id,
                tournament.config.starting_stack,
            ));
        }

        Ok(Self {
            tournament,
            table,
            hand_counter: 0,
        })
    }

    /// Стартовать турнир (минимум игроков проверяет Tournament).
    pub fn start(&mut self, now_ts: u64) -> Result<(), TournamentError> {
        self.tournament.start(now_ts)
    }

    /// Следующий номер раздачи внутри турнира.
    pub fn next_hand_id(&mut self) -> HandId {
        self.hand_counter += 1;
        self.hand_counter
    }

    pub fn hands_played(&self) -> u64 {
        self.hand_counter
    }

    /// Тик времени: эскалация блайндов по расписанию.
    /// При смене уровня ставки стола обновляются сразу — следующая
    /// раздача пойдёт уже по новым блайндам.
    pub fn on_time_tick(&mut self, now_ts: u64) -> TournamentTimeEvent {
        let event = self.tournament.apply_time_tick(now_ts);
        if let TournamentTimeEvent::LevelAdvanced { ref new_blinds, .. } = event {
            log::info!(
                "[tournament] {}: уровень {} — блайнды {}/{}",
                self.tournament.id,
                new_blinds.level,
                new_blinds.small_blind,
                new_blinds.big_blind
            );
            self.table.config.stakes = stakes_from_level(new_blinds);
        }
        event
    }

    /// Принять итоги раздачи: зафиксировать вылеты и места.
    ///
    /// `summary.eliminated` уже упорядочен движком (короткие стеки
    /// раньше), так что места внутри одной раздачи детерминированы.
    /// Возвращает (player_id, место) для всех вылетевших.
    pub fn on_hand_finished(
        &mut self,
        summary: &HandSummary,
    ) -> Result<Vec<(PlayerId, u32)>, TournamentError> {
        let mut placed = Vec::new();
        for &player_id in &summary.eliminated {
            let place = self.tournament.mark_player_busted(player_id)?;
            placed.push((player_id, place));
        }
        Ok(placed)
    }

    pub fn is_finished(&self) -> bool {
        self.tournament.is_finished()
    }

    pub fn winner(&self) -> Option<PlayerId> {
        self.tournament.winner_id
    }

    /// Распределить призовой фонд завершённого турнира.
    pub fn payouts(&self, prize_pool: Chips) -> Result<Vec<PlayerPayout>, TournamentError> {
        distribute_prizes(&self.tournament, prize_pool)
    }
}

fn stakes_from_level(level: &BlindLevel) -> TableStakes {
    TableStakes::new(
        level.small_blind,
        level.big_blind,
        level.ante_type,
        level.ante,
    )
}
