use std::collections::HashMap;

use crate::domain::chips::Chips;
use crate::domain::deck::Deck;
use crate::domain::hand::{HandRank, HandSummary, PlayerHandResult, Street};
use crate::domain::player::PlayerStatus;
use crate::domain::table::{Table, TableStakes, TableStatus};
use crate::domain::{HandId, PlayerId, SeatIndex, TableId};
use crate::engine::actions::{PlayerAction, PlayerActionKind};
use crate::engine::betting::BettingState;
use crate::engine::errors::{EngineError, IntegrityError};
use crate::engine::hand_history::{HandEventKind, HandHistory};
use crate::engine::positions::collect_occupied_seats_from;
use crate::engine::pot_ledger::PotLedger;
use crate::engine::validation::validate_action;
use crate::engine::RandomSource;
use crate::eval::EvalCache;

/// Статус раздачи для внешнего кода.
pub enum HandStatus {
    Ongoing,
    Finished(HandSummary, HandHistory),
}

/// Внутреннее состояние раздачи.
pub struct HandEngine {
    pub table_id: TableId,
    pub hand_id: HandId,
    pub deck: Deck,
    pub betting: BettingState,
    /// Банки раздачи: main + side pots, вклады, eligibility.
    pub ledger: PotLedger,
    /// Чей сейчас ход (seat).
    pub current_actor: Option<SeatIndex>,
    /// История раздачи.
    pub history: HandHistory,
    /// Мемо-кэш оценок рук; живёт одну раздачу, не сериализуется.
    pub eval_cache: EvalCache,
}

impl HandEngine {
    pub(crate) fn new(
        table_id: TableId,
        hand_id: HandId,
        deck: Deck,
        betting: BettingState,
    ) -> Self {
        Self {
            table_id,
            hand_id,
            deck,
            betting,
            ledger: PotLedger::new(),
            current_actor: None,
            history: HandHistory::new(),
            eval_cache: EvalCache::new(),
        }
    }
}

/// Старт новой раздачи:
/// - выбирает дилера;
/// - постит блайнды/анте;
/// - раздаёт карманные карты;
/// - настраивает BettingState и current_actor.
pub fn start_hand<R: RandomSource>(
    table: &mut Table,
    rng: &mut R,
    new_hand_id: HandId,
) -> Result<HandEngine, EngineError> {
    if table.hand_in_progress {
        return Err(EngineError::HandAlreadyInProgress);
    }

    let table_id = table.id;
    let mut deck = Deck::standard_52();
    rng.shuffle(&mut deck.undealt);

    // Сброс борда и статусов перед раздачей.
    table.board.clear();
    table.current_hand_id = Some(new_hand_id);
    table.street = Street::Preflop;

    for seat_opt in table.seats.iter_mut() {
        if let Some(p) = seat_opt {
            if matches!(p.status, PlayerStatus::Busted | PlayerStatus::SittingOut) {
                continue;
            }
            if p.stack.is_zero() {
                p.status = PlayerStatus::Busted;
            } else {
                p.status = PlayerStatus::Active;
            }
            p.current_bet = Chips::ZERO;
            p.hole_cards.clear();
        }
    }

    if active_seats(table).len() < 2 {
        return Err(EngineError::NotEnoughPlayers);
    }

    table.hand_in_progress = true;
    if table.status == TableStatus::Lobby {
        table.status = TableStatus::Playing;
    }

    // Кнопка переходит к следующему игроку, способному играть.
    let dealer_seat = next_active_dealer(table).ok_or(EngineError::NotEnoughPlayers)?;
    table.dealer_button = Some(dealer_seat);

    let mut engine = HandEngine::new(
        table_id,
        new_hand_id,
        deck,
        BettingState::new(
            Street::Preflop,
            Chips::ZERO,
            table.config.stakes.big_blind, // min_raise по умолчанию = BB
            Vec::new(),
        ),
    );

    engine.history.push(HandEventKind::HandStarted {
        table_id,
        hand_id: new_hand_id,
    });

    post_blinds_and_antes(table, &mut engine, dealer_seat);
    deal_hole_cards(table, &mut engine)?;

    log::info!(
        "[engine] стол {table_id}: раздача {new_hand_id} началась, дилер seat {dealer_seat}"
    );

    Ok(engine)
}

/// Занятые места с игроками, участвующими в раздаче с самого начала.
fn active_seats(table: &Table) -> Vec<SeatIndex> {
    table
        .seats
        .iter()
        .enumerate()
        .filter_map(|(idx, s)| {
            s.as_ref()
                .filter(|p| matches!(p.status, PlayerStatus::Active))
                .map(|_| idx as SeatIndex)
        })
        .collect()
}

/// Следующий дилер среди мест со статусом Active.
fn next_active_dealer(table: &Table) -> Option<SeatIndex> {
    let max = table.max_seats() as usize;
    if max == 0 {
        return None;
    }
    let start = match table.dealer_button {
        Some(button) => (button as usize + 1) % max,
        None => 0,
    };

    let mut idx = start;
    for _ in 0..max {
        if let Some(Some(p)) = table.seats.get(idx) {
            if matches!(p.status, PlayerStatus::Active) {
                return Some(idx as SeatIndex);
            }
        }
        idx = (idx + 1) % max;
    }
    None
}

/// Порядок игроков раздачи по кругу от дилера (только Active на старте).
fn hand_order_from_dealer(table: &Table, dealer: SeatIndex) -> Vec<SeatIndex> {
    collect_occupied_seats_from(table, dealer)
        .into_iter()
        .filter(|&seat| {
            table.seats[seat as usize]
                .as_ref()
                .map(|p| matches!(p.status, PlayerStatus::Active | PlayerStatus::AllIn))
                .unwrap_or(false)
        })
        .collect()
}

/// Постинг анте и блайндов.
/// Хедз-ап: дилер платит SB и ходит первым на префлопе.
fn post_blinds_and_antes(table: &mut Table, engine: &mut HandEngine, dealer_seat: SeatIndex) {
    let stakes: TableStakes = table.config.stakes.clone();

    let occupied = hand_order_from_dealer(table, dealer_seat);
    if occupied.len() < 2 {
        return;
    }

    let (sb_seat, bb_seat) = if occupied.len() == 2 {
        (occupied[0], occupied[1])
    } else {
        (occupied[1], occupied[2])
    };

    let mut ante_events = Vec::new();

    // Анте.
    match stakes.ante_type {
        crate::domain::blinds::AnteType::None => {}
        crate::domain::blinds::AnteType::Classic => {
            for &seat in &occupied {
                let paid = pay_forced(table, engine, seat, stakes.ante, false);
                if !paid.is_zero() {
                    ante_events.push((seat, paid));
                }
            }
        }
        crate::domain::blinds::AnteType::BigBlind => {
            let paid = pay_forced(table, engine, bb_seat, stakes.ante, false);
            if !paid.is_zero() {
                ante_events.push((bb_seat, paid));
            }
        }
    }

    // Small blind / big blind считаются в current_bet игрока.
    let sb_paid = pay_forced(table, engine, sb_seat, stakes.small_blind, true);
    let bb_paid = pay_forced(table, engine, bb_seat, stakes.big_blind, true);

    engine.betting.current_bet = stakes.big_blind;
    engine.betting.min_raise = stakes.big_blind;
    engine.betting.last_aggressor = Some(bb_seat);

    engine.history.push(HandEventKind::BlindsPosted {
        dealer: dealer_seat,
        small_blind: Some((sb_seat, sb_paid)),
        big_blind: Some((bb_seat, bb_paid)),
        ante: ante_events,
    });

    // Первым на префлопе ходит игрок за BB; BB закрывает круг.
    let mut to_act = Vec::new();
    let start_idx = match occupied.iter().position(|&s| s == bb_seat) {
        Some(idx) => (idx + 1) % occupied.len(),
        None => 0,
    };
    for i in 0..occupied.len() {
        let idx = (start_idx + i) % occupied.len();
        let seat = occupied[idx];
        if let Some(p) = table.seats[seat as usize].as_ref() {
            if matches!(p.status, PlayerStatus::Active) {
                to_act.push(seat);
            }
        }
    }

    engine.betting.to_act = to_act.clone();
    engine.current_actor = to_act.first().copied();
}

/// Принудительный платёж (анте/блайнд): не более стека, с проводкой через
/// ledger и разрешением олл-ина, если стек опустел.
fn pay_forced(
    table: &mut Table,
    engine: &mut HandEngine,
    seat: SeatIndex,
    amount: Chips,
    counts_as_bet: bool,
) -> Chips {
    if amount.is_zero() {
        return Chips::ZERO;
    }
    let Some(player) = table.seats[seat as usize].as_mut() else {
        return Chips::ZERO;
    };

    let paid = amount.min(player.stack);
    player.stack -= paid;
    if counts_as_bet {
        player.current_bet += paid;
    }
    let went_all_in = player.stack.is_zero() && !paid.is_zero();
    if went_all_in {
        player.status = PlayerStatus::AllIn;
    }

    engine.ledger.post_contribution(seat, paid, Street::Preflop);
    if went_all_in {
        engine.ledger.resolve_all_in(seat);
    }
    paid
}

/// Раздача карманных карт — по 2 карты, по кругу от дилера.
fn deal_hole_cards(table: &mut Table, engine: &mut HandEngine) -> Result<(), EngineError> {
    let dealer = table
        .dealer_button
        .ok_or(EngineError::Internal("дилер должен быть задан"))?;
    let order = hand_order_from_dealer(table, dealer);

    for _round in 0..2 {
        for &seat in &order {
            if let Some(p) = table.seats[seat as usize].as_mut() {
                let card = engine.deck.deal_one()?;
                p.hole_cards.push(card);
                engine.history.push(HandEventKind::HoleCardsDealt {
                    seat,
                    cards: vec![card],
                });
            }
        }
    }
    Ok(())
}

/// Применить действие игрока. Возвращает статус раздачи (идёт / закончилась).
///
/// Любая ошибка валидации возвращается ДО мутаций: опоздавшее действие
/// (ход уже перешёл) отсекает проверка current_actor.
pub fn apply_action(
    table: &mut Table,
    engine: &mut HandEngine,
    action: PlayerAction,
) -> Result<HandStatus, EngineError> {
    if !table.hand_in_progress {
        return Err(EngineError::NoActiveHand);
    }

    let seat_idx = action.seat as usize;
    if seat_idx >= table.seats.len() {
        return Err(EngineError::InvalidSeat(action.seat));
    }

    // Иммутабельная ссылка для проверок.
    let player_ref = table.seats[seat_idx]
        .as_ref()
        .ok_or(EngineError::EmptySeat)?;

    if player_ref.player_id != action.player_id {
        return Err(EngineError::PlayerNotAtTable(action.player_id));
    }

    if engine.current_actor != Some(action.seat) {
        return Err(EngineError::NotPlayersTurn(action.player_id));
    }

    validate_action(
        player_ref,
        &action.kind,
        &engine.betting,
        table.config.stakes.big_blind,
    )?;

    let to_call = if engine.betting.current_bet.0 > player_ref.current_bet.0 {
        Chips(engine.betting.current_bet.0 - player_ref.current_bet.0)
    } else {
        Chips::ZERO
    };

    log::debug!(
        "[engine] стол {}: seat {} действует {:?}",
        table.id,
        action.seat,
        action.kind
    );

    match action.kind {
        PlayerActionKind::Fold => {
            let (player_id, new_stack) = {
                let player = table.seats[seat_idx]
                    .as_mut()
                    .ok_or(EngineError::EmptySeat)?;
                player.status = PlayerStatus::Folded;
                (player.player_id, player.stack)
            };
            engine.ledger.mark_folded(action.seat);

            engine.history.push(HandEventKind::PlayerActed {
                player_id,
                seat: action.seat,
                action: action.kind,
                new_stack,
                pot_breakdown: Vec::new(),
                pot_after: engine.ledger.total(),
            });
        }

        PlayerActionKind::Check => {
            let (player_id, new_stack) = {
                let player = table.seats[seat_idx]
                    .as_mut()
                    .ok_or(EngineError::EmptySeat)?;
                (player.player_id, player.stack)
            };

            engine.history.push(HandEventKind::PlayerActed {
                player_id,
                seat: action.seat,
                action: action.kind,
                new_stack,
                pot_breakdown: Vec::new(),
                pot_after: engine.ledger.total(),
            });
        }

        PlayerActionKind::Call => {
            let (player_id, new_stack, pay, went_all_in) = {
                let player = table.seats[seat_idx]
                    .as_mut()
                    .ok_or(EngineError::EmptySeat)?;

                // Короткий колл на весь стек — неявный олл-ин.
                let pay = to_call.min(player.stack);
                player.stack -= pay;
                player.current_bet += pay;
                let went_all_in = player.stack.is_zero();
                if went_all_in {
                    player.status = PlayerStatus::AllIn;
                }
                (player.player_id, player.stack, pay, went_all_in)
            };

            let pot_breakdown = engine
                .ledger
                .post_contribution(action.seat, pay, engine.betting.street);
            if went_all_in {
                engine.ledger.resolve_all_in(action.seat);
            }

            engine.history.push(HandEventKind::PlayerActed {
                player_id,
                seat: action.seat,
                action: action.kind,
                new_stack,
                pot_breakdown,
                pot_after: engine.ledger.total(),
            });
        }

        PlayerActionKind::Bet(amount) => {
            let (player_id, new_stack, new_bet, went_all_in) = {
                let player = table.seats[seat_idx]
                    .as_mut()
                    .ok_or(EngineError::EmptySeat)?;

                player.stack -= amount;
                player.current_bet += amount;
                let went_all_in = player.stack.is_zero();
                if went_all_in {
                    player.status = PlayerStatus::AllIn;
                }
                (player.player_id, player.stack, player.current_bet, went_all_in)
            };

            let pot_breakdown = engine
                .ledger
                .post_contribution(action.seat, amount, engine.betting.street);
            if went_all_in {
                engine.ledger.resolve_all_in(action.seat);
            }

            // Первый bet улицы задаёт и current_bet, и min_raise.
            engine.betting.on_raise(
                action.seat,
                new_bet,
                amount,
                collect_betting_order_after_raise(table, action.seat),
            );

            engine.history.push(HandEventKind::PlayerActed {
                player_id,
                seat: action.seat,
                action: action.kind,
                new_stack,
                pot_breakdown,
                pot_after: engine.ledger.total(),
            });
        }

        PlayerActionKind::Raise(total_bet) => {
            let current_bet_before = engine.betting.current_bet;
            let (player_id, new_stack, new_bet, pay, went_all_in) = {
                let player = table.seats[seat_idx]
                    .as_mut()
                    .ok_or(EngineError::EmptySeat)?;

                let pay = Chips(total_bet.0 - player.current_bet.0);
                player.stack -= pay;
                player.current_bet += pay;
                let went_all_in = player.stack.is_zero();
                if went_all_in {
                    player.status = PlayerStatus::AllIn;
                }
                (
                    player.player_id,
                    player.stack,
                    player.current_bet,
                    pay,
                    went_all_in,
                )
            };

            let pot_breakdown = engine
                .ledger
                .post_contribution(action.seat, pay, engine.betting.street);
            if went_all_in {
                engine.ledger.resolve_all_in(action.seat);
            }

            let raise_size = Chips(new_bet.0 - current_bet_before.0);
            engine.betting.on_raise(
                action.seat,
                new_bet,
                raise_size,
                collect_betting_order_after_raise(table, action.seat),
            );

            engine.history.push(HandEventKind::PlayerActed {
                player_id,
                seat: action.seat,
                action: action.kind,
                new_stack,
                pot_breakdown,
                pot_after: engine.ledger.total(),
            });
        }

        PlayerActionKind::AllIn => {
            let current_bet_before = engine.betting.current_bet;
            let (player_id, new_bet, pay) = {
                let player = table.seats[seat_idx]
                    .as_mut()
                    .ok_or(EngineError::EmptySeat)?;

                let pay = player.stack;
                player.stack = Chips::ZERO;
                player.status = PlayerStatus::AllIn;
                player.current_bet += pay;

                (player.player_id, player.current_bet, pay)
            };

            let pot_breakdown = engine
                .ledger
                .post_contribution(action.seat, pay, engine.betting.street);
            engine.ledger.resolve_all_in(action.seat);

            // Олл-ин выше текущей ставки — по сути raise.
            if new_bet.0 > current_bet_before.0 {
                let raise_size = Chips(new_bet.0 - current_bet_before.0);
                engine.betting.on_raise(
                    action.seat,
                    new_bet,
                    raise_size,
                    collect_betting_order_after_raise(table, action.seat),
                );
            } else {
                // Олл-ин короче ставки — игрок просто выходит из очереди.
                engine.betting.mark_acted(action.seat);
            }

            engine.history.push(HandEventKind::PlayerActed {
                player_id,
                seat: action.seat,
                action: action.kind,
                new_stack: Chips::ZERO,
                pot_breakdown,
                pot_after: engine.ledger.total(),
            });
        }
    }

    // Текущий игрок походил → убираем из очереди.
    engine.betting.mark_acted(action.seat);

    // Остался один претендент на банк — раздача окончена без шоудауна.
    if count_in_hand_players(table) == 1 {
        let summary = finish_hand_without_showdown(table, engine)?;
        table.hand_in_progress = false;
        return Ok(HandStatus::Finished(summary, engine.history.clone()));
    }

    if engine.betting.is_round_complete() {
        engine.history.push(HandEventKind::RoundCompleted {
            street: engine.betting.street,
        });
        advance_if_needed(table, engine)
    } else {
        engine.current_actor = engine.betting.to_act.first().copied();
        Ok(HandStatus::Ongoing)
    }
}

/// Пересчёт очереди после рейза:
/// начинаем со следующего за raiser по кругу, включаем только Active.
fn collect_betting_order_after_raise(table: &Table, raiser_seat: SeatIndex) -> Vec<SeatIndex> {
    let order = collect_occupied_seats_from(table, raiser_seat);
    let mut res = Vec::new();
    if order.len() <= 1 {
        return res;
    }

    for i in 0..(order.len() - 1) {
        let idx = (1 + i) % order.len();
        let seat = order[idx];
        if let Some(p) = table.seats[seat as usize].as_ref() {
            if matches!(p.status, PlayerStatus::Active) {
                res.push(seat);
            }
        }
    }
    res
}

/// Подсчёт игроков, всё ещё претендующих на банк (Active + AllIn).
fn count_in_hand_players(table: &Table) -> usize {
    table
        .seats
        .iter()
        .filter_map(|s| s.as_ref())
        .filter(|p| p.is_in_hand())
        .count()
}

/// Переход улиц / шоудаун / завершение раздачи.
///
/// Если действовать могут меньше двух игроков (остальные в олл-ине),
/// борд добегается автоматически до самого шоудауна.
pub fn advance_if_needed(
    table: &mut Table,
    engine: &mut HandEngine,
) -> Result<HandStatus, EngineError> {
    use Street::*;

    loop {
        match table.street {
            Preflop => {
                deal_board_cards(table, engine, 3, Flop)?;
                reset_bets_for_new_street(table, engine, Flop);
            }
            Flop => {
                deal_board_cards(table, engine, 1, Turn)?;
                reset_bets_for_new_street(table, engine, Turn);
            }
            Turn => {
                deal_board_cards(table, engine, 1, River)?;
                reset_bets_for_new_street(table, engine, River);
            }
            River => {
                let summary = finish_hand_with_showdown(table, engine)?;
                table.hand_in_progress = false;
                return Ok(HandStatus::Finished(summary, engine.history.clone()));
            }
            Showdown => {
                return Err(EngineError::Internal("попытка advance на Showdown"));
            }
        }

        if engine.betting.to_act.len() >= 2 {
            return Ok(HandStatus::Ongoing);
        }

        // Добег борда: ставить больше некому, раунд закрыт тривиально.
        engine.current_actor = None;
        engine.betting.to_act.clear();
        engine.history.push(HandEventKind::RoundCompleted {
            street: engine.betting.street,
        });
    }
}

/// Сжечь карту и открыть очередную порцию борда.
fn deal_board_cards(
    table: &mut Table,
    engine: &mut HandEngine,
    count: usize,
    street: Street,
) -> Result<(), EngineError> {
    engine.deck.burn_one()?;
    let tranche = engine.deck.deal_n(count)?;
    table.board.extend_from_slice(&tranche);

    engine.history.push(HandEventKind::BoardDealt {
        street,
        cards: tranche,
    });

    table.street = street;
    engine
        .history
        .push(HandEventKind::StreetChanged { street });
    Ok(())
}

/// Сбросить current_bet игроков, настроить BettingState новой улицы.
/// Постфлоп первым ходит первый Active слева от дилера.
fn reset_bets_for_new_street(table: &mut Table, engine: &mut HandEngine, street: Street) {
    for seat_opt in table.seats.iter_mut() {
        if let Some(p) = seat_opt {
            p.current_bet = Chips::ZERO;
        }
    }

    let dealer = table.dealer_button.unwrap_or(0);
    let left_of_dealer = ((dealer as usize + 1) % table.max_seats().max(1) as usize) as SeatIndex;
    let occupied = collect_occupied_seats_from(table, left_of_dealer);

    let to_act: Vec<SeatIndex> = occupied
        .into_iter()
        .filter(|&seat| {
            table.seats[seat as usize]
                .as_ref()
                .map(|p| matches!(p.status, PlayerStatus::Active))
                .unwrap_or(false)
        })
        .collect();

    engine.betting = BettingState::new(
        street,
        Chips::ZERO,
        table.config.stakes.big_blind,
        to_act.clone(),
    );
    engine.current_actor = to_act.first().copied();
}

/// Завершение раздачи без шоудауна (остался один претендент).
/// Весь нераспределённый банк, включая неуравненную часть его же ставки,
/// уходит выжившему.
fn finish_hand_without_showdown(
    table: &mut Table,
    engine: &mut HandEngine,
) -> Result<HandSummary, EngineError> {
    table.street = Street::Showdown;

    let winner_seat = table
        .seats
        .iter()
        .enumerate()
        .find_map(|(idx, s)| {
            s.as_ref()
                .filter(|p| p.is_in_hand())
                .map(|_| idx as SeatIndex)
        })
        .ok_or(EngineError::Internal(
            "должен быть хотя бы один активный игрок",
        ))?;

    let total = engine.ledger.sweep_to(winner_seat);
    let mut won_by_seat: HashMap<SeatIndex, Chips> = HashMap::new();
    won_by_seat.insert(winner_seat, total);

    if let Some(winner) = table.seats[winner_seat as usize].as_mut() {
        winner.stack += total;
    }
    push_award_events(table, engine);

    finalize_hand(table, engine, total, &won_by_seat, &HashMap::new())
}

/// Завершение раздачи с шоудауном: оценка рук, распределение потов.
fn finish_hand_with_showdown(
    table: &mut Table,
    engine: &mut HandEngine,
) -> Result<HandSummary, EngineError> {
    table.street = Street::Showdown;

    // Оцениваем руки всех, кто дошёл до шоудауна (порядок мест фиксирован).
    let mut ranks: HashMap<SeatIndex, HandRank> = HashMap::new();
    for (idx, seat_opt) in table.seats.iter().enumerate() {
        let Some(p) = seat_opt.as_ref() else { continue };
        if !p.is_in_hand() {
            continue;
        }
        let seat = idx as SeatIndex;
        let rank = engine.eval_cache.evaluate(&p.hole_cards, &table.board)?;
        ranks.insert(seat, rank);
        engine.history.push(HandEventKind::ShowdownReveal {
            seat,
            player_id: p.player_id,
            hole_cards: p.hole_cards.clone(),
            rank_value: rank.0,
        });
    }

    let payouts = engine.ledger.distribute_all(&ranks)?;

    let mut won_by_seat: HashMap<SeatIndex, Chips> = HashMap::new();
    for payout in &payouts {
        for &(seat, amount) in &payout.winners {
            if let Some(p) = table.seats[seat as usize].as_mut() {
                p.stack += amount;
            }
            *won_by_seat.entry(seat).or_insert(Chips::ZERO) += amount;
        }
    }
    push_award_events(table, engine);

    let total = engine.ledger.total_posted();
    finalize_hand(table, engine, total, &won_by_seat, &ranks)
}

/// Перенести итоги распределения из ledger в историю раздачи.
fn push_award_events(table: &Table, engine: &mut HandEngine) {
    let mut events = Vec::new();
    for pot in engine.ledger.pots() {
        let Some(payout) = &pot.payout else { continue };
        let winners: Vec<(SeatIndex, PlayerId, Chips)> = payout
            .winners
            .iter()
            .filter_map(|&(seat, amount)| {
                table.seats[seat as usize]
                    .as_ref()
                    .map(|p| (seat, p.player_id, amount))
            })
            .collect();
        events.push(HandEventKind::PotAwarded {
            level: payout.level,
            winners,
        });
    }
    for ev in events {
        engine.history.push(ev);
    }
}

/// Общий хвост завершения раздачи: бусты, события, summary.
fn finalize_hand(
    table: &mut Table,
    engine: &mut HandEngine,
    total_pot: Chips,
    won_by_seat: &HashMap<SeatIndex, Chips>,
    ranks: &HashMap<SeatIndex, HandRank>,
) -> Result<HandSummary, EngineError> {
    // Пометить вылетевших. Порядок фиксированный: кто начинал раздачу
    // с меньшим стеком, тот вылетает «раньше» (и получает худшее место
    // в турнире); стек на старте раздачи = весь его вклад в банк.
    let mut busted: Vec<(SeatIndex, PlayerId)> = Vec::new();
    for (idx, seat_opt) in table.seats.iter_mut().enumerate() {
        if let Some(p) = seat_opt {
            if p.stack.is_zero()
                && !matches!(p.status, PlayerStatus::Busted | PlayerStatus::SittingOut)
            {
                p.status = PlayerStatus::Busted;
                busted.push((idx as SeatIndex, p.player_id));
            }
        }
    }
    busted.sort_by_key(|&(seat, _)| (engine.ledger.seat_total(seat), seat));

    let mut eliminated = Vec::new();
    for (seat, player_id) in busted {
        eliminated.push(player_id);
        engine
            .history
            .push(HandEventKind::PlayerEliminated { seat, player_id });
    }

    engine.history.push(HandEventKind::HandFinished {
        hand_id: engine.hand_id,
        table_id: engine.table_id,
    });

    log::info!(
        "[engine] стол {}: раздача {} завершена, банк {}",
        engine.table_id,
        engine.hand_id,
        total_pot
    );

    let mut results: Vec<PlayerHandResult> = table
        .seats
        .iter()
        .enumerate()
        .filter_map(|(idx, seat_opt)| {
            let p = seat_opt.as_ref()?;
            if p.hole_cards.is_empty() {
                return None; // не участвовал в раздаче
            }
            let seat = idx as SeatIndex;
            let won = won_by_seat.get(&seat).copied().unwrap_or(Chips::ZERO);
            Some(PlayerHandResult {
                player_id: p.player_id,
                rank: ranks.get(&seat).copied(),
                won,
                is_winner: !won.is_zero(),
            })
        })
        .collect();
    results.sort_by_key(|r| r.player_id);

    Ok(HandSummary {
        hand_id: engine.hand_id,
        table_id: engine.table_id,
        street_reached: table.street,
        board: table.board.clone(),
        total_pot,
        results,
        eliminated,
    })
}

/// Явная проверка сохранения фишек: стеки + нераспределённый банк
/// обязаны давать ровно столько, сколько фишек в игре.
pub fn check_chip_conservation(
    table: &Table,
    engine: &HandEngine,
    expected_total: Chips,
) -> Result<(), IntegrityError> {
    let actual = table.total_stacks() + engine.ledger.total();
    if actual != expected_total {
        return Err(IntegrityError::ChipConservationViolated {
            expected: expected_total.0,
            actual: actual.0,
        });
    }
    engine.ledger.check_integrity()
}
