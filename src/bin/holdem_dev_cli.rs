//! Dev CLI: гоняет одностоловый sit&go с ботами-колл-станциями.
//!
//! Запуск:
//!     holdem_dev_cli [seed] [players]
//!
//! Это смоук-драйвер движка, не продуктовый UI: боты всегда
//! уравнивают/чекают, блайнды растут, турнир доигрывается до победителя.

use holdem_engine::domain::blinds::BlindStructure;
use holdem_engine::domain::chips::Chips;
use holdem_engine::domain::tournament::{Tournament, TournamentConfig};
use holdem_engine::engine::{apply_action, start_hand, HandStatus, PlayerAction, PlayerActionKind};
use holdem_engine::eval::describe_hand;
use holdem_engine::infra::rng_seed::RngSeed;
use holdem_engine::tournament::TournamentRuntime;

fn main() {
    env_logger::init();

    let seed: u64 = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(42);
    let players: u64 = std::env::args()
        .nth(2)
        .and_then(|s| s.parse().ok())
        .unwrap_or(4)
        .clamp(2, 9);

    let config = TournamentConfig {
        name: format!("Dev Sit&Go (seed {seed})"),
        description: None,
        starting_stack: Chips::new(5_000),
        max_players: players as u32,
        min_players_to_start: 2,
        blind_structure: BlindStructure::simple_demo_structure(),
        payout_percents: if players >= 3 { vec![70, 30] } else { vec![100] },
    };

    let mut tournament = Tournament::new(1, config).expect("валидный dev-конфиг");
    for pid in 1..=players {
        tournament
            .register_player(pid)
            .expect("регистрация в пустой турнир");
    }

    let mut runtime = TournamentRuntime::new(tournament, 1).expect("есть игроки");
    let mut now_ts: u64 = 1_000_000;
    runtime.start(now_ts).expect("старт по минимуму игроков");

    println!("=== {} ===", runtime.tournament.config.name);

    let base_seed = RngSeed::from_u64(seed);
    let mut hands = 0u64;

    while !runtime.is_finished() && hands < 10_000 {
        runtime.on_time_tick(now_ts);

        let hand_id = runtime.next_hand_id();
        let mut rng = base_seed.derive(runtime.table.id, hand_id, hands).to_rng();

        let mut engine = match start_hand(&mut runtime.table, &mut rng, hand_id) {
            Ok(engine) => engine,
            Err(e) => {
                println!("start_hand: {e}");
                break;
            }
        };

        // Боты: call, если есть что уравнивать, иначе check.
        let summary = loop {
            let Some(seat) = engine.current_actor else {
                // Все в олл-ине с блайндов — добегаем борд.
                match holdem_engine::engine::advance_if_needed(&mut runtime.table, &mut engine) {
                    Ok(HandStatus::Finished(summary, _)) => break summary,
                    Ok(HandStatus::Ongoing) => continue,
                    Err(e) => panic!("advance: {e}"),
                }
            };

            let (player_id, to_call) = {
                let p = runtime.table.seats[seat as usize]
                    .as_ref()
                    .expect("актёр сидит за столом");
                (
                    p.player_id,
                    engine.betting.current_bet.saturating_sub(p.current_bet),
                )
            };

            let kind = if to_call.is_zero() {
                PlayerActionKind::Check
            } else {
                PlayerActionKind::Call
            };

            match apply_action(
                &mut runtime.table,
                &mut engine,
                PlayerAction {
                    player_id,
                    seat,
                    kind,
                },
            ) {
                Ok(HandStatus::Ongoing) => {}
                Ok(HandStatus::Finished(summary, _)) => break summary,
                Err(e) => panic!("apply_action: {e}"),
            }
        };

        hands += 1;
        now_ts += 60; // одна раздача ~ минута, блайнды растут по расписанию

        for r in &summary.results {
            if r.is_winner {
                let hand_desc = r
                    .rank
                    .map(describe_hand)
                    .unwrap_or_else(|| "без шоудауна".to_string());
                println!(
                    "Раздача {:>3}: игрок {} забрал {} ({})",
                    summary.hand_id, r.player_id, r.won, hand_desc
                );
            }
        }

        let placed = runtime
            .on_hand_finished(&summary)
            .expect("вылеты согласованы с турниром");
        for (pid, place) in placed {
            println!("  -- игрок {pid} вылетел, место {place}");
        }
    }

    println!("Раздач сыграно: {hands}");
    if let Some(winner) = runtime.winner() {
        println!("Победитель: игрок {winner}");
        let pool = Chips(runtime.tournament.total_entries as u64 * 5_000);
        match runtime.payouts(pool) {
            Ok(payouts) => {
                for p in payouts {
                    println!("  место {}: игрок {} — {}", p.place, p.player_id, p.amount);
                }
            }
            Err(e) => println!("payouts: {e}"),
        }
    }
}
