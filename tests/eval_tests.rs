//! Тесты оценщика рук: фиксированные комбинации, total order категорий,
//! точные тай-брейки, ошибки размера руки, мемо-кэш.

use holdem_engine::domain::card::{Card, Rank};
use holdem_engine::eval::{
    cache::canonical_key, evaluate_best_hand, EvalCache, EvalError, HandCategory,
};

fn c(s: &str) -> Card {
    s.parse().expect("валидная карта")
}

fn cards(s: &str) -> Vec<Card> {
    s.split_whitespace().map(c).collect()
}

fn eval(hole: &str, board: &str) -> holdem_engine::domain::hand::HandRank {
    evaluate_best_hand(&cards(hole), &cards(board)).expect("валидный размер руки")
}

//
// ====================== ФИКСИРОВАННЫЕ КОМБИНАЦИИ ======================
//

/// Роял-флеш: TJh + QKAh на борде.
#[test]
fn royal_flush_is_detected_as_top_category() {
    let rank = eval("Th Jh", "Qh Kh Ah 2d 7c");
    assert_eq!(rank.category(), HandCategory::RoyalFlush);
    assert_eq!(
        rank.ranks(),
        [Rank::Ace, Rank::King, Rank::Queen, Rank::Jack, Rank::Ten]
    );
}

/// Колесо (A2345): туз работает как единица, старшая карта — пятёрка.
#[test]
fn wheel_straight_counts_ace_as_low() {
    let rank = eval("As 2s", "3s 4s 5h 9c Kd");
    assert_eq!(rank.category(), HandCategory::Straight);
    assert_eq!(
        rank.ranks(),
        [Rank::Five, Rank::Four, Rank::Three, Rank::Two, Rank::Ace]
    );
}

/// Каре семёрок с кикером K.
#[test]
fn four_of_a_kind_with_best_kicker() {
    let rank = eval("7c 7d", "7h 7s 2c 9d Kh");
    assert_eq!(rank.category(), HandCategory::FourOfAKind);
    let ranks = rank.ranks();
    assert_eq!(ranks[0], Rank::Seven);
    assert_eq!(ranks[1], Rank::King);
}

/// Стрит-флеш (не роял) выше каре.
#[test]
fn straight_flush_beats_four_of_a_kind() {
    let sf = eval("5h 6h", "7h 8h 9h Ad Ac");
    assert_eq!(sf.category(), HandCategory::StraightFlush);

    let quads = eval("Ac Ad", "Ah As Kc Qd 2h");
    assert_eq!(quads.category(), HandCategory::FourOfAKind);

    assert!(sf > quads, "стрит-флеш обязан бить каре");
}

/// Фулл-хаус: приоритет у номинала тройки.
#[test]
fn full_house_trips_rank_dominates_pair_rank() {
    // Тройка королей + пара двоек против тройки дам + пары тузов.
    let kings_full = eval("Kc Kd", "Kh 2c 2d 7s 9h");
    let queens_full = eval("Qc Qd", "Qh Ac Ad 7s 9h");

    assert_eq!(kings_full.category(), HandCategory::FullHouse);
    assert_eq!(queens_full.category(), HandCategory::FullHouse);
    assert!(
        kings_full > queens_full,
        "KKK22 сильнее QQQAA: сравниваем сначала номинал тройки"
    );
}

//
// ====================== TOTAL ORDER КАТЕГОРИЙ ======================
//

/// Доминирование категории не перебивается кикерами:
/// худший флеш сильнее лучшего стрита.
#[test]
fn any_flush_beats_any_straight() {
    let weakest_flush = eval("2h 3h", "4h 5h 7h Ks Qd"); // 7-high flush
    let broadway = eval("Ts Jd", "Qc Kd Ah 2s 3c"); // лучший стрит

    assert_eq!(weakest_flush.category(), HandCategory::Flush);
    assert_eq!(broadway.category(), HandCategory::Straight);
    assert!(weakest_flush > broadway);
}

/// Вся лестница категорий строго возрастает.
#[test]
fn category_ladder_is_strictly_increasing() {
    let ladder = [
        eval("2c 7d", "9h Js 4c Kd 8s"),  // high card
        eval("2c 2d", "9h Js 4c Kd 8s"),  // one pair
        eval("2c 2d", "9h 9s 4c Kd 8s"),  // two pair
        eval("2c 2d", "2h Js 4c Kd 8s"),  // trips
        eval("5c 6d", "7h 8s 9c Kd 2s"),  // straight
        eval("2h 7h", "9h Jh 4h Kd 8s"),  // flush
        eval("2c 2d", "2h Js 4c Jd 8s"),  // full house
        eval("2c 2d", "2h 2s 4c Kd 8s"),  // quads
        eval("5h 6h", "7h 8h 9h Kd 2s"),  // straight flush
        eval("Th Jh", "Qh Kh Ah 2d 7c"),  // royal flush
    ];

    for pair in ladder.windows(2) {
        assert!(
            pair[0] < pair[1],
            "категории обязаны строго возрастать: {:?} < {:?}",
            pair[0].category(),
            pair[1].category()
        );
    }
}

/// Одинаковые по силе руки в разных мастях — точный сплит.
#[test]
fn equal_hands_tie_exactly() {
    let board = "2c 7d 9h Js Kd";
    let a = eval("Ah Qc", board);
    let b = eval("As Qd", board);
    assert_eq!(a, b, "одинаковые ранги в разных мастях — точная ничья");
}

//
// ====================== ЧАСТИЧНЫЕ РУКИ И ОШИБКИ ======================
//

/// Оценка только карманных карт (борда ещё нет).
#[test]
fn preflop_hole_cards_evaluate_as_partial_hand() {
    let pair = evaluate_best_hand(&cards("Ah Ad"), &[]).unwrap();
    assert_eq!(pair.category(), HandCategory::OnePair);

    let high = evaluate_best_hand(&cards("Ah Kd"), &[]).unwrap();
    assert_eq!(high.category(), HandCategory::HighCard);

    assert!(pair > high);
}

#[test]
fn invalid_hand_sizes_are_rejected() {
    // Одна карманная карта.
    let err = evaluate_best_hand(&cards("Ah"), &cards("2c 3c 4c")).unwrap_err();
    assert_eq!(err, EvalError::InvalidHandSize { hole: 1, total: 4 });

    // Больше 7 карт суммарно.
    let err = evaluate_best_hand(&cards("Ah Ad"), &cards("2c 3c 4c 5c 6c 7c")).unwrap_err();
    assert_eq!(err, EvalError::InvalidHandSize { hole: 2, total: 8 });

    // Ноль карманных.
    assert!(evaluate_best_hand(&[], &cards("2c 3c 4c 5c 6c")).is_err());
}

//
// ====================== МЕМО-КЭШ ======================
//

#[test]
fn cache_key_ignores_card_order() {
    let k1 = canonical_key(&cards("Ah Kd"), &cards("2c 3c 4c"));
    let k2 = canonical_key(&cards("Kd Ah"), &cards("4c 2c 3c"));
    assert_eq!(k1, k2);

    let k3 = canonical_key(&cards("Ah Kd"), &cards("2c 3c 5c"));
    assert_ne!(k1, k3);
}

#[test]
fn cache_returns_same_rank_and_inserts_once() {
    let mut cache = EvalCache::new();
    let hole = cards("7c 7d");
    let board = cards("7h 7s 2c 9d Kh");

    let direct = evaluate_best_hand(&hole, &board).unwrap();
    let first = cache.evaluate(&hole, &board).unwrap();
    let second = cache.evaluate(&hole, &board).unwrap();

    assert_eq!(first, direct);
    assert_eq!(second, direct);
    assert_eq!(cache.len(), 1, "повторная оценка не создаёт новых записей");

    cache.clear();
    assert!(cache.is_empty());
}
