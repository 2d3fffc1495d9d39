//! Ranking Integration Tests
//!
//! Range, range-by-score, rank, and count over sortable fields, in both
//! orders, including rescoring on update and removal on delete.

use crate::common::*;
use objmap::{Error, Order};

// Seeded stars: a=5, b=6, c=8.

#[test]
fn range_walks_in_score_order() {
    let m = seeded_mapper();
    let asc = m
        .range_ids::<Player>(Player::FIELD_STAR, 0, -1, Order::Ascending)
        .unwrap();
    assert_eq!(asc, ["a", "b", "c"]);

    let desc = m
        .range_ids::<Player>(Player::FIELD_STAR, 0, -1, Order::Descending)
        .unwrap();
    assert_eq!(desc, ["c", "b", "a"]);
}

#[test]
fn range_hydrates_entities_lazily() {
    let m = seeded_mapper();
    let players: Vec<Player> = m
        .range(Player::FIELD_STAR, 0, 1, Order::Descending)
        .unwrap()
        .collect::<objmap::Result<_>>()
        .unwrap();
    let names: Vec<_> = players.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["carol", "bob"]);
}

#[test]
fn negative_indices_take_the_tail() {
    let m = seeded_mapper();
    let tail = m
        .range_ids::<Player>(Player::FIELD_STAR, -2, -1, Order::Ascending)
        .unwrap();
    assert_eq!(tail, ["b", "c"]);

    let out_of_bounds = m
        .range_ids::<Player>(Player::FIELD_STAR, 5, 9, Order::Ascending)
        .unwrap();
    assert!(out_of_bounds.is_empty());
}

#[test]
fn rank_is_zero_based_in_both_orders() {
    let m = seeded_mapper();
    let a: Player = m.query("a").unwrap().unwrap();
    let b: Player = m.query("b").unwrap().unwrap();
    let c: Player = m.query("c").unwrap().unwrap();

    assert_eq!(m.rank(&a, Player::FIELD_STAR, Order::Ascending).unwrap(), Some(0));
    assert_eq!(m.rank(&b, Player::FIELD_STAR, Order::Ascending).unwrap(), Some(1));
    assert_eq!(m.rank(&c, Player::FIELD_STAR, Order::Ascending).unwrap(), Some(2));
    assert_eq!(m.rank(&c, Player::FIELD_STAR, Order::Descending).unwrap(), Some(0));
    assert_eq!(m.rank(&a, Player::FIELD_STAR, Order::Descending).unwrap(), Some(2));
}

#[test]
fn count_uses_inclusive_bounds() {
    let m = seeded_mapper();
    assert_eq!(m.count::<Player>(Player::FIELD_STAR, 6.0, 8.0).unwrap(), 2);
    assert_eq!(m.count::<Player>(Player::FIELD_STAR, 5.0, 8.0).unwrap(), 3);
    assert_eq!(m.count::<Player>(Player::FIELD_STAR, 6.5, 7.9).unwrap(), 0);
    assert_eq!(
        m.count::<Player>(Player::FIELD_STAR, f64::NEG_INFINITY, f64::INFINITY)
            .unwrap(),
        3
    );
}

#[test]
fn range_by_score_selects_the_window() {
    let m = seeded_mapper();
    let ids = m
        .range_by_score_ids::<Player>(Player::FIELD_STAR, 6.0, 8.0, Order::Ascending)
        .unwrap();
    assert_eq!(ids, ["b", "c"]);

    let players: Vec<Player> = m
        .range_by_score(Player::FIELD_STAR, 0.0, 5.0, Order::Ascending)
        .unwrap()
        .collect::<objmap::Result<_>>()
        .unwrap();
    assert_eq!(players.len(), 1);
    assert_eq!(players[0].name, "alice");
}

#[test]
fn float_ranking_orders_independently() {
    // Score is star + 0.5, so the float ranking mirrors the int one until
    // someone's score is changed on its own.
    let m = seeded_mapper();
    let mut a: Player = m.query("a").unwrap().unwrap();
    a.set_score(100.25);
    m.update(&mut a).unwrap();

    let by_score = m
        .range_ids::<Player>(Player::FIELD_SCORE, 0, -1, Order::Ascending)
        .unwrap();
    assert_eq!(by_score, ["b", "c", "a"]);
    // Star ranking unaffected.
    let by_star = m
        .range_ids::<Player>(Player::FIELD_STAR, 0, -1, Order::Ascending)
        .unwrap();
    assert_eq!(by_star, ["a", "b", "c"]);
}

#[test]
fn update_rescoring_moves_rank() {
    let m = seeded_mapper();
    let mut a: Player = m.query("a").unwrap().unwrap();
    a.set_star(7);
    m.update(&mut a).unwrap();

    let asc = m
        .range_ids::<Player>(Player::FIELD_STAR, 0, -1, Order::Ascending)
        .unwrap();
    assert_eq!(asc, ["b", "a", "c"]);
    assert_eq!(m.rank(&a, Player::FIELD_STAR, Order::Ascending).unwrap(), Some(1));
}

#[test]
fn delete_drops_out_of_the_ranking() {
    let m = seeded_mapper();
    let mut b: Player = m.query("b").unwrap().unwrap();
    m.delete(&mut b).unwrap();

    let asc = m
        .range_ids::<Player>(Player::FIELD_STAR, 0, -1, Order::Ascending)
        .unwrap();
    assert_eq!(asc, ["a", "c"]);
    assert_eq!(m.rank(&b, Player::FIELD_STAR, Order::Ascending).unwrap(), None);
    assert_eq!(m.count::<Player>(Player::FIELD_STAR, 6.0, 8.0).unwrap(), 1);
}

#[test]
fn equal_scores_tie_break_deterministically() {
    let m = mapper();
    for (id, name) in [("y", "yuki"), ("x", "xena")] {
        let mut p = Player::sample(id, name, "red", 5);
        m.insert(&mut p).unwrap();
    }
    // Ties order by member id, both directions consistent.
    let asc = m
        .range_ids::<Player>(Player::FIELD_STAR, 0, -1, Order::Ascending)
        .unwrap();
    assert_eq!(asc, ["x", "y"]);
    let desc = m
        .range_ids::<Player>(Player::FIELD_STAR, 0, -1, Order::Descending)
        .unwrap();
    assert_eq!(desc, ["y", "x"]);
}

#[test]
fn ranking_ops_reject_unsortable_fields() {
    let m = seeded_mapper();
    assert!(matches!(
        m.range_ids::<Player>(Player::FIELD_NAME, 0, -1, Order::Ascending),
        Err(Error::NotSortableField { .. })
    ));
    assert!(matches!(
        m.count::<Player>(Player::FIELD_BALANCE, 0.0, 1.0),
        Err(Error::NotSortableField { .. })
    ));
    let a: Player = m.query("a").unwrap().unwrap();
    assert!(matches!(
        m.rank(&a, Player::FIELD_FACTION, Order::Ascending),
        Err(Error::NotSortableField { .. })
    ));
}

#[test]
fn empty_ranking_yields_empty_results() {
    let m = mapper();
    assert!(m
        .range_ids::<Player>(Player::FIELD_STAR, 0, -1, Order::Ascending)
        .unwrap()
        .is_empty());
    assert_eq!(m.count::<Player>(Player::FIELD_STAR, 0.0, 100.0).unwrap(), 0);
}
