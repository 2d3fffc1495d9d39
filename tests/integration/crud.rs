//! CRUD Integration Tests
//!
//! Insert/query/update/delete through the public facade, with emphasis on
//! full-fidelity round trips across every field kind.

use crate::common::*;
use chrono::{Duration, TimeZone, Utc};
use objmap::{FieldValue, Order};
use rust_decimal::Decimal;

#[test]
fn full_round_trip_every_kind() {
    let m = mapper();
    let mut p = Player::sample("p1", "alice", "red", 5);
    p.grade = 'S';
    p.active = false;
    p.balance = Decimal::new(-99999, 3);
    p.playtime = Duration::microseconds(1_234_567);
    p.created_at = Utc.with_ymd_and_hms(1969, 12, 31, 23, 59, 59).unwrap();
    assert!(m.insert(&mut p).unwrap());

    let loaded: Player = m.query("p1").unwrap().unwrap();
    assert_eq!(loaded.name, "alice");
    assert_eq!(loaded.faction, "red");
    assert_eq!(loaded.star, 5);
    assert_eq!(loaded.score, 5.5);
    assert_eq!(loaded.level, 50);
    assert_eq!(loaded.grade, 'S');
    assert!(!loaded.active);
    assert_eq!(loaded.balance, Decimal::new(-99999, 3));
    assert_eq!(loaded.playtime, Duration::microseconds(1_234_567));
    assert_eq!(
        loaded.created_at,
        Utc.with_ymd_and_hms(1969, 12, 31, 23, 59, 59).unwrap()
    );
    let address: Address = serde_json::from_value(loaded.address.clone()).unwrap();
    assert_eq!(address, Address::sample());
}

#[test]
fn float_extremes_survive_round_trip() {
    let m = mapper();
    let mut p = Player::sample("p1", "alice", "red", 5);
    p.score = f64::MIN_POSITIVE;
    m.insert(&mut p).unwrap();

    let loaded: Player = m.query("p1").unwrap().unwrap();
    assert_eq!(loaded.score, f64::MIN_POSITIVE);

    let mut q = Player::sample("p2", "bob", "red", 5);
    q.score = -0.1 + 0.3; // value with no short decimal form
    m.insert(&mut q).unwrap();
    let loaded: Player = m.query("p2").unwrap().unwrap();
    assert_eq!(loaded.score, -0.1 + 0.3);
}

#[test]
fn query_absent_returns_none() {
    let m = mapper();
    assert!(m.query::<Player>("missing").unwrap().is_none());
}

#[test]
fn insert_same_id_twice_rejected() {
    let m = mapper();
    let mut first = Player::sample("p1", "alice", "red", 5);
    assert!(m.insert(&mut first).unwrap());

    let mut second = Player::sample("p1", "someone-else", "blue", 9);
    assert!(!m.insert(&mut second).unwrap());

    let loaded: Player = m.query("p1").unwrap().unwrap();
    assert_eq!(loaded.name, "alice");
}

#[test]
fn update_round_trips_through_store() {
    let m = seeded_mapper();
    let mut a: Player = m.query("a").unwrap().unwrap();
    a.set_grade('A');
    a.set_balance(Decimal::new(777, 1));
    a.set_address(serde_json::json!({"city": "Kyoto", "street": "x", "zip": 600}));
    assert!(m.update(&mut a).unwrap());

    let loaded: Player = m.query("a").unwrap().unwrap();
    assert_eq!(loaded.grade, 'A');
    assert_eq!(loaded.balance, Decimal::new(777, 1));
    assert_eq!(loaded.address["city"], "Kyoto");
    // Untouched fields unchanged.
    assert_eq!(loaded.name, "alice");
    assert_eq!(loaded.star, 5);
}

#[test]
fn delete_then_reinsert() {
    let m = mapper();
    let mut p = Player::sample("p1", "alice", "red", 5);
    m.insert(&mut p).unwrap();
    m.delete(&mut p).unwrap();
    assert!(m.query::<Player>("p1").unwrap().is_none());

    // The id, name, and ranking slots are all free again.
    let mut again = Player::sample("p1", "alice", "red", 7);
    assert!(m.insert(&mut again).unwrap());
    let loaded: Player = m.query("p1").unwrap().unwrap();
    assert_eq!(loaded.star, 7);
}

#[test]
fn delete_clears_entire_keyspace_footprint() {
    let m = mapper();
    let mut p = Player::sample("p1", "alice", "red", 5);
    m.insert(&mut p).unwrap();
    m.delete(&mut p).unwrap();
    assert_eq!(m.store().key_count(), 0);

    // Deleting again is a no-op.
    m.delete(&mut p).unwrap();
    assert_eq!(m.store().key_count(), 0);
}

#[test]
fn two_types_share_a_store_without_collisions() {
    let m = seeded_mapper();
    let mut post = Post::sample("a", "hello world", "alice", 3);
    assert!(m.insert(&mut post).unwrap());

    // Same id, different type: both primary records live side by side.
    let player: Player = m.query("a").unwrap().unwrap();
    let post: Post = m.query("a").unwrap().unwrap();
    assert_eq!(player.name, "alice");
    assert_eq!(post.title, "hello world");

    // Rankings are per type.
    let players = m
        .range_ids::<Player>(Player::FIELD_STAR, 0, -1, Order::Ascending)
        .unwrap();
    assert_eq!(players, ["a", "b", "c"]);
    let posts = m
        .range_ids::<Post>(Post::FIELD_LIKES, 0, -1, Order::Ascending)
        .unwrap();
    assert_eq!(posts, ["a"]);

    // Indexes too: "alice" is a Player name and a Post author.
    let by_author = m
        .index_ids::<Post>(Post::FIELD_AUTHOR, &FieldValue::from("alice"))
        .unwrap();
    assert_eq!(by_author, ["a"]);
}

#[test]
fn generated_ids_round_trip() {
    let m = mapper();
    let id = uuid::Uuid::new_v4().to_string();
    let mut p = Player::sample(&id, "alice", "red", 5);
    assert!(m.insert(&mut p).unwrap());

    let loaded: Player = m.query(&id).unwrap().unwrap();
    assert_eq!(loaded.name, "alice");
}

#[test]
fn bool_and_char_fields_are_stored_as_text() {
    let m = mapper();
    let mut p = Player::sample("p1", "alice", "red", 5);
    p.grade = '好';
    m.insert(&mut p).unwrap();

    let loaded: Player = m.query("p1").unwrap().unwrap();
    assert_eq!(loaded.grade, '好');
    assert!(loaded.active);
}
