//! Integration tests for the card catalog routes.

mod common;

use axum::http::StatusCode;
use sqlx::PgPool;
use uuid::Uuid;

fn fireball(name: &str, cost: i64) -> serde_json::Value {
    serde_json::json!({
        "name": name,
        "cost": cost,
        "faction": "Ember",
        "category": "Spell",
        "sub_category": "Evocation",
        "description": "Deal damage to a target."
    })
}

fn card_id_of(json: &serde_json::Value) -> Uuid {
    json["card_id"].as_str().unwrap().parse().unwrap()
}

#[tokio::test]
async fn test_card_create_update_and_search_round_trip() {
    // Step 1: create
    let (app, store) = common::build_in_memory_app();
    let (status, json) = common::post_json(app, "/api/v1/cards", &fireball("Fireball", 3)).await;
    assert_eq!(status, StatusCode::OK);
    let card_id = card_id_of(&json);

    let (status, json) =
        common::get_json(common::app_for(&store), &format!("/api/v1/cards/{card_id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["name"], "Fireball");
    assert_eq!(json["cost"], 3);

    // Step 2: update keeps the id
    let (status, json) = common::put_json(
        common::app_for(&store),
        &format!("/api/v1/cards/{card_id}"),
        &fireball("Fireball II", 4),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["card_id"], card_id.to_string());
    assert_eq!(json["name"], "Fireball II");
    assert_eq!(json["cost"], 4);

    // Step 3: search sees only the current state
    let (status, json) = common::get_json(common::app_for(&store), "/api/v1/cards?cost=4").await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|card| card["card_id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec![card_id.to_string()]);

    let (_, json) = common::get_json(common::app_for(&store), "/api/v1/cards?cost=3").await;
    assert!(json.as_array().unwrap().is_empty());

    assert_eq!(store.history(card_id).unwrap().len(), 2);
}

#[tokio::test]
async fn test_get_unknown_card_returns_404() {
    let (app, _store) = common::build_in_memory_app();

    let (status, json) =
        common::get_json(app, &format!("/api/v1/cards/{}", Uuid::new_v4())).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "card_not_found");
}

#[tokio::test]
async fn test_update_unknown_card_returns_404_and_stores_nothing() {
    let (app, store) = common::build_in_memory_app();
    let card_id = Uuid::new_v4();

    let (status, json) = common::put_json(
        app,
        &format!("/api/v1/cards/{card_id}"),
        &fireball("Ghost", 1),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "card_not_found");
    assert!(store.history(card_id).unwrap().is_empty());
}

#[tokio::test]
async fn test_search_filters_combine_and_keep_creation_order() {
    let (_, store) = common::build_in_memory_app();
    let bodies = [
        serde_json::json!({ "name": "Spark", "cost": 1, "faction": "Ember", "category": "Spell" }),
        serde_json::json!({ "name": "Wall", "cost": 1, "faction": "Stone", "category": "Spell" }),
        serde_json::json!({ "name": "Imp", "cost": 1, "faction": "Ember", "category": "Unit" }),
        serde_json::json!({ "name": "Blaze", "cost": 1, "faction": "Ember", "category": "Spell" }),
    ];
    for body in &bodies {
        let (status, _) = common::post_json(common::app_for(&store), "/api/v1/cards", body).await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, json) = common::get_json(
        common::app_for(&store),
        "/api/v1/cards?faction=Ember&category=Spell&name=",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|card| card["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Spark", "Blaze"]);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_card_round_trip_against_postgres(pool: PgPool) {
    // POST /api/v1/cards
    let app = common::build_test_app(pool.clone());
    let (status, json) = common::post_json(app, "/api/v1/cards", &fireball("Fireball", 3)).await;
    assert_eq!(status, StatusCode::OK);
    let card_id = card_id_of(&json);

    // PUT /api/v1/cards/{card_id}
    let app = common::build_test_app(pool.clone());
    let (status, _) = common::put_json(
        app,
        &format!("/api/v1/cards/{card_id}"),
        &fireball("Fireball II", 4),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // GET through a fresh cache so the state is replayed from the log
    let app = common::build_test_app(pool.clone());
    let (status, json) = common::get_json(app, &format!("/api/v1/cards/{card_id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["name"], "Fireball II");
    assert_eq!(json["cost"], 4);

    let kinds: Vec<(String,)> = sqlx::query_as(
        "SELECT event_kind FROM card_events WHERE aggregate_id = $1 ORDER BY sequence_id",
    )
    .bind(card_id)
    .fetch_all(&pool)
    .await
    .unwrap();
    let kinds: Vec<&str> = kinds.iter().map(|(k,)| k.as_str()).collect();
    assert_eq!(kinds, vec!["card.CardCreated", "card.CardUpdated"]);
}
