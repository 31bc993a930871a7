//! Integration tests for bracket-server API

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use bracket_core::topology::game_count;
use bracket_core::{SelectionSet, NUM_ROUNDS};
use bracket_server::{create_router, ServerConfig, ServerState};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

fn test_app() -> Router {
    let config = ServerConfig::default();
    let state = Arc::new(ServerState::new());
    create_router(&config, state)
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => request
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap()
    };
    (status, json)
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Method::GET, uri, None).await
}

async fn post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, Method::POST, uri, Some(body)).await
}

/// Better seed wins every game
fn chalk_tokens() -> Vec<String> {
    let mut selection = SelectionSet::new();
    for round in 1..=NUM_ROUNDS as u8 {
        for index in 0..game_count(round) {
            let best = selection
                .options(round, index)
                .into_iter()
                .min_by_key(|t| t.seed);
            selection.set_pick(round, index, best).unwrap();
        }
    }
    selection
        .to_flat_picks()
        .into_iter()
        .map(|p| p.map(|t| t.to_string()).unwrap_or_default())
        .collect()
}

async fn register(app: &Router, name: &str) -> String {
    let (status, user) = post(app, "/api/users", json!({ "name": name })).await;
    assert_eq!(status, StatusCode::OK);
    user["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = test_app();
    let (status, json) = get(&app, "/api/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["ok"], true);
}

#[tokio::test]
async fn test_users_get_or_create() {
    let app = test_app();

    let (_, alice) = post(&app, "/api/users", json!({ "name": "Alice" })).await;
    let (_, bob) = post(&app, "/api/users", json!({ "name": "  Bob " })).await;
    let (_, again) = post(&app, "/api/users", json!({ "name": "Alice" })).await;

    assert_eq!(alice["id"], "1");
    assert_eq!(bob["id"], "2");
    assert_eq!(bob["name"], "Bob");
    assert_eq!(again["id"], alice["id"]);

    let (status, users) = get(&app, "/api/users").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(users.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_user_name_required() {
    let app = test_app();

    let (status, json) = post(&app, "/api/users", json!({ "name": "   " })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "name required");

    let (status, _) = post(&app, "/api/users", json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_submit_and_fetch_bracket() {
    let app = test_app();
    let user_id = register(&app, "Alice").await;

    let (status, bracket) = post(
        &app,
        "/api/brackets",
        json!({ "userId": user_id, "picks": chalk_tokens() }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(bracket["userId"], user_id.as_str());
    assert_eq!(bracket["picks"].as_array().unwrap().len(), 63);
    assert_eq!(bracket["picks"][62], "E1");

    let (status, fetched) = get(&app, &format!("/api/brackets/{}", user_id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["id"], bracket["id"]);

    // Resubmitting replaces the bracket in place
    let mut picks = chalk_tokens();
    picks[62] = String::new();
    let (status, replaced) = post(
        &app,
        "/api/brackets",
        json!({ "userId": user_id, "picks": picks }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(replaced["id"], bracket["id"]);
    assert_eq!(replaced["picks"][62], "");

    let (_, all) = get(&app, "/api/brackets").await;
    assert_eq!(all.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_submit_bracket_rejections() {
    let app = test_app();
    let user_id = register(&app, "Alice").await;

    let (status, json) = post(
        &app,
        "/api/brackets",
        json!({ "userId": user_id, "picks": ["E1"] }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("63"));

    let (status, _) = post(&app, "/api/brackets", json!({ "picks": chalk_tokens() })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = post(&app, "/api/brackets", json!({ "userId": user_id })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let mut picks = chalk_tokens();
    picks[0] = "Q7".to_string();
    let (status, _) = post(
        &app,
        "/api/brackets",
        json!({ "userId": user_id, "picks": picks }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = post(
        &app,
        "/api/brackets",
        json!({ "userId": "99", "picks": chalk_tokens() }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_missing_bracket_is_not_found() {
    let app = test_app();
    let user_id = register(&app, "Alice").await;

    let (status, json) = get(&app, &format!("/api/brackets/{}", user_id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(json["error"].as_str().unwrap().contains("No bracket"));
}

#[tokio::test]
async fn test_results_validation() {
    let app = test_app();

    let (status, json) = post(
        &app,
        "/api/results",
        json!({ "round": 7, "indexInRound": 0, "winner": "E1" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("round"));

    let (status, _) = post(
        &app,
        "/api/results",
        json!({ "round": 2, "indexInRound": 16, "winner": "E1" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = post(&app, "/api/results", json!({ "round": 1, "indexInRound": 0 })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, result) = post(
        &app,
        "/api/results",
        json!({ "round": 6, "indexInRound": 0, "winner": "S1" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["globalIndex"], 62);
}

#[tokio::test]
async fn test_record_overwrite_and_clear_result() {
    let app = test_app();

    post(
        &app,
        "/api/results",
        json!({ "round": 1, "indexInRound": 3, "winner": "E4" }),
    )
    .await;
    post(
        &app,
        "/api/results",
        json!({ "round": 1, "indexInRound": 3, "winner": "E13" }),
    )
    .await;

    let (_, results) = get(&app, "/api/results").await;
    let results = results.as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["winner"], "E13");

    let (status, json) = send(&app, Method::DELETE, "/api/results/3", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["cleared"], true);

    let (_, json) = send(&app, Method::DELETE, "/api/results/3", None).await;
    assert_eq!(json["cleared"], false);
}

#[tokio::test]
async fn test_leaderboard_and_review() {
    let app = test_app();
    let alice = register(&app, "alice").await;
    let bob = register(&app, "Bob").await;

    let chalk = chalk_tokens();
    post(&app, "/api/brackets", json!({ "userId": alice, "picks": chalk })).await;
    let mut upset = chalk_tokens();
    upset[0] = "E16".to_string();
    for slot in [32, 48, 56, 60, 62] {
        upset[slot] = String::new();
    }
    post(&app, "/api/brackets", json!({ "userId": bob, "picks": upset })).await;

    // Chalk wins the first two games
    post(
        &app,
        "/api/results",
        json!({ "round": 1, "indexInRound": 0, "winner": "E1" }),
    )
    .await;
    post(
        &app,
        "/api/results",
        json!({ "round": 1, "indexInRound": 1, "winner": "E8" }),
    )
    .await;

    let (status, board) = get(&app, "/api/leaderboard").await;
    assert_eq!(status, StatusCode::OK);
    let rows = board.as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["name"], "alice");
    assert_eq!(rows[0]["total"], 2);
    assert_eq!(rows[0]["perRound"][0], 2);
    assert_eq!(rows[1]["name"], "Bob");
    assert_eq!(rows[1]["total"], 1);

    let (status, review) = get(&app, &format!("/api/brackets/{}/review", bob)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(review["total"], 1);
    let games = review["games"].as_array().unwrap();
    assert_eq!(games.len(), 63);
    assert_eq!(games[0]["status"], "incorrect");
    assert_eq!(games[1]["status"], "correct");
    assert_eq!(games[2]["status"], "pending");
}

#[tokio::test]
async fn test_options_and_pick() {
    let app = test_app();

    let (status, json) = post(
        &app,
        "/api/bracket/options",
        json!({ "round": 1, "indexInRound": 4 }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["options"], json!(["E6", "E11"]));
    assert_eq!(json["current"], Value::Null);

    // Round 2 has no options until both feeders are picked
    let (_, json) = post(
        &app,
        "/api/bracket/options",
        json!({ "round": 2, "indexInRound": 0 }),
    )
    .await;
    assert_eq!(json["options"], json!([]));

    // Changing a round-1 pick clears every later round
    let (status, json) = post(
        &app,
        "/api/bracket/pick",
        json!({ "picks": chalk_tokens(), "round": 1, "indexInRound": 0, "team": "E16" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["changed"], true);
    assert_eq!(json["cleared"].as_array().unwrap().len(), 31);
    assert_eq!(json["cleared"][0], 32);
    assert_eq!(json["picks"][0], "E16");
    assert_eq!(json["picks"][1], "E8");
    assert_eq!(json["picks"][40], "");

    // Re-applying the same pick changes nothing
    let (_, again) = post(
        &app,
        "/api/bracket/pick",
        json!({ "picks": json["picks"], "round": 1, "indexInRound": 0, "team": "E16" }),
    )
    .await;
    assert_eq!(again["changed"], false);
    assert_eq!(again["cleared"], json!([]));

    let (status, _) = post(
        &app,
        "/api/bracket/pick",
        json!({ "round": 2, "indexInRound": 0, "team": "E1" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_random_bracket_is_complete_and_seeded() {
    let app = test_app();

    let (status, first) = post(&app, "/api/bracket/random", json!({ "seed": 7 })).await;
    assert_eq!(status, StatusCode::OK);
    let (_, second) = post(&app, "/api/bracket/random", json!({ "seed": 7 })).await;

    let picks = first["picks"].as_array().unwrap();
    assert_eq!(picks.len(), 63);
    assert!(picks.iter().all(|p| !p.as_str().unwrap().is_empty()));
    assert_eq!(first["champion"], first["picks"][62]);
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_topology_endpoint() {
    let app = test_app();
    let (status, json) = get(&app, "/api/topology").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["totalGames"], 63);
    assert_eq!(json["rounds"].as_array().unwrap().len(), 6);
    assert_eq!(json["rounds"][5]["weight"], 32);
    assert_eq!(json["round1"][0], json!(["E1", "E16"]));
}

#[tokio::test]
async fn test_simulate_endpoint() {
    let app = test_app();

    let (status, json) = post(&app, "/api/simulate", json!({ "sims": 500, "seed": 1 })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["sims"], 500);
    assert_eq!(json["round1Probs"].as_array().unwrap().len(), 32);
    assert_eq!(json["mostLikely"][62].as_str().unwrap().len(), 2);

    let total: f64 = json["championProbs"]
        .as_object()
        .unwrap()
        .values()
        .map(|v| v.as_f64().unwrap())
        .sum();
    assert!((total - 1.0).abs() < 0.01);

    let (status, _) = post(&app, "/api/simulate", json!({ "sims": 1_000_000 })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
