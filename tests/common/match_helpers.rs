use reqwest::Client;
use serde_json::{json, Value};

use futbol5_backend::models::player::Player;

use super::utils::{TestApp, TestUser};

pub fn side(name: &str, slots: &[(&Player, i32)]) -> Value {
    json!({
        "team": name,
        "players": slots
            .iter()
            .map(|(p, goals)| json!({ "_id": p.id, "goals": goals }))
            .collect::<Vec<_>>()
    })
}

/// Creates a match through the admin endpoint and returns its number.
pub async fn create_match(
    app: &TestApp,
    admin: &TestUser,
    oscuras: &[(&Player, i32)],
    claras: &[(&Player, i32)],
) -> i64 {
    let response = Client::new()
        .post(app.url("/matches"))
        .header("Authorization", format!("Bearer {}", admin.token))
        .json(&json!({
            "date": "2024-05-04",
            "oscuras": side("oscuras", oscuras),
            "claras": side("claras", claras),
        }))
        .send()
        .await
        .expect("Failed to create match");

    assert_eq!(response.status(), 201, "Match creation should succeed");
    let body: Value = response.json().await.expect("Failed to parse match response");
    body["data"]["match_number"].as_i64().expect("No match number in response")
}

pub async fn get_match(app: &TestApp, match_number: i64) -> reqwest::Response {
    Client::new()
        .get(app.url(&format!("/matches/{}", match_number)))
        .send()
        .await
        .expect("Failed to fetch match")
}

pub async fn vote(app: &TestApp, user: &TestUser, match_number: i64, candidate: &Player) -> reqwest::Response {
    Client::new()
        .post(app.url(&format!("/matches/{}/vote", match_number)))
        .header("Authorization", format!("Bearer {}", user.token))
        .json(&json!({ "playerVotedFor": candidate.id }))
        .send()
        .await
        .expect("Failed to send vote")
}
