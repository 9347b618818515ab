use reqwest::Client;
use serde_json::{json, Value};

mod common;
use common::match_helpers::{create_match, get_match, side, vote};
use common::utils::spawn_app;
use futbol5_backend::models::player::{Player, PlayerId};

#[tokio::test]
async fn created_match_reports_result_and_side_percentages() {
    let app = spawn_app().await;
    app.seed_tournament("Apertura").await;
    let p = app.seed_players(&["Ana", "Beto", "Ciro", "Dani"]).await;
    let admin = app.admin();

    let first = create_match(&app, &admin, &[(&p[0], 2), (&p[1], 0)], &[(&p[2], 1), (&p[3], 0)]).await;
    let second = create_match(&app, &admin, &[(&p[0], 0)], &[(&p[2], 0)]).await;
    assert_eq!((first, second), (1, 2));

    let detail: Value = get_match(&app, first).await.json().await.unwrap();
    assert_eq!(detail["result"], "oscuras");
    assert_eq!(detail["match"]["oscuras"]["players"][0]["goals"], 2);

    // Ana won then drew, Beto won, Ciro lost then drew, Dani lost.
    let sums = &detail["team_percentages"];
    let expected_oscuras = 4.0 / 6.0 * 100.0 + 100.0;
    let expected_claras = 1.0 / 6.0 * 100.0;
    assert!((sums["oscuras"].as_f64().unwrap() - expected_oscuras).abs() < 1e-6);
    assert!((sums["claras"].as_f64().unwrap() - expected_claras).abs() < 1e-6);
    assert!(
        (detail["team_percentage_averages"]["oscuras"].as_f64().unwrap() - expected_oscuras / 2.0).abs() < 1e-6
    );
}

#[tokio::test]
async fn listing_and_latest_follow_live_matches() {
    let app = spawn_app().await;
    app.seed_tournament("Apertura").await;
    let p = app.seed_players(&["Ana", "Beto"]).await;
    let admin = app.admin();
    let client = Client::new();

    let latest: Value = client.get(app.url("/matches/latest")).send().await.unwrap().json().await.unwrap();
    assert_eq!(latest["match_number"], Value::Null);

    create_match(&app, &admin, &[(&p[0], 0)], &[(&p[1], 0)]).await;
    create_match(&app, &admin, &[(&p[0], 0)], &[(&p[1], 3)]).await;

    let listing: Value = client.get(app.url("/matches")).send().await.unwrap().json().await.unwrap();
    let listing = listing.as_array().unwrap();
    assert_eq!(listing.len(), 2);
    assert_eq!(listing[0]["result"], "draw");
    assert_eq!(listing[1]["result"], "claras");
    assert_eq!(listing[1]["claras_goals"], 3);

    let latest: Value = client.get(app.url("/matches/latest")).send().await.unwrap().json().await.unwrap();
    assert_eq!(latest["match_number"], 2);
}

#[tokio::test]
async fn only_admins_can_create_matches() {
    let app = spawn_app().await;
    app.seed_tournament("Apertura").await;
    let p = app.seed_players(&["Ana", "Beto"]).await;
    let body = json!({
        "oscuras": side("oscuras", &[(&p[0], 0)]),
        "claras": side("claras", &[(&p[1], 0)]),
    });
    let client = Client::new();

    let anonymous = client.post(app.url("/matches")).json(&body).send().await.unwrap();
    assert_eq!(anonymous.status(), 401);

    let regular = client
        .post(app.url("/matches"))
        .header("Authorization", format!("Bearer {}", app.user("Diego").token))
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(regular.status(), 403);
}

#[tokio::test]
async fn saving_a_roster_overwrites_both_sides() {
    let app = spawn_app().await;
    app.seed_tournament("Apertura").await;
    let p = app.seed_players(&["Ana", "Beto", "Ciro"]).await;
    let admin = app.admin();
    let number = create_match(&app, &admin, &[(&p[0], 0)], &[(&p[1], 0)]).await;

    let response = Client::new()
        .put(app.url(&format!("/matches/{}", number)))
        .header("Authorization", format!("Bearer {}", admin.token))
        .json(&json!({
            "oscuras": side("oscuras", &[(&p[0], 3)]),
            "claras": side("claras", &[(&p[2], 1), (&p[1], 0)]),
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let detail: Value = get_match(&app, number).await.json().await.unwrap();
    let claras = detail["match"]["claras"]["players"].as_array().unwrap();
    assert_eq!(claras.len(), 2);
    assert_eq!(claras[0]["player_id"], json!(p[2].id));
    assert_eq!(claras[0]["goals"], 1);
    assert_eq!(detail["match"]["oscuras"]["players"][0]["goals"], 3);
    assert_eq!(detail["result"], "oscuras");
}

#[tokio::test]
async fn invalid_rosters_are_rejected_and_not_persisted() {
    let app = spawn_app().await;
    app.seed_tournament("Apertura").await;
    let p = app.seed_players(&["Ana", "Beto"]).await;
    let admin = app.admin();
    let number = create_match(&app, &admin, &[(&p[0], 1)], &[(&p[1], 0)]).await;
    let client = Client::new();

    let stranger = Player { id: PlayerId::new(), name: "Nadie".to_string() };
    let invalid = [
        json!({ "oscuras": side("oscuras", &[(&p[0], 1)]), "claras": side("claras", &[(&p[0], 0)]) }),
        json!({ "oscuras": side("oscuras", &[(&p[0], -1)]), "claras": side("claras", &[(&p[1], 0)]) }),
        json!({ "oscuras": side("claras", &[(&p[0], 1)]), "claras": side("claras", &[(&p[1], 0)]) }),
        json!({ "oscuras": side("oscuras", &[(&p[0], i32::MAX)]), "claras": side("claras", &[(&p[1], 1)]) }),
        json!({ "oscuras": side("oscuras", &[(&p[0], 1)]), "claras": side("claras", &[(&stranger, 0)]) }),
    ];
    for body in invalid {
        let response = client
            .put(app.url(&format!("/matches/{}", number)))
            .header("Authorization", format!("Bearer {}", admin.token))
            .json(&body)
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 400, "roster {} should be rejected", body);
    }

    let detail: Value = get_match(&app, number).await.json().await.unwrap();
    assert_eq!(detail["match"]["oscuras"]["players"][0]["goals"], 1);
    assert_eq!(detail["match"]["claras"]["players"][0]["player_id"], json!(p[1].id));
}

#[tokio::test]
async fn saving_roster_of_missing_match_is_not_found() {
    let app = spawn_app().await;
    app.seed_tournament("Apertura").await;
    let p = app.seed_players(&["Ana", "Beto"]).await;
    let admin = app.admin();

    let response = Client::new()
        .put(app.url("/matches/7"))
        .header("Authorization", format!("Bearer {}", admin.token))
        .json(&json!({ "oscuras": side("oscuras", &[(&p[0], 0)]), "claras": side("claras", &[(&p[1], 0)]) }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn deleting_a_played_match_needs_confirmation() {
    let app = spawn_app().await;
    app.seed_tournament("Apertura").await;
    let p = app.seed_players(&["Ana", "Beto"]).await;
    let admin = app.admin();
    let number = create_match(&app, &admin, &[(&p[0], 2)], &[(&p[1], 0)]).await;
    let client = Client::new();
    let delete = |query: &str| {
        client
            .delete(app.url(&format!("/matches/{}{}", number, query)))
            .header("Authorization", format!("Bearer {}", admin.token))
            .send()
    };

    let unconfirmed = delete("").await.unwrap();
    assert_eq!(unconfirmed.status(), 409);
    assert_eq!(get_match(&app, number).await.status(), 200);

    let confirmed = delete("?confirm=true").await.unwrap();
    assert_eq!(confirmed.status(), 200);

    assert_eq!(get_match(&app, number).await.status(), 404);
    assert_eq!(delete("?confirm=true").await.unwrap().status(), 404);

    let listing: Value = client.get(app.url("/matches")).send().await.unwrap().json().await.unwrap();
    assert!(listing.as_array().unwrap().is_empty());

    let players: Value = client.get(app.url("/players")).send().await.unwrap().json().await.unwrap();
    assert!(players.as_array().unwrap().iter().all(|p| p["matches_played"] == 0));
}

#[tokio::test]
async fn scoreless_match_deletes_without_confirmation() {
    let app = spawn_app().await;
    app.seed_tournament("Apertura").await;
    let p = app.seed_players(&["Ana", "Beto"]).await;
    let admin = app.admin();
    let number = create_match(&app, &admin, &[(&p[0], 0)], &[(&p[1], 0)]).await;

    let response = Client::new()
        .delete(app.url(&format!("/matches/{}", number)))
        .header("Authorization", format!("Bearer {}", admin.token))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn matches_are_scoped_per_tournament() {
    let app = spawn_app().await;
    let apertura = app.seed_tournament("Apertura").await;
    let p = app.seed_players(&["Ana", "Beto"]).await;
    let admin = app.admin();
    let client = Client::new();

    let response = client
        .post(app.url(&format!("/matches?tournament_id={}", apertura)))
        .header("Authorization", format!("Bearer {}", admin.token))
        .json(&json!({ "oscuras": side("oscuras", &[(&p[0], 1)]), "claras": side("claras", &[(&p[1], 0)]) }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 201);

    // A newer tournament becomes the default scope.
    app.seed_tournament("Clausura").await;

    assert_eq!(get_match(&app, 1).await.status(), 404);

    let scoped = client
        .get(app.url(&format!("/matches/1?tournament_id={}", apertura)))
        .send()
        .await
        .unwrap();
    assert_eq!(scoped.status(), 200);

    let listing: Value = client.get(app.url("/matches")).send().await.unwrap().json().await.unwrap();
    assert!(listing.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn creating_a_match_with_an_unregistered_player_is_a_client_error() {
    let app = spawn_app().await;
    app.seed_tournament("Apertura").await;
    let p = app.seed_players(&["Ana"]).await;
    let stranger = Player { id: PlayerId::new(), name: "Nadie".to_string() };
    let client = Client::new();

    let response = client
        .post(app.url("/matches"))
        .header("Authorization", format!("Bearer {}", app.admin().token))
        .json(&json!({
            "oscuras": side("oscuras", &[(&p[0], 0)]),
            "claras": side("claras", &[(&stranger, 0)]),
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);

    let body: Value = response.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains(&stranger.id.to_string()));

    let listing: Value = client.get(app.url("/matches")).send().await.unwrap().json().await.unwrap();
    assert!(listing.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn removing_a_player_from_the_roster_drops_votes_for_them() {
    let app = spawn_app().await;
    app.seed_tournament("Apertura").await;
    let p = app.seed_players(&["Ana", "Beto", "Ciro"]).await;
    let admin = app.admin();
    let number = create_match(&app, &admin, &[(&p[0], 1)], &[(&p[1], 0)]).await;

    assert_eq!(vote(&app, &app.user("u1"), number, &p[0]).await.status(), 200);
    assert_eq!(vote(&app, &app.user("u2"), number, &p[1]).await.status(), 200);

    let response = Client::new()
        .put(app.url(&format!("/matches/{}", number)))
        .header("Authorization", format!("Bearer {}", admin.token))
        .json(&json!({
            "oscuras": side("oscuras", &[(&p[2], 1)]),
            "claras": side("claras", &[(&p[1], 0)]),
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let detail: Value = get_match(&app, number).await.json().await.unwrap();
    let votes = detail["match"]["player_of_the_match_votes"].as_array().unwrap();
    assert_eq!(votes.len(), 1);
    assert_eq!(votes[0]["player_voted_for"], json!(p[1].id));
    assert_eq!(detail["most_voted"], json!([p[1].id]));
    assert_eq!(detail["vote_tally"], json!({ p[1].id.to_string(): 1 }));
}

#[tokio::test]
async fn concurrent_creates_get_consecutive_numbers() {
    let app = spawn_app().await;
    app.seed_tournament("Apertura").await;
    let p = app.seed_players(&["Ana", "Beto"]).await;
    let admin = app.admin();

    let oscuras = [(&p[0], 0)];
    let claras = [(&p[1], 0)];
    let (first, second) = tokio::join!(
        create_match(&app, &admin, &oscuras, &claras),
        create_match(&app, &admin, &oscuras, &claras),
    );

    let mut numbers = vec![first, second];
    numbers.sort();
    assert_eq!(numbers, vec![1, 2]);
}

#[tokio::test]
async fn creating_a_match_in_an_unknown_tournament_is_not_found() {
    let app = spawn_app().await;
    let p = app.seed_players(&["Ana", "Beto"]).await;

    let response = Client::new()
        .post(app.url(&format!("/matches?tournament_id={}", uuid::Uuid::new_v4())))
        .header("Authorization", format!("Bearer {}", app.admin().token))
        .json(&json!({ "oscuras": side("oscuras", &[(&p[0], 0)]), "claras": side("claras", &[(&p[1], 0)]) }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);
}
