//! Full negotiation against a live Postgres given by `DATABASE_URL`.
//!
//! `cargo test -p mentorship-backend -- --ignored`

mod common;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use common::call;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use mentorship_backend::setup_server;
use mentorship_database::schema::suggestion_progresses;
use mentorship_database::seed::{seed, Fixtures};
use mentorship_database::{get_database_connection_from_env, run_migrations};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

async fn login(app: &axum::Router, username: &str) -> String {
    let (status, body) = call(
        app,
        "POST",
        "/login",
        None,
        Some(json!({"username": username, "password": username})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    body["token"].as_str().unwrap().to_owned()
}

fn id_where(rows: &Value, field: &str, value: &str) -> i64 {
    rows.as_array()
        .unwrap()
        .iter()
        .find(|row| row[field] == value)
        .unwrap()["id"]
        .as_i64()
        .unwrap()
}

fn id_by_patronymic(people: &Value, patronymic: &str) -> i64 {
    id_where(people, "patronymic", patronymic)
}

#[tokio::test]
#[ignore = "needs a running postgres"]
async fn accepting_one_suggestion_rejects_the_others() {
    let pool = get_database_connection_from_env().unwrap();
    run_migrations(&pool).await.unwrap();

    let run = Utc::now().timestamp_micros();
    let curator = format!("Petrovich{run}");
    let first = format!("Igorevna{run}");
    let second = format!("Sergeevna{run}");
    let theme_title = format!("Log structured storage {run}");
    let fixtures: Fixtures = serde_json::from_value(json!({
        "subjects": [{"name": "Databases"}],
        "work_step_statuses": ["planned"],
        "curators": [{
            "name": "Ivan", "last_name": "Sidorov", "patronymic": curator, "description": ""
        }],
        "students": [
            {"name": "Anna", "last_name": "Petrova", "patronymic": first,
             "description": "", "course_number": 3},
            {"name": "Olga", "last_name": "Orlova", "patronymic": second,
             "description": "", "course_number": 2}
        ],
        "themes": [{
            "title": theme_title, "description": "LSM trees",
            "subject": "Databases", "curator": format!("Ivan.Sidorov.{curator}")
        }]
    }))
    .unwrap();
    let mut conn = pool.get().await.unwrap();
    seed(&mut conn, &fixtures).await.unwrap();
    drop(conn);

    let app = setup_server(pool.clone());
    let curator_token = login(&app, &format!("Ivan.Sidorov.{curator}")).await;
    let first_token = login(&app, &format!("Anna.Petrova.{first}")).await;
    let second_token = login(&app, &format!("Olga.Orlova.{second}")).await;
    assert_eq!(login(&app, &format!("Ivan.Sidorov.{curator}")).await, curator_token);

    let (_, curators) = call(&app, "GET", "/curators", Some(&curator_token), None).await;
    let curator_id = id_by_patronymic(&curators, &curator);
    let (status, _) = call(&app, "GET", "/students", Some(&first_token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (_, students) = call(&app, "GET", "/students", Some(&curator_token), None).await;
    let first_id = id_by_patronymic(&students, &first);
    let second_id = id_by_patronymic(&students, &second);

    let themes_uri = format!("/curators/{curator_id}/themes");
    let (status, themes) = call(&app, "GET", &themes_uri, Some(&curator_token), None).await;
    assert_eq!(status, StatusCode::OK);
    let theme_id = themes[0]["id"].as_i64().unwrap();

    // students may not use curator routes
    let (status, _) = call(&app, "GET", &themes_uri, Some(&first_token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let mut suggestion_ids = Vec::new();
    for (student_id, token) in [(first_id, &first_token), (second_id, &second_token)] {
        let (status, suggestion) = call(
            &app,
            "POST",
            &format!("/students/{student_id}/suggestions"),
            Some(token),
            Some(json!({"theme_id": theme_id, "curator_id": curator_id})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED, "{suggestion}");
        assert_eq!(suggestion["student_id"], student_id);
        suggestion_ids.push(suggestion["id"].as_i64().unwrap());
    }

    // a student only acts for themselves
    let first_suggestion = format!("/students/{first_id}/suggestions/{}", suggestion_ids[0]);
    let (status, _) = call(
        &app,
        "PUT",
        &first_suggestion,
        Some(&second_token),
        Some(json!({"status": "ACCEPTED_BOTH"})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = call(&app, "GET", &first_suggestion, Some(&second_token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = call(&app, "GET", &first_suggestion, Some(&first_token), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, listed) = call(
        &app,
        "GET",
        &format!("/students/{first_id}/suggestions"),
        Some(&curator_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().unwrap().len(), 1);

    // new suggestions cannot skip the negotiation
    let (_, statuses) =
        call(&app, "GET", "/suggestion-statuses", Some(&curator_token), None).await;
    let accepted_id = id_where(&statuses, "name", "ACCEPTED_BOTH");
    let (status, _) = call(
        &app,
        "POST",
        &format!("/curators/{curator_id}/suggestions"),
        Some(&curator_token),
        Some(json!({"theme_id": theme_id, "status_id": accepted_id})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, open_offer) = call(
        &app,
        "POST",
        &format!("/curators/{curator_id}/suggestions"),
        Some(&curator_token),
        Some(json!({"theme_id": theme_id})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{open_offer}");
    assert!(open_offer["student_id"].is_null());

    let winner = format!("/curators/{curator_id}/suggestions/{}", suggestion_ids[0]);
    let (status, suggestion) = call(
        &app,
        "PUT",
        &winner,
        Some(&curator_token),
        Some(json!({"status": "IN_PROGRESS_CURATOR"})),
    )
    .await;
    assert_eq!(status, StatusCode::ACCEPTED, "{suggestion}");
    let progress_id = i32::try_from(suggestion["progress_id"].as_i64().unwrap()).unwrap();

    let (status, progress) =
        call(&app, "GET", &format!("{winner}/progress"), Some(&curator_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(progress["title"], theme_title.as_str());

    let (status, _) = call(
        &app,
        "PUT",
        &format!("{winner}/progress"),
        Some(&curator_token),
        Some(json!({"title": "Compaction strategies for LSM trees"})),
    )
    .await;
    assert_eq!(status, StatusCode::ACCEPTED);

    let (status, _) = call(
        &app,
        "PUT",
        &winner,
        Some(&curator_token),
        Some(json!({"status": "ACCEPTED_BOTH"})),
    )
    .await;
    assert_eq!(status, StatusCode::ACCEPTED);

    let (_, theme) = call(
        &app,
        "GET",
        &format!("{themes_uri}/{theme_id}"),
        Some(&curator_token),
        None,
    )
    .await;
    assert_eq!(theme["title"], "Compaction strategies for LSM trees");
    assert_eq!(theme["student"]["id"], first_id);

    let (_, loser) = call(
        &app,
        "GET",
        &format!("/students/{second_id}/suggestions/{}", suggestion_ids[1]),
        Some(&second_token),
        None,
    )
    .await;
    assert_eq!(loser["status"]["name"], "REJECTED_CURATOR");

    let (_, offer) = call(
        &app,
        "GET",
        &format!("/curators/{curator_id}/suggestions/{}", open_offer["id"]),
        Some(&curator_token),
        None,
    )
    .await;
    assert_eq!(offer["status"]["name"], "REJECTED_CURATOR");

    let (status, _) = call(
        &app,
        "PUT",
        &winner,
        Some(&curator_token),
        Some(json!({"status": "DONE"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let tomorrow = Utc::now() + Duration::days(1);
    let (status, body) = call(
        &app,
        "POST",
        &format!("/curators/{curator_id}/works"),
        Some(&curator_token),
        Some(json!({"theme_id": theme_id, "date_start": tomorrow})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");

    let works_uri = format!("/curators/{curator_id}/works");
    let (_, works) = call(&app, "GET", &works_uri, Some(&curator_token), None).await;
    assert_eq!(works, json!([]));

    let yesterday = Utc::now() - Duration::days(1);
    let (status, work) = call(
        &app,
        "POST",
        &works_uri,
        Some(&curator_token),
        Some(json!({"theme_id": theme_id, "date_start": yesterday - Duration::days(30)})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{work}");
    let steps_uri = format!("{works_uri}/{}/steps", work["id"]);
    let (_, step_statuses) =
        call(&app, "GET", "/work-step-statuses", Some(&curator_token), None).await;
    let (status, body) = call(
        &app,
        "POST",
        &steps_uri,
        Some(&curator_token),
        Some(json!({
            "status_id": id_where(&step_statuses, "name", "planned"),
            "title": "Benchmarks",
            "description": "",
            "date_start": yesterday,
            "date_finish": yesterday - Duration::days(7),
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
    let (_, steps) = call(&app, "GET", &steps_uri, Some(&curator_token), None).await;
    assert_eq!(steps, json!([]));

    let (status, _) = call(&app, "DELETE", &winner, Some(&curator_token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let mut conn = pool.get().await.unwrap();
    let progresses: i64 = suggestion_progresses::table
        .filter(suggestion_progresses::id.eq(progress_id))
        .count()
        .get_result(&mut conn)
        .await
        .unwrap();
    assert_eq!(progresses, 0);

    let (status, _) = call(&app, "POST", "/logout", Some(&curator_token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = call(&app, "GET", &themes_uri, Some(&curator_token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
