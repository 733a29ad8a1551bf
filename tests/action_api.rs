//! HTTP surface the dialogue assistant calls.

use std::net::SocketAddr;
use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::web::Data;
use actix_web::{App, test};
use leave_actions::config::Config;
use leave_actions::leave::date_parser::NaturalDateParser;
use leave_actions::leave::flow::LeaveDesk;
use leave_actions::routes;
use leave_actions::store::backend::{LedgerBackend, MemoryBackend};
use leave_actions::store::ledger::LeaveLedger;
use leave_actions::store::usage::NoUsage;
use serde_json::{Value, json};

fn config() -> Config {
    Config {
        server_addr: "127.0.0.1:0".to_string(),
        ledger_path: "unused.json".into(),
        usage_path: None,
        api_prefix: "/api".to_string(),
        log_dir: "logs".to_string(),
        workers: 1,
        rate_actions_per_min: 600,
    }
}

fn desk(backend: Arc<dyn LedgerBackend>) -> Data<LeaveDesk> {
    Data::new(LeaveDesk::new(
        LeaveLedger::new(backend),
        Arc::new(NoUsage),
        Arc::new(NaturalDateParser),
    ))
}

fn peer() -> SocketAddr {
    "127.0.0.1:40000".parse().unwrap()
}

macro_rules! app {
    ($desk:expr) => {{
        let config = config();
        let limiter = Arc::new(routes::build_limiter(config.rate_actions_per_min).unwrap());
        test::init_service(
            App::new()
                .app_data($desk)
                .configure(|cfg| routes::configure(cfg, &config, limiter)),
        )
        .await
    }};
}

#[actix_web::test]
async fn health_is_ok() {
    let app = app!(desk(Arc::new(MemoryBackend::new())));
    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn validate_accepts_longest_entity_and_resolves_it() {
    let app = app!(desk(Arc::new(MemoryBackend::new())));
    let req = test::TestRequest::post()
        .uri("/api/leave/validate")
        .peer_addr(peer())
        .set_json(json!({
            "sender_id": "u1",
            "duration_leave": "days",
            "entities": [
                {"entity": "duration_leave", "value": "days"},
                {"entity": "duration_leave", "value": "3 days"}
            ]
        }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["slots"]["duration_leave"], "3 days");
    assert_eq!(body["resolved"]["phrase"], "for 3 days");
    assert!(body["messages"].as_array().unwrap().is_empty());
}

#[actix_web::test]
async fn validate_rejects_unparseable_dates_with_a_message() {
    let app = app!(desk(Arc::new(MemoryBackend::new())));
    let req = test::TestRequest::post()
        .uri("/api/leave/validate")
        .peer_addr(peer())
        .set_json(json!({"sender_id": "u1", "duration_leave": "someday soon"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert!(body["slots"]["duration_leave"].is_null());
    assert!(body["messages"][0]["text"].as_str().unwrap().contains("rephrase"));
}

#[actix_web::test]
async fn submit_posts_then_rejects_the_overlap() {
    let backend = Arc::new(MemoryBackend::new());
    let app = app!(desk(backend.clone()));

    let req = test::TestRequest::post()
        .uri("/api/leave/submit")
        .peer_addr(peer())
        .set_json(json!({
            "sender_id": "u1",
            "reason_leave": "sick",
            "duration_leave": "3 days",
            "confirmed": true
        }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(
        body["messages"][0]["text"],
        "Your medical leave for 'sick' for 3 days has been posted!"
    );
    assert_eq!(body["messages"][1]["response"], "utter_continue_convo");
    assert_eq!(
        body["events"],
        json!([
            {"event": "slot", "name": "reason_leave", "value": null},
            {"event": "slot", "name": "duration_leave", "value": null}
        ])
    );

    let req = test::TestRequest::post()
        .uri("/api/leave/submit")
        .peer_addr(peer())
        .set_json(json!({
            "sender_id": "u1",
            "reason_leave": "still sick",
            "duration_leave": "tomorrow",
            "confirmed": true
        }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert!(body["messages"][0]["text"].as_str().unwrap().contains("already have leave"));
    assert_eq!(body["events"][1], json!({"event": "active_loop", "name": "leave_form"}));

    let req = test::TestRequest::get()
        .uri("/api/leave/u1")
        .peer_addr(peer())
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["leaves"].as_array().unwrap().len(), 1);
    assert_eq!(body["leaves"][0]["type"], "medical");
}

#[actix_web::test]
async fn declined_submission_clears_slots_and_writes_nothing() {
    let backend = Arc::new(MemoryBackend::new());
    let app = app!(desk(backend.clone()));
    let req = test::TestRequest::post()
        .uri("/api/leave/submit")
        .peer_addr(peer())
        .set_json(json!({
            "sender_id": "u1",
            "reason_leave": "trip",
            "duration_leave": "tomorrow",
            "confirmed": false
        }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["events"].as_array().unwrap().len(), 2);
    assert!(backend.load().unwrap().is_none());
}

#[actix_web::test]
async fn storage_failure_is_surfaced_as_server_error() {
    let app = app!(desk(Arc::new(MemoryBackend::with_contents("not json"))));
    let req = test::TestRequest::post()
        .uri("/api/leave/submit")
        .peer_addr(peer())
        .set_json(json!({
            "sender_id": "u1",
            "reason_leave": "sick",
            "duration_leave": "tomorrow",
            "confirmed": true
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body: Value = test::read_body_json(resp).await;
    assert!(body["messages"][0]["text"].as_str().unwrap().contains("corrupt"));
}
