//! HTTP-level tests for the dry-run endpoints that test unsaved trigger and
//! rule definitions.
//!
//! These endpoints never touch the database, so they run against a pool
//! that cannot connect.

mod common;

use assert_matches::assert_matches;
use axum::http::StatusCode;
use common::{body_json, build_offline_app, post_json};
use serde_json::json;

const TRIGGER_TEST: &str = "/api/v1/organizations/1/interest-triggers/test";
const RULE_TEST: &str = "/api/v1/organizations/1/temperature-rules/test";

fn trigger_definition(operator: &str, value: &str) -> serde_json::Value {
    json!({
        "name": "Facetas",
        "condition_field": "first_message",
        "condition_operator": operator,
        "condition_value": value,
        "action_set_temperature": "quente"
    })
}

// ---------------------------------------------------------------------------
// Interest triggers
// ---------------------------------------------------------------------------

#[tokio::test]
async fn trigger_test_contains_is_case_insensitive_by_default() {
    let response = post_json(
        build_offline_app(),
        TRIGGER_TEST,
        json!({
            "trigger": trigger_definition("contains", "facetas"),
            "candidate": "Olá, quero fazer FACETAS"
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["matches"], true);
}

#[tokio::test]
async fn trigger_test_invalid_regex_does_not_match() {
    let response = post_json(
        build_offline_app(),
        TRIGGER_TEST,
        json!({
            "trigger": trigger_definition("regex", "([unclosed"),
            "candidate": "([unclosed"
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["matches"], false);
}

#[tokio::test]
async fn trigger_test_missing_candidate_is_empty() {
    let response = post_json(
        build_offline_app(),
        TRIGGER_TEST,
        json!({ "trigger": trigger_definition("is_empty", "") }),
    )
    .await;

    let json = body_json(response).await;
    assert_eq!(json["data"]["matches"], true);
}

#[tokio::test]
async fn trigger_test_rejects_unknown_operator() {
    let response = post_json(
        build_offline_app(),
        TRIGGER_TEST,
        json!({
            "trigger": trigger_definition("sounds_like", "facetas"),
            "candidate": "facetas"
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

// ---------------------------------------------------------------------------
// Temperature rules
// ---------------------------------------------------------------------------

#[tokio::test]
async fn rule_test_reports_every_reason() {
    let response = post_json(
        build_offline_app(),
        RULE_TEST,
        json!({
            "rule": {
                "name": "Novo para frio",
                "trigger_event": "inactivity_timer",
                "from_temperature": "novo",
                "timer_minutes": 60,
                "action_set_temperature": "frio"
            },
            "lead": {
                "temperature": "quente",
                "substatus": null,
                "minutes_since_interaction": 90
            }
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let data = &json["data"];
    assert_eq!(data["matches"], false);
    assert!(data["action"].is_null());

    let reasons = data["reasons"].as_array().unwrap();
    assert_eq!(reasons.len(), 2);
    assert_eq!(reasons[0]["passed"], false);
    assert_eq!(reasons[1]["passed"], true);

    let trace: Vec<&str> = data["trace"]
        .as_array()
        .unwrap()
        .iter()
        .map(|line| line.as_str().unwrap())
        .collect();
    assert_eq!(
        trace,
        vec![
            "Temperatura: quente (esperado: novo)",
            "Tempo sem interação: 90 min (esperado: >= 60 min)",
        ]
    );
}

#[tokio::test]
async fn rule_test_wildcard_matches_and_reports_action() {
    let response = post_json(
        build_offline_app(),
        RULE_TEST,
        json!({
            "rule": {
                "name": "Qualquer para frio",
                "trigger_event": "inactivity_timer",
                "timer_minutes": 60,
                "action_set_temperature": "frio",
                "action_clear_substatus": true
            },
            "lead": { "temperature": "frio", "minutes_since_interaction": 60 }
        }),
    )
    .await;

    let json = body_json(response).await;
    let data = &json["data"];
    assert_eq!(data["matches"], true);
    assert_eq!(data["action"]["action_set_temperature"], "frio");
    assert_eq!(data["action"]["action_clear_substatus"], true);
    assert_matches!(data["reasons"].as_array(), Some(reasons) if reasons.len() == 1);
}

#[tokio::test]
async fn rule_test_uses_default_timer_for_event() {
    let response = post_json(
        build_offline_app(),
        RULE_TEST,
        json!({
            "rule": {
                "name": "Conversa parada",
                "trigger_event": "substatus_timeout",
                "from_temperature": "quente",
                "from_substatus": "em_conversa",
                "action_set_substatus": "aguardando_resposta"
            },
            "lead": {
                "temperature": "quente",
                "substatus": "em_conversa",
                "minutes_since_interaction": 59
            }
        }),
    )
    .await;

    let json = body_json(response).await;
    let data = &json["data"];
    assert_eq!(data["matches"], false);
    assert_eq!(data["reasons"][2]["expected"], ">= 60 min");
    assert_eq!(data["reasons"][2]["actual"], "59 min");
}

#[tokio::test]
async fn rule_test_rejects_negative_minutes() {
    let response = post_json(
        build_offline_app(),
        RULE_TEST,
        json!({
            "rule": {
                "name": "x",
                "trigger_event": "no_response",
                "timer_minutes": 10,
                "action_set_temperature": "frio"
            },
            "lead": { "temperature": "novo", "minutes_since_interaction": -5 }
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn rule_test_rejects_non_positive_timer() {
    for timer in [0, -30] {
        let response = post_json(
            build_offline_app(),
            RULE_TEST,
            json!({
                "rule": {
                    "name": "Timer inválido",
                    "trigger_event": "inactivity_timer",
                    "timer_minutes": timer,
                    "action_set_temperature": "frio"
                },
                "lead": { "temperature": "novo", "minutes_since_interaction": 10 }
            }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = body_json(response).await;
        assert_eq!(json["code"], "VALIDATION_ERROR");
        assert!(json["error"].as_str().unwrap().contains("timer_minutes"));
    }
}
