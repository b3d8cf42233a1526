use super::common::*;
use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{header, Method, Request, StatusCode};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use crate::workflows::audit::domain::Department;
use crate::workflows::audit::router::{list_handler, summary_handler};
use crate::workflows::audit::AuditService;

fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(&body).expect("serialize body")))
        .expect("request builds")
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("request builds")
}

#[tokio::test]
async fn catalog_route_lists_department_sections() {
    let (service, _) = build_service();
    let router = audit_router_with_service(service);

    let response = router
        .oneshot(get("/api/v1/catalog/it"))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["label"], "It");
    let placed_questions: usize = payload["sections"]
        .as_array()
        .expect("sections array")
        .iter()
        .map(|section| section["questions"].as_array().map_or(0, Vec::len))
        .sum();
    assert_eq!(payload["declared_fields"], placed_questions);
    let sections = payload["sections"].as_array().expect("sections array");
    assert!(sections
        .iter()
        .any(|section| section["id"] == "sec_it_cloud"));
}

#[tokio::test]
async fn unknown_department_is_not_found() {
    let (service, _) = build_service();
    let router = audit_router_with_service(service);

    let response = router
        .oneshot(get("/api/v1/catalog/parking_garage"))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let payload = read_json_body(response).await;
    assert!(payload["error"]
        .as_str()
        .expect("error message")
        .contains("parking_garage"));
}

#[tokio::test]
async fn score_route_counts_only_answered_fields() {
    let (service, _) = build_service();
    let router = audit_router_with_service(service);

    let response = router
        .oneshot(json_request(
            Method::POST,
            "/api/v1/audit/score",
            json!({"a": "x", "b": "", "c": "0", "d": ["solar"], "e": []}),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["filled_fields"], 2);
    assert_eq!(payload["total_fields"], 5);
    assert_eq!(payload["completion_pct"], 40);
}

#[tokio::test]
async fn emissions_route_includes_it_breakdown() {
    let (service, _) = build_service();
    let router = audit_router_with_service(service);

    let response = router
        .oneshot(json_request(
            Method::POST,
            "/api/v1/audit/emissions",
            json!({"department": "it", "fields": it_fields()}),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["department"], "it");
    assert_eq!(payload["kwh"], 8760.0);
    let tons = payload["co2e_tons"].as_f64().expect("tons");
    assert!((tons - 4.04712).abs() < 1e-9);
    assert_eq!(payload["it_breakdown"]["allocated_kwh"], 8760.0);
}

#[tokio::test]
async fn emissions_route_omits_breakdown_for_facilities() {
    let (service, _) = build_service();
    let router = audit_router_with_service(service);

    let response = router
        .oneshot(json_request(
            Method::POST,
            "/api/v1/audit/emissions",
            json!({"department": "warehouse", "fields": {"annual_electricity": "1000"}}),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert!(payload.get("it_breakdown").is_none());
    assert_eq!(payload["highlights"][0], "1,000 kWh annual electricity");
}

#[tokio::test]
async fn saved_records_round_trip_through_routes() {
    let (service, _) = build_service();
    let router = audit_router_with_service(service);

    let response = router
        .clone()
        .oneshot(json_request(
            Method::PUT,
            "/api/v1/companies/northwind/audits/office",
            serde_json::to_value(office_fields()).expect("fields serialize"),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    let saved = read_json_body(response).await;
    let audit_id = saved["id"].as_str().expect("id assigned").to_string();

    let response = router
        .clone()
        .oneshot(get("/api/v1/companies/northwind/audits/office"))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    let fetched = read_json_body(response).await;
    assert_eq!(fetched["fields"]["primary_location"], "Leeds");

    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::DELETE)
                .uri(format!("/api/v1/audits/{audit_id}"))
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = router
        .oneshot(get("/api/v1/companies/northwind/audits/office"))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn report_route_accepts_explicit_date() {
    let (service, _) = build_service();
    service
        .save(company(), Department::Office, office_fields())
        .expect("office saved");
    let router = audit_router_with_service(service);

    let response = router
        .oneshot(get("/api/v1/companies/northwind/report?date=2025-01-05"))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["total_pages"], 4);
    assert_eq!(payload["generated_label"], "January 5, 2025");
    assert_eq!(payload["pages"][3]["content"]["kind"], "department");
    assert_eq!(payload["pages"][3]["page_label"], "4 of 4");
}

#[tokio::test]
async fn report_route_rejects_malformed_date() {
    let (service, _) = build_service();
    let router = audit_router_with_service(service);

    let response = router
        .oneshot(get("/api/v1/companies/northwind/report?date=05/01/2025"))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn list_handler_reports_unavailable_store() {
    let service = Arc::new(AuditService::new(Arc::new(UnavailableStore), catalog()));

    let response = list_handler::<UnavailableStore>(State(service), Path("northwind".to_string()))
        .await;

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let payload = read_json_body(response).await;
    assert!(payload["error"]
        .as_str()
        .expect("error message")
        .contains("store unavailable"));
}

#[tokio::test]
async fn summary_handler_degrades_when_store_is_unavailable() {
    let service = Arc::new(AuditService::new(Arc::new(UnavailableStore), catalog()));

    let response =
        summary_handler::<UnavailableStore>(State(service), Path("northwind".to_string())).await;

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["departments"], json!([]));
    assert_eq!(payload["catalog_size"], 11);
}
