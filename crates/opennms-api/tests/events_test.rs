#![allow(clippy::unwrap_used)]
// Event endpoint tests.

use std::sync::Arc;

use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use opennms_api::endpoints::{EventApi, EventQuery};
use opennms_api::model::{EventSubmission, Severity};
use opennms_api::{ClientConfig, RestClient};

async fn setup() -> (MockServer, EventApi) {
    let server = MockServer::start().await;
    let config = ClientConfig::new(&server.uri(), "admin", "admin".to_string().into()).unwrap();
    let rest = Arc::new(RestClient::new(&config).unwrap());
    (server, EventApi::new(rest))
}

#[tokio::test]
async fn get_decodes_event_record() {
    let (server, events) = setup().await;

    let body = json!({
        "id": 1042,
        "uei": "uei.opennms.org/nodes/nodeLostService",
        "label": "Node Lost Service",
        "time": 1_704_991_115_000_i64,
        "severity": "MINOR",
        "nodeId": 5,
        "nodeLabel": "web01",
        "ipAddress": "10.0.0.9",
        "logMessage": "ICMP outage on 10.0.0.9",
        "parameters": [
            {"name": "eventReason", "value": "timeout", "type": "string"}
        ]
    });

    Mock::given(method("GET"))
        .and(path("/api/v2/events/1042"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let event = events.get(1042).await.unwrap().expect("event should exist");
    assert_eq!(event.id, Some(1042));
    assert_eq!(event.severity, Severity::Minor);
    assert_eq!(event.node_id, Some(5));
    assert_eq!(event.parameters[0].name, "eventReason");
}

#[tokio::test]
async fn list_pages_through_events() {
    let (server, events) = setup().await;

    let records: Vec<_> = (0..8)
        .map(|i| json!({"id": i, "uei": format!("uei.test/{i}"), "severity": "NORMAL"}))
        .collect();
    Mock::given(method("GET"))
        .and(path("/api/v2/events"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 8,
            "offset": 0,
            "totalCount": 8,
            "event": records
        })))
        .expect(1)
        .mount(&server)
        .await;

    let result = events.list(&EventQuery::all()).await.unwrap();
    assert_eq!(result.len(), 8);
    assert_eq!(result[3].uei, "uei.test/3");
}

#[tokio::test]
async fn send_reports_acceptance() {
    let (server, events) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/v2/events"))
        .and(body_partial_json(json!({
            "uei": "uei.opennms.org/internal/reloadDaemonConfig",
            "source": "opennms-api",
            "parameters": [{"name": "daemonName", "value": "Pollerd", "type": "string"}]
        })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let accepted = events
        .send(&EventSubmission::reload_daemon("Pollerd"))
        .await
        .unwrap();
    assert!(accepted);
}

#[tokio::test]
async fn send_distinguishes_non_accepted_status() {
    let (server, events) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/v2/events"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let accepted = events
        .send(&EventSubmission::new("uei.test/custom"))
        .await
        .unwrap();
    assert!(!accepted);
}
