#![allow(clippy::unwrap_used)]
// Alarm endpoint tests: typed decoding, verbs, and error mapping.

use std::sync::Arc;

use serde_json::json;
use wiremock::matchers::{body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use opennms_api::endpoints::{AlarmApi, AlarmQuery};
use opennms_api::model::Severity;
use opennms_api::{ClientConfig, Error, RestClient};

async fn setup() -> (MockServer, AlarmApi) {
    let server = MockServer::start().await;
    let config = ClientConfig::new(&server.uri(), "admin", "admin".to_string().into()).unwrap();
    let rest = Arc::new(RestClient::new(&config).unwrap());
    (server, AlarmApi::new(rest))
}

#[tokio::test]
async fn get_decodes_embedded_event_and_timestamps() {
    let (server, alarms) = setup().await;

    let body = json!({
        "id": 88,
        "reductionKey": "uei.opennms.org/nodes/nodeDown::5",
        "type": 1,
        "severity": "CRITICAL",
        "description": "Node down",
        "logMessage": "node web01 is down",
        "nodeId": 5,
        "nodeLabel": "web01",
        "count": 3,
        "firstEventTime": 1_704_904_715_000_i64,
        "lastEventTime": 1_704_991_115_000_i64,
        "ackUser": "admin",
        "ackTime": 1_704_991_200_000_i64,
        "lastEvent": {
            "id": 1042,
            "uei": "uei.opennms.org/nodes/nodeDown",
            "severity": "CRITICAL",
            "time": 1_704_991_115_000_i64,
            "parameters": [
                {"name": "reason", "value": "ICMP timeout", "type": "string"}
            ]
        },
        "serviceType": {"id": 6, "name": "ICMP"},
        "parameters": []
    });

    Mock::given(method("GET"))
        .and(path("/api/v2/alarms/88"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let alarm = alarms.get(88).await.unwrap().expect("alarm should exist");

    assert_eq!(alarm.id, 88);
    assert_eq!(alarm.severity, Severity::Critical);
    assert!(alarm.is_acknowledged());
    assert_eq!(alarm.node_label.as_deref(), Some("web01"));
    assert_eq!(
        alarm.first_event_time.unwrap().timestamp_millis(),
        1_704_904_715_000
    );
    let last_event = alarm.last_event.expect("embedded last event");
    assert_eq!(last_event.id, Some(1042));
    assert_eq!(last_event.parameters[0].value, "ICMP timeout");
    assert_eq!(alarm.service_type.unwrap().name, "ICMP");
}

#[tokio::test]
async fn missing_alarm_maps_to_none() {
    let (server, alarms) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/alarms/404"))
        .respond_with(
            ResponseTemplate::new(404).set_body_string("Alarm with id 404 was not found."),
        )
        .mount(&server)
        .await;

    let alarm = alarms.get(404).await.unwrap();
    assert!(alarm.is_none());
}

#[tokio::test]
async fn ack_sends_parameterized_put() {
    let (server, alarms) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/api/v2/alarms/7"))
        .and(query_param("ack", "true"))
        .and(body_string_contains("ack=true"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    alarms.ack(7, true).await.unwrap();
}

#[tokio::test]
async fn clear_and_escalate_hit_their_flags() {
    let (server, alarms) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/api/v2/alarms/7"))
        .and(query_param("clear", "true"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/v2/alarms/9"))
        .and(query_param("escalate", "true"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    alarms.clear(7).await.unwrap();
    alarms.escalate(9).await.unwrap();
}

#[tokio::test]
async fn unauthorized_get_raises_authentication() {
    let (server, alarms) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/alarms/1"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let result = alarms.get(1).await;
    assert!(matches!(result, Err(Error::Authentication { .. })));
}

#[tokio::test]
async fn fiql_filter_is_forwarded() {
    let (server, alarms) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/alarms"))
        .and(query_param("_s", "alarm.severity==CRITICAL"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 1,
            "offset": 0,
            "totalCount": 1,
            "alarm": [
                {"id": 1, "reductionKey": "rk", "severity": "CRITICAL", "type": 1}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let query = AlarmQuery::all().with_fiql("alarm.severity==CRITICAL");
    let result = alarms.list(&query).await.unwrap();
    assert_eq!(result.len(), 1);
    assert_eq!(result[0].severity, Severity::Critical);
}
