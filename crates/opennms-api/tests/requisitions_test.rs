#![allow(clippy::unwrap_used)]
// Requisition and foreign-source endpoint tests: v1 key normalization,
// legacy XML payloads, counts, and import flows.

use std::sync::Arc;

use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use opennms_api::endpoints::{ForeignSourceApi, RequisitionApi};
use opennms_api::model::node::PrimaryType;
use opennms_api::model::requisition::{RequisitionInterface, RequisitionNode};
use opennms_api::model::Requisition;
use opennms_api::{ClientConfig, RestClient};

async fn setup() -> (MockServer, Arc<RestClient>) {
    let server = MockServer::start().await;
    let config = ClientConfig::new(&server.uri(), "admin", "admin".to_string().into()).unwrap();
    let rest = Arc::new(RestClient::new(&config).unwrap());
    (server, rest)
}

#[tokio::test]
async fn names_unwraps_foreign_source_list() {
    let (server, rest) = setup().await;
    let api = RequisitionApi::new(rest);

    Mock::given(method("GET"))
        .and(path("/rest/requisitionNames"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 2,
            "foreign-source": ["servers", "switches"]
        })))
        .mount(&server)
        .await;

    let names = api.names().await.unwrap();
    assert_eq!(names, vec!["servers", "switches"]);
}

#[tokio::test]
async fn get_normalizes_hyphenated_json() {
    let (server, rest) = setup().await;
    let api = RequisitionApi::new(rest);

    let body = json!({
        "foreign-source": "servers",
        "date-stamp": 1_704_904_715_000_i64,
        "last-import": 1_704_904_800_000_i64,
        "node": [{
            "foreign-id": "web01",
            "node-label": "web01.example.org",
            "building": "HQ",
            "interface": [{
                "ip-addr": "10.0.0.1",
                "snmp-primary": "P",
                "status": 1,
                "monitored-service": [
                    {"service-name": "ICMP"},
                    {"service-name": "SNMP"}
                ]
            }],
            "category": [{"name": "Production"}],
            "meta-data": [
                {"context": "requisition", "key": "owner", "value": "netops"}
            ]
        }]
    });

    Mock::given(method("GET"))
        .and(path("/rest/requisitions/servers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let requisition = api.get("servers").await.unwrap().expect("requisition");
    assert_eq!(requisition.foreign_source, "servers");
    assert_eq!(
        requisition.date_stamp.unwrap().timestamp_millis(),
        1_704_904_715_000
    );
    let node = requisition.node("web01").expect("node web01");
    assert_eq!(node.node_label, "web01.example.org");
    let interface = node.interface("10.0.0.1").expect("interface");
    assert_eq!(interface.snmp_primary, PrimaryType::Primary);
    assert_eq!(interface.monitored_service.len(), 2);
    assert_eq!(node.meta_data[0].value.as_deref(), Some("netops"));
}

#[tokio::test]
async fn get_parses_legacy_xml_payload() {
    let (server, rest) = setup().await;
    let api = RequisitionApi::new(rest);

    let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<model-import xmlns="http://xmlns.opennms.org/xsd/config/model-import"
              foreign-source="legacy" date-stamp="1704904715000">
    <node foreign-id="core01" node-label="core01.example.org">
        <interface ip-addr="10.1.0.1" status="1" snmp-primary="P">
            <monitored-service service-name="ICMP"/>
        </interface>
        <category name="Network"/>
    </node>
</model-import>"#;

    Mock::given(method("GET"))
        .and(path("/rest/requisitions/legacy"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(xml)
                .insert_header("content-type", "application/xml"),
        )
        .mount(&server)
        .await;

    let requisition = api.get("legacy").await.unwrap().expect("requisition");
    assert_eq!(requisition.foreign_source, "legacy");
    let node = requisition.node("core01").expect("node");
    // Single-element XML children arrive collapsed and must still expand.
    assert_eq!(node.interface.len(), 1);
    assert_eq!(node.interface[0].ip_addr, "10.1.0.1");
    assert_eq!(node.interface[0].monitored_service[0].service_name, "ICMP");
    assert_eq!(node.category[0].name, "Network");
}

#[tokio::test]
async fn list_handles_model_import_collection() {
    let (server, rest) = setup().await;
    let api = RequisitionApi::new(rest);

    Mock::given(method("GET"))
        .and(path("/rest/requisitions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 2,
            "model-import": [
                {"foreign-source": "servers", "node": []},
                {"foreign-source": "switches", "node": [
                    {"foreign-id": "sw1", "node-label": "sw1"}
                ]}
            ]
        })))
        .mount(&server)
        .await;

    let requisitions = api.list().await.unwrap();
    assert_eq!(requisitions.len(), 2);
    assert_eq!(requisitions[1].foreign_source, "switches");
    assert_eq!(requisitions[1].node.len(), 1);
}

#[tokio::test]
async fn counts_parse_plain_text_bodies() {
    let (server, rest) = setup().await;
    let api = RequisitionApi::new(rest);

    Mock::given(method("GET"))
        .and(path("/rest/requisitions/count"))
        .respond_with(ResponseTemplate::new(200).set_body_string("4"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/rest/requisitions/deployed/count"))
        .respond_with(ResponseTemplate::new(200).set_body_string("3"))
        .mount(&server)
        .await;

    assert_eq!(api.active_count().await.unwrap(), 4);
    assert_eq!(api.deployed_count().await.unwrap(), 3);
}

#[tokio::test]
async fn import_reports_server_acceptance() {
    let (server, rest) = setup().await;
    let api = RequisitionApi::new(rest);

    Mock::given(method("PUT"))
        .and(path("/rest/requisitions/servers/import"))
        .and(query_param("rescanExisting", "false"))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&server)
        .await;

    assert!(api.import("servers", false).await.unwrap());
}

#[tokio::test]
async fn update_posts_hyphenated_wire_shape() {
    let (server, rest) = setup().await;
    let api = RequisitionApi::new(rest);

    let mut requisition = Requisition::new("servers");
    let mut node = RequisitionNode::new("web02", "web02.example.org");
    node.add_interface(RequisitionInterface::new("10.0.0.2").unwrap())
        .unwrap();
    node.add_category("Production");
    requisition.add_node(node).unwrap();

    Mock::given(method("POST"))
        .and(path("/rest/requisitions"))
        .and(body_partial_json(json!({
            "foreign-source": "servers",
            "node": [{
                "foreign-id": "web02",
                "node-label": "web02.example.org",
                "interface": [{"ip-addr": "10.0.0.2", "snmp-primary": "N"}],
                "category": [{"name": "Production"}]
            }]
        })))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&server)
        .await;

    api.update(&requisition).await.unwrap();
}

// ── Foreign sources ─────────────────────────────────────────────────

#[tokio::test]
async fn foreign_source_get_maps_class_to_class_type() {
    let (server, rest) = setup().await;
    let api = ForeignSourceApi::new(rest);

    let body = json!({
        "name": "servers",
        "date-stamp": 1_704_904_715_000_i64,
        "scan-interval": "1d",
        "detectors": [{
            "name": "ICMP",
            "class": "org.opennms.netmgt.provision.detector.icmp.IcmpDetector",
            "parameter": [{"key": "timeout", "value": "3000"}]
        }],
        "policies": [{
            "name": "No IPs",
            "class": "org.opennms.netmgt.provision.persist.policies.MatchingIpInterfacePolicy",
            "parameter": [{"key": "action", "value": "DO_NOT_PERSIST"}]
        }]
    });

    Mock::given(method("GET"))
        .and(path("/rest/foreignSources/servers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let fs = api.get("servers").await.unwrap().expect("foreign source");
    assert_eq!(fs.scan_interval, "1d");
    assert!(fs.detector("ICMP").unwrap().class_type.ends_with("IcmpDetector"));
    assert_eq!(fs.policies[0].parameter[0].value, "DO_NOT_PERSIST");
}

#[tokio::test]
async fn foreign_source_list_unwraps_collection() {
    let (server, rest) = setup().await;
    let api = ForeignSourceApi::new(rest);

    Mock::given(method("GET"))
        .and(path("/rest/foreignSources"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 1,
            "foreignSources": [{"name": "default", "scan-interval": "1d"}]
        })))
        .mount(&server)
        .await;

    let sources = api.list().await.unwrap();
    assert_eq!(sources.len(), 1);
    assert_eq!(sources[0].name, "default");
}

#[tokio::test]
async fn foreign_source_update_serializes_class_key() {
    let (server, rest) = setup().await;
    let api = ForeignSourceApi::new(rest.clone());

    let fs = api_fixture();
    Mock::given(method("POST"))
        .and(path("/rest/foreignSources"))
        .and(body_partial_json(json!({
            "name": "servers",
            "scan-interval": "12h",
            "detectors": [{"name": "HTTP", "class": "org.opennms.detector.HttpDetector"}]
        })))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&server)
        .await;

    api.update(&fs).await.unwrap();
}

fn api_fixture() -> opennms_api::model::ForeignSource {
    use opennms_api::model::{Detector, ForeignSource};
    let mut fs = ForeignSource::new("servers");
    fs.scan_interval = "12h".to_owned();
    fs.set_detector(Detector::new("HTTP", "org.opennms.detector.HttpDetector"));
    fs
}
