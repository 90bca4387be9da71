#![allow(clippy::unwrap_used)]
// Pagination behavior of the batch fetcher, driven through the alarms
// endpoint with wiremock.

use std::sync::Arc;

use serde_json::{Value, json};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use opennms_api::endpoints::{AlarmApi, AlarmQuery};
use opennms_api::{ClientConfig, Error, Progress, RestClient};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, AlarmApi) {
    let server = MockServer::start().await;
    let config = ClientConfig::new(&server.uri(), "admin", "admin".to_string().into()).unwrap();
    let rest = Arc::new(RestClient::new(&config).unwrap());
    (server, AlarmApi::new(rest))
}

fn alarm(id: i64) -> Value {
    json!({
        "id": id,
        "reductionKey": format!("uei.opennms.org/nodes/nodeDown::{id}"),
        "severity": "MAJOR",
        "type": 1,
        "lastEvent": {
            "id": id + 1000,
            "uei": "uei.opennms.org/nodes/nodeDown",
            "severity": "MAJOR"
        }
    })
}

fn page(total: i64, ids: std::ops::Range<i64>) -> Value {
    let records: Vec<Value> = ids.map(alarm).collect();
    json!({
        "count": records.len(),
        "offset": 0,
        "totalCount": total,
        "alarm": records
    })
}

/// Mount one page response for a given offset/limit pair, expected to be
/// hit exactly once.
async fn mount_page(server: &MockServer, offset: u64, limit: u64, body: &Value) {
    Mock::given(method("GET"))
        .and(path("/api/v2/alarms"))
        .and(query_param("offset", offset.to_string()))
        .and(query_param("limit", limit.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(1)
        .mount(server)
        .await;
}

// ── Completeness ────────────────────────────────────────────────────

#[tokio::test]
async fn unbounded_fetch_returns_every_record() {
    let (server, alarms) = setup().await;

    mount_page(&server, 0, 100, &page(23, 0..23)).await;

    let query = AlarmQuery::all();
    let result = alarms.list(&query).await.unwrap();

    assert_eq!(result.len(), 23);
    assert_eq!(result[0].id, 0);
    assert_eq!(result[22].id, 22);
}

#[tokio::test]
async fn limit_caps_a_larger_result_set() {
    let (server, alarms) = setup().await;

    // total 40, cap 15, pages of 10: offsets 0 and 10 only.
    mount_page(&server, 0, 10, &page(40, 0..10)).await;
    mount_page(&server, 10, 10, &page(40, 10..20)).await;

    let mut query = AlarmQuery::all().with_limit(15);
    query.batch_size = 10;
    let result = alarms.list(&query).await.unwrap();

    assert_eq!(result.len(), 15);
    assert_eq!(result[14].id, 14);
}

#[tokio::test]
async fn limit_beyond_total_fetches_no_phantom_pages() {
    let (server, alarms) = setup().await;

    // 24 records, limit 1000, batch 100: one call, 24 records back.
    mount_page(&server, 0, 100, &page(24, 0..24)).await;

    let query = AlarmQuery::all().with_limit(1000);
    let result = alarms.list(&query).await.unwrap();

    assert_eq!(result.len(), 24);
    // The embedded lastEvent payload hydrates without extra calls.
    let last_event = result[0].last_event.as_ref().expect("embedded event");
    assert_eq!(last_event.id, Some(1000));
}

// ── Page-size independence ──────────────────────────────────────────

#[tokio::test]
async fn small_and_large_batch_sizes_agree() {
    // batch_size 5 over 23 records: offsets 0,5,10,15,20.
    let (server, alarms) = setup().await;
    for start in [0_i64, 5, 10, 15, 20] {
        let end = (start + 5).min(23);
        mount_page(&server, start as u64, 5, &page(23, start..end)).await;
    }

    let mut query = AlarmQuery::all();
    query.batch_size = 5;
    let small = alarms.list(&query).await.unwrap();

    // batch_size 100: a single page.
    let (server_big, alarms_big) = setup().await;
    mount_page(&server_big, 0, 100, &page(23, 0..23)).await;
    let big = alarms_big.list(&AlarmQuery::all()).await.unwrap();

    assert_eq!(small.len(), 23);
    assert_eq!(big.len(), 23);
    let small_ids: Vec<i64> = small.iter().map(|a| a.id).collect();
    let big_ids: Vec<i64> = big.iter().map(|a| a.id).collect();
    assert_eq!(small_ids, big_ids);
}

// ── Empty-set short-circuit ─────────────────────────────────────────

#[tokio::test]
async fn zero_total_makes_exactly_one_call() {
    let (server, alarms) = setup().await;

    mount_page(
        &server,
        0,
        100,
        &json!({"count": 0, "offset": 0, "totalCount": 0, "alarm": []}),
    )
    .await;

    let result = alarms.list(&AlarmQuery::all()).await.unwrap();
    assert!(result.is_empty());
    // expect(1) on the mock verifies the single call on drop.
}

#[tokio::test]
async fn null_sentinel_collection_returns_empty() {
    let (server, alarms) = setup().await;

    // Some releases report a nonzero total but send `[null]` for the
    // collection; that still means "no matches".
    mount_page(
        &server,
        0,
        100,
        &json!({"count": 1, "offset": 0, "totalCount": 2, "alarm": [null]}),
    )
    .await;

    let result = alarms.list(&AlarmQuery::all()).await.unwrap();
    assert!(result.is_empty());
}

// ── Mid-page early exit ─────────────────────────────────────────────

#[tokio::test]
async fn cap_inside_first_page_stops_immediately() {
    let (server, alarms) = setup().await;

    // The server over-delivers a full page of 10; the fetcher must take 7
    // and never ask for more.
    Mock::given(method("GET"))
        .and(path("/api/v2/alarms"))
        .and(query_param("offset", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(100, 0..10)))
        .expect(1)
        .mount(&server)
        .await;

    let mut query = AlarmQuery::all().with_limit(7);
    query.batch_size = 10;
    let result = alarms.list(&query).await.unwrap();

    assert_eq!(result.len(), 7);
    assert_eq!(result[6].id, 6);
}

// ── Filter preservation ─────────────────────────────────────────────

#[tokio::test]
async fn filter_params_ride_on_every_sub_page() {
    let (server, alarms) = setup().await;

    let fiql = "alarm.severity==MAJOR";
    for start in [0_i64, 2] {
        Mock::given(method("GET"))
            .and(path("/api/v2/alarms"))
            .and(query_param("offset", start.to_string()))
            .and(query_param("limit", "2"))
            .and(query_param("_s", fiql))
            .respond_with(ResponseTemplate::new(200).set_body_json(page(4, start..start + 2)))
            .expect(1)
            .mount(&server)
            .await;
    }

    let mut query = AlarmQuery::all().with_fiql(fiql);
    query.batch_size = 2;
    let result = alarms.list(&query).await.unwrap();

    assert_eq!(result.len(), 4);
}

// ── Error propagation ───────────────────────────────────────────────

#[tokio::test]
async fn auth_failure_mid_pagination_aborts_without_partials() {
    let (server, alarms) = setup().await;

    mount_page(&server, 0, 10, &page(50, 0..10)).await;
    mount_page(&server, 10, 10, &page(50, 10..20)).await;
    Mock::given(method("GET"))
        .and(path("/api/v2/alarms"))
        .and(query_param("offset", "20"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    let mut query = AlarmQuery::all();
    query.batch_size = 10;
    let result = alarms.list(&query).await;

    assert!(
        matches!(result, Err(Error::Authentication { .. })),
        "expected Authentication error, got: {result:?}"
    );
}

#[tokio::test]
async fn server_error_carries_response_text() {
    let (server, alarms) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/alarms"))
        .respond_with(ResponseTemplate::new(500).set_body_string("database offline"))
        .mount(&server)
        .await;

    let result = alarms.list(&AlarmQuery::all()).await;
    match result {
        Err(Error::Api { status, body }) => {
            assert_eq!(status, 500);
            assert_eq!(body, "database offline");
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}

// ── Progress reporting ──────────────────────────────────────────────

#[tokio::test]
async fn progress_counts_records_not_pages() {
    let (server, alarms) = setup().await;

    mount_page(&server, 0, 10, &page(17, 0..10)).await;
    mount_page(&server, 10, 10, &page(17, 10..17)).await;

    let progress = Progress::new();
    let mut query = AlarmQuery::all();
    query.batch_size = 10;
    query.progress = Some(progress.clone());

    let result = alarms.list(&query).await.unwrap();
    assert_eq!(result.len(), 17);
    assert_eq!(progress.done(), 17);
    assert_eq!(progress.total(), 17);
}
