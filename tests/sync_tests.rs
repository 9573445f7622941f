mod common;

use common::{FakeSource, Harness, Reply};
use fieldmap::{
    Category, ClientConfig, HeadlessWidget, HostDocument, LatLng, MapClient, MapError,
    MemoryDocument, MemoryLocation, Viewport,
};
use serde_json::json;
use std::sync::Arc;

const TRAPS: &str = "trap-data";

fn trap(name: &str, lat: f64, lng: f64) -> serde_json::Value {
    json!({ "name": name, "lat": lat, "long": lng })
}

#[tokio::test]
async fn test_empty_response_clears_layer_and_count() {
    let h = Harness::new("");
    h.source.push(TRAPS, Reply::Records(vec![trap("a", 36.1, -118.0)]));
    h.source.push(TRAPS, Reply::Records(vec![]));

    let sync = h.client.synchronizer();
    let category = Category::trap_data();
    let vp = Viewport::default();

    assert_eq!(sync.refresh_category(&category, &vp).await.unwrap(), 1);
    assert_eq!(sync.refresh_category(&category, &vp).await.unwrap(), 0);

    assert_eq!(h.layer_len(TRAPS), 0);
    assert_eq!(h.count_text(TRAPS).as_deref(), Some("0"));
    assert!(h.widget.rendered(TRAPS).is_empty());
}

#[tokio::test]
async fn test_markers_placed_at_record_coordinates() {
    let h = Harness::new("");
    let points = [(36.10, -118.01), (36.11, -118.02), (36.12, -117.99)];
    h.source.push(
        TRAPS,
        Reply::Records(
            points
                .iter()
                .enumerate()
                .map(|(i, (lat, lng))| trap(&format!("t{i}"), *lat, *lng))
                .collect(),
        ),
    );

    let count = h
        .client
        .synchronizer()
        .refresh_category(&Category::trap_data(), &Viewport::default())
        .await
        .unwrap();
    assert_eq!(count, points.len());
    assert_eq!(h.count_text(TRAPS).as_deref(), Some("3"));

    let positions = h
        .client
        .with_layers(|layers| {
            layers
                .get_layer(TRAPS)
                .map(|l| l.markers().iter().map(|m| m.position()).collect::<Vec<_>>())
                .unwrap_or_default()
        })
        .unwrap();
    let expected: Vec<LatLng> = points.iter().map(|(lat, lng)| LatLng::new(*lat, *lng)).collect();
    assert_eq!(positions, expected);

    let rendered = h.widget.rendered(TRAPS);
    assert_eq!(rendered.len(), 3);
    assert_eq!(rendered[1].popup.as_deref(), Some("t1"));
}

#[tokio::test]
async fn test_http_error_keeps_stale_markers() {
    let h = Harness::new("");
    h.source.push(
        TRAPS,
        Reply::Records(vec![trap("a", 36.1, -118.0), trap("b", 36.11, -118.0)]),
    );
    h.source.push(TRAPS, Reply::Status(500));

    let sync = h.client.synchronizer();
    let category = Category::trap_data();
    let vp = Viewport::default();

    sync.refresh_category(&category, &vp).await.unwrap();
    let before = h.widget.rendered(TRAPS);
    let redraws = h.widget.redraws();

    let err = sync.refresh_category(&category, &vp).await.unwrap_err();
    assert!(matches!(err, MapError::HttpStatus { status: 500, .. }));
    assert!(err.is_fetch_error());

    assert_eq!(h.layer_len(TRAPS), 2);
    assert_eq!(h.count_text(TRAPS).as_deref(), Some("2"));
    assert_eq!(h.widget.rendered(TRAPS), before);
    assert_eq!(h.widget.redraws(), redraws);
}

#[tokio::test]
async fn test_malformed_body_keeps_stale_markers() {
    let h = Harness::new("");
    h.source.push(TRAPS, Reply::Records(vec![trap("a", 36.1, -118.0)]));
    h.source.push(TRAPS, Reply::Body("{\"error\": \"nope\"}"));
    h.source.push(TRAPS, Reply::Body("not json"));

    let sync = h.client.synchronizer();
    let category = Category::trap_data();
    let vp = Viewport::default();

    sync.refresh_category(&category, &vp).await.unwrap();
    assert!(matches!(
        sync.refresh_category(&category, &vp).await,
        Err(MapError::UnexpectedShape(_))
    ));
    assert!(matches!(
        sync.refresh_category(&category, &vp).await,
        Err(MapError::Parse(_))
    ));
    assert_eq!(h.layer_len(TRAPS), 1);
}

#[tokio::test]
async fn test_sequential_refreshes_keep_only_latest() {
    let h = Harness::new("");
    h.source.push(
        TRAPS,
        Reply::Records(vec![trap("first-a", 36.1, -118.0), trap("first-b", 36.11, -118.0)]),
    );
    h.source.push(TRAPS, Reply::Records(vec![trap("second", 36.12, -118.03)]));

    let sync = h.client.synchronizer();
    let category = Category::trap_data();
    let vp = Viewport::default();

    sync.refresh_category(&category, &vp).await.unwrap();
    sync.refresh_category(&category, &vp).await.unwrap();

    let names = h
        .client
        .with_layers(|layers| {
            layers
                .get_layer(TRAPS)
                .map(|l| {
                    l.markers()
                        .iter()
                        .filter_map(|m| m.record().text("name"))
                        .collect::<Vec<_>>()
                })
                .unwrap_or_default()
        })
        .unwrap();
    assert_eq!(names, vec!["second".to_string()]);
    assert_eq!(h.count_text(TRAPS).as_deref(), Some("1"));
}

#[tokio::test]
async fn test_records_without_coordinates_are_skipped() {
    let h = Harness::new("");
    h.source.push(
        TRAPS,
        Reply::Records(vec![
            trap("ok", 36.1, -118.0),
            json!({ "name": "missing" }),
            json!({ "name": "strings", "lat": "36.2", "long": "-118.1" }),
            json!({ "name": "out of range", "lat": 123.0, "long": -118.0 }),
        ]),
    );

    let count = h
        .client
        .synchronizer()
        .refresh_category(&Category::trap_data(), &Viewport::default())
        .await
        .unwrap();
    assert_eq!(count, 2);
    assert_eq!(h.count_text(TRAPS).as_deref(), Some("2"));
}

#[tokio::test]
async fn test_one_failing_category_does_not_block_others() {
    let h = Harness::new("");
    h.source.push("service-request", Reply::Status(503));
    h.source.push(TRAPS, Reply::Records(vec![trap("a", 36.1, -118.0)]));
    h.source.push(
        "mosquito-source",
        Reply::Records(vec![json!({
            "target": "pond",
            "location": { "latitude": 36.1, "longitude": -118.02 }
        })]),
    );

    let report = h
        .client
        .synchronizer()
        .refresh_all(&Viewport::default())
        .await;

    assert_eq!(report.outcomes.len(), 3);
    assert!(!report.is_complete_success());
    assert_eq!(report.count(TRAPS), Some(1));
    assert_eq!(report.count("mosquito-source"), Some(1));
    assert_eq!(report.count("service-request"), None);
    assert_eq!(report.failed().count(), 1);
    assert_eq!(h.count_text("service-request"), None);
}

#[tokio::test]
async fn test_every_category_queried_with_same_bounds() {
    let h = Harness::new("");
    let vp = Viewport::new(36.2, 36.0, -117.9, -118.1).unwrap();
    h.client.synchronizer().refresh_all(&vp).await;

    let queries = h.source.queries();
    assert_eq!(queries.len(), 3);
    for (_, query) in &queries {
        assert_eq!(
            query.to_query_string(),
            "west=-118.1&north=36.2&east=-117.9&south=36"
        );
    }
}

/// Document whose count elements are missing
#[derive(Default)]
struct NoCountElements {
    inner: MemoryDocument,
}

impl HostDocument for NoCountElements {
    fn set_text(&self, element_id: &str, _text: &str) -> fieldmap::Result<()> {
        Err(MapError::Widget(format!("no element #{element_id}")))
    }

    fn set_html(&self, element_id: &str, html: &str) -> fieldmap::Result<()> {
        self.inner.set_html(element_id, html)
    }
}

#[tokio::test]
async fn test_missing_count_element_does_not_fail_refresh() {
    let source = FakeSource::new();
    source.push(
        TRAPS,
        Reply::Records(vec![trap("a", 36.1, -118.0), trap("b", 36.11, -118.0)]),
    );
    let widget = HeadlessWidget::new();
    let client = MapClient::new(
        ClientConfig::default().with_categories([TRAPS]),
        source.clone(),
        Box::new(widget.clone()),
        Box::new(MemoryLocation::default()),
        Arc::new(NoCountElements::default()),
    )
    .unwrap();

    let count = client
        .synchronizer()
        .refresh_category(&Category::trap_data(), &Viewport::default())
        .await
        .unwrap();
    assert_eq!(count, 2);
    assert_eq!(widget.rendered(TRAPS).len(), 2);

    let report = client.synchronizer().refresh_all(&Viewport::default()).await;
    assert!(report.is_complete_success());
    assert_eq!(report.count(TRAPS), Some(0));
}
