use super::gateway;
use multiseek_backend_client::FeedSource;
use multiseek_backend_client::GatewayConfig;
use multiseek_core::FeedPager;
use multiseek_core::LoadOutcome;
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::Mock;
use wiremock::MockServer;
use wiremock::ResponseTemplate;
use wiremock::matchers::method;
use wiremock::matchers::path;
use wiremock::matchers::query_param;

fn remote_config(server: &MockServer) -> GatewayConfig {
    GatewayConfig {
        feed: FeedSource::Remote {
            path: "api/random".to_string(),
        },
        ..GatewayConfig::with_base_url(server.uri())
    }
}

#[tokio::test]
async fn remote_feed_pages_until_exhausted() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/random"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [
                {"id": "p1", "image_url": "https://img.test/1.jpg", "width": 600, "height": 800},
                {"img": "https://img.test/2.jpg", "width": 640, "height": 480},
            ],
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/random"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [
                {"id": "p3", "image_url": "https://img.test/3.jpg", "width": 500, "height": 500},
                {"id": "broken", "image_url": "https://img.test/4.jpg", "width": 0, "height": 500},
            ],
            "has_more": false,
        })))
        .expect(1)
        .mount(&server)
        .await;

    let pager = FeedPager::new(gateway(remote_config(&server)));

    assert_eq!(
        pager.start().await,
        Some(LoadOutcome::Loaded {
            page_number: 1,
            added: 2
        })
    );
    assert_eq!(
        pager.on_proximity().await,
        LoadOutcome::Loaded {
            page_number: 2,
            added: 1
        }
    );
    assert_eq!(pager.on_proximity().await, LoadOutcome::Exhausted);

    let items = pager.items();
    assert_eq!(items.len(), 3);
    assert_eq!(items[0].id, "p1");
    assert_eq!(items[1].image_url, "https://img.test/2.jpg");
    assert!(!items[1].id.is_empty());
    assert_eq!(items[2].id, "p3");
    assert!(pager.is_exhausted());
}

#[tokio::test]
async fn remote_feed_failure_is_retried_on_next_signal() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/random"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream down"))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/random"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{"id": "p1", "image_url": "https://img.test/1.jpg", "width": 10, "height": 10}],
        })))
        .mount(&server)
        .await;

    let pager = FeedPager::new(gateway(remote_config(&server)));

    assert!(matches!(pager.load_next().await, LoadOutcome::Failed(_)));
    assert!(!pager.is_loading());
    assert_eq!(pager.current_page(), 0);
    assert!(pager.last_error().is_some());

    assert_eq!(
        pager.on_proximity().await,
        LoadOutcome::Loaded {
            page_number: 1,
            added: 1
        }
    );
    assert_eq!(pager.last_error(), None);
}

#[tokio::test]
async fn synthetic_feed_never_runs_out() {
    let pager = FeedPager::new(gateway(GatewayConfig::default()));

    for expected_page in 1..=3 {
        assert_eq!(
            pager.load_next().await,
            LoadOutcome::Loaded {
                page_number: expected_page,
                added: 12
            }
        );
    }
    assert_eq!(pager.len(), 36);
    assert!(!pager.is_exhausted());
    assert!(
        pager
            .items()
            .iter()
            .all(|item| item.has_valid_dimensions())
    );
}
