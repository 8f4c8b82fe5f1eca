use super::gateway_for;
use multiseek_core::SearchSession;
use multiseek_core::SearchState;
use multiseek_core::SubmitOutcome;
use multiseek_protocol::Query;
use multiseek_protocol::SearchMode;
use multiseek_protocol::SearchOptions;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::time::Duration;
use wiremock::Mock;
use wiremock::MockServer;
use wiremock::ResponseTemplate;
use wiremock::matchers::body_partial_json;
use wiremock::matchers::method;
use wiremock::matchers::path;

#[test_log::test(tokio::test)]
async fn text_search_populates_results_and_stats() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/search"))
        .and(body_partial_json(json!({
            "query": "sunset over water",
            "modality": "text",
            "top_k": 3,
            "search_type": "hybrid",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [
                {"id": "a", "score": 0.91, "metadata": {"title": "Lake"}},
                {"id": 7, "score": 0.42, "payload": {"title": "Bay"}},
            ],
            "query": "sunset over water",
            "total": 2,
            "latency_ms": 12.5,
        })))
        .expect(1)
        .mount(&server)
        .await;

    let session = SearchSession::new(gateway_for(&server));
    let options = SearchOptions::default()
        .with_top_k(3)
        .with_mode(SearchMode::Hybrid);
    let outcome = session
        .submit(Query::text("  sunset over water "), options)
        .await
        .expect("valid query");

    assert_eq!(outcome, SubmitOutcome::Succeeded);
    let snapshot = session.snapshot();
    assert_eq!(snapshot.state, SearchState::Succeeded);
    let ids: Vec<_> = snapshot.results.iter().map(|hit| hit.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "7"]);
    assert_eq!(
        snapshot.results[1].metadata.get("title"),
        Some(&json!("Bay"))
    );
    let stats = snapshot.stats.expect("stats recorded");
    assert_eq!(stats.count, 2);
    assert_eq!(stats.elapsed_ms, 12.5);
}

#[tokio::test]
async fn backend_error_surfaces_detail() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/search"))
        .respond_with(ResponseTemplate::new(503).set_body_json(json!({"detail": "warming up"})))
        .mount(&server)
        .await;

    let session = SearchSession::new(gateway_for(&server));
    let outcome = session
        .submit(Query::text("cats"), SearchOptions::default())
        .await
        .expect("valid query");

    assert_eq!(outcome, SubmitOutcome::Failed);
    assert_eq!(session.state(), SearchState::Failed);
    assert_eq!(
        session.error().as_deref(),
        Some("search failed with status 503: warming up")
    );
}

#[tokio::test]
async fn slow_stale_response_is_ignored() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/search"))
        .and(body_partial_json(json!({"query": "cats"})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(300))
                .set_body_json(json!({"results": [{"id": "cat", "score": 0.9}], "count": 1})),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/search"))
        .and(body_partial_json(json!({"query": "dogs"})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"results": [{"id": "dog", "score": 0.8}], "count": 1})),
        )
        .mount(&server)
        .await;

    let session = SearchSession::new(gateway_for(&server));
    let (cats, dogs) = tokio::join!(
        session.submit(Query::text("cats"), SearchOptions::default()),
        async {
            tokio::time::sleep(Duration::from_millis(20)).await;
            session
                .submit(Query::text("dogs"), SearchOptions::default())
                .await
        }
    );

    assert_eq!(cats, Ok(SubmitOutcome::Superseded));
    assert_eq!(dogs, Ok(SubmitOutcome::Succeeded));
    let ids: Vec<_> = session.results().into_iter().map(|hit| hit.id).collect();
    assert_eq!(ids, vec!["dog"]);
    assert_eq!(session.query(), Some(Query::text("dogs")));
}
