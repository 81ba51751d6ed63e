use std::collections::HashMap;

use marquee::catalog::{CatalogError, MovieService, TmdbClient};
use serde_json::{Value, json};
use tokio_test::{assert_err, assert_ok};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
};

// ============================================================================
// Helper Functions
// ============================================================================

/// A TMDB-shaped list page with `count` movies starting at `first_id`.
fn movie_page_json(page: u32, total_pages: u32, first_id: u64, count: u64) -> Value {
    let results: Vec<Value> = (first_id..first_id + count)
        .map(|id| {
            json!({
                "id": id,
                "title": format!("Movie {id}"),
                "overview": "",
                "release_date": "2021-06-01",
                "vote_average": 6.8,
                "vote_count": 1200,
                "popularity": 55.2,
                "poster_path": null,
                "original_language": "en",
                "genre_ids": [18, 53],
                "adult": false
            })
        })
        .collect();
    json!({
        "page": page,
        "results": results,
        "total_pages": total_pages,
        "total_results": total_pages as u64 * count
    })
}

fn filters(sort_by: &str, page: u32) -> HashMap<String, String> {
    HashMap::from([
        ("sort_by".to_string(), sort_by.to_string()),
        ("page".to_string(), page.to_string()),
    ])
}

// ============================================================================
// Discover
// ============================================================================

#[tokio::test]
async fn test_discover_sends_key_filters_and_language() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/discover/movie"))
        .and(query_param("api_key", "test-key"))
        .and(query_param("sort_by", "vote_average.desc"))
        .and(query_param("page", "2"))
        .and(query_param("language", "de-DE"))
        .respond_with(ResponseTemplate::new(200).set_body_json(movie_page_json(2, 5, 21, 20)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = TmdbClient::new("test-key".to_string(), Some(mock_server.uri()))
        .with_language(Some("de-DE".to_string()));

    let envelope = client
        .discover(&filters("vote_average.desc", 2))
        .await
        .expect("request should succeed");

    assert!(envelope.is_success());
    assert_eq!(envelope.status, 200);
    let body = envelope.body.expect("2xx carries a body");
    assert_eq!(body.page, 2);
    assert_eq!(body.results.len(), 20);
    assert_eq!(body.results[0].id, 21);
    assert_eq!(body.results[0].release_year(), Some(2021));
    assert_eq!(body.next_page(), Some(3));
}

#[tokio::test]
async fn test_empty_release_date_is_accepted() {
    let mock_server = MockServer::start().await;

    let body = json!({
        "page": 1,
        "results": [{ "id": 7, "title": "Untitled", "release_date": "" }],
        "total_pages": 1,
        "total_results": 1
    });
    Mock::given(method("GET"))
        .and(path("/discover/movie"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&mock_server)
        .await;

    let client = TmdbClient::new("test-key".to_string(), Some(mock_server.uri()));
    let envelope = client
        .discover(&filters("popularity.desc", 1))
        .await
        .unwrap();

    let response = envelope.body.unwrap();
    assert_eq!(response.results[0].release_date, None);
    assert_eq!(response.next_page(), None);
}

// ============================================================================
// Upcoming
// ============================================================================

#[tokio::test]
async fn test_upcoming_pages_are_distinct_requests() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/movie/upcoming"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(movie_page_json(1, 2, 1, 20)))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/movie/upcoming"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(movie_page_json(2, 2, 21, 5)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = TmdbClient::new("test-key".to_string(), Some(mock_server.uri()))
        .with_region(Some("GB".to_string()));

    let (first, second) = futures::future::join(
        client.fetch_upcoming_movies(1),
        client.fetch_upcoming_movies(2),
    )
    .await;
    let first = assert_ok!(first).body.unwrap();
    let second = assert_ok!(second).body.unwrap();

    assert_eq!(first.results.len(), 20);
    assert_eq!(second.results.len(), 5);
    assert_eq!(second.results[0].id, 21);
    assert_eq!(second.next_page(), None);

    let requests = mock_server.received_requests().await.unwrap();
    assert!(
        requests
            .iter()
            .all(|r| r.url.query().is_some_and(|q| q.contains("region=GB")))
    );
}

// ============================================================================
// Failures
// ============================================================================

#[tokio::test]
async fn test_non_success_status_yields_failure_envelope() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/discover/movie"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_string(r#"{"status_code":7,"status_message":"Invalid API key"}"#),
        )
        .mount(&mock_server)
        .await;

    let client = TmdbClient::new("bad-key".to_string(), Some(mock_server.uri()));
    let envelope = client
        .discover(&filters("popularity.desc", 1))
        .await
        .expect("HTTP errors are reported in the envelope");

    assert!(!envelope.is_success());
    assert_eq!(envelope.status, 401);
    assert!(envelope.body.is_none());
    assert!(envelope.error_body.unwrap().contains("Invalid API key"));
}

#[tokio::test]
async fn test_malformed_body_is_parse_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/movie/upcoming"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&mock_server)
        .await;

    let client = TmdbClient::new("test-key".to_string(), Some(mock_server.uri()));
    let error = assert_err!(client.fetch_upcoming_movies(1).await);

    assert!(matches!(error, CatalogError::Parse(_)));
}

#[tokio::test]
async fn test_unreachable_server_is_network_error() {
    // Nothing listens on port 1.
    let client = TmdbClient::new("test-key".to_string(), Some("http://127.0.0.1:1".to_string()));
    let error = assert_err!(client.fetch_upcoming_movies(1).await);

    assert!(matches!(error, CatalogError::Network(_)));
}
