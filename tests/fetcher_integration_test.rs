use httpmock::prelude::*;
use serde_json::json;
use spm_client::{
    ExerciseFetcher, ExerciseSource, FetchOutcome, FetcherConfig, ListingRequest, RetryPolicy,
    SpmError,
};
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

fn fetcher(base_url: String, attempts: u32) -> ExerciseFetcher {
    ExerciseFetcher::new(FetcherConfig {
        base_url,
        timeout: Duration::from_secs(5),
        retry: RetryPolicy::immediate(attempts),
    })
    .unwrap()
}

fn wger_page() -> serde_json::Value {
    json!({
        "count": 845,
        "next": "https://wger.de/api/v2/exerciseinfo/?language=2&limit=3&offset=3",
        "previous": null,
        "results": [
            {
                "id": 31,
                "category": {"id": 8, "name": "Arms"},
                "muscles": [{"id": 1, "name": "Biceps brachii"}, {"id": 13, "name": "Brachialis"}],
                "translations": [
                    {"language": 2, "name": "Curl de bíceps", "description": "<p>Flexión de codo</p>"},
                    {"language": 1, "name": "Biceps curl", "description": "<p>Elbow flexion</p>"}
                ]
            },
            {
                "id": 32,
                "category": {"id": 10, "name": "Abs"},
                "muscles": [],
                "translations": [
                    {"language": 1, "name": "Crunches", "description": "<p>Abs</p>"}
                ]
            },
            {
                "id": 33,
                "category": null,
                "translations": []
            }
        ]
    })
}

#[tokio::test]
async fn test_fetch_normalizes_wger_page() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/api/v2/exerciseinfo/")
            .query_param("language", "2")
            .query_param("limit", "3");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(wger_page());
    });

    let fetcher = fetcher(server.url("/api/v2/exerciseinfo/"), 3);
    let request = ListingRequest::new(3, 2u64).unwrap();
    let listing = fetcher.fetch(&request).await.unwrap();

    mock.assert();
    assert_eq!(listing.count, 845);
    assert_eq!(
        listing.next.as_deref(),
        Some("https://wger.de/api/v2/exerciseinfo/?language=2&limit=3&offset=3")
    );
    assert_eq!(listing.previous, None);
    assert_eq!(listing.results.len(), 3);

    let curl = &listing.results[0];
    assert_eq!(curl.name, "Curl de bíceps");
    assert_eq!(curl.id, Some(31));
    assert_eq!(curl.description.as_deref(), Some("<p>Flexión de codo</p>"));
    assert_eq!(curl.category.as_deref(), Some("Arms"));
    assert_eq!(curl.muscles, vec!["Biceps brachii", "Brachialis"]);

    let crunches = &listing.results[1];
    assert_eq!(crunches.name, "Crunches");
    assert_eq!(crunches.description, None);

    let unnamed = &listing.results[2];
    assert_eq!(unnamed.name, "Ejercicio sin nombre");
    assert_eq!(unnamed.category, None);
    assert!(unnamed.muscles.is_empty());
}

#[tokio::test]
async fn test_not_found_is_not_retried() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).path("/api/v2/exerciseinfo/");
        then.status(404);
    });

    let fetcher = fetcher(server.url("/api/v2/exerciseinfo/"), 10);
    let request = ListingRequest::new(5, 2u64).unwrap();
    let outcome = fetcher.fetch_outcome(&request).await;

    assert_eq!(mock.hits(), 1);
    match outcome {
        FetchOutcome::Failed { error } => assert!(error.contains("404")),
        other => panic!("expected error projection, got {:?}", other),
    }
}

#[tokio::test]
async fn test_persistent_unavailability_exhausts_attempts() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).path("/api/v2/exerciseinfo/");
        then.status(503);
    });

    let fetcher = fetcher(server.url("/api/v2/exerciseinfo/"), 4);
    let request = ListingRequest::new(5, 2u64).unwrap();
    let result = fetcher.fetch(&request).await;

    assert_eq!(mock.hits(), 4);
    assert!(matches!(
        result,
        Err(SpmError::RetriesExhausted {
            attempts: 4,
            status: 503,
            ..
        })
    ));
}

#[tokio::test]
async fn test_transient_503_then_success() {
    let server = wiremock::MockServer::start().await;
    // 先掛上的 mock 優先比對，用完兩次後改由 200 回應
    Mock::given(method("GET"))
        .and(path("/api/v2/exerciseinfo/"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v2/exerciseinfo/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 1,
            "next": null,
            "previous": null,
            "results": [{"id": 5, "translations": [{"language": 2, "name": "Sentadilla"}]}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let fetcher = fetcher(format!("{}/api/v2/exerciseinfo/", server.uri()), 10);
    let request = ListingRequest::new(1, 2u64).unwrap();
    let outcome = fetcher.fetch_outcome(&request).await;

    let received = server.received_requests().await.unwrap();
    assert_eq!(received.len(), 3);
    match outcome {
        FetchOutcome::Listing(listing) => {
            assert_eq!(listing.count, 1);
            assert_eq!(listing.results[0].name, "Sentadilla");
        }
        other => panic!("expected listing, got {:?}", other),
    }
}

#[tokio::test]
async fn test_internal_server_error_is_not_retried() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).path("/api/v2/exerciseinfo/");
        then.status(500).json_body(json!({}));
    });

    let fetcher = fetcher(server.url("/api/v2/exerciseinfo/"), 10);
    let request = ListingRequest::new(1, 2u64).unwrap();
    let result = fetcher.fetch(&request).await;

    assert_eq!(mock.hits(), 1);
    assert!(matches!(
        result,
        Err(SpmError::StatusError { status: 500, .. })
    ));
}

#[tokio::test]
async fn test_timeout_becomes_error_projection() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).path("/api/v2/exerciseinfo/");
        then.status(200)
            .delay(Duration::from_secs(2))
            .json_body(wger_page());
    });

    let fetcher = ExerciseFetcher::new(FetcherConfig {
        base_url: server.url("/api/v2/exerciseinfo/"),
        timeout: Duration::from_millis(200),
        retry: RetryPolicy::immediate(5),
    })
    .unwrap();
    let request = ListingRequest::new(3, 2u64).unwrap();
    let outcome = fetcher.fetch_outcome(&request).await;

    // 逾時不屬於可重試的狀態碼
    assert!(mock.hits() <= 1);
    assert!(matches!(outcome, FetchOutcome::Failed { .. }));
}

#[tokio::test]
async fn test_connection_refused_becomes_error_projection() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let fetcher = fetcher(format!("http://{}/api/v2/exerciseinfo/", addr), 3);
    let request = ListingRequest::new(3, 2u64).unwrap();
    let outcome = fetcher.fetch_outcome(&request).await;

    let value = serde_json::to_value(&outcome).unwrap();
    assert!(value["error"].is_string());
}

#[tokio::test]
async fn test_fetcher_is_reusable_through_port() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).path("/api/v2/exerciseinfo/");
        then.status(200).json_body(wger_page());
    });

    let fetcher = fetcher(server.url("/api/v2/exerciseinfo/"), 3);
    let source: &dyn ExerciseSource = &fetcher;

    let spanish = ListingRequest::new(3, 2u64).unwrap();
    let english = ListingRequest::new(3, 1u64).unwrap();
    let first = source.list_exercises(&spanish).await.unwrap();
    let second = source.list_exercises(&english).await.unwrap();

    mock.assert_hits(2);
    assert_eq!(first.results[0].name, "Curl de bíceps");
    assert_eq!(second.results[0].name, "Biceps curl");
    assert_eq!(
        second.results[0].description.as_deref(),
        Some("<p>Elbow flexion</p>")
    );
}
