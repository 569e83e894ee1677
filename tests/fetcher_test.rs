// Tests for ForecastFetcher against a mocked upstream
// Uses mockito for HTTP mocking

use flood_forecast_service::fetch_error::FetchError;
use flood_forecast_service::fetcher::ForecastFetcher;
use mockito::Server;

#[tokio::test]
async fn test_fetch_forecast_success() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", "/forecast/")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"5": {"07-04-2024": 3.2, "07-05-2024": 3.6}, "7": {}}"#)
        .create_async()
        .await;

    let fetcher = ForecastFetcher::new(format!("{}/forecast/", server.url()));
    let payload = fetcher.fetch_forecast().await.unwrap();

    assert_eq!(payload.len(), 2);
    assert_eq!(payload["5"]["07-05-2024"], 3.6);
    let keys: Vec<&String> = payload.keys().collect();
    assert_eq!(keys, vec!["5", "7"]);

    mock.assert_async().await;
}

#[tokio::test]
async fn test_fetch_forecast_server_error() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", "/forecast/")
        .with_status(500)
        .create_async()
        .await;

    let fetcher = ForecastFetcher::new(format!("{}/forecast/", server.url()));
    let result = fetcher.fetch_forecast().await;

    match result {
        Err(FetchError::Status(status)) => assert_eq!(status.as_u16(), 500),
        other => panic!("Expected Status error, got {:?}", other),
    }

    mock.assert_async().await;
}

#[tokio::test]
async fn test_fetch_forecast_not_found() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", "/forecast/")
        .with_status(404)
        .create_async()
        .await;

    let fetcher = ForecastFetcher::new(format!("{}/forecast/", server.url()));
    let result = fetcher.fetch_forecast().await;

    assert!(matches!(result, Err(FetchError::Status(s)) if s.as_u16() == 404));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_fetch_forecast_malformed_json() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", "/forecast/")
        .with_status(200)
        .with_body("<html>maintenance</html>")
        .create_async()
        .await;

    let fetcher = ForecastFetcher::new(format!("{}/forecast/", server.url()));
    let result = fetcher.fetch_forecast().await;

    assert!(matches!(result, Err(FetchError::Json(_))));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_fetch_forecast_non_object_body() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", "/forecast/")
        .with_status(200)
        .with_body("[]")
        .create_async()
        .await;

    let fetcher = ForecastFetcher::new(format!("{}/forecast/", server.url()));
    let result = fetcher.fetch_forecast().await;

    assert!(matches!(result, Err(FetchError::UnexpectedShape)));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_fetch_forecast_connection_refused() {
    // Nothing listens on port 9 on a test host
    let fetcher = ForecastFetcher::new("http://127.0.0.1:9/forecast/".to_string());
    let result = fetcher.fetch_forecast().await;

    assert!(matches!(result, Err(FetchError::Request(_))));
}
