//! Weather provider integration tests
//!
//! The provider contract is "never fails": whether the live service
//! refuses the connection, hangs, returns garbage, or returns an
//! error status, resolution must yield an observation inside the
//! documented fallback ranges.

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use crop_advisory_engine::config::WeatherConfig;
use crop_advisory_engine::services::WeatherProvider;
use shared::WeatherObservation;

fn assert_fallback_plausible(obs: &WeatherObservation) {
    assert!(
        obs.temperature_celsius >= 22.0 && obs.temperature_celsius <= 34.0,
        "temperature out of fallback range: {}",
        obs.temperature_celsius
    );
    assert!(
        obs.rainfall_mm >= 40.0 && obs.rainfall_mm <= 200.0,
        "rainfall out of fallback range: {}",
        obs.rainfall_mm
    );
    assert!(
        obs.humidity_percent >= 55.0 && obs.humidity_percent <= 90.0,
        "humidity out of fallback range: {}",
        obs.humidity_percent
    );
}

/// Serve one canned HTTP response on an ephemeral port.
async fn serve_once(response: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        if let Ok((mut stream, _)) = listener.accept().await {
            let mut request = [0u8; 2048];
            let _ = stream.read(&mut request).await;
            let _ = stream.write_all(response.as_bytes()).await;
            let _ = stream.flush().await;
        }
    });

    format!("http://{addr}")
}

fn provider_for(endpoint: String) -> WeatherProvider {
    WeatherProvider::new(&WeatherConfig {
        api_endpoint: endpoint,
        api_key: Some("test-key".to_string()),
        timeout_seconds: 2,
    })
}

#[tokio::test]
async fn test_resolve_without_credential_never_fails() {
    let provider = WeatherProvider::new(&WeatherConfig {
        api_key: None,
        ..WeatherConfig::default()
    });

    for _ in 0..25 {
        let obs = provider.resolve("Delhi").await;
        assert_fallback_plausible(&obs);
        assert!(obs.humidity_percent >= 0.0 && obs.humidity_percent <= 100.0);
    }
}

#[tokio::test]
async fn test_resolve_with_blank_credential_uses_fallback() {
    let provider = WeatherProvider::new(&WeatherConfig {
        api_key: Some("   ".to_string()),
        ..WeatherConfig::default()
    });

    assert_fallback_plausible(&provider.resolve("Delhi").await);
}

#[tokio::test]
async fn test_resolve_survives_refused_connection() {
    // Port 1 is essentially never listening
    let provider = provider_for("http://127.0.0.1:1".to_string());
    assert_fallback_plausible(&provider.resolve("Delhi").await);
}

#[tokio::test]
async fn test_resolve_survives_malformed_payload() {
    let endpoint = serve_once(
        "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: 8\r\nconnection: close\r\n\r\nnot json",
    )
    .await;

    let provider = provider_for(endpoint);
    assert_fallback_plausible(&provider.resolve("Delhi").await);
}

#[tokio::test]
async fn test_resolve_survives_error_status() {
    let endpoint = serve_once(
        "HTTP/1.1 401 Unauthorized\r\ncontent-type: application/json\r\ncontent-length: 25\r\nconnection: close\r\n\r\n{\"message\":\"invalid key\"}",
    )
    .await;

    let provider = provider_for(endpoint);
    assert_fallback_plausible(&provider.resolve("Delhi").await);
}

#[tokio::test]
async fn test_resolve_uses_live_payload_when_parseable() {
    let endpoint = serve_once(
        "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: 52\r\nconnection: close\r\n\r\n{\"main\":{\"temp\":27.3,\"humidity\":74},\"rain\":{\"1h\":2}}",
    )
    .await;

    let provider = provider_for(endpoint);
    let obs = provider.resolve("Delhi").await;

    assert_eq!(obs.temperature_celsius, 27.3);
    assert_eq!(obs.humidity_percent, 74.0);
    assert_eq!(obs.rainfall_mm, 2.0);
}

#[tokio::test]
async fn test_resolve_survives_hung_provider_within_timeout() {
    // Accept the connection but never answer; the 2s client timeout
    // must bound the call
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        if let Ok((stream, _)) = listener.accept().await {
            tokio::time::sleep(std::time::Duration::from_secs(30)).await;
            drop(stream);
        }
    });

    let provider = provider_for(format!("http://{addr}"));
    let started = std::time::Instant::now();
    let obs = provider.resolve("Delhi").await;

    assert_fallback_plausible(&obs);
    assert!(started.elapsed() < std::time::Duration::from_secs(10));
}
