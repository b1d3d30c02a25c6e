//! Fetch-once semantics of the sponsors and contributors services against a
//! mock server.

use serde_json::json;
use swiftgg_reader::config::SiteConfig;
use swiftgg_reader::site::contributors::ContributorsService;
use swiftgg_reader::site::sponsors::{SponsorLevel, SponsorsService};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config(server: &MockServer) -> SiteConfig {
    SiteConfig {
        sponsors_url: format!("{}/sponsors.json", server.uri()),
        contributors_url: format!("{}/contributors.json", server.uri()),
        request_timeout_ms: 5_000,
    }
}

fn sponsors_body() -> serde_json::Value {
    json!({
        "sponsors": [
            {
                "id": "s1",
                "name": "Gold Co",
                "imageURL": "https://example.com/g.png",
                "websiteURL": "https://gold.example.com",
                "level": "gold"
            },
            {
                "id": "s2",
                "name": "Diamond Co",
                "imageURL": "https://example.com/d.png",
                "websiteURL": "https://diamond.example.com",
                "level": "diamond"
            }
        ]
    })
}

#[tokio::test]
async fn test_sponsors_load_once_and_sort_by_tier() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/sponsors.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sponsors_body()))
        .expect(1)
        .mount(&server)
        .await;

    let service = SponsorsService::new(&config(&server));
    service.fetch().await;
    // Data is present, so this must not hit the server again.
    service.fetch().await;

    let state = service.state();
    assert_eq!(state.sponsors.len(), 2);
    assert_eq!(state.sponsors[0].level, SponsorLevel::Diamond);
    assert_eq!(state.sponsors[1].level, SponsorLevel::Gold);
    assert_eq!(state.error, None);
    assert!(!state.is_loading);
}

#[tokio::test]
async fn test_sponsors_force_refresh_refetches() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/sponsors.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sponsors_body()))
        .expect(2)
        .mount(&server)
        .await;

    let service = SponsorsService::new(&config(&server));
    service.fetch().await;
    service.force_refresh().await;
    assert_eq!(service.state().sponsors.len(), 2);
}

#[tokio::test]
async fn test_sponsors_error_is_recorded_and_retryable() {
    let server = MockServer::start().await;
    let config = config(&server);

    let failing = Mock::given(method("GET"))
        .and(path("/sponsors.json"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount_as_scoped(&server)
        .await;

    let service = SponsorsService::new(&config);
    service.fetch().await;
    let state = service.state();
    assert!(state.sponsors.is_empty());
    assert!(state.error.is_some());
    drop(failing);

    // A failed attempt does not latch the loaded flag.
    Mock::given(method("GET"))
        .and(path("/sponsors.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sponsors_body()))
        .expect(1)
        .mount(&server)
        .await;

    service.fetch().await;
    let state = service.state();
    assert_eq!(state.sponsors.len(), 2);
    assert_eq!(state.error, None);
}

#[tokio::test]
async fn test_contributors_load_once() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/contributors.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "contributors": [
                { "id": "c1", "name": "Wei", "role": "Translator",
                  "url": "https://github.com/wei", "avatar": "https://example.com/wei.png" },
                { "id": "c2", "name": "Lin", "role": "Editor",
                  "avatar": "data:image/png;base64,AAAA" }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let service = ContributorsService::new(&config(&server));
    service.fetch().await;
    service.fetch().await;

    let state = service.state();
    assert_eq!(state.contributors.len(), 2);
    assert_eq!(
        state.contributors[0].avatar_url(),
        Some("https://example.com/wei.png")
    );
    assert_eq!(state.contributors[1].avatar_url(), None);
    assert_eq!(state.error, None);
}
