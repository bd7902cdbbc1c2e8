//! Integration tests for the geoblock filter
//!
//! Drives axum routers guarded by GeoBlockLayer with an in-memory
//! resolver and with the MaxMind test database under tests/data.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::routing::get;
use axum::Router;
use geoblock::config::Config;
use geoblock::{
    ConfigError, CountryPolicy, CountryResolver, GeoBlockLayer, GeoBlockService,
    StaticCountryResolver,
};
use std::sync::Arc;
use tower::ServiceExt;

const NONE: [&str; 0] = [];
const US_IP: &str = "1.1.1.1";
const CZECH_IP: &str = "188.92.102.22";
const POLISH_IP: &str = "83.0.0.1";
const PRIVATE_IP: &str = "192.168.178.66";

fn static_resolver() -> Arc<dyn CountryResolver> {
    Arc::new(
        StaticCountryResolver::new()
            .with(US_IP, "US")
            .with(CZECH_IP, "CZ")
            .with(POLISH_IP, "PL")
            .with(PRIVATE_IP, "-"),
    )
}

fn app(service: GeoBlockService) -> Router {
    Router::new()
        .route("/foobar", get(|| async { StatusCode::IM_A_TEAPOT }))
        .layer(GeoBlockLayer::new(Arc::new(service)))
}

fn guarded(policy: CountryPolicy) -> Router {
    app(GeoBlockService::new("geoblock", true, policy, Some(static_resolver())).unwrap())
}

async fn status_for(router: Router, headers: &[(&str, &str)]) -> StatusCode {
    let mut builder = Request::builder().uri("/foobar");
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    let req = builder.body(Body::empty()).unwrap();
    router.oneshot(req).await.unwrap().status()
}

/// Test construction failures surface before any request is served
#[test]
fn test_construction_errors() {
    let result = CountryPolicy::new(["US"], ["PL"], false);
    assert!(matches!(result, Err(ConfigError::ConflictingCountryLists)));

    let cfg = Config {
        enabled: true,
        database_path: None,
        ..Config::default()
    };
    assert!(matches!(
        GeoBlockService::from_config(&cfg),
        Err(ConfigError::MissingDatabasePath)
    ));

    // Conflicting lists are rejected even when the filter is off
    let cfg = Config {
        enabled: false,
        allowed_countries: vec!["US".into()],
        disallowed_countries: vec!["PL".into()],
        ..Config::default()
    };
    assert!(matches!(
        GeoBlockService::from_config(&cfg),
        Err(ConfigError::ConflictingCountryLists)
    ));
}

/// Test a disabled filter lets everything through, whatever the headers say
#[tokio::test]
async fn test_disabled_filter() {
    let service = GeoBlockService::from_config(&Config::default()).unwrap();
    let router = app(service);

    assert_eq!(status_for(router.clone(), &[]).await, StatusCode::IM_A_TEAPOT);
    assert_eq!(
        status_for(router, &[("X-Forwarded-For", "garbage, 10.0.0.1")]).await,
        StatusCode::IM_A_TEAPOT
    );
}

/// Test the allow-list scenarios
#[tokio::test]
async fn test_allowed_countries() {
    let router = guarded(CountryPolicy::new(["US"], NONE, false).unwrap());
    assert_eq!(status_for(router, &[("X-Real-IP", US_IP)]).await, StatusCode::IM_A_TEAPOT);

    let router = guarded(CountryPolicy::new(["DE"], NONE, false).unwrap());
    assert_eq!(status_for(router, &[("X-Real-IP", US_IP)]).await, StatusCode::FORBIDDEN);
}

/// Test the deny-list scenarios
#[tokio::test]
async fn test_disallowed_countries() {
    let router = guarded(CountryPolicy::new(NONE, ["PL"], false).unwrap());
    assert_eq!(
        status_for(router.clone(), &[("X-Real-IP", POLISH_IP)]).await,
        StatusCode::FORBIDDEN
    );
    assert_eq!(
        status_for(router, &[("X-Real-IP", CZECH_IP)]).await,
        StatusCode::IM_A_TEAPOT
    );
}

/// Test private addresses follow allow_private only
#[tokio::test]
async fn test_private_addresses() {
    let router = guarded(CountryPolicy::new(NONE, NONE, true).unwrap());
    assert_eq!(
        status_for(router, &[("X-Real-IP", PRIVATE_IP)]).await,
        StatusCode::IM_A_TEAPOT
    );

    let router = guarded(CountryPolicy::new(NONE, NONE, false).unwrap());
    assert_eq!(
        status_for(router, &[("X-Real-IP", PRIVATE_IP)]).await,
        StatusCode::FORBIDDEN
    );
}

/// Test one denied IP anywhere in the headers denies the request
#[tokio::test]
async fn test_deny_wins_across_headers() {
    let router = guarded(CountryPolicy::new(NONE, ["PL"], false).unwrap());

    let xff = format!("{}, {}", CZECH_IP, US_IP);
    let status = status_for(
        router.clone(),
        &[("X-Forwarded-For", xff.as_str()), ("X-Real-IP", POLISH_IP)],
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let xff = format!("{},{}", CZECH_IP, US_IP);
    let status = status_for(router, &[("x-forwarded-for", xff.as_str()), ("x-real-ip", US_IP)]).await;
    assert_eq!(status, StatusCode::IM_A_TEAPOT);
}

/// Test an unresolvable IP fails closed while missing headers pass
#[tokio::test]
async fn test_lookup_failure_versus_no_headers() {
    let router = guarded(CountryPolicy::new(NONE, ["PL"], false).unwrap());

    let xff = format!("{}, not-an-ip", CZECH_IP);
    assert_eq!(
        status_for(router.clone(), &[("X-Forwarded-For", xff.as_str())]).await,
        StatusCode::FORBIDDEN
    );
    assert_eq!(status_for(router, &[]).await, StatusCode::IM_A_TEAPOT);
}

/// Test concurrent requests share one service without interfering
#[tokio::test]
async fn test_concurrent_requests() {
    let router = guarded(CountryPolicy::new(["US"], NONE, false).unwrap());

    let mut handles = Vec::new();
    for i in 0..32 {
        let router = router.clone();
        handles.push(tokio::spawn(async move {
            let ip = if i % 2 == 0 { US_IP } else { CZECH_IP };
            (i, status_for(router, &[("X-Real-IP", ip)]).await)
        }));
    }

    for handle in handles {
        let (i, status) = handle.await.unwrap();
        let expected = if i % 2 == 0 {
            StatusCode::IM_A_TEAPOT
        } else {
            StatusCode::FORBIDDEN
        };
        assert_eq!(status, expected, "request {}", i);
    }
}

const TEST_DB: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/data/GeoBlock-Country-Test.mmdb");

fn maxmind_app(allowed: &[&str], disallowed: &[&str], allow_private: bool) -> Router {
    let cfg = Config {
        enabled: true,
        database_path: Some(TEST_DB.to_string()),
        allowed_countries: allowed.iter().map(|c| c.to_string()).collect(),
        disallowed_countries: disallowed.iter().map(|c| c.to_string()).collect(),
        allow_private,
        ..Config::default()
    };
    app(GeoBlockService::from_config(&cfg).unwrap())
}

/// Test the allow/deny scenarios against a MaxMind database
#[tokio::test]
async fn test_maxmind_country_scenarios() {
    let router = maxmind_app(&["US"], &[], false);
    assert_eq!(status_for(router, &[("X-Real-IP", US_IP)]).await, StatusCode::IM_A_TEAPOT);

    let router = maxmind_app(&["DE"], &[], false);
    assert_eq!(status_for(router, &[("X-Real-IP", US_IP)]).await, StatusCode::FORBIDDEN);

    let router = maxmind_app(&[], &["PL"], false);
    assert_eq!(
        status_for(router.clone(), &[("X-Real-IP", POLISH_IP)]).await,
        StatusCode::FORBIDDEN
    );
    assert_eq!(
        status_for(router, &[("X-Real-IP", CZECH_IP)]).await,
        StatusCode::IM_A_TEAPOT
    );
}

/// Test private and reserved space follows allow_private against a MaxMind database
#[tokio::test]
async fn test_maxmind_private_scenarios() {
    let reserved = [PRIVATE_IP, "198.18.0.1", "240.0.0.1", "224.0.0.1", "ff02::1", "2001:db8::1"];

    let router = maxmind_app(&[], &[], true);
    for ip in reserved {
        assert_eq!(
            status_for(router.clone(), &[("X-Real-IP", ip)]).await,
            StatusCode::IM_A_TEAPOT,
            "Failed for input: {}",
            ip
        );
    }

    let router = maxmind_app(&[], &[], false);
    for ip in reserved {
        assert_eq!(
            status_for(router.clone(), &[("X-Real-IP", ip)]).await,
            StatusCode::FORBIDDEN,
            "Failed for input: {}",
            ip
        );
    }
}

/// Test public addresses missing from the database fail closed
#[tokio::test]
async fn test_maxmind_unknown_public_ip_denied() {
    let router = maxmind_app(&[], &[], true);
    assert_eq!(status_for(router.clone(), &[("X-Real-IP", "8.8.4.4")]).await, StatusCode::FORBIDDEN);
    assert_eq!(status_for(router, &[("X-Real-IP", "not-an-ip")]).await, StatusCode::FORBIDDEN);
}
