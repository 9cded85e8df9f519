//! Integration tests for the request enricher
//!
//! Drives `RequestEnricher` through its public API with fixed providers and checks the
//! produced property names and rendered values.

use chrono::{TimeZone, Utc};
use elif_enrich::testing::{absent_provider, provider_for, sample_request};
use elif_enrich::{
    CookieEntry, DefaultPropertyFactory, Enricher, EnricherConfig, FileEntry, LogEvent,
    PropertyValue, RequestEnricher, RequestInfo,
};
use tracing::Level;
use url::Url;

fn enrich_with(request: RequestInfo) -> LogEvent {
    let enricher = RequestEnricher::new(provider_for(request));
    let mut event = LogEvent::new(Level::INFO, "Has request properties");
    enricher
        .enrich(&mut event, &DefaultPropertyFactory)
        .expect("enrichment should succeed");
    event
}

/// Rendered value of a property, as it would appear in a log template
fn rendered(event: &LogEvent, name: &str) -> String {
    event
        .property(name)
        .unwrap_or_else(|| panic!("missing property {}", name))
        .to_string()
}

#[test]
fn test_accept_types_render_as_sequence() {
    let event = enrich_with(RequestInfo::new().with_accept_types(["Type1", "Type2"]));
    assert_eq!(rendered(&event, "Request.AcceptTypes"), r#"["Type1", "Type2"]"#);
}

#[test]
fn test_empty_accept_types_is_empty_sequence() {
    let event = enrich_with(RequestInfo::new());
    assert_eq!(rendered(&event, "Request.AcceptTypes"), "[]");
}

#[test]
fn test_string_fields() {
    let request = RequestInfo {
        anonymous_id: Some("SET".to_string()),
        application_path: Some("SET".to_string()),
        content_type: Some("SET".to_string()),
        physical_application_path: Some("SET".to_string()),
        physical_path: Some("SET".to_string()),
        raw_url: Some("SET".to_string()),
        request_type: Some("SET".to_string()),
        user_agent: Some("SET".to_string()),
        user_host_address: Some("SET".to_string()),
        user_host_name: Some("SET".to_string()),
        ..RequestInfo::new()
    };
    let event = enrich_with(request);

    for field in [
        "AnonymousID",
        "ApplicationPath",
        "ContentType",
        "PhysicalApplicationPath",
        "PhysicalPath",
        "RawUrl",
        "RequestType",
        "UserAgent",
        "UserHostAddress",
        "UserHostName",
    ] {
        assert_eq!(rendered(&event, &format!("Request.{}", field)), "\"SET\"", "{}", field);
    }
}

#[test]
fn test_http_method() {
    let event = enrich_with(RequestInfo::new().with_method("GET"));
    assert_eq!(rendered(&event, "Request.HttpMethod"), "\"GET\"");
    assert_eq!(rendered(&event, "Request.RequestType"), "\"GET\"");
}

#[test]
fn test_numeric_fields() {
    let request = RequestInfo {
        content_length: 123,
        total_bytes: 100,
        ..RequestInfo::new()
    };
    let event = enrich_with(request);
    assert_eq!(rendered(&event, "Request.ContentLength"), "123");
    assert_eq!(rendered(&event, "Request.TotalBytes"), "100");
}

#[test]
fn test_boolean_fields() {
    let request = RequestInfo {
        is_authenticated: true,
        is_local: true,
        is_secure_connection: true,
        ..RequestInfo::new()
    };
    let event = enrich_with(request);
    assert_eq!(rendered(&event, "Request.IsAuthenticated"), "true");
    assert_eq!(rendered(&event, "Request.IsLocal"), "true");
    assert_eq!(rendered(&event, "Request.IsSecureConnection"), "true");
}

#[test]
fn test_urls() {
    let serilog = Url::parse("http://serilog.net/").unwrap();
    let request = RequestInfo {
        url_referrer: Some(serilog.clone()),
        ..RequestInfo::new().with_url(serilog)
    };
    let event = enrich_with(request);
    assert_eq!(rendered(&event, "Request.Url"), "\"http://serilog.net/\"");
    assert_eq!(rendered(&event, "Request.UrlReferrer"), "\"http://serilog.net/\"");
}

#[test]
fn test_unset_urls_are_empty_strings() {
    let event = enrich_with(RequestInfo::new());
    assert_eq!(rendered(&event, "Request.Url"), "\"\"");
    assert_eq!(rendered(&event, "Request.UrlReferrer"), "\"\"");
}

#[test]
fn test_content_encoding() {
    let event = enrich_with(RequestInfo::new().with_content_encoding(encoding_rs::UTF_8));
    assert_eq!(rendered(&event, "Request.ContentEncoding"), "\"UTF-8\"");

    let event = enrich_with(RequestInfo::new());
    assert_eq!(rendered(&event, "Request.ContentEncoding"), "null");
}

#[test]
fn test_cookies() {
    let expires = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
    let request = (1..=3).fold(RequestInfo::new(), |request, i| {
        request.with_cookie(
            CookieEntry::new(format!("test-{}", i), format!("My Cookie {}", i)).with_expires(expires),
        )
    });
    let event = enrich_with(request);

    let cookie_properties = event
        .property_names()
        .filter(|name| name.starts_with("Request.Cookies["))
        .count();
    assert_eq!(cookie_properties, 15);

    assert_eq!(rendered(&event, "Request.Cookies[test-1].Name"), "\"test-1\"");
    assert_eq!(rendered(&event, "Request.Cookies[test-1].Value"), "\"My Cookie 1\"");
    assert_eq!(rendered(&event, "Request.Cookies[test-1].Domain"), "\"\"");
    assert_eq!(
        rendered(&event, "Request.Cookies[test-1].Expires"),
        "\"2020-01-01 00:00:00Z\""
    );
    assert_eq!(rendered(&event, "Request.Cookies[test-1].Path"), "\"/\"");
}

#[test]
fn test_repeated_cookie_name_keeps_first() {
    let request = RequestInfo::new()
        .with_cookie(CookieEntry::new("dup", "first"))
        .with_cookie(CookieEntry::new("dup", "second"));
    let event = enrich_with(request);
    assert_eq!(rendered(&event, "Request.Cookies[dup].Value"), "\"first\"");
}

#[test]
fn test_files() {
    let request = (1..=3u64).fold(RequestInfo::new(), |request, i| {
        let name = format!("test{}.aspx", i);
        request.with_file(name.clone(), FileEntry::new(name, i, format!("content-type-{}", i)))
    });
    let event = enrich_with(request);

    let file_properties = event
        .property_names()
        .filter(|name| name.starts_with("Request.Files["))
        .count();
    assert_eq!(file_properties, 9);

    assert_eq!(rendered(&event, "Request.Files[test1.aspx].FileName"), "\"test1.aspx\"");
    assert_eq!(rendered(&event, "Request.Files[test1.aspx].ContentLength"), "1");
    assert_eq!(
        rendered(&event, "Request.Files[test1.aspx].ContentType"),
        "\"content-type-1\""
    );
}

#[test]
fn test_form_headers_and_params() {
    let request = RequestInfo::new()
        .with_form_field("username", "john_smith")
        .with_header("Accept-Language", "en-US")
        .with_param("page", "2");
    let event = enrich_with(request);

    assert_eq!(rendered(&event, "Request.Form[username]"), "\"john_smith\"");
    assert_eq!(rendered(&event, "Request.Headers[Accept-Language]"), "\"en-US\"");
    assert_eq!(rendered(&event, "Request.Params[page]"), "\"2\"");
}

#[test]
fn test_repeated_header_is_combined() {
    let request = RequestInfo::new()
        .with_header("Accept", "text/html")
        .with_header("accept", "application/json");
    let event = enrich_with(request);

    assert_eq!(
        rendered(&event, "Request.Headers[Accept]"),
        "\"text/html,application/json\""
    );
    assert!(!event.contains_property("Request.Headers[accept]"));
}

#[test]
fn test_absent_request_adds_nothing() {
    let enricher = RequestEnricher::new(absent_provider());
    let mut event = LogEvent::new(Level::INFO, "no request");
    enricher.enrich(&mut event, &DefaultPropertyFactory).unwrap();
    assert_eq!(event.property_count(), 0);
}

#[test]
fn test_enriching_twice_equals_enriching_once() {
    let enricher = RequestEnricher::new(provider_for(sample_request()));
    let timestamp = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();

    let mut once = LogEvent::with_timestamp(timestamp, Level::INFO, "idempotent");
    enricher.enrich(&mut once, &DefaultPropertyFactory).unwrap();

    let mut twice = LogEvent::with_timestamp(timestamp, Level::INFO, "idempotent");
    enricher.enrich(&mut twice, &DefaultPropertyFactory).unwrap();
    enricher.enrich(&mut twice, &DefaultPropertyFactory).unwrap();

    assert_eq!(once.to_json().unwrap(), twice.to_json().unwrap());
}

#[test]
fn test_existing_property_is_never_overwritten() {
    let enricher = RequestEnricher::new(provider_for(RequestInfo::new().with_method("GET")));
    let mut event =
        LogEvent::new(Level::INFO, "caller wins").with_property("Request.HttpMethod", "OVERRIDE");

    enricher.enrich(&mut event, &DefaultPropertyFactory).unwrap();
    assert_eq!(
        event.property("Request.HttpMethod"),
        Some(&PropertyValue::from("OVERRIDE"))
    );
}

#[test]
fn test_disabled_collections_are_skipped() {
    let config = EnricherConfig::default().with_headers(false).with_cookies(false);
    let enricher = RequestEnricher::with_config(provider_for(sample_request()), config);

    let mut event = LogEvent::new(Level::INFO, "partial");
    enricher.enrich(&mut event, &DefaultPropertyFactory).unwrap();

    assert!(!event.property_names().any(|name| name.starts_with("Request.Headers[")));
    assert!(!event.property_names().any(|name| name.starts_with("Request.Cookies[")));
    assert!(event.contains_property("Request.Form[username]"));
    assert!(event.contains_property("Request.Files[avatar].FileName"));
}

#[test]
fn test_event_serializes_enriched_properties() {
    let event = enrich_with(sample_request());
    let json = event.to_json().expect("event serializes");

    assert_eq!(json["level"], "INFO");
    assert_eq!(json["properties"]["Request.HttpMethod"], "POST");
    assert_eq!(json["properties"]["Request.ContentLength"], 23);
    assert_eq!(
        json["properties"]["Request.AcceptTypes"],
        serde_json::json!(["text/html", "application/json"])
    );
    assert_eq!(
        json["properties"]["Request.Cookies[session].Expires"],
        "2020-01-01 00:00:00Z"
    );
}
