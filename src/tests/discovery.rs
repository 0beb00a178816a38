use std::path::Path;

use crate::config::FaviconConfig;
use crate::favicon::{CandidateIcon, FaviconDiscovery, IconSource};
use crate::tests::fake::{png_bytes, FakeClient};

const LOOKUP: &str = "https://favicongrabber.com/api/grab/example.com?pretty=true";
const PAGE: &str = "http://example.com";

fn config_in(dir: &Path) -> FaviconConfig {
    FaviconConfig {
        icon_dir: Some(dir.to_path_buf()),
        ..Default::default()
    }
}

fn lookup_body(srcs: &[&str]) -> Vec<u8> {
    let icons: Vec<_> = srcs.iter().map(|s| serde_json::json!({ "src": s })).collect();
    serde_json::json!({ "domain": "example.com", "icons": icons })
        .to_string()
        .into_bytes()
}

fn page_body() -> Vec<u8> {
    br#"<html><head>
        <link rel="apple-touch-icon" href="/apple-touch-icon.png">
        <link rel="stylesheet" href="/style.css">
        <meta property="og:image" content="https://cdn.example.com/og.png">
    </head><body>hi</body></html>"#
        .to_vec()
}

fn heights(candidates: &[CandidateIcon]) -> Vec<u32> {
    candidates.iter().map(|c| c.height()).collect()
}

fn sources(candidates: &[CandidateIcon]) -> Vec<IconSource> {
    candidates.iter().map(|c| c.source).collect()
}

fn assert_files_written(candidates: &[CandidateIcon], dir: &Path) {
    for candidate in candidates {
        assert!(candidate.path.starts_with(dir));
        let meta = std::fs::metadata(&candidate.path).unwrap();
        assert!(meta.len() > 0);
        let decoded = image::open(&candidate.path).unwrap();
        assert_eq!(decoded.height(), candidate.height());
    }
}

#[test]
fn test_empty_lookup_skips_page() {
    let tmp = tempfile::tempdir().unwrap();
    let config = config_in(tmp.path());
    let client = FakeClient::new()
        .route(LOOKUP, 200, lookup_body(&[]))
        .route(PAGE, 200, page_body());

    let candidates = FaviconDiscovery::new(&client, &config).discover("example.com");

    assert!(candidates.is_empty());
    assert_eq!(client.count(PAGE), 0);
    assert_eq!(client.calls(), vec![LOOKUP.to_string()]);
}

#[test]
fn test_lookup_non_200_skips_page() {
    let tmp = tempfile::tempdir().unwrap();
    let config = config_in(tmp.path());
    let client = FakeClient::new()
        .route(LOOKUP, 503, b"busy".to_vec())
        .route(PAGE, 200, page_body());

    let candidates = FaviconDiscovery::new(&client, &config).discover("example.com");

    assert!(candidates.is_empty());
    assert_eq!(client.count(PAGE), 0);
}

#[test]
fn test_empty_lookup_falls_back_when_configured() {
    let tmp = tempfile::tempdir().unwrap();
    let config = FaviconConfig {
        fallback_on_empty_lookup: true,
        ..config_in(tmp.path())
    };
    let client = FakeClient::new()
        .route(LOOKUP, 200, lookup_body(&[]))
        .route(PAGE, 200, page_body())
        .route("http://example.com/favicon.ico", 200, png_bytes(16, 16));

    let candidates = FaviconDiscovery::new(&client, &config).discover("example.com");

    assert_eq!(client.count(PAGE), 1);
    assert_eq!(sources(&candidates), vec![IconSource::Favicon]);
}

#[test]
fn test_lookup_candidates() {
    let tmp = tempfile::tempdir().unwrap();
    let config = config_in(tmp.path());
    let client = FakeClient::new()
        .route(
            LOOKUP,
            200,
            lookup_body(&[
                "/favicon-32.png",
                "https://example.com/broken.png",
                "icons/big.png",
            ]),
        )
        .route("http://example.com/favicon-32.png", 200, png_bytes(32, 32))
        .route("https://example.com/broken.png", 404, Vec::new())
        .route("http://example.com/icons/big.png", 200, png_bytes(300, 600))
        .route(PAGE, 200, page_body());

    let candidates = FaviconDiscovery::new(&client, &config).discover("example.com/some/page?x=1");

    assert_eq!(heights(&candidates), vec![256, 32]);
    assert!(candidates
        .iter()
        .all(|c| c.source == IconSource::FaviconGrabber));
    assert_eq!(candidates[0].image.width(), 256);
    assert_eq!(client.count(PAGE), 0);
    assert_files_written(&candidates, tmp.path());
}

#[test]
fn test_lookup_unreachable_scrapes_page() {
    let tmp = tempfile::tempdir().unwrap();
    let config = config_in(tmp.path());
    // no route for the lookup service: connection refused
    let client = FakeClient::new()
        .route(PAGE, 200, page_body())
        .route("http://example.com/apple-touch-icon.png", 200, png_bytes(180, 512))
        .route("http://example.com/favicon.ico", 200, png_bytes(16, 16))
        .route("https://cdn.example.com/og.png", 200, png_bytes(120, 64));

    let candidates = FaviconDiscovery::new(&client, &config).discover("example.com");

    assert_eq!(client.count(LOOKUP), 1);
    assert_eq!(client.count(PAGE), 1);
    assert_eq!(heights(&candidates), vec![256, 64, 16]);
    assert_eq!(
        sources(&candidates),
        vec![
            IconSource::AppleTouchIcon,
            IconSource::OgImage,
            IconSource::Favicon
        ]
    );
    assert_files_written(&candidates, tmp.path());
}

#[test]
fn test_malformed_lookup_scrapes_page() {
    let tmp = tempfile::tempdir().unwrap();
    let config = config_in(tmp.path());
    let client = FakeClient::new()
        .route(LOOKUP, 200, b"<html>not json</html>".to_vec())
        .route(PAGE, 200, b"<html><head></head></html>".to_vec())
        .route("http://example.com/favicon.ico", 200, png_bytes(48, 48));

    let candidates = FaviconDiscovery::new(&client, &config).discover("example.com");

    assert_eq!(sources(&candidates), vec![IconSource::Favicon]);
}

#[test]
fn test_error_page_still_parsed() {
    let tmp = tempfile::tempdir().unwrap();
    let config = config_in(tmp.path());
    let client = FakeClient::new()
        .route(PAGE, 404, page_body())
        .route("http://example.com/apple-touch-icon.png", 200, png_bytes(60, 60));

    let candidates = FaviconDiscovery::new(&client, &config).discover("example.com");

    assert_eq!(sources(&candidates), vec![IconSource::AppleTouchIcon]);
}

#[test]
fn test_everything_unreachable() {
    let tmp = tempfile::tempdir().unwrap();
    let config = config_in(tmp.path());
    let client = FakeClient::new();

    let candidates = FaviconDiscovery::new(&client, &config).discover("example.com");

    assert!(candidates.is_empty());
    assert_eq!(client.calls(), vec![LOOKUP.to_string(), PAGE.to_string()]);
}

#[test]
fn test_equal_heights_keep_discovery_order() {
    let tmp = tempfile::tempdir().unwrap();
    let config = config_in(tmp.path());
    let page = br#"<html><head>
        <link rel="shortcut icon" href="/s.png">
        <link rel="msapplication-TileImage" href="/tile.png">
    </head></html>"#;
    let client = FakeClient::new()
        .route(PAGE, 200, page.to_vec())
        .route("http://example.com/s.png", 200, png_bytes(32, 32))
        .route("http://example.com/tile.png", 200, png_bytes(144, 144))
        .route("http://example.com/favicon.ico", 200, png_bytes(32, 32));

    let candidates = FaviconDiscovery::new(&client, &config).discover("http://example.com");

    // "shortcut icon" also satisfies the plain "icon" pattern
    assert_eq!(
        sources(&candidates),
        vec![
            IconSource::TileImage,
            IconSource::ShortcutIcon,
            IconSource::Icon,
            IconSource::Favicon
        ]
    );
}

#[test]
fn test_unwritable_icon_dir_falls_back_then_gives_up() {
    let tmp = tempfile::tempdir().unwrap();
    let not_a_dir = tmp.path().join("file");
    std::fs::write(&not_a_dir, b"x").unwrap();
    let config = config_in(&not_a_dir);

    let client = FakeClient::new()
        .route(LOOKUP, 200, lookup_body(&["/a.png"]))
        .route("http://example.com/a.png", 200, png_bytes(32, 32))
        .route(PAGE, 200, page_body())
        .route("http://example.com/favicon.ico", 200, png_bytes(16, 16));

    let candidates = FaviconDiscovery::new(&client, &config).discover("example.com");

    // persisting failed inside the lookup strategy, so the page was tried too
    assert!(candidates.is_empty());
    assert_eq!(client.count(PAGE), 1);
}

#[test]
fn test_discard_cleans_up() {
    let tmp = tempfile::tempdir().unwrap();
    let config = config_in(tmp.path());
    let client = FakeClient::new()
        .route(LOOKUP, 200, lookup_body(&["/a.png", "/b.png"]))
        .route("http://example.com/a.png", 200, png_bytes(32, 32))
        .route("http://example.com/b.png", 200, png_bytes(64, 64));

    let candidates = FaviconDiscovery::new(&client, &config).discover("example.com");
    assert_eq!(candidates.len(), 2);

    for candidate in candidates {
        candidate.discard().unwrap();
    }
    assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 0);
}
