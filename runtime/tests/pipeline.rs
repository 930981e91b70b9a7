use sitegrade_runtime::audit::{AuditError, AuditOptions, Auditor};
use sitegrade_runtime::cartography::CrawlError;
use sitegrade_runtime::config::CrawlConfig;
use sitegrade_runtime::prediction::{ReferenceCorpus, ReferenceSite};
use sitegrade_runtime::renderer::{HttpRenderer, Renderer};
use sitegrade_runtime::scoring::{CalibrationTable, Severity, TaxonomyKind};
use std::sync::Arc;
use wiremock::matchers::path;
use wiremock::{Mock, MockServer, ResponseTemplate};

const HOME: &str = r##"<!DOCTYPE html>
<html lang="ko">
<head><title>City Hall</title><meta name="viewport" content="width=device-width"></head>
<body>
  <a href="#main" class="skip-nav">Skip to content</a>
  <header><a href="/" class="logo"><img src="/logo.png" alt="City Hall"></a></header>
  <nav>
    <ul>
      <li><a href="/notices">Notices</a></li>
      <li><a href="/services">Services</a>
        <ul><li><a href="/services/permits?tab=1">Permits</a></li></ul>
      </li>
      <li><a href="/broken">Broken</a></li>
      <li><a href="https://elsewhere.example/">Partner</a></li>
    </ul>
  </nav>
  <main id="main">
    <h1>Welcome</h1><h2>News</h2><p>Hello.</p>
    <form role="search"><label for="q">Search</label><input type="search" id="q" name="q" required></form>
  </main>
  <footer>Contact: 02-123-4567</footer>
</body></html>"##;

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .insert_header("content-type", "text/html; charset=utf-8")
        .set_body_string(body)
}

async fn site() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(path("/")).respond_with(html(HOME)).mount(&server).await;
    Mock::given(path("/notices"))
        .respond_with(html("<html lang=\"ko\"><body><h1>Notices</h1><img src=\"a.png\"></body></html>"))
        .mount(&server)
        .await;
    Mock::given(path("/services"))
        .respond_with(html("<html lang=\"ko\"><body><h1>Services</h1></body></html>"))
        .mount(&server)
        .await;
    Mock::given(path("/services/permits"))
        .respond_with(html("<html lang=\"ko\"><body><h1>Permits</h1></body></html>"))
        .mount(&server)
        .await;
    Mock::given(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    server
}

fn config() -> CrawlConfig {
    CrawlConfig {
        settle_delay_ms: 0,
        timeout_ms: 5_000,
        ..Default::default()
    }
}

fn auditor() -> Auditor {
    let renderer: Arc<dyn Renderer> = Arc::new(HttpRenderer::new(None).unwrap());
    Auditor::new(renderer, config())
}

#[tokio::test]
async fn test_audit_survives_failing_sub_page() {
    let server = site().await;
    let outcome = auditor()
        .audit(&server.uri(), &AuditOptions::default())
        .await
        .unwrap();

    assert_eq!(outcome.pages.len(), 4);
    assert_eq!(outcome.errors.len(), 1);
    let expected = format!("Sub-page crawl failed ({}/broken): ", server.uri());
    assert!(outcome.errors[0].starts_with(&expected), "{}", outcome.errors[0]);
    assert!(outcome.pages.iter().all(|p| !p.url.contains('?')));
    assert!(outcome.pages[0].is_main);

    assert_eq!(outcome.reports.len(), 3);
    for report in &outcome.reports {
        assert_eq!(report.page_count, 4);
        for item in &report.items {
            let s = item.score;
            assert!(s == -1.0 || ((2.0..=5.0).contains(&s) && (s * 2.0).fract() == 0.0));
        }
        let severities: Vec<Severity> = report.issues.iter().map(|i| i.severity).collect();
        let mut sorted = severities.clone();
        sorted.sort();
        assert_eq!(severities, sorted);
    }
}

#[tokio::test]
async fn test_main_page_failure_is_fatal() {
    let server = MockServer::start().await;
    Mock::given(path("/"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = auditor()
        .audit(&server.uri(), &AuditOptions::default())
        .await
        .unwrap_err();
    match err {
        AuditError::Crawl(CrawlError::MainPage { url, .. }) => {
            assert!(url.starts_with(&server.uri()));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_calibration_and_prediction() {
    let server = site().await;
    let host = url::Url::parse(&server.uri())
        .unwrap()
        .host_str()
        .unwrap()
        .to_string();
    let calibration = CalibrationTable::from_json(&format!(
        r#"{{ "version": "2024-01", "overrides": [
            {{ "domain": "{host}", "taxonomy": "nielsen", "delta": -0.5, "reason": "manual review" }}
        ] }}"#
    ))
    .unwrap();
    let corpus = ReferenceCorpus::new(vec![ReferenceSite {
        name: "reference".into(),
        url: None,
        features: Default::default(),
        score: 3.5,
    }]);

    let options = AuditOptions {
        taxonomies: vec![TaxonomyKind::Nielsen],
        calibration: Some(calibration),
        corpus: Some(Arc::new(corpus)),
        ..Default::default()
    };
    let outcome = auditor().audit(&server.uri(), &options).await.unwrap();
    let report = &outcome.reports[0];
    assert_eq!(report.calibrations.len(), 1);
    assert_eq!(report.calibrations[0].reason, "manual review");

    let prediction = outcome.prediction.unwrap();
    assert_eq!(prediction.score, 3.5);
    assert_eq!(prediction.principles.len(), 10);
}
