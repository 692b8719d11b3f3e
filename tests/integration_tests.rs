use anyhow::Result;
use crux_vitals::core::ConfigProvider;
use crux_vitals::utils::validation::Validate;
use crux_vitals::{
    Band, LocalStorage, MetricName, TomlConfig, VitalsEngine, VitalsError, VitalsPipeline,
};
use httpmock::prelude::*;
use serde_json::json;
use tempfile::TempDir;

const QUERY_PATH: &str = "/v1/records:queryRecord";

fn crux_record(origin: &str, lcp: u64, cls: &str, inp: u64) -> serde_json::Value {
    json!({
        "record": {
            "key": { "origin": origin, "formFactor": "PHONE" },
            "metrics": {
                "largest_contentful_paint": {
                    "histogram": [
                        { "start": 0, "end": 2500, "density": 0.8 },
                        { "start": 2500, "end": 4000, "density": 0.12 },
                        { "start": 4000, "density": 0.08 }
                    ],
                    "percentiles": { "p75": lcp }
                },
                "cumulative_layout_shift": { "percentiles": { "p75": cls } },
                "interaction_to_next_paint": { "percentiles": { "p75": inp } },
                "largest_contentful_paint_element": {
                    "ttfb": { "percentiles": { "p75": 420 } }
                }
            },
            "collectionPeriod": {
                "firstDate": { "year": 2026, "month": 9, "day": 1 },
                "lastDate": { "year": 2026, "month": 9, "day": 28 }
            }
        }
    })
}

fn config_for(server: &MockServer, output_path: &str, extra: &str) -> Result<TomlConfig> {
    let content = format!(
        r#"
[api]
endpoint = "{}"
api_key = "integration-key"

[output]
path = "{}"
{}
"#,
        server.url(QUERY_PATH),
        output_path.replace('\\', "/"),
        extra
    );
    Ok(TomlConfig::from_toml_str(&content)?)
}

#[tokio::test]
async fn test_end_to_end_two_domains() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let server = MockServer::start();
    let homes = server.mock(|when, then| {
        when.method(POST)
            .path(QUERY_PATH)
            .query_param("key", "integration-key")
            .header("Content-Type", "application/json")
            .json_body(json!({ "formFactor": "PHONE", "origin": "https://www.homes.com" }));
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(crux_record("https://www.homes.com", 2500, "0.02", 180));
    });
    let loopnet = server.mock(|when, then| {
        when.method(POST)
            .path(QUERY_PATH)
            .json_body(json!({ "formFactor": "PHONE", "origin": "https://www.loopnet.com" }));
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(crux_record("https://www.loopnet.com", 4600, "0.31", 260));
    });

    let mut config = config_for(
        &server,
        &output_path,
        r#"formats = ["console", "json", "csv"]"#,
    )?;
    config.query.domains = vec![
        "https://www.homes.com/for-rent?page=2".to_string(),
        "www.loopnet.com".to_string(),
    ];
    config.validate()?;

    let pipeline = VitalsPipeline::new(LocalStorage::new(output_path.clone()), config);
    let outcome = VitalsEngine::new(pipeline).run().await?;

    homes.assert();
    loopnet.assert();

    assert_eq!(
        outcome.results.domains(),
        vec!["https://www.homes.com/for-rent?page=2", "www.loopnet.com"]
    );

    let homes_result = outcome
        .results
        .get("https://www.homes.com/for-rent?page=2")
        .unwrap();
    assert_eq!(homes_result.get(MetricName::Lcp).unwrap().band, Band::Good);
    assert_eq!(homes_result.get(MetricName::Cls).unwrap().band, Band::Good);
    assert_eq!(homes_result.get(MetricName::Inp).unwrap().band, Band::Good);
    assert_eq!(homes_result.get(MetricName::ImageTtfb).unwrap().value, 420.0);
    // TTFB 未出現在回應中
    assert!(homes_result.get(MetricName::Ttfb).is_none());

    let loopnet_result = outcome.results.get("www.loopnet.com").unwrap();
    assert_eq!(loopnet_result.get(MetricName::Lcp).unwrap().band, Band::Poor);
    assert_eq!(loopnet_result.get(MetricName::Cls).unwrap().band, Band::Poor);
    assert_eq!(
        loopnet_result.get(MetricName::Inp).unwrap().band,
        Band::NeedsImprovement
    );
    assert_eq!(
        loopnet_result.raw_response["record"]["key"]["origin"],
        "https://www.loopnet.com"
    );

    assert_eq!(outcome.written.len(), 2);
    let json_path = temp_dir.path().join("vitals.json");
    let csv_path = temp_dir.path().join("vitals.csv");
    assert!(json_path.exists());
    assert!(csv_path.exists());

    let document: serde_json::Value = serde_json::from_slice(&std::fs::read(json_path)?)?;
    assert_eq!(
        document["results"]["www.loopnet.com"]["metrics"]["CLS"]["band"],
        "poor"
    );
    assert_eq!(
        document["results"]["www.loopnet.com"]["raw_response"]["record"]["metrics"]
            ["cumulative_layout_shift"]["percentiles"]["p75"],
        "0.31"
    );

    let csv = std::fs::read_to_string(csv_path)?;
    assert!(csv.contains("www.loopnet.com,CLS,0.31,0.310,poor,74.66"));
    assert_eq!(csv.lines().count(), 1 + 4 + 4);

    Ok(())
}

#[tokio::test]
async fn test_first_domain_failure_aborts_submission() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let server = MockServer::start();
    let failing = server.mock(|when, then| {
        when.method(POST)
            .path(QUERY_PATH)
            .json_body(json!({ "formFactor": "PHONE", "origin": "https://not-a-site.invalid" }));
        then.status(400)
            .header("Content-Type", "application/json")
            .json_body(json!({
                "error": {
                    "code": 400,
                    "message": "Invalid Value at 'origin'",
                    "status": "INVALID_ARGUMENT"
                }
            }));
    });
    let never_called = server.mock(|when, then| {
        when.method(POST)
            .path(QUERY_PATH)
            .json_body(json!({ "formFactor": "PHONE", "origin": "https://example.com" }));
        then.status(200)
            .json_body(crux_record("https://example.com", 1000, "0.01", 100));
    });

    let mut config = config_for(&server, &output_path, r#"formats = ["json"]"#)?;
    config.query.domains = vec!["not-a-site.invalid".to_string(), "example.com".to_string()];

    let pipeline = VitalsPipeline::new(LocalStorage::new(output_path.clone()), config);
    let result = VitalsEngine::new(pipeline).run().await;

    failing.assert();
    never_called.assert_hits(0);

    let err = result.unwrap_err();
    assert!(matches!(err, VitalsError::ApiError { status: 400, .. }));
    assert_eq!(
        err.user_friendly_message(),
        "Could not fetch Core Web Vitals. Please enter valid domain names (e.g., example.com)."
    );
    // 失敗時不輸出任何檔案
    assert!(!temp_dir.path().join("vitals.json").exists());

    Ok(())
}

#[tokio::test]
async fn test_url_mode_desktop_with_archive() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(POST).path(QUERY_PATH).json_body(json!({
            "formFactor": "DESKTOP",
            "url": "https://www.apartments.com/chicago-il/"
        }));
        then.status(200)
            .json_body(crux_record("https://www.apartments.com", 3100, "0.12", 90));
    });

    let mut config = config_for(
        &server,
        &output_path,
        r#"formats = ["json", "csv"]
archive = true"#,
    )?;
    config.query.query_type = "url".parse().unwrap();
    config.query.form_factor = "desktop".parse().unwrap();
    config.query.domains = vec!["www.apartments.com/chicago-il/".to_string()];
    config.validate()?;
    assert!(!config.wants_console());
    assert_eq!(config.output_formats().len(), 2);

    let pipeline = VitalsPipeline::new(LocalStorage::new(output_path.clone()), config);
    let outcome = VitalsEngine::new(pipeline).run().await?;

    api_mock.assert();
    let result = outcome
        .results
        .get("www.apartments.com/chicago-il/")
        .unwrap();
    assert_eq!(
        result.get(MetricName::Lcp).unwrap().band,
        Band::NeedsImprovement
    );

    let zip_path = temp_dir.path().join("vitals_report.zip");
    assert_eq!(outcome.written, vec![zip_path.display().to_string()]);

    let zip_data = std::fs::read(&zip_path)?;
    let mut archive = zip::ZipArchive::new(std::io::Cursor::new(zip_data))?;
    let mut file_names: Vec<String> = (0..archive.len())
        .map(|i| archive.by_index(i).unwrap().name().to_string())
        .collect();
    file_names.sort();
    assert_eq!(file_names, vec!["vitals.csv", "vitals.json"]);

    Ok(())
}

#[tokio::test]
async fn test_response_without_metrics_yields_empty_result() -> Result<()> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path(QUERY_PATH);
        then.status(200).json_body(json!({ "record": { "key": {} } }));
    });

    let mut config = config_for(&server, "./unused", "")?;
    config.query.domains = vec!["example.com".to_string()];

    let pipeline = VitalsPipeline::new(LocalStorage::new("./unused".to_string()), config);
    let outcome = VitalsEngine::new(pipeline).run().await?;

    assert_eq!(outcome.results.len(), 1);
    assert!(outcome.results.get("example.com").unwrap().metrics.is_empty());
    assert!(outcome.written.is_empty());

    Ok(())
}
