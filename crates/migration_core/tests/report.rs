use chrono::{Duration, Local, TimeZone};
use migration_core::{update, MigrationStats, Msg, RunReport};
use pretty_assertions::assert_eq;

#[test]
fn empty_run_reports_zero_counters_and_no_errors() {
    let start = Local.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
    let stats = MigrationStats::started_at(start);
    let report = RunReport::from_stats(&stats, start + Duration::milliseconds(1500));

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["duration_seconds"], 1.5);
    assert_eq!(json["errors"], serde_json::json!([]));
    for key in [
        "posts_processed",
        "posts_created",
        "posts_failed",
        "images_downloaded",
        "images_uploaded",
        "images_failed",
    ] {
        assert_eq!(json["statistics"][key], 0, "counter {key}");
    }
    assert_eq!(json["migration_date"], start.to_rfc3339());
    assert!(report.error_lines().is_empty());
}

#[test]
fn errors_are_serialized_as_post_error_pairs() {
    let start = Local::now();
    let mut stats = MigrationStats::started_at(start);
    update(&mut stats, Msg::PostStarted);
    update(
        &mut stats,
        Msg::PostFailed {
            post: "Café".to_string(),
            error: "http status 401".to_string(),
        },
    );
    let report = RunReport::from_stats(&stats, start);

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(
        json["errors"],
        serde_json::json!([{ "post": "Café", "error": "http status 401" }])
    );
    assert_eq!(
        report.error_lines(),
        vec![
            "1 errors occurred:".to_string(),
            "  1. Café: http status 401".to_string(),
        ]
    );
}

#[test]
fn summary_lists_all_six_counters() {
    let start = Local::now();
    let mut stats = MigrationStats::started_at(start);
    update(&mut stats, Msg::PostStarted);
    update(&mut stats, Msg::ImageDownloaded);
    update(&mut stats, Msg::ImageUploaded);
    update(&mut stats, Msg::PostCreated);
    let report = RunReport::from_stats(&stats, start);

    let lines = report.summary_lines();
    assert!(lines.contains(&"Posts processed: 1".to_string()));
    assert!(lines.contains(&"Posts created: 1".to_string()));
    assert!(lines.contains(&"Posts failed: 0".to_string()));
    assert!(lines.contains(&"Images downloaded: 1".to_string()));
    assert!(lines.contains(&"Images uploaded: 1".to_string()));
    assert!(lines.contains(&"Images failed: 0".to_string()));
}

#[test]
fn report_round_trips_through_json() {
    let start = Local::now();
    let report = RunReport::from_stats(&MigrationStats::started_at(start), start);
    let text = serde_json::to_string_pretty(&report).unwrap();
    let back: RunReport = serde_json::from_str(&text).unwrap();
    assert_eq!(back, report);
}
