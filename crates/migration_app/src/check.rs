use migration_engine::ConnectionReport;

const RULE_WIDTH: usize = 60;

/// Console rendering of a connection check: per-check details, then a PASS/FAIL table.
pub fn render(report: &ConnectionReport) -> Vec<String> {
    let rule = "=".repeat(RULE_WIDTH);
    let mut lines = vec![
        rule.clone(),
        "Ghost to WordPress Migration - Connection Test".to_string(),
        rule.clone(),
    ];

    for check in &report.checks {
        lines.push(String::new());
        lines.push(format!("Testing {}...", check.name));
        for detail in &check.details {
            lines.push(format!("  {detail}"));
        }
    }

    lines.push(String::new());
    lines.push(rule.clone());
    lines.push("TEST RESULTS".to_string());
    lines.push(rule.clone());
    for check in &report.checks {
        let status = if check.passed { "PASS" } else { "FAIL" };
        lines.push(format!("{:20} {}", check.name, status));
    }
    lines.push(rule);

    if report.all_passed() {
        lines.push("All tests passed! Ready to migrate.".to_string());
    } else {
        lines.push("Some tests failed. Fix issues before migrating.".to_string());
    }
    lines
}

#[cfg(test)]
mod tests {
    use migration_engine::CheckOutcome;

    use super::*;

    #[test]
    fn table_lists_each_check_with_status() {
        let report = ConnectionReport {
            checks: vec![
                CheckOutcome {
                    name: "ghost_rss",
                    passed: true,
                    details: vec!["Found 3 posts".into()],
                },
                CheckOutcome {
                    name: "wordpress_auth",
                    passed: false,
                    details: vec!["Authentication failed (401 Unauthorized)".into()],
                },
            ],
        };
        let lines = render(&report);
        assert!(lines.contains(&"  Found 3 posts".to_string()));
        assert!(lines.contains(&format!("{:20} PASS", "ghost_rss")));
        assert!(lines.contains(&format!("{:20} FAIL", "wordpress_auth")));
        assert_eq!(
            lines.last().map(String::as_str),
            Some("Some tests failed. Fix issues before migrating.")
        );
    }
}
