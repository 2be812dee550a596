use std::time::Duration;

use engine_logging::engine_debug;

use crate::config::MigrationConfig;
use crate::feed::FeedReader;
use crate::wordpress::WordPressClient;
use crate::SiteError;

const CHECK_TIMEOUT: Duration = Duration::from_secs(10);
const OPTIMIZER_NAMESPACE: &str = "slo/v1";

/// Result of one pre-flight check. `details` are printed under the check name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckOutcome {
    pub name: &'static str,
    pub passed: bool,
    pub details: Vec<String>,
}

impl CheckOutcome {
    fn pass(name: &'static str, details: Vec<String>) -> Self {
        Self {
            name,
            passed: true,
            details,
        }
    }

    fn fail(name: &'static str, reason: impl Into<String>) -> Self {
        Self {
            name,
            passed: false,
            details: vec![reason.into()],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConnectionReport {
    pub checks: Vec<CheckOutcome>,
}

impl ConnectionReport {
    pub fn all_passed(&self) -> bool {
        self.checks.iter().all(|check| check.passed)
    }
}

/// Check the feed, the public REST index and the credentials. Checks are
/// independent; one failing does not skip the others.
pub async fn check_connection(
    config: &MigrationConfig,
    client: reqwest::Client,
) -> ConnectionReport {
    let site = WordPressClient::new(
        client.clone(),
        &config.site_url,
        &config.api_base,
        config.credentials.clone(),
        config.fetch.clone(),
    );
    let feed = FeedReader::new(client, config.feed_url.clone(), config.fetch.clone());

    ConnectionReport {
        checks: vec![
            check_feed(&feed).await,
            check_api(&site).await,
            check_auth(&site).await,
        ],
    }
}

async fn check_feed(feed: &FeedReader) -> CheckOutcome {
    const NAME: &str = "ghost_rss";
    match feed.fetch().await {
        Ok(parsed) => {
            let mut details = Vec::new();
            if let Some(anomaly) = parsed.anomaly {
                details.push(format!("WARNING: Feed has parsing issues: {anomaly}"));
            }
            details.push(format!("Found {} posts", parsed.entries.len()));
            if let Some(first) = parsed.entries.first() {
                details.push(format!("First post: \"{}\"", first.display_title()));
            }
            CheckOutcome::pass(NAME, details)
        }
        Err(err) => CheckOutcome::fail(NAME, err.to_string()),
    }
}

async fn check_api(site: &WordPressClient) -> CheckOutcome {
    const NAME: &str = "wordpress_api";
    match site.fetch_api_index(CHECK_TIMEOUT).await {
        Ok(index) => {
            let mut details = vec!["REST API accessible".to_string()];
            if let Some(name) = index.name.filter(|n| !n.is_empty()) {
                details.push(format!("Site name: {name}"));
            }
            if index.namespaces.iter().any(|ns| ns == OPTIMIZER_NAMESPACE) {
                details.push("SEO & LLM Optimizer API detected".to_string());
            }
            CheckOutcome::pass(NAME, details)
        }
        Err(err) => CheckOutcome::fail(NAME, err.to_string()),
    }
}

async fn check_auth(site: &WordPressClient) -> CheckOutcome {
    const NAME: &str = "wordpress_auth";
    match site.current_user(CHECK_TIMEOUT).await {
        Ok(user) => {
            let mut details = vec![
                "Authentication successful".to_string(),
                format!(
                    "Logged in as: {}",
                    user.name.as_deref().unwrap_or("unknown")
                ),
                format!("User ID: {}", user.id),
            ];
            if user.capabilities.get("edit_posts").copied().unwrap_or(false) {
                details.push("Has edit_posts capability".to_string());
            } else {
                details.push("WARNING: Missing edit_posts capability".to_string());
            }
            CheckOutcome::pass(NAME, details)
        }
        Err(SiteError::HttpStatus { status: 401, body }) => {
            engine_debug!("Response: {}", body);
            CheckOutcome {
                name: NAME,
                passed: false,
                details: vec![
                    "Authentication failed (401 Unauthorized)".to_string(),
                    "Check username/password in the config file".to_string(),
                ],
            }
        }
        Err(err) => CheckOutcome::fail(NAME, err.to_string()),
    }
}
