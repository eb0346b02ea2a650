//! Feed server status and refresh requests

use std::time::Duration;

use crate::error::FeedError;
use crate::model::{RefreshOutcome, ServerStatus};
use super::AppController;

impl AppController {
    /// Show the server uptime in the status bar
    pub async fn load_server_status(&self) {
        let Some(server) = &self.server else {
            return;
        };
        let status = server.server_status().await;
        let model = self.model.lock().await;
        model.set_status(status_line(status, server.base_url())).await;
    }

    /// Ask the server to rebuild its feed, checking its uptime alongside
    pub async fn refresh_server_feed(&self) {
        let Some(server) = &self.server else {
            return;
        };

        let (refresh, status) = futures::join!(server.request_refresh(), server.server_status());
        let model = self.model.lock().await;
        match refresh {
            Ok(RefreshOutcome::Started) => {
                tracing::info!("Server feed refresh started");
                model.set_status("Server is refreshing the feed").await;
            }
            Ok(RefreshOutcome::AlreadyRefreshing) => {
                model.set_status("Server is already refreshing").await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Server feed refresh failed");
                model.set_status(status_line(status, server.base_url())).await;
                model.set_error(e.user_message()).await;
            }
        }
    }
}

fn status_line(status: Result<ServerStatus, FeedError>, base_url: &str) -> String {
    match status {
        Ok(status) => format!("Server up {}", format_uptime(Duration::from_secs(status.uptime))),
        Err(e) => {
            tracing::warn!(error = %e, base_url, "Feed server status unavailable");
            "Server unreachable".to_string()
        }
    }
}

fn format_uptime(uptime: Duration) -> String {
    let minutes = uptime.as_secs() / 60;
    let (hours, minutes) = (minutes / 60, minutes % 60);
    let (days, hours) = (hours / 24, hours % 24);

    if days > 0 {
        format!("{}d {}h", days, hours)
    } else if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else {
        format!("{}m", minutes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_line_reports_uptime_or_unreachable() {
        assert_eq!(status_line(Ok(ServerStatus { uptime: 120 }), "http://x"), "Server up 2m");
        assert_eq!(
            status_line(Err(FeedError::Network("refused".into())), "http://x"),
            "Server unreachable"
        );
    }

    #[test]
    fn uptime_uses_two_largest_units() {
        assert_eq!(format_uptime(Duration::from_secs(59)), "0m");
        assert_eq!(format_uptime(Duration::from_secs(3 * 3600 + 5 * 60)), "3h 5m");
        assert_eq!(format_uptime(Duration::from_secs(2 * 86400 + 7 * 3600)), "2d 7h");
    }
}
