//! Admin dashboard: system status, alerts, and log tail, each on its own
//! polling cadence. Polling stops with the view: the coroutines driving
//! the loops are dropped on unmount, and no further requests or signal
//! writes happen.

mod alerts_panel;
mod dashboard_view;
mod logs_panel;
mod status_card;

pub use dashboard_view::DashboardView;

use std::time::Duration;

use crate::api::types::Alert;

/// Status + monitor poll cadence.
pub const STATUS_POLL: Duration = Duration::from_secs(30);
/// Alerts poll cadence.
pub const ALERTS_POLL: Duration = Duration::from_secs(30);
/// Log tail poll cadence.
pub const LOGS_POLL: Duration = Duration::from_secs(15);
/// How many log lines to request.
pub const LOG_LINES: u32 = 50;

/// Badge numbers derived from the alert list itself: (total, critical).
pub fn alert_counts(alerts: &[Alert]) -> (usize, usize) {
    let critical = alerts.iter().filter(|alert| alert.is_critical()).count();
    (alerts.len(), critical)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alert(id: u32, severity: &str) -> Alert {
        Alert {
            id,
            severity: severity.to_string(),
            source: "monitor".to_string(),
            message: "something happened".to_string(),
            timestamp: String::new(),
        }
    }

    #[test]
    fn test_alert_counts_splits_critical() {
        // Three alerts, one critical: badges must read 3 and 1.
        let alerts = vec![
            alert(1, "critical"),
            alert(2, "warning"),
            alert(3, "warning"),
        ];
        assert_eq!(alert_counts(&alerts), (3, 1));
    }

    #[test]
    fn test_alert_counts_is_case_insensitive_and_handles_empty() {
        assert_eq!(alert_counts(&[]), (0, 0));
        let alerts = vec![alert(1, "CRITICAL"), alert(2, "Critical")];
        assert_eq!(alert_counts(&alerts), (2, 2));
    }
}
