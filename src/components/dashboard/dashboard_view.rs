use dioxus::prelude::*;

use super::super::use_session;
use super::alerts_panel::AlertsPanel;
use super::logs_panel::LogsPanel;
use super::status_card::StatusCard;

/// Admin dashboard shell. Non-admin sessions get a gate screen and none of
/// the polling panels are mounted (so nothing polls).
#[component]
pub fn DashboardView() -> Element {
    let session = use_session();

    if !session.read().is_admin() {
        return rsx! {
            section { class: "bw-view bw-view--dashboard",
                div { class: "bw-empty-state",
                    h2 { class: "bw-empty-title", "Administrators only" }
                    p { class: "bw-empty-detail",
                        "Sign in with an administrator account to see system status, alerts, and logs."
                    }
                }
            }
        };
    }

    rsx! {
        section { class: "bw-view bw-view--dashboard",
            h2 { class: "bw-results-title", "System dashboard" }
            div { class: "bw-dash-grid",
                StatusCard {}
                AlertsPanel {}
            }
            LogsPanel {}
        }
    }
}
