use dioxus::logger::tracing::{error, warn};
use dioxus::prelude::*;
use futures::FutureExt;
use futures_channel::mpsc::UnboundedReceiver;
use futures_util::StreamExt;

use crate::api::types::Alert;
use crate::cache::{CacheKey, CachePolicy};
use crate::utils::sleep;

use super::super::{use_api, use_cache};
use super::{alert_counts, ALERTS_POLL};

/// Unresolved alerts with total/critical badges and a per-row resolve
/// action. Polls every 30 seconds; resolving wakes the poller early.
#[component]
pub fn AlertsPanel() -> Element {
    let api = use_api();
    let cache = use_cache();

    let mut alerts = use_signal(Vec::<Alert>::new);

    let poller = use_coroutine({
        let api = api.clone();
        let cache = cache.clone();
        move |mut rx: UnboundedReceiver<()>| {
            let api = api.clone();
            let cache = cache.clone();
            async move {
            loop {
                let fetch = {
                    let api = api.clone();
                    move || {
                        let api = api.clone();
                        async move { api.0.alerts().await }
                    }
                };
                match cache
                    .refresh(CacheKey::alerts(), CachePolicy::STATUS, fetch)
                    .await
                {
                    Ok(feed) => alerts.set(feed.alerts),
                    Err(err) => warn!("alerts poll failed: {}", err),
                }

                // Sleep until the next tick, or earlier if a resolve asks
                // for an immediate re-poll.
                let tick = sleep(ALERTS_POLL).fuse();
                futures::pin_mut!(tick);
                futures::select! {
                    _ = tick => {}
                    message = rx.next() => {
                        if message.is_none() {
                            break;
                        }
                    }
                }
            }
            }
        }
    });

    let handle_resolve = use_callback({
        let api = api.clone();
        let cache = cache.clone();
        move |alert_id: u32| {
            let api = api.clone();
            let cache = cache.clone();
            spawn(async move {
                match api.0.resolve_alert(alert_id).await {
                    Ok(()) => {
                        cache.invalidate(|key| *key == CacheKey::alerts());
                        poller.send(());
                    }
                    Err(err) => error!("failed to resolve alert {}: {}", alert_id, err),
                }
            });
        }
    });

    let list = alerts.read().clone();
    let (total, critical) = alert_counts(&list);

    rsx! {
        section { class: "bw-dash-card",
            header { class: "bw-dash-card-header",
                h3 { class: "bw-dash-card-title", "Alerts" }
                div { class: "bw-dash-badges",
                    span { class: "bw-badge", "{total}" }
                    if critical > 0 {
                        span { class: "bw-badge bw-badge--critical", "{critical}" }
                    }
                }
            }

            if list.is_empty() {
                p { class: "bw-empty-detail", "No unresolved alerts." }
            }

            ul { class: "bw-alert-list",
                for alert in list.iter() {
                    li {
                        key: "{alert.id}",
                        class: if alert.is_critical() {
                            "bw-alert-row bw-alert-row--critical"
                        } else {
                            "bw-alert-row"
                        },
                        div { class: "bw-alert-main",
                            span { class: "bw-alert-severity", "{alert.severity}" }
                            span { class: "bw-alert-message", "{alert.message}" }
                            span { class: "bw-alert-meta", "{alert.source} · {alert.timestamp}" }
                        }
                        button {
                            class: "bw-btn bw-btn--ghost",
                            onclick: {
                                let id = alert.id;
                                move |_| handle_resolve.call(id)
                            },
                            "Resolve"
                        }
                    }
                }
            }
        }
    }
}
