use dioxus::logger::tracing::warn;
use dioxus::prelude::*;
use futures_channel::mpsc::UnboundedReceiver;

use crate::api::types::{MonitorStats, SystemStatus};
use crate::cache::{CacheKey, CachePolicy};
use crate::utils::sleep;

use super::super::{use_api, use_cache};
use super::STATUS_POLL;

/// Overall health + background-monitor pill, refreshed every 30 seconds.
///
/// Refreshes go through the cache, so a failed poll keeps the last good
/// payload on screen instead of blanking the card.
#[component]
pub fn StatusCard() -> Element {
    let api = use_api();
    let cache = use_cache();

    let mut status = use_signal(|| None::<SystemStatus>);
    let mut monitor = use_signal(|| None::<MonitorStats>);
    let mut error = use_signal(|| None::<String>);

    use_coroutine({
        let api = api.clone();
        let cache = cache.clone();
        move |_rx: UnboundedReceiver<()>| {
            let api = api.clone();
            let cache = cache.clone();
            async move {
            loop {
                let status_fetch = {
                    let api = api.clone();
                    move || {
                        let api = api.clone();
                        async move { api.0.system_status().await }
                    }
                };
                match cache
                    .refresh(CacheKey::system_status(), CachePolicy::STATUS, status_fetch)
                    .await
                {
                    Ok(payload) => {
                        status.set(Some(payload));
                        error.set(None);
                    }
                    Err(err) => {
                        warn!("status poll failed: {}", err);
                        error.set(Some(err.to_string()));
                    }
                }

                let monitor_fetch = {
                    let api = api.clone();
                    move || {
                        let api = api.clone();
                        async move { api.0.monitor_status().await }
                    }
                };
                match cache
                    .refresh(CacheKey::monitor_status(), CachePolicy::STATUS, monitor_fetch)
                    .await
                {
                    Ok(payload) => monitor.set(Some(payload.monitor)),
                    Err(err) => warn!("monitor poll failed: {}", err),
                }

                sleep(STATUS_POLL).await;
            }
            }
        }
    });

    let status_pill = match status.read().clone() {
        None => rsx! {
            span { class: "bw-status-pill bw-status-pill--muted",
                span { class: "bw-status-dot bw-status-dot--muted" }
                "Checking…"
            }
        },
        Some(payload) if payload.is_healthy() => rsx! {
            span { class: "bw-status-pill bw-status-pill--ok",
                span { class: "bw-status-dot bw-status-dot--ok" }
                "{payload.message}"
            }
        },
        Some(payload) => rsx! {
            span { class: "bw-status-pill bw-status-pill--warn",
                span { class: "bw-status-dot bw-status-dot--warn" }
                "{payload.message}"
            }
        },
    };

    let monitor_pill = match monitor.read().clone() {
        Some(stats) if stats.running => rsx! {
            span { class: "bw-status-pill bw-status-pill--ok",
                span { class: "bw-status-dot bw-status-dot--ok" }
                "Monitor running"
            }
        },
        Some(_) => rsx! {
            span { class: "bw-status-pill bw-status-pill--warn",
                span { class: "bw-status-dot bw-status-dot--warn" }
                "Monitor stopped"
            }
        },
        None => rsx! {
            span { class: "bw-status-pill bw-status-pill--muted",
                span { class: "bw-status-dot bw-status-dot--muted" }
                "Monitor unknown"
            }
        },
    };

    rsx! {
        section { class: "bw-dash-card",
            header { class: "bw-dash-card-header",
                h3 { class: "bw-dash-card-title", "Status" }
            }
            div { class: "bw-status-strip",
                {status_pill}
                {monitor_pill}
            }
            if status.read().is_none() {
                if let Some(message) = error.read().clone() {
                    div { class: "bw-form-banner", "Status unavailable: {message}" }
                }
            }
        }
    }
}
