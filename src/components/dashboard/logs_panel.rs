use dioxus::logger::tracing::warn;
use dioxus::prelude::*;
use futures::FutureExt;
use futures_channel::mpsc::UnboundedReceiver;
use futures_util::StreamExt;

use crate::api::types::LogEntry;
use crate::cache::{CacheKey, CachePolicy};
use crate::utils::sleep;

use super::super::{use_api, use_cache};
use super::{LOGS_POLL, LOG_LINES};

const LEVELS: [&str; 4] = ["all", "info", "warning", "error"];

/// Recent backend log lines, refreshed every 15 seconds, with a level
/// filter. Changing the filter wakes the poller for an immediate fetch.
#[component]
pub fn LogsPanel() -> Element {
    let api = use_api();
    let cache = use_cache();

    let mut logs = use_signal(Vec::<LogEntry>::new);
    let level = use_signal(|| None::<String>);

    let poller = use_coroutine({
        let api = api.clone();
        let cache = cache.clone();
        move |mut rx: UnboundedReceiver<()>| {
            let api = api.clone();
            let cache = cache.clone();
            async move {
            loop {
                let selected = level.peek().clone();
                let fetch = {
                    let api = api.clone();
                    let selected = selected.clone();
                    move || {
                        let api = api.clone();
                        let selected = selected.clone();
                        async move { api.0.logs(LOG_LINES, selected.as_deref()).await }
                    }
                };
                match cache
                    .refresh(
                        CacheKey::logs(LOG_LINES, selected.as_deref()),
                        CachePolicy::LOGS,
                        fetch,
                    )
                    .await
                {
                    Ok(feed) => logs.set(feed.logs),
                    Err(err) => warn!("logs poll failed: {}", err),
                }

                let tick = sleep(LOGS_POLL).fuse();
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

    let entries = logs.read().clone();
    let selected_level = level.read().clone().unwrap_or_else(|| "all".to_string());

    rsx! {
        section { class: "bw-dash-card bw-dash-card--wide",
            header { class: "bw-dash-card-header",
                h3 { class: "bw-dash-card-title", "Logs" }
                select {
                    class: "bw-select",
                    value: "{selected_level}",
                    onchange: {
                        let mut level = level;
                        move |evt: FormEvent| {
                            let choice = evt.value();
                            level.set(if choice == "all" { None } else { Some(choice) });
                            poller.send(());
                        }
                    },
                    for name in LEVELS.iter() {
                        option { value: "{name}", "{name}" }
                    }
                }
            }

            if entries.is_empty() {
                p { class: "bw-empty-detail", "No log lines at this level." }
            }

            ul { class: "bw-log-list",
                for (idx, entry) in entries.iter().enumerate() {
                    li {
                        key: "{idx}",
                        class: match entry.level.to_lowercase().as_str() {
                            "error" | "critical" => "bw-log-row bw-log-row--error",
                            "warning" => "bw-log-row bw-log-row--warn",
                            _ => "bw-log-row",
                        },
                        span { class: "bw-log-ts", "{entry.timestamp}" }
                        span { class: "bw-log-level", "{entry.level}" }
                        span { class: "bw-log-message", "{entry.message}" }
                    }
                }
            }
        }
    }
}
