//! # Effect Dispatcher
//!
//! Runs the I/O that `update()` asks for. Every background task reports
//! back by sending an `Action` over the same `std::sync::mpsc` channel the
//! event loop drains, so all state changes still go through the reducer.
//!
//! ```text
//! SendMessage  ──► gateway.send()          ──► ReplyReceived
//! RevealAfter  ──► sleep(delay)            ──► RevealReply
//! ClearRemote  ──► gateway.clear_history() ──► ClearFinished
//! LoadHistory  ──► gateway.fetch_history() ──► HistoryLoaded
//! ```
//!
//! Host-side effects (file writes, clipboard, quit) are handed back to the
//! caller untouched.

use std::sync::{Arc, mpsc};
use std::time::Duration;

use log::{debug, info, warn};
use tokio::net::TcpStream;
use tokio::task::JoinHandle;

use crate::core::action::{Action, Effect};
use crate::gateway::ChatGateway;

/// How long a single reachability probe may take before it counts as offline.
const PROBE_CONNECT_TIMEOUT: Duration = Duration::from_secs(3);

pub struct Dispatcher {
    gateway: Arc<dyn ChatGateway>,
    tx: mpsc::Sender<Action>,
}

impl Dispatcher {
    pub fn new(gateway: Arc<dyn ChatGateway>, tx: mpsc::Sender<Action>) -> Self {
        Self { gateway, tx }
    }

    /// Starts background work for `effect`. Returns the effect back if the
    /// host has to handle it itself, `Effect::None` otherwise.
    pub fn dispatch(&self, effect: Effect) -> Effect {
        match effect {
            Effect::SendMessage(request) => {
                let gateway = self.gateway.clone();
                let tx = self.tx.clone();
                info!(
                    "Sending message via {} ({} chars, history_length={})",
                    gateway.name(),
                    request.message.chars().count(),
                    request.context.history_length
                );
                tokio::spawn(async move {
                    let result = gateway.send(&request).await;
                    if tx.send(Action::ReplyReceived(result)).is_err() {
                        warn!("Failed to send ReplyReceived: receiver dropped");
                    }
                });
                Effect::None
            }
            Effect::RevealAfter { delay, reply } => {
                let tx = self.tx.clone();
                tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    if tx.send(Action::RevealReply(reply)).is_err() {
                        warn!("Failed to send RevealReply: receiver dropped");
                    }
                });
                Effect::None
            }
            Effect::ClearRemote => {
                let gateway = self.gateway.clone();
                let tx = self.tx.clone();
                tokio::spawn(async move {
                    let result = gateway.clear_history().await;
                    if tx.send(Action::ClearFinished(result)).is_err() {
                        warn!("Failed to send ClearFinished: receiver dropped");
                    }
                });
                Effect::None
            }
            Effect::LoadHistory => {
                let gateway = self.gateway.clone();
                let tx = self.tx.clone();
                tokio::spawn(async move {
                    let entries = gateway.fetch_history().await;
                    debug!("Fetched {} history entries", entries.len());
                    if tx.send(Action::HistoryLoaded(entries)).is_err() {
                        warn!("Failed to send HistoryLoaded: receiver dropped");
                    }
                });
                Effect::None
            }
            Effect::None => Effect::None,
            host @ (Effect::WriteExport { .. } | Effect::CopyToClipboard(_) | Effect::Quit) => host,
        }
    }
}

/// Extracts `(host, port)` from a base URL for the TCP probe.
fn probe_target(base_url: &str) -> Option<(String, u16)> {
    let url = reqwest::Url::parse(base_url).ok()?;
    let host = url.host_str()?.to_string();
    let port = url.port_or_known_default()?;
    Some((host, port))
}

async fn probe_once(host: &str, port: u16) -> bool {
    matches!(
        tokio::time::timeout(PROBE_CONNECT_TIMEOUT, TcpStream::connect((host, port))).await,
        Ok(Ok(_))
    )
}

/// Periodically checks whether the chat service accepts TCP connections and
/// reports `ReachabilityChanged` when the answer flips. Starts from "online".
///
/// Returns `None` if the base URL has no usable host.
pub fn spawn_reachability_probe(
    base_url: &str,
    interval: Duration,
    tx: mpsc::Sender<Action>,
) -> Option<JoinHandle<()>> {
    let Some((host, port)) = probe_target(base_url) else {
        warn!("Reachability probe disabled: cannot parse host from {}", base_url);
        return None;
    };
    info!(
        "Starting reachability probe for {}:{} every {}s",
        host,
        port,
        interval.as_secs()
    );

    Some(tokio::spawn(async move {
        let mut last = true;
        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;
            let reachable = probe_once(&host, port).await;
            if reachable == last {
                continue;
            }
            last = reachable;
            debug!("Reachability changed: {}", reachable);
            if tx.send(Action::ReachabilityChanged(reachable)).is_err() {
                debug!("Reachability probe stopping: receiver dropped");
                return;
            }
        }
    }))
}
