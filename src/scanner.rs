//! Bounded-parallel host scanner
//!
//! Fans the single-shot broker probe out across the candidate list with a
//! fixed worker-pool width, then gathers the hosts that accepted. Results
//! flow back through a single join point; workers share no mutable state.
//!
//! The fan-out is generic over the probe function so the pool logic is
//! testable without a live broker.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::probe::{MessagePayload, ProbeOutcome};

/// A host that accepted a broker connection during a scan
#[derive(Debug, Clone)]
pub struct ScanHit {
    /// Host that accepted
    pub host: String,

    /// A message captured from the exchange during the probe, if one was
    /// already waiting
    pub message: Option<MessagePayload>,
}

/// Probe every host concurrently, at most `width` in flight at once.
///
/// Returns the hosts that accepted, in completion order. All probes finish
/// (or fail) before this returns; no ordering guarantee beyond that.
pub async fn scan_hosts<F, Fut>(hosts: &[String], width: usize, probe: F) -> Vec<ScanHit>
where
    F: Fn(String) -> Fut,
    Fut: Future<Output = ProbeOutcome> + Send + 'static,
{
    let width = width.max(1);
    info!(hosts = hosts.len(), width = width, "Scanning hosts");

    let pool = Arc::new(Semaphore::new(width));
    let mut tasks = JoinSet::new();

    for host in hosts {
        let pool = pool.clone();
        let future = probe(host.clone());
        let host = host.clone();

        tasks.spawn(async move {
            // Semaphore closes only on drop, which cannot happen while tasks
            // still hold a clone
            let _permit = pool.acquire_owned().await.expect("scan pool closed");
            (host, future.await)
        });
    }

    let mut hits = Vec::new();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((host, ProbeOutcome::Connected { message })) => {
                info!(host = %host, captured_message = message.is_some(), "Broker reachable");
                hits.push(ScanHit { host, message });
            }
            Ok((host, ProbeOutcome::Failed { reason })) => {
                debug!(host = %host, reason = %reason, "Broker unreachable");
            }
            Err(e) => {
                warn!(error = %e, "Probe task failed to complete");
            }
        }
    }

    hits
}
