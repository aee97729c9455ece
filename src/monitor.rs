//! Continuous exchange monitor
//!
//! Binds an exclusive queue to the fanout exchange on one host and prints
//! every message it receives until cancelled. Shutdown is cooperative: the
//! caller passes a cancellation token (wired to Ctrl-C by the CLI) and the
//! consume loop exits at the next suspension point.
//!
//! Lifecycle: disconnected → connecting → listening → (message → listening)*
//! → (cancelled | connection error) → closed.

use chrono::SecondsFormat;
use futures_util::{Stream, StreamExt};
use lapin::options::BasicConsumeOptions;
use lapin::types::FieldTable;
use lapin::Connection;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::config::BrokerSettings;
use crate::error::{Error, Result};
use crate::probe::broker;
use crate::probe::MessagePayload;

/// Consumer tag announced to the broker
const CONSUMER_TAG: &str = "cluster-probe-monitor";

/// Monitor one host until the token is cancelled or the connection drops.
///
/// The connection is closed exactly once on the way out, whatever path the
/// loop exits through; close failures are swallowed.
pub async fn monitor_host(
    settings: &BrokerSettings,
    host: &str,
    cancel: CancellationToken,
) -> Result<()> {
    info!(host = %host, exchange = %settings.exchange, "Starting continuous monitor");

    let connection = broker::open_connection(settings, host).await?;
    let result = listen(&connection, settings, host, &cancel).await;
    broker::close_quietly(connection, host).await;

    result
}

/// Bind and consume on an open connection
async fn listen(
    connection: &Connection,
    settings: &BrokerSettings,
    host: &str,
    cancel: &CancellationToken,
) -> Result<()> {
    let channel = broker::create_channel(connection, host).await?;
    let queue = broker::bind_exclusive_queue(&channel, settings, host).await?;

    let consumer = channel
        .basic_consume(
            &queue,
            CONSUMER_TAG,
            BasicConsumeOptions {
                no_ack: true,
                ..BasicConsumeOptions::default()
            },
            FieldTable::default(),
        )
        .await
        .map_err(|e| Error::protocol(host, e.to_string()))?;

    println!(
        "Listening on {} (exchange '{}', queue '{}'), Ctrl-C to stop",
        host, settings.exchange, queue
    );

    let deliveries = Box::pin(
        consumer.map(|delivery| delivery.map(|d| d.data).map_err(|e| e.to_string())),
    );

    consume_loop(deliveries, host, cancel, print_message).await
}

/// Pull deliveries until cancellation, a stream error, or stream end.
///
/// Generic over the delivery stream so the loop is exercisable without a
/// broker. Cancellation is a clean exit; a dead stream is an error the
/// caller surfaces.
async fn consume_loop<S, F>(
    mut deliveries: S,
    host: &str,
    cancel: &CancellationToken,
    mut on_message: F,
) -> Result<()>
where
    S: Stream<Item = std::result::Result<Vec<u8>, String>> + Unpin,
    F: FnMut(&str, &MessagePayload),
{
    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                info!(host = %host, "Monitor stop requested");
                return Ok(());
            }
            delivery = deliveries.next() => match delivery {
                Some(Ok(body)) => {
                    let payload = MessagePayload::decode(&body);
                    if !payload.is_json() {
                        warn!(host = %host, bytes = body.len(), "Message body is not valid JSON, printing raw");
                    }
                    on_message(host, &payload);
                }
                Some(Err(reason)) => {
                    return Err(Error::protocol(host, reason));
                }
                None => {
                    return Err(Error::connection_failed(host, "delivery stream ended"));
                }
            }
        }
    }
}

/// Print one received message with a local timestamp
fn print_message(host: &str, payload: &MessagePayload) {
    let timestamp = chrono::Local::now().to_rfc3339_opts(SecondsFormat::Secs, true);
    match payload {
        MessagePayload::Json(_) => {
            println!("[{}] message on {}:\n{}", timestamp, host, payload);
        }
        MessagePayload::Raw(_) => {
            println!("[{}] raw message on {}:\n{}", timestamp, host, payload);
        }
    }
}
