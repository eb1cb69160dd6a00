//! Newline-delimited JSON-RPC over stdin/stdout
//!
//! Every request runs on its own task so a slow search does not hold up a
//! `ping`; a single writer task owns the output stream so responses never
//! interleave. stdout carries protocol messages only.

use std::future::Future;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use crate::error::{Error, ErrorContext, Result};
use crate::mcp::{McpHandler, McpResponse, PARSE_ERROR};

/// Serve on the process's stdin/stdout until EOF or Ctrl-C
pub async fn serve_stdio(handler: Arc<McpHandler>) -> Result<()> {
    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Could not listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
        info!("Interrupt received, shutting down");
    };

    serve(handler, tokio::io::stdin(), tokio::io::stdout(), shutdown).await
}

/// Read requests from `input` until EOF or `shutdown` resolves, then wait for
/// in-flight requests and flush their responses to `output`.
pub async fn serve<I, O, S>(
    handler: Arc<McpHandler>,
    input: I,
    output: O,
    shutdown: S,
) -> Result<()>
where
    I: AsyncRead + Unpin,
    O: AsyncWrite + Unpin + Send + 'static,
    S: Future<Output = ()>,
{
    let (tx, rx) = mpsc::unbounded_channel::<String>();
    let writer = tokio::spawn(write_responses(output, rx));

    let mut reader = BufReader::new(input);
    let mut buf = Vec::new();
    let mut in_flight = JoinSet::new();
    tokio::pin!(shutdown);

    // `read_until` keeps partial bytes in `buf` when another branch wins
    let read_result = loop {
        tokio::select! {
            _ = &mut shutdown => break Ok(()),
            read = reader.read_until(b'\n', &mut buf) => match read {
                Ok(0) => {
                    dispatch(&handler, &tx, &mut in_flight, &buf);
                    debug!("Input closed");
                    break Ok(());
                }
                Ok(_) => {
                    dispatch(&handler, &tx, &mut in_flight, &buf);
                    buf.clear();
                }
                Err(e) => break Err::<(), _>(e).with_context("reading request"),
            },
            Some(joined) = in_flight.join_next(), if !in_flight.is_empty() => {
                log_join_failure(joined);
            }
        }
    };

    while let Some(joined) = in_flight.join_next().await {
        log_join_failure(joined);
    }

    drop(tx);
    let write_result = writer.await.map_err(|e| Error::Task {
        details: e.to_string(),
    })?;

    read_result?;
    write_result.with_context("writing response")
}

/// Hand one raw input line to the handler on its own task
fn dispatch(
    handler: &Arc<McpHandler>,
    tx: &mpsc::UnboundedSender<String>,
    in_flight: &mut JoinSet<()>,
    raw: &[u8],
) {
    let line = match std::str::from_utf8(raw) {
        Ok(line) => line.trim(),
        Err(e) => {
            warn!(error = %e, "Request is not valid UTF-8");
            let response = McpResponse::error(None, PARSE_ERROR, format!("Parse error: {}", e));
            send(tx, serde_json::to_string(&response).unwrap_or_default());
            return;
        }
    };
    if line.is_empty() {
        return;
    }

    let line = line.to_string();
    let handler = Arc::clone(handler);
    let tx = tx.clone();
    in_flight.spawn(async move {
        if let Some(response) = handler.handle_json(&line).await {
            send(&tx, response);
        }
    });
}

fn send(tx: &mpsc::UnboundedSender<String>, response: String) {
    if tx.send(response).is_err() {
        warn!("Response dropped, writer has stopped");
    }
}

fn log_join_failure(joined: std::result::Result<(), tokio::task::JoinError>) {
    if let Err(e) = joined {
        error!(error = %e, "Request task failed");
    }
}

async fn write_responses<O>(
    mut output: O,
    mut rx: mpsc::UnboundedReceiver<String>,
) -> std::io::Result<()>
where
    O: AsyncWrite + Unpin,
{
    while let Some(response) = rx.recv().await {
        output.write_all(response.as_bytes()).await?;
        output.write_all(b"\n").await?;
        output.flush().await?;
    }
    Ok(())
}
