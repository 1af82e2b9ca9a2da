use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::Context;
use glossa_types::LookupRequest;
use serde_json::{Value, json};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::task::{JoinError, JoinSet};

use crate::state::AppState;

type TaskOutput = (usize, serde_json::Result<Value>);

/// Parse one input line; blank lines are skipped
pub fn parse_line(line: &str) -> Option<Result<LookupRequest, serde_json::Error>> {
    let line = line.trim();
    (!line.is_empty()).then(|| serde_json::from_str(line))
}

/// Run the requests from `input` with at most `batch_concurrency` lookups in
/// flight and write one JSON object per request to `output`, in input order.
/// Malformed lines produce an `error` object in their slot instead of
/// stopping the batch. Returns the number of objects written.
pub async fn run_batch<R, W>(
    state: Arc<AppState>,
    user: Option<String>,
    input: R,
    mut output: W,
) -> anyhow::Result<usize>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let limit = state.config.batch_concurrency.max(1);
    let mut lines = input.lines();
    let mut tasks = JoinSet::new();
    // Finished results waiting for an earlier slot
    let mut ready: BTreeMap<usize, Value> = BTreeMap::new();
    let mut next_slot = 0;
    let mut total = 0;

    while let Some(line) = lines.next_line().await.context("Failed to read input")? {
        let Some(parsed) = parse_line(&line) else {
            continue;
        };

        let slot = total;
        total += 1;
        match parsed {
            Ok(request) => {
                if tasks.len() >= limit {
                    if let Some(joined) = tasks.join_next().await {
                        let (done, value) = finished(joined)?;
                        ready.insert(done, value);
                        next_slot = write_ready(&mut ready, next_slot, &mut output).await?;
                    }
                }

                let state = Arc::clone(&state);
                let user = user.clone();
                tasks.spawn(async move {
                    let outcome = state.pipeline.lookup(&request).await;
                    for record in &outcome.usage {
                        state.usage.record(user.as_deref(), record).await;
                    }
                    (slot, serde_json::to_value(&outcome.result))
                });
            }
            Err(e) => {
                tracing::warn!(slot, error = %e, "Skipping malformed request line");
                ready.insert(slot, json!({ "error": e.to_string() }));
                next_slot = write_ready(&mut ready, next_slot, &mut output).await?;
            }
        }
    }

    while let Some(joined) = tasks.join_next().await {
        let (done, value) = finished(joined)?;
        ready.insert(done, value);
        next_slot = write_ready(&mut ready, next_slot, &mut output).await?;
    }
    output.flush().await?;

    Ok(next_slot)
}

fn finished(joined: Result<TaskOutput, JoinError>) -> anyhow::Result<(usize, Value)> {
    let (slot, value) = joined.context("Lookup task panicked")?;
    Ok((slot, value.context("Failed to serialize result")?))
}

/// Write every result from `next_slot` on that has no gap before it
async fn write_ready<W>(
    ready: &mut BTreeMap<usize, Value>,
    mut next_slot: usize,
    output: &mut W,
) -> anyhow::Result<usize>
where
    W: AsyncWrite + Unpin,
{
    while let Some(value) = ready.remove(&next_slot) {
        let mut line = serde_json::to_string(&value)?;
        line.push('\n');
        output.write_all(line.as_bytes()).await?;
        next_slot += 1;
    }
    Ok(next_slot)
}
