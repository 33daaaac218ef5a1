//! Streaming Ingestion
//!
//! Reads newline-delimited JSON records from an async source, groups them
//! into timed micro-batches, and feeds each batch to the dispatcher.
//! Batches never overlap: a dispatch runs to completion before the next
//! window closes. A stream failure is terminal: it travels through the
//! channel so the batcher aborts instead of training a partial window.

use crate::dispatcher::{BatchDispatcher, BatchOutcome};
use crate::PipelineError;
use report_schema::{RawRecord, ReportSchema};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;
use tokio::time::{interval_at, Duration, Instant, MissedTickBehavior};
use tracing::{debug, error, info};

/// One message from the reader to the batcher
#[derive(Debug)]
pub enum StreamEvent {
    /// A decoded record
    Record(RawRecord),
    /// The stream died; records buffered for the current window must not train
    Failed(PipelineError),
}

/// Decode one JSON line into a record using the schema's column names
pub fn decode_line(line: &str, schema: &ReportSchema) -> Result<RawRecord, PipelineError> {
    let value: serde_json::Value = serde_json::from_str(line)?;
    Ok(RawRecord::from_json(&value, schema)?)
}

/// Read JSON lines from an async reader, decode them, and forward records
/// into the batcher channel. Blank lines are skipped. A malformed line or
/// read failure is fatal: the error is forwarded as a terminal
/// [`StreamEvent::Failed`] and the batcher surfaces it to its caller.
pub async fn read_lines<R>(reader: R, schema: &ReportSchema, sender: mpsc::Sender<StreamEvent>)
where
    R: AsyncBufRead + Unpin,
{
    if let Err(failure) = forward_records(reader, schema, &sender).await {
        let _ = sender.send(StreamEvent::Failed(failure)).await;
    }
}

async fn forward_records<R>(
    reader: R,
    schema: &ReportSchema,
    sender: &mpsc::Sender<StreamEvent>,
) -> Result<(), PipelineError>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let record = decode_line(&line, schema)?;
        if sender.send(StreamEvent::Record(record)).await.is_err() {
            debug!("batcher channel closed, stopping reader");
            break;
        }
    }
    Ok(())
}

/// Groups incoming records into fixed-interval micro-batches
pub struct MicroBatcher {
    receiver: mpsc::Receiver<StreamEvent>,
    batch_interval: Duration,
}

impl MicroBatcher {
    /// Create a batcher over an existing receiver
    pub fn new(receiver: mpsc::Receiver<StreamEvent>, batch_interval: Duration) -> Self {
        Self {
            receiver,
            batch_interval,
        }
    }

    /// Create a channel pair for the batcher
    pub fn channel(capacity: usize, batch_interval: Duration) -> (mpsc::Sender<StreamEvent>, Self) {
        let (sender, receiver) = mpsc::channel(capacity);
        (sender, Self::new(receiver, batch_interval))
    }

    /// Run until the sender side closes cleanly, dispatching one micro-batch
    /// per interval tick plus a final flush. A batch error or a stream
    /// failure stops the loop; on failure the pending window is discarded,
    /// not trained.
    pub async fn run(mut self, dispatcher: &mut BatchDispatcher) -> Result<(), PipelineError> {
        info!(
            interval_secs = self.batch_interval.as_secs(),
            "starting micro-batch loop"
        );

        // First window closes one full interval from now, not immediately
        let mut ticker = interval_at(Instant::now() + self.batch_interval, self.batch_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut pending: Vec<RawRecord> = Vec::new();

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let batch = std::mem::take(&mut pending);
                    Self::dispatch_batch(dispatcher, &batch)?;
                }
                received = self.receiver.recv() => match received {
                    Some(StreamEvent::Record(record)) => pending.push(record),
                    Some(StreamEvent::Failed(failure)) => {
                        error!(
                            pending = pending.len(),
                            "record stream failed, aborting without flushing"
                        );
                        return Err(failure);
                    }
                    None => {
                        Self::dispatch_batch(dispatcher, &pending)?;
                        info!("record stream ended, batcher stopping");
                        break;
                    }
                },
            }
        }
        Ok(())
    }

    fn dispatch_batch(
        dispatcher: &mut BatchDispatcher,
        batch: &[RawRecord],
    ) -> Result<(), PipelineError> {
        match dispatcher.dispatch(batch)? {
            BatchOutcome::Skipped => debug!("skipped empty micro-batch"),
            BatchOutcome::Trained(report) => info!(
                rows = report.rows,
                classes = report.classes,
                global_accuracy = report.global.accuracy,
                local_accuracy = report.local.accuracy,
                "micro-batch trained"
            ),
        }
        Ok(())
    }
}
