//! Interactive drain of a work queue.
//!
//! Messages are pulled one at a time with manual acknowledgement. Each one is
//! decoded as a [`CaptionsRequest`], shown to the operator, and settled on the
//! broker according to the operator's [`Decision`] before the next fetch.
//! Payloads that do not decode are acked straight away without a prompt.

use std::io::Write;
use tracing::{info, warn};

use crate::contracts::{BrokerAction, CaptionsRequest, Decision};
use crate::messaging::{QueueError, QueueMessage, WorkQueue};

pub mod decision;

#[cfg(test)]
mod test_support;

pub use decision::{ConsolePrompt, DecisionError, DecisionProvider};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DrainReport {
    pub processed: u64,
    pub deleted: u64,
    pub requeued: u64,
    pub skipped: u64,
    pub malformed: u64,
    /// The session ended because operator input closed, not because the queue emptied.
    pub input_closed: bool,
}

impl DrainReport {
    fn record(&mut self, decision: Decision) {
        match decision {
            Decision::Delete => self.deleted += 1,
            Decision::Requeue => self.requeued += 1,
            Decision::Skip => self.skipped += 1,
        }
    }
}

/// Runs one drain session until the queue reports empty.
///
/// Broker failures abort the session immediately, leaving any outstanding
/// message to be redelivered once the connection drops.
pub async fn drain_queue<Q, D, W>(
    queue: &Q,
    decisions: &mut D,
    out: &mut W,
) -> Result<DrainReport, DrainError>
where
    Q: WorkQueue + ?Sized,
    D: DecisionProvider + ?Sized,
    W: Write,
{
    let mut report = DrainReport::default();

    while let Some(message) = queue.fetch_one().await? {
        report.processed += 1;
        let count = report.processed;
        let delivery_tag = message.delivery_tag;

        let request = match CaptionsRequest::decode(&message.payload) {
            Ok(request) => request,
            Err(e) => {
                warn!(delivery_tag, error = %e, "Deleting undecodable message");
                writeln!(out, "⚠️  Invalid JSON message: {}", message.payload_text())?;
                queue.ack(&message).await?;
                report.malformed += 1;
                continue;
            }
        };

        show_message(out, count, &message, &request)?;

        let decision = match decisions.decide(&request).await {
            Ok(decision) => decision,
            Err(DecisionError::InputClosed) => {
                queue.requeue(&message).await?;
                warn!(delivery_tag, "Operator input closed, message requeued");
                writeln!(out)?;
                writeln!(out, "⏹️  Operator input closed, stopping")?;
                report.input_closed = true;
                break;
            }
            Err(e) => return Err(e.into()),
        };

        match decision.broker_action() {
            BrokerAction::Ack => queue.ack(&message).await?,
            BrokerAction::Requeue => queue.requeue(&message).await?,
        }

        info!(
            delivery_tag,
            video_id = request.video_id(),
            decision = %decision,
            "Message settled"
        );

        let status = match decision {
            Decision::Delete => "✅ Message acknowledged (deleted)",
            Decision::Requeue => "🔄 Message rejected (requeued)",
            Decision::Skip => "⏭️  Message skipped (requeued)",
        };
        writeln!(out, "{}", status)?;
        report.record(decision);
    }

    if report.processed == 0 {
        writeln!(out, "✅ No messages found in queue")?;
    } else {
        writeln!(out, "Processed {} messages", report.processed)?;
    }
    out.flush()?;

    Ok(report)
}

fn show_message<W: Write>(
    out: &mut W,
    count: u64,
    message: &QueueMessage,
    request: &CaptionsRequest,
) -> std::io::Result<()> {
    if message.redelivered {
        writeln!(out, "Message {} (redelivered):", count)?;
    } else {
        writeln!(out, "Message {}:", count)?;
    }
    writeln!(out, "  VideoId: {}", request.video_id())?;
    writeln!(out, "  S3Key: {}", request.s3_key())?;
    writeln!(out, "  Body: {}", message.payload_text())?;
    writeln!(out, "  Remaining in queue: {}", message.remaining)
}

#[derive(Debug, thiserror::Error)]
pub enum DrainError {
    #[error(transparent)]
    Queue(#[from] QueueError),

    #[error(transparent)]
    Decision(#[from] DecisionError),

    #[error("Failed to write operator output: {0}")]
    Output(#[from] std::io::Error),
}
