use async_trait::async_trait;
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::contracts::{CaptionsRequest, Decision};

pub const ACTION_PROMPT: &str = "Action: (a)ck to delete, (r)eject to requeue, (s)kip to next: ";

/// Source of the operator's verdict for each readable message.
#[async_trait]
pub trait DecisionProvider: Send {
    async fn decide(&mut self, request: &CaptionsRequest) -> Result<Decision, DecisionError>;
}

/// Asks on a terminal-like pair of streams and blocks until a line arrives.
pub struct ConsolePrompt<R, W> {
    input: R,
    output: W,
}

impl<R, W> ConsolePrompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl ConsolePrompt<tokio::io::BufReader<tokio::io::Stdin>, std::io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(
            tokio::io::BufReader::new(tokio::io::stdin()),
            std::io::stdout(),
        )
    }
}

#[async_trait]
impl<R, W> DecisionProvider for ConsolePrompt<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: Write + Send,
{
    async fn decide(&mut self, _request: &CaptionsRequest) -> Result<Decision, DecisionError> {
        write!(self.output, "{}", ACTION_PROMPT)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line).await? == 0 {
            return Err(DecisionError::InputClosed);
        }

        Ok(Decision::from_input(&line))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DecisionError {
    #[error("Operator input closed")]
    InputClosed,

    #[error("Failed to read operator input: {0}")]
    Io(#[from] std::io::Error),
}
