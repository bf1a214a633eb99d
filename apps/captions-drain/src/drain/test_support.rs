use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

use super::decision::{DecisionError, DecisionProvider};
use crate::contracts::{CaptionsRequest, Decision};
use crate::messaging::{QueueError, QueueMessage, WorkQueue};

#[derive(Default)]
struct QueueState {
    ready: VecDeque<(Vec<u8>, bool)>,
    outstanding: Option<u64>,
    next_tag: u64,
    acked: Vec<Vec<u8>>,
    fetches: usize,
    requeues: usize,
    fail_acks: bool,
}

/// Broker stand-in. Requeued messages go back to the head of the queue and
/// come out flagged as redelivered, which is what RabbitMQ does.
#[derive(Default)]
pub struct InMemoryQueue {
    state: Mutex<QueueState>,
}

impl InMemoryQueue {
    pub fn with_payloads(payloads: &[&[u8]]) -> Self {
        let queue = Self::default();
        for payload in payloads {
            queue.push(payload);
        }
        queue
    }

    pub fn push(&self, payload: &[u8]) {
        self.state
            .lock()
            .unwrap()
            .ready
            .push_back((payload.to_vec(), false));
    }

    pub fn fail_acks(&self) {
        self.state.lock().unwrap().fail_acks = true;
    }

    pub fn ready_payloads(&self) -> Vec<Vec<u8>> {
        let state = self.state.lock().unwrap();
        state.ready.iter().map(|(payload, _)| payload.clone()).collect()
    }

    pub fn acked_payloads(&self) -> Vec<Vec<u8>> {
        self.state.lock().unwrap().acked.clone()
    }

    pub fn fetches(&self) -> usize {
        self.state.lock().unwrap().fetches
    }

    pub fn requeues(&self) -> usize {
        self.state.lock().unwrap().requeues
    }

    fn settle(state: &mut QueueState, message: &QueueMessage) {
        assert_eq!(
            state.outstanding.take(),
            Some(message.delivery_tag),
            "settled a message that was not outstanding"
        );
    }
}

#[async_trait]
impl WorkQueue for InMemoryQueue {
    async fn fetch_one(&self) -> Result<Option<QueueMessage>, QueueError> {
        let mut state = self.state.lock().unwrap();
        state.fetches += 1;
        assert!(
            state.outstanding.is_none(),
            "fetched while another message was outstanding"
        );

        let Some((payload, redelivered)) = state.ready.pop_front() else {
            return Ok(None);
        };

        state.next_tag += 1;
        let delivery_tag = state.next_tag;
        state.outstanding = Some(delivery_tag);

        Ok(Some(QueueMessage {
            delivery_tag,
            payload,
            redelivered,
            remaining: state.ready.len() as u32,
        }))
    }

    async fn ack(&self, message: &QueueMessage) -> Result<(), QueueError> {
        let mut state = self.state.lock().unwrap();
        if state.fail_acks {
            return Err(QueueError::AckFailed {
                delivery_tag: message.delivery_tag,
                reason: "channel closed".to_string(),
            });
        }

        Self::settle(&mut state, message);
        state.acked.push(message.payload.clone());
        Ok(())
    }

    async fn requeue(&self, message: &QueueMessage) -> Result<(), QueueError> {
        let mut state = self.state.lock().unwrap();
        Self::settle(&mut state, message);
        state.requeues += 1;
        state.ready.push_front((message.payload.clone(), true));
        Ok(())
    }
}

/// Replays a fixed list of decisions, then reports closed input.
pub struct ScriptedDecisions {
    decisions: VecDeque<Decision>,
    pub seen: Vec<CaptionsRequest>,
}

impl ScriptedDecisions {
    pub fn new(decisions: &[Decision]) -> Self {
        Self {
            decisions: decisions.iter().copied().collect(),
            seen: Vec::new(),
        }
    }
}

#[async_trait]
impl DecisionProvider for ScriptedDecisions {
    async fn decide(&mut self, request: &CaptionsRequest) -> Result<Decision, DecisionError> {
        self.seen.push(request.clone());
        self.decisions.pop_front().ok_or(DecisionError::InputClosed)
    }
}
