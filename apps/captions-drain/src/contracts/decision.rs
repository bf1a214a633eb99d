use std::fmt;

/// What the operator chose for one fetched message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Delete,
    Requeue,
    Skip,
}

/// Wire-level outcome sent to the broker for a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrokerAction {
    Ack,
    Requeue,
}

impl Decision {
    /// `a` deletes, `r` requeues, anything else (including blank) skips.
    pub fn from_input(input: &str) -> Self {
        match input.trim().to_lowercase().as_str() {
            "a" => Self::Delete,
            "r" => Self::Requeue,
            _ => Self::Skip,
        }
    }

    // Skip has no marker of its own on the broker; it is a plain requeue.
    pub fn broker_action(self) -> BrokerAction {
        match self {
            Self::Delete => BrokerAction::Ack,
            Self::Requeue | Self::Skip => BrokerAction::Requeue,
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Delete => write!(f, "delete"),
            Self::Requeue => write!(f, "requeue"),
            Self::Skip => write!(f, "skip"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_input() {
        assert_eq!(Decision::from_input("a"), Decision::Delete);
        assert_eq!(Decision::from_input("A\n"), Decision::Delete);
        assert_eq!(Decision::from_input("r"), Decision::Requeue);
        assert_eq!(Decision::from_input(" R "), Decision::Requeue);
        assert_eq!(Decision::from_input("s"), Decision::Skip);
        assert_eq!(Decision::from_input(""), Decision::Skip);
        assert_eq!(Decision::from_input("ack"), Decision::Skip);
    }

    #[test]
    fn test_skip_and_requeue_share_wire_effect() {
        assert_eq!(Decision::Delete.broker_action(), BrokerAction::Ack);
        assert_eq!(Decision::Requeue.broker_action(), BrokerAction::Requeue);
        assert_eq!(Decision::Skip.broker_action(), BrokerAction::Requeue);
    }
}
