pub mod captions_request;
pub mod decision;

pub use captions_request::{CaptionsRequest, DecodeError};
pub use decision::{BrokerAction, Decision};
