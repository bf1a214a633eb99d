pub mod channel;
pub mod connection;
pub mod queue;

pub use channel::{ChannelError, ChannelProvider};
pub use connection::{ConnectionError, RabbitMqConnection};
pub use queue::{QueueError, QueueMessage, RabbitMqQueue, WorkQueue};
