//! Gift producers
//!
//! Both produce `GiftEvent`s with the action already resolved; the session
//! is the only consumer.

pub mod live;
pub mod simulator;

pub use live::{ConnectionStatus, ConnectorError, LiveConnector};
pub use simulator::GiftSimulator;
