//! Core dispatch layer: the notification value object, the strategy
//! contract, the assembly-time routing table and the fan-out dispatcher.

mod dispatcher;
mod registry;
mod strategy;
mod types;

pub use dispatcher::Dispatcher;
pub use registry::StrategyRegistry;
pub use strategy::DeliveryStrategy;
pub use types::{Channel, Metadata, Notification, NotificationBuilder, Status};
