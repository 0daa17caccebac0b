pub mod bridge;
pub mod chat;
pub mod rates;

pub use bridge::{BridgeError, BridgeMessages, RequestPollBridge};
pub use chat::ChatService;
pub use rates::{Conversion, RateService};
