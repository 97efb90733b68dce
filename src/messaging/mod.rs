mod bus;
mod types;

pub use self::bus::{handle_message, MessageBus};
pub use self::types::PianoMessage;
