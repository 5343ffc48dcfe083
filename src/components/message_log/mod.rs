mod actor;
pub mod models;

pub use actor::{MessageLogActor, MessageLogHandle};
pub use models::{Message, Sender};
