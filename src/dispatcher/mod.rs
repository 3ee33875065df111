// Dispatcher - in-process publish/subscribe for task events.
//
// Publish is synchronous fan-out on the caller's task; handler failures are
// logged and swallowed so unrelated subscribers stay isolated.

pub mod bus;
pub mod handler;

pub use bus::{Dispatcher, EventBus};
pub use handler::EventHandler;
