// Built-in subscribers registered against the dispatcher at startup.

pub mod log;
pub mod notification;

pub use log::EventLogger;
pub use notification::{NotificationChannel, Notifier, UserDirectory};
