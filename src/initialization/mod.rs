//! Process resource initialization: logger and HTTP client.

mod client;
mod logger;

pub use client::init_client;
pub use logger::init_logger_with;
