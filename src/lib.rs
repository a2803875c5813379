pub mod config;
pub mod helper;
pub mod http;
pub mod telegram_log;
