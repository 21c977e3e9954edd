pub mod config;
pub mod logging;

pub mod checksum;
pub mod diagnostics;
pub mod engine;
pub mod session;
pub mod sink;
pub mod url_model;
