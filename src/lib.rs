pub mod apis;
pub mod config;
pub mod constants;
pub mod domain;
pub mod error;
pub mod logging;
pub mod server;
pub mod taxonomy;

// Pure search core
pub mod search;

// Async application layer (ports, session, debounced flows)
pub mod app;
