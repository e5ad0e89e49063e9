//! Concrete HTTP clients behind the application-layer ports.

pub mod geocode;
pub mod skiddle;
