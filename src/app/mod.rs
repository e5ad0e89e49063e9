//! Application layer: collaborator ports and the async search/geocode flows
//! built on top of the pure core in [`crate::search`].

pub mod debounce;
pub mod location;
pub mod ports;
pub mod session;
