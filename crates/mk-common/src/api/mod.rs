pub mod interaction_event;
pub mod match_response;
pub mod recommendation_response;

/// Version stamped on every response envelope.
pub const ENGINE_VERSION: &str = concat!("mk-common/", env!("CARGO_PKG_VERSION"));
