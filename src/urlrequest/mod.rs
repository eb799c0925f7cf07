//! Per-call addressing and lifetime.

pub mod context;
pub mod endpoint;

pub use context::CallContext;
pub use endpoint::Endpoint;
