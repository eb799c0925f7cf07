//! HTTP request/response handling.
//!
//! - [`transaction`]: the pipeline that runs one call end to end
//! - [`body`], [`requestbody`]: wire body and caller-facing body variants
//! - [`decode`]: JSON decode targets
//! - [`drain`], [`dump`]: non-destructive body copies and the traffic dump

pub mod body;
pub mod decode;
pub mod drain;
pub mod dump;
pub mod headers;
pub mod query;
pub mod requestbody;
pub mod transaction;

pub use body::Body;
pub use decode::DecodeTarget;
pub use query::Query;
pub use requestbody::RequestBody;
pub use transaction::{AuthFn, Call};
