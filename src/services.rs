//! Typed domain services layered on [`Client`](crate::Client).
//!
//! Each service holds an `Arc<Client>` and exposes one async method per API operation. Wire
//! records are decoded first and then projected into the public types.

pub mod groups;
pub mod users;

pub use groups::*;
pub use users::*;
