//! Resource identifier routing.
//!
//! # Responsibility
//! - Define the opaque resource identifier addressing the catalog.
//! - Classify identifiers as collection-addressed or item-addressed.
//!
//! # Invariants
//! - Pattern registration happens once, at matcher construction.
//! - Anything that matches neither registered pattern is unroutable and
//!   must fail fast in every downstream operation.

mod matcher;
mod resource;

pub use matcher::{ResourceMatcher, RouteError, RouteResult, RouteTarget};
pub use resource::ResourceId;

pub(crate) use resource::parse_key_segment;
