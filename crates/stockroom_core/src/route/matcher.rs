//! Identifier classification against the registered catalog patterns.
//!
//! # Responsibility
//! - Hold the two patterns registered at startup: the collection path, and
//!   the collection path plus one numeric key segment.
//! - Classify incoming identifiers by exact-segment comparison.
//!
//! # Invariants
//! - Matching is stateless after construction.
//! - Item classifications always carry the parsed key.

use crate::model::product::ProductKey;
use crate::route::resource::{parse_key_segment, ResourceId};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RouteResult<T> = Result<T, RouteError>;

/// Routing outcome for an identifier that matched a registered pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteTarget {
    /// The identifier addresses every record in the catalog.
    Collection,
    /// The identifier addresses exactly one record by key.
    Item(ProductKey),
}

/// Routing failure, surfaced before any store access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteError {
    /// The identifier matches neither registered pattern.
    Unroutable(String),
    /// The identifier routed, but its shape does not fit the operation
    /// (e.g. insert against an item identifier).
    UnsupportedOperation {
        operation: &'static str,
        id: String,
    },
}

impl Display for RouteError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unroutable(id) => write!(f, "unroutable identifier: {id}"),
            Self::UnsupportedOperation { operation, id } => {
                write!(f, "{operation} is not supported for {id}")
            }
        }
    }
}

impl Error for RouteError {}

/// Fixed-pattern matcher for one catalog collection.
///
/// Construction registers both recognized shapes once; `classify` only
/// compares against them and never mutates the matcher.
#[derive(Debug, Clone)]
pub struct ResourceMatcher {
    authority: String,
    collection_segments: Vec<String>,
}

impl ResourceMatcher {
    /// Registers the collection pattern and the item pattern for
    /// `authority` + `collection_path`.
    pub fn new(authority: impl Into<String>, collection_path: &str) -> Self {
        let collection = ResourceId::new(authority, collection_path);
        Self {
            authority: collection.authority().to_string(),
            collection_segments: collection.segments().to_vec(),
        }
    }

    /// Returns the identifier addressing the whole collection.
    pub fn collection_id(&self) -> ResourceId {
        ResourceId::new(self.authority.clone(), &self.collection_segments.join("/"))
    }

    /// Returns the identifier addressing one record by key.
    pub fn item_id(&self, key: ProductKey) -> ResourceId {
        self.collection_id().with_key(key)
    }

    /// Classifies `id` against the registered patterns.
    ///
    /// # Errors
    /// - [`RouteError::Unroutable`] for any identifier outside the two
    ///   registered shapes, including wrong authority and non-numeric
    ///   trailing segments.
    pub fn classify(&self, id: &ResourceId) -> RouteResult<RouteTarget> {
        if id.authority() != self.authority {
            return Err(RouteError::Unroutable(id.to_string()));
        }

        let segments = id.segments();
        if segments == self.collection_segments.as_slice() {
            return Ok(RouteTarget::Collection);
        }

        if segments.len() == self.collection_segments.len() + 1
            && segments[..self.collection_segments.len()] == self.collection_segments[..]
        {
            if let Some(key) = parse_key_segment(&segments[segments.len() - 1]) {
                return Ok(RouteTarget::Item(key));
            }
        }

        Err(RouteError::Unroutable(id.to_string()))
    }
}
