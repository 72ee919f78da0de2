//! Structured resource identifiers.
//!
//! # Responsibility
//! - Represent `content://<authority>/<path>[/<key>]` addresses as typed
//!   values with stable text round-tripping.
//!
//! # Invariants
//! - Segments are never empty and never contain `/` or whitespace.
//! - The item form is always the collection form plus one decimal segment.

use crate::model::product::ProductKey;
use crate::route::matcher::RouteError;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt::{Display, Formatter};

/// Fixed scheme for every catalog identifier.
pub(crate) const SCHEME: &str = "content";

static IDENTIFIER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^content://([^/\s]+)((?:/[^/\s]+)*)$").expect("valid identifier regex"));

/// Opaque address of either the whole catalog collection or one record.
///
/// Identifiers are plain data: whether one actually routes anywhere is
/// decided by [`ResourceMatcher::classify`](crate::route::ResourceMatcher).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceId {
    authority: String,
    segments: Vec<String>,
}

impl ResourceId {
    /// Builds an identifier from an authority and a `/`-separated path.
    ///
    /// Empty path segments are dropped, so `"products"` and `"/products/"`
    /// produce the same identifier.
    pub fn new(authority: impl Into<String>, path: &str) -> Self {
        Self {
            authority: authority.into(),
            segments: path
                .split('/')
                .filter(|segment| !segment.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }

    /// Returns this identifier with a decimal key segment appended.
    ///
    /// This is how item identifiers are constructed from collection
    /// identifiers, mirroring the external contract.
    pub fn with_key(&self, key: ProductKey) -> Self {
        let mut segments = self.segments.clone();
        segments.push(key.to_string());
        Self {
            authority: self.authority.clone(),
            segments,
        }
    }

    /// Parses the canonical text form.
    ///
    /// # Errors
    /// - [`RouteError::Unroutable`] when the text is not a well-formed
    ///   `content://` identifier. Malformed text can never route anywhere,
    ///   so it shares the unroutable error shape.
    pub fn parse(text: &str) -> Result<Self, RouteError> {
        let captures = IDENTIFIER_RE
            .captures(text.trim())
            .ok_or_else(|| RouteError::Unroutable(text.to_string()))?;

        let authority = captures[1].to_string();
        let segments = captures[2]
            .split('/')
            .filter(|segment| !segment.is_empty())
            .map(str::to_string)
            .collect();

        Ok(Self {
            authority,
            segments,
        })
    }

    pub fn authority(&self) -> &str {
        &self.authority
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Returns the trailing segment parsed as a record key, if it is one.
    pub fn trailing_key(&self) -> Option<ProductKey> {
        self.segments.last().and_then(|segment| parse_key_segment(segment))
    }
}

impl Display for ResourceId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{SCHEME}://{}", self.authority)?;
        for segment in &self.segments {
            write!(f, "/{segment}")?;
        }
        Ok(())
    }
}

/// Parses one path segment as an unsigned decimal record key.
///
/// Returns `None` for signs, non-digits, or values that overflow the key
/// type, all of which make the segment non-numeric for routing purposes.
pub(crate) fn parse_key_segment(segment: &str) -> Option<ProductKey> {
    if segment.is_empty() || !segment.bytes().all(|byte| byte.is_ascii_digit()) {
        return None;
    }
    segment.parse::<ProductKey>().ok()
}
