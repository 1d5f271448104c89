//! On-demand load errors

use std::path::Path;

use super::ValueError;

/// Errors raised while fetching or merging on-demand content.
///
/// Every variant is fatal for the current request: the loader never
/// retries and never merges a partial subtree.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The source file could not be read.
    #[error("source file unreadable: {path}")]
    Io {
        /// Path of the file that failed.
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The source URL could not be fetched.
    #[error("network error fetching {url}")]
    Http {
        /// URL that failed.
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The fetched body is not well-formed XML.
    #[error("malformed XML in {origin}")]
    Xml {
        /// Source reference the body came from.
        origin: String,
        #[source]
        source: quick_xml::Error,
    },

    /// An attribute value does not match its property's encoding rule.
    #[error("invalid attribute value in {origin}")]
    Value {
        /// Source reference the attribute came from.
        origin: String,
        #[source]
        source: ValueError,
    },

    /// The source reference is neither an `.xml` path nor an http(s) URL.
    #[error("unsupported on-demand source: {0}")]
    UnsupportedSource(String),

    /// Load was requested on a node with no source property.
    #[error("node has no on-demand source")]
    MissingSource,
}

impl LoadError {
    /// Creates a new file read error.
    pub fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.display().to_string(),
            source,
        }
    }

    /// Creates a new fetch error.
    pub fn http(url: &url::Url, source: reqwest::Error) -> Self {
        Self::Http {
            url: url.to_string(),
            source,
        }
    }

    /// Creates a new parse error for the given source reference.
    pub fn xml(origin: &str, source: quick_xml::Error) -> Self {
        Self::Xml {
            origin: origin.to_string(),
            source,
        }
    }

    /// Creates a new attribute value error for the given source reference.
    pub fn value(origin: &str, source: ValueError) -> Self {
        Self::Value {
            origin: origin.to_string(),
            source,
        }
    }
}
