//! On-demand source classification and fetching.

use std::path::{Path, PathBuf};

use url::Url;

use crate::error::LoadError;

/// Where on-demand children come from: a local XML file or an http(s)
/// URL. Fetching is synchronous and blocking — one request, no retries,
/// no timeout policy of its own (see the crate-level concurrency notes).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentSource {
    File(PathBuf),
    Remote(Url),
}

impl ContentSource {
    /// Classifies a source reference. An absolute http(s) URL is fetched
    /// remotely; otherwise the reference must be a path with an `.xml`
    /// suffix. Anything else is unsupported.
    pub fn classify(raw: &str) -> Result<Self, LoadError> {
        if let Ok(parsed) = Url::parse(raw) {
            if parsed.scheme() == "http" || parsed.scheme() == "https" {
                return Ok(Self::Remote(parsed));
            }
        }
        let path = Path::new(raw);
        if path
            .extension()
            .is_some_and(|extension| extension.eq_ignore_ascii_case("xml"))
        {
            return Ok(Self::File(path.to_path_buf()));
        }
        Err(LoadError::UnsupportedSource(raw.to_string()))
    }

    /// Reads the whole source body.
    pub fn fetch(&self) -> Result<String, LoadError> {
        match self {
            Self::File(path) => {
                log::debug!("reading on-demand content from {}", path.display());
                std::fs::read_to_string(path).map_err(|err| LoadError::io(path, err))
            }
            Self::Remote(url) => {
                log::debug!("fetching on-demand content from {url}");
                let response = reqwest::blocking::get(url.as_str())
                    .and_then(|response| response.error_for_status())
                    .map_err(|err| LoadError::http(url, err))?;
                response.text().map_err(|err| LoadError::http(url, err))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_xml_suffix_is_a_file() {
        assert!(matches!(
            ContentSource::classify("menus/left.xml").unwrap(),
            ContentSource::File(_)
        ));
        assert!(matches!(
            ContentSource::classify("LEFT.XML").unwrap(),
            ContentSource::File(_)
        ));
    }

    #[test]
    fn test_http_url_is_remote() {
        assert!(matches!(
            ContentSource::classify("https://example.test/menu.xml").unwrap(),
            ContentSource::Remote(_)
        ));
    }

    #[test]
    fn test_other_references_are_unsupported() {
        assert!(matches!(
            ContentSource::classify("menus/left.json"),
            Err(LoadError::UnsupportedSource(_))
        ));
        assert!(matches!(
            ContentSource::classify("ftp://example.test/menu.xml"),
            Err(LoadError::UnsupportedSource(_))
        ));
    }
}
