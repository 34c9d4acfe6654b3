// Endpoint paths and their resolution against the console base URL.
//
// Fixed paths are resolved with standard URL reference rules; resource
// identifiers are appended as separate, percent-encoded path segments so a
// name like `dev/ops` can never escape its segment. Empty and dot-only
// identifiers are refused outright.

use url::Url;

use crate::error::Error;

/// A console endpoint: a relative or absolute path plus optional identifier
/// segments.
///
/// ```
/// use pcc_api::Endpoint;
///
/// let base = url::Url::parse("https://console.example.com/").unwrap();
/// let url = Endpoint::new("api/v1/groups").segment("a/b").resolve(&base).unwrap();
/// assert_eq!(url.as_str(), "https://console.example.com/api/v1/groups/a%2Fb");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    path: String,
    segments: Vec<String>,
}

impl Endpoint {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            segments: Vec::new(),
        }
    }

    /// Append an identifier segment. It is percent-encoded on resolution.
    pub fn segment(mut self, segment: impl Into<String>) -> Self {
        self.segments.push(segment.into());
        self
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Resolve against `base`.
    ///
    /// Relative paths are appended to the base path, absolute paths replace
    /// it, and full URLs replace the base entirely. Empty, `.` and `..`
    /// identifiers are rejected: URL parsing would collapse them and the
    /// request would land on the parent path.
    pub fn resolve(&self, base: &Url) -> Result<Url, Error> {
        if let Some(bad) = self
            .segments
            .iter()
            .find(|s| matches!(s.as_str(), "" | "." | ".."))
        {
            return Err(Error::InvalidEndpoint(format!(
                "'{bad}' is not a valid identifier for '{}'",
                self.path
            )));
        }

        let mut url = base.join(&self.path)?;

        if !self.segments.is_empty() {
            let mut path = url.path_segments_mut().map_err(|()| {
                Error::InvalidEndpoint(format!("'{}' cannot carry path segments", self.path))
            })?;
            path.pop_if_empty();
            for segment in &self.segments {
                path.push(segment);
            }
        }

        Ok(url)
    }
}

impl From<&str> for Endpoint {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

impl From<String> for Endpoint {
    fn from(path: String) -> Self {
        Self::new(path)
    }
}
