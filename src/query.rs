//! Query keys and request descriptions

use std::fmt;

/// Identity of a request: resource name plus the active parameters.
///
/// A key is never mutated. Changing a parameter produces a new key that
/// supersedes the old one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    resource: &'static str,
    parts: Vec<String>,
}

impl QueryKey {
    pub fn new<I, S>(resource: &'static str, parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            resource,
            parts: parts.into_iter().map(Into::into).collect(),
        }
    }

    /// Key for parameterless resources (countries)
    pub fn bare(resource: &'static str) -> Self {
        Self {
            resource,
            parts: Vec::new(),
        }
    }

    pub fn resource(&self) -> &'static str {
        self.resource
    }

    pub fn parts(&self) -> &[String] {
        &self.parts
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.resource)?;
        for part in &self.parts {
            write!(f, ":{}", part)?;
        }
        Ok(())
    }
}

/// A `GET <base>/<path>?<query>` against the backend proxy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRequest {
    pub path: String,
    pub query: Vec<(String, String)>,
}

impl ResourceRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            query: Vec::new(),
        }
    }

    pub fn param(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((name.into(), value.to_string()));
        self
    }
}

impl fmt::Display for ResourceRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GET {}", self.path)?;
        for (i, (name, value)) in self.query.iter().enumerate() {
            let sep = if i == 0 { '?' } else { '&' };
            write!(f, "{}{}={}", sep, name, value)?;
        }
        Ok(())
    }
}
