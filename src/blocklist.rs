//! # Domain List Module
//!
//! The ordered list of domains a run submits to the blocklist. Order is kept and duplicates
//! are not collapsed; deduplication is the registry's business.

use crate::error::DomainListError;
use std::path::Path;

/// A non-empty, ordered list of non-empty domain strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainList {
    domains: Vec<String>,
}

impl DomainList {
    /// Creates a `DomainList` from already separated entries.
    ///
    /// Entries are trimmed. An empty list, or an entry that is empty after trimming, is
    /// rejected.
    pub fn new<I, S>(domains: I) -> Result<Self, DomainListError>
        where I: IntoIterator<Item = S>, S: AsRef<str>
    {
        let domains = domains
            .into_iter()
            .enumerate()
            .map(|(position, domain)| {
                let domain = domain.as_ref().trim();
                if domain.is_empty() {
                    Err(DomainListError::EmptyEntry(position))
                } else {
                    Ok(domain.to_string())
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        if domains.is_empty() {
            return Err(DomainListError::Empty);
        }

        Ok(DomainList { domains })
    }

    /// Parses a newline separated list.
    ///
    /// # Arguments
    ///
    /// * `text` - One domain per line. Blank lines and `#` comments are skipped.
    ///
    /// # Returns
    ///
    /// The domains in file order, or `DomainListError::Empty` if nothing is left.
    pub fn parse(text: &str) -> Result<Self, DomainListError> {
        let entries = text
            .lines()
            .map(|line| line.split('#').next().unwrap_or("").trim())
            .filter(|line| !line.is_empty());

        Self::new(entries)
    }

    /// Reads and parses a domain list file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, DomainListError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| DomainListError::Io {
            path: path.display().to_string(),
            source,
        })?;

        Self::parse(&text)
    }

    /// Appends the entries of `other` after this list's entries.
    pub fn extend(&mut self, other: DomainList) {
        self.domains.extend(other.domains);
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.domains.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.domains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }
}
