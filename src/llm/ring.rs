//! Credential ring: the ordered API keys a request may use.
//!
//! Keys are tried front to back. A [`RingCursor`] is taken fresh for every
//! request, so a key that was throttled a moment ago is still tried first
//! next time; there is no shared "current key" between requests.

use std::fmt;

use super::types::LlmError;

#[derive(Clone, PartialEq, Eq)]
pub struct CredentialRing {
    keys: Vec<String>,
}

impl CredentialRing {
    /// Build a ring from candidate keys, dropping blanks.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::NoCredentials`] if no non-blank key remains.
    pub fn new<I, S>(keys: I) -> Result<Self, LlmError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let keys: Vec<String> = keys
            .into_iter()
            .map(Into::into)
            .filter(|k| !k.trim().is_empty())
            .collect();
        if keys.is_empty() {
            return Err(LlmError::NoCredentials { vars: "credential ring".into() });
        }
        Ok(Self { keys })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Always `false`; construction rejects an empty ring.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    #[must_use]
    pub fn cursor(&self) -> RingCursor<'_> {
        RingCursor { ring: self, position: 0 }
    }
}

impl fmt::Debug for CredentialRing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialRing")
            .field("keys", &self.keys.len())
            .finish()
    }
}

/// Walks a ring once, front to back.
#[derive(Debug)]
pub struct RingCursor<'a> {
    ring: &'a CredentialRing,
    /// Keys handed out so far. Never exceeds `ring.len()`.
    position: usize,
}

impl<'a> RingCursor<'a> {
    /// Next untried key with its zero-based index, or `None` when exhausted.
    pub fn next_key(&mut self) -> Option<(usize, &'a str)> {
        let key = self.ring.keys.get(self.position)?;
        let index = self.position;
        self.position += 1;
        Some((index, key.as_str()))
    }

    #[must_use]
    pub fn attempts(&self) -> usize {
        self.position
    }

    #[must_use]
    pub fn remaining(&self) -> usize {
        self.ring.len() - self.position
    }
}

#[cfg(test)]
#[path = "ring_test.rs"]
mod tests;
