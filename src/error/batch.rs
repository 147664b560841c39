//! Aggregated failures from a batch send.

use std::fmt;

use super::{EmailError, ErrorKind};

/// One failed mail within a batch.
#[derive(Debug)]
pub struct BatchFailure {
    /// Position of the mail in the submitted slice.
    pub index: usize,
    /// Why it failed.
    pub error: EmailError,
}

impl fmt::Display for BatchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "mail {}: {}", self.index, self.error)
    }
}

/// Every failure from a batch send, in submission order.
///
/// Each constituent error stays intact, so callers can ask questions like
/// "did any mail fail because of the credential?" without string matching.
///
/// ```
/// use integrations_azure_email::error::{BatchError, BatchFailure, EmailError, ErrorKind};
///
/// let batch = BatchError::from_failures(vec![BatchFailure {
///     index: 1,
///     error: EmailError::Timeout { message: "slow".to_string() },
/// }]);
///
/// assert_eq!(batch.len(), 1);
/// assert!(batch.contains_kind(ErrorKind::Transport));
/// assert!(!batch.contains_kind(ErrorKind::Api));
/// ```
#[derive(Debug, Default)]
pub struct BatchError {
    failures: Vec<BatchFailure>,
    cancelled: bool,
}

impl BatchError {
    /// Build an aggregate from individual failures.
    pub fn from_failures(mut failures: Vec<BatchFailure>) -> Self {
        failures.sort_by_key(|failure| failure.index);
        Self {
            failures,
            cancelled: false,
        }
    }

    /// Mark the batch as cancelled.
    pub fn with_cancelled(mut self, cancelled: bool) -> Self {
        self.cancelled = cancelled;
        self
    }

    /// `Ok(())` when nothing failed and the batch ran to completion.
    pub(crate) fn into_result(self) -> Result<(), BatchError> {
        if self.failures.is_empty() && !self.cancelled {
            Ok(())
        } else {
            Err(self)
        }
    }

    /// All failures, ordered by mail index.
    pub fn failures(&self) -> &[BatchFailure] {
        &self.failures
    }

    /// Number of failed mails.
    pub fn len(&self) -> usize {
        self.failures.len()
    }

    /// Whether no mail failed.
    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }

    /// Whether the batch was cancelled before every mail was attempted.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    /// Iterate over failures.
    pub fn iter(&self) -> std::slice::Iter<'_, BatchFailure> {
        self.failures.iter()
    }

    /// Iterate over the underlying errors.
    pub fn errors(&self) -> impl Iterator<Item = &EmailError> {
        self.failures.iter().map(|failure| &failure.error)
    }

    /// Whether any constituent error has the given kind.
    pub fn contains_kind(&self, kind: ErrorKind) -> bool {
        self.errors().any(|error| error.kind() == kind)
    }

    /// Failures whose error has the given kind.
    pub fn of_kind(&self, kind: ErrorKind) -> impl Iterator<Item = &BatchFailure> {
        self.failures
            .iter()
            .filter(move |failure| failure.error.kind() == kind)
    }

    /// The failure for a given mail index, if that mail failed.
    pub fn get(&self, index: usize) -> Option<&EmailError> {
        self.failures
            .binary_search_by_key(&index, |failure| failure.index)
            .ok()
            .map(|position| &self.failures[position].error)
    }

    /// Consume the aggregate and return the failures.
    pub fn into_failures(self) -> Vec<BatchFailure> {
        self.failures
    }
}

impl fmt::Display for BatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (position, failure) in self.failures.iter().enumerate() {
            if position > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", failure)?;
        }
        if self.cancelled {
            if !self.failures.is_empty() {
                writeln!(f)?;
            }
            write!(f, "batch cancelled")?;
        }
        Ok(())
    }
}

impl std::error::Error for BatchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.failures
            .first()
            .map(|failure| &failure.error as &(dyn std::error::Error + 'static))
    }
}

impl IntoIterator for BatchError {
    type Item = BatchFailure;
    type IntoIter = std::vec::IntoIter<BatchFailure>;

    fn into_iter(self) -> Self::IntoIter {
        self.failures.into_iter()
    }
}

impl<'a> IntoIterator for &'a BatchError {
    type Item = &'a BatchFailure;
    type IntoIter = std::slice::Iter<'a, BatchFailure>;

    fn into_iter(self) -> Self::IntoIter {
        self.failures.iter()
    }
}
