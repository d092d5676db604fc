//! Test case definitions.

use std::collections::HashMap;

use serde::Deserialize;

use crate::value::Value;

/// A single table-driven test case.
///
/// `error` empty means no error is expected and the produced value is compared with
/// `want`. A non-empty `error` means an error is expected whose message contains it
/// (case-insensitively); `want` is then ignored.
///
/// ```rust
/// use casebook::Case;
/// let ok = Case::new("a").want("A");
/// let err = Case::new("").error("empty input");
/// assert!(!ok.expects_error());
/// assert!(err.expects_error());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Case {
    /// The object under test, for diagnostics only.
    #[serde(default)]
    pub receiver: Value,
    /// Passed to the production function.
    #[serde(default)]
    pub input: Value,
    /// Expected output when no error is expected.
    #[serde(default)]
    pub want: Value,
    /// Expected error substring; empty when no error is expected.
    #[serde(default)]
    pub error: String,
}

/// Named test cases. Names are unique; iteration order is unspecified.
pub type Cases = HashMap<String, Case>;

impl Case {
    pub fn new(input: impl Into<Value>) -> Self {
        Self {
            input: input.into(),
            ..Self::default()
        }
    }

    pub fn receiver(mut self, receiver: impl Into<Value>) -> Self {
        self.receiver = receiver.into();
        self
    }

    pub fn want(mut self, want: impl Into<Value>) -> Self {
        self.want = want.into();
        self
    }

    pub fn error(mut self, substring: impl Into<String>) -> Self {
        self.error = substring.into();
        self
    }

    pub fn expects_error(&self) -> bool {
        !self.error.is_empty()
    }
}

/// Builds [`Cases`] from `(name, case)` pairs. Later duplicates replace earlier ones.
pub fn cases<I, N>(entries: I) -> Cases
where
    I: IntoIterator<Item = (N, Case)>,
    N: Into<String>,
{
    entries
        .into_iter()
        .map(|(name, case)| (name.into(), case))
        .collect()
}
