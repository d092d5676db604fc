//! Case failure diagnostics.
//!
//! A failing case is described by exactly one [`Failure`]. Its `Display` output is the
//! user-facing diagnostic: a fixed multi-line template naming the receiver, the input and
//! either the expected/actual values or the expected substring/actual error.
//!
//! # Templates
//!
//! ```text
//! Test failed!                    Unexpected error!
//! receiver                        receiver
//!   <receiver>                      <receiver>
//! with input                      with input
//!   <input>                         <input>
//! expected value                  expected value
//!   <want>                          <want>
//! but got value                   but got error
//!   <got>                           <error detail>
//! ```
//!
//! `Wrong error!` and `Expected error not thrown!` replace the expected value with
//! `expected error to contain text` and end with the actual error or the actual value.

use std::fmt::Write as _;

use miette::{Diagnostic, Report};
use thiserror::Error;

use crate::value::Value;

/// Type-safe classification of a [`Failure`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// Value produced, but not the expected one.
    Equality,
    /// An error occurred where none was expected.
    UnexpectedError,
    /// An error occurred, but its message lacks the expected substring.
    WrongError,
    /// An error was expected but a value was produced.
    MissingError,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::Equality => "equality",
            FailureKind::UnexpectedError => "unexpected-error",
            FailureKind::WrongError => "wrong-error",
            FailureKind::MissingError => "missing-error",
        }
    }
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The four ways a case can fail.
#[derive(Debug, Error, Diagnostic)]
pub enum Failure {
    #[error("Test failed!\nreceiver\n  {receiver}\nwith input\n  {input}\nexpected value\n  {want}\nbut got value\n  {got}\n")]
    #[diagnostic(code(casebook::equality))]
    Equality {
        receiver: Value,
        input: Value,
        want: Value,
        got: Value,
    },

    #[error("Unexpected error!\nreceiver\n  {receiver}\nwith input\n  {input}\nexpected value\n  {want}\nbut got error\n  {}\n", error_detail(.got))]
    #[diagnostic(code(casebook::unexpected_error))]
    UnexpectedError {
        receiver: Value,
        input: Value,
        want: Value,
        got: Report,
    },

    #[error("Wrong error!\nreceiver\n  {receiver}\nwith input\n  {input}\nexpected error to contain text\n  {expected}\nbut got error\n  {}\n", error_detail(.got))]
    #[diagnostic(
        code(casebook::wrong_error),
        help("matching is a case-insensitive substring test against the error and its causes")
    )]
    WrongError {
        receiver: Value,
        input: Value,
        expected: String,
        got: Report,
    },

    #[error("Expected error not thrown!\nreceiver\n  {receiver}\nwith input\n  {input}\nexpected error to contain text\n  {expected}\nbut got nil error, and value\n  {got}\n")]
    #[diagnostic(code(casebook::missing_error))]
    MissingError {
        receiver: Value,
        input: Value,
        expected: String,
        got: Value,
    },
}

impl Failure {
    pub fn kind(&self) -> FailureKind {
        match self {
            Failure::Equality { .. } => FailureKind::Equality,
            Failure::UnexpectedError { .. } => FailureKind::UnexpectedError,
            Failure::WrongError { .. } => FailureKind::WrongError,
            Failure::MissingError { .. } => FailureKind::MissingError,
        }
    }

    pub fn receiver(&self) -> &Value {
        match self {
            Failure::Equality { receiver, .. }
            | Failure::UnexpectedError { receiver, .. }
            | Failure::WrongError { receiver, .. }
            | Failure::MissingError { receiver, .. } => receiver,
        }
    }

    pub fn input(&self) -> &Value {
        match self {
            Failure::Equality { input, .. }
            | Failure::UnexpectedError { input, .. }
            | Failure::WrongError { input, .. }
            | Failure::MissingError { input, .. } => input,
        }
    }

    /// The actual error, for the two error-carrying variants.
    pub fn error(&self) -> Option<&Report> {
        match self {
            Failure::UnexpectedError { got, .. } | Failure::WrongError { got, .. } => Some(got),
            Failure::Equality { .. } | Failure::MissingError { .. } => None,
        }
    }
}

/// Renders an error with everything it carries: the message, each cause in its chain,
/// and the diagnostic code and help text when present.
///
/// Continuation lines are indented to sit under the template's value column.
pub fn error_detail(err: &Report) -> String {
    let mut out = String::new();
    if let Some(code) = err.code() {
        let _ = write!(out, "[{}] ", code);
    }
    let _ = write!(out, "{}", err);
    for cause in err.chain().skip(1) {
        let _ = write!(out, "\n  caused by: {}", cause);
    }
    if let Some(help) = err.help() {
        let _ = write!(out, "\n  help: {}", help);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use miette::{miette, WrapErr};

    #[test]
    fn equality_template_layout() {
        let failure = Failure::Equality {
            receiver: Value::Nil,
            input: "A".into(),
            want: "B".into(),
            got: "A".into(),
        };
        assert_eq!(
            failure.to_string(),
            "Test failed!\nreceiver\n  <nil>\nwith input\n  A\nexpected value\n  B\nbut got value\n  A\n"
        );
        assert_eq!(failure.kind(), FailureKind::Equality);
        assert!(failure.error().is_none());
    }

    #[test]
    fn missing_error_template_layout() {
        let failure = Failure::MissingError {
            receiver: Value::Nil,
            input: "A".into(),
            expected: "B".into(),
            got: "A".into(),
        };
        assert_eq!(
            failure.to_string(),
            "Expected error not thrown!\nreceiver\n  <nil>\nwith input\n  A\nexpected error to contain text\n  B\nbut got nil error, and value\n  A\n"
        );
    }

    #[test]
    fn error_templates_use_full_detail() {
        let got = Err::<(), _>(miette!("root cause"))
            .wrap_err("outer")
            .unwrap_err();
        let failure = Failure::WrongError {
            receiver: Value::from("rx"),
            input: "A".into(),
            expected: "zzz".into(),
            got,
        };
        let text = failure.to_string();
        assert!(text.starts_with("Wrong error!\nreceiver\n  rx\n"));
        assert!(text.contains("expected error to contain text\n  zzz\n"));
        assert!(text.contains("but got error\n  outer\n  caused by: root cause\n"));
        assert_eq!(failure.kind().as_str(), "wrong-error");
    }

    #[test]
    fn detail_of_a_plain_message_is_the_message() {
        assert_eq!(error_detail(&miette!("unexpected")), "unexpected");
    }

    #[test]
    fn detail_includes_code_and_help() {
        let err = miette!(code = "app::io", help = "retry later", "disk full");
        assert_eq!(
            error_detail(&err),
            "[app::io] disk full\n  help: retry later"
        );
    }
}
