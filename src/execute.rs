//! Runs one case through a production function with panic recovery.

use std::any::Any;
use std::error::Error;
use std::panic::{self, AssertUnwindSafe};

use miette::Report;
use tracing::warn;

use crate::case::Case;
use crate::classify::{classify, Outcome};
use crate::diagnostics::Failure;
use crate::value::Value;

/// Message used when a panic payload is neither a string nor a [`Report`].
pub const OPAQUE_PANIC_MESSAGE: &str = "panicked with a non-string payload";

/// Invokes `produce` once for `case` and classifies what it did.
///
/// A panic inside `produce` is caught and treated as a returned error. A payload that
/// already is a [`Report`] or a boxed `std::error::Error` (raised with
/// `std::panic::panic_any`) is kept as an error; string payloads become the error message.
///
/// The process panic hook is not touched, so the default hook still prints its
/// `thread '...' panicked at ...` line to stderr for every recovered panic. Install a
/// quiet hook with [`std::panic::set_hook`] to silence it.
pub fn execute<F>(case: &Case, produce: F) -> Result<(), Failure>
where
    F: FnOnce(&Case) -> miette::Result<Value>,
{
    let outcome: Outcome = match panic::catch_unwind(AssertUnwindSafe(|| produce(case))) {
        Ok(result) => result,
        Err(payload) => {
            let err = panic_to_error(payload);
            warn!(error = %err, "production function panicked");
            Err(err)
        }
    };
    classify(case, outcome)
}

/// Converts a caught panic payload into an error.
pub fn panic_to_error(payload: Box<dyn Any + Send>) -> Report {
    let payload = match payload.downcast::<Report>() {
        Ok(report) => return *report,
        Err(payload) => payload,
    };
    let payload = match payload.downcast::<Box<dyn Error + Send + Sync>>() {
        Ok(err) => return Report::new_boxed((*err).into()),
        Err(payload) => payload,
    };
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        return Report::msg(*message);
    }
    match payload.downcast::<String>() {
        Ok(message) => Report::msg(*message),
        Err(_) => Report::msg(OPAQUE_PANIC_MESSAGE),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::FailureKind;
    use miette::miette;
    use std::cell::Cell;

    #[test]
    fn returned_value_is_classified() {
        let case = Case::new("A").want("A");
        assert!(execute(&case, |c| Ok(c.input.clone())).is_ok());
    }

    #[test]
    fn panic_with_str_becomes_unexpected_error() {
        let case = Case::new("A").want("B");
        let failure = execute(&case, |_| panic!("boom")).unwrap_err();
        assert_eq!(failure.kind(), FailureKind::UnexpectedError);
        assert_eq!(failure.error().map(|e| e.to_string()).as_deref(), Some("boom"));
    }

    #[test]
    fn panic_with_formatted_message_can_match_expected_error() {
        let case = Case::new(7).error("index 7");
        let result = execute(&case, |c| panic!("bad index {}", c.input));
        assert!(result.is_ok());
    }

    #[test]
    fn panic_with_report_is_preserved() {
        let case = Case::new("A").want("B");
        let failure = execute(&case, |_| {
            std::panic::panic_any(miette!(code = "app::broken", "panicked"))
        })
        .unwrap_err();
        let err = failure.error().expect("error-carrying failure");
        assert_eq!(err.to_string(), "panicked");
        assert_eq!(err.code().map(|c| c.to_string()).as_deref(), Some("app::broken"));
    }

    #[test]
    fn panic_with_boxed_error_keeps_its_message() {
        let case = Case::new("A").error("disk full");
        let result = execute(&case, |_| {
            let err: Box<dyn Error + Send + Sync> = "disk full".into();
            std::panic::panic_any(err)
        });
        assert!(result.is_ok());

        let err: Box<dyn Error + Send + Sync> = std::io::Error::other("no route").into();
        assert_eq!(panic_to_error(Box::new(err)).to_string(), "no route");
    }

    #[test]
    fn opaque_panic_payload_gets_fixed_message() {
        let err = panic_to_error(Box::new(42_u32));
        assert_eq!(err.to_string(), OPAQUE_PANIC_MESSAGE);
    }

    #[test]
    fn produce_runs_once() {
        let calls = Cell::new(0);
        let case = Case::new("A").want("A");
        let _ = execute(&case, |c| {
            calls.set(calls.get() + 1);
            Ok(c.input.clone())
        });
        assert_eq!(calls.get(), 1);
    }
}
