//! Reconciles an actual outcome with a case's expectations.

use miette::Report;

use crate::case::Case;
use crate::compare::values_equal;
use crate::diagnostics::Failure;
use crate::matcher::error_matches;
use crate::value::Value;

/// What the production function did: produced a value or failed.
///
/// A recovered panic is represented as `Err` like any returned error.
pub type Outcome = Result<Value, Report>;

/// Classifies `outcome` against `case`.
///
/// | error occurred | error expected | result                          |
/// |----------------|----------------|---------------------------------|
/// | no             | no             | compare `want` and the value    |
/// | no             | yes            | [`Failure::MissingError`]       |
/// | yes            | no             | [`Failure::UnexpectedError`]    |
/// | yes            | yes            | match substring, else [`Failure::WrongError`] |
pub fn classify(case: &Case, outcome: Outcome) -> Result<(), Failure> {
    match outcome {
        Ok(got) => check_value(case, got),
        Err(err) => check_error(case, err),
    }
}

fn check_value(case: &Case, got: Value) -> Result<(), Failure> {
    if case.expects_error() {
        return Err(Failure::MissingError {
            receiver: case.receiver.clone(),
            input: case.input.clone(),
            expected: case.error.clone(),
            got,
        });
    }
    if values_equal(&case.want, &got) {
        return Ok(());
    }
    Err(Failure::Equality {
        receiver: case.receiver.clone(),
        input: case.input.clone(),
        want: case.want.clone(),
        got,
    })
}

fn check_error(case: &Case, err: Report) -> Result<(), Failure> {
    if !case.expects_error() {
        return Err(Failure::UnexpectedError {
            receiver: case.receiver.clone(),
            input: case.input.clone(),
            want: case.want.clone(),
            got: err,
        });
    }
    if error_matches(&case.error, &err) {
        return Ok(());
    }
    Err(Failure::WrongError {
        receiver: case.receiver.clone(),
        input: case.input.clone(),
        expected: case.error.clone(),
        got: err,
    })
}
