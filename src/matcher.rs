//! Textual matching of actual errors against an expected substring.

use miette::Report;

/// Renders an error's message together with its cause chain, `outer: inner: root`.
pub fn error_message(err: &Report) -> String {
    err.chain()
        .map(|cause| cause.to_string())
        .collect::<Vec<_>>()
        .join(": ")
}

/// Case-insensitive substring test of `expected` against the rendered error message.
///
/// Callers route "no error expected" elsewhere; `expected` is assumed non-empty.
pub fn error_matches(expected: &str, err: &Report) -> bool {
    error_message(err)
        .to_lowercase()
        .contains(&expected.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use miette::{miette, IntoDiagnostic, WrapErr};

    #[test]
    fn matching_ignores_case() {
        let err = miette!("a foo b");
        assert!(error_matches("Foo", &err));
        assert!(error_matches("A FOO", &err));
        assert!(!error_matches("zzz", &err));
    }

    #[test]
    fn matching_sees_the_cause_chain() {
        let err = "x"
            .parse::<i32>()
            .into_diagnostic()
            .wrap_err("reading config")
            .unwrap_err();
        assert!(error_message(&err).starts_with("reading config: "));
        assert!(error_matches("invalid digit", &err));
    }
}
