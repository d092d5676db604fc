//! Batch execution of named cases.

use tracing::{debug, debug_span};

use crate::case::{Case, Cases};
use crate::execute::execute;
use crate::report::Reporter;
use crate::value::Value;

/// Runs every case in `cases`, in the map's iteration order, and returns whether all passed.
///
/// Every case is executed even after a failure. Use [`run_ordered`] when the order matters.
pub fn run<R, F>(reporter: &mut R, cases: &Cases, mut produce: F) -> bool
where
    R: Reporter + ?Sized,
    F: FnMut(&Case) -> miette::Result<Value>,
{
    let mut success = true;
    for (name, case) in cases {
        success &= run_single(reporter, name, case, &mut produce);
    }
    success
}

/// Runs `(name, case)` entries in the given order and returns whether all passed.
pub fn run_ordered<'a, R, F, I>(reporter: &mut R, entries: I, mut produce: F) -> bool
where
    R: Reporter + ?Sized,
    F: FnMut(&Case) -> miette::Result<Value>,
    I: IntoIterator<Item = (&'a str, &'a Case)>,
{
    let mut success = true;
    for (name, case) in entries {
        success &= run_single(reporter, name, case, &mut produce);
    }
    success
}

/// Runs one case as the named sub-unit `name` and returns whether it passed.
pub fn run_single<R, F>(reporter: &mut R, name: &str, case: &Case, mut produce: F) -> bool
where
    R: Reporter + ?Sized,
    F: FnMut(&Case) -> miette::Result<Value>,
{
    let span = debug_span!("case", case = name);
    let _guard = span.enter();
    debug!("running case");

    let passed = reporter.subtest(name, &mut || {
        execute(case, &mut produce).inspect_err(|failure| {
            debug!(kind = %failure.kind(), "case failed");
        })
    });
    if passed {
        debug!("case passed");
    }
    passed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::case::cases;
    use crate::report::Collector;
    use miette::miette;

    #[test]
    fn run_executes_every_case_after_a_failure() {
        let all = cases([
            ("a", Case::new(1).want(1)),
            ("b", Case::new(2).want(3)),
            ("c", Case::new(3).want(3)),
            ("d", Case::new(4).error("x")),
        ]);
        let mut calls = 0;
        let mut collector = Collector::new();
        let passed = run(&mut collector, &all, |c| {
            calls += 1;
            Ok(c.input.clone())
        });
        assert!(!passed);
        assert_eq!(calls, 4);
        assert_eq!(collector.reports().len(), 4);
        assert_eq!(collector.failures().count(), 2);
    }

    #[test]
    fn run_ordered_keeps_order() {
        let first = Case::new("x").want("x");
        let second = Case::new("y").error("nope");
        let mut collector = Collector::new();
        let passed = run_ordered(
            &mut collector,
            [("first", &first), ("second", &second)],
            |c| match &c.input {
                Value::Str(s) if s == "y" => Err(miette!("NOPE, not today")),
                other => Ok(other.clone()),
            },
        );
        assert!(passed);
        let names: Vec<_> = collector.reports().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["first", "second"]);
    }

    #[test]
    fn panics_stay_inside_their_case() {
        let boom = Case::new(0).want(0);
        let fine = Case::new(1).want(1);
        let mut collector = Collector::new();
        let passed = run_ordered(&mut collector, [("boom", &boom), ("fine", &fine)], |c| {
            if c.input == Value::Int(0) {
                panic!("division by zero");
            }
            Ok(c.input.clone())
        });
        assert!(!passed);
        assert!(!collector.get("boom").unwrap().passed());
        assert!(collector.get("fine").unwrap().passed());
    }

    #[test]
    fn empty_collection_passes() {
        let mut collector = Collector::new();
        assert!(run(&mut collector, &Cases::new(), |c| Ok(c.input.clone())));
        assert!(collector.reports().is_empty());
    }
}
