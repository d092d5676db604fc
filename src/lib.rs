//! Casebook: table-driven test cases with opinionated outcome reconciliation.
//!
//! A [`Case`] names a receiver, an input, an expected value and optionally an expected
//! error substring. A production function turns a case into a value or an error; the
//! engine compares that outcome with the case and reports one of four failures.
//!
//! ```rust
//! use casebook::{cases, run, Case, Collector, Value};
//!
//! let table = cases([
//!     ("upper-cases", Case::new("a").want("A")),
//!     ("rejects empty", Case::new("").error("EMPTY")),
//! ]);
//! let mut collector = Collector::new();
//! let passed = run(&mut collector, &table, |case| match &case.input {
//!     Value::Str(s) if s.is_empty() => Err(miette::miette!("empty input")),
//!     Value::Str(s) => Ok(s.to_uppercase().into()),
//!     other => Err(miette::miette!("not a string: {}", other)),
//! });
//! assert!(passed);
//! collector.assert_all_passed();
//! ```

pub use crate::case::{cases, Case, Cases};
pub use crate::classify::{classify, Outcome};
pub use crate::compare::values_equal;
pub use crate::diagnostics::{error_detail, Failure, FailureKind};
pub use crate::execute::execute;
pub use crate::matcher::{error_matches, error_message};
pub use crate::report::{Collector, ConsoleReporter, ReportConfig, Reporter};
pub use crate::runner::{run, run_ordered, run_single};
pub use crate::value::Value;

pub mod case;
pub mod classify;
pub mod cli;
pub mod compare;
pub mod diagnostics;
pub mod discovery;
pub mod execute;
pub mod matcher;
pub mod report;
pub mod runner;
pub mod value;
