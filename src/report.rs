//! Reporting of per-case results.
//!
//! The batch runner opens one named sub-unit per case on a [`Reporter`]. Two reporters
//! are provided: [`Collector`] keeps every result in memory (handy inside `#[test]`
//! functions), [`ConsoleReporter`] prints colored PASS/FAIL lines as cases complete.

use std::io;

use difference::{Changeset, Difference};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::diagnostics::Failure;

/// Host-side hook for running a case as an independently reported sub-unit.
pub trait Reporter {
    /// Runs `body` as the sub-unit `name` and returns whether it passed.
    fn subtest(&mut self, name: &str, body: &mut dyn FnMut() -> Result<(), Failure>) -> bool;
}

impl<R: Reporter + ?Sized> Reporter for &mut R {
    fn subtest(&mut self, name: &str, body: &mut dyn FnMut() -> Result<(), Failure>) -> bool {
        (**self).subtest(name, body)
    }
}

// =============================================================================
// IN-MEMORY COLLECTION
// =============================================================================

/// The recorded result of one sub-unit.
#[derive(Debug)]
pub struct CaseReport {
    pub name: String,
    pub failure: Option<Failure>,
}

impl CaseReport {
    pub fn passed(&self) -> bool {
        self.failure.is_none()
    }
}

/// Records every sub-unit result in execution order.
#[derive(Debug, Default)]
pub struct Collector {
    reports: Vec<CaseReport>,
}

impl Collector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reports(&self) -> &[CaseReport] {
        &self.reports
    }

    /// True when every recorded case passed.
    pub fn passed(&self) -> bool {
        self.reports.iter().all(CaseReport::passed)
    }

    pub fn failures(&self) -> impl Iterator<Item = (&str, &Failure)> {
        self.reports
            .iter()
            .filter_map(|r| r.failure.as_ref().map(|f| (r.name.as_str(), f)))
    }

    pub fn get(&self, name: &str) -> Option<&CaseReport> {
        self.reports.iter().find(|r| r.name == name)
    }

    /// Panics with every failure diagnostic if any case failed.
    #[track_caller]
    pub fn assert_all_passed(&self) {
        let failed: Vec<String> = self
            .failures()
            .map(|(name, failure)| format!("--- {}\n{}", name, failure))
            .collect();
        if !failed.is_empty() {
            panic!(
                "{} of {} cases failed\n{}",
                failed.len(),
                self.reports.len(),
                failed.join("\n")
            );
        }
    }
}

impl Reporter for Collector {
    fn subtest(&mut self, name: &str, body: &mut dyn FnMut() -> Result<(), Failure>) -> bool {
        let failure = body().err();
        let passed = failure.is_none();
        self.reports.push(CaseReport {
            name: name.to_string(),
            failure,
        });
        passed
    }
}

// =============================================================================
// CONSOLE OUTPUT
// =============================================================================

/// Configuration for console reporting.
#[derive(Debug, Clone)]
pub struct ReportConfig {
    pub use_colors: bool,
    /// Print a line diff of want/got under equality failures.
    pub show_diff: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            use_colors: atty::is(atty::Stream::Stderr),
            show_diff: true,
        }
    }
}

impl ReportConfig {
    pub fn color_choice(&self) -> ColorChoice {
        if self.use_colors {
            ColorChoice::Auto
        } else {
            ColorChoice::Never
        }
    }
}

/// Prints each case result as it completes.
pub struct ConsoleReporter<W: WriteColor> {
    out: W,
    config: ReportConfig,
    passed: usize,
    failed: usize,
}

impl ConsoleReporter<StandardStream> {
    /// A reporter writing to stderr.
    pub fn stderr(config: ReportConfig) -> Self {
        let out = StandardStream::stderr(config.color_choice());
        Self::new(out, config)
    }
}

impl<W: WriteColor> ConsoleReporter<W> {
    pub fn new(out: W, config: ReportConfig) -> Self {
        Self {
            out,
            config,
            passed: 0,
            failed: 0,
        }
    }

    pub fn passed(&self) -> usize {
        self.passed
    }

    pub fn failed(&self) -> usize {
        self.failed
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Prints the `N passed, M failed` line.
    pub fn summary(&mut self) -> io::Result<()> {
        let color = if self.failed > 0 { Color::Red } else { Color::Green };
        self.out
            .set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true))?;
        write!(self.out, "{} passed, {} failed", self.passed, self.failed)?;
        self.out.reset()?;
        writeln!(self.out)
    }

    fn print_status(&mut self, name: &str, failure: Option<&Failure>) -> io::Result<()> {
        let (label, color) = match failure {
            None => ("PASS", Color::Green),
            Some(_) => ("FAIL", Color::Red),
        };
        self.out
            .set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true))?;
        write!(self.out, "{}", label)?;
        self.out.reset()?;
        writeln!(self.out, " {}", name)?;

        let Some(failure) = failure else {
            return Ok(());
        };
        write!(self.out, "{}", failure)?;
        if let Failure::Equality { want, got, .. } = failure {
            if self.config.show_diff {
                let changeset = Changeset::new(&want.to_string(), &got.to_string(), "\n");
                print_diff(&mut self.out, &changeset.diffs)?;
            }
        }
        Ok(())
    }
}

impl<W: WriteColor> Reporter for ConsoleReporter<W> {
    fn subtest(&mut self, name: &str, body: &mut dyn FnMut() -> Result<(), Failure>) -> bool {
        let result = body();
        match &result {
            Ok(()) => self.passed += 1,
            Err(_) => self.failed += 1,
        }
        // Write errors are ignored; the case result stands.
        let _ = self.print_status(name, result.as_ref().err());
        result.is_ok()
    }
}

// =============================================================================
// PRIVATE HELPERS
// =============================================================================

fn print_diff<W: WriteColor>(out: &mut W, diffs: &[Difference]) -> io::Result<()> {
    writeln!(out, "diff (- want, + got)")?;
    for diff in diffs {
        match diff {
            Difference::Same(x) => {
                out.reset()?;
                for line in x.lines() {
                    writeln!(out, " {}", line)?;
                }
            }
            Difference::Add(x) => {
                out.set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
                for line in x.lines() {
                    writeln!(out, "+{}", line)?;
                }
            }
            Difference::Rem(x) => {
                out.set_color(ColorSpec::new().set_fg(Some(Color::Red)))?;
                for line in x.lines() {
                    writeln!(out, "-{}", line)?;
                }
            }
        }
    }
    out.reset()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;
    use termcolor::Buffer;

    fn equality(want: &str, got: &str) -> Failure {
        Failure::Equality {
            receiver: Value::Nil,
            input: Value::Nil,
            want: want.into(),
            got: got.into(),
        }
    }

    #[test]
    fn collector_records_in_order() {
        let mut collector = Collector::new();
        assert!(collector.subtest("first", &mut || Ok(())));
        assert!(!collector.subtest("second", &mut || Err(equality("a", "b"))));
        let names: Vec<_> = collector.reports().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["first", "second"]);
        assert!(!collector.passed());
        assert_eq!(collector.failures().count(), 1);
        assert!(collector.get("first").unwrap().passed());
    }

    #[test]
    #[should_panic(expected = "1 of 1 cases failed")]
    fn assert_all_passed_panics_with_diagnostics() {
        let mut collector = Collector::new();
        collector.subtest("bad", &mut || Err(equality("a", "b")));
        collector.assert_all_passed();
    }

    #[test]
    fn console_prints_status_diagnostic_and_diff() {
        let config = ReportConfig {
            use_colors: false,
            show_diff: true,
        };
        let mut console = ConsoleReporter::new(Buffer::no_color(), config);
        console.subtest("ok", &mut || Ok(()));
        console.subtest("mismatch", &mut || Err(equality("B", "A")));
        console.summary().unwrap();
        assert_eq!((console.passed(), console.failed()), (1, 1));

        let buffer = console.into_inner();
        let text = String::from_utf8_lossy(buffer.as_slice());
        assert!(text.starts_with("PASS ok\nFAIL mismatch\nTest failed!\n"));
        assert!(text.contains("diff (- want, + got)\n-B\n+A\n"));
        assert!(text.ends_with("1 passed, 1 failed\n"));
    }

    #[test]
    fn console_can_skip_the_diff() {
        let config = ReportConfig {
            use_colors: false,
            show_diff: false,
        };
        let mut console = ConsoleReporter::new(Buffer::no_color(), config);
        console.subtest("mismatch", &mut || Err(equality("B", "A")));
        let text = String::from_utf8_lossy(console.into_inner().as_slice()).into_owned();
        assert!(!text.contains("diff"));
    }
}
