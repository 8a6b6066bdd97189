//! Regression test parameters and operations

use ndarray::{ArrayD, Dimension};
use std::fmt::Debug;

/// Regression test mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RegTestMode {
    /// Compare results against expectations (default)
    #[default]
    Compare,
    /// Also print every compared array for visual inspection
    Display,
}

impl RegTestMode {
    /// Parse mode from the `REGTEST_MODE` environment variable
    pub fn from_env() -> Self {
        match std::env::var("REGTEST_MODE")
            .unwrap_or_default()
            .to_lowercase()
            .as_str()
        {
            "display" => Self::Display,
            _ => Self::Compare,
        }
    }
}

/// Regression test parameters
///
/// This structure tracks the state of a regression test, including
/// the test name, current index, mode, and success status. Failed
/// comparisons are recorded rather than panicking, so one run reports
/// every mismatch; call [`RegParams::cleanup`] at the end and assert on it.
pub struct RegParams {
    /// Name of the test (e.g., "halo")
    pub test_name: String,
    /// Current test index (incremented before each comparison)
    index: usize,
    /// Test mode
    pub mode: RegTestMode,
    /// Overall success status
    success: bool,
    /// Recorded failures
    failures: Vec<String>,
}

impl RegParams {
    /// Create new regression test parameters
    ///
    /// The mode is taken from the `REGTEST_MODE` environment variable.
    pub fn new(test_name: &str) -> Self {
        let mode = RegTestMode::from_env();

        eprintln!();
        eprintln!("////////////////////////////////////////////////");
        eprintln!("////////////////   {}_reg   ///////////////", test_name);
        eprintln!("////////////////////////////////////////////////");
        eprintln!("Mode: {:?}", mode);

        Self {
            test_name: test_name.to_string(),
            index: 0,
            mode,
            success: true,
            failures: Vec::new(),
        }
    }

    /// Get the current test index
    pub fn index(&self) -> usize {
        self.index
    }

    /// Check if in display mode
    pub fn display(&self) -> bool {
        self.mode == RegTestMode::Display
    }

    fn record(&mut self, msg: String) {
        eprintln!("{}", msg);
        self.failures.push(msg);
        self.success = false;
    }

    /// Compare two floating-point values
    ///
    /// # Arguments
    ///
    /// * `expected` - Expected value
    /// * `actual` - Actual computed value
    /// * `delta` - Maximum allowed difference
    ///
    /// # Returns
    ///
    /// `true` if values match within delta, `false` otherwise.
    pub fn compare_values(&mut self, expected: f64, actual: f64, delta: f64) -> bool {
        self.index += 1;
        let diff = (expected - actual).abs();

        if diff > delta {
            let msg = format!(
                "Failure in {}_reg: value comparison for index {}\n\
                 difference = {} but allowed delta = {}\n\
                 expected = {}, actual = {}",
                self.test_name, self.index, diff, delta, expected, actual
            );
            self.record(msg);
            false
        } else {
            true
        }
    }

    /// Compare two arrays for exact equality, cell by cell
    ///
    /// Reports the shape mismatch or the first differing cell.
    ///
    /// # Returns
    ///
    /// `true` if the arrays are identical, `false` otherwise.
    pub fn compare_labels<T: PartialEq + Debug>(
        &mut self,
        expected: &ArrayD<T>,
        actual: &ArrayD<T>,
    ) -> bool {
        self.index += 1;

        if self.display() {
            eprintln!("[{}] expected:\n{:?}", self.index, expected);
            eprintln!("[{}] actual:\n{:?}", self.index, actual);
        }

        if expected.shape() != actual.shape() {
            let msg = format!(
                "Failure in {}_reg: array comparison for index {} - shape {:?} vs {:?}",
                self.test_name,
                self.index,
                expected.shape(),
                actual.shape()
            );
            self.record(msg);
            return false;
        }

        let mismatch = expected
            .indexed_iter()
            .zip(actual.iter())
            .find(|((_, e), a)| e != a);
        if let Some(((idx, e), a)) = mismatch {
            let msg = format!(
                "Failure in {}_reg: array comparison for index {} - cell {:?}: expected {:?}, got {:?}",
                self.test_name,
                self.index,
                idx.slice(),
                e,
                a
            );
            self.record(msg);
            return false;
        }

        true
    }

    /// Clean up and report results
    ///
    /// # Returns
    ///
    /// `true` if all comparisons passed, `false` if any failed.
    pub fn cleanup(self) -> bool {
        if self.success {
            eprintln!("SUCCESS: {}_reg", self.test_name);
        } else {
            eprintln!("FAILURE: {}_reg", self.test_name);
            for failure in &self.failures {
                eprintln!("  {}", failure);
            }
        }
        eprintln!();

        self.success
    }

    /// Check if all comparisons have passed so far
    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Get list of failures
    pub fn failures(&self) -> &[String] {
        &self.failures
    }
}
