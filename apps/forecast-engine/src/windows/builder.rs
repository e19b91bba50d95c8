//! Builder pattern for backtest configuration.

use super::types::{BacktestSpec, SamplePolicy, WindowMethod};

/// Builder for [`BacktestSpec`].
#[derive(Debug, Default)]
pub struct BacktestSpecBuilder {
    spec: BacktestSpec,
}

impl BacktestSpecBuilder {
    /// Create a new builder (backtesting disabled).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable backtesting.
    #[must_use]
    pub const fn enabled(mut self, enabled: bool) -> Self {
        self.spec.enabled = enabled;
        self
    }

    /// Set the number of backtest iterations. Enables backtesting.
    #[must_use]
    pub const fn iterations(mut self, iterations: usize) -> Self {
        self.spec.iterations = iterations;
        self.spec.enabled = true;
        self
    }

    /// Set the window method.
    #[must_use]
    pub const fn window_method(mut self, method: WindowMethod) -> Self {
        self.spec.window_method = method;
        self
    }

    /// Set the sample policy.
    #[must_use]
    pub const fn sample_policy(mut self, policy: SamplePolicy) -> Self {
        self.spec.sample_policy = policy;
        self
    }

    /// Build the spec, normalized so a disabled spec always has one iteration.
    #[must_use]
    pub const fn build(self) -> BacktestSpec {
        self.spec.normalized()
    }
}
