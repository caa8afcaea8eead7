//! Interpreter configuration

/// Scale of the quotient produced by Decimal division
///
/// Quotients are always rounded half-up (ties away from zero).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DivisionScale {
    /// Keep the dividend's number of fractional digits
    #[default]
    Dividend,
    /// Round to exactly this many fractional digits
    Fixed(u32),
}

/// Where `print` sends its lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    #[default]
    Stdout,
    /// Collect lines for the caller instead of writing them
    Capture,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    pub division_scale: DivisionScale,
    pub output: OutputMode,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_division_scale(mut self, scale: DivisionScale) -> Self {
        self.division_scale = scale;
        self
    }

    pub fn with_output(mut self, output: OutputMode) -> Self {
        self.output = output;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::new();
        assert_eq!(config.division_scale, DivisionScale::Dividend);
        assert_eq!(config.output, OutputMode::Stdout);
    }

    #[test]
    fn test_builders() {
        let config = Config::new()
            .with_division_scale(DivisionScale::Fixed(4))
            .with_output(OutputMode::Capture);
        assert_eq!(config.division_scale, DivisionScale::Fixed(4));
        assert_eq!(config.output, OutputMode::Capture);
    }
}
