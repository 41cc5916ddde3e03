//! Configuration management for onegin sort runs

use crate::error::{OneginError, OneginResult};
use std::path::PathBuf;
use std::str::FromStr;

pub use crate::compare::Direction;

/// Default output file, truncated on every run
pub const DEFAULT_OUTPUT_FILE: &str = "output.txt";

/// Inputs below this many lines are never sorted in parallel
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 8192;

/// Sorting algorithm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Algorithm {
    /// Binary search tree built in input order, read back in order
    #[default]
    Tree,
    /// In-place unstable comparison sort
    Quick,
}

/// Which sorted lines reach the output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFilter {
    /// Every line
    All,
    /// Every line except empty ones
    #[default]
    NonEmpty,
    /// Lines that, after leading whitespace, open with an uppercase letter
    /// followed by a lowercase one; written without the leading whitespace
    Verse,
}

/// Main configuration structure for a sort run
#[derive(Debug, Clone)]
pub struct SortConfig {
    /// File whose lines are sorted
    pub input_file: PathBuf,
    /// File the result is written to
    pub output_file: PathBuf,
    /// Scan direction of the comparator
    pub direction: Direction,
    pub algorithm: Algorithm,
    pub filter: OutputFilter,
    /// Write the original text after the sorted lines
    pub append_original: bool,
    /// Only verify that the input is already sorted
    pub check: bool,
    /// Line count from which the comparison sort runs in parallel
    pub parallel_threshold: usize,
}

impl Default for SortConfig {
    fn default() -> Self {
        Self {
            input_file: PathBuf::new(),
            output_file: PathBuf::from(DEFAULT_OUTPUT_FILE),
            direction: Direction::Forward,
            algorithm: Algorithm::Tree,
            filter: OutputFilter::NonEmpty,
            append_original: false,
            check: false,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }
}

impl SortConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_input_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.input_file = path.into();
        self
    }

    pub fn with_output_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_file = path.into();
        self
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn with_filter(mut self, filter: OutputFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_append_original(mut self, append_original: bool) -> Self {
        self.append_original = append_original;
        self
    }

    pub fn with_check(mut self, check: bool) -> Self {
        self.check = check;
        self
    }

    /// Validate configuration for consistency
    pub fn validate(&self) -> OneginResult<()> {
        if self.input_file.as_os_str().is_empty() {
            return Err(OneginError::invalid_argument("an input file is required"));
        }

        if !self.check && self.output_file.as_os_str().is_empty() {
            return Err(OneginError::invalid_argument("output file name is empty"));
        }

        if !self.check && self.input_file == self.output_file {
            return Err(OneginError::conflicting_options(
                "output file would overwrite the input file",
            ));
        }

        if self.check && self.append_original {
            return Err(OneginError::conflicting_options(
                "--check is incompatible with --append-original",
            ));
        }

        if self.parallel_threshold == 0 {
            return Err(OneginError::invalid_argument(
                "parallel threshold must be positive",
            ));
        }

        Ok(())
    }
}

impl FromStr for Algorithm {
    type Err = OneginError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "tree" | "bst" => Ok(Algorithm::Tree),
            "quick" | "qsort" => Ok(Algorithm::Quick),
            _ => Err(OneginError::invalid_argument(&format!(
                "unknown sort algorithm: {s}"
            ))),
        }
    }
}

impl std::fmt::Display for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Algorithm::Tree => "tree",
            Algorithm::Quick => "quick",
        };
        write!(f, "{name}")
    }
}

impl FromStr for OutputFilter {
    type Err = OneginError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(OutputFilter::All),
            "non-empty" | "nonempty" => Ok(OutputFilter::NonEmpty),
            "verse" => Ok(OutputFilter::Verse),
            _ => Err(OneginError::invalid_argument(&format!(
                "unknown output filter: {s}"
            ))),
        }
    }
}

impl std::fmt::Display for OutputFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            OutputFilter::All => "all",
            OutputFilter::NonEmpty => "non-empty",
            OutputFilter::Verse => "verse",
        };
        write!(f, "{name}")
    }
}

/// Builder pattern for creating configurations
pub struct SortConfigBuilder {
    config: SortConfig,
}

impl SortConfigBuilder {
    /// Start building a new configuration
    pub fn new() -> Self {
        Self {
            config: SortConfig::default(),
        }
    }

    pub fn input_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.input_file = path.into();
        self
    }

    pub fn output_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.output_file = path.into();
        self
    }

    /// Compare lines from their last letter backwards
    pub fn reversed(mut self) -> Self {
        self.config.direction = Direction::Backward;
        self
    }

    pub fn algorithm(mut self, algorithm: Algorithm) -> Self {
        self.config.algorithm = algorithm;
        self
    }

    pub fn filter(mut self, filter: OutputFilter) -> Self {
        self.config.filter = filter;
        self
    }

    pub fn append_original(mut self) -> Self {
        self.config.append_original = true;
        self
    }

    pub fn check(mut self) -> Self {
        self.config.check = true;
        self
    }

    pub fn parallel_threshold(mut self, lines: usize) -> Self {
        self.config.parallel_threshold = lines;
        self
    }

    /// Build the final configuration
    pub fn build(self) -> OneginResult<SortConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for SortConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SortConfig::default();
        assert_eq!(config.direction, Direction::Forward);
        assert_eq!(config.algorithm, Algorithm::Tree);
        assert_eq!(config.filter, OutputFilter::NonEmpty);
        assert_eq!(config.output_file, PathBuf::from("output.txt"));
        assert!(!config.append_original);
    }

    #[test]
    fn test_config_builder() {
        let config = SortConfigBuilder::new()
            .input_file("onegin.txt")
            .reversed()
            .algorithm(Algorithm::Quick)
            .filter(OutputFilter::Verse)
            .append_original()
            .build()
            .expect("Failed to build test config");

        assert_eq!(config.direction, Direction::Backward);
        assert_eq!(config.algorithm, Algorithm::Quick);
        assert_eq!(config.filter, OutputFilter::Verse);
        assert!(config.append_original);
    }

    #[test]
    fn test_config_setters() {
        let config = SortConfig::new()
            .with_input_file("onegin.txt")
            .with_direction(Direction::Backward)
            .with_algorithm(Algorithm::Quick)
            .with_filter(OutputFilter::All);

        assert_eq!(config.direction, Direction::Backward);
        assert_eq!(config.algorithm, Algorithm::Quick);
        assert_eq!(config.filter, OutputFilter::All);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_input_rejected() {
        assert!(SortConfigBuilder::new().build().is_err());
    }

    #[test]
    fn test_validate_conflicting_options() {
        let config = SortConfig::new()
            .with_input_file("onegin.txt")
            .with_check(true)
            .with_append_original(true);
        assert!(matches!(
            config.validate(),
            Err(OneginError::ConflictingOptions { .. })
        ));

        let config = SortConfig::new()
            .with_input_file("same.txt")
            .with_output_file("same.txt");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_enums() {
        assert_eq!("tree".parse::<Algorithm>().unwrap(), Algorithm::Tree);
        assert_eq!("QUICK".parse::<Algorithm>().unwrap(), Algorithm::Quick);
        assert!("bubble".parse::<Algorithm>().is_err());

        assert_eq!("verse".parse::<OutputFilter>().unwrap(), OutputFilter::Verse);
        assert_eq!("non-empty".parse::<OutputFilter>().unwrap(), OutputFilter::NonEmpty);
        assert!("some".parse::<OutputFilter>().is_err());

        assert_eq!(OutputFilter::NonEmpty.to_string(), "non-empty");
        assert_eq!(Algorithm::Quick.to_string(), "quick");
    }
}
