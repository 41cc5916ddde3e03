use crate::compare::Direction;
use crate::config::{Algorithm, OutputFilter, SortConfig};
use crate::error::{OneginError, OneginResult, SortContext};
use crate::line::{Line, MappedFile};
use crate::tree_sort::OrderedIndex;
use itertools::Itertools;
use std::cmp::Ordering;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::time::Instant;

/// What a run ended up doing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOutcome {
    /// Sorted lines were written; `lines` counts the sorted records that
    /// passed the filter
    Written { lines: usize },
    /// The input had no lines and no output file was created
    EmptyInput,
    /// Check mode found the input already in order
    AlreadySorted,
}

/// Sort driver: reads the input, sorts it with the configured algorithm and
/// writes the result
pub struct OneginSort {
    config: SortConfig,
}

impl OneginSort {
    pub fn new(config: SortConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SortConfig {
        &self.config
    }

    pub fn run(&self) -> OneginResult<SortOutcome> {
        let started = Instant::now();
        let input_name = self.config.input_file.display().to_string();

        // The mapping owns the text; every Line below borrows from it.
        let mapped = MappedFile::open(&self.config.input_file)?;
        let lines = mapped.lines();

        if lines.is_empty() {
            log::warn!("input file was empty, so output file wasn't created");
            return Ok(SortOutcome::EmptyInput);
        }

        log::info!(
            "read {} lines from {input_name} (direction: {})",
            lines.len(),
            self.config.direction
        );

        if self.config.check {
            self.check_sorted(&lines)?;
            log::info!("{input_name} is already sorted");
            return Ok(SortOutcome::AlreadySorted);
        }

        let sorted = match self.config.algorithm {
            Algorithm::Tree => self.sort_with_tree(&lines)?,
            Algorithm::Quick => self.sort_with_comparison(lines.clone()),
        };

        let written = self.write_output(&sorted, mapped.bytes())?;

        log::info!(
            "wrote {written} of {} lines to {} using {} sort",
            sorted.len(),
            self.config.output_file.display(),
            self.config.algorithm
        );
        log::debug!("sort finished in {:.3?}", started.elapsed());

        Ok(SortOutcome::Written { lines: written })
    }

    /// Build a tree over the lines and read it back in order
    fn sort_with_tree<'a>(&self, lines: &[Line<'a>]) -> OneginResult<Vec<Line<'a>>> {
        let index = OrderedIndex::build(lines.iter().copied(), self.config.direction)?;
        log::debug!("tree holds {} nodes, depth {}", index.len(), index.depth());

        let sorted: Vec<Line<'a>> = index.iter().collect();
        let released = index.teardown();
        log::debug!("released {released} tree nodes");

        Ok(sorted)
    }

    /// Comparison sort with the same comparator, parallel for large inputs
    fn sort_with_comparison<'a>(&self, mut lines: Vec<Line<'a>>) -> Vec<Line<'a>> {
        use rayon::prelude::*;

        let direction = self.config.direction;
        if lines.len() >= self.config.parallel_threshold && num_cpus::get() > 1 {
            log::debug!("sorting {} lines in parallel", lines.len());
            lines.par_sort_unstable_by(|a, b| a.compare(b, direction));
        } else {
            lines.sort_unstable_by(|a, b| a.compare(b, direction));
        }
        lines
    }

    /// Fail with the 1-based number of the first line that is out of order
    fn check_sorted(&self, lines: &[Line<'_>]) -> OneginResult<()> {
        match first_disorder(lines, self.config.direction) {
            Some(line) => Err(OneginError::not_sorted(line)),
            None => Ok(()),
        }
    }

    fn write_output(&self, sorted: &[Line<'_>], original: &[u8]) -> OneginResult<usize> {
        let output_name = self.config.output_file.display().to_string();
        let file = File::create(&self.config.output_file).with_file_context(&output_name)?;
        let mut output = BufWriter::new(file);

        let written =
            write_lines(&mut output, sorted, self.config.filter).with_file_context(&output_name)?;
        if self.config.append_original {
            write_original(&mut output, original).with_file_context(&output_name)?;
        }

        output.flush().with_file_context(&output_name)?;
        Ok(written)
    }
}

/// 1-based number of the first line that sorts before its predecessor
pub fn first_disorder(lines: &[Line<'_>], direction: Direction) -> Option<usize> {
    lines
        .iter()
        .tuple_windows()
        .position(|(prev, curr)| prev.compare(curr, direction) == Ordering::Greater)
        .map(|i| i + 2)
}

/// The form of `line` that reaches the output under `filter`, if any
pub fn filter_line<'a>(line: Line<'a>, filter: OutputFilter) -> Option<Line<'a>> {
    match filter {
        OutputFilter::All => Some(line),
        OutputFilter::NonEmpty => (!line.is_empty()).then_some(line),
        OutputFilter::Verse => {
            let trimmed = line.trim_start();
            match trimmed.as_bytes() {
                [first, second, ..] if first.is_ascii_uppercase() && second.is_ascii_lowercase() => {
                    Some(trimmed)
                }
                _ => None,
            }
        }
    }
}

/// Write one newline-terminated record per line that passes `filter`
pub fn write_lines<W: Write>(
    output: &mut W,
    lines: &[Line<'_>],
    filter: OutputFilter,
) -> OneginResult<usize> {
    let mut written = 0;
    for line in lines.iter().filter_map(|&line| filter_line(line, filter)) {
        output.write_all(line.as_bytes())?;
        output.write_all(b"\n")?;
        written += 1;
    }
    Ok(written)
}

/// Write a blank separator line followed by the untouched original text
pub fn write_original<W: Write>(output: &mut W, original: &[u8]) -> OneginResult<()> {
    output.write_all(b"\n")?;
    output.write_all(original)?;
    if !original.ends_with(b"\n") {
        output.write_all(b"\n")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SortConfigBuilder;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    const STANZA: &str = "My uncle, man of firm convictions . . .\n\
                          By falling gravely ill, he's won\n\
                          \n\
                          A due respect for his afflictions -\n\
                          The only clever thing he's done.\n";

    fn run_sort(dir: &Path, input: &str, builder: SortConfigBuilder) -> OneginResult<(SortOutcome, String)> {
        let input_file = dir.join("input.txt");
        let output_file = dir.join("output.txt");
        fs::write(&input_file, input)?;

        let config = builder
            .input_file(&input_file)
            .output_file(&output_file)
            .build()?;
        let outcome = OneginSort::new(config).run()?;
        let output = fs::read_to_string(&output_file).unwrap_or_default();
        Ok((outcome, output))
    }

    #[test]
    fn test_tree_sort_basic() -> OneginResult<()> {
        let temp_dir = TempDir::new()?;
        let (outcome, output) = run_sort(temp_dir.path(), STANZA, SortConfigBuilder::new())?;

        assert_eq!(outcome, SortOutcome::Written { lines: 4 });
        assert_eq!(
            output,
            "A due respect for his afflictions -\n\
             By falling gravely ill, he's won\n\
             My uncle, man of firm convictions . . .\n\
             The only clever thing he's done.\n"
        );
        Ok(())
    }

    #[test]
    fn test_quick_sort_matches_tree_on_distinct_keys() -> OneginResult<()> {
        let temp_dir = TempDir::new()?;
        let (_, tree) = run_sort(temp_dir.path(), STANZA, SortConfigBuilder::new().reversed())?;
        let (_, quick) = run_sort(
            temp_dir.path(),
            STANZA,
            SortConfigBuilder::new().reversed().algorithm(Algorithm::Quick),
        )?;

        assert_eq!(tree, quick);
        assert_eq!(
            tree,
            "The only clever thing he's done.\n\
             By falling gravely ill, he's won\n\
             A due respect for his afflictions -\n\
             My uncle, man of firm convictions . . .\n"
        );
        Ok(())
    }

    #[test]
    fn test_parallel_comparison_sort() -> OneginResult<()> {
        let temp_dir = TempDir::new()?;
        let input: String = (0..200).rev().map(|i| format!("line {}\n", "x".repeat(i + 1))).collect();
        let (_, output) = run_sort(
            temp_dir.path(),
            &input,
            SortConfigBuilder::new()
                .algorithm(Algorithm::Quick)
                .parallel_threshold(16),
        )?;

        let expected: String = (0..200).map(|i| format!("line {}\n", "x".repeat(i + 1))).collect();
        assert_eq!(output, expected);
        Ok(())
    }

    #[test]
    fn test_append_original() -> OneginResult<()> {
        let temp_dir = TempDir::new()?;
        let (_, output) = run_sort(
            temp_dir.path(),
            "b\na",
            SortConfigBuilder::new().append_original(),
        )?;
        assert_eq!(output, "a\nb\n\nb\na\n");
        Ok(())
    }

    #[test]
    fn test_empty_input_creates_no_output() -> OneginResult<()> {
        let temp_dir = TempDir::new()?;
        let (outcome, _) = run_sort(temp_dir.path(), "", SortConfigBuilder::new())?;

        assert_eq!(outcome, SortOutcome::EmptyInput);
        assert!(!temp_dir.path().join("output.txt").exists());
        Ok(())
    }

    #[test]
    fn test_check_mode() -> OneginResult<()> {
        let temp_dir = TempDir::new()?;
        let (outcome, _) = run_sort(temp_dir.path(), "apple\n'Banana'\ncherry\n", SortConfigBuilder::new().check())?;
        assert_eq!(outcome, SortOutcome::AlreadySorted);
        assert!(!temp_dir.path().join("output.txt").exists());

        let result = run_sort(temp_dir.path(), "apple\ncherry\nbanana\n", SortConfigBuilder::new().check());
        assert!(matches!(result, Err(OneginError::NotSorted { line: 3 })));
        Ok(())
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_write_error_names_output_file() -> OneginResult<()> {
        let temp_dir = TempDir::new()?;
        let input_file = temp_dir.path().join("input.txt");
        // Larger than the writer's buffer so the lines themselves hit the device
        let input: String = (0..4_000).map(|i| format!("verse number {i}\n")).collect();
        fs::write(&input_file, input)?;

        let config = SortConfig::new()
            .with_input_file(&input_file)
            .with_output_file("/dev/full");
        match OneginSort::new(config).run() {
            Err(OneginError::Io(err)) => assert!(err.to_string().contains("/dev/full"), "{err}"),
            other => panic!("unexpected result: {other:?}"),
        }
        Ok(())
    }

    #[test]
    fn test_missing_input_file() {
        let config = SortConfig::new()
            .with_input_file("/no/such/poem.txt")
            .with_output_file("/no/such/output.txt");
        let result = OneginSort::new(config).run();
        assert!(matches!(result, Err(OneginError::FileNotFound { .. })));
    }

    #[test]
    fn test_filters() {
        let lines = [
            Line::from(""),
            Line::from("   Tatiana"),
            Line::from("TATIANA"),
            Line::from("x"),
            Line::from("\x0BOlga"),
        ];

        let mut all = Vec::new();
        assert_eq!(write_lines(&mut all, &lines, OutputFilter::All).unwrap(), 5);
        assert_eq!(all, b"\n   Tatiana\nTATIANA\nx\n\x0BOlga\n");

        let mut non_empty = Vec::new();
        assert_eq!(write_lines(&mut non_empty, &lines, OutputFilter::NonEmpty).unwrap(), 4);

        let mut verse = Vec::new();
        assert_eq!(write_lines(&mut verse, &lines, OutputFilter::Verse).unwrap(), 2);
        assert_eq!(verse, b"Tatiana\nOlga\n");
    }

    #[test]
    fn test_first_disorder() {
        let sorted = [Line::from("a"), Line::from("B"), Line::from("b!")];
        assert_eq!(first_disorder(&sorted, Direction::Forward), None);

        let unsorted = [Line::from("ab"), Line::from("ba"), Line::from("ca")];
        assert_eq!(first_disorder(&unsorted, Direction::Forward), None);
        assert_eq!(first_disorder(&unsorted, Direction::Backward), Some(2));
    }
}
