use crate::compare::{compare_alphabetic, Direction};
use crate::error::{OneginError, OneginResult, SortContext};
use memmap2::Mmap;
use std::cmp::Ordering;
use std::fs::File;
use std::path::Path;

/// Zero-copy line view borrowing from the buffer that holds the whole text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line<'a> {
    bytes: &'a [u8],
}

impl<'a> Line<'a> {
    /// Create a new Line from a slice (without its terminator)
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes }
    }

    /// Get the line data as a byte slice
    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Letter-only comparison against `other`
    #[inline]
    pub fn compare(&self, other: &Line<'_>, direction: Direction) -> Ordering {
        compare_alphabetic(self.bytes, other.bytes, direction)
    }

    /// The line with leading whitespace removed, vertical tab included
    pub fn trim_start(&self) -> Line<'a> {
        let start = self
            .bytes
            .iter()
            .position(|&b| !(b.is_ascii_whitespace() || b == 0x0B))
            .unwrap_or(self.bytes.len());
        Line::new(&self.bytes[start..])
    }
}

impl<'a> From<&'a str> for Line<'a> {
    fn from(s: &'a str) -> Self {
        Line::new(s.as_bytes())
    }
}

/// Split a buffer into lines pointing into it.
///
/// Terminators are stripped and empty lines are kept; a trailing newline
/// does not produce an extra empty line.
pub fn split_lines(data: &[u8]) -> Vec<Line<'_>> {
    let mut lines = Vec::new();
    let mut start = 0;

    for (i, &byte) in data.iter().enumerate() {
        if byte == b'\n' {
            lines.push(Line::new(&data[start..i]));
            start = i + 1;
        }
    }

    if start < data.len() {
        lines.push(Line::new(&data[start..]));
    }

    lines
}

/// Memory-mapped input text.
///
/// The mapping is the arena every `Line` borrows from, so it has to outlive
/// the lines and any index built over them.
pub struct MappedFile {
    mmap: Option<Mmap>,
}

impl MappedFile {
    /// Map `path` read-only. Zero-length files are not mapped.
    pub fn open(path: &Path) -> OneginResult<Self> {
        let name = path.display().to_string();
        let metadata = std::fs::metadata(path).with_file_context(&name)?;
        if metadata.is_dir() {
            return Err(OneginError::is_directory(&name));
        }
        if metadata.len() == 0 {
            return Ok(Self { mmap: None });
        }

        let file = File::open(path).with_file_context(&name)?;
        // SAFETY: the mapping is read-only and the input is not expected to be
        // modified by another process while it is being sorted.
        let mmap = unsafe { Mmap::map(&file) }.with_file_context(&name)?;
        Ok(Self { mmap: Some(mmap) })
    }

    /// Raw contents of the file
    pub fn bytes(&self) -> &[u8] {
        self.mmap.as_deref().unwrap_or(&[])
    }

    /// Lines of the file, borrowing from the mapping
    pub fn lines(&self) -> Vec<Line<'_>> {
        split_lines(self.bytes())
    }
}
