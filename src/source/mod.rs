//! Position interning and offset/line/column translation.
//!
//! A [`FileSet`] assigns every file a contiguous base-offset region in one
//! monotonically increasing position space, the way a bytecode position
//! table does: `Pos = base + byte offset`. Line tables are computed once
//! when a file is registered; all lookups after that are pure and fail
//! softly with `None` on invalid or foreign positions.

use crate::types::{Location, NO_POS, Pos};

/// One registered file: name, base offset, size, and line-start table.
#[derive(Debug, Clone)]
pub struct SourceFile {
    name: String,
    base: u32,
    size: u32,
    /// Byte offset of the first character of each line. `line_starts[0]`
    /// is always 0; a trailing newline does not open a new entry.
    line_starts: Vec<u32>,
}

impl SourceFile {
    fn new(name: String, base: u32, content: &[u8]) -> Self {
        let mut line_starts = vec![0u32];
        for (i, &b) in content.iter().enumerate() {
            if b == b'\n' && i + 1 < content.len() {
                line_starts.push((i + 1) as u32);
            }
        }
        Self {
            name,
            base,
            size: content.len() as u32,
            line_starts,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn base(&self) -> u32 {
        self.base
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    /// Number of lines in the file. An empty file still has one line.
    pub fn line_count(&self) -> u32 {
        self.line_starts.len() as u32
    }

    /// Interned position of the byte at `offset`, or `NO_POS` when the
    /// offset lies past the end of the file.
    pub fn pos(&self, offset: u32) -> Pos {
        if offset > self.size {
            return NO_POS;
        }
        Pos(self.base + offset)
    }

    /// Byte offset of `pos` within this file, or `None` for positions
    /// belonging to another file.
    pub fn offset(&self, pos: Pos) -> Option<u32> {
        if !pos.is_valid() || pos.0 < self.base || pos.0 > self.base + self.size {
            return None;
        }
        Some(pos.0 - self.base)
    }

    /// Position of the first byte of 1-based `line`.
    pub fn line_start(&self, line: u32) -> Option<Pos> {
        if line == 0 || line > self.line_count() {
            return None;
        }
        Some(Pos(self.base + self.line_starts[(line - 1) as usize]))
    }

    /// Half-open byte-offset range `[start, end)` covering exactly
    /// 1-based `line`. The last line ends at end-of-file.
    pub fn line_range(&self, line: u32) -> Option<(u32, u32)> {
        if line == 0 || line > self.line_count() {
            return None;
        }
        let start = self.line_starts[(line - 1) as usize];
        let end = self
            .line_starts
            .get(line as usize)
            .copied()
            .unwrap_or(self.size);
        Some((start, end))
    }

    /// 1-based (line, column) of a byte offset.
    fn line_col(&self, offset: u32) -> (u32, u32) {
        let line = match self.line_starts.binary_search(&offset) {
            Ok(i) => i,
            Err(i) => i - 1,
        };
        let col = offset - self.line_starts[line] + 1;
        (line as u32 + 1, col)
    }

    /// Resolve an interned position to a full location.
    pub fn location(&self, pos: Pos) -> Option<Location> {
        let offset = self.offset(pos)?;
        let (line, column) = self.line_col(offset);
        Some(Location::new(self.name.clone(), line, column, offset))
    }
}

/// Shared position-interning table for all files of one project snapshot.
///
/// Files occupy disjoint, strictly increasing base ranges, so any valid
/// `Pos` maps back to exactly one file by binary search.
#[derive(Debug, Clone, Default)]
pub struct FileSet {
    files: Vec<SourceFile>,
}

impl FileSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a file and return its index. Bases start at 1 so that
    /// `Pos(0)` stays the invalid sentinel; each file reserves one extra
    /// slot past its end for end-of-file positions.
    pub fn add_file(&mut self, name: impl Into<String>, content: &[u8]) -> usize {
        let base = match self.files.last() {
            Some(f) => f.base + f.size + 1,
            None => 1,
        };
        self.files.push(SourceFile::new(name.into(), base, content));
        self.files.len() - 1
    }

    pub fn file(&self, index: usize) -> Option<&SourceFile> {
        self.files.get(index)
    }

    pub fn file_by_name(&self, name: &str) -> Option<(usize, &SourceFile)> {
        self.files
            .iter()
            .enumerate()
            .find(|(_, f)| f.name == name)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Find the file whose base range contains `pos`.
    pub fn file_containing(&self, pos: Pos) -> Option<(usize, &SourceFile)> {
        if !pos.is_valid() {
            return None;
        }
        let idx = match self.files.binary_search_by(|f| f.base.cmp(&pos.0)) {
            Ok(i) => i,
            Err(0) => return None,
            Err(i) => i - 1,
        };
        let file = &self.files[idx];
        if pos.0 > file.base + file.size {
            return None;
        }
        Some((idx, file))
    }

    /// Resolve an interned position to (file, line, column). Soft-fails
    /// for the sentinel and for positions outside every file.
    pub fn position(&self, pos: Pos) -> Option<Location> {
        let (_, file) = self.file_containing(pos)?;
        file.location(pos)
    }

    /// Line count of the file containing `pos`.
    pub fn line_count(&self, pos: Pos) -> Option<u32> {
        let (_, file) = self.file_containing(pos)?;
        Some(file.line_count())
    }

    /// Start position of 1-based `line` in the file containing `pos`.
    pub fn line_start(&self, pos: Pos, line: u32) -> Option<Pos> {
        let (_, file) = self.file_containing(pos)?;
        file.line_start(line)
    }
}
