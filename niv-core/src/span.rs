//! Source files, spans and offset -> line/column resolution.

use std::fmt;

/// Identifier of a file registered in a [`SourceMap`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FileId(pub u32);

/// Byte range inside one source file. `end` is exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub file: FileId,
    pub start: u32,
    pub end: u32,
}

impl Span {
    pub fn new(file: FileId, start: u32, end: u32) -> Self {
        Span { file, start, end }
    }

    /// Empty span sitting at `offset`.
    pub fn empty(file: FileId, offset: u32) -> Self {
        Span::new(file, offset, offset)
    }

    /// Span from the start of `self` to the end of `other`.
    pub fn to(self, other: Span) -> Span {
        Span {
            file: self.file,
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

/// 1-based line and column. Columns count bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LineCol {
    pub line: u32,
    pub column: u32,
}

impl fmt::Display for LineCol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A source file with a table of line start offsets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    id: FileId,
    path: String,
    text: String,
    /// Byte offset of the first character of every line. Always starts with 0.
    line_starts: Vec<u32>,
}

impl SourceFile {
    pub fn new(id: FileId, path: impl Into<String>, text: impl Into<String>) -> Self {
        let text = text.into();
        let mut line_starts = vec![0];
        line_starts.extend(
            text.bytes()
                .enumerate()
                .filter(|(_, byte)| *byte == b'\n')
                .map(|(index, _)| index as u32 + 1),
        );
        SourceFile {
            id,
            path: path.into(),
            text,
            line_starts,
        }
    }

    pub fn id(&self) -> FileId {
        self.id
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Resolve a byte offset. Offsets past the end clamp to the last line.
    pub fn line_col(&self, offset: u32) -> LineCol {
        let line = self
            .line_starts
            .partition_point(|&start| start <= offset)
            .saturating_sub(1);
        let column = offset - self.line_starts[line] + 1;
        LineCol {
            line: line as u32 + 1,
            column,
        }
    }
}

/// All files loaded during one driver run.
#[derive(Debug, Default)]
pub struct SourceMap {
    files: Vec<SourceFile>,
}

impl SourceMap {
    pub fn new() -> Self {
        SourceMap::default()
    }

    /// Register a file and return it with its freshly assigned id.
    pub fn add(&mut self, path: impl Into<String>, text: impl Into<String>) -> &SourceFile {
        let id = FileId(self.files.len() as u32);
        self.files.push(SourceFile::new(id, path, text));
        &self.files[id.0 as usize]
    }

    pub fn get(&self, id: FileId) -> Option<&SourceFile> {
        self.files.get(id.0 as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_line_starts() {
        let file = SourceFile::new(FileId(0), "a.nl", "ab\ncd\n\nef");
        assert_eq!(file.line_starts, vec![0, 3, 6, 7]);
    }

    #[test]
    fn resolves_offsets_to_line_and_column() {
        let file = SourceFile::new(FileId(0), "a.nl", "ab\ncd\n\nef");
        assert_eq!(file.line_col(0), LineCol { line: 1, column: 1 });
        assert_eq!(file.line_col(2), LineCol { line: 1, column: 3 });
        assert_eq!(file.line_col(3), LineCol { line: 2, column: 1 });
        assert_eq!(file.line_col(6), LineCol { line: 3, column: 1 });
        assert_eq!(file.line_col(8), LineCol { line: 4, column: 2 });
    }

    #[test]
    fn clamps_offsets_past_the_end() {
        let file = SourceFile::new(FileId(0), "a.nl", "ab");
        assert_eq!(file.line_col(10), LineCol { line: 1, column: 11 });
    }

    #[test]
    fn merges_spans() {
        let a = Span::new(FileId(0), 2, 5);
        let b = Span::new(FileId(0), 7, 9);
        assert_eq!(a.to(b), Span::new(FileId(0), 2, 9));
        assert_eq!(b.to(a), Span::new(FileId(0), 2, 9));
    }

    #[test]
    fn source_map_hands_out_sequential_ids() {
        let mut map = SourceMap::new();
        let first = map.add("a.nl", "a").id();
        let second = map.add("b.nl", "b").id();
        assert_eq!(first, FileId(0));
        assert_eq!(second, FileId(1));
        assert_eq!(map.get(second).map(SourceFile::path), Some("b.nl"));
        assert!(map.get(FileId(7)).is_none());
    }
}
