//! Decimal dump loader.
//!
//! A decimal dump is a text file with one memory entry per line:
//!
//! ```text
//! # add two numbers
//! 01010       # LOAD 10, stored at address 0
//! 03011       # ADD 11, stored at address 1
//! 00000       # HALT
//! 10 4        # explicit address: cell 10 = 4
//! 5           # next address: cell 11 = 5
//! ```
//!
//! `#` starts a comment. A line holds either `<data>` or
//! `<address> <data>`, both in the signed word notation of
//! [`parse_word`]. A bare data line goes to the address after the
//! previous entry, starting at 0.
//!
//! Loading is all or nothing: lines are applied to a scratch copy of
//! memory, and the copy is only handed back once every line has been
//! accepted.

use crate::cpu::memory::Memory;
use crate::word::{parse_word, Word};
use std::io::{BufRead, BufReader, Write};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

/// Load dump lines on top of `base`.
///
/// Returns the new memory image; `base` itself is never modified.
pub fn load_lines<I, S>(base: &Memory, lines: I) -> Result<Memory, LoadError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut loader = Loader::new(base);
    for line in lines {
        loader.feed(line.as_ref())?;
    }
    Ok(loader.finish())
}

/// Load a dump from any buffered reader on top of `base`.
pub fn load_reader<R: BufRead>(base: &Memory, reader: R) -> Result<Memory, LoadError> {
    let mut loader = Loader::new(base);
    for line in reader.lines() {
        let line = line.map_err(|e| LoadError::Read {
            line: loader.line,
            reason: e.to_string(),
        })?;
        loader.feed(&line)?;
    }
    Ok(loader.finish())
}

/// Load a dump file on top of `base`.
pub fn load_file<P: AsRef<Path>>(base: &Memory, path: P) -> Result<Memory, LoadError> {
    let path = path.as_ref();
    let file = std::fs::File::open(path).map_err(|e| LoadError::SourceUnavailable {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    debug!(path = %path.display(), "loading dump");
    load_reader(base, BufReader::new(file))
}

/// Render memory as a dump that [`load_lines`] reads back unchanged.
pub fn format_dump(mem: &Memory) -> String {
    let mut output = String::new();
    output.push_str("# Johnniac decimal dump\n");

    for (addr, word) in mem.cells().iter().enumerate() {
        output.push_str(&format!("{:02} {}\n", addr, word));
    }

    output
}

/// Save memory to a dump file.
pub fn save_dump<P: AsRef<Path>>(path: P, mem: &Memory) -> std::io::Result<()> {
    let mut file = std::fs::File::create(path.as_ref())?;
    file.write_all(format_dump(mem).as_bytes())?;
    info!(path = %path.as_ref().display(), "saved dump");
    Ok(())
}

/// Line-by-line loader state.
struct Loader {
    /// Scratch copy the entries are written into.
    scratch: Memory,
    /// Where the next bare data word goes.
    next_addr: u32,
    /// Number of the next entry line. Blank and comment-only lines do
    /// not count.
    line: usize,
    /// Entries accepted so far.
    entries: usize,
}

impl Loader {
    fn new(base: &Memory) -> Self {
        Self {
            scratch: base.clone(),
            next_addr: 0,
            line: 1,
            entries: 0,
        }
    }

    /// Apply one line of the dump.
    fn feed(&mut self, text: &str) -> Result<(), LoadError> {
        let line = self.line;
        let text = match text.find('#') {
            Some(pos) => &text[..pos],
            None => text,
        };

        let tokens: Vec<&str> = text.split_whitespace().collect();
        let data = match tokens.as_slice() {
            [] => return Ok(()),
            [data] => *data,
            [addr, data] => {
                self.next_addr = parse_word(addr)
                    .map_err(|_| LoadError::MalformedAddress(line))?
                    .value();
                *data
            }
            _ => return Err(LoadError::MalformedLine(line)),
        };
        let data = parse_word(data).map_err(|_| LoadError::MalformedData(line))?;

        self.store(line, data)?;
        self.next_addr += 1;
        self.line += 1;
        Ok(())
    }

    fn store(&mut self, line: usize, data: Word) -> Result<(), LoadError> {
        let addr = self.next_addr as usize;
        self.scratch
            .write(addr, data)
            .map_err(|_| LoadError::AddressOutOfRange { line, address: self.next_addr })?;

        debug!(address = addr, data = %data, "loaded word");
        self.entries += 1;
        Ok(())
    }

    fn finish(self) -> Memory {
        info!(entries = self.entries, "dump loaded");
        self.scratch
    }
}

/// Errors that can occur while loading a dump.
///
/// Line numbers are 1-based and count entry lines only; blank and
/// comment-only lines are skipped without advancing the count.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    #[error("line {0}: malformed line")]
    MalformedLine(usize),

    #[error("line {0}: malformed address")]
    MalformedAddress(usize),

    #[error("line {0}: malformed data word")]
    MalformedData(usize),

    #[error("line {line}: address {address} out of range (0-25)")]
    AddressOutOfRange { line: usize, address: u32 },

    #[error("{path}: open failed ({reason})")]
    SourceUnavailable { path: String, reason: String },

    #[error("line {line}: read failed ({reason})")]
    Read { line: usize, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cpu::memory::MEMORY_SIZE;
    use std::io::Cursor;

    fn w(value: u32) -> Word {
        Word::new(value).unwrap()
    }

    fn load(text: &str) -> Result<Memory, LoadError> {
        load_lines(&Memory::new(), text.lines())
    }

    #[test]
    fn test_bare_words_fill_from_zero() {
        let mem = load("10\n5\n7\n").unwrap();
        assert_eq!(mem.read(0).unwrap(), w(10));
        assert_eq!(mem.read(1).unwrap(), w(5));
        assert_eq!(mem.read(2).unwrap(), w(7));
        assert_eq!(mem.read(3).unwrap(), w(0));
    }

    #[test]
    fn test_explicit_address_continues() {
        let mem = load("3 42\n99\n").unwrap();
        assert_eq!(mem.read(3).unwrap(), w(42));
        assert_eq!(mem.read(4).unwrap(), w(99));
        assert_eq!(mem.read(0).unwrap(), w(0));
    }

    #[test]
    fn test_comments_and_blank_lines() {
        let text = "# header\n\n   \n1001 # LOAD 1\n  # indented comment\n3002#ADD 2\n";
        let mem = load(text).unwrap();
        assert_eq!(mem.read(0).unwrap(), w(1001));
        assert_eq!(mem.read(1).unwrap(), w(3002));
    }

    #[test]
    fn test_signed_tokens() {
        let mem = load("-1 -00123\n").unwrap();
        // address "-1" is the ten's complement of 1 over one digit: 9
        assert_eq!(mem.read(9).unwrap(), w(99_877));
    }

    #[test]
    fn test_loads_on_top_of_base() {
        let mut base = Memory::new();
        base.write(20, w(555)).unwrap();

        let mem = load_lines(&base, ["1", "2"]).unwrap();

        assert_eq!(mem.read(0).unwrap(), w(1));
        assert_eq!(mem.read(20).unwrap(), w(555));
    }

    #[test]
    fn test_errors_report_line() {
        assert_eq!(load("1\n1 2 3\n"), Err(LoadError::MalformedLine(2)));
        assert_eq!(load("\nx 5\n"), Err(LoadError::MalformedAddress(1)));
        assert_eq!(load("5 y\n"), Err(LoadError::MalformedData(1)));
        assert_eq!(load("123456\n"), Err(LoadError::MalformedData(1)));
        assert_eq!(
            load("26 1\n"),
            Err(LoadError::AddressOutOfRange { line: 1, address: 26 })
        );
    }

    #[test]
    fn test_skipped_lines_do_not_count() {
        assert_eq!(load("# header\n\n1\nbogus\n"), Err(LoadError::MalformedData(2)));
        assert_eq!(
            load("  # only a comment\n7 1   # entry\n\n# more\n2 3 4\n"),
            Err(LoadError::MalformedLine(2))
        );
    }

    #[test]
    fn test_running_past_the_end() {
        let text = "25 1\n2\n";
        assert_eq!(
            load(text),
            Err(LoadError::AddressOutOfRange { line: 2, address: 26 })
        );
    }

    #[test]
    fn test_failed_load_leaves_base_untouched() {
        let mut base = Memory::new();
        base.write(0, w(11)).unwrap();
        base.write(5, w(22)).unwrap();
        let before = base.clone();

        let text = "1\n2\n3\n4\n5\n6\nbogus\n";
        let result = load_lines(&base, text.lines());

        assert_eq!(result, Err(LoadError::MalformedData(7)));
        assert_eq!(base, before);
    }

    #[test]
    fn test_load_reader() {
        let mem = load_reader(&Memory::new(), Cursor::new("4 7\n8\n")).unwrap();
        assert_eq!(mem.read(4).unwrap(), w(7));
        assert_eq!(mem.read(5).unwrap(), w(8));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.dd");

        let result = load_file(&Memory::new(), &path);

        assert!(matches!(result, Err(LoadError::SourceUnavailable { .. })));
    }

    #[test]
    fn test_save_then_load_file() {
        let mut mem = Memory::new();
        mem.write(0, w(1010)).unwrap();
        mem.write(25, w(99_999)).unwrap();

        let file = tempfile::NamedTempFile::new().unwrap();
        save_dump(file.path(), &mem).unwrap();

        let mut base = Memory::new();
        base.write(3, w(3)).unwrap();
        let loaded = load_file(&base, file.path()).unwrap();

        // A saved dump covers every cell
        assert_eq!(loaded, mem);
    }

    #[test]
    fn test_format_dump() {
        let mut mem = Memory::new();
        mem.write(1, w(42)).unwrap();

        let dump = format_dump(&mem);
        let lines: Vec<&str> = dump.lines().collect();

        assert_eq!(lines.len(), MEMORY_SIZE + 1);
        assert_eq!(lines[2], "01 00042");
    }
}
