// SPDX-License-Identifier: MIT OR Apache-2.0

//! Line-oriented parser for the INI-like configuration format.
//!
//! ```text
//! # comment line, kept verbatim
//!
//! [SectionName]
//! key = value
//! ```
//!
//! The parser never gives up on malformed content. Each bad line is reported
//! to the diagnostic sink and skipped:
//!
//! - a line at or beyond the maximum length is discarded up to its newline,
//! - a `[` header without a closing `]` discards the key/value lines that follow
//!   it until the next valid header,
//! - a key/value line without `=` is discarded.

use crate::domain::{ConfigError, ConfigStore, Result, COMMENT_PREFIX, DEFAULT_SECTION};
use crate::ports::{ConfigParser, Diagnostic, DiagnosticKind, DiagnosticSink, Severity};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::io::{self, BufRead, Read};

/// Default maximum line length, in bytes, including the terminator.
pub const DEFAULT_MAX_LINE_LEN: usize = 1024;

/// Parser settings.
///
/// # Examples
///
/// ```
/// use atomcfg::adapters::ParserOptions;
///
/// let options = ParserOptions::default();
/// assert_eq!(options.max_line_len, 1024);
/// assert_eq!(options.default_section, "Info");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserOptions {
    /// Line buffer size in bytes. A line whose content (without `'\n'`) is
    /// `max_line_len - 1` bytes or longer is dropped.
    pub max_line_len: usize,
    /// Section receiving entries that appear before any header.
    pub default_section: String,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            max_line_len: DEFAULT_MAX_LINE_LEN,
            default_section: DEFAULT_SECTION.to_string(),
        }
    }
}

/// Parser for the INI-like configuration format.
///
/// # Examples
///
/// ```rust
/// use atomcfg::adapters::{IniParser, NullSink};
/// use atomcfg::domain::ConfigStore;
/// use atomcfg::ports::ConfigParser;
/// use std::io::Cursor;
///
/// let mut store = ConfigStore::new();
/// let mut input = Cursor::new("FileSource = Empty\n[Adapter]\nName = phone\n");
/// IniParser::new().parse_into(&mut input, &mut store, &NullSink).unwrap();
///
/// assert_eq!(store.get_string("Info", "FileSource", ""), "Empty");
/// assert_eq!(store.get_string("Adapter", "Name", ""), "phone");
/// ```
#[derive(Debug, Clone, Default)]
pub struct IniParser {
    options: ParserOptions,
}

impl IniParser {
    /// Creates a parser with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a parser with the given options.
    pub fn with_options(options: ParserOptions) -> Self {
        Self { options }
    }

    /// Returns the parser options.
    pub fn options(&self) -> &ParserOptions {
        &self.options
    }

    /// Parses a string into a new store.
    ///
    /// Applies the same line limit as [`parse_into`](ConfigParser::parse_into).
    pub fn parse_str(&self, text: &str, sink: &dyn DiagnosticSink) -> ConfigStore {
        let mut store = ConfigStore::new();
        let mut state = ParseState::new(&self.options.default_section);
        let limit = self.content_limit() as usize;

        for (index, line) in text.split_inclusive('\n').enumerate() {
            let line_num = index + 1;
            if line.len() > limit || (line.len() == limit && !line.ends_with('\n')) {
                report_oversized(line_num, limit, sink);
            } else {
                state.feed(trim(line), line_num, &mut store, sink);
            }
        }
        store
    }

    fn content_limit(&self) -> u64 {
        self.options.max_line_len.saturating_sub(1).max(1) as u64
    }
}

impl ConfigParser for IniParser {
    fn parse_into(
        &self,
        reader: &mut dyn BufRead,
        store: &mut ConfigStore,
        sink: &dyn DiagnosticSink,
    ) -> Result<()> {
        let mut state = ParseState::new(&self.options.default_section);
        let limit = self.content_limit();
        let mut buf = Vec::with_capacity(limit as usize);
        let mut line_num = 0;

        loop {
            buf.clear();
            line_num += 1;
            let read = (&mut *reader)
                .take(limit)
                .read_until(b'\n', &mut buf)
                .map_err(|source| ConfigError::ReadError {
                    line: line_num,
                    source,
                })?;
            if read == 0 {
                break;
            }

            if buf.last() != Some(&b'\n') && read as u64 == limit {
                discard_rest_of_line(reader).map_err(|source| ConfigError::ReadError {
                    line: line_num,
                    source,
                })?;
                report_oversized(line_num, limit as usize, sink);
                continue;
            }

            let text = String::from_utf8_lossy(&buf);
            if let Cow::Owned(_) = text {
                sink.report(Diagnostic::at_line(
                    Severity::Warning,
                    DiagnosticKind::InvalidUtf8,
                    line_num,
                    "line is not valid UTF-8; invalid bytes were replaced",
                ));
            }
            state.feed(trim(&text), line_num, store, sink);
        }

        Ok(())
    }
}

/// Mutable state carried from one line to the next.
struct ParseState {
    section: String,
    skip_entries: bool,
}

impl ParseState {
    fn new(default_section: &str) -> Self {
        Self {
            section: default_section.to_string(),
            skip_entries: false,
        }
    }

    fn feed(
        &mut self,
        line: &str,
        line_num: usize,
        store: &mut ConfigStore,
        sink: &dyn DiagnosticSink,
    ) {
        if line.is_empty() {
            return;
        }

        if line.starts_with(COMMENT_PREFIX) {
            store.push_comment(line);
        } else if let Some(header) = line.strip_prefix('[') {
            match header.strip_suffix(']') {
                Some(name) => {
                    self.section = name.to_string();
                    self.skip_entries = false;
                }
                None => {
                    sink.report(Diagnostic::at_line(
                        Severity::Debug,
                        DiagnosticKind::UnterminatedSection,
                        line_num,
                        "unterminated section name",
                    ));
                    self.skip_entries = true;
                }
            }
        } else if self.skip_entries {
            sink.report(Diagnostic::at_line(
                Severity::Debug,
                DiagnosticKind::SkippedEntry,
                line_num,
                "skipping entry after invalid section header",
            ));
        } else {
            match line.split_once('=') {
                Some((key, value)) => {
                    store.set_string_with(&self.section, trim(key), trim(value), sink)
                }
                None => sink.report(Diagnostic::at_line(
                    Severity::Debug,
                    DiagnosticKind::MissingSeparator,
                    line_num,
                    "no key/value separator found",
                )),
            }
        }
    }
}

fn report_oversized(line_num: usize, limit: usize, sink: &dyn DiagnosticSink) {
    sink.report(Diagnostic::at_line(
        Severity::Debug,
        DiagnosticKind::OversizedLine,
        line_num,
        format!("line exceeds {} bytes and was skipped", limit),
    ));
}

/// Consumes input up to and including the next newline, or to end of input.
fn discard_rest_of_line(reader: &mut dyn BufRead) -> io::Result<()> {
    loop {
        let (found, used) = {
            let available = match reader.fill_buf() {
                Ok(available) => available,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            if available.is_empty() {
                return Ok(());
            }
            match available.iter().position(|&b| b == b'\n') {
                Some(pos) => (true, pos + 1),
                None => (false, available.len()),
            }
        };
        reader.consume(used);
        if found {
            return Ok(());
        }
    }
}

/// Trims the characters C's `isspace` accepts from both ends.
fn trim(s: &str) -> &str {
    s.trim_matches(|c: char| matches!(c, ' ' | '\t' | '\n' | '\r' | '\x0b' | '\x0c'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::CollectingSink;
    use crate::domain::Item;

    fn parse(text: &str) -> (ConfigStore, CollectingSink) {
        let sink = CollectingSink::new();
        let store = IniParser::new().parse_str(text, &sink);
        (store, sink)
    }

    #[test]
    fn test_entries_before_header_go_to_default_section() {
        let (store, _) = parse("key1=val1\n[Sec]\nkey2=val2\n");
        assert_eq!(store.get_string(DEFAULT_SECTION, "key1", ""), "val1");
        assert_eq!(store.get_string("Sec", "key2", ""), "val2");
        assert!(!store.has_key(DEFAULT_SECTION, "key2"));
    }

    #[test]
    fn test_unterminated_header_skips_entries() {
        let (store, sink) = parse("[Bad\nkey1 = val1\n");
        assert!(!store.has_section("Bad"));
        assert!(!store.has_key(DEFAULT_SECTION, "key1"));
        assert!(store.is_empty());
        assert_eq!(sink.count_of(DiagnosticKind::UnterminatedSection), 1);
        assert_eq!(sink.count_of(DiagnosticKind::SkippedEntry), 1);
    }

    #[test]
    fn test_valid_header_ends_skipping() {
        let (store, _) = parse("[Bad\na = 1\n[Good]\nb = 2\n");
        assert!(!store.has_key(DEFAULT_SECTION, "a"));
        assert_eq!(store.get_string("Good", "b", ""), "2");
    }

    #[test]
    fn test_comment_becomes_item() {
        let (store, _) = parse("# a note\n[Sec]\nk=v\n");
        assert!(store.has_section("# a note"));
        assert_eq!(store.items()[0], Item::Comment("# a note".to_string()));
        assert_eq!(store.get_string("Sec", "k", ""), "v");
    }

    #[test]
    fn test_duplicate_comment_stored_once() {
        let (store, _) = parse("# same\n[A]\nk=v\n# same\n");
        let comments = store.sections().filter(|i| i.is_comment()).count();
        assert_eq!(comments, 1);
    }

    #[test]
    fn test_comment_is_trimmed() {
        let (store, _) = parse("   #  indented note  \n");
        assert!(store.has_section("#  indented note"));
    }

    #[test]
    fn test_missing_separator_is_skipped() {
        let (store, sink) = parse("[Sec]\njustakey\nk = v\n");
        assert!(!store.has_key("Sec", "justakey"));
        assert_eq!(store.get_string("Sec", "k", ""), "v");
        assert_eq!(sink.count_of(DiagnosticKind::MissingSeparator), 1);
    }

    #[test]
    fn test_split_at_first_equals_and_trim() {
        let (store, _) = parse("[Sec]\n  url =  a=b=c  \nempty=\n");
        assert_eq!(store.get_string("Sec", "url", ""), "a=b=c");
        assert!(store.has_key("Sec", "empty"));
        assert_eq!(store.get_string("Sec", "empty", "x"), "");
    }

    #[test]
    fn test_blank_lines_and_crlf() {
        let (store, _) = parse("\r\n[Sec]\r\n\t\r\nk = v\r\n");
        assert_eq!(store.get_string("Sec", "k", ""), "v");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_header_inner_text_is_not_trimmed() {
        let (store, _) = parse("[ Spaced ]\nk=v\n");
        assert!(store.has_section(" Spaced "));
    }

    #[test]
    fn test_repeated_header_merges_into_first_section() {
        let (store, _) = parse("[A]\nx=1\n[B]\ny=2\n[A]\nz=3\nx=4\n");
        let names: Vec<&str> = store.sections().map(Item::name).collect();
        assert_eq!(names, ["A", "B"]);
        assert_eq!(store.get_string("A", "x", ""), "4");
        assert_eq!(store.get_string("A", "z", ""), "3");
    }

    #[test]
    fn test_oversized_line_without_newline_is_dropped() {
        let line = "k".repeat(1023) + "=v";
        let text = format!("[Sec]\n{}", line);
        let (store, sink) = parse(&text);
        // A header alone never creates a section.
        assert!(store.section("Sec").is_none());
        assert!(store.is_empty());
        assert_eq!(sink.count_of(DiagnosticKind::OversizedLine), 1);
    }

    #[test]
    fn test_exactly_1024_bytes_dropped_and_parsing_continues() {
        let long = "a".repeat(1020) + "=xyz";
        assert_eq!(long.len(), 1024);
        let text = format!("[Sec]\n{}\nafter = 1\n", long);
        let (store, sink) = parse(&text);
        assert_eq!(store.get_string("Sec", "after", ""), "1");
        assert_eq!(store.section("Sec").map(|s| s.len()), Some(1));
        assert_eq!(sink.count_of(DiagnosticKind::OversizedLine), 1);
    }

    #[test]
    fn test_line_just_under_limit_is_kept() {
        let long = "b".repeat(1018) + "=xyz";
        assert_eq!(long.len(), 1022);
        let text = format!("[Sec]\n{}\n", long);
        let (store, sink) = parse(&text);
        assert_eq!(store.get_string("Sec", &"b".repeat(1018), ""), "xyz");
        assert!(sink.is_empty());
    }

    #[test]
    fn test_very_long_line_is_fully_consumed() {
        let text = format!("[Sec]\n{}\nk = v\n", "z".repeat(10_000));
        let (store, sink) = parse(&text);
        assert_eq!(store.get_string("Sec", "k", ""), "v");
        assert_eq!(store.section("Sec").map(|s| s.len()), Some(1));
        assert_eq!(sink.count_of(DiagnosticKind::OversizedLine), 1);
    }

    #[test]
    fn test_custom_limit_and_default_section() {
        let parser = IniParser::with_options(ParserOptions {
            max_line_len: 8,
            default_section: "General".to_string(),
        });
        let store = parser.parse_str("a = 1\nlonger = 2\n", &crate::adapters::NullSink);
        assert_eq!(store.get_string("General", "a", ""), "1");
        assert!(!store.has_key("General", "longer"));
    }

    #[test]
    fn test_entry_in_comment_named_section_is_rejected() {
        let (store, sink) = parse("[#odd]\nk = v\n");
        assert!(store.is_empty());
        assert_eq!(sink.count_of(DiagnosticKind::InvalidSectionName), 1);
    }

    #[test]
    fn test_oversized_line_after_entry_keeps_entry() {
        let text = format!("[Sec]\nk = v\n{}", "k".repeat(1023) + "=v");
        let (store, sink) = parse(&text);
        assert_eq!(store.section("Sec").map(|s| s.len()), Some(1));
        assert_eq!(sink.count_of(DiagnosticKind::OversizedLine), 1);
    }

    #[test]
    fn test_invalid_utf8_is_replaced_and_reported() {
        let sink = CollectingSink::new();
        let mut store = ConfigStore::new();
        let mut input: &[u8] = b"[Sec]\nname = caf\xe9\nok = 1\n";
        IniParser::new()
            .parse_into(&mut input, &mut store, &sink)
            .unwrap();

        assert_eq!(store.get_string("Sec", "name", ""), "caf\u{fffd}");
        assert_eq!(store.get_int("Sec", "ok", 0), 1);
        let reported: Vec<Option<usize>> = sink
            .diagnostics()
            .iter()
            .filter(|d| d.kind == DiagnosticKind::InvalidUtf8)
            .map(|d| d.line)
            .collect();
        assert_eq!(reported, [Some(2)]);
    }

    #[test]
    fn test_parse_str_matches_reader_parse() {
        let text = format!(
            "# top\nlead = 1\n[A]\n{}\nk = v\n[Bad\nx = 1\n[B]\nnosep\n{}=y\n{}",
            "a".repeat(1022),
            "b".repeat(1021),
            "c".repeat(1023),
        );
        let parser = IniParser::new();

        let from_str_sink = CollectingSink::new();
        let from_str = parser.parse_str(&text, &from_str_sink);

        let from_reader_sink = CollectingSink::new();
        let mut from_reader = ConfigStore::new();
        let mut input = text.as_bytes();
        parser
            .parse_into(&mut input, &mut from_reader, &from_reader_sink)
            .unwrap();

        assert_eq!(from_str, from_reader);
        assert_eq!(from_str_sink.diagnostics(), from_reader_sink.diagnostics());
        assert_eq!(from_str_sink.count_of(DiagnosticKind::OversizedLine), 2);
    }

    #[test]
    fn test_trim_matches_c_isspace() {
        assert_eq!(trim("\x0b\x0c key \t"), "key");
        assert_eq!(trim("   "), "");
    }
}
