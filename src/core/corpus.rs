// RouterLens - core/corpus.rs
//
// Drives the line parser over a whole log body and assembles the ordered
// record table for one analysis session.
//
// Guarantees: one record per non-blank line, `id` contiguous from 0, and
// record order equal to source line order. Blank lines consume no id.

use crate::core::model::LogRecord;
use crate::core::parser::parse_line;
use crate::util::logging::preview;
use rayon::prelude::*;

/// Build the record table sequentially.
pub fn build_corpus(text: &str) -> Vec<LogRecord> {
    let records: Vec<LogRecord> = retained_lines(text)
        .enumerate()
        .map(|(idx, line)| stamp(idx, line))
        .collect();

    tracing::debug!(records = records.len(), "Corpus built");
    records
}

/// Build the record table with lines parsed in parallel.
///
/// Output is identical to [`build_corpus`]: ids are assigned from each
/// line's position before parsing, and rayon's indexed collect preserves
/// source order.
pub fn build_corpus_parallel(text: &str) -> Vec<LogRecord> {
    let lines: Vec<&str> = retained_lines(text).collect();

    let records: Vec<LogRecord> = lines
        .par_iter()
        .enumerate()
        .map(|(idx, line)| stamp(idx, line))
        .collect();

    tracing::debug!(records = records.len(), "Corpus built (parallel)");
    records
}

/// Trimmed, non-blank lines in source order.
///
/// A lone `\r`, vertical tab, form feed, the ASCII file/group/record
/// separators, NEL and the Unicode line/paragraph separators all end a line,
/// as do `\n` and `\r\n`. The empty piece between `\r` and `\n` is dropped
/// with the other blanks.
fn retained_lines(text: &str) -> impl Iterator<Item = &str> {
    text.split(is_line_break)
        .map(str::trim)
        .filter(|line| !line.is_empty())
}

fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\x0b' | '\x0c' | '\x1c'..='\x1e' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}

fn stamp(idx: usize, line: &str) -> LogRecord {
    let mut record = parse_line(line);
    record.id = idx as u64;
    tracing::trace!(id = record.id, line = preview(line), "Parsed line");
    record
}
