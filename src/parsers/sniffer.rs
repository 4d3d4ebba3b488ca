//! Sniffs the dialect of delimited text and guesses whether it starts with a header row
//!
//! Sniffing runs in two stages. First, quoted fields are located and the characters
//! surrounding them are tallied, which yields the quote character and usually the delimiter.
//! If no delimiter comes out of that, every ASCII character is scored by how consistently it
//! appears the same number of times on each line; the most consistent one is the delimiter.

use std::sync::LazyLock;

use log::{debug, warn};
use regex::{Captures, Regex};
use thiserror::Error;

use super::{Dialect, inference::is_numeric, is_blank};

/// Lines are scored in chunks of this many lines until a delimiter is found
const CHUNK_LINES: usize = 10;
/// Lowest share of lines on which a delimiter candidate must have its usual frequency
const MIN_CONSISTENCY: f64 = 0.9;
const CONSISTENCY_STEP: f64 = 0.01;
/// Tie break when several characters are equally consistent
const PREFERRED_DELIMITERS: &[u8] = b",\t; :";
const QUOTE_CHARS: [u8; 2] = [b'"', b'\''];
/// A character which may sit between a quoted field and its neighbour
const DELIMITER_CLASS: &str = r#"[^\w\n"']"#;
/// Maximum number of records after the first compared in header detection
const MAX_HEADER_CHECK_ROWS: usize = 21;

/// Errors when sniffing the dialect
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SniffError {
    #[error("Could not determine delimiter")]
    NoDelimiter,
}

/// Where a quoted field sits relative to its delimiters, tried in this order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum QuotedShape {
    /// `,"field",`
    Delimited,
    /// `"field",` at the start of a line
    LineStart,
    /// `,"field"` at the end of a line
    LineEnd,
    /// `"field"` spanning the whole line
    WholeLine,
}

impl QuotedShape {
    const ALL: [QuotedShape; 4] = [
        QuotedShape::Delimited,
        QuotedShape::LineStart,
        QuotedShape::LineEnd,
        QuotedShape::WholeLine,
    ];

    fn pattern(self, quote: char) -> String {
        let d = DELIMITER_CLASS;
        let q = quote;
        match self {
            QuotedShape::Delimited => format!("(?sm)({d})( ?){q}.*?{q}({d})"),
            QuotedShape::LineStart => format!("(?sm)(?:^|\n){q}.*?{q}({d})( ?)"),
            QuotedShape::LineEnd => format!("(?sm)({d})( ?){q}.*?{q}(?:$|\n)"),
            QuotedShape::WholeLine => format!("(?sm)(?:^|\n){q}.*?{q}(?:$|\n)"),
        }
    }

    /// The delimiter captured next to a quoted field, if the match is usable at all.
    /// `Some(None)` means the match counts but names no delimiter.
    fn delimiter<'h>(self, caps: &Captures<'h>) -> Option<Option<&'h str>> {
        match self {
            QuotedShape::Delimited => {
                let open = caps.get(1)?.as_str();
                let close = caps.get(3)?.as_str();
                // the same delimiter must surround the field on both sides
                (open == close).then_some(Some(open))
            }
            QuotedShape::LineStart | QuotedShape::LineEnd => Some(caps.get(1).map(|m| m.as_str())),
            QuotedShape::WholeLine => Some(None),
        }
    }

    /// Whether a space follows the delimiter captured next to the field
    fn spaced(self, caps: &Captures<'_>) -> bool {
        match self {
            QuotedShape::WholeLine => false,
            _ => caps.get(2).is_some_and(|m| !m.as_str().is_empty()),
        }
    }
}

/// One compiled pattern per shape and quote character
static QUOTED_FIELD_PATTERNS: LazyLock<Vec<(QuotedShape, u8, Regex)>> = LazyLock::new(|| {
    QuotedShape::ALL
        .iter()
        .flat_map(|&shape| {
            QUOTE_CHARS.iter().map(move |&quote| {
                let regex = Regex::new(&shape.pattern(quote as char))
                    .expect("quoted field patterns are valid regexes");
                (shape, quote, regex)
            })
        })
        .collect()
});

/// Ordered tally, ties resolve to the key seen first
#[derive(Debug, Default)]
struct Tally(Vec<(u8, usize)>);

impl Tally {
    fn add(&mut self, key: u8) {
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some((_, count)) => *count += 1,
            None => self.0.push((key, 1)),
        }
    }

    fn count(&self, key: u8) -> usize {
        self.0
            .iter()
            .find(|(k, _)| *k == key)
            .map_or(0, |(_, count)| *count)
    }

    fn most_common(&self) -> Option<u8> {
        self.0
            .iter()
            .rev()
            .max_by_key(|(_, count)| *count)
            .map(|(key, _)| *key)
    }
}

/// Sniffs the dialect of `sample`
pub fn sniff(sample: &str) -> Result<Dialect, SniffError> {
    let (quote, delimiter) = guess_quote_and_delimiter(sample).unwrap_or((b'"', None));
    let (delimiter, skip_initial_space) = match delimiter {
        Some(guess) => guess,
        None => {
            let delimiter = guess_delimiter(sample, quote).ok_or(SniffError::NoDelimiter)?;
            (delimiter, spaced_after(sample, delimiter))
        }
    };
    Ok(Dialect::new(delimiter)
        .with_quote(quote)
        .with_skip_initial_space(skip_initial_space))
}

/// Sniffs the dialect of `sample`, using `fallback` as the delimiter if sniffing fails
pub fn sniff_or(sample: &str, fallback: u8) -> Dialect {
    match sniff(sample) {
        Ok(dialect) => {
            debug!(
                "Sniffed delimiter {:?} and quote {:?}",
                dialect.delimiter as char, dialect.quote as char
            );
            dialect
        }
        Err(e) => {
            warn!(
                "Trouble sniffing the dialect ({}), falling back to delimiter {:?}",
                e, fallback as char
            );
            Dialect::new(fallback)
        }
    }
}

// Tries each quoted field shape in turn and stops at the first one with matches.
// Returns the most common quote character and, if any, the most common delimiter next to it
// along with whether every counted delimiter was followed by a space.
fn guess_quote_and_delimiter(sample: &str) -> Option<(u8, Option<(u8, bool)>)> {
    for shape in QuotedShape::ALL {
        let mut quotes = Tally::default();
        let mut delimiters = Tally::default();
        let mut spaced = 0;
        let patterns = QUOTED_FIELD_PATTERNS.iter().filter(|(s, _, _)| *s == shape);
        for (_, quote, regex) in patterns {
            for caps in regex.captures_iter(sample) {
                let Some(delimiter) = shape.delimiter(&caps) else {
                    continue;
                };
                quotes.add(*quote);
                // only single byte delimiters are usable, and a line break never is one
                if let Some(&[byte]) = delimiter.map(str::as_bytes) {
                    if byte != b'\r' {
                        delimiters.add(byte);
                        if shape.spaced(&caps) {
                            spaced += 1;
                        }
                    }
                }
            }
        }
        if let Some(quote) = quotes.most_common() {
            let delimiter = delimiters
                .most_common()
                .map(|delimiter| (delimiter, delimiters.count(delimiter) == spaced));
            debug!(
                "Quoted fields ({:?}) suggest quote {:?} and delimiter {:?}",
                shape,
                quote as char,
                delimiter.map(|(delimiter, _)| char::from(delimiter))
            );
            return Some((quote, delimiter));
        }
    }
    None
}

/// For one character: (frequency on a line, number of lines with that frequency), in first-seen order
type Histogram = Vec<(usize, usize)>;

// The usual frequency of a character on a line and how consistently it occurs:
// the number of lines with that frequency minus the number of lines without it.
fn mode_of(histogram: &Histogram) -> Option<(usize, isize)> {
    match histogram.as_slice() {
        [] | [(0, _)] => None,
        [(freq, lines)] => Some((*freq, *lines as isize)),
        _ => {
            let (mode_idx, &(freq, lines)) = histogram
                .iter()
                .enumerate()
                .rev()
                .max_by_key(|(_, (_, lines))| *lines)?;
            let others: usize = histogram
                .iter()
                .enumerate()
                .filter(|(idx, _)| *idx != mode_idx)
                .map(|(_, (_, lines))| lines)
                .sum();
            Some((freq, lines as isize - others as isize))
        }
    }
}

// Guesses the delimiter as the character which occurs the same number of times on (almost)
// every line. Lines are added in chunks and a lone candidate ends the search early. Otherwise
// ties among the candidates left after the last chunk are broken by preference.
fn guess_delimiter(sample: &str, quote: u8) -> Option<u8> {
    let lines: Vec<&str> = sample.lines().filter(|line| !line.is_empty()).collect();
    let mut histograms: Vec<Histogram> = vec![Vec::new(); 128];
    let mut candidates: Vec<(u8, usize, isize)> = Vec::new();

    let mut start = 0;
    let mut iteration = 0;
    while start < lines.len() {
        iteration += 1;
        let end = (start + CHUNK_LINES).min(lines.len());
        for line in &lines[start..end] {
            let mut counts = [0usize; 128];
            for byte in line.bytes().filter(u8::is_ascii) {
                counts[byte as usize] += 1;
            }
            for (histogram, &freq) in histograms.iter_mut().zip(counts.iter()) {
                match histogram.iter_mut().find(|(f, _)| *f == freq) {
                    Some((_, lines)) => *lines += 1,
                    None => histogram.push((freq, 1)),
                }
            }
        }

        let modes: Vec<(u8, usize, isize)> = histograms
            .iter()
            .enumerate()
            .filter(|(ch, _)| *ch as u8 != quote)
            .filter_map(|(ch, histogram)| mode_of(histogram).map(|(f, s)| (ch as u8, f, s)))
            .collect();
        let total = (CHUNK_LINES * iteration).min(lines.len()) as f64;

        let mut consistency = 1.0;
        candidates.clear();
        while candidates.is_empty() && consistency >= MIN_CONSISTENCY {
            candidates = modes
                .iter()
                .filter(|(_, freq, score)| {
                    *freq > 0 && *score > 0 && *score as f64 / total >= consistency
                })
                .copied()
                .collect();
            consistency -= CONSISTENCY_STEP;
        }
        debug!(
            "Delimiter candidates after {} lines: {:?}",
            end,
            candidates
                .iter()
                .map(|(ch, _, _)| *ch as char)
                .collect::<Vec<_>>()
        );

        if let [(ch, _, _)] = candidates.as_slice() {
            return Some(*ch);
        }
        start = end;
    }

    PREFERRED_DELIMITERS
        .iter()
        .copied()
        .find(|d| candidates.iter().any(|(ch, _, _)| ch == d))
        .or_else(|| {
            candidates
                .iter()
                .max_by_key(|(ch, freq, score)| (*freq, *score, *ch))
                .map(|(ch, _, _)| *ch)
        })
}

// Spaces after the delimiter are skipped when every delimiter on the first line has one
fn spaced_after(sample: &str, delimiter: u8) -> bool {
    let Some(first) = sample.lines().find(|line| !line.is_empty()) else {
        return false;
    };
    let delimiter = delimiter as char;
    let spaced = format!("{delimiter} ");
    first.matches(delimiter).count() == first.matches(spaced.as_str()).count()
}

/// How the cells of one column look across the sampled rows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnKind {
    Numeric,
    Length(usize),
}

impl ColumnKind {
    fn of(cell: &str) -> Self {
        if is_numeric(cell) {
            ColumnKind::Numeric
        } else {
            ColumnKind::Length(cell.chars().count())
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnSlot {
    Untyped,
    Typed(ColumnKind),
    /// The column is not uniform, so it says nothing about the header
    Discarded,
}

/// Guesses whether the first record of `sample` is a header row
///
/// Each column whose cells look alike (all numeric, or all the same length) across the
/// following rows votes for a header if the first cell does not look like the rest.
pub fn has_header(sample: &str, dialect: Dialect) -> bool {
    let mut reader = dialect.reader_builder().from_reader(sample.as_bytes());
    let mut records = reader
        .records()
        .filter_map(Result::ok)
        .filter(|record| !is_blank(record));
    let Some(header) = records.next() else {
        return false;
    };

    let mut slots = vec![ColumnSlot::Untyped; header.len()];
    for record in records.take(MAX_HEADER_CHECK_ROWS) {
        if record.len() != header.len() {
            continue;
        }
        for (slot, cell) in slots.iter_mut().zip(dialect.fields(&record)) {
            let kind = ColumnKind::of(cell);
            match *slot {
                ColumnSlot::Untyped => *slot = ColumnSlot::Typed(kind),
                ColumnSlot::Typed(seen) if seen != kind => *slot = ColumnSlot::Discarded,
                _ => {}
            }
        }
    }

    let votes: i64 = slots
        .iter()
        .zip(dialect.fields(&header))
        .map(|(slot, name)| match slot {
            ColumnSlot::Discarded => 0,
            ColumnSlot::Typed(kind) if ColumnKind::of(name) == *kind => -1,
            ColumnSlot::Typed(_) | ColumnSlot::Untyped => 1,
        })
        .sum();
    debug!("Header votes: {} for {:?}", votes, header);
    votes > 0
}
