//! Wildcard pattern translation
//!
//! A term value containing `*` or `?` compiles to a pattern match: `*`
//! matches any run of characters, `?` exactly one. In memory the pattern is
//! matched directly (case-insensitively); for a deferred SQL provider it is
//! re-expressed as a `LIKE` pattern with an explicit escape character so a
//! literal `_` or `%` in user input never acts as a wildcard.

use std::fmt;

/// Escape character used in generated LIKE patterns
pub const LIKE_ESCAPE_CHAR: char = '\\';

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    /// Literal run, stored case-folded
    Literal(String),
    /// `*`: any run of characters, including the empty one
    AnyRun,
    /// `?`: exactly one character
    AnyOne,
}

/// A parsed `*`/`?` wildcard pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WildcardPattern {
    segments: Vec<Segment>,
    source: String,
}

impl WildcardPattern {
    /// Parse a raw term value into a pattern. Consecutive `*` collapse into
    /// one any-run segment; literals are case-folded once, here.
    pub fn parse(raw: &str) -> Self {
        let mut segments = Vec::new();
        let mut literal = String::new();
        for c in raw.chars() {
            match c {
                '*' => {
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    if segments.last() != Some(&Segment::AnyRun) {
                        segments.push(Segment::AnyRun);
                    }
                }
                '?' => {
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::AnyOne);
                }
                _ => literal.extend(c.to_lowercase()),
            }
        }
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }
        Self {
            segments,
            source: raw.to_string(),
        }
    }

    /// The raw value the pattern was parsed from
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Case-insensitive match of the whole input against the pattern
    pub fn matches(&self, input: &str) -> bool {
        let chars: Vec<char> = input.to_lowercase().chars().collect();
        match_segments(&self.segments, &chars)
    }

    /// Re-express the pattern for a SQL `LIKE ... ESCAPE '\'` comparison:
    /// `*` becomes `%`, `?` becomes `_`, and literal `%`, `_` and the
    /// escape character itself are escaped. Literals stay case-folded, so
    /// the column side must be lowered as well.
    pub fn to_like_pattern(&self) -> String {
        let mut out = String::with_capacity(self.source.len());
        for segment in &self.segments {
            match segment {
                Segment::AnyRun => out.push('%'),
                Segment::AnyOne => out.push('_'),
                Segment::Literal(s) => {
                    for c in s.chars() {
                        if c == '%' || c == '_' || c == LIKE_ESCAPE_CHAR {
                            out.push(LIKE_ESCAPE_CHAR);
                        }
                        out.push(c);
                    }
                }
            }
        }
        out
    }
}

/// Escape `%`, `_` and the escape character itself so a string can be
/// embedded verbatim in a `LIKE ... ESCAPE '\'` pattern
pub fn escape_like(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        if c == '%' || c == '_' || c == LIKE_ESCAPE_CHAR {
            out.push(LIKE_ESCAPE_CHAR);
        }
        out.push(c);
    }
    out
}

impl fmt::Display for WildcardPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.source)
    }
}

fn match_segments(segments: &[Segment], input: &[char]) -> bool {
    match segments.first() {
        None => input.is_empty(),
        Some(Segment::Literal(s)) => {
            let mut len = 0;
            for (i, pc) in s.chars().enumerate() {
                match input.get(i) {
                    Some(&ic) if ic == pc => len += 1,
                    _ => return false,
                }
            }
            match_segments(&segments[1..], &input[len..])
        }
        Some(Segment::AnyOne) => !input.is_empty() && match_segments(&segments[1..], &input[1..]),
        Some(Segment::AnyRun) => {
            (0..=input.len()).any(|skip| match_segments(&segments[1..], &input[skip..]))
        }
    }
}
