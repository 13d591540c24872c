//! Parenthesis normalizer
//!
//! Best-effort repair of unbalanced parentheses in free-text filter input.
//! Removes the minimum characters necessary, keeps the relative order and
//! all non-parenthesis content untouched, and only allocates when the input
//! actually changes. Repair is a deliberate leniency; unbalanced parens are
//! not a parse error.

use std::borrow::Cow;

/// Repair unbalanced parentheses in `input`.
///
/// A `)` with no earlier unmatched `(` is dropped on the spot; `(`
/// characters that never close are removed afterwards. Balanced input is
/// returned as-is without allocation, and the function is idempotent.
pub fn normalize(input: &str) -> Cow<'_, str> {
    if !input.contains('(') && !input.contains(')') {
        return Cow::Borrowed(input);
    }

    let mut out = String::with_capacity(input.len());
    // Byte offsets (into `out`) of currently unmatched '(' characters
    let mut open: Vec<usize> = Vec::new();
    let mut dropped_close = false;

    for c in input.chars() {
        match c {
            '(' => {
                open.push(out.len());
                out.push(c);
            }
            ')' => {
                if open.pop().is_some() {
                    out.push(c);
                } else {
                    dropped_close = true;
                }
            }
            _ => out.push(c),
        }
    }

    if open.is_empty() && !dropped_close {
        return Cow::Borrowed(input);
    }

    // Remove the '(' characters that never closed. Walking the recorded
    // offsets back-to-front keeps the earlier offsets valid.
    for &pos in open.iter().rev() {
        out.remove(pos);
    }

    Cow::Owned(out)
}
