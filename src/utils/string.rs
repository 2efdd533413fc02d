//! String formatting and casing helpers.

use std::fmt::Display;

use crate::error::{Error, Result};

pub const DEFAULT_ELLIPSIS: &str = "...";

/// Word delimiters used by [`ucwords_default`]: punctuation plus ASCII
/// whitespace.
pub const DEFAULT_UCWORDS_DELIMITERS: &str = "-_+':/,. \t\r\n\x0B\x0C";

/// Replace each `{n}` in `format` with the display form of `args[n]`.
///
/// Keys may repeat and appear in any order. Placeholders without a matching
/// argument are left as is.
pub fn format(format: &str, args: &[&dyn Display]) -> Result<String> {
    if args.is_empty() {
        return Err(Error::validation_invalid_argument(
            "args",
            "format() takes at least one argument after the format",
            None,
            None,
        ));
    }

    let mut out = format.to_string();
    for (index, arg) in args.iter().enumerate() {
        out = out.replace(&format!("{{{}}}", index), &arg.to_string());
    }
    Ok(out)
}

/// Whether `subject` ends with `suffix`, together with the part of `subject`
/// before the suffix.
///
/// An empty suffix always matches and leaves `subject` whole. An empty
/// subject never matches a non-empty suffix. On a mismatch the remainder is
/// the whole subject.
pub fn ends_with<'a>(subject: &'a str, suffix: &str) -> (bool, &'a str) {
    if suffix.is_empty() {
        return (true, subject);
    }
    if subject.is_empty() {
        return (false, "");
    }

    match subject.strip_suffix(suffix) {
        Some(rest) => (true, rest),
        None => (false, subject),
    }
}

/// Truncate `input` to at most `max_length` characters, ending in `suffix`
/// when anything was cut.
///
/// When the suffix alone does not fit, the suffix itself is cut to
/// `max_length`.
pub fn ellipsize(input: &str, max_length: usize, suffix: &str) -> String {
    let length = input.chars().count();
    if length <= max_length {
        return input.to_string();
    }

    let suffix_length = suffix.chars().count();
    let kept = max_length.saturating_sub(suffix_length);
    if kept == 0 {
        return suffix.chars().take(max_length).collect();
    }

    let mut out: String = input.chars().take(kept).collect();
    out.push_str(suffix);
    out
}

/// [`ellipsize`] with `...` as the suffix.
pub fn ellipsize_default(input: &str, max_length: usize) -> String {
    ellipsize(input, max_length, DEFAULT_ELLIPSIS)
}

/// Uppercase the first character of every run of characters not in
/// `delimiters`.
///
/// With no delimiters only the first character of `input` is uppercased.
pub fn ucwords(input: &str, delimiters: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut at_word_start = true;

    for c in input.chars() {
        if delimiters.contains(c) {
            at_word_start = true;
            out.push(c);
        } else if at_word_start {
            at_word_start = false;
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
    }

    out
}

pub fn ucwords_default(input: &str) -> String {
    ucwords(input, DEFAULT_UCWORDS_DELIMITERS)
}
