//! Compiled regular expressions.
//!
//! Matching is delegated to `regress`, which implements the ECMAScript
//! pattern grammar and backtracking order over UTF-16 input. This module
//! adds what the RegExp builtins need on top: flag validation, the capture
//! count, the canonical `source` text, and the rule that captures made
//! inside a negative lookahead are always reported as undefined.

use core_types::JsString;
use tracing::debug;

use crate::exception::{syntax_error, JsResult};

/// One successful match over UTF-16 input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchResult {
    /// Index of the first matched code unit
    pub start: usize,
    /// Index just past the match
    pub end: usize,
    /// Capture groups 1..=n; `None` for groups that did not participate
    pub captures: Vec<Option<(usize, usize)>>,
}

impl MatchResult {
    /// Code units of capture `index` (1-based), if it participated
    pub fn capture<'a>(&self, input: &'a [u16], index: usize) -> Option<&'a [u16]> {
        let (start, end) = (*self.captures.get(index.checked_sub(1)?)?)?;
        input.get(start..end)
    }
}

/// A compiled pattern plus its flags.
#[derive(Debug)]
pub struct RegExpMatcher {
    source: JsString,
    global: bool,
    ignore_case: bool,
    multiline: bool,
    regex: regress::Regex,
    group_count: usize,
    in_negative_lookahead: Vec<bool>,
}

/// Capture count and, per capture, whether it sits inside `(?! ... )`
fn scan_groups(pattern: &[u16]) -> (usize, Vec<bool>) {
    let unit = |c: char| c as u16;
    let mut count = 0;
    let mut flagged = Vec::new();
    let mut open: Vec<bool> = Vec::new();
    let mut negative_depth = 0usize;
    let mut in_class = false;
    let mut i = 0;
    while i < pattern.len() {
        let c = pattern[i];
        if c == unit('\\') {
            i += 2;
            continue;
        }
        if in_class {
            in_class = c != unit(']');
        } else if c == unit('[') {
            in_class = true;
        } else if c == unit('(') {
            let next = pattern.get(i + 1).copied();
            let after = pattern.get(i + 2).copied();
            let capturing = next != Some(unit('?'))
                || (after == Some(unit('<'))
                    && !matches!(pattern.get(i + 3).copied(), Some(u) if u == unit('=') || u == unit('!')));
            let negative = next == Some(unit('?')) && after == Some(unit('!'));
            if capturing {
                count += 1;
                flagged.push(negative_depth > 0);
            }
            if negative {
                negative_depth += 1;
            }
            open.push(negative);
        } else if c == unit(')') && open.pop() == Some(true) {
            negative_depth -= 1;
        }
        i += 1;
    }
    (count, flagged)
}

/// The `source` text: `(?:)` for an empty pattern, with bare `/` escaped
fn canonical_source(pattern: &JsString) -> JsString {
    if pattern.is_empty() {
        return JsString::from("(?:)");
    }
    let slash = u16::from(b'/');
    let backslash = u16::from(b'\\');
    let mut out = Vec::with_capacity(pattern.len());
    let mut escaped = false;
    let mut in_class = false;
    for &c in pattern.as_units() {
        if escaped {
            escaped = false;
        } else if c == backslash {
            escaped = true;
        } else if c == u16::from(b'[') {
            in_class = true;
        } else if c == u16::from(b']') {
            in_class = false;
        } else if c == slash && !in_class {
            out.push(backslash);
        }
        out.push(c);
    }
    JsString::from_units(out)
}

impl RegExpMatcher {
    /// Compile `pattern` with `flags`, which may contain each of `g`, `i`
    /// and `m` at most once.
    pub fn new(pattern: &JsString, flags: &JsString) -> JsResult<Self> {
        let (mut global, mut ignore_case, mut multiline) = (false, false, false);
        for c in flags.to_rust_string().chars() {
            let seen = match c {
                'g' => &mut global,
                'i' => &mut ignore_case,
                'm' => &mut multiline,
                _ => return syntax_error(format!("Invalid regular expression flags '{}'", flags)),
            };
            if *seen {
                return syntax_error(format!("Invalid regular expression flags '{}'", flags));
            }
            *seen = true;
        }

        let mut engine_flags = String::new();
        if ignore_case {
            engine_flags.push('i');
        }
        if multiline {
            engine_flags.push('m');
        }
        let text = pattern.to_rust_string();
        let regex = match regress::Regex::with_flags(&text, engine_flags.as_str()) {
            Ok(regex) => regex,
            Err(err) => return syntax_error(format!("Invalid regular expression: /{}/: {}", text, err)),
        };
        let (group_count, in_negative_lookahead) = scan_groups(pattern.as_units());
        debug!(pattern = %text, groups = group_count, global, ignore_case, multiline, "compiled regexp");
        Ok(RegExpMatcher {
            source: canonical_source(pattern),
            global,
            ignore_case,
            multiline,
            regex,
            group_count,
            in_negative_lookahead,
        })
    }

    /// The `source` property value
    pub fn source(&self) -> &JsString {
        &self.source
    }

    /// `g` flag
    pub fn global(&self) -> bool {
        self.global
    }

    /// `i` flag
    pub fn ignore_case(&self) -> bool {
        self.ignore_case
    }

    /// `m` flag
    pub fn multiline(&self) -> bool {
        self.multiline
    }

    /// Number of capturing groups
    pub fn group_count(&self) -> usize {
        self.group_count
    }

    /// The flags as they appear after the closing `/`
    pub fn flags_text(&self) -> String {
        let mut flags = String::new();
        for (on, c) in [(self.global, 'g'), (self.ignore_case, 'i'), (self.multiline, 'm')] {
            if on {
                flags.push(c);
            }
        }
        flags
    }

    /// The leftmost match starting at or after `from`
    pub fn match_from(&self, input: &[u16], from: usize) -> Option<MatchResult> {
        if from > input.len() {
            return None;
        }
        let found = self.regex.find_from_utf16(input, from).next()?;
        let range = found.range();
        let captures = (1..=self.group_count)
            .map(|index| {
                if self.in_negative_lookahead.get(index - 1).copied().unwrap_or(false) {
                    return None;
                }
                found.group(index).map(|r| (r.start, r.end))
            })
            .collect();
        Some(MatchResult {
            start: range.start,
            end: range.end,
            captures,
        })
    }
}

/// Expand a `replace` template for one match: `$$`, `$&`, `` $` ``, `$'`,
/// and `$n`/`$nn`, where the two-digit form wins only when it names an
/// existing group.
pub fn expand_replacement(template: &[u16], input: &[u16], m: &MatchResult, out: &mut Vec<u16>) {
    let dollar = u16::from(b'$');
    let digit = |u: Option<&u16>| {
        u.and_then(|&u| char::from_u32(u32::from(u)))
            .and_then(|c| c.to_digit(10))
            .map(|d| d as usize)
    };
    let group_count = m.captures.len();
    let mut i = 0;
    while i < template.len() {
        let c = template[i];
        if c != dollar || i + 1 == template.len() {
            out.push(c);
            i += 1;
            continue;
        }
        let next = template[i + 1];
        match char::from_u32(u32::from(next)) {
            Some('$') => {
                out.push(dollar);
                i += 2;
            }
            Some('&') => {
                out.extend_from_slice(&input[m.start..m.end]);
                i += 2;
            }
            Some('`') => {
                out.extend_from_slice(&input[..m.start]);
                i += 2;
            }
            Some('\'') => {
                out.extend_from_slice(&input[m.end.min(input.len())..]);
                i += 2;
            }
            _ => {
                let first = digit(template.get(i + 1));
                let second = digit(template.get(i + 2));
                let two = first.zip(second).map(|(a, b)| a * 10 + b);
                match (two, first) {
                    (Some(n), _) if n >= 1 && n <= group_count => {
                        out.extend_from_slice(m.capture(input, n).unwrap_or(&[]));
                        i += 3;
                    }
                    (_, Some(n)) if n >= 1 && n <= group_count => {
                        out.extend_from_slice(m.capture(input, n).unwrap_or(&[]));
                        i += 2;
                    }
                    _ => {
                        out.push(dollar);
                        i += 1;
                    }
                }
            }
        }
    }
}
