use regex::Regex;

use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// Wildcard patterns
// ---------------------------------------------------------------------------

/// A dataset name is treated as a pattern only if it contains `*` or `?`.
pub fn is_wild(pattern: &str) -> bool {
    pattern.contains(['*', '?'])
}

/// Shell-style glob compiled to an anchored regex.
///
/// `*` matches any run of characters (including `/`), `?` matches one
/// character, `[abc]` / `[!abc]` are character classes. An unterminated `[`
/// is literal.
#[derive(Debug, Clone)]
pub struct GlobPattern {
    regex: Regex,
}

impl GlobPattern {
    pub fn new(pattern: &str) -> Result<Self> {
        let regex = Regex::new(&glob_to_regex(pattern)).map_err(|source| Error::Pattern {
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(GlobPattern { regex })
    }

    pub fn is_match(&self, name: &str) -> bool {
        self.regex.is_match(name)
    }
}

fn glob_to_regex(pattern: &str) -> String {
    let chars: Vec<char> = pattern.chars().collect();
    let n = chars.len();
    let mut out = String::from("^(?s:");
    let mut i = 0;

    while i < n {
        let c = chars[i];
        i += 1;
        match c {
            '*' => out.push_str(".*"),
            '?' => out.push('.'),
            '[' => {
                // Find the closing bracket; a leading `!` or `]` belongs to the class.
                let mut j = i;
                if j < n && chars[j] == '!' {
                    j += 1;
                }
                if j < n && chars[j] == ']' {
                    j += 1;
                }
                while j < n && chars[j] != ']' {
                    j += 1;
                }
                if j >= n {
                    out.push_str("\\[");
                    continue;
                }
                let mut body = &chars[i..j];
                out.push('[');
                if body.first() == Some(&'!') {
                    out.push('^');
                    body = &body[1..];
                }
                for (k, &bc) in body.iter().enumerate() {
                    match bc {
                        '\\' | '[' | ']' | '&' | '~' => {
                            out.push('\\');
                            out.push(bc);
                        }
                        '^' if k == 0 => out.push_str("\\^"),
                        _ => out.push(bc),
                    }
                }
                out.push(']');
                i = j + 1;
            }
            _ => out.push_str(&regex::escape(c.encode_utf8(&mut [0u8; 4]))),
        }
    }

    out.push_str(")$");
    out
}

// ---------------------------------------------------------------------------
// Pattern expansion
// ---------------------------------------------------------------------------

/// Expand a list of dataset names and wildcard patterns against `universe`.
///
/// Literal names pass through unchanged, whether or not they exist. Each
/// wildcard contributes its matches in ascending order, in place of the
/// pattern itself.
pub fn expand_patterns<P, U>(patterns: &[P], universe: &[U]) -> Result<Vec<String>>
where
    P: AsRef<str>,
    U: AsRef<str>,
{
    let mut out = Vec::new();
    for pattern in patterns {
        let pattern = pattern.as_ref();
        if !is_wild(pattern) {
            out.push(pattern.to_string());
            continue;
        }
        let glob = GlobPattern::new(pattern)?;
        let mut matches: Vec<String> = universe
            .iter()
            .map(AsRef::as_ref)
            .filter(|name| glob.is_match(name))
            .map(str::to_string)
            .collect();
        matches.sort();
        log::debug!("Pattern '{pattern}' matched {} datasets", matches.len());
        out.extend(matches);
    }
    Ok(out)
}

// ---------------------------------------------------------------------------
// Pairing
// ---------------------------------------------------------------------------

/// Walks two name lists in lockstep, cycling each independently, until both
/// have wrapped at least once. An empty list behaves like `[""]`.
///
/// The wrap flags never reset, so the stream always has
/// `max(first.len(), second.len())` pairs.
#[derive(Debug, Clone)]
pub struct PairStream {
    first: Vec<String>,
    second: Vec<String>,
    idx1: usize,
    idx2: usize,
    wrapped1: bool,
    wrapped2: bool,
    done: bool,
}

impl PairStream {
    pub fn new(first: Vec<String>, second: Vec<String>) -> Self {
        PairStream {
            first: placeholder_if_empty(first),
            second: placeholder_if_empty(second),
            idx1: 0,
            idx2: 0,
            wrapped1: false,
            wrapped2: false,
            done: false,
        }
    }
}

fn placeholder_if_empty(list: Vec<String>) -> Vec<String> {
    if list.is_empty() {
        vec![String::new()]
    } else {
        list
    }
}

impl Iterator for PairStream {
    type Item = (String, String);

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let item = (self.first[self.idx1].clone(), self.second[self.idx2].clone());

        self.idx1 += 1;
        self.idx2 += 1;
        if self.idx1 == self.first.len() {
            self.idx1 = 0;
            self.wrapped1 = true;
        }
        if self.idx2 == self.second.len() {
            self.idx2 = 0;
            self.wrapped2 = true;
        }
        self.done = self.wrapped1 && self.wrapped2;

        Some(item)
    }
}

impl std::iter::FusedIterator for PairStream {}

/// Convenience wrapper around [`PairStream::new`].
pub fn pair(first: Vec<String>, second: Vec<String>) -> PairStream {
    PairStream::new(first, second)
}
