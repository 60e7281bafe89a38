//! # Version Ordering
//!
//! Orderings used when laying out the repository index.
//!
//! Version tokens come straight from manifest file names, so they are not
//! guaranteed to be strict semantic versions: Composer happily accepts
//! `6.5.0.0`, `1.0.0-RC1` or `2.1-beta3`. [`VersionKey`] therefore splits a
//! token into dotted parts and ranks them with the precedence Composer uses:
//!
//! ```text
//! <unknown word> < dev < alpha|a < beta|b < RC|rc < <number> < pl|p
//! ```
//!
//! Words are matched case-sensitively, the way Composer matches them.
//! Numeric parts compare by value, so `2.10.0` outranks `2.9.0`, and a bare
//! release outranks its own pre-releases (`1.0.0 > 1.0.0-RC1`).
//!
//! ```
//! use std::cmp::Ordering;
//!
//! use repository::version::compare;
//!
//! assert_eq!(compare("2.10.0", "2.9.0"), Ordering::Greater);
//! assert_eq!(compare("1.0.0", "1.0.0-RC1"), Ordering::Greater);
//! ```


use std::cmp::Ordering;

//================================================================================================
// Types
//================================================================================================

/// A run of ASCII digits compared by numeric value without overflowing.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Digits(String);

/// A single component of a version token.
///
/// The declaration order of the variants is the precedence order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum Part {
    /// A word with no special meaning; ranks below every stability marker.
    Unknown(String),
    Dev,
    Alpha,
    Beta,
    Rc,
    /// Marks the end of the token, so a shorter version sits between
    /// its pre-releases and its longer numeric or patch-level successors.
    End,
    Number(Digits),
    Patch,
}

/// The comparable form of a version token.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct VersionKey(Vec<Part>);

//================================================================================================
// Impls
//================================================================================================

impl Ord for Digits {
    fn cmp(&self, other: &Self) -> Ordering {
        cmp_digits(&self.0, &other.0)
    }
}

impl PartialOrd for Digits {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Part {
    /// Classify a word part; forms are matched by prefix, so `b` and `build` both read as beta.
    ///
    /// Matching is case-sensitive: only `RC` has an upper-case form, so `DEV` or
    /// `Alpha` are unknown words.
    fn word(word: &str) -> Self {
        let is = |form: &str| word.starts_with(form);
        if is("dev") {
            Part::Dev
        } else if is("a") {
            Part::Alpha
        } else if is("b") {
            Part::Beta
        } else if is("RC") || is("rc") {
            Part::Rc
        } else if is("p") {
            Part::Patch
        } else {
            Part::Unknown(word.to_owned())
        }
    }
}

impl VersionKey {
    /// Split a version token into its comparable parts.
    pub fn parse(token: &str) -> Self {
        let token = match token.strip_prefix(['v', 'V']) {
            Some(rest) if rest.starts_with(|c: char| c.is_ascii_digit()) => rest,
            _ => token,
        };

        let mut parts = Vec::new();
        for segment in token.split(['.', '-', '_', '+']) {
            let mut rest = segment;
            while let Some(first) = rest.chars().next() {
                let numeric = first.is_ascii_digit();
                let end = rest
                    .find(|c: char| c.is_ascii_digit() != numeric)
                    .unwrap_or(rest.len());
                let (run, tail) = rest.split_at(end);
                parts.push(if numeric {
                    Part::Number(Digits(run.to_owned()))
                } else {
                    Part::word(run)
                });
                rest = tail;
            }
        }
        parts.push(Part::End);
        VersionKey(parts)
    }
}

//================================================================================================
// Functions
//================================================================================================

/// Compare two version tokens by precedence.
pub fn compare(a: &str, b: &str) -> Ordering {
    VersionKey::parse(a).cmp(&VersionKey::parse(b))
}

/// Comparator placing the highest version first.
pub fn descending(a: &str, b: &str) -> Ordering {
    compare(b, a)
}

/// Numeric-aware string comparison, so that `composer.10.json` follows `composer.9.json`.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let (mut a, mut b) = (a, b);
    loop {
        match (a.chars().next(), b.chars().next()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) if x.is_ascii_digit() && y.is_ascii_digit() => {
                let (da, ra) = split_digits(a);
                let (db, rb) = split_digits(b);
                match cmp_digits(da, db) {
                    Ordering::Equal => {
                        (a, b) = (ra, rb);
                    },
                    ord => return ord,
                }
            },
            (Some(x), Some(y)) => {
                if x != y {
                    return x.cmp(&y);
                }
                (a, b) = (&a[x.len_utf8()..], &b[y.len_utf8()..]);
            },
        }
    }
}

fn split_digits(s: &str) -> (&str, &str) {
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    s.split_at(end)
}

/// Compare digit runs by value; on a tie the run with fewer leading zeros comes first.
fn cmp_digits(a: &str, b: &str) -> Ordering {
    let (ta, tb) = (a.trim_start_matches('0'), b.trim_start_matches('0'));
    ta.len()
        .cmp(&tb.len())
        .then_with(|| ta.cmp(tb))
        .then_with(|| a.len().cmp(&b.len()))
}
