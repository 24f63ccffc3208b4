//! Maven version ordering.
//!
//! Maven versions do not follow semver: tokens split on `.` and `-`,
//! numeric tokens compare as numbers, and well-known qualifiers rank
//! `alpha` < `beta` < `milestone` < `rc` < `snapshot` < release < `sp`.
//! Unknown qualifiers sort below a release, case-insensitively among
//! themselves.

use std::cmp::Ordering;
use std::fmt;

/// A Maven version parsed into comparable tokens.
#[derive(Debug, Clone)]
pub struct MavenVersion {
    raw: String,
    tokens: Vec<Token>,
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(u64),
    Qualifier(Rank),
    Other(String),
}

/// Ordering rank of the well-known qualifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Rank {
    Alpha,
    Beta,
    Milestone,
    Rc,
    Snapshot,
    Release,
    Sp,
}

impl MavenVersion {
    pub fn parse(raw: &str) -> Self {
        let tokens = raw
            .split(['.', '-'])
            .filter(|t| !t.is_empty())
            .map(token)
            .collect();
        Self {
            raw: raw.to_string(),
            tokens,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

fn token(t: &str) -> Token {
    if let Ok(n) = t.parse::<u64>() {
        return Token::Number(n);
    }
    match t.to_ascii_lowercase().as_str() {
        "alpha" | "a" => Token::Qualifier(Rank::Alpha),
        "beta" | "b" => Token::Qualifier(Rank::Beta),
        "milestone" | "m" => Token::Qualifier(Rank::Milestone),
        "rc" | "cr" => Token::Qualifier(Rank::Rc),
        "snapshot" => Token::Qualifier(Rank::Snapshot),
        "ga" | "final" | "release" => Token::Qualifier(Rank::Release),
        "sp" => Token::Qualifier(Rank::Sp),
        _ => Token::Other(t.to_ascii_lowercase()),
    }
}

impl Ord for MavenVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.tokens.len().max(other.tokens.len());
        for i in 0..len {
            let ord = match (self.tokens.get(i), other.tokens.get(i)) {
                (None, None) => Ordering::Equal,
                (Some(t), None) => versus_padding(t),
                (None, Some(t)) => versus_padding(t).reverse(),
                (Some(a), Some(b)) => token_cmp(a, b),
            };
            if ord != Ordering::Equal {
                return ord;
            }
        }
        Ordering::Equal
    }
}

/// Compare a token against the implicit padding of a shorter version,
/// which behaves like a release: `1.0` == `1.0.0` and `1.0` > `1.0-rc`.
fn versus_padding(t: &Token) -> Ordering {
    match t {
        Token::Number(0) => Ordering::Equal,
        Token::Number(_) => Ordering::Greater,
        Token::Qualifier(q) => q.cmp(&Rank::Release),
        Token::Other(_) => Ordering::Less,
    }
}

fn token_cmp(a: &Token, b: &Token) -> Ordering {
    use Token::{Number, Other, Qualifier};
    match (a, b) {
        (Number(a), Number(b)) => a.cmp(b),
        (Qualifier(a), Qualifier(b)) => a.cmp(b),
        (Other(a), Other(b)) => a.cmp(b),
        // Numbers dominate any qualifier or free-form token
        (Number(_), _) => Ordering::Greater,
        (_, Number(_)) => Ordering::Less,
        // Free-form tokens sort below a release
        (Qualifier(q), Other(_)) => {
            if *q >= Rank::Release {
                Ordering::Greater
            } else {
                Ordering::Less
            }
        }
        (Other(_), Qualifier(q)) => {
            if *q >= Rank::Release {
                Ordering::Less
            } else {
                Ordering::Greater
            }
        }
    }
}

impl PartialOrd for MavenVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for MavenVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for MavenVersion {}

impl fmt::Display for MavenVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Compare two version strings under Maven ordering.
pub fn compare(a: &str, b: &str) -> Ordering {
    MavenVersion::parse(a).cmp(&MavenVersion::parse(b))
}
