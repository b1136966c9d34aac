//! Lenient dotted version numbers reported by connected sites.
//!
//! Sites report plugin versions such as `3.8.1`, `4.0`, `4.1-beta2` or
//! `5.0-alpha`. Numeric components compare with missing components treated as
//! zero, so `4.0` equals `4.0.0`. A suffix after the numbers marks a
//! pre-release, which orders below the release it precedes:
//!
//! ```text
//! 4.0-dev < 4.0-alpha < 4.0-beta1 < 4.0-beta2 < 4.0-RC1 < 4.0 < 4.0-pl1
//! ```
//!
//! Suffixes that are not one of these labels order below `dev`.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone)]
pub struct Version {
    parts: Vec<u32>,
    suffix: Option<Suffix>,
}

/// Text after the numeric components, e.g. `beta2`.
#[derive(Debug, Clone)]
struct Suffix {
    text: String,
    stage: Stage,
    number: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Stage {
    Unknown,
    Dev,
    Alpha,
    Beta,
    ReleaseCandidate,
    Release,
    Patch,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid version string: {0:?}")]
pub struct ParseVersionError(String);

impl Version {
    pub fn new(parts: &[u32]) -> Self {
        Self {
            parts: parts.to_vec(),
            suffix: None,
        }
    }

    /// Whether the version carries a pre-release suffix (`-beta1`, `-RC2`).
    pub fn is_prerelease(&self) -> bool {
        self.stage() < Stage::Release
    }

    fn part(&self, i: usize) -> u32 {
        self.parts.get(i).copied().unwrap_or(0)
    }

    fn stage(&self) -> Stage {
        self.suffix.as_ref().map_or(Stage::Release, |s| s.stage)
    }

    fn stage_number(&self) -> u32 {
        self.suffix.as_ref().map_or(0, |s| s.number)
    }
}

impl Suffix {
    fn parse(text: &str) -> Self {
        let label_len = text
            .find(|c: char| !c.is_ascii_alphabetic())
            .unwrap_or(text.len());
        let (label, rest) = text.split_at(label_len);
        let stage = match label.to_ascii_lowercase().as_str() {
            "dev" => Stage::Dev,
            "a" | "alpha" => Stage::Alpha,
            "b" | "beta" => Stage::Beta,
            "rc" => Stage::ReleaseCandidate,
            "p" | "pl" => Stage::Patch,
            _ => Stage::Unknown,
        };
        let digits: String = rest
            .trim_start_matches(['.', '-', '_'])
            .chars()
            .take_while(|c| c.is_ascii_digit())
            .collect();
        Self {
            text: text.to_string(),
            stage,
            number: digits.parse().unwrap_or(0),
        }
    }
}

impl FromStr for Version {
    type Err = ParseVersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let end = s
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(s.len());
        let (numeric, rest) = s.split_at(end);

        let parts = numeric
            .split('.')
            .take_while(|p| !p.is_empty())
            .map(str::parse)
            .collect::<Result<Vec<u32>, _>>()
            .map_err(|_| ParseVersionError(s.to_string()))?;
        if parts.is_empty() {
            return Err(ParseVersionError(s.to_string()));
        }

        let rest = rest.trim_start_matches(['-', '.', '_', '+']);
        let suffix = (!rest.is_empty()).then(|| Suffix::parse(rest));
        Ok(Self { parts, suffix })
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.parts.len().max(other.parts.len());
        (0..len)
            .map(|i| self.part(i).cmp(&other.part(i)))
            .find(|o| o.is_ne())
            .unwrap_or(Ordering::Equal)
            .then_with(|| self.stage().cmp(&other.stage()))
            .then_with(|| self.stage_number().cmp(&other.stage_number()))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s: Vec<String> = self.parts.iter().map(u32::to_string).collect();
        f.write_str(&s.join("."))?;
        match &self.suffix {
            Some(suffix) => write!(f, "-{}", suffix.text),
            None => Ok(()),
        }
    }
}

impl Serialize for Version {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Version {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
