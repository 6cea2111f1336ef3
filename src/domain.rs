use std::fmt;
use std::str::FromStr;

use camino::Utf8Path;
use serde::{Deserialize, Serialize};

use crate::error::AccfetchError;

/// Nucleotide accession: one or two uppercase letters followed by 3-7 digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Accession(String);

impl Accession {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Accession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Accession {
    type Err = AccfetchError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        let letters = trimmed
            .bytes()
            .take_while(|byte| byte.is_ascii_uppercase())
            .count();
        let digits = trimmed[letters..]
            .bytes()
            .take_while(|byte| byte.is_ascii_digit())
            .count();
        let is_valid = (1..=2).contains(&letters)
            && (3..=7).contains(&digits)
            && letters + digits == trimmed.len();
        if !is_valid {
            return Err(AccfetchError::InvalidAccession(value.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKind {
    Csv,
    Txt,
}

impl QueryKind {
    /// Case-insensitive extension match; anything that is not `.csv` parses as plain text.
    pub fn from_path(path: &Utf8Path) -> QueryKind {
        match path.extension() {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => QueryKind::Csv,
            _ => QueryKind::Txt,
        }
    }
}

impl fmt::Display for QueryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryKind::Csv => write!(f, "csv"),
            QueryKind::Txt => write!(f, "txt"),
        }
    }
}
