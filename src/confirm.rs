use crate::domain::Accession;
use crate::error::AccfetchError;

/// One identifier with its accessions and their selection state, prepared for
/// display at the confirmation gate.
#[derive(Debug, Clone)]
pub struct GroupView {
    pub identifier: String,
    pub accessions: Vec<(Accession, bool)>,
}

/// Interactive gate between parsing and any file output. Injectable so tests
/// can answer deterministically.
pub trait Confirmer {
    /// `filtered` marks the second gate, after list-filter resolution, where
    /// the display distinguishes selected from skipped accessions.
    fn confirm(&mut self, groups: &[GroupView], filtered: bool) -> Result<bool, AccfetchError>;
}

/// Strict case-insensitive y/n; anything else means ask again.
pub fn parse_answer(input: &str) -> Option<bool> {
    match input.trim().to_ascii_lowercase().as_str() {
        "y" => Some(true),
        "n" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_case_insensitive_yes_no() {
        assert_eq!(parse_answer("y"), Some(true));
        assert_eq!(parse_answer("Y\n"), Some(true));
        assert_eq!(parse_answer("n"), Some(false));
        assert_eq!(parse_answer(" N "), Some(false));
    }

    #[test]
    fn rejects_everything_else() {
        for input in ["", "yes", "no", "q", "maybe", "0"] {
            assert_eq!(parse_answer(input), None);
        }
    }
}
