use std::collections::{BTreeMap, BTreeSet};

use regex::Regex;

use crate::domain::Accession;

/// Scan pattern for accessions embedded in free text.
pub const ACCESSION_SCAN: &str = r"[A-Z]{1,2}[0-9]{3,7}";

/// Occurrence tally for one accession across the whole query.
#[derive(Debug, Clone, Copy)]
pub struct AccessionTally {
    pub count: u32,
    pub selected: bool,
}

impl Default for AccessionTally {
    fn default() -> Self {
        Self {
            count: 0,
            selected: true,
        }
    }
}

/// One CSV identifier and the accessions listed under it, in scan order.
#[derive(Debug, Clone)]
pub struct IdentifierGroup {
    pub identifier: String,
    pub accessions: Vec<Accession>,
}

#[derive(Debug, Default)]
pub struct ParseOutcome {
    pub tallies: BTreeMap<Accession, AccessionTally>,
    pub groups: Vec<IdentifierGroup>,
    pub warnings: Vec<String>,
}

impl ParseOutcome {
    fn bump(&mut self, accession: Accession) {
        self.tallies.entry(accession).or_default().count += 1;
    }
}

/// Plain-text query: the first accession-shaped token of every non-empty line
/// counts once; lines without one are skipped with a warning.
pub fn parse_txt(input: &str) -> ParseOutcome {
    let scan = Regex::new(ACCESSION_SCAN).unwrap();
    let mut outcome = ParseOutcome::default();

    for (index, line) in input.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match scan.find(line) {
            Some(hit) => {
                if let Ok(accession) = hit.as_str().parse::<Accession>() {
                    outcome.bump(accession);
                }
            }
            None => outcome.warnings.push(format!(
                "line {}: no accession found in {:?}",
                index + 1,
                line.trim()
            )),
        }
    }
    outcome
}

/// Token scan state for CSV records: accessions attach to the most recently
/// seen non-accession token.
enum ScanState {
    SeekingIdentifier,
    Collecting(String),
}

/// CSV query: whitespace becomes `_`, lines split on the literal `"<,|_>"`
/// pattern, quotes are stripped from tokens. Accession tokens join the current
/// identifier's group and count globally; any other token opens a new group.
/// The current identifier carries across lines.
pub fn parse_csv(input: &str) -> ParseOutcome {
    let boundary = Regex::new(r#""[,_]""#).unwrap();
    let mut outcome = ParseOutcome::default();
    let mut state = ScanState::SeekingIdentifier;

    for line in input.lines() {
        let flattened: String = line
            .chars()
            .map(|ch| if ch.is_whitespace() { '_' } else { ch })
            .collect();

        for raw_token in boundary.split(&flattened) {
            let token = raw_token.trim_matches('"');
            if token.is_empty() {
                continue;
            }
            match token.parse::<Accession>() {
                Ok(accession) => {
                    if let ScanState::Collecting(identifier) = &state {
                        group_entry(&mut outcome.groups, identifier)
                            .accessions
                            .push(accession.clone());
                    }
                    outcome.bump(accession);
                }
                Err(_) => state = ScanState::Collecting(token.to_string()),
            }
        }
    }
    outcome
}

fn group_entry<'a>(
    groups: &'a mut Vec<IdentifierGroup>,
    identifier: &str,
) -> &'a mut IdentifierGroup {
    let index = match groups.iter().position(|group| group.identifier == identifier) {
        Some(index) => index,
        None => {
            groups.push(IdentifierGroup {
                identifier: identifier.to_string(),
                accessions: Vec::new(),
            });
            groups.len() - 1
        }
    };
    &mut groups[index]
}

/// Filter-role parsing: every line is an identifier taken verbatim, with
/// trailing whitespace trimmed and interior whitespace turned into `_` to
/// match the CSV identifier normalization.
pub fn parse_identifier_list(input: &str) -> BTreeSet<String> {
    let mut accepted = BTreeSet::new();
    for line in input.lines() {
        let trimmed = line.trim_end();
        if trimmed.is_empty() {
            continue;
        }
        let identifier: String = trimmed
            .chars()
            .map(|ch| if ch.is_whitespace() { '_' } else { ch })
            .collect();
        accepted.insert(identifier);
    }
    accepted
}
