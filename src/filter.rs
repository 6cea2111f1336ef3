use std::collections::BTreeSet;

use crate::extract::ParseOutcome;

/// Restrict fetching to accessions named by at least one accepted identifier.
/// Everything else stays in the tally (and in the log) but is not fetched.
pub fn apply_filter(outcome: &mut ParseOutcome, accepted: &BTreeSet<String>) {
    for tally in outcome.tallies.values_mut() {
        tally.selected = false;
    }
    for group in &outcome.groups {
        if !accepted.contains(&group.identifier) {
            continue;
        }
        for accession in &group.accessions {
            if let Some(tally) = outcome.tallies.get_mut(accession) {
                tally.selected = true;
            }
        }
    }
}
