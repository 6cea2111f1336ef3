use std::fs;
use std::time::{Duration, Instant};

use camino::Utf8PathBuf;
use serde::Serialize;

use crate::confirm::{Confirmer, GroupView};
use crate::domain::QueryKind;
use crate::entrez::EntrezClient;
use crate::error::AccfetchError;
use crate::extract::{self, ParseOutcome};
use crate::filter;
use crate::header::{self, HeaderOptions};
use crate::output::{self, FastaWriter};

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub query: Utf8PathBuf,
    pub list: Option<Utf8PathBuf>,
    pub header: HeaderOptions,
}

#[derive(Debug, Clone, Serialize)]
pub struct FetchResult {
    pub items: Vec<FetchItemResult>,
    pub output_path: String,
    pub log_path: Option<String>,
    pub parsed: usize,
    pub skipped: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct FetchItemResult {
    pub accession: String,
    pub count: u32,
    pub seconds: u64,
    pub bytes: usize,
}

#[derive(Debug, Clone)]
pub struct ProgressEvent {
    pub message: String,
    pub elapsed: Option<Duration>,
}

pub trait ProgressSink {
    fn event(&self, event: ProgressEvent);
}

pub struct App<E: EntrezClient> {
    entrez: E,
}

impl<E: EntrezClient> App<E> {
    pub fn new(entrez: E) -> Self {
        Self { entrez }
    }

    /// Full run: parse -> confirm -> log -> fetch loop. Fully sequential; the
    /// tally map is complete before the first fetch.
    pub fn run(
        &self,
        options: &RunOptions,
        confirmer: &mut dyn Confirmer,
        sink: &dyn ProgressSink,
    ) -> Result<FetchResult, AccfetchError> {
        let query_path = options.query.as_path();
        if !query_path.exists() {
            return Err(AccfetchError::MissingInput(options.query.clone()));
        }
        let kind = QueryKind::from_path(query_path);
        if options.list.is_some() && kind == QueryKind::Txt {
            return Err(AccfetchError::ListWithTxtQuery(options.query.clone()));
        }

        let input = fs::read_to_string(query_path.as_std_path())
            .map_err(|_| AccfetchError::QueryRead(options.query.clone()))?;

        sink.event(ProgressEvent {
            message: format!("phase=Parse; reading {query_path} as {kind}"),
            elapsed: None,
        });
        let mut outcome = match kind {
            QueryKind::Csv => extract::parse_csv(&input),
            QueryKind::Txt => extract::parse_txt(&input),
        };
        for warning in &outcome.warnings {
            sink.event(ProgressEvent {
                message: format!("warning: {warning}"),
                elapsed: None,
            });
        }

        if kind == QueryKind::Csv {
            let views = group_views(&outcome);
            if !confirmer.confirm(&views, false)? {
                return Err(AccfetchError::ParsingRejected);
            }
        }

        let filtered = match &options.list {
            Some(list_path) => {
                if !list_path.as_path().exists() {
                    return Err(AccfetchError::MissingInput(list_path.clone()));
                }
                let list_input = fs::read_to_string(list_path.as_std_path())
                    .map_err(|_| AccfetchError::ListRead(list_path.clone()))?;
                let accepted = extract::parse_identifier_list(&list_input);
                filter::apply_filter(&mut outcome, &accepted);

                let views = group_views(&outcome);
                if !confirmer.confirm(&views, true)? {
                    return Err(AccfetchError::ParsingRejected);
                }
                true
            }
            None => false,
        };

        let log_path = Utf8PathBuf::from(format!("{}.log", options.query));
        let log_path = match output::write_tally_log(&log_path, &outcome.tallies) {
            Ok(()) => Some(log_path),
            Err(err) => {
                tracing::warn!("tally log {log_path} not written: {err}");
                sink.event(ProgressEvent {
                    message: format!("warning: could not write tally log {log_path}: {err}"),
                    elapsed: None,
                });
                None
            }
        };

        let output_path = if filtered {
            Utf8PathBuf::from(format!("{}_list.fas", options.query))
        } else {
            Utf8PathBuf::from(format!("{}.fas", options.query))
        };
        let mut writer = FastaWriter::create(&output_path)?;

        let mut items = Vec::new();
        let mut skipped = 0usize;
        for (accession, tally) in &outcome.tallies {
            if !tally.selected {
                skipped += 1;
                continue;
            }

            sink.event(ProgressEvent {
                message: format!("phase=Fetch; requesting {accession}"),
                elapsed: None,
            });
            let started = Instant::now();
            let raw = self.entrez.fetch_fasta(accession)?;
            let elapsed = started.elapsed();

            let record = header::sanitize_record(&raw, accession, &options.header);
            let bytes = writer.append(&record)?;
            sink.event(ProgressEvent {
                message: format!("phase=Fetch; wrote {accession}"),
                elapsed: Some(elapsed),
            });
            items.push(FetchItemResult {
                accession: accession.as_str().to_string(),
                count: tally.count,
                seconds: elapsed.as_secs(),
                bytes,
            });
        }
        writer.finish()?;

        Ok(FetchResult {
            parsed: outcome.tallies.len(),
            skipped,
            items,
            output_path: output_path.into_string(),
            log_path: log_path.map(Utf8PathBuf::into_string),
        })
    }
}

/// Confirmation views: groups sorted by identifier, each accession paired with
/// its current selection state.
fn group_views(outcome: &ParseOutcome) -> Vec<GroupView> {
    let mut views: Vec<GroupView> = outcome
        .groups
        .iter()
        .map(|group| GroupView {
            identifier: group.identifier.clone(),
            accessions: group
                .accessions
                .iter()
                .map(|accession| {
                    let selected = outcome
                        .tallies
                        .get(accession)
                        .map(|tally| tally.selected)
                        .unwrap_or(false);
                    (accession.clone(), selected)
                })
                .collect(),
        })
        .collect();
    views.sort_by(|a, b| a.identifier.cmp(&b.identifier));
    views
}
