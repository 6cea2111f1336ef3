use std::fs;
use std::sync::Mutex;

use assert_matches::assert_matches;
use camino::Utf8PathBuf;

use accfetch::app::{App, ProgressEvent, ProgressSink, RunOptions};
use accfetch::confirm::{Confirmer, GroupView};
use accfetch::domain::Accession;
use accfetch::entrez::EntrezClient;
use accfetch::error::AccfetchError;
use accfetch::header::HeaderOptions;

struct MockEntrez {
    calls: Mutex<Vec<String>>,
}

impl MockEntrez {
    fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
        }
    }

    fn fetched(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl EntrezClient for &MockEntrez {
    fn fetch_fasta(&self, accession: &Accession) -> Result<String, AccfetchError> {
        self.calls.lock().unwrap().push(accession.as_str().to_string());
        Ok(format!(
            ">gi|1|gb|{acc}.1|{acc} Mus musculus mRNA, clone: x\nATGCATGC\n",
            acc = accession.as_str()
        ))
    }
}

struct ScriptedConfirmer {
    answers: Vec<bool>,
    calls: usize,
    seen: Vec<Vec<(String, bool)>>,
}

impl ScriptedConfirmer {
    fn answering(answers: &[bool]) -> Self {
        Self {
            answers: answers.to_vec(),
            calls: 0,
            seen: Vec::new(),
        }
    }
}

impl Confirmer for ScriptedConfirmer {
    fn confirm(&mut self, groups: &[GroupView], _filtered: bool) -> Result<bool, AccfetchError> {
        self.seen.push(
            groups
                .iter()
                .flat_map(|group| {
                    group
                        .accessions
                        .iter()
                        .map(|(accession, selected)| (accession.as_str().to_string(), *selected))
                })
                .collect(),
        );
        let answer = self.answers.get(self.calls).copied().unwrap_or(true);
        self.calls += 1;
        Ok(answer)
    }
}

#[derive(Default)]
struct RecordingSink {
    events: Mutex<Vec<String>>,
}

impl RecordingSink {
    fn warnings(&self) -> Vec<String> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|message| message.starts_with("warning:"))
            .cloned()
            .collect()
    }
}

impl ProgressSink for RecordingSink {
    fn event(&self, event: ProgressEvent) {
        self.events.lock().unwrap().push(event.message);
    }
}

fn options(query: Utf8PathBuf, list: Option<Utf8PathBuf>) -> RunOptions {
    RunOptions {
        query,
        list,
        header: HeaderOptions::default(),
    }
}

fn temp_file(dir: &tempfile::TempDir, name: &str, content: &str) -> Utf8PathBuf {
    let path = Utf8PathBuf::from_path_buf(dir.path().join(name)).unwrap();
    fs::write(path.as_std_path(), content).unwrap();
    path
}

#[test]
fn txt_end_to_end() {
    let temp = tempfile::tempdir().unwrap();
    let query = temp_file(&temp, "query.txt", "AB123456\nnot_an_acc\nAB123456\n");

    let entrez = MockEntrez::new();
    let app = App::new(&entrez);
    let sink = RecordingSink::default();
    let mut confirmer = ScriptedConfirmer::answering(&[]);

    let result = app
        .run(&options(query.clone(), None), &mut confirmer, &sink)
        .unwrap();

    // Plain-text queries have no identifier groups, so no gate.
    assert_eq!(confirmer.calls, 0);
    assert_eq!(sink.warnings().len(), 1);
    assert_eq!(entrez.fetched(), vec!["AB123456"]);

    assert_eq!(result.items.len(), 1);
    assert_eq!(result.items[0].count, 2);
    assert_eq!(result.parsed, 1);
    assert_eq!(result.skipped, 0);

    let log = fs::read_to_string(format!("{query}.log")).unwrap();
    assert_eq!(log, "AB123456,2\n");

    let fasta = fs::read_to_string(format!("{query}.fas")).unwrap();
    assert!(fasta.starts_with(">AB123456_AB123456_Mus_musculus_mRNA_clone_x\n"));
    assert!(fasta.contains("ATGCATGC"));
}

#[test]
fn csv_with_filter_fetches_only_selected() {
    let temp = tempfile::tempdir().unwrap();
    let query = temp_file(
        &temp,
        "query.csv",
        "\"id1\",\"AB123456\",\"AB123457\"\n\"id2\",\"AB123458\"\n",
    );
    let list = temp_file(&temp, "keep.txt", "id1\n");

    let entrez = MockEntrez::new();
    let app = App::new(&entrez);
    let sink = RecordingSink::default();
    let mut confirmer = ScriptedConfirmer::answering(&[true, true]);

    let result = app
        .run(&options(query.clone(), Some(list)), &mut confirmer, &sink)
        .unwrap();

    // One gate for raw parsing, one after the filter resolves.
    assert_eq!(confirmer.calls, 2);
    assert_eq!(entrez.fetched(), vec!["AB123456", "AB123457"]);
    assert_eq!(result.skipped, 1);
    assert_eq!(result.parsed, 3);

    // Second gate saw the deselected accession marked off.
    assert!(confirmer.seen[1].contains(&("AB123458".to_string(), false)));
    assert!(confirmer.seen[1].contains(&("AB123456".to_string(), true)));

    // All three accessions still reach the log.
    let log = fs::read_to_string(format!("{query}.log")).unwrap();
    assert_eq!(log, "AB123456,1\nAB123457,1\nAB123458,1\n");

    assert!(result.output_path.ends_with("query.csv_list.fas"));
    let fasta = fs::read_to_string(&result.output_path).unwrap();
    assert!(fasta.contains(">AB123456_"));
    assert!(!fasta.contains(">AB123458"));
}

#[test]
fn csv_without_filter_confirms_once() {
    let temp = tempfile::tempdir().unwrap();
    let query = temp_file(&temp, "query.csv", "\"id1\",\"AB123456\"\n");

    let entrez = MockEntrez::new();
    let app = App::new(&entrez);
    let mut confirmer = ScriptedConfirmer::answering(&[true]);

    let result = app
        .run(
            &options(query.clone(), None),
            &mut confirmer,
            &RecordingSink::default(),
        )
        .unwrap();

    assert_eq!(confirmer.calls, 1);
    assert!(result.output_path.ends_with("query.csv.fas"));
}

#[test]
fn rejected_confirmation_writes_nothing() {
    let temp = tempfile::tempdir().unwrap();
    let query = temp_file(&temp, "query.csv", "\"id1\",\"AB123456\"\n");

    let entrez = MockEntrez::new();
    let app = App::new(&entrez);
    let mut confirmer = ScriptedConfirmer::answering(&[false]);

    let err = app
        .run(
            &options(query.clone(), None),
            &mut confirmer,
            &RecordingSink::default(),
        )
        .unwrap_err();

    assert_matches!(err, AccfetchError::ParsingRejected);
    assert!(entrez.fetched().is_empty());
    assert!(!fs::exists(format!("{query}.fas")).unwrap());
    assert!(!fs::exists(format!("{query}.log")).unwrap());
}

#[test]
fn missing_query_is_fatal() {
    let entrez = MockEntrez::new();
    let app = App::new(&entrez);
    let mut confirmer = ScriptedConfirmer::answering(&[]);

    let err = app
        .run(
            &options(Utf8PathBuf::from("no_such_file.txt"), None),
            &mut confirmer,
            &RecordingSink::default(),
        )
        .unwrap_err();

    assert_matches!(err, AccfetchError::MissingInput(_));
}

#[test]
fn list_with_txt_query_is_a_usage_error() {
    let temp = tempfile::tempdir().unwrap();
    let query = temp_file(&temp, "query.txt", "AB123456\n");
    let list = temp_file(&temp, "keep.txt", "id1\n");

    let entrez = MockEntrez::new();
    let app = App::new(&entrez);
    let mut confirmer = ScriptedConfirmer::answering(&[]);

    let err = app
        .run(
            &options(query, Some(list)),
            &mut confirmer,
            &RecordingSink::default(),
        )
        .unwrap_err();

    assert_matches!(err, AccfetchError::ListWithTxtQuery(_));
}

#[test]
fn fetches_run_in_accession_order() {
    let temp = tempfile::tempdir().unwrap();
    let query = temp_file(&temp, "query.txt", "U49845\nAB123456\nZ78533\n");

    let entrez = MockEntrez::new();
    let app = App::new(&entrez);
    let mut confirmer = ScriptedConfirmer::answering(&[]);

    app.run(
        &options(query, None),
        &mut confirmer,
        &RecordingSink::default(),
    )
    .unwrap();

    assert_eq!(entrez.fetched(), vec!["AB123456", "U49845", "Z78533"]);
}
