use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};

use camino::Utf8Path;
use serde::Serialize;

use crate::domain::Accession;
use crate::error::AccfetchError;
use crate::extract::AccessionTally;

/// One `accession,count` line per parsed accession, sorted by accession.
pub fn write_tally_log(
    path: &Utf8Path,
    tallies: &BTreeMap<Accession, AccessionTally>,
) -> io::Result<()> {
    let mut file = fs::File::create(path.as_std_path())?;
    for (accession, tally) in tallies {
        writeln!(file, "{},{}", accession, tally.count)?;
    }
    file.flush()
}

pub struct FastaWriter {
    file: fs::File,
}

impl FastaWriter {
    pub fn create(path: &Utf8Path) -> Result<Self, AccfetchError> {
        let file = fs::File::create(path.as_std_path())
            .map_err(|err| AccfetchError::OutputWrite(format!("create {path}: {err}")))?;
        Ok(Self { file })
    }

    /// Append one record, returning the bytes written. Records are kept
    /// newline-terminated so they never run together.
    pub fn append(&mut self, record: &str) -> Result<usize, AccfetchError> {
        self.file
            .write_all(record.as_bytes())
            .map_err(|err| AccfetchError::OutputWrite(err.to_string()))?;
        let mut written = record.len();
        if !record.ends_with('\n') {
            self.file
                .write_all(b"\n")
                .map_err(|err| AccfetchError::OutputWrite(err.to_string()))?;
            written += 1;
        }
        Ok(written)
    }

    pub fn finish(mut self) -> Result<(), AccfetchError> {
        self.file
            .flush()
            .map_err(|err| AccfetchError::OutputWrite(err.to_string()))
    }
}

pub struct JsonOutput;

impl JsonOutput {
    pub fn print_fetch(result: &crate::app::FetchResult) -> io::Result<()> {
        Self::print_json(result)
    }

    fn print_json<T: Serialize>(value: &T) -> io::Result<()> {
        let json = serde_json::to_string_pretty(value)
            .map_err(|err| io::Error::new(io::ErrorKind::Other, err))?;
        let mut stdout = io::stdout();
        stdout.write_all(json.as_bytes())?;
        stdout.write_all(b"\n")?;
        Ok(())
    }
}

impl crate::app::ProgressSink for JsonOutput {
    fn event(&self, _event: crate::app::ProgressEvent) {}
}
