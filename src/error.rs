use camino::Utf8PathBuf;
use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum AccfetchError {
    #[error("invalid accession: {0}")]
    InvalidAccession(String),

    #[error("input file not found: {0}")]
    MissingInput(Utf8PathBuf),

    #[error("failed to read query file at {0}")]
    QueryRead(Utf8PathBuf),

    #[error("failed to read list file at {0}")]
    ListRead(Utf8PathBuf),

    #[error("--list applies only to CSV queries; {0} parses as plain text")]
    ListWithTxtQuery(Utf8PathBuf),

    #[error("accession parsing rejected at confirmation prompt")]
    ParsingRejected,

    #[error("confirmation required; rerun without --non-interactive")]
    ConfirmationUnavailable,

    #[error("failed to read confirmation answer: {0}")]
    PromptIo(String),

    #[error("Entrez request failed: {0}")]
    EntrezHttp(String),

    #[error("failed to write output: {0}")]
    OutputWrite(String),
}
