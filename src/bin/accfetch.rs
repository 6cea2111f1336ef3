use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use camino::Utf8PathBuf;
use clap::Parser;
use miette::IntoDiagnostic;
use tracing_subscriber::EnvFilter;

use accfetch::app::{App, FetchResult, ProgressEvent, ProgressSink, RunOptions};
use accfetch::confirm::{Confirmer, GroupView, parse_answer};
use accfetch::entrez::EntrezHttpClient;
use accfetch::error::AccfetchError;
use accfetch::header::HeaderOptions;
use accfetch::output::JsonOutput;

const MANUAL: &str = "\
Query files:
  A .csv query (case-insensitive extension) is scanned record-wise: quoted \
tokens that look like accessions (one or two uppercase letters followed by \
3-7 digits) are collected under the most recently seen non-accession token, \
the record's identifier. Any other extension is read as plain text, one \
accession per line (first match in the line wins; lines without one are \
skipped with a warning).

List files:
  --list names a plain-text file of identifiers, one per line. Only \
accessions belonging to at least one listed identifier are downloaded; \
everything parsed still lands in the tally log. The parsed grouping is shown \
for confirmation before anything is written, a second time once the list is \
applied.

Outputs:
  <query>.fas (or <query>_list.fas when --list is used) holds one FASTA \
record per downloaded accession, headers cleaned and capped at --desc \
characters. <query>.log records accession,count for every parsed accession.

Environment:
  NCBI_API_KEY    forwarded to Entrez as the api_key parameter.
  RUST_LOG        tracing filter for diagnostic output on stderr.";

#[derive(Parser)]
#[command(name = "accfetch")]
#[command(about = "Download nucleotide sequences from NCBI Entrez as FASTA, driven by accession lists")]
#[command(version, author)]
#[command(after_long_help = MANUAL)]
struct Cli {
    /// Accession list to download (.csv parses record-wise, anything else line-wise)
    #[arg(long)]
    query: Utf8PathBuf,

    /// Identifier list restricting which CSV records are downloaded
    #[arg(long)]
    list: Option<Utf8PathBuf>,

    /// Maximum header description length
    #[arg(long, default_value_t = 50)]
    desc: usize,

    /// Keep the whole header description (--desc is ignored)
    #[arg(long)]
    full_desc: bool,

    /// Preserve header whitespace instead of squashing it to underscores
    #[arg(long)]
    whitespaces: bool,

    /// Print the run summary as JSON and never prompt
    #[arg(long)]
    non_interactive: bool,
}

fn main() -> ExitCode {
    if let Err(report) = run() {
        eprintln!("{report:?}");
        if let Some(err) = report.downcast_ref::<AccfetchError>() {
            return ExitCode::from(map_exit_code(err));
        }
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn map_exit_code(error: &AccfetchError) -> u8 {
    match error {
        AccfetchError::MissingInput(_)
        | AccfetchError::QueryRead(_)
        | AccfetchError::ListRead(_)
        | AccfetchError::ListWithTxtQuery(_) => 2,
        AccfetchError::EntrezHttp(_) => 3,
        AccfetchError::ParsingRejected => 4,
        _ => 1,
    }
}

fn run() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let options = RunOptions {
        query: cli.query,
        list: cli.list,
        header: HeaderOptions {
            desc_len: cli.desc,
            full_desc: cli.full_desc,
            keep_whitespace: cli.whitespaces,
        },
    };

    let entrez = EntrezHttpClient::new().into_diagnostic()?;
    let app = App::new(entrez);

    if cli.non_interactive {
        let mut confirmer = NonInteractiveConfirmer;
        let result = app.run(&options, &mut confirmer, &JsonOutput)?;
        JsonOutput::print_fetch(&result).into_diagnostic()?;
    } else {
        let mut confirmer = TerminalConfirmer;
        let result = app.run(&options, &mut confirmer, &TextProgress)?;
        print_fetch_summary(&result);
    }
    Ok(())
}

/// Refuses the gate outright: JSON mode cannot block on a prompt.
struct NonInteractiveConfirmer;

impl Confirmer for NonInteractiveConfirmer {
    fn confirm(&mut self, _groups: &[GroupView], _filtered: bool) -> Result<bool, AccfetchError> {
        Err(AccfetchError::ConfirmationUnavailable)
    }
}

struct TerminalConfirmer;

impl Confirmer for TerminalConfirmer {
    fn confirm(&mut self, groups: &[GroupView], filtered: bool) -> Result<bool, AccfetchError> {
        print_groups(groups, filtered);

        let stdin = io::stdin();
        loop {
            print!("Continue with these accessions? [y/n] ");
            io::stdout()
                .flush()
                .map_err(|err| AccfetchError::PromptIo(err.to_string()))?;

            let mut answer = String::new();
            let read = stdin
                .lock()
                .read_line(&mut answer)
                .map_err(|err| AccfetchError::PromptIo(err.to_string()))?;
            if read == 0 {
                return Err(AccfetchError::PromptIo("stdin closed".to_string()));
            }
            if let Some(answer) = parse_answer(&answer) {
                return Ok(answer);
            }
        }
    }
}

fn print_groups(groups: &[GroupView], filtered: bool) {
    let green = "\x1b[32m";
    let red = "\x1b[31m";
    let cyan = "\x1b[36m";
    let reset = "\x1b[0m";

    if filtered {
        println!("{cyan}Parsed identifiers after list filter:{reset}");
    } else {
        println!("{cyan}Parsed identifiers and accessions:{reset}");
    }
    for group in groups {
        println!("  {}", group.identifier);
        for (accession, selected) in &group.accessions {
            if !filtered {
                println!("    {accession}");
            } else if *selected {
                println!("    {green}{accession} (selected){reset}");
            } else {
                println!("    {red}{accession} (skipped){reset}");
            }
        }
    }
}

struct TextProgress;

impl ProgressSink for TextProgress {
    fn event(&self, event: ProgressEvent) {
        let yellow = "\x1b[33m";
        let reset = "\x1b[0m";

        if event.message.starts_with("warning:") {
            eprintln!("{yellow}{}{reset}", event.message);
        } else if let Some(elapsed) = event.elapsed {
            println!("{} ({} s)", event.message, elapsed.as_secs());
        } else {
            println!("{}", event.message);
        }
    }
}

fn print_fetch_summary(result: &FetchResult) {
    let green = "\x1b[32m";
    let yellow = "\x1b[33m";
    let cyan = "\x1b[36m";
    let reset = "\x1b[0m";

    println!("{cyan}accfetch summary{reset}");
    println!(
        "{green}Downloaded {} of {} parsed accessions{reset}",
        result.items.len(),
        result.parsed
    );
    if result.skipped > 0 {
        println!("{yellow}Skipped {} deselected accessions{reset}", result.skipped);
    }
    for item in &result.items {
        println!(
            "{green}  {} x{} ({} s, {} bytes){reset}",
            item.accession, item.count, item.seconds, item.bytes
        );
    }
    println!("{cyan}FASTA: {}{reset}", result.output_path);
    match &result.log_path {
        Some(path) => println!("{cyan}Log:   {path}{reset}"),
        None => println!("{yellow}Log:   not written{reset}"),
    }
}
