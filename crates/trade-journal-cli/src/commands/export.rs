use std::fs::File;
use std::io::{self, BufWriter};

use clap::Args;
use serde_json::{json, Value};

use trade_journal_core::export::{export_csv, parse_csv};
use trade_journal_core::AnalyticsConfig;

use super::journal::{load_prepared, CmdResult, JournalArgs};
use crate::input;

/// Arguments for the spreadsheet export
#[derive(Args)]
pub struct ExportCsvArgs {
    #[command(flatten)]
    pub journal: JournalArgs,
    /// Destination file; stdout when omitted
    #[arg(long)]
    pub out: Option<String>,
}

/// Writes the CSV itself. Returns a summary only when writing to a file, so
/// stdout holds nothing but CSV otherwise.
pub fn run_export_csv(args: ExportCsvArgs, cfg: Option<&AnalyticsConfig>) -> CmdResult {
    let p = load_prepared(&args.journal, cfg)?;
    match args.out {
        Some(path) => {
            let file = File::create(&path)
                .map_err(|e| format!("Failed to create '{}': {}", path, e))?;
            export_csv(BufWriter::new(file), &p.trades, p.config.pnl_scale)?;
            tracing::info!(rows = p.trades.len(), path = %path, "csv written");
            Ok(json!({ "rows": p.trades.len(), "path": path }))
        }
        None => {
            export_csv(io::stdout().lock(), &p.trades, p.config.pnl_scale)?;
            Ok(Value::Null)
        }
    }
}

/// Arguments for reading an export back
#[derive(Args)]
pub struct ImportCsvArgs {
    /// Path to a CSV export
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_import_csv(args: ImportCsvArgs) -> CmdResult {
    let text = if let Some(ref path) = args.input {
        input::file::read_text(path)?
    } else if let Some(data) = input::stdin::read_stdin_text()? {
        data
    } else {
        return Err("--input <journal.csv> or stdin required".into());
    };
    let rows = parse_csv(text.as_bytes())?;
    Ok(json!({ "rows": rows.len(), "results": rows }))
}
