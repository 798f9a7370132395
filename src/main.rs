//! HVAC Duct Organizer: Bridge-Host.
//!
//! Liest pro Zeile einen Command von stdin und schreibt pro Zeile die Antwort
//! nach stdout. Logs gehen nach stderr.
//!
//! Aufruf: `hvac-duct-organizer [--document <snapshot.json>] [--options <datei.toml>]`

use std::io::{BufRead, Write};
use std::path::PathBuf;

use anyhow::Context;
use hvac_duct_organizer::{AppState, Bridge, DocumentSnapshot, OrganizerOptions};

#[derive(Debug, Default)]
struct Args {
    document: Option<PathBuf>,
    options: Option<PathBuf>,
}

impl Args {
    fn parse(args: impl Iterator<Item = String>) -> anyhow::Result<Self> {
        let mut parsed = Self::default();
        let mut args = args;
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--document" => {
                    parsed.document = Some(args.next().context("--document erwartet einen Pfad")?.into());
                }
                "--options" => {
                    parsed.options = Some(args.next().context("--options erwartet einen Pfad")?.into());
                }
                other => anyhow::bail!("Unbekanntes Argument: {other}"),
            }
        }
        Ok(parsed)
    }
}

fn main() -> anyhow::Result<()> {
    // Logger initialisieren
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    log::info!(
        "HVAC Duct Organizer v{} startet...",
        env!("CARGO_PKG_VERSION")
    );

    let args = Args::parse(std::env::args().skip(1))?;

    let options_path = args.options.unwrap_or_else(OrganizerOptions::config_path);
    let mut state = AppState::new().with_options(OrganizerOptions::load_from_file(&options_path));

    if let Some(path) = args.document {
        let json = std::fs::read_to_string(&path)
            .with_context(|| format!("Snapshot nicht lesbar: {}", path.display()))?;
        let document = DocumentSnapshot::from_json(&json)
            .with_context(|| format!("Snapshot fehlerhaft: {}", path.display()))?
            .into_document()?;
        state.open_document(document);
    }

    let mut bridge = Bridge::new(state)?;
    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout().lock();

    for line in stdin.lock().lines() {
        let line = line.context("stdin nicht lesbar")?;
        if line.trim().is_empty() {
            continue;
        }
        let reply = bridge.handle_line(&line);
        writeln!(stdout, "{reply}")?;
        stdout.flush()?;
    }

    let state = bridge.shutdown();
    log::info!(
        "Sitzung beendet nach {} Commands ({} fehlgeschlagen)",
        state.command_log.len(),
        state.command_log.failure_count()
    );
    Ok(())
}
