//! Protokoll der über die Bridge ausgeführten Commands mit Ergebnis.

use super::CommandReply;
use crate::error::OrganizerResult;

/// Ausgang eines Commands, wie er im Protokoll steht.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutcome {
    Succeeded,
    /// Fehlertext, so wie er als `ERROR:` an das Panel geht
    Failed(String),
}

/// Ein Protokolleintrag: Bridge-Name des Commands und sein Ausgang.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandRecord {
    pub name: &'static str,
    pub outcome: CommandOutcome,
}

impl CommandRecord {
    /// Gibt zurück, ob der Command fehlgeschlagen ist.
    pub fn failed(&self) -> bool {
        matches!(self.outcome, CommandOutcome::Failed(_))
    }
}

/// Begrenztes Protokoll in Ausführungsreihenfolge.
#[derive(Debug, Default)]
pub struct CommandLog {
    records: Vec<CommandRecord>,
}

impl CommandLog {
    const MAX_ENTRIES: usize = 1000;

    pub fn new() -> Self {
        Self::default()
    }

    /// Protokolliert Name und Ausgang eines Commands.
    /// Bei MAX_ENTRIES wird die ältere Hälfte verworfen.
    pub fn record(&mut self, name: &'static str, result: &OrganizerResult<CommandReply>) {
        if self.records.len() >= Self::MAX_ENTRIES {
            self.records.drain(..Self::MAX_ENTRIES / 2);
        }
        let outcome = match result {
            Ok(_) => CommandOutcome::Succeeded,
            Err(e) => CommandOutcome::Failed(e.to_string()),
        };
        self.records.push(CommandRecord { name, outcome });
    }

    /// Gibt die Anzahl protokollierter Commands zurück.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Gibt alle Einträge in Ausführungsreihenfolge zurück.
    pub fn records(&self) -> &[CommandRecord] {
        &self.records
    }

    /// Gibt die Anzahl fehlgeschlagener Commands zurück.
    pub fn failure_count(&self) -> usize {
        self.records.iter().filter(|r| r.failed()).count()
    }

    /// Der zuletzt ausgeführte Command.
    pub fn last(&self) -> Option<&CommandRecord> {
        self.records.last()
    }
}
