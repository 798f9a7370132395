//! Akkumulator für Batch-Operationen: Einzelfehler werden gezählt und geloggt,
//! der Batch läuft weiter.

use crate::core::EntityId;
use crate::error::{OrganizerError, OrganizerResult};

/// Ein einzelnes fehlgeschlagenes Element eines Batches.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemFailure {
    pub entity: Option<EntityId>,
    pub error: OrganizerError,
}

/// Sammelt Einzelergebnisse eines Batches.
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    operation: &'static str,
    failures: Vec<ItemFailure>,
    degenerate: usize,
}

impl BatchOutcome {
    /// Neuer Akkumulator; `operation` erscheint in den Log-Meldungen.
    pub fn new(operation: &'static str) -> Self {
        Self {
            operation,
            failures: Vec::new(),
            degenerate: 0,
        }
    }

    /// Wertet ein Einzelergebnis aus.
    ///
    /// Degenerierte Geometrie gilt als übersprungen, nicht als Fehler.
    pub fn record<T>(&mut self, entity: Option<EntityId>, result: OrganizerResult<T>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(OrganizerError::GeometryDegenerate(reason)) => {
                log::debug!("{}: {:?} übersprungen ({})", self.operation, entity, reason);
                self.degenerate += 1;
                None
            }
            Err(error) => {
                log::warn!("{}: {:?} fehlgeschlagen: {}", self.operation, entity, error);
                self.failures.push(ItemFailure { entity, error });
                None
            }
        }
    }

    pub fn failures(&self) -> &[ItemFailure] {
        &self.failures
    }

    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }

    /// Anzahl wegen degenerierter Geometrie übersprungener Elemente.
    pub fn degenerate_count(&self) -> usize {
        self.degenerate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn degenerate_geometry_is_not_a_failure() {
        let mut batch = BatchOutcome::new("Test");

        let ok = batch.record(Some(EntityId(1)), Ok(5));
        let degenerate: Option<()> = batch.record(
            Some(EntityId(2)),
            Err(OrganizerError::GeometryDegenerate("zu kurz".into())),
        );
        let failed: Option<()> = batch.record(
            None,
            Err(OrganizerError::HostOperationFailed("gesperrt".into())),
        );

        assert_eq!(ok, Some(5));
        assert!(degenerate.is_none());
        assert!(failed.is_none());
        assert_eq!(batch.degenerate_count(), 1);
        assert_eq!(batch.failure_count(), 1);
        assert_eq!(batch.failures()[0].entity, None);
    }
}
