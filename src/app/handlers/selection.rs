//! Handler für Selektions-Benachrichtigungen des Hosts.

use crate::app::AppState;
use crate::core::{EntityId, Selectable};
use crate::error::{OrganizerError, OrganizerResult};

/// Setzt die Selektion auf die übergebenen Element-IDs und benachrichtigt Abonnenten.
///
/// Unbekannte IDs werden verworfen.
pub fn host_set_selection(state: &mut AppState, ids: &[u64]) -> OrganizerResult<()> {
    let items = ids.iter().map(|id| Selectable::Entity(EntityId(*id)));
    if !state.set_selection(items) {
        return Err(OrganizerError::NoDocument);
    }
    Ok(())
}
