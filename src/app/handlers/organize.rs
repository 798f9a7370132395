//! Handler für Verschieben, Drahtsynthese und Layer-Übersicht.

use crate::app::use_cases::{self, LayerSummary, MoveReport, WireReport};
use crate::app::AppState;
use crate::error::{OrganizerError, OrganizerResult};

/// Verschiebt die Selektion; ein leerer Basisname bedeutet "kein Ersatz".
pub fn move_selection(
    state: &mut AppState,
    layer_name: &str,
    file_base_name: Option<&str>,
) -> OrganizerResult<MoveReport> {
    let layer_name = layer_name.trim();
    if layer_name.is_empty() {
        return Err(OrganizerError::InvalidInput("layerName is empty".to_string()));
    }

    let replacement = file_base_name
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(|name| state.options.asset_library().path_for(name));
    use_cases::move_selection_to_layer(state, layer_name, replacement.as_deref())
}

pub fn synthesize_wires(state: &mut AppState, enable_wire_creation: bool) -> OrganizerResult<WireReport> {
    use_cases::synthesize_register_wires(state, enable_wire_creation)
}

/// Layer-Übersicht des offenen Dokuments.
pub fn layer_summary(state: &AppState) -> OrganizerResult<Vec<LayerSummary>> {
    let doc = state.document.as_ref().ok_or(OrganizerError::NoDocument)?;
    Ok(use_cases::layer_summary(doc))
}
