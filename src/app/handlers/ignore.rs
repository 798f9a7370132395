//! Handler für den Ignore-Modus.

use crate::app::ignore_mode::IgnoreOutcome;
use crate::app::AppState;
use crate::error::OrganizerResult;

pub fn toggle(state: &mut AppState) -> OrganizerResult<bool> {
    state
        .ignore_mode
        .toggle(state.document.as_mut(), &state.options)
}

pub fn set_mode(state: &mut AppState, active: bool) -> OrganizerResult<bool> {
    state
        .ignore_mode
        .set_mode(state.document.as_mut(), active, &state.options)
}

pub fn apply(state: &mut AppState) -> OrganizerResult<IgnoreOutcome> {
    state
        .ignore_mode
        .apply_ignore(state.document.as_mut(), &state.options)
}

pub fn status(state: &AppState) -> String {
    state.ignore_mode.status()
}

/// Panel-Abbau: erzwingt die Deaktivierung.
pub fn cleanup(state: &mut AppState) {
    state.ignore_mode.cleanup(state.document.as_mut());
}
