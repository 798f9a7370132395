//! Zentrale Konfiguration des HVAC-Organizers.
//!
//! `OrganizerOptions` enthält alle zur Laufzeit änderbaren Werte.
//! Die `const`-Werte bleiben als Fallback/Default erhalten.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::core::{AssetLibrary, Rgb};

// ── Verdrahtung ─────────────────────────────────────────────────────

/// Max. Abstand Kanal-Endpunkt ↔ Register-Anker für eine Verbindung.
pub const CONNECTION_TOLERANCE: f32 = 50.0;
/// Endpunkte innerhalb dieses Abstands zu einem Ignore-Punkt werden nie verdrahtet.
pub const IGNORE_TOLERANCE: f32 = 5.0;
/// Kürzere Drähte werden verworfen.
pub const MIN_WIRE_LENGTH: f32 = 5.0;
/// Linienstärke synthetisierter Drähte.
pub const WIRE_STROKE_WIDTH: f32 = 1.0;
/// Akzentfarbe synthetisierter Drähte.
pub const WIRE_COLOR: [u8; 3] = [0, 112, 255];
/// Kennzeichnung synthetisierter Drähte (Pfad-Notiz).
pub const WIRE_TAG: &str = "register-wire";

// ── Verschieben ─────────────────────────────────────────────────────

/// Suchradius für verwaiste Ankermarker nach einem Asset-Austausch.
pub const REPLACE_RESCAN_TOLERANCE: f32 = 5.0;
/// Suchradius für verwaiste Ankermarker nach einfachem Verschieben.
pub const RELOCATE_RESCAN_TOLERANCE: f32 = 10.0;
/// Register-Anker gelten als bestückt, wenn ein Asset-Zentrum so nah liegt.
pub const REGISTER_ASSET_TOLERANCE: f32 = 5.0;

// ── Ignore-Vorschau ─────────────────────────────────────────────────

/// Deckkraft der Vorschau-Kopie in Prozent.
pub const PREVIEW_OPACITY: f32 = 40.0;
/// Konturfarbe der Vorschau.
pub const PREVIEW_COLOR: [u8; 3] = [255, 64, 160];
/// Kennzeichnung der Ignore-Marker.
pub const IGNORE_MARKER_TAG: &str = "ignore-marker";

// ── Laufzeit-Optionen (serialisierbar) ─────────────────────────────

/// Alle zur Laufzeit änderbaren Optionen.
/// Wird als `hvac_duct_organizer.toml` neben der Binary gespeichert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrganizerOptions {
    // ── Verdrahtung ─────────────────────────────────────────────
    /// Verbindungstoleranz Kanal-Endpunkt ↔ Register
    pub connection_tolerance: f32,
    /// Ausschlussradius um Ignore-Punkte
    pub ignore_tolerance: f32,
    /// Minimale Drahtlänge
    pub min_wire_length: f32,
    /// Linienstärke der Drähte
    pub wire_stroke_width: f32,
    /// Drahtfarbe (RGB)
    pub wire_color: [u8; 3],
    /// Notiz, an der synthetisierte Drähte erkannt werden
    pub wire_tag: String,

    // ── Verschieben ─────────────────────────────────────────────
    /// Rescan-Radius nach Asset-Austausch
    pub replace_rescan_tolerance: f32,
    /// Rescan-Radius nach einfachem Verschieben
    pub relocate_rescan_tolerance: f32,
    /// Radius, in dem ein Register-Anker als bestückt gilt
    pub register_asset_tolerance: f32,

    // ── Vorschau ────────────────────────────────────────────────
    /// Deckkraft der Vorschau-Kopie (Prozent)
    pub preview_opacity: f32,
    /// Konturfarbe der Vorschau (RGB)
    pub preview_color: [u8; 3],

    // ── Asset-Bibliothek ────────────────────────────────────────
    /// Verzeichnis der Komponenten-Bilder
    pub asset_root: PathBuf,
    /// Dateiendung der Komponenten-Bilder
    pub asset_extension: String,
    /// Suffix der Alternativ-Varianten (vor der Endung)
    pub alternate_suffix: String,
}

impl Default for OrganizerOptions {
    fn default() -> Self {
        Self {
            connection_tolerance: CONNECTION_TOLERANCE,
            ignore_tolerance: IGNORE_TOLERANCE,
            min_wire_length: MIN_WIRE_LENGTH,
            wire_stroke_width: WIRE_STROKE_WIDTH,
            wire_color: WIRE_COLOR,
            wire_tag: WIRE_TAG.to_string(),

            replace_rescan_tolerance: REPLACE_RESCAN_TOLERANCE,
            relocate_rescan_tolerance: RELOCATE_RESCAN_TOLERANCE,
            register_asset_tolerance: REGISTER_ASSET_TOLERANCE,

            preview_opacity: PREVIEW_OPACITY,
            preview_color: PREVIEW_COLOR,

            asset_root: PathBuf::from("assets"),
            asset_extension: "png".to_string(),
            alternate_suffix: "_alt".to_string(),
        }
    }
}

impl OrganizerOptions {
    /// Lädt Optionen aus einer TOML-Datei. Bei Fehler: Standardwerte.
    pub fn load_from_file(path: &std::path::Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(opts) => {
                    log::info!("Optionen geladen aus: {}", path.display());
                    opts
                }
                Err(e) => {
                    log::warn!("Optionen-Datei fehlerhaft, verwende Standardwerte: {}", e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Keine Optionen-Datei gefunden, verwende Standardwerte");
                Self::default()
            }
        }
    }

    /// Speichert Optionen als TOML-Datei.
    pub fn save_to_file(&self, path: &std::path::Path) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        log::info!("Optionen gespeichert nach: {}", path.display());
        Ok(())
    }

    /// Ermittelt den Pfad zur Optionen-Datei neben der Binary.
    pub fn config_path() -> PathBuf {
        std::env::current_exe()
            .unwrap_or_else(|_| PathBuf::from("hvac_duct_organizer"))
            .parent()
            .unwrap_or_else(|| std::path::Path::new("."))
            .join("hvac_duct_organizer.toml")
    }

    /// Asset-Bibliothek gemäß den konfigurierten Pfaden.
    pub fn asset_library(&self) -> AssetLibrary {
        AssetLibrary::new(
            self.asset_root.clone(),
            self.asset_extension.clone(),
            self.alternate_suffix.clone(),
        )
    }

    pub fn wire_rgb(&self) -> Rgb {
        Rgb::from(self.wire_color)
    }

    pub fn preview_rgb(&self) -> Rgb {
        Rgb::from(self.preview_color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_toml_keeps_defaults() {
        let opts: OrganizerOptions =
            toml::from_str("connection_tolerance = 30.0\n").expect("gültiges TOML");

        assert_eq!(opts.connection_tolerance, 30.0);
        assert_eq!(opts.ignore_tolerance, IGNORE_TOLERANCE);
        assert_eq!(opts.relocate_rescan_tolerance, RELOCATE_RESCAN_TOLERANCE);
        assert_eq!(opts.replace_rescan_tolerance, REPLACE_RESCAN_TOLERANCE);
    }

    #[test]
    fn toml_roundtrip_preserves_options() {
        let mut opts = OrganizerOptions::default();
        opts.alternate_suffix = "-emory".to_string();

        let text = toml::to_string_pretty(&opts).expect("serialisierbar");
        let back: OrganizerOptions = toml::from_str(&text).expect("lesbar");

        assert_eq!(back, opts);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let opts = OrganizerOptions::load_from_file(std::path::Path::new(
            "/nonexistent/hvac_duct_organizer.toml",
        ));
        assert_eq!(opts, OrganizerOptions::default());
    }
}
