//! Sitzungszustand: geöffnetes Dokument, Optionen, Asset-Zugriff und Ignore-Modus.

use crate::app::ignore_mode::IgnoreModeController;
use crate::app::CommandLog;
use crate::core::{AssetResolver, Document, FsAssetResolver, Selectable};
use crate::shared::OrganizerOptions;

/// Hauptzustand einer Sitzung (einmal pro Panel-Sitzung erzeugt).
pub struct AppState {
    /// Aktuell geöffnetes Dokument (None = kein Dokument offen)
    pub document: Option<Document>,
    /// Laufzeit-Optionen (Toleranzen, Stile, Asset-Bibliothek)
    pub options: OrganizerOptions,
    /// Zugriff auf die Bilddateien der Komponenten
    pub assets: Box<dyn AssetResolver>,
    /// Zustandsautomat des Ignore-Modus
    pub ignore_mode: IgnoreModeController,
    /// Verlauf ausgeführter Commands
    pub command_log: CommandLog,
}

impl AppState {
    /// Erstellt eine Sitzung ohne Dokument mit Dateisystem-Assets.
    pub fn new() -> Self {
        Self {
            document: None,
            options: OrganizerOptions::default(),
            assets: Box::new(FsAssetResolver),
            ignore_mode: IgnoreModeController::new(),
            command_log: CommandLog::new(),
        }
    }

    /// Ersetzt den Asset-Zugriff (z.B. In-Memory für Snapshots).
    pub fn with_assets(mut self, assets: impl AssetResolver + 'static) -> Self {
        self.assets = Box::new(assets);
        self
    }

    pub fn with_options(mut self, options: OrganizerOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_document(mut self, document: Document) -> Self {
        self.open_document(document);
        self
    }

    /// Öffnet ein Dokument; ein aktiver Ignore-Modus wird vorher beendet.
    pub fn open_document(&mut self, document: Document) {
        self.close_document();
        log::info!("Dokument '{}' geöffnet", document.name);
        self.document = Some(document);
    }

    /// Schließt das Dokument und beendet den Ignore-Modus.
    pub fn close_document(&mut self) -> Option<Document> {
        self.ignore_mode.cleanup(self.document.as_mut());
        self.document.take()
    }

    /// Host-Benachrichtigung: Selektion wurde geändert.
    pub fn set_selection(&mut self, items: impl IntoIterator<Item = Selectable>) -> bool {
        let Some(doc) = self.document.as_mut() else {
            log::warn!("Selektion ohne geöffnetes Dokument ignoriert");
            return false;
        };
        doc.set_selection(items);
        self.notify_selection_changed();
        true
    }

    /// Leitet eine Selektionsänderung an alle Abonnenten weiter.
    pub fn notify_selection_changed(&mut self) {
        let Some(doc) = self.document.as_mut() else {
            return;
        };
        self.ignore_mode.on_selection_changed(doc, &self.options);
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
