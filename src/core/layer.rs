//! Layer-Registry: Host-Layer und die feste Kategorie-Whitelist.

use serde::{Deserialize, Serialize};

use super::EntityId;

/// Name des Ignore-Layers (Ausschluss-Marker für die Verdrahtung).
pub const IGNORE_LAYER: &str = "Ignored";

/// Name des Vorschau-Layers, exklusiv vom Ignore-Modus verwaltet.
pub const PREVIEW_LAYER: &str = "__ignore_preview__";

/// Schlüsselwort im Layer-Namen, das Kanal-Layer kennzeichnet.
pub const DUCT_KEYWORD: &str = "ductwork";

/// Layer mit Register-Ankerpunkten.
pub const REGISTER_LAYERS: &[&str] = &[
    "Square Registers",
    "Rectangular Registers",
    "Circular Registers",
    "Exhaust Registers",
    "Secondary Exhaust Registers",
    "Orange Register",
];

/// Alle Kategorie-Layer; nur Elemente auf diesen Layern werden verschoben oder verdrahtet.
pub const CATEGORY_LAYERS: &[&str] = &[
    "Ductwork",
    "Green Ductwork",
    "Light Green Ductwork",
    "Blue Ductwork",
    "Orange Ductwork",
    "Square Registers",
    "Rectangular Registers",
    "Circular Registers",
    "Exhaust Registers",
    "Secondary Exhaust Registers",
    "Orange Register",
    "Thermostats",
    "Thermostat Lines",
    "Units",
    IGNORE_LAYER,
];

/// Stabile Layer-ID (unabhängig von der Z-Reihenfolge).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LayerId(pub u32);

impl LayerId {
    /// Platzhalter für noch nicht eingefügte Elemente.
    pub const UNASSIGNED: LayerId = LayerId(0);
}

/// Klassifikation eines Layers anhand seines Namens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerKind {
    /// Whitelist-Layer (Move/Wire-fähig)
    Category,
    /// Alles andere, inkl. Vorschau-Layer
    Scratch,
}

impl LayerKind {
    /// Klassifiziert einen Layer-Namen.
    pub fn classify(name: &str) -> Self {
        if is_category_layer(name) {
            LayerKind::Category
        } else {
            LayerKind::Scratch
        }
    }
}

/// `true` wenn der Name auf der Kategorie-Whitelist steht.
pub fn is_category_layer(name: &str) -> bool {
    CATEGORY_LAYERS.contains(&name)
}

/// `true` für Register-Layer.
pub fn is_register_layer(name: &str) -> bool {
    REGISTER_LAYERS.contains(&name)
}

/// `true` für Kanal-Layer (Name enthält das Kanal-Schlüsselwort, ohne Groß-/Kleinschreibung).
pub fn is_duct_layer(name: &str) -> bool {
    name.to_lowercase().contains(DUCT_KEYWORD)
}

/// Ein Layer des Dokuments mit geordneten Kind-Elementen.
///
/// Index 0 in `children` ist das vorderste Element.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Layer {
    pub id: LayerId,
    pub name: String,
    #[serde(default)]
    pub locked: bool,
    #[serde(default = "default_visible")]
    pub visible: bool,
    #[serde(default)]
    pub children: Vec<EntityId>,
}

fn default_visible() -> bool {
    true
}

impl Layer {
    /// Erstellt einen leeren, entsperrten und sichtbaren Layer.
    pub fn new(id: LayerId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            locked: false,
            visible: true,
            children: Vec::new(),
        }
    }

    /// Gibt die Art des Layers zurück (abgeleitet aus dem Namen).
    pub fn kind(&self) -> LayerKind {
        LayerKind::classify(&self.name)
    }

    /// Gibt zurück, ob der Layer auf der Kategorie-Whitelist steht.
    pub fn is_category(&self) -> bool {
        self.kind() == LayerKind::Category
    }

    /// Host-Regel: nur entsperrte, sichtbare Layer nehmen Elemente auf.
    pub fn is_editable(&self) -> bool {
        !self.locked && self.visible
    }

    /// Gibt zurück, ob der Layer keine Elemente enthält.
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

/// Zustand eines Layers nach einer Operation mit temporär aufgehobener Sperre.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerExitState {
    /// Sperre und Sichtbarkeit wie vor der Operation
    Restore,
    /// Layer bleibt gesperrt und ausgeblendet (Ignore-Layer)
    LockedHidden,
}

impl LayerExitState {
    /// Exit-Zustand für einen Ziel-Layer: der Ignore-Layer wird immer gesperrt/ausgeblendet.
    pub fn for_layer(name: &str) -> Self {
        if name == IGNORE_LAYER {
            LayerExitState::LockedHidden
        } else {
            LayerExitState::Restore
        }
    }
}
