//! Asset-Bibliothek: Pfadableitung für Kanal-Komponenten und Auflösung von Bildgrößen.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use glam::Vec2;

use crate::error::{OrganizerError, OrganizerResult};

/// Zugriff auf die Bilddateien der Komponenten-Assets.
pub trait AssetResolver {
    /// Prüft, ob die Datei existiert.
    fn exists(&self, path: &Path) -> bool;

    /// Liefert die native Größe (Pixel = Dokument-Einheiten bei 100 %).
    fn native_size(&self, path: &Path) -> OrganizerResult<Vec2>;
}

/// Auflösung über das Dateisystem; Größen werden aus dem Bild-Header gelesen.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsAssetResolver;

impl AssetResolver for FsAssetResolver {
    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn native_size(&self, path: &Path) -> OrganizerResult<Vec2> {
        if !path.is_file() {
            return Err(OrganizerError::AssetNotFound(path.to_path_buf()));
        }
        let (width, height) = image::image_dimensions(path).map_err(|e| {
            OrganizerError::HostOperationFailed(format!("{}: {e}", path.display()))
        })?;
        Ok(Vec2::new(width as f32, height as f32))
    }
}

/// In-Memory-Auflösung (Snapshots und Tests).
#[derive(Debug, Default, Clone)]
pub struct MemoryAssetResolver {
    sizes: HashMap<PathBuf, Vec2>,
}

impl MemoryAssetResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registriert eine Datei mit ihrer nativen Größe.
    pub fn insert(&mut self, path: impl Into<PathBuf>, size: Vec2) {
        self.sizes.insert(path.into(), size);
    }

    pub fn with(mut self, path: impl Into<PathBuf>, size: Vec2) -> Self {
        self.insert(path, size);
        self
    }
}

impl AssetResolver for MemoryAssetResolver {
    fn exists(&self, path: &Path) -> bool {
        self.sizes.contains_key(path)
    }

    fn native_size(&self, path: &Path) -> OrganizerResult<Vec2> {
        self.sizes
            .get(path)
            .copied()
            .ok_or_else(|| OrganizerError::AssetNotFound(path.to_path_buf()))
    }
}

/// Namensschema der Komponenten-Bibliothek: `<root>/<basis>.<ext>`,
/// Alternativ-Variante `<root>/<stamm><suffix>.<ext>`.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetLibrary {
    pub root: PathBuf,
    pub extension: String,
    pub alternate_suffix: String,
}

impl AssetLibrary {
    pub fn new(
        root: impl Into<PathBuf>,
        extension: impl Into<String>,
        alternate_suffix: impl Into<String>,
    ) -> Self {
        Self {
            root: root.into(),
            extension: extension.into(),
            alternate_suffix: alternate_suffix.into(),
        }
    }

    /// Pfad zur Basis-Datei eines Assets.
    pub fn path_for(&self, base_name: &str) -> PathBuf {
        self.root.join(format!("{base_name}.{}", self.extension))
    }

    /// `true` wenn die Datei bereits die Alternativ-Variante ist.
    pub fn is_alternate(&self, file: &Path) -> bool {
        !self.alternate_suffix.is_empty()
            && file
                .file_stem()
                .and_then(|s| s.to_str())
                .is_some_and(|stem| stem.ends_with(&self.alternate_suffix))
    }

    /// Abgeleiteter Pfad der Alternativ-Variante (gleiches Verzeichnis, gleiche Endung).
    pub fn alternate_of(&self, file: &Path) -> Option<PathBuf> {
        if self.alternate_suffix.is_empty() || self.is_alternate(file) {
            return None;
        }
        let stem = file.file_stem()?.to_str()?;
        let name = match file.extension().and_then(|e| e.to_str()) {
            Some(ext) => format!("{stem}{}.{ext}", self.alternate_suffix),
            None => format!("{stem}{}", self.alternate_suffix),
        };
        Some(file.with_file_name(name))
    }

    /// Bevorzugter Pfad für ein Asset: Alternativ-Variante falls vorhanden, sonst Basis.
    pub fn preferred_path(&self, base_name: &str, resolver: &dyn AssetResolver) -> PathBuf {
        let base = self.path_for(base_name);
        match self.alternate_of(&base) {
            Some(alternate) if resolver.exists(&alternate) => alternate,
            _ => base,
        }
    }
}
