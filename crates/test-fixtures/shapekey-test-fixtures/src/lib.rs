//! Named JSON fixtures shared by the shape key transfer tests and benches.
//!
//! Fixtures live under `fixtures/` at the workspace root and are indexed by
//! `fixtures/manifest.json`. Loaders are generic so this crate does not depend
//! on the engine it tests.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use serde::Deserialize;

static MANIFEST: Lazy<Manifest> = Lazy::new(|| {
    let raw = include_str!("../../../../fixtures/manifest.json");
    serde_json::from_str(raw)
        .expect("fixtures/manifest.json should list shape key meshes and settings")
});

#[derive(Debug, Deserialize)]
struct Manifest {
    meshes: HashMap<String, String>,
    #[serde(default)]
    settings: HashMap<String, String>,
}

/// The two fixture families indexed by the manifest.
#[derive(Copy, Clone, Debug)]
enum Family {
    Mesh,
    Settings,
}

impl Family {
    fn entries(self) -> &'static HashMap<String, String> {
        match self {
            Family::Mesh => &MANIFEST.meshes,
            Family::Settings => &MANIFEST.settings,
        }
    }

    fn names(self) -> Vec<String> {
        let mut names: Vec<String> = self.entries().keys().cloned().collect();
        names.sort();
        names
    }

    fn path(self, name: &str) -> Result<PathBuf> {
        let rel = self.entries().get(name).ok_or_else(|| {
            anyhow!("no {self:?} fixture named '{name}' in fixtures/manifest.json")
        })?;
        Ok(Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("../../../fixtures")
            .join(rel))
    }

    fn text(self, name: &str) -> Result<String> {
        let path = self.path(name)?;
        fs::read_to_string(&path)
            .with_context(|| format!("reading {self:?} fixture '{name}' at {}", path.display()))
    }

    fn parse<T: DeserializeOwned>(self, name: &str) -> Result<T> {
        let text = self.text(name)?;
        serde_json::from_str(&text)
            .with_context(|| format!("decoding {self:?} fixture '{name}'"))
    }
}

/// Mesh documents (`MemoryMesh` JSON).
pub mod meshes {
    use super::*;

    pub fn keys() -> Vec<String> {
        Family::Mesh.names()
    }

    pub fn json(name: &str) -> Result<String> {
        Family::Mesh.text(name)
    }

    pub fn load<T: DeserializeOwned>(name: &str) -> Result<T> {
        Family::Mesh.parse(name)
    }
}

/// Per-target transfer settings documents.
pub mod settings {
    use super::*;

    pub fn keys() -> Vec<String> {
        Family::Settings.names()
    }

    pub fn json(name: &str) -> Result<String> {
        Family::Settings.text(name)
    }

    pub fn load<T: DeserializeOwned>(name: &str) -> Result<T> {
        Family::Settings.parse(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_manifest_entry_is_readable() {
        for key in meshes::keys() {
            let text = meshes::json(&key).unwrap();
            let _: serde_json::Value = serde_json::from_str(&text).unwrap();
        }
        for key in settings::keys() {
            let _: serde_json::Value = settings::load(&key).unwrap();
        }
    }

    #[test]
    fn unknown_fixture_is_an_error() {
        let err = meshes::json("does-not-exist").unwrap_err();
        assert!(err.to_string().contains("does-not-exist"));
        assert!(settings::load::<serde_json::Value>("face-source").is_err());
    }

    #[test]
    fn keys_are_sorted() {
        assert_eq!(
            meshes::keys(),
            vec!["face-source", "face-target", "face-target-dense"]
        );
    }
}
