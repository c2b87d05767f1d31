//! SMAPI manifest.json parsing.
//!
//! Manifests are hand-edited by mod authors, so they are read leniently:
//! - UTF-8 with or without BOM, UTF-16 LE/BE with BOM
//! - JSON5 syntax (comments, trailing commas, unquoted keys)
//!
//! Only the fields needed for display are extracted.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::Value;

/// File name SMAPI looks for inside each mod folder
pub const MANIFEST_FILE: &str = "manifest.json";

/// Update-key prefixes that identify an external mod catalog entry
pub const CATALOG_PREFIXES: &[&str] = &["Nexus:"];

/// Shown when a manifest has no Name field
pub const UNKNOWN_NAME: &str = "Unknown Name";

const UTF16_LE_BOM: [u8; 2] = [0xFF, 0xFE];
const UTF16_BE_BOM: [u8; 2] = [0xFE, 0xFF];
const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

/// Manifest fields used by the mod list
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Manifest {
    #[serde(rename = "Name", alias = "name", default)]
    pub name: Option<String>,

    #[serde(rename = "Author", alias = "author", default)]
    pub author: Option<String>,

    #[serde(rename = "Version", alias = "version", default)]
    pub version: Option<Value>,

    #[serde(rename = "Description", alias = "description", default)]
    pub description: Option<String>,

    #[serde(rename = "UniqueID", alias = "uniqueId", default)]
    pub unique_id: Option<String>,

    /// Raw update keys; non-string entries are ignored when looking up ids
    #[serde(rename = "UpdateKeys", alias = "updateKeys", default)]
    pub update_keys: Vec<Value>,
}

impl Manifest {
    /// Display name, or the placeholder when the manifest has none
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(UNKNOWN_NAME)
    }

    /// Catalog id from the first update key with a recognised prefix.
    ///
    /// `"Nexus:2400"` -> `Some("2400")`. The id is whatever follows the last
    /// colon; an empty id counts as no id.
    pub fn catalog_id(&self) -> Option<&str> {
        let key = self
            .update_keys
            .iter()
            .filter_map(Value::as_str)
            .find(|key| CATALOG_PREFIXES.iter().any(|prefix| key.starts_with(prefix)))?;
        let id = key.rsplit(':').next().unwrap_or_default();
        if id.is_empty() {
            None
        } else {
            Some(id)
        }
    }

    /// Version as shown to users; SMAPI accepts both strings and objects here
    pub fn version_string(&self) -> Option<String> {
        match self.version.as_ref()? {
            Value::String(s) => Some(s.clone()),
            Value::Object(obj) => {
                let part = |key: &str| obj.get(key).and_then(Value::as_u64).unwrap_or(0);
                Some(format!(
                    "{}.{}.{}",
                    part("MajorVersion"),
                    part("MinorVersion"),
                    part("PatchVersion")
                ))
            }
            other => Some(other.to_string()),
        }
    }

    /// Label for the mod list: `Name` or `Name (id)`
    pub fn label(&self) -> String {
        match self.catalog_id() {
            Some(id) => format!("{} ({})", self.display_name(), id),
            None => self.display_name().to_string(),
        }
    }
}

/// Manifest read or parse failure
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid text encoding: {0}")]
    Encoding(String),

    #[error("{0}")]
    Syntax(#[from] json5::Error),

    #[error("expected a JSON object, found {0}")]
    NotAnObject(&'static str),

    #[error("{0}")]
    Field(#[from] serde_json::Error),
}

/// Decode manifest bytes to a string, handling BOMs
pub fn decode_manifest_bytes(bytes: &[u8]) -> Result<String, ManifestError> {
    if bytes.starts_with(&UTF8_BOM) {
        return String::from_utf8(bytes[3..].to_vec())
            .map_err(|e| ManifestError::Encoding(e.to_string()));
    }
    if bytes.starts_with(&UTF16_LE_BOM) {
        let (text, _, had_errors) = encoding_rs::UTF_16LE.decode(&bytes[2..]);
        if had_errors {
            return Err(ManifestError::Encoding("UTF-16 LE decoding error".to_string()));
        }
        return Ok(text.into_owned());
    }
    if bytes.starts_with(&UTF16_BE_BOM) {
        let (text, _, had_errors) = encoding_rs::UTF_16BE.decode(&bytes[2..]);
        if had_errors {
            return Err(ManifestError::Encoding("UTF-16 BE decoding error".to_string()));
        }
        return Ok(text.into_owned());
    }
    String::from_utf8(bytes.to_vec()).map_err(|e| ManifestError::Encoding(e.to_string()))
}

/// Parse manifest text; the root must be an object
pub fn parse_manifest(text: &str) -> Result<Manifest, ManifestError> {
    let kind = match json5::from_str::<Value>(text)? {
        Value::Object(map) => return Ok(serde_json::from_value(Value::Object(map))?),
        Value::Array(_) => "an array",
        Value::String(_) => "a string",
        Value::Number(_) => "a number",
        Value::Bool(_) => "a boolean",
        Value::Null => "null",
    };
    Err(ManifestError::NotAnObject(kind))
}

/// Read and parse a manifest file
pub fn read_manifest(path: &Path) -> Result<Manifest, ManifestError> {
    let bytes = fs::read(path).map_err(|source| ManifestError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_manifest(&decode_manifest_bytes(&bytes)?)
}

/// Locate the manifest inside a mod folder
pub fn find_manifest(mod_dir: &Path) -> Option<PathBuf> {
    crate::paths::find_child_case_insensitive(mod_dir, MANIFEST_FILE).filter(|p| p.is_file())
}
