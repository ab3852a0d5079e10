use std::path::{Component, Path, PathBuf};

use anyhow::Context;
use serde_json::Value;

use crate::document::model::RibbonDocument;
use crate::foundation::error::{RibbonError, RibbonResult};
use crate::foundation::warning::Warning;

/// A document decoded from JSON together with the problems that were tolerated on the way.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadedDocument {
    /// The decoded document.
    pub document: RibbonDocument,
    /// Degradations applied while decoding (e.g. a logo that no longer exists).
    pub warnings: Vec<Warning>,
}

/// Encode `doc` as a JSON tree destined for the file at `target`.
///
/// The logo path is rewritten relative to `target`'s directory with `/` separators. Logos on
/// another filesystem root are kept absolute.
pub fn serialize(doc: &RibbonDocument, target: &Path) -> RibbonResult<Value> {
    let mut value = serde_json::to_value(doc)
        .map_err(|e| RibbonError::serde(format!("encode ribbon document: {e}")))?;

    let logo = match &doc.logo {
        Some(logo) => {
            let base = base_dir(target)?;
            let abs = normalize_lexically(&absolutize(logo)?);
            let stored = match relative_to(&abs, &base) {
                Some(rel) => to_portable_string(&rel),
                None => abs.to_string_lossy().into_owned(),
            };
            Value::String(stored)
        }
        None => Value::Null,
    };
    let Value::Object(map) = &mut value else {
        return Err(RibbonError::serde("ribbon document did not encode as a JSON object"));
    };
    map.insert("logo".to_owned(), logo);

    Ok(value)
}

/// Decode a JSON tree read from the file at `source`.
///
/// A logo path is resolved against `source`'s directory. When the resolved file does not exist
/// the logo is cleared and a [`Warning::UnresolvedLogo`] is reported instead of failing.
pub fn deserialize(value: Value, source: &Path) -> RibbonResult<LoadedDocument> {
    let mut document: RibbonDocument = serde_json::from_value(value)
        .map_err(|e| RibbonError::serde(format!("parse ribbon document JSON: {e}")))?;

    for (i, stripe) in document.stripes.iter().enumerate() {
        stripe
            .validate()
            .map_err(|e| RibbonError::serde(format!("stripe #{i}: {e}")))?;
    }

    let mut warnings = Vec::new();
    if let Some(stored) = document.logo.take() {
        let resolved = normalize_lexically(&base_dir(source)?.join(&stored));
        if resolved.is_file() {
            document.logo = Some(resolved);
        } else {
            let w = Warning::UnresolvedLogo {
                stored: stored.to_string_lossy().into_owned(),
                resolved,
            };
            tracing::warn!("{w}");
            warnings.push(w);
        }
    }

    Ok(LoadedDocument { document, warnings })
}

/// Read and decode a document file.
pub fn load_json(path: impl AsRef<Path>) -> RibbonResult<LoadedDocument> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)
        .with_context(|| format!("read ribbon document '{}'", path.display()))?;
    let value: Value = serde_json::from_slice(&bytes).map_err(|e| {
        RibbonError::serde(format!("parse ribbon document '{}': {e}", path.display()))
    })?;
    deserialize(value, path)
}

/// Encode and write a document file, creating parent directories as needed.
pub fn save_json(doc: &RibbonDocument, path: impl AsRef<Path>) -> RibbonResult<()> {
    let path = path.as_ref();
    let value = serialize(doc, path)?;
    let text = serde_json::to_string_pretty(&value)
        .map_err(|e| RibbonError::serde(format!("encode ribbon document: {e}")))?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create document dir '{}'", parent.display()))?;
    }
    std::fs::write(path, text)
        .with_context(|| format!("write ribbon document '{}'", path.display()))?;
    Ok(())
}

fn absolutize(path: &Path) -> RibbonResult<PathBuf> {
    std::path::absolute(path)
        .with_context(|| format!("make path absolute '{}'", path.display()))
        .map_err(RibbonError::from)
}

fn base_dir(file: &Path) -> RibbonResult<PathBuf> {
    let abs = normalize_lexically(&absolutize(file)?);
    Ok(abs.parent().map(Path::to_path_buf).unwrap_or(abs))
}

/// Resolve `.` and `..` segments without touching the filesystem.
pub(crate) fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for comp in path.components() {
        match comp {
            Component::CurDir => {}
            Component::ParentDir => {
                let popped = matches!(out.components().next_back(), Some(Component::Normal(_)))
                    && out.pop();
                if !popped && !out.has_root() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Express absolute `path` relative to absolute directory `base`.
///
/// Returns `None` when the two do not share a root (e.g. different drives).
pub(crate) fn relative_to(path: &Path, base: &Path) -> Option<PathBuf> {
    let path_comps: Vec<Component<'_>> = path.components().collect();
    let base_comps: Vec<Component<'_>> = base.components().collect();

    let shared = path_comps
        .iter()
        .zip(&base_comps)
        .take_while(|(a, b)| a == b)
        .count();
    let has_shared_root = path_comps
        .first()
        .zip(base_comps.first())
        .is_some_and(|(a, b)| a == b);
    if !has_shared_root {
        return None;
    }

    let mut out = PathBuf::new();
    for _ in shared..base_comps.len() {
        out.push("..");
    }
    for comp in &path_comps[shared..] {
        out.push(comp.as_os_str());
    }
    Some(out)
}

fn to_portable_string(rel: &Path) -> String {
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
#[path = "../../tests/unit/document/codec.rs"]
mod tests;
