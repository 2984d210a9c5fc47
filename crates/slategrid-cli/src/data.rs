use crate::error::{CliError, Result};
use serde_json::Value;
use slategrid::core::models::catalog::{Catalog, RawCatalog};
use std::path::Path;
use tracing::{debug, info};

const COLLECTIONS: [&str; 2] = ["artifacts", "slates"];

/// Reads an item catalog from a JSON file.
///
/// Each collection may be either an array of definitions or an object keyed by id; keyed
/// entries without an `id` field take their key as id.
pub fn load_catalog(path: &Path) -> Result<Catalog> {
    debug!("Loading catalog from file: {:?}", path);
    let content = std::fs::read_to_string(path)?;
    let catalog = parse_catalog(&content).map_err(|e| CliError::FileParsing {
        path: path.to_path_buf(),
        source: e,
    })?;
    info!(items = catalog.len(), "Loaded item catalog.");
    Ok(catalog)
}

fn parse_catalog(content: &str) -> anyhow::Result<Catalog> {
    let mut document: Value = serde_json::from_str(content)?;
    if let Value::Object(root) = &mut document {
        for name in COLLECTIONS {
            if let Some(collection) = root.get_mut(name) {
                normalize_collection(collection);
            }
        }
    }
    let raw: RawCatalog = serde_json::from_value(document)?;
    Ok(Catalog::from_raw(raw)?)
}

fn normalize_collection(collection: &mut Value) {
    let Value::Object(by_id) = collection else {
        return;
    };
    let entries = std::mem::take(by_id)
        .into_iter()
        .map(|(id, mut entry)| {
            if let Value::Object(fields) = &mut entry {
                fields.entry("id").or_insert(Value::String(id));
            }
            entry
        })
        .collect();
    *collection = Value::Array(entries);
}

#[cfg(test)]
mod tests {
    use super::*;
    use slategrid::core::models::item::{ItemCategory, Rotation};
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn loads_array_collections() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("items.json");
        fs::write(
            &path,
            r#"{
                "artifacts": [{ "id": "artifact_cup", "rarity": "Common", "maxUpgrade": 5 }],
                "slates": [{ "id": "slate_right", "buffCoords": [[1, 0, 3, "none"]] }]
            }"#,
        )
        .unwrap();

        let catalog = load_catalog(&path).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(
            catalog.get("slate_right").unwrap().category(),
            ItemCategory::Slate
        );
    }

    #[test]
    fn lowercase_buffcoords_key_is_read() {
        let catalog =
            parse_catalog(r#"{"slates":[{"id":"s","buffcoords":[[1,0,3,"none"]]}]}"#).unwrap();
        let slate = catalog.get("s").unwrap().as_slate().unwrap();
        let coords = slate.pattern.coords_for(Rotation::Deg0).unwrap();
        assert_eq!((coords[0].dx, coords[0].level), (1, 3));
    }

    #[test]
    fn id_keyed_collections_are_normalized() {
        let catalog = parse_catalog(
            r#"{
                "artifacts": {
                    "artifact_cup": { "rarity": "Common" },
                    "artifact_crown": { "id": "artifact_crown", "rarity": "Legendary" }
                }
            }"#,
        )
        .unwrap();
        assert!(catalog.contains("artifact_cup"));
        assert!(catalog.contains("artifact_crown"));
        assert_eq!(catalog.of_category(ItemCategory::Slate).count(), 0);
    }

    #[test]
    fn duplicate_ids_are_a_parse_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("items.json");
        fs::write(
            &path,
            r#"{ "artifacts": [{ "id": "artifact_cup" }], "slates": [{ "id": "artifact_cup" }] }"#,
        )
        .unwrap();
        assert!(matches!(
            load_catalog(&path),
            Err(CliError::FileParsing { .. })
        ));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempdir().unwrap();
        assert!(matches!(
            load_catalog(&dir.path().join("absent.json")),
            Err(CliError::Io(_))
        ));
    }
}
