use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::app::RoomId;

use super::types::ContentError;
use super::parse_json;

pub const MAP_MANIFEST_FILE: &str = "mapManifest.json";

/// Room id to map file, relative to the manifest's directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MapManifest {
    entries: BTreeMap<RoomId, PathBuf>,
}

impl MapManifest {
    pub fn parse(raw: &str, source_path: &Path) -> Result<Self, ContentError> {
        let document: BTreeMap<String, Value> = parse_json(raw, source_path)?;
        let mut entries = BTreeMap::new();
        for (room, value) in document {
            match value {
                Value::String(path) => {
                    entries.insert(RoomId::new(room), PathBuf::from(path));
                }
                Value::Object(_) => return Err(ContentError::NestedManifestEntry { room }),
                _ => return Err(ContentError::InvalidManifestEntry { room }),
            }
        }
        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = (&RoomId, &Path)> + '_ {
        self.entries.iter().map(|(id, path)| (id, path.as_path()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_manifest_maps_rooms_to_paths() {
        let manifest = MapManifest::parse(
            r#"{ "living-room": "living-room.json", "hall": "maps/hall.json" }"#,
            Path::new(MAP_MANIFEST_FILE),
        )
        .expect("manifest");
        let entries: Vec<(String, PathBuf)> = manifest
            .entries()
            .map(|(id, path)| (id.to_string(), path.to_path_buf()))
            .collect();
        assert_eq!(
            entries,
            vec![
                ("hall".to_string(), PathBuf::from("maps/hall.json")),
                ("living-room".to_string(), PathBuf::from("living-room.json")),
            ]
        );
    }

    #[test]
    fn nested_entries_are_rejected() {
        let error = MapManifest::parse(
            r#"{ "wing": { "east": "east.json" } }"#,
            Path::new(MAP_MANIFEST_FILE),
        )
        .expect_err("nested");
        assert!(matches!(error, ContentError::NestedManifestEntry { room } if room == "wing"));
    }

    #[test]
    fn non_string_entries_are_rejected() {
        let error = MapManifest::parse(r#"{ "hall": 3 }"#, Path::new(MAP_MANIFEST_FILE))
            .expect_err("number");
        assert!(matches!(error, ContentError::InvalidManifestEntry { .. }));
    }

    #[test]
    fn malformed_json_reports_source_path() {
        let error = MapManifest::parse("{ nope", Path::new("maps/mapManifest.json"))
            .expect_err("malformed");
        match error {
            ContentError::ParseJson { path, .. } => {
                assert_eq!(path, PathBuf::from("maps/mapManifest.json"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
