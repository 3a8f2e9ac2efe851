use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Backend-specific locator for one raster tileset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tileset(pub String);

impl Tileset {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    Parse(String),
}

impl std::fmt::Display for CatalogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogError::Parse(msg) => write!(f, "source catalog parse error: {msg}"),
        }
    }
}

impl std::error::Error for CatalogError {}

/// Lookup table from layer id to tileset locator.
///
/// One entry per regional partition (the `_ak`/`_hi` variants are
/// individual keys). Lookups return `Option`; callers never build a
/// source descriptor from a missing entry, so an unpublished tileset
/// degrades to a skipped region instead of an unresolvable source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceCatalog {
    entries: BTreeMap<String, Tileset>,
}

impl SourceCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// The production table.
    ///
    /// The rail and combined-all CONUS tilesets are not published upstream
    /// yet and are deliberately absent.
    pub fn builtin() -> Self {
        const TABLE: &[(&str, &str)] = &[
            ("noise_av_2016", "mapbox://bts-geospatial.arxt3338"),
            ("noise_av_2016_ak", "mapbox://bts-geospatial.0mkxo9wm"),
            ("noise_av_2016_hi", "mapbox://bts-geospatial.4nzlq57z"),
            ("noise_av_2018", "mapbox://bts-geospatial.c20b2kws"),
            ("noise_av_2018_ak", "mapbox://bts-geospatial.6157icc2"),
            ("noise_av_2018_hi", "mapbox://bts-geospatial.44tatt0y"),
            ("noise_road_2016", "mapbox://bts-geospatial.8md7woa0"),
            ("noise_road_2016_ak", "mapbox://bts-geospatial.3zjo1wye"),
            ("noise_road_2016_hi", "mapbox://bts-geospatial.8m9qjdcj"),
            ("noise_road_2018", "mapbox://bts-geospatial.4dqm8wsi"),
            ("noise_road_2018_ak", "mapbox://bts-geospatial.7zdof0mt"),
            ("noise_road_2018_hi", "mapbox://bts-geospatial.5k6sohfc"),
            ("noise_avroad_2016", "mapbox://bts-geospatial.2c47as6b"),
            ("noise_avroad_2016_ak", "mapbox://bts-geospatial.afpycwuh"),
            ("noise_avroad_2016_hi", "mapbox://bts-geospatial.9548ov6g"),
            ("noise_avroad_2018", "mapbox://bts-geospatial.2c47as6b"),
            ("noise_avroad_2018_ak", "mapbox://bts-geospatial.0wb2bmj0"),
            ("noise_avroad_2018_hi", "mapbox://bts-geospatial.amcxbj90"),
            ("noise_all_2018_ak", "mapbox://bts-geospatial.0wb2bmj0"),
            ("noise_all_2018_hi", "mapbox://bts-geospatial.amcxbj90"),
        ];

        let mut catalog = Self::new();
        for (id, tileset) in TABLE {
            catalog.insert(*id, Tileset((*tileset).to_string()));
        }
        catalog
    }

    /// Parses a flat `{"layer_id": "tileset"}` JSON object.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        serde_json::from_str(json).map_err(|e| CatalogError::Parse(e.to_string()))
    }

    pub fn insert(&mut self, layer_id: impl Into<String>, tileset: Tileset) {
        self.entries.insert(layer_id.into(), tileset);
    }

    pub fn tileset(&self, layer_id: &str) -> Option<&Tileset> {
        self.entries.get(layer_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::{SourceCatalog, Tileset};
    use crate::key::LayerKey;
    use crate::mode::Mode;
    use crate::year::Year;

    #[test]
    fn builtin_covers_every_regional_id_of_the_core_modes() {
        let catalog = SourceCatalog::builtin();
        for mode in [Mode::Aviation, Mode::Road, Mode::AviationRoad] {
            for year in Year::ALL {
                let key = LayerKey::new(mode, year).expect("core keys have data");
                for id in key.layer_ids() {
                    assert!(catalog.tileset(&id).is_some(), "missing {id}");
                }
            }
        }
    }

    #[test]
    fn unpublished_conus_tilesets_are_absent() {
        let catalog = SourceCatalog::builtin();
        assert_eq!(catalog.tileset("noise_rail_2018"), None);
        assert_eq!(catalog.tileset("noise_all_2018"), None);
        assert!(catalog.tileset("noise_all_2018_ak").is_some());
    }

    #[test]
    fn parses_flat_json_map() {
        let catalog = SourceCatalog::from_json(
            r#"{"noise_rail_2018": "mapbox://example.rail2018"}"#,
        )
        .expect("parse");
        assert_eq!(
            catalog.tileset("noise_rail_2018"),
            Some(&Tileset("mapbox://example.rail2018".to_string()))
        );
    }

    #[test]
    fn parse_error_is_reported() {
        let err = SourceCatalog::from_json("[1, 2]").expect_err("not an object");
        assert!(err.to_string().contains("source catalog parse error"));
    }
}
