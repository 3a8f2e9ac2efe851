use serde::{Deserialize, Serialize};

/// Noise category (or category combination) selectable for display.
///
/// At most one mode is active at a time; the active slot is an
/// `Option<Mode>` owned by the selection state.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mode {
    #[serde(rename = "av")]
    Aviation,
    #[serde(rename = "road")]
    Road,
    #[serde(rename = "rail")]
    Rail,
    #[serde(rename = "avroad")]
    AviationRoad,
    #[serde(rename = "all")]
    AviationRoadRail,
}

impl Mode {
    pub const ALL: [Mode; 5] = [
        Mode::Aviation,
        Mode::Road,
        Mode::Rail,
        Mode::AviationRoad,
        Mode::AviationRoadRail,
    ];

    /// Stable slug used in layer ids and the exported wasm API.
    pub fn slug(self) -> &'static str {
        match self {
            Mode::Aviation => "av",
            Mode::Road => "road",
            Mode::Rail => "rail",
            Mode::AviationRoad => "avroad",
            Mode::AviationRoadRail => "all",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Mode> {
        Mode::ALL.into_iter().find(|m| m.slug() == slug)
    }
}

#[cfg(test)]
mod tests {
    use super::Mode;

    #[test]
    fn slugs_round_trip() {
        for mode in Mode::ALL {
            assert_eq!(Mode::from_slug(mode.slug()), Some(mode));
        }
        assert_eq!(Mode::from_slug("train"), None);
    }

    #[test]
    fn serde_uses_slugs() {
        let json = serde_json::to_string(&Mode::AviationRoad).expect("serialize");
        assert_eq!(json, "\"avroad\"");
        let back: Mode = serde_json::from_str("\"all\"").expect("deserialize");
        assert_eq!(back, Mode::AviationRoadRail);
    }
}
