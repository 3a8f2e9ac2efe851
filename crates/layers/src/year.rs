use serde::{Deserialize, Serialize};

/// Survey year. Exactly one is current; the other is the year whose layer
/// must be hidden on a year switch.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Year {
    #[serde(rename = "2016")]
    Y2016,
    #[serde(rename = "2018")]
    Y2018,
}

impl Year {
    pub const ALL: [Year; 2] = [Year::Y2016, Year::Y2018];

    pub fn label(self) -> &'static str {
        match self {
            Year::Y2016 => "2016",
            Year::Y2018 => "2018",
        }
    }

    /// The complementary year.
    pub fn other(self) -> Year {
        match self {
            Year::Y2016 => Year::Y2018,
            Year::Y2018 => Year::Y2016,
        }
    }

    pub fn from_label(label: &str) -> Option<Year> {
        Year::ALL.into_iter().find(|y| y.label() == label)
    }
}

#[cfg(test)]
mod tests {
    use super::Year;

    #[test]
    fn other_is_involutive() {
        for year in Year::ALL {
            assert_eq!(year.other().other(), year);
            assert_ne!(year.other(), year);
        }
    }

    #[test]
    fn labels_round_trip() {
        assert_eq!(Year::from_label("2016"), Some(Year::Y2016));
        assert_eq!(Year::from_label("2017"), None);
    }
}
