use crate::mode::Mode;
use crate::region::Region;
use crate::year::Year;

/// Identifier of one logical noise layer: a `(Mode, Year)` pair that is
/// known to have data.
///
/// Construction is total: `LayerKey::new` returns `None` for the two
/// combinations without data (rail was not surveyed in 2016), so invalid
/// keys cannot reach the catalog or the map backend.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct LayerKey {
    mode: Mode,
    year: Year,
}

impl LayerKey {
    pub fn new(mode: Mode, year: Year) -> Option<LayerKey> {
        if !Self::has_data(mode, year) {
            return None;
        }
        Some(LayerKey { mode, year })
    }

    /// Whether a `(mode, year)` combination has survey data at all.
    pub fn has_data(mode: Mode, year: Year) -> bool {
        !(year == Year::Y2016 && matches!(mode, Mode::Rail | Mode::AviationRoadRail))
    }

    pub fn mode(self) -> Mode {
        self.mode
    }

    pub fn year(self) -> Year {
        self.year
    }

    /// The regional partitions this key ships with.
    ///
    /// Rail is the one mode without Alaska/Hawaii tilesets.
    pub fn regions(self) -> &'static [Region] {
        if self.mode == Mode::Rail {
            &[Region::Conus]
        } else {
            &Region::ALL
        }
    }

    /// Unsuffixed (CONUS) layer id, e.g. `noise_avroad_2018`.
    pub fn base_id(self) -> String {
        format!("noise_{}_{}", self.mode.slug(), self.year.label())
    }

    /// Layer id for one regional partition, e.g. `noise_av_2016_ak`.
    pub fn layer_id(self, region: Region) -> String {
        format!(
            "noise_{}_{}{}",
            self.mode.slug(),
            self.year.label(),
            region.suffix()
        )
    }

    /// Layer ids for every regional partition, in `Region::ALL` order.
    pub fn layer_ids(self) -> Vec<String> {
        self.regions().iter().map(|r| self.layer_id(*r)).collect()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::LayerKey;
    use crate::mode::Mode;
    use crate::region::Region;
    use crate::year::Year;

    #[test]
    fn rail_and_all_have_no_2016_data() {
        assert!(LayerKey::new(Mode::Rail, Year::Y2016).is_none());
        assert!(LayerKey::new(Mode::AviationRoadRail, Year::Y2016).is_none());
        assert!(LayerKey::new(Mode::Rail, Year::Y2018).is_some());
        assert!(LayerKey::new(Mode::AviationRoadRail, Year::Y2018).is_some());
    }

    #[test]
    fn every_other_combination_exists() {
        for mode in [Mode::Aviation, Mode::Road, Mode::AviationRoad] {
            for year in Year::ALL {
                assert!(LayerKey::new(mode, year).is_some(), "{mode:?} {year:?}");
            }
        }
    }

    #[test]
    fn rail_is_conus_only() {
        let rail = LayerKey::new(Mode::Rail, Year::Y2018).expect("rail 2018");
        assert_eq!(rail.regions(), &[Region::Conus]);
        assert_eq!(rail.layer_ids(), vec!["noise_rail_2018".to_string()]);
    }

    #[test]
    fn ids_follow_the_naming_convention() {
        let key = LayerKey::new(Mode::AviationRoad, Year::Y2018).expect("avroad 2018");
        assert_eq!(key.base_id(), "noise_avroad_2018");
        assert_eq!(key.layer_id(Region::Conus), "noise_avroad_2018");
        assert_eq!(key.layer_id(Region::Alaska), "noise_avroad_2018_ak");
        assert_eq!(key.layer_id(Region::Hawaii), "noise_avroad_2018_hi");
    }
}
