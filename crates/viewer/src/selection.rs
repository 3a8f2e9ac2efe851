use layers::{Mode, Year};

/// UI selection state: the active mode (at most one) and the current year.
///
/// Pure state transitions with no map side effects; every mutation returns
/// a transition value describing what changed, which the controller
/// consumes to reconcile the map.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SelectionState {
    active: Option<Mode>,
    year: Year,
}

/// Result of a mode-button press.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ModeToggle {
    pub deactivated: Option<Mode>,
    pub activated: Option<Mode>,
}

/// Result of a year-slider move that actually changed the year.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct YearSwitch {
    pub previous: Year,
    pub current: Year,
}

impl SelectionState {
    pub fn new(year: Year) -> Self {
        Self { active: None, year }
    }

    pub fn active_mode(&self) -> Option<Mode> {
        self.active
    }

    pub fn year(&self) -> Year {
        self.year
    }

    pub fn other_year(&self) -> Year {
        self.year.other()
    }

    /// Pressing the active mode's button deactivates it; pressing any
    /// other button replaces the active mode.
    pub fn toggle_mode(&mut self, mode: Mode) -> ModeToggle {
        if self.active == Some(mode) {
            self.active = None;
            ModeToggle {
                deactivated: Some(mode),
                activated: None,
            }
        } else {
            let deactivated = self.active.replace(mode);
            ModeToggle {
                deactivated,
                activated: Some(mode),
            }
        }
    }

    /// Returns `None` when the slider lands on the year already shown.
    pub fn select_year(&mut self, year: Year) -> Option<YearSwitch> {
        if self.year == year {
            return None;
        }
        let previous = self.year;
        self.year = year;
        Some(YearSwitch {
            previous,
            current: year,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{ModeToggle, SelectionState};
    use layers::{Mode, Year};

    #[test]
    fn toggling_the_active_mode_deactivates_it() {
        let mut s = SelectionState::new(Year::Y2018);
        s.toggle_mode(Mode::Aviation);
        assert_eq!(s.active_mode(), Some(Mode::Aviation));

        let t = s.toggle_mode(Mode::Aviation);
        assert_eq!(
            t,
            ModeToggle {
                deactivated: Some(Mode::Aviation),
                activated: None
            }
        );
        assert_eq!(s.active_mode(), None);
    }

    #[test]
    fn activating_a_second_mode_replaces_the_first() {
        let mut s = SelectionState::new(Year::Y2018);
        s.toggle_mode(Mode::Aviation);
        let t = s.toggle_mode(Mode::Road);
        assert_eq!(
            t,
            ModeToggle {
                deactivated: Some(Mode::Aviation),
                activated: Some(Mode::Road)
            }
        );
        assert_eq!(s.active_mode(), Some(Mode::Road));
    }

    #[test]
    fn year_switch_reports_previous_and_current() {
        let mut s = SelectionState::new(Year::Y2018);
        let switch = s.select_year(Year::Y2016).expect("year changed");
        assert_eq!(switch.previous, Year::Y2018);
        assert_eq!(switch.current, Year::Y2016);
        assert_eq!(s.year(), Year::Y2016);
        assert_eq!(s.other_year(), Year::Y2018);
    }

    #[test]
    fn same_year_is_a_no_op() {
        let mut s = SelectionState::new(Year::Y2018);
        assert_eq!(s.select_year(Year::Y2018), None);
    }

    #[test]
    fn year_switch_does_not_touch_the_active_mode() {
        let mut s = SelectionState::new(Year::Y2018);
        s.toggle_mode(Mode::Rail);
        s.select_year(Year::Y2016);
        assert_eq!(s.active_mode(), Some(Mode::Rail));
    }
}
