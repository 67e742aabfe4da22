//! UI state - presentation state separate from fleet data

/// Tab of the ship detail view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Overview,
    Voyage,
    Fuel,
    Costs,
    Maintenance,
}

impl Tab {
    pub fn all() -> Vec<Tab> {
        vec![
            Tab::Overview,
            Tab::Voyage,
            Tab::Fuel,
            Tab::Costs,
            Tab::Maintenance,
        ]
    }

    pub fn name(&self) -> &str {
        match self {
            Tab::Overview => "Overview",
            Tab::Voyage => "Voyages",
            Tab::Fuel => "Fuel",
            Tab::Costs => "Costs",
            Tab::Maintenance => "Maintenance",
        }
    }

    /// Tab bound to a digit key, `1` being the first
    pub fn from_digit(digit: char) -> Option<Tab> {
        let index = digit.to_digit(10)?.checked_sub(1)? as usize;
        Self::all().get(index).copied()
    }

    fn index(&self) -> usize {
        Self::all().iter().position(|t| t == self).unwrap_or(0)
    }
}

/// Active tab of the detail view
///
/// Survives ship changes; only explicit navigation moves it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DetailTabs {
    active: Tab,
}

impl DetailTabs {
    pub fn active(&self) -> Tab {
        self.active
    }

    pub fn set(&mut self, tab: Tab) {
        self.active = tab;
    }

    pub fn next(&mut self) {
        let tabs = Tab::all();
        self.active = tabs[(self.active.index() + 1) % tabs.len()];
    }

    pub fn previous(&mut self) {
        let tabs = Tab::all();
        let current = self.active.index();
        let prev = if current == 0 { tabs.len() - 1 } else { current - 1 };
        self.active = tabs[prev];
    }
}

/// Main application mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    Loading,
    Running,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tabs_wrap_in_both_directions() {
        let mut tabs = DetailTabs::default();
        assert_eq!(tabs.active(), Tab::Overview);

        tabs.previous();
        assert_eq!(tabs.active(), Tab::Maintenance);
        tabs.next();
        tabs.next();
        assert_eq!(tabs.active(), Tab::Voyage);
    }

    #[test]
    fn test_digit_keys_map_to_tabs() {
        assert_eq!(Tab::from_digit('1'), Some(Tab::Overview));
        assert_eq!(Tab::from_digit('4'), Some(Tab::Costs));
        assert_eq!(Tab::from_digit('0'), None);
        assert_eq!(Tab::from_digit('6'), None);
    }
}
