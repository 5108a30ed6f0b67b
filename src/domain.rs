use std::fmt;

/// One tracker category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Domain {
    Sleep,
    Period,
    Workout,
    Habit,
    Budget,
    Mood,
    Water,
}

impl Domain {
    pub const ALL: [Domain; 7] = [
        Domain::Sleep,
        Domain::Period,
        Domain::Workout,
        Domain::Habit,
        Domain::Budget,
        Domain::Mood,
        Domain::Water,
    ];

    /// Slot the domain's collection is persisted under.
    pub fn storage_key(self) -> &'static str {
        match self {
            Domain::Sleep => "tracklife:sleep",
            Domain::Period => "tracklife:period",
            Domain::Workout => "tracklife:workout",
            Domain::Habit => "tracklife:habits",
            Domain::Budget => "tracklife:budget",
            Domain::Mood => "tracklife:mood",
            Domain::Water => "tracklife:water",
        }
    }

    /// Path segment of the domain's status endpoint.
    pub fn api_name(self) -> &'static str {
        match self {
            Domain::Sleep => "sleep",
            Domain::Period => "period",
            Domain::Workout => "workout",
            Domain::Habit => "habits",
            Domain::Budget => "budget",
            Domain::Mood => "mood",
            Domain::Water => "water",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Domain::Sleep => "Sleep",
            Domain::Period => "Period",
            Domain::Workout => "Workout",
            Domain::Habit => "Habit",
            Domain::Budget => "Budget",
            Domain::Mood => "Mood",
            Domain::Water => "Water",
        }
    }

    pub fn from_api_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|domain| domain.api_name() == name)
    }
}

/// Second slot owned by the budget tracker.
pub const BUDGET_CATEGORIES_KEY: &str = "tracklife:budget:categories";

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_names_resolve_back_to_domains() {
        for domain in Domain::ALL {
            assert_eq!(Domain::from_api_name(domain.api_name()), Some(domain));
        }
        assert_eq!(Domain::from_api_name("habit"), None);
    }

    #[test]
    fn storage_keys_are_distinct() {
        let mut keys: Vec<_> = Domain::ALL.iter().map(|d| d.storage_key()).collect();
        keys.push(BUDGET_CATEGORIES_KEY);
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), 8);
    }
}
