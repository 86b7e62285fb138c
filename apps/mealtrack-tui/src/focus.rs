//! Form field focus

/// Which form input receives typed characters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    /// Meal name input (default)
    Name,
    /// Calorie count input
    Calories,
}

impl Default for Focus {
    fn default() -> Self {
        Focus::Name
    }
}

impl Focus {
    /// Cycle to the other input.
    pub fn next(self) -> Self {
        match self {
            Focus::Name => Focus::Calories,
            Focus::Calories => Focus::Name,
        }
    }
}
