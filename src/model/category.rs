use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    Food,
    Location,
    Atmosphere,
    Service,
    Price,
    Menu,
    Speed,
}

pub const CATEGORY_COUNT: usize = 7;

pub fn category_order() -> &'static [Category; CATEGORY_COUNT] {
    &[
        Category::Food,
        Category::Location,
        Category::Atmosphere,
        Category::Service,
        Category::Price,
        Category::Menu,
        Category::Speed,
    ]
}

impl Category {
    /// Upper-case label used both as the column prefix and the chart axis label.
    pub fn label(self) -> &'static str {
        match self {
            Category::Food => "FOOD",
            Category::Location => "LOCATION",
            Category::Atmosphere => "ATMOSPHERE",
            Category::Service => "SERVICE",
            Category::Price => "PRICE",
            Category::Menu => "MENU",
            Category::Speed => "SPEED",
        }
    }

    /// Older labelling runs wrote ATMOSPHERE columns as `ATOMSPHERE_*`.
    pub fn legacy_label(self) -> Option<&'static str> {
        match self {
            Category::Atmosphere => Some("ATOMSPHERE"),
            _ => None,
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn score_column(self) -> String {
        format!("{}_score", self.label())
    }

    pub fn usefulness_column(self) -> String {
        format!("{}_usefulness", self.label())
    }

    /// Column holding the raw signal for one answer token (`1`..`5` or `NOT`).
    pub fn token_column(self, token: &str) -> String {
        format!("{}_{}", self.label(), token)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/model/category.rs"]
mod tests;
