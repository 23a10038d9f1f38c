//! How each category looks
//!
//! Kept out of the simulation: the render sink is handed this table and the
//! sim never learns about classes or glyphs.

use serde::Serialize;

use crate::sim::Category;

/// Visual hints for one category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PresentationHints {
    /// CSS class applied to the item element
    pub class: &'static str,
    /// Text content of the item element
    pub glyph: &'static str,
    /// Accessible label
    pub label: &'static str,
}

/// Category -> hints lookup
#[derive(Debug, Clone)]
pub struct PresentationTable {
    entries: Vec<(Category, PresentationHints)>,
}

const fn hint(class: &'static str, glyph: &'static str, label: &'static str) -> PresentationHints {
    PresentationHints {
        class,
        glyph,
        label,
    }
}

impl Default for PresentationTable {
    fn default() -> Self {
        Self {
            entries: vec![
                (Category::Common, hint("obj-bueno", "🧀", "cheese")),
                (Category::Hazard, hint("obj-malo", "💩", "hazard")),
                (Category::Bonus, hint("obj-dorado", "🧀", "golden cheese")),
                (Category::Shield, hint("obj-casco", "🛡️", "shield")),
                (Category::SlowTime, hint("obj-reloj", "⏳", "slow time")),
                (Category::SpeedBoost, hint("obj-turbo", "⚡", "speed boost")),
                (Category::Penalty, hint("obj-podrido", "💣", "rotten")),
            ],
        }
    }
}

impl PresentationTable {
    /// Fallback when a category has no entry
    pub const UNKNOWN: PresentationHints = PresentationHints {
        class: "obj",
        glyph: "•",
        label: "item",
    };

    pub fn hints(&self, category: Category) -> PresentationHints {
        self.entries
            .iter()
            .find(|(c, _)| *c == category)
            .map(|&(_, h)| h)
            .unwrap_or(Self::UNKNOWN)
    }

    /// Replace the hints for one category
    pub fn set(&mut self, category: Category, hints: PresentationHints) {
        match self.entries.iter_mut().find(|(c, _)| *c == category) {
            Some(entry) => entry.1 = hints,
            None => self.entries.push((category, hints)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_category_has_hints() {
        let table = PresentationTable::default();
        for category in Category::ALL {
            assert_ne!(table.hints(category), PresentationTable::UNKNOWN);
        }
    }

    #[test]
    fn test_override() {
        let mut table = PresentationTable::default();
        let custom = PresentationHints {
            class: "gold",
            glyph: "★",
            label: "star",
        };
        table.set(Category::Bonus, custom);
        assert_eq!(table.hints(Category::Bonus), custom);
    }
}
