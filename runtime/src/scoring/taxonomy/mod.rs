//! Rule taxonomies: ordered item lists grouped into categories.

pub mod krds;
pub mod nielsen;
pub mod uiux;

use crate::rules::ItemSpec;
use crate::scoring::report::GradeScale;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy)]
pub struct Category {
    pub id: &'static str,
    pub name: &'static str,
}

/// A named rule set. Item order is declaration order in reports.
#[derive(Debug)]
pub struct Taxonomy {
    pub name: &'static str,
    pub title: &'static str,
    pub categories: Vec<Category>,
    pub items: Vec<ItemSpec>,
    pub grading: GradeScale,
}

impl Taxonomy {
    pub fn item(&self, id: &str) -> Option<&ItemSpec> {
        self.items.iter().find(|i| i.id == id)
    }

    pub fn items_in<'a>(&'a self, category: &'a str) -> impl Iterator<Item = &'a ItemSpec> + 'a {
        self.items.iter().filter(move |i| i.category == category)
    }
}

/// Built-in taxonomies selectable by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaxonomyKind {
    Nielsen,
    KrdsAccessibility,
    KrdsUiux,
}

impl TaxonomyKind {
    pub const ALL: [TaxonomyKind; 3] = [
        TaxonomyKind::Nielsen,
        TaxonomyKind::KrdsAccessibility,
        TaxonomyKind::KrdsUiux,
    ];

    pub fn taxonomy(&self) -> &'static Taxonomy {
        match self {
            TaxonomyKind::Nielsen => nielsen::taxonomy(),
            TaxonomyKind::KrdsAccessibility => krds::taxonomy(),
            TaxonomyKind::KrdsUiux => uiux::taxonomy(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            TaxonomyKind::Nielsen => nielsen::NAME,
            TaxonomyKind::KrdsAccessibility => krds::NAME,
            TaxonomyKind::KrdsUiux => uiux::NAME,
        }
    }
}

impl fmt::Display for TaxonomyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TaxonomyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "nielsen" => Ok(TaxonomyKind::Nielsen),
            "krds-accessibility" | "krds" | "accessibility" => Ok(TaxonomyKind::KrdsAccessibility),
            "krds-uiux" | "uiux" => Ok(TaxonomyKind::KrdsUiux),
            other => Err(format!(
                "unknown taxonomy '{other}' (expected nielsen, krds-accessibility or krds-uiux)"
            )),
        }
    }
}
