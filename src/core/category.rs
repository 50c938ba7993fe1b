//! Enabled-category set
//!
//! Categories are plain names. A logger's category is enabled when the active
//! set is [`CategorySet::All`] or names it explicitly (case-insensitive).

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum CategorySet {
    #[default]
    All,
    /// Only the listed categories, stored lower-cased
    Only(BTreeSet<String>),
}

impl CategorySet {
    /// A set that enables nothing
    pub fn none() -> Self {
        CategorySet::Only(BTreeSet::new())
    }

    pub fn only<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = BTreeSet::new();
        for name in names {
            let name = name.as_ref().trim();
            if name == "*" || name.eq_ignore_ascii_case("all") {
                return CategorySet::All;
            }
            if !name.is_empty() {
                set.insert(name.to_lowercase());
            }
        }
        CategorySet::Only(set)
    }

    #[inline]
    pub fn is_enabled(&self, category: &str) -> bool {
        match self {
            CategorySet::All => true,
            CategorySet::Only(set) => set.contains(&category.trim().to_lowercase()),
        }
    }

    pub fn enable(&mut self, category: &str) {
        if let CategorySet::Only(set) = self {
            set.insert(category.trim().to_lowercase());
        }
    }

    pub fn disable(&mut self, category: &str) {
        if let CategorySet::Only(set) = self {
            set.remove(&category.trim().to_lowercase());
        }
    }
}

impl FromStr for CategorySet {
    type Err = String;

    /// Parses `All`, `*`, or a comma/pipe separated list of names
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(CategorySet::only(s.split([',', '|'])))
    }
}

impl fmt::Display for CategorySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategorySet::All => write!(f, "All"),
            CategorySet::Only(set) => {
                let names: Vec<&str> = set.iter().map(String::as_str).collect();
                write!(f, "{}", names.join(", "))
            }
        }
    }
}
