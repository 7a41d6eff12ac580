//! Known store locations
//!
//! Membership is verbatim string equality: "Ramallah" and "ramallah " are two
//! different locations.

use std::collections::HashSet;

/// Locations every installation starts with
pub const SEED_LOCATIONS: [&str; 9] = [
    "بيرزيت",
    "سردا",
    "ابو قش",
    "الطيرة",
    "رام الله البلد",
    "البالوع",
    "المصايف",
    "عين منجد",
    "ايقون مول",
];

/// Insertion-ordered set of location labels
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocationSet {
    ordered: Vec<String>,
    seen: HashSet<String>,
}

impl LocationSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set containing the seed locations
    pub fn seeded() -> Self {
        let mut set = Self::new();
        set.extend(SEED_LOCATIONS.iter().map(|s| s.to_string()));
        set
    }

    /// Add a location; returns false if it was already present
    pub fn insert(&mut self, location: impl Into<String>) -> bool {
        let location = location.into();
        if self.seen.contains(&location) {
            return false;
        }
        self.seen.insert(location.clone());
        self.ordered.push(location);
        true
    }

    pub fn contains(&self, location: &str) -> bool {
        self.seen.contains(location)
    }

    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ordered.iter().map(String::as_str)
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.ordered.clone()
    }
}

impl Extend<String> for LocationSet {
    fn extend<I: IntoIterator<Item = String>>(&mut self, iter: I) {
        for location in iter {
            self.insert(location);
        }
    }
}
