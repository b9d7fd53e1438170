use crate::{ListingIdentity, ListingRecord};
use serde::Serialize;
use std::collections::HashSet;

/// Ordered set of listings. The first occurrence of a listing wins; later
/// records equal to it are dropped.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ListingCollection {
    listings: Vec<ListingRecord>,
    #[serde(skip)]
    seen: HashSet<ListingIdentity>,
}

impl ListingCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `listing` unless an equal one is already present. Returns
    /// whether it was added.
    pub fn add(&mut self, listing: ListingRecord) -> bool {
        if self.seen.insert(listing.identity()) {
            self.listings.push(listing);
            true
        } else {
            false
        }
    }

    /// Appends each listing in order; returns how many were new.
    pub fn add_range<I>(&mut self, listings: I) -> usize
    where
        I: IntoIterator<Item = ListingRecord>,
    {
        let mut added = 0;
        for listing in listings {
            if self.add(listing) {
                added += 1;
            }
        }
        added
    }

    pub fn contains(&self, listing: &ListingRecord) -> bool {
        self.seen.contains(&listing.identity())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ListingRecord> {
        self.listings.iter()
    }

    pub fn as_slice(&self) -> &[ListingRecord] {
        &self.listings
    }

    pub fn len(&self) -> usize {
        self.listings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }
}

impl<'a> IntoIterator for &'a ListingCollection {
    type Item = &'a ListingRecord;
    type IntoIter = std::slice::Iter<'a, ListingRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.listings.iter()
    }
}

impl IntoIterator for ListingCollection {
    type Item = ListingRecord;
    type IntoIter = std::vec::IntoIter<ListingRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.listings.into_iter()
    }
}

impl FromIterator<ListingRecord> for ListingCollection {
    fn from_iter<I: IntoIterator<Item = ListingRecord>>(iter: I) -> Self {
        let mut collection = Self::new();
        collection.add_range(iter);
        collection
    }
}
