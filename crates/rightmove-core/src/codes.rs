use crate::Result;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

const BUNDLED_OUTCODES: &str = include_str!("../data/outcodes.json");
const BUNDLED_REGIONS: &str = include_str!("../data/regions.json");

#[derive(Debug, Deserialize)]
struct OutcodeEntry {
    outcode: String,
    code: u32,
}

/// Read-only mapping from outcode and region names to the site's numeric
/// location identifiers.
#[derive(Debug, Clone, Default)]
pub struct LocationCodes {
    outcodes: HashMap<String, u32>,
    regions: HashMap<String, u32>,
}

impl LocationCodes {
    /// Tables compiled into the crate. They cover a handful of areas only;
    /// use [`LocationCodes::from_files`] for the full site tables.
    pub fn bundled() -> Result<Self> {
        Self::from_json(BUNDLED_OUTCODES, BUNDLED_REGIONS)
    }

    /// `outcodes` is an array of `{"outcode": .., "code": ..}` objects,
    /// `regions` an object of `name: code` pairs.
    pub fn from_json(outcodes: &str, regions: &str) -> Result<Self> {
        let entries: Vec<OutcodeEntry> = serde_json::from_str(outcodes)?;
        let regions: HashMap<String, u32> = serde_json::from_str(regions)?;

        let codes = Self {
            outcodes: entries.into_iter().map(|e| (e.outcode, e.code)).collect(),
            regions,
        };
        debug!(
            "Loaded {} outcodes and {} regions",
            codes.outcode_count(),
            codes.region_count()
        );
        Ok(codes)
    }

    pub fn from_files(outcodes: &Path, regions: &Path) -> Result<Self> {
        debug!("Reading location codes from {} and {}", outcodes.display(), regions.display());
        let outcodes = std::fs::read_to_string(outcodes)?;
        let regions = std::fs::read_to_string(regions)?;
        Self::from_json(&outcodes, &regions)
    }

    pub fn outcode(&self, name: &str) -> Option<u32> {
        Self::lookup(&self.outcodes, name)
    }

    pub fn region(&self, name: &str) -> Option<u32> {
        Self::lookup(&self.regions, name)
    }

    /// Region names in alphabetical order.
    pub fn region_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.regions.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn outcode_count(&self) -> usize {
        self.outcodes.len()
    }

    pub fn region_count(&self) -> usize {
        self.regions.len()
    }

    fn lookup(table: &HashMap<String, u32>, name: &str) -> Option<u32> {
        let name = name.trim();
        table.get(name).copied().or_else(|| {
            table
                .iter()
                .find(|(key, _)| key.eq_ignore_ascii_case(name))
                .map(|(_, code)| *code)
        })
    }
}
