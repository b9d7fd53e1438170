use crate::{Result, RightmoveError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::str::FromStr;

/// Radius values (in miles) the search form accepts.
pub const ALLOWED_RADIUS_VALUES: [f64; 11] =
    [0.0, 0.25, 0.5, 1.0, 3.0, 5.0, 10.0, 15.0, 20.0, 30.0, 40.0];

/// Price steps offered by the site's min/max price dropdowns.
pub const ALLOWED_PRICES: [i64; 56] = [
    0, 50_000, 60_000, 70_000, 80_000, 90_000, 100_000, 110_000, 120_000, 125_000, 130_000,
    140_000, 150_000, 160_000, 170_000, 175_000, 180_000, 190_000, 200_000, 210_000, 220_000,
    230_000, 240_000, 250_000, 260_000, 270_000, 280_000, 290_000, 300_000, 325_000, 350_000,
    375_000, 400_000, 425_000, 450_000, 475_000, 500_000, 550_000, 600_000, 650_000, 700_000,
    800_000, 900_000, 1_000_000, 1_250_000, 1_500_000, 1_750_000, 2_000_000, 2_500_000,
    3_000_000, 4_000_000, 5_000_000, 7_500_000, 10_000_000, 15_000_000, 20_000_000,
];

const DEFAULT_MIN_BEDROOMS: u32 = 2;
const DEFAULT_MAX_BEDROOMS: u32 = 3;
const DEFAULT_MIN_PRICE: i64 = 150_000;
const DEFAULT_MAX_PRICE: i64 = 300_000;

/// Property categories understood by the `propertyTypes` parameter.
///
/// Declaration order is the order tokens are emitted in the query string.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PropertyType {
    Bungalow,
    Flat,
    Land,
    SemiDetached,
    Detached,
    Terraced,
    ParkHome,
}

impl PropertyType {
    pub const ALL: [PropertyType; 7] = [
        PropertyType::Bungalow,
        PropertyType::Flat,
        PropertyType::Land,
        PropertyType::SemiDetached,
        PropertyType::Detached,
        PropertyType::Terraced,
        PropertyType::ParkHome,
    ];

    /// Token used on the wire.
    pub fn token(&self) -> &'static str {
        match self {
            PropertyType::Bungalow => "bungalow",
            PropertyType::Flat => "flat",
            PropertyType::Land => "land",
            PropertyType::SemiDetached => "semi-detached",
            PropertyType::Detached => "detached",
            PropertyType::Terraced => "terraced",
            PropertyType::ParkHome => "park-home",
        }
    }
}

impl std::fmt::Display for PropertyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PropertyType::Bungalow => write!(f, "Bungalow"),
            PropertyType::Flat => write!(f, "Flat"),
            PropertyType::Land => write!(f, "Land"),
            PropertyType::SemiDetached => write!(f, "Semi-detached"),
            PropertyType::Detached => write!(f, "Detached"),
            PropertyType::Terraced => write!(f, "Terraced"),
            PropertyType::ParkHome => write!(f, "Park home"),
        }
    }
}

impl FromStr for PropertyType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().replace(['_', ' '], "-").as_str() {
            "bungalow" | "bungalows" => Ok(PropertyType::Bungalow),
            "flat" | "flats" | "apartment" | "apartments" => Ok(PropertyType::Flat),
            "land" => Ok(PropertyType::Land),
            "semi-detached" | "semi" => Ok(PropertyType::SemiDetached),
            "detached" => Ok(PropertyType::Detached),
            "terraced" | "terrace" => Ok(PropertyType::Terraced),
            "park-home" | "park-homes" => Ok(PropertyType::ParkHome),
            _ => Err(format!(
                "Invalid property type: {}. Valid options are: bungalow, flat, land, semi-detached, detached, terraced, park-home",
                s
            )),
        }
    }
}

/// Result ordering; the discriminant is the site's `sortType` code.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum SortType {
    HighestPrice = 0,
    LowestPrice = 1,
    #[default]
    NewestListed = 6,
    OldestListed = 10,
}

impl SortType {
    pub fn code(&self) -> u32 {
        *self as u32
    }
}

impl std::fmt::Display for SortType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortType::HighestPrice => write!(f, "Highest price"),
            SortType::LowestPrice => write!(f, "Lowest price"),
            SortType::NewestListed => write!(f, "Newest listed"),
            SortType::OldestListed => write!(f, "Oldest listed"),
        }
    }
}

impl FromStr for SortType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().replace(['_', ' '], "-").as_str() {
            "highest-price" | "highest" => Ok(SortType::HighestPrice),
            "lowest-price" | "lowest" => Ok(SortType::LowestPrice),
            "newest-listed" | "newest" => Ok(SortType::NewestListed),
            "oldest-listed" | "oldest" => Ok(SortType::OldestListed),
            _ => Err(format!(
                "Invalid sort order: {}. Valid options are: highest-price, lowest-price, newest-listed, oldest-listed",
                s
            )),
        }
    }
}

/// Search radius in miles, restricted to [`ALLOWED_RADIUS_VALUES`].
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Default)]
pub struct Radius(f64);

impl Radius {
    pub fn value(&self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for Radius {
    type Error = RightmoveError;

    fn try_from(value: f64) -> Result<Self> {
        if ALLOWED_RADIUS_VALUES.contains(&value) {
            Ok(Radius(value))
        } else {
            Err(RightmoveError::InvalidConfiguration(format!(
                "radius {} is not one of {:?}",
                value, ALLOWED_RADIUS_VALUES
            )))
        }
    }
}

impl<'de> Deserialize<'de> for Radius {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = f64::deserialize(deserializer)?;
        Radius::try_from(value).map_err(serde::de::Error::custom)
    }
}

/// Where to search: a postal outcode ("OL6") or a named region.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum Location {
    Outcode(String),
    Region(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchCriteria {
    pub location: Option<Location>,
    pub min_bedrooms: u32,
    pub max_bedrooms: u32,
    pub min_price: i64,
    pub max_price: i64,
    pub property_types: BTreeSet<PropertyType>,
    pub sort: SortType,
    pub include_sstc: bool,
    radius: Radius,
}

impl Default for SearchCriteria {
    fn default() -> Self {
        Self {
            location: None,
            min_bedrooms: DEFAULT_MIN_BEDROOMS,
            max_bedrooms: DEFAULT_MAX_BEDROOMS,
            min_price: DEFAULT_MIN_PRICE,
            max_price: DEFAULT_MAX_PRICE,
            property_types: BTreeSet::new(),
            sort: SortType::default(),
            include_sstc: false,
            radius: Radius::default(),
        }
    }
}

impl SearchCriteria {
    /// Criteria with every optional filter switched off.
    pub fn unfiltered(location: Location) -> Self {
        Self {
            location: Some(location),
            min_bedrooms: 0,
            max_bedrooms: 0,
            min_price: 0,
            max_price: 0,
            ..Self::default()
        }
    }

    pub fn outcode(outcode: impl Into<String>) -> Self {
        Self {
            location: Some(Location::Outcode(outcode.into())),
            ..Self::default()
        }
    }

    pub fn region(region: impl Into<String>) -> Self {
        Self {
            location: Some(Location::Region(region.into())),
            ..Self::default()
        }
    }

    pub fn radius(&self) -> f64 {
        self.radius.value()
    }

    /// Rejects any value outside [`ALLOWED_RADIUS_VALUES`], leaving the
    /// current radius untouched.
    pub fn set_radius(&mut self, radius: f64) -> Result<()> {
        self.radius = Radius::try_from(radius)?;
        Ok(())
    }

    pub fn with_radius(mut self, radius: f64) -> Result<Self> {
        self.set_radius(radius)?;
        Ok(self)
    }

    pub fn is_valid(&self) -> bool {
        match &self.location {
            Some(Location::Outcode(name)) | Some(Location::Region(name)) => !name.trim().is_empty(),
            None => false,
        }
    }
}
