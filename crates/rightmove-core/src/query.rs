use crate::codes::LocationCodes;
use crate::criteria::{Location, SearchCriteria};
use crate::{Result, RightmoveError};
use url::form_urlencoded;

const LOCATION_IDENTIFIER: &str = "locationIdentifier";
const MIN_BEDROOMS: &str = "minBedrooms";
const MAX_BEDROOMS: &str = "maxBedrooms";
const MIN_PRICE: &str = "minPrice";
const MAX_PRICE: &str = "maxPrice";
const PROPERTY_TYPES: &str = "propertyTypes";
const INCLUDE_SSTC: &str = "includeSSTC";
const SORT_TYPE: &str = "sortType";
const RADIUS: &str = "radius";

/// Turns [`SearchCriteria`] into the search page's query string.
pub struct QueryEncoder<'a> {
    codes: &'a LocationCodes,
}

impl<'a> QueryEncoder<'a> {
    pub fn new(codes: &'a LocationCodes) -> Self {
        Self { codes }
    }

    /// Parameters in emission order, before percent-encoding.
    pub fn parameters(&self, criteria: &SearchCriteria) -> Result<Vec<(&'static str, String)>> {
        let mut params = vec![(LOCATION_IDENTIFIER, self.location_identifier(criteria)?)];

        if criteria.min_bedrooms > 0 {
            params.push((MIN_BEDROOMS, criteria.min_bedrooms.to_string()));
        }

        if criteria.max_bedrooms > 0 && criteria.max_bedrooms >= criteria.min_bedrooms {
            params.push((MAX_BEDROOMS, criteria.max_bedrooms.to_string()));
        }

        if criteria.min_price > 0 {
            params.push((MIN_PRICE, criteria.min_price.to_string()));
        }

        if criteria.max_price > 0 && criteria.max_price >= criteria.min_price {
            params.push((MAX_PRICE, criteria.max_price.to_string()));
        }

        if !criteria.property_types.is_empty() {
            let tokens: Vec<&str> = criteria.property_types.iter().map(|t| t.token()).collect();
            params.push((PROPERTY_TYPES, tokens.join(",")));
        }

        if criteria.include_sstc {
            params.push((INCLUDE_SSTC, "true".to_string()));
        }

        params.push((SORT_TYPE, criteria.sort.code().to_string()));

        // f64 Display is locale independent: 0.25 -> "0.25", 5.0 -> "5"
        if criteria.radius() > 0.0 {
            params.push((RADIUS, criteria.radius().to_string()));
        }

        Ok(params)
    }

    /// Percent-encoded `key=value&...` string.
    pub fn encode(&self, criteria: &SearchCriteria) -> Result<String> {
        let params = self.parameters(criteria)?;
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, value) in &params {
            serializer.append_pair(key, value);
        }
        Ok(serializer.finish())
    }

    fn location_identifier(&self, criteria: &SearchCriteria) -> Result<String> {
        match &criteria.location {
            Some(Location::Outcode(outcode)) => self
                .codes
                .outcode(outcode)
                .map(|code| format!("OUTCODE^{}", code))
                .ok_or_else(|| {
                    RightmoveError::InvalidConfiguration(format!("unknown area code: {}", outcode))
                }),
            Some(Location::Region(region)) => self
                .codes
                .region(region)
                .map(|code| format!("REGION^{}", code))
                .ok_or_else(|| {
                    RightmoveError::InvalidConfiguration(format!("unknown region code: {}", region))
                }),
            None => Err(RightmoveError::InvalidConfiguration(
                "search criteria has neither an outcode nor a region".to_string(),
            )),
        }
    }
}
