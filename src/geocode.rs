//! Country name to ISO 3166-1 alpha-3 code resolution for the geographic view.
//!
//! Lookups go through the [`GeoReference`] seam, which may fail in several ways.
//! [`CodeResolver`] folds every failure into `None`; rows without a code are
//! dropped from the geographic subset and nowhere else.

use std::fmt;

use log::debug;
use serde::{Serialize, Serializer};
use thiserror::Error;

use crate::dataset::{RowRef, Subset};

/// A validated three-letter uppercase code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GeoCode(String);

impl GeoCode {
    pub fn parse(raw: &str) -> Option<GeoCode> {
        let valid = raw.len() == 3 && raw.bytes().all(|b| b.is_ascii_uppercase());
        valid.then(|| GeoCode(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GeoCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for GeoCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LookupError {
    #[error("No country matches '{0}'")]
    NotFound(String),
    #[error("'{name}' matches several countries: {candidates:?}")]
    Ambiguous {
        name: String,
        candidates: Vec<String>,
    },
    #[error("Geographic reference unavailable: {0}")]
    Unavailable(String),
}

/// External source of country codes.
pub trait GeoReference {
    fn lookup(&self, name: &str) -> Result<GeoCode, LookupError>;
}

struct CountryEntry {
    alpha2: &'static str,
    alpha3: &'static str,
    name: &'static str,
    aliases: &'static [&'static str],
}

const fn entry(
    alpha2: &'static str,
    alpha3: &'static str,
    name: &'static str,
    aliases: &'static [&'static str],
) -> CountryEntry {
    CountryEntry {
        alpha2,
        alpha3,
        name,
        aliases,
    }
}

static COUNTRIES: &[CountryEntry] = &[
    entry("AF", "AFG", "Afghanistan", &["Islamic Republic of Afghanistan"]),
    entry("DZ", "DZA", "Algeria", &[]),
    entry("AO", "AGO", "Angola", &[]),
    entry("AR", "ARG", "Argentina", &["Argentine Republic"]),
    entry("AU", "AUS", "Australia", &[]),
    entry("AT", "AUT", "Austria", &[]),
    entry("BD", "BGD", "Bangladesh", &[]),
    entry("BE", "BEL", "Belgium", &[]),
    entry("BO", "BOL", "Bolivia", &["Bolivia, Plurinational State of"]),
    entry("BR", "BRA", "Brazil", &[]),
    entry("CA", "CAN", "Canada", &[]),
    entry("CL", "CHL", "Chile", &[]),
    entry("CN", "CHN", "China", &["People's Republic of China"]),
    entry("CO", "COL", "Colombia", &[]),
    entry("CG", "COG", "Congo", &["Republic of the Congo"]),
    entry("CD", "COD", "Congo, The Democratic Republic of the", &["DR Congo", "Congo"]),
    entry("CU", "CUB", "Cuba", &[]),
    entry("CZ", "CZE", "Czechia", &["Czech Republic"]),
    entry("DK", "DNK", "Denmark", &[]),
    entry("EG", "EGY", "Egypt", &["Arab Republic of Egypt"]),
    entry("ET", "ETH", "Ethiopia", &[]),
    entry("FJ", "FJI", "Fiji", &["Republic of Fiji"]),
    entry("FI", "FIN", "Finland", &[]),
    entry("FR", "FRA", "France", &["French Republic"]),
    entry("DE", "DEU", "Germany", &["Federal Republic of Germany"]),
    entry("GH", "GHA", "Ghana", &[]),
    entry("GR", "GRC", "Greece", &[]),
    entry("IN", "IND", "India", &["Republic of India"]),
    entry("ID", "IDN", "Indonesia", &[]),
    entry("IR", "IRN", "Iran, Islamic Republic of", &["Iran"]),
    entry("IQ", "IRQ", "Iraq", &[]),
    entry("IE", "IRL", "Ireland", &[]),
    entry("IL", "ISR", "Israel", &["State of Israel"]),
    entry("IT", "ITA", "Italy", &["Italian Republic"]),
    entry("CI", "CIV", "Côte d'Ivoire", &["Ivory Coast"]),
    entry("JP", "JPN", "Japan", &[]),
    entry("KZ", "KAZ", "Kazakhstan", &[]),
    entry("KE", "KEN", "Kenya", &[]),
    entry("KP", "PRK", "Korea, Democratic People's Republic of", &["North Korea"]),
    entry("KR", "KOR", "Korea, Republic of", &["South Korea"]),
    entry("MY", "MYS", "Malaysia", &[]),
    entry("MX", "MEX", "Mexico", &["United Mexican States"]),
    entry("MA", "MAR", "Morocco", &[]),
    entry("MM", "MMR", "Myanmar", &["Burma"]),
    entry("NP", "NPL", "Nepal", &[]),
    entry("NL", "NLD", "Netherlands", &["Kingdom of the Netherlands"]),
    entry("NZ", "NZL", "New Zealand", &[]),
    entry("NG", "NGA", "Nigeria", &["Federal Republic of Nigeria"]),
    entry("NO", "NOR", "Norway", &[]),
    entry("PK", "PAK", "Pakistan", &["Islamic Republic of Pakistan"]),
    entry("PE", "PER", "Peru", &[]),
    entry("PH", "PHL", "Philippines", &[]),
    entry("PL", "POL", "Poland", &[]),
    entry("PT", "PRT", "Portugal", &[]),
    entry("RU", "RUS", "Russian Federation", &["Russia"]),
    entry("SA", "SAU", "Saudi Arabia", &[]),
    entry("ZA", "ZAF", "South Africa", &[]),
    entry("ES", "ESP", "Spain", &["Kingdom of Spain"]),
    entry("LK", "LKA", "Sri Lanka", &[]),
    entry("SE", "SWE", "Sweden", &[]),
    entry("CH", "CHE", "Switzerland", &[]),
    entry("SY", "SYR", "Syrian Arab Republic", &["Syria"]),
    entry("TW", "TWN", "Taiwan, Province of China", &["Taiwan"]),
    entry("TZ", "TZA", "Tanzania, United Republic of", &["Tanzania"]),
    entry("TH", "THA", "Thailand", &["Kingdom of Thailand"]),
    entry("TR", "TUR", "Türkiye", &["Turkey"]),
    entry("UA", "UKR", "Ukraine", &[]),
    entry("AE", "ARE", "United Arab Emirates", &[]),
    entry("GB", "GBR", "United Kingdom", &["United Kingdom of Great Britain and Northern Ireland"]),
    entry("US", "USA", "United States", &["United States of America"]),
    entry("UY", "URY", "Uruguay", &[]),
    entry("VE", "VEN", "Venezuela, Bolivarian Republic of", &["Venezuela"]),
    entry("VN", "VNM", "Viet Nam", &["Vietnam"]),
    entry("YE", "YEM", "Yemen", &[]),
    entry("ZM", "ZMB", "Zambia", &[]),
    entry("ZW", "ZWE", "Zimbabwe", &[]),
];

/// Built-in ISO 3166 reference. Matching is case-insensitive over codes, names and aliases.
#[derive(Debug, Clone, Copy, Default)]
pub struct IsoCountryTable;

impl IsoCountryTable {
    fn matches(entry: &CountryEntry, needle: &str) -> bool {
        entry.alpha2.eq_ignore_ascii_case(needle)
            || entry.alpha3.eq_ignore_ascii_case(needle)
            || entry.name.to_lowercase() == needle.to_lowercase()
            || entry
                .aliases
                .iter()
                .any(|alias| alias.to_lowercase() == needle.to_lowercase())
    }
}

impl GeoReference for IsoCountryTable {
    fn lookup(&self, name: &str) -> Result<GeoCode, LookupError> {
        let needle = name.trim();
        if needle.is_empty() {
            return Err(LookupError::NotFound(name.to_string()));
        }
        let candidates: Vec<&CountryEntry> = COUNTRIES
            .iter()
            .filter(|entry| Self::matches(entry, needle))
            .collect();
        match candidates.as_slice() {
            [] => Err(LookupError::NotFound(name.to_string())),
            [single] => GeoCode::parse(single.alpha3)
                .ok_or_else(|| LookupError::Unavailable(format!("bad code {}", single.alpha3))),
            many => Err(LookupError::Ambiguous {
                name: name.to_string(),
                candidates: many.iter().map(|e| e.alpha3.to_string()).collect(),
            }),
        }
    }
}

/// A row that resolved to a code.
#[derive(Debug, Clone)]
pub struct GeoRow<'a> {
    pub row: RowRef<'a>,
    pub code: GeoCode,
}

pub struct CodeResolver<'r> {
    reference: &'r dyn GeoReference,
}

impl<'r> CodeResolver<'r> {
    pub fn new(reference: &'r dyn GeoReference) -> Self {
        Self { reference }
    }

    /// Never fails: any lookup error is "unresolved".
    pub fn resolve(&self, country: &str) -> Option<GeoCode> {
        match self.reference.lookup(country) {
            Ok(code) => Some(code),
            Err(err) => {
                debug!("Unresolved country '{country}': {err}");
                None
            }
        }
    }

    /// The geographic subset: rows of `subset` with a resolved code, in order.
    pub fn geo_rows<'a>(&self, subset: &Subset<'a>) -> Vec<GeoRow<'a>> {
        subset
            .rows()
            .filter_map(|row| self.resolve(row.country()).map(|code| GeoRow { row, code }))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Offline;

    impl GeoReference for Offline {
        fn lookup(&self, _name: &str) -> Result<GeoCode, LookupError> {
            Err(LookupError::Unavailable("offline".to_string()))
        }
    }

    #[test]
    fn lookup_matches_names_aliases_and_codes() {
        let table = IsoCountryTable;
        assert_eq!(table.lookup("India").unwrap().as_str(), "IND");
        assert_eq!(table.lookup("india").unwrap().as_str(), "IND");
        assert_eq!(table.lookup("Russia").unwrap().as_str(), "RUS");
        assert_eq!(table.lookup("US").unwrap().as_str(), "USA");
        assert_eq!(table.lookup("gbr").unwrap().as_str(), "GBR");
    }

    #[test]
    fn lookup_reports_misses_and_ambiguity() {
        let table = IsoCountryTable;
        assert_eq!(
            table.lookup("Atlantis"),
            Err(LookupError::NotFound("Atlantis".to_string()))
        );
        assert!(matches!(
            table.lookup("Congo"),
            Err(LookupError::Ambiguous { .. })
        ));
    }

    #[test]
    fn resolver_swallows_every_failure() {
        let table = IsoCountryTable;
        let resolver = CodeResolver::new(&table);
        assert_eq!(resolver.resolve("Kosovo"), None);
        assert_eq!(resolver.resolve("Congo"), None);
        assert_eq!(resolver.resolve(""), None);

        let offline = Offline;
        assert_eq!(CodeResolver::new(&offline).resolve("India"), None);
    }

    #[test]
    fn geo_code_parse_validates_shape() {
        assert!(GeoCode::parse("IND").is_some());
        assert!(GeoCode::parse("IN").is_none());
        assert!(GeoCode::parse("ind").is_none());
        assert!(GeoCode::parse("IND1").is_none());
    }
}
