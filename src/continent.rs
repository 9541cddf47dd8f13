//! Country to continent classification.
//!
//! The reference table is static data; [`lookup`] and [`classify`] are pure
//! exact-string lookups against it. No case folding and no trimming: a name that
//! differs from an entry in any way is unknown and classifies as
//! [`Continent::Other`].

use std::{collections::HashMap, fmt, str::FromStr, sync::OnceLock};

use serde::{Deserialize, Serialize};

use crate::error::SelectionError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Continent {
    Africa,
    Asia,
    Europe,
    #[serde(rename = "North America")]
    NorthAmerica,
    Oceania,
    #[serde(rename = "South America")]
    SouthAmerica,
    Other,
}

impl Continent {
    pub const ALL: [Continent; 7] = [
        Continent::Africa,
        Continent::Asia,
        Continent::Europe,
        Continent::NorthAmerica,
        Continent::Oceania,
        Continent::SouthAmerica,
        Continent::Other,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Continent::Africa => "Africa",
            Continent::Asia => "Asia",
            Continent::Europe => "Europe",
            Continent::NorthAmerica => "North America",
            Continent::Oceania => "Oceania",
            Continent::SouthAmerica => "South America",
            Continent::Other => "Other",
        }
    }

    /// Exact label match, the inverse of [`Continent::label`].
    pub fn from_label(label: &str) -> Option<Continent> {
        Continent::ALL.into_iter().find(|c| c.label() == label)
    }
}

impl fmt::Display for Continent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Continent {
    type Err = SelectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Continent::from_label(s).ok_or_else(|| SelectionError::UnknownContinent(s.to_string()))
    }
}

use Continent::{Africa, Asia, Europe, NorthAmerica, Oceania, SouthAmerica};

pub static REFERENCE_TABLE: &[(&str, Continent)] = &[
    // Asia
    ("Afghanistan", Asia),
    ("Armenia", Asia),
    ("Azerbaijan", Asia),
    ("Bahrain", Asia),
    ("Bangladesh", Asia),
    ("Bhutan", Asia),
    ("Brunei", Asia),
    ("Cambodia", Asia),
    ("China", Asia),
    ("Georgia", Asia),
    ("India", Asia),
    ("Indonesia", Asia),
    ("Iran", Asia),
    ("Iraq", Asia),
    ("Israel", Asia),
    ("Japan", Asia),
    ("Jordan", Asia),
    ("Kazakhstan", Asia),
    ("Kuwait", Asia),
    ("Kyrgyzstan", Asia),
    ("Laos", Asia),
    ("Lebanon", Asia),
    ("Malaysia", Asia),
    ("Maldives", Asia),
    ("Mongolia", Asia),
    ("Myanmar", Asia),
    ("Nepal", Asia),
    ("North Korea", Asia),
    ("Oman", Asia),
    ("Pakistan", Asia),
    ("Philippines", Asia),
    ("Qatar", Asia),
    ("Saudi Arabia", Asia),
    ("Singapore", Asia),
    ("South Korea", Asia),
    ("Sri Lanka", Asia),
    ("Syria", Asia),
    ("Taiwan", Asia),
    ("Tajikistan", Asia),
    ("Thailand", Asia),
    ("Timor-Leste", Asia),
    ("Turkey", Asia),
    ("Turkmenistan", Asia),
    ("United Arab Emirates", Asia),
    ("Uzbekistan", Asia),
    ("Vietnam", Asia),
    ("Yemen", Asia),
    // Europe
    ("Albania", Europe),
    ("Austria", Europe),
    ("Belarus", Europe),
    ("Belgium", Europe),
    ("Bosnia and Herzegovina", Europe),
    ("Bulgaria", Europe),
    ("Croatia", Europe),
    ("Cyprus", Europe),
    ("Czech Republic", Europe),
    ("Denmark", Europe),
    ("Estonia", Europe),
    ("Finland", Europe),
    ("France", Europe),
    ("Germany", Europe),
    ("Greece", Europe),
    ("Hungary", Europe),
    ("Iceland", Europe),
    ("Ireland", Europe),
    ("Italy", Europe),
    ("Latvia", Europe),
    ("Lithuania", Europe),
    ("Luxembourg", Europe),
    ("Malta", Europe),
    ("Moldova", Europe),
    ("Montenegro", Europe),
    ("Netherlands", Europe),
    ("North Macedonia", Europe),
    ("Norway", Europe),
    ("Poland", Europe),
    ("Portugal", Europe),
    ("Romania", Europe),
    ("Russia", Europe),
    ("Serbia", Europe),
    ("Slovakia", Europe),
    ("Slovenia", Europe),
    ("Spain", Europe),
    ("Sweden", Europe),
    ("Switzerland", Europe),
    ("Ukraine", Europe),
    ("United Kingdom", Europe),
    // Africa
    ("Algeria", Africa),
    ("Angola", Africa),
    ("Benin", Africa),
    ("Botswana", Africa),
    ("Burkina Faso", Africa),
    ("Burundi", Africa),
    ("Cameroon", Africa),
    ("Chad", Africa),
    ("DR Congo", Africa),
    ("Egypt", Africa),
    ("Ethiopia", Africa),
    ("Ghana", Africa),
    ("Guinea", Africa),
    ("Ivory Coast", Africa),
    ("Kenya", Africa),
    ("Libya", Africa),
    ("Madagascar", Africa),
    ("Malawi", Africa),
    ("Mali", Africa),
    ("Morocco", Africa),
    ("Mozambique", Africa),
    ("Namibia", Africa),
    ("Niger", Africa),
    ("Nigeria", Africa),
    ("Rwanda", Africa),
    ("Senegal", Africa),
    ("Somalia", Africa),
    ("South Africa", Africa),
    ("South Sudan", Africa),
    ("Sudan", Africa),
    ("Tanzania", Africa),
    ("Tunisia", Africa),
    ("Uganda", Africa),
    ("Zambia", Africa),
    ("Zimbabwe", Africa),
    // North America
    ("Canada", NorthAmerica),
    ("Costa Rica", NorthAmerica),
    ("Cuba", NorthAmerica),
    ("Dominican Republic", NorthAmerica),
    ("El Salvador", NorthAmerica),
    ("Guatemala", NorthAmerica),
    ("Haiti", NorthAmerica),
    ("Honduras", NorthAmerica),
    ("Jamaica", NorthAmerica),
    ("Mexico", NorthAmerica),
    ("Nicaragua", NorthAmerica),
    ("Panama", NorthAmerica),
    ("United States", NorthAmerica),
    // South America
    ("Argentina", SouthAmerica),
    ("Bolivia", SouthAmerica),
    ("Brazil", SouthAmerica),
    ("Chile", SouthAmerica),
    ("Colombia", SouthAmerica),
    ("Ecuador", SouthAmerica),
    ("Guyana", SouthAmerica),
    ("Paraguay", SouthAmerica),
    ("Peru", SouthAmerica),
    ("Suriname", SouthAmerica),
    ("Uruguay", SouthAmerica),
    ("Venezuela", SouthAmerica),
    // Oceania
    ("Australia", Oceania),
    ("Fiji", Oceania),
    ("Kiribati", Oceania),
    ("New Zealand", Oceania),
    ("Papua New Guinea", Oceania),
    ("Samoa", Oceania),
    ("Solomon Islands", Oceania),
    ("Tonga", Oceania),
    ("Vanuatu", Oceania),
];

fn index() -> &'static HashMap<&'static str, Continent> {
    static INDEX: OnceLock<HashMap<&'static str, Continent>> = OnceLock::new();
    INDEX.get_or_init(|| REFERENCE_TABLE.iter().copied().collect())
}

/// Exact lookup; `None` for any name absent from the reference table.
pub fn lookup(country: &str) -> Option<Continent> {
    index().get(country).copied()
}

pub fn classify(country: &str) -> Continent {
    lookup(country).unwrap_or(Continent::Other)
}
