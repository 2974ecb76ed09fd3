use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const MIN_DAYS: u8 = 1;
pub const MAX_DAYS: u8 = 30;
const DEFAULT_DAYS: u8 = 7;

/// Trip length in days, always within `MIN_DAYS..=MAX_DAYS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Days(u8);

impl Days {
    pub fn clamped(days: u8) -> Self {
        Days(days.clamp(MIN_DAYS, MAX_DAYS))
    }

    /// Clamps any integer, including values outside `u8`.
    pub fn saturating(days: i64) -> Self {
        Days(days.clamp(MIN_DAYS as i64, MAX_DAYS as i64) as u8)
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl Default for Days {
    fn default() -> Self {
        Days(DEFAULT_DAYS)
    }
}

impl fmt::Display for Days {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TripType {
    Lazer,
    Aventura,
    Cultural,
    Gastronomica,
}

impl TripType {
    pub const ALL: [TripType; 4] = [
        TripType::Lazer,
        TripType::Aventura,
        TripType::Cultural,
        TripType::Gastronomica,
    ];

    /// Identifier used in the form and in the prompt.
    pub fn as_str(self) -> &'static str {
        match self {
            TripType::Lazer => "lazer",
            TripType::Aventura => "aventura",
            TripType::Cultural => "cultural",
            TripType::Gastronomica => "gastronomica",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TripType::Lazer => "Leisure",
            TripType::Aventura => "Adventure",
            TripType::Cultural => "Cultural",
            TripType::Gastronomica => "Gastronomic",
        }
    }
}

// pick_list renders options through Display
impl fmt::Display for TripType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown trip type '{0}'")]
pub struct UnknownTripType(pub String);

impl FromStr for TripType {
    type Err = UnknownTripType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TripType::ALL
            .into_iter()
            .find(|t| t.as_str() == s.trim())
            .ok_or_else(|| UnknownTripType(s.to_string()))
    }
}

/// Immutable snapshot of a fully validated form, built only at submit time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripRequest {
    pub destination: String,
    pub days: Days,
    pub trip_type: Option<TripType>,
    pub interests: String,
    pub budget: f64,
}

impl TripRequest {
    pub fn trip_type_str(&self) -> &'static str {
        self.trip_type.map(TripType::as_str).unwrap_or("")
    }

    pub fn prompt(&self) -> String {
        format!(
            "Generate a detailed itinerary for a trip with the following characteristics:\n\
             Destination: {}\n\
             Duration: {} days\n\
             Trip type: {}\n\
             Interests: {}\n\
             Total budget: {} euros\n\n\
             Please provide a day-by-day itinerary, including suggested activities, places to visit, \
             and restaurant recommendations that fit the budget and interests specified.",
            self.destination,
            self.days,
            self.trip_type_str(),
            self.interests,
            self.budget,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokyo() -> TripRequest {
        TripRequest {
            destination: "Tokyo".to_string(),
            days: Days::clamped(5),
            trip_type: Some(TripType::Cultural),
            interests: "temples".to_string(),
            budget: 500.0,
        }
    }

    #[test]
    fn test_days_clamped_to_range() {
        assert_eq!(Days::clamped(0).get(), 1);
        assert_eq!(Days::clamped(31).get(), 30);
        assert_eq!(Days::clamped(12).get(), 12);
        assert_eq!(Days::default().get(), 7);
        assert_eq!(Days::saturating(300).get(), 30);
        assert_eq!(Days::saturating(-4).get(), 1);
    }

    #[test]
    fn test_trip_type_parse() {
        assert_eq!("cultural".parse::<TripType>(), Ok(TripType::Cultural));
        assert_eq!(" lazer ".parse::<TripType>(), Ok(TripType::Lazer));
        assert!("beach".parse::<TripType>().is_err());
    }

    #[test]
    fn test_prompt_mentions_every_field() {
        let prompt = tokyo().prompt();
        assert!(prompt.contains("Tokyo"));
        assert!(prompt.contains("5 days"));
        assert!(prompt.contains("cultural"));
        assert!(prompt.contains("temples"));
        assert!(prompt.contains("500 euros"));
    }
}
