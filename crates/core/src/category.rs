//! Vehicle categories and the hourly rate table.

use std::str::FromStr;

use crate::error::CoreError;
use crate::types::Money;

/// Hourly rate for two-wheelers.
pub const BIKE_HOURLY_RATE: Money = 20;
/// Hourly rate for four-wheelers.
pub const CAR_HOURLY_RATE: Money = 30;

/// Vehicle class with its own hourly rate and spot pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VehicleCategory {
    Bike,
    Car,
}

impl VehicleCategory {
    /// All categories, in spot-pool order.
    pub const ALL: [VehicleCategory; 2] = [VehicleCategory::Bike, VehicleCategory::Car];

    /// Hourly parking rate for this category.
    pub fn hourly_rate(self) -> Money {
        match self {
            Self::Bike => BIKE_HOURLY_RATE,
            Self::Car => CAR_HOURLY_RATE,
        }
    }

    /// Storage / API string form.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bike => "bike",
            Self::Car => "car",
        }
    }
}

impl FromStr for VehicleCategory {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bike" => Ok(Self::Bike),
            "car" => Ok(Self::Car),
            other => Err(CoreError::Validation(format!(
                "Unknown vehicle category '{other}'. Expected 'bike' or 'car'"
            ))),
        }
    }
}

impl std::fmt::Display for VehicleCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rates_match_the_tariff() {
        assert_eq!(VehicleCategory::Bike.hourly_rate(), 20);
        assert_eq!(VehicleCategory::Car.hourly_rate(), 30);
    }

    #[test]
    fn string_round_trip() {
        for cat in VehicleCategory::ALL {
            assert_eq!(cat.as_str().parse::<VehicleCategory>().unwrap(), cat);
        }
    }

    #[test]
    fn unknown_category_is_rejected() {
        assert!("truck".parse::<VehicleCategory>().is_err());
    }
}
