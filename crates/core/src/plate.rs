//! Number-plate format predicate, consumed before a reservation is created.
//!
//! Both patterns accept the traditional Indian plate layout with optional
//! spaces between the parts and no hyphens (the newer BH series is not
//! matched). Car plates are normalized to uppercase before matching; bike
//! plates are matched as presented and allow a longer series code.

use std::sync::LazyLock;

use regex::Regex;

use crate::category::VehicleCategory;

/// State code, district code, 1-2 letter series, 4-digit number.
static CAR_PLATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Z]{2}\s?[0-9]{1,2}\s?[A-Z]{1,2}\s?[0-9]{4}$").expect("car plate regex")
});

/// Same layout, series code up to 3 letters.
static BIKE_PLATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Z]{2}\s?[0-9]{1,2}\s?[A-Z]{1,3}\s?[0-9]{4}$").expect("bike plate regex")
});

/// Pure predicate: does `raw` look like a valid plate for `category`?
pub fn is_valid_plate(category: VehicleCategory, raw: &str) -> bool {
    match category {
        VehicleCategory::Car => CAR_PLATE.is_match(&raw.to_uppercase()),
        VehicleCategory::Bike => BIKE_PLATE.is_match(raw),
    }
}

/// Canonical stored form of a plate. Car plates are stored uppercased to
/// match the validation normalization; bike plates are stored as presented.
pub fn normalize(category: VehicleCategory, raw: &str) -> String {
    match category {
        VehicleCategory::Car => raw.to_uppercase(),
        VehicleCategory::Bike => raw.to_string(),
    }
}

/// User-facing description of the expected format, surfaced on rejection.
pub fn expected_format(category: VehicleCategory) -> &'static str {
    match category {
        VehicleCategory::Car => "GJ 03 AY 1097 or GJ03AY1097",
        VehicleCategory::Bike => "MH 03 AA 4567 or MH03AA4567",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_car_plates() {
        for plate in ["GJ 03 AY 1097", "GJ03AY1097", "DL 01 AB 9876"] {
            assert!(is_valid_plate(VehicleCategory::Car, plate), "{plate}");
        }
    }

    #[test]
    fn car_plates_are_case_normalized() {
        assert!(is_valid_plate(VehicleCategory::Car, "gj 03 ay 1097"));
    }

    #[test]
    fn invalid_car_plates() {
        for plate in ["MH-05-DL-9023", "22 BH 4928 A", "DL 29 KJX 0001", ""] {
            assert!(!is_valid_plate(VehicleCategory::Car, plate), "{plate}");
        }
    }

    #[test]
    fn valid_bike_plates() {
        for plate in ["MH03AA4567", "GJ 01 AY 1097", "UP 50 BY 1998", "DL 29 KJX 0001"] {
            assert!(is_valid_plate(VehicleCategory::Bike, plate), "{plate}");
        }
    }

    #[test]
    fn invalid_bike_plates() {
        for plate in ["invalid_plate", "MH-03-AA-4567", "1234"] {
            assert!(!is_valid_plate(VehicleCategory::Bike, plate), "{plate}");
        }
    }
}
