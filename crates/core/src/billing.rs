//! Exit-charge computation for gate exits.
//!
//! Two policies exist in the field and are not equivalent; a deployment
//! selects exactly one:
//!
//! - [`OverstayPolicy::BookedDuration`] bills the actual stay against the
//!   booked duration: each started hour beyond what was paid for costs one
//!   hourly rate. Requires a recorded entry scan.
//! - [`OverstayPolicy::FlatLateFee`] charges a single flat fee of twice the
//!   hourly rate whenever the vehicle leaves after the scheduled exit,
//!   regardless of how late. Used where entry is not separately scanned.

use std::str::FromStr;

use crate::category::VehicleCategory;
use crate::error::CoreError;
use crate::types::{Money, Timestamp};

/// Flat late-exit fee is this many hourly rates.
pub const FLAT_FINE_MULTIPLIER: Money = 2;

/// Which exit-charge policy a deployment runs with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverstayPolicy {
    BookedDuration,
    FlatLateFee,
}

impl FromStr for OverstayPolicy {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "overstay" => Ok(Self::BookedDuration),
            "flat" => Ok(Self::FlatLateFee),
            other => Err(CoreError::Validation(format!(
                "Unknown exit policy '{other}'. Expected 'overstay' or 'flat'"
            ))),
        }
    }
}

/// Outcome of the exit-charge computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCharge {
    pub overstay: bool,
    pub surcharge: Money,
}

impl ExitCharge {
    const NONE: ExitCharge = ExitCharge {
        overstay: false,
        surcharge: 0,
    };
}

/// Compute the exit charge under the given policy.
///
/// `booked_hours` is the paid duration in whole hours; `actual_entry` is the
/// entry-scan timestamp; `scheduled_end` the booked exit time; `now` the
/// exit-scan timestamp.
pub fn exit_charge(
    policy: OverstayPolicy,
    category: VehicleCategory,
    booked_hours: i64,
    actual_entry: Timestamp,
    scheduled_end: Timestamp,
    now: Timestamp,
) -> ExitCharge {
    match policy {
        OverstayPolicy::BookedDuration => {
            let elapsed_secs = (now - actual_entry).num_seconds().max(0);
            let booked_secs = booked_hours * 3600;
            if elapsed_secs <= booked_secs {
                return ExitCharge::NONE;
            }
            // Each started hour beyond the booked duration is billed.
            let extra_hours = (elapsed_secs - booked_secs + 3599) / 3600;
            ExitCharge {
                overstay: true,
                surcharge: extra_hours * category.hourly_rate(),
            }
        }
        OverstayPolicy::FlatLateFee => {
            if now <= scheduled_end {
                return ExitCharge::NONE;
            }
            ExitCharge {
                overstay: true,
                surcharge: FLAT_FINE_MULTIPLIER * category.hourly_rate(),
            }
        }
    }
}
