//! Gate-pass codec: the scannable credential binding a reservation to a
//! vehicle.
//!
//! A pass is a JSON object with a truncated SHA-256 checksum over the
//! *signed* fields plus a shared secret. The checksum covers exactly
//! (reservation code, owner id, vehicle number), so a pass cannot be edited
//! to reference a different reservation, owner, or vehicle without
//! detection.
//!
//! Category and the entry/exit timestamps are *informational*: they are
//! carried for display at the gate but are not checksum-covered, because a
//! booking extension moves the scheduled exit without reminting the pass.
//! Verifiers must never authorize off informational fields; the gate state
//! machine re-reads the reservation row instead.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::CoreError;
use crate::types::{DbId, Timestamp};

/// Truncated checksum length in hex characters (64 bits).
const CHECKSUM_LEN: usize = 16;

/// Decoded gate-pass payload.
///
/// Signed (trustable for authorization): `code`, `owner_id`,
/// `vehicle_number`. Informational (display only): `category`, `start_time`,
/// `end_time`, `issued_at`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PassClaims {
    /// Public reservation code (e.g. `BK3F9A2C01`).
    pub code: String,
    pub owner_id: DbId,
    pub vehicle_number: String,
    pub category: String,
    pub start_time: Timestamp,
    pub end_time: Timestamp,
    pub issued_at: Timestamp,
    checksum: String,
}

/// Compute the truncated checksum binding a pass to its reservation.
fn checksum(code: &str, owner_id: DbId, vehicle_number: &str, secret: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(code.as_bytes());
    hasher.update(owner_id.to_string().as_bytes());
    hasher.update(vehicle_number.as_bytes());
    hasher.update(secret.as_bytes());
    let digest = hasher.finalize();
    let hex: String = digest.iter().map(|b| format!("{b:02x}")).collect();
    hex[..CHECKSUM_LEN].to_string()
}

/// Mint a gate pass for a reservation. The returned string is what the
/// checkpoint scanner presents back verbatim.
#[allow(clippy::too_many_arguments)]
pub fn mint(
    code: &str,
    owner_id: DbId,
    vehicle_number: &str,
    category: &str,
    start_time: Timestamp,
    end_time: Timestamp,
    issued_at: Timestamp,
    secret: &str,
) -> String {
    let claims = PassClaims {
        code: code.to_string(),
        owner_id,
        vehicle_number: vehicle_number.to_string(),
        category: category.to_string(),
        start_time,
        end_time,
        issued_at,
        checksum: checksum(code, owner_id, vehicle_number, secret),
    };
    // PassClaims contains no non-serializable types, so this cannot fail.
    serde_json::to_string(&claims).expect("gate pass serialization")
}

/// Decode and verify a scanned gate pass.
///
/// Fails with [`CoreError::TokenMalformed`] when the payload is not a valid
/// pass, or [`CoreError::ChecksumMismatch`] when any signed field was
/// altered.
pub fn decode(raw: &str, secret: &str) -> Result<PassClaims, CoreError> {
    let claims: PassClaims =
        serde_json::from_str(raw).map_err(|e| CoreError::TokenMalformed(e.to_string()))?;

    let expected = checksum(&claims.code, claims.owner_id, &claims.vehicle_number, secret);
    if claims.checksum != expected {
        return Err(CoreError::ChecksumMismatch);
    }
    Ok(claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::{TimeZone, Utc};

    const SECRET: &str = "test-pass-secret";

    fn mint_pass() -> String {
        let start = Utc.with_ymd_and_hms(2025, 10, 28, 10, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2025, 10, 28, 12, 0, 0).unwrap();
        mint("BK3F9A2C01", 42, "GJ 03 AY 1097", "car", start, end, start, SECRET)
    }

    #[test]
    fn minted_pass_round_trips() {
        let claims = decode(&mint_pass(), SECRET).unwrap();
        assert_eq!(claims.code, "BK3F9A2C01");
        assert_eq!(claims.owner_id, 42);
        assert_eq!(claims.vehicle_number, "GJ 03 AY 1097");
        assert_eq!(claims.category, "car");
    }

    #[test]
    fn garbage_is_malformed() {
        assert_matches!(
            decode("not a pass", SECRET),
            Err(CoreError::TokenMalformed(_))
        );
    }

    #[test]
    fn tampered_code_fails_checksum() {
        let tampered = mint_pass().replace("BK3F9A2C01", "BK00000000");
        assert_matches!(decode(&tampered, SECRET), Err(CoreError::ChecksumMismatch));
    }

    #[test]
    fn tampered_owner_fails_checksum() {
        let tampered = mint_pass().replace("\"owner_id\":42", "\"owner_id\":7");
        assert_matches!(decode(&tampered, SECRET), Err(CoreError::ChecksumMismatch));
    }

    #[test]
    fn tampered_vehicle_fails_checksum() {
        let tampered = mint_pass().replace("GJ 03 AY 1097", "MH 03 AA 4567");
        assert_matches!(decode(&tampered, SECRET), Err(CoreError::ChecksumMismatch));
    }

    #[test]
    fn wrong_secret_fails_checksum() {
        assert_matches!(
            decode(&mint_pass(), "another-secret"),
            Err(CoreError::ChecksumMismatch)
        );
    }

    #[test]
    fn informational_fields_are_not_signed() {
        // Extension moves the scheduled exit without reminting, so edits to
        // timestamps must still decode. Authorization never trusts them.
        let tampered = mint_pass().replace("12:00:00", "18:00:00");
        assert!(decode(&tampered, SECRET).is_ok());
    }
}
