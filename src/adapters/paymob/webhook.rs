//! Paymob transaction webhook HMAC verification.
//!
//! The provider signs each transaction callback by concatenating a fixed,
//! documented ordered subset of payload fields and computing HMAC-SHA512
//! over the result with the shared secret. Verification recomputes the
//! digest and compares in constant time. This boundary never fails loudly:
//! a malformed payload or bad hex reads as "not verified".

use hmac::{Hmac, Mac};
use serde_json::Value;
use sha2::Sha512;
use subtle::ConstantTimeEq;

type HmacSha512 = Hmac<Sha512>;

/// Provider-documented field order for the transaction callback HMAC.
///
/// Dotted entries address nested objects. Absent fields are skipped, not
/// rendered as empty strings.
const HMAC_FIELDS: [&str; 20] = [
    "amount_cents",
    "created_at",
    "currency",
    "error_occured",
    "has_parent_transaction",
    "id",
    "integration_id",
    "is_3d_secure",
    "is_auth",
    "is_capture",
    "is_refunded",
    "is_standalone_payment",
    "is_voided",
    "order.id",
    "owner",
    "pending",
    "source_data.pan",
    "source_data.sub_type",
    "source_data.type",
    "success",
];

fn lookup<'a>(payload: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = payload;
    for segment in path.split('.') {
        current = current.get(segment)?;
    }
    Some(current)
}

/// Render a scalar the way the provider does: booleans as `true`/`false`,
/// numbers verbatim, strings unquoted. Nulls count as absent.
fn render(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) => Some(s.clone()),
        // Arrays/objects never appear in the signed field set.
        Value::Array(_) | Value::Object(_) => None,
    }
}

fn signed_concatenation(payload: &Value) -> String {
    HMAC_FIELDS
        .iter()
        .filter_map(|field| lookup(payload, field).and_then(render))
        .collect()
}

/// Compute the hex-encoded HMAC-SHA512 signature for a callback payload.
pub fn compute_signature(secret: &str, payload: &Value) -> String {
    let mut mac =
        HmacSha512::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size");
    mac.update(signed_concatenation(payload).as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Verify a received signature against the payload in constant time.
///
/// Returns `false` for any internal failure; callers cannot distinguish a
/// forged signature from a malformed payload, by contract.
pub fn verify_signature(secret: &str, payload: &Value, received: &str) -> bool {
    let received_bytes = match hex::decode(received.trim()) {
        Ok(bytes) => bytes,
        Err(_) => return false,
    };

    let mut mac = match HmacSha512::new_from_slice(secret.as_bytes()) {
        Ok(mac) => mac,
        Err(_) => return false,
    };
    mac.update(signed_concatenation(payload).as_bytes());
    let expected = mac.finalize().into_bytes();

    expected.as_slice().ct_eq(received_bytes.as_slice()).unwrap_u8() == 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const TEST_SECRET: &str = "test-secret";

    /// HMAC-SHA512 of the reference payload's field concatenation under
    /// `test-secret`, computed independently of this module.
    const REFERENCE_SIGNATURE: &str = "679fec722d758c1f7759bbda51a4f241310edca7c720663f64a73b774b2d53d70f4ba898aec0de4b0b225d536b9c45885886e9c36225b7dea783171e57e3aeef";

    fn reference_payload() -> Value {
        json!({
            "amount_cents": 20000,
            "created_at": "2025-03-01T12:00:00.000000",
            "currency": "EGP",
            "error_occured": false,
            "has_parent_transaction": false,
            "id": 7001234,
            "integration_id": 112233,
            "is_3d_secure": true,
            "is_auth": false,
            "is_capture": false,
            "is_refunded": false,
            "is_standalone_payment": true,
            "is_voided": false,
            "order": { "id": 5009876 },
            "owner": 4455,
            "pending": false,
            "source_data": {
                "pan": "2346",
                "sub_type": "MasterCard",
                "type": "card"
            },
            "success": true
        })
    }

    #[test]
    fn concatenation_follows_documented_field_order() {
        assert_eq!(
            signed_concatenation(&reference_payload()),
            "200002025-03-01T12:00:00.000000EGPfalsefalse7001234112233true\
             falsefalsefalsetruefalse50098764455false2346MasterCardcardtrue"
        );
    }

    #[test]
    fn computed_signature_matches_reference() {
        assert_eq!(
            compute_signature(TEST_SECRET, &reference_payload()),
            REFERENCE_SIGNATURE
        );
    }

    #[test]
    fn reference_signature_verifies() {
        assert!(verify_signature(
            TEST_SECRET,
            &reference_payload(),
            REFERENCE_SIGNATURE
        ));
    }

    #[test]
    fn flipping_any_signed_field_fails_verification() {
        let mutations: [(&str, Value); 6] = [
            ("/amount_cents", json!(20001)),
            ("/currency", json!("USD")),
            ("/success", json!(false)),
            ("/order/id", json!(5009877)),
            ("/source_data/pan", json!("9999")),
            ("/is_3d_secure", json!(false)),
        ];

        for (pointer, new_value) in mutations {
            let mut payload = reference_payload();
            *payload.pointer_mut(pointer).unwrap() = new_value;
            assert!(
                !verify_signature(TEST_SECRET, &payload, REFERENCE_SIGNATURE),
                "mutation of {} should break verification",
                pointer
            );
        }
    }

    #[test]
    fn wrong_secret_fails_verification() {
        assert!(!verify_signature(
            "other-secret",
            &reference_payload(),
            REFERENCE_SIGNATURE
        ));
    }

    #[test]
    fn absent_fields_are_skipped_not_empty() {
        let mut payload = reference_payload();
        payload
            .pointer_mut("/source_data")
            .unwrap()
            .as_object_mut()
            .unwrap()
            .remove("pan");

        let concat = signed_concatenation(&payload);
        assert!(!concat.contains("2346"));
        // Signature over the shorter concatenation still round-trips.
        let signature = compute_signature(TEST_SECRET, &payload);
        assert!(verify_signature(TEST_SECRET, &payload, &signature));
        assert_ne!(signature, REFERENCE_SIGNATURE);
    }

    #[test]
    fn malformed_signature_hex_degrades_to_false() {
        assert!(!verify_signature(
            TEST_SECRET,
            &reference_payload(),
            "not-hex-at-all"
        ));
    }

    #[test]
    fn non_object_payload_degrades_to_false() {
        assert!(!verify_signature(TEST_SECRET, &json!("just a string"), REFERENCE_SIGNATURE));
    }

    #[test]
    fn uppercase_received_signature_is_accepted() {
        assert!(verify_signature(
            TEST_SECRET,
            &reference_payload(),
            &REFERENCE_SIGNATURE.to_uppercase()
        ));
    }
}
