//! RSA signature verification and constant-time token comparison
//! (spec §4.1 registration protocol steps 4-5, §8 testable property 8).

use rsa::pkcs1v15::{Signature, VerifyingKey};
use rsa::pkcs1::DecodeRsaPublicKey;
use rsa::signature::Verifier;
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::types::{AuthError, AuthResult};

/// Registration payload, canonicalized the same way on the agent and
/// server so signing and verifying operate on identical bytes.
pub fn canonical_registration_payload(
    agent_id: &str,
    hostname: &str,
    public_key_pem: &str,
    nonce: &str,
    timestamp: i64,
) -> String {
    format!("{agent_id}|{hostname}|{public_key_pem}|{nonce}|{timestamp}")
}

/// Verifies a base64-encoded PKCS#1 v1.5 + SHA-256 signature against a
/// PKCS#1 PEM public key (spec §4.1 step 5).
pub fn verify_registration_signature(
    public_key_pem: &str,
    canonical_payload: &str,
    signature_b64: &str,
) -> AuthResult<()> {
    let public_key = rsa::RsaPublicKey::from_pkcs1_pem(public_key_pem)
        .map_err(|e| AuthError::InvalidKey(e.to_string()))?;
    let verifying_key = VerifyingKey::<Sha256>::new(public_key);

    let signature_bytes = base64::Engine::decode(&base64::engine::general_purpose::STANDARD, signature_b64)
        .map_err(|_| AuthError::BadSignature)?;
    let signature = Signature::try_from(signature_bytes.as_slice()).map_err(|_| AuthError::BadSignature)?;

    verifying_key
        .verify(canonical_payload.as_bytes(), &signature)
        .map_err(|_| AuthError::BadSignature)
}

/// Constant-time comparison — no early exit on the first mismatched byte,
/// so timing can't leak how much of a guessed token was correct.
pub fn tokens_match(presented: &str, expected: &str) -> bool {
    presented.as_bytes().ct_eq(expected.as_bytes()).into()
}
