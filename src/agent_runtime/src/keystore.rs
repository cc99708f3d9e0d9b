//! On-disk keypair and bearer-token persistence (spec §4.1 steps 1, 8).
//!
//! Everything lives under `auth_dir`: `agent.key` (PKCS#1 PEM private key,
//! mode 0600), `agent.pub` (PKCS#1 PEM public key), `bearer_token` (mode
//! 0600). The directory itself is created at mode 0700.

use std::fs;
use std::path::{Path, PathBuf};

use rsa::pkcs1::{DecodeRsaPrivateKey, DecodeRsaPublicKey, EncodeRsaPrivateKey, EncodeRsaPublicKey, LineEnding};
use rsa::pkcs1v15::SigningKey;
use rsa::signature::Signer;
use rsa::{RsaPrivateKey, RsaPublicKey};
use sha2::Sha256;

use crate::types::{AgentRuntimeError, AgentRuntimeResult};

const KEY_BITS: usize = 2048;

pub struct Keystore {
    dir: PathBuf,
    private_key: RsaPrivateKey,
    public_key_pem: String,
}

impl Keystore {
    /// Loads the keypair from `auth_dir` if present, otherwise generates a
    /// fresh one and persists it (spec §4.1 step 1: "on first install").
    pub fn load_or_create(auth_dir: &str) -> AgentRuntimeResult<Self> {
        let dir = PathBuf::from(auth_dir);
        ensure_private_dir(&dir)?;

        let key_path = dir.join("client.key");
        let pub_path = dir.join("client.pub");

        let private_key = if key_path.exists() {
            let pem = fs::read_to_string(&key_path)?;
            RsaPrivateKey::from_pkcs1_pem(&pem).map_err(|e| AgentRuntimeError::Keystore(e.to_string()))?
        } else {
            let mut rng = rand::thread_rng();
            let private_key =
                RsaPrivateKey::new(&mut rng, KEY_BITS).map_err(|e| AgentRuntimeError::Keystore(e.to_string()))?;
            let pem = private_key.to_pkcs1_pem(LineEnding::LF).map_err(|e| AgentRuntimeError::Keystore(e.to_string()))?;
            write_private_file(&key_path, pem.as_bytes())?;
            private_key
        };

        let public_key = RsaPublicKey::from(&private_key);
        let public_key_pem =
            public_key.to_pkcs1_pem(LineEnding::LF).map_err(|e| AgentRuntimeError::Keystore(e.to_string()))?;
        if !pub_path.exists() {
            fs::write(&pub_path, public_key_pem.as_bytes())?;
        }

        Ok(Self { dir, private_key, public_key_pem: public_key_pem.to_string() })
    }

    pub fn public_key_pem(&self) -> &str {
        &self.public_key_pem
    }

    /// PKCS#1 v1.5 + SHA-256 signature over `payload`, base64-encoded
    /// (spec §4.1 step 2, same scheme the server verifies with).
    pub fn sign(&self, payload: &str) -> String {
        let signing_key = SigningKey::<Sha256>::new(self.private_key.clone());
        let signature = signing_key.sign(payload.as_bytes());
        base64::Engine::encode(&base64::engine::general_purpose::STANDARD, signature.to_vec())
    }

    pub fn load_bearer_token(&self) -> Option<String> {
        fs::read_to_string(self.dir.join("client_token")).ok().map(|s| s.trim().to_string())
    }

    pub fn store_bearer_token(&self, token: &str) -> AgentRuntimeResult<()> {
        write_private_file(&self.dir.join("client_token"), token.as_bytes())
    }

    pub fn cursor_path(&self, source: &str) -> PathBuf {
        self.dir.join(format!("log-cursors.{source}"))
    }
}

fn ensure_private_dir(dir: &Path) -> AgentRuntimeResult<()> {
    fs::create_dir_all(dir)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(dir, fs::Permissions::from_mode(0o700))?;
    }
    Ok(())
}

fn write_private_file(path: &Path, contents: &[u8]) -> AgentRuntimeResult<()> {
    fs::write(path, contents)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_or_create_is_idempotent_across_process_restarts() {
        let dir = tempfile::tempdir().unwrap();
        let auth_dir = dir.path().to_str().unwrap();

        let first = Keystore::load_or_create(auth_dir).unwrap();
        let second = Keystore::load_or_create(auth_dir).unwrap();
        assert_eq!(first.public_key_pem(), second.public_key_pem());
    }

    #[test]
    fn bearer_token_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let keystore = Keystore::load_or_create(dir.path().to_str().unwrap()).unwrap();
        assert!(keystore.load_bearer_token().is_none());

        keystore.store_bearer_token("tok-abc123").unwrap();
        assert_eq!(keystore.load_bearer_token(), Some("tok-abc123".to_string()));
    }

    #[test]
    #[cfg(unix)]
    fn bearer_token_file_is_written_with_owner_only_permissions() {
        use std::os::unix::fs::PermissionsExt;
        let dir = tempfile::tempdir().unwrap();
        let keystore = Keystore::load_or_create(dir.path().to_str().unwrap()).unwrap();
        keystore.store_bearer_token("tok").unwrap();

        let meta = std::fs::metadata(dir.path().join("client_token")).unwrap();
        assert_eq!(meta.permissions().mode() & 0o777, 0o600);
    }

    #[test]
    fn signature_verifies_against_the_persisted_public_key() {
        use rsa::pkcs1v15::{Signature, VerifyingKey};
        use rsa::signature::Verifier;

        let dir = tempfile::tempdir().unwrap();
        let keystore = Keystore::load_or_create(dir.path().to_str().unwrap()).unwrap();
        let signature_b64 = keystore.sign("payload-bytes");

        let public_key = RsaPublicKey::from_pkcs1_pem(keystore.public_key_pem()).unwrap();
        let verifying_key = VerifyingKey::<Sha256>::new(public_key);
        let signature_bytes =
            base64::Engine::decode(&base64::engine::general_purpose::STANDARD, signature_b64).unwrap();
        let signature = Signature::try_from(signature_bytes.as_slice()).unwrap();
        assert!(verifying_key.verify(b"payload-bytes", &signature).is_ok());
    }
}
