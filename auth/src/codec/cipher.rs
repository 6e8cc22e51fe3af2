use aes_gcm::aead::Aead;
use aes_gcm::aead::KeyInit;
use aes_gcm::Aes256Gcm;
use aes_gcm::Key;
use aes_gcm::Nonce;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::Digest;
use sha2::Sha256;

use super::errors::DecodeError;
use super::errors::EncodeError;
use crate::identity::SubjectId;
use crate::secret::AuthSecret;

/// Symmetric codec turning a subject identifier into an opaque bearer credential.
///
/// Credential format: `base64(nonce || ciphertext || tag)`
/// - Nonce: 12 bytes, fresh for every call
/// - Tag: 16 bytes, appended to the ciphertext by AES-256-GCM
///
/// The key is the SHA-256 digest of the shared secret, so credentials survive
/// restarts as long as the secret is unchanged.
#[derive(Clone)]
pub struct CredentialCodec {
    cipher: Aes256Gcm,
}

impl CredentialCodec {
    pub const NONCE_LENGTH: usize = 12;
    pub const TAG_LENGTH: usize = 16;

    /// Create a codec keyed from the shared secret.
    pub fn new(secret: &AuthSecret) -> Self {
        let key: Key<Aes256Gcm> = Sha256::digest(secret.as_bytes());
        Self {
            cipher: Aes256Gcm::new(&key),
        }
    }

    /// Encrypt a subject identifier into a bearer credential.
    ///
    /// Non-deterministic: two calls with the same subject yield different credentials.
    ///
    /// # Errors
    /// * `EncryptionFailed` - The cipher rejected the input
    pub fn encode(&self, subject: &SubjectId) -> Result<String, EncodeError> {
        let mut nonce_bytes = [0u8; Self::NONCE_LENGTH];
        OsRng.fill_bytes(&mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);

        let sealed = self
            .cipher
            .encrypt(nonce, subject.as_str().as_bytes())
            .map_err(|e| EncodeError::EncryptionFailed(e.to_string()))?;

        let mut combined = Vec::with_capacity(Self::NONCE_LENGTH + sealed.len());
        combined.extend_from_slice(&nonce_bytes);
        combined.extend_from_slice(&sealed);

        Ok(BASE64.encode(&combined))
    }

    /// Decrypt and authenticate a bearer credential.
    ///
    /// # Errors
    /// * `InvalidEncoding` - Input is not base64
    /// * `TooShort` - Input holds fewer bytes than nonce and tag
    /// * `Authentication` - Tag mismatch (tampered or encrypted under another key)
    /// * `InvalidPlaintext` - Decrypted bytes are not a UTF-8 subject identifier
    pub fn decode(&self, credential: &str) -> Result<SubjectId, DecodeError> {
        let combined = BASE64
            .decode(credential)
            .map_err(|e| DecodeError::InvalidEncoding(e.to_string()))?;

        let min = Self::NONCE_LENGTH + Self::TAG_LENGTH;
        if combined.len() < min {
            return Err(DecodeError::TooShort {
                min,
                actual: combined.len(),
            });
        }

        let (nonce_bytes, sealed) = combined.split_at(Self::NONCE_LENGTH);
        let nonce = Nonce::from_slice(nonce_bytes);

        let plaintext = self
            .cipher
            .decrypt(nonce, sealed)
            .map_err(|_| DecodeError::Authentication)?;

        let subject =
            String::from_utf8(plaintext).map_err(|e| DecodeError::InvalidPlaintext(e.to_string()))?;

        SubjectId::new(subject).map_err(|e| DecodeError::InvalidPlaintext(e.to_string()))
    }
}
