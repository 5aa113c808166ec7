use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use rand::rngs::OsRng;
use serde::{Serialize, Serializer};
use thiserror::Error;

use std::fmt;
use std::str::FromStr;

/// Errors that can occur during cryptographic operations
#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("Invalid public key: {0}")]
    InvalidPublicKey(String),

    #[error("Invalid private key: {0}")]
    InvalidPrivateKey(String),

    #[error("Invalid signature: {0}")]
    InvalidSignature(String),

    #[error("Decoding error: {0}")]
    DecodingError(String),
}

/// An ed25519 private key controlling an account
///
/// Displays and parses as hex so it can round-trip through an environment
/// file and the console.
#[derive(Debug, Clone)]
pub struct PrivateKey {
    signing_key: SigningKey,
}

impl PrivateKey {
    /// Generates a fresh random private key
    pub fn generate() -> Self {
        let mut csprng = OsRng;
        let signing_key = SigningKey::generate(&mut csprng);
        PrivateKey { signing_key }
    }

    /// Creates a private key from raw bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        let bytes_array: [u8; 32] = bytes.try_into().map_err(|_| {
            CryptoError::InvalidPrivateKey("Invalid private key length".to_string())
        })?;

        Ok(PrivateKey {
            signing_key: SigningKey::from_bytes(&bytes_array),
        })
    }

    /// Derives the corresponding public key
    pub fn public_key(&self) -> PublicKey {
        PublicKey {
            verifying_key: VerifyingKey::from(&self.signing_key),
        }
    }

    /// Signs a message with this key
    pub fn sign(&self, message: &[u8]) -> TransactionSignature {
        let signature = self.signing_key.sign(message);
        TransactionSignature::from_signature(&signature)
    }

    /// Exports the key as raw bytes
    pub fn to_bytes(&self) -> [u8; 32] {
        self.signing_key.to_bytes()
    }
}

impl fmt::Display for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.signing_key.to_bytes()))
    }
}

impl FromStr for PrivateKey {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode(s).map_err(|e| CryptoError::DecodingError(e.to_string()))?;
        PrivateKey::from_bytes(&bytes)
    }
}

/// An ed25519 public key, submitted to the network to guard an account
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublicKey {
    verifying_key: VerifyingKey,
}

impl PublicKey {
    /// Creates a public key from raw bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        let bytes_array: [u8; 32] = bytes
            .try_into()
            .map_err(|_| CryptoError::InvalidPublicKey("Invalid public key length".to_string()))?;

        let verifying_key = VerifyingKey::from_bytes(&bytes_array)
            .map_err(|e| CryptoError::InvalidPublicKey(e.to_string()))?;

        Ok(PublicKey { verifying_key })
    }

    /// The key as raw bytes
    pub fn as_bytes(&self) -> &[u8; 32] {
        self.verifying_key.as_bytes()
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.verifying_key.as_bytes()))
    }
}

impl FromStr for PublicKey {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode(s).map_err(|e| CryptoError::DecodingError(e.to_string()))?;
        PublicKey::from_bytes(&bytes)
    }
}

// Public keys appear in transaction signing bytes as hex strings.
impl Serialize for PublicKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

/// A signature over a transaction body, in base58 text form
#[derive(Debug, Clone, Serialize)]
pub struct TransactionSignature(pub String);

impl TransactionSignature {
    /// Creates a transaction signature from a raw signature
    pub fn from_signature(signature: &Signature) -> Self {
        let bytes = signature.to_bytes();
        let encoded = bs58::encode(bytes).into_string();
        TransactionSignature(encoded)
    }

    /// Converts the text form back into a raw signature
    pub fn to_signature(&self) -> Result<Signature, CryptoError> {
        let bytes = bs58::decode(&self.0)
            .into_vec()
            .map_err(|e| CryptoError::DecodingError(e.to_string()))?;

        let signature_bytes: [u8; 64] = bytes.try_into().map_err(|_| {
            CryptoError::InvalidSignature("Invalid signature length".to_string())
        })?;

        Ok(Signature::from_bytes(&signature_bytes))
    }
}

/// Verifies a signature against a message and public key
pub fn verify_signature(
    message: &[u8],
    signature: &TransactionSignature,
    public_key: &PublicKey,
) -> Result<bool, CryptoError> {
    let signature = signature.to_signature()?;

    match public_key.verifying_key.verify(message, &signature) {
        Ok(_) => Ok(true),
        Err(_) => Ok(false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_generation() {
        let private_key = PrivateKey::generate();
        let public_key = private_key.public_key();
        assert_eq!(public_key.as_bytes().len(), 32);
    }

    #[test]
    fn test_private_key_hex_round_trip() {
        let private_key = PrivateKey::generate();
        let parsed: PrivateKey = private_key.to_string().parse().unwrap();

        assert_eq!(parsed.to_bytes(), private_key.to_bytes());
        assert_eq!(parsed.public_key(), private_key.public_key());
    }

    #[test]
    fn test_rejects_malformed_key_text() {
        assert!("not-hex".parse::<PrivateKey>().is_err());
        assert!("abcd".parse::<PrivateKey>().is_err());
        assert!("abcd".parse::<PublicKey>().is_err());
    }

    #[test]
    fn test_signing_and_verification() {
        let private_key = PrivateKey::generate();
        let message = b"transfer 10000 tinybar";

        let signature = private_key.sign(message);

        let result = verify_signature(message, &signature, &private_key.public_key()).unwrap();
        assert!(result);

        let wrong_message = b"transfer 99999 tinybar";
        let result =
            verify_signature(wrong_message, &signature, &private_key.public_key()).unwrap();
        assert!(!result);
    }
}
