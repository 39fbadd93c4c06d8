//! Message digests fed to the signature engine.
//!
//! Digests use keccak256, never the field hash, so they match what an
//! Ethereum wallet would sign.

use serde::{Deserialize, Serialize};
use sha3::{Digest, Keccak256};
use zkid_common::{FixtureError, Result};

pub const ETHEREUM_MESSAGE_PREFIX: &str = "\x19Ethereum Signed Message:\n";

pub fn keccak256(bytes: &[u8]) -> [u8; 32] {
    Keccak256::digest(bytes).into()
}

/// Digest of the raw message bytes.
pub fn hash_message(message: &[u8]) -> [u8; 32] {
    keccak256(message)
}

/// `"\x19Ethereum Signed Message:\n" + len(message) + message`, with the
/// decimal length computed from the actual byte length.
pub fn ethereum_signed_message(message: &[u8]) -> Vec<u8> {
    let length = message.len().to_string();
    let mut framed =
        Vec::with_capacity(ETHEREUM_MESSAGE_PREFIX.len() + length.len() + message.len());
    framed.extend_from_slice(ETHEREUM_MESSAGE_PREFIX.as_bytes());
    framed.extend_from_slice(length.as_bytes());
    framed.extend_from_slice(message);
    framed
}

/// Same framing, for callers that carry a declared length. A declared length
/// that disagrees with the message is rejected rather than reproduced.
pub fn ethereum_signed_message_declared(message: &[u8], declared_len: usize) -> Result<Vec<u8>> {
    if declared_len != message.len() {
        return Err(FixtureError::invalid_input(format!(
            "declared message length {declared_len} but message is {} bytes",
            message.len()
        )));
    }
    Ok(ethereum_signed_message(message))
}

/// How a scenario message is turned into the 32-byte signing digest.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageEncoding {
    /// keccak256(message)
    #[default]
    Raw,
    /// keccak256 of the Ethereum signed-message framing.
    EthereumSigned,
}

impl MessageEncoding {
    pub fn digest(&self, message: &[u8], declared_len: Option<usize>) -> Result<[u8; 32]> {
        match (self, declared_len) {
            (Self::Raw, None) => Ok(hash_message(message)),
            (Self::Raw, Some(_)) => Err(FixtureError::invalid_input(
                "a declared length only applies to Ethereum signed messages",
            )),
            (Self::EthereumSigned, None) => Ok(keccak256(&ethereum_signed_message(message))),
            (Self::EthereumSigned, Some(len)) => {
                Ok(keccak256(&ethereum_signed_message_declared(message, len)?))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keccak_of_empty_input() {
        assert_eq!(
            hex::encode(keccak256(b"")),
            "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
    }

    #[test]
    fn prefix_length_is_computed() {
        let framed = ethereum_signed_message(b"hello");
        assert_eq!(framed, b"\x19Ethereum Signed Message:\n5hello".to_vec());
    }

    #[test]
    fn friend_message_length_matches_historical_prefix() {
        let message = "ETHdos friend: 0x0000000000000000000000000000000000000001";
        assert_eq!(message.len(), 57);
        assert!(ethereum_signed_message_declared(message.as_bytes(), 57).is_ok());
    }

    #[test]
    fn mismatched_declared_length_is_rejected() {
        let err = ethereum_signed_message_declared(b"short", 57).unwrap_err();
        assert!(matches!(err, FixtureError::InvalidInput(_)));
    }

    #[test]
    fn raw_encoding_ignores_prefix() {
        let raw = MessageEncoding::Raw.digest(b"im a teapot", None).unwrap();
        let framed = MessageEncoding::EthereumSigned
            .digest(b"im a teapot", None)
            .unwrap();
        assert_eq!(raw, hash_message(b"im a teapot"));
        assert_ne!(raw, framed);
    }
}
