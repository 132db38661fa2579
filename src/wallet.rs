use anyhow::{Context, Result};
use k256::ecdsa::SigningKey;
use k256::elliptic_curve::sec1::ToEncodedPoint;
use sha3::{Digest, Keccak256};

/// A wallet-identified account: one private key, one derived address.
///
/// The key is only used for address derivation; the scoring API identifies
/// players by address alone.
#[derive(Debug, Clone)]
pub struct Wallet {
    /// EIP-55 checksummed `0x…` address.
    pub address: String,
}

impl Wallet {
    /// Derive the account address from a hex-encoded secp256k1 private key
    /// (with or without `0x` prefix).
    pub fn from_private_key(key: &str) -> Result<Self> {
        let hex_key = key.trim().trim_start_matches("0x");
        let bytes = hex::decode(hex_key).context("private key is not valid hex")?;
        let signing_key = SigningKey::from_slice(&bytes).context("invalid private key")?;
        let point = signing_key.verifying_key().as_affine().to_encoded_point(false);
        // Address = last 20 bytes of Keccak-256 over the uncompressed public
        // key without its 0x04 tag byte.
        let digest = Keccak256::digest(&point.as_bytes()[1..]);
        Ok(Self {
            address: to_checksum_address(&digest[12..]),
        })
    }

    /// Address with the middle elided, for logs.
    pub fn masked(&self) -> String {
        mask_address(&self.address)
    }
}

/// EIP-55 checksum casing: a hex letter is uppercased when the corresponding
/// nibble of Keccak-256(lowercase address without prefix) is >= 8.
fn to_checksum_address(bytes: &[u8]) -> String {
    let lower = hex::encode(bytes);
    let hash = Keccak256::digest(lower.as_bytes());
    let mut out = String::with_capacity(2 + lower.len());
    out.push_str("0x");
    for (i, c) in lower.chars().enumerate() {
        let nibble = if i % 2 == 0 {
            hash[i / 2] >> 4
        } else {
            hash[i / 2] & 0x0f
        };
        if c.is_ascii_alphabetic() && nibble >= 8 {
            out.push(c.to_ascii_uppercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// First and last six characters with the middle starred out.
pub fn mask_address(address: &str) -> String {
    if address.len() <= 12 {
        return address.to_string();
    }
    format!(
        "{}******{}",
        &address[..6],
        &address[address.len() - 6..]
    )
}
