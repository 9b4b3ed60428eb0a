//! Wallet Import Format: `prefix ‖ k(32) [‖ 0x01]`, Base58Check-encoded.

use hdk_crypto::{base58, HashEngine};
use hdk_types::{Network, PrivateKey};
use zeroize::Zeroize;

use crate::TreeError;

const COMPRESSED_FLAG: u8 = 0x01;

/// A private key decoded from WIF.
pub struct WifKey {
    pub secret: PrivateKey,
    pub network: Network,
    /// Whether the key is meant to be paired with a compressed public key.
    pub compressed: bool,
}

pub fn encode_wif(
    hashes: &HashEngine,
    secret: &PrivateKey,
    network: Network,
    compressed: bool,
) -> String {
    let mut payload = Vec::with_capacity(34);
    payload.push(network.wif_prefix());
    payload.extend_from_slice(secret.as_bytes());
    if compressed {
        payload.push(COMPRESSED_FLAG);
    }
    let encoded = base58::encode_check(hashes, &payload);
    payload.zeroize();
    encoded
}

pub fn decode_wif(hashes: &HashEngine, s: &str) -> Result<WifKey, TreeError> {
    let mut payload = base58::decode_check(hashes, s.trim())?;
    let result = parse_payload(&payload);
    payload.zeroize();
    result
}

fn parse_payload(payload: &[u8]) -> Result<WifKey, TreeError> {
    let compressed = match payload.len() {
        33 => false,
        34 if payload[33] == COMPRESSED_FLAG => true,
        34 => {
            return Err(TreeError::InvalidWif(format!(
                "bad compression flag {:#04x}",
                payload[33]
            )))
        }
        n => return Err(TreeError::InvalidWif(format!("payload is {n} bytes"))),
    };
    let network = [Network::Main, Network::Test]
        .into_iter()
        .find(|n| n.wif_prefix() == payload[0])
        .ok_or_else(|| TreeError::InvalidWif(format!("unknown prefix {:#04x}", payload[0])))?;

    let mut secret = [0u8; 32];
    secret.copy_from_slice(&payload[1..33]);
    Ok(WifKey {
        secret: PrivateKey::from_bytes(secret),
        network,
        compressed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key_one() -> PrivateKey {
        let mut k = [0u8; 32];
        k[31] = 1;
        PrivateKey::from_bytes(k)
    }

    #[test]
    fn known_encodings_of_key_one() {
        let hashes = HashEngine::standard();
        assert_eq!(
            encode_wif(&hashes, &key_one(), Network::Main, true),
            "KwDiBf89QgGbjEhKnhXJuH7LrciVrZi3qYjgd9M7rFU73sVHnoWn"
        );
        assert_eq!(
            encode_wif(&hashes, &key_one(), Network::Main, false),
            "5HpHagT65TZzG1PH3CSu63k8DbpvD8s5ip4nEB3kEsreAnchuDf"
        );
    }

    #[test]
    fn decode_roundtrip() {
        let hashes = HashEngine::standard();
        for network in [Network::Main, Network::Test] {
            for compressed in [true, false] {
                let s = encode_wif(&hashes, &key_one(), network, compressed);
                let back = decode_wif(&hashes, &s).unwrap();
                assert_eq!(back.secret.as_bytes(), key_one().as_bytes());
                assert_eq!(back.network, network);
                assert_eq!(back.compressed, compressed);
            }
        }
    }

    #[test]
    fn rejects_malformed_payloads() {
        let hashes = HashEngine::standard();
        let mut bad_flag = vec![0x80];
        bad_flag.extend_from_slice(&[1u8; 32]);
        bad_flag.push(0x02);
        assert!(matches!(
            decode_wif(&hashes, &base58::encode_check(&hashes, &bad_flag)),
            Err(TreeError::InvalidWif(_))
        ));

        let mut bad_prefix = vec![0x42];
        bad_prefix.extend_from_slice(&[1u8; 32]);
        assert!(decode_wif(&hashes, &base58::encode_check(&hashes, &bad_prefix)).is_err());

        assert!(decode_wif(&hashes, &base58::encode_check(&hashes, &[0x80; 10])).is_err());
    }
}
