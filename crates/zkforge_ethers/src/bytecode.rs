use sha2::{Digest, Sha256};

use crate::error::EthersError;

const WORD_SIZE: usize = 32;
/// zkEVM bytecode length is encoded in two bytes of the hash.
const MAX_BYTECODE_LEN_WORDS: usize = 1 << 16;
const BYTECODE_HASH_VERSION: u8 = 1;

/// Decode `0x`-prefixed (or bare) hex bytecode.
pub fn decode_bytecode(bytecode: &str) -> Result<Vec<u8>, EthersError> {
    let digits = bytecode.strip_prefix("0x").unwrap_or(bytecode);
    hex::decode(digits).map_err(|e| EthersError::InvalidBytecode(e.to_string()))
}

/// Lowercase hex with a `0x` prefix.
pub fn normalize_bytecode(bytecode: &str) -> Result<String, EthersError> {
    let bytes = decode_bytecode(bytecode)?;
    Ok(format!("0x{}", hex::encode(bytes)))
}

/// The versioned hash zkSync uses to identify deployed bytecode, which is
/// also the key of every factory-dependency entry.
///
/// Layout: `[version, 0, len_in_words (u16 BE), sha256(bytecode)[4..]]`.
pub fn hash_bytecode(bytecode: &str) -> Result<[u8; 32], EthersError> {
    let bytes = decode_bytecode(bytecode)?;

    if bytes.len() % WORD_SIZE != 0 {
        return Err(EthersError::InvalidBytecode(format!(
            "length in bytes must be divisible by {WORD_SIZE}, got {}",
            bytes.len()
        )));
    }
    let words = bytes.len() / WORD_SIZE;
    if words >= MAX_BYTECODE_LEN_WORDS {
        return Err(EthersError::InvalidBytecode(format!(
            "length in words must be less than {MAX_BYTECODE_LEN_WORDS}, got {words}"
        )));
    }
    if words % 2 == 0 {
        return Err(EthersError::InvalidBytecode(format!(
            "length in words must be odd, got {words}"
        )));
    }

    let digest = Sha256::digest(&bytes);
    let mut hash = [0u8; 32];
    hash[0] = BYTECODE_HASH_VERSION;
    hash[2..4].copy_from_slice(&(words as u16).to_be_bytes());
    hash[4..].copy_from_slice(&digest[4..]);
    Ok(hash)
}
