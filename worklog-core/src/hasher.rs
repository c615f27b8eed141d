use crate::error::ValidationError;
use sha2::{Digest, Sha256};

/// Length of the content key stored on new entries.
pub const ENTRY_KEY_LENGTH: usize = 7;

/// First `length` hex characters of the SHA-256 of `input`.
pub fn sha256_prefix(input: &str, length: usize) -> Result<String, ValidationError> {
    if !(1..=64).contains(&length) {
        return Err(ValidationError::InvalidHashLength { length });
    }
    let mut hex = format!("{:x}", Sha256::digest(input.as_bytes()));
    hex.truncate(length);
    Ok(hex)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_of_known_digest() {
        // sha256("hello") = 2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824
        assert_eq!(sha256_prefix("hello", 7).unwrap(), "2cf24db");
        assert_eq!(sha256_prefix("hello", 64).unwrap().len(), 64);
    }

    #[test]
    fn rejects_out_of_range_lengths() {
        assert_eq!(
            sha256_prefix("hello", 0),
            Err(ValidationError::InvalidHashLength { length: 0 })
        );
        assert!(sha256_prefix("hello", 65).is_err());
    }
}
