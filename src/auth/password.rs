//! Password hashing
//! bcrypt with a tunable cost; every hash carries its own salt and cost

use bcrypt::BcryptResult;

/// One-way password hasher
pub struct CredentialHasher {
    cost: u32,
    // verified against when the username is unknown, so both paths pay the same bcrypt cost
    dummy_hash: String,
}

impl CredentialHasher {
    pub fn new(cost: u32) -> BcryptResult<Self> {
        let dummy_hash = bcrypt::hash("memory-app-timing-equalizer", cost)?;
        Ok(Self { cost, dummy_hash })
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Salted, algorithm-tagged hash; two calls on the same input differ
    pub fn hash(&self, plaintext: &str) -> BcryptResult<String> {
        bcrypt::hash(plaintext, self.cost)
    }

    /// Constant-time check; malformed hashes verify as false
    pub fn verify(&self, plaintext: &str, hash: &str) -> bool {
        bcrypt::verify(plaintext, hash).unwrap_or(false)
    }

    /// Burn one verification's worth of CPU for a login whose user does not exist
    pub fn verify_dummy(&self, plaintext: &str) -> bool {
        let _ = bcrypt::verify(plaintext, &self.dummy_hash);
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hasher() -> CredentialHasher {
        CredentialHasher::new(4).unwrap()
    }

    #[test]
    fn test_hash_and_verify() {
        let h = hasher();
        let hash = h.hash("password123").unwrap();
        assert!(hash.starts_with("$2"));
        assert!(h.verify("password123", &hash));
        assert!(!h.verify("password124", &hash));
    }

    #[test]
    fn test_fresh_salt_each_call() {
        let h = hasher();
        let a = h.hash("password123").unwrap();
        let b = h.hash("password123").unwrap();
        assert_ne!(a, b);
        assert!(h.verify("password123", &a));
        assert!(h.verify("password123", &b));
    }

    #[test]
    fn test_distinct_passwords_distinct_hashes() {
        let h = hasher();
        let pairs = [
            ("password123", "password1234"),
            ("correct horse", "correct horsE"),
            ("aaaaaaaa", "aaaaaaab"),
        ];
        for (p1, p2) in pairs {
            let h1 = h.hash(p1).unwrap();
            assert_ne!(h1, h.hash(p2).unwrap());
            assert!(!h.verify(p2, &h1));
        }
    }

    #[test]
    fn test_malformed_hash_is_false() {
        let h = hasher();
        assert!(!h.verify("password123", ""));
        assert!(!h.verify("password123", "not-a-hash"));
        assert!(!h.verify("password123", "$2b$04$truncated"));
    }

    #[test]
    fn test_cost_embedded_in_hash() {
        let h = hasher();
        assert_eq!(h.cost(), 4);
        assert!(h.hash("password123").unwrap().starts_with("$2b$04$"));
    }

    #[test]
    fn test_invalid_cost_rejected() {
        assert!(CredentialHasher::new(2).is_err());
    }

    #[test]
    fn test_dummy_never_matches() {
        let h = hasher();
        assert!(!h.verify_dummy("memory-app-timing-equalizer"));
    }
}
