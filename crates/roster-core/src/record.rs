use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Number of synthetic records the directory holds. Keys are dense over
/// `user1..=user100` and never change after generation.
pub const USER_COUNT: u32 = 100;

/// Records per page for the `users` query.
pub const PAGE_SIZE: usize = 10;

/// A single synthetic directory entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub username: String,
    pub email: String,
    pub timestamp: DateTime<Utc>,
    pub spammy: bool,
}

/// Formats the key for record `n` (1-based).
pub fn username_for(n: u32) -> String {
    format!("user{n}")
}

/// Generates the fixed directory: `USER_COUNT` records with derived emails,
/// a shared creation instant, and an independent 50% spammy draw per record.
/// Takes the RNG by reference so callers can seed it deterministically.
pub fn generate_directory(rng: &mut impl Rng) -> Vec<UserRecord> {
    let now = Utc::now();
    (1..=USER_COUNT)
        .map(|n| {
            let username = username_for(n);
            let email = format!("{username}@example.com");
            UserRecord {
                username,
                email,
                timestamp: now,
                spammy: rng.gen_bool(0.5),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn directory_has_dense_unique_keys() {
        let mut rng = StdRng::seed_from_u64(7);
        let records = generate_directory(&mut rng);
        assert_eq!(records.len(), USER_COUNT as usize);

        let keys: HashSet<&str> = records.iter().map(|r| r.username.as_str()).collect();
        assert_eq!(keys.len(), USER_COUNT as usize);
        for n in 1..=USER_COUNT {
            assert!(keys.contains(username_for(n).as_str()));
        }
    }

    #[test]
    fn emails_derive_from_usernames() {
        let mut rng = StdRng::seed_from_u64(7);
        for record in generate_directory(&mut rng) {
            assert_eq!(record.email, format!("{}@example.com", record.username));
        }
    }

    #[test]
    fn generation_is_deterministic_for_a_seed() {
        let mut a = StdRng::seed_from_u64(42);
        let mut b = StdRng::seed_from_u64(42);
        let spammy_a: Vec<bool> = generate_directory(&mut a).iter().map(|r| r.spammy).collect();
        let spammy_b: Vec<bool> = generate_directory(&mut b).iter().map(|r| r.spammy).collect();
        assert_eq!(spammy_a, spammy_b);
    }
}
