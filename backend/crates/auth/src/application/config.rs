//! Application Configuration
//!
//! Configuration for the Auth application layer.

use std::time::Duration;

use serde::Deserialize;

/// Longest accepted access token lifetime (30 days)
pub const MAX_TOKEN_TTL_SECS: u64 = 30 * 24 * 3600;

/// Auth application configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// HS256 signing secret
    pub jwt_secret: Vec<u8>,
    /// Access token lifetime
    pub token_ttl: Duration,
    /// Password pepper (optional, application-wide secret)
    pub password_pepper: Option<Vec<u8>>,
    /// Baseline privileges and roles for `initial_permission`
    pub seed: SeedConfig,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: Vec::new(),
            token_ttl: Duration::from_secs(24 * 3600), // 24 hours
            password_pepper: None,
            seed: SeedConfig::default(),
        }
    }
}

impl AuthConfig {
    /// Create config with a random signing secret (for development)
    pub fn with_random_secret() -> Self {
        use rand::RngCore;
        let mut secret = vec![0u8; 32];
        rand::rng().fill_bytes(&mut secret);
        Self {
            jwt_secret: secret,
            ..Default::default()
        }
    }

    /// Create config for development
    pub fn development() -> Self {
        Self::with_random_secret()
    }

    /// Get token TTL in seconds, saturating at `i64::MAX`
    pub fn token_ttl_secs(&self) -> i64 {
        i64::try_from(self.token_ttl.as_secs()).unwrap_or(i64::MAX)
    }

    /// Get password pepper as slice
    pub fn pepper(&self) -> Option<&[u8]> {
        self.password_pepper.as_deref()
    }
}

/// Baseline privileges and roles
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SeedConfig {
    pub privileges: Vec<SeedPrivilege>,
    pub roles: Vec<SeedRole>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedPrivilege {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedRole {
    pub name: String,
    /// Privilege names granted to this role; each must appear in `privileges`
    #[serde(default)]
    pub privileges: Vec<String>,
}

impl Default for SeedConfig {
    fn default() -> Self {
        let privilege = |name: &str, description: &str| SeedPrivilege {
            name: name.to_string(),
            description: Some(description.to_string()),
        };
        let role = |name: &str, privileges: &[&str]| SeedRole {
            name: name.to_string(),
            privileges: privileges.iter().map(|p| p.to_string()).collect(),
        };

        Self {
            privileges: vec![
                privilege("user.read", "List users"),
                privilege("role.create", "Create roles"),
                privilege("role.read", "List roles"),
                privilege("role.grant", "Grant privileges to roles"),
                privilege("privilege.read", "List privileges"),
                privilege("user_role.assign", "Assign roles to users"),
            ],
            roles: vec![
                role(
                    "admin",
                    &[
                        "user.read",
                        "role.create",
                        "role.read",
                        "role.grant",
                        "privilege.read",
                        "user_role.assign",
                    ],
                ),
                role("user", &["user.read"]),
            ],
        }
    }
}
