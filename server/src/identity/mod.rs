//! Random identity generation for newly connected clients.
//!
//! A client gets a display name of the form `user_NNNN` and an avatar URL
//! built from a template. Names are not deduplicated.

use rand::Rng;

/// Default avatar service template. `{category}` and `{username}` are substituted.
pub const DEFAULT_AVATAR_URL_TEMPLATE: &str =
    "https://avatar.iran.liara.run/public/{category}?username={username}";

const USERNAME_PREFIX: &str = "user_";
const SUFFIX_MIN: u32 = 1000;
const SUFFIX_MAX: u32 = 9999;

/// Avatar category passed to the avatar service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AvatarCategory {
    Girl,
    Boy,
}

impl AvatarCategory {
    pub const ALL: [AvatarCategory; 2] = [AvatarCategory::Girl, AvatarCategory::Boy];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Girl => "girl",
            Self::Boy => "boy",
        }
    }

    /// Draw a category uniformly.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }
}

/// Identity held for one live connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub display_name: String,
    pub avatar_url: String,
}

/// Produces identities from an avatar URL template.
#[derive(Debug, Clone)]
pub struct IdentityGenerator {
    avatar_url_template: String,
}

impl Default for IdentityGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_AVATAR_URL_TEMPLATE)
    }
}

impl IdentityGenerator {
    pub fn new(avatar_url_template: impl Into<String>) -> Self {
        Self {
            avatar_url_template: avatar_url_template.into(),
        }
    }

    /// Generate a fresh `UserRecord` from the given random source.
    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> UserRecord {
        let display_name = random_username(rng);
        let category = AvatarCategory::random(rng);
        let avatar_url = self.avatar_url(category, &display_name);
        UserRecord {
            display_name,
            avatar_url,
        }
    }

    pub fn avatar_url(&self, category: AvatarCategory, username: &str) -> String {
        self.avatar_url_template
            .replace("{category}", category.as_str())
            .replace("{username}", username)
    }
}

/// `user_` followed by a number drawn uniformly from 1000..=9999.
pub fn random_username<R: Rng + ?Sized>(rng: &mut R) -> String {
    let suffix = rng.random_range(SUFFIX_MIN..=SUFFIX_MAX);
    format!("{}{}", USERNAME_PREFIX, suffix)
}
