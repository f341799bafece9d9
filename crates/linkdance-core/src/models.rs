//! Data models for LinkDance
//!
//! Defines the core data structures: Profile, LinkItem, SocialLink and Platform.
//! Field names serialize in camelCase and timestamps as epoch milliseconds, so
//! persisted records and publish tokens share one JSON shape.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Current time truncated to millisecond precision.
///
/// Timestamps are persisted as epoch milliseconds; stamping at the same
/// precision keeps a serialize/deserialize cycle lossless.
pub fn now_millis() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

/// A link-in-bio profile
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    /// Stable identifier, assigned at creation
    pub id: String,
    /// Display name
    pub name: String,
    /// Short bio
    pub description: String,
    /// Avatar URL (never raw image bytes)
    pub photo_url: String,
    /// Ordered links; order is what the viewer shows
    pub links: Vec<LinkItem>,
    /// Social links, at most one per platform
    pub social_links: Vec<SocialLink>,
    /// When this profile was first stored
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
    /// When this profile was last stored
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub updated_at: DateTime<Utc>,
    /// Set after a publish
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_url: Option<String>,
}

impl Profile {
    /// Create an empty profile with the given ID
    pub fn new(id: impl Into<String>) -> Self {
        let now = now_millis();
        Self {
            id: id.into(),
            name: String::new(),
            description: String::new(),
            photo_url: String::new(),
            links: Vec::new(),
            social_links: Vec::new(),
            created_at: now,
            updated_at: now,
            published_url: None,
        }
    }

    /// Create an empty profile with a freshly generated ID
    pub fn new_with_generated_id() -> Self {
        Self::new(format!("profile-{}", Uuid::new_v4()))
    }

    /// Create the prefilled sample profile
    pub fn demo() -> Self {
        let mut profile = Self::new(format!("demo-{}", now_millis().timestamp_millis()));
        profile.name = "Jane Doe".to_string();
        profile.description = "UI/UX Designer & Front-end Developer passionate about creating beautiful, functional interfaces.".to_string();
        profile.photo_url = "https://i.pravatar.cc/300".to_string();
        profile.links = vec![
            LinkItem::with_id("1", "My Portfolio", "https://example.com/portfolio")
                .icon("briefcase"),
            LinkItem::with_id("2", "Latest Project", "https://example.com/project").icon("rocket"),
            LinkItem::with_id("3", "Design Blog", "https://example.com/blog").icon("feather"),
        ];
        profile.social_links = vec![
            SocialLink::new(Platform::Twitter, "https://twitter.com/janedoe"),
            SocialLink::new(Platform::Instagram, "https://instagram.com/janedoe"),
            SocialLink::new(Platform::Github, "https://github.com/janedoe"),
            SocialLink::new(Platform::Linkedin, "https://linkedin.com/in/janedoe"),
        ];
        profile
    }

    /// True once the user has entered a name or at least one link
    pub fn has_content(&self) -> bool {
        !self.name.is_empty() || !self.links.is_empty()
    }

    /// Look up a link by ID
    pub fn link(&self, id: &str) -> Option<&LinkItem> {
        self.links.iter().find(|l| l.id == id)
    }

    /// Look up the social link for a platform
    pub fn social_link(&self, platform: &Platform) -> Option<&SocialLink> {
        self.social_links.iter().find(|s| &s.platform == platform)
    }

    /// Set the URL for a platform, replacing any existing entry for it
    pub fn upsert_social_link(&mut self, platform: Platform, url: impl Into<String>) {
        let url = url.into();
        match self
            .social_links
            .iter_mut()
            .find(|s| s.platform == platform)
        {
            Some(existing) => existing.url = url,
            None => self.social_links.push(SocialLink { platform, url }),
        }
    }

    /// Remove the social link for a platform
    ///
    /// Returns true if an entry was removed.
    pub fn remove_social_link(&mut self, platform: &Platform) -> bool {
        let before = self.social_links.len();
        self.social_links.retain(|s| &s.platform != platform);
        self.social_links.len() != before
    }

    /// Collapse duplicate platforms into a single entry
    ///
    /// The first occurrence keeps its position and takes the URL of the last one.
    pub fn normalize_social_links(&mut self) {
        let mut normalized: Vec<SocialLink> = Vec::with_capacity(self.social_links.len());
        for social in self.social_links.drain(..) {
            match normalized.iter_mut().find(|s| s.platform == social.platform) {
                Some(existing) => existing.url = social.url,
                None => normalized.push(social),
            }
        }
        self.social_links = normalized;
    }
}

/// A single link button on a profile
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LinkItem {
    /// Unique within the profile, stable across edits and reorders
    pub id: String,
    /// Button text
    pub label: String,
    /// Target URL
    pub url: String,
    /// Icon token, interpreted by the presentation layer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl LinkItem {
    /// Create a link with a fresh ID
    pub fn new(label: impl Into<String>, url: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4().to_string(), label, url)
    }

    /// Create a link with a specific ID
    pub fn with_id(id: impl Into<String>, label: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            url: url.into(),
            icon: None,
        }
    }

    /// An empty link, as added by the editor's "add link" action
    pub fn blank() -> Self {
        Self::new("", "")
    }

    /// Builder-style icon setter
    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }
}

/// A social network link
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SocialLink {
    pub platform: Platform,
    pub url: String,
}

impl SocialLink {
    pub fn new(platform: Platform, url: impl Into<String>) -> Self {
        Self {
            platform,
            url: url.into(),
        }
    }
}

/// Social platform identifier
///
/// Serialized as its lowercase string. Unknown identifiers are kept verbatim in
/// `Other` so profiles from other sources decode without loss.
///
/// Equality and hashing go by the wire identifier, so `Other("github")` is the
/// same platform as `Github`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Platform {
    Facebook,
    Twitter,
    Instagram,
    Linkedin,
    Github,
    Telegram,
    Whatsapp,
    Youtube,
    Email,
    Other(String),
}

impl Platform {
    /// Platforms offered by the editor, in display order
    pub const KNOWN: [Platform; 9] = [
        Platform::Facebook,
        Platform::Twitter,
        Platform::Instagram,
        Platform::Linkedin,
        Platform::Github,
        Platform::Telegram,
        Platform::Whatsapp,
        Platform::Youtube,
        Platform::Email,
    ];

    /// Wire identifier
    pub fn as_str(&self) -> &str {
        match self {
            Platform::Facebook => "facebook",
            Platform::Twitter => "twitter",
            Platform::Instagram => "instagram",
            Platform::Linkedin => "linkedin",
            Platform::Github => "github",
            Platform::Telegram => "telegram",
            Platform::Whatsapp => "whatsapp",
            Platform::Youtube => "youtube",
            Platform::Email => "email",
            Platform::Other(s) => s,
        }
    }

    /// Human-readable name; unknown platforms show their identifier
    pub fn display_name(&self) -> &str {
        match self.as_str() {
            "facebook" => "Facebook",
            "twitter" => "Twitter",
            "instagram" => "Instagram",
            "linkedin" => "LinkedIn",
            "github" => "GitHub",
            "telegram" => "Telegram",
            "whatsapp" => "WhatsApp",
            "youtube" => "YouTube",
            "email" => "Email",
            other => other,
        }
    }

    /// Whether this is one of the editor-offered platforms
    pub fn is_known(&self) -> bool {
        Platform::KNOWN.iter().any(|known| known == self)
    }
}

impl PartialEq for Platform {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for Platform {}

impl std::hash::Hash for Platform {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.as_str().hash(state);
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<String> for Platform {
    fn from(s: String) -> Self {
        match s.as_str() {
            "facebook" => Platform::Facebook,
            "twitter" => Platform::Twitter,
            "instagram" => Platform::Instagram,
            "linkedin" => Platform::Linkedin,
            "github" => Platform::Github,
            "telegram" => Platform::Telegram,
            "whatsapp" => Platform::Whatsapp,
            "youtube" => Platform::Youtube,
            "email" => Platform::Email,
            _ => Platform::Other(s),
        }
    }
}

impl From<&str> for Platform {
    fn from(s: &str) -> Self {
        Self::from(s.to_string())
    }
}

impl From<Platform> for String {
    fn from(p: Platform) -> Self {
        match p {
            Platform::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}
