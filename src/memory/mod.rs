//! User memory: profile facts rendered into the agent's instructions.

use indexmap::IndexMap;

pub const USER_NAME: &str = "user_name";
pub const NICKNAME: &str = "nickname";
pub const TITLE: &str = "title";
pub const INTERESTS: &str = "interests";
pub const LOCATION: &str = "location";
pub const COUNTRY: &str = "country";
pub const FRIENDS: &str = "friends";

/// Heading of the rendered context block.
pub const CONTEXT_HEADING: &str = "### User Context & Memories:";

const DEFAULT_PROFILE: [(&str, &str); 7] = [
    (USER_NAME, "Pablo Piovano"),
    (NICKNAME, "Pablito Piova"),
    (TITLE, "Microsoft MVP"),
    (INTERESTS, "Café, Cocinar Asados Argentinos, Viajar"),
    (LOCATION, "Sunchales, Santa Fe"),
    (COUNTRY, "Argentina"),
    (FRIENDS, "Amigo de Bruno y Quique"),
];

/// Labeled profile fields, in display order.
pub const PROFILE_FIELDS: [(&str, &str); 6] = [
    ("Name", USER_NAME),
    ("Nickname", NICKNAME),
    ("Title", TITLE),
    ("Interests", INTERESTS),
    ("City", LOCATION),
    ("Country", COUNTRY),
];

/// Insertion-ordered key/value facts about the user.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryStore {
    facts: IndexMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite a fact. Overwriting keeps the key's position.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.facts.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.facts.get(key).map(String::as_str)
    }

    /// Render all facts as a bulleted block, or `""` when there are none.
    pub fn render_context(&self) -> String {
        if self.facts.is_empty() {
            return String::new();
        }
        let mut out = String::from(CONTEXT_HEADING);
        for (key, value) in &self.facts {
            out.push('\n');
            out.push_str(&format!("- {key}: {value}"));
        }
        out
    }

    /// Populate the built-in profile, overwriting those keys.
    pub fn load_default_profile(&mut self) {
        for (key, value) in DEFAULT_PROFILE {
            self.set(key, value);
        }
    }

    /// `(label, value)` pairs for the profile view; missing values are `None`.
    pub fn profile(&self) -> Vec<(&'static str, Option<&str>)> {
        PROFILE_FIELDS
            .iter()
            .map(|(label, key)| (*label, self.get(key)))
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.facts.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.facts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }
}
