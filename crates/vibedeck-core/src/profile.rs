use serde::{Deserialize, Serialize};

pub const DEFAULT_PROFILE_NAME: &str = "Vibe Coder";

/// Completion counters for the single local user.
///
/// `current_streak` is a plain completion counter. It has no notion of days,
/// so it never resets on its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default)]
    pub vibes_completed: u64,
    #[serde(default)]
    pub current_streak: u64,
}

fn default_name() -> String {
    DEFAULT_PROFILE_NAME.to_string()
}

impl Default for Profile {
    fn default() -> Self {
        Self::named(DEFAULT_PROFILE_NAME)
    }
}

impl Profile {
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            vibes_completed: 0,
            current_streak: 0,
        }
    }

    /// `@` plus the lowercased name with whitespace turned into dashes.
    pub fn handle(&self) -> String {
        let slug: String = self
            .name
            .to_lowercase()
            .chars()
            .map(|c| if c.is_whitespace() { '-' } else { c })
            .collect();
        format!("@{slug}")
    }

    pub fn record_completion(&mut self) {
        self.vibes_completed = self.vibes_completed.saturating_add(1);
        self.current_streak = self.current_streak.saturating_add(1);
    }
}
