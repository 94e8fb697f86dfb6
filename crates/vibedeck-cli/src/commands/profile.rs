use serde_json::json;
use vibedeck_core::Config;

use super::{open_deck, CliResult};

pub fn run(config: &Config) -> CliResult {
    let deck = open_deck(config)?;
    let profile = deck.profile();
    let out = json!({
        "name": profile.name,
        "handle": profile.handle(),
        "vibesCompleted": profile.vibes_completed,
        "currentStreak": profile.current_streak,
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}
