pub mod config;
pub mod focus;
pub mod history;
pub mod profile;
pub mod status;
pub mod task;

use vibedeck_core::{Config, CoreError, Database, Deck, Profile};

pub type CliResult = Result<(), Box<dyn std::error::Error>>;

/// Open the persisted deck with the limits and defaults from `config`.
pub fn open_deck(config: &Config) -> Result<Deck, CoreError> {
    let db = Database::open()?;
    Ok(Deck::load(db, Profile::named(&config.profile.name)).with_max_minutes(config.tasks.max_minutes))
}
