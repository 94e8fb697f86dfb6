use vibedeck_core::Config;

use super::{open_deck, CliResult};

pub fn run(config: &Config, limit: Option<usize>) -> CliResult {
    let deck = open_deck(config)?;
    let history = deck.history();
    let shown = &history[..limit.unwrap_or(history.len()).min(history.len())];
    println!("{}", serde_json::to_string_pretty(shown)?);
    Ok(())
}
