use vibedeck_core::{Config, Dashboard, FocusMachine, ManualTicker};

use super::{open_deck, CliResult};

/// One-shot view of an idle session. Nothing ticks, so a manual source is enough.
pub fn run(config: &Config) -> CliResult {
    let deck = open_deck(config)?;
    let machine = FocusMachine::new(config.session_settings(), Box::new(ManualTicker::new()));
    let dashboard = Dashboard::new(deck, machine);
    println!("{}", serde_json::to_string_pretty(&dashboard.view())?);
    Ok(())
}
