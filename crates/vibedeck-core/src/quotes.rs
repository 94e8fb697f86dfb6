//! Lines shown alongside the timer in deep mode.

use rand::seq::SliceRandom;
use rand::Rng;

pub const QUOTES: &[&str] = &[
    "Protect this focus. Great things happen now.",
    "Silence the noise. Build the future.",
    "Momentum beats motivation. Keep moving.",
    "Tiny steps. Massive outcomes.",
    "Distraction-free is your superpower.",
];

/// Beats between quote changes while deep mode is on.
pub const ROTATE_EVERY_BEATS: u64 = 6;

pub fn pick<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    QUOTES.choose(rng).copied().unwrap_or(QUOTES[0])
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::mock::StepRng;

    #[test]
    fn pick_returns_a_known_quote() {
        let mut rng = StepRng::new(0, 1);
        assert!(QUOTES.contains(&pick(&mut rng)));
        assert!(QUOTES.contains(&pick(&mut rand::thread_rng())));
    }
}
