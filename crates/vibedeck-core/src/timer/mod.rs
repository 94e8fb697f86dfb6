mod clock;
mod machine;
pub mod ticker;

pub use clock::{ClockEvent, SessionClock};
pub use machine::{FocusMachine, Mode, Phase, SessionSettings};
pub use ticker::{IntervalTicker, ManualTicker, Tick, TickSource};
