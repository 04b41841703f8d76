// Purpose - external interfaces: key sources, key tables, event routing

pub mod event;
pub mod evdev;
pub mod keymap;
pub mod router;
pub mod terminal;

pub use event::{KeyEvent, KeySource};
pub use evdev::EvdevKeys;
pub use router::{KeyRouter, RouteOutcome};
pub use terminal::TerminalKeys;
