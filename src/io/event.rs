use crate::error::Result;

/// A raw key transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub code: u16,
    pub pressed: bool,
}

impl KeyEvent {
    pub fn press(code: u16) -> Self {
        Self {
            code,
            pressed: true,
        }
    }

    pub fn release(code: u16) -> Self {
        Self {
            code,
            pressed: false,
        }
    }
}

/// A blocking stream of key transitions.
pub trait KeySource {
    /// Block until the next transition. `Ok(None)` means the source is
    /// exhausted and the read loop should end.
    fn next_event(&mut self) -> Result<Option<KeyEvent>>;
}

impl<S: KeySource + ?Sized> KeySource for Box<S> {
    fn next_event(&mut self) -> Result<Option<KeyEvent>> {
        (**self).next_event()
    }
}
