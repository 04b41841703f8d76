//! Key events from the controlling terminal.
//!
//! Terminals that speak the keyboard enhancement protocol report real
//! press/release transitions. Legacy terminals only report presses (plus
//! auto-repeat presses while a key is held), so for those a key counts as
//! held while presses keep arriving and is released [`HOLD_TIMEOUT`] after
//! the last one.

use std::{
    io::stdout,
    time::{Duration, Instant},
};

use crossterm::{
    event::{
        self, Event, KeyCode, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute, terminal,
};
use tracing::{info, warn};

use crate::{
    error::{Result, SynthError},
    io::{
        event::{KeyEvent, KeySource},
        keymap::{self, codes::*},
    },
};

/// Longer than the usual auto-repeat delay, so a held key is not released
/// before its first repeat arrives.
pub const HOLD_TIMEOUT: Duration = Duration::from_millis(700);

/// Map a terminal key onto a Linux key code.
pub fn code_for_key(code: KeyCode) -> Option<u16> {
    match code {
        KeyCode::Char(c) => code_for_char(c.to_ascii_lowercase()),
        KeyCode::F(n @ 1..=4) => Some(KEY_F1 + u16::from(n) - 1),
        KeyCode::Esc => Some(KEY_ESC),
        _ => None,
    }
}

fn code_for_char(c: char) -> Option<u16> {
    let code = match c {
        'z' => KEY_Z,
        's' => KEY_S,
        'x' => KEY_X,
        'd' => KEY_D,
        'c' => KEY_C,
        'v' => KEY_V,
        'g' => KEY_G,
        'b' => KEY_B,
        'h' => KEY_H,
        'n' => KEY_N,
        'j' => KEY_J,
        'm' => KEY_M,
        ',' => KEY_COMMA,
        'q' => KEY_Q,
        '2' => KEY_2,
        'w' => KEY_W,
        '3' => KEY_3,
        'e' => KEY_E,
        'r' => KEY_R,
        '5' => KEY_5,
        't' => KEY_T,
        '6' => KEY_6,
        'y' => KEY_Y,
        '7' => KEY_7,
        'u' => KEY_U,
        'i' => KEY_I,
        _ => return None,
    };
    Some(code)
}

/// Synthesizes releases for terminals that only report presses.
#[derive(Debug)]
pub struct HoldTracker {
    held: Vec<(u16, Instant)>,
    timeout: Duration,
}

impl HoldTracker {
    pub fn new(timeout: Duration) -> Self {
        Self {
            held: Vec::new(),
            timeout,
        }
    }

    /// A press (or auto-repeat) arrived. Only the first press of a hold is
    /// reported.
    pub fn press(&mut self, code: u16, now: Instant) -> Option<KeyEvent> {
        if let Some(entry) = self.held.iter_mut().find(|(held, _)| *held == code) {
            entry.1 = now;
            return None;
        }
        self.held.push((code, now));
        Some(KeyEvent::press(code))
    }

    /// Release the first key whose presses stopped at least `timeout` ago.
    pub fn expired(&mut self, now: Instant) -> Option<KeyEvent> {
        let idx = self
            .held
            .iter()
            .position(|&(_, last)| now.saturating_duration_since(last) >= self.timeout)?;
        let (code, _) = self.held.remove(idx);
        Some(KeyEvent::release(code))
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.held
            .iter()
            .map(|&(_, last)| last + self.timeout)
            .min()
    }
}

/// Raw mode for the lifetime of the guard, plus release reporting when the
/// terminal supports it.
pub struct RawModeGuard {
    enhanced: bool,
}

impl RawModeGuard {
    pub fn enable() -> Result<Self> {
        terminal::enable_raw_mode().map_err(SynthError::Terminal)?;
        let mut guard = Self { enhanced: false };

        if matches!(terminal::supports_keyboard_enhancement(), Ok(true)) {
            match execute!(
                stdout(),
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
            ) {
                Ok(()) => guard.enhanced = true,
                Err(e) => warn!(error = %e, "could not enable key release reporting"),
            }
        }

        Ok(guard)
    }

    /// Whether the terminal reports key releases.
    pub fn reports_releases(&self) -> bool {
        self.enhanced
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        if self.enhanced {
            if let Err(e) = execute!(stdout(), PopKeyboardEnhancementFlags) {
                warn!(error = %e, "failed to restore keyboard flags");
            }
        }
        if let Err(e) = terminal::disable_raw_mode() {
            warn!(error = %e, "failed to leave raw mode");
        }
    }
}

pub struct TerminalKeys {
    guard: RawModeGuard,
    hold: HoldTracker,
}

impl TerminalKeys {
    pub fn open() -> Result<Self> {
        let guard = RawModeGuard::enable()?;
        if guard.reports_releases() {
            info!("terminal reports key releases");
        } else {
            info!(
                timeout_ms = HOLD_TIMEOUT.as_millis() as u64,
                "terminal lacks key release events; releasing after repeat timeout"
            );
        }
        Ok(Self {
            guard,
            hold: HoldTracker::new(HOLD_TIMEOUT),
        })
    }

    fn translate(&mut self, key: event::KeyEvent) -> Option<KeyEvent> {
        // Raw mode swallows SIGINT.
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Some(KeyEvent::press(KEY_ESC));
        }

        let code = code_for_key(key.code)?;
        if self.guard.reports_releases() {
            match key.kind {
                KeyEventKind::Press => Some(KeyEvent::press(code)),
                KeyEventKind::Release => Some(KeyEvent::release(code)),
                KeyEventKind::Repeat => None,
            }
        } else {
            legacy_press(&mut self.hold, code, Instant::now())
        }
    }
}

/// Presses from a terminal without release reporting. Only note keys are
/// held; control keys act on every press.
fn legacy_press(hold: &mut HoldTracker, code: u16, now: Instant) -> Option<KeyEvent> {
    if keymap::frequency(code).is_some() {
        hold.press(code, now)
    } else {
        Some(KeyEvent::press(code))
    }
}

impl KeySource for TerminalKeys {
    fn next_event(&mut self) -> Result<Option<KeyEvent>> {
        loop {
            let wait = if self.guard.reports_releases() {
                None
            } else {
                let now = Instant::now();
                if let Some(release) = self.hold.expired(now) {
                    return Ok(Some(release));
                }
                self.hold
                    .next_deadline()
                    .map(|deadline| deadline.saturating_duration_since(now))
            };

            if let Some(wait) = wait {
                if !event::poll(wait)? {
                    continue;
                }
            }

            if let Event::Key(key) = event::read()? {
                if let Some(event) = self.translate(key) {
                    return Ok(Some(event));
                }
            }
        }
    }
}
