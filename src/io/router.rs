use rtrb::Producer;
use tracing::{debug, trace, warn};

use crate::{
    io::{
        event::KeyEvent,
        keymap::{classify, KeyAction},
    },
    synth::{
        config::RepeatPolicy,
        message::{MessageSender, SynthMessage},
        pool::KEY_CODE_COUNT,
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteOutcome {
    Continue,
    Quit,
}

/// Turns key transitions into synth intents.
///
/// Runs on the input thread and never touches the voice pool; everything it
/// decides travels through the intent queue. It tracks which note keys it has
/// sent a note-on for, so repeated presses can be filtered by
/// [`RepeatPolicy`].
///
/// A key stays held until its note-off is actually queued. Releases that hit
/// a full queue are kept pending and retried at the start of every later
/// [`route`](Self::route) call.
pub struct KeyRouter<S = Producer<SynthMessage>> {
    tx: S,
    repeat: RepeatPolicy,
    held: Box<[bool]>,
    pending: Box<[bool]>,
    pending_count: usize,
}

impl<S: MessageSender> KeyRouter<S> {
    pub fn new(tx: S, repeat: RepeatPolicy) -> Self {
        Self {
            tx,
            repeat,
            held: vec![false; KEY_CODE_COUNT].into_boxed_slice(),
            pending: vec![false; KEY_CODE_COUNT].into_boxed_slice(),
            pending_count: 0,
        }
    }

    pub fn route(&mut self, event: KeyEvent) -> RouteOutcome {
        self.flush_pending();

        match classify(event.code) {
            KeyAction::Note(frequency) => {
                if event.pressed {
                    self.press(event.code, frequency);
                } else {
                    self.release(event.code);
                }
            }
            KeyAction::SelectWaveform(waveform) if event.pressed => {
                debug!(%waveform, "waveform selected");
                self.send(SynthMessage::SetWaveform(waveform));
            }
            KeyAction::Quit if event.pressed => return RouteOutcome::Quit,
            KeyAction::SelectWaveform(_) | KeyAction::Quit => {}
            KeyAction::Ignored => trace!(code = event.code, "unmapped key ignored"),
        }
        RouteOutcome::Continue
    }

    fn press(&mut self, code: u16, frequency: f32) {
        let Some(held) = self.held.get(code as usize).copied() else {
            return;
        };
        if held && self.repeat == RepeatPolicy::Ignore {
            trace!(code, "repeated press ignored");
            return;
        }

        debug!(code, frequency, "note on");
        if self.send(SynthMessage::NoteOn {
            key: code,
            frequency,
        }) {
            self.held[code as usize] = true;
        }
    }

    fn release(&mut self, code: u16) {
        let Some(&held) = self.held.get(code as usize) else {
            return;
        };
        if !held || self.pending[code as usize] {
            return;
        }

        debug!(code, "note off");
        if !self.send_note_off(code) {
            self.pending[code as usize] = true;
            self.pending_count += 1;
        }
    }

    fn send_note_off(&mut self, code: u16) -> bool {
        let sent = self.send(SynthMessage::NoteOff { key: code });
        if sent {
            self.held[code as usize] = false;
        }
        sent
    }

    /// Retry releases that previously found the queue full.
    fn flush_pending(&mut self) {
        if self.pending_count == 0 {
            return;
        }
        for code in 0..self.pending.len() {
            if !self.pending[code] {
                continue;
            }
            if !self.send_note_off(code as u16) {
                return;
            }
            self.pending[code] = false;
            self.pending_count -= 1;
        }
    }

    /// Releases still waiting for room in the queue.
    pub fn pending_releases(&self) -> usize {
        self.pending_count
    }

    /// Release every note, held or decaying.
    pub fn release_all(&mut self) {
        if self.send(SynthMessage::AllNotesOff) {
            self.held.fill(false);
            self.pending.fill(false);
            self.pending_count = 0;
        }
    }

    pub fn is_held(&self, code: u16) -> bool {
        self.held.get(code as usize).copied().unwrap_or(false)
    }

    fn send(&mut self, msg: SynthMessage) -> bool {
        match self.tx.push(msg) {
            Ok(()) => true,
            Err(msg) => {
                warn!(?msg, "intent queue full, dropping");
                false
            }
        }
    }
}
