use rtrb::{Consumer, Producer};

use crate::dsp::Waveform;

/// Intents sent from the input side to the audio thread.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum SynthMessage {
    NoteOn { key: u16, frequency: f32 },
    NoteOff { key: u16 },
    SetWaveform(Waveform),
    AllNotesOff,
}

pub trait MessageReceiver {
    fn pop(&mut self) -> Option<SynthMessage>;
}

impl MessageReceiver for Consumer<SynthMessage> {
    fn pop(&mut self) -> Option<SynthMessage> {
        Consumer::pop(self).ok()
    }
}

/// Non-blocking send side. Returns the message back when the queue is full.
pub trait MessageSender {
    fn push(&mut self, msg: SynthMessage) -> Result<(), SynthMessage>;
}

impl MessageSender for Producer<SynthMessage> {
    fn push(&mut self, msg: SynthMessage) -> Result<(), SynthMessage> {
        Producer::push(self, msg).map_err(|rtrb::PushError::Full(msg)| msg)
    }
}

/// Default intent queue depth. Far more than a keyboard can produce within one
/// buffer period.
pub const QUEUE_CAPACITY: usize = 256;

/// Create the lock-free intent queue shared by the router and the synth.
pub fn channel(capacity: usize) -> (Producer<SynthMessage>, Consumer<SynthMessage>) {
    rtrb::RingBuffer::new(capacity)
}
