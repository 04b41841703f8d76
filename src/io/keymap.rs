//! Static key-code tables.
//!
//! Codes are Linux input key codes (`linux/input-event-codes.h`). The
//! terminal source translates characters onto the same codes so both inputs
//! share one table.

use crate::dsp::Waveform;

pub mod codes {
    pub const KEY_ESC: u16 = 1;
    pub const KEY_2: u16 = 3;
    pub const KEY_3: u16 = 4;
    pub const KEY_5: u16 = 6;
    pub const KEY_6: u16 = 7;
    pub const KEY_7: u16 = 8;
    pub const KEY_Q: u16 = 16;
    pub const KEY_W: u16 = 17;
    pub const KEY_E: u16 = 18;
    pub const KEY_R: u16 = 19;
    pub const KEY_T: u16 = 20;
    pub const KEY_Y: u16 = 21;
    pub const KEY_U: u16 = 22;
    pub const KEY_I: u16 = 23;
    pub const KEY_S: u16 = 31;
    pub const KEY_D: u16 = 32;
    pub const KEY_G: u16 = 34;
    pub const KEY_H: u16 = 35;
    pub const KEY_J: u16 = 36;
    pub const KEY_Z: u16 = 44;
    pub const KEY_X: u16 = 45;
    pub const KEY_C: u16 = 46;
    pub const KEY_V: u16 = 47;
    pub const KEY_B: u16 = 48;
    pub const KEY_N: u16 = 49;
    pub const KEY_M: u16 = 50;
    pub const KEY_COMMA: u16 = 51;
    pub const KEY_F1: u16 = 59;
    pub const KEY_F2: u16 = 60;
    pub const KEY_F3: u16 = 61;
    pub const KEY_F4: u16 = 62;
}

use codes::*;

/// Two chromatic octaves laid out like a piano on the two lower letter rows.
/// `N` is A4 = 440 Hz.
pub const KEY_FREQUENCIES: [(u16, f32); 26] = [
    // Z row: C4..C5
    (KEY_Z, 261.63),
    (KEY_S, 277.18),
    (KEY_X, 293.66),
    (KEY_D, 311.13),
    (KEY_C, 329.63),
    (KEY_V, 349.23),
    (KEY_G, 369.99),
    (KEY_B, 392.00),
    (KEY_H, 415.30),
    (KEY_N, 440.00),
    (KEY_J, 466.16),
    (KEY_M, 493.88),
    (KEY_COMMA, 523.25),
    // Q row: C5..C6
    (KEY_Q, 523.25),
    (KEY_2, 554.37),
    (KEY_W, 587.33),
    (KEY_3, 622.25),
    (KEY_E, 659.26),
    (KEY_R, 698.46),
    (KEY_5, 739.99),
    (KEY_T, 783.99),
    (KEY_6, 830.61),
    (KEY_Y, 880.00),
    (KEY_7, 932.33),
    (KEY_U, 987.77),
    (KEY_I, 1046.50),
];

pub const WAVEFORM_KEYS: [(u16, Waveform); 4] = [
    (KEY_F1, Waveform::Sine),
    (KEY_F2, Waveform::Sawtooth),
    (KEY_F3, Waveform::Square),
    (KEY_F4, Waveform::Triangle),
];

pub const QUIT_KEY: u16 = KEY_ESC;

/// What a key code means to the router.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KeyAction {
    Note(f32),
    SelectWaveform(Waveform),
    Quit,
    Ignored,
}

pub fn frequency(code: u16) -> Option<f32> {
    KEY_FREQUENCIES
        .iter()
        .find(|(key, _)| *key == code)
        .map(|&(_, freq)| freq)
}

pub fn classify(code: u16) -> KeyAction {
    if let Some(freq) = frequency(code) {
        return KeyAction::Note(freq);
    }
    if let Some(&(_, waveform)) = WAVEFORM_KEYS.iter().find(|(key, _)| *key == code) {
        return KeyAction::SelectWaveform(waveform);
    }
    if code == QUIT_KEY {
        return KeyAction::Quit;
    }
    KeyAction::Ignored
}
