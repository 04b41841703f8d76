//! Raw key events from a Linux input device (`/dev/input/event*`).
//!
//! The kernel hands out fixed-size `struct input_event` records:
//!
//! ```text
//!   __kernel_ulong_t sec;  // struct timeval on older ABIs, same width
//!   __kernel_ulong_t usec;
//!   __u16 type;
//!   __u16 code;
//!   __s32 value;           // 0 = release, 1 = press, 2 = autorepeat
//! ```
//!
//! Only `EV_KEY` press/release records become [`KeyEvent`]s. Everything else,
//! including autorepeat and short reads, is skipped.

use std::{
    fs::File,
    io::{ErrorKind, Read},
    mem::size_of,
    path::Path,
};

use tracing::{debug, trace};

use crate::{
    error::{Result, SynthError},
    io::event::{KeyEvent, KeySource},
};

pub const EV_KEY: u16 = 0x01;

/// `__kernel_ulong_t`: the native word everywhere except x32, where the
/// kernel keeps 64-bit longs. 32-bit targets built with 64-bit `time_t`
/// still get native words here.
#[cfg(all(target_arch = "x86_64", target_pointer_width = "32"))]
type KernelULong = u64;
#[cfg(not(all(target_arch = "x86_64", target_pointer_width = "32")))]
type KernelULong = usize;

/// Size of one `struct input_event` on this target.
pub const INPUT_EVENT_SIZE: usize = 2 * size_of::<KernelULong>() + 8;

const TYPE_OFFSET: usize = 2 * size_of::<KernelULong>();

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawInputEvent {
    pub kind: u16,
    pub code: u16,
    pub value: i32,
}

impl RawInputEvent {
    /// Decode one native-endian record. `None` unless `buf` is exactly one
    /// record long.
    pub fn decode(buf: &[u8]) -> Option<Self> {
        if buf.len() != INPUT_EVENT_SIZE {
            return None;
        }
        let field = &buf[TYPE_OFFSET..];
        Some(Self {
            kind: u16::from_ne_bytes([field[0], field[1]]),
            code: u16::from_ne_bytes([field[2], field[3]]),
            value: i32::from_ne_bytes([field[4], field[5], field[6], field[7]]),
        })
    }

    pub fn encode(&self) -> [u8; INPUT_EVENT_SIZE] {
        let mut buf = [0u8; INPUT_EVENT_SIZE];
        buf[TYPE_OFFSET..TYPE_OFFSET + 2].copy_from_slice(&self.kind.to_ne_bytes());
        buf[TYPE_OFFSET + 2..TYPE_OFFSET + 4].copy_from_slice(&self.code.to_ne_bytes());
        buf[TYPE_OFFSET + 4..].copy_from_slice(&self.value.to_ne_bytes());
        buf
    }

    pub fn key_event(&self) -> Option<KeyEvent> {
        if self.kind != EV_KEY {
            return None;
        }
        match self.value {
            0 => Some(KeyEvent::release(self.code)),
            1 => Some(KeyEvent::press(self.code)),
            _ => None,
        }
    }
}

/// Key source reading `input_event` records from a device file or any reader.
pub struct EvdevKeys<R = File> {
    reader: R,
    buf: [u8; INPUT_EVENT_SIZE],
}

impl EvdevKeys<File> {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| SynthError::OpenInput {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(device = %path.display(), "opened input device");
        Ok(Self::new(file))
    }
}

impl<R: Read> EvdevKeys<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: [0u8; INPUT_EVENT_SIZE],
        }
    }
}

impl<R: Read> KeySource for EvdevKeys<R> {
    fn next_event(&mut self) -> Result<Option<KeyEvent>> {
        loop {
            match self.reader.read(&mut self.buf) {
                Ok(0) => return Ok(None),
                Ok(n) if n < INPUT_EVENT_SIZE => {
                    trace!(bytes = n, "short input read ignored");
                }
                Ok(_) => {
                    let event = RawInputEvent::decode(&self.buf).and_then(|raw| raw.key_event());
                    if let Some(event) = event {
                        return Ok(Some(event));
                    }
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => {}
                Err(e) => return Err(e.into()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn record(kind: u16, code: u16, value: i32) -> [u8; INPUT_EVENT_SIZE] {
        RawInputEvent { kind, code, value }.encode()
    }

    fn stream(records: &[[u8; INPUT_EVENT_SIZE]]) -> Vec<u8> {
        records.iter().flatten().copied().collect()
    }

    #[test]
    fn decodes_press_and_release() {
        let bytes = stream(&[record(EV_KEY, 49, 1), record(EV_KEY, 49, 0)]);
        let mut keys = EvdevKeys::new(Cursor::new(bytes));

        assert_eq!(keys.next_event().unwrap(), Some(KeyEvent::press(49)));
        assert_eq!(keys.next_event().unwrap(), Some(KeyEvent::release(49)));
        assert_eq!(keys.next_event().unwrap(), None);
    }

    #[test]
    fn skips_non_key_and_autorepeat_records() {
        let bytes = stream(&[
            record(0x00, 0, 0), // EV_SYN
            record(0x04, 4, 30), // EV_MSC scan code
            record(EV_KEY, 30, 2),
            record(EV_KEY, 30, 0),
        ]);
        let mut keys = EvdevKeys::new(Cursor::new(bytes));

        assert_eq!(keys.next_event().unwrap(), Some(KeyEvent::release(30)));
        assert_eq!(keys.next_event().unwrap(), None);
    }

    #[test]
    fn trailing_short_read_is_ignored() {
        let mut bytes = stream(&[record(EV_KEY, 44, 1)]);
        bytes.extend_from_slice(&[0u8; 5]);
        let mut keys = EvdevKeys::new(Cursor::new(bytes));

        assert_eq!(keys.next_event().unwrap(), Some(KeyEvent::press(44)));
        assert_eq!(keys.next_event().unwrap(), None);
    }

    #[test]
    fn record_size_follows_kernel_word() {
        #[cfg(target_pointer_width = "64")]
        assert_eq!(INPUT_EVENT_SIZE, 24);
        #[cfg(all(target_pointer_width = "32", not(target_arch = "x86_64")))]
        assert_eq!(INPUT_EVENT_SIZE, 16);
        #[cfg(all(target_pointer_width = "32", target_arch = "x86_64"))]
        assert_eq!(INPUT_EVENT_SIZE, 24);
        assert_eq!(TYPE_OFFSET + 8, INPUT_EVENT_SIZE);
    }

    #[test]
    fn decode_rejects_wrong_length() {
        assert_eq!(RawInputEvent::decode(&[0u8; 3]), None);
        assert_eq!(RawInputEvent::decode(&[0u8; INPUT_EVENT_SIZE + 1]), None);
    }

    #[test]
    fn missing_device_reports_path() {
        let err = EvdevKeys::open("/nonexistent/keysynth-input").err();
        assert!(matches!(
            err,
            Some(SynthError::OpenInput { ref path, .. }) if path.ends_with("keysynth-input")
        ));
    }
}
