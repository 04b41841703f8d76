use crate::synth::{config::EngineConfig, voice::Voice};

/// Number of distinct key codes the pool can map (Linux `KEY_CNT`).
pub const KEY_CODE_COUNT: usize = 0x300;

/// Insertion-ordered voices plus the key → voice mapping.
///
/// The pool grows by appending and never shrinks. Its capacity is reserved up
/// front so that growth from the audio thread never reallocates; once full, a
/// note-on with no idle voice is dropped.
///
/// Invariant: every key in the mapping points at a voice that `is_playing`.
pub struct VoicePool {
    voices: Vec<Voice>,
    capacity: usize,
    key_to_voice: Box<[Option<usize>]>,
}

impl VoicePool {
    pub fn with_capacity(max_voices: usize) -> Self {
        Self {
            voices: Vec::with_capacity(max_voices),
            capacity: max_voices,
            key_to_voice: vec![None; KEY_CODE_COUNT].into_boxed_slice(),
        }
    }

    /// Index of a voice to (re)use for a new note.
    ///
    /// Returns the first voice that is not playing, whether it was never used
    /// or is decaying. Otherwise appends a fresh voice, or `None` when the
    /// pool is at capacity.
    pub fn allocate_voice(&mut self) -> Option<usize> {
        if let Some(idx) = self.voices.iter().position(|v| !v.is_playing()) {
            return Some(idx);
        }

        if self.voices.len() < self.capacity {
            self.voices.push(Voice::new());
            return Some(self.voices.len() - 1);
        }

        None
    }

    /// Start `frequency` on a voice for `key` and record the mapping.
    ///
    /// A key that is still mapped has its previous voice released first, so
    /// a repeated press retriggers rather than orphaning the old voice.
    pub fn note_on(&mut self, key: u16, frequency: f32, config: &EngineConfig) -> Option<usize> {
        let slot = key as usize;
        if slot >= KEY_CODE_COUNT {
            return None;
        }

        if let Some(previous) = self.key_to_voice[slot].take() {
            self.voices[previous].release(config.keeps_tail());
        }

        let idx = self.allocate_voice()?;
        self.voices[idx].start(
            frequency,
            config.sample_rate as f32,
            config.envelope.is_some(),
        );
        self.key_to_voice[slot] = Some(idx);
        Some(idx)
    }

    /// Release the voice mapped to `key` and drop the mapping.
    pub fn note_off(&mut self, key: u16, tail: bool) -> Option<usize> {
        let idx = self.key_to_voice.get_mut(key as usize)?.take()?;
        self.voices[idx].release(tail);
        Some(idx)
    }

    pub fn all_notes_off(&mut self, tail: bool) {
        for slot in self.key_to_voice.iter_mut() {
            if let Some(idx) = slot.take() {
                self.voices[idx].release(tail);
            }
        }
    }

    pub fn voice_for_key(&self, key: u16) -> Option<usize> {
        self.key_to_voice.get(key as usize).copied().flatten()
    }

    pub fn voices(&self) -> &[Voice] {
        &self.voices
    }

    pub(super) fn voices_mut(&mut self) -> &mut [Voice] {
        &mut self.voices
    }

    pub fn len(&self) -> usize {
        self.voices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.voices.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Voices currently held by a key.
    pub fn playing_count(&self) -> usize {
        self.voices.iter().filter(|v| v.is_playing()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> EngineConfig {
        EngineConfig::default()
    }

    fn assert_mapping_invariant(pool: &VoicePool) {
        for key in 0..KEY_CODE_COUNT as u16 {
            if let Some(idx) = pool.voice_for_key(key) {
                assert!(
                    pool.voices()[idx].is_playing(),
                    "key {key} maps to idle voice {idx}"
                );
            }
        }
    }

    #[test]
    fn starts_empty_and_grows_by_append() {
        let mut pool = VoicePool::with_capacity(8);
        assert!(pool.is_empty());

        assert_eq!(pool.note_on(30, 440.0, &config()), Some(0));
        assert_eq!(pool.note_on(31, 466.16, &config()), Some(1));
        assert_eq!(pool.len(), 2);
        assert_mapping_invariant(&pool);
    }

    #[test]
    fn reuses_lowest_index_idle_voice() {
        let mut pool = VoicePool::with_capacity(8);
        pool.note_on(1, 220.0, &config());
        pool.note_on(2, 330.0, &config());
        pool.note_on(3, 440.0, &config());
        pool.note_off(1, true);
        pool.note_off(3, true);

        assert_eq!(pool.allocate_voice(), Some(0));
        assert_eq!(pool.len(), 3);
    }

    #[test]
    fn press_then_release_clears_mapping() {
        let mut pool = VoicePool::with_capacity(4);
        let idx = pool.note_on(49, 440.0, &config()).unwrap();
        assert_eq!(pool.voice_for_key(49), Some(idx));

        assert_eq!(pool.note_off(49, true), Some(idx));
        assert_eq!(pool.voice_for_key(49), None);
        assert!(!pool.voices()[idx].is_playing());
        assert_mapping_invariant(&pool);
    }

    #[test]
    fn release_of_unmapped_key_is_ignored() {
        let mut pool = VoicePool::with_capacity(4);
        assert_eq!(pool.note_off(49, true), None);
        assert_eq!(pool.note_off(u16::MAX, true), None);
    }

    #[test]
    fn repeated_press_does_not_orphan_a_voice() {
        let mut pool = VoicePool::with_capacity(4);
        pool.note_on(49, 440.0, &config());
        pool.note_on(49, 440.0, &config());

        assert_eq!(pool.playing_count(), 1);
        assert_eq!(pool.voice_for_key(49), Some(0));
        pool.note_off(49, true);
        assert_eq!(pool.playing_count(), 0);
        assert_mapping_invariant(&pool);
    }

    #[test]
    fn full_pool_drops_new_notes() {
        let mut pool = VoicePool::with_capacity(2);
        pool.note_on(1, 220.0, &config());
        pool.note_on(2, 330.0, &config());
        assert_eq!(pool.note_on(3, 440.0, &config()), None);
        assert_eq!(pool.voice_for_key(3), None);
        assert_eq!(pool.len(), 2);
    }

    #[test]
    fn out_of_range_key_is_rejected() {
        let mut pool = VoicePool::with_capacity(2);
        assert_eq!(pool.note_on(KEY_CODE_COUNT as u16, 440.0, &config()), None);
        assert!(pool.is_empty());
    }

    #[test]
    fn all_notes_off_releases_everything() {
        let mut pool = VoicePool::with_capacity(4);
        for key in 10..14 {
            pool.note_on(key, 440.0, &config());
        }
        pool.all_notes_off(true);
        assert_eq!(pool.playing_count(), 0);
        for key in 10..14 {
            assert_eq!(pool.voice_for_key(key), None);
        }
    }
}
