use blockscape_blocks::{SfxRef, SoundCategory};

/// Audio playback collaborator. The world only fires and forgets.
pub trait SoundSink {
    /// A free channel, or `None` when every channel is busy.
    fn available_channel(&mut self) -> Option<u8>;
    fn play_sfx(&mut self, category: SoundCategory, sound: &str, channel: u8);
}

/// Plays `sfx` on any free channel; busy mixers drop the sound.
pub(crate) fn play(sink: &mut dyn SoundSink, sfx: Option<&SfxRef>) {
    let Some(sfx) = sfx else {
        return;
    };
    if let Some(channel) = sink.available_channel() {
        sink.play_sfx(sfx.category, &sfx.sound, channel);
    }
}

/// Discards everything.
#[derive(Debug, Default)]
pub struct NullSound;

impl SoundSink for NullSound {
    fn available_channel(&mut self) -> Option<u8> {
        None
    }

    fn play_sfx(&mut self, _category: SoundCategory, _sound: &str, _channel: u8) {}
}

/// Logs each request at debug level and counts them, rotating over `channels`.
#[derive(Debug)]
pub struct LogSound {
    channels: u8,
    next: u8,
    played: usize,
}

impl LogSound {
    pub fn new(channels: u8) -> Self {
        Self {
            channels: channels.max(1),
            next: 0,
            played: 0,
        }
    }

    pub fn played(&self) -> usize {
        self.played
    }
}

impl Default for LogSound {
    fn default() -> Self {
        Self::new(4)
    }
}

impl SoundSink for LogSound {
    fn available_channel(&mut self) -> Option<u8> {
        let ch = self.next;
        self.next = (self.next + 1) % self.channels;
        Some(ch)
    }

    fn play_sfx(&mut self, category: SoundCategory, sound: &str, channel: u8) {
        self.played += 1;
        log::debug!(target: "sound", "{category:?}/{sound} on channel {channel}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_sound_rotates_channels() {
        let mut s = LogSound::new(2);
        let sfx = SfxRef {
            category: SoundCategory::Dig,
            sound: "stone".into(),
        };
        for _ in 0..3 {
            play(&mut s, Some(&sfx));
        }
        play(&mut s, None);
        assert_eq!(s.played(), 3);
        assert_eq!(s.available_channel(), Some(1));
    }
}
