/// A decoded MIDI channel-voice message. Channels are 0-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MidiEvent {
    NoteOn { channel: u8, key: u8, velocity: u8 },
    NoteOff { channel: u8, key: u8, velocity: u8 },
    ControlChange { channel: u8, controller: u8, value: u8 },
    PitchBend { channel: u8, value: i16 },
    ProgramChange { channel: u8, program: u8 },
}

/// Controller number of the channel-mode "All Notes Off" message.
pub const CC_ALL_NOTES_OFF: u8 = 123;

impl MidiEvent {
    /// Decode one complete channel-voice message.
    ///
    /// Returns `None` for system messages, data bytes with the high bit set,
    /// or a message shorter than its status byte requires. Running status is
    /// not supported: `bytes[0]` must be a status byte.
    pub fn from_bytes(bytes: &[u8]) -> Option<MidiEvent> {
        let (&status, data) = bytes.split_first()?;
        if status < 0x80 || data.iter().any(|&b| b >= 0x80) {
            return None;
        }

        let channel = status & 0x0F;
        let data1 = || data.first().copied();
        let data2 = || data.get(1).copied();

        let event = match status & 0xF0 {
            0x80 => MidiEvent::NoteOff {
                channel,
                key: data1()?,
                velocity: data2()?,
            },
            0x90 => MidiEvent::NoteOn {
                channel,
                key: data1()?,
                velocity: data2()?,
            },
            0xB0 => MidiEvent::ControlChange {
                channel,
                controller: data1()?,
                value: data2()?,
            },
            0xC0 => MidiEvent::ProgramChange {
                channel,
                program: data1()?,
            },
            0xE0 => {
                let raw = (data2()? as i16) << 7 | data1()? as i16;
                MidiEvent::PitchBend {
                    channel,
                    value: raw - 8192,
                }
            }
            _ => return None,
        };
        Some(event)
    }

    pub fn channel(&self) -> u8 {
        match *self {
            MidiEvent::NoteOn { channel, .. }
            | MidiEvent::NoteOff { channel, .. }
            | MidiEvent::ControlChange { channel, .. }
            | MidiEvent::PitchBend { channel, .. }
            | MidiEvent::ProgramChange { channel, .. } => channel,
        }
    }
}
