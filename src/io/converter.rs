use crate::{
    io::midi::{MidiEvent, CC_ALL_NOTES_OFF},
    synth::message::SynthMessage,
};

/// Translate a MIDI event on `channel_filter` into a synth message.
///
/// Events on other channels, and everything the synth has no use for, map
/// to `None`. Note-on with velocity 0 is passed through; the voice pool
/// treats it as a note-off.
pub fn midi_to_synth(midi: MidiEvent, channel_filter: u8) -> Option<SynthMessage> {
    if midi.channel() != channel_filter {
        return None;
    }

    match midi {
        MidiEvent::NoteOn { key, velocity, .. } => Some(SynthMessage::NoteOn {
            note: key,
            velocity,
        }),
        MidiEvent::NoteOff { key, .. } => Some(SynthMessage::NoteOff { note: key }),
        MidiEvent::ControlChange {
            controller: CC_ALL_NOTES_OFF,
            ..
        } => Some(SynthMessage::AllNotesOff),
        _ => None,
    }
}

/// Equal-tempered frequency of a MIDI note, A4 (69) = 440 Hz.
pub fn midi_note_to_freq(note: u8) -> f32 {
    440.0 * 2.0_f32.powf((note as f32 - 69.0) / 12.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn note_frequencies() {
        assert!((midi_note_to_freq(69) - 440.0).abs() < 1e-3);
        assert!((midi_note_to_freq(81) - 880.0).abs() < 1e-2);
        assert!((midi_note_to_freq(60) - 261.626).abs() < 1e-2);
    }

    #[test]
    fn filters_by_channel() {
        let on = MidiEvent::NoteOn {
            channel: 3,
            key: 60,
            velocity: 90,
        };
        assert_eq!(
            midi_to_synth(on, 3),
            Some(SynthMessage::NoteOn {
                note: 60,
                velocity: 90
            })
        );
        assert_eq!(midi_to_synth(on, 0), None);
    }

    #[test]
    fn maps_note_off_and_panic() {
        let off = MidiEvent::NoteOff {
            channel: 0,
            key: 64,
            velocity: 40,
        };
        assert_eq!(midi_to_synth(off, 0), Some(SynthMessage::NoteOff { note: 64 }));

        let panic = MidiEvent::ControlChange {
            channel: 0,
            controller: CC_ALL_NOTES_OFF,
            value: 0,
        };
        assert_eq!(midi_to_synth(panic, 0), Some(SynthMessage::AllNotesOff));

        let bend = MidiEvent::PitchBend {
            channel: 0,
            value: 100,
        };
        assert_eq!(midi_to_synth(bend, 0), None);
    }
}
