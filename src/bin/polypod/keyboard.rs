//! Computer-keyboard piano.
//!
//! Terminals only report key presses, so every press opens a gate that closes
//! on its own after `GATE`. Key repeat from a held key keeps pushing the
//! deadline out, which keeps the note held.

use std::time::{Duration, Instant};

pub const GATE: Duration = Duration::from_millis(350);

/// One octave plus the next C, laid out like a piano on two rows.
const PIANO_KEYS: [char; 13] = [
    'a', 'w', 's', 'e', 'd', 'f', 't', 'g', 'y', 'h', 'u', 'j', 'k',
];

const MIN_OCTAVE: i8 = 0;
const MAX_OCTAVE: i8 = 8;

pub struct Keyboard {
    octave: i8,
    gates: Vec<(u8, Instant)>,
}

impl Keyboard {
    pub fn new() -> Self {
        Self {
            octave: 4,
            gates: Vec::new(),
        }
    }

    pub fn octave(&self) -> i8 {
        self.octave
    }

    pub fn octave_up(&mut self) {
        self.octave = (self.octave + 1).min(MAX_OCTAVE);
    }

    pub fn octave_down(&mut self) {
        self.octave = (self.octave - 1).max(MIN_OCTAVE);
    }

    pub fn note_for(&self, key: char) -> Option<u8> {
        let offset = PIANO_KEYS.iter().position(|&k| k == key)? as i32;
        let note = 12 * (self.octave as i32 + 1) + offset;
        u8::try_from(note).ok().filter(|&n| n <= 127)
    }

    /// Press a piano key. Returns the note to start, if the key is one.
    pub fn press(&mut self, key: char, now: Instant) -> Option<u8> {
        let note = self.note_for(key)?;
        let deadline = now + GATE;

        match self.gates.iter_mut().find(|(n, _)| *n == note) {
            Some((_, until)) => *until = deadline,
            None => self.gates.push((note, deadline)),
        }
        Some(note)
    }

    /// Notes whose gate has closed by `now`. Each is reported once.
    pub fn expired(&mut self, now: Instant) -> Vec<u8> {
        let mut closed = Vec::new();
        self.gates.retain(|&(note, until)| {
            if until <= now {
                closed.push(note);
                false
            } else {
                true
            }
        });
        closed
    }

    /// Drop every open gate, e.g. after an all-notes-off.
    pub fn clear(&mut self) {
        self.gates.clear();
    }
}

impl Default for Keyboard {
    fn default() -> Self {
        Self::new()
    }
}

pub fn note_name(note: u8) -> String {
    const NAMES: [&str; 12] = [
        "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
    ];
    let octave = note as i32 / 12 - 1;
    format!("{}{}", NAMES[note as usize % 12], octave)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_keys_to_notes() {
        let kb = Keyboard::new();
        assert_eq!(kb.note_for('a'), Some(60));
        assert_eq!(kb.note_for('w'), Some(61));
        assert_eq!(kb.note_for('k'), Some(72));
        assert_eq!(kb.note_for('q'), None);
    }

    #[test]
    fn octave_shift_is_bounded() {
        let mut kb = Keyboard::new();
        for _ in 0..10 {
            kb.octave_up();
        }
        assert_eq!(kb.octave(), MAX_OCTAVE);
        assert_eq!(kb.note_for('a'), Some(108));
        assert_eq!(kb.note_for('k'), Some(120));

        for _ in 0..20 {
            kb.octave_down();
        }
        assert_eq!(kb.note_for('a'), Some(12));
    }

    #[test]
    fn gate_closes_after_timeout() {
        let mut kb = Keyboard::new();
        let t0 = Instant::now();
        assert_eq!(kb.press('a', t0), Some(60));

        assert!(kb.expired(t0 + GATE / 2).is_empty());
        assert_eq!(kb.expired(t0 + GATE), vec![60]);
        assert!(kb.expired(t0 + GATE * 2).is_empty());
    }

    #[test]
    fn repeat_extends_gate() {
        let mut kb = Keyboard::new();
        let t0 = Instant::now();
        kb.press('a', t0);
        kb.press('a', t0 + GATE / 2);

        assert!(kb.expired(t0 + GATE).is_empty());
        assert_eq!(kb.expired(t0 + GATE * 2), vec![60]);
    }

    #[test]
    fn names_notes() {
        assert_eq!(note_name(60), "C4");
        assert_eq!(note_name(69), "A4");
        assert_eq!(note_name(61), "C#4");
    }
}
