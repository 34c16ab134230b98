use serde::{Deserialize, Serialize};

use crate::{config::SynthConfig, control::knob::Knob, dsp::Waveform};

/*
Control Surface
===============

Two physical knobs, four modes. The mode decides which parameters the knobs
drive; the encoder always steps the waveform.

    Mode       Knob 1              Knob 2
    ────────   ─────────────────   ─────────────────
    Default    master volume       -
    Filter     cutoff (Hz)         resonance
    Envelope   attack (s)          decay (s)
    Reverb     feedback            mix

Each control block:

    raw1, raw2 ──→ knobs_for(mode) ──→ Knob::update ──→ ParamChange(s)

Only knobs that actually applied a value produce a change, so a knob that has
not been caught yet leaves its parameter alone.

Switching modes resets catch latches so a knob has to be caught again before
it moves its new parameters (see `CatchPolicy`).
*/

pub const VOLUME_RANGE: (f32, f32) = (0.0, 1.0);
pub const CUTOFF_RANGE: (f32, f32) = (200.0, 10_000.0);
pub const RESONANCE_RANGE: (f32, f32) = (0.0, 0.95);
pub const ATTACK_RANGE: (f32, f32) = (0.001, 2.0);
pub const DECAY_RANGE: (f32, f32) = (0.01, 3.0);
pub const REVERB_FEEDBACK_RANGE: (f32, f32) = (0.0, 0.98);
pub const REVERB_MIX_RANGE: (f32, f32) = (0.0, 1.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Default,
    Filter,
    Envelope,
    Reverb,
}

impl Mode {
    pub const ALL: [Mode; 4] = [Mode::Default, Mode::Filter, Mode::Envelope, Mode::Reverb];

    pub fn next(self) -> Mode {
        match self {
            Mode::Default => Mode::Filter,
            Mode::Filter => Mode::Envelope,
            Mode::Envelope => Mode::Reverb,
            Mode::Reverb => Mode::Default,
        }
    }

    /// Parameters driven by knob 1 and knob 2 in this mode.
    pub fn params(self) -> [Option<Param>; 2] {
        match self {
            Mode::Default => [Some(Param::Volume), None],
            Mode::Filter => [Some(Param::Cutoff), Some(Param::Resonance)],
            Mode::Envelope => [Some(Param::Attack), Some(Param::Decay)],
            Mode::Reverb => [Some(Param::ReverbFeedback), Some(Param::ReverbMix)],
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Mode::Default => "default",
            Mode::Filter => "filter",
            Mode::Envelope => "envelope",
            Mode::Reverb => "reverb",
        }
    }
}

/// Which catch latches a mode switch clears.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CatchPolicy {
    /// Only the knobs of the mode being entered.
    #[default]
    EnteredMode,
    /// Every knob on the surface.
    AllModes,
}

/// A continuous synthesis parameter driven by a knob.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Param {
    Volume,
    Cutoff,
    Resonance,
    Attack,
    Decay,
    ReverbFeedback,
    ReverbMix,
}

impl Param {
    pub fn name(self) -> &'static str {
        match self {
            Param::Volume => "volume",
            Param::Cutoff => "cutoff",
            Param::Resonance => "resonance",
            Param::Attack => "attack",
            Param::Decay => "decay",
            Param::ReverbFeedback => "feedback",
            Param::ReverbMix => "mix",
        }
    }

    pub fn range(self) -> (f32, f32) {
        match self {
            Param::Volume => VOLUME_RANGE,
            Param::Cutoff => CUTOFF_RANGE,
            Param::Resonance => RESONANCE_RANGE,
            Param::Attack => ATTACK_RANGE,
            Param::Decay => DECAY_RANGE,
            Param::ReverbFeedback => REVERB_FEEDBACK_RANGE,
            Param::ReverbMix => REVERB_MIX_RANGE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamChange {
    pub param: Param,
    pub value: f32,
}

/// Changes produced by one control block. At most one per knob.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ControlUpdate {
    changes: [Option<ParamChange>; 2],
}

impl ControlUpdate {
    pub fn iter(&self) -> impl Iterator<Item = ParamChange> + '_ {
        self.changes.iter().flatten().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.iter().all(Option::is_none)
    }

    pub fn len(&self) -> usize {
        self.changes.iter().flatten().count()
    }
}

/// One knob per parameter, created once and kept for the process lifetime.
#[derive(Debug, Clone)]
pub struct KnobBank {
    pub volume: Knob,
    pub cutoff: Knob,
    pub resonance: Knob,
    pub attack: Knob,
    pub decay: Knob,
    pub reverb_feedback: Knob,
    pub reverb_mix: Knob,
}

fn knob(initial: f32, (min, max): (f32, f32)) -> Knob {
    Knob::new(initial, min, max)
}

impl KnobBank {
    pub fn from_config(config: &SynthConfig) -> Self {
        Self {
            volume: knob(config.master.volume, VOLUME_RANGE),
            cutoff: knob(config.filter.cutoff, CUTOFF_RANGE),
            resonance: knob(config.filter.resonance, RESONANCE_RANGE),
            attack: knob(config.envelope.attack, ATTACK_RANGE),
            decay: knob(config.envelope.decay, DECAY_RANGE),
            reverb_feedback: knob(config.reverb.feedback, REVERB_FEEDBACK_RANGE),
            reverb_mix: knob(config.reverb.mix, REVERB_MIX_RANGE),
        }
    }

    /// The knobs the given mode drives, borrowed as one variant.
    pub fn for_mode(&mut self, mode: Mode) -> ModeKnobs<'_> {
        match mode {
            Mode::Default => ModeKnobs::Default {
                volume: &mut self.volume,
            },
            Mode::Filter => ModeKnobs::Filter {
                cutoff: &mut self.cutoff,
                resonance: &mut self.resonance,
            },
            Mode::Envelope => ModeKnobs::Envelope {
                attack: &mut self.attack,
                decay: &mut self.decay,
            },
            Mode::Reverb => ModeKnobs::Reverb {
                feedback: &mut self.reverb_feedback,
                mix: &mut self.reverb_mix,
            },
        }
    }

    pub fn get(&self, param: Param) -> &Knob {
        match param {
            Param::Volume => &self.volume,
            Param::Cutoff => &self.cutoff,
            Param::Resonance => &self.resonance,
            Param::Attack => &self.attack,
            Param::Decay => &self.decay,
            Param::ReverbFeedback => &self.reverb_feedback,
            Param::ReverbMix => &self.reverb_mix,
        }
    }

    pub fn reset_all(&mut self) {
        for mode in Mode::ALL {
            self.for_mode(mode).reset();
        }
    }
}

impl Default for KnobBank {
    fn default() -> Self {
        Self::from_config(&SynthConfig::default())
    }
}

/// Mutable view of exactly the knobs one mode drives.
pub enum ModeKnobs<'a> {
    Default {
        volume: &'a mut Knob,
    },
    Filter {
        cutoff: &'a mut Knob,
        resonance: &'a mut Knob,
    },
    Envelope {
        attack: &'a mut Knob,
        decay: &'a mut Knob,
    },
    Reverb {
        feedback: &'a mut Knob,
        mix: &'a mut Knob,
    },
}

type Slot<'a> = Option<(Param, &'a mut Knob)>;

impl<'a> ModeKnobs<'a> {
    /// Knob 1 and knob 2 with the parameter each one drives.
    pub fn slots(self) -> [Slot<'a>; 2] {
        match self {
            ModeKnobs::Default { volume } => [Some((Param::Volume, volume)), None],
            ModeKnobs::Filter { cutoff, resonance } => [
                Some((Param::Cutoff, cutoff)),
                Some((Param::Resonance, resonance)),
            ],
            ModeKnobs::Envelope { attack, decay } => {
                [Some((Param::Attack, attack)), Some((Param::Decay, decay))]
            }
            ModeKnobs::Reverb { feedback, mix } => [
                Some((Param::ReverbFeedback, feedback)),
                Some((Param::ReverbMix, mix)),
            ],
        }
    }

    pub fn reset(self) {
        for (_, knob) in self.slots().into_iter().flatten() {
            knob.reset();
        }
    }
}

/// Display state of one knob slot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KnobView {
    pub param: Param,
    pub value: f32,
    pub normalized: f32,
    pub caught: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceSnapshot {
    pub mode: Mode,
    pub waveform: Waveform,
    pub knobs: [Option<KnobView>; 2],
}

/// Mode selector, knob bank, and waveform encoder.
#[derive(Debug, Clone)]
pub struct ControlSurface {
    knobs: KnobBank,
    mode: Mode,
    policy: CatchPolicy,
    waveform: Waveform,
}

impl ControlSurface {
    pub fn new(knobs: KnobBank, policy: CatchPolicy, waveform: Waveform) -> Self {
        Self {
            knobs,
            mode: Mode::default(),
            policy,
            waveform,
        }
    }

    pub fn from_config(config: &SynthConfig) -> Self {
        Self::new(
            KnobBank::from_config(config),
            config.catch_policy,
            config.waveform,
        )
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn policy(&self) -> CatchPolicy {
        self.policy
    }

    pub fn waveform(&self) -> Waveform {
        self.waveform
    }

    pub fn knobs(&self) -> &KnobBank {
        &self.knobs
    }

    /// Switch modes, clearing catch latches per the policy.
    ///
    /// Selecting the mode that is already active changes nothing.
    pub fn set_mode(&mut self, mode: Mode) {
        if mode == self.mode {
            return;
        }

        match self.policy {
            CatchPolicy::EnteredMode => self.knobs.for_mode(mode).reset(),
            CatchPolicy::AllModes => self.knobs.reset_all(),
        }

        tracing::debug!(from = self.mode.name(), to = mode.name(), "mode change");
        self.mode = mode;
    }

    pub fn next_mode(&mut self) -> Mode {
        self.set_mode(self.mode.next());
        self.mode
    }

    /// Run one control block with the two raw knob readings.
    pub fn process(&mut self, raw1: f32, raw2: f32) -> ControlUpdate {
        let mut update = ControlUpdate::default();
        let slots = self.knobs.for_mode(self.mode).slots();

        for ((slot, raw), change) in slots
            .into_iter()
            .zip([raw1, raw2])
            .zip(update.changes.iter_mut())
        {
            if let Some((param, knob)) = slot {
                if knob.update(raw) {
                    *change = Some(ParamChange {
                        param,
                        value: knob.value(),
                    });
                }
            }
        }

        update
    }

    /// Relative encoder input. Wraps around the waveform list.
    pub fn step_waveform(&mut self, delta: i32) -> Waveform {
        self.waveform = self.waveform.step(delta);
        self.waveform
    }

    /// Mode, waveform, and knob 1 / knob 2 as the current mode sees them.
    pub fn snapshot(&self) -> SurfaceSnapshot {
        let knobs = self.mode.params().map(|param| {
            param.map(|param| {
                let knob = self.knobs.get(param);
                KnobView {
                    param,
                    value: knob.value(),
                    normalized: knob.normalized(),
                    caught: knob.is_caught(),
                }
            })
        });

        SurfaceSnapshot {
            mode: self.mode,
            waveform: self.waveform,
            knobs,
        }
    }
}

impl Default for ControlSurface {
    fn default() -> Self {
        Self::from_config(&SynthConfig::default())
    }
}
