//! Startup configuration.
//!
//! Everything the host needs to build a [`Synth`](crate::synth::engine::Synth)
//! and its [`ControlSurface`](crate::control::ControlSurface), loaded from TOML:
//!
//! ```toml
//! voices = 8
//! mix-mode = "velocity"
//! catch-policy = "entered-mode"
//! waveform = "saw"
//!
//! [filter]
//! cutoff = 2000.0
//! resonance = 0.7
//! ```
//!
//! Every field has a default, so an empty file is a valid configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{
    control::{
        surface::{
            ATTACK_RANGE, CUTOFF_RANGE, DECAY_RANGE, RESONANCE_RANGE, REVERB_FEEDBACK_RANGE,
            REVERB_MIX_RANGE, VOLUME_RANGE,
        },
        CatchPolicy,
    },
    dsp::{
        envelope::{DEFAULT_ATTACK, DEFAULT_DECAY},
        Waveform,
    },
    error::ConfigError,
    synth::pool::MixMode,
    MAX_VOICES,
};

pub const DEFAULT_SAMPLE_RATE: u32 = 48_000;
pub const DEFAULT_VOICES: usize = 8;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct SynthConfig {
    /// Used when no audio device dictates the rate.
    pub sample_rate: u32,
    pub voices: usize,
    pub mix_mode: MixMode,
    pub catch_policy: CatchPolicy,
    pub waveform: Waveform,
    pub envelope: EnvelopeConfig,
    pub filter: FilterConfig,
    pub reverb: ReverbConfig,
    pub master: MasterConfig,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            voices: DEFAULT_VOICES,
            mix_mode: MixMode::default(),
            catch_policy: CatchPolicy::default(),
            waveform: Waveform::default(),
            envelope: EnvelopeConfig::default(),
            filter: FilterConfig::default(),
            reverb: ReverbConfig::default(),
            master: MasterConfig::default(),
        }
    }
}

/// Attack and decay times in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EnvelopeConfig {
    pub attack: f32,
    pub decay: f32,
}

impl Default for EnvelopeConfig {
    fn default() -> Self {
        Self {
            attack: DEFAULT_ATTACK,
            decay: DEFAULT_DECAY,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FilterConfig {
    pub cutoff: f32,
    pub resonance: f32,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            cutoff: 2000.0,
            resonance: 0.7,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReverbConfig {
    pub feedback: f32,
    pub mix: f32,
    pub damping: f32,
}

impl Default for ReverbConfig {
    fn default() -> Self {
        Self {
            feedback: 0.85,
            mix: 0.25,
            damping: 0.5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MasterConfig {
    pub volume: f32,
}

impl Default for MasterConfig {
    fn default() -> Self {
        Self { volume: 0.8 }
    }
}

fn check(param: &'static str, value: f32, range: (f32, f32)) -> Result<(), ConfigError> {
    // NaN fails both comparisons
    if value >= range.0 && value <= range.1 {
        Ok(())
    } else {
        Err(ConfigError::out_of_range(param, value, range))
    }
}

impl SynthConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: SynthConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        let config = Self::from_toml_str(&source)?;

        tracing::info!(
            path = %path.display(),
            voices = config.voices,
            mix_mode = ?config.mix_mode,
            catch_policy = ?config.catch_policy,
            "loaded synth config"
        );
        Ok(config)
    }

    /// Every initial value has to sit inside the range its knob covers,
    /// otherwise the knob could never catch it.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=MAX_VOICES).contains(&self.voices) {
            return Err(ConfigError::InvalidVoiceCount(self.voices));
        }
        if self.sample_rate == 0 {
            return Err(ConfigError::InvalidParameter {
                param: "sample-rate",
                value: 0.0,
                reason: "must be positive".to_string(),
            });
        }

        check("master.volume", self.master.volume, VOLUME_RANGE)?;
        check("filter.cutoff", self.filter.cutoff, CUTOFF_RANGE)?;
        check("filter.resonance", self.filter.resonance, RESONANCE_RANGE)?;
        check("envelope.attack", self.envelope.attack, ATTACK_RANGE)?;
        check("envelope.decay", self.envelope.decay, DECAY_RANGE)?;
        check("reverb.feedback", self.reverb.feedback, REVERB_FEEDBACK_RANGE)?;
        check("reverb.mix", self.reverb.mix, REVERB_MIX_RANGE)?;
        check("reverb.damping", self.reverb.damping, (0.0, 1.0))?;
        Ok(())
    }

    pub fn sample_rate_hz(&self) -> f32 {
        self.sample_rate as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_valid() {
        let config = SynthConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.voices, 8);
        assert_eq!(config.mix_mode, MixMode::Velocity);
        assert_eq!(config.catch_policy, CatchPolicy::EnteredMode);
        assert_eq!(config.waveform, Waveform::Saw);
    }

    #[test]
    fn empty_document_uses_defaults() {
        let config = SynthConfig::from_toml_str("").unwrap();
        assert_eq!(config, SynthConfig::default());
    }

    #[test]
    fn parses_partial_document() {
        let config = SynthConfig::from_toml_str(
            r#"
            voices = 4
            mix-mode = "flat"
            catch-policy = "all-modes"
            waveform = "square"

            [filter]
            cutoff = 1000.0
            "#,
        )
        .unwrap();

        assert_eq!(config.voices, 4);
        assert_eq!(config.mix_mode, MixMode::Flat);
        assert_eq!(config.catch_policy, CatchPolicy::AllModes);
        assert_eq!(config.waveform, Waveform::Square);
        assert_eq!(config.filter.cutoff, 1000.0);
        assert_eq!(config.filter.resonance, 0.7);
    }

    #[test]
    fn rejects_bad_voice_count() {
        for voices in [0, MAX_VOICES + 1] {
            let err = SynthConfig::from_toml_str(&format!("voices = {voices}")).unwrap_err();
            assert!(matches!(err, ConfigError::InvalidVoiceCount(v) if v == voices));
        }
    }

    #[test]
    fn rejects_value_outside_knob_range() {
        let err = SynthConfig::from_toml_str("[filter]\ncutoff = 50.0").unwrap_err();
        assert!(
            matches!(err, ConfigError::InvalidParameter { param: "filter.cutoff", .. }),
            "got: {err}"
        );
    }

    #[test]
    fn rejects_unknown_fields_and_bad_toml() {
        assert!(matches!(
            SynthConfig::from_toml_str("voicez = 4"),
            Err(ConfigError::TomlParse(_))
        ));
        assert!(matches!(
            SynthConfig::from_toml_str("voices = "),
            Err(ConfigError::TomlParse(_))
        ));
    }

    #[test]
    fn load_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "voices = 2\n[master]\nvolume = 0.5").unwrap();

        let config = SynthConfig::load(file.path()).unwrap();
        assert_eq!(config.voices, 2);
        assert_eq!(config.master.volume, 0.5);
    }

    #[test]
    fn load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = SynthConfig::load(dir.path().join("missing.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::ReadFile { .. }));
    }

    #[test]
    fn serializes_back_to_toml() {
        let config = SynthConfig::default();
        let text = toml::to_string(&config).unwrap();
        assert!(text.contains("mix-mode = \"velocity\""), "got: {text}");
        assert_eq!(SynthConfig::from_toml_str(&text).unwrap(), config);
    }
}
