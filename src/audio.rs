//! Sound enhancer effect parameters and the preference screen driving them.

pub const PARAM_HEADSET_TYPE: i32 = 1;
pub const PARAM_MODE: i32 = 3;
pub const PARAM_MUSIC: i32 = 4;

pub const KEY_SOUND_ENHANCER: &str = "mi_sound_enhancer";
pub const KEY_HEADSET_TYPE: &str = "dirac_headsets";
pub const KEY_MUSIC_MODE: &str = "dirac_mode";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EffectError {
    #[error("audio effect is not initialised")]
    NotInitialised,
    #[error("audio effect returned status {0}")]
    Status(i32),
}

/// Raw get/set-by-index access to an audio effect engine.
pub trait AudioEffect {
    fn get_parameter(&self, param: i32) -> Result<i32, EffectError>;
    fn set_parameter(&mut self, param: i32, value: i32) -> Result<(), EffectError>;
}

/// Typed view over the enhancer's parameter indices.
pub struct AudioEnhancer<E: AudioEffect> {
    effect: E,
}

impl<E: AudioEffect> AudioEnhancer<E> {
    pub fn new(effect: E) -> Self {
        Self { effect }
    }

    pub fn headset_type(&self) -> Result<i32, EffectError> {
        self.effect.get_parameter(PARAM_HEADSET_TYPE)
    }

    pub fn set_headset_type(&mut self, value: i32) -> Result<(), EffectError> {
        self.effect.set_parameter(PARAM_HEADSET_TYPE, value)
    }

    pub fn mode(&self) -> Result<i32, EffectError> {
        self.effect.get_parameter(PARAM_MODE)
    }

    pub fn set_mode(&mut self, value: i32) -> Result<(), EffectError> {
        self.effect.set_parameter(PARAM_MODE, value)
    }

    pub fn music(&self) -> Result<i32, EffectError> {
        self.effect.get_parameter(PARAM_MUSIC)
    }

    pub fn set_music(&mut self, value: i32) -> Result<(), EffectError> {
        self.effect.set_parameter(PARAM_MUSIC, value)
    }

    pub fn into_inner(self) -> E {
        self.effect
    }
}

/// Enhancer service handed to the preference screen instead of a global.
pub trait AudioEnhancerService {
    fn has_initialized(&self) -> bool;
    fn is_enabled(&self) -> Result<bool, EffectError>;
    fn set_enabled(&mut self, enabled: bool) -> Result<(), EffectError>;
    fn headset_type(&self) -> Result<i32, EffectError>;
    fn set_headset_type(&mut self, value: i32) -> Result<(), EffectError>;
    fn set_mode(&mut self, value: i32) -> Result<(), EffectError>;
}

/// The music parameter doubles as the on/off switch.
impl<E: AudioEffect> AudioEnhancerService for AudioEnhancer<E> {
    fn has_initialized(&self) -> bool {
        self.music().is_ok()
    }

    fn is_enabled(&self) -> Result<bool, EffectError> {
        Ok(self.music()? == 1)
    }

    fn set_enabled(&mut self, enabled: bool) -> Result<(), EffectError> {
        self.set_music(i32::from(enabled))
    }

    fn headset_type(&self) -> Result<i32, EffectError> {
        AudioEnhancer::headset_type(self)
    }

    fn set_headset_type(&mut self, value: i32) -> Result<(), EffectError> {
        AudioEnhancer::set_headset_type(self, value)
    }

    fn set_mode(&mut self, value: i32) -> Result<(), EffectError> {
        AudioEnhancer::set_mode(self, value)
    }
}

/// A requested preference change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreferenceChange {
    Enabled(bool),
    HeadsetType(String),
    MusicMode(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeOutcome {
    Accepted,
    Rejected(String),
}

/// State of the sound enhancer screen.
///
/// Every change goes through [`SoundEnhancerSettings::apply`]; an accepted
/// change has already been pushed to the service.
pub struct SoundEnhancerSettings<S: AudioEnhancerService> {
    service: S,
    enabled: bool,
    headset_type: Option<i32>,
}

impl<S: AudioEnhancerService> SoundEnhancerSettings<S> {
    pub fn new(service: S) -> Self {
        let (enabled, headset_type) = if service.has_initialized() {
            (
                service.is_enabled().unwrap_or(false),
                service.headset_type().ok(),
            )
        } else {
            tracing::info!("sound enhancer not initialised, showing defaults");
            (false, None)
        };
        Self {
            service,
            enabled,
            headset_type,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn headset_type(&self) -> Option<i32> {
        self.headset_type
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    /// Preference keys shown on the screen. The music mode list is hidden.
    pub fn visible_keys(&self) -> &'static [&'static str] {
        &[KEY_SOUND_ENHANCER, KEY_HEADSET_TYPE]
    }

    pub fn apply(&mut self, change: PreferenceChange) -> ChangeOutcome {
        let result = match &change {
            PreferenceChange::Enabled(enabled) => {
                if *enabled == self.enabled {
                    return ChangeOutcome::Accepted;
                }
                self.service.set_enabled(*enabled).map(|()| {
                    self.enabled = *enabled;
                })
            }
            PreferenceChange::HeadsetType(raw) => {
                let Some(value) = parse_list_value(raw) else {
                    return reject(&change, format!("'{raw}' is not a headset type"));
                };
                self.service.set_headset_type(value).map(|()| {
                    self.headset_type = Some(value);
                })
            }
            PreferenceChange::MusicMode(raw) => {
                let Some(value) = parse_list_value(raw) else {
                    return reject(&change, format!("'{raw}' is not a music mode"));
                };
                self.service.set_mode(value)
            }
        };
        match result {
            Ok(()) => ChangeOutcome::Accepted,
            Err(e) => reject(&change, e.to_string()),
        }
    }
}

fn parse_list_value(raw: &str) -> Option<i32> {
    raw.trim().parse().ok()
}

fn reject(change: &PreferenceChange, reason: String) -> ChangeOutcome {
    tracing::warn!(?change, "sound enhancer change rejected: {reason}");
    ChangeOutcome::Rejected(reason)
}
