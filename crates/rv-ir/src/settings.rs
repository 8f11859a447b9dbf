//! Per-sound playback settings handed to the engine verbatim.

/// Coordinate space of a sound's position.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Positioning {
    #[default]
    Absolute,
    Relative,
}

/// Directional attenuation cone, angles in degrees.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cone {
    pub inner_angle: f32,
    pub outer_angle: f32,
    pub outer_gain: f32,
}

impl Default for Cone {
    fn default() -> Self {
        Self {
            inner_angle: 360.0,
            outer_angle: 360.0,
            outer_gain: 0.0,
        }
    }
}

/// Gain, pan and spatialization parameters for one sound.
///
/// The streaming layer never looks inside this blob. The engine mixes with
/// `volume` and `pan` and keeps the rest for whoever reads it back.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SoundSettings {
    pub volume: f32,
    pub pitch: f32,
    /// -1.0 is hard left, 1.0 hard right.
    pub pan: f32,
    pub spatialization_enabled: bool,
    pub position: [f32; 3],
    pub direction: [f32; 3],
    pub directional_attenuation_factor: f32,
    pub velocity: [f32; 3],
    pub doppler_factor: f32,
    pub positioning: Positioning,
    pub min_distance: f32,
    pub max_distance: f32,
    pub min_gain: f32,
    pub max_gain: f32,
    pub roll_off: f32,
    pub cone: Cone,
}

impl Default for SoundSettings {
    fn default() -> Self {
        Self {
            volume: 1.0,
            pitch: 1.0,
            pan: 0.0,
            spatialization_enabled: false,
            position: [0.0; 3],
            direction: [0.0, 0.0, -1.0],
            directional_attenuation_factor: 1.0,
            velocity: [0.0; 3],
            doppler_factor: 1.0,
            positioning: Positioning::Absolute,
            min_distance: 1.0,
            max_distance: f32::MAX,
            min_gain: 0.0,
            max_gain: 1.0,
            roll_off: 1.0,
            cone: Cone::default(),
        }
    }
}
