use crate::{
    math::Spectrum,
    sampling::{get_1d, Random},
};

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, EnumVariantNames};

/// Identity of the spectral sample carried by one path.
///
/// Collaborators receive it with every query and must pass it on unchanged.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Wavelengths {
    channel: Option<u8>,
}

impl Wavelengths {
    /// All channels are transported together.
    pub const fn all() -> Self {
        Self { channel: None }
    }

    /// Only `channel` is transported.
    pub const fn single(channel: u8) -> Self {
        Self {
            channel: Some(channel),
        }
    }

    pub fn channel(&self) -> Option<u8> {
        self.channel
    }

    /// Masks `s` to the channels carried by this sample, weighted so that
    /// averaging over samples is unbiased.
    pub fn restrict(&self, s: Spectrum) -> Spectrum {
        match self.channel {
            None => s,
            Some(0) => Spectrum::new(s.r * 3.0, 0.0, 0.0),
            Some(1) => Spectrum::new(0.0, s.g * 3.0, 0.0),
            Some(_) => Spectrum::new(0.0, 0.0, s.b * 3.0),
        }
    }
}

impl Default for Wavelengths {
    fn default() -> Self {
        Self::all()
    }
}

/// How spectral samples are drawn and reduced to scalars.
#[derive(
    Copy, Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize, Display, EnumVariantNames, EnumString,
)]
pub enum ColorModel {
    /// Transport all three channels in every path.
    #[default]
    Rgb,
    /// Transport one randomly chosen channel per path.
    SingleChannel,
}

impl ColorModel {
    /// Draws the spectral sample for a new path.
    pub fn sample(&self, rng: &mut Random) -> Wavelengths {
        match self {
            ColorModel::Rgb => Wavelengths::all(),
            ColorModel::SingleChannel => {
                let channel = ((get_1d(rng) * 3.0) as u8).min(2);
                Wavelengths::single(channel)
            }
        }
    }

    /// Returns the scalar importance of `s`, used as the Metropolis target.
    pub fn y(&self, s: Spectrum) -> f64 {
        0.2126 * s.r + 0.7152 * s.g + 0.0722 * s.b
    }
}
