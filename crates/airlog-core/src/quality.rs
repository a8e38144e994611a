//! Air quality classification of particulate readings.

use serde::{Deserialize, Serialize};

use crate::series::Channel;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AirQuality {
    Good,
    Moderate,
    Poor,
}

/// Upper bounds (inclusive, µg/m³) of the good and moderate bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    pub good: u16,
    pub moderate: u16,
}

pub fn limits(channel: Channel) -> Limits {
    match channel {
        Channel::Pm1 => Limits {
            good: 15,
            moderate: 40,
        },
        Channel::Pm25 => Limits {
            good: 25,
            moderate: 80,
        },
        Channel::Pm10 => Limits {
            good: 40,
            moderate: 100,
        },
    }
}

/// # Examples
/// ```
/// use airlog_core::{AirQuality, Channel, classify};
///
/// assert_eq!(classify(Channel::Pm10, 40), AirQuality::Good);
/// assert_eq!(classify(Channel::Pm10, 41), AirQuality::Moderate);
/// assert_eq!(classify(Channel::Pm10, 101), AirQuality::Poor);
/// ```
pub fn classify(channel: Channel, value: u16) -> AirQuality {
    let limits = limits(channel);
    if value <= limits.good {
        AirQuality::Good
    } else if value <= limits.moderate {
        AirQuality::Moderate
    } else {
        AirQuality::Poor
    }
}
