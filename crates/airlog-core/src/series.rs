//! Chart-ready data sets derived from decoded samples.
//!
//! Each particulate channel becomes one series with a point per sample. Gap
//! markers turn into points without timestamp or value so that renderers
//! break the line instead of interpolating across the outage.

use serde::{Deserialize, Serialize};
use time::{Date, Duration, OffsetDateTime, PrimitiveDateTime, UtcOffset};

use crate::decoder::Sample;
use crate::frame::Measurement;
use crate::{SeriesPoint, SeriesSummary};

/// Concentration unit of every channel.
pub const UNIT: &str = "µg/m³";

/// Particulate matter channel carried by a measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Channel {
    #[serde(rename = "pm1")]
    Pm1,
    #[serde(rename = "pm2_5")]
    Pm25,
    #[serde(rename = "pm10")]
    Pm10,
}

impl Channel {
    /// All channels in report order.
    pub const ALL: [Channel; 3] = [Channel::Pm1, Channel::Pm25, Channel::Pm10];

    pub fn label(self) -> &'static str {
        match self {
            Channel::Pm1 => "PM 1",
            Channel::Pm25 => "PM 2.5",
            Channel::Pm10 => "PM 10",
        }
    }

    pub fn value(self, measurement: &Measurement) -> u16 {
        match self {
            Channel::Pm1 => measurement.pm1,
            Channel::Pm25 => measurement.pm2_5,
            Channel::Pm10 => measurement.pm10,
        }
    }
}

/// Build one series per channel, in `Channel::ALL` order.
///
/// # Examples
/// ```
/// use airlog_core::{Measurement, Sample, build_series};
///
/// let samples = [
///     Sample::Measurement(Measurement { timestamp: 0, pm1: 1, pm2_5: 2, pm10: 3 }),
///     Sample::Gap,
/// ];
/// let series = build_series(&samples);
/// assert_eq!(series.len(), 3);
/// assert_eq!(series[2].points[0].value, Some(3));
/// assert_eq!(series[2].points[1].value, None);
/// ```
pub fn build_series(samples: &[Sample]) -> Vec<SeriesSummary> {
    Channel::ALL
        .iter()
        .map(|&channel| SeriesSummary {
            channel,
            label: channel.label().to_string(),
            unit: UNIT.to_string(),
            points: samples
                .iter()
                .map(|sample| point_for(channel, sample))
                .collect(),
        })
        .collect()
}

fn point_for(channel: Channel, sample: &Sample) -> SeriesPoint {
    match sample {
        Sample::Measurement(m) => SeriesPoint {
            timestamp: Some(m.timestamp),
            value: Some(channel.value(m)),
        },
        Sample::Gap => SeriesPoint {
            timestamp: None,
            value: None,
        },
    }
}

/// The local day covered by one log segment, used as the chart x-axis range.
///
/// The logger names its day files after local midnight, so the window starts
/// at midnight in the logger's UTC offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayWindow {
    pub start: OffsetDateTime,
    pub end: OffsetDateTime,
}

impl DayWindow {
    pub fn for_date(date: Date, offset: UtcOffset) -> Self {
        let start = date.midnight().assume_offset(offset);
        Self {
            start,
            end: start
                .checked_add(Duration::DAY)
                .unwrap_or(PrimitiveDateTime::MAX.assume_offset(offset)),
        }
    }

    /// Whether `timestamp` falls in `[start, end)`.
    pub fn contains(&self, timestamp: u32) -> bool {
        let ts = i64::from(timestamp);
        ts >= self.start.unix_timestamp() && ts < self.end.unix_timestamp()
    }
}

#[cfg(test)]
mod tests {
    use super::{Channel, DayWindow, UNIT, build_series};
    use crate::decoder::Sample;
    use crate::frame::Measurement;
    use time::UtcOffset;
    use time::macros::{date, offset};

    fn sample(timestamp: u32, pm1: u16, pm2_5: u16, pm10: u16) -> Sample {
        Sample::Measurement(Measurement {
            timestamp,
            pm1,
            pm2_5,
            pm10,
        })
    }

    #[test]
    fn series_follow_channel_order() {
        let series = build_series(&[sample(10, 1, 2, 3)]);
        let channels: Vec<_> = series.iter().map(|s| s.channel).collect();
        assert_eq!(channels, Channel::ALL.to_vec());
        assert_eq!(series[1].label, "PM 2.5");
        assert_eq!(series[1].unit, UNIT);
        assert_eq!(series[1].points[0].value, Some(2));
        assert_eq!(series[1].points[0].timestamp, Some(10));
    }

    #[test]
    fn gap_becomes_empty_point() {
        let samples = [sample(0, 1, 1, 1), Sample::Gap, sample(2000, 2, 2, 2)];
        for series in build_series(&samples) {
            assert_eq!(series.points.len(), 3);
            assert_eq!(series.points[1].timestamp, None);
            assert_eq!(series.points[1].value, None);
        }
    }

    #[test]
    fn empty_samples_give_empty_series() {
        let series = build_series(&[]);
        assert_eq!(series.len(), 3);
        assert!(series.iter().all(|s| s.points.is_empty()));
    }

    #[test]
    fn gap_point_serializes_nulls() {
        let series = build_series(&[Sample::Gap]);
        let value = serde_json::to_value(&series[0]).unwrap();
        assert_eq!(value["channel"], "pm1");
        assert!(value["points"][0]["timestamp"].is_null());
        assert!(value["points"][0]["value"].is_null());
    }

    #[test]
    fn day_window_is_half_open() {
        let window = DayWindow::for_date(date!(2024 - 05 - 01), UtcOffset::UTC);
        assert_eq!(window.start.unix_timestamp(), 1_714_521_600);
        assert_eq!(window.end.unix_timestamp(), 1_714_608_000);
        assert!(window.contains(1_714_521_600));
        assert!(window.contains(1_714_607_999));
        assert!(!window.contains(1_714_608_000));
        assert!(!window.contains(1_714_521_599));
    }

    #[test]
    fn day_window_starts_at_local_midnight() {
        let window = DayWindow::for_date(date!(2024 - 05 - 01), offset!(+2));
        assert_eq!(window.start.unix_timestamp(), 1_714_514_400);
        assert_eq!(window.end.unix_timestamp(), 1_714_600_800);
        // 00:30 local time, still April 30 in UTC.
        assert!(window.contains(1_714_516_200));
        assert!(!window.contains(1_714_600_800));
    }
}
