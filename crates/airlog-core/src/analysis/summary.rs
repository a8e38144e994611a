use crate::decoder::Sample;
use crate::frame::Measurement;
use crate::quality::classify;
use crate::series::Channel;
use crate::{ChannelPeak, LogSummary};

use super::ts_to_rfc3339;

pub(crate) fn build_summary(samples: &[Sample]) -> LogSummary {
    let mut summary = LogSummary::default();
    let mut first_ts: Option<u32> = None;
    let mut last_ts: Option<u32> = None;

    for sample in samples {
        match sample {
            Sample::Measurement(m) => {
                summary.measurements += 1;
                first_ts = Some(first_ts.map_or(m.timestamp, |ts| ts.min(m.timestamp)));
                last_ts = Some(last_ts.map_or(m.timestamp, |ts| ts.max(m.timestamp)));
            }
            Sample::Gap => summary.gaps += 1,
        }
    }

    summary.time_start = first_ts.and_then(ts_to_rfc3339);
    summary.time_end = last_ts.and_then(ts_to_rfc3339);
    summary.peaks = Channel::ALL
        .iter()
        .filter_map(|&channel| channel_peak(channel, samples))
        .collect();
    summary
}

fn channel_peak(channel: Channel, samples: &[Sample]) -> Option<ChannelPeak> {
    let mut peak: Option<&Measurement> = None;
    for m in samples.iter().filter_map(Sample::measurement) {
        let better = match peak {
            None => true,
            Some(best) => {
                let (value, best_value) = (channel.value(m), channel.value(best));
                value > best_value || (value == best_value && m.timestamp < best.timestamp)
            }
        };
        if better {
            peak = Some(m);
        }
    }

    peak.map(|m| {
        let value = channel.value(m);
        ChannelPeak {
            channel,
            value,
            timestamp: m.timestamp,
            level: classify(channel, value),
        }
    })
}
