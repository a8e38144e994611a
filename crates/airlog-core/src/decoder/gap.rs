use super::Sample;

/// Maximum silence between two readings before the series is broken.
pub const GAP_THRESHOLD_SECS: u32 = 15 * 60;

/// Tracks the previous reading's timestamp to detect temporal gaps.
#[derive(Debug, Default, Clone)]
pub struct GapDetector {
    previous: Option<u32>,
}

impl GapDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `timestamp` and report whether a gap precedes it.
    ///
    /// The first reading never opens a gap. A timestamp that goes backwards
    /// counts as zero elapsed time.
    pub fn observe(&mut self, timestamp: u32) -> bool {
        let gap = self
            .previous
            .is_some_and(|previous| timestamp.saturating_sub(previous) > GAP_THRESHOLD_SECS);
        self.previous = Some(timestamp);
        gap
    }
}

/// The readings on either side of a gap marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GapSpan {
    pub from: u32,
    pub to: u32,
}

impl GapSpan {
    pub fn duration_secs(&self) -> u32 {
        self.to.saturating_sub(self.from)
    }
}

/// Collect the spans bridged by each gap marker in a decoded sequence.
///
/// Markers without a reading on both sides are skipped.
pub fn gap_spans(samples: &[Sample]) -> Vec<GapSpan> {
    samples
        .windows(3)
        .filter_map(|window| match window {
            [Sample::Measurement(before), Sample::Gap, Sample::Measurement(after)] => {
                Some(GapSpan {
                    from: before.timestamp,
                    to: after.timestamp,
                })
            }
            _ => None,
        })
        .collect()
}
