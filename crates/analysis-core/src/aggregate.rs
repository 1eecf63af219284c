//! Running posture tallies.

use postura_pose_model::{AnalysisSummary, FrameVerdicts, PostureKind, PostureVerdict};

/// Folds per-frame verdicts into good/bad counters.
///
/// Call [`Aggregator::record_frame`] exactly once per analysed frame;
/// recording the same frame twice counts it twice.
#[derive(Debug, Clone, Default)]
pub struct Aggregator {
    summary: AnalysisSummary,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one verdict. `NotApplicable` is a no-op.
    pub fn record(&mut self, kind: PostureKind, verdict: PostureVerdict) {
        let tally = self.summary.tally_mut(kind);
        match verdict {
            PostureVerdict::Good => tally.good += 1,
            PostureVerdict::Bad => tally.bad += 1,
            PostureVerdict::NotApplicable => {}
        }
    }

    /// Count one analysed frame and its three verdicts.
    pub fn record_frame(&mut self, verdicts: &FrameVerdicts) {
        self.summary.frames_processed += 1;
        for kind in PostureKind::ALL {
            self.record(kind, verdicts.get(kind));
        }
    }

    /// Snapshot of the current tallies. Does not reset anything.
    pub fn summarize(&self) -> AnalysisSummary {
        self.summary
    }

    pub fn frames_processed(&self) -> u64 {
        self.summary.frames_processed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn not_applicable_is_a_no_op() {
        let mut agg = Aggregator::new();
        agg.record(PostureKind::Squat, PostureVerdict::NotApplicable);
        assert_eq!(agg.summarize(), AnalysisSummary::default());
    }

    #[test]
    fn summarize_mid_run_does_not_reset() {
        let mut agg = Aggregator::new();
        agg.record_frame(&FrameVerdicts {
            slouch: PostureVerdict::Good,
            desk: PostureVerdict::Bad,
            squat: PostureVerdict::NotApplicable,
        });
        let partial = agg.summarize();
        assert_eq!(partial.frames_processed, 1);
        assert_eq!(partial.slouch.good, 1);
        assert_eq!(partial.desk.bad, 1);

        agg.record_frame(&FrameVerdicts::NONE);
        let later = agg.summarize();
        assert_eq!(later.frames_processed, 2);
        assert_eq!(later.slouch, partial.slouch);
        assert_eq!(later.not_applicable(PostureKind::Slouch), 1);
    }

    fn verdict() -> impl Strategy<Value = PostureVerdict> {
        prop_oneof![
            Just(PostureVerdict::Good),
            Just(PostureVerdict::Bad),
            Just(PostureVerdict::NotApplicable),
        ]
    }

    proptest! {
        #[test]
        fn every_frame_is_accounted_for(
            frames in prop::collection::vec((verdict(), verdict(), verdict()), 0..64)
        ) {
            let mut agg = Aggregator::new();
            let mut previous = agg.summarize();
            for &(slouch, desk, squat) in &frames {
                agg.record_frame(&FrameVerdicts { slouch, desk, squat });
                let current = agg.summarize();
                for kind in PostureKind::ALL {
                    prop_assert!(current.tally(kind).good >= previous.tally(kind).good);
                    prop_assert!(current.tally(kind).bad >= previous.tally(kind).bad);
                }
                previous = current;
            }

            let summary = agg.summarize();
            prop_assert_eq!(summary.frames_processed, frames.len() as u64);
            for kind in PostureKind::ALL {
                let tally = summary.tally(kind);
                prop_assert_eq!(
                    tally.good + tally.bad + summary.not_applicable(kind),
                    frames.len() as u64
                );
            }
        }
    }
}
