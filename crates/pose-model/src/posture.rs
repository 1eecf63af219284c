//! Posture verdicts, tallies, and the analysis summary.

use serde::{Deserialize, Serialize};

/// The posture scenarios each frame is judged against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostureKind {
    Slouch,
    Desk,
    Squat,
}

impl PostureKind {
    pub const ALL: [PostureKind; 3] = [PostureKind::Slouch, PostureKind::Desk, PostureKind::Squat];

    /// Human-readable label used in reports.
    pub fn label(self) -> &'static str {
        match self {
            Self::Slouch => "Slouching",
            Self::Desk => "Desk Sitting",
            Self::Squat => "Squatting",
        }
    }
}

/// Outcome of one classifier on one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostureVerdict {
    Good,
    Bad,
    /// Not enough usable data, or the frame does not show this scenario.
    NotApplicable,
}

/// Good/bad counters for one posture kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostureTally {
    pub good: u64,
    pub bad: u64,
}

impl PostureTally {
    /// Frames that received a Good or Bad verdict.
    pub fn judged(&self) -> u64 {
        self.good + self.bad
    }
}

/// The three verdicts for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameVerdicts {
    pub slouch: PostureVerdict,
    pub desk: PostureVerdict,
    pub squat: PostureVerdict,
}

impl FrameVerdicts {
    /// Verdicts for a frame with no detected subject.
    pub const NONE: FrameVerdicts = FrameVerdicts {
        slouch: PostureVerdict::NotApplicable,
        desk: PostureVerdict::NotApplicable,
        squat: PostureVerdict::NotApplicable,
    };

    pub fn get(&self, kind: PostureKind) -> PostureVerdict {
        match kind {
            PostureKind::Slouch => self.slouch,
            PostureKind::Desk => self.desk,
            PostureKind::Squat => self.squat,
        }
    }
}

/// Tallies for every posture kind at a point in the run.
///
/// For each kind, `good + bad <= frames_processed`; the difference is the
/// number of frames where that kind was not applicable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisSummary {
    pub slouch: PostureTally,
    pub desk: PostureTally,
    pub squat: PostureTally,
    pub frames_processed: u64,
}

impl AnalysisSummary {
    pub fn tally(&self, kind: PostureKind) -> &PostureTally {
        match kind {
            PostureKind::Slouch => &self.slouch,
            PostureKind::Desk => &self.desk,
            PostureKind::Squat => &self.squat,
        }
    }

    pub fn tally_mut(&mut self, kind: PostureKind) -> &mut PostureTally {
        match kind {
            PostureKind::Slouch => &mut self.slouch,
            PostureKind::Desk => &mut self.desk,
            PostureKind::Squat => &mut self.squat,
        }
    }

    /// Frames where `kind` received no verdict.
    pub fn not_applicable(&self, kind: PostureKind) -> u64 {
        self.frames_processed.saturating_sub(self.tally(kind).judged())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_json_shape() {
        let summary = AnalysisSummary {
            slouch: PostureTally { good: 1, bad: 1 },
            desk: PostureTally::default(),
            squat: PostureTally { good: 0, bad: 2 },
            frames_processed: 3,
        };
        let value = serde_json::to_value(summary).unwrap();
        assert_eq!(value["slouch"]["good"], 1);
        assert_eq!(value["squat"]["bad"], 2);
        assert_eq!(value["frames_processed"], 3);
    }

    #[test]
    fn not_applicable_is_derived_from_frame_count() {
        let mut summary = AnalysisSummary {
            frames_processed: 5,
            ..Default::default()
        };
        summary.tally_mut(PostureKind::Desk).good = 2;
        summary.tally_mut(PostureKind::Desk).bad = 1;
        assert_eq!(summary.not_applicable(PostureKind::Desk), 2);
        assert_eq!(summary.not_applicable(PostureKind::Squat), 5);
    }

    #[test]
    fn empty_frame_verdicts() {
        for kind in PostureKind::ALL {
            assert_eq!(FrameVerdicts::NONE.get(kind), PostureVerdict::NotApplicable);
        }
    }
}
