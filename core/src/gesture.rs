use std::fmt;

use serde::{Deserialize, Serialize};

use crate::landmarks::{
    self, FINGER_TIPS, Hand, INDEX_PIP, INDEX_TIP, MIDDLE_PIP, MIDDLE_TIP, PALM_CENTER, PINKY_PIP,
    PINKY_TIP, RING_PIP, RING_TIP, THUMB_IP, THUMB_TIP, WRIST, distance,
};

/// The closed gesture vocabulary. `Unknown` is the fallback for any hand
/// that matches no rule; "no hand at all" is represented by the caller as
/// the absence of a gesture, never as `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Gesture {
    One,
    Two,
    Open,
    Closed,
    ThumbsUp,
    ThumbsDown,
    Unknown,
}

impl Gesture {
    pub const ALL: [Gesture; 7] = [
        Gesture::One,
        Gesture::Two,
        Gesture::Open,
        Gesture::Closed,
        Gesture::ThumbsUp,
        Gesture::ThumbsDown,
        Gesture::Unknown,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Gesture::One => "ONE",
            Gesture::Two => "TWO",
            Gesture::Open => "OPEN",
            Gesture::Closed => "CLOSED",
            Gesture::ThumbsUp => "THUMBS_UP",
            Gesture::ThumbsDown => "THUMBS_DOWN",
            Gesture::Unknown => "UNKNOWN",
        }
    }

    pub fn from_label(label: &str) -> Option<Gesture> {
        Gesture::ALL.into_iter().find(|g| g.label() == label)
    }

    /// Gestures that drive the hold-to-repeat timer.
    pub fn repeats(self) -> bool {
        matches!(self, Gesture::ThumbsUp | Gesture::ThumbsDown)
    }

    pub(crate) fn index(self) -> usize {
        match self {
            Gesture::One => 0,
            Gesture::Two => 1,
            Gesture::Open => 2,
            Gesture::Closed => 3,
            Gesture::ThumbsUp => 4,
            Gesture::ThumbsDown => 5,
            Gesture::Unknown => 6,
        }
    }
}

impl fmt::Display for Gesture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Classification thresholds, all in the normalized landmark coordinate
/// space. The defaults are the empirically tuned values; recalibrate per
/// camera and working distance through `settings.json` rather than here.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Thumb tip must clear the IP joint upward by this much for thumbs-up.
    pub thumb_up_margin: f32,
    /// Thumb tip must sit below the palm center by this much for thumbs-down.
    pub thumb_down_margin: f32,
    /// Minimum index/middle tip separation for a peace sign; closer than
    /// this the two fingers are held together and the shape is ambiguous.
    pub spread_min: f32,
    /// Maximum mean tip-to-palm distance for a fist.
    pub fist_max: f32,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        ClassifierConfig {
            thumb_up_margin: 0.05,
            thumb_down_margin: 0.05,
            spread_min: 0.05,
            fist_max: 0.12,
        }
    }
}

pub struct GestureClassifier {
    pub config: ClassifierConfig,
}

impl GestureClassifier {
    pub fn new(config: ClassifierConfig) -> Self {
        GestureClassifier { config }
    }

    /// Pure rule-based classification of one hand. Rules are tried in a
    /// fixed priority order and the first match wins.
    pub fn classify(&self, hand: &Hand) -> Gesture {
        let fingers = landmarks::extended_fingers(hand);
        let count = fingers.count();

        let thumb_tip = hand.point(THUMB_TIP);
        let thumb_ip = hand.point(THUMB_IP);
        let wrist = hand.point(WRIST);
        let palm = hand.point(PALM_CENTER);

        // A lone extended thumb also satisfies count == 1, so the thumb
        // rules must run before the generic one-finger rule.
        if fingers.thumb() && count == 1 && non_thumb_fingers_closed(hand) {
            if thumb_tip.y < wrist.y && thumb_tip.y < thumb_ip.y - self.config.thumb_up_margin {
                return Gesture::ThumbsUp;
            }
            if thumb_tip.y > palm.y + self.config.thumb_down_margin {
                return Gesture::ThumbsDown;
            }
        }

        if fingers.index() && count == 1 && !fingers.thumb() {
            return Gesture::One;
        }

        if fingers.index() && fingers.middle() && count == 2 {
            let spread = distance(hand.point(INDEX_TIP), hand.point(MIDDLE_TIP));
            if spread > self.config.spread_min {
                return Gesture::Two;
            }
        }

        if count >= 4 && fingers.thumb() {
            return Gesture::Open;
        }

        if count == 0 {
            let total: f32 = FINGER_TIPS
                .iter()
                .map(|&tip| distance(palm, hand.point(tip)))
                .sum();
            if total / (FINGER_TIPS.len() as f32) < self.config.fist_max {
                return Gesture::Closed;
            }
        }

        Gesture::Unknown
    }
}

fn non_thumb_fingers_closed(hand: &Hand) -> bool {
    hand.point(INDEX_TIP).y > hand.point(INDEX_PIP).y
        && hand.point(MIDDLE_TIP).y > hand.point(MIDDLE_PIP).y
        && hand.point(RING_TIP).y > hand.point(RING_PIP).y
        && hand.point(PINKY_TIP).y > hand.point(PINKY_PIP).y
}
