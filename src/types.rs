use serde::Deserialize;

/// A resolved card gesture.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Vote {
    Positive,
    Negative,
    Pass,
}

impl Vote {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Negative => "negative",
            Self::Pass => "pass",
        }
    }
}

/// A committed vote plus whatever the caller attached to the card.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Decision<P> {
    pub outcome: Vote,
    pub payload: P,
}
