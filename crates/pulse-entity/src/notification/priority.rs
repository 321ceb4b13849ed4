//! Notification priority levels and the consumption-side rules they drive.

use crate::text::text_enum;

text_enum! {
    /// Priority of a notification. Immutable after creation.
    pub enum Priority {
        /// Background events.
        Low => "low",
        /// Standard events.
        Medium => "medium",
        /// Important events.
        High => "high",
        /// Requires immediate attention.
        Urgent => "urgent",
    }
}

impl Priority {
    /// How long a surfaced toast stays up before auto-dismissing, in ms.
    pub const fn auto_dismiss_ms(&self) -> u64 {
        match self {
            Self::Urgent => 15_000,
            Self::High => 10_000,
            Self::Medium => 6_000,
            Self::Low => 4_000,
        }
    }

    /// Whether the toast carries a visible severity badge.
    pub const fn has_severity_badge(&self) -> bool {
        matches!(self, Self::High | Self::Urgent)
    }

    /// Whether surfacing the toast plays an audible cue.
    pub const fn plays_sound(&self) -> bool {
        matches!(self, Self::High | Self::Urgent)
    }
}

impl Default for Priority {
    fn default() -> Self {
        Self::Medium
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auto_dismiss_durations_per_priority() {
        assert_eq!(Priority::Urgent.auto_dismiss_ms(), 15_000);
        assert_eq!(Priority::High.auto_dismiss_ms(), 10_000);
        assert_eq!(Priority::Medium.auto_dismiss_ms(), 6_000);
        assert_eq!(Priority::Low.auto_dismiss_ms(), 4_000);
    }

    #[test]
    fn auto_dismiss_non_increasing_with_severity() {
        let ordered = [
            Priority::Low,
            Priority::Medium,
            Priority::High,
            Priority::Urgent,
        ];
        for pair in ordered.windows(2) {
            assert!(pair[0].auto_dismiss_ms() <= pair[1].auto_dismiss_ms());
        }
    }

    #[test]
    fn only_high_and_urgent_are_loud() {
        assert!(Priority::Urgent.plays_sound());
        assert!(Priority::High.has_severity_badge());
        assert!(!Priority::Medium.plays_sound());
        assert!(!Priority::Low.has_severity_badge());
    }
}
