use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the ten bookable time slots offered by the resort.
///
/// Slots are presented to guests in 12-hour form ("09:00 AM") and sent to
/// the backend in 24-hour `HH:MM` wire form ("09:00"). Both conversions are
/// total: every slot has exactly one form on each side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum TimeSlot {
    NineAm,
    TenAm,
    ElevenAm,
    Noon,
    OnePm,
    TwoPm,
    ThreePm,
    FourPm,
    FivePm,
    SixPm,
}

impl TimeSlot {
    /// All slots in display order, for select inputs.
    pub const ALL: [TimeSlot; 10] = [
        TimeSlot::NineAm,
        TimeSlot::TenAm,
        TimeSlot::ElevenAm,
        TimeSlot::Noon,
        TimeSlot::OnePm,
        TimeSlot::TwoPm,
        TimeSlot::ThreePm,
        TimeSlot::FourPm,
        TimeSlot::FivePm,
        TimeSlot::SixPm,
    ];

    /// Human-readable 12-hour form shown in pickers and the cart.
    pub fn display(&self) -> &'static str {
        match self {
            TimeSlot::NineAm => "09:00 AM",
            TimeSlot::TenAm => "10:00 AM",
            TimeSlot::ElevenAm => "11:00 AM",
            TimeSlot::Noon => "12:00 PM",
            TimeSlot::OnePm => "01:00 PM",
            TimeSlot::TwoPm => "02:00 PM",
            TimeSlot::ThreePm => "03:00 PM",
            TimeSlot::FourPm => "04:00 PM",
            TimeSlot::FivePm => "05:00 PM",
            TimeSlot::SixPm => "06:00 PM",
        }
    }

    /// 24-hour `HH:MM` form used on the backend wire.
    pub fn wire(&self) -> &'static str {
        match self {
            TimeSlot::NineAm => "09:00",
            TimeSlot::TenAm => "10:00",
            TimeSlot::ElevenAm => "11:00",
            TimeSlot::Noon => "12:00",
            TimeSlot::OnePm => "13:00",
            TimeSlot::TwoPm => "14:00",
            TimeSlot::ThreePm => "15:00",
            TimeSlot::FourPm => "16:00",
            TimeSlot::FivePm => "17:00",
            TimeSlot::SixPm => "18:00",
        }
    }

    pub fn from_display(s: &str) -> Option<TimeSlot> {
        TimeSlot::ALL.iter().copied().find(|slot| slot.display() == s)
    }

    pub fn from_wire(s: &str) -> Option<TimeSlot> {
        TimeSlot::ALL.iter().copied().find(|slot| slot.wire() == s)
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display())
    }
}

impl From<TimeSlot> for String {
    fn from(slot: TimeSlot) -> String {
        slot.wire().to_string()
    }
}

impl TryFrom<String> for TimeSlot {
    type Error = String;

    // Accepts either form so payloads written by older clients still parse.
    fn try_from(value: String) -> Result<TimeSlot, String> {
        TimeSlot::from_wire(&value)
            .or_else(|| TimeSlot::from_display(&value))
            .ok_or_else(|| format!("unknown time slot: {}", value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_and_wire_round_trip_every_slot() {
        for slot in TimeSlot::ALL {
            assert_eq!(TimeSlot::from_display(slot.display()), Some(slot));
            assert_eq!(TimeSlot::from_wire(slot.wire()), Some(slot));
        }
    }

    #[test]
    fn test_noon_and_afternoon_conversion() {
        // 12 PM stays 12, afternoon slots shift by twelve hours
        assert_eq!(TimeSlot::Noon.wire(), "12:00");
        assert_eq!(TimeSlot::OnePm.wire(), "13:00");
        assert_eq!(TimeSlot::SixPm.wire(), "18:00");
        assert_eq!(TimeSlot::NineAm.wire(), "09:00");
    }

    #[test]
    fn test_slots_are_ordered() {
        let mut sorted = TimeSlot::ALL;
        sorted.sort();
        assert_eq!(sorted, TimeSlot::ALL);
        assert!(TimeSlot::NineAm < TimeSlot::SixPm);
    }

    #[test]
    fn test_serde_uses_wire_form() {
        let json = serde_json::to_string(&TimeSlot::TwoPm).unwrap();
        assert_eq!(json, "\"14:00\"");

        let parsed: TimeSlot = serde_json::from_str("\"14:00\"").unwrap();
        assert_eq!(parsed, TimeSlot::TwoPm);

        // Display form is accepted on the way in
        let parsed: TimeSlot = serde_json::from_str("\"02:00 PM\"").unwrap();
        assert_eq!(parsed, TimeSlot::TwoPm);
    }

    #[test]
    fn test_unknown_slot_rejected() {
        assert!(serde_json::from_str::<TimeSlot>("\"14:30\"").is_err());
        assert_eq!(TimeSlot::from_display("midnight"), None);
    }
}
