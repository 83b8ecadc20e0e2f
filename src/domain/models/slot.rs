use std::fmt;
use std::str::FromStr;
use serde::{Deserialize, Serialize};

pub const FIRST_SLOT_HOUR: u8 = 8;
pub const LAST_SLOT_HOUR: u8 = 19;

/// One-hour reservation window starting on the hour, 08:00 through 19:00.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Slot {
    hour: u8,
}

impl Slot {
    pub fn from_hour(hour: u8) -> Option<Self> {
        (FIRST_SLOT_HOUR..=LAST_SLOT_HOUR).contains(&hour).then_some(Self { hour })
    }

    pub fn all() -> impl Iterator<Item = Slot> {
        (FIRST_SLOT_HOUR..=LAST_SLOT_HOUR).map(|hour| Slot { hour })
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    pub fn start_time(&self) -> String {
        format!("{:02}:00", self.hour)
    }

    pub fn end_time(&self) -> String {
        format!("{:02}:00", self.hour + 1)
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:00", self.hour)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidSlot(pub String);

impl fmt::Display for InvalidSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' is not a bookable start time (08:00 to 19:00, on the hour)", self.0)
    }
}

impl std::error::Error for InvalidSlot {}

impl FromStr for Slot {
    type Err = InvalidSlot;

    // Accepts "HH:MM" and the unpadded "H:MM"; minutes must be 00.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || InvalidSlot(s.to_string());
        let (hour, minute) = s.trim().split_once(':').ok_or_else(invalid)?;
        if hour.is_empty() || hour.len() > 2 || minute != "00" {
            return Err(invalid());
        }
        let hour: u8 = hour.parse().map_err(|_| invalid())?;
        Slot::from_hour(hour).ok_or_else(invalid)
    }
}

impl TryFrom<String> for Slot {
    type Error = InvalidSlot;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Slot> for String {
    fn from(slot: Slot) -> Self {
        slot.start_time()
    }
}
