use std::fmt;
use std::str::FromStr;

use crate::error::TimetableError;
use super::types::{Day, Slot, HOURS_PER_DAY};

/// Number of bookable slots in a week.
pub const SLOTS_PER_WEEK: usize = Day::ALL.len() * HOURS_PER_DAY as usize;

impl Slot {
    /// Builds a slot, rejecting hours outside `1..=8`.
    pub fn new(day: Day, hour: u8) -> Result<Self, TimetableError> {
        if !(1..=HOURS_PER_DAY).contains(&hour) {
            return Err(TimetableError::InvalidSlot(format!(
                "hour {} is outside 1..={}",
                hour, HOURS_PER_DAY
            )));
        }
        Ok(Slot::new_unchecked(day, hour))
    }

    /// Inverse of [`Slot::new`].
    pub fn decompose(&self) -> (Day, u8) {
        (self.day(), self.hour())
    }

    /// Position in the canonical walk, `0..40`.
    #[inline]
    pub fn index(&self) -> usize {
        self.day() as usize * HOURS_PER_DAY as usize + (self.hour() as usize - 1)
    }

    pub fn from_index(index: usize) -> Option<Self> {
        if index >= SLOTS_PER_WEEK {
            return None;
        }
        let day = Day::ALL[index / HOURS_PER_DAY as usize];
        let hour = (index % HOURS_PER_DAY as usize) as u8 + 1;
        Some(Slot::new_unchecked(day, hour))
    }
}

/// Key form used by stored records: "Понедельник-1".
impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.day(), self.hour())
    }
}

impl FromStr for Slot {
    type Err = TimetableError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (day, hour) = trimmed
            .rsplit_once('-')
            .ok_or_else(|| TimetableError::InvalidSlot(format!("malformed slot key '{}'", trimmed)))?;
        let day: Day = day.parse()?;
        let hour: u8 = hour
            .trim()
            .parse()
            .map_err(|_| TimetableError::InvalidSlot(format!("malformed hour in '{}'", trimmed)))?;
        Slot::new(day, hour)
    }
}

/// Every slot of the week in canonical (day, hour) order.
pub fn all_slots() -> impl Iterator<Item = Slot> {
    (0..SLOTS_PER_WEEK).filter_map(Slot::from_index)
}

/// Parses a comma-separated list of slot keys, e.g. from a form field.
pub fn parse_slot_list(input: &str) -> Result<Vec<Slot>, TimetableError> {
    input
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::parse)
        .collect()
}
