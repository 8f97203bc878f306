use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TimetableError;

/// Lessons per school day.
pub const HOURS_PER_DAY: u8 = 8;

/// Highest class number taught at the school.
pub const MAX_CLASS: u8 = 11;

/// School weekday, declared in canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Day {
    #[serde(rename = "Понедельник")]
    Monday,
    #[serde(rename = "Вторник")]
    Tuesday,
    #[serde(rename = "Среда")]
    Wednesday,
    #[serde(rename = "Четверг")]
    Thursday,
    #[serde(rename = "Пятница")]
    Friday,
}

impl Day {
    pub const ALL: [Day; 5] = [
        Day::Monday,
        Day::Tuesday,
        Day::Wednesday,
        Day::Thursday,
        Day::Friday,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Day::Monday => "Понедельник",
            Day::Tuesday => "Вторник",
            Day::Wednesday => "Среда",
            Day::Thursday => "Четверг",
            Day::Friday => "Пятница",
        }
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Day {
    type Err = TimetableError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Day::ALL
            .into_iter()
            .find(|d| d.name() == trimmed)
            .ok_or_else(|| TimetableError::InvalidSlot(format!("unknown day '{}'", trimmed)))
    }
}

/// One lesson period of the week: `(day, hour)` with hour in `1..=8`.
///
/// Slots are shared by every class, so a teacher can hold at most one
/// of them at a time. The derived ordering is the canonical day-major
/// walk used by generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Slot {
    day: Day,
    hour: u8,
}

impl Slot {
    pub(crate) const fn new_unchecked(day: Day, hour: u8) -> Self {
        Self { day, hour }
    }

    pub fn day(&self) -> Day {
        self.day
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }
}

impl From<Slot> for String {
    fn from(slot: Slot) -> Self {
        slot.to_string()
    }
}

impl TryFrom<String> for Slot {
    type Error = TimetableError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Class identifier, displayed as "N класс".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SchoolClass(u8);

impl SchoolClass {
    pub fn new(number: u8) -> Result<Self, TimetableError> {
        if (1..=MAX_CLASS).contains(&number) {
            Ok(Self(number))
        } else {
            Err(TimetableError::InvalidClass(format!(
                "class number {} is outside 1..={}",
                number, MAX_CLASS
            )))
        }
    }

    pub fn number(&self) -> u8 {
        self.0
    }

    /// Every class in generation order, 1 through 11.
    pub fn all() -> impl Iterator<Item = SchoolClass> {
        (1..=MAX_CLASS).map(SchoolClass)
    }
}

impl fmt::Display for SchoolClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} класс", self.0)
    }
}

impl FromStr for SchoolClass {
    type Err = TimetableError;

    /// Accepts both "5 класс" and a bare "5".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed.strip_suffix("класс").unwrap_or(trimmed).trim();
        let number: u8 = digits
            .parse()
            .map_err(|_| TimetableError::InvalidClass(trimmed.to_string()))?;
        SchoolClass::new(number)
    }
}

impl From<SchoolClass> for String {
    fn from(class: SchoolClass) -> Self {
        class.to_string()
    }
}

impl TryFrom<String> for SchoolClass {
    type Error = TimetableError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Subjects taught at the school, declared in generation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Subject {
    #[serde(rename = "Русский язык")]
    Russian,
    #[serde(rename = "Математика")]
    Mathematics,
    #[serde(rename = "Литература")]
    Literature,
    #[serde(rename = "Иностранный язык (Английский)")]
    English,
    #[serde(rename = "История")]
    History,
    #[serde(rename = "Физкультура")]
    PhysicalEducation,
    #[serde(rename = "Технология")]
    Technology,
    #[serde(rename = "Музыка")]
    Music,
}

impl Subject {
    pub const ALL: [Subject; 8] = [
        Subject::Russian,
        Subject::Mathematics,
        Subject::Literature,
        Subject::English,
        Subject::History,
        Subject::PhysicalEducation,
        Subject::Technology,
        Subject::Music,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Subject::Russian => "Русский язык",
            Subject::Mathematics => "Математика",
            Subject::Literature => "Литература",
            Subject::English => "Иностранный язык (Английский)",
            Subject::History => "История",
            Subject::PhysicalEducation => "Физкультура",
            Subject::Technology => "Технология",
            Subject::Music => "Музыка",
        }
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Subject {
    type Err = TimetableError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Subject::ALL
            .into_iter()
            .find(|subject| subject.name() == trimmed)
            .ok_or_else(|| TimetableError::UnknownSubject(trimmed.to_string()))
    }
}

/// Registration-order key. Lower ids were registered earlier and win
/// contention for a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeacherId(pub u64);

impl fmt::Display for TeacherId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Set of week slots backed by a 40-bit mask, so membership is a
/// single bit test.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Vec<Slot>", into = "Vec<Slot>")]
pub struct SlotSet(u64);

impl SlotSet {
    pub fn new() -> Self {
        Self(0)
    }

    pub fn insert(&mut self, slot: Slot) -> bool {
        let bit = 1u64 << slot.index();
        let fresh = self.0 & bit == 0;
        self.0 |= bit;
        fresh
    }

    pub fn remove(&mut self, slot: Slot) -> bool {
        let bit = 1u64 << slot.index();
        let present = self.0 & bit != 0;
        self.0 &= !bit;
        present
    }

    #[inline]
    pub fn contains(&self, slot: Slot) -> bool {
        self.0 & (1u64 << slot.index()) != 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Members in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = Slot> + '_ {
        super::slot_utils::all_slots().filter(move |slot| self.contains(*slot))
    }
}

impl FromIterator<Slot> for SlotSet {
    fn from_iter<I: IntoIterator<Item = Slot>>(iter: I) -> Self {
        let mut set = SlotSet::new();
        for slot in iter {
            set.insert(slot);
        }
        set
    }
}

impl From<Vec<Slot>> for SlotSet {
    fn from(slots: Vec<Slot>) -> Self {
        slots.into_iter().collect()
    }
}

impl From<SlotSet> for Vec<Slot> {
    fn from(set: SlotSet) -> Self {
        set.iter().collect()
    }
}

/// A registered teacher. Field names follow the stored record layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Teacher {
    pub id: TeacherId,
    pub name: String,
    pub subject: Subject,
    pub classes: BTreeSet<SchoolClass>,
    pub available_slots: SlotSet,
}

impl Teacher {
    pub fn teaches(&self, class: SchoolClass, subject: Subject) -> bool {
        self.subject == subject && self.classes.contains(&class)
    }
}

/// A resolved lesson occupying one slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub teacher_id: TeacherId,
    pub subject: Subject,
    pub class_name: SchoolClass,
}

/// Sparse weekly timetable: slot -> assignment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timetable {
    slots: BTreeMap<Slot, Assignment>,
}

impl Timetable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, slot: Slot) -> Option<&Assignment> {
        self.slots.get(&slot)
    }

    pub fn is_occupied(&self, slot: Slot) -> bool {
        self.slots.contains_key(&slot)
    }

    /// Assignments in canonical slot order.
    pub fn iter(&self) -> impl Iterator<Item = (Slot, &Assignment)> {
        self.slots.iter().map(|(slot, a)| (*slot, a))
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn for_class(&self, class: SchoolClass) -> impl Iterator<Item = (Slot, &Assignment)> {
        self.iter().filter(move |(_, a)| a.class_name == class)
    }

    /// Replaces whatever sits in `slot`. Callers go through the
    /// availability and priority checks first.
    pub(crate) fn place(&mut self, slot: Slot, assignment: Assignment) -> Option<Assignment> {
        self.slots.insert(slot, assignment)
    }
}

/// Why a (class, subject) pair ended up without lessons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GapReason {
    /// No registered teacher teaches this subject in this class.
    NoCandidates,
    /// Eligible teachers exist but every slot they offer was already taken.
    NoFreeSlots,
}

/// A (class, subject) pair that generation could not cover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gap {
    pub class_name: SchoolClass,
    pub subject: Subject,
    pub reason: GapReason,
}

/// Output of a full generation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Generation {
    pub timetable: Timetable,
    pub gaps: Vec<Gap>,
}

impl Generation {
    pub fn has_gap(&self, class: SchoolClass, subject: Subject) -> bool {
        self.gaps
            .iter()
            .any(|g| g.class_name == class && g.subject == subject)
    }
}
