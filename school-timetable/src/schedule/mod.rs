pub mod types;
pub mod slot_utils;
pub mod availability;
pub mod conflict;
pub mod generator;
pub mod manual;

pub use types::{
    Assignment, Day, Gap, GapReason, Generation, SchoolClass, Slot, SlotSet, Subject, Teacher,
    TeacherId, Timetable,
};
pub use slot_utils::{all_slots, parse_slot_list};
pub use availability::{candidates_for_slot, is_available};
pub use conflict::{resolve_conflict, Rejection, Resolution};
pub use generator::{generate, generate_week, recheck_pair};
pub use manual::assign;
