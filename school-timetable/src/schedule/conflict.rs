use serde::Serialize;
use thiserror::Error;

use super::availability::is_available;
use super::types::{Assignment, Slot, Teacher, TeacherId};

/// Accepted outcome of a slot contention check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Nobody holds the slot yet.
    Vacant,
    /// The candidate was registered earlier and displaces `previous`.
    Overwrites { previous: Assignment },
}

/// Reasons a candidate may not take a slot. These are expected
/// outcomes, not faults.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "camelCase")]
pub enum Rejection {
    #[error("teacher {teacher} is not available in {slot}")]
    Unavailable { teacher: TeacherId, slot: Slot },

    #[error("{}", lower_priority_message(.holder, .candidate, .slot))]
    LowerPriority {
        holder: TeacherId,
        candidate: TeacherId,
        slot: Slot,
    },
}

fn lower_priority_message(holder: &TeacherId, candidate: &TeacherId, slot: &Slot) -> String {
    if holder == candidate {
        format!("{} is already held by teacher {}", slot, holder)
    } else {
        format!("{} is held by teacher {} who has priority over teacher {}", slot, holder, candidate)
    }
}

/// Decides whether `candidate` may occupy `slot` given what already sits
/// there. The earlier-registered teacher (lower id) always wins; a tie
/// keeps the current holder.
pub fn resolve_conflict(
    existing: Option<&Assignment>,
    candidate: &Teacher,
    slot: Slot,
) -> Result<Resolution, Rejection> {
    if !is_available(candidate, slot) {
        return Err(Rejection::Unavailable {
            teacher: candidate.id,
            slot,
        });
    }

    match existing {
        None => Ok(Resolution::Vacant),
        Some(current) if candidate.id < current.teacher_id => Ok(Resolution::Overwrites {
            previous: *current,
        }),
        Some(current) => Err(Rejection::LowerPriority {
            holder: current.teacher_id,
            candidate: candidate.id,
            slot,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::types::{Day, SchoolClass, SlotSet, Subject};

    fn math_teacher(id: u64, slots: &[Slot]) -> Teacher {
        Teacher {
            id: TeacherId(id),
            name: format!("T{}", id),
            subject: Subject::Mathematics,
            classes: [SchoolClass::new(1).unwrap()].into_iter().collect(),
            available_slots: slots.iter().copied().collect::<SlotSet>(),
        }
    }

    fn held_by(id: u64) -> Assignment {
        Assignment {
            teacher_id: TeacherId(id),
            subject: Subject::Mathematics,
            class_name: SchoolClass::new(1).unwrap(),
        }
    }

    #[test]
    fn test_unavailable_checked_before_occupancy() {
        let slot = Slot::new(Day::Monday, 1).unwrap();
        let candidate = math_teacher(1, &[]);

        assert_eq!(
            resolve_conflict(None, &candidate, slot),
            Err(Rejection::Unavailable { teacher: TeacherId(1), slot })
        );
        assert_eq!(
            resolve_conflict(Some(&held_by(5)), &candidate, slot),
            Err(Rejection::Unavailable { teacher: TeacherId(1), slot })
        );
    }

    #[test]
    fn test_vacant_slot_accepts() {
        let slot = Slot::new(Day::Monday, 1).unwrap();
        let candidate = math_teacher(9, &[slot]);
        assert_eq!(resolve_conflict(None, &candidate, slot), Ok(Resolution::Vacant));
    }

    #[test]
    fn test_lower_id_overwrites_and_higher_id_is_rejected() {
        let slot = Slot::new(Day::Thursday, 4).unwrap();
        let early = math_teacher(1, &[slot]);
        let late = math_teacher(2, &[slot]);

        assert_eq!(
            resolve_conflict(Some(&held_by(2)), &early, slot),
            Ok(Resolution::Overwrites { previous: held_by(2) })
        );
        assert_eq!(
            resolve_conflict(Some(&held_by(1)), &late, slot),
            Err(Rejection::LowerPriority {
                holder: TeacherId(1),
                candidate: TeacherId(2),
                slot,
            })
        );
    }

    #[test]
    fn test_equal_id_keeps_holder() {
        let slot = Slot::new(Day::Friday, 8).unwrap();
        let same = math_teacher(3, &[slot]);
        let rejection = resolve_conflict(Some(&held_by(3)), &same, slot).unwrap_err();
        assert!(matches!(rejection, Rejection::LowerPriority { .. }));
        assert_eq!(rejection.to_string(), "Пятница-8 is already held by teacher 3");
    }

    #[test]
    fn test_priority_message_names_both_teachers() {
        let slot = Slot::new(Day::Monday, 2).unwrap();
        let late = math_teacher(4, &[slot]);
        let rejection = resolve_conflict(Some(&held_by(2)), &late, slot).unwrap_err();
        assert_eq!(
            rejection.to_string(),
            "Понедельник-2 is held by teacher 2 who has priority over teacher 4"
        );
    }
}
