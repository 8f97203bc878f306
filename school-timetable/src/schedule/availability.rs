use super::types::{SchoolClass, Slot, Subject, Teacher};

/// True iff the teacher listed `slot` as available.
#[inline]
pub fn is_available(teacher: &Teacher, slot: Slot) -> bool {
    teacher.available_slots.contains(slot)
}

/// Teachers that could be placed into `slot` by hand, earliest
/// registration first. `class` and `subject` narrow the list when set.
pub fn candidates_for_slot<'a>(
    teachers: &'a [Teacher],
    slot: Slot,
    class: Option<SchoolClass>,
    subject: Option<Subject>,
) -> Vec<&'a Teacher> {
    let mut candidates: Vec<&Teacher> = teachers
        .iter()
        .filter(|t| class.map_or(true, |c| t.classes.contains(&c)))
        .filter(|t| subject.map_or(true, |s| t.subject == s))
        .filter(|t| is_available(t, slot))
        .collect();
    candidates.sort_by_key(|t| t.id);
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::slot_utils::all_slots;
    use crate::schedule::types::{Day, SlotSet, TeacherId};

    fn teacher(id: u64, subject: Subject, classes: &[u8], slots: &[&str]) -> Teacher {
        Teacher {
            id: TeacherId(id),
            name: format!("Teacher {}", id),
            subject,
            classes: classes.iter().map(|&c| SchoolClass::new(c).unwrap()).collect(),
            available_slots: slots.iter().map(|s| s.parse::<Slot>().unwrap()).collect::<SlotSet>(),
        }
    }

    #[test]
    fn test_available_iff_member() {
        let t = teacher(1, Subject::Mathematics, &[1], &["Понедельник-1", "Пятница-8"]);
        for slot in all_slots() {
            let expected = slot.to_string() == "Понедельник-1" || slot.to_string() == "Пятница-8";
            assert_eq!(is_available(&t, slot), expected, "slot {}", slot);
        }
    }

    #[test]
    fn test_empty_availability_matches_nothing() {
        let t = teacher(3, Subject::History, &[2], &[]);
        assert!(all_slots().all(|slot| !is_available(&t, slot)));
    }

    #[test]
    fn test_candidates_are_filtered_and_sorted() {
        let slot = Slot::new(Day::Tuesday, 2).unwrap();
        let teachers = vec![
            teacher(7, Subject::Mathematics, &[1, 2], &["Вторник-2"]),
            teacher(2, Subject::Mathematics, &[1], &["Вторник-2"]),
            teacher(4, Subject::Music, &[1], &["Вторник-2"]),
            teacher(1, Subject::Mathematics, &[1], &["Вторник-3"]),
        ];

        let all: Vec<u64> = candidates_for_slot(&teachers, slot, None, None)
            .iter()
            .map(|t| t.id.0)
            .collect();
        assert_eq!(all, vec![2, 4, 7]);

        let math_class_two: Vec<u64> = candidates_for_slot(
            &teachers,
            slot,
            Some(SchoolClass::new(2).unwrap()),
            Some(Subject::Mathematics),
        )
        .iter()
        .map(|t| t.id.0)
        .collect();
        assert_eq!(math_class_two, vec![7]);
    }
}
