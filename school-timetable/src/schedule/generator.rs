use tracing::{debug, info, warn};

use super::conflict::{resolve_conflict, Resolution};
use super::slot_utils::all_slots;
use super::types::{
    Assignment, Gap, GapReason, Generation, SchoolClass, Slot, Subject, Teacher, Timetable,
};

/// Builds a whole week for every class and subject the school knows about.
pub fn generate_week(teachers: &[Teacher]) -> Generation {
    let classes: Vec<SchoolClass> = SchoolClass::all().collect();
    let slots: Vec<Slot> = all_slots().collect();
    generate(teachers, &classes, &Subject::ALL, &slots)
}

/// Greedy timetable generation.
///
/// Classes are walked in the given order, subjects within each class in
/// the given order. For every (class, subject) pair the eligible teachers
/// are ranked by registration id, and each still-free slot goes to the
/// first of them available at that time. A slot filled by an earlier pair
/// is never reconsidered, so iteration order decides which class gets a
/// shared slot and teacher priority only decides within one pair.
///
/// Pairs that end up with no lessons are returned as gaps; generation
/// itself never fails.
pub fn generate(
    teachers: &[Teacher],
    classes: &[SchoolClass],
    subjects: &[Subject],
    slots: &[Slot],
) -> Generation {
    let mut ranked: Vec<&Teacher> = teachers.iter().collect();
    ranked.sort_by_key(|t| t.id);

    let mut timetable = Timetable::new();
    let mut gaps = Vec::new();

    for &class in classes {
        for &subject in subjects {
            let candidates: Vec<&Teacher> = ranked
                .iter()
                .copied()
                .filter(|t| t.teaches(class, subject))
                .collect();

            if candidates.is_empty() {
                gaps.push(Gap {
                    class_name: class,
                    subject,
                    reason: GapReason::NoCandidates,
                });
                continue;
            }

            let mut placed = 0usize;
            for &slot in slots {
                if timetable.is_occupied(slot) {
                    continue;
                }

                let winner = candidates
                    .iter()
                    .find(|t| matches!(resolve_conflict(None, t, slot), Ok(Resolution::Vacant)));

                if let Some(teacher) = winner {
                    timetable.place(
                        slot,
                        Assignment {
                            teacher_id: teacher.id,
                            subject,
                            class_name: class,
                        },
                    );
                    placed += 1;
                }
            }

            debug!(%class, %subject, candidates = candidates.len(), placed, "pair scheduled");

            if placed == 0 {
                gaps.push(Gap {
                    class_name: class,
                    subject,
                    reason: GapReason::NoFreeSlots,
                });
            }
        }
    }

    for gap in &gaps {
        warn!(class = %gap.class_name, subject = %gap.subject, reason = ?gap.reason, "uncovered class/subject pair");
    }
    info!(
        teachers = teachers.len(),
        assigned = timetable.len(),
        gaps = gaps.len(),
        "timetable generated"
    );

    Generation { timetable, gaps }
}

/// Brings the gap entry of one (class, subject) pair in line with
/// `timetable` after a placement added or removed lessons of that pair.
/// Gaps stay in class-then-subject order.
pub fn recheck_pair(
    gaps: &mut Vec<Gap>,
    timetable: &Timetable,
    teachers: &[Teacher],
    class: SchoolClass,
    subject: Subject,
) {
    gaps.retain(|g| !(g.class_name == class && g.subject == subject));

    let covered = timetable
        .for_class(class)
        .any(|(_, a)| a.subject == subject);
    if covered {
        return;
    }

    let reason = if teachers.iter().any(|t| t.teaches(class, subject)) {
        GapReason::NoFreeSlots
    } else {
        GapReason::NoCandidates
    };
    debug!(%class, %subject, ?reason, "pair lost its last lesson");
    gaps.push(Gap {
        class_name: class,
        subject,
        reason,
    });
    gaps.sort_by_key(|g| (g.class_name, g.subject));
}
