use tracing::{debug, info};

use super::conflict::{resolve_conflict, Rejection, Resolution};
use super::types::{Assignment, SchoolClass, Slot, Teacher, Timetable};

/// Places `teacher` into `slot` for `class` by hand.
///
/// The same availability and priority rules as generation apply, so an
/// earlier-registered teacher can displace whoever holds the slot, even a
/// placement made by hand. On success the returned timetable differs from
/// `timetable` in that one slot only; on rejection `timetable` is left as is.
pub fn assign(
    timetable: &Timetable,
    slot: Slot,
    teacher: &Teacher,
    class: SchoolClass,
) -> Result<Timetable, Rejection> {
    let resolution = resolve_conflict(timetable.get(slot), teacher, slot).map_err(|rejection| {
        info!(%slot, teacher = %teacher.id, %rejection, "manual placement rejected");
        rejection
    })?;

    if let Resolution::Overwrites { previous } = resolution {
        info!(
            %slot,
            teacher = %teacher.id,
            displaced = %previous.teacher_id,
            "manual placement displaces a later-registered teacher"
        );
    }

    let mut updated = timetable.clone();
    updated.place(
        slot,
        Assignment {
            teacher_id: teacher.id,
            subject: teacher.subject,
            class_name: class,
        },
    );
    debug!(%slot, teacher = %teacher.id, %class, "slot assigned");
    Ok(updated)
}
