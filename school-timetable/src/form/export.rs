use std::path::Path;

use csv::WriterBuilder;
use tracing::info;

use crate::error::Result;
use crate::schedule::{Teacher, Timetable};

/// Writes one CSV row per occupied slot, in canonical slot order.
///
/// Columns: slot, day, hour, class, subject, teacher_id, teacher_name.
/// Assignments whose teacher is no longer registered keep an empty name.
pub fn export_timetable_to_csv(
    timetable: &Timetable,
    teachers: &[Teacher],
    csv_path: &Path,
) -> Result<()> {
    let mut wtr = WriterBuilder::new().has_headers(false).from_path(csv_path)?;

    wtr.write_record(["slot", "day", "hour", "class", "subject", "teacher_id", "teacher_name"])?;

    for (slot, assignment) in timetable.iter() {
        let teacher_name = teachers
            .iter()
            .find(|t| t.id == assignment.teacher_id)
            .map(|t| t.name.as_str())
            .unwrap_or("");

        wtr.write_record([
            slot.to_string(),
            slot.day().to_string(),
            slot.hour().to_string(),
            assignment.class_name.to_string(),
            assignment.subject.to_string(),
            assignment.teacher_id.to_string(),
            teacher_name.to_string(),
        ])?;
    }

    wtr.flush()?;
    info!(path = %csv_path.display(), rows = timetable.len(), "exported timetable");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::{assign, Day, SchoolClass, Slot, SlotSet, Subject, TeacherId};

    #[test]
    fn test_export_writes_header_and_rows() {
        let slot = Slot::new(Day::Wednesday, 5).unwrap();
        let teacher = Teacher {
            id: TeacherId(1),
            name: "Ирина".to_string(),
            subject: Subject::Technology,
            classes: [SchoolClass::new(6).unwrap()].into_iter().collect(),
            available_slots: [slot].into_iter().collect::<SlotSet>(),
        };
        let timetable = assign(&Timetable::new(), slot, &teacher, SchoolClass::new(6).unwrap()).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("timetable.csv");
        export_timetable_to_csv(&timetable, &[teacher], &path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "slot,day,hour,class,subject,teacher_id,teacher_name");
        assert_eq!(lines[1], "Среда-5,Среда,5,6 класс,Технология,1,Ирина");
    }
}
