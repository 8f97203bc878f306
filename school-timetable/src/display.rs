use std::collections::BTreeMap;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::error::Result;
use crate::schedule::{Day, Gap, GapReason, Generation, SchoolClass, Slot, Subject, Teacher, TeacherId, Timetable};

/// Narrows which cells of the grid are shown. Hidden cells render as `-`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GridFilter {
    pub class: Option<SchoolClass>,
    pub subject: Option<Subject>,
}

/// Formats a teacher name, falling back to the id for unknown teachers.
pub fn format_teacher_name(teachers: &[Teacher], id: TeacherId) -> String {
    teachers
        .iter()
        .find(|t| t.id == id)
        .map(|t| t.name.clone())
        .unwrap_or_else(|| format!("#{}", id))
}

/// Renders the week as a grid: one line per hour, one column per day.
/// Each occupied, visible cell reads `name / subject / class`.
pub fn render_grid(timetable: &Timetable, teachers: &[Teacher], filter: GridFilter) -> String {
    let mut out = String::new();
    let header: Vec<&str> = Day::ALL.iter().map(|d| d.name()).collect();
    out.push_str(&format!("Урок | {}\n", header.join(" | ")));

    for hour in 1..=crate::schedule::types::HOURS_PER_DAY {
        let cells: Vec<String> = Day::ALL
            .iter()
            .map(|&day| {
                let slot = match Slot::new(day, hour) {
                    Ok(slot) => slot,
                    Err(_) => return "-".to_string(),
                };
                match timetable.get(slot) {
                    Some(a)
                        if filter.class.map_or(true, |c| c == a.class_name)
                            && filter.subject.map_or(true, |s| s == a.subject) =>
                    {
                        format!(
                            "{} / {} / {}",
                            format_teacher_name(teachers, a.teacher_id),
                            a.subject,
                            a.class_name
                        )
                    }
                    _ => "-".to_string(),
                }
            })
            .collect();
        out.push_str(&format!("{} урок | {}\n", hour, cells.join(" | ")));
    }
    out
}

pub fn format_gap(gap: &Gap) -> String {
    let why = match gap.reason {
        GapReason::NoCandidates => "нет учителя",
        GapReason::NoFreeSlots => "нет свободных слотов",
    };
    format!("{} / {}: {}", gap.class_name, gap.subject, why)
}

/// Lessons per class and per teacher.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Coverage {
    pub per_class: BTreeMap<SchoolClass, usize>,
    pub per_teacher: BTreeMap<TeacherId, usize>,
}

pub fn coverage(timetable: &Timetable) -> Coverage {
    let mut summary = Coverage::default();
    for (_, a) in timetable.iter() {
        *summary.per_class.entry(a.class_name).or_insert(0) += 1;
        *summary.per_teacher.entry(a.teacher_id).or_insert(0) += 1;
    }
    summary
}

/// Writes the grid to a file, headed by a title line.
pub fn write_timetable_to_file(
    title: &str,
    timetable: &Timetable,
    teachers: &[Teacher],
    filter: GridFilter,
    path: &Path,
) -> Result<()> {
    let mut file = File::create(path)?;
    writeln!(file, "** {} **", title)?;
    write!(file, "{}", render_grid(timetable, teachers, filter))?;
    Ok(())
}

/// Prints a generation result in a readable format.
pub fn print_generation(generation: &Generation, teachers: &[Teacher], filter: GridFilter) {
    println!("\n=== Расписание ===");
    println!("Всего уроков: {}", generation.timetable.len());

    if !generation.gaps.is_empty() {
        println!("⚠️  Непокрытые пары ({}):", generation.gaps.len());
        for gap in &generation.gaps {
            println!("  - {}", format_gap(gap));
        }
    }

    println!();
    print!("{}", render_grid(&generation.timetable, teachers, filter));

    let summary = coverage(&generation.timetable);
    println!("\nУроков по классам:");
    for (class, count) in &summary.per_class {
        println!("  {}: {}", class, count);
    }
    println!("Уроков по учителям:");
    for (id, count) in &summary.per_teacher {
        println!("  {}: {}", format_teacher_name(teachers, *id), count);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::{assign, SlotSet};

    fn setup() -> (Timetable, Vec<Teacher>) {
        let slot = Slot::new(Day::Monday, 1).unwrap();
        let teacher = Teacher {
            id: TeacherId(1),
            name: "Анна".to_string(),
            subject: Subject::Mathematics,
            classes: [SchoolClass::new(1).unwrap()].into_iter().collect(),
            available_slots: [slot].into_iter().collect::<SlotSet>(),
        };
        let timetable = assign(&Timetable::new(), slot, &teacher, SchoolClass::new(1).unwrap()).unwrap();
        (timetable, vec![teacher])
    }

    #[test]
    fn test_grid_shows_assignment() {
        let (timetable, teachers) = setup();
        let grid = render_grid(&timetable, &teachers, GridFilter::default());
        let lines: Vec<&str> = grid.lines().collect();
        assert_eq!(lines.len(), 9);
        assert!(lines[0].starts_with("Урок | Понедельник"));
        assert_eq!(lines[1], "1 урок | Анна / Математика / 1 класс | - | - | - | -");
        assert_eq!(lines[8], "8 урок | - | - | - | - | -");
    }

    #[test]
    fn test_grid_filter_hides_other_classes() {
        let (timetable, teachers) = setup();
        let filter = GridFilter {
            class: Some(SchoolClass::new(2).unwrap()),
            subject: None,
        };
        let grid = render_grid(&timetable, &teachers, filter);
        assert!(!grid.contains("Анна"));
    }

    #[test]
    fn test_coverage_counts() {
        let (timetable, _) = setup();
        let summary = coverage(&timetable);
        assert_eq!(summary.per_class.get(&SchoolClass::new(1).unwrap()), Some(&1));
        assert_eq!(summary.per_teacher.get(&TeacherId(1)), Some(&1));
    }

    #[test]
    fn test_unknown_teacher_name_falls_back_to_id() {
        assert_eq!(format_teacher_name(&[], TeacherId(5)), "#5");
    }
}
