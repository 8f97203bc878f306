pub mod submission;
pub mod export;

pub use submission::TeacherForm;
pub use export::export_timetable_to_csv;
