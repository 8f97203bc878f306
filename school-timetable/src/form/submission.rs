use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TimetableError};
use crate::registry::NewTeacher;
use crate::schedule::{SchoolClass, Slot, SlotSet, Subject};

/// Teacher registration as it arrives from a form: every field is still
/// text. Field names follow the stored record layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeacherForm {
    pub name: String,
    pub subject: String,
    #[serde(default)]
    pub classes: Vec<String>,
    #[serde(default)]
    pub available_slots: Vec<String>,
}

impl TeacherForm {
    /// Parses the structured fields. The name is taken as typed.
    pub fn into_new_teacher(self) -> Result<NewTeacher> {
        if self.subject.trim().is_empty() {
            return Err(TimetableError::UnknownSubject(
                "a subject must be selected".to_string(),
            ));
        }
        let subject: Subject = self.subject.parse()?;

        let classes = self
            .classes
            .iter()
            .map(|c| c.parse::<SchoolClass>())
            .collect::<Result<BTreeSet<_>>>()?;

        let available_slots = self
            .available_slots
            .iter()
            .map(|s| s.parse::<Slot>())
            .collect::<Result<Vec<_>>>()?
            .into_iter()
            .collect::<SlotSet>();

        Ok(NewTeacher {
            name: self.name,
            subject,
            classes,
            available_slots,
        })
    }
}
