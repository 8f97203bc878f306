use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use csv::{ReaderBuilder, WriterBuilder};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Result, TimetableError};
use crate::schedule::{SchoolClass, Slot, SlotSet, Subject, Teacher, TeacherId};

/// Storage boundary for teacher records. The scheduling core never
/// touches storage itself; it is handed whatever `load` returns.
pub trait TeacherRegistry: Send + Sync {
    fn load(&self) -> Result<Vec<Teacher>>;
    fn save(&self, teachers: &[Teacher]) -> Result<()>;
}

/// Flat JSON array of teacher records.
pub struct JsonFileRegistry {
    path: PathBuf,
}

impl JsonFileRegistry {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl TeacherRegistry for JsonFileRegistry {
    fn load(&self) -> Result<Vec<Teacher>> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "registry file missing, starting empty");
            return Ok(Vec::new());
        }
        let reader = BufReader::new(File::open(&self.path)?);
        let teachers: Vec<Teacher> = serde_json::from_reader(reader)?;
        info!(path = %self.path.display(), count = teachers.len(), "loaded teachers");
        Ok(teachers)
    }

    fn save(&self, teachers: &[Teacher]) -> Result<()> {
        let writer = BufWriter::new(File::create(&self.path)?);
        serde_json::to_writer_pretty(writer, teachers)?;
        info!(path = %self.path.display(), count = teachers.len(), "saved teachers");
        Ok(())
    }
}

/// One CSV row per teacher; list columns are `;`-separated.
#[derive(Debug, Serialize, Deserialize)]
struct TeacherRow {
    id: u64,
    name: String,
    subject: String,
    classes: String,
    available_slots: String,
}

impl TeacherRow {
    fn from_teacher(teacher: &Teacher) -> Self {
        Self {
            id: teacher.id.0,
            name: teacher.name.clone(),
            subject: teacher.subject.name().to_string(),
            classes: join(teacher.classes.iter()),
            available_slots: join(teacher.available_slots.iter()),
        }
    }

    fn into_teacher(self) -> Result<Teacher> {
        let classes = split(&self.classes)
            .map(str::parse::<SchoolClass>)
            .collect::<Result<BTreeSet<_>>>()?;
        let available_slots = split(&self.available_slots)
            .map(str::parse::<Slot>)
            .collect::<Result<Vec<_>>>()?
            .into_iter()
            .collect::<SlotSet>();
        Ok(Teacher {
            id: TeacherId(self.id),
            name: self.name,
            subject: self.subject.parse()?,
            classes,
            available_slots,
        })
    }
}

fn join<T: ToString>(items: impl Iterator<Item = T>) -> String {
    items.map(|i| i.to_string()).collect::<Vec<_>>().join(";")
}

fn split(field: &str) -> impl Iterator<Item = &str> {
    field.split(';').map(str::trim).filter(|s| !s.is_empty())
}

pub struct CsvFileRegistry {
    path: PathBuf,
}

impl CsvFileRegistry {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl TeacherRegistry for CsvFileRegistry {
    fn load(&self) -> Result<Vec<Teacher>> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "registry file missing, starting empty");
            return Ok(Vec::new());
        }
        let mut reader = ReaderBuilder::new().has_headers(true).from_path(&self.path)?;
        let mut teachers = Vec::new();
        for row in reader.deserialize::<TeacherRow>() {
            teachers.push(row?.into_teacher()?);
        }
        info!(path = %self.path.display(), count = teachers.len(), "loaded teachers");
        Ok(teachers)
    }

    fn save(&self, teachers: &[Teacher]) -> Result<()> {
        let mut writer = WriterBuilder::new().has_headers(true).from_path(&self.path)?;
        for teacher in teachers {
            writer.serialize(TeacherRow::from_teacher(teacher))?;
        }
        writer.flush()?;
        info!(path = %self.path.display(), count = teachers.len(), "saved teachers");
        Ok(())
    }
}

/// Keeps records in memory only.
#[derive(Default)]
pub struct MemoryRegistry {
    teachers: Mutex<Vec<Teacher>>,
}

impl MemoryRegistry {
    pub fn new(teachers: Vec<Teacher>) -> Self {
        Self {
            teachers: Mutex::new(teachers),
        }
    }

    // A panicking writer can only leave a whole previous list behind.
    fn stored(&self) -> MutexGuard<'_, Vec<Teacher>> {
        self.teachers.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl TeacherRegistry for MemoryRegistry {
    fn load(&self) -> Result<Vec<Teacher>> {
        Ok(self.stored().clone())
    }

    fn save(&self, teachers: &[Teacher]) -> Result<()> {
        *self.stored() = teachers.to_vec();
        Ok(())
    }
}

/// Picks a file registry by extension: `.csv` is CSV, anything else JSON.
pub fn registry_for_path(path: &Path) -> Box<dyn TeacherRegistry> {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("csv") => Box::new(CsvFileRegistry::new(path)),
        _ => Box::new(JsonFileRegistry::new(path)),
    }
}

/// Registration request, before an id is issued.
#[derive(Debug, Clone)]
pub struct NewTeacher {
    pub name: String,
    pub subject: Subject,
    pub classes: BTreeSet<SchoolClass>,
    pub available_slots: SlotSet,
}

/// Result of registering a teacher.
#[derive(Debug, Clone, Serialize)]
pub struct Registration {
    pub teacher: Teacher,
    /// Earlier teachers already covering the same subject in one of the
    /// selected classes. They keep priority over the new teacher.
    pub overlaps: Vec<TeacherId>,
}

/// In-memory teacher list with a sequence counter for ids.
#[derive(Debug, Clone)]
pub struct Roster {
    teachers: Vec<Teacher>,
    /// `None` once the highest id has been issued.
    next_id: Option<u64>,
}

impl Default for Roster {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl Roster {
    pub fn new(teachers: Vec<Teacher>) -> Self {
        let next_id = teachers
            .iter()
            .map(|t| t.id.0)
            .max()
            .map_or(Some(1), |max| max.checked_add(1));
        Self { teachers, next_id }
    }

    pub fn load(registry: &dyn TeacherRegistry) -> Result<Self> {
        Ok(Self::new(registry.load()?))
    }

    pub fn save(&self, registry: &dyn TeacherRegistry) -> Result<()> {
        registry.save(&self.teachers)
    }

    pub fn teachers(&self) -> &[Teacher] {
        &self.teachers
    }

    pub fn get(&self, id: TeacherId) -> Result<&Teacher> {
        self.teachers
            .iter()
            .find(|t| t.id == id)
            .ok_or(TimetableError::UnknownTeacher(id.0))
    }

    /// Issues the next id and appends the teacher.
    pub fn register(&mut self, new: NewTeacher) -> Result<Registration> {
        let id = TeacherId(self.next_id.ok_or(TimetableError::IdSpaceExhausted)?);
        self.next_id = id.0.checked_add(1);

        let overlaps: Vec<TeacherId> = self
            .teachers
            .iter()
            .filter(|t| t.subject == new.subject && !t.classes.is_disjoint(&new.classes))
            .map(|t| t.id)
            .collect();

        let teacher = Teacher {
            id,
            name: new.name,
            subject: new.subject,
            classes: new.classes,
            available_slots: new.available_slots,
        };
        self.teachers.push(teacher.clone());

        info!(id = %id, subject = %teacher.subject, overlaps = overlaps.len(), "registered teacher");
        Ok(Registration { teacher, overlaps })
    }
}
