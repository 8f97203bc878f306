use std::sync::{Mutex, MutexGuard};

use actix_web::{middleware, web, App, HttpRequest, HttpResponse, HttpServer, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::display::format_teacher_name;
use crate::form::TeacherForm;
use crate::registry::{Roster, TeacherRegistry};
use crate::schedule::{
    all_slots, assign, candidates_for_slot, generate_week, recheck_pair, Gap, SchoolClass, Slot,
    Subject, Teacher, TeacherId, Timetable,
};

/// Shared state behind the HTTP API.
///
/// Lock order is always roster, then timetable. Generation and manual
/// placement both run while holding the timetable lock, so a rebuild
/// never interleaves with a placement.
pub struct AppState {
    pub roster: Mutex<Roster>,
    pub timetable: Mutex<Timetable>,
    pub gaps: Mutex<Vec<Gap>>,
    pub registry: Box<dyn TeacherRegistry>,
    pub admin_password: String,
}

impl AppState {
    pub fn new(registry: Box<dyn TeacherRegistry>, admin_password: String) -> crate::error::Result<Self> {
        let roster = Roster::load(registry.as_ref())?;
        Ok(Self {
            roster: Mutex::new(roster),
            timetable: Mutex::new(Timetable::new()),
            gaps: Mutex::new(Vec::new()),
            registry,
            admin_password,
        })
    }
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>> {
    mutex
        .lock()
        .map_err(|_| actix_web::error::ErrorInternalServerError("state lock poisoned"))
}

fn is_admin(req: &HttpRequest, state: &AppState) -> bool {
    req.headers()
        .get("X-Admin-Password")
        .and_then(|v| v.to_str().ok())
        .map_or(false, |p| p == state.admin_password)
}

fn unauthorized() -> HttpResponse {
    HttpResponse::Unauthorized().json(serde_json::json!({"success": false, "error": "Unauthorized"}))
}

#[derive(Deserialize)]
pub struct LoginRequest {
    password: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignRequest {
    slot: Slot,
    teacher_id: TeacherId,
    class_name: SchoolClass,
}

#[derive(Deserialize)]
pub struct TimetableQuery {
    class: Option<SchoolClass>,
    subject: Option<Subject>,
}

#[derive(Deserialize)]
pub struct CandidatesQuery {
    slot: Slot,
    class: Option<SchoolClass>,
    subject: Option<Subject>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimetableCell {
    slot: Slot,
    teacher: Option<String>,
    subject: Option<Subject>,
    class_name: Option<SchoolClass>,
    is_empty: bool,
}

#[derive(Serialize)]
pub struct TimetableResponse {
    cells: Vec<TimetableCell>,
    gaps: Vec<Gap>,
}

fn timetable_cells(
    timetable: &Timetable,
    teachers: &[Teacher],
    class: Option<SchoolClass>,
    subject: Option<Subject>,
) -> Vec<TimetableCell> {
    all_slots()
        .map(|slot| match timetable.get(slot) {
            Some(a)
                if class.map_or(true, |c| c == a.class_name)
                    && subject.map_or(true, |s| s == a.subject) =>
            {
                TimetableCell {
                    slot,
                    teacher: Some(format_teacher_name(teachers, a.teacher_id)),
                    subject: Some(a.subject),
                    class_name: Some(a.class_name),
                    is_empty: false,
                }
            }
            _ => TimetableCell {
                slot,
                teacher: None,
                subject: None,
                class_name: None,
                is_empty: true,
            },
        })
        .collect()
}

async fn admin_login(
    req: web::Json<LoginRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    if req.password == state.admin_password {
        Ok(HttpResponse::Ok().json(serde_json::json!({"success": true})))
    } else {
        Ok(HttpResponse::Unauthorized().json(serde_json::json!({"success": false, "error": "Invalid password"})))
    }
}

async fn list_teachers(state: web::Data<AppState>) -> Result<HttpResponse> {
    let roster = lock(&state.roster)?;
    Ok(HttpResponse::Ok().json(roster.teachers()))
}

async fn add_teacher(
    req: HttpRequest,
    form: web::Json<TeacherForm>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    if !is_admin(&req, &state) {
        return Ok(unauthorized());
    }

    let new_teacher = match form.into_inner().into_new_teacher() {
        Ok(new_teacher) => new_teacher,
        Err(e) => {
            return Ok(HttpResponse::BadRequest().json(serde_json::json!({"success": false, "error": e.to_string()})));
        }
    };

    // The shared roster only changes once the registry holds the new record.
    let mut roster = lock(&state.roster)?;
    let mut updated = roster.clone();
    let registration = updated
        .register(new_teacher)
        .and_then(|registration| updated.save(state.registry.as_ref()).map(|()| registration));
    match registration {
        Ok(registration) => {
            *roster = updated;
            Ok(HttpResponse::Ok().json(registration))
        }
        Err(e) => {
            warn!(error = %e, "failed to register teacher");
            Err(actix_web::error::ErrorInternalServerError(format!("Failed to register teacher: {}", e)))
        }
    }
}

async fn generate_timetable(req: HttpRequest, state: web::Data<AppState>) -> Result<HttpResponse> {
    if !is_admin(&req, &state) {
        return Ok(unauthorized());
    }

    let roster = lock(&state.roster)?;
    let mut timetable = lock(&state.timetable)?;
    let generation = generate_week(roster.teachers());
    *timetable = generation.timetable.clone();
    *lock(&state.gaps)? = generation.gaps.clone();

    info!(assigned = generation.timetable.len(), gaps = generation.gaps.len(), "timetable replaced");
    Ok(HttpResponse::Ok().json(generation))
}

async fn assign_slot(
    req: HttpRequest,
    body: web::Json<AssignRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    if !is_admin(&req, &state) {
        return Ok(unauthorized());
    }

    let roster = lock(&state.roster)?;
    let teacher = match roster.get(body.teacher_id) {
        Ok(teacher) => teacher,
        Err(e) => return Ok(HttpResponse::NotFound().json(serde_json::json!({"error": e.to_string()}))),
    };

    let mut timetable = lock(&state.timetable)?;
    let displaced = timetable.get(body.slot).copied();
    match assign(&timetable, body.slot, teacher, body.class_name) {
        Ok(updated) => {
            let mut gaps = lock(&state.gaps)?;
            recheck_pair(&mut gaps, &updated, roster.teachers(), body.class_name, teacher.subject);
            if let Some(previous) = displaced {
                recheck_pair(&mut gaps, &updated, roster.teachers(), previous.class_name, previous.subject);
            }
            *timetable = updated;
            Ok(HttpResponse::Ok().json(timetable.get(body.slot)))
        }
        Err(rejection) => Ok(HttpResponse::Conflict().json(serde_json::json!({
            "error": rejection.to_string(),
            "rejection": rejection,
        }))),
    }
}

async fn get_timetable(
    query: web::Query<TimetableQuery>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let roster = lock(&state.roster)?;
    let timetable = lock(&state.timetable)?;
    let cells = timetable_cells(&timetable, roster.teachers(), query.class, query.subject);
    let gaps = lock(&state.gaps)?.clone();
    Ok(HttpResponse::Ok().json(TimetableResponse { cells, gaps }))
}

async fn get_candidates(
    query: web::Query<CandidatesQuery>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let roster = lock(&state.roster)?;
    let candidates: Vec<&Teacher> =
        candidates_for_slot(roster.teachers(), query.slot, query.class, query.subject);
    Ok(HttpResponse::Ok().json(candidates))
}

/// Routes of the JSON API, shared by the server and the tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/login", web::post().to(admin_login))
        .route("/api/teachers", web::get().to(list_teachers))
        .route("/api/teachers", web::post().to(add_teacher))
        .route("/api/timetable", web::get().to(get_timetable))
        .route("/api/timetable/generate", web::post().to(generate_timetable))
        .route("/api/timetable/assign", web::post().to(assign_slot))
        .route("/api/candidates", web::get().to(get_candidates));
}

pub async fn start_server(port: u16, state: AppState) -> std::io::Result<()> {
    let app_state = web::Data::new(state);

    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(middleware::Logger::default())
            .configure(configure)
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}
