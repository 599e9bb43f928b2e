//! Study Routes
//!
//! - GET /api/subjects - Subjects with their lectures
//! - POST /api/subjects - Create a subject
//! - POST /api/subjects/:id/lectures - Append a lecture
//! - PUT /api/lectures/:id - Update lecture progress
//! - GET /api/exams - List exams by date
//! - POST /api/exams - Create an exam
//! - GET /api/mistakes - List mistakes
//! - POST /api/mistakes - Log a mistake
//! - POST /api/pomodoro - Log a pomodoro session
//! - GET /api/subjects/:id/lectures/:number/flashcards - Flashcards of a lecture
//! - POST /api/flashcards - Create a flashcard

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use super::{now_utc, today_utc};
use crate::api::dto::{
    non_negative, required, required_text, ApiJson, CreateExamRequest,
    CreateFlashcardRequest, CreateMistakeRequest, CreateSubjectRequest, PomodoroRequest,
    UpdateLectureRequest,
};
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::storage::study::{self, LectureUpdate, NewPomodoro};
use crate::storage::{
    Exam, Flashcard, Lecture, Mistake, MistakeView, PomodoroLog, Subject, SubjectWithLectures,
};

// ============================================
// SUBJECTS & LECTURES
// ============================================

/// GET /api/subjects
pub async fn list_subjects(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<SubjectWithLectures>>> {
    let subjects = state.db.read(study::list_subjects).await?;
    Ok(Json(subjects))
}

/// POST /api/subjects
///
/// Create a subject; names are unique.
pub async fn create_subject(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<CreateSubjectRequest>,
) -> ApiResult<(StatusCode, Json<Subject>)> {
    let name = required_text(req.name, "name")?;

    let subject = state
        .db
        .write(move |tx| study::create_subject(tx, &name))
        .await?;

    Ok((StatusCode::CREATED, Json(subject)))
}

/// POST /api/subjects/:id/lectures
///
/// Append the next-numbered lecture to a subject.
pub async fn add_lecture(
    State(state): State<Arc<AppState>>,
    Path(subject_id): Path<i64>,
) -> ApiResult<(StatusCode, Json<Lecture>)> {
    let lecture = state
        .db
        .write(move |tx| study::add_lecture(tx, subject_id))
        .await?;

    Ok((StatusCode::CREATED, Json(lecture)))
}

/// PUT /api/lectures/:id
///
/// Partial update of progress counters; recomputes the finished date.
pub async fn update_lecture(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    ApiJson(req): ApiJson<UpdateLectureRequest>,
) -> ApiResult<Json<Lecture>> {
    let update = LectureUpdate {
        uni_lecs: non_negative(req.uni_lecs, "uni_lecs")?,
        studied: non_negative(req.studied, "studied")?,
        revised: req.revised,
    };
    let today = today_utc();

    let lecture = state
        .db
        .write(move |tx| study::update_lecture(tx, id, &update, today))
        .await?;

    Ok(Json(lecture))
}

// ============================================
// EXAMS & MISTAKES
// ============================================

/// GET /api/exams
pub async fn list_exams(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<Exam>>> {
    let exams = state.db.read(study::list_exams).await?;
    Ok(Json(exams))
}

/// POST /api/exams
pub async fn create_exam(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<CreateExamRequest>,
) -> ApiResult<(StatusCode, Json<Exam>)> {
    let name = required_text(req.name, "name")?;
    let date = required(req.date, "date")?;

    let exam = state
        .db
        .write(move |tx| study::create_exam(tx, &name, date))
        .await?;

    tracing::info!(exam_id = exam.id, date = %exam.date, "Created exam");
    Ok((StatusCode::CREATED, Json(exam)))
}

/// GET /api/mistakes
pub async fn list_mistakes(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<MistakeView>>> {
    let mistakes = state.db.read(study::list_mistakes).await?;
    Ok(Json(mistakes))
}

/// POST /api/mistakes
pub async fn create_mistake(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<CreateMistakeRequest>,
) -> ApiResult<(StatusCode, Json<Mistake>)> {
    let topic = required_text(req.topic, "topic")?;
    let subject_id = required(req.subject_id, "subject_id")?;
    let description = required(req.description, "description")?;

    let mistake = state
        .db
        .write(move |tx| study::create_mistake(tx, &topic, Some(&description), subject_id))
        .await?;

    Ok((StatusCode::CREATED, Json(mistake)))
}

// ============================================
// POMODORO
// ============================================

/// One session can't outlast a day
pub const MAX_POMODORO_SECONDS: i64 = 86_400;

/// POST /api/pomodoro
///
/// Log a finished session. With a subject and lecture number the lecture's
/// cumulative time and session count are credited too.
pub async fn log_pomodoro(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<PomodoroRequest>,
) -> ApiResult<(StatusCode, Json<PomodoroLog>)> {
    let duration = required(req.duration, "duration")?;
    if !(1..=MAX_POMODORO_SECONDS).contains(&duration) {
        return Err(ApiError::Validation(format!(
            "duration must be between 1 and {} seconds",
            MAX_POMODORO_SECONDS
        )));
    }

    let session = NewPomodoro {
        duration,
        subject_id: req.subject_id,
        lecture_number: req.lecture_id,
    };
    let now = now_utc();

    let log = state
        .db
        .write(move |tx| study::log_pomodoro(tx, &session, now))
        .await?;

    tracing::info!(log_id = log.id, duration, "Logged pomodoro");
    Ok((StatusCode::CREATED, Json(log)))
}

// ============================================
// FLASHCARDS
// ============================================

/// GET /api/subjects/:id/lectures/:number/flashcards
pub async fn list_flashcards(
    State(state): State<Arc<AppState>>,
    Path((subject_id, lecture_number)): Path<(i64, i64)>,
) -> ApiResult<Json<Vec<Flashcard>>> {
    let cards = state
        .db
        .read(move |conn| study::list_flashcards(conn, subject_id, lecture_number))
        .await?;
    Ok(Json(cards))
}

/// POST /api/flashcards
pub async fn create_flashcard(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<CreateFlashcardRequest>,
) -> ApiResult<(StatusCode, Json<Flashcard>)> {
    let subject_id = required(req.subject_id, "subject_id")?;
    let lecture_number = required(req.lecture_id, "lecture_id")?;
    let front = required_text(req.front, "front")?;
    let back = required_text(req.back, "back")?;

    let card = state
        .db
        .write(move |tx| study::create_flashcard(tx, subject_id, lecture_number, &front, &back))
        .await?;

    Ok((StatusCode::CREATED, Json(card)))
}
