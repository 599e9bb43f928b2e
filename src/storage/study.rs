//! Study tracking: subjects, lectures, flashcards, exams, mistakes and
//! pomodoro sessions.

use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;

use super::error::{StorageError, StorageResult};
use super::types::{
    Exam, Flashcard, Lecture, Mistake, MistakeView, PomodoroLog, Subject, SubjectWithLectures,
    WeakTopic,
};
use crate::metrics::{self, PomodoroTotals, TimeWindows};

const SELECT_SUBJECTS: &str = "SELECT id, name FROM subject ORDER BY id";
const SELECT_SUBJECT_BY_ID: &str = "SELECT id, name FROM subject WHERE id = ?1";
const SELECT_SUBJECT_BY_NAME: &str = "SELECT id, name FROM subject WHERE name = ?1";
const INSERT_SUBJECT: &str = "INSERT INTO subject (name) VALUES (?1)";

const SELECT_LECTURES: &str = "SELECT * FROM lecture ORDER BY subject_id, lecture_number";
const SELECT_LECTURE_BY_ID: &str = "SELECT * FROM lecture WHERE id = ?1";
const INSERT_NEXT_LECTURE: &str = "INSERT INTO lecture (subject_id, lecture_number)
    SELECT ?1, COALESCE(MAX(lecture_number), 0) + 1 FROM lecture WHERE subject_id = ?1";
const UPDATE_LECTURE: &str = "UPDATE lecture
    SET uni_lecs = ?2, studied = ?3, revised = ?4, finished_date = ?5
    WHERE id = ?1";
const ADD_LECTURE_TIME: &str = "UPDATE lecture
    SET total_time = total_time + ?3, sessions = sessions + 1
    WHERE subject_id = ?1 AND lecture_number = ?2";

const SELECT_FLASHCARDS: &str =
    "SELECT * FROM flashcard WHERE subject_id = ?1 AND lecture_id = ?2 ORDER BY id";
const SELECT_FLASHCARD_BY_ID: &str = "SELECT * FROM flashcard WHERE id = ?1";
const INSERT_FLASHCARD: &str =
    "INSERT INTO flashcard (subject_id, lecture_id, front, back) VALUES (?1, ?2, ?3, ?4)";

const SELECT_EXAMS: &str = "SELECT * FROM exam ORDER BY date ASC, id ASC";
const SELECT_EXAM_BY_ID: &str = "SELECT * FROM exam WHERE id = ?1";
const INSERT_EXAM: &str = "INSERT INTO exam (name, date) VALUES (?1, ?2)";

const SELECT_MISTAKES: &str = "
    SELECT m.*, s.name AS subject_name FROM mistake m
    JOIN subject s ON s.id = m.subject_id
    ORDER BY m.id DESC";
const SELECT_MISTAKE_BY_ID: &str = "SELECT * FROM mistake WHERE id = ?1";
const SELECT_WEAK_TOPICS: &str = "
    SELECT m.topic, s.name FROM mistake m
    JOIN subject s ON s.id = m.subject_id
    ORDER BY m.id DESC LIMIT ?1";
const INSERT_MISTAKE: &str =
    "INSERT INTO mistake (topic, description, subject_id) VALUES (?1, ?2, ?3)";

const INSERT_POMODORO: &str = "INSERT INTO pomodoro_log (logged_at, duration, subject_id, lecture_id)
    VALUES (?1, ?2, ?3, ?4)";
const SELECT_POMODORO_BY_ID: &str = "SELECT * FROM pomodoro_log WHERE id = ?1";
const SELECT_POMODORO_SINCE: &str =
    "SELECT logged_at, duration FROM pomodoro_log WHERE logged_at >= ?1 AND logged_at <= ?2";

/// Partial update of a lecture's progress counters
#[derive(Debug, Clone, Default)]
pub struct LectureUpdate {
    pub uni_lecs: Option<i64>,
    pub studied: Option<i64>,
    pub revised: Option<bool>,
}

/// A validated pomodoro session to record
#[derive(Debug, Clone)]
pub struct NewPomodoro {
    pub duration: i64,
    pub subject_id: Option<i64>,
    pub lecture_number: Option<i64>,
}

// ============================================
// SUBJECTS & LECTURES
// ============================================

/// All subjects with their lectures, in two queries
pub fn list_subjects(conn: &Connection) -> StorageResult<Vec<SubjectWithLectures>> {
    let mut stmt = conn.prepare(SELECT_LECTURES)?;
    let mut lectures: HashMap<i64, Vec<Lecture>> = HashMap::new();
    for lecture in stmt.query_map([], Lecture::from_row)? {
        let lecture = lecture?;
        lectures.entry(lecture.subject_id).or_default().push(lecture);
    }

    let mut stmt = conn.prepare(SELECT_SUBJECTS)?;
    let subjects = stmt
        .query_map([], Subject::from_row)?
        .map(|subject| {
            subject.map(|subject| SubjectWithLectures {
                lectures: lectures.remove(&subject.id).unwrap_or_default(),
                subject,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(subjects)
}

pub fn get_subject(conn: &Connection, id: i64) -> StorageResult<Option<Subject>> {
    Ok(conn
        .query_row(SELECT_SUBJECT_BY_ID, [id], Subject::from_row)
        .optional()?)
}

/// Fail with `NotFound` unless the subject exists
pub fn require_subject(conn: &Connection, id: i64) -> StorageResult<Subject> {
    get_subject(conn, id)?.ok_or_else(|| StorageError::not_found("Subject", id))
}

/// Create a subject; the name must already be trimmed and non-empty
pub fn create_subject(conn: &Connection, name: &str) -> StorageResult<Subject> {
    let existing = conn
        .query_row(SELECT_SUBJECT_BY_NAME, [name], Subject::from_row)
        .optional()?;
    if existing.is_some() {
        return Err(StorageError::Conflict(
            "Subject with this name already exists".to_string(),
        ));
    }

    conn.execute(INSERT_SUBJECT, [name])?;
    let id = conn.last_insert_rowid();
    tracing::info!(subject_id = id, name = %name, "Created subject");

    require_subject(conn, id)
}

/// Append a lecture numbered one past the subject's highest
pub fn add_lecture(conn: &Connection, subject_id: i64) -> StorageResult<Lecture> {
    require_subject(conn, subject_id)?;

    conn.execute(INSERT_NEXT_LECTURE, [subject_id])?;
    let lecture = require_lecture(conn, conn.last_insert_rowid())?;
    tracing::info!(
        subject_id,
        lecture_number = lecture.lecture_number,
        "Added lecture"
    );

    Ok(lecture)
}

pub fn get_lecture(conn: &Connection, id: i64) -> StorageResult<Option<Lecture>> {
    Ok(conn
        .query_row(SELECT_LECTURE_BY_ID, [id], Lecture::from_row)
        .optional()?)
}

fn require_lecture(conn: &Connection, id: i64) -> StorageResult<Lecture> {
    get_lecture(conn, id)?.ok_or_else(|| StorageError::not_found("Lecture", id))
}

/// Apply a partial update and recompute the finished date
pub fn update_lecture(
    conn: &Connection,
    id: i64,
    update: &LectureUpdate,
    today: NaiveDate,
) -> StorageResult<Lecture> {
    let current = require_lecture(conn, id)?;

    let uni_lecs = update.uni_lecs.unwrap_or(current.uni_lecs);
    let studied = update.studied.unwrap_or(current.studied);
    let revised = update.revised.unwrap_or(current.revised);
    let finished_date = metrics::finished_date(uni_lecs, studied, current.finished_date, today);

    conn.execute(
        UPDATE_LECTURE,
        params![id, uni_lecs, studied, revised, finished_date],
    )?;

    if finished_date.is_some() && current.finished_date.is_none() {
        tracing::info!(lecture_id = id, "Lecture finished");
    }

    require_lecture(conn, id)
}

// ============================================
// FLASHCARDS
// ============================================

pub fn list_flashcards(
    conn: &Connection,
    subject_id: i64,
    lecture_number: i64,
) -> StorageResult<Vec<Flashcard>> {
    let mut stmt = conn.prepare(SELECT_FLASHCARDS)?;
    let cards = stmt
        .query_map(params![subject_id, lecture_number], Flashcard::from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(cards)
}

pub fn create_flashcard(
    conn: &Connection,
    subject_id: i64,
    lecture_number: i64,
    front: &str,
    back: &str,
) -> StorageResult<Flashcard> {
    require_subject(conn, subject_id)?;
    conn.execute(
        INSERT_FLASHCARD,
        params![subject_id, lecture_number, front, back],
    )?;
    Ok(conn.query_row(
        SELECT_FLASHCARD_BY_ID,
        [conn.last_insert_rowid()],
        Flashcard::from_row,
    )?)
}

// ============================================
// EXAMS & MISTAKES
// ============================================

pub fn list_exams(conn: &Connection) -> StorageResult<Vec<Exam>> {
    let mut stmt = conn.prepare(SELECT_EXAMS)?;
    let exams = stmt
        .query_map([], Exam::from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(exams)
}

pub fn create_exam(conn: &Connection, name: &str, date: NaiveDate) -> StorageResult<Exam> {
    conn.execute(INSERT_EXAM, params![name, date])?;
    Ok(conn.query_row(SELECT_EXAM_BY_ID, [conn.last_insert_rowid()], Exam::from_row)?)
}

pub fn list_mistakes(conn: &Connection) -> StorageResult<Vec<MistakeView>> {
    let mut stmt = conn.prepare(SELECT_MISTAKES)?;
    let mistakes = stmt
        .query_map([], |row| {
            Ok(MistakeView {
                mistake: Mistake::from_row(row)?,
                subject_name: row.get("subject_name")?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(mistakes)
}

pub fn create_mistake(
    conn: &Connection,
    topic: &str,
    description: Option<&str>,
    subject_id: i64,
) -> StorageResult<Mistake> {
    require_subject(conn, subject_id)?;
    conn.execute(INSERT_MISTAKE, params![topic, description, subject_id])?;
    Ok(conn.query_row(
        SELECT_MISTAKE_BY_ID,
        [conn.last_insert_rowid()],
        Mistake::from_row,
    )?)
}

/// Most recently logged mistakes with their subject names
pub fn weak_topics(conn: &Connection, limit: usize) -> StorageResult<Vec<WeakTopic>> {
    let mut stmt = conn.prepare(SELECT_WEAK_TOPICS)?;
    let topics = stmt
        .query_map([limit as i64], |row| {
            Ok(WeakTopic {
                topic: row.get(0)?,
                subject_name: row.get(1)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(topics)
}

// ============================================
// POMODORO
// ============================================

/// Record a session and credit its time to the referenced lecture
///
/// The lecture is looked up by subject and lecture number; when it does not
/// exist only the log row is written.
pub fn log_pomodoro(
    conn: &Connection,
    session: &NewPomodoro,
    now: NaiveDateTime,
) -> StorageResult<PomodoroLog> {
    if let Some(subject_id) = session.subject_id {
        require_subject(conn, subject_id)?;
    }

    conn.execute(
        INSERT_POMODORO,
        params![
            now,
            session.duration,
            session.subject_id,
            session.lecture_number
        ],
    )?;
    let log = conn.query_row(
        SELECT_POMODORO_BY_ID,
        [conn.last_insert_rowid()],
        PomodoroLog::from_row,
    )?;

    if let (Some(subject_id), Some(lecture_number)) = (session.subject_id, session.lecture_number)
    {
        let updated = conn.execute(
            ADD_LECTURE_TIME,
            params![subject_id, lecture_number, session.duration],
        )?;
        if updated == 0 {
            tracing::debug!(subject_id, lecture_number, "No lecture to credit pomodoro time");
        }
    }

    Ok(log)
}

/// Pomodoro totals for the day, week and month containing `windows.now`
pub fn pomodoro_totals(conn: &Connection, windows: &TimeWindows) -> StorageResult<PomodoroTotals> {
    let mut stmt = conn.prepare(SELECT_POMODORO_SINCE)?;
    let logs = stmt
        .query_map(params![windows.earliest(), windows.now], |row| {
            Ok((row.get::<_, NaiveDateTime>(0)?, row.get::<_, i64>(1)?))
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(PomodoroTotals::from_logs(windows, logs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::schema;

    fn conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        schema::create_all(&conn).unwrap();
        conn
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, d).unwrap()
    }

    #[test]
    fn test_duplicate_subject_conflicts() {
        let conn = conn();
        create_subject(&conn, "Anatomy").unwrap();
        let err = create_subject(&conn, "Anatomy").unwrap_err();
        assert!(matches!(err, StorageError::Conflict(_)));
        assert_eq!(list_subjects(&conn).unwrap().len(), 1);
    }

    #[test]
    fn test_lecture_numbers_are_sequential() {
        let conn = conn();
        let anatomy = create_subject(&conn, "Anatomy").unwrap();
        let physio = create_subject(&conn, "Physiology").unwrap();

        let numbers: Vec<i64> = (0..3)
            .map(|_| add_lecture(&conn, anatomy.id).unwrap().lecture_number)
            .collect();
        assert_eq!(numbers, vec![1, 2, 3]);
        assert_eq!(add_lecture(&conn, physio.id).unwrap().lecture_number, 1);

        let subjects = list_subjects(&conn).unwrap();
        assert_eq!(subjects[0].lectures.len(), 3);
        assert_eq!(subjects[1].lectures.len(), 1);
    }

    #[test]
    fn test_add_lecture_unknown_subject() {
        let conn = conn();
        let err = add_lecture(&conn, 42).unwrap_err();
        assert!(matches!(err, StorageError::NotFound { entity: "Subject", id: 42 }));
    }

    #[test]
    fn test_finished_date_follows_progress() {
        let conn = conn();
        let subject = create_subject(&conn, "Anatomy").unwrap();
        let lecture = add_lecture(&conn, subject.id).unwrap();

        let update = LectureUpdate {
            uni_lecs: Some(2),
            studied: Some(2),
            revised: None,
        };
        let finished = update_lecture(&conn, lecture.id, &update, day(18)).unwrap();
        assert_eq!(finished.finished_date, Some(day(18)));
        assert!(!finished.revised);

        let update = LectureUpdate {
            studied: Some(1),
            ..Default::default()
        };
        let reopened = update_lecture(&conn, lecture.id, &update, day(19)).unwrap();
        assert_eq!(reopened.finished_date, None);
        assert_eq!(reopened.uni_lecs, 2);
    }

    #[test]
    fn test_partial_update_keeps_other_fields() {
        let conn = conn();
        let subject = create_subject(&conn, "Anatomy").unwrap();
        let lecture = add_lecture(&conn, subject.id).unwrap();

        let update = LectureUpdate {
            revised: Some(true),
            ..Default::default()
        };
        let updated = update_lecture(&conn, lecture.id, &update, day(18)).unwrap();
        assert!(updated.revised);
        assert_eq!(updated.uni_lecs, 1);
        assert_eq!(updated.studied, 0);
    }

    #[test]
    fn test_pomodoro_credits_lecture() {
        let conn = conn();
        let subject = create_subject(&conn, "Anatomy").unwrap();
        let lecture = add_lecture(&conn, subject.id).unwrap();
        let now = day(18).and_hms_opt(10, 0, 0).unwrap();

        let session = NewPomodoro {
            duration: 1500,
            subject_id: Some(subject.id),
            lecture_number: Some(lecture.lecture_number),
        };
        let log = log_pomodoro(&conn, &session, now).unwrap();
        assert_eq!(log.duration, 1500);
        assert_eq!(log.logged_at, now);

        let lecture = get_lecture(&conn, lecture.id).unwrap().unwrap();
        assert_eq!(lecture.total_time, 1500);
        assert_eq!(lecture.sessions, 1);
    }

    #[test]
    fn test_pomodoro_without_lecture() {
        let conn = conn();
        let now = day(18).and_hms_opt(10, 0, 0).unwrap();
        let session = NewPomodoro {
            duration: 600,
            subject_id: None,
            lecture_number: None,
        };
        log_pomodoro(&conn, &session, now).unwrap();

        let totals = pomodoro_totals(&conn, &TimeWindows::at(now)).unwrap();
        assert_eq!(totals.daily, 600);
        assert_eq!(totals.weekly, 600);
        assert_eq!(totals.monthly, 600);
    }

    #[test]
    fn test_totals_empty_database() {
        let conn = conn();
        let now = day(18).and_hms_opt(10, 0, 0).unwrap();
        let totals = pomodoro_totals(&conn, &TimeWindows::at(now)).unwrap();
        assert_eq!(totals, PomodoroTotals::default());
    }

    #[test]
    fn test_weak_topics_limit_and_order() {
        let conn = conn();
        let subject = create_subject(&conn, "Anatomy").unwrap();
        for i in 0..7 {
            create_mistake(&conn, &format!("topic {}", i), Some("why"), subject.id).unwrap();
        }
        let topics = weak_topics(&conn, 5).unwrap();
        assert_eq!(topics.len(), 5);
        assert_eq!(topics[0].topic, "topic 6");
        assert_eq!(topics[0].subject_name, "Anatomy");
    }

    #[test]
    fn test_flashcards_by_lecture_number() {
        let conn = conn();
        let subject = create_subject(&conn, "Anatomy").unwrap();
        create_flashcard(&conn, subject.id, 1, "Femur?", "Thigh bone").unwrap();
        create_flashcard(&conn, subject.id, 2, "Ulna?", "Forearm bone").unwrap();

        let cards = list_flashcards(&conn, subject.id, 1).unwrap();
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].back, "Thigh bone");
    }

    #[test]
    fn test_exams_sorted_by_date() {
        let conn = conn();
        create_exam(&conn, "Final", day(30)).unwrap();
        create_exam(&conn, "Midterm", day(20)).unwrap();
        let exams = list_exams(&conn).unwrap();
        assert_eq!(exams[0].name, "Midterm");
        assert_eq!(exams[1].date, day(30));
    }
}
