//! Daily schedule: custom events plus the day's gym plan

use chrono::{NaiveDate, NaiveTime};
use rusqlite::{params, Connection};

use super::error::StorageResult;
use super::gym;
use super::types::{CustomEvent, ScheduleEntry};

const SELECT_EVENTS_FOR_DATE: &str =
    "SELECT * FROM custom_event WHERE event_date = ?1 ORDER BY start_time, id";
const SELECT_EVENT_BY_ID: &str = "SELECT * FROM custom_event WHERE id = ?1";
const INSERT_EVENT: &str = "INSERT INTO custom_event (title, start_time, end_time, event_date, color)
    VALUES (?1, ?2, ?3, ?4, ?5)";

/// Color used when an event is created without one
pub const DEFAULT_EVENT_COLOR: &str = "purple";

#[derive(Debug, Clone)]
pub struct NewEvent {
    pub title: String,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub event_date: NaiveDate,
    pub color: Option<String>,
}

pub fn create_event(conn: &Connection, event: &NewEvent) -> StorageResult<CustomEvent> {
    let color = event.color.as_deref().unwrap_or(DEFAULT_EVENT_COLOR);
    conn.execute(
        INSERT_EVENT,
        params![
            event.title,
            event.start_time,
            event.end_time,
            event.event_date,
            color
        ],
    )?;
    let id = conn.last_insert_rowid();
    tracing::info!(event_id = id, date = %event.event_date, "Created event");

    Ok(conn.query_row(SELECT_EVENT_BY_ID, [id], CustomEvent::from_row)?)
}

/// Everything scheduled on `date`: events by start time, then the gym plan
pub fn entries_for(conn: &Connection, date: NaiveDate) -> StorageResult<Vec<ScheduleEntry>> {
    let mut stmt = conn.prepare(SELECT_EVENTS_FOR_DATE)?;
    let mut entries = stmt
        .query_map([date], CustomEvent::from_row)?
        .map(|event| event.map(ScheduleEntry::Event))
        .collect::<Result<Vec<_>, _>>()?;

    entries.extend(
        gym::plans_between(conn, date, date)?
            .into_iter()
            .map(ScheduleEntry::Gym),
    );

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::gym::PlanUpsert;
    use crate::storage::schema;

    fn conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        schema::create_all(&conn).unwrap();
        conn
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    fn event(title: &str, hour: u32) -> NewEvent {
        NewEvent {
            title: title.to_string(),
            start_time: NaiveTime::from_hms_opt(hour, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(hour + 1, 0, 0).unwrap(),
            event_date: date(),
            color: None,
        }
    }

    #[test]
    fn test_default_color() {
        let conn = conn();
        let created = create_event(&conn, &event("Lab", 9)).unwrap();
        assert_eq!(created.color, "purple");
    }

    #[test]
    fn test_entries_sorted_and_include_plan() {
        let conn = conn();
        create_event(&conn, &event("Seminar", 14)).unwrap();
        create_event(&conn, &event("Lab", 9)).unwrap();
        gym::upsert_plan(
            &conn,
            &PlanUpsert {
                date: date(),
                title: Some("Pull".to_string()),
                notes: None,
                exercises: None,
            },
        )
        .unwrap();

        let entries = entries_for(&conn, date()).unwrap();
        assert_eq!(entries.len(), 3);
        assert!(matches!(&entries[0], ScheduleEntry::Event(e) if e.title == "Lab"));
        assert!(matches!(&entries[1], ScheduleEntry::Event(e) if e.title == "Seminar"));
        assert!(matches!(&entries[2], ScheduleEntry::Gym(p) if p.title.as_deref() == Some("Pull")));
    }

    #[test]
    fn test_other_days_excluded() {
        let conn = conn();
        let mut other = event("Tomorrow", 9);
        other.event_date = date().succ_opt().unwrap();
        create_event(&conn, &other).unwrap();

        assert!(entries_for(&conn, date()).unwrap().is_empty());
    }
}
