//! End-to-end flows through the HTTP router against a temporary database.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    response::Response,
    Router,
};
use lifeboard::api::{build_router, ApiConfig, AppState};
use lifeboard::storage::{Database, DatabaseConfig};
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::util::ServiceExt;

struct TestApp {
    router: Router,
    dir: TempDir,
}

impl TestApp {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open(&DatabaseConfig::new(dir.path().join("lifeboard.db"))).unwrap();
        let router = build_router(AppState::new(db, ApiConfig::default()));
        Self { router, dir }
    }

    /// Run SQL on a side connection to the same database file
    fn execute_sql(&self, sql: &str) {
        let conn = rusqlite::Connection::open(self.dir.path().join("lifeboard.db")).unwrap();
        conn.execute_batch(sql).unwrap();
    }

    async fn send(&self, method: &str, uri: &str, body: Option<Value>) -> Response {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("Content-Type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.router.clone().oneshot(request).await.unwrap()
    }

    async fn json(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let response = self.send(method, uri, body).await;
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }
}

fn today() -> String {
    chrono::Utc::now().date_naive().to_string()
}

#[tokio::test]
async fn duplicate_subject_is_rejected() {
    let app = TestApp::new();

    let (status, _) = app
        .json("POST", "/api/subjects", Some(json!({"name": "Anatomy"})))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = app
        .json("POST", "/api/subjects", Some(json!({"name": "Anatomy"})))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "CONFLICT");

    let (_, subjects) = app.json("GET", "/api/subjects", None).await;
    assert_eq!(subjects.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn blank_subject_name_is_rejected() {
    let app = TestApp::new();
    let (status, _) = app
        .json("POST", "/api/subjects", Some(json!({"name": "   "})))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn lectures_are_numbered_in_sequence() {
    let app = TestApp::new();
    let (_, subject) = app
        .json("POST", "/api/subjects", Some(json!({"name": "Physiology"})))
        .await;
    let uri = format!("/api/subjects/{}/lectures", subject["id"]);

    let mut numbers = Vec::new();
    for _ in 0..3 {
        let (status, lecture) = app.json("POST", &uri, None).await;
        assert_eq!(status, StatusCode::CREATED);
        numbers.push(lecture["lecture_number"].as_i64().unwrap());
    }
    assert_eq!(numbers, vec![1, 2, 3]);

    let (_, subjects) = app.json("GET", "/api/subjects", None).await;
    assert_eq!(subjects[0]["lectures"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn finished_date_follows_progress() {
    let app = TestApp::new();
    let (_, subject) = app
        .json("POST", "/api/subjects", Some(json!({"name": "Histology"})))
        .await;
    let (_, lecture) = app
        .json("POST", &format!("/api/subjects/{}/lectures", subject["id"]), None)
        .await;
    let uri = format!("/api/lectures/{}", lecture["id"]);

    let (status, updated) = app
        .json("PUT", &uri, Some(json!({"uni_lecs": 2, "studied": 2})))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["finished_date"], today());

    // revised alone keeps the counters and the date
    let (_, updated) = app.json("PUT", &uri, Some(json!({"revised": true}))).await;
    assert_eq!(updated["studied"], 2);
    assert_eq!(updated["revised"], true);
    assert_eq!(updated["finished_date"], today());

    let (_, updated) = app.json("PUT", &uri, Some(json!({"studied": 1}))).await;
    assert_eq!(updated["finished_date"], Value::Null);
}

#[tokio::test]
async fn pomodoro_credits_lecture() {
    let app = TestApp::new();
    let (_, subject) = app
        .json("POST", "/api/subjects", Some(json!({"name": "Biochemistry"})))
        .await;
    app.json("POST", &format!("/api/subjects/{}/lectures", subject["id"]), None)
        .await;

    let (status, _) = app
        .json(
            "POST",
            "/api/pomodoro",
            Some(json!({"duration": 1500, "subject_id": subject["id"], "lecture_id": 1})),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, subjects) = app.json("GET", "/api/subjects", None).await;
    let lecture = &subjects[0]["lectures"][0];
    assert_eq!(lecture["total_time"], 1500);
    assert_eq!(lecture["sessions"], 1);

    let (_, metrics) = app.json("GET", "/api/dashboard_metrics", None).await;
    assert_eq!(metrics["pomodoro"]["daily"], 1500);
    assert_eq!(metrics["pomodoro"]["monthly"], 1500);
}

#[tokio::test]
async fn pomodoro_rejects_non_positive_duration() {
    let app = TestApp::new();
    let (status, _) = app
        .json("POST", "/api/pomodoro", Some(json!({"duration": 0})))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn pomodoro_longer_than_a_day_is_rejected() {
    let app = TestApp::new();
    let (_, subject) = app
        .json("POST", "/api/subjects", Some(json!({"name": "Pharmacology"})))
        .await;
    app.json("POST", &format!("/api/subjects/{}/lectures", subject["id"]), None)
        .await;

    let huge = i64::MAX / 2 + 1;
    for _ in 0..2 {
        let (status, body) = app
            .json(
                "POST",
                "/api/pomodoro",
                Some(json!({"duration": huge, "subject_id": subject["id"], "lecture_id": 1})),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    let (status, _) = app
        .json(
            "POST",
            "/api/pomodoro",
            Some(json!({"duration": 86_400, "subject_id": subject["id"], "lecture_id": 1})),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, subjects) = app.json("GET", "/api/subjects", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(subjects[0]["lectures"][0]["total_time"], 86_400);

    let (status, metrics) = app.json("GET", "/api/dashboard_metrics", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(metrics["pomodoro"]["daily"], 86_400);
}

#[tokio::test]
async fn empty_dashboard_has_zero_totals() {
    let app = TestApp::new();
    let (status, metrics) = app.json("GET", "/api/dashboard_metrics", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        metrics["pomodoro"],
        json!({"daily": 0, "weekly": 0, "monthly": 0})
    );
    assert_eq!(metrics["exams"], json!([]));
    assert_eq!(metrics["weak_topics"], json!([]));
}

#[tokio::test]
async fn dashboard_lists_exams_and_weak_topics() {
    let app = TestApp::new();
    let (_, subject) = app
        .json("POST", "/api/subjects", Some(json!({"name": "Anatomy"})))
        .await;
    app.json(
        "POST",
        "/api/exams",
        Some(json!({"name": "Final", "date": "2026-12-10"})),
    )
    .await;
    app.json(
        "POST",
        "/api/exams",
        Some(json!({"name": "Midterm", "date": "2026-11-02"})),
    )
    .await;
    let (status, _) = app
        .json(
            "POST",
            "/api/mistakes",
            Some(json!({
                "topic": "Brachial plexus",
                "description": "",
                "subject_id": subject["id"]
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, metrics) = app.json("GET", "/api/dashboard_metrics", None).await;
    assert_eq!(metrics["exams"][0]["name"], "Midterm");
    assert_eq!(
        metrics["weak_topics"],
        json!([{"topic": "Brachial plexus", "subject_name": "Anatomy"}])
    );
}

#[tokio::test]
async fn mistake_for_unknown_subject_is_not_found() {
    let app = TestApp::new();
    let (status, _) = app
        .json(
            "POST",
            "/api/mistakes",
            Some(json!({"topic": "Krebs cycle", "description": "", "subject_id": 99})),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn mistake_requires_description_key() {
    let app = TestApp::new();
    let (_, subject) = app
        .json("POST", "/api/subjects", Some(json!({"name": "Anatomy"})))
        .await;

    let (status, body) = app
        .json(
            "POST",
            "/api/mistakes",
            Some(json!({"topic": "Rotator cuff", "subject_id": subject["id"]})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

    let (status, mistake) = app
        .json(
            "POST",
            "/api/mistakes",
            Some(json!({
                "topic": "Rotator cuff",
                "description": "Mixed up teres minor",
                "subject_id": subject["id"]
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(mistake["description"], "Mixed up teres minor");
}

#[tokio::test]
async fn flashcards_are_keyed_by_lecture_number() {
    let app = TestApp::new();
    let (_, subject) = app
        .json("POST", "/api/subjects", Some(json!({"name": "Pharmacology"})))
        .await;
    let (status, _) = app
        .json(
            "POST",
            "/api/flashcards",
            Some(json!({"subject_id": subject["id"], "lecture_id": 2, "front": "Q", "back": "A"})),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let uri = format!("/api/subjects/{}/lectures/2/flashcards", subject["id"]);
    let (_, cards) = app.json("GET", &uri, None).await;
    assert_eq!(cards.as_array().unwrap().len(), 1);

    let uri = format!("/api/subjects/{}/lectures/1/flashcards", subject["id"]);
    let (_, cards) = app.json("GET", &uri, None).await;
    assert_eq!(cards, json!([]));
}

#[tokio::test]
async fn course_counts_follow_units() {
    let app = TestApp::new();
    let (status, course) = app
        .json(
            "POST",
            "/api/courses",
            Some(json!({"title": "Rust Web", "total_units": 4, "completed_units": 1})),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(course["total_units"], 4);
    assert_eq!(course["completed_units"], 1);

    let unit_id = &course["units"][2]["id"];
    let (status, unit) = app
        .json(
            "PUT",
            &format!("/api/course_units/{}", unit_id),
            Some(json!({"is_complete": true})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(unit["is_complete"], true);

    let (status, _) = app
        .json("POST", &format!("/api/courses/{}/units", course["id"]), None)
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, courses) = app.json("GET", "/api/courses", None).await;
    assert_eq!(courses[0]["completed_units"], 2);
    assert_eq!(courses[0]["total_units"], 5);
    assert_eq!(courses[0]["progress"], 40.0);
}

#[tokio::test]
async fn course_unit_count_is_bounded() {
    let app = TestApp::new();
    let (status, body) = app
        .json(
            "POST",
            "/api/courses",
            Some(json!({"title": "Everything", "total_units": 200_000})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

    let (_, courses) = app.json("GET", "/api/courses", None).await;
    assert_eq!(courses, json!([]));

    let (status, course) = app
        .json(
            "POST",
            "/api/courses",
            Some(json!({"title": "Long course", "total_units": 1000})),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(course["total_units"], 1000);
}

#[tokio::test]
async fn completing_plan_records_pr() {
    let app = TestApp::new();
    let (status, exercise) = app
        .json(
            "POST",
            "/api/gym/exercises",
            Some(json!({"name": "Squat", "group": "legs", "tags": ["compound"]})),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(exercise["group"], "legs");

    let (status, plan) = app
        .json(
            "PUT",
            "/api/gym/planner",
            Some(json!({
                "date": "2026-10-19",
                "title": "Legs",
                "exercises": [
                    {"exercise_id": exercise["id"], "sets": "3", "reps": "8-10", "weight": "50kg"}
                ]
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(plan["exercises"][0]["exercise_name"], "Squat");

    let (status, completion) = app
        .json("PUT", &format!("/api/gym/plan/{}/complete", plan["id"]), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(completion["plan"]["is_completed"], true);
    assert_eq!(completion["new_prs"][0]["weight"], 50.0);
    assert_eq!(completion["new_prs"][0]["reps"], 10);

    let (_, prs) = app.json("GET", "/api/gym/prs", None).await;
    assert_eq!(prs.as_array().unwrap().len(), 1);
    assert_eq!(prs[0]["exercise_name"], "Squat");

    // same lift again is not an improvement
    let (_, completion) = app
        .json("PUT", &format!("/api/gym/plan/{}/complete", plan["id"]), None)
        .await;
    assert_eq!(completion["new_prs"], json!([]));
}

#[tokio::test]
async fn planner_week_and_schedule_include_plan() {
    let app = TestApp::new();
    app.json(
        "PUT",
        "/api/gym/planner",
        Some(json!({"date": "2026-10-21", "title": "Push"})),
    )
    .await;

    let (status, week) = app
        .json("GET", "/api/gym/planner?start_date=2026-10-19", None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let days = week.as_array().unwrap();
    assert_eq!(days.len(), 7);
    assert_eq!(days[2]["date"], "2026-10-21");
    assert_eq!(days[2]["plan"]["title"], "Push");
    assert_eq!(days[0]["plan"], Value::Null);

    app.json(
        "POST",
        "/api/schedule",
        Some(json!({
            "title": "Lab",
            "start_time": "09:00",
            "end_time": "11:30",
            "event_date": "2026-10-21"
        })),
    )
    .await;

    let (_, entries) = app.json("GET", "/api/schedule?date=2026-10-21", None).await;
    assert_eq!(entries[0]["kind"], "event");
    assert_eq!(entries[0]["start_time"], "09:00:00");
    assert_eq!(entries[0]["color"], "purple");
    assert_eq!(entries[1]["kind"], "gym");
}

#[tokio::test]
async fn bad_query_date_is_rejected() {
    let app = TestApp::new();
    let (status, body) = app
        .json("GET", "/api/gym/planner?start_date=next-week", None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn planner_week_past_calendar_end_is_rejected() {
    let app = TestApp::new();
    let (status, body) = app
        .json("GET", "/api/gym/planner?start_date=%2B262142-12-30", None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn unknown_exercise_in_plan_is_not_found() {
    let app = TestApp::new();
    let (status, _) = app
        .json(
            "PUT",
            "/api/gym/planner",
            Some(json!({"date": "2026-10-19", "exercises": [{"exercise_id": 5}]})),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn basketball_box_score_and_reset() {
    let app = TestApp::new();
    let (status, guard) = app
        .json("POST", "/api/basketball/players", Some(json!({"name": "Guard"})))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    app.json(
        "POST",
        "/api/basketball/shots",
        Some(json!({"x": 0.4, "y": 0.7, "made": true})),
    )
    .await;
    app.json(
        "POST",
        "/api/basketball/shots",
        Some(json!({"x": 0.1, "y": 0.2, "made": false, "player_id": guard["id"]})),
    )
    .await;
    let (status, _) = app
        .json(
            "POST",
            "/api/basketball/tags",
            Some(json!({"time": 31.5, "player_id": guard["id"], "stat_type": "ast"})),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, data) = app.json("GET", "/api/basketball/data", None).await;
    assert_eq!(data["players"].as_array().unwrap().len(), 2);
    assert_eq!(data["tags"][0]["player_name"], "Guard");
    let starter = &data["stats"][0];
    assert_eq!(starter["PTS"], 2);
    assert_eq!(starter["FGA"], 1);
    let bench = &data["stats"][1];
    assert_eq!(bench["FGM"], 0);
    assert_eq!(bench["AST"], 1);

    let (status, summary) = app.json("POST", "/api/reset/basketball", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["section"], "basketball");

    let (_, data) = app.json("GET", "/api/basketball/data", None).await;
    assert_eq!(data["players"], json!([{"id": 1, "name": "Player 1"}]));
    assert_eq!(data["shots"], json!([]));
    assert_eq!(data["tags"], json!([]));
}

#[tokio::test]
async fn shot_for_unknown_player_is_not_found() {
    let app = TestApp::new();
    let (status, _) = app
        .json(
            "POST",
            "/api/basketball/shots",
            Some(json!({"x": 0.4, "y": 0.7, "made": true, "player_id": 12})),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn subjects_reset_clears_everything() {
    let app = TestApp::new();
    let (_, subject) = app
        .json("POST", "/api/subjects", Some(json!({"name": "Anatomy"})))
        .await;
    app.json("POST", &format!("/api/subjects/{}/lectures", subject["id"]), None)
        .await;
    app.json(
        "POST",
        "/api/pomodoro",
        Some(json!({"duration": 600, "subject_id": subject["id"], "lecture_id": 1})),
    )
    .await;

    let (status, summary) = app.json("POST", "/api/reset/subjects", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["deleted"], 3);

    let (_, subjects) = app.json("GET", "/api/subjects", None).await;
    assert_eq!(subjects, json!([]));

    let (_, metrics) = app.json("GET", "/api/dashboard_metrics", None).await;
    assert_eq!(metrics["pomodoro"]["daily"], 0);
}

#[tokio::test]
async fn failed_reset_keeps_every_row() {
    let app = TestApp::new();
    let (_, subject) = app
        .json("POST", "/api/subjects", Some(json!({"name": "Anatomy"})))
        .await;
    app.json("POST", &format!("/api/subjects/{}/lectures", subject["id"]), None)
        .await;
    app.json(
        "POST",
        "/api/pomodoro",
        Some(json!({"duration": 900, "subject_id": subject["id"], "lecture_id": 1})),
    )
    .await;

    // Lectures and logs are deleted first; the subject delete then aborts
    app.execute_sql(
        "CREATE TRIGGER keep_subjects BEFORE DELETE ON subject
         BEGIN SELECT RAISE(ABORT, 'subjects are locked'); END;",
    );

    let (status, body) = app.json("POST", "/api/reset/subjects", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"]["code"], "STORAGE_ERROR");
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("subjects are locked"));

    let (_, subjects) = app.json("GET", "/api/subjects", None).await;
    assert_eq!(subjects[0]["name"], "Anatomy");
    assert_eq!(subjects[0]["lectures"][0]["total_time"], 900);

    let (_, metrics) = app.json("GET", "/api/dashboard_metrics", None).await;
    assert_eq!(metrics["pomodoro"]["daily"], 900);
}
