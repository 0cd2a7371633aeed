use axum::{
    http::{header, HeaderValue, Method},
    routing::get,
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::{DefaultMakeSpan, TraceLayer},
};

use crate::{app_state::AppState, routes};

pub fn create(app_state: AppState, cors_allowed_origin: Option<HeaderValue>) -> Router<()> {
    let api = Router::new()
        .route("/health", get(routes::health::health))
        .nest("/projects", routes::projects::router())
        .nest("/people", routes::people::router())
        .nest("/activities", routes::activities::router())
        .nest("/subtasks", routes::subtasks::router())
        .nest("/rollups", routes::rollups::router());

    let allow_origin = match cors_allowed_origin {
        Some(origin) => AllowOrigin::exact(origin),
        None => AllowOrigin::any(),
    };
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([header::CONTENT_TYPE])
        .allow_origin(allow_origin);

    Router::new()
        .nest("/api", api)
        .fallback(routes::not_found)
        .with_state(app_state)
        .layer(cors)
        .layer(TraceLayer::new_for_http().make_span_with(DefaultMakeSpan::default()))
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        response::Response,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;

    fn app() -> Router {
        create(AppState::in_memory(), None)
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> Response {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        app.clone().oneshot(request).await.unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), 1_000_000)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn create_ok(app: &Router, uri: &str, body: Value) -> Value {
        let response = send(app, Method::POST, uri, Some(body)).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        json_body(response).await
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let response = send(&app(), Method::GET, "/api/health", None).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["status"], "OK");
        assert!(body["timestamp"].is_string());
    }

    #[tokio::test]
    async fn unknown_routes_are_json_404s() {
        let response = send(&app(), Method::GET, "/api/nothing-here", None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(json_body(response).await["error"], "Route not found");
    }

    #[tokio::test]
    async fn project_crud_round_trip() {
        let app = app();
        let created = create_ok(
            &app,
            "/api/projects",
            json!({ "code": "PRJ01", "name": "Portal", "assignees": "Carla, Davi" }),
        )
        .await;
        let id = created["id"].as_i64().unwrap();
        assert_eq!(created["status"], "Ativo");
        assert_eq!(created["assignees"], "Carla, Davi");

        let response = send(
            &app,
            Method::PUT,
            &format!("/api/projects/{id}"),
            Some(json!({ "code": "PRJ01", "name": "Portal do Cliente", "approved": true })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["approved"], true);

        let listed = json_body(send(&app, Method::GET, "/api/projects", None).await).await;
        assert_eq!(listed.as_array().unwrap().len(), 1);
        assert_eq!(listed[0]["name"], "Portal do Cliente");

        let response = send(&app, Method::DELETE, &format!("/api/projects/{id}"), None).await;
        assert_eq!(response.status(), StatusCode::OK);

        let response = send(&app, Method::GET, &format!("/api/projects/{id}"), None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn required_fields_and_duplicates_are_bad_requests() {
        let app = app();

        let response = send(&app, Method::POST, "/api/people", Some(json!({ "code": "P1" }))).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = send(
            &app,
            Method::POST,
            "/api/people",
            Some(json!({ "code": "P1", "name": "  " })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error"], "name is required");

        create_ok(&app, "/api/people", json!({ "code": "P1", "name": "Ana" })).await;
        let response = send(
            &app,
            Method::POST,
            "/api/people",
            Some(json!({ "code": "P1", "name": "Outra Ana" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["code"], "DUPLICATE_CODE");
    }

    #[tokio::test]
    async fn activities_get_derived_fields_server_side() {
        let app = app();
        create_ok(&app, "/api/projects", json!({ "code": "PRJ01", "name": "Portal" })).await;

        let created = create_ok(
            &app,
            "/api/activities",
            json!({
                "code": "AT1",
                "task": "Levantamento",
                "projectCode": "PRJ01",
                "startDate": "10/01/2024",
                "durationDays": 5,
                "plannedHours": 1,
                "status": "Completed"
            }),
        )
        .await;

        assert_eq!(created["projectKey"], "PRJ01");
        assert_eq!(created["dueDate"], "2024-01-15");
        assert_eq!(created["plannedHours"], 35);
        assert_eq!(created["hoursVariance"], -35);
        assert_eq!(created["status"], "NotStarted");
    }

    #[tokio::test]
    async fn field_update_recomputes_dependents() {
        let app = app();
        let created = create_ok(
            &app,
            "/api/activities",
            json!({ "code": "AT1", "task": "Levantamento", "startDate": "2024-01-10" }),
        )
        .await;
        let id = created["id"].as_i64().unwrap();
        let uri = format!("/api/activities/{id}");

        let response = send(
            &app,
            Method::PATCH,
            &uri,
            Some(json!({ "recordId": id, "field": "durationDays", "value": 10 })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let updated = json_body(response).await;
        assert_eq!(updated["plannedHours"], 70);
        assert_eq!(updated["dueDate"], "2024-01-20");

        let response = send(
            &app,
            Method::PATCH,
            &uri,
            Some(json!({ "field": "progressPercent", "value": -1 })),
        )
        .await;
        assert_eq!(json_body(response).await["status"], "Cancelled");

        let response = send(
            &app,
            Method::PATCH,
            &uri,
            Some(json!({ "field": "dueDate", "value": "2024-02-01" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = send(
            &app,
            Method::PATCH,
            &uri,
            Some(json!({ "recordId": id + 1, "field": "notes", "value": "x" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn project_delete_conflicts_with_linked_activities() {
        let app = app();
        let project = create_ok(&app, "/api/projects", json!({ "code": "PRJ01", "name": "Portal" })).await;
        create_ok(
            &app,
            "/api/activities",
            json!({ "code": "AT1", "task": "t", "projectCode": "PRJ01" }),
        )
        .await;

        let response = send(
            &app,
            Method::DELETE,
            &format!("/api/projects/{}", project["id"]),
            None,
        )
        .await;
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn subtasks_need_an_existing_activity() {
        let app = app();
        let response = send(
            &app,
            Method::POST,
            "/api/subtasks",
            Some(json!({ "code": "ST1", "activityId": 99, "name": "passo" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let activity = create_ok(&app, "/api/activities", json!({ "code": "AT1", "task": "t" })).await;
        let activity_id = activity["id"].as_i64().unwrap();
        let subtask = create_ok(
            &app,
            "/api/subtasks",
            json!({ "code": "ST1", "activityId": activity_id, "name": "passo" }),
        )
        .await;
        assert_eq!(subtask["status"], "Pendente");

        let listed = json_body(
            send(&app, Method::GET, &format!("/api/subtasks/activity/{activity_id}"), None).await,
        )
        .await;
        assert_eq!(listed.as_array().unwrap().len(), 1);

        send(&app, Method::DELETE, &format!("/api/activities/{activity_id}"), None).await;
        let listed = json_body(send(&app, Method::GET, "/api/subtasks", None).await).await;
        assert!(listed.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn stateless_rollups_aggregate_the_request() {
        let app = app();
        let body = json!({
            "projects": [{ "code": "PRJ01", "name": "Portal" }],
            "activities": [
                { "code": "A1", "projectCode": "PRJ01", "progressPercent": 100,
                  "status": "Completed", "assignees": "Ana, Bruno" },
                { "code": "A2", "projectCode": "PRJ01", "progressPercent": 50,
                  "status": "InProgress", "assignees": "Ana" }
            ]
        });

        let response = send(&app, Method::POST, "/api/rollups/projects", Some(body.clone())).await;
        assert_eq!(response.status(), StatusCode::OK);
        let stats = json_body(response).await;
        assert_eq!(stats["PRJ01"]["totalActivities"], 2);
        assert_eq!(stats["PRJ01"]["completedCount"], 1);
        assert_eq!(stats["PRJ01"]["inProgressCount"], 1);
        assert_eq!(stats["PRJ01"]["averageProgressPercent"], 75);

        let stats = json_body(send(&app, Method::POST, "/api/rollups/assignees", Some(body)).await).await;
        assert_eq!(stats["Ana"]["taskCount"], 2);
        assert_eq!(stats["Bruno"]["completedCount"], 1);
    }

    #[tokio::test]
    async fn stateless_rollups_recompute_posted_derived_fields() {
        let app = app();
        let body = json!({
            "projects": [{ "code": "PRJ01", "name": "Portal" }],
            "activities": [
                { "code": "A1", "projectCode": "PRJ01", "progressPercent": 100,
                  "durationDays": 2, "assignees": "Ana" },
                { "code": "A2", "projectCode": "PRJ01", "progressPercent": 0,
                  "status": "Completed", "plannedHours": 500, "assignees": "Ana" }
            ]
        });

        let stats = json_body(
            send(&app, Method::POST, "/api/rollups/projects", Some(body.clone())).await,
        )
        .await;
        assert_eq!(stats["PRJ01"]["completedCount"], 1);
        assert_eq!(stats["PRJ01"]["notStartedCount"], 1);
        assert_eq!(stats["PRJ01"]["totalPlannedHours"], 14 + 35);
        assert_eq!(stats["PRJ01"]["averageProgressPercent"], 50);

        let stats = json_body(send(&app, Method::POST, "/api/rollups/assignees", Some(body)).await).await;
        assert_eq!(stats["Ana"]["completedCount"], 1);
    }

    #[tokio::test]
    async fn project_code_change_is_refused_while_activities_are_linked() {
        let app = app();
        let project = create_ok(&app, "/api/projects", json!({ "code": "PRJ01", "name": "Portal" })).await;
        let activity = create_ok(
            &app,
            "/api/activities",
            json!({ "code": "AT1", "task": "t", "projectCode": "PRJ01" }),
        )
        .await;
        assert_eq!(activity["projectKey"], "PRJ01");
        let uri = format!("/api/projects/{}", project["id"]);

        let response = send(
            &app,
            Method::PUT,
            &uri,
            Some(json!({ "code": "PRJ99", "name": "Portal" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CONFLICT);
        assert_eq!(json_body(response).await["code"], "LINKED_ACTIVITIES");

        let stats = json_body(send(&app, Method::GET, "/api/rollups/projects", None).await).await;
        assert_eq!(stats["PRJ01"]["totalActivities"], 1);

        let response = send(&app, Method::DELETE, &uri, None).await;
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let response = send(
            &app,
            Method::PUT,
            &uri,
            Some(json!({ "code": "PRJ01", "name": "Portal do Cliente" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn overview_reads_stored_data_with_filters() {
        let app = app();
        create_ok(
            &app,
            "/api/projects",
            json!({ "code": "PRJ01", "name": "Portal", "assignees": "Carla" }),
        )
        .await;
        for (code, assignees) in [("A1", "Ana"), ("A2", "Bruno")] {
            create_ok(
                &app,
                "/api/activities",
                json!({ "code": code, "task": "t", "projectCode": "PRJ01",
                        "projectName": "Portal", "assignees": assignees }),
            )
            .await;
        }

        let all = json_body(send(&app, Method::GET, "/api/rollups/overview", None).await).await;
        assert_eq!(all["totalActivities"], 2);
        assert_eq!(all["byProjectOwner"]["Carla"]["taskCount"], 2);

        let filtered = json_body(
            send(&app, Method::GET, "/api/rollups/overview?assignee=bru&status=NotStarted", None)
                .await,
        )
        .await;
        assert_eq!(filtered["totalActivities"], 1);
        assert_eq!(filtered["byAssignee"]["Bruno"]["taskCount"], 1);

        let owners = json_body(send(&app, Method::GET, "/api/rollups/project-owners", None).await).await;
        assert_eq!(owners["Carla"]["projectCount"], 1);
    }
}
