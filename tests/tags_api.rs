mod support;

use actix_web::http::StatusCode;
use actix_web::test;
use serde_json::{json, Value};

use support::{bearer, seed_tag, seed_task, seed_user, state};
use todo_backend::models::TaskStatus;
use todo_backend::storage::Storage;

#[actix_web::test]
async fn create_attaches_a_trimmed_tag_to_the_task() {
    let state = state();
    let app = init_app!(state);
    let (ada, token) = seed_user(&state, "ada@example.com").await;
    let task = seed_task(&state, &ada, TaskStatus::Todo, 60).await;

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/tasks/{}/tags", task.task_id))
            .insert_header(bearer(&token))
            .set_json(json!({ "name": "  deep work  ", "color": "#ff8800" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let tag: Value = test::read_body_json(resp).await;
    assert_eq!(tag["name"], "deep work");
    assert_eq!(tag["color"], "#ff8800");
    assert_eq!(tag["task_id"], task.task_id.as_str());
    assert!(tag["created_at"].is_string());

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/tasks/{}/tags", task.task_id))
            .insert_header(bearer(&token))
            .set_json(json!({ "name": "colorless" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let tag: Value = test::read_body_json(resp).await;
    assert!(tag["color"].is_null());
}

#[actix_web::test]
async fn create_requires_an_existing_owned_task() {
    let state = state();
    let app = init_app!(state);
    let (ada, _ada_token) = seed_user(&state, "ada@example.com").await;
    let (_bob, bob_token) = seed_user(&state, "bob@example.com").await;
    let task = seed_task(&state, &ada, TaskStatus::Todo, 60).await;

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/tasks/missing-id/tags")
            .insert_header(bearer(&bob_token))
            .set_json(json!({ "name": "work" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Task not found");

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/tasks/{}/tags", task.task_id))
            .insert_header(bearer(&bob_token))
            .set_json(json!({ "name": "work" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Not authorized to add tags to this task");
}

#[actix_web::test]
async fn create_validates_name_and_color() {
    let state = state();
    let app = init_app!(state);
    let (ada, token) = seed_user(&state, "ada@example.com").await;
    let task = seed_task(&state, &ada, TaskStatus::Todo, 60).await;
    let uri = format!("/tasks/{}/tags", task.task_id);

    let too_long = "n".repeat(51);
    for bad_name in ["", "   ", too_long.as_str()] {
        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri(&uri)
                .insert_header(bearer(&token))
                .set_json(json!({ "name": bad_name }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Invalid tag name. Must be 1-50 characters.");
    }

    for bad_color in ["red", "#12345", "123456", "#ggg"] {
        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri(&uri)
                .insert_header(bearer(&token))
                .set_json(json!({ "name": "work", "color": bad_color }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "color {}", bad_color);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(
            body["error"],
            "Invalid color. Must be a valid hex color (e.g., #FF0000)."
        );
    }

    // Shorthand hex is accepted.
    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&uri)
            .insert_header(bearer(&token))
            .set_json(json!({ "name": "work", "color": "#abc" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn listing_returns_tags_in_creation_order() {
    let state = state();
    let app = init_app!(state);
    let (ada, token) = seed_user(&state, "ada@example.com").await;
    let task = seed_task(&state, &ada, TaskStatus::Todo, 600).await;
    seed_tag(&state, &task, "first", 30).await;
    seed_tag(&state, &task, "second", 20).await;
    seed_tag(&state, &task, "third", 10).await;

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/tasks/{}/tags", task.task_id))
            .insert_header(bearer(&token))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let tags: Value = test::read_body_json(resp).await;
    let names: Vec<&str> = tags
        .as_array()
        .expect("array")
        .iter()
        .map(|t| t["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["first", "second", "third"]);
}

#[actix_web::test]
async fn listing_tags_for_a_foreign_task_is_forbidden() {
    let state = state();
    let app = init_app!(state);
    let (ada, _ada_token) = seed_user(&state, "ada@example.com").await;
    let (_bob, bob_token) = seed_user(&state, "bob@example.com").await;
    let task = seed_task(&state, &ada, TaskStatus::Todo, 60).await;

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/tasks/{}/tags", task.task_id))
            .insert_header(bearer(&bob_token))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Not authorized to view tags for this task");
}

#[actix_web::test]
async fn names_are_distinct_sorted_and_scoped() {
    let state = state();
    let app = init_app!(state);
    let (ada, token) = seed_user(&state, "ada@example.com").await;
    let (bob, _) = seed_user(&state, "bob@example.com").await;

    let errands = seed_task(&state, &ada, TaskStatus::Todo, 120).await;
    let chores = seed_task(&state, &ada, TaskStatus::Todo, 60).await;
    seed_tag(&state, &errands, "work", 40).await;
    seed_tag(&state, &errands, "urgent", 30).await;
    seed_tag(&state, &chores, "work", 20).await;

    let foreign = seed_task(&state, &bob, TaskStatus::Todo, 60).await;
    seed_tag(&state, &foreign, "zeta", 10).await;

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/tags/names")
            .insert_header(bearer(&token))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let names: Value = test::read_body_json(resp).await;
    assert_eq!(names, json!(["urgent", "work"]));
}

#[actix_web::test]
async fn update_renames_and_recolors() {
    let state = state();
    let app = init_app!(state);
    let (ada, token) = seed_user(&state, "ada@example.com").await;
    let task = seed_task(&state, &ada, TaskStatus::Todo, 60).await;
    let tag = seed_tag(&state, &task, "work", 30).await;

    let resp = test::call_service(
        &app,
        test::TestRequest::put()
            .uri(&format!("/tags/{}", tag.tag_id))
            .insert_header(bearer(&token))
            .set_json(json!({ "name": "  focus  ", "color": "#00ff00" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Value = test::read_body_json(resp).await;
    assert_eq!(updated["tag_id"], tag.tag_id.as_str());
    assert_eq!(updated["name"], "focus");
    assert_eq!(updated["color"], "#00ff00");
}

#[actix_web::test]
async fn update_keeps_omitted_fields() {
    let state = state();
    let app = init_app!(state);
    let (ada, token) = seed_user(&state, "ada@example.com").await;
    let task = seed_task(&state, &ada, TaskStatus::Todo, 60).await;

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/tasks/{}/tags", task.task_id))
            .insert_header(bearer(&token))
            .set_json(json!({ "name": "work", "color": "#111111" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let tag: Value = test::read_body_json(resp).await;
    let tag_id = tag["tag_id"].as_str().unwrap();

    let resp = test::call_service(
        &app,
        test::TestRequest::put()
            .uri(&format!("/tags/{}", tag_id))
            .insert_header(bearer(&token))
            .set_json(json!({ "name": "renamed" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Value = test::read_body_json(resp).await;
    assert_eq!(updated["name"], "renamed");
    assert_eq!(updated["color"], "#111111");
}

#[actix_web::test]
async fn update_enforces_ownership_and_existence() {
    let state = state();
    let app = init_app!(state);
    let (ada, ada_token) = seed_user(&state, "ada@example.com").await;
    let (_bob, bob_token) = seed_user(&state, "bob@example.com").await;
    let task = seed_task(&state, &ada, TaskStatus::Todo, 60).await;
    let tag = seed_tag(&state, &task, "work", 30).await;

    let resp = test::call_service(
        &app,
        test::TestRequest::put()
            .uri("/tags/missing-id")
            .insert_header(bearer(&ada_token))
            .set_json(json!({ "name": "renamed" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Tag not found");

    let resp = test::call_service(
        &app,
        test::TestRequest::put()
            .uri(&format!("/tags/{}", tag.tag_id))
            .insert_header(bearer(&bob_token))
            .set_json(json!({ "name": "hijacked" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Not authorized to update this tag");

    let stored = state.storage.tag_by_id(&tag.tag_id).await.unwrap().unwrap();
    assert_eq!(stored.name, "work");
}

#[actix_web::test]
async fn update_validates_fields_when_present() {
    let state = state();
    let app = init_app!(state);
    let (ada, token) = seed_user(&state, "ada@example.com").await;
    let task = seed_task(&state, &ada, TaskStatus::Todo, 60).await;
    let tag = seed_tag(&state, &task, "work", 30).await;

    let resp = test::call_service(
        &app,
        test::TestRequest::put()
            .uri(&format!("/tags/{}", tag.tag_id))
            .insert_header(bearer(&token))
            .set_json(json!({ "color": "nope" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(
        body["error"],
        "Invalid color. Must be a valid hex color (e.g., #FF0000)."
    );
}

#[actix_web::test]
async fn delete_removes_the_tag_but_not_the_task() {
    let state = state();
    let app = init_app!(state);
    let (ada, token) = seed_user(&state, "ada@example.com").await;
    let task = seed_task(&state, &ada, TaskStatus::Todo, 60).await;
    let tag = seed_tag(&state, &task, "work", 30).await;

    let resp = test::call_service(
        &app,
        test::TestRequest::delete()
            .uri(&format!("/tags/{}", tag.tag_id))
            .insert_header(bearer(&token))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = test::read_body(resp).await;
    assert_eq!(body, "Tag deleted successfully");

    assert!(state
        .storage
        .tag_by_id(&tag.tag_id)
        .await
        .unwrap()
        .is_none());
    assert!(state
        .storage
        .task_by_id(&task.task_id)
        .await
        .unwrap()
        .is_some());
}

#[actix_web::test]
async fn delete_by_a_non_owner_is_forbidden() {
    let state = state();
    let app = init_app!(state);
    let (ada, _ada_token) = seed_user(&state, "ada@example.com").await;
    let (_bob, bob_token) = seed_user(&state, "bob@example.com").await;
    let task = seed_task(&state, &ada, TaskStatus::Todo, 60).await;
    let tag = seed_tag(&state, &task, "work", 30).await;

    let resp = test::call_service(
        &app,
        test::TestRequest::delete()
            .uri(&format!("/tags/{}", tag.tag_id))
            .insert_header(bearer(&bob_token))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Not authorized to delete this tag");
    assert!(state
        .storage
        .tag_by_id(&tag.tag_id)
        .await
        .unwrap()
        .is_some());
}

#[actix_web::test]
async fn tag_routes_require_authentication() {
    let state = state();
    let app = init_app!(state);

    let resp =
        test::call_service(&app, test::TestRequest::get().uri("/tags/names").to_request()).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Not authenticated");
}
