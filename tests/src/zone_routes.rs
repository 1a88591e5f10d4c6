use actix_web::{http::StatusCode, test};
use serde_json::{json, Value};
use tracks::TrackConfig;

use crate::fixture::{app, Fixture};

#[actix_web::test]
async fn save_then_load_round_trips() {
    let fixture = Fixture::new(TrackConfig::default());
    let app = app!(fixture);
    let polygons = json!({"polygons": [[0, 0], [1, 1]]});

    let req = test::TestRequest::post()
        .uri("/save_zones")
        .set_json(json!({ "zones": polygons }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({"status": "success", "file": "camera_zone_1"}));

    let req = test::TestRequest::get()
        .uri("/load_zone/camera_zone_1")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "zones": polygons }));

    assert!(fixture.dir.path().join("camera_zones/camera_zone_1.json").is_file());
}

#[actix_web::test]
async fn saved_zones_lists_every_record_once() {
    let fixture = Fixture::new(TrackConfig::default());
    let app = app!(fixture);

    let mut files = Vec::new();
    for zones in [json!([[1, 2]]), json!([[3, 4]])] {
        let req = test::TestRequest::post()
            .uri("/save_zones")
            .set_json(json!({ "zones": zones }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        files.push(body["file"].clone());
    }
    assert_ne!(files[0], files[1]);

    let req = test::TestRequest::get().uri("/get_saved_zones").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body, json!({ "files": files }));
}

#[actix_web::test]
async fn delete_then_load_is_404() {
    let fixture = Fixture::new(TrackConfig::default());
    let app = app!(fixture);

    let req = test::TestRequest::post()
        .uri("/save_zones")
        .set_json(json!({"zones": {"a": [1]}}))
        .to_request();
    let saved: Value = test::call_and_read_body_json(&app, req).await;
    let file = saved["file"].as_str().unwrap().to_string();

    let req = test::TestRequest::delete()
        .uri(&format!("/delete_zone/{file}"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({"success": true}));

    let req = test::TestRequest::get()
        .uri(&format!("/load_zone/{file}"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({"error": "File not found"}));

    let req = test::TestRequest::delete()
        .uri(&format!("/delete_zone/{file}"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({"success": false, "error": "File not found"}));
}

#[actix_web::test]
async fn names_keep_growing_after_deletes() {
    let fixture = Fixture::new(TrackConfig::default());
    let app = app!(fixture);

    let mut names = Vec::new();
    for _ in 0..2 {
        let req = test::TestRequest::post()
            .uri("/save_zones")
            .set_json(json!({"zones": []}))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        names.push(body["file"].as_str().unwrap().to_string());
    }
    let req = test::TestRequest::delete()
        .uri(&format!("/delete_zone/{}", names[0]))
        .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::post()
        .uri("/save_zones")
        .set_json(json!({"zones": []}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["file"], "camera_zone_3");
}

#[actix_web::test]
async fn file_names_with_extension_still_load() {
    let fixture = Fixture::new(TrackConfig::default());
    let app = app!(fixture);

    let req = test::TestRequest::post()
        .uri("/save_zones")
        .set_json(json!({"zones": [[45.5, -122.6]]}))
        .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::get()
        .uri("/load_zone/camera_zone_1.json")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body, json!({"zones": [[45.5, -122.6]]}));
}

#[actix_web::test]
async fn malformed_save_bodies_are_400() {
    let fixture = Fixture::new(TrackConfig::default());
    let app = app!(fixture);

    let bodies = [json!({"polygons": []}), json!({"zones": null}), json!([1, 2])];
    for body in bodies {
        let req = test::TestRequest::post()
            .uri("/save_zones")
            .set_json(&body)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{body}");
        let err: Value = test::read_body_json(resp).await;
        assert!(err["error"].is_string(), "{body}");
    }

    let req = test::TestRequest::post()
        .uri("/save_zones")
        .insert_header(("content-type", "application/json"))
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // nothing was written
    let req = test::TestRequest::get().uri("/get_saved_zones").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body, json!({"files": []}));
}

#[actix_web::test]
async fn corrupt_record_is_500() {
    let fixture = Fixture::new(TrackConfig::default());
    std::fs::write(fixture.store.dir().join("camera_zone_1.json"), "[[0, 0], [1").unwrap();
    let app = app!(fixture);

    let req = test::TestRequest::get()
        .uri("/load_zone/camera_zone_1")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["error"].as_str().unwrap().contains("camera_zone_1"));
}

#[actix_web::test]
async fn names_that_escape_the_directory_are_400() {
    let fixture = Fixture::new(TrackConfig::default());
    std::fs::write(fixture.dir.path().join("secret.json"), "{}").unwrap();
    let app = app!(fixture);

    let req = test::TestRequest::get()
        .uri("/load_zone/..%2Fsecret")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::delete()
        .uri("/delete_zone/..%2Fsecret")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
    assert!(fixture.dir.path().join("secret.json").exists());
}
