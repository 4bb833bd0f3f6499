use crate::webserver::state::AppState;
use axum::Router;
use std::sync::Arc;

pub mod devices;
pub mod import;
pub mod pages;
pub mod status;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(pages::routes())
        .nest("/api", api_routes())
        .with_state(state)
}

fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .merge(status::routes())
        .nest("/devices", devices::routes())
        .nest("/import", import::routes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::devices::{DeviceGateway, DeviceInput, DeviceQuery, DeviceStore};
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use axum::response::Response;
    use serde_json::Value;
    use tower::ServiceExt;

    const BOUNDARY: &str = "netregistry-test-boundary";

    fn test_app() -> (Router, Arc<DeviceStore>) {
        let store = Arc::new(DeviceStore::open_in_memory().unwrap());
        let state = Arc::new(AppState::new(store.clone(), Config::default()));
        (create_router(state), store)
    }

    fn form_post(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn multipart_post(uri: &str, csv: &str) -> Request<Body> {
        let body = format!(
            "--{b}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"devices.csv\"\r\n\
             Content-Type: text/csv\r\n\r\n{csv}\r\n--{b}--\r\n",
            b = BOUNDARY,
            csv = csv
        );
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn body_text(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    async fn body_json(response: Response) -> Value {
        serde_json::from_str(&body_text(response).await).unwrap()
    }

    #[tokio::test]
    async fn test_register_then_search_page() {
        let (app, _store) = test_app();

        let response = app
            .clone()
            .oneshot(form_post(
                "/devices",
                "ip_address=10.0.0.5&mac_address=AA%3ABB%3ACC%3ADD%3AEE%3AFF&name=Printer",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("Printer registered successfully"));
        assert!(html.contains(r#"name="ip_address" value="""#));

        let response = app
            .clone()
            .oneshot(Request::get("/?q=PRINT").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains(r#"value="10.0.0.5""#));
        assert!(html.contains("/devices/1/update"));
    }

    #[tokio::test]
    async fn test_register_errors_keep_form_values() {
        let (app, store) = test_app();
        store
            .create(&DeviceInput::new("10.0.0.5", "AA:BB:CC:DD:EE:FF", "Printer"))
            .unwrap();

        let response = app
            .clone()
            .oneshot(form_post(
                "/devices",
                "ip_address=10.0.0.5&mac_address=11%3A22%3A33%3A44%3A55%3A66&name=Laptop",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
        let html = body_text(response).await;
        assert!(html.contains("already registered"));
        assert!(html.contains(r#"value="Laptop""#));

        let response = app
            .clone()
            .oneshot(form_post(
                "/devices",
                "ip_address=192.168.0.256&mac_address=11%3A22%3A33%3A44%3A55%3A66&name=Laptop",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(store.count().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_update_and_delete_pages() {
        let (app, store) = test_app();
        let id = store
            .create(&DeviceInput::new("10.0.0.5", "AA:BB:CC:DD:EE:FF", "Printer"))
            .unwrap();

        let response = app
            .clone()
            .oneshot(form_post(
                &format!("/devices/{}/update", id),
                "ip_address=10.0.0.6&mac_address=AA%3ABB%3ACC%3ADD%3AEE%3AFF&name=Printer+2&q=printer",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(store.get(id).unwrap().unwrap().ip_address, "10.0.0.6");

        let response = app
            .clone()
            .oneshot(form_post(
                "/devices/99/update",
                "ip_address=10.0.0.7&mac_address=AA%3ABB%3ACC%3ADD%3AEE%3A00&name=x",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        for _ in 0..2 {
            let response = app
                .clone()
                .oneshot(form_post(&format!("/devices/{}/delete", id), "q="))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }
        assert_eq!(store.count().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_rejected_edit_keeps_submitted_values() {
        let (app, store) = test_app();
        let id = store
            .create(&DeviceInput::new("10.0.0.5", "AA:BB:CC:DD:EE:FF", "Printer"))
            .unwrap();

        let response = app
            .clone()
            .oneshot(form_post(
                &format!("/devices/{}/update", id),
                "ip_address=10.0.0.999&mac_address=AA%3ABB%3ACC%3ADD%3AEE%3AFF&name=Printer+2&q=printer",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let html = body_text(response).await;
        assert!(html.contains(r#"value="10.0.0.999""#));
        assert!(html.contains(r#"value="Printer 2""#));
        assert_eq!(store.get(id).unwrap().unwrap().ip_address, "10.0.0.5");
    }

    #[tokio::test]
    async fn test_delete_by_ip_page() {
        let (app, store) = test_app();
        store
            .create(&DeviceInput::new("10.0.0.5", "AA:BB:CC:DD:EE:FF", "Printer"))
            .unwrap();

        let response = app
            .clone()
            .oneshot(form_post("/devices/delete-by-ip", "ip_address=+10.0.0.5+"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(store.count().unwrap(), 0);

        let response = app
            .clone()
            .oneshot(form_post("/devices/delete-by-ip", "ip_address="))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_show_all_lists_newest_first() {
        let (app, store) = test_app();
        store
            .create(&DeviceInput::new("10.0.0.1", "00:00:00:00:00:01", "older-device"))
            .unwrap();
        store
            .create(&DeviceInput::new("10.0.0.2", "00:00:00:00:00:02", "newer-device"))
            .unwrap();

        let response = app
            .oneshot(Request::get("/?all=1").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let html = body_text(response).await;
        let newer = html.find("newer-device").unwrap();
        let older = html.find("older-device").unwrap();
        assert!(newer < older);
    }

    #[tokio::test]
    async fn test_upload_import_page() {
        let (app, store) = test_app();

        let response = app
            .clone()
            .oneshot(multipart_post(
                "/import/upload",
                "IP;MAC;Nome\n10.0.0.1;00:00:00:00:00:01;alpha\n10.0.0.2;bad;beta\n",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("1 of 2 row(s) imported"));
        assert_eq!(store.count().unwrap(), 1);

        let response = app
            .clone()
            .oneshot(multipart_post(
                "/import/upload",
                "Endereco_IP,MAC,Nome\n10.0.0.3,00:00:00:00:00:03,gamma\n",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(store.count().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_api_device_lifecycle() {
        let (app, _store) = test_app();

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/devices",
                serde_json::json!({
                    "ip_address": "10.0.0.5",
                    "mac_address": "AA:BB:CC:DD:EE:FF",
                    "name": "Printer"
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["success"], true);
        let id = json["data"]["id"].as_i64().unwrap();

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/devices",
                serde_json::json!({
                    "ip_address": "10.0.0.6",
                    "mac_address": "aa:bb:cc:dd:ee:ff",
                    "name": "Copy"
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
        let json = body_json(response).await;
        assert_eq!(json["success"], false);
        assert_eq!(json["error"]["code"], "DUPLICATE");
        assert_eq!(json["error"]["details"], "MAC address");

        let response = app
            .clone()
            .oneshot(json_request(
                "PUT",
                &format!("/api/devices/{}", id),
                serde_json::json!({
                    "ip_address": "10.0.0.9",
                    "mac_address": "AA:BB:CC:DD:EE:FF",
                    "name": "Printer"
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .clone()
            .oneshot(
                Request::get("/api/devices?q=10.0.0.9")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let json = body_json(response).await;
        assert_eq!(json["data"]["total"], 1);

        let response = app
            .clone()
            .oneshot(
                Request::delete("/api/devices/by-ip/10.0.0.9")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let json = body_json(response).await;
        assert_eq!(json["data"]["removed"], true);

        let response = app
            .clone()
            .oneshot(
                Request::get(format!("/api/devices/{}", id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_api_export_and_import() {
        let (app, store) = test_app();
        store
            .create(&DeviceInput::new("10.0.0.1", "00:00:00:00:00:01", "alpha"))
            .unwrap();

        let response = app
            .clone()
            .oneshot(
                Request::get("/api/devices/export")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response
            .headers()
            .get(header::CONTENT_DISPOSITION)
            .unwrap()
            .to_str()
            .unwrap()
            .starts_with("attachment"));
        let csv = body_text(response).await;

        let (fresh_app, fresh_store) = test_app();
        let response = fresh_app
            .oneshot(multipart_post("/api/import", &csv))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["data"]["inserted"], 1);
        assert_eq!(
            fresh_store.list(&DeviceQuery::all()).unwrap()[0].name,
            "alpha"
        );
    }

    #[tokio::test]
    async fn test_api_url_import_from_local_server() {
        let source = Router::new().route(
            "/devices.csv",
            axum::routing::get(|| async {
                "ip,mac,name\n10.0.0.1,00:00:00:00:00:01,alpha\n10.0.0.1,00:00:00:00:00:02,dup\n"
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, source).await.unwrap();
        });

        let (app, store) = test_app();
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/import/url",
                serde_json::json!({ "url": format!("http://{}/devices.csv", addr) }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["data"]["inserted"], 1);
        assert_eq!(json["data"]["skipped_duplicates"], 1);
        assert_eq!(store.count().unwrap(), 1);

        let response = app
            .oneshot(json_request(
                "POST",
                "/api/import/url",
                serde_json::json!({ "url": format!("http://{}/missing.csv", addr) }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn test_health() {
        let (app, _store) = test_app();
        let response = app
            .oneshot(Request::get("/api/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let json = body_json(response).await;
        assert_eq!(json["data"]["status"], "ok");
        assert_eq!(json["data"]["mac_policy"], "strict");
    }
}
