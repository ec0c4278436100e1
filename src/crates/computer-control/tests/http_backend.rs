use computer_control::{
    ActionDispatcher, ActionRequest, BackendError, ComputerAction, ComputerBackend,
    HttpBackendConfig, HttpComputerBackend,
};
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn setup() -> (MockServer, HttpComputerBackend) {
    let server = MockServer::start().await;
    let backend = HttpComputerBackend::new(HttpBackendConfig::new(server.uri())).unwrap();
    (server, backend)
}

#[tokio::test]
async fn test_execute_success() {
    let (server, backend) = setup().await;

    Mock::given(method("POST"))
        .and(path("/execute"))
        .and(body_json(json!({"action": "mouse_move", "coordinate": [100, 200]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "output": "Moved mouse to (100, 200)",
            "base64_image": "iVBORw0KGgo="
        })))
        .expect(1)
        .mount(&server)
        .await;

    let out = backend
        .execute(ActionRequest::new(ComputerAction::MouseMove).with_coordinate(100, 200))
        .await
        .unwrap();

    assert_eq!(out.output.as_deref(), Some("Moved mouse to (100, 200)"));
    assert_eq!(out.base64_image.as_deref(), Some("iVBORw0KGgo="));
}

#[tokio::test]
async fn test_error_field_is_operational() {
    let (server, backend) = setup().await;

    Mock::given(method("POST"))
        .and(path("/execute"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"error": "Invalid key: Foo"})))
        .mount(&server)
        .await;

    let err = backend
        .execute(ActionRequest::new(ComputerAction::Key).with_text("Foo"))
        .await
        .unwrap_err();

    assert_eq!(err, BackendError::Operational("Invalid key: Foo".to_string()));
}

#[tokio::test]
async fn test_client_error_is_operational() {
    let (server, backend) = setup().await;

    Mock::given(method("POST"))
        .and(path("/execute"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({"message": "coordinate out of range"})))
        .mount(&server)
        .await;

    let err = backend
        .execute(ActionRequest::new(ComputerAction::LeftClickDrag).with_coordinate(-1, -1))
        .await
        .unwrap_err();

    assert_eq!(err, BackendError::Operational("coordinate out of range".to_string()));
}

#[tokio::test]
async fn test_server_error_is_unexpected() {
    let (server, backend) = setup().await;

    Mock::given(method("POST"))
        .and(path("/execute"))
        .respond_with(ResponseTemplate::new(500).set_body_string("pyautogui crashed"))
        .mount(&server)
        .await;

    let err = backend
        .execute(ActionRequest::new(ComputerAction::Wait))
        .await
        .unwrap_err();

    assert!(!err.is_operational());
    assert!(err.to_string().contains("pyautogui crashed"));
}

#[tokio::test]
async fn test_undecodable_body_is_unexpected() {
    let (server, backend) = setup().await;

    Mock::given(method("POST"))
        .and(path("/execute"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>proxy</html>"))
        .mount(&server)
        .await;

    let err = backend
        .execute(ActionRequest::new(ComputerAction::CursorPosition))
        .await
        .unwrap_err();

    assert!(matches!(err, BackendError::Unexpected(_)));
}

#[tokio::test]
async fn test_dispatcher_over_http() {
    let (server, backend) = setup().await;

    Mock::given(method("POST"))
        .and(path("/execute"))
        .and(body_json(json!({"action": "double_click"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"output": "Double clicked"})))
        .expect(1)
        .mount(&server)
        .await;

    let dispatcher = ActionDispatcher::new(Arc::new(backend));
    let result = dispatcher
        .mouse_click(&json!({"button": "Left", "click_type": "DOUBLE"}))
        .await;

    assert_eq!(
        serde_json::to_value(&result).unwrap(),
        json!({"status": "success", "output": "Double clicked"})
    );
}
