use courier_engine::{
    is_channel_admin, parse_buttons, ApiError, BotApi, CopyOutcome, TelegramBotApi,
};
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TOKEN: &str = "123:testtoken";

fn api_for(server: &MockServer) -> TelegramBotApi {
    let base = Url::parse(&server.uri()).expect("mock server uri");
    TelegramBotApi::with_base_url(TOKEN, base)
}

#[tokio::test]
async fn copy_success_carries_the_new_message_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("/bot{TOKEN}/copyMessage")))
        .and(body_partial_json(json!({
            "chat_id": -1002,
            "from_chat_id": -1001,
            "message_id": 5,
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ok": true,
            "result": { "message_id": 777 },
        })))
        .mount(&server)
        .await;

    let api = api_for(&server);
    let outcome = api.copy_one(-1002, -1001, 5, None, None).await;
    assert_eq!(outcome, CopyOutcome::Success { new_message_id: 777 });
}

#[tokio::test]
async fn override_caption_and_markup_ride_the_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("/bot{TOKEN}/copyMessage")))
        .and(body_partial_json(json!({
            "caption": "cleaned",
            "parse_mode": "HTML",
            "reply_markup": {
                "inline_keyboard": [[{ "text": "Join", "url": "https://t.example" }]],
            },
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ok": true,
            "result": { "message_id": 1 },
        })))
        .mount(&server)
        .await;

    let api = api_for(&server).with_parse_mode("HTML");
    let markup = parse_buttons("[Join](https://t.example)").unwrap();
    let outcome = api
        .copy_one(-1002, -1001, 9, Some("cleaned"), Some(&markup))
        .await;
    assert_eq!(outcome, CopyOutcome::Success { new_message_id: 1 });
}

#[tokio::test]
async fn rate_limit_hint_is_taken_verbatim() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("/bot{TOKEN}/copyMessage")))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "ok": false,
            "error_code": 429,
            "description": "Too Many Requests: retry after 7",
            "parameters": { "retry_after": 7 },
        })))
        .mount(&server)
        .await;

    let api = api_for(&server);
    let outcome = api.copy_one(-1002, -1001, 5, None, None).await;
    assert_eq!(outcome, CopyOutcome::RateLimited { retry_after_secs: 7 });
}

#[tokio::test]
async fn missing_rate_limit_hint_is_floored() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("/bot{TOKEN}/copyMessage")))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "ok": false,
            "error_code": 429,
            "description": "Too Many Requests",
        })))
        .mount(&server)
        .await;

    let api = api_for(&server);
    let outcome = api.copy_one(-1002, -1001, 5, None, None).await;
    assert_eq!(outcome, CopyOutcome::RateLimited { retry_after_secs: 1 });
}

#[tokio::test]
async fn missing_source_message_is_skippable() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("/bot{TOKEN}/copyMessage")))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "ok": false,
            "error_code": 400,
            "description": "Bad Request: message to copy not found",
        })))
        .mount(&server)
        .await;

    let api = api_for(&server);
    match api.copy_one(-1002, -1001, 5, None, None).await {
        CopyOutcome::Skippable { reason } => {
            assert!(reason.contains("message to copy not found"))
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
}

#[tokio::test]
async fn non_client_errors_are_real_errors() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("/bot{TOKEN}/copyMessage")))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "ok": false,
            "error_code": 403,
            "description": "Forbidden: bot is not a member of the channel chat",
        })))
        .mount(&server)
        .await;

    let api = api_for(&server);
    match api.copy_one(-1002, -1001, 5, None, None).await {
        CopyOutcome::RealError { description } => assert!(description.starts_with("Forbidden")),
        other => panic!("unexpected outcome: {other:?}"),
    }
}

#[tokio::test]
async fn unreachable_host_is_a_network_error() {
    // Nothing listens on the discard port.
    let base = Url::parse("http://127.0.0.1:9").expect("static url");
    let api = TelegramBotApi::with_base_url(TOKEN, base);
    assert!(matches!(
        api.copy_one(-1002, -1001, 5, None, None).await,
        CopyOutcome::NetworkError { .. }
    ));
}

#[tokio::test]
async fn malformed_body_is_a_network_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("/bot{TOKEN}/copyMessage")))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>bad gateway</html>"))
        .mount(&server)
        .await;

    let api = api_for(&server);
    assert!(matches!(
        api.copy_one(-1002, -1001, 5, None, None).await,
        CopyOutcome::NetworkError { .. }
    ));
}

#[tokio::test]
async fn get_me_reports_the_bot_identity() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/bot{TOKEN}/getMe")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ok": true,
            "result": { "id": 42, "first_name": "courier", "username": "courier_bot" },
        })))
        .mount(&server)
        .await;

    let api = api_for(&server);
    let identity = api.get_me().await.expect("identity");
    assert_eq!(identity.id, 42);
    assert_eq!(identity.first_name, "courier");
    assert_eq!(identity.username.as_deref(), Some("courier_bot"));
}

#[tokio::test]
async fn rejected_token_surfaces_the_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/bot{TOKEN}/getMe")))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "ok": false,
            "error_code": 401,
            "description": "Unauthorized",
        })))
        .mount(&server)
        .await;

    let api = api_for(&server);
    match api.get_me().await {
        Err(ApiError::Api { code, description }) => {
            assert_eq!(code, Some(401));
            assert_eq!(description, "Unauthorized");
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[tokio::test]
async fn admin_check_classifies_member_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/bot{TOKEN}/getChatMember")))
        .and(query_param("chat_id", "-1001"))
        .and(query_param("user_id", "42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ok": true,
            "result": { "status": "administrator" },
        })))
        .mount(&server)
        .await;

    let api = api_for(&server);
    assert!(is_channel_admin(&api, -1001, 42).await.expect("status"));
}

#[tokio::test]
async fn plain_member_is_not_an_admin() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/bot{TOKEN}/getChatMember")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ok": true,
            "result": { "status": "member" },
        })))
        .mount(&server)
        .await;

    let api = api_for(&server);
    assert!(!is_channel_admin(&api, -1001, 42).await.expect("status"));
}

#[tokio::test]
async fn real_adapter_has_no_message_metadata() {
    let server = MockServer::start().await;
    let api = api_for(&server);
    assert!(api.message_meta(-1001, 5).await.is_none());
}
