use paypalctl::api::{
    ApiError, AuthError, ClientConfig, HttpError, PaypalClient, PARTNER_ATTRIBUTION_ID,
};
use serde_json::{json, Value};
use url::Url;
use wiremock::matchers::{basic_auth, bearer_token, body_json, body_string, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ACCESS_TOKEN: &str = "A21AAFEpH4PsADK7qSS7pSRsgzfENtu";

fn test_client(server: &MockServer) -> PaypalClient {
    let base_url = Url::parse(&server.uri()).expect("mock server URI should parse");
    let config = ClientConfig::new("sandbox", "client-id", "client-secret")
        .expect("sandbox should be a known environment")
        .with_base_url(base_url)
        .expect("mock server URI should be usable as a base URL");
    PaypalClient::new(config)
}

async fn mount_token(server: &MockServer, expected_calls: u64) {
    Mock::given(method("POST"))
        .and(path("/v1/oauth2/token"))
        .and(basic_auth("client-id", "client-secret"))
        .and(header("PayPal-Partner-Attribution-Id", PARTNER_ATTRIBUTION_ID))
        .and(header("Content-Type", "application/x-www-form-urlencoded"))
        .and(body_string("grant_type=client_credentials"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "scope": "https://uri.paypal.com/services/payments/payment",
            "access_token": ACCESS_TOKEN,
            "token_type": "Bearer",
            "app_id": "APP-80W284485P519543T",
            "expires_in": 32400,
        })))
        .expect(expected_calls)
        .mount(server)
        .await;
}

#[tokio::test]
async fn create_order_requests_token_then_order() {
    let server = MockServer::start().await;
    mount_token(&server, 1).await;

    let payload = json!({
        "intent": "CAPTURE",
        "purchase_units": [{"amount": {"currency_code": "USD", "value": "100.00"}}],
    });
    let created = json!({
        "id": "5O190127TN364715T",
        "status": "CREATED",
        "links": [{"href": "https://www.sandbox.paypal.com/checkoutnow?token=5O190127TN364715T", "rel": "approve", "method": "GET"}],
    });
    Mock::given(method("POST"))
        .and(path("/v2/checkout/orders"))
        .and(bearer_token(ACCESS_TOKEN))
        .and(header("Content-Type", "application/json"))
        .and(header("PayPal-Partner-Attribution-Id", PARTNER_ATTRIBUTION_ID))
        .and(body_json(&payload))
        .respond_with(ResponseTemplate::new(201).set_body_json(&created))
        .expect(1)
        .mount(&server)
        .await;

    let mut client = test_client(&server);
    let response = client.create_order(&payload).await.expect("order should be created");
    assert_eq!(response, created);

    let received = server
        .received_requests()
        .await
        .expect("request recording should be enabled");
    let paths: Vec<_> = received.iter().map(|request| request.url.path()).collect();
    assert_eq!(paths, vec!["/v1/oauth2/token", "/v2/checkout/orders"]);
}

#[tokio::test]
async fn later_operations_reuse_the_token() {
    let server = MockServer::start().await;
    mount_token(&server, 1).await;

    Mock::given(method("GET"))
        .and(path("/v2/checkout/orders/ORDER123"))
        .and(bearer_token(ACCESS_TOKEN))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"id": "ORDER123", "status": "APPROVED"})),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/v2/checkout/orders/ORDER123"))
        .and(bearer_token(ACCESS_TOKEN))
        .and(body_json(json!([{"op": "add", "path": "/purchase_units/@reference_id=='default'/invoice_id", "value": "INV-1"}])))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v2/checkout/orders/ORDER123/capture"))
        .and(bearer_token(ACCESS_TOKEN))
        .and(body_json(json!({})))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(json!({"id": "ORDER123", "status": "COMPLETED"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let mut client = test_client(&server);

    let order = client.get_order("ORDER123").await.expect("order should be found");
    assert_eq!(order["status"], "APPROVED");

    let patched = client
        .patch_order(
            &json!([{"op": "add", "path": "/purchase_units/@reference_id=='default'/invoice_id", "value": "INV-1"}]),
            "ORDER123",
        )
        .await
        .expect("order should be patched");
    assert_eq!(patched, Value::Null);

    let captured = client.capture_order("ORDER123").await.expect("order should be captured");
    assert_eq!(captured["status"], "COMPLETED");

    // GET carries no body at all.
    let received = server.received_requests().await.unwrap();
    let get = received
        .iter()
        .find(|request| request.method.as_str() == "GET")
        .expect("GET should have been sent");
    assert!(get.body.is_empty());
}

#[tokio::test]
async fn rejected_credentials_stop_before_business_call() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/oauth2/token"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": "invalid_client",
            "error_description": "Client Authentication failed",
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(path("/v2/checkout/orders"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let mut client = test_client(&server);
    let error = client
        .create_order(&json!({"intent": "CAPTURE"}))
        .await
        .expect_err("authentication should fail");

    match error {
        ApiError::Authentication(AuthError::Http(HttpError::Status { status, body })) => {
            assert_eq!(status.as_u16(), 401);
            assert!(body.contains("invalid_client"));
        }
        other => panic!("expected an authentication error, got {other:?}"),
    }
    assert!(!client.has_token());
}

#[tokio::test]
async fn token_response_without_access_token_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/oauth2/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token_type": "Bearer"})))
        .expect(1)
        .mount(&server)
        .await;

    let mut client = test_client(&server);
    let error = client
        .capture_order("ORDER123")
        .await
        .expect_err("missing token should fail");
    assert!(matches!(
        error,
        ApiError::Authentication(AuthError::MissingAccessToken)
    ));

    let received = server.received_requests().await.unwrap();
    assert_eq!(received.len(), 1);
}

#[tokio::test]
async fn business_errors_are_passed_through() {
    let server = MockServer::start().await;
    mount_token(&server, 1).await;
    Mock::given(method("GET"))
        .and(path("/v2/checkout/orders/UNKNOWN"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "name": "RESOURCE_NOT_FOUND",
            "message": "The specified resource does not exist.",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut client = test_client(&server);
    let error = client
        .get_order("UNKNOWN")
        .await
        .expect_err("unknown order should fail");

    match error {
        ApiError::Request(HttpError::Status { status, body }) => {
            assert_eq!(status.as_u16(), 404);
            assert!(body.contains("RESOURCE_NOT_FOUND"));
        }
        other => panic!("expected a request error, got {other:?}"),
    }
    // A failed business call doesn't discard the token.
    assert!(client.has_token());
}

#[tokio::test]
async fn dot_order_ids_never_reach_paypal() {
    let server = MockServer::start().await;

    let mut client = test_client(&server);
    let error = client
        .capture_order("..")
        .await
        .expect_err("`..` should not be accepted as an order ID");
    assert!(matches!(error, ApiError::InvalidPathSegment(ref id) if id == ".."));

    let received = server.received_requests().await.unwrap();
    assert!(received.is_empty());
}
