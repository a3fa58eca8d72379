//! Customer HTTP routes.
//!
//! - `POST   /customers`                 create (any submitted id is ignored)
//! - `PUT    /customers`                 update, id required
//! - `DELETE /customers/{id}`            delete, plain text reply
//! - `GET    /customers/all`             repository snapshot
//! - `GET    /customers/all_raw`         direct table scan
//! - `GET    /customers/by_id/{id}`      single-result envelope
//! - `GET    /customers/by_name/{name}`  single-result envelope
//! - `GET    /customers/by_taxid/{taxId}` single-result envelope

pub mod facade;
pub mod service;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use clientes_core::domain::customer::{Customer, CustomerDto, CustomerId};
use clientes_core::envelope::Envelope;
use clientes_core::errors::{ApplicationError, DomainError, InterfaceError};
use tracing::{error, info, warn};
use uuid::Uuid;

pub use facade::{CustomerFacade, MaintainOutcome};
pub use service::CustomerService;

pub fn router(facade: CustomerFacade) -> Router {
    Router::new()
        .route("/customers", post(create_customer).put(update_customer))
        .route("/customers/{id}", delete(delete_customer))
        .route("/customers/all", get(list_all))
        .route("/customers/all_raw", get(list_all_raw))
        .route("/customers/by_id/{id}", get(find_by_id))
        .route("/customers/by_name/{name}", get(find_by_name))
        .route("/customers/by_taxid/{tax_id}", get(find_by_tax_id))
        .with_state(facade)
}

const CORRELATION_HEADER: &str = "x-correlation-id";

fn correlation_id() -> String {
    Uuid::new_v4().to_string()
}

/// Malformed or non-JSON bodies still answer with an error envelope.
fn json_body(
    payload: Result<Json<CustomerDto>, JsonRejection>,
    correlation_id: &str,
) -> Result<CustomerDto, Response> {
    payload.map(|Json(body)| body).map_err(|rejection| {
        interface_response(InterfaceError::BadRequest {
            message: rejection.body_text(),
            correlation_id: correlation_id.to_string(),
        })
    })
}

async fn create_customer(
    State(facade): State<CustomerFacade>,
    payload: Result<Json<CustomerDto>, JsonRejection>,
) -> Response {
    let correlation_id = correlation_id();
    let body = match json_body(payload, &correlation_id) {
        Ok(body) => body,
        Err(response) => return response,
    };
    let mut candidate = Customer::from(body);
    candidate.id = CustomerId::UNASSIGNED;

    maintain(&facade, candidate, &correlation_id).await
}

async fn update_customer(
    State(facade): State<CustomerFacade>,
    payload: Result<Json<CustomerDto>, JsonRejection>,
) -> Response {
    let correlation_id = correlation_id();
    let body = match json_body(payload, &correlation_id) {
        Ok(body) => body,
        Err(response) => return response,
    };
    if body.id == 0 {
        let error = ApplicationError::from(DomainError::UpdateWithoutId);
        return interface_response(error.into_interface(correlation_id));
    }

    maintain(&facade, Customer::from(body), &correlation_id).await
}

async fn maintain(facade: &CustomerFacade, candidate: Customer, correlation_id: &str) -> Response {
    info!(
        event_name = "http.customers.maintain",
        correlation_id = %correlation_id,
        customer_id = %candidate.id,
        "customer maintain request"
    );

    match facade.maintain_customer(candidate).await {
        Ok(MaintainOutcome::Saved(customer)) => {
            (StatusCode::OK, Json(Envelope::single(CustomerDto::from(customer)))).into_response()
        }
        Ok(rejected @ MaintainOutcome::Rejected(_)) => (
            StatusCode::BAD_REQUEST,
            Json(Envelope::<CustomerDto>::from_errors(rejected.messages())),
        )
            .into_response(),
        Err(error) => interface_response(error.into_interface(correlation_id)),
    }
}

async fn delete_customer(
    State(facade): State<CustomerFacade>,
    Path(raw_id): Path<String>,
) -> Response {
    let correlation_id = correlation_id();
    let id = match facade::parse_customer_id(&raw_id) {
        Ok(id) => id,
        Err(error) => return (StatusCode::BAD_REQUEST, error.to_string()).into_response(),
    };

    let outcome = facade.delete_customer(id).await;
    info!(
        event_name = "http.customers.delete",
        correlation_id = %correlation_id,
        customer_id = %id,
        deleted = outcome.is_deleted(),
        "customer delete request"
    );

    let status = if outcome.is_deleted() { StatusCode::OK } else { StatusCode::BAD_REQUEST };
    (status, outcome.to_string()).into_response()
}

async fn list_all(State(facade): State<CustomerFacade>) -> Response {
    listing(facade.list_all().await)
}

async fn list_all_raw(State(facade): State<CustomerFacade>) -> Response {
    listing(facade.list_all_raw().await)
}

fn listing(result: Result<Vec<CustomerDto>, ApplicationError>) -> Response {
    match result {
        Ok(customers) => (StatusCode::OK, Json(customers)).into_response(),
        Err(error) => interface_response(error.into_interface(correlation_id())),
    }
}

async fn find_by_id(State(facade): State<CustomerFacade>, Path(raw_id): Path<String>) -> Response {
    lookup(facade.find_by_id(&raw_id).await)
}

async fn find_by_name(State(facade): State<CustomerFacade>, Path(name): Path<String>) -> Response {
    lookup(facade.find_by_name(&name).await)
}

async fn find_by_tax_id(
    State(facade): State<CustomerFacade>,
    Path(tax_id): Path<String>,
) -> Response {
    lookup(facade.find_by_tax_id(&tax_id).await)
}

fn lookup(result: Result<Envelope<CustomerDto>, ApplicationError>) -> Response {
    match result {
        Ok(envelope) => (StatusCode::OK, Json(envelope)).into_response(),
        Err(error) => interface_response(error.into_interface(correlation_id())),
    }
}

fn interface_response(error: InterfaceError) -> Response {
    let mut response = match &error {
        InterfaceError::BadRequest { message, correlation_id } => {
            warn!(
                event_name = "http.customers.bad_request",
                correlation_id = %correlation_id,
                error = %message,
                "customer request rejected"
            );
            (StatusCode::BAD_REQUEST, Json(Envelope::<CustomerDto>::from_errors([message.clone()])))
                .into_response()
        }
        InterfaceError::ServiceUnavailable { message, correlation_id } => {
            error!(
                event_name = "http.customers.store_unavailable",
                correlation_id = %correlation_id,
                error = %message,
                "customer store failure"
            );
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(Envelope::<CustomerDto>::from_errors([error.user_message()])),
            )
                .into_response()
        }
    };

    if let Ok(value) = HeaderValue::from_str(error.correlation_id()) {
        response.headers_mut().insert(CORRELATION_HEADER, value);
    }
    response
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Method, Request, StatusCode},
        response::Response,
        Router,
    };
    use base64::{engine::general_purpose::STANDARD, Engine};
    use clientes_core::domain::customer::CustomerDto;
    use clientes_core::envelope::Envelope;
    use clientes_core::security::CredentialStore;
    use clientes_db::repositories::InMemoryCustomerRepository;
    use serde_json::json;
    use tower::ServiceExt;

    use super::{CustomerFacade, CustomerService};
    use crate::auth::AuthState;
    use crate::bootstrap::api_router;

    fn app() -> Router {
        let store = Arc::new(InMemoryCustomerRepository::default());
        let facade = CustomerFacade::new(CustomerService::new(store.clone(), store));
        let credentials =
            CredentialStore::new("admin", &"admin".to_string().into(), vec!["MAIN".to_string()]);
        api_router(facade, AuthState::new(credentials, "MAIN"))
    }

    fn request(method: Method, uri: &str, body: Option<serde_json::Value>) -> Request<Body> {
        let token = STANDARD.encode("admin:admin");
        let builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Basic {token}"));
        match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap_or_else(|err| panic!("failed to build request: {err}"))
    }

    async fn send(router: &Router, request: Request<Body>) -> Response {
        match router.clone().oneshot(request).await {
            Ok(response) => response,
            Err(err) => panic!("router request failed: {err}"),
        }
    }

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), 1024 * 1024).await.expect("read body");
        String::from_utf8(bytes.to_vec()).expect("utf-8 body")
    }

    async fn envelope(response: Response) -> Envelope<CustomerDto> {
        serde_json::from_str(&body_text(response).await).expect("envelope json")
    }

    #[tokio::test]
    async fn missing_id_lookup_returns_ok_with_error_envelope() {
        let router = app();

        let response = send(&router, request(Method::GET, "/customers/by_id/42", None)).await;

        assert_eq!(response.status(), StatusCode::OK);
        let body: serde_json::Value =
            serde_json::from_str(&body_text(response).await).expect("json");
        assert_eq!(body, json!({ "data": [], "errors": ["no customer found with id: 42"] }));
    }

    #[tokio::test]
    async fn non_numeric_id_lookup_is_a_bad_request() {
        let router = app();

        let response = send(&router, request(Method::GET, "/customers/by_id/abc", None)).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = envelope(response).await;
        assert!(body.errors[0].contains("abc"), "errors: {:?}", body.errors);
    }

    #[tokio::test]
    async fn post_creates_and_ignores_the_submitted_id() {
        let router = app();

        let response = send(
            &router,
            request(Method::POST, "/customers", Some(json!({ "id": 77, "name": "Ana", "taxId": "111" }))),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = envelope(response).await;
        assert!(body.errors.is_empty());
        assert_eq!(body.data.len(), 1);
        assert_ne!(body.data[0].id, 0);
        assert_eq!(body.data[0].tax_id, "111");

        let duplicate = send(
            &router,
            request(Method::POST, "/customers", Some(json!({ "name": "Bea", "taxId": "111" }))),
        )
        .await;
        assert_eq!(duplicate.status(), StatusCode::BAD_REQUEST);
        let rejected = envelope(duplicate).await;
        assert!(rejected.data.is_empty());
        assert_eq!(
            rejected.errors,
            vec!["Tax-Id: 111 is unique and already belongs to Customer: 'Ana'".to_string()]
        );
    }

    #[tokio::test]
    async fn put_without_id_is_rejected_before_validation() {
        let router = app();

        let response = send(
            &router,
            request(Method::PUT, "/customers", Some(json!({ "name": "Ana", "taxId": "111" }))),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = envelope(response).await;
        assert_eq!(body.errors, vec!["id cannot be empty or 0 for an Update".to_string()]);
    }

    #[tokio::test]
    async fn malformed_bodies_are_answered_with_an_error_envelope() {
        let router = app();
        let token = STANDARD.encode("admin:admin");

        for (method, content_type, payload) in [
            (Method::POST, "application/json", "{\"name\": "),
            (Method::PUT, "application/json", "{\"id\": \"one\"}"),
            (Method::POST, "text/plain", "name=Ana"),
        ] {
            let request = Request::builder()
                .method(method.clone())
                .uri("/customers")
                .header(header::AUTHORIZATION, format!("Basic {token}"))
                .header(header::CONTENT_TYPE, content_type)
                .body(Body::from(payload))
                .unwrap_or_else(|err| panic!("failed to build request: {err}"));

            let response = send(&router, request).await;

            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{method} {payload}");
            assert!(response.headers().contains_key("x-correlation-id"));
            let body = envelope(response).await;
            assert!(body.data.is_empty());
            assert_eq!(body.errors.len(), 1, "{method} {payload}");
        }
        assert!(envelope(send(&router, request(Method::GET, "/customers/by_name/Ana", None)).await)
            .await
            .data
            .is_empty());
    }

    #[tokio::test]
    async fn put_updates_an_existing_customer() {
        let router = app();
        let created = send(
            &router,
            request(Method::POST, "/customers", Some(json!({ "name": "Ana", "taxId": "111" }))),
        )
        .await;
        let id = envelope(created).await.data[0].id;

        let response = send(
            &router,
            request(
                Method::PUT,
                "/customers",
                Some(json!({ "id": id, "name": "Ana Maria", "taxId": "111" })),
            ),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = envelope(response).await;
        assert_eq!(body.data, vec![CustomerDto { id, name: "Ana Maria".into(), tax_id: "111".into() }]);
    }

    #[tokio::test]
    async fn delete_replies_with_plain_text() {
        let router = app();

        let missing = send(&router, request(Method::DELETE, "/customers/9", None)).await;
        assert_eq!(missing.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_text(missing).await, "no customer found with id: 9");

        let created = send(
            &router,
            request(Method::POST, "/customers", Some(json!({ "name": "Ana", "taxId": "111" }))),
        )
        .await;
        let id = envelope(created).await.data[0].id;

        let deleted = send(&router, request(Method::DELETE, &format!("/customers/{id}"), None)).await;
        assert_eq!(deleted.status(), StatusCode::OK);
        assert_eq!(body_text(deleted).await, "Customer deleted successfully!");
    }

    #[tokio::test]
    async fn listings_return_plain_arrays() {
        let router = app();
        send(
            &router,
            request(Method::POST, "/customers", Some(json!({ "name": "Ana", "taxId": "111" }))),
        )
        .await;

        for uri in ["/customers/all", "/customers/all_raw"] {
            let response = send(&router, request(Method::GET, uri, None)).await;
            assert_eq!(response.status(), StatusCode::OK);
            let customers: Vec<CustomerDto> =
                serde_json::from_str(&body_text(response).await).expect("json array");
            assert_eq!(customers.len(), 1, "uri {uri}");
            assert_eq!(customers[0].name, "Ana");
        }
    }

    #[tokio::test]
    async fn name_and_tax_id_lookups_resolve_exact_values() {
        let router = app();
        send(
            &router,
            request(Method::POST, "/customers", Some(json!({ "name": "Ana", "taxId": "12345" }))),
        )
        .await;

        let by_name = envelope(send(&router, request(Method::GET, "/customers/by_name/Ana", None)).await).await;
        assert_eq!(by_name.data.len(), 1);

        let by_tax_id =
            envelope(send(&router, request(Method::GET, "/customers/by_taxid/123", None)).await).await;
        assert_eq!(by_tax_id.errors, vec!["no customer found with taxId: 123".to_string()]);
    }
}
