//! Views and route table shared by the end-to-end suites.

use serde_json::{Value, json};

use crate::{Dispatcher, Handler, RequestMethod, RouteParams, RouteTable, SyntheticRequest};

/// Response produced by the test views.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub status: u16,
    pub content: String,
    pub content_type: &'static str,
}

impl Response {
    fn json(value: &Value) -> Self {
        Self {
            status: 200,
            content: value.to_string(),
            content_type: "application/json",
        }
    }

    fn method_not_allowed() -> Self {
        Self {
            status: 405,
            content: String::new(),
            content_type: "text/plain",
        }
    }

    /// Decodes the response content.
    pub fn json_content(&self) -> Value {
        serde_json::from_str(&self.content).expect("response content is JSON")
    }
}

/// View that only answers `get`; other methods receive a 405.
pub struct GetView<F>(F);

impl<F> Handler for GetView<F>
where
    F: Fn(&SyntheticRequest, &RouteParams) -> Response + Send + Sync,
{
    type Output = Response;

    fn call(&self, request: SyntheticRequest, params: &RouteParams) -> Response {
        match request.method() {
            RequestMethod::Get => (self.0)(&request, params),
            _ => Response::method_not_allowed(),
        }
    }
}

fn mock_view(_request: &SyntheticRequest, _params: &RouteParams) -> Response {
    Response::json(&json!({"foo": ["bar", "baz"]}))
}

fn restricted_view(request: &SyntheticRequest, _params: &RouteParams) -> Response {
    Response::json(&json!({
        "foo": ["bar", "baz"],
        "authorization": request.header("authorization"),
    }))
}

/// Routes `/api/mock/` and `/api/restricted/` to `get`-only views.
pub fn test_routes() -> RouteTable<Response> {
    RouteTable::new()
        .route_handler("/api/mock/", GetView(mock_view))
        .and_then(|table| table.route_handler("/api/restricted/", GetView(restricted_view)))
        .expect("build test routes")
}

/// Dispatcher over [`test_routes`].
pub fn test_dispatcher() -> Dispatcher<RouteTable<Response>> {
    Dispatcher::new(test_routes())
}
