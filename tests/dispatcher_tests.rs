//! Tests for the dispatch engine and parameter binding
//!
//! # Test Coverage
//!
//! - Full route → binding → invoke flow against a controller fixture with
//!   every binding kind in play
//! - Route-miss outcomes, including cross-verb misses at a registered path
//! - The canonical end-to-end argument layout (unbound sentinel slots
//!   interleaved with bound ones)
//! - Re-registration (last-wins) observed through dispatch
//! - One spec servicing multiple controller instances
//!
//! # Test Strategy
//!
//! The `TestController` fixture mirrors a typical serverless controller:
//! handlers assign extracted arguments onto instance fields so tests can
//! assert exactly what each slot received.

use http::Method;
use lambrouter::{
    ArgValue, ControllerSpec, DispatchError, HandlerError, Request, TargetType,
};
use serde_json::{json, Value};
use std::collections::HashMap;

mod tracing_util;
use tracing_util::TestTracing;

#[derive(Default)]
struct TestController {
    request_body: Option<Value>,
    nothing: Option<String>,
    headers: Option<HashMap<String, String>>,
    query_params: Option<HashMap<String, String>>,
    param1: Option<String>,
    param2: Option<f64>,
    param3: Option<bool>,
    content_type: Option<String>,
    test_number_header: Option<f64>,
    calls: usize,
}

fn capture(ctrl: &mut TestController, args: &[ArgValue]) -> Result<Value, HandlerError> {
    ctrl.calls += 1;
    ctrl.nothing = args.first().and_then(|a| a.as_text()).map(str::to_string);
    ctrl.request_body = args.get(1).and_then(|a| a.as_json()).cloned();
    ctrl.headers = args.get(2).and_then(|a| a.as_map()).cloned();
    ctrl.query_params = args.get(3).and_then(|a| a.as_map()).cloned();
    ctrl.param1 = args.get(4).and_then(|a| a.as_text()).map(str::to_string);
    ctrl.param2 = args.get(5).and_then(|a| a.as_number());
    ctrl.param3 = args.get(6).and_then(|a| a.as_bool());
    ctrl.content_type = args.get(7).and_then(|a| a.as_text()).map(str::to_string);
    ctrl.test_number_header = args.get(8).and_then(|a| a.as_number());
    Ok(json!({ "ok": true }))
}

/// Slot layout mirrors a controller whose method signature interleaves an
/// unbound first parameter with every binding kind.
fn controller_spec() -> ControllerSpec<TestController> {
    ControllerSpec::builder()
        .post("/test/post", "post_mapping", capture)
        .bind_body("post_mapping", 1)
        .bind_headers("post_mapping", 2)
        .bind_query_params("post_mapping", 3)
        .bind_query_param("post_mapping", 4, "post_param1", TargetType::Text)
        .bind_query_param("post_mapping", 5, "post_param2", TargetType::Number)
        .bind_query_param("post_mapping", 6, "post_param3", TargetType::Boolean)
        .bind_header("post_mapping", 7, "post_content-type", TargetType::Text)
        .bind_header("post_mapping", 8, "post_test-number-header", TargetType::Number)
        .get("/test/get", "get_mapping", capture)
        .bind_headers("get_mapping", 2)
        .bind_query_params("get_mapping", 3)
        .bind_query_param("get_mapping", 4, "get_param1", TargetType::Text)
        .bind_query_param("get_mapping", 5, "get_param2", TargetType::Number)
        .bind_query_param("get_mapping", 6, "get_param3", TargetType::Boolean)
        .bind_header("get_mapping", 7, "get_content-type", TargetType::Text)
        .bind_header("get_mapping", 8, "get_test-number-header", TargetType::Number)
        .post("/test/post-no-bindings", "bare_mapping", capture)
        .bind_body("bare_mapping", 1)
        .bind_headers("bare_mapping", 2)
        .bind_query_params("bare_mapping", 3)
        .build()
}

fn post_headers() -> HashMap<String, String> {
    HashMap::from([
        ("post_content-type".to_string(), "application/json".to_string()),
        ("post_test-number-header".to_string(), "15".to_string()),
    ])
}

fn post_query_params() -> HashMap<String, String> {
    HashMap::from([
        ("post_param1".to_string(), "value1".to_string()),
        ("post_param2".to_string(), "2".to_string()),
        ("post_param3".to_string(), "true".to_string()),
    ])
}

#[test]
fn test_post_happy_path() {
    let _tracing = TestTracing::init();
    let spec = controller_spec();
    let mut controller = TestController::default();

    let request = Request::new(Method::POST, "/test/post")
        .with_body(r#"{"str": "test string", "int": 9001}"#)
        .with_headers(post_headers())
        .with_query_params(post_query_params());

    let outcome = spec.dispatch(&request, &mut controller).expect("dispatch");
    assert_eq!(outcome, json!({ "ok": true }));

    assert_eq!(
        controller.request_body,
        Some(json!({ "str": "test string", "int": 9001 }))
    );
    assert_eq!(controller.headers, Some(post_headers()));
    assert_eq!(controller.query_params, Some(post_query_params()));
    assert_eq!(controller.param1.as_deref(), Some("value1"));
    assert_eq!(controller.param2, Some(2.0));
    assert_eq!(controller.param3, Some(true));
    assert_eq!(controller.content_type.as_deref(), Some("application/json"));
    assert_eq!(controller.test_number_header, Some(15.0));
    // The first slot had no binding: always the sentinel, never stale data
    assert_eq!(controller.nothing, None);
}

#[test]
fn test_get_does_not_reach_post_mapping() {
    let _tracing = TestTracing::init();
    let spec = controller_spec();
    let mut controller = TestController::default();

    let request = Request::new(Method::GET, "/test/post")
        .with_body(r#"{"str": "test string"}"#)
        .with_headers(post_headers())
        .with_query_params(post_query_params());

    let err = spec.dispatch(&request, &mut controller).unwrap_err();
    match err {
        DispatchError::RouteNotFound { method, path } => {
            assert_eq!(method, Method::GET);
            assert_eq!(path, "/test/post");
        }
        other => panic!("expected RouteNotFound, got {other:?}"),
    }
    // The handler never ran; no field was touched
    assert_eq!(controller.calls, 0);
    assert_eq!(controller.request_body, None);
    assert_eq!(controller.headers, None);
}

#[test]
fn test_get_happy_path() {
    let _tracing = TestTracing::init();
    let spec = controller_spec();
    let mut controller = TestController::default();

    let headers = HashMap::from([
        ("get_content-type".to_string(), "application/json".to_string()),
        ("get_test-number-header".to_string(), "15".to_string()),
    ]);
    let query_params = HashMap::from([
        ("get_param1".to_string(), "value1".to_string()),
        ("get_param2".to_string(), "2".to_string()),
        ("get_param3".to_string(), "true".to_string()),
    ]);
    let request = Request::new(Method::GET, "/test/get")
        .with_headers(headers.clone())
        .with_query_params(query_params.clone());

    spec.dispatch(&request, &mut controller).expect("dispatch");

    assert_eq!(controller.headers, Some(headers));
    assert_eq!(controller.query_params, Some(query_params));
    assert_eq!(controller.param1.as_deref(), Some("value1"));
    assert_eq!(controller.param2, Some(2.0));
    assert_eq!(controller.param3, Some(true));
    assert_eq!(controller.content_type.as_deref(), Some("application/json"));
    assert_eq!(controller.test_number_header, Some(15.0));
    // No body binding on the GET mapping, so the body slot stayed unbound
    assert_eq!(controller.request_body, None);
    assert_eq!(controller.nothing, None);
}

#[test]
fn test_named_bindings_without_source_maps_stay_unbound() {
    let _tracing = TestTracing::init();
    let spec = controller_spec();
    let mut controller = TestController::default();

    // Named header/query bindings exist, but the request carries neither map.
    // Binding absence is not a dispatch error.
    let request = Request::new(Method::POST, "/test/post")
        .with_body(r#"{"str": "test string"}"#);

    spec.dispatch(&request, &mut controller).expect("dispatch");

    assert_eq!(controller.request_body, Some(json!({ "str": "test string" })));
    assert_eq!(controller.headers, None);
    assert_eq!(controller.query_params, None);
    assert_eq!(controller.param1, None);
    assert_eq!(controller.param2, None);
    assert_eq!(controller.param3, None);
    assert_eq!(controller.content_type, None);
    assert_eq!(controller.test_number_header, None);
}

/// The canonical end-to-end layout: register slot 1 → body, slot 4 → query
/// param "p1" (text), slot 5 → query param "p2" (number); dispatch and observe
/// `[unbound, {"a":1}, unbound, unbound, "x", 2]`.
#[test]
fn test_end_to_end_argument_layout() {
    let _tracing = TestTracing::init();

    #[derive(Default)]
    struct Recorder {
        args: Vec<ArgValue>,
    }

    let spec = ControllerSpec::<Recorder>::builder()
        .post("/test/post", "record", |ctrl: &mut Recorder, args: &[ArgValue]| {
            ctrl.args = args.to_vec();
            Ok(Value::Null)
        })
        .bind_body("record", 1)
        .bind_query_param("record", 4, "p1", TargetType::Text)
        .bind_query_param("record", 5, "p2", TargetType::Number)
        .build();

    let mut controller = Recorder::default();
    let request = Request::new(Method::POST, "/test/post")
        .with_body(r#"{"a":1}"#)
        .with_query_params(HashMap::from([
            ("p1".to_string(), "x".to_string()),
            ("p2".to_string(), "2".to_string()),
        ]));

    spec.dispatch(&request, &mut controller).expect("dispatch");

    assert_eq!(
        controller.args,
        vec![
            ArgValue::Unbound,
            ArgValue::Json(json!({ "a": 1 })),
            ArgValue::Unbound,
            ArgValue::Unbound,
            ArgValue::Text("x".to_string()),
            ArgValue::Number(2.0),
        ]
    );
}

#[test]
fn test_dispatch_to_unregistered_path_carries_diagnostics() {
    let _tracing = TestTracing::init();
    let spec = controller_spec();
    let mut controller = TestController::default();

    let request = Request::new(Method::DELETE, "/nowhere");
    let err = spec.dispatch(&request, &mut controller).unwrap_err();
    match err {
        DispatchError::RouteNotFound { method, path } => {
            assert_eq!(method, Method::DELETE);
            assert_eq!(path, "/nowhere");
        }
        other => panic!("expected RouteNotFound, got {other:?}"),
    }
}

#[test]
fn test_reregistration_replaces_prior_handler() {
    let _tracing = TestTracing::init();

    #[derive(Default)]
    struct Versioned {
        seen: Option<&'static str>,
    }

    let spec = ControllerSpec::<Versioned>::builder()
        .get("/v", "old", |ctrl: &mut Versioned, _: &[ArgValue]| {
            ctrl.seen = Some("old");
            Ok(Value::Null)
        })
        .get("/v", "new", |ctrl: &mut Versioned, _: &[ArgValue]| {
            ctrl.seen = Some("new");
            Ok(Value::Null)
        })
        .build();

    let mut controller = Versioned::default();
    spec.dispatch(&Request::new(Method::GET, "/v"), &mut controller)
        .expect("dispatch");
    assert_eq!(controller.seen, Some("new"));
}

#[test]
fn test_one_spec_services_many_instances() {
    let _tracing = TestTracing::init();
    let spec = controller_spec();

    let request = Request::new(Method::POST, "/test/post")
        .with_body(r#"{"n": 1}"#)
        .with_query_params(post_query_params());

    let mut first = TestController::default();
    let mut second = TestController::default();
    spec.dispatch(&request, &mut first).expect("dispatch first");
    spec.dispatch(&request, &mut second).expect("dispatch second");

    assert_eq!(first.calls, 1);
    assert_eq!(second.calls, 1);
    assert_eq!(first.request_body, second.request_body);
}
