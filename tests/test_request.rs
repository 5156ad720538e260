use warden::http::request::{Method, RequestBuilder};

#[test]
fn test_request_header_retrieval() {
    let req = RequestBuilder::new()
        .method(Method::GET)
        .target("/")
        .header("Host", "example.com")
        .header("Content-Type", "application/json")
        .build()
        .unwrap();

    assert_eq!(req.header("Host"), Some("example.com"));
    assert_eq!(req.header("Content-Type"), Some("application/json"));
    assert_eq!(req.header("Missing"), None);
}

#[test]
fn test_header_names_are_kept_as_received() {
    let req = RequestBuilder::new()
        .method(Method::GET)
        .target("/")
        .header("x-custom", "1")
        .build()
        .unwrap();

    assert_eq!(req.header("x-custom"), Some("1"));
    assert_eq!(req.header("X-Custom"), None);
}

#[test]
fn test_request_content_length_parsing() {
    let req = RequestBuilder::new()
        .method(Method::POST)
        .target("/login")
        .header("Content-Length", "42")
        .build()
        .unwrap();

    assert_eq!(req.content_length(), 42);
}

#[test]
fn test_request_content_length_missing_or_invalid() {
    let missing = RequestBuilder::new()
        .method(Method::GET)
        .target("/")
        .build()
        .unwrap();
    let invalid = RequestBuilder::new()
        .method(Method::POST)
        .target("/")
        .header("Content-Length", "not-a-number")
        .build()
        .unwrap();

    assert_eq!(missing.content_length(), 0);
    assert_eq!(invalid.content_length(), 0);
}

#[test]
fn test_target_is_split_on_first_question_mark() {
    let req = RequestBuilder::new()
        .method(Method::GET)
        .target("/login?next=/a?b=c")
        .build()
        .unwrap();

    assert_eq!(req.path, "/login");
    assert_eq!(req.raw_query.as_deref(), Some("next=/a?b=c"));
    assert_eq!(req.query_params["next"], "/a?b=c");
}

#[test]
fn test_empty_query_is_present_but_empty() {
    let req = RequestBuilder::new()
        .method(Method::GET)
        .target("/login?")
        .build()
        .unwrap();

    assert!(req.has_query());
    assert!(req.is_query_empty());
    assert!(!req.has_malformed_query());
}

#[test]
fn test_body_fields_follow_content_type() {
    let form = RequestBuilder::new()
        .method(Method::POST)
        .target("/register")
        .header("Content-Type", "application/x-www-form-urlencoded")
        .body("account=a&password=b")
        .build()
        .unwrap();
    let json = RequestBuilder::new()
        .method(Method::POST)
        .target("/register")
        .header("Content-Type", "application/json")
        .body("{\"account\":\"a\"}")
        .build()
        .unwrap();

    assert_eq!(form.body_fields["account"], "a");
    assert!(json.body_fields.is_empty());
}

#[test]
fn test_missing_session_cookie() {
    let req = RequestBuilder::new()
        .method(Method::GET)
        .target("/login")
        .header("Cookie", "theme=dark")
        .build()
        .unwrap();

    assert_eq!(req.session_id(), None);
    assert_eq!(req.cookies.get("theme"), Some("dark"));
}

#[test]
fn test_builder_requires_method_and_target() {
    assert!(RequestBuilder::new().target("/").build().is_err());
    assert!(RequestBuilder::new().method(Method::GET).build().is_err());
}

#[test]
fn test_request_method_from_string() {
    assert_eq!(Method::from_str("GET"), Some(Method::GET));
    assert_eq!(Method::from_str("POST"), Some(Method::POST));
    assert_eq!(Method::from_str("INVALID"), None);
    assert_eq!(Method::from_str("get"), None); // Case-sensitive
}

#[test]
fn test_methods_with_body() {
    assert!(Method::POST.has_body());
    assert!(Method::PUT.has_body());
    assert!(!Method::GET.has_body());
    assert!(!Method::HEAD.has_body());
}
