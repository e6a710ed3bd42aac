use mockwire::{
    Cookie, Error, Headers, MkAnswer, MockContainer, Request, Response, RestResponse,
    StatusCode, WebLinkingResponse,
};

fn response(uri: &str, status: u16, headers: Vec<(&str, &str)>, body: &str) -> Response {
    Response::new(
        Request::new(uri).unwrap(),
        StatusCode::from_u16(status).unwrap(),
        headers.into_iter().collect::<Headers>(),
        body.as_bytes().to_vec(),
    )
}

#[test]
fn assertions_pass_on_a_matching_response() {
    // Arrange
    let response = RestResponse::new(response(
        "http://localhost/",
        200,
        vec![("Content-Type", "text/plain")],
        "works fine!",
    ));

    // Act
    response
        .assert_status(200)
        .assert_header("content-type", "text/plain")
        .assert_body_contains("fine")
        .assert_body(|body| body.starts_with("works"));
}

#[test]
#[should_panic(expected = "HTTP response status is not equal to 200")]
fn assert_status_panics_on_a_different_status() {
    // Arrange
    let response = RestResponse::new(response("http://localhost/", 404, vec![], ""));

    // Act
    response.assert_status(200);
}

#[test]
#[should_panic(expected = "doesn't contain 'missing'")]
fn assert_body_contains_panics_when_the_text_is_absent() {
    // Arrange
    let response = RestResponse::new(response("http://localhost/", 200, vec![], "present"));

    // Act
    response.assert_body_contains("missing");
}

#[test]
#[should_panic(expected = "HTTP header X-Test doesn't have the value '2'")]
fn assert_header_panics_when_no_value_matches() {
    // Arrange
    let response = RestResponse::new(response(
        "http://localhost/",
        200,
        vec![("X-Test", "1")],
        "",
    ));

    // Act
    response.assert_header("X-Test", "2");
}

#[test]
fn cookies_are_parsed_from_set_cookie_headers() {
    // Arrange
    let response = RestResponse::new(response(
        "http://localhost/",
        200,
        vec![
            ("Set-Cookie", "cookie1=foo1;Path=/;Comment=\"\", bar=1;"),
            ("Set-Cookie", "cookie2=\"quoted\"; DOMAIN=example.com"),
        ],
        "",
    ));

    // Act
    let first = response.cookie("cookie1").unwrap();
    let second = response.cookie("cookie2").unwrap();

    // Assert
    assert_eq!(first.value(), "foo1");
    assert_eq!(first.path(), Some("/"));
    assert_eq!(second.value(), "quoted");
    assert_eq!(second.domain(), Some("example.com"));
    assert!(response.cookie("absent").is_none());
}

#[test]
fn a_set_cookie_header_without_a_pair_is_not_a_cookie() {
    assert!(Cookie::parse("garbage").is_none());
    assert!(Cookie::parse("=value").is_none());
}

#[test]
fn jump_resolves_relative_targets_against_the_origin_request() {
    // Arrange
    let response = RestResponse::new(response("http://host:88/a/b", 200, vec![], ""));

    // Act
    let absolute_path = response.jump("/c").unwrap();
    let relative_path = response.jump("d").unwrap();
    let query_only = response.jump("?x=1").unwrap();
    let absolute = response.jump("http://other/e").unwrap();

    // Assert
    assert_eq!(absolute_path.uri().as_str(), "http://host:88/c");
    assert_eq!(relative_path.uri().as_str(), "http://host:88/a/d");
    assert_eq!(query_only.uri().as_str(), "http://host:88/a/b?x=1");
    assert_eq!(absolute.uri().as_str(), "http://other/e");
}

#[test]
fn jump_keeps_the_query_of_the_target() {
    // Arrange
    let response = RestResponse::new(response("http://locahost:888/tt", 200, vec![], ""));

    // Act
    let next = response.jump("/foo/bar?hey").unwrap();

    // Assert
    assert_eq!(next.uri().as_str(), "http://locahost:888/foo/bar?hey");
}

#[test]
fn jump_carries_the_cookies_set_by_the_response() {
    // Arrange
    let response = RestResponse::new(response(
        "http://localhost/",
        302,
        vec![
            ("Set-Cookie", "session=abc; Path=/"),
            ("Set-Cookie", "empty=; Path=/"),
        ],
        "",
    ));

    // Act
    let next = response.jump("/next").unwrap();

    // Assert
    assert_eq!(
        next.headers(),
        &[("Cookie".to_string(), "session=abc".to_string())]
    );
}

#[test]
fn follow_without_a_location_header_fails() {
    // Arrange
    let response = RestResponse::new(response("http://localhost/", 302, vec![], ""));

    // Act
    let outcome = response.follow();

    // Assert
    assert!(matches!(outcome, Err(Error::MissingHeader(name)) if name == "location"));
}

#[tokio::test]
async fn follow_sends_a_new_request_to_the_location() {
    // Arrange
    let mut container = MockContainer::new();
    container
        .next(MkAnswer::new(301).with_header("Location", "/next"))
        .next(MkAnswer::text("arrived"));
    let home = container.start().unwrap();
    let response = Request::new(home.join("start").unwrap().as_str())
        .unwrap()
        .with_header("Accept", "text/plain")
        .fetch()
        .await
        .unwrap();

    // Act
    let next = RestResponse::new(response).follow().unwrap();
    let response = RestResponse::new(next.fetch().await.unwrap());

    // Assert
    response.assert_status(200).assert_body_contains("arrived");
    assert_eq!(container.take().unwrap().uri().path(), "/start");
    let query = container.take().unwrap();
    assert_eq!(query.uri().path(), "/next");
    assert_eq!(query.headers().first("accept"), Some("text/plain"));
}

#[test]
fn links_are_parsed_from_link_headers() {
    let headers = [
        "</hey/foo>; title=\"Hi!\"; rel=foo",
        "</hey/foo>; title=\"\u{20ac}\"; rel=\"foo\"; media=\"text/xml\"",
    ];
    for header in headers {
        // Arrange
        let response = WebLinkingResponse::new(response(
            "http://localhost/",
            200,
            vec![("Link", header)],
            "",
        ));

        // Act
        let link = response.link("foo").unwrap().unwrap();

        // Assert
        assert_eq!(link.uri(), "/hey/foo");
        assert!(link.get("title").is_some());
        assert!(response.link("another one").unwrap().is_none());
    }
}

#[test]
fn links_are_followed_by_relation() {
    // Arrange
    let response = WebLinkingResponse::new(response(
        "http://localhost/test",
        200,
        vec![("Link", "</a>; rel=\"first\", <http://localhost/o>; rel=\"second\"")],
        "",
    ));

    // Act
    let first = response.follow("first").unwrap();
    let second = response.follow("second").unwrap();

    // Assert
    assert_eq!(first.uri().as_str(), "http://localhost/a");
    assert_eq!(second.uri().as_str(), "http://localhost/o");
    assert_eq!(response.links().unwrap().len(), 2);
}

#[test]
fn following_an_absent_relation_fails() {
    // Arrange
    let response = WebLinkingResponse::new(response(
        "http://localhost/",
        200,
        vec![("Link", "</a>; rel=\"first\"")],
        "",
    ));

    // Act
    let outcome = response.follow("next");

    // Assert
    assert_eq!(
        outcome.unwrap_err().to_string(),
        "Link with rel=\"next\" doesn't exist"
    );
}

#[test]
fn a_malformed_link_header_is_an_error() {
    // Arrange
    let response = WebLinkingResponse::new(response(
        "http://localhost/",
        200,
        vec![("Link", "not a link")],
        "",
    ));

    // Act
    let outcome = response.links();

    // Assert
    assert!(matches!(outcome, Err(Error::MalformedLink(text)) if text == "not a link"));
}

#[test]
fn header_names_keep_the_case_they_were_first_seen_with() {
    // Arrange
    let pairs = vec![("x-Custom", "1"), ("X-CUSTOM", "2"), ("etag", "\"abc\"")];

    // Act
    let headers: Headers = pairs.into_iter().collect();

    // Assert
    assert_eq!(headers.names().collect::<Vec<_>>(), vec!["x-Custom", "etag"]);
    assert_eq!(headers.get("x-custom").unwrap(), &["1", "2"]);
    assert_eq!(headers.first("ETag"), Some("\"abc\""));
}

#[test]
fn the_response_dump_has_status_headers_and_body() {
    // Arrange
    let response = response(
        "http://localhost/dump",
        404,
        vec![("X-Test", "1")],
        "nothing here",
    );

    // Act
    let dump = response.to_string();

    // Assert
    assert_eq!(
        dump,
        "404 Not Found [http://localhost/dump]\nX-Test: 1\n\nnothing here\n"
    );
}
