use serde::Deserialize;
use serde_json::json;

use super::*;

#[derive(Debug, Deserialize, PartialEq)]
struct Issue {
    title: String,
    #[serde(default)]
    labels: Vec<String>,
}

#[derive(Debug, Deserialize, PartialEq, Default)]
struct Optional {
    #[serde(default)]
    title: Option<String>,
}

fn json_response(value: &Value) -> Result<Response, String> {
    let data = serde_json::to_vec(value).map_err(|err| err.to_string())?;
    Ok(Response::new(200, data))
}

#[test]
fn display_reports_status_and_length() -> Result<(), String> {
    let response = Response::new(201, "hello");
    let text = response.to_string();
    if text != "Status Code: 201, Data Length: 5" {
        return Err(format!("Unexpected display: {}", text));
    }
    Ok(())
}

#[test]
fn equality_ignores_request() -> Result<(), String> {
    let url = Url::parse("https://example.com").map_err(|err| err.to_string())?;
    let request = UrlRequest::new(crate::target::Method::Get, url);
    let lhs = Response::new(200, "a").with_request(Some(request));
    let rhs = Response::new(200, "a");
    if lhs != rhs {
        return Err("Expected responses to compare equal".to_owned());
    }
    if lhs == Response::new(200, "b") {
        return Err("Expected data to participate in equality".to_owned());
    }
    Ok(())
}

#[test]
fn filters_accept_matching_codes() -> Result<(), String> {
    Response::new(204, "")
        .filter_successful_status_codes()
        .map_err(|err| err.to_string())?;
    Response::new(304, "")
        .filter_successful_status_and_redirect_codes()
        .map_err(|err| err.to_string())?;
    Response::new(418, "")
        .filter_status_code(418)
        .map_err(|err| err.to_string())?;
    Response::new(100, "")
        .filter(100..200)
        .map_err(|err| err.to_string())?;
    Ok(())
}

#[test]
fn filters_reject_other_codes() -> Result<(), String> {
    let cases = [
        Response::new(302, "").filter_successful_status_codes(),
        Response::new(404, "").filter_successful_status_and_redirect_codes(),
        Response::new(200, "").filter_status_code(201),
    ];
    for result in cases {
        match result {
            Err(MoyaError::StatusCode(response)) if response.data.is_empty() => {}
            other => return Err(format!("Expected status code error, got {:?}", other)),
        }
    }
    Ok(())
}

#[test]
fn map_json_handles_empty_data() -> Result<(), String> {
    let empty = Response::new(200, "");
    match empty.map_json(false) {
        Ok(Value::Null) => {}
        other => return Err(format!("Expected null, got {:?}", other)),
    }
    match empty.map_json(true) {
        Err(MoyaError::JsonMapping(_)) => Ok(()),
        other => Err(format!("Expected JSON mapping error, got {:?}", other)),
    }
}

#[test]
fn map_json_rejects_invalid_data() -> Result<(), String> {
    match Response::new(200, "not json").map_json(false) {
        Err(MoyaError::JsonMapping(response)) if response.status_code == 200 => Ok(()),
        other => Err(format!("Expected JSON mapping error, got {:?}", other)),
    }
}

#[test]
fn map_string_reads_body_and_key_paths() -> Result<(), String> {
    let response = json_response(&json!({"issue": {"title": "Broken"}}))?;
    let title = response
        .map_string(Some("issue.title"))
        .map_err(|err| err.to_string())?;
    if title != "Broken" {
        return Err(format!("Unexpected title: {}", title));
    }
    match response.map_string(Some("issue")) {
        Err(MoyaError::StringMapping(_)) => {}
        other => return Err(format!("Expected string mapping error, got {:?}", other)),
    }
    let plain = Response::new(200, "plain text")
        .map_string(None)
        .map_err(|err| err.to_string())?;
    if plain != "plain text" {
        return Err(format!("Unexpected body: {}", plain));
    }
    match Response::new(200, vec![0xff_u8, 0xfe]).map_string(None) {
        Err(MoyaError::StringMapping(_)) => Ok(()),
        other => Err(format!("Expected string mapping error, got {:?}", other)),
    }
}

#[test]
fn map_decodes_whole_body_and_key_paths() -> Result<(), String> {
    let response = json_response(&json!({"data": {"title": "Hello", "labels": ["bug"]}}))?;
    let issue: Issue = response
        .map(Some("data"), true)
        .map_err(|err| err.to_string())?;
    if issue.title != "Hello" || issue.labels != ["bug"] {
        return Err(format!("Unexpected issue: {:?}", issue));
    }

    let response = json_response(&json!({"title": "Top"}))?;
    let issue: Issue = response.map(None, true).map_err(|err| err.to_string())?;
    if issue.title != "Top" {
        return Err(format!("Unexpected issue: {:?}", issue));
    }

    let response = json_response(&json!({"data": {"count": 3}}))?;
    let count: u32 = response
        .map(Some("data.count"), true)
        .map_err(|err| err.to_string())?;
    if count != 3 {
        return Err(format!("Unexpected count: {}", count));
    }
    Ok(())
}

#[test]
fn map_reports_missing_key_path_and_decode_failures() -> Result<(), String> {
    let response = json_response(&json!({"data": {"title": 1}}))?;
    match response.map::<Issue>(Some("missing"), true) {
        Err(MoyaError::JsonMapping(_)) => {}
        other => return Err(format!("Expected JSON mapping error, got {:?}", other)),
    }
    match response.map::<Issue>(Some("data"), true) {
        Err(MoyaError::ObjectMapping { response, .. }) if response.status_code == 200 => Ok(()),
        other => Err(format!("Expected object mapping error, got {:?}", other)),
    }
}

#[test]
fn map_tolerates_empty_data_when_allowed() -> Result<(), String> {
    let empty = Response::new(204, "");
    let value: Optional = empty.map(None, false).map_err(|err| err.to_string())?;
    if value != Optional::default() {
        return Err(format!("Expected empty object, got {:?}", value));
    }
    let values: Vec<Optional> = empty.map(None, false).map_err(|err| err.to_string())?;
    if values != vec![Optional::default()] {
        return Err(format!("Expected one empty element, got {:?}", values));
    }
    match empty.map::<Optional>(None, true) {
        Err(MoyaError::ObjectMapping { .. }) => Ok(()),
        other => Err(format!("Expected object mapping error, got {:?}", other)),
    }
}

#[test]
fn content_length_reads_header() -> Result<(), String> {
    let mut head = HttpResponseHead::new(200);
    head.headers.insert(
        reqwest::header::CONTENT_LENGTH,
        reqwest::header::HeaderValue::from_static("42"),
    );
    if head.content_length() != Some(42) {
        return Err(format!("Unexpected content length: {:?}", head.content_length()));
    }
    Ok(())
}
