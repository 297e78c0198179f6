//! Verify request building and response parsing against JSON test vectors
//! stored in `test-vectors/`.
//!
//! Request vectors describe a client configuration, a verb call and the exact
//! request that must reach the transport. Response vectors describe a
//! simulated response and how it must be classified.

use std::cell::RefCell;

use artifactory_core::{
    parse_response, ArtifactoryClient, ClientConfig, ClientError, HttpMethod, HttpRequest,
    HttpResponse, RequestOptions, Transport, TransportError,
};

/// Captures the last request and answers 200 with an empty body.
#[derive(Default)]
struct Recorder {
    last: RefCell<Option<HttpRequest>>,
}

impl Transport for Recorder {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        *self.last.borrow_mut() = Some(request.clone());
        Ok(HttpResponse {
            status: 200,
            body: Vec::new(),
        })
    }
}

fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        "PUT" => HttpMethod::Put,
        "DELETE" => HttpMethod::Delete,
        other => panic!("unknown method: {other}"),
    }
}

fn config_from(value: &serde_json::Value) -> ClientConfig {
    let base_url = value["base_url"].as_str().unwrap();
    match value["token"].as_str() {
        Some(token) => ClientConfig::token(base_url, token),
        None => ClientConfig::basic(
            base_url,
            value["username"].as_str().unwrap(),
            value["password"].as_str().unwrap(),
        ),
    }
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

#[test]
fn request_test_vectors() {
    let raw = include_str!("../../test-vectors/requests.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let client = ArtifactoryClient::with_transport(config_from(&case["config"]), Recorder::default());

        let options: RequestOptions = case["options"]
            .as_object()
            .unwrap()
            .iter()
            .map(|(k, v)| (k.clone(), v.as_str().unwrap().to_string()))
            .collect();
        let path = case["path"].as_str().unwrap();
        let data = case["data"].as_str().unwrap_or_default();

        match case["verb"].as_str().unwrap() {
            "get" => client.get(path, &options).map(drop),
            "post" => client.post(path, data, &options).map(drop),
            "put" => client.put(path, data, &options).map(drop),
            "delete" => client.delete(path),
            other => panic!("{name}: unknown verb {other}"),
        }
        .unwrap();

        let req = client.transport().last.borrow_mut().take().unwrap();
        let expected = &case["expected_request"];

        assert_eq!(req.method, parse_method(expected["method"].as_str().unwrap()), "{name}: method");
        assert_eq!(req.url, expected["url"].as_str().unwrap(), "{name}: url");
        assert_eq!(
            req.body.as_deref(),
            expected["body"].as_str().map(str::as_bytes),
            "{name}: body"
        );

        let expected_headers = expected["headers"].as_array().unwrap();
        assert_eq!(req.headers.len(), expected_headers.len(), "{name}: header count");
        for ((actual_name, actual_value), pair) in req.headers.iter().zip(expected_headers) {
            assert_eq!(actual_name, pair[0].as_str().unwrap(), "{name}: header name");
            // A null value only asserts presence.
            if let Some(value) = pair[1].as_str() {
                assert_eq!(actual_value, value, "{name}: header {actual_name}");
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

#[test]
fn response_test_vectors() {
    let raw = include_str!("../../test-vectors/responses.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let sim = &case["simulated_response"];
        let body = sim["body"].as_str().unwrap().as_bytes().to_vec();
        let response = HttpResponse {
            status: sim["status"].as_u64().unwrap() as u16,
            body: body.clone(),
        };
        let result = parse_response(response);
        let expected = &case["expected_result"];

        if let Some(ok) = expected["ok"].as_str() {
            assert_eq!(result.unwrap(), ok.as_bytes(), "{name}: body");
            continue;
        }

        let err = result.unwrap_err();
        assert_eq!(err.to_string(), expected["message"].as_str().unwrap(), "{name}: message");
        assert_eq!(err.body(), body.as_slice(), "{name}: raw body kept");
        match expected["error"].as_str().unwrap() {
            "Api" => assert!(matches!(err, ClientError::Api { .. }), "{name}: expected Api"),
            "UnexpectedStatus" => assert!(
                matches!(err, ClientError::UnexpectedStatus { .. }),
                "{name}: expected UnexpectedStatus"
            ),
            other => panic!("{name}: unknown expected error: {other}"),
        }
    }
}
