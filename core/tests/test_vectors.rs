//! Verify build/parse methods against JSON test vectors stored in `test-vectors/`.
//!
//! Each vector file describes inputs, the expected form fields (in order),
//! optionally the exact encoded body, a simulated response and the expected
//! parse result. Cases with `expected_error` must be rejected locally.

use chimp_core::{
    ChimpClient, ClientConfig, CreateSpinOptions, HttpRequest, HttpResponse, RewriteOptions,
    RewriteResult, UsageStats, ValidationError,
};

const BASE_URL: &str = "http://localhost:3000";

fn client() -> ChimpClient {
    let config = ClientConfig::new("vectors").unwrap().with_base_url(BASE_URL);
    ChimpClient::new(config)
}

fn str_field<'a>(value: &'a serde_json::Value, key: &str) -> &'a str {
    value[key].as_str().unwrap()
}

/// Compare a built request with `expected_request`.
fn check_request(name: &str, req: &HttpRequest, expected: &serde_json::Value) {
    assert_eq!(req.url, format!("{BASE_URL}{}", str_field(expected, "path")), "{name}: url");

    let expected_form: Vec<(String, String)> = expected["form"]
        .as_array()
        .unwrap()
        .iter()
        .map(|pair| {
            let arr = pair.as_array().unwrap();
            (arr[0].as_str().unwrap().to_string(), arr[1].as_str().unwrap().to_string())
        })
        .collect();
    assert_eq!(req.form.fields(), expected_form.as_slice(), "{name}: form");

    if let Some(body) = expected.get("body") {
        assert_eq!(req.body(), body.as_str().unwrap(), "{name}: body");
    }
}

fn simulated(case: &serde_json::Value) -> HttpResponse {
    let sim = &case["simulated_response"];
    HttpResponse {
        status: sim["status"].as_u64().unwrap() as u16,
        headers: Vec::new(),
        body: str_field(sim, "body").to_string(),
    }
}

fn check_error(name: &str, err: ValidationError, case: &serde_json::Value) {
    assert_eq!(err.to_string(), str_field(case, "expected_error"), "{name}: error");
}

// ---------------------------------------------------------------------------
// ChimpRewrite
// ---------------------------------------------------------------------------

#[test]
fn rewrite_test_vectors() {
    let raw = include_str!("../../test-vectors/rewrite.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = str_field(case, "name");
        let input = &case["input"];
        let options: RewriteOptions = serde_json::from_value(input["options"].clone()).unwrap();

        let built = c.build_rewrite(
            str_field(input, "email"),
            str_field(input, "api_key"),
            str_field(input, "text"),
            &options,
        );
        if case.get("expected_error").is_some() {
            check_error(name, built.unwrap_err(), case);
            continue;
        }

        check_request(name, &built.unwrap(), &case["expected_request"]);

        let result = c.parse_rewrite(simulated(case)).unwrap();
        let expected: RewriteResult = serde_json::from_value(case["expected_result"].clone()).unwrap();
        assert_eq!(result, expected, "{name}: parsed result");
    }
}

// ---------------------------------------------------------------------------
// CreateSpin
// ---------------------------------------------------------------------------

#[test]
fn create_spin_test_vectors() {
    let raw = include_str!("../../test-vectors/create_spin.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = str_field(case, "name");
        let input = &case["input"];
        let options: CreateSpinOptions = serde_json::from_value(input["options"].clone()).unwrap();

        let built = c.build_create_spin(
            str_field(input, "email"),
            str_field(input, "api_key"),
            str_field(input, "text"),
            &options,
        );
        if case.get("expected_error").is_some() {
            check_error(name, built.unwrap_err(), case);
            continue;
        }

        check_request(name, &built.unwrap(), &case["expected_request"]);

        let result = c.parse_create_spin(simulated(case)).unwrap();
        let expected: RewriteResult = serde_json::from_value(case["expected_result"].clone()).unwrap();
        assert_eq!(result, expected, "{name}: parsed result");
    }
}

// ---------------------------------------------------------------------------
// Statistics
// ---------------------------------------------------------------------------

#[test]
fn statistics_test_vectors() {
    let raw = include_str!("../../test-vectors/statistics.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = str_field(case, "name");
        let input = &case["input"];

        let built = c.build_statistics(str_field(input, "email"), str_field(input, "api_key"));
        if case.get("expected_error").is_some() {
            check_error(name, built.unwrap_err(), case);
            continue;
        }

        check_request(name, &built.unwrap(), &case["expected_request"]);

        let stats = c.parse_statistics(simulated(case)).unwrap();
        let expected: UsageStats = serde_json::from_value(case["expected_result"].clone()).unwrap();
        assert_eq!(stats, expected, "{name}: parsed result");
    }
}
