//! Output formatting helpers.

use std::collections::BTreeMap;

use anyhow::Result;
use clap::ValueEnum;
use serde::Serialize;
use serde_json::Value;
use trustpilot::Response;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Raw,
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    url: &'a str,
    status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    headers: Option<BTreeMap<String, String>>,
    content: Value,
}

/// Render a response; headers are included from verbosity 1 upwards.
pub fn format_response(response: &Response, format: OutputFormat, verbosity: u8) -> Result<String> {
    let with_headers = verbosity > 0;
    match format {
        OutputFormat::Json => {
            let content = response
                .json_value()
                .unwrap_or_else(|| Value::String(response.text()));
            let output = JsonOutput {
                url: response.url(),
                status: response.status_code(),
                headers: with_headers.then(|| headers(response)),
                content,
            };
            Ok(serde_json::to_string_pretty(&output)?)
        }
        OutputFormat::Raw => {
            let mut sections = vec![
                format!("url\n{}", response.url()),
                format!("status\n{}", response.status_code()),
            ];
            if with_headers {
                for (name, value) in headers(response) {
                    sections.push(format!("headers.{}\n{}", name, value));
                }
            }
            sections.push(format!("content\n{}", response.text()));
            // Two blank lines between sections.
            Ok(sections.join("\n\n\n"))
        }
    }
}

fn headers(response: &Response) -> BTreeMap<String, String> {
    let mut map: BTreeMap<String, String> = BTreeMap::new();
    for (name, value) in response.headers() {
        let value = String::from_utf8_lossy(value.as_bytes()).into_owned();
        map.entry(name.to_string())
            .and_modify(|existing| {
                existing.push_str(", ");
                existing.push_str(&value);
            })
            .or_insert(value);
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;
    use trustpilot::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
    use trustpilot::StatusCode;

    const URL: &str = "https://api.trustpilot.com/v1/business-units/5400267300006400057a0113/reviews";

    fn response(body: &str) -> Response {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Response::new(StatusCode::UNAUTHORIZED, URL, headers, body)
    }

    #[test]
    fn test_json_output() {
        let body = r#"{"fault": {"faultstring": "Invalid ApiKey"}}"#;
        let output = format_response(&response(body), OutputFormat::Json, 0).unwrap();
        let value: Value = serde_json::from_str(&output).unwrap();

        assert_eq!(
            value,
            serde_json::json!({
                "url": URL,
                "status": 401,
                "content": {"fault": {"faultstring": "Invalid ApiKey"}}
            })
        );
        assert!(output.find("\"url\"").unwrap() < output.find("\"content\"").unwrap());
    }

    #[test]
    fn test_json_output_verbose_has_headers() {
        let output = format_response(&response("{}"), OutputFormat::Json, 1).unwrap();
        let value: Value = serde_json::from_str(&output).unwrap();

        assert_eq!(value["headers"]["content-type"], "application/json");
    }

    #[test]
    fn test_json_output_text_content() {
        let output = format_response(&response("index,name,age\n0,john,32"), OutputFormat::Json, 0).unwrap();
        let value: Value = serde_json::from_str(&output).unwrap();

        assert_eq!(value["content"], "index,name,age\n0,john,32");
    }

    #[test]
    fn test_raw_output() {
        let output = format_response(&response("index,name,age\n0,john,32"), OutputFormat::Raw, 0).unwrap();

        let expected = [
            "url",
            URL,
            "",
            "",
            "status",
            "401",
            "",
            "",
            "content",
            "index,name,age",
            "0,john,32",
        ]
        .join("\n");
        assert_eq!(output, expected);
    }

    #[test]
    fn test_raw_output_verbose() {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert("server", HeaderValue::from_static("Apigee Router"));
        let response = Response::new(StatusCode::UNAUTHORIZED, URL, headers, "x");
        let output = format_response(&response, OutputFormat::Raw, 1).unwrap();

        let expected = [
            "url",
            URL,
            "",
            "",
            "status",
            "401",
            "",
            "",
            "headers.content-type",
            "application/json",
            "",
            "",
            "headers.server",
            "Apigee Router",
            "",
            "",
            "content",
            "x",
        ]
        .join("\n");
        assert_eq!(output, expected);
    }
}
