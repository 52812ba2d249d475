//! Curl-like diagnostic transcript of every exchange.
//!
//! ```text
//! =================================== REQUEST ===================================
//! curl -X POST https://api.example/genres \
//! -H 'content-type: application/json' \
//! -H 'accept: application/json' \
//! -d '{"name":"Drama"}'
//! =================================== RESPONSE ==================================
//!     STATUS_CODE: 201
//! DATA: {
//!     "id": 1,
//!     "name": "Drama"
//! }
//! ```
//!
//! Status and data are green below 400 and red from 400 up; banners and the
//! request line are magenta. Rendering never fails a test: an error or a
//! panic while formatting is reduced to a single warning.

use console::style;
use eyre::WrapErr;
use itertools::Itertools;
use serde::Serialize;
use std::panic::AssertUnwindSafe;
use tracing::*;

use crate::{
    http::{Log, StatusCode},
    masking,
};

const BANNER_WIDTH: usize = 35;

/// Renders `log` and writes it to the `cinescope::transcript` target.
pub fn emit(log: &Log) {
    match std::panic::catch_unwind(AssertUnwindSafe(|| render(log))) {
        Ok(Ok(transcript)) => info!(target: "cinescope::transcript", "\n{transcript}"),
        Ok(Err(e)) => warn!("logging failed: {e:#}"),
        Err(_) => warn!("logging failed: transcript renderer panicked"),
    }
}

pub fn render(log: &Log) -> eyre::Result<String> {
    let mask = masking::should_mask_sensitive();
    let (url, headers) = if mask {
        (
            masking::mask_url(&log.request.url),
            masking::mask_headers(&log.request.headers),
        )
    } else {
        (log.request.url.clone(), log.request.headers.clone())
    };

    let headers = headers
        .iter()
        .map(|(name, value)| {
            value
                .to_str()
                .map(|value| format!("-H '{name}: {value}'"))
                .wrap_err_with(|| format!("header \"{name}\" is not visible ASCII"))
        })
        .collect::<eyre::Result<Vec<_>>>()?;

    let mut curl = vec![format!(
        "curl -X {}",
        style(format!("{} {url}", log.request.method)).magenta()
    )];
    curl.extend(headers);
    if let Some(body) = request_body(log.request.body.as_deref(), mask)? {
        curl.push(format!("-d '{body}'"));
    }

    let status = log.response.status;
    let data = response_data(&log.response.body, mask)?;
    let (status, data) = if is_success(status) {
        (style(status.as_u16()).green(), style(data))
    } else {
        (style(status.as_u16()).red(), style(data).red())
    };

    Ok([
        banner("REQUEST"),
        curl.iter().join(" \\\n"),
        banner("RESPONSE"),
        format!("\tSTATUS_CODE: {status}\nDATA: {data}"),
    ]
    .join("\n"))
}

fn banner(title: &str) -> String {
    let pad = "=".repeat(BANNER_WIDTH);
    format!("{pad} {} {pad}", style(title).magenta())
}

fn is_success(status: StatusCode) -> bool {
    status.as_u16() < 400
}

/// Compact JSON when parseable; `None` for absent, empty or `{}` bodies.
fn request_body(body: Option<&[u8]>, mask: bool) -> eyre::Result<Option<String>> {
    let Some(body) = body else {
        return Ok(None);
    };
    let text = std::str::from_utf8(body).wrap_err("request body is not UTF-8")?;
    let text = match serde_json::from_str::<serde_json::Value>(text) {
        Ok(mut json) => {
            if mask {
                masking::mask_json(&mut json);
            }
            serde_json::to_string(&json)?
        }
        Err(_) => text.to_string(),
    };
    if text.is_empty() || text == "{}" {
        Ok(None)
    } else {
        Ok(Some(text))
    }
}

/// Four-space pretty JSON when parseable, raw text otherwise.
fn response_data(body: &str, mask: bool) -> eyre::Result<String> {
    if body.trim().is_empty() {
        return Ok(body.to_string());
    }
    let Ok(mut json) = serde_json::from_str::<serde_json::Value>(body) else {
        return Ok(body.to_string());
    };
    if mask {
        masking::mask_json(&mut json);
    }
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    json.serialize(&mut ser)?;
    Ok(String::from_utf8(buf)?)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::http::{LogRequest, LogResponse, Method};
    use reqwest::header::{HeaderMap, HeaderValue};
    use serial_test::serial;
    use test_case::test_case;
    use tracing_subscriber::util::SubscriberInitExt;

    fn log(status: u16, request_body: Option<&str>, response_body: &str) -> Log {
        let mut headers = HeaderMap::new();
        headers.insert("content-type", HeaderValue::from_static("application/json"));
        headers.insert("authorization", HeaderValue::from_static("Bearer secret"));
        Log {
            request: LogRequest {
                url: "https://api.example/genres".parse().unwrap(),
                method: Method::POST,
                headers,
                body: request_body.map(|b| b.as_bytes().to_vec()),
            },
            response: LogResponse {
                status: StatusCode::from_u16(status).unwrap(),
                headers: HeaderMap::new(),
                body: response_body.to_string(),
            },
        }
    }

    fn plain(log: &Log) -> String {
        console::strip_ansi_codes(&render(log).unwrap()).to_string()
    }

    #[test]
    #[serial(masking)]
    fn renders_curl_like_request() {
        let text = plain(&log(201, Some(r#"{"name": "Драма"}"#), r#"{"id":1}"#));

        assert!(text.contains("curl -X POST https://api.example/genres \\\n"));
        assert!(text.contains("-H 'content-type: application/json'"));
        assert!(text.contains("-H 'authorization: Bearer secret'"));
        assert!(text.contains(r#"-d '{"name":"Драма"}'"#));
        assert!(text.contains("REQUEST"));
        assert!(text.contains("RESPONSE"));
    }

    #[test]
    fn pretty_prints_response_with_four_spaces() {
        let text = plain(&log(200, None, r#"{"id":1,"name":"Drama"}"#));
        assert!(text.contains("\tSTATUS_CODE: 200"));
        assert!(text.contains("DATA: {\n    \"id\": 1,\n    \"name\": \"Drama\"\n}"));
    }

    #[test_case(None; "no body")]
    #[test_case(Some(""); "empty body")]
    #[test_case(Some("{}"); "empty object")]
    #[test_case(Some("{ }"); "empty object with whitespace")]
    fn omits_empty_request_body(body: Option<&str>) {
        let text = plain(&log(200, body, ""));
        assert!(!text.contains("-d '"));
    }

    #[test]
    fn keeps_non_json_bodies_verbatim() {
        let text = plain(&log(500, Some("name=Drama"), "Internal Server Error"));
        assert!(text.contains("-d 'name=Drama'"));
        assert!(text.contains("DATA: Internal Server Error"));
        assert!(text.contains("STATUS_CODE: 500"));
    }

    #[test]
    fn colors_follow_status_class() {
        console::set_colors_enabled(true);
        let ok = render(&log(302, None, "")).unwrap();
        let failed = render(&log(404, None, "")).unwrap();

        assert!(ok.contains(&style(302).green().force_styling(true).to_string()));
        assert!(failed.contains(&style(404).red().force_styling(true).to_string()));
    }

    #[test]
    #[serial(masking)]
    fn masks_credentials_when_enabled() {
        masking::set_mask_sensitive(true);
        let text = plain(&log(
            201,
            Some(r#"{"email":"a@b.ru","password":"Secret123"}"#),
            r#"{"accessToken":"jwt","user":{"email":"a@b.ru"}}"#,
        ));
        masking::set_mask_sensitive(false);

        assert!(text.contains("-H 'authorization: *****'"));
        assert!(text.contains(r#""password":"*****""#));
        assert!(text.contains(r#""accessToken": "*****""#));
        assert!(!text.contains("Secret123"));
        assert!(!text.contains("jwt"));
    }

    #[test]
    fn formatting_errors_are_reported_not_raised() {
        let mut broken = log(200, Some("{}"), "");
        broken.request.body = Some(vec![0xff, 0xfe]);
        assert!(render(&broken).is_err());

        let _guard = tracing_subscriber::fmt()
            .with_test_writer()
            .finish()
            .set_default();
        // must not panic nor propagate
        emit(&broken);
        emit(&log(200, None, "{}"));
    }
}
