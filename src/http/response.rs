use std::io::{BufReader, Read};

use crate::api::ErrorBody;
use crate::errors::{Error, Result};
use serde::Serialize;

/// Headers sent with every response so browser front ends on another origin
/// can call the API
pub const CORS_HEADERS: [(&str, &str); 3] = [
    ("Access-Control-Allow-Origin", "*"),
    ("Access-Control-Allow-Methods", "GET, POST, PUT, OPTIONS"),
    ("Access-Control-Allow-Headers", "Content-Type"),
];

/// An HTTP response to be sent to a client
#[derive(Debug)]
pub struct Response {
    /// Status code of the response. Optional because that's what httparse returns, but it
    /// shouldn't happen in practice since we control the responses.
    pub status: Option<u16>,
    /// Headers for the response. It is not necessary to add Content-Length to it, this is done
    /// automatically on serialization.
    pub headers: Vec<(String, String)>,
    /// Body of the response. Give an empty string for an empty body
    pub body: String,
}

impl Response {
    /// Creates an empty No Content response (204)
    pub fn no_content() -> Response {
        Response {
            status: Some(204),
            headers: vec![],
            body: String::new(),
        }
    }

    /// Creates an OK (200) response with the given body
    pub fn ok_with_body(body: String) -> Response {
        Response {
            status: Some(200),
            headers: vec![],
            body,
        }
    }

    /// Creates a response with the given status and a JSON body
    pub fn json<T: Serialize + ?Sized>(status: u16, value: &T) -> Result<Response> {
        Ok(Response {
            status: Some(status),
            headers: vec![("Content-Type".to_string(), "application/json".to_string())],
            body: serde_json::to_string(value)?,
        })
    }

    /// Creates an error response with an `{"error": message}` body.
    ///
    /// The code must be in the 4xx or 5xx range.
    pub fn error(code: u16, message: &str) -> Response {
        debug_assert!((400..600).contains(&code), "Invalid error code");
        let body = ErrorBody {
            error: message.to_string(),
        };
        Response {
            status: Some(code),
            headers: vec![("Content-Type".to_string(), "application/json".to_string())],
            body: serde_json::to_string(&body).unwrap_or_default(),
        }
    }

    /// Creates an Internal Server Error (500) response. No detail is given to
    /// the client.
    pub fn internal_server_error() -> Response {
        Self::error(500, "Internal server error")
    }

    /// Add the CORS headers
    pub fn with_cors(mut self) -> Response {
        self.headers.extend(
            CORS_HEADERS
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string())),
        );
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

impl From<Error> for Response {
    /// Only client errors carry their message back
    fn from(err: Error) -> Response {
        let code = err.status_code();
        match err {
            Error::NotFound(message) | Error::BadRequest(message) => {
                Response::error(code, &message)
            }
            err => {
                tracing::error!(%err, "request failed");
                Response::internal_server_error()
            }
        }
    }
}

/// Parse an HTTP response from a byte stream
pub fn parse_response<T>(mut buf_reader: BufReader<T>) -> Result<Response>
where
    T: Sized + Read,
{
    let mut buf = [0; 4096];
    let mut raw = Vec::new();

    let (body_len, parsed_len, mut response) = loop {
        let mut headers = [httparse::EMPTY_HEADER; 64];
        let mut resp = httparse::Response::new(&mut headers);
        let bytes_read = buf_reader.read(&mut buf)?;

        if bytes_read == 0 {
            return Err(Error::ConnectionReset);
        }

        raw.extend_from_slice(&buf[..bytes_read]);

        match resp.parse(&raw)? {
            httparse::Status::Complete(parsed_len) => {
                let body_len = resp
                    .headers
                    .iter()
                    .find(|h| h.name.eq_ignore_ascii_case("Content-Length"))
                    .and_then(|length| String::from_utf8_lossy(length.value).trim().parse::<usize>().ok())
                    .unwrap_or(0);

                break (
                    body_len,
                    parsed_len,
                    Response {
                        status: resp.code,
                        headers: resp
                            .headers
                            .iter()
                            .map(|h| {
                                (
                                    h.name.to_string(),
                                    String::from_utf8_lossy(h.value).to_string(),
                                )
                            })
                            .collect(),
                        body: String::new(),
                    },
                );
            }
            httparse::Status::Partial => continue,
        }
    };

    while body_len > raw.len() - parsed_len {
        let bytes_read = buf_reader.read(&mut buf)?;
        if bytes_read == 0 {
            return Err(Error::ConnectionReset);
        }
        raw.extend_from_slice(&buf[..bytes_read]);
    }
    response.body = String::from_utf8_lossy(&raw[parsed_len..parsed_len + body_len]).to_string();

    Ok(response)
}
