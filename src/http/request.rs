use crate::errors::{Error, Result};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::io::{BufReader, Read};

/// Represents an HTTP request.
#[derive(Debug)]
pub struct Request {
    /// The HTTP method used in the request
    pub method: String,
    /// The full target of the request, query string included
    pub path: String,
    /// Headers of the request
    pub headers: Vec<(String, String)>,
    /// Body of the request
    pub body: String,
}

impl Request {
    /// Create a new request from scratch
    pub fn new(method: &str, path: &str, headers: Vec<(String, String)>, body: String) -> Request {
        Request {
            method: method.to_string(),
            path: path.to_string(),
            headers,
            body,
        }
    }
    /// Create a new GET request for the given path, with an empty body
    pub fn get(path: &str) -> Request {
        Self::new("GET", path, vec![], String::new())
    }
    /// Create a new POST request for the given path, with the given body
    pub fn post(path: &str, body: String) -> Request {
        Self::new("POST", path, vec![], body)
    }
    /// Create a new PUT request for the given path, with the given body
    pub fn put(path: &str, body: String) -> Request {
        Self::new("PUT", path, vec![], body)
    }
    /// Create a new OPTIONS request, as sent by browsers before cross-origin calls
    pub fn options(path: &str) -> Request {
        Self::new("OPTIONS", path, vec![], String::new())
    }

    /// The path without its query string, used for routing
    pub fn route_path(&self) -> &str {
        self.path
            .split_once('?')
            .map_or(self.path.as_str(), |(path, _)| path)
    }

    /// Decoded query string parameters. For repeated keys the last value wins.
    pub fn query(&self) -> HashMap<String, String> {
        self.path
            .split_once('?')
            .map(|(_, query)| {
                url::form_urlencoded::parse(query.as_bytes())
                    .into_owned()
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Value of the first header with the given name, compared case-insensitively
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Decode the JSON body. Malformed bodies are the client's fault.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_str(&self.body)
            .map_err(|err| Error::BadRequest(format!("invalid request body: {}", err)))
    }
}

/// Parse an HTTP request from a byte stream
pub fn parse_request<T>(mut buf_reader: BufReader<T>) -> Result<Request>
where
    T: Sized + Read,
{
    let mut buf = [0; 4096];
    let mut raw = Vec::new();

    let (body_len, parsed_len, mut request) = loop {
        let mut headers = [httparse::EMPTY_HEADER; 64];
        let mut req = httparse::Request::new(&mut headers);
        let bytes_read = buf_reader.read(&mut buf)?;

        if bytes_read == 0 {
            return Err(Error::ConnectionReset);
        }

        raw.extend_from_slice(&buf[..bytes_read]);

        match req.parse(&raw)? {
            httparse::Status::Complete(parsed_len) => {
                let body_len = req
                    .headers
                    .iter()
                    .find(|h| h.name.eq_ignore_ascii_case("Content-Length"))
                    .and_then(|length| String::from_utf8_lossy(length.value).trim().parse::<usize>().ok())
                    .unwrap_or(0);

                break (
                    body_len,
                    parsed_len,
                    Request {
                        method: req.method.unwrap_or("GET").to_string(),
                        path: req.path.unwrap_or("/").to_string(),
                        headers: req
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

    // Keep-alive is not supported, anything after the body is dropped
    while body_len > raw.len() - parsed_len {
        let bytes_read = buf_reader.read(&mut buf)?;
        if bytes_read == 0 {
            return Err(Error::ConnectionReset);
        }
        raw.extend_from_slice(&buf[..bytes_read]);
    }
    request.body = String::from_utf8_lossy(&raw[parsed_len..parsed_len + body_len]).to_string();

    Ok(request)
}

#[cfg(test)]
mod test {
    use super::*;
    use rand::Rng;

    #[test]
    fn test_parse_simple_request() {
        let req_str = b"GET /api/health HTTP/1.1\r\nHost: localhost:3001\r\nUser-Agent: curl/7.68.0\r\nAccept: */*\r\n\r\n";
        let buf_reader = BufReader::new(&req_str[..]);

        let parsed_req = parse_request(buf_reader).unwrap();

        assert_eq!(parsed_req.method, "GET");
        assert_eq!(parsed_req.path, "/api/health");
        assert_eq!(parsed_req.headers.len(), 3);
        assert_eq!(parsed_req.header("user-agent"), Some("curl/7.68.0"));
        assert_eq!(parsed_req.body, "");
    }

    #[test]
    fn test_parse_incomplete_request() {
        let req_str =
            b"GET / HTTP/1.1\r\nHost: localhost:3001\r\nUser-Agent: curl/7.68.0\r\nAccept: */*";
        let buf_reader = BufReader::new(&req_str[..]);

        assert!(matches!(
            parse_request(buf_reader),
            Err(Error::ConnectionReset)
        ));
    }

    #[test]
    fn test_parse_request_with_body() {
        let body = r#"{"message": "find me a restaurant"}"#;
        let req_str = format!(
            "POST /api/chat HTTP/1.1\r\nHost: localhost:3001\r\ncontent-length: {}\r\n\r\n{}",
            body.len(),
            body
        );

        let parsed_req = parse_request(BufReader::new(req_str.as_bytes())).unwrap();

        assert_eq!(parsed_req.method, "POST");
        assert_eq!(parsed_req.body, body);
        let chat: crate::api::ChatRequest = parsed_req.json().unwrap();
        assert_eq!(chat.message, "find me a restaurant");
    }

    #[test]
    fn test_parse_request_with_multibyte_body() {
        let body = r#"{"priceRange": "₹₹₹"}"#;
        let req_str = format!(
            "POST / HTTP/1.1\r\nContent-Length: {}\r\n\r\n{}",
            body.len(),
            body
        );

        let parsed_req = parse_request(BufReader::new(req_str.as_bytes())).unwrap();
        assert_eq!(parsed_req.body, body);
    }

    #[test]
    fn test_parse_request_with_large_body() {
        let mut rng = rand::thread_rng();
        let mut buffer = [0; 40960];
        for c in buffer.iter_mut() {
            *c = rng.gen_range(b'a'..=b'z')
        }
        let body = String::from_utf8_lossy(&buffer);

        let req_str = format!(
            "POST / HTTP/1.1\r\nHost: localhost:3001\r\nContent-Length: {}\r\n\r\n{}",
            buffer.len(),
            body
        );

        let parsed_req = parse_request(BufReader::new(req_str.as_bytes())).unwrap();
        assert_eq!(parsed_req.body, body);
    }

    #[test]
    fn test_query_parameters() {
        let req = Request::get("/api/restaurants?cuisine=Italian&search=wood%20fired&priceRange=%E2%82%B9%E2%82%B9");

        assert_eq!(req.route_path(), "/api/restaurants");
        let query = req.query();
        assert_eq!(query.get("cuisine").unwrap(), "Italian");
        assert_eq!(query.get("search").unwrap(), "wood fired");
        assert_eq!(query.get("priceRange").unwrap(), "₹₹");

        let req = Request::get("/api/restaurants");
        assert_eq!(req.route_path(), "/api/restaurants");
        assert!(req.query().is_empty());
    }

    #[test]
    fn test_malformed_json_is_bad_request() {
        let req = Request::post("/api/orders", "{ nope".to_string());
        let parsed: Result<crate::api::NewOrder> = req.json();
        assert!(matches!(parsed, Err(Error::BadRequest(_))));
    }
}
