use crate::errors::Result;
use crate::http::{parse_request, Request, Response};
use crate::threadpool::ThreadPool;
use std::io::{BufReader, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::time::Instant;

/// Turn an HTTP status code into its reason phrase
pub fn code_to_string(code: u16) -> &'static str {
    match code {
        200 => "OK",
        201 => "Created",
        204 => "No Content",
        400 => "Bad Request",
        404 => "Not Found",
        405 => "Method Not Allowed",
        500 => "Internal Server Error",
        _ => "Unknown",
    }
}

/// This is the main server.
///
/// It listens for incoming connections on a TCP socket, parses the requests and dispatches them
/// to a handler. Whatever the handler produces is then converted in an HTTP response and sent
/// back to the client. One request per connection.
pub struct HttpServer {
    listener: TcpListener,
}

impl HttpServer {
    /// Create a new server listening on the given address
    pub fn new(addr: &str) -> Result<Self> {
        Ok(HttpServer {
            listener: TcpListener::bind(addr)?,
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Start the server
    ///
    /// Calls the handler with the incoming requests on a pool of `workers` threads.
    ///
    /// This function is blocking, with no real way of stopping it (except the socket being
    /// forcefully closed by the OS or the program being killed)
    pub fn serve<F>(&self, workers: usize, handler: F) -> Result<()>
    where
        F: Fn(Request) -> Response + Send + Sync + 'static + Clone,
    {
        let threadpool = ThreadPool::new(workers.max(1));
        tracing::info!(workers = workers.max(1), "accepting connections");

        for stream in self.listener.incoming() {
            let mut stream = match stream {
                Ok(stream) => stream,
                Err(err) => {
                    tracing::warn!(%err, "failed to accept connection");
                    continue;
                }
            };
            let handler = handler.clone();
            threadpool.execute(move || handle_stream(&mut stream, &handler))?;
        }
        Ok(())
    }

    /// Utility function for one-shot servers.
    ///
    /// This is mostly for testing, it listens to `count` connections, processes the
    /// requests and exits.
    pub fn serve_n<F>(&self, count: usize, handler: F) -> Result<()>
    where
        F: Fn(Request) -> Response,
    {
        for stream in self.listener.incoming().take(count) {
            handle_stream(&mut stream?, &handler);
        }
        Ok(())
    }
}

/// Parse an HTTP request from a TCP stream, calls the handler and write back the answer
fn handle_stream<F>(mut stream: &mut TcpStream, handler: F)
where
    F: Fn(Request) -> Response,
{
    let start = Instant::now();
    let buf_reader = BufReader::new(&mut stream);
    match parse_request(buf_reader) {
        Ok(req) => {
            let method = req.method.clone();
            let path = req.path.clone();
            let resp = handler(req);
            tracing::info!(
                %method,
                %path,
                status = resp.status.unwrap_or(500),
                latency_ms = start.elapsed().as_millis() as u64,
                "request handled"
            );
            respond(stream, resp);
        }
        Err(err) => {
            tracing::warn!(%err, "malformed request");
            respond(stream, Response::error(400, "Malformed request"));
        }
    }
}

/// Writes an HTTP response to a stream
fn respond(stream: &mut TcpStream, resp: Response) {
    let status = resp.status.unwrap_or(500);
    let result = stream.write_all(
        format!(
            "HTTP/1.1 {} {}\r\nContent-Length: {}\r\nConnection: close\r\n{}\r\n{}",
            status,
            code_to_string(status),
            resp.body.len(),
            resp.headers
                .iter()
                .map(|(k, v)| format!("{}: {}\r\n", k, v))
                .collect::<Vec<_>>()
                .join(""),
            resp.body
        )
        .as_bytes(),
    );

    if let Err(err) = result {
        tracing::warn!(%err, "failed to respond");
    }
}
