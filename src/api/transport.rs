//! Delivery of location updates to the map server

use crate::api::types::{LocationUpdate, ServerAck};
use log::{debug, warn};
use reqwest::blocking::Client;
use std::collections::VecDeque;
use std::thread;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Path of the location endpoint relative to the server base URL
pub const UPDATE_LOCATION_PATH: &str = "update_location";

/// Transport error types
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransportError {
    #[error("Invalid server URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("Request failed: {reason}")]
    Request { reason: String },
    /// 4xx reply; the server will not accept this payload on retry either
    #[error("Server rejected update with status {status}: {body}")]
    Rejected { status: u16, body: String },
    #[error("Server error {status}: {body}")]
    ServerError { status: u16, body: String },
}

impl TransportError {
    /// Whether sending the same payload again could succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, TransportError::Request { .. } | TransportError::ServerError { .. })
    }
}

/// Result type for transport operations
pub type TransportResult<T> = Result<T, TransportError>;

/// Anything that can deliver a location update
pub trait Transport {
    fn send(&mut self, update: &LocationUpdate) -> TransportResult<ServerAck>;
}

/// Blocking HTTP transport with simple retry
pub struct HttpTransport {
    client: Client,
    endpoint: Url,
    retry_count: u8,
    retry_delay: Duration,
}

impl HttpTransport {
    /// Create a transport posting to `<server_url>/update_location`
    pub fn new(server_url: &str, timeout: Duration) -> TransportResult<Self> {
        let endpoint = endpoint_url(server_url)?;
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::Request { reason: e.to_string() })?;

        Ok(Self {
            client,
            endpoint,
            retry_count: 0,
            retry_delay: Duration::from_millis(0),
        })
    }

    /// Retry failed deliveries `retry_count` extra times, `delay` apart
    pub fn with_retries(mut self, retry_count: u8, delay: Duration) -> Self {
        self.retry_count = retry_count;
        self.retry_delay = delay;
        self
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn send_once(&self, update: &LocationUpdate) -> TransportResult<ServerAck> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(update)
            .send()
            .map_err(|e| TransportError::Request { reason: e.to_string() })?;

        let status = response.status();
        let body = response
            .text()
            .map_err(|e| TransportError::Request { reason: e.to_string() })?;

        if status.is_success() {
            // Older servers answer with an empty or non-JSON body
            Ok(serde_json::from_str(&body).unwrap_or_default())
        } else if status.is_client_error() {
            Err(TransportError::Rejected {
                status: status.as_u16(),
                body,
            })
        } else {
            Err(TransportError::ServerError {
                status: status.as_u16(),
                body,
            })
        }
    }
}

impl Transport for HttpTransport {
    fn send(&mut self, update: &LocationUpdate) -> TransportResult<ServerAck> {
        let mut attempt = 0;
        loop {
            match self.send_once(update) {
                Ok(ack) => {
                    debug!("Sent update for {} to {}", update.id, self.endpoint);
                    return Ok(ack);
                }
                Err(error) if error.is_retryable() && attempt < self.retry_count => {
                    attempt += 1;
                    warn!(
                        "Error sending location (attempt {}/{}): {}",
                        attempt,
                        self.retry_count + 1,
                        error
                    );
                    thread::sleep(self.retry_delay);
                }
                Err(error) => return Err(error),
            }
        }
    }
}

/// Resolve the update endpoint, treating the base URL as a directory
pub fn endpoint_url(server_url: &str) -> TransportResult<Url> {
    let mut base = Url::parse(server_url).map_err(|e| TransportError::InvalidUrl {
        url: server_url.to_string(),
        reason: e.to_string(),
    })?;

    if base.cannot_be_a_base() {
        return Err(TransportError::InvalidUrl {
            url: server_url.to_string(),
            reason: "not a base URL".to_string(),
        });
    }
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }

    base.join(UPDATE_LOCATION_PATH).map_err(|e| TransportError::InvalidUrl {
        url: server_url.to_string(),
        reason: e.to_string(),
    })
}

/// In-memory transport that records every update
#[derive(Debug, Default)]
pub struct MockTransport {
    sent: Vec<LocationUpdate>,
    failures: VecDeque<TransportError>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next send fail with `error`
    pub fn fail_next(&mut self, error: TransportError) {
        self.failures.push_back(error);
    }

    pub fn sent(&self) -> &[LocationUpdate] {
        &self.sent
    }
}

impl Transport for MockTransport {
    fn send(&mut self, update: &LocationUpdate) -> TransportResult<ServerAck> {
        if let Some(error) = self.failures.pop_front() {
            return Err(error);
        }
        self.sent.push(update.clone());
        Ok(ServerAck {
            status: Some("location updated".to_string()),
            error: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufRead, BufReader, Read, Write};
    use std::net::TcpListener;

    fn update() -> LocationUpdate {
        LocationUpdate {
            id: "nota".to_string(),
            lat: 1.0,
            lng: 2.0,
            heading: Some(45.0),
            accuracy: Some(6.0),
        }
    }

    /// Serve one canned HTTP response per entry and return the request bodies
    fn serve(responses: Vec<(u16, &'static str)>) -> (String, thread::JoinHandle<Vec<String>>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());

        let handle = thread::spawn(move || {
            let mut bodies = Vec::new();
            for (status, body) in responses {
                let (stream, _) = listener.accept().unwrap();
                let mut reader = BufReader::new(stream);

                let mut content_length = 0;
                loop {
                    let mut line = String::new();
                    reader.read_line(&mut line).unwrap();
                    if line == "\r\n" || line.is_empty() {
                        break;
                    }
                    let lower = line.to_ascii_lowercase();
                    if let Some(value) = lower.strip_prefix("content-length:") {
                        content_length = value.trim().parse().unwrap();
                    }
                }
                let mut request_body = vec![0u8; content_length];
                reader.read_exact(&mut request_body).unwrap();
                bodies.push(String::from_utf8(request_body).unwrap());

                let response = format!(
                    "HTTP/1.1 {} X\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                reader.get_mut().write_all(response.as_bytes()).unwrap();
            }
            bodies
        });

        (url, handle)
    }

    #[test]
    fn test_endpoint_url() {
        assert_eq!(
            endpoint_url("http://24.95.169.161:5000").unwrap().as_str(),
            "http://24.95.169.161:5000/update_location"
        );
        assert_eq!(
            endpoint_url("http://example.com/map").unwrap().as_str(),
            "http://example.com/map/update_location"
        );
        assert!(matches!(endpoint_url("not a url"), Err(TransportError::InvalidUrl { .. })));
        assert!(matches!(endpoint_url("mailto:a@b.c"), Err(TransportError::InvalidUrl { .. })));
    }

    #[test]
    fn test_posts_json_update() {
        let (url, server) = serve(vec![(200, r#"{"status": "location updated"}"#)]);
        let mut transport = HttpTransport::new(&url, Duration::from_secs(5)).unwrap();

        let ack = transport.send(&update()).unwrap();
        assert_eq!(ack.status.as_deref(), Some("location updated"));

        let bodies = server.join().unwrap();
        let sent: LocationUpdate = serde_json::from_str(&bodies[0]).unwrap();
        assert_eq!(sent, update());
    }

    #[test]
    fn test_retries_server_errors() {
        let (url, server) = serve(vec![
            (500, r#"{"error": "busy"}"#),
            (200, r#"{"status": "location updated"}"#),
        ]);
        let mut transport = HttpTransport::new(&url, Duration::from_secs(5))
            .unwrap()
            .with_retries(2, Duration::from_millis(1));

        assert!(transport.send(&update()).is_ok());
        assert_eq!(server.join().unwrap().len(), 2);
    }

    #[test]
    fn test_client_errors_are_not_retried() {
        let (url, server) = serve(vec![(400, r#"{"error": "missing data"}"#)]);
        let mut transport = HttpTransport::new(&url, Duration::from_secs(5))
            .unwrap()
            .with_retries(3, Duration::from_millis(1));

        let result = transport.send(&update());
        assert_eq!(
            result,
            Err(TransportError::Rejected {
                status: 400,
                body: r#"{"error": "missing data"}"#.to_string()
            })
        );
        assert_eq!(server.join().unwrap().len(), 1);
    }

    #[test]
    fn test_mock_transport() {
        let mut transport = MockTransport::new();
        transport.fail_next(TransportError::Request {
            reason: "offline".to_string(),
        });
        assert!(transport.send(&update()).is_err());
        assert!(transport.send(&update()).is_ok());
        assert_eq!(transport.sent().len(), 1);
    }
}
