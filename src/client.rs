// Copyright 2026 Octave Online LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//    http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use reqwest::blocking::Client;
use reqwest::Url;
use serde::Serialize;

use crate::error::ClientError;
use crate::Resource;

/// Something that can set the quota of a role in the scheduler.
pub trait QuotaClient {
	fn set_quota(&self, role: &str, cpu: f64, ram: i64, disk: i64) -> Result<(), ClientError>;
}

/// Body of a quota update, named after the scheduler's resource aggregate.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ResourceAggregate {
	num_cpus: f64,
	ram_mb: i64,
	disk_mb: i64,
}

/// [`QuotaClient`] talking JSON over HTTP to the scheduler's API.
#[derive(Debug, Clone)]
pub struct SchedulerClient {
	base: Url,
	credentials: Option<(String, String)>,
	http: Client,
}

impl SchedulerClient {
	pub fn new(url: &str) -> Result<Self, ClientError> {
		let mut base = Url::parse(url).map_err(|e| ClientError::InvalidUrl {
			url: url.to_string(),
			reason: e.to_string(),
		})?;
		if base.cannot_be_a_base() {
			return Err(ClientError::InvalidUrl {
				url: url.to_string(),
				reason: "not a base url".to_string(),
			});
		}
		// Url::join drops the last segment unless the path ends in a slash.
		if !base.path().ends_with('/') {
			let path = format!("{}/", base.path());
			base.set_path(&path);
		}
		Ok(Self {
			base,
			credentials: None,
			http: Client::new(),
		})
	}

	pub fn with_basic_auth(mut self, username: String, password: String) -> Self {
		self.credentials = Some((username, password));
		self
	}

	/// # Examples
	///
	/// ```
	/// use quotatools::SchedulerClient;
	///
	/// let client = SchedulerClient::new("http://aurora.local:8081/scheduler").unwrap();
	/// let url = client.quota_url("web team").unwrap();
	/// assert_eq!(url.as_str(), "http://aurora.local:8081/scheduler/api/quota/web%20team");
	/// ```
	pub fn quota_url(&self, role: &str) -> Result<Url, ClientError> {
		let mut url = self.base.join("api/quota").map_err(|e| ClientError::InvalidUrl {
			url: self.base.to_string(),
			reason: e.to_string(),
		})?;
		url.path_segments_mut()
			.map_err(|()| ClientError::InvalidUrl {
				url: self.base.to_string(),
				reason: "not a base url".to_string(),
			})?
			.push(role);
		Ok(url)
	}
}

impl QuotaClient for SchedulerClient {
	fn set_quota(&self, role: &str, cpu: f64, ram: i64, disk: i64) -> Result<(), ClientError> {
		// JSON has no encoding for NaN or infinity.
		if !cpu.is_finite() {
			return Err(ClientError::InvalidValue {
				resource: Resource::Cpu,
				value: cpu,
			});
		}
		let url = self.quota_url(role)?;
		let body = ResourceAggregate {
			num_cpus: cpu,
			ram_mb: ram,
			disk_mb: disk,
		};
		tracing::debug!(%url, ?body, "sending quota update");

		let mut request = self.http.post(url).json(&body);
		if let Some((username, password)) = &self.credentials {
			request = request.basic_auth(username, Some(password));
		}
		let response = request.send()?;

		let status = response.status();
		if status.is_success() {
			return Ok(());
		}
		let body = response.text().unwrap_or_else(|err| {
			tracing::debug!(%status, %err, "unable to read scheduler response body");
			String::new()
		});
		Err(ClientError::Status {
			status: status.as_u16(),
			body,
		})
	}
}

#[test]
fn test_resource_aggregate_body() {
	let body = ResourceAggregate {
		num_cpus: 4.5,
		ram_mb: 2048,
		disk_mb: 10240,
	};
	assert_eq!(
		serde_json::to_value(&body).unwrap(),
		serde_json::json!({"numCpus": 4.5, "ramMb": 2048, "diskMb": 10240})
	);
}

#[test]
fn test_scheduler_client_urls() {
	let client = SchedulerClient::new("http://localhost:8081").unwrap();
	assert_eq!(client.quota_url("platform").unwrap().as_str(), "http://localhost:8081/api/quota/platform");

	let client = SchedulerClient::new("https://aurora.example.com/prefix/").unwrap();
	assert_eq!(
		client.quota_url("a/b").unwrap().as_str(),
		"https://aurora.example.com/prefix/api/quota/a%2Fb"
	);

	assert!(matches!(
		SchedulerClient::new("aurora.example.com"),
		Err(ClientError::InvalidUrl { .. })
	));
	assert!(matches!(
		SchedulerClient::new("mailto:ops@example.com"),
		Err(ClientError::InvalidUrl { .. })
	));
}

#[test]
fn test_set_quota_rejects_non_finite_cpu() {
	let client = SchedulerClient::new("http://127.0.0.1:9").unwrap();
	for cpu in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
		let err = client.set_quota("platform", cpu, 1, 1).unwrap_err();
		assert!(
			matches!(err, ClientError::InvalidValue { resource: Resource::Cpu, .. }),
			"{err:?}"
		);
	}
}

/// Accepts one connection on a local port, answers with `response`, and hands back
/// the raw request it received.
#[cfg(test)]
fn serve_once(response: &'static str) -> (String, std::thread::JoinHandle<String>) {
	use std::io::Read;
	use std::io::Write;
	use std::net::TcpListener;

	let listener = TcpListener::bind("127.0.0.1:0").unwrap();
	let url = format!("http://{}", listener.local_addr().unwrap());
	let handle = std::thread::spawn(move || {
		let (mut stream, _) = listener.accept().unwrap();
		let mut request = Vec::new();
		let mut chunk = [0u8; 1024];
		let header_end = loop {
			let n = stream.read(&mut chunk).unwrap();
			assert!(n > 0, "connection closed before headers ended");
			request.extend_from_slice(&chunk[..n]);
			if let Some(pos) = request.windows(4).position(|w| w == b"\r\n\r\n") {
				break pos + 4;
			}
		};
		let headers = String::from_utf8_lossy(&request[..header_end]).to_ascii_lowercase();
		let content_length = headers
			.lines()
			.find_map(|line| line.strip_prefix("content-length:"))
			.map(|v| v.trim().parse::<usize>().unwrap())
			.unwrap_or(0);
		while request.len() < header_end + content_length {
			let n = stream.read(&mut chunk).unwrap();
			assert!(n > 0, "connection closed before body ended");
			request.extend_from_slice(&chunk[..n]);
		}
		stream.write_all(response.as_bytes()).unwrap();
		String::from_utf8(request).unwrap()
	});
	(url, handle)
}

#[test]
fn test_set_quota_over_http_rejected() {
	let (url, server) = serve_once("HTTP/1.1 403 Forbidden\r\nContent-Length: 4\r\nConnection: close\r\n\r\nnope");
	let client = SchedulerClient::new(&url)
		.unwrap()
		.with_basic_auth("ops".to_string(), "pw".to_string());
	let result = client.set_quota("platform", 4.5, 2048, 10240);
	let request = server.join().unwrap();

	assert!(request.starts_with("POST /api/quota/platform HTTP/1.1\r\n"), "{request}");
	let lowered = request.to_ascii_lowercase();
	assert!(lowered.contains("\r\nauthorization: basic b3bzonb3\r\n"), "{request}");
	assert!(lowered.contains("\r\ncontent-type: application/json\r\n"), "{request}");
	assert!(
		request.ends_with("\r\n\r\n{\"numCpus\":4.5,\"ramMb\":2048,\"diskMb\":10240}"),
		"{request}"
	);
	match result {
		Err(ClientError::Status { status, body }) => {
			assert_eq!(status, 403);
			assert_eq!(body, "nope");
		}
		other => panic!("expected a status error, got {other:?}"),
	}
}

#[test]
fn test_set_quota_over_http_accepted() {
	let (url, server) = serve_once("HTTP/1.1 200 OK\r\nContent-Length: 0\r\nConnection: close\r\n\r\n");
	let client = SchedulerClient::new(&url).unwrap();
	let result = client.set_quota("web team", 0.5, 1, 2);
	let request = server.join().unwrap();

	assert!(request.starts_with("POST /api/quota/web%20team HTTP/1.1\r\n"), "{request}");
	assert!(!request.to_ascii_lowercase().contains("\r\nauthorization:"), "{request}");
	assert!(request.ends_with("{\"numCpus\":0.5,\"ramMb\":1,\"diskMb\":2}"), "{request}");
	assert!(result.is_ok(), "{result:?}");
}
