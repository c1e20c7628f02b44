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

use crate::client::QuotaClient;
use crate::error::DispatchError;
use crate::error::QuotaArgError;
use crate::Resource;
use crate::ResourceValue;

/// A validated request to set the quota of one role.
#[derive(Debug, Clone, PartialEq)]
pub struct QuotaRequest {
	pub role: String,
	pub cpu: f64,
	pub ram: i64,
	pub disk: i64,
}

impl QuotaRequest {
	/// Builds a request from `[role, resource, resource, resource]`.
	///
	/// The three resources are `cpu:<float>`, `ram:<int>` and `disk:<int>` in any order.
	/// Parsing stops at the first bad token. If a key repeats, the later value wins,
	/// but every key must still be present once all tokens are read.
	///
	/// # Examples
	///
	/// ```
	/// use quotatools::QuotaRequest;
	///
	/// let request = QuotaRequest::from_args(["web", "ram:2048", "disk:4096", "cpu:1.5"]).unwrap();
	/// assert_eq!(request.role, "web");
	/// assert_eq!(request.cpu, 1.5);
	/// assert_eq!(request.ram, 2048);
	/// assert_eq!(request.disk, 4096);
	///
	/// assert!(QuotaRequest::from_args(["web", "cpu:1.5"]).is_err());
	/// ```
	pub fn from_args<I, S>(args: I) -> Result<Self, QuotaArgError>
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		let args: Vec<S> = args.into_iter().collect();
		let [role, tokens @ ..] = args.as_slice() else {
			return Err(QuotaArgError::ArgumentCount { found: 0 });
		};
		if tokens.len() != Resource::ALL.len() {
			return Err(QuotaArgError::ArgumentCount { found: args.len() });
		}

		let mut cpu = None;
		let mut ram = None;
		let mut disk = None;
		for token in tokens {
			let value: ResourceValue = token.as_ref().parse()?;
			tracing::trace!(resource = %value.resource(), ?value, "parsed resource token");
			match value {
				ResourceValue::Cpu(value) => cpu = Some(value),
				ResourceValue::Ram(value) => ram = Some(value),
				ResourceValue::Disk(value) => disk = Some(value),
			}
		}

		Ok(Self {
			role: role.as_ref().to_string(),
			cpu: cpu.ok_or(QuotaArgError::MissingResource(Resource::Cpu))?,
			ram: ram.ok_or(QuotaArgError::MissingResource(Resource::Ram))?,
			disk: disk.ok_or(QuotaArgError::MissingResource(Resource::Disk))?,
		})
	}
}

/// Sends `request` to the scheduler through `client`.
///
/// The request is consumed; a failed call is not retried.
pub fn dispatch(request: QuotaRequest, client: &dyn QuotaClient) -> Result<(), DispatchError> {
	let QuotaRequest { role, cpu, ram, disk } = request;
	tracing::info!(%role, cpu, ram, disk, "Setting quota resources for role");
	match client.set_quota(&role, cpu, ram, disk) {
		Ok(()) => {
			tracing::debug!(%role, "quota accepted by scheduler");
			Ok(())
		}
		Err(source) => Err(DispatchError { role, source }),
	}
}

#[cfg(test)]
use std::cell::RefCell;

#[cfg(test)]
use crate::error::ClientError;
#[cfg(test)]
use crate::error::NumericParseError;

#[cfg(test)]
#[derive(Default)]
struct RecordingClient {
	calls: RefCell<Vec<(String, f64, i64, i64)>>,
	reject_with: Option<u16>,
}

#[cfg(test)]
impl QuotaClient for RecordingClient {
	fn set_quota(&self, role: &str, cpu: f64, ram: i64, disk: i64) -> Result<(), ClientError> {
		self.calls.borrow_mut().push((role.to_string(), cpu, ram, disk));
		match self.reject_with {
			Some(status) => Err(ClientError::Status {
				status,
				body: "quota rejected".to_string(),
			}),
			None => Ok(()),
		}
	}
}

#[test]
fn test_parse_platform() {
	insta::assert_debug_snapshot!(QuotaRequest::from_args(["platform", "cpu:4.5", "ram:2048", "disk:10240"]), @r###"
	Ok(
	    QuotaRequest {
	        role: "platform",
	        cpu: 4.5,
	        ram: 2048,
	        disk: 10240,
	    },
	)
	"###);
}

#[test]
fn test_parse_any_order() {
	let expected = QuotaRequest {
		role: "platform".to_string(),
		cpu: 4.5,
		ram: 2048,
		disk: 10240,
	};
	let orders = [
		["cpu:4.5", "ram:2048", "disk:10240"],
		["cpu:4.5", "disk:10240", "ram:2048"],
		["ram:2048", "cpu:4.5", "disk:10240"],
		["ram:2048", "disk:10240", "cpu:4.5"],
		["disk:10240", "cpu:4.5", "ram:2048"],
		["disk:10240", "ram:2048", "cpu:4.5"],
	];
	for tokens in orders {
		let args = std::iter::once("platform").chain(tokens);
		assert_eq!(QuotaRequest::from_args(args), Ok(expected.clone()), "{tokens:?}");
	}
}

#[test]
fn test_parse_role_verbatim() {
	let request = QuotaRequest::from_args(["", "cpu:0", "ram:0", "disk:0"]).unwrap();
	assert_eq!(request.role, "");
	let request = QuotaRequest::from_args(["team/a b", "cpu:1e2", "ram:1", "disk:2"]).unwrap();
	assert_eq!(request.role, "team/a b");
	assert_eq!(request.cpu, 100.0);
}

#[test]
fn test_parse_argument_count() {
	let cases: [&[&str]; 5] = [
		&[],
		&["platform"],
		&["platform", "cpu:4.5", "ram:2048"],
		&["platform", "cpu:4.5", "ram:2048", "disk:10240", "cpu:1"],
		&["cpu:4.5", "ram:2048", "disk:10240"],
	];
	for args in cases {
		let err = QuotaRequest::from_args(args).unwrap_err();
		assert_eq!(err, QuotaArgError::ArgumentCount { found: args.len() }, "{args:?}");
		assert_eq!(err.to_string(), "role, cpu, ram, and disk resources must be provided");
	}
}

#[test]
fn test_parse_fails_fast() {
	// The unknown key in the last slot is never reached.
	assert_eq!(
		QuotaRequest::from_args(["platform", "cpu", "ram:x", "mem:1"]),
		Err(QuotaArgError::MalformedResourceToken { token: "cpu".into() })
	);
	assert_eq!(
		QuotaRequest::from_args(["platform", "cpu:1", "mem:10", "disk:1"]),
		Err(QuotaArgError::UnknownResourceKey { key: "mem".into() })
	);
	assert!(matches!(
		QuotaRequest::from_args(["platform", "cpu:1", "ram:3.5", "disk:1"]),
		Err(QuotaArgError::InvalidNumericValue {
			resource: Resource::Ram,
			source: NumericParseError::Int(_),
		})
	));
	assert!(matches!(
		QuotaRequest::from_args(["platform", "cpu:notanumber", "ram:1", "disk:1"]),
		Err(QuotaArgError::InvalidNumericValue {
			resource: Resource::Cpu,
			source: NumericParseError::Float(_),
		})
	));
}

#[test]
fn test_parse_numeric_error_keeps_source() {
	use std::error::Error;

	let err = QuotaRequest::from_args(["platform", "cpu:1", "ram:2", "disk:abc"]).unwrap_err();
	let source = err.source().expect("parse failure is attached");
	assert_eq!(source.to_string(), "invalid digit found in string");
}

// With exactly three tokens a repeated key always leaves another key unset.
// That key is rejected instead of silently defaulting to zero.
#[test]
fn test_parse_missing_key_is_rejected() {
	assert_eq!(
		QuotaRequest::from_args(["platform", "cpu:1", "cpu:2", "disk:10"]),
		Err(QuotaArgError::MissingResource(Resource::Ram))
	);
	assert_eq!(
		QuotaRequest::from_args(["platform", "disk:1", "ram:2", "disk:3"]),
		Err(QuotaArgError::MissingResource(Resource::Cpu))
	);
	assert_eq!(
		QuotaRequest::from_args(["platform", "ram:1", "ram:2", "ram:3"]).unwrap_err().to_string(),
		"no CPU value provided, cpu, ram, and disk must each be given once"
	);
}

#[test]
fn test_dispatch_calls_client_once() {
	let client = RecordingClient::default();
	let request = QuotaRequest::from_args(["platform", "cpu:4.5", "ram:2048", "disk:10240"]).unwrap();
	dispatch(request, &client).unwrap();
	assert_eq!(*client.calls.borrow(), vec![("platform".to_string(), 4.5, 2048, 10240)]);
}

#[test]
fn test_dispatch_surfaces_remote_error() {
	let client = RecordingClient {
		reject_with: Some(403),
		..Default::default()
	};
	let request = QuotaRequest {
		role: "platform".to_string(),
		cpu: 1.0,
		ram: 2,
		disk: 3,
	};
	let err = dispatch(request, &client).unwrap_err();
	assert_eq!(err.role, "platform");
	assert!(matches!(err.source, ClientError::Status { status: 403, .. }));
	assert_eq!(client.calls.borrow().len(), 1);
}

#[test]
fn test_no_dispatch_on_invalid_args() {
	let client = RecordingClient::default();
	let result = QuotaRequest::from_args(["platform", "cpu:4.5", "ram:2048"]).map(|request| dispatch(request, &client));
	assert_eq!(result.unwrap_err(), QuotaArgError::ArgumentCount { found: 3 });
	assert!(client.calls.borrow().is_empty());
}
