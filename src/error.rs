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

use std::num::ParseFloatError;
use std::num::ParseIntError;

use thiserror::Error;

use crate::Resource;

/// Errors raised while turning command-line tokens into a [`QuotaRequest`](crate::QuotaRequest).
///
/// All of these are detected before the scheduler is contacted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QuotaArgError {
	#[error("role, cpu, ram, and disk resources must be provided")]
	ArgumentCount { found: usize },

	#[error("all resources must be provided in <resource>:<value> format (got {token:?})")]
	MalformedResourceToken { token: String },

	#[error("unable to convert {} value provided to a {}", .resource.label(), .resource.number_kind())]
	InvalidNumericValue {
		resource: Resource,
		#[source]
		source: NumericParseError,
	},

	#[error("unknown resource value provided, only cpu, ram, and disk are supported (got {key:?})")]
	UnknownResourceKey { key: String },

	#[error("no {} value provided, cpu, ram, and disk must each be given once", .0.label())]
	MissingResource(Resource),
}

/// The low-level failure behind [`QuotaArgError::InvalidNumericValue`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NumericParseError {
	#[error(transparent)]
	Float(#[from] ParseFloatError),

	#[error(transparent)]
	Int(#[from] ParseIntError),
}

/// Failures reported by a [`QuotaClient`](crate::QuotaClient).
#[derive(Error, Debug)]
pub enum ClientError {
	#[error("invalid scheduler url {url:?}: {reason}")]
	InvalidUrl { url: String, reason: String },

	#[error("{resource} value {value} cannot be sent to the scheduler")]
	InvalidValue { resource: Resource, value: f64 },

	#[error("request to scheduler failed")]
	Transport(#[from] reqwest::Error),

	#[error("scheduler responded with {status}: {body}")]
	Status { status: u16, body: String },
}

/// The remote call made by [`dispatch`](crate::dispatch) failed.
#[derive(Error, Debug)]
#[error("unable to set quota for role {role:?}")]
pub struct DispatchError {
	pub role: String,
	#[source]
	pub source: ClientError,
}
