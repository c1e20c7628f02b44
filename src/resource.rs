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

use std::fmt;
use std::str::FromStr;

use crate::error::NumericParseError;
use crate::error::QuotaArgError;

/// A quota resource that can be set for a role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
	Cpu,
	Ram,
	Disk,
}

impl Resource {
	pub const ALL: [Resource; 3] = [Resource::Cpu, Resource::Ram, Resource::Disk];

	/// The key used on the command line, as in `cpu:4`.
	pub fn key(self) -> &'static str {
		match self {
			Resource::Cpu => "cpu",
			Resource::Ram => "ram",
			Resource::Disk => "disk",
		}
	}

	pub(crate) fn label(self) -> &'static str {
		match self {
			Resource::Cpu => "CPU",
			Resource::Ram => "RAM",
			Resource::Disk => "DISK",
		}
	}

	pub(crate) fn number_kind(self) -> &'static str {
		match self {
			Resource::Cpu => "floating point number",
			Resource::Ram | Resource::Disk => "integer number",
		}
	}

	fn from_key(key: &str) -> Option<Self> {
		Self::ALL.into_iter().find(|r| r.key() == key)
	}
}

impl fmt::Display for Resource {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.key())
	}
}

/// One parsed `<resource>:<value>` token.
///
/// # Examples
///
/// ```
/// use quotatools::ResourceValue;
///
/// assert_eq!("cpu:0.5".parse::<ResourceValue>(), Ok(ResourceValue::Cpu(0.5)));
/// assert_eq!("disk:100".parse::<ResourceValue>(), Ok(ResourceValue::Disk(100)));
/// assert!("disk:1.5".parse::<ResourceValue>().is_err());
/// assert!("mem:10".parse::<ResourceValue>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResourceValue {
	Cpu(f64),
	Ram(i64),
	Disk(i64),
}

impl ResourceValue {
	pub fn resource(&self) -> Resource {
		match self {
			ResourceValue::Cpu(_) => Resource::Cpu,
			ResourceValue::Ram(_) => Resource::Ram,
			ResourceValue::Disk(_) => Resource::Disk,
		}
	}
}

impl FromStr for ResourceValue {
	type Err = QuotaArgError;

	fn from_str(token: &str) -> Result<Self, Self::Err> {
		// Every colon counts, so "cpu:1:2" is malformed rather than a bad number.
		let mut segments = token.split(':');
		let (Some(key), Some(raw), None) = (segments.next(), segments.next(), segments.next()) else {
			return Err(QuotaArgError::MalformedResourceToken {
				token: token.to_string(),
			});
		};
		let Some(resource) = Resource::from_key(key) else {
			return Err(QuotaArgError::UnknownResourceKey { key: key.to_string() });
		};
		let invalid = |source: NumericParseError| QuotaArgError::InvalidNumericValue { resource, source };
		match resource {
			Resource::Cpu => raw.parse().map(ResourceValue::Cpu).map_err(|e| invalid(NumericParseError::from(e))),
			Resource::Ram => raw.parse().map(ResourceValue::Ram).map_err(|e| invalid(NumericParseError::from(e))),
			Resource::Disk => raw.parse().map(ResourceValue::Disk).map_err(|e| invalid(NumericParseError::from(e))),
		}
	}
}

#[test]
fn test_resource_value_shapes() {
	assert_eq!(
		"cpu".parse::<ResourceValue>(),
		Err(QuotaArgError::MalformedResourceToken { token: "cpu".into() })
	);
	assert_eq!(
		"cpu:1:2".parse::<ResourceValue>(),
		Err(QuotaArgError::MalformedResourceToken { token: "cpu:1:2".into() })
	);
	assert_eq!(
		":5".parse::<ResourceValue>(),
		Err(QuotaArgError::UnknownResourceKey { key: "".into() })
	);
	assert_eq!(
		"CPU:5".parse::<ResourceValue>(),
		Err(QuotaArgError::UnknownResourceKey { key: "CPU".into() })
	);
	assert_eq!("ram:-1".parse::<ResourceValue>(), Ok(ResourceValue::Ram(-1)));
	assert_eq!("cpu:+2".parse::<ResourceValue>(), Ok(ResourceValue::Cpu(2.0)));
}

#[test]
fn test_resource_value_numbers() {
	fn parse(input: &str) -> Result<ResourceValue, String> {
		input.parse::<ResourceValue>().map_err(|e| crate::internal::error_chain(&e))
	}
	insta::assert_debug_snapshot!(parse("cpu:notanumber"), @r###"
	Err(
	    "unable to convert CPU value provided to a floating point number: invalid float literal",
	)
	"###);
	insta::assert_debug_snapshot!(parse("ram:3.5"), @r###"
	Err(
	    "unable to convert RAM value provided to a integer number: invalid digit found in string",
	)
	"###);
	insta::assert_debug_snapshot!(parse("disk:abc"), @r###"
	Err(
	    "unable to convert DISK value provided to a integer number: invalid digit found in string",
	)
	"###);
	insta::assert_debug_snapshot!(parse("disk:"), @r###"
	Err(
	    "unable to convert DISK value provided to a integer number: cannot parse integer from empty string",
	)
	"###);
	insta::assert_debug_snapshot!(parse("ram:99999999999999999999"), @r###"
	Err(
	    "unable to convert RAM value provided to a integer number: number too large to fit in target type",
	)
	"###);
}
