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

use std::process;

use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

/// Exit status for rejected command-line input, matching clap's usage errors.
pub const EXIT_USAGE: i32 = 2;

/// Exit status when the scheduler could not be reached or refused the request.
pub const EXIT_FATAL: i32 = 1;

pub fn level_for_verbosity(verbose: u8) -> LevelFilter {
	match verbose {
		0 => LevelFilter::INFO,
		1 => LevelFilter::DEBUG,
		_ => LevelFilter::TRACE,
	}
}

/// Sends logs to stderr. `RUST_LOG` takes precedence over `verbose`.
pub fn init_logging(verbose: u8) {
	let env_filter = EnvFilter::builder()
		.with_default_directive(level_for_verbosity(verbose).into())
		.from_env_lossy();
	tracing_subscriber::fmt()
		.with_env_filter(env_filter)
		.with_writer(std::io::stderr)
		.compact()
		.init();
}

/// Joins `err` and its causes as "outer: inner: ...".
pub fn error_chain(err: &dyn std::error::Error) -> String {
	let mut message = err.to_string();
	let mut cause = err.source();
	while let Some(inner) = cause {
		message.push_str(": ");
		message.push_str(&inner.to_string());
		cause = inner.source();
	}
	message
}

/// Logs `err` with its causes and exits with `code`.
pub fn exit_with(code: i32, err: &dyn std::error::Error) -> ! {
	tracing::error!("{}", error_chain(err));
	process::exit(code)
}

#[test]
fn test_level_for_verbosity() {
	assert_eq!(level_for_verbosity(0), LevelFilter::INFO);
	assert_eq!(level_for_verbosity(1), LevelFilter::DEBUG);
	assert_eq!(level_for_verbosity(7), LevelFilter::TRACE);
}
