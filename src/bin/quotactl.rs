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

use clap::error::ErrorKind;
use clap::ArgAction;
use clap::Args;
use clap::CommandFactory;
use clap::Parser;
use clap::Subcommand;
use quotatools::dispatch;
use quotatools::internal;
use quotatools::QuotaRequest;
use quotatools::SchedulerClient;

#[derive(Parser, Debug)]
#[command(version, about = "Sets values in a cluster scheduler")]
struct Cli {
	/// Base URL of the scheduler API, such as "http://aurora.local:8081".
	#[arg(short = 'u', long, env = "AURORA_URL", global = true)]
	url: Option<String>,

	/// User for HTTP basic authentication against the scheduler.
	#[arg(long, env = "AURORA_USERNAME", global = true)]
	username: Option<String>,

	/// Password for HTTP basic authentication against the scheduler.
	#[arg(long, env = "AURORA_PASSWORD", hide_env_values = true, global = true, requires = "username")]
	password: Option<String>,

	/// Log more detail. Repeat for even more. RUST_LOG overrides this.
	#[arg(short, long, action = ArgAction::Count, global = true)]
	verbose: u8,

	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
	/// Sets a value in the scheduler
	#[command(subcommand)]
	Set(SetCommand),
}

#[derive(Subcommand, Debug)]
enum SetCommand {
	/// Sets the quota resources reserved for a role
	#[command(override_usage = "quotactl set quota <ROLE> cpu:<VALUE> ram:<VALUE> disk:<VALUE>")]
	Quota(QuotaCommand),
}

#[derive(Args, Debug)]
struct QuotaCommand {
	/// The role, then cpu:<value>, ram:<value> and disk:<value> in any order. CPU is a floating point number; RAM and disk are integers.
	#[arg(value_name = "ARGS", allow_hyphen_values(true))]
	args: Vec<String>,
}

fn scheduler_client(url: Option<String>, username: Option<String>, password: Option<String>) -> SchedulerClient {
	let Some(url) = url else {
		Cli::command()
			.error(ErrorKind::MissingRequiredArgument, "a scheduler url is required, pass --url or set AURORA_URL")
			.exit()
	};
	let client = match SchedulerClient::new(&url) {
		Ok(client) => client,
		Err(err) => Cli::command().error(ErrorKind::ValueValidation, err).exit(),
	};
	match username {
		Some(username) => client.with_basic_auth(username, password.unwrap_or_default()),
		None => client,
	}
}

fn main() {
	let Cli {
		url,
		username,
		password,
		verbose,
		command,
	} = Cli::parse();
	internal::init_logging(verbose);
	match command {
		Command::Set(SetCommand::Quota(cmd_args)) => {
			tracing::debug!(args = ?cmd_args.args, "set quota");
			let request = match QuotaRequest::from_args(&cmd_args.args) {
				Ok(request) => request,
				Err(err) => internal::exit_with(internal::EXIT_USAGE, &err),
			};
			let client = scheduler_client(url, username, password);
			if let Err(err) = dispatch(request, &client) {
				internal::exit_with(internal::EXIT_FATAL, &err);
			}
		}
	}
}

#[test]
fn test_cli_structure() {
	Cli::command().debug_assert();
}

#[test]
fn test_cli_set_quota() {
	fn cli(input: &str) -> Result<Command, String> {
		Cli::try_parse_from(shlex::split(input).unwrap())
			.map(|cli| cli.command)
			.map_err(|e| format!("{e}"))
	}
	assert!(cli("quotactl").is_err());
	assert!(cli("quotactl set").is_err());
	assert!(cli("quotactl set xyz").is_err());
	insta::assert_debug_snapshot!(cli("quotactl set quota"), @r###"
	Ok(
	    Set(
	        Quota(
	            QuotaCommand {
	                args: [],
	            },
	        ),
	    ),
	)
	"###);
	insta::assert_debug_snapshot!(cli("quotactl set quota platform cpu:4.5 ram:2048 disk:10240"), @r###"
	Ok(
	    Set(
	        Quota(
	            QuotaCommand {
	                args: [
	                    "platform",
	                    "cpu:4.5",
	                    "ram:2048",
	                    "disk:10240",
	                ],
	            },
	        ),
	    ),
	)
	"###);
	insta::assert_debug_snapshot!(cli("quotactl set quota platform disk:1 cpu:2"), @r###"
	Ok(
	    Set(
	        Quota(
	            QuotaCommand {
	                args: [
	                    "platform",
	                    "disk:1",
	                    "cpu:2",
	                ],
	            },
	        ),
	    ),
	)
	"###);
}

#[test]
fn test_cli_global_options() {
	fn cli(input: &str) -> Cli {
		Cli::try_parse_from(shlex::split(input).unwrap()).unwrap()
	}
	let parsed = cli("quotactl -vv --url http://a:8081 set quota platform cpu:1 ram:2 disk:3");
	assert_eq!(parsed.verbose, 2);
	assert_eq!(parsed.url.as_deref(), Some("http://a:8081"));

	let parsed = cli("quotactl set quota -u http://b:8081 --username ops --password pw platform cpu:1 ram:2 disk:3");
	assert_eq!(parsed.url.as_deref(), Some("http://b:8081"));
	assert_eq!(parsed.username.as_deref(), Some("ops"));
	assert_eq!(parsed.password.as_deref(), Some("pw"));
	let Command::Set(SetCommand::Quota(cmd_args)) = parsed.command;
	assert_eq!(cmd_args.args, ["platform", "cpu:1", "ram:2", "disk:3"]);
}

#[test]
fn test_cli_to_request() {
	use quotatools::QuotaArgError;

	fn request(input: &str) -> Result<QuotaRequest, QuotaArgError> {
		let Command::Set(SetCommand::Quota(cmd_args)) = Cli::try_parse_from(shlex::split(input).unwrap()).unwrap().command;
		QuotaRequest::from_args(&cmd_args.args)
	}
	assert_eq!(
		request("quotactl set quota platform ram:2048 disk:10240 cpu:4.5"),
		Ok(QuotaRequest {
			role: "platform".to_string(),
			cpu: 4.5,
			ram: 2048,
			disk: 10240,
		})
	);
	assert_eq!(
		request("quotactl set quota -ops cpu:1 ram:2 disk:3").map(|r| r.role),
		Ok("-ops".to_string())
	);
	assert_eq!(
		request("quotactl set quota platform cpu:4.5 ram:2048"),
		Err(QuotaArgError::ArgumentCount { found: 3 })
	);
	assert_eq!(
		request("quotactl set quota platform cpu:4.5 mem:2048 disk:1"),
		Err(QuotaArgError::UnknownResourceKey { key: "mem".to_string() })
	);
}
