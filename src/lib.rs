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

//! This package contains a lightweight CLI for setting the resource quota of a role in a cluster scheduler.
//!
//! The tool is `quotactl`:
//!
//! ```text
//! quotactl --url http://scheduler:8081 set quota <role> cpu:<value> ram:<value> disk:<value>
//! ```
//!
//! The three resources may be given in any order. `cpu` is a floating point number; `ram` and `disk` are integers
//! in the unit the scheduler expects (MiB for Aurora). Every argument is validated before the scheduler is contacted.
//!
//! The library half is usable on its own: [`QuotaRequest::from_args`] validates arguments and [`dispatch`] hands the
//! result to any [`QuotaClient`], such as the HTTP [`SchedulerClient`].

mod client;
mod error;
mod quota;
mod resource;

#[doc(hidden)]
pub mod internal;

pub use client::QuotaClient;
pub use client::SchedulerClient;
pub use error::ClientError;
pub use error::DispatchError;
pub use error::NumericParseError;
pub use error::QuotaArgError;
pub use quota::dispatch;
pub use quota::QuotaRequest;
pub use resource::Resource;
pub use resource::ResourceValue;
