//! # go-base-core
//!
//! Building blocks of the `go-base` scaffolding tool for go-zero projects.
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`naming`] | project name rules, version helpers |
//! | [`config`] | tool configuration (YAML file + `GO_BASE_*` env) |
//! | [`runner`] | external command seam (`go`, `goctl`, `protoc`, ...) |
//! | [`toolchain`] | goctl / goimports installation |
//! | [`templates`] | embedded goctl templates |
//! | [`gomod`] | go.mod lookup and import paths |
//! | [`scan`] | function name scanning in generated Go sources |
//! | [`register`] | `internal/server/server.go` generation |
//! | [`imports`] | import splicing in the service entrypoint |
//! | [`layout`] | `etc/config.yaml` naming convention |

pub mod config;
pub mod error;
pub mod gomod;
pub mod imports;
pub mod layout;
pub mod naming;
pub mod register;
pub mod runner;
pub mod scan;
pub mod templates;
pub mod toolchain;

pub use config::ToolConfig;
pub use error::{Result, ScaffoldError, StepContext};
pub use runner::{CommandRunner, Invocation, RecordingRunner, SystemRunner};
