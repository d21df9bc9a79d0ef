//! Command implementations for the `go-base` CLI.
//!
//! Each submodule corresponds to a top-level CLI command.

/// Project scaffolding: `go-base init [name] [--type http|rpc]`.
///
/// Installs goctl and the bundled templates, runs the goctl/protoc
/// generators, wires the gRPC server registration into the generated
/// service and renames config files to `etc/config.yaml`.
pub mod init;

/// Console output helpers shared by the commands.
pub mod output;

/// Self-upgrade: `go-base upgrade`.
///
/// Reinstalls the CLI at the latest release of its major line and bumps the
/// framework dependency of the current Go project.
pub mod upgrade;
