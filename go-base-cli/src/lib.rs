//! # go-base-cli
//!
//! Command-line tool for scaffolding go-zero projects on the go-base framework.
//!
//! This crate provides the `go-base` binary with the following commands:
//!
//! | Command | Description |
//! |---------|-------------|
//! | `go-base init [name]` | Create a business project (gateway + ping RPC service) |
//! | `go-base init [name] --type http` | Create a single API service |
//! | `go-base init [name] --type rpc` | Create a single RPC service |
//! | `go-base upgrade` | Upgrade the CLI and the project's go-base dependency |
//!
//! External generators are driven through [`go_base_core::CommandRunner`];
//! the source scanning and patching lives in `go-base-core`.

pub mod commands;
