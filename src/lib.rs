//! S-expression to Ansible compiler.
//!
//! Reads infrastructure descriptions written as S-expressions (options,
//! groups of hosts, roles and playbooks) and lowers them to the files an
//! Ansible control node expects: `ansible.cfg`, a YAML inventory, one
//! `tasks`/`handlers` file per role and one file per playbook.
//!
//! The pipeline is organised into layers:
//!
//! - **[`reader`]**: source text to a tree of [`reader::Form`]s
//! - **[`object`]**: tagged-object queries over forms
//! - **[`compiler`]**: decode documents and lower them to [`output::Artifact`]s,
//!   renaming identifiers through a shared [`mangle::Mangler`]
//! - **[`sink`]**: write rendered artifacts to disk or memory
//! - **[`commands`]**: the command-line driver
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod cli;
pub mod commands;
pub mod compiler;
pub mod config;
pub mod error;
pub mod logging;
pub mod mangle;
pub mod object;
pub mod output;
pub mod reader;
pub mod sink;
