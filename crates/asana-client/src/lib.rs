//! # Asana Client
//!
//! Typed access to the Asana REST API (`https://app.asana.com/api/1.0`) for the
//! five resource families the tool gateway exposes: tasks, projects,
//! workspaces, sections and task dependencies.
//!
//! - [`AsanaConfig`] resolves the base URL, bearer token and default ids once at
//!   startup.
//! - [`AsanaApi`] is the async trait handlers program against.
//! - [`AsanaRestClient`] implements it with `reqwest`.
//! - [`ClientError`] carries non-2xx responses as
//!   `Remote { status, messages }`, with 402s from dependency endpoints
//!   surfaced as `PremiumRequired`.

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod rest;

pub use api::AsanaApi;
pub use config::{AsanaConfig, ConfigFile, TokenSource};
pub use error::{ClientError, ClientResult};
pub use models::{
    DependencyChange, Envelope, NewProject, NewSection, NewTask, Project, ProjectUpdate,
    ResourceRef, Section, SectionTask, Task, TaskUpdate, Workspace,
};
pub use rest::AsanaRestClient;
