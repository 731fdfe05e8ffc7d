//! # brokkr-scaffold
//!
//! The template installation pipeline for the Brokkr CLI:
//! - template catalog client and descriptor types
//! - the `Prompter` seam over interactive questioning
//! - `ProjectInitPipeline`: directory safety, metadata collection, template
//!   download, and installation (rendered copy or delegated custom script)
//! - `TemplateRenderer`: concurrent in-place rendering of a project tree

pub mod catalog;
pub mod error;
pub mod pipeline;
pub mod prompt;
pub mod renderer;
pub mod runner;
pub mod types;

pub use error::{Error, Result};
pub use pipeline::{InitOptions, Outcome, Prepared, ProjectInitPipeline};
pub use prompt::{Prompter, ScriptedPrompter, TerminalPrompter};
pub use renderer::TemplateRenderer;
pub use types::{ProjectInfo, ProjectKind, TemplateDescriptor, TemplateKind};
