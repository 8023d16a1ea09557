//! # sd-repo - Source repository locator for repo checkouts
//!
//! `sd-repo` checks out a multi-repository workspace with the `repo` tool and records
//! where a given source repository ended up inside it.
//!
//! Given a manifest URL such as
//! `git@github.com:org/manifests.git/releases/default.xml#stable` and a source repository
//! name such as `org/app`, it:
//!
//! 1. parses the URL into clone URL, manifest file and branch,
//! 2. runs `repo init -u <clone url> -b <branch> -m <manifest file>`,
//! 3. reads the manifest `repo` wrote into `.repo/`,
//! 4. looks up the project named after the source repository,
//! 5. runs `repo sync -d -c --jobs=<N>`,
//! 6. writes the project path into the `sourcePath` file.
//!
//! ## Architecture
//!
//! The crate is organized using clean architecture principles:
//!
//! - [`domain`]: URL descriptor, tool version, manifest model
//! - [`application`]: Manifest resolution and the locate workflow
//! - [`infrastructure`]: The `repo` process and the output file
//! - [`presentation`]: CLI interface and configuration
//! - [`common`]: Shared error handling and logging
//!
//! ## Domain Model
//!
//! - [`domain::value_objects::git_url::GitUrl`]: Parsed manifest repository URL
//! - [`domain::value_objects::tool_version::ManifestLayout`]: Where `repo` keeps the manifest
//! - [`domain::entities::manifest::Manifest`]: Projects listed in the manifest
//! - [`domain::entities::tool_config::ToolConfig`]: Runtime configuration
//!
//! ## Error Handling
//!
//! - [`application::use_cases::locate_source_repo::WorkflowError`]: Failure tagged with its stage
//! - [`common::error::SdRepoError`]: Main error type
//! - [`common::result::SdRepoResult`]: Type alias for `Result<T, SdRepoError>`
//!
//! ## Examples
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use sd_repo::application::use_cases::locate_source_repo::{
//!     LocateSourceRepoConfig, LocateSourceRepoUseCase,
//! };
//! use sd_repo::infrastructure::process::RepoTool;
//!
//! # async fn example() -> sd_repo::Result<()> {
//! let config = LocateSourceRepoConfig::new("/work").with_sync_jobs(8);
//! let tool = RepoTool::new().in_dir("/work");
//!
//! let use_case = LocateSourceRepoUseCase::new(config, Arc::new(tool));
//! let outcome = use_case
//!     .execute("git@github.com:org/manifests.git#stable", "org/app")
//!     .await?;
//!
//! println!("{} is checked out at {}", outcome.project.name, outcome.source_path());
//! # Ok(())
//! # }
//! ```

// Documentation attributes
#![warn(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod application;
pub mod common;
pub mod domain;
pub mod infrastructure;
pub mod presentation;

// Re-export commonly used types for convenience
pub use crate::common::error::SdRepoError;
pub use crate::common::result::SdRepoResult as Result;
