pub mod locate_source_repo;

pub use locate_source_repo::{
    LocateOutcome, LocateSourceRepoConfig, LocateSourceRepoUseCase, WorkflowError, WorkflowStage,
};
