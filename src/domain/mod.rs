//! Domain logic - pure rules independent of git, the network and the terminal

pub mod branch;
pub mod commit;
pub mod prerelease;
pub mod version;

pub use branch::{branch_name, humanize, slugify, BranchKind, RepoState};
pub use commit::{CommitMessage, CommitType};
pub use prerelease::PreReleaseLabel;
pub use version::{BumpKind, Version};
