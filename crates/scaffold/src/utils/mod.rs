pub mod child;
pub mod error_messages;
pub mod fetch;
pub mod git;
pub mod install;
pub mod log;
pub mod manifest;
pub mod package_manager;
pub mod slug;
pub mod step;
pub mod target;
pub mod which;
pub mod wizard;
