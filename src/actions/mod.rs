//! Actions performed on scan results: deletion and cluster resolution.

pub mod delete;
pub mod resolve;

pub use delete::{
    delete_to_trash, permanent_delete, BatchDeleteResult, DeleteConfig, DeleteError, DeleteResult,
    FileSnapshot,
};
pub use resolve::{resolve_cluster, resolve_interactively, resolve_keep_first};
