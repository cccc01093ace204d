//! Web File Editor
//!
//! An HTTP file management service: browse, read, upload, create, and
//! delete files inside one configured root directory. Every
//! user-supplied path is resolved and confined to the root before any
//! filesystem call.

pub mod error;
pub mod server;
pub mod storage;

pub use server::Server;
