//! Shared infrastructure utilities for Quantum Detective.
//!
//! - **`atomic_write`**: crash-safe file persistence (temp + rename) for save
//!   slots and settings

pub mod atomic_write;

pub use atomic_write::{
    FileSyncPolicy, atomic_write_with_sync, read_if_exists, recover_bak_file, remove_if_exists,
};
