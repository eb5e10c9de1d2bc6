//! Domain layer for the SoundShelf music-sharing service.
//!
//! Everything here is free of database and HTTP concerns: error taxonomy,
//! engagement metric arithmetic, pagination, request validation, media
//! naming/downscaling and the blob-storage abstraction.

pub mod accounts;
pub mod catalog;
pub mod error;
pub mod media;
pub mod metrics;
pub mod pagination;
pub mod playlist;
pub mod roles;
pub mod storage;
pub mod types;
pub mod validation;
