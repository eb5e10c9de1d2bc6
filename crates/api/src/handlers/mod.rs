pub mod account;
pub mod auth;
pub mod genres;
pub mod media;
pub mod metrics;
pub mod playlist;
pub mod tracks;
pub mod upload;
