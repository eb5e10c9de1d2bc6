pub mod comment;
pub mod genre;
pub mod metrics;
pub mod playlist;
pub mod session;
pub mod track;
pub mod user;
