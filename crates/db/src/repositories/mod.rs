//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods that
//! accept `&SqlitePool` (or any SQLite executor, for use inside a
//! transaction) as the first argument.

pub mod comment_repo;
pub mod genre_repo;
pub mod metrics_repo;
pub mod playlist_repo;
pub mod session_repo;
pub mod track_repo;
pub mod user_repo;

pub use comment_repo::CommentRepo;
pub use genre_repo::GenreRepo;
pub use metrics_repo::MetricsRepo;
pub use playlist_repo::PlaylistRepo;
pub use session_repo::SessionRepo;
pub use track_repo::TrackRepo;
pub use user_repo::UserRepo;
