//! Postgres-backed storage for the pipeline and the HTTP listing

mod episode;

pub use episode::PgEpisodeRepository;
