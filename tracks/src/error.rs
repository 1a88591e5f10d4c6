use thiserror::Error;

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum TrackError {
    #[error("location store unavailable: {0}")]
    StoreUnavailable(sqlx::Error),

    #[error("location query failed: {0}")]
    Query(sqlx::Error),
}

impl From<sqlx::Error> for TrackError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::Configuration(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed => TrackError::StoreUnavailable(e),
            e => TrackError::Query(e),
        }
    }
}

impl TrackError {
    pub fn is_unavailable(&self) -> bool {
        matches!(self, TrackError::StoreUnavailable(_))
    }
}
