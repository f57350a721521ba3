use thiserror::Error;

/// Failure while fetching the feature snapshot for a single asset.
///
/// The cycle runner recovers from these by skipping the asset; they never
/// abort a cycle.
#[derive(Error, Debug)]
pub enum CollectionError {
    #[error("feature fetch failed for {asset}: {reason}")]
    Http { asset: String, reason: String },

    #[error("malformed feature payload for {asset}: {reason}")]
    Parse { asset: String, reason: String },
}

/// Failure writing a signal or trade record to the persistence sink.
///
/// Non-fatal to the cycle: logged and swallowed, statistics still update
/// in memory.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("storage write failed: {0}")]
    Write(String),
}
