use std::sync::Arc;

use object_store::aws::AmazonS3Builder;
use object_store::ObjectStore;

use crate::error::Result;

/// Builds the S3-backed store handle for a bucket.
///
/// Credentials and region come from the standard AWS environment variables
/// (`AWS_ACCESS_KEY_ID`, `AWS_SECRET_ACCESS_KEY`, `AWS_DEFAULT_REGION`, ...).
/// The bucket is bound into the handle, so the scanner and fetcher only ever
/// see the [`ObjectStore`] trait; tests substitute an in-memory store.
///
/// # Errors
///
/// Returns a storage error when the builder cannot assemble a client, for
/// example when no region is configured.
pub fn bucket_store(bucket: &str) -> Result<Arc<dyn ObjectStore>> {
    let store = AmazonS3Builder::from_env()
        .with_bucket_name(bucket)
        .build()?;

    Ok(Arc::new(store))
}
