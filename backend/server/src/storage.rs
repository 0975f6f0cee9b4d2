//! # Storage
//!
//! Download URLs for objects in the default bucket. A download URL is the
//! media link of the object plus one of its `downloadTokens`, the same URL
//! the client SDKs hand out.

use std::future::Future;

use reqwest::Url;
use serde_json::Value;
use tracing::{error, warn};

use crate::{
    error::FirebaseError,
    firebase::{FirebaseAdmin, STORAGE_ENDPOINT, cannot_be_base, endpoint},
};

pub const DEFAULT_PROFILE_PICTURE: &str = "defaults/profile-picture.png";

/// Metadata URL of an object. The object path is a single, fully escaped
/// segment, so `a/b.png` becomes `a%2Fb.png`.
pub fn object_url(bucket: &str, path: &str) -> Result<Url, FirebaseError> {
    let mut url = endpoint(STORAGE_ENDPOINT)?;
    url.path_segments_mut()
        .map_err(|_| cannot_be_base(STORAGE_ENDPOINT))?
        .extend(["b", bucket, "o", path]);

    Ok(url)
}

pub fn download_url(bucket: &str, path: &str, metadata: &Value) -> Result<Option<Url>, FirebaseError> {
    let token = metadata
        .get("downloadTokens")
        .and_then(Value::as_str)
        .and_then(|tokens| tokens.split(',').map(str::trim).find(|t| !t.is_empty()));

    let Some(token) = token else {
        return Ok(None);
    };

    let mut url = object_url(bucket, path)?;
    url.query_pairs_mut()
        .append_pair("alt", "media")
        .append_pair("token", token);

    Ok(Some(url))
}

pub trait ObjectStore {
    fn bucket(&self) -> &str;

    /// `Ok(None)` when the object does not exist.
    fn metadata(
        &self,
        path: &str,
    ) -> impl Future<Output = Result<Option<Value>, FirebaseError>> + Send;
}

impl ObjectStore for FirebaseAdmin {
    fn bucket(&self) -> &str {
        FirebaseAdmin::bucket(self)
    }

    async fn metadata(&self, path: &str) -> Result<Option<Value>, FirebaseError> {
        let url = object_url(FirebaseAdmin::bucket(self), path)?;

        self.get_json(url).await
    }
}

async fn resolve_download_url<S: ObjectStore>(
    store: &S,
    path: &str,
) -> Result<Option<Url>, FirebaseError> {
    match store.metadata(path).await? {
        Some(metadata) => download_url(store.bucket(), path, &metadata),
        None => Ok(None),
    }
}

pub async fn default_profile_picture<S: ObjectStore>(store: &S) -> Option<String> {
    match resolve_download_url(store, DEFAULT_PROFILE_PICTURE).await {
        Ok(Some(url)) => Some(url.to_string()),
        Ok(None) => {
            warn!("No download URL for {DEFAULT_PROFILE_PICTURE}");
            None
        }
        Err(e) => {
            error!("Error fetching default profile picture: {e}");
            None
        }
    }
}
