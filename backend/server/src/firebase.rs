//! # Firebase Admin
//!
//! One admin client per process, created on first use and shared after that.
//!
//! ## Credentials
//! - Service account JSON mounted as the `FIREBASE_SERVICE_ACCOUNT` secret
//! - OAuth2 access tokens are minted and cached by yup-oauth2
//!
//! ## Services
//! All calls go through the REST APIs with a bearer token.
//! - Firestore: `firestore.googleapis.com/v1`, read only
//! - Cloud Messaging: `fcm.googleapis.com/v1`
//! - Storage: `firebasestorage.googleapis.com/v0`, metadata reads only
//!
//! ## Firestore Values
//! Firestore REST wraps every value in a type tag, e.g. `{"integerValue": "700"}`.
//! [`decode_document`] unwraps a document's fields into plain JSON so the
//! rest of the server can use serde as usual.

use std::sync::Arc;

use reqwest::{Client, StatusCode, Url};
use serde::Serialize;
use serde_json::{Map, Value};
use tokio::sync::OnceCell;
use tracing::{debug, info};
use yup_oauth2::{
    ServiceAccountAuthenticator, authenticator::DefaultAuthenticator,
    parse_service_account_key,
};

use crate::{
    config::{Config, SERVICE_ACCOUNT_SECRET, read_secret},
    error::FirebaseError,
};

pub const FIRESTORE_ENDPOINT: &str = "https://firestore.googleapis.com/v1";
pub const MESSAGING_ENDPOINT: &str = "https://fcm.googleapis.com/v1";
pub const STORAGE_ENDPOINT: &str = "https://firebasestorage.googleapis.com/v0";

const SCOPES: &[&str] = &[
    "https://www.googleapis.com/auth/cloud-platform",
    "https://www.googleapis.com/auth/firebase.messaging",
];

static ADMIN: OnceCell<Arc<FirebaseAdmin>> = OnceCell::const_new();

pub struct FirebaseAdmin {
    project_id: String,
    bucket: String,
    authenticator: DefaultAuthenticator,
    http: Client,
}

impl FirebaseAdmin {
    /// Returns the process-wide client, initializing it on the first call.
    ///
    /// Later calls ignore `config` and hand back the same instance. A failed
    /// initialization is not cached, the next call tries again.
    pub async fn shared(config: &Config) -> Result<Arc<Self>, FirebaseError> {
        ADMIN
            .get_or_try_init(|| async { Self::initialize(config).await.map(Arc::new) })
            .await
            .cloned()
    }

    async fn initialize(config: &Config) -> Result<Self, FirebaseError> {
        info!(
            "Initializing Firebase admin for project {}",
            config.firebase_project_id
        );

        let key = parse_service_account_key(read_secret(SERVICE_ACCOUNT_SECRET)?)?;
        let authenticator = ServiceAccountAuthenticator::builder(key).build().await?;

        Ok(Self {
            project_id: config.firebase_project_id.clone(),
            bucket: config.storage_bucket.clone(),
            authenticator,
            http: Client::new(),
        })
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    pub async fn bearer(&self) -> Result<String, FirebaseError> {
        let token = self.authenticator.token(SCOPES).await?;

        token
            .token()
            .map(str::to_string)
            .ok_or(FirebaseError::MissingToken)
    }

    /// GET a JSON resource, `None` on 404.
    pub async fn get_json(&self, url: Url) -> Result<Option<Value>, FirebaseError> {
        debug!("GET {url}");

        let response = self
            .http
            .get(url)
            .bearer_auth(self.bearer().await?)
            .send()
            .await?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => Ok(Some(response.json().await?)),
            status => Err(upstream_error(status, &response.text().await?)),
        }
    }

    pub async fn post_json<T: Serialize + ?Sized>(
        &self,
        url: Url,
        body: &T,
        bearer: &str,
    ) -> Result<Value, FirebaseError> {
        debug!("POST {url}");

        let response = self
            .http
            .post(url)
            .bearer_auth(bearer)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            Ok(response.json().await?)
        } else {
            Err(upstream_error(status, &response.text().await?))
        }
    }

    pub fn document_url(&self, path: &[&str]) -> Result<Url, FirebaseError> {
        let mut url = endpoint(FIRESTORE_ENDPOINT)?;
        url.path_segments_mut()
            .map_err(|_| cannot_be_base(FIRESTORE_ENDPOINT))?
            .extend([
                "projects",
                self.project_id.as_str(),
                "databases",
                "(default)",
                "documents",
            ])
            .extend(path);

        Ok(url)
    }
}

pub(crate) fn endpoint(base: &str) -> Result<Url, FirebaseError> {
    Ok(Url::parse(base)?)
}

pub(crate) fn cannot_be_base(base: &str) -> FirebaseError {
    FirebaseError::CannotBeBase(base.to_string())
}

/// Pulls `error.message` out of a Google API error body when there is one.
pub(crate) fn upstream_error(status: StatusCode, body: &str) -> FirebaseError {
    let message = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|json| {
            json.pointer("/error/message")
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.to_string());

    FirebaseError::Upstream {
        status: status.as_u16(),
        message,
    }
}

/// Unwraps a Firestore REST document into a plain JSON object of its fields.
pub fn decode_document(document: &Value) -> Value {
    match document.get("fields") {
        Some(Value::Object(fields)) => decode_fields(fields),
        _ => Value::Object(Map::new()),
    }
}

fn decode_fields(fields: &Map<String, Value>) -> Value {
    Value::Object(
        fields
            .iter()
            .map(|(key, value)| (key.clone(), decode_value(value)))
            .collect(),
    )
}

pub fn decode_value(value: &Value) -> Value {
    let Some((tag, inner)) = value.as_object().and_then(|object| object.iter().next()) else {
        return Value::Null;
    };

    match tag.as_str() {
        "nullValue" => Value::Null,
        "booleanValue" => inner.clone(),
        "integerValue" => match inner {
            Value::String(s) => s.parse::<i64>().map(Value::from).unwrap_or(Value::Null),
            Value::Number(_) => inner.clone(),
            _ => Value::Null,
        },
        // NaN/Infinity arrive as strings and have no JSON form
        "doubleValue" => match inner {
            Value::Number(_) => inner.clone(),
            _ => Value::Null,
        },
        "stringValue" | "timestampValue" | "referenceValue" | "bytesValue" => inner.clone(),
        "geoPointValue" => inner.clone(),
        "arrayValue" => Value::Array(
            inner
                .get("values")
                .and_then(Value::as_array)
                .map(|values| values.iter().map(decode_value).collect())
                .unwrap_or_default(),
        ),
        "mapValue" => match inner.get("fields") {
            Some(Value::Object(fields)) => decode_fields(fields),
            _ => Value::Object(Map::new()),
        },
        _ => Value::Null,
    }
}

#[cfg(test)]
mod tests {
    use reqwest::StatusCode;
    use serde_json::json;

    use super::{FirebaseError, cannot_be_base, decode_document, decode_value, endpoint, upstream_error};

    #[test]
    fn test_bad_endpoint_is_not_upstream() {
        assert!(matches!(endpoint("not a url"), Err(FirebaseError::Url(_))));
        assert!(matches!(
            cannot_be_base("mailto:x@y.z"),
            FirebaseError::CannotBeBase(_)
        ));
        assert!(endpoint(super::FIRESTORE_ENDPOINT).is_ok());
    }

    #[test]
    fn test_decode_scalars() {
        assert_eq!(decode_value(&json!({"nullValue": null})), json!(null));
        assert_eq!(decode_value(&json!({"booleanValue": true})), json!(true));
        assert_eq!(decode_value(&json!({"integerValue": "700"})), json!(700));
        assert_eq!(decode_value(&json!({"doubleValue": 0.05})), json!(0.05));
        assert_eq!(decode_value(&json!({"doubleValue": "NaN"})), json!(null));
        assert_eq!(decode_value(&json!({"stringValue": "auto"})), json!("auto"));
        assert_eq!(
            decode_value(&json!({"timestampValue": "2024-01-01T00:00:00Z"})),
            json!("2024-01-01T00:00:00Z")
        );
    }

    #[test]
    fn test_decode_nested() {
        let value = json!({
            "mapValue": {
                "fields": {
                    "rates": {"arrayValue": {"values": [{"doubleValue": 0.1}, {"integerValue": "2"}]}},
                    "empty": {"arrayValue": {}}
                }
            }
        });

        assert_eq!(decode_value(&value), json!({"rates": [0.1, 2], "empty": []}));
    }

    #[test]
    fn test_decode_document() {
        let document = json!({
            "name": "projects/p/databases/(default)/documents/units/abc",
            "fields": {
                "name": {"stringValue": "Unidade Centro"},
                "bonusParameters": {"mapValue": {"fields": {"minWithdrawal": {"integerValue": "500"}}}}
            }
        });

        assert_eq!(
            decode_document(&document),
            json!({"name": "Unidade Centro", "bonusParameters": {"minWithdrawal": 500}})
        );
        assert_eq!(decode_document(&json!({"name": "x"})), json!({}));
    }

    #[test]
    fn test_upstream_error_message() {
        let body = r#"{"error": {"code": 403, "message": "Permission denied", "status": "PERMISSION_DENIED"}}"#;

        match upstream_error(StatusCode::FORBIDDEN, body) {
            FirebaseError::Upstream { status, message } => {
                assert_eq!(status, 403);
                assert_eq!(message, "Permission denied");
            }
            other => panic!("unexpected error {other:?}"),
        }

        match upstream_error(StatusCode::BAD_GATEWAY, "upstream down") {
            FirebaseError::Upstream { message, .. } => assert_eq!(message, "upstream down"),
            other => panic!("unexpected error {other:?}"),
        }
    }
}
