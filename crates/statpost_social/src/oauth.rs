//! OAuth 1.0a request signing (HMAC-SHA1).

use crate::PublishCredentials;
use base64::Engine;
use hmac::{Hmac, Mac};
use sha1::Sha1;
use statpost_error::{PublishError, PublishErrorKind};

type HmacSha1 = Hmac<Sha1>;

/// Percent-encode per RFC 3986: everything except `A-Z a-z 0-9 - . _ ~`.
pub fn percent_encode(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

/// Signs requests on behalf of one user.
#[derive(Debug, Clone)]
pub struct OAuth1Signer {
    credentials: PublishCredentials,
}

impl OAuth1Signer {
    /// Signer for `credentials`.
    pub fn new(credentials: PublishCredentials) -> Self {
        Self { credentials }
    }

    /// `Authorization` header value with a fresh nonce and the current time.
    ///
    /// `params` are the query or form parameters that take part in the
    /// signature. A JSON body does not.
    pub fn authorization_header(
        &self,
        method: &str,
        url: &str,
        params: &[(&str, &str)],
    ) -> Result<String, PublishError> {
        let nonce = uuid::Uuid::new_v4().simple().to_string();
        let timestamp = chrono::Utc::now().timestamp().to_string();
        self.authorization_header_with(method, url, params, &nonce, &timestamp)
    }

    /// `Authorization` header value for a fixed nonce and timestamp.
    pub fn authorization_header_with(
        &self,
        method: &str,
        url: &str,
        params: &[(&str, &str)],
        nonce: &str,
        timestamp: &str,
    ) -> Result<String, PublishError> {
        let mut oauth = self.oauth_params(nonce, timestamp);
        let signature = self.signature(method, url, params, &oauth)?;
        oauth.push(("oauth_signature", signature));
        oauth.sort();

        let fields = oauth
            .iter()
            .map(|(k, v)| format!("{}=\"{}\"", percent_encode(k), percent_encode(v)))
            .collect::<Vec<_>>()
            .join(", ");
        Ok(format!("OAuth {}", fields))
    }

    fn oauth_params(&self, nonce: &str, timestamp: &str) -> Vec<(&'static str, String)> {
        vec![
            ("oauth_consumer_key", self.credentials.consumer_key().clone()),
            ("oauth_nonce", nonce.to_string()),
            ("oauth_signature_method", "HMAC-SHA1".to_string()),
            ("oauth_timestamp", timestamp.to_string()),
            ("oauth_token", self.credentials.access_token().clone()),
            ("oauth_version", "1.0".to_string()),
        ]
    }

    /// Base64 HMAC-SHA1 over the signature base string.
    fn signature(
        &self,
        method: &str,
        url: &str,
        params: &[(&str, &str)],
        oauth: &[(&'static str, String)],
    ) -> Result<String, PublishError> {
        let base = signature_base_string(method, url, params, oauth);
        let key = format!(
            "{}&{}",
            percent_encode(self.credentials.consumer_secret()),
            percent_encode(self.credentials.access_token_secret())
        );

        let mut mac = HmacSha1::new_from_slice(key.as_bytes())
            .map_err(|e| PublishError::new(PublishErrorKind::Signing(e.to_string())))?;
        mac.update(base.as_bytes());
        Ok(base64::engine::general_purpose::STANDARD.encode(mac.finalize().into_bytes()))
    }
}

/// `METHOD&enc(url)&enc(k1=v1&k2=v2...)` with parameters encoded then sorted.
fn signature_base_string(
    method: &str,
    url: &str,
    params: &[(&str, &str)],
    oauth: &[(&'static str, String)],
) -> String {
    let mut encoded: Vec<(String, String)> = params
        .iter()
        .map(|(k, v)| (percent_encode(k), percent_encode(v)))
        .chain(oauth.iter().map(|(k, v)| (percent_encode(k), percent_encode(v))))
        .collect();
    encoded.sort();

    let parameter_string = encoded
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&");

    format!(
        "{}&{}&{}",
        method.to_uppercase(),
        percent_encode(url),
        percent_encode(&parameter_string)
    )
}
