//! Browser pairing URL construction.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;

use crate::error::{Error, Result};

/// Path on the web app that accepts terminal pairing requests.
pub const CONNECT_PATH: &str = "/terminal/connect";

/// Build `{webapp_url}/terminal/connect#key={base64url(public_key)}`.
pub fn web_auth_url(webapp_url: &str, public_key: &[u8]) -> Result<String> {
    if webapp_url.is_empty() {
        return Err(Error::ConfigurationMissing);
    }
    let encoded = URL_SAFE_NO_PAD.encode(public_key);
    Ok(format!("{webapp_url}{CONNECT_PATH}#key={encoded}"))
}
