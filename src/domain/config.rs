//! Page configuration model.
//!
//! Holds the page id and the credentials used to talk to the Graph API.

use serde::{Deserialize, Serialize};

use super::{AppError, Result};

/// Contents of the JSON configuration file.
///
/// Keys are camelCase on disk. `PascalCase` keys from older config files are
/// still accepted when reading.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageConfig {
    /// App id, needed only to obtain a long-lived token.
    #[serde(default, alias = "AppId", skip_serializing_if = "Option::is_none")]
    pub app_id: Option<String>,

    /// App secret, needed only to obtain a long-lived token.
    #[serde(default, alias = "AppSecret", skip_serializing_if = "Option::is_none")]
    pub app_secret: Option<String>,

    /// Id of the page whose conversations are exported.
    #[serde(default, alias = "PageId")]
    pub page_id: String,

    /// Page access token as issued by the developer tools (about 2 hours).
    #[serde(default, alias = "ShortLivedToken")]
    pub short_lived_token: String,

    /// Exchanged token, filled in and persisted on first use of `--longlived`.
    #[serde(default, alias = "LongLivedToken", skip_serializing_if = "Option::is_none")]
    pub long_lived_token: Option<String>,
}

impl PageConfig {
    /// Check that the required fields are present.
    ///
    /// # Errors
    /// Returns a config error naming the first missing field.
    pub fn validate(&self) -> Result<()> {
        if self.short_lived_token.is_empty() {
            return Err(AppError::Config {
                message: "shortLivedToken is required".into(),
            });
        }
        if self.page_id.is_empty() {
            return Err(AppError::Config {
                message: "pageId is required".into(),
            });
        }
        Ok(())
    }

    /// App id and secret, if both are set.
    #[must_use]
    pub fn app_credentials(&self) -> Option<(&str, &str)> {
        let id = non_empty(self.app_id.as_deref())?;
        let secret = non_empty(self.app_secret.as_deref())?;
        Some((id, secret))
    }

    /// The stored long-lived token, if any.
    #[must_use]
    pub fn long_lived_token(&self) -> Option<&str> {
        non_empty(self.long_lived_token.as_deref())
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
