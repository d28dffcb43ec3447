//! Provider identity and the descriptor that parameterizes the handshake.
//!
//! Every provider runs the same redirect handshake. What differs is fixed
//! integration data (authorization endpoint, scopes, extra parameters) and a
//! few deployment settings (client id, callback URL, error view), which are
//! folded together into a [`ProviderDescriptor`].

use std::str::FromStr;

use crate::config::{Config, Initiation};
use crate::oauth::initiator::default_callback_url;

/// Google's authorization endpoint, shared by the Google and YouTube integrations.
const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";

/// A social platform whose account can be linked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provider {
    LinkedIn,
    Twitter,
    YouTube,
    Google,
}

impl Provider {
    pub const ALL: [Provider; 4] = [
        Provider::LinkedIn,
        Provider::Twitter,
        Provider::YouTube,
        Provider::Google,
    ];

    /// Lowercase identifier used in routes and storage keys.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LinkedIn => "linkedin",
            Self::Twitter => "twitter",
            Self::YouTube => "youtube",
            Self::Google => "google",
        }
    }

    /// Client store key holding this provider's anti-forgery token.
    pub fn state_key(&self) -> String {
        format!("{}_state", self.as_str())
    }

    pub fn default_authorize_url(&self) -> &'static str {
        match self {
            Self::LinkedIn => "https://www.linkedin.com/oauth/v2/authorization",
            Self::Twitter => "https://twitter.com/i/oauth2/authorize",
            Self::YouTube | Self::Google => GOOGLE_AUTH_URL,
        }
    }

    /// Scopes requested from the provider. Fixed per integration.
    pub fn scopes(&self) -> &'static [&'static str] {
        match self {
            Self::LinkedIn => &["openid", "profile", "email"],
            Self::Twitter => &["tweet.read", "users.read", "offline.access"],
            Self::YouTube => &[
                "https://www.googleapis.com/auth/youtube.readonly",
                "https://www.googleapis.com/auth/userinfo.profile",
            ],
            Self::Google => &["openid", "email", "profile"],
        }
    }

    /// Provider-specific parameters appended after the standard ones.
    pub fn extra_params(&self) -> &'static [(&'static str, &'static str)] {
        match self {
            Self::YouTube | Self::Google => &[("access_type", "offline"), ("prompt", "consent")],
            Self::LinkedIn | Self::Twitter => &[],
        }
    }

    pub fn default_initiation(&self) -> Initiation {
        match self {
            Self::LinkedIn => Initiation::Client,
            Self::Twitter | Self::YouTube | Self::Google => Initiation::Backend,
        }
    }

    /// Human-readable name for views.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::LinkedIn => "LinkedIn",
            Self::Twitter => "Twitter",
            Self::YouTube => "YouTube",
            Self::Google => "Google",
        }
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "linkedin" => Ok(Self::LinkedIn),
            "twitter" | "x" => Ok(Self::Twitter),
            "youtube" => Ok(Self::YouTube),
            "google" => Ok(Self::Google),
            _ => Err(format!("Unknown provider: {s}")),
        }
    }
}

/// Everything the generic handshake needs to know about one provider in one
/// deployment.
#[derive(Debug, Clone)]
pub struct ProviderDescriptor {
    pub provider: Provider,
    /// Client store key for the anti-forgery token.
    pub state_key: String,
    /// Redirect URI registered with the provider.
    pub callback_url: String,
    /// Backend route that performs the code-for-token exchange.
    pub exchange_endpoint: String,
    /// Backend route that issues authorization URLs in `backend` mode.
    pub auth_url_endpoint: String,
    /// View that receives failure messages.
    pub error_redirect: String,
    pub authorize_url: String,
    pub client_id: Option<String>,
    pub scopes: Vec<String>,
    pub initiation: Initiation,
}

impl ProviderDescriptor {
    /// Resolve a provider's descriptor from configuration, filling in the
    /// fixed integration defaults.
    pub fn from_config(config: &Config, provider: Provider) -> Self {
        let pc = config.providers.get(provider);
        let api_base = config.app.api_base.trim_end_matches('/');

        let callback_url = pc
            .callback_url
            .clone()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| default_callback_url(&config.app.public_origin, provider));

        Self {
            provider,
            state_key: provider.state_key(),
            callback_url,
            exchange_endpoint: format!("{api_base}/api/{provider}/callback"),
            auth_url_endpoint: format!("{api_base}/api/{provider}/auth-url"),
            error_redirect: pc
                .error_redirect
                .clone()
                .unwrap_or_else(|| config.app.error_path.clone()),
            authorize_url: pc
                .authorize_url
                .clone()
                .unwrap_or_else(|| provider.default_authorize_url().to_string()),
            client_id: pc.client_id.clone().filter(|s| !s.trim().is_empty()),
            scopes: provider.scopes().iter().map(|s| s.to_string()).collect(),
            initiation: pc.initiation.unwrap_or_else(|| provider.default_initiation()),
        }
    }
}
