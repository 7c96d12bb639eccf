use std::env;
use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{Context, Result};
use url::Url;
use zeroize::Zeroizing;

/// PayU public sandbox gateway.
pub const SANDBOX_ACTION_URL: &str = "https://sandbox.checkout.payulatam.com/ppp-web-gateway-payu";
/// PayU public sandbox merchant.
pub const SANDBOX_MERCHANT_ID: &str = "508029";
/// PayU public sandbox account.
pub const SANDBOX_ACCOUNT_ID: &str = "512321";
/// PayU public sandbox API key, used for signing.
pub const SANDBOX_API_KEY: &str = "4Vj8eK4rloUd272L48hsrarnUA";

const DEFAULT_BASE_URL: &str = "http://localhost:3000";
const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_SESSION_TTL_SECS: u64 = 10 * 60;
const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 60;

/// The application's configuration.
#[derive(Clone)]
pub struct Config {
    /// Public base URL used for the callback URLs and the redirect link.
    pub base_url: String,
    /// The address the HTTP server binds to.
    pub listen_addr: SocketAddr,
    /// The processor endpoint the browser form posts to.
    pub action_url: String,
    /// The merchant identifier.
    pub merchant_id: String,
    /// The account identifier.
    pub account_id: String,
    /// The API key used for signing.
    pub api_key: Zeroizing<String>,
    /// Whether transactions are flagged as test transactions.
    pub test_mode: bool,
    /// How long a checkout session stays valid.
    pub session_ttl: Duration,
    /// How often expired checkout sessions are swept.
    pub sweep_interval: Duration,
    /// Whether `X-Forwarded-*` headers are trusted.
    pub trust_proxy: bool,
    /// Origins allowed by CORS. Empty disables the CORS layer.
    pub cors_origins: Vec<String>,
}

impl Config {
    /// Creates a new `Config` from environment variables.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `Config`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Creates a new `Config` from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let is_production = lookup("APP_ENV").as_deref() == Some("production");

        let merchant_id = lookup("PAYU_MERCHANT_ID");
        let account_id = lookup("PAYU_ACCOUNT_ID");
        let api_key = lookup("PAYU_API_KEY");

        if is_production && (merchant_id.is_none() || account_id.is_none() || api_key.is_none()) {
            anyhow::bail!(
                "PAYU_MERCHANT_ID, PAYU_ACCOUNT_ID and PAYU_API_KEY must be set when APP_ENV=production"
            );
        }

        let base_url = lookup("BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let base_url = parse_base_url(&base_url)?;

        let action_url = lookup("PAYU_ACTION_URL").unwrap_or_else(|| SANDBOX_ACTION_URL.to_string());
        Url::parse(&action_url).context("PAYU_ACTION_URL must be an absolute URL")?;

        let listen_addr = lookup("LISTEN_ADDR")
            .unwrap_or_else(|| DEFAULT_LISTEN_ADDR.to_string())
            .parse()
            .context("Invalid LISTEN_ADDR")?;

        let session_ttl_secs: u64 = lookup("SESSION_TTL_SECS")
            .unwrap_or_else(|| DEFAULT_SESSION_TTL_SECS.to_string())
            .parse()
            .context("Invalid SESSION_TTL_SECS")?;
        let sweep_interval_secs: u64 = lookup("SESSION_SWEEP_INTERVAL_SECS")
            .unwrap_or_else(|| DEFAULT_SWEEP_INTERVAL_SECS.to_string())
            .parse()
            .context("Invalid SESSION_SWEEP_INTERVAL_SECS")?;

        if session_ttl_secs == 0 {
            anyhow::bail!("SESSION_TTL_SECS must be greater than zero");
        }
        if sweep_interval_secs == 0 {
            anyhow::bail!("SESSION_SWEEP_INTERVAL_SECS must be greater than zero");
        }

        Ok(Self {
            base_url,
            listen_addr,
            action_url,
            merchant_id: merchant_id.unwrap_or_else(|| SANDBOX_MERCHANT_ID.to_string()),
            account_id: account_id.unwrap_or_else(|| SANDBOX_ACCOUNT_ID.to_string()),
            api_key: Zeroizing::new(api_key.unwrap_or_else(|| SANDBOX_API_KEY.to_string())),
            test_mode: parse_flag(lookup("PAYU_TEST_MODE"), true).context("Invalid PAYU_TEST_MODE")?,
            session_ttl: Duration::from_secs(session_ttl_secs),
            sweep_interval: Duration::from_secs(sweep_interval_secs),
            trust_proxy: parse_flag(lookup("TRUST_PROXY"), true).context("Invalid TRUST_PROXY")?,
            cors_origins: lookup("CORS_ORIGINS")
                .map(|s| {
                    s.split(',')
                        .map(|origin| origin.trim().to_string())
                        .filter(|origin| !origin.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
        })
    }

    /// Sandbox configuration rooted at `base_url`, with default timings.
    pub fn sandbox(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            listen_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
            action_url: SANDBOX_ACTION_URL.to_string(),
            merchant_id: SANDBOX_MERCHANT_ID.to_string(),
            account_id: SANDBOX_ACCOUNT_ID.to_string(),
            api_key: Zeroizing::new(SANDBOX_API_KEY.to_string()),
            test_mode: true,
            session_ttl: Duration::from_secs(DEFAULT_SESSION_TTL_SECS),
            sweep_interval: Duration::from_secs(DEFAULT_SWEEP_INTERVAL_SECS),
            trust_proxy: true,
            cors_origins: Vec::new(),
        }
    }

    /// Whether the public sandbox credentials are in use.
    pub fn is_sandbox(&self) -> bool {
        self.api_key.as_str() == SANDBOX_API_KEY
    }

    /// URL the processor redirects the buyer's browser to.
    pub fn response_url(&self) -> String {
        format!("{}/payu/response", self.base_url)
    }

    /// URL the processor calls server-to-server.
    pub fn confirmation_url(&self) -> String {
        format!("{}/api/payu/confirm", self.base_url)
    }

    /// Link that renders the auto-submit form for `token`.
    pub fn pay_url(&self, token: &str) -> String {
        format!("{}/payu/redirect/{}", self.base_url, token)
    }
}

fn parse_base_url(raw: &str) -> Result<String> {
    let url = Url::parse(raw).context("BASE_URL must be an absolute URL")?;
    if url.scheme() != "http" && url.scheme() != "https" {
        anyhow::bail!("BASE_URL must use http or https");
    }
    Ok(raw.trim_end_matches('/').to_string())
}

fn parse_flag(value: Option<String>, default: bool) -> Result<bool> {
    match value.as_deref().map(str::trim) {
        None => Ok(default),
        Some(v) if v.eq_ignore_ascii_case("true") || v == "1" || v.eq_ignore_ascii_case("yes") => {
            Ok(true)
        }
        Some(v) if v.eq_ignore_ascii_case("false") || v == "0" || v.eq_ignore_ascii_case("no") => {
            Ok(false)
        }
        Some(v) => anyhow::bail!("expected a boolean, got {:?}", v),
    }
}
