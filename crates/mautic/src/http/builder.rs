use super::{Auth, HttpConnection};
use crate::{err, Result, SharedConnection};

use url::Url;

use std::{sync::Arc, time::Duration};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Configures an [`HttpConnection`].
#[derive(Debug, Default)]
pub struct Builder {
    base_url: Option<String>,
    auth: Auth,
    timeout: Option<Duration>,
    user_agent: Option<String>,
    id: Option<String>,
}

impl Builder {
    /// Root of the Mautic installation, e.g. `https://mautic.example.com`.
    /// Request paths (`api/contacts`) are joined under it.
    pub fn base_url(&mut self, base_url: impl Into<String>) -> &mut Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn basic_auth(&mut self, user: impl Into<String>, password: impl Into<String>) -> &mut Self {
        self.auth = Auth::Basic {
            user: user.into(),
            password: password.into(),
        };
        self
    }

    /// An OAuth2 access token. Obtaining and refreshing it is up to the
    /// caller.
    pub fn bearer_token(&mut self, token: impl Into<String>) -> &mut Self {
        self.auth = Auth::Bearer(token.into());
        self
    }

    pub fn timeout(&mut self, timeout: Duration) -> &mut Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn user_agent(&mut self, user_agent: impl Into<String>) -> &mut Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Identifies the connection in [`Record::mautic_id`](crate::Record::mautic_id).
    pub fn id(&mut self, id: impl Into<String>) -> &mut Self {
        self.id = Some(id.into());
        self
    }

    pub fn build(&self) -> Result<HttpConnection> {
        let base_url = self
            .base_url
            .as_deref()
            .ok_or_else(|| err!("no base url configured"))?;
        let base_url = parse_base_url(base_url)?;

        let mut client = reqwest::Client::builder().timeout(self.timeout.unwrap_or(DEFAULT_TIMEOUT));
        if let Some(user_agent) = &self.user_agent {
            client = client.user_agent(user_agent.as_str());
        }
        let client = client
            .build()
            .map_err(|e| err!("failed to build HTTP client: {}", e))?;

        Ok(HttpConnection {
            id: self.id.clone(),
            base_url,
            client,
            auth: self.auth.clone(),
        })
    }

    pub fn build_shared(&self) -> Result<SharedConnection> {
        Ok(Arc::new(self.build()?))
    }
}

/// Parses the base url and makes sure it ends in `/`, so relative paths
/// join under it instead of replacing its last segment.
fn parse_base_url(src: &str) -> Result<Url> {
    let mut url = Url::parse(src).map_err(|e| err!("invalid base url `{}`: {}", src, e))?;

    match url.scheme() {
        "http" | "https" => {}
        scheme => crate::bail!("unsupported scheme `{}` in base url `{}`", scheme, src),
    }

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }

    Ok(url)
}
