// Panel authentication
//
// Form-based login that yields the `3x-ui` session cookie. The token is kept
// in the client's `Session` and attached to every later request by
// `PanelClient::request`.

use reqwest::Method;
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, trace};

use crate::auth::SESSION_COOKIE;
use crate::error::Error;
use crate::panel::client::PanelClient;

impl PanelClient {
    /// Authenticate with the panel and store the session token.
    ///
    /// `POST /login` with a form-encoded `username`/`password`.
    ///
    /// Fails with `HttpStatus` on a non-200 reply, `Authentication` when the
    /// panel answers `success: false`, and `MissingSessionCookie` when it
    /// answers `success: true` without setting the `3x-ui` cookie. On failure
    /// any previously held token is left untouched.
    pub async fn login(&self) -> Result<(), Error> {
        let url = self.url(["login"])?;
        let credentials = self.credentials();
        debug!(%url, username = %credentials.username, "logging in");

        let resp = self
            .http()
            .post(url)
            .form(&[
                ("username", credentials.username.as_str()),
                ("password", credentials.password.expose_secret()),
            ])
            .send()
            .await?;

        Self::check_status(&resp)?;

        // Cookies must be read before the body consumes the response.
        let token = resp
            .cookies()
            .find(|cookie| cookie.name() == SESSION_COOKIE)
            .map(|cookie| cookie.value().to_owned())
            .filter(|value| !value.is_empty());

        let envelope = Self::decode::<serde_json::Value>(resp).await?;
        if !envelope.success {
            return Err(Error::Authentication {
                message: envelope.msg.unwrap_or_default(),
            });
        }

        let token = token.ok_or(Error::MissingSessionCookie)?;
        trace!("storing session cookie");
        self.session().set(SecretString::from(token));

        debug!("login successful");
        Ok(())
    }

    /// End the session.
    ///
    /// `GET /logout`. The panel answers with a redirect whose outcome is not
    /// checked; the local token is cleared even if the request fails.
    pub async fn logout(&self) -> Result<(), Error> {
        let url = self.url(["logout"])?;
        let result = self.request(Method::GET, url).send().await;
        self.session().clear();
        result?;
        debug!("logout complete");
        Ok(())
    }

    /// Whether a session token is currently held.
    ///
    /// This is local state only; the panel may have expired the session.
    pub fn is_authenticated(&self) -> bool {
        self.session().is_set()
    }

    /// Install a session token obtained elsewhere (e.g. a saved cookie).
    pub fn set_session(&self, token: impl Into<String>) {
        self.session().set(SecretString::from(token.into()));
    }

    /// Forget the session token without contacting the panel.
    pub fn clear_session(&self) {
        self.session().clear();
    }
}
