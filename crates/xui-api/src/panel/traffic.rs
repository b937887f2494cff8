// Traffic endpoints
//
// Per-client usage lookups and the traffic counter resets.

use tracing::debug;

use crate::error::Error;
use crate::panel::client::PanelClient;
use crate::panel::models::ClientTraffic;

impl PanelClient {
    /// Usage counters for the client with this email.
    ///
    /// `GET /panel/api/inbounds/getClientTraffics/{email}`. Returns `None`
    /// when the panel answers `obj: null` (no such client).
    pub async fn get_client_traffics(&self, email: &str) -> Result<Option<ClientTraffic>, Error> {
        let url = self.inbounds_url(["getClientTraffics", email])?;
        debug!(email, "fetching client traffic");
        self.get(url).await
    }

    /// Usage counters for every client entry with this UUID.
    ///
    /// `GET /panel/api/inbounds/getClientTrafficsById/{uuid}`
    pub async fn get_client_traffics_by_id(
        &self,
        client_uuid: &str,
    ) -> Result<Vec<ClientTraffic>, Error> {
        let url = self.inbounds_url(["getClientTrafficsById", client_uuid])?;
        debug!(client_uuid, "fetching client traffic by id");
        Ok(self.get(url).await?.unwrap_or_default())
    }

    /// Zero the counters of every inbound.
    ///
    /// `POST /panel/api/inbounds/resetAllTraffics`
    pub async fn reset_all_traffics(&self) -> Result<(), Error> {
        let url = self.inbounds_url(["resetAllTraffics"])?;
        debug!("resetting all inbound traffic");
        let _: Option<serde_json::Value> = self.post(url).await?;
        Ok(())
    }

    /// Zero the counters of every client on one inbound.
    ///
    /// `POST /panel/api/inbounds/resetAllClientTraffics/{id}`
    pub async fn reset_all_client_traffics(&self, inbound_id: i64) -> Result<(), Error> {
        let id = inbound_id.to_string();
        let url = self.inbounds_url(["resetAllClientTraffics", id.as_str()])?;
        debug!(inbound_id, "resetting client traffic for inbound");
        let _: Option<serde_json::Value> = self.post(url).await?;
        Ok(())
    }

    /// Zero one client's counters.
    ///
    /// `POST /panel/api/inbounds/{id}/resetClientTraffic/{email}`
    pub async fn reset_client_traffic(&self, inbound_id: i64, email: &str) -> Result<(), Error> {
        let id = inbound_id.to_string();
        let url = self.inbounds_url([id.as_str(), "resetClientTraffic", email])?;
        debug!(inbound_id, email, "resetting client traffic");
        let _: Option<serde_json::Value> = self.post(url).await?;
        Ok(())
    }
}
