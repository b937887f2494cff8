// Inbound client endpoints
//
// Adding, updating and removing users on an inbound, plus IP tracking and
// the online list. The panel takes client changes as a JSON *string* of
// `{"clients": [...]}` inside the request body; see `ClientSettings`.

use tracing::debug;

use crate::error::Error;
use crate::panel::client::PanelClient;
use crate::panel::models::{Client, ClientSettings, ClientSettingsRequest};

impl PanelClient {
    /// Add clients to an inbound from a pre-serialized settings document.
    ///
    /// `POST /panel/api/inbounds/addClient` with `{"id": ..., "settings": "..."}`
    pub async fn add_client_to_inbound(&self, inbound_id: i64, settings: &str) -> Result<(), Error> {
        let url = self.inbounds_url(["addClient"])?;
        debug!(inbound_id, "adding clients to inbound");
        let body = ClientSettingsRequest {
            id: inbound_id,
            settings,
        };
        let _: Option<serde_json::Value> = self.post_json(url, &body).await?;
        Ok(())
    }

    /// Add typed clients to an inbound.
    pub async fn add_clients(&self, inbound_id: i64, clients: &[Client]) -> Result<(), Error> {
        let settings = ClientSettings {
            clients: clients.to_vec(),
        }
        .to_embedded()?;
        self.add_client_to_inbound(inbound_id, settings.as_str())
            .await
    }

    /// Update one client from a pre-serialized settings document.
    ///
    /// `POST /panel/api/inbounds/updateClient/{uuid}` with `{"id": ..., "settings": "..."}`
    pub async fn update_client(
        &self,
        client_uuid: &str,
        inbound_id: i64,
        settings: &str,
    ) -> Result<(), Error> {
        let url = self.inbounds_url(["updateClient", client_uuid])?;
        debug!(client_uuid, inbound_id, "updating client");
        let body = ClientSettingsRequest {
            id: inbound_id,
            settings,
        };
        let _: Option<serde_json::Value> = self.post_json(url, &body).await?;
        Ok(())
    }

    /// Update a typed client, addressed by its `id`.
    pub async fn update_client_record(&self, inbound_id: i64, client: &Client) -> Result<(), Error> {
        let settings = ClientSettings {
            clients: vec![client.clone()],
        }
        .to_embedded()?;
        self.update_client(&client.id, inbound_id, settings.as_str())
            .await
    }

    /// Remove a client from an inbound.
    ///
    /// `POST /panel/api/inbounds/{id}/delClient/{uuid}`
    pub async fn delete_client(&self, inbound_id: i64, client_uuid: &str) -> Result<(), Error> {
        let id = inbound_id.to_string();
        let url = self.inbounds_url([id.as_str(), "delClient", client_uuid])?;
        debug!(inbound_id, client_uuid, "deleting client");
        let _: Option<serde_json::Value> = self.post(url).await?;
        Ok(())
    }

    /// Remove every client of an inbound that is out of traffic or expired.
    ///
    /// `POST /panel/api/inbounds/delDepletedClients/{id}`
    pub async fn delete_depleted_clients(&self, inbound_id: i64) -> Result<(), Error> {
        let id = inbound_id.to_string();
        let url = self.inbounds_url(["delDepletedClients", id.as_str()])?;
        debug!(inbound_id, "deleting depleted clients");
        let _: Option<serde_json::Value> = self.post(url).await?;
        Ok(())
    }

    /// IP addresses recorded for a client, as the panel formats them.
    ///
    /// `POST /panel/api/inbounds/clientIps/{email}`. The panel returns a
    /// display string (e.g. `"No IP Record"` when empty), not a list.
    pub async fn get_client_ips(&self, email: &str) -> Result<String, Error> {
        let url = self.inbounds_url(["clientIps", email])?;
        debug!(email, "fetching client IPs");
        Ok(self.post(url).await?.unwrap_or_default())
    }

    /// Forget the IP addresses recorded for a client.
    ///
    /// `POST /panel/api/inbounds/clearClientIps/{email}`
    pub async fn clear_client_ips(&self, email: &str) -> Result<(), Error> {
        let url = self.inbounds_url(["clearClientIps", email])?;
        debug!(email, "clearing client IPs");
        let _: Option<serde_json::Value> = self.post(url).await?;
        Ok(())
    }

    /// Emails of currently connected clients.
    ///
    /// `POST /panel/api/inbounds/onlines`
    pub async fn get_online_clients(&self) -> Result<Vec<String>, Error> {
        let url = self.inbounds_url(["onlines"])?;
        debug!("listing online clients");
        Ok(self.post(url).await?.unwrap_or_default())
    }
}
