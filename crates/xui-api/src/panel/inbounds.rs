// Inbound endpoints
//
// CRUD over inbound listeners under `/panel/api/inbounds/`, plus the
// backup trigger that lives on the same route group.

use tracing::debug;

use crate::error::Error;
use crate::panel::client::PanelClient;
use crate::panel::models::Inbound;

impl PanelClient {
    /// List every inbound.
    ///
    /// `GET /panel/api/inbounds/list`
    pub async fn list_inbounds(&self) -> Result<Vec<Inbound>, Error> {
        let url = self.inbounds_url(["list"])?;
        debug!("listing inbounds");
        Ok(self.get(url).await?.unwrap_or_default())
    }

    /// Fetch one inbound by ID.
    ///
    /// `GET /panel/api/inbounds/get/{id}`
    pub async fn get_inbound(&self, inbound_id: i64) -> Result<Inbound, Error> {
        let id = inbound_id.to_string();
        let url = self.inbounds_url(["get", id.as_str()])?;
        debug!(inbound_id, "fetching inbound");
        self.get(url)
            .await?
            .ok_or(Error::MissingObject { operation: "get_inbound" })
    }

    /// Create an inbound and return it as stored by the panel.
    ///
    /// `POST /panel/api/inbounds/add`
    pub async fn add_inbound(&self, inbound: &Inbound) -> Result<Inbound, Error> {
        let url = self.inbounds_url(["add"])?;
        debug!(remark = %inbound.remark, port = inbound.port, "adding inbound");
        self.post_json(url, inbound)
            .await?
            .ok_or(Error::MissingObject { operation: "add_inbound" })
    }

    /// Replace an inbound's configuration.
    ///
    /// `POST /panel/api/inbounds/update/{id}`
    pub async fn update_inbound(&self, inbound_id: i64, inbound: &Inbound) -> Result<Inbound, Error> {
        let id = inbound_id.to_string();
        let url = self.inbounds_url(["update", id.as_str()])?;
        debug!(inbound_id, "updating inbound");
        self.post_json(url, inbound)
            .await?
            .ok_or(Error::MissingObject { operation: "update_inbound" })
    }

    /// Delete an inbound.
    ///
    /// `POST /panel/api/inbounds/del/{id}`. The panel echoes the ID back;
    /// it is discarded.
    pub async fn delete_inbound(&self, inbound_id: i64) -> Result<(), Error> {
        let id = inbound_id.to_string();
        let url = self.inbounds_url(["del", id.as_str()])?;
        debug!(inbound_id, "deleting inbound");
        let _: Option<serde_json::Value> = self.post(url).await?;
        Ok(())
    }

    /// Ask the panel to create a database backup (sent to its Telegram bot).
    ///
    /// `GET /panel/api/inbounds/createbackup`
    pub async fn create_backup(&self) -> Result<(), Error> {
        let url = self.inbounds_url(["createbackup"])?;
        debug!("requesting backup");
        let _: Option<serde_json::Value> = self.get(url).await?;
        Ok(())
    }
}
