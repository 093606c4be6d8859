// Legacy API user and user-group endpoints
//
// "Users" are every client the controller has ever seen (online or not),
// unlike `stat/sta` which only lists connected stations.

use tracing::debug;

use crate::error::Error;
use crate::legacy::client::LegacyClient;
use crate::legacy::models::{LegacyUser, LegacyUserGroup};

impl LegacyClient {
    /// List all user groups defined on the site.
    ///
    /// `GET /api/s/{site}/list/usergroup`
    pub async fn list_user_groups(&self) -> Result<Vec<LegacyUserGroup>, Error> {
        let url = self.site_url("list/usergroup")?;
        debug!("listing user groups");
        self.get(url).await
    }

    /// List all known users (clients), including offline ones.
    ///
    /// `GET /api/s/{site}/list/user`
    pub async fn list_users(&self) -> Result<Vec<LegacyUser>, Error> {
        let url = self.site_url("list/user")?;
        debug!("listing known users");
        self.get(url).await
    }

    /// Fetch a single known client by MAC address.
    ///
    /// `GET /api/s/{site}/stat/user/{mac}`. Returns `None` when the
    /// controller answers with an empty `data` array.
    pub async fn get_user(&self, mac: &str) -> Result<Option<LegacyUser>, Error> {
        let url = self.site_url(&format!("stat/user/{mac}"))?;
        debug!(mac, "fetching user");
        let data: Vec<LegacyUser> = self.get(url).await?;
        Ok(data.into_iter().next())
    }
}
