// Legacy API station manager commands
//
// `cmd/stamgr` carries every per-client command; only block and unblock
// are exposed here.

use serde_json::json;
use tracing::debug;

use crate::error::Error;
use crate::legacy::client::LegacyClient;

impl LegacyClient {
    /// Block a client by MAC address.
    ///
    /// `POST /api/s/{site}/cmd/stamgr` with `{"cmd": "block-sta", "mac": "..."}`
    pub async fn block_client(&self, mac: &str) -> Result<(), Error> {
        debug!(mac, "blocking client");
        self.stamgr("block-sta", mac).await
    }

    /// Unblock a client by MAC address.
    ///
    /// `POST /api/s/{site}/cmd/stamgr` with `{"cmd": "unblock-sta", "mac": "..."}`
    pub async fn unblock_client(&self, mac: &str) -> Result<(), Error> {
        debug!(mac, "unblocking client");
        self.stamgr("unblock-sta", mac).await
    }

    async fn stamgr(&self, cmd: &str, mac: &str) -> Result<(), Error> {
        let url = self.site_url("cmd/stamgr")?;
        let _: Vec<serde_json::Value> = self
            .post(
                url,
                &json!({
                    "cmd": cmd,
                    "mac": mac,
                }),
            )
            .await?;
        Ok(())
    }
}
