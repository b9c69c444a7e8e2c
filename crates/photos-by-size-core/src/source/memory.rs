use crate::gate::{Authorization, AuthorizationReply};
use crate::media::Asset;

use super::AssetSource;

/// Fixed list of assets with a fixed authorization answer.
pub(crate) struct MemorySource {
    pub assets: Vec<Asset>,
    pub authorization: Authorization,
}

impl MemorySource {
    pub fn granted(assets: Vec<Asset>) -> Self {
        Self {
            assets,
            authorization: Authorization::Granted,
        }
    }

    pub fn denied(assets: Vec<Asset>) -> Self {
        Self {
            assets,
            authorization: Authorization::Denied,
        }
    }
}

impl AssetSource for MemorySource {
    fn describe(&self) -> String {
        format!("memory ({} assets)", self.assets.len())
    }

    fn request_authorization(&self, reply: AuthorizationReply) {
        reply(self.authorization);
    }

    fn list_assets(&self) -> anyhow::Result<Vec<Asset>> {
        Ok(self.assets.clone())
    }
}
