// SPDX-License-Identifier: MIT OR Apache-2.0

use samiti_store::{DataStore, SessionStorage};

use crate::Samiti;
use crate::config::Config;
use crate::error::SessionError;

#[derive(Debug, Default)]
pub struct SamitiBuilder {
    config: Config,
}

impl SamitiBuilder {
    pub(crate) fn new() -> Self {
        SamitiBuilder {
            config: Config::default(),
        }
    }

    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    pub fn session_key(mut self, key: &str) -> Self {
        self.config.session_key = key.to_string();
        self
    }

    pub fn min_mobile_digits(mut self, digits: usize) -> Self {
        self.config.min_mobile_digits = digits;
        self
    }

    pub fn min_passphrase_len(mut self, len: usize) -> Self {
        self.config.min_passphrase_len = len;
        self
    }

    /// Restore the persisted session and assemble the directory around the given collaborators.
    pub async fn build<S, P>(
        self,
        store: S,
        storage: P,
    ) -> Result<Samiti<S, P>, SessionError<P::Error>>
    where
        S: DataStore,
        P: SessionStorage,
    {
        Samiti::open_inner(self.config, store, storage).await
    }
}
