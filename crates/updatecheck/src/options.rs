use updatecheck_platform::KillSwitch;

use crate::client::{UNKNOWN_CALLER, endpoint_for};

/// Per-call overrides for [`UpdateNotifier::check`](crate::UpdateNotifier::check).
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    client: Option<reqwest::Client>,
    endpoint: Option<String>,
    caller: Option<String>,
    kill_switch: Option<KillSwitch>,
}

impl CheckOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn client(mut self, client: reqwest::Client) -> Self {
        self.client = Some(client);
        self
    }

    /// Replace the development/production endpoint, e.g. with a test server.
    #[must_use]
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Name reported in the `User-Agent`, usually `env!("CARGO_PKG_NAME")`.
    #[must_use]
    pub fn caller(mut self, caller: impl Into<String>) -> Self {
        self.caller = Some(caller.into());
        self
    }

    /// Environment variable consulted instead of `GRANTED_DISABLE_UPDATE_CHECK`.
    #[must_use]
    pub fn kill_switch(mut self, var: impl Into<String>) -> Self {
        self.kill_switch = Some(KillSwitch::new(var));
        self
    }

    pub(crate) fn resolve_kill_switch(&self) -> KillSwitch {
        self.kill_switch.clone().unwrap_or_default()
    }

    pub(crate) fn resolve_endpoint(&self, production: bool) -> String {
        self.endpoint
            .clone()
            .unwrap_or_else(|| endpoint_for(production).to_string())
    }

    pub(crate) fn resolve_caller(&self) -> String {
        self.caller
            .clone()
            .unwrap_or_else(|| UNKNOWN_CALLER.to_string())
    }

    pub(crate) fn resolve_client(&self) -> reqwest::Client {
        self.client.clone().unwrap_or_default()
    }
}
