//! Network configuration table.
//!
//! Maps network selectors (names, numeric chain ids and short mnemonics) to
//! connection parameters. The table is built once and shared read-only.
//!
//! # File format
//!
//! ```json
//! {
//!   "networks": [
//!     {
//!       "name": "sepolia",
//!       "chainId": 11155111,
//!       "rpcEndpoints": ["https://rpc.sepolia.org"],
//!       "gatewayAddress": "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed",
//!       "aliases": ["sep"]
//!     }
//!   ]
//! }
//! ```
//!
//! The first network listed is the default for URLs without a selector.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error_handling::ConfigError;
use crate::protocol::Address;

/// Connection parameters for one network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkConfig {
    /// Canonical network name, also the network identifier.
    pub name: String,
    pub chain_id: u64,
    pub rpc_endpoints: Vec<String>,
    pub gateway_address: Address,
    /// Extra selectors accepted for this network.
    #[serde(default)]
    pub aliases: Vec<String>,
}

impl NetworkConfig {
    /// Every selector that refers to this network, lowercased.
    fn selectors(&self) -> Vec<String> {
        let mut keys = vec![self.name.to_ascii_lowercase(), self.chain_id.to_string()];
        for alias in &self.aliases {
            let alias = alias.to_ascii_lowercase();
            if !keys.contains(&alias) {
                keys.push(alias);
            }
        }
        keys
    }
}

#[derive(Deserialize)]
struct NetworkFile {
    networks: Vec<NetworkConfig>,
}

/// Ordered, alias-indexed set of networks.
#[derive(Debug, Clone)]
pub struct NetworkTable {
    networks: Vec<Arc<NetworkConfig>>,
    selectors: HashMap<String, usize>,
}

impl NetworkTable {
    /// Builds the table, rejecting empty input and selectors claimed by two
    /// networks.
    pub fn new(networks: Vec<NetworkConfig>) -> Result<Self, ConfigError> {
        if networks.is_empty() {
            return Err(ConfigError::NoNetworks);
        }

        let mut selectors: HashMap<String, usize> = HashMap::new();
        for (index, network) in networks.iter().enumerate() {
            if network.name.trim().is_empty() {
                return Err(ConfigError::Invalid {
                    field: "networks.name".to_string(),
                    message: format!("network #{index} has an empty name"),
                });
            }
            for key in network.selectors() {
                if let Some(&existing) = selectors.get(&key) {
                    return Err(ConfigError::DuplicateAlias {
                        alias: key,
                        first: networks[existing].name.clone(),
                        second: network.name.clone(),
                    });
                }
                selectors.insert(key, index);
            }
        }

        Ok(Self {
            networks: networks.into_iter().map(Arc::new).collect(),
            selectors,
        })
    }

    /// Parses the JSON file format described in the module docs.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let file: NetworkFile = serde_json::from_str(json)?;
        Self::new(file.networks)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Finds the network for a selector (case-insensitive).
    pub fn lookup(&self, selector: &str) -> Option<&Arc<NetworkConfig>> {
        self.selectors
            .get(&selector.trim().to_ascii_lowercase())
            .map(|&index| &self.networks[index])
    }

    /// The network used when a URL carries no selector.
    pub fn default_network(&self) -> &Arc<NetworkConfig> {
        // new() guarantees at least one entry
        &self.networks[0]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<NetworkConfig>> {
        self.networks.iter()
    }

    pub fn len(&self) -> usize {
        self.networks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.networks.is_empty()
    }
}
