//! Process configuration read from the environment.
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Settings for one `holding-bag` session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    /// Content directory; `None` uses the data bundled with `holding-content`.
    pub data_dir: Option<PathBuf>,
    /// Run only this bag module; `None` runs every module in file order.
    pub bag_id: Option<String>,
    /// Occupant removals to attempt per bag.
    pub removals: u32,
    pub session_seed: u64,
    pub spawn_latency: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            bag_id: None,
            removals: 5,
            session_seed: 0,
            spawn_latency: Duration::ZERO,
        }
    }
}

impl ClientConfig {
    /// Construct configuration from environment variables.
    ///
    /// Environment variables:
    /// - `HOLDING_DATA_DIR` - Directory holding `items.ron` and `bags.toml`
    /// - `HOLDING_BAG_ID` - Bag module to run (default: all)
    /// - `HOLDING_REMOVALS` - Removals per bag (default: 5)
    /// - `HOLDING_SEED` - Session seed for restock draws (default: 0)
    /// - `HOLDING_SPAWN_LATENCY_MS` - Artificial instantiation delay (default: 0)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`Self::from_env`] over an arbitrary variable source.
    ///
    /// Unparseable numbers fall back to their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(dir) = non_empty("HOLDING_DATA_DIR") {
            config.data_dir = Some(PathBuf::from(dir));
        }
        config.bag_id = non_empty("HOLDING_BAG_ID");
        if let Some(removals) = non_empty("HOLDING_REMOVALS").and_then(|v| v.trim().parse().ok()) {
            config.removals = removals;
        }
        if let Some(seed) = non_empty("HOLDING_SEED").and_then(|v| v.trim().parse().ok()) {
            config.session_seed = seed;
        }
        if let Some(ms) = non_empty("HOLDING_SPAWN_LATENCY_MS").and_then(|v| v.trim().parse().ok()) {
            config.spawn_latency = Duration::from_millis(ms);
        }

        config
    }
}
