//! Navigation location values for the nav state cell.

use serde::{Deserialize, Serialize};

/// Top-level dashboard section the process is currently looking at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum NavLocation {
    #[default]
    Overview,
    Jobs,
    Recipes,
    Nodes,
    Feed,
    Load,
    Queue,
    Metrics,
    About,
    Admin,
}

impl NavLocation {
    pub fn as_str(&self) -> &'static str {
        match self {
            NavLocation::Overview => "overview",
            NavLocation::Jobs => "jobs",
            NavLocation::Recipes => "recipes",
            NavLocation::Nodes => "nodes",
            NavLocation::Feed => "feed",
            NavLocation::Load => "load",
            NavLocation::Queue => "queue",
            NavLocation::Metrics => "metrics",
            NavLocation::About => "about",
            NavLocation::Admin => "admin",
        }
    }

    /// Every section, in sidebar order.
    pub fn all() -> &'static [NavLocation] {
        &[
            NavLocation::Overview,
            NavLocation::Jobs,
            NavLocation::Recipes,
            NavLocation::Nodes,
            NavLocation::Feed,
            NavLocation::Load,
            NavLocation::Queue,
            NavLocation::Metrics,
            NavLocation::About,
            NavLocation::Admin,
        ]
    }
}

impl std::fmt::Display for NavLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for NavLocation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "overview" => Ok(NavLocation::Overview),
            "jobs" => Ok(NavLocation::Jobs),
            "recipes" => Ok(NavLocation::Recipes),
            "nodes" => Ok(NavLocation::Nodes),
            "feed" => Ok(NavLocation::Feed),
            "load" => Ok(NavLocation::Load),
            "queue" => Ok(NavLocation::Queue),
            "metrics" => Ok(NavLocation::Metrics),
            "about" => Ok(NavLocation::About),
            "admin" => Ok(NavLocation::Admin),
            other => Err(format!("unknown section: {}", other)),
        }
    }
}
