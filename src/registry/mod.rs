pub mod selector;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

// ─── Core types ───────────────────────────────────────────────────────────────

/// Risk classification for a maintenance operation.
/// Drives confirmation wording and `--only-risk` filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    /// Routine housekeeping — safe to run unattended
    Low,
    /// Rebuilds indexes or system state — review recommended
    Medium,
    /// Can break connectivity or require a reboot
    High,
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "LOW"),
            RiskLevel::Medium => write!(f, "MEDIUM"),
            RiskLevel::High => write!(f, "HIGH"),
        }
    }
}

/// Functional grouping for an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Caches,
    Databases,
    Indexing,
    Network,
    System,
    Storage,
    Memory,
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Category::Caches => write!(f, "Caches"),
            Category::Databases => write!(f, "Databases"),
            Category::Indexing => write!(f, "Indexing"),
            Category::Network => write!(f, "Network"),
            Category::System => write!(f, "System"),
            Category::Storage => write!(f, "Storage"),
            Category::Memory => write!(f, "Memory"),
        }
    }
}

/// Immutable, process-lifetime description of one maintenance operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OperationDescriptor {
    pub id: &'static str,
    pub description: &'static str,
    pub risk: RiskLevel,
    pub category: Category,
}

// ─── Catalogue ────────────────────────────────────────────────────────────────

/// The full operation catalogue in declaration order.
///
/// Declaration order encodes execution dependency: the network-dependent
/// update check runs first, and `network-reset` — which severs
/// connectivity — runs last. Filters never reorder this sequence.
static CATALOGUE: [OperationDescriptor; 13] = [
    OperationDescriptor {
        id: "software-update-check",
        description: "Check Apple Software Update for pending updates",
        risk: RiskLevel::Low,
        category: Category::System,
    },
    OperationDescriptor {
        id: "user-cache-clean",
        description: "Remove per-user application caches (~/Library/Caches)",
        risk: RiskLevel::Low,
        category: Category::Caches,
    },
    OperationDescriptor {
        id: "system-cache-clean",
        description: "Remove system-wide application caches (/Library/Caches)",
        risk: RiskLevel::Medium,
        category: Category::Caches,
    },
    OperationDescriptor {
        id: "log-clean",
        description: "Remove old diagnostic logs and crash reports",
        risk: RiskLevel::Medium,
        category: Category::Storage,
    },
    OperationDescriptor {
        id: "trash-empty",
        description: "Empty the user Trash",
        risk: RiskLevel::Low,
        category: Category::Storage,
    },
    OperationDescriptor {
        id: "sqlite-vacuum",
        description: "VACUUM application SQLite databases (Mail, Safari)",
        risk: RiskLevel::Medium,
        category: Category::Databases,
    },
    OperationDescriptor {
        id: "spotlight-rebuild",
        description: "Erase and rebuild the Spotlight index",
        risk: RiskLevel::Medium,
        category: Category::Indexing,
    },
    OperationDescriptor {
        id: "launch-services-rebuild",
        description: "Reset the LaunchServices database ('Open With' menu)",
        risk: RiskLevel::Medium,
        category: Category::Indexing,
    },
    OperationDescriptor {
        id: "dns-flush",
        description: "Flush the DNS cache and restart mDNSResponder",
        risk: RiskLevel::Low,
        category: Category::Network,
    },
    OperationDescriptor {
        id: "maintenance-scripts",
        description: "Run the periodic daily/weekly/monthly scripts",
        risk: RiskLevel::Low,
        category: Category::System,
    },
    OperationDescriptor {
        id: "memory-purge",
        description: "Purge the disk cache from memory",
        risk: RiskLevel::Low,
        category: Category::Memory,
    },
    OperationDescriptor {
        id: "kext-cache-rebuild",
        description: "Rebuild kernel extension caches",
        risk: RiskLevel::High,
        category: Category::System,
    },
    OperationDescriptor {
        id: "network-reset",
        description: "Flush routes and renew DHCP leases (drops connectivity)",
        risk: RiskLevel::High,
        category: Category::Network,
    },
];

// ─── Registry ─────────────────────────────────────────────────────────────────

/// The operation registry: the declaration-order catalogue plus an
/// id → descriptor map for O(1) lookup.
pub struct Registry {
    index: HashMap<&'static str, &'static OperationDescriptor>,
}

impl Registry {
    pub fn new() -> Self {
        let index = CATALOGUE.iter().map(|d| (d.id, d)).collect();
        Self { index }
    }

    /// All descriptors in fixed declaration order
    pub fn list(&self) -> &'static [OperationDescriptor] {
        &CATALOGUE
    }

    /// Look up a descriptor by id
    pub fn get(&self, id: &str) -> Option<&'static OperationDescriptor> {
        self.index.get(id).copied()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_unique() {
        let registry = Registry::new();
        assert_eq!(registry.index.len(), CATALOGUE.len());
    }

    #[test]
    fn test_lookup_matches_list() {
        let registry = Registry::new();
        for desc in registry.list() {
            assert_eq!(registry.get(desc.id).map(|d| d.id), Some(desc.id));
        }
    }

    #[test]
    fn test_unknown_id() {
        let registry = Registry::new();
        assert!(registry.get("does-not-exist").is_none());
    }

    #[test]
    fn test_network_reset_is_last() {
        // network-reset severs connectivity; nothing may run after it
        assert_eq!(CATALOGUE.last().map(|d| d.id), Some("network-reset"));
    }

    #[test]
    fn test_update_check_is_first() {
        assert_eq!(CATALOGUE.first().map(|d| d.id), Some("software-update-check"));
    }
}
