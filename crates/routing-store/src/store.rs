//! Snapshot-consistent rule store.
//!
//! Readers take an `Arc` snapshot and evaluate against it; writers clone
//! the current snapshot, mutate the copy under a writer lock, and publish
//! it atomically. An evaluation never observes a half-applied edit.

use arc_swap::ArcSwap;
use parking_lot::Mutex;
use routing_core::{ConfigId, EngineError, EngineResult, RuleId, WorkspaceId};
use routing_failover::{ConfigUpdate, FailoverConfig};
use routing_rules::{RoutingRule, RuleUpdate};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

/// Immutable point-in-time view of all rules and configs
#[derive(Debug, Clone, Default)]
pub struct StoreSnapshot {
    rules: HashMap<WorkspaceId, Vec<RoutingRule>>,
    configs: HashMap<WorkspaceId, Vec<FailoverConfig>>,
}

impl StoreSnapshot {
    /// Routing rules of a workspace, in creation order
    #[must_use]
    pub fn rules_for(&self, workspace: &WorkspaceId) -> &[RoutingRule] {
        self.rules.get(workspace).map_or(&[], Vec::as_slice)
    }

    /// Failover configs of a workspace, in creation order
    #[must_use]
    pub fn configs_for(&self, workspace: &WorkspaceId) -> &[FailoverConfig] {
        self.configs.get(workspace).map_or(&[], Vec::as_slice)
    }

    /// Look up a rule by id
    #[must_use]
    pub fn rule(&self, workspace: &WorkspaceId, id: &RuleId) -> Option<&RoutingRule> {
        self.rules_for(workspace).iter().find(|rule| rule.id == *id)
    }

    /// Look up a failover config by id
    #[must_use]
    pub fn config(&self, workspace: &WorkspaceId, id: &ConfigId) -> Option<&FailoverConfig> {
        self.configs_for(workspace)
            .iter()
            .find(|config| config.id == *id)
    }

    /// Total rule count across workspaces
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.rules.values().map(Vec::len).sum()
    }

    /// Total config count across workspaces
    #[must_use]
    pub fn config_count(&self) -> usize {
        self.configs.values().map(Vec::len).sum()
    }
}

/// Per-workspace CRUD store for routing rules and failover configs
pub struct RuleStore {
    snapshot: ArcSwap<StoreSnapshot>,
    write_lock: Mutex<()>,
}

impl Default for RuleStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self {
            snapshot: ArcSwap::from_pointee(StoreSnapshot::default()),
            write_lock: Mutex::new(()),
        }
    }

    /// Current snapshot; stays consistent for as long as the `Arc` is held
    #[must_use]
    pub fn snapshot(&self) -> Arc<StoreSnapshot> {
        self.snapshot.load_full()
    }

    /// Serialize writers, clone-mutate-publish the snapshot
    fn mutate<T>(
        &self,
        f: impl FnOnce(&mut StoreSnapshot) -> EngineResult<T>,
    ) -> EngineResult<T> {
        let _guard = self.write_lock.lock();
        let mut next = StoreSnapshot::clone(&self.snapshot.load());
        let out = f(&mut next)?;
        self.snapshot.store(Arc::new(next));
        Ok(out)
    }

    /// Create a routing rule
    ///
    /// Generates an id when the rule carries an empty one. Malformed
    /// conditions are rejected here, not at evaluation time.
    ///
    /// # Errors
    /// Returns a validation error for invalid or duplicate rules
    pub fn create_rule(
        &self,
        workspace: &WorkspaceId,
        mut rule: RoutingRule,
    ) -> EngineResult<RoutingRule> {
        if rule.id.is_empty() {
            rule.id = RuleId::generate();
        }
        rule.validate()?;

        self.mutate(|snapshot| {
            let rules = snapshot.rules.entry(workspace.clone()).or_default();
            if rules.iter().any(|existing| existing.id == rule.id) {
                return Err(EngineError::validation(
                    format!("rule {} already exists", rule.id),
                    Some("id".to_string()),
                    "duplicate_rule_id",
                ));
            }
            rules.push(rule.clone());
            info!(workspace = %workspace, rule_id = %rule.id, "Routing rule created");
            Ok(rule)
        })
    }

    /// Fetch a rule
    ///
    /// # Errors
    /// Returns not-found if the rule does not exist
    pub fn get_rule(&self, workspace: &WorkspaceId, id: &RuleId) -> EngineResult<RoutingRule> {
        self.snapshot()
            .rule(workspace, id)
            .cloned()
            .ok_or_else(|| EngineError::not_found("rule", id.as_str()))
    }

    /// Apply a partial update to a rule
    ///
    /// # Errors
    /// Returns not-found for unknown rules, or a validation error when the
    /// update produces an invalid rule
    pub fn update_rule(
        &self,
        workspace: &WorkspaceId,
        id: &RuleId,
        update: RuleUpdate,
    ) -> EngineResult<RoutingRule> {
        self.mutate(|snapshot| {
            let rules = snapshot
                .rules
                .get_mut(workspace)
                .ok_or_else(|| EngineError::not_found("rule", id.as_str()))?;
            let slot = rules
                .iter_mut()
                .find(|rule| rule.id == *id)
                .ok_or_else(|| EngineError::not_found("rule", id.as_str()))?;

            let updated = update.apply(slot.clone());
            updated.validate()?;
            *slot = updated.clone();
            info!(workspace = %workspace, rule_id = %id, "Routing rule updated");
            Ok(updated)
        })
    }

    /// Delete a rule
    ///
    /// # Errors
    /// Returns not-found if the rule does not exist
    pub fn delete_rule(&self, workspace: &WorkspaceId, id: &RuleId) -> EngineResult<()> {
        self.mutate(|snapshot| {
            let rules = snapshot
                .rules
                .get_mut(workspace)
                .ok_or_else(|| EngineError::not_found("rule", id.as_str()))?;
            let before = rules.len();
            rules.retain(|rule| rule.id != *id);
            if rules.len() == before {
                return Err(EngineError::not_found("rule", id.as_str()));
            }
            info!(workspace = %workspace, rule_id = %id, "Routing rule deleted");
            Ok(())
        })
    }

    /// Create a failover config
    ///
    /// The workspace from the path wins over whatever the payload carries;
    /// an empty id is generated.
    ///
    /// # Errors
    /// Returns a validation error for invalid or duplicate configs
    pub fn create_config(
        &self,
        workspace: &WorkspaceId,
        mut config: FailoverConfig,
    ) -> EngineResult<FailoverConfig> {
        if config.id.is_empty() {
            config.id = ConfigId::generate();
        }
        config.workspace_id = workspace.clone();
        config.validate()?;

        self.mutate(|snapshot| {
            let configs = snapshot.configs.entry(workspace.clone()).or_default();
            if configs.iter().any(|existing| existing.id == config.id) {
                return Err(EngineError::validation(
                    format!("failover config {} already exists", config.id),
                    Some("id".to_string()),
                    "duplicate_config_id",
                ));
            }
            configs.push(config.clone());
            info!(workspace = %workspace, config_id = %config.id, "Failover config created");
            Ok(config)
        })
    }

    /// Fetch a failover config
    ///
    /// # Errors
    /// Returns not-found if the config does not exist
    pub fn get_config(
        &self,
        workspace: &WorkspaceId,
        id: &ConfigId,
    ) -> EngineResult<FailoverConfig> {
        self.snapshot()
            .config(workspace, id)
            .cloned()
            .ok_or_else(|| EngineError::not_found("failover config", id.as_str()))
    }

    /// Apply a partial update to a failover config
    ///
    /// # Errors
    /// Returns not-found for unknown configs, or a validation error when
    /// the update produces an invalid config
    pub fn update_config(
        &self,
        workspace: &WorkspaceId,
        id: &ConfigId,
        update: ConfigUpdate,
    ) -> EngineResult<FailoverConfig> {
        self.mutate(|snapshot| {
            let configs = snapshot
                .configs
                .get_mut(workspace)
                .ok_or_else(|| EngineError::not_found("failover config", id.as_str()))?;
            let slot = configs
                .iter_mut()
                .find(|config| config.id == *id)
                .ok_or_else(|| EngineError::not_found("failover config", id.as_str()))?;

            let updated = update.apply(slot.clone());
            updated.validate()?;
            *slot = updated.clone();
            info!(workspace = %workspace, config_id = %id, "Failover config updated");
            Ok(updated)
        })
    }

    /// Delete a failover config
    ///
    /// # Errors
    /// Returns not-found if the config does not exist
    pub fn delete_config(&self, workspace: &WorkspaceId, id: &ConfigId) -> EngineResult<()> {
        self.mutate(|snapshot| {
            let configs = snapshot
                .configs
                .get_mut(workspace)
                .ok_or_else(|| EngineError::not_found("failover config", id.as_str()))?;
            let before = configs.len();
            configs.retain(|config| config.id != *id);
            if configs.len() == before {
                return Err(EngineError::not_found("failover config", id.as_str()));
            }
            info!(workspace = %workspace, config_id = %id, "Failover config deleted");
            Ok(())
        })
    }
}
