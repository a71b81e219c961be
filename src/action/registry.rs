// SPDX-License-Identifier: MIT

//! Payload type registry
//!
//! Maps a `(namespace, name)` key to a factory that builds a [`NodePayload`].
//! Node creation resolves through here, so node kinds defined by plugins only
//! need to be registered before the first node of that type is created.

use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::graph::{NodeKind, TypeKey};
use super::payload::{Behavior, Condition, NodePayload};
use crate::error::{full_name, ActionError, Result};

/// Builds a payload from JSON parameters (`Value::Null` means defaults).
///
/// The registry is passed in so composite payloads can build inner payloads.
pub type PayloadFactory =
    Arc<dyn Fn(&TypeRegistry, &Value) -> Result<NodePayload> + Send + Sync>;

/// A registered type, as listed by [`TypeRegistry::types`]
#[derive(Debug, Clone, PartialEq)]
pub struct TypeInfo {
    pub key: TypeKey,
    /// Known when registered through the typed helpers
    pub kind: Option<NodeKind>,
}

struct Registration {
    info: TypeInfo,
    factory: PayloadFactory,
}

#[derive(Default)]
struct RegistryInner {
    types: HashMap<String, Registration>,
    /// requested full name -> registered full name, successes only
    resolved: HashMap<String, String>,
}

static GLOBAL: Lazy<TypeRegistry> = Lazy::new(TypeRegistry::new);

#[derive(Clone, Default)]
pub struct TypeRegistry {
    inner: Arc<RwLock<RegistryInner>>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry pre-populated with the built-in node library
    pub fn with_builtins() -> Self {
        let registry = Self::new();
        crate::nodes::register_builtins(&registry);
        registry
    }

    /// Process-wide registry. Starts empty; the host populates it at startup.
    pub fn global() -> &'static TypeRegistry {
        &GLOBAL
    }

    /// Register a raw factory, replacing any previous registration of the key
    pub fn register_type(&self, namespace: &str, name: &str, factory: PayloadFactory) {
        self.insert(TypeKey::new(namespace, name), None, factory);
    }

    /// Register a factory whose payload kind is known up front
    pub fn register_factory(
        &self,
        namespace: &str,
        name: &str,
        kind: NodeKind,
        factory: PayloadFactory,
    ) {
        self.insert(TypeKey::new(namespace, name), Some(kind), factory);
    }

    /// Register a Behavior type built from its `Default` or from parameters
    pub fn register_behavior<T>(&self, namespace: &str, name: &str)
    where
        T: Behavior + Default + DeserializeOwned + 'static,
    {
        let key = TypeKey::new(namespace, name);
        let full = key.full_name();
        let factory: PayloadFactory = Arc::new(move |_: &TypeRegistry, params: &Value| {
            build_from_params::<T>(&full, params).map(NodePayload::behavior)
        });
        self.insert(key, Some(NodeKind::Behavior), factory);
    }

    /// Register a Condition type built from its `Default` or from parameters
    pub fn register_condition<T>(&self, namespace: &str, name: &str)
    where
        T: Condition + Default + DeserializeOwned + 'static,
    {
        let key = TypeKey::new(namespace, name);
        let full = key.full_name();
        let factory: PayloadFactory = Arc::new(move |_: &TypeRegistry, params: &Value| {
            build_from_params::<T>(&full, params).map(NodePayload::condition)
        });
        self.insert(key, Some(NodeKind::Condition), factory);
    }

    fn insert(&self, key: TypeKey, kind: Option<NodeKind>, factory: PayloadFactory) {
        let full = key.full_name();
        let mut inner = self.write();
        // A new registration may change what a short name resolves to
        inner
            .resolved
            .retain(|requested, target| *target != full && short_name(requested) != key.name);
        inner.types.insert(
            full,
            Registration {
                info: TypeInfo { key, kind },
                factory,
            },
        );
    }

    /// Look up a factory
    ///
    /// Tries the exact `namespace.name` first, then the bare name across all
    /// namespaces. Successful lookups are cached; misses are not, so a type
    /// registered later is found on the next call.
    pub fn resolve(&self, namespace: &str, name: &str) -> Result<PayloadFactory> {
        let requested = full_name(namespace, name);

        {
            let inner = self.read();
            if let Some(target) = inner.resolved.get(&requested) {
                if let Some(reg) = inner.types.get(target) {
                    return Ok(reg.factory.clone());
                }
            }
        }

        let mut inner = self.write();
        let found = match inner.types.get(&requested) {
            Some(_) => Some(requested.clone()),
            None => find_by_short_name(&inner.types, name),
        };

        match found {
            Some(target) => {
                log::debug!("Resolved type '{}' to '{}'", requested, target);
                let factory = inner.types[&target].factory.clone();
                inner.resolved.insert(requested, target);
                Ok(factory)
            }
            None => {
                inner.resolved.remove(&requested);
                log::error!("Invalid type: {}", requested);
                Err(ActionError::type_resolution(namespace, name))
            }
        }
    }

    /// Resolve and construct a payload of the requested kind
    pub fn create(
        &self,
        kind: NodeKind,
        namespace: &str,
        name: &str,
        params: &Value,
    ) -> Result<NodePayload> {
        let factory = self.resolve(namespace, name)?;
        let payload = factory(self, params)?;

        if payload.kind() != kind {
            return Err(ActionError::KindMismatch {
                key: full_name(namespace, name),
                expected: kind,
                found: payload.kind(),
            });
        }
        Ok(payload)
    }

    /// Build an inner Behavior for a composite payload
    pub fn create_behavior(
        &self,
        namespace: &str,
        name: &str,
        params: &Value,
    ) -> Result<Box<dyn Behavior>> {
        self.create(NodeKind::Behavior, namespace, name, params)?
            .into_behavior()
            .map_err(|_| ActionError::other(format!("'{}' is not a Behavior", name)))
    }

    pub fn contains(&self, namespace: &str, name: &str) -> bool {
        self.read().types.contains_key(&full_name(namespace, name))
    }

    /// All registered types, sorted by full name
    pub fn types(&self) -> Vec<TypeInfo> {
        let inner = self.read();
        let mut types: Vec<TypeInfo> = inner.types.values().map(|r| r.info.clone()).collect();
        types.sort_by_key(|t| t.key.full_name());
        types
    }

    pub fn len(&self) -> usize {
        self.read().types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every registration and cached resolution
    pub fn reset(&self) {
        let mut inner = self.write();
        inner.types.clear();
        inner.resolved.clear();
    }

    fn read(&self) -> RwLockReadGuard<'_, RegistryInner> {
        self.inner.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, RegistryInner> {
        self.inner.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn build_from_params<T>(key: &str, params: &Value) -> Result<T>
where
    T: Default + DeserializeOwned,
{
    if params.is_null() {
        return Ok(T::default());
    }
    serde_json::from_value(params.clone())
        .map_err(|e| ActionError::invalid_params(key, e.to_string()))
}

fn short_name(full: &str) -> &str {
    full.rsplit('.').next().unwrap_or(full)
}

fn find_by_short_name(types: &HashMap<String, Registration>, name: &str) -> Option<String> {
    if name.is_empty() {
        return None;
    }

    let mut matches: Vec<&String> = types
        .iter()
        .filter(|(_, reg)| reg.info.key.name == name)
        .map(|(full, _)| full)
        .collect();
    matches.sort();

    match matches.len() {
        0 => None,
        1 => Some(matches[0].clone()),
        _ => {
            log::warn!(
                "Multiple types named '{}' found: {:?}, using '{}'",
                name,
                matches,
                matches[0]
            );
            Some(matches[0].clone())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Default, Deserialize)]
    #[serde(default)]
    struct Countdown {
        ticks: u32,
    }

    impl Behavior for Countdown {
        fn update(&mut self, _delta_time: f32) -> bool {
            self.ticks = self.ticks.saturating_sub(1);
            self.ticks == 0
        }
    }

    #[derive(Default, Deserialize)]
    struct Always;

    impl Condition for Always {
        fn evaluate(&mut self, _delta_time: f32) -> bool {
            true
        }
    }

    #[test]
    fn test_resolve_unregistered_type() {
        let registry = TypeRegistry::new();
        let err = registry.resolve("game", "Jump").err().unwrap();
        assert!(matches!(err, ActionError::TypeResolution { .. }));
    }

    #[test]
    fn test_miss_is_not_cached() {
        let registry = TypeRegistry::new();
        assert!(registry.resolve("game", "Countdown").is_err());

        registry.register_behavior::<Countdown>("game", "Countdown");
        assert!(registry.resolve("game", "Countdown").is_ok());
    }

    #[test]
    fn test_hit_is_cached() {
        let registry = TypeRegistry::new();
        registry.register_behavior::<Countdown>("game", "Countdown");

        assert!(registry.resolve("game", "Countdown").is_ok());
        assert_eq!(
            registry.read().resolved.get("game.Countdown"),
            Some(&"game.Countdown".to_string())
        );
    }

    #[test]
    fn test_resolve_by_short_name() {
        let registry = TypeRegistry::new();
        registry.register_behavior::<Countdown>("game", "Countdown");

        assert!(registry.resolve("", "Countdown").is_ok());
        assert!(registry.resolve("other", "Countdown").is_ok());
    }

    #[test]
    fn test_ambiguous_short_name_picks_first_sorted() {
        let registry = TypeRegistry::new();
        registry.register_behavior::<Countdown>("b", "Thing");
        registry.register_condition::<Always>("a", "Thing");

        let payload = registry
            .create(NodeKind::Condition, "", "Thing", &Value::Null)
            .unwrap();
        assert_eq!(payload.kind(), NodeKind::Condition);
    }

    #[test]
    fn test_reregistration_invalidates_short_name_cache() {
        let registry = TypeRegistry::new();
        registry.register_behavior::<Countdown>("game", "Thing");
        assert!(registry.create(NodeKind::Behavior, "", "Thing", &Value::Null).is_ok());

        registry.register_condition::<Always>("", "Thing");
        let payload = registry
            .create(NodeKind::Condition, "", "Thing", &Value::Null)
            .unwrap();
        assert_eq!(payload.kind(), NodeKind::Condition);
    }

    #[test]
    fn test_create_kind_mismatch() {
        let registry = TypeRegistry::new();
        registry.register_condition::<Always>("game", "Always");

        let err = registry
            .create(NodeKind::Behavior, "game", "Always", &Value::Null)
            .err()
            .unwrap();
        assert!(matches!(
            err,
            ActionError::KindMismatch {
                expected: NodeKind::Behavior,
                found: NodeKind::Condition,
                ..
            }
        ));
    }

    #[test]
    fn test_create_with_params() {
        let registry = TypeRegistry::new();
        registry.register_behavior::<Countdown>("game", "Countdown");

        let mut payload = registry
            .create(NodeKind::Behavior, "game", "Countdown", &json!({"ticks": 2}))
            .unwrap();
        let behavior = payload.as_behavior_mut().unwrap();
        assert!(!behavior.update(0.1));
        assert!(behavior.update(0.1));
    }

    #[test]
    fn test_create_with_invalid_params() {
        let registry = TypeRegistry::new();
        registry.register_behavior::<Countdown>("game", "Countdown");

        let err = registry
            .create(NodeKind::Behavior, "game", "Countdown", &json!({"ticks": "many"}))
            .err()
            .unwrap();
        assert!(matches!(err, ActionError::InvalidParams { .. }));
    }

    #[test]
    fn test_raw_factory() {
        let registry = TypeRegistry::new();
        registry.register_type(
            "game",
            "Always",
            Arc::new(|_: &TypeRegistry, _: &Value| Ok(NodePayload::condition(Always))),
        );

        assert!(registry.contains("game", "Always"));
        assert_eq!(registry.types()[0].kind, None);
        assert!(registry
            .create(NodeKind::Condition, "game", "Always", &Value::Null)
            .is_ok());
    }

    #[test]
    fn test_registry_is_clone() {
        let registry = TypeRegistry::new();
        let cloned = registry.clone();

        cloned.register_behavior::<Countdown>("game", "Countdown");
        assert!(registry.contains("game", "Countdown"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_reset_clears_everything() {
        let registry = TypeRegistry::new();
        registry.register_behavior::<Countdown>("game", "Countdown");
        assert!(registry.resolve("game", "Countdown").is_ok());

        registry.reset();
        assert!(registry.is_empty());
        assert!(registry.resolve("game", "Countdown").is_err());
    }

    #[test]
    fn test_with_builtins() {
        let registry = TypeRegistry::with_builtins();
        assert!(registry.contains("actionflow", "Wait"));
        assert!(registry.contains("actionflow", "AlwaysTrue"));
        assert!(registry.contains("actionflow", "EndCondition"));
    }
}
