//! Named dispatch arguments

use serde::Serialize;
use serde_json::{Map, Value};
use xtool_core::{Context, Result};

/// How an argument travels between extensions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sharing {
    /// Every extension gets its own copy; changes stay in its context
    Snapshot,
    /// Changes an extension leaves in its context are carried forward
    Shared,
}

#[derive(Debug, Clone, PartialEq)]
struct Argument {
    name: String,
    value: Value,
    sharing: Sharing,
}

/// Ordered named arguments seeding each extension context
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DispatchArgs {
    arguments: Vec<Argument>,
}

impl DispatchArgs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a snapshot argument
    pub fn snapshot(self, name: impl Into<String>, value: impl Serialize) -> Result<Self> {
        self.with(name, value, Sharing::Snapshot)
    }

    /// Add a shared argument
    pub fn shared(self, name: impl Into<String>, value: impl Serialize) -> Result<Self> {
        self.with(name, value, Sharing::Shared)
    }

    /// Add an argument, replacing an earlier one with the same name
    pub fn with(
        mut self,
        name: impl Into<String>,
        value: impl Serialize,
        sharing: Sharing,
    ) -> Result<Self> {
        let name = name.into();
        let value = serde_json::to_value(value)?;
        match self.arguments.iter_mut().find(|arg| arg.name == name) {
            Some(existing) => {
                existing.value = value;
                existing.sharing = sharing;
            }
            None => self.arguments.push(Argument {
                name,
                value,
                sharing,
            }),
        }
        Ok(self)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.arguments
            .iter()
            .find(|arg| arg.name == name)
            .map(|arg| &arg.value)
    }

    /// Remove an argument and return its current value
    pub fn take(&mut self, name: &str) -> Option<Value> {
        let idx = self.arguments.iter().position(|arg| arg.name == name)?;
        Some(self.arguments.remove(idx).value)
    }

    pub fn len(&self) -> usize {
        self.arguments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arguments.is_empty()
    }

    /// Independent copies of every argument, ready to seed a context
    pub fn seed(&self) -> Map<String, Value> {
        self.arguments
            .iter()
            .map(|arg| (arg.name.clone(), arg.value.clone()))
            .collect()
    }

    /// Carry shared arguments forward from a context a hook has finished with
    ///
    /// A shared argument the hook removed from its context keeps its value.
    pub fn absorb(&mut self, context: &Context) {
        for arg in self
            .arguments
            .iter_mut()
            .filter(|arg| arg.sharing == Sharing::Shared)
        {
            if let Some(value) = context.get(&arg.name) {
                arg.value = value.clone();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_seed_is_detached() {
        let args = DispatchArgs::new()
            .snapshot("medium", json!({ "files": ["a"] }))
            .unwrap();

        let mut seed = args.seed();
        seed.insert("medium".to_string(), json!({ "files": ["a", "sentinel"] }));
        assert_eq!(args.get("medium"), Some(&json!({ "files": ["a"] })));
    }

    #[test]
    fn test_absorb_only_touches_shared() {
        let mut args = DispatchArgs::new()
            .shared("config", json!({}))
            .unwrap()
            .snapshot("entry", json!({ "pkgname": "trid" }))
            .unwrap();

        let mut ctx = Context::from_attributes(args.seed());
        ctx.set("config", json!({ "shortcuts": { "trid": "trid.exe" } }))
            .unwrap();
        ctx.set("entry", json!({ "pkgname": "changed" })).unwrap();
        args.absorb(&ctx);

        assert_eq!(
            args.get("config"),
            Some(&json!({ "shortcuts": { "trid": "trid.exe" } }))
        );
        assert_eq!(args.get("entry"), Some(&json!({ "pkgname": "trid" })));
    }

    #[test]
    fn test_absorb_keeps_removed_shared_value() {
        let mut args = DispatchArgs::new().shared("config", json!({ "a": 1 })).unwrap();
        args.absorb(&Context::new());
        assert_eq!(args.get("config"), Some(&json!({ "a": 1 })));
    }

    #[test]
    fn test_with_replaces_and_take_removes() {
        let mut args = DispatchArgs::new()
            .snapshot("config", 1)
            .unwrap()
            .shared("config", 2)
            .unwrap();
        assert_eq!(args.len(), 1);

        // The replacement is shared, so it picks up the context value
        let mut ctx = Context::new();
        ctx.set("config", 3).unwrap();
        args.absorb(&ctx);
        assert_eq!(args.take("config"), Some(json!(3)));
        assert!(args.is_empty());
    }
}
