//! Test extensions

#![allow(dead_code)]

use anyhow::anyhow;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::path::Path;
use xtool_core::{DeployLayout, EventKind, Settings};
use xtool_extensions::{ContextSchema, Extension, FromLayout, HookResult, HookScope};

/// Key in the global context counting calls of `extension` for `event`
pub fn call_key(extension: &str, event: EventKind) -> String {
    format!("{extension}.{event}")
}

fn bump(scope: &mut HookScope<'_>, extension: &str) -> HookResult {
    let key = call_key(extension, scope.event());
    let count = scope.global().get_as::<u64>(&key).unwrap_or(0);
    scope.global_mut().set(key, count + 1)?;
    Ok(())
}

/// Implements no hook at all
pub struct Inert;

impl Extension for Inert {
    fn name(&self) -> &str {
        "inert"
    }
}

impl FromLayout for Inert {
    fn from_layout(_layout: &DeployLayout, _settings: &Settings) -> anyhow::Result<Self> {
        Ok(Inert)
    }
}

/// Counts parse and install calls in the global context
pub struct Recorder;

impl Extension for Recorder {
    fn name(&self) -> &str {
        "recorder"
    }

    fn parse_source(&mut self, scope: &mut HookScope<'_>, _source: &Path) -> HookResult {
        bump(scope, "recorder")
    }

    fn install_package(&mut self, scope: &mut HookScope<'_>, _package: &str) -> HookResult {
        bump(scope, "recorder")
    }
}

impl FromLayout for Recorder {
    fn from_layout(_layout: &DeployLayout, _settings: &Settings) -> anyhow::Result<Self> {
        Ok(Recorder)
    }
}

/// Appends a sentinel to the medium file list it was handed
pub struct Sentinel;

pub const SENTINEL_FILE: &str = "sentinel.bin";

impl Extension for Sentinel {
    fn name(&self) -> &str {
        "sentinel"
    }

    fn parse_source(&mut self, scope: &mut HookScope<'_>, _source: &Path) -> HookResult {
        if let Some(files) = scope
            .context_mut()
            .get_mut("medium")
            .and_then(|medium| medium.get_mut("files"))
            .and_then(Value::as_array_mut)
        {
            files.push(json!(SENTINEL_FILE));
        }
        Ok(())
    }
}

impl FromLayout for Sentinel {
    fn from_layout(_layout: &DeployLayout, _settings: &Settings) -> anyhow::Result<Self> {
        Ok(Sentinel)
    }
}

/// Stamps the shared package config
pub struct Stamper;

impl Extension for Stamper {
    fn name(&self) -> &str {
        "stamper"
    }

    fn parse_source(&mut self, scope: &mut HookScope<'_>, _source: &Path) -> HookResult {
        if let Some(config) = scope
            .context_mut()
            .get_mut("config")
            .and_then(Value::as_object_mut)
        {
            config.insert("stamped".to_string(), json!(true));
        }
        Ok(())
    }
}

impl FromLayout for Stamper {
    fn from_layout(_layout: &DeployLayout, _settings: &Settings) -> anyhow::Result<Self> {
        Ok(Stamper)
    }
}

/// Copies what it sees of the shared config into the global context
pub struct ConfigObserver;

impl Extension for ConfigObserver {
    fn name(&self) -> &str {
        "observer"
    }

    fn parse_source(&mut self, scope: &mut HookScope<'_>, _source: &Path) -> HookResult {
        let seen = scope.context().get("config").cloned().unwrap_or(Value::Null);
        scope.global_mut().set("observer.config", seen)?;
        Ok(())
    }
}

impl FromLayout for ConfigObserver {
    fn from_layout(_layout: &DeployLayout, _settings: &Settings) -> anyhow::Result<Self> {
        Ok(ConfigObserver)
    }
}

/// Fails on install
pub struct Faulty;

impl Extension for Faulty {
    fn name(&self) -> &str {
        "faulty"
    }

    fn install_package(&mut self, _scope: &mut HookScope<'_>, package: &str) -> HookResult {
        Err(anyhow!("cannot handle {}", package).into())
    }
}

impl FromLayout for Faulty {
    fn from_layout(_layout: &DeployLayout, _settings: &Settings) -> anyhow::Result<Self> {
        Ok(Faulty)
    }
}

/// Context shape with defaults `a = 1`, `b = ""`
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct Pair {
    pub a: i64,
    pub b: String,
}

impl Default for Pair {
    fn default() -> Self {
        Self {
            a: 1,
            b: String::new(),
        }
    }
}

/// Declares [`Pair`] as its parse context
pub struct Shaped;

impl Extension for Shaped {
    fn name(&self) -> &str {
        "shaped"
    }

    fn context_schema(&self, event: EventKind) -> Option<ContextSchema> {
        (event == EventKind::ParseSource).then(ContextSchema::of::<Pair>)
    }

    fn parse_source(&mut self, _scope: &mut HookScope<'_>, _source: &Path) -> HookResult {
        Ok(())
    }
}

impl FromLayout for Shaped {
    fn from_layout(_layout: &DeployLayout, _settings: &Settings) -> anyhow::Result<Self> {
        Ok(Shaped)
    }
}

/// Construction always fails
pub struct Unbuildable;

impl Extension for Unbuildable {
    fn name(&self) -> &str {
        "unbuildable"
    }
}

impl FromLayout for Unbuildable {
    fn from_layout(_layout: &DeployLayout, _settings: &Settings) -> anyhow::Result<Self> {
        Err(anyhow!("missing runtime"))
    }
}

/// Has an empty name
pub struct Nameless;

impl Extension for Nameless {
    fn name(&self) -> &str {
        ""
    }
}

impl FromLayout for Nameless {
    fn from_layout(_layout: &DeployLayout, _settings: &Settings) -> anyhow::Result<Self> {
        Ok(Nameless)
    }
}
