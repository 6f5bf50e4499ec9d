//! Extension registry and event dispatch
//!
//! The host keeps one slot per registered extension type, in registration
//! order. Each slot holds the extension instance, its current context, the
//! events it does not implement and how many dispatches were skipped because
//! of that.

use crate::args::DispatchArgs;
use crate::extension::{Extension, FromLayout, HookCall, HookError, HookScope};
use std::any::{type_name, TypeId};
use std::collections::{BTreeSet, HashMap};
use tracing::debug;
use xtool_core::{Context, DeployLayout, Error, EventKind, Result, Settings};

/// Stable reference to a registered extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExtensionHandle(usize);

impl ExtensionHandle {
    /// Position in registration order
    pub fn index(&self) -> usize {
        self.0
    }
}

struct ExtensionSlot {
    type_id: TypeId,
    name: String,
    extension: Box<dyn Extension>,
    context: Context,
    not_implemented: BTreeSet<EventKind>,
    skips: HashMap<EventKind, usize>,
}

/// Registered extensions of one package manager
#[derive(Default)]
pub struct ExtensionHost {
    slots: Vec<ExtensionSlot>,
}

impl ExtensionHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register extension type `E`, constructing it against `layout` and
    /// `settings`
    ///
    /// Registering a type again keeps the existing instance and resets its
    /// context to an empty one.
    pub fn register<E>(
        &mut self,
        layout: &DeployLayout,
        settings: &Settings,
    ) -> Result<ExtensionHandle>
    where
        E: Extension + FromLayout + 'static,
    {
        let type_id = TypeId::of::<E>();
        if let Some(index) = self.slots.iter().position(|slot| slot.type_id == type_id) {
            debug!("Extension {} already registered, resetting context", self.slots[index].name);
            self.slots[index].context = Context::new();
            return Ok(ExtensionHandle(index));
        }

        let extension = E::from_layout(layout, settings)
            .map_err(|e| Error::invalid_extension(type_name::<E>(), format!("{:#}", e)))?;
        let name = extension.name().trim().to_string();
        if name.is_empty() {
            return Err(Error::invalid_extension(
                type_name::<E>(),
                "extension name is empty",
            ));
        }

        debug!("Registered extension {}", name);
        self.slots.push(ExtensionSlot {
            type_id,
            name,
            extension: Box::new(extension),
            context: Context::new(),
            not_implemented: BTreeSet::new(),
            skips: HashMap::new(),
        });
        Ok(ExtensionHandle(self.slots.len() - 1))
    }

    /// Offer an event to every extension in registration order
    ///
    /// Each invoked extension gets a fresh context seeded from `args`.
    /// Shared arguments pick up whatever the extension left in its context.
    /// The first hook failure aborts the dispatch.
    pub fn dispatch(
        &mut self,
        call: HookCall<'_>,
        args: &mut DispatchArgs,
        global: &mut Context,
        layout: &DeployLayout,
    ) -> Result<()> {
        let event = call.event();
        debug!("Dispatching {} to {} extension(s)", event, self.slots.len());

        for slot in &mut self.slots {
            if slot.not_implemented.contains(&event) {
                *slot.skips.entry(event).or_insert(0) += 1;
                continue;
            }

            let seed = args.seed();
            let fresh = match slot.extension.context_schema(event) {
                Some(schema) => schema.build(seed).map_err(|e| {
                    Error::invalid_context_type(&slot.name, event.as_str(), e.to_string())
                })?,
                None => Context::from_attributes(seed),
            };
            let previous = std::mem::replace(&mut slot.context, fresh);

            let outcome = {
                let mut scope = HookScope::new(event, &mut slot.context, &mut *global, layout);
                call.invoke(slot.extension.as_mut(), &mut scope)
            };

            match outcome {
                Ok(()) => args.absorb(&slot.context),
                Err(HookError::NotImplemented) => {
                    debug!("{} does not handle {}", slot.name, event);
                    slot.context = previous;
                    slot.not_implemented.insert(event);
                }
                Err(HookError::Failed(source)) => {
                    return Err(Error::hook_failed(&slot.name, event.as_str(), source));
                }
            }
        }

        Ok(())
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Handle of a registered extension type
    pub fn find<E: 'static>(&self) -> Option<ExtensionHandle> {
        let type_id = TypeId::of::<E>();
        self.slots
            .iter()
            .position(|slot| slot.type_id == type_id)
            .map(ExtensionHandle)
    }

    pub fn names(&self) -> Vec<&str> {
        self.slots.iter().map(|slot| slot.name.as_str()).collect()
    }

    /// Current context of an extension
    pub fn context(&self, handle: ExtensionHandle) -> Option<&Context> {
        self.slots.get(handle.0).map(|slot| &slot.context)
    }

    /// Replace the context of an extension, returning the previous one
    pub fn replace_context(&mut self, handle: ExtensionHandle, context: Context) -> Option<Context> {
        self.slots
            .get_mut(handle.0)
            .map(|slot| std::mem::replace(&mut slot.context, context))
    }

    /// Dispatches of `event` skipped for this extension
    pub fn skip_count(&self, handle: ExtensionHandle, event: EventKind) -> usize {
        self.slots
            .get(handle.0)
            .and_then(|slot| slot.skips.get(&event).copied())
            .unwrap_or(0)
    }

    /// Events this extension answered with "not implemented"
    pub fn not_implemented(&self, handle: ExtensionHandle) -> Vec<EventKind> {
        self.slots
            .get(handle.0)
            .map(|slot| slot.not_implemented.iter().copied().collect())
            .unwrap_or_default()
    }
}

impl std::fmt::Debug for ExtensionHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtensionHost")
            .field("extensions", &self.names())
            .finish()
    }
}
