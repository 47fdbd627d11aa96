//! Which modules a run includes.

use crate::modules::{Module, ModuleRegistry};
use std::collections::BTreeSet;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectionError {
    #[error("unknown module '{name}' (available: {available})")]
    UnknownModule { name: String, available: String },

    #[error("no modules selected")]
    Empty,
}

/// Module selection from `--basic`, `--full` or `--modules`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ModuleSelection {
    /// The small fixed subset.
    Basic,
    /// Every module.
    #[default]
    Full,
    /// Named modules.
    Explicit(Vec<String>),
}

impl ModuleSelection {
    /// Parse a comma-separated `--modules` value.
    pub fn from_list(list: &str) -> Self {
        ModuleSelection::Explicit(list.split(',').map(|s| s.trim().to_string()).collect())
    }

    /// Modules to run, in canonical report order, each at most once.
    pub fn resolve<'r>(
        &self,
        registry: &'r ModuleRegistry,
    ) -> Result<Vec<&'r Module>, SelectionError> {
        let modules: Vec<&Module> = match self {
            ModuleSelection::Basic => registry.basic().collect(),
            ModuleSelection::Full => registry.iter().collect(),
            ModuleSelection::Explicit(names) => {
                let mut wanted = BTreeSet::new();
                for name in names.iter().map(|n| n.trim()).filter(|n| !n.is_empty()) {
                    let module =
                        registry
                            .get(name)
                            .ok_or_else(|| SelectionError::UnknownModule {
                                name: name.to_string(),
                                available: registry.ids().join(", "),
                            })?;
                    wanted.insert(module.id);
                }
                registry
                    .iter()
                    .filter(|m| wanted.contains(m.id))
                    .collect()
            }
        };

        if modules.is_empty() {
            return Err(SelectionError::Empty);
        }
        Ok(modules)
    }
}
