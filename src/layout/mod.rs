//! The constraint builder
//!
//! [`Layout`] is the context object every declaration goes through. It owns
//! the host and the [`ScopeStack`], and funnels every constraint it creates
//! through [`Layout::install`], which is what makes nested recording,
//! priority and identifier scopes work for arbitrarily deep call chains.

pub mod array;
pub mod batch;
pub mod config;
pub mod factory;
pub mod scope;
pub mod update;

pub use array::ConstraintSliceExt;
pub use config::{ConfigError, LayoutConfig};
pub use scope::{ConstraintGroup, RecordingScope, ScopeGuard, ScopeStack};
pub use update::UpdateOutcome;

use crate::attribute::AttributeMap;
use crate::host::LayoutHost;

/// Declares constraints against a host
///
/// Holds `Rc`-shared constraints, so it is confined to the thread that
/// created it.
#[derive(Debug)]
pub struct Layout<H: LayoutHost> {
    host: H,
    scope: ScopeStack,
    attributes: AttributeMap,
    config: LayoutConfig,
}

impl<H: LayoutHost> Layout<H> {
    pub fn new(host: H, config: LayoutConfig) -> Self {
        Self {
            host,
            scope: ScopeStack::new(),
            attributes: AttributeMap::new(config.platform),
            config,
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn into_host(self) -> H {
        self.host
    }

    pub fn scope(&self) -> &ScopeStack {
        &self.scope
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn attributes(&self) -> AttributeMap {
        self.attributes
    }
}
