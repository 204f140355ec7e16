//! Trix Accessibility Retrofit
//!
//! Layers ARIA semantics, keyboard interaction and focus affordances onto
//! Trix editors and toolbars embedded in an fOS document, without touching
//! the widget itself. The retrofit only reads the widget's DOM markers and
//! writes attributes, listeners and synthesized input events.
//!
//! Features:
//! - Instance watching for editors and toolbars present now or inserted later
//! - Toolbar, button and link-dialog roles, labels and mirrored states
//! - Enter/Space activation replaying the full pointer sequence
//! - Roving tabindex with arrow, Home and End navigation
//! - Shared polite status region for undo/redo announcements

pub mod activation;
pub mod aria;
pub mod config;
pub mod markers;
pub mod registry;
pub mod roving;
pub mod status;
pub mod styles;
mod editor;
mod ids;
mod toolbar;
mod watcher;

use std::cell::RefCell;
use std::rc::Rc;

use fos_dom::{Document, DomError, NodeId};

pub use activation::{ACTIVATION_SEQUENCE, Activate, PointerSequence, activation_point};
pub use aria::AriaRole;
pub use config::{A11yConfig, Messages};
pub use markers::Selectors;
pub use registry::EnhancementRegistry;
pub use roving::{NavKey, navigate, resolve_focusable};
pub use status::{LiveRegion, StatusChannel};
pub use toolbar::{KeyAction, activation_action, disabled_state, pressed_state};

/// Accessibility retrofit error
#[derive(Debug, thiserror::Error)]
pub enum A11yError {
    #[error("DOM error: {0}")]
    Dom(#[from] DomError),

    #[error("No element available to host the status region")]
    NoStatusHost,
}

/// Retrofit state for one document
///
/// Listeners and observers installed on the document hold an `Rc` to this,
/// so it lives as long as the page does.
pub struct Retrofit {
    config: A11yConfig,
    selectors: Selectors,
    registry: RefCell<EnhancementRegistry>,
    activator: Rc<dyn Activate>,
    status: Rc<dyn StatusChannel>,
}

impl Retrofit {
    /// Retrofit with the DOM-backed activation and status channel
    pub fn new(config: A11yConfig) -> Result<Self, A11yError> {
        let status = Rc::new(LiveRegion::from_config(&config));
        Ok(Self {
            selectors: Selectors::trix()?,
            registry: RefCell::new(EnhancementRegistry::new()),
            activator: Rc::new(PointerSequence),
            status,
            config,
        })
    }

    /// Substitute the activation capability
    pub fn with_activator(mut self, activator: Rc<dyn Activate>) -> Self {
        self.activator = activator;
        self
    }

    /// Substitute the status channel
    pub fn with_status_channel(mut self, status: Rc<dyn StatusChannel>) -> Self {
        self.status = status;
        self
    }

    pub fn config(&self) -> &A11yConfig {
        &self.config
    }

    pub fn selectors(&self) -> &Selectors {
        &self.selectors
    }

    pub fn is_toolbar_enhanced(&self, toolbar: NodeId) -> bool {
        self.registry.borrow().toolbar(toolbar).is_some()
    }

    pub fn is_editor_enhanced(&self, editor: NodeId) -> bool {
        self.registry.borrow().editor(editor).is_some()
    }

    pub fn is_button_enhanced(&self, button: NodeId) -> bool {
        self.registry.borrow().has_button(button)
    }

    /// Toolbar an enhanced editor was associated with
    pub fn editor_toolbar(&self, editor: NodeId) -> Option<NodeId> {
        self.registry.borrow().editor(editor)?.toolbar
    }

    pub fn enhanced_toolbar_count(&self) -> usize {
        self.registry.borrow().toolbar_count()
    }

    pub fn enhanced_editor_count(&self) -> usize {
        self.registry.borrow().editor_count()
    }
}

impl std::fmt::Debug for Retrofit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Retrofit")
            .field("config", &self.config)
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}

/// Install the retrofit with `config` on `doc`. Installing twice returns
/// the instance that is already running.
pub fn install(doc: &mut Document, config: A11yConfig) -> Result<Rc<Retrofit>, A11yError> {
    Retrofit::new(config)?.install(doc)
}
