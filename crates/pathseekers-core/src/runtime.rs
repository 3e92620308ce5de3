//! Handle to an instantiated module.

use thiserror::Error;

/// Failure reported by the module when a control call is forwarded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ControlError {
    /// The instance does not expose the requested entry point.
    #[error("module does not expose `{0}`")]
    Unsupported(String),
    /// The entry point threw.
    #[error("module control call failed: {0}")]
    Rejected(String),
}

/// Opaque handle produced when instantiation succeeds.
///
/// The launcher never tears the module down; dropping the handle only
/// releases the launcher's reference.
pub trait RuntimeHandle {
    /// Ask the module to enter (`true`) or leave (`false`) fullscreen.
    fn set_fullscreen(&self, enabled: bool) -> Result<(), ControlError>;
}

impl<H: RuntimeHandle + ?Sized> RuntimeHandle for Box<H> {
    fn set_fullscreen(&self, enabled: bool) -> Result<(), ControlError> {
        (**self).set_fullscreen(enabled)
    }
}

impl<H: RuntimeHandle + ?Sized> RuntimeHandle for std::rc::Rc<H> {
    fn set_fullscreen(&self, enabled: bool) -> Result<(), ControlError> {
        (**self).set_fullscreen(enabled)
    }
}
