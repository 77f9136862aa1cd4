pub mod diagnostics;
pub mod vulkan;
pub mod window;

pub use diagnostics::{Channel, Diagnostics, DiagnosticsSink, Severity};
pub use vulkan::BootstrapError;
pub use window::WindowManager;

/// Whether validation layers and the debug messenger are compiled in. This is
/// the only configuration knob the bootstrap has.
#[cfg(feature = "enable_validations")]
pub const ENABLE_VALIDATIONS: bool = true;
#[cfg(not(feature = "enable_validations"))]
pub const ENABLE_VALIDATIONS: bool = false;
