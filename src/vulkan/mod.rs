mod debug_utils_extension;
mod error;
mod extensions_registry;
mod instance_guard;
mod layers_registry;
mod logical_device_guard;
mod physical_device;
mod queue_families;

pub use debug_utils_extension::DebugUtilsExtension;
pub use error::BootstrapError;
pub use extensions_registry::required_instance_extensions;
pub use instance_guard::{InstanceConfig, InstanceGuard};
pub use layers_registry::{layers_available, requested_validation_layers};
pub use logical_device_guard::LogicalDeviceGuard;
pub use physical_device::pick_physical_device;
pub use queue_families::{find_queue_families, QueueFamilyIndices};
