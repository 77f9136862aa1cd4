use std::ffi::NulError;

use ash::vk;
use thiserror::Error;

/// Everything that can go wrong while bringing up the instance, picking a
/// device, and creating the logical device. All variants are unrecoverable at
/// the point of detection; the caller's only job is to report and bail.
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// Validation was requested but the runtime does not expose the
    /// requested layers.
    #[error("validation layers requested, but not available")]
    MissingValidationLayers,

    /// An extension or layer name contained an interior NUL byte and cannot
    /// cross the FFI boundary.
    #[error("invalid extension or layer name: {0}")]
    InvalidName(#[from] NulError),

    /// A Vulkan call reported non-success.
    #[error("{call} failed: {result}")]
    Platform {
        call: &'static str,
        result: vk::Result,
    },

    #[error("failed to find a GPU with Vulkan support")]
    NoGpu,

    #[error("failed to find a suitable GPU")]
    NoSuitableGpu,

    /// The chosen physical device no longer reports a graphics queue family.
    /// The selector guarantees this cannot happen; if it does, something is
    /// inconsistent and we refuse to continue.
    #[error("selected physical device has no graphics queue family")]
    MissingGraphicsQueue,
}

impl BootstrapError {
    /// Adapter for `map_err` on raw Vulkan results.
    pub(crate) fn platform(call: &'static str) -> impl FnOnce(vk::Result) -> Self {
        move |result| Self::Platform { call, result }
    }
}
