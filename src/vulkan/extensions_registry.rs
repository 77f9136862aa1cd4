use ash::extensions::ext::DebugUtils;

use crate::diagnostics::Diagnostics;

/// Instance extensions the bootstrap must enable: everything the windowing
/// layer asks for, in its order, plus debug utils when validations are on.
pub fn required_instance_extensions(
    window_required: &[String],
    validation_enabled: bool,
    diagnostics: &Diagnostics,
) -> Vec<String> {
    let mut extension_names = window_required.to_vec();
    if validation_enabled {
        extension_names.push(DebugUtils::name().to_string_lossy().into_owned());
    }
    diagnostics.trace(&format!("instance extension names: {:?}", extension_names));
    extension_names
}
