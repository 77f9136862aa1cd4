use std::ffi::CStr;

use ash::Entry;

use super::error::BootstrapError;

const VALIDATION_LAYER_NAME: &str = "VK_LAYER_KHRONOS_validation";

/// The layers the bootstrap wants enabled. Empty unless validations are on.
pub fn requested_validation_layers(validation_enabled: bool) -> Vec<String> {
    if validation_enabled {
        vec![VALIDATION_LAYER_NAME.to_owned()]
    } else {
        vec![]
    }
}

/// True iff every requested layer is exposed by the runtime. Pure query; the
/// caller decides whether a missing layer is fatal.
pub fn layers_available(entry: &Entry, requested: &[String]) -> Result<bool, BootstrapError> {
    let available_layers = entry
        .enumerate_instance_layer_properties()
        .map_err(BootstrapError::platform("vkEnumerateInstanceLayerProperties"))?;
    let available_names = available_layers
        .iter()
        .map(|layer| {
            unsafe { CStr::from_ptr(layer.layer_name.as_ptr()) }
                .to_string_lossy()
                .into_owned()
        })
        .collect::<Vec<_>>();
    Ok(all_requested_present(&available_names, requested))
}

fn all_requested_present(available: &[String], requested: &[String]) -> bool {
    requested
        .iter()
        .all(|requested_name| available.iter().any(|name| name == requested_name))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| (*value).to_owned()).collect()
    }

    #[test]
    fn requested_layers_follow_validation_switch() {
        assert_eq!(
            requested_validation_layers(true),
            ["VK_LAYER_KHRONOS_validation"]
        );
        assert!(requested_validation_layers(false).is_empty());
    }

    #[test]
    fn matching_is_order_independent() {
        let available = names(&["VK_LAYER_LUNARG_monitor", "VK_LAYER_KHRONOS_validation"]);
        let requested = names(&["VK_LAYER_KHRONOS_validation", "VK_LAYER_LUNARG_monitor"]);
        assert!(all_requested_present(&available, &requested));
    }

    #[test]
    fn missing_layer_is_reported() {
        let available = names(&["VK_LAYER_LUNARG_monitor"]);
        let requested = names(&["VK_LAYER_KHRONOS_validation"]);
        assert!(!all_requested_present(&available, &requested));
    }

    #[test]
    fn matching_is_exact() {
        let available = names(&["VK_LAYER_KHRONOS_validation_extra"]);
        let requested = names(&["VK_LAYER_KHRONOS_validation"]);
        assert!(!all_requested_present(&available, &requested));
    }

    #[test]
    fn empty_request_is_always_available() {
        assert!(all_requested_present(&[], &[]));
        let available = names(&["VK_LAYER_KHRONOS_validation"]);
        assert!(all_requested_present(&available, &[]));
    }
}
