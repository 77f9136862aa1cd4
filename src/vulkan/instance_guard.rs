use std::{ffi::CString, ops::Deref, sync::Arc};

use ash::{
    vk::{make_api_version, ApplicationInfo, InstanceCreateInfo, API_VERSION_1_2},
    Entry, Instance,
};

use crate::diagnostics::Diagnostics;

use super::{
    debug_utils_extension::{messenger_create_info, MessengerRouter},
    error::BootstrapError,
    layers_registry,
};

const API_VERSION: u32 = API_VERSION_1_2;

/// Everything instance creation consumes: identity strings, the negotiated
/// extension and layer sets, and the validation switch. Built once, consumed
/// exactly once by [`InstanceGuard::try_new`].
pub struct InstanceConfig {
    pub api_version: u32,
    pub application_name: CString,
    pub application_version: u32,
    pub engine_name: CString,
    pub engine_version: u32,
    pub extensions: Vec<String>,
    pub layers: Vec<String>,
    pub validation_enabled: bool,
}

impl InstanceConfig {
    /// Config with identity taken from the Cargo package metadata.
    pub fn from_cargo_env(
        extensions: Vec<String>,
        layers: Vec<String>,
        validation_enabled: bool,
    ) -> Self {
        let name = CString::new(env!("CARGO_PKG_NAME")).unwrap();
        let version_major = env!("CARGO_PKG_VERSION_MAJOR").parse::<u32>().unwrap();
        let version_minor = env!("CARGO_PKG_VERSION_MINOR").parse::<u32>().unwrap();
        let version_patch = env!("CARGO_PKG_VERSION_PATCH").parse::<u32>().unwrap();
        let version = make_api_version(0, version_major, version_minor, version_patch);

        Self {
            api_version: API_VERSION,
            application_name: name.clone(),
            application_version: version,
            engine_name: name,
            engine_version: version,
            extensions,
            layers,
            validation_enabled,
        }
    }
}

/// Owns the `ash::Instance` and destroys it on drop. Every guard created from
/// the instance holds an `Rc` to this one, so the instance cannot be
/// destroyed while anything derived from it is still alive.
pub struct InstanceGuard {
    instance: Instance,
    // keeps the chained messenger's user data alive as long as the instance
    _router: Option<Box<MessengerRouter>>,
}

impl InstanceGuard {
    pub fn try_new(
        entry: &Entry,
        config: InstanceConfig,
        diagnostics: &Diagnostics,
    ) -> Result<Self, BootstrapError> {
        // layer availability is checked before any creation call is attempted
        if config.validation_enabled
            && !layers_registry::layers_available(entry, &config.layers)?
        {
            return Err(BootstrapError::MissingValidationLayers);
        }

        let app_info = ApplicationInfo::builder()
            .application_name(&config.application_name)
            .application_version(config.application_version)
            .engine_name(&config.engine_name)
            .engine_version(config.engine_version)
            .api_version(config.api_version);

        let extension_names = config
            .extensions
            .iter()
            .map(|extension_name| CString::new(extension_name.as_str()))
            .collect::<Result<Vec<_>, _>>()?;
        let extension_name_ptrs = extension_names
            .iter()
            .map(|extension_name| extension_name.as_ptr())
            .collect::<Vec<_>>();

        let layer_names = config
            .layers
            .iter()
            .map(|layer_name| CString::new(layer_name.as_str()))
            .collect::<Result<Vec<_>, _>>()?;
        let layer_name_ptrs = layer_names
            .iter()
            .map(|layer_name| layer_name.as_ptr())
            .collect::<Vec<_>>();

        diagnostics.trace(&format!("layers to enable: {:?}", config.layers));

        let create_info = InstanceCreateInfo::builder()
            .application_info(&app_info)
            .enabled_extension_names(&extension_name_ptrs)
            .enabled_layer_names(&layer_name_ptrs);

        let router = config
            .validation_enabled
            .then(|| Box::new(MessengerRouter::new(Arc::clone(diagnostics.sink()))));

        let instance = if let Some(router) = &router {
            // chained into the create info so validation findings raised
            // during vkCreateInstance itself are captured
            let mut debug_create_info = messenger_create_info(router);
            let create_info = create_info.push_next(&mut debug_create_info);
            unsafe { entry.create_instance(&create_info, None) }
        } else {
            unsafe { entry.create_instance(&create_info, None) }
        }
        .map_err(BootstrapError::platform("vkCreateInstance"))?;

        Ok(Self {
            instance,
            _router: router,
        })
    }
}

impl Deref for InstanceGuard {
    type Target = Instance;

    fn deref(&self) -> &Self::Target {
        &self.instance
    }
}

impl Drop for InstanceGuard {
    fn drop(&mut self) {
        unsafe { self.instance.destroy_instance(None) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_identity_comes_from_package_metadata() {
        let config = InstanceConfig::from_cargo_env(vec![], vec![], false);
        assert_eq!(
            config.application_name.to_str().unwrap(),
            env!("CARGO_PKG_NAME")
        );
        assert_eq!(config.engine_name, config.application_name);
        assert_eq!(config.api_version, API_VERSION_1_2);
        assert!(!config.validation_enabled);
    }

    #[test]
    fn config_preserves_extension_and_layer_order() {
        let extensions = vec!["VK_KHR_surface".to_owned(), "VK_EXT_debug_utils".to_owned()];
        let layers = vec!["VK_LAYER_KHRONOS_validation".to_owned()];
        let config = InstanceConfig::from_cargo_env(extensions.clone(), layers.clone(), true);
        assert_eq!(config.extensions, extensions);
        assert_eq!(config.layers, layers);
        assert!(config.validation_enabled);
    }
}
