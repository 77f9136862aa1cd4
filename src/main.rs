use std::{process, rc::Rc};

use anyhow::Result;
use ash::Entry;
use vulkan_bootstrap::{
    vulkan::{
        pick_physical_device, required_instance_extensions, requested_validation_layers,
        DebugUtilsExtension, InstanceConfig, InstanceGuard, LogicalDeviceGuard,
    },
    Diagnostics, WindowManager, ENABLE_VALIDATIONS,
};

fn main() {
    let diagnostics = match Diagnostics::init() {
        Ok(diagnostics) => diagnostics,
        Err(err) => {
            eprintln!("failed to initialize logging: {err:#}");
            process::exit(1);
        }
    };

    if let Err(err) = run(&diagnostics) {
        diagnostics.critical(&format!("{err:#}"));
        diagnostics.shutdown();
        process::exit(1);
    }

    diagnostics.shutdown();
}

fn run(diagnostics: &Diagnostics) -> Result<()> {
    let mut window = WindowManager::try_new()?;
    let entry = Entry::linked();

    let extensions = required_instance_extensions(
        &window.required_instance_extensions()?,
        ENABLE_VALIDATIONS,
        diagnostics,
    );
    let layers = requested_validation_layers(ENABLE_VALIDATIONS);
    let config = InstanceConfig::from_cargo_env(extensions, layers, ENABLE_VALIDATIONS);

    let instance = Rc::new(InstanceGuard::try_new(&entry, config, diagnostics)?);
    let _debug_utils = if ENABLE_VALIDATIONS {
        Some(DebugUtilsExtension::try_new(&entry, &instance, diagnostics)?)
    } else {
        None
    };

    let physical_device = pick_physical_device(&instance, diagnostics)?;
    let logical_device = LogicalDeviceGuard::try_new(&instance, &physical_device, diagnostics)?;
    let _graphics_queue = logical_device.graphics_queue();
    diagnostics.info("Vulkan bootstrap complete, entering event loop");

    window.run_event_loop();

    Ok(())
}
