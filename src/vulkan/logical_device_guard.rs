use std::{ops::Deref, rc::Rc};

use ash::{
    vk::{DeviceCreateInfo, DeviceQueueCreateInfo, PhysicalDevice, PhysicalDeviceFeatures, Queue},
    Device,
};

use crate::diagnostics::Diagnostics;

use super::{
    error::BootstrapError, instance_guard::InstanceGuard, queue_families::find_queue_families,
};

/// RAII for the logical device
pub struct LogicalDeviceGuard {
    device: Device,
    pub graphics_queue_family_index: u32,
    // need to keep a reference to the instance to ensure we get
    // dropped before it does
    _instance: Rc<InstanceGuard>,
}

impl LogicalDeviceGuard {
    pub fn try_new(
        instance: &Rc<InstanceGuard>,
        physical_device: &PhysicalDevice,
        diagnostics: &Diagnostics,
    ) -> Result<Self, BootstrapError> {
        // the selector only hands over devices with a graphics family, but
        // re-resolve and fail loudly rather than trust the caller
        let indices = find_queue_families(instance, physical_device);
        let graphics_queue_family_index = indices
            .graphics_family
            .ok_or(BootstrapError::MissingGraphicsQueue)?;
        diagnostics.trace(&format!(
            "graphics queue family index: {}",
            graphics_queue_family_index
        ));

        let queue_priorities = [1.0f32];
        let queue_create_infos = [DeviceQueueCreateInfo::builder()
            .queue_family_index(graphics_queue_family_index)
            .queue_priorities(&queue_priorities)
            .build()];

        // no device features beyond the defaults are needed yet
        let features = PhysicalDeviceFeatures::default();
        let device_create_info = DeviceCreateInfo::builder()
            .queue_create_infos(&queue_create_infos)
            .enabled_features(&features);

        let device = unsafe { instance.create_device(*physical_device, &device_create_info, None) }
            .map_err(BootstrapError::platform("vkCreateDevice"))?;

        Ok(Self {
            device,
            graphics_queue_family_index,
            _instance: Rc::clone(instance),
        })
    }

    pub fn graphics_queue(&self) -> Queue {
        unsafe {
            self.device
                .get_device_queue(self.graphics_queue_family_index, 0)
        }
    }
}

impl Deref for LogicalDeviceGuard {
    type Target = Device;

    fn deref(&self) -> &Self::Target {
        &self.device
    }
}

impl Drop for LogicalDeviceGuard {
    fn drop(&mut self) {
        unsafe { self.device.destroy_device(None) }
    }
}
