use ash::vk::{PhysicalDevice, QueueFamilyProperties, QueueFlags};

use super::instance_guard::InstanceGuard;

/// Queue family lookup result for a physical device. Derived data, recomputed
/// on demand; holding it does not pin the device.
#[derive(Debug)]
pub struct QueueFamilyIndices {
    /// family capable of running graphics commands
    pub graphics_family: Option<u32>,
}

impl QueueFamilyIndices {
    pub fn is_complete(&self) -> bool {
        self.graphics_family.is_some()
    }
}

/// Queries the device's queue families and records the index of the relevant
/// ones. Safe to call repeatedly; it runs once during scoring and again when
/// the logical device is built.
pub fn find_queue_families(
    instance: &InstanceGuard,
    device: &PhysicalDevice,
) -> QueueFamilyIndices {
    let queue_family_properties =
        unsafe { instance.get_physical_device_queue_family_properties(*device) };
    QueueFamilyIndices {
        graphics_family: graphics_family_index(&queue_family_properties),
    }
}

/// Index of the first family advertising graphics support, scanning in index
/// order. Stops at the first match; only one is needed.
fn graphics_family_index(queue_family_properties: &[QueueFamilyProperties]) -> Option<u32> {
    queue_family_properties
        .iter()
        .position(|properties| properties.queue_flags.contains(QueueFlags::GRAPHICS))
        .map(|index| index as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn family(flags: QueueFlags) -> QueueFamilyProperties {
        QueueFamilyProperties::builder().queue_flags(flags).build()
    }

    #[test]
    fn returns_lowest_qualifying_index() {
        let families = [
            family(QueueFlags::COMPUTE),
            family(QueueFlags::GRAPHICS | QueueFlags::COMPUTE),
            family(QueueFlags::GRAPHICS),
        ];
        assert_eq!(graphics_family_index(&families), Some(1));
    }

    #[test]
    fn no_graphics_family_is_incomplete() {
        let families = [family(QueueFlags::COMPUTE), family(QueueFlags::TRANSFER)];
        assert_eq!(graphics_family_index(&families), None);

        let indices = QueueFamilyIndices {
            graphics_family: None,
        };
        assert!(!indices.is_complete());
    }

    #[test]
    fn populated_index_is_complete() {
        let indices = QueueFamilyIndices {
            graphics_family: Some(0),
        };
        assert!(indices.is_complete());
    }
}
