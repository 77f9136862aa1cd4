use std::{collections::BTreeMap, ffi::CStr};

use ash::vk::{PhysicalDevice, PhysicalDeviceProperties, PhysicalDeviceType};

use crate::diagnostics::Diagnostics;

use super::{
    error::BootstrapError,
    instance_guard::InstanceGuard,
    queue_families::{find_queue_families, QueueFamilyIndices},
};

const DISCRETE_GPU_BONUS: u32 = 1000;

/// Queries the system for the available physical devices, scores each one,
/// and picks the best candidate. The returned handle is borrowed from the
/// instance; it is never owned or destroyed here.
pub fn pick_physical_device(
    instance: &InstanceGuard,
    diagnostics: &Diagnostics,
) -> Result<PhysicalDevice, BootstrapError> {
    let physical_devices = unsafe { instance.enumerate_physical_devices() }
        .map_err(BootstrapError::platform("vkEnumeratePhysicalDevices"))?;

    let candidates = physical_devices
        .into_iter()
        .map(|physical_device| {
            let properties = unsafe { instance.get_physical_device_properties(physical_device) };
            let indices = find_queue_families(instance, &physical_device);
            let score = rate_suitability(&properties, &indices);

            let device_name = unsafe { CStr::from_ptr(properties.device_name.as_ptr()) }
                .to_string_lossy()
                .into_owned();
            diagnostics.trace(&format!("candidate '{}' scored {}", device_name, score));

            (score, physical_device)
        })
        .collect::<Vec<_>>();

    select_best_candidate(candidates)
}

/// Suitability score for one candidate. A device without a graphics queue
/// family is unusable and scores 0; otherwise discrete GPUs get a large fixed
/// bonus and the maximum 2D image dimension is added on top.
fn rate_suitability(
    properties: &PhysicalDeviceProperties,
    indices: &QueueFamilyIndices,
) -> u32 {
    if !indices.is_complete() {
        return 0;
    }

    let mut score = 0;
    if properties.device_type == PhysicalDeviceType::DISCRETE_GPU {
        score += DISCRETE_GPU_BONUS;
    }
    score += properties.limits.max_image_dimension2_d;
    score
}

/// Ranks the scored candidates and picks the maximum. Candidates with equal
/// scores keep the first one enumerated.
fn select_best_candidate(
    candidates: Vec<(u32, PhysicalDevice)>,
) -> Result<PhysicalDevice, BootstrapError> {
    if candidates.is_empty() {
        return Err(BootstrapError::NoGpu);
    }

    let mut ranking = BTreeMap::new();
    for (score, physical_device) in candidates {
        ranking.entry(score).or_insert(physical_device);
    }

    match ranking.into_iter().next_back() {
        Some((score, physical_device)) if score > 0 => Ok(physical_device),
        _ => Err(BootstrapError::NoSuitableGpu),
    }
}

#[cfg(test)]
mod tests {
    use ash::vk::Handle;

    use super::*;

    fn device_properties(
        device_type: PhysicalDeviceType,
        max_image_dimension2_d: u32,
    ) -> PhysicalDeviceProperties {
        let mut properties = PhysicalDeviceProperties::default();
        properties.device_type = device_type;
        properties.limits.max_image_dimension2_d = max_image_dimension2_d;
        properties
    }

    fn complete() -> QueueFamilyIndices {
        QueueFamilyIndices {
            graphics_family: Some(0),
        }
    }

    fn incomplete() -> QueueFamilyIndices {
        QueueFamilyIndices {
            graphics_family: None,
        }
    }

    #[test]
    fn discrete_bonus_is_additive() {
        let discrete = device_properties(PhysicalDeviceType::DISCRETE_GPU, 4096);
        assert_eq!(rate_suitability(&discrete, &complete()), 5096);

        let integrated = device_properties(PhysicalDeviceType::INTEGRATED_GPU, 16384);
        assert_eq!(rate_suitability(&integrated, &complete()), 16384);
    }

    #[test]
    fn incomplete_queue_families_score_zero() {
        let discrete = device_properties(PhysicalDeviceType::DISCRETE_GPU, 16384);
        assert_eq!(rate_suitability(&discrete, &incomplete()), 0);
    }

    #[test]
    fn integrated_gpu_with_zero_dimension_scores_zero() {
        let integrated = device_properties(PhysicalDeviceType::INTEGRATED_GPU, 0);
        assert_eq!(rate_suitability(&integrated, &complete()), 0);
    }

    #[test]
    fn integrated_with_larger_limit_outranks_discrete() {
        let integrated = device_properties(PhysicalDeviceType::INTEGRATED_GPU, 8192);
        let discrete = device_properties(PhysicalDeviceType::DISCRETE_GPU, 4096);
        let device_a = PhysicalDevice::from_raw(0xA);
        let device_b = PhysicalDevice::from_raw(0xB);

        let score_a = rate_suitability(&integrated, &complete());
        let score_b = rate_suitability(&discrete, &complete());
        assert_eq!(score_a, 8192);
        assert_eq!(score_b, 5096);

        let picked =
            select_best_candidate(vec![(score_a, device_a), (score_b, device_b)]).unwrap();
        assert_eq!(picked, device_a);
    }

    #[test]
    fn equal_scores_keep_first_enumerated() {
        let first = PhysicalDevice::from_raw(1);
        let second = PhysicalDevice::from_raw(2);
        let picked = select_best_candidate(vec![(4096, first), (4096, second)]).unwrap();
        assert_eq!(picked, first);
    }

    #[test]
    fn only_zero_scores_is_no_suitable_gpu() {
        let properties = device_properties(PhysicalDeviceType::DISCRETE_GPU, 4096);
        let score = rate_suitability(&properties, &incomplete());
        let result = select_best_candidate(vec![(score, PhysicalDevice::from_raw(1))]);
        assert!(matches!(result, Err(BootstrapError::NoSuitableGpu)));
    }

    #[test]
    fn no_devices_is_no_gpu() {
        assert!(matches!(
            select_best_candidate(vec![]),
            Err(BootstrapError::NoGpu)
        ));
    }
}
