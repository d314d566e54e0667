//! Device selector & capability prober.
//!
//! Enumeration takes a snapshot of what the runtime reports
//! ([`PlatformReport`] / [`DeviceReport`]); selection and version probing are
//! plain functions over that snapshot, so enumeration-order sensitivity stays
//! visible and testable without an OpenCL runtime.

use opencl3::device::{
    CL_DEVICE_TYPE_ACCELERATOR, CL_DEVICE_TYPE_ALL, CL_DEVICE_TYPE_CPU, CL_DEVICE_TYPE_GPU, Device,
};
use opencl3::platform::get_platforms;
use opencl3::types::cl_device_id;

use crate::ClError;
use crate::version::ClVersion;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeviceClass {
    Gpu,
    Cpu,
    Accelerator,
    Any,
}

impl DeviceClass {
    pub fn label(self) -> &'static str {
        match self {
            DeviceClass::Gpu => "GPU",
            DeviceClass::Cpu => "CPU",
            DeviceClass::Accelerator => "ACCELERATOR",
            DeviceClass::Any => "ANY",
        }
    }

    // cl_device_type bits; the alias bottoms out at u64.
    fn as_cl(self) -> u64 {
        match self {
            DeviceClass::Gpu => CL_DEVICE_TYPE_GPU,
            DeviceClass::Cpu => CL_DEVICE_TYPE_CPU,
            DeviceClass::Accelerator => CL_DEVICE_TYPE_ACCELERATOR,
            DeviceClass::Any => CL_DEVICE_TYPE_ALL,
        }
    }
}

/// Snapshot of one enumerated device. The `id` is a runtime-owned handle;
/// holding or dropping a report never affects device lifetime.
#[derive(Clone, Debug)]
pub struct DeviceReport {
    pub id: cl_device_id,
    pub class: DeviceClass,
    pub vendor: String,
    pub name: String,
    pub version: String,
    pub max_compute_units: u32,
    pub max_work_group_size: usize,
}

impl DeviceReport {
    /// Parsed version in the `major*10 + minor` encoding, 0 if garbled.
    pub fn cl_version(&self) -> u32 {
        ClVersion::encoded_or_zero(&self.version)
    }
}

impl fmt::Display for DeviceReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            " - [{}] {}: {}",
            self.class.label(),
            self.vendor,
            self.name
        )?;
        write!(
            f,
            "   (Max compute units: {}, max work group size: {})",
            self.max_compute_units, self.max_work_group_size
        )
    }
}

#[derive(Clone, Debug)]
pub struct PlatformReport {
    pub version: String,
    pub devices: Vec<DeviceReport>,
}

/// Enumerate all platforms and their devices of the given class, in runtime
/// order. A platform whose device query fails is reported with an empty
/// device list rather than aborting the scan; an info query failing on an
/// individual device degrades to placeholder values for the same reason.
/// Zero platforms is an empty result, not an error.
pub fn enumerate(class: DeviceClass) -> Result<Vec<PlatformReport>, ClError> {
    let mut reports = Vec::new();
    for platform in get_platforms()? {
        let version = platform.version().unwrap_or_default();
        let devices = platform
            .get_devices(class.as_cl())
            .map(|ids| ids.into_iter().map(|id| report_device(id, class)).collect())
            .unwrap_or_default();
        reports.push(PlatformReport { version, devices });
    }
    Ok(reports)
}

fn report_device(id: cl_device_id, class: DeviceClass) -> DeviceReport {
    let device = Device::new(id);
    DeviceReport {
        id,
        class,
        vendor: device.vendor().unwrap_or_else(|_| "<unknown>".into()),
        name: device.name().unwrap_or_else(|_| "<unknown>".into()),
        version: device.version().unwrap_or_default(),
        max_compute_units: device.max_compute_units().unwrap_or(0),
        max_work_group_size: device.max_work_group_size().unwrap_or(0),
    }
}

/// How [`pick`] ranks enumerated devices.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SelectionPolicy {
    /// First device in flattened enumeration order across all platforms.
    #[default]
    FirstFound,
    /// Device with the most compute units; earlier device wins ties.
    MostComputeUnits,
}

/// Pick one device from the snapshot, or `None` when nothing matched the
/// enumeration filter. An explicit fold rather than an early exit, so the
/// policy is the only thing deciding between candidates.
pub fn pick(reports: &[PlatformReport], policy: SelectionPolicy) -> Option<&DeviceReport> {
    let mut candidates = reports.iter().flat_map(|p| p.devices.iter());
    match policy {
        SelectionPolicy::FirstFound => candidates.next(),
        SelectionPolicy::MostComputeUnits => candidates.reduce(|best, d| {
            if d.max_compute_units > best.max_compute_units {
                d
            } else {
                best
            }
        }),
    }
}

/// Print the per-platform/per-device diagnostic block, in the same shape
/// whether or not any device ends up selected.
pub fn print_reports(reports: &[PlatformReport]) {
    for platform in reports {
        println!("Platform {}", platform.version);
        if platform.devices.is_empty() {
            println!(" No devices found.");
            continue;
        }
        for device in &platform.devices {
            println!("{device}");
        }
        println!();
    }
}

/// Enumerate, print diagnostics for everything found, and pick one device.
/// `Ok(None)` means no matching device exists; callers decide whether that
/// is fatal.
pub fn select_device(
    class: DeviceClass,
    policy: SelectionPolicy,
) -> Result<Option<Device>, ClError> {
    let reports = enumerate(class)?;
    print_reports(&reports);
    Ok(pick(&reports, policy).map(|r| Device::new(r.id)))
}

/// True iff any device in the snapshot reports a version meeting `min`.
/// Short-circuits on the first hit; garbled version strings never qualify.
pub fn min_version_available(reports: &[PlatformReport], min: ClVersion) -> bool {
    reports
        .iter()
        .flat_map(|p| p.devices.iter())
        .any(|d| d.cl_version() >= min.encoded())
}

/// Is there any GPU with OpenCL >= `min`?
pub fn gpu_meets(min: ClVersion) -> Result<bool, ClError> {
    Ok(min_version_available(&enumerate(DeviceClass::Gpu)?, min))
}
