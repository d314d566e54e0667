use cl_probe::{ClError, ClVersion, DeviceClass, SelectionPolicy};
use cl_probe::{enumerate, min_version_available, pick, print_reports};

#[cfg(feature = "metrics")]
use cl_probe::summary;

fn main() -> Result<(), ClError> {
    // 1. Everything the runtime knows about
    let reports = enumerate(DeviceClass::Any)?;
    if reports.is_empty() {
        println!("No OpenCL platforms found.");
        return Ok(());
    }
    print_reports(&reports);

    // 2. What a kernel-launch program would pick
    let gpus = enumerate(DeviceClass::Gpu)?;
    match pick(&gpus, SelectionPolicy::FirstFound) {
        Some(gpu) => println!("Selected GPU: {} {}", gpu.vendor, gpu.name),
        None => println!("Selected GPU: none"),
    }

    // 3. Capability threshold used by the demo kernels
    let min = ClVersion::V1_2;
    println!(
        "GPU with OpenCL >= {}: {}",
        min,
        min_version_available(&gpus, min)
    );

    #[cfg(feature = "metrics")]
    summary();

    Ok(())
}
