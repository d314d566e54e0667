// SAXPY ("Single-Precision A * X Plus Y"): Y = alpha * X + Y.
//
// The device is selected explicitly, with a diagnostic line for every
// enumerated device; no runtime default device is used. A kernel build
// failure prints the build log to stderr and exits with code 1, as does the
// absence of any GPU.

use cl_probe::{ClError, DeviceClass, GpuBuffer, Queued, SelectionPolicy, select_device};

use opencl3::{
    command_queue::CommandQueue,
    context::Context,
    kernel::{ExecuteKernel, Kernel},
    program::Program,
};

#[cfg(feature = "metrics")]
use cl_probe::summary;

const N: usize = 1 << 10;

const ALPHA: f32 = 2.5;
const XVAL: f32 = 3.0;
const YVAL: f32 = 1.0;

fn main() -> Result<(), ClError> {
    let Some(device) = select_device(DeviceClass::Gpu, SelectionPolicy::FirstFound)? else {
        std::process::exit(1);
    };

    println!("Using {} {}", device.vendor()?, device.name()?);
    println!();

    let context = Context::from_device(&device)?;
    let queue = CommandQueue::create(&context, device.id(), 0)?;

    let src = include_str!("saxpy.cl");
    let program = match Program::create_and_build_from_source(&context, src, "") {
        Ok(p) => p,
        Err(log) => {
            eprintln!("Device: {}", device.name()?);
            eprintln!("{log}");
            std::process::exit(1);
        }
    };
    let kernel = Kernel::create(&program, "saxpy")?;

    let h_x = vec![XVAL; N];
    let mut h_y = vec![YVAL; N];

    println!("Y[0]: {}", h_y[0]);

    let x_dev = GpuBuffer::<Queued>::from_slice(&context, &queue, &h_x)?;
    let y_dev = GpuBuffer::<Queued>::from_slice(&context, &queue, &h_y)?;

    let kernel_event = ExecuteKernel::new(&kernel)
        .set_arg(&ALPHA)
        .set_arg(x_dev.raw())
        .set_arg(y_dev.raw())
        .set_global_work_size(N)
        .enqueue_nd_range(&queue)?;
    kernel_event.wait()?;

    let _y_dev = y_dev.read_into(&queue, &mut h_y)?;

    println!("Y[0]: {}", h_y[0]);

    let expected = ALPHA * XVAL + YVAL;
    assert!(h_y.iter().all(|&y| (y - expected).abs() < 1e-6));

    #[cfg(feature = "metrics")]
    summary();

    Ok(())
}
