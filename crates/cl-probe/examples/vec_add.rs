// Minimal vector addition: select the first GPU, build the kernel, add two
// float arrays on the device, read back and verify.

use cl_probe::{ClError, DeviceClass, GpuBuffer, Queued, SelectionPolicy, select_device};

use opencl3::{
    command_queue::CommandQueue, context::Context, kernel::Kernel, program::Program,
};

#[cfg(feature = "metrics")]
use cl_probe::summary;

fn main() -> Result<(), ClError> {
    // 1. Device & context
    let Some(device) = select_device(DeviceClass::Gpu, SelectionPolicy::FirstFound)? else {
        eprintln!("No GPU device found.");
        std::process::exit(1);
    };
    let context = Context::from_device(&device)?;
    let queue = CommandQueue::create(&context, device.id(), 0)?;

    // 2. Host data
    let n = 1 << 20;
    let h_a = vec![1.0_f32; n];
    let h_b = vec![2.0_f32; n];
    let mut h_out = vec![0.0_f32; n];

    // 3. Device buffers (uploads wait before the buffers become Ready)
    let a_dev = GpuBuffer::<Queued>::from_slice(&context, &queue, &h_a)?;
    let b_dev = GpuBuffer::<Queued>::from_slice(&context, &queue, &h_b)?;
    let out_dev = GpuBuffer::<Queued>::from_slice(&context, &queue, &h_out)?;

    // 4. Build & launch
    let src = include_str!("vec_add.cl");
    let program = match Program::create_and_build_from_source(&context, src, "") {
        Ok(p) => p,
        Err(log) => {
            eprintln!("Device: {}", device.name()?);
            eprintln!("{log}");
            std::process::exit(1);
        }
    };
    let kernel = Kernel::create(&program, "vec_add")?;
    kernel.set_arg(0, a_dev.raw())?;
    kernel.set_arg(1, b_dev.raw())?;
    kernel.set_arg(2, out_dev.raw())?;

    let global = [n, 1, 1];
    queue.enqueue_nd_range_kernel(
        kernel.get(),
        1,
        std::ptr::null(),
        global.as_ptr(),
        std::ptr::null(),
        &[],
    )?;
    queue.finish()?;

    // 5. Device → Host & verify
    let _out_dev = out_dev.read_into(&queue, &mut h_out)?;
    assert!(h_out.iter().all(|&x| (x - 3.0).abs() < 1e-6));
    println!("vec_add OK, first element = {}", h_out[0]);

    #[cfg(feature = "metrics")]
    summary();

    Ok(())
}
