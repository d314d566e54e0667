// Check if there's any GPU with OpenCL 1.2 and above.

use cl_probe::{ClVersion, gpu_meets};

fn main() {
    // Enumeration failure counts as "not available", same as zero platforms.
    let available = gpu_meets(ClVersion::V1_2).unwrap_or(false);
    println!("{available}");
}
