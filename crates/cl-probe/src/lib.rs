pub mod probe;
pub mod version;

#[cfg(feature = "metrics")]
mod metrics;
#[cfg(feature = "metrics")]
pub use metrics::{ALLOCS, ALLOC_BYTES, record, summary};

pub use probe::{
    DeviceClass, DeviceReport, PlatformReport, SelectionPolicy, enumerate, gpu_meets,
    min_version_available, pick, print_reports, select_device,
};
pub use version::ClVersion;

use opencl3::{
    command_queue::CommandQueue,
    context::Context,
    event::Event,
    memory::{Buffer, CL_MEM_READ_WRITE},
    types::CL_NON_BLOCKING,
};
use std::{marker::PhantomData, ptr};

#[cfg(feature = "metrics")]
use std::{sync::atomic::Ordering, time::Instant};

#[derive(thiserror::Error, Debug)]
pub enum ClError {
    #[error("OpenCL error code {0}")]
    Api(i32),
    #[error("invalid buffer size: {0}")]
    InvalidSize(usize),
    #[error("program build failed:\n{0}")]
    Build(String),
}

impl From<opencl3::error_codes::ClError> for ClError {
    fn from(err: opencl3::error_codes::ClError) -> Self {
        ClError::Api(err.0)
    }
}

impl From<i32> for ClError {
    fn from(code: i32) -> Self {
        ClError::Api(code)
    }
}

mod sealed {
    pub trait Sealed {}
}

pub trait State: sealed::Sealed {}

pub struct Queued;
impl sealed::Sealed for Queued {}
impl State for Queued {}

pub struct InFlight;
impl sealed::Sealed for InFlight {}
impl State for InFlight {}

pub struct Ready;
impl sealed::Sealed for Ready {}
impl State for Ready {}

/// Device buffer whose transfer state is tracked in the type: `Queued`
/// (allocated, contents undefined), `InFlight` (a transfer is enqueued),
/// `Ready` (last enqueued transfer has a guard the caller must consume).
pub struct GpuBuffer<S> {
    buf: Buffer<u8>,
    len: usize,
    _state: PhantomData<S>,
}

impl GpuBuffer<Queued> {
    pub fn new(context: &Context, len: usize) -> Result<Self, ClError> {
        if len == 0 {
            return Err(ClError::InvalidSize(len));
        }

        #[cfg(feature = "metrics")]
        {
            ALLOCS.fetch_add(1, Ordering::Relaxed);
            ALLOC_BYTES.fetch_add(len, Ordering::Relaxed);
        }

        #[cfg(feature = "metrics")]
        let t = Instant::now();

        let buf = Buffer::<u8>::create(context, CL_MEM_READ_WRITE, len, ptr::null_mut())?;

        #[cfg(feature = "metrics")]
        record("GpuBuffer::new", t);

        Ok(Self {
            buf,
            len,
            _state: PhantomData,
        })
    }

    /// Allocate, upload `data`, and wait for the copy in one step.
    pub fn from_slice<T: bytemuck::Pod>(
        context: &Context,
        queue: &CommandQueue,
        data: &[T],
    ) -> Result<GpuBuffer<Ready>, ClError> {
        let buf = Self::new(context, std::mem::size_of_val(data))?;
        let (in_flight, guard) = buf.enqueue_write(queue, data)?;
        Ok(in_flight.into_ready(guard))
    }

    pub fn enqueue_write<T: bytemuck::Pod>(
        mut self,
        queue: &CommandQueue,
        host: &[T],
    ) -> Result<(GpuBuffer<InFlight>, EventGuard), ClError> {
        let bytes = bytemuck::cast_slice::<T, u8>(host);
        debug_assert_eq!(bytes.len(), self.len, "host data length mismatch");

        #[cfg(feature = "metrics")]
        let t = Instant::now();

        let evt = queue.enqueue_write_buffer(&mut self.buf, CL_NON_BLOCKING, 0, bytes, &[])?;

        #[cfg(feature = "metrics")]
        record("enqueue_write", t);

        Ok((
            GpuBuffer {
                buf: self.buf,
                len: self.len,
                _state: PhantomData,
            },
            EventGuard { evt },
        ))
    }
}

impl GpuBuffer<Ready> {
    pub fn enqueue_read<T: bytemuck::Pod>(
        mut self,
        queue: &CommandQueue,
        host_out: &mut [T],
    ) -> Result<(GpuBuffer<InFlight>, EventGuard), ClError> {
        let bytes = bytemuck::cast_slice_mut::<T, u8>(host_out);
        debug_assert_eq!(bytes.len(), self.len, "host output length mismatch");

        #[cfg(feature = "metrics")]
        let t = Instant::now();

        let evt = queue.enqueue_read_buffer(&mut self.buf, CL_NON_BLOCKING, 0, bytes, &[])?;

        #[cfg(feature = "metrics")]
        record("enqueue_read", t);

        Ok((
            GpuBuffer {
                buf: self.buf,
                len: self.len,
                _state: PhantomData,
            },
            EventGuard { evt },
        ))
    }

    /// Download into `host_out` and wait for the copy to finish.
    pub fn read_into<T: bytemuck::Pod>(
        self,
        queue: &CommandQueue,
        host_out: &mut [T],
    ) -> Result<GpuBuffer<Ready>, ClError> {
        let (in_flight, guard) = self.enqueue_read(queue, host_out)?;
        guard.wait()?;
        Ok(GpuBuffer {
            buf: in_flight.buf,
            len: in_flight.len,
            _state: PhantomData,
        })
    }
}

impl GpuBuffer<InFlight> {
    /// Consumes the guard, waiting for the enqueued transfer.
    pub fn into_ready(self, guard: EventGuard) -> GpuBuffer<Ready> {
        drop(guard);
        GpuBuffer {
            buf: self.buf,
            len: self.len,
            _state: PhantomData,
        }
    }
}

impl<S> GpuBuffer<S> {
    pub fn raw(&self) -> &Buffer<u8> {
        &self.buf
    }

    pub fn raw_mut(&mut self) -> &mut Buffer<u8> {
        &mut self.buf
    }

    /// Length in bytes.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Waits on the wrapped event when dropped.
pub struct EventGuard {
    evt: Event,
}

impl EventGuard {
    /// Explicit wait, surfacing the error the `Drop` path swallows. The
    /// re-wait in `Drop` on the completed event is a no-op.
    pub fn wait(self) -> Result<(), ClError> {
        self.evt.wait().map_err(ClError::from)
    }
}

impl Drop for EventGuard {
    fn drop(&mut self) {
        let _ = self.evt.wait();
    }
}
