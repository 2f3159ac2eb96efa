//! Monotonic time source

/// Monotonic microsecond clock
///
/// All animation timing is expressed in microseconds since boot. A `u64`
/// never wraps within the lifetime of the device.
pub trait Clock {
    /// Microseconds since an arbitrary fixed origin
    fn now_us(&self) -> u64;

    /// Milliseconds since the same origin
    fn now_ms(&self) -> u64 {
        self.now_us() / 1000
    }
}
