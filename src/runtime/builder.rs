use super::timer::Clock;
use super::Runtime;

/// Configures and creates a [`Runtime`].
///
/// # Examples
///
/// ```
/// use promise_concurrency::runtime::Runtime;
/// use promise_concurrency::time::sleep;
/// use std::time::Duration;
///
/// let rt = Runtime::builder().start_paused(true).build();
/// let start = rt.handle().now();
/// rt.block_on(sleep(Duration::from_secs(60)));
/// assert_eq!(rt.handle().now() - start, Duration::from_secs(60));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Builder {
    start_paused: bool,
}

impl Builder {
    /// Create a builder with the default configuration: a real clock.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a virtual clock.
    ///
    /// Time stands still while there is work in the immediate queue and jumps
    /// straight to the next timer deadline once there is none, so timer-based
    /// code runs instantly and deterministically.
    pub fn start_paused(&mut self, paused: bool) -> &mut Self {
        self.start_paused = paused;
        self
    }

    /// Create the configured [`Runtime`] bound to the current thread.
    pub fn build(&self) -> Runtime {
        let clock = if self.start_paused {
            Clock::paused()
        } else {
            Clock::Real
        };
        Runtime::with_clock(clock)
    }
}
