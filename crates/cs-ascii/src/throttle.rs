use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Décision pure du throttle : accepter une frame ?
///
/// `since_last` is `None` when no frame has been accepted yet.
///
/// # Example
/// ```
/// use std::time::Duration;
/// use cs_ascii::throttle::admits;
/// let interval = Duration::from_millis(90);
/// assert!(!admits(Some(Duration::from_millis(50)), false, interval));
/// assert!(admits(Some(Duration::from_millis(95)), false, interval));
/// assert!(!admits(None, true, interval));
/// ```
#[must_use]
pub fn admits(since_last: Option<Duration>, busy: bool, interval: Duration) -> bool {
    !busy && since_last.is_none_or(|elapsed| elapsed >= interval)
}

/// Gate de décimation : au plus une conversion par intervalle, jamais deux
/// en parallèle.
///
/// Tous les champs sont atomiques, donc `Send + Sync`, partageable entre le thread
/// de capture et le thread de conversion.
///
/// # Example
/// ```
/// use std::time::{Duration, Instant};
/// use cs_ascii::throttle::FrameThrottle;
///
/// let throttle = FrameThrottle::new(Duration::from_millis(90));
/// let t0 = Instant::now();
/// {
///     let permit = throttle.try_acquire(t0);
///     assert!(permit.is_some());
///     assert!(throttle.is_busy());
/// }
/// assert!(!throttle.is_busy());
/// assert!(throttle.try_acquire(t0 + Duration::from_millis(50)).is_none());
/// assert!(throttle.try_acquire(t0 + Duration::from_millis(95)).is_some());
/// ```
pub struct FrameThrottle {
    /// Référence temporelle des timestamps stockés.
    origin: Instant,
    /// Intervalle minimal en nanosecondes.
    interval_ns: AtomicU64,
    /// Dernière acceptation en ns depuis `origin`, +1 ; 0 = jamais.
    last_accepted: AtomicU64,
    /// Conversion en cours.
    busy: AtomicBool,
}

impl FrameThrottle {
    /// Create a throttle with the given minimum spacing.
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        Self {
            origin: Instant::now(),
            interval_ns: AtomicU64::new(duration_ns(interval)),
            last_accepted: AtomicU64::new(0),
            busy: AtomicBool::new(false),
        }
    }

    /// Try to start a conversion at `now`.
    ///
    /// On success the throttle is busy until the returned permit is dropped,
    /// whatever path the conversion leaves by.
    #[must_use = "dropping the permit immediately ends the conversion slot"]
    pub fn try_acquire(&self, now: Instant) -> Option<ThrottlePermit<'_>> {
        if self
            .busy
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_err()
        {
            return None;
        }

        let now_ns = duration_ns(now.saturating_duration_since(self.origin));
        let last = self.last_accepted.load(Ordering::Relaxed);
        let since_last = (last != 0).then(|| Duration::from_nanos(now_ns.saturating_sub(last - 1)));

        if !admits(since_last, false, self.interval()) {
            self.busy.store(false, Ordering::Release);
            return None;
        }

        self.last_accepted.store(now_ns.saturating_add(1), Ordering::Relaxed);
        Some(ThrottlePermit { busy: &self.busy })
    }

    /// `true` while a permit is alive.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Current minimum spacing.
    #[must_use]
    pub fn interval(&self) -> Duration {
        Duration::from_nanos(self.interval_ns.load(Ordering::Relaxed))
    }

    /// Met à jour l'intervalle (hot-reload de la config).
    pub fn set_interval(&self, interval: Duration) {
        self.interval_ns
            .store(duration_ns(interval), Ordering::Relaxed);
    }
}

/// Scoped conversion slot. Clears the busy flag on drop.
pub struct ThrottlePermit<'a> {
    busy: &'a AtomicBool,
}

impl Drop for ThrottlePermit<'_> {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}

fn duration_ns(d: Duration) -> u64 {
    u64::try_from(d.as_nanos()).unwrap_or(u64::MAX)
}
