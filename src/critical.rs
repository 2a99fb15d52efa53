// =============================================================================
// indexheap — Critical section hooks
// =============================================================================
//
// The allocator is not re-entrant and does no internal locking: every public
// operation must run with exclusive access to the arena. Rather than bake in
// one mutual-exclusion mechanism (this crate runs on everything from a bare
// Cortex-M with no MMU to a hosted multi-core target), the host registers a
// pair of function pointers up front:
//
//   set_critical_section(enter, exit)
//
// `enter` is called before touching the arena, `exit` after, on every path
// including early returns — the same acquire/release-on-drop discipline the
// kernel's ticket spinlock uses, just with the actual lock mechanism left to
// the caller. Defaults are no-ops, which is correct for single-threaded
// hosts and for tests.
//
// Enabling the `spin-critical-section` feature registers a ready-made
// spinlock-backed implementation for hosts that don't have their own
// interrupt-disable primitive (the "mutex or spinlock on a larger system"
// alternative called out in the allocator's design notes).
// =============================================================================

use core::sync::atomic::{AtomicUsize, Ordering};

type HookFn = fn();

fn noop() {}

static ENTER: AtomicUsize = AtomicUsize::new(noop as usize);
static EXIT: AtomicUsize = AtomicUsize::new(noop as usize);

/// Registers the host's critical-section enter/exit hooks.
///
/// Call this once during startup, before the first allocation. Calling it
/// again later replaces the hooks; doing so while another thread might be
/// mid-allocation is the caller's responsibility to avoid.
pub fn set_critical_section(enter: fn(), exit: fn()) {
    ENTER.store(enter as usize, Ordering::SeqCst);
    EXIT.store(exit as usize, Ordering::SeqCst);
}

fn enter_hook() -> HookFn {
    let addr = ENTER.load(Ordering::SeqCst);
    // SAFETY: only ever stored from `fn()` via `set_critical_section`.
    unsafe { core::mem::transmute::<usize, HookFn>(addr) }
}

fn exit_hook() -> HookFn {
    let addr = EXIT.load(Ordering::SeqCst);
    // SAFETY: only ever stored from `fn()` via `set_critical_section`.
    unsafe { core::mem::transmute::<usize, HookFn>(addr) }
}

/// RAII guard bracketing a critical section. Runs the host's `enter` hook
/// on construction and its `exit` hook on drop, so every return path out of
/// a public operation releases the section exactly once.
pub struct CriticalGuard {
    _private: (),
}

impl CriticalGuard {
    /// Enters the critical section. Held for the lifetime of the guard.
    pub fn enter() -> Self {
        (enter_hook())();
        CriticalGuard { _private: () }
    }
}

impl Drop for CriticalGuard {
    fn drop(&mut self) {
        (exit_hook())();
    }
}

#[cfg(feature = "spin-critical-section")]
mod spin_backend {
    use spin::mutex::SpinMutex;

    static GATE: SpinMutex<()> = SpinMutex::new(());

    // `spin::Mutex` gives us mutual exclusion but its guard can't outlive
    // this function, so we leak the lock state into a single held flag:
    // enter blocks until free and marks held, exit releases. Good enough
    // for the convenience backend; hosts with real interrupt control
    // should register their own hooks instead.
    fn enter() {
        core::mem::forget(GATE.lock());
    }

    fn exit() {
        // SAFETY: paired 1:1 with the forgotten guard from `enter`; this
        // mirrors `force_unlock` in `spin`'s own docs for exactly this
        // acquire-in-one-function/release-in-another pattern.
        unsafe { GATE.force_unlock() };
    }

    /// Installs the `spin`-backed critical section as the active hooks.
    pub fn install() {
        super::set_critical_section(enter, exit);
    }
}

#[cfg(feature = "spin-critical-section")]
pub use spin_backend::install as install_spin_critical_section;

#[cfg(test)]
mod tests {
    use super::*;
    use core::sync::atomic::AtomicU32;

    static ENTERED: AtomicU32 = AtomicU32::new(0);
    static EXITED: AtomicU32 = AtomicU32::new(0);

    fn record_enter() {
        ENTERED.fetch_add(1, Ordering::SeqCst);
    }

    fn record_exit() {
        EXITED.fetch_add(1, Ordering::SeqCst);
    }

    #[test]
    fn guard_runs_enter_and_exit_exactly_once() {
        set_critical_section(record_enter, record_exit);
        let before = (ENTERED.load(Ordering::SeqCst), EXITED.load(Ordering::SeqCst));
        {
            let _g = CriticalGuard::enter();
            assert_eq!(ENTERED.load(Ordering::SeqCst), before.0 + 1);
            assert_eq!(EXITED.load(Ordering::SeqCst), before.1);
        }
        assert_eq!(EXITED.load(Ordering::SeqCst), before.1 + 1);
        set_critical_section(noop, noop);
    }
}
