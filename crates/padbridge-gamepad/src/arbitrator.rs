use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock, TryLockError, Weak};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{bounded, unbounded, RecvTimeoutError, Sender};

use crate::backend::{Adapter, Backend, JoystickSource, SharedSimulator, XInputSource};
use crate::clock::{Clock, SystemClock};
use crate::events::{EventReceiver, EventSink, PadEvent};
use crate::mapping::ButtonMapping;
use crate::platform::{SystemJoystick, SystemXInput};
use crate::settings::Settings;
use crate::types::ControllerType;

/// Shared state used by the arbitrator, its health-check thread and the
/// event sinks handed to backends.
struct Shared {
    session: Mutex<Session>,
    subscribers: Mutex<Vec<Sender<PadEvent>>>,
    /// Bumped on every switch; sinks of older sessions go silent.
    generation: AtomicU64,
    active_type: RwLock<ControllerType>,
    mapping: RwLock<ButtonMapping>,
}

struct Session {
    /// Highest priority first.
    backends: Vec<Box<dyn Backend>>,
    active: Option<usize>,
    announced_idle: bool,
}

struct Ticker {
    stop_tx: Sender<()>,
    handle: JoinHandle<()>,
}

/// Keeps exactly one controller backend active and relays its events.
pub struct Arbitrator {
    shared: Arc<Shared>,
    ticker: Mutex<Option<Ticker>>,
    health_check_interval: Duration,
}

impl Arbitrator {
    /// `backends` must be in priority order, highest first.
    pub fn new(
        backends: Vec<Box<dyn Backend>>,
        mapping: ButtonMapping,
        health_check_interval: Duration,
    ) -> Self {
        Self {
            shared: Arc::new(Shared {
                session: Mutex::new(Session {
                    backends,
                    active: None,
                    announced_idle: false,
                }),
                subscribers: Mutex::new(Vec::new()),
                generation: AtomicU64::new(0),
                active_type: RwLock::new(ControllerType::None),
                mapping: RwLock::new(mapping),
            }),
            ticker: Mutex::new(None),
            health_check_interval,
        }
    }

    /// PlayStation HID, then XInput, then generic joysticks, on the real
    /// platform APIs.
    pub fn with_default_backends(
        settings: &Settings,
        mapping: ButtonMapping,
        simulator: SharedSimulator,
    ) -> Self {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let mut backends: Vec<Box<dyn Backend>> = Vec::with_capacity(3);
        #[cfg(feature = "hid-backend")]
        backends.push(Box::new(Adapter::new(
            crate::backend::PlayStationSource::new(crate::platform::HidapiPort::new()),
            settings.clone(),
            mapping,
            clock.clone(),
            simulator.clone(),
        )));
        backends.push(Box::new(Adapter::new(
            XInputSource::new(SystemXInput),
            settings.clone(),
            mapping,
            clock.clone(),
            simulator.clone(),
        )));
        backends.push(Box::new(Adapter::new(
            JoystickSource::new(SystemJoystick),
            settings.clone(),
            mapping,
            clock,
            simulator,
        )));
        Self::new(backends, mapping, settings.polling.health_check_interval)
    }

    /// Subscribes to pad events. Dropped subscribers are cleaned automatically.
    pub fn subscribe(&self) -> EventReceiver {
        let (tx, rx) = unbounded();
        if let Ok(mut subs) = self.shared.subscribers.lock() {
            subs.push(tx);
        }
        rx
    }

    /// Probe right away, then keep checking on the health-check interval.
    pub fn start(&self) {
        let Ok(mut ticker) = self.ticker.lock() else {
            return;
        };
        if ticker.is_some() {
            return;
        }
        self.check_now();

        let (stop_tx, stop_rx) = bounded::<()>(1);
        let shared = self.shared.clone();
        let interval = self.health_check_interval;
        let handle = thread::spawn(move || loop {
            match stop_rx.recv_timeout(interval) {
                Err(RecvTimeoutError::Timeout) => {
                    run_check(&shared);
                }
                Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
            }
        });
        *ticker = Some(Ticker { stop_tx, handle });
    }

    /// Stop health checks and the active backend.
    pub fn stop(&self) {
        if let Ok(mut ticker) = self.ticker.lock() {
            if let Some(ticker) = ticker.take() {
                let _ = ticker.stop_tx.send(());
                let _ = ticker.handle.join();
            }
        }
        if let Ok(mut session) = self.shared.session.lock() {
            self.shared.deactivate(&mut session);
        }
    }

    /// Run one health check now. Returns `false` when another check or
    /// switch was already in progress and this one was skipped.
    pub fn check_now(&self) -> bool {
        run_check(&self.shared)
    }

    pub fn is_connected(&self) -> bool {
        let Ok(session) = self.shared.session.lock() else {
            return false;
        };
        session
            .active
            .is_some_and(|index| session.backends[index].is_connected())
    }

    pub fn active_controller_type(&self) -> ControllerType {
        self.shared
            .active_type
            .read()
            .map(|controller| *controller)
            .unwrap_or_default()
    }

    /// Replace the mapping; the active backend applies it on its next poll.
    pub fn update_button_mapping(&self, mapping: ButtonMapping) {
        if let Ok(mut current) = self.shared.mapping.write() {
            *current = mapping;
        }
        if let Ok(session) = self.shared.session.lock() {
            if let Some(index) = session.active {
                session.backends[index].update_button_mapping(mapping);
            }
        }
    }

    pub fn reset_navigation_state(&self) {
        if let Ok(session) = self.shared.session.lock() {
            if let Some(index) = session.active {
                session.backends[index].reset_navigation_state();
            }
        }
    }
}

impl Drop for Arbitrator {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Single-flight health check: a check that finds the session busy is a
/// no-op.
fn run_check(shared: &Arc<Shared>) -> bool {
    let mut session = match shared.session.try_lock() {
        Ok(session) => session,
        Err(TryLockError::WouldBlock) => {
            log::trace!("health check skipped, switch in progress");
            return false;
        }
        Err(TryLockError::Poisoned(_)) => return false,
    };

    if let Some(index) = session.active {
        if session.backends[index].is_connected() {
            return true;
        }
        log::info!(
            "{} controller disconnected",
            session.backends[index].controller_type()
        );
        shared.deactivate(&mut session);
    }

    for index in 0..session.backends.len() {
        if session.backends[index].try_connect() {
            shared.activate(&mut session, index);
            return true;
        }
    }

    if !session.announced_idle {
        session.announced_idle = true;
        log::info!("no controller found");
        shared.broadcast(PadEvent::ConnectionChanged {
            connected: false,
            controller: ControllerType::None,
        });
    }
    true
}

impl Shared {
    fn broadcast(&self, event: PadEvent) {
        if let Ok(mut subs) = self.subscribers.lock() {
            subs.retain(|tx| tx.send(event).is_ok());
        }
    }

    /// Deliver `event` only while `generation` is the current session.
    fn broadcast_from(&self, generation: u64, event: PadEvent) {
        if let Ok(mut subs) = self.subscribers.lock() {
            if self.generation.load(Ordering::Acquire) == generation {
                subs.retain(|tx| tx.send(event).is_ok());
            }
        }
    }

    /// Start a new session generation. Once this returns no sink of an
    /// older session delivers anything.
    fn next_generation(&self) -> u64 {
        let _subs = self.subscribers.lock();
        self.generation.fetch_add(1, Ordering::AcqRel) + 1
    }

    fn set_active_type(&self, controller: ControllerType) {
        if let Ok(mut active) = self.active_type.write() {
            *active = controller;
        }
    }

    fn deactivate(&self, session: &mut Session) {
        let Some(index) = session.active.take() else {
            return;
        };
        self.next_generation();
        session.backends[index].stop_polling();
        self.set_active_type(ControllerType::None);
    }

    fn activate(self: &Arc<Self>, session: &mut Session, index: usize) {
        let generation = self.next_generation();
        session.active = Some(index);
        session.announced_idle = false;
        let backend = &mut session.backends[index];
        let controller = backend.controller_type();
        let mapping = self.mapping.read().map(|m| *m).unwrap_or_default();
        backend.update_button_mapping(mapping);
        self.set_active_type(controller);
        log::info!("active controller: {controller}");
        self.broadcast(PadEvent::ConnectionChanged {
            connected: true,
            controller,
        });
        backend.start_polling(session_sink(Arc::downgrade(self), generation));
    }
}

fn session_sink(shared: Weak<Shared>, generation: u64) -> EventSink {
    Arc::new(move |event| {
        if let Some(shared) = shared.upgrade() {
            shared.broadcast_from(generation, event);
        }
    })
}
