use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender};

use super::{Backend, ReadOutcome, SharedSimulator, Source};
use crate::clock::Clock;
use crate::events::{EventSink, PadEvent};
use crate::mapping::ButtonMapping;
use crate::settings::Settings;
use crate::translate::{Frame, Translator};
use crate::types::ControllerType;

/// State shared between an adapter and its poll thread.
struct Control {
    mapping: RwLock<ButtonMapping>,
    reset_navigation: AtomicBool,
    connected: AtomicBool,
}

struct Worker {
    stop_tx: Sender<()>,
    done_rx: Receiver<()>,
    handle: JoinHandle<()>,
}

/// Runs a [`Source`] on a dedicated poll thread and translates its frames.
pub struct Adapter<S: Source> {
    source: Arc<Mutex<S>>,
    control: Arc<Control>,
    settings: Settings,
    clock: Arc<dyn Clock>,
    simulator: SharedSimulator,
    worker: Option<Worker>,
}

impl<S: Source> Adapter<S> {
    pub fn new(
        source: S,
        settings: Settings,
        mapping: ButtonMapping,
        clock: Arc<dyn Clock>,
        simulator: SharedSimulator,
    ) -> Self {
        Self {
            source: Arc::new(Mutex::new(source)),
            control: Arc::new(Control {
                mapping: RwLock::new(S::resolve_mapping(&mapping)),
                reset_navigation: AtomicBool::new(false),
                connected: AtomicBool::new(false),
            }),
            settings,
            clock,
            simulator,
            worker: None,
        }
    }

    /// The mapping currently applied to raw buttons.
    pub fn effective_mapping(&self) -> ButtonMapping {
        match self.control.mapping.read() {
            Ok(mapping) => *mapping,
            Err(_) => S::resolve_mapping(&ButtonMapping::default()),
        }
    }

    fn close_source(&self, wait: bool) {
        let source = if wait {
            self.source.lock().ok()
        } else {
            self.source.try_lock().ok()
        };
        if let Some(mut source) = source {
            source.close();
        }
    }
}

impl<S: Source> Backend for Adapter<S> {
    fn controller_type(&self) -> ControllerType {
        S::CONTROLLER_TYPE
    }

    fn try_connect(&mut self) -> bool {
        if self.is_connected() {
            return true;
        }
        let Ok(mut source) = self.source.lock() else {
            return false;
        };
        let connected = source.probe();
        self.control.connected.store(connected, Ordering::Release);
        if connected {
            log::info!("{} controller connected", S::CONTROLLER_TYPE);
        }
        connected
    }

    fn is_connected(&self) -> bool {
        self.control.connected.load(Ordering::Acquire)
    }

    fn start_polling(&mut self, sink: EventSink) {
        if self.worker.is_some() {
            return;
        }
        let (stop_tx, stop_rx) = bounded::<()>(1);
        let (done_tx, done_rx) = bounded::<()>(1);
        let poller = Poller {
            source: self.source.clone(),
            control: self.control.clone(),
            translator: Translator::new(&self.settings),
            clock: self.clock.clone(),
            simulator: self.simulator.clone(),
            sink,
            poll_interval: self.settings.polling.poll_interval,
        };
        let handle = thread::spawn(move || {
            poller.run(&stop_rx);
            let _ = done_tx.send(());
        });
        log::debug!("{} polling started", S::CONTROLLER_TYPE);
        self.worker = Some(Worker {
            stop_tx,
            done_rx,
            handle,
        });
    }

    fn stop_polling(&mut self) {
        let Some(worker) = self.worker.take() else {
            self.close_source(true);
            self.control.connected.store(false, Ordering::Release);
            return;
        };
        let _ = worker.stop_tx.send(());
        let timeout = self.settings.polling.stop_timeout;
        match worker.done_rx.recv_timeout(timeout) {
            Err(RecvTimeoutError::Timeout) => {
                log::warn!(
                    "{} poll loop did not stop within {timeout:?}, abandoning it",
                    S::CONTROLLER_TYPE
                );
                self.close_source(false);
            }
            Ok(()) | Err(RecvTimeoutError::Disconnected) => {
                let _ = worker.handle.join();
                self.close_source(true);
            }
        }
        self.control.connected.store(false, Ordering::Release);
        log::debug!("{} polling stopped", S::CONTROLLER_TYPE);
    }

    fn update_button_mapping(&self, mapping: ButtonMapping) {
        if let Ok(mut current) = self.control.mapping.write() {
            *current = S::resolve_mapping(&mapping);
        }
    }

    fn reset_navigation_state(&self) {
        self.control.reset_navigation.store(true, Ordering::Release);
    }
}

impl<S: Source> Drop for Adapter<S> {
    fn drop(&mut self) {
        if self.worker.is_some() {
            self.stop_polling();
        }
    }
}

/// Everything the poll thread owns.
struct Poller<S: Source> {
    source: Arc<Mutex<S>>,
    control: Arc<Control>,
    translator: Translator,
    clock: Arc<dyn Clock>,
    simulator: SharedSimulator,
    sink: EventSink,
    poll_interval: Duration,
}

impl<S: Source> Poller<S> {
    fn run(mut self, stop_rx: &Receiver<()>) {
        let self_heals = match self.source.lock() {
            Ok(source) => source.self_heals(),
            Err(_) => return,
        };
        let mut last_frame: Option<Frame> = None;

        loop {
            match stop_rx.recv_timeout(self.poll_interval) {
                Err(RecvTimeoutError::Timeout) => {}
                Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
            }

            if self.control.reset_navigation.swap(false, Ordering::AcqRel) {
                self.translator.reset_navigation();
            }

            let outcome = match self.source.lock() {
                Ok(mut source) => source.read(),
                Err(_) => break,
            };
            match outcome {
                ReadOutcome::Frame(frame) => {
                    self.mark_connected();
                    last_frame = Some(frame);
                    self.translate(&frame);
                }
                ReadOutcome::Idle => {
                    if let Some(frame) = last_frame {
                        self.translate(&frame);
                    }
                }
                ReadOutcome::Disconnected => {
                    last_frame = None;
                    self.mark_lost();
                    if !self_heals {
                        break;
                    }
                }
            }
        }
    }

    fn translate(&mut self, frame: &Frame) {
        let mapping = match self.control.mapping.read() {
            Ok(mapping) => *mapping,
            Err(_) => return,
        };
        let now = self.clock.now();
        let Ok(mut simulator) = self.simulator.lock() else {
            return;
        };
        let sink = &self.sink;
        self.translator
            .process(frame, &mapping, now, &mut **simulator, &mut |event| sink(event));
    }

    fn mark_connected(&mut self) {
        if !self.control.connected.swap(true, Ordering::AcqRel) {
            log::info!("{} controller reconnected", S::CONTROLLER_TYPE);
            (self.sink)(PadEvent::ConnectionChanged {
                connected: true,
                controller: S::CONTROLLER_TYPE,
            });
        }
    }

    fn mark_lost(&mut self) {
        if self.control.connected.swap(false, Ordering::AcqRel) {
            log::info!("{} controller lost", S::CONTROLLER_TYPE);
            self.translator.release_all();
            (self.sink)(PadEvent::ConnectionChanged {
                connected: false,
                controller: S::CONTROLLER_TYPE,
            });
        }
    }
}
