use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use crossbeam_channel::{bounded, Receiver, Sender};
use padbridge_control::NullSimulator;
use padbridge_gamepad::platform::{XInputPort, XInputState};
use padbridge_gamepad::{
    Adapter, Arbitrator, Backend, ButtonMapping, ControllerType, Direction, EventSink,
    LogicalButton, PadEvent, Settings, SharedSimulator, SystemClock, XInputSource,
};

/// Counts concurrently polling backends across a whole test.
#[derive(Default)]
struct Overlap {
    polling: AtomicUsize,
    max: AtomicUsize,
}

/// Scripted backend: the test plugs and unplugs it and drives its sink.
struct FakeBackend {
    controller: ControllerType,
    present: Arc<AtomicBool>,
    connected: bool,
    polling: bool,
    overlap: Arc<Overlap>,
    sink: Arc<Mutex<Option<EventSink>>>,
    /// When set, `try_connect` reports on the sender, then blocks until
    /// the test sends on the receiver.
    gate: Option<(Sender<()>, Receiver<()>)>,
}

impl FakeBackend {
    fn new(controller: ControllerType, overlap: &Arc<Overlap>) -> Self {
        Self {
            controller,
            present: Arc::new(AtomicBool::new(false)),
            connected: false,
            polling: false,
            overlap: overlap.clone(),
            sink: Arc::default(),
            gate: None,
        }
    }
}

impl Backend for FakeBackend {
    fn controller_type(&self) -> ControllerType {
        self.controller
    }

    fn try_connect(&mut self) -> bool {
        if let Some((entered, release)) = &self.gate {
            let _ = entered.send(());
            let _ = release.recv_timeout(Duration::from_secs(5));
        }
        if !self.connected {
            self.connected = self.present.load(Ordering::SeqCst);
        }
        self.connected
    }

    fn is_connected(&self) -> bool {
        self.connected && self.present.load(Ordering::SeqCst)
    }

    fn start_polling(&mut self, sink: EventSink) {
        assert!(!self.polling, "{} started twice", self.controller);
        self.polling = true;
        let now = self.overlap.polling.fetch_add(1, Ordering::SeqCst) + 1;
        self.overlap.max.fetch_max(now, Ordering::SeqCst);
        *self.sink.lock().unwrap() = Some(sink);
    }

    fn stop_polling(&mut self) {
        if self.polling {
            self.polling = false;
            self.overlap.polling.fetch_sub(1, Ordering::SeqCst);
        }
        self.connected = false;
    }

    fn update_button_mapping(&self, _mapping: ButtonMapping) {}

    fn reset_navigation_state(&self) {}
}

/// Handles a test keeps after moving a backend into the arbitrator.
struct Handle {
    present: Arc<AtomicBool>,
    sink: Arc<Mutex<Option<EventSink>>>,
}

impl Handle {
    fn plug(&self, present: bool) {
        self.present.store(present, Ordering::SeqCst);
    }

    fn sink(&self) -> EventSink {
        self.sink.lock().unwrap().clone().expect("backend never started")
    }
}

fn handle(backend: &FakeBackend) -> Handle {
    Handle {
        present: backend.present.clone(),
        sink: backend.sink.clone(),
    }
}

fn arbitrator(backends: Vec<FakeBackend>) -> Arbitrator {
    let boxed = backends
        .into_iter()
        .map(|backend| Box::new(backend) as Box<dyn Backend>)
        .collect();
    Arbitrator::new(boxed, ButtonMapping::default(), Duration::from_secs(3600))
}

fn trio(overlap: &Arc<Overlap>) -> (Vec<FakeBackend>, [Handle; 3]) {
    let ps = FakeBackend::new(ControllerType::PlayStation, overlap);
    let xinput = FakeBackend::new(ControllerType::XInput, overlap);
    let generic = FakeBackend::new(ControllerType::GenericHid, overlap);
    let handles = [handle(&ps), handle(&xinput), handle(&generic)];
    (vec![ps, xinput, generic], handles)
}

#[test]
fn highest_priority_present_backend_wins() {
    let overlap = Arc::new(Overlap::default());
    let (backends, [ps, xinput, generic]) = trio(&overlap);
    xinput.plug(true);
    generic.plug(true);
    ps.plug(true);
    let arbitrator = arbitrator(backends);
    let rx = arbitrator.subscribe();

    assert!(arbitrator.check_now());
    assert_eq!(arbitrator.active_controller_type(), ControllerType::PlayStation);
    assert!(arbitrator.is_connected());

    ps.plug(false);
    assert!(arbitrator.check_now());
    assert_eq!(arbitrator.active_controller_type(), ControllerType::XInput);

    let changes: Vec<_> = rx.try_iter().collect();
    assert_eq!(
        changes,
        vec![
            PadEvent::ConnectionChanged {
                connected: true,
                controller: ControllerType::PlayStation,
            },
            PadEvent::ConnectionChanged {
                connected: true,
                controller: ControllerType::XInput,
            },
        ]
    );
}

#[test]
fn active_backend_is_kept_while_connected() {
    let overlap = Arc::new(Overlap::default());
    let (backends, [ps, xinput, _generic]) = trio(&overlap);
    xinput.plug(true);
    let arbitrator = arbitrator(backends);
    arbitrator.check_now();
    assert_eq!(arbitrator.active_controller_type(), ControllerType::XInput);

    ps.plug(true);
    arbitrator.check_now();
    assert_eq!(arbitrator.active_controller_type(), ControllerType::XInput);
}

#[test]
fn never_two_backends_polling() {
    let overlap = Arc::new(Overlap::default());
    let (backends, [ps, xinput, generic]) = trio(&overlap);
    let arbitrator = arbitrator(backends);

    let plan = [
        (false, true, true),
        (true, true, true),
        (false, false, true),
        (false, true, false),
        (false, false, false),
        (true, false, true),
        (false, true, true),
    ];
    for _ in 0..5 {
        for (p, x, g) in plan {
            ps.plug(p);
            xinput.plug(x);
            generic.plug(g);
            arbitrator.check_now();
            assert!(overlap.polling.load(Ordering::SeqCst) <= 1);
        }
    }
    arbitrator.stop();
    assert_eq!(overlap.max.load(Ordering::SeqCst), 1);
    assert_eq!(overlap.polling.load(Ordering::SeqCst), 0);
}

#[test]
fn events_from_replaced_backend_are_dropped() {
    let overlap = Arc::new(Overlap::default());
    let (backends, [_ps, xinput, generic]) = trio(&overlap);
    xinput.plug(true);
    generic.plug(true);
    let arbitrator = arbitrator(backends);
    let rx = arbitrator.subscribe();
    arbitrator.check_now();

    let old = xinput.sink();
    old(PadEvent::ButtonPressed(LogicalButton::A));

    xinput.plug(false);
    arbitrator.check_now();
    assert_eq!(arbitrator.active_controller_type(), ControllerType::GenericHid);

    old(PadEvent::ButtonPressed(LogicalButton::A));
    generic.sink()(PadEvent::ButtonPressed(LogicalButton::A));

    let presses = rx
        .try_iter()
        .filter(|event| *event == PadEvent::ButtonPressed(LogicalButton::A))
        .count();
    assert_eq!(presses, 2);
}

#[test]
fn every_subscriber_gets_each_event_once() {
    let overlap = Arc::new(Overlap::default());
    let (backends, [_ps, xinput, _generic]) = trio(&overlap);
    xinput.plug(true);
    let arbitrator = arbitrator(backends);
    let first = arbitrator.subscribe();
    let second = arbitrator.subscribe();
    arbitrator.check_now();
    xinput.sink()(PadEvent::ButtonPressed(LogicalButton::B));

    for rx in [first, second] {
        let presses = rx
            .try_iter()
            .filter(|event| matches!(event, PadEvent::ButtonPressed(_)))
            .count();
        assert_eq!(presses, 1);
    }
}

#[test]
fn check_during_switch_is_skipped() {
    let overlap = Arc::new(Overlap::default());
    let mut slow = FakeBackend::new(ControllerType::XInput, &overlap);
    let (entered_tx, entered_rx) = bounded(1);
    let (release_tx, release_rx) = bounded(1);
    slow.gate = Some((entered_tx, release_rx));
    let slow_handle = handle(&slow);
    slow_handle.plug(true);
    let arbitrator = Arc::new(arbitrator(vec![slow]));

    let background = {
        let arbitrator = arbitrator.clone();
        thread::spawn(move || arbitrator.check_now())
    };
    entered_rx.recv_timeout(Duration::from_secs(5)).unwrap();
    assert!(!arbitrator.check_now());
    release_tx.send(()).unwrap();
    assert!(background.join().unwrap());
    assert_eq!(arbitrator.active_controller_type(), ControllerType::XInput);
}

/// Xbox pad scripted per slot.
#[derive(Default)]
struct FakeXInput {
    slots: [Option<XInputState>; 4],
}

impl XInputPort for FakeXInput {
    fn get_state(&mut self, slot: u32) -> Option<XInputState> {
        self.slots.get(slot as usize).copied().flatten()
    }
}

#[test]
fn xinput_dpad_up_reaches_subscribers() {
    let mut port = FakeXInput::default();
    port.slots[0] = Some(XInputState {
        buttons: 0x0001,
        ..XInputState::default()
    });
    let mut settings = Settings::default();
    settings.polling.poll_interval = Duration::from_millis(1);
    let simulator: SharedSimulator = Arc::new(Mutex::new(Box::new(NullSimulator)));
    let adapter = Adapter::new(
        XInputSource::new(port),
        settings,
        ButtonMapping::default(),
        Arc::new(SystemClock),
        simulator,
    );
    let arbitrator = Arbitrator::new(
        vec![Box::new(adapter)],
        ButtonMapping::default(),
        Duration::from_secs(3600),
    );
    let rx = arbitrator.subscribe();
    assert!(arbitrator.check_now());

    assert_eq!(
        rx.recv_timeout(Duration::from_secs(1)).unwrap(),
        PadEvent::ConnectionChanged {
            connected: true,
            controller: ControllerType::XInput,
        }
    );
    let direction = rx
        .iter()
        .find(|event| matches!(event, PadEvent::DirectionChanged(_)));
    assert_eq!(direction, Some(PadEvent::DirectionChanged(Direction::Up)));
    arbitrator.stop();
}
