//! End-to-end spin scenarios driven through a fake host loop.

use std::cell::RefCell;
use std::rc::Rc;

use luckydraw_ui::{
    Bitmap, CommandRecorder, DrawError, Environment, FrameQueue, GridConfig, ImageLoader,
    ImageRequest, ImageSender, LuckyGrid, LuckyWheel, PrizeConfig, WheelConfig,
};

const FRAME: f64 = 16.6;

type Wheel = LuckyWheel<CommandRecorder, FrameQueue>;
type Grid = LuckyGrid<CommandRecorder, FrameQueue>;
type Landings = Rc<RefCell<Vec<(usize, PrizeConfig)>>>;

/// Never answers on its own; the test decides when and how.
#[derive(Clone, Default)]
struct Deferred(Rc<RefCell<Vec<ImageSender>>>);

impl ImageLoader for Deferred {
    fn load(&mut self, _request: &ImageRequest, sender: ImageSender) {
        self.0.borrow_mut().push(sender);
    }
}

fn wheel_doc(prizes: usize, extra: &str) -> String {
    let mut doc = String::from(
        r##"
        buttons = [{ radius = "35%", pointer = true, background = "#617df2" }]

        [defaultConfig]
        speed = 20
        accelerationTime = 100
        decelerationTime = 100
        "##,
    );
    doc.push_str(extra);
    for i in 0..prizes {
        doc.push_str(&format!("\n[[prizes]]\nname = \"prize-{i}\"\n"));
    }
    doc
}

fn grid_doc(prizes: usize) -> String {
    let mut doc = String::from(
        r##"
        [defaultConfig]
        speed = 20
        accelerationTime = 100
        decelerationTime = 100

        [button]
        x = 2
        y = 2
        "##,
    );
    for i in 0..prizes {
        doc.push_str(&format!("\n[[prizes]]\nx = {}\ny = {}\n", i % 3, i / 3));
    }
    doc
}

fn wheel(doc: &str, loader: Deferred) -> (Wheel, Landings) {
    let mut wheel = LuckyWheel::new(Environment::default(), FrameQueue::new(), loader);
    wheel.attach(CommandRecorder::new(), 300.0, 300.0);
    wheel
        .configure(WheelConfig::from_toml(doc).unwrap(), 0.0)
        .unwrap();
    let landings = Landings::default();
    let sink = Rc::clone(&landings);
    wheel.on_end(move |index, prize| sink.borrow_mut().push((index, prize)));
    (wheel, landings)
}

fn grid(doc: &str, loader: Deferred) -> (Grid, Landings) {
    let mut grid = LuckyGrid::new(Environment::default(), FrameQueue::new(), loader);
    grid.attach(CommandRecorder::new(), 300.0, 300.0);
    grid.configure(GridConfig::from_toml(doc).unwrap(), 0.0)
        .unwrap();
    let landings = Landings::default();
    let sink = Rc::clone(&landings);
    grid.on_end(move |index, prize| sink.borrow_mut().push((index, prize)));
    (grid, landings)
}

/// Delivers requested frames every `FRAME` ms until `until`.
fn run_wheel(wheel: &mut Wheel, now: &mut f64, until: f64) {
    while *now < until {
        *now += FRAME;
        if wheel.scheduler_mut().take_pending().is_some() {
            wheel.on_frame(*now);
        }
    }
}

fn run_grid(grid: &mut Grid, now: &mut f64, until: f64) {
    while *now < until {
        *now += FRAME;
        if grid.scheduler_mut().take_pending().is_some() {
            grid.on_frame(*now);
        }
    }
}

/// Test: a four-prize wheel lands on the armed prize and can spin again.
#[test]
fn test_wheel_lands_on_stop_index() {
    let (mut wheel, landings) = wheel(&wheel_doc(4, ""), Deferred::default());
    let mut now = 0.0;

    assert!(wheel.click(150.0, 150.0));
    assert!(wheel.play(now));
    run_wheel(&mut wheel, &mut now, 120.0);
    assert!(wheel.is_spinning());

    wheel.stop(2);
    run_wheel(&mut wheel, &mut now, 600.0);

    let landed = landings.borrow();
    assert_eq!(landed.len(), 1);
    assert_eq!(landed[0].0, 2);
    assert_eq!(landed[0].1.extra["name"].as_str(), Some("prize-2"));
    assert!(!wheel.is_spinning());
    assert!(!wheel.frame_pending());
    assert!((wheel.rotation() - 180.0).abs() < 1e-9);
    drop(landed);

    assert!(wheel.play(now));
}

/// Test: `stop(i)` lands on `i mod N` for edge indices and several sizes.
#[test]
fn test_stop_index_is_normalized() {
    for n in [1_usize, 3, 8] {
        for raw in [0, n as i64 - 1, n as i64, n as i64 + 1, -1] {
            let expected = raw.rem_euclid(n as i64) as usize;

            let (mut wheel, wheel_landings) = wheel(&wheel_doc(n, ""), Deferred::default());
            let mut now = 0.0;
            wheel.play(now);
            wheel.stop(raw);
            run_wheel(&mut wheel, &mut now, 1_000.0);
            assert_eq!(
                wheel_landings.borrow().iter().map(|l| l.0).collect::<Vec<_>>(),
                vec![expected],
                "wheel n={n} stop({raw})"
            );

            let (mut grid, grid_landings) = grid(&grid_doc(n), Deferred::default());
            let mut now = 0.0;
            grid.play(now);
            grid.stop(raw);
            run_grid(&mut grid, &mut now, 1_000.0);
            assert_eq!(
                grid_landings.borrow().iter().map(|l| l.0).collect::<Vec<_>>(),
                vec![expected],
                "grid n={n} stop({raw})"
            );
            assert_eq!(grid.active_index(), Some(expected));
        }
    }
}

/// Test: arming early changes nothing until the acceleration window ends.
#[test]
fn test_grid_early_stop_waits_for_acceleration() {
    let doc = r##"
        [defaultConfig]
        accelerationTime = 100
        decelerationTime = 100

        [button]
        x = 1
        y = 1

        [[prizes]]
        x = 0
        y = 0
        [[prizes]]
        x = 1
        y = 0
        [[prizes]]
        x = 2
        y = 0
        [[prizes]]
        x = 2
        y = 1
        [[prizes]]
        x = 2
        y = 2
        [[prizes]]
        x = 1
        y = 2
        [[prizes]]
        x = 0
        y = 2
        [[prizes]]
        x = 0
        y = 1
    "##;
    let (mut grid, landings) = grid(doc, Deferred::default());
    let mut now = 0.0;

    assert!(grid.click(150.0, 150.0));
    grid.play(now);
    grid.stop(0);
    run_grid(&mut grid, &mut now, 80.0);
    assert!(grid.is_spinning());
    assert!(landings.borrow().is_empty());

    run_grid(&mut grid, &mut now, 1_000.0);
    assert_eq!(landings.borrow().len(), 1);
    assert_eq!(landings.borrow()[0].0, 0);
    assert_eq!(grid.active_index(), Some(0));
}

/// Test: play while spinning is ignored and does not restart the spin.
#[test]
fn test_play_is_not_reentrant() {
    let (mut wheel, landings) = wheel(&wheel_doc(4, ""), Deferred::default());
    let mut now = 0.0;
    assert!(wheel.play(now));
    run_wheel(&mut wheel, &mut now, 50.0);
    assert!(!wheel.play(now));
    assert!(!wheel.click(150.0, 150.0));

    wheel.stop(1);
    run_wheel(&mut wheel, &mut now, 1_000.0);
    assert_eq!(landings.borrow().len(), 1);
}

/// Test: first full draw waits for every image, answered from any thread.
#[test]
fn test_image_barrier_gates_clicks_and_bitmaps() {
    let loader = Deferred::default();
    let extra = "\n[[prizes]]\nimgs = [{ src = \"a.png\" }, { src = \"b.png\" }]\n";
    let (mut wheel, _) = wheel(&wheel_doc(1, extra), loader.clone());
    let mut now = 0.0;

    assert!(!wheel.is_ready());
    assert!(!wheel.click(150.0, 150.0));
    assert_eq!(loader.0.borrow().len(), 2);

    let first = loader.0.borrow_mut().remove(0);
    first.resolve(Bitmap::new(1, 10.0, 10.0));
    run_wheel(&mut wheel, &mut now, 40.0);
    assert!(!wheel.is_ready());

    let second = loader.0.borrow_mut().remove(0);
    std::thread::spawn(move || second.resolve(Bitmap::new(2, 10.0, 10.0)))
        .join()
        .unwrap();
    run_wheel(&mut wheel, &mut now, 80.0);

    assert!(wheel.is_ready());
    assert_eq!(wheel.surface().unwrap().images(), vec![1, 2]);
    assert!(wheel.click(150.0, 150.0));
    assert!(!wheel.frame_pending());
}

/// Test: a hanging image cannot stall the widget past the timeout.
#[test]
fn test_image_timeout_releases_barrier() {
    let loader = Deferred::default();
    let doc = r##"
        [defaultConfig]
        imageTimeout = 500

        [button]
        x = 1
        y = 1

        [[prizes]]
        imgs = [{ src = "slow.png", activeSrc = "slow-on.png" }]
    "##;
    let (mut grid, _) = grid(doc, loader.clone());
    let mut now = 0.0;

    run_grid(&mut grid, &mut now, 450.0);
    assert!(!grid.is_ready());
    run_grid(&mut grid, &mut now, 520.0);

    assert!(grid.is_ready());
    assert_eq!(
        grid.image_errors(),
        &[DrawError::ImageTimeout {
            pending: 1,
            timeout_ms: 500
        }]
    );

    // A late answer is harmless.
    let late = loader.0.borrow_mut().remove(0);
    late.resolve(Bitmap::new(3, 1.0, 1.0));
    run_grid(&mut grid, &mut now, 560.0);
    assert!(grid.click(150.0, 150.0));
}

/// Test: resizing mid-spin swaps the pending frame and keeps spinning.
#[test]
fn test_resize_reschedules_spin() {
    let (mut wheel, landings) = wheel(&wheel_doc(4, ""), Deferred::default());
    let mut now = 0.0;
    wheel.play(now);
    run_wheel(&mut wheel, &mut now, 50.0);

    wheel.resize(200.0, 200.0);
    assert_eq!(wheel.scheduler().cancelled(), 1);
    assert!(wheel.frame_pending());
    assert_eq!(wheel.layout().radius, 100.0);

    wheel.stop(3);
    run_wheel(&mut wheel, &mut now, 1_000.0);
    assert_eq!(landings.borrow()[0].0, 3);
}

/// Test: reconfiguring abandons the spin without reporting a landing.
#[test]
fn test_reconfigure_abandons_spin() {
    let (mut wheel, landings) = wheel(&wheel_doc(4, ""), Deferred::default());
    let mut now = 0.0;
    wheel.play(now);
    wheel.stop(1);
    run_wheel(&mut wheel, &mut now, 150.0);

    wheel
        .configure(WheelConfig::from_toml(&wheel_doc(6, "")).unwrap(), now)
        .unwrap();
    run_wheel(&mut wheel, &mut now, 1_000.0);

    assert!(!wheel.is_spinning());
    assert!(landings.borrow().is_empty());
    assert_eq!(wheel.model().prizes.len(), 6);
}
