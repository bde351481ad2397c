// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drive a camera with scripted touch input and print where it ends up.
//!
//! Run:
//! - `cargo run -p understory_demos --example gesture_camera`
//! - `RUST_LOG=debug cargo run -p understory_demos --example gesture_camera`

use kurbo::{Point, Vec2};
use understory_demos::{Camera, Host, script};
use understory_gesture::{FrameError, GestureConfig, GestureEngine};

fn report(label: &str, host: &Host<Camera>) {
    let camera = host.listener();
    println!(
        "{label:>12} @ {:>5} ms: origin=({:8.2}, {:8.2}) zoom={:6.3} angle={:7.2}deg clicks={} double={} long={} flings={}",
        host.now(),
        camera.origin().x,
        camera.origin().y,
        camera.zoom,
        camera.angle.to_degrees(),
        camera.clicks,
        camera.double_clicks,
        camera.long_clicks,
        camera.flings_ended,
    );
}

fn main() -> Result<(), FrameError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    // A 2x density screen, like most phones.
    let config = GestureConfig::default().with_density(2.0);
    let mut host = Host::new(GestureEngine::new(config), Camera::default(), 16);
    let center = Point::new(400.0, 300.0);

    let mut t = 0;
    host.play(&script::tap(center, t))?;
    host.settle();
    report("tap", &host);

    t = host.now() + 1_000;
    host.play(&script::tap(center, t))?;
    host.play(&script::tap(center + Vec2::new(2.0, 1.0), t + 150))?;
    host.settle();
    report("double tap", &host);

    t = host.now() + 1_000;
    host.play(&script::pan(center, Vec2::new(1_200.0, -400.0), 12, t, 16))?;
    report("pan", &host);
    host.settle();
    report("pan fling", &host);

    t = host.now() + 1_000;
    host.play(&script::pinch(center, 60.0, 150.0, 12, t, 16))?;
    report("pinch", &host);
    host.settle();
    report("pinch fling", &host);

    t = host.now() + 1_000;
    host.play(&script::twist(center, 120.0, 1.2, 16, t, 16))?;
    report("twist", &host);
    host.settle();
    report("twist fling", &host);

    t = host.now() + 1_000;
    host.play(&script::hold(center, t, 700))?;
    host.settle();
    report("long press", &host);

    Ok(())
}
