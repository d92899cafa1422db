//! Scene setup and the polling loop

use std::fmt::Debug;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use log::{debug, error, info, warn};
use segwall_core::{PinDriver, PollReport, Router, UpdateError, World};

use crate::config::{RegisterSection, SceneSection};

/// Build the scene and bring every register to zero
///
/// Order: greeting, pending events cleared, floor and air pad, marker
/// blocks, registers (lines, markers, walls), player.
pub fn setup_scene<W: World, P: PinDriver>(
    scene: &SceneSection,
    registers: &[RegisterSection],
    router: &mut Router,
    world: &mut W,
    pins: &mut P,
) -> Result<(), UpdateError<W::Error, P::Error>> {
    if let Some(greeting) = &scene.greeting {
        world.post_message(greeting).map_err(UpdateError::World)?;
    }
    world.clear_touches().map_err(UpdateError::World)?;

    if let Some(floor) = &scene.floor {
        debug!("floor {:?}", floor.slab());
        world
            .fill(floor.slab(), floor.block)
            .map_err(UpdateError::World)?;
        if let Some(pad) = floor.air_pad() {
            world
                .fill(pad, segwall_core::BlockType::AIR)
                .map_err(UpdateError::World)?;
        }
    }

    for section in registers {
        for marker in &section.markers {
            world
                .set_block(marker.pos, section.marker_block)
                .map_err(UpdateError::World)?;
        }
    }

    router.init(world, pins)?;

    if let Some(player) = scene.player {
        world
            .set_player_position(player)
            .map_err(UpdateError::World)?;
    }
    Ok(())
}

/// Log every toggle in a poll report
pub fn log_report(router: &Router, report: &PollReport) {
    if report.resynced > 0 {
        info!("resynced {} register(s)", report.resynced);
    }
    for hit in report.toggled.iter() {
        let name = router
            .register(hit.register)
            .map(|r| r.name())
            .unwrap_or("?");
        info!(
            "register={} bit={} {} value={}",
            name,
            hit.toggle.bit,
            if hit.toggle.on { "on" } else { "off" },
            hit.toggle.value
        );
    }
    if report.dropped > 0 {
        warn!(
            "{} touch(es) dropped on registers awaiting resync",
            report.dropped
        );
    }
    let missed = report
        .touches
        .saturating_sub(report.toggled.len() + report.dropped);
    if missed > 0 {
        debug!("{} touch(es) changed nothing", missed);
    }
}

/// Poll until `stop` is set
///
/// Failed polls are logged and retried on the next tick; the router
/// resyncs whatever the failure left stale.
pub fn run_loop<W, P>(
    router: &mut Router,
    world: &mut W,
    pins: &mut P,
    interval: Duration,
    stop: &AtomicBool,
) where
    W: World,
    P: PinDriver,
    W::Error: Debug,
    P::Error: Debug,
{
    info!("polling every {} ms; Ctrl-C to stop", interval.as_millis());
    while !stop.load(Ordering::SeqCst) {
        match router.poll(world, pins) {
            Ok(report) => log_report(router, &report),
            Err(failed) => {
                log_report(router, &failed.report);
                warn!("poll failed: {:?}", failed.error);
            }
        }
        thread::sleep(interval);
    }
    info!("stopped");
}

/// Drive every line low and release the driver
pub fn shutdown<P: PinDriver>(router: &mut Router, pins: &mut P)
where
    P::Error: Debug,
{
    match router.shutdown(pins) {
        Ok(()) => debug!("all lines low"),
        Err(e) => error!("shutdown incomplete: {:?}", e),
    }
}
