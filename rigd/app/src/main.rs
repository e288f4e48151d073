use anyhow::{Context, Result};
use api::{FrameInput, SourceLogger};
use common::{FrameState, RetargetConfig, Retargeter, RigDescription};
use log::{debug, error, info, trace, warn};
use rigd::config::{load_config, DaemonConfig};
use rigd::handoff::{latest, Forward, FrameForwarder};
use rigd::output::{create_sink, PoseSink, PoseSnapshot};
use rigd::sources::{create_source, source_name};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::sync_channel;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

fn config_path() -> PathBuf {
    let args: Vec<String> = std::env::args().collect();
    args.iter()
        .position(|arg| arg == "--config")
        .and_then(|i| args.get(i + 1))
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("config.json"))
}

fn summarize(config: &RetargetConfig) {
    info!(
        "Smoothing {:.2} (head x{:.1}, expressions x{:.1}), mirror: {}, prefix: {:?}",
        config.smoothing_factor,
        config.head_smoothing_multiplier,
        config.expression_smoothing_multiplier,
        config.mirror,
        config.bone_prefix
    );
    if config.landmark_filter.enabled {
        info!(
            "Landmark filter on (min_cutoff {}, beta {})",
            config.landmark_filter.min_cutoff, config.landmark_filter.beta
        );
    }
}

fn main() -> Result<()> {
    if std::env::var("RUST_LOG").is_err() {
        unsafe {
            std::env::set_var("RUST_LOG", "info");
        }
    }
    env_logger::init();

    info!("Starting...");
    debug!("Debug logging is active");
    trace!("Trace logging is active");

    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();

    ctrlc::set_handler(move || {
        info!("Received Ctrl-C, shutting down...");
        r.store(false, Ordering::SeqCst);
    })
    .context("Error setting Ctrl-C handler")?;

    let config_path = config_path();
    let config = load_config(&config_path).unwrap_or_else(|e| {
        error!("Failed to load config: {:#}. Using defaults.", e);
        DaemonConfig::default()
    });
    debug!("Loaded Config: {:?}", config);
    summarize(&config.retarget);

    let rig = RigDescription::load(&config.rig_path)?;
    let (mut skeleton, mut meshes) = rig
        .build()
        .with_context(|| format!("Invalid rig description {:?}", config.rig_path))?;
    info!(
        "Rig ready: {} bones, {} morph meshes",
        skeleton.len(),
        meshes.len()
    );

    let mut retargeter = Retargeter::new(config.retarget.clone());
    if retargeter.bind(&skeleton) == 0 {
        warn!("No driven bones found in the rig. Check bone_prefix.");
    }

    let mut sink = create_sink(&config.output);
    if let Err(e) = sink.initialize() {
        error!("Failed to initialize pose sink: {}", e);
        return Err(e);
    }

    let name = source_name(&config.source);
    let mut source = create_source(&config.source);
    let logger = SourceLogger::new(name);
    match source.initialize(logger) {
        Ok(_) => info!("✓ Initialized source: {}", name),
        Err(e) => {
            error!("✗ Failed to initialize source {}: {:#}", name, e);
            return Err(e);
        }
    }

    let (tx, rx) = sync_channel::<FrameInput>(1);

    let running_producer = running.clone();

    let producer = thread::spawn(move || {
        info!("Producer Thread Started");

        let mut data = FrameInput::default();
        let mut forwarder = FrameForwarder::new();
        let mut reported_finished = false;
        while running_producer.load(Ordering::SeqCst) {
            if let Err(e) = source.update(&mut data) {
                debug!("Source update failed: {:#}", e);
            }

            match forwarder.forward(&tx, &data) {
                Forward::Sent => {}
                Forward::Full => thread::sleep(Duration::from_millis(1)),
                Forward::Unchanged => {
                    if source.finished() && !reported_finished {
                        info!("Source has no more frames");
                        reported_finished = true;
                    }
                    thread::sleep(Duration::from_millis(2));
                }
                Forward::Closed => break,
            }
        }

        source.unload();
    });

    info!("Entering Frame Loop...");

    let mut current: Option<FrameInput> = None;
    let mut was_active = false;
    let mut frame_count: u64 = 0;
    let mut log_interval: u64 = 1000;
    let mut last_log = Instant::now();
    let mut last_frame_time = Instant::now();
    let target_frame_duration = config.frame_duration();

    while running.load(Ordering::SeqCst) {
        let received = match target_frame_duration {
            Some(_) => latest(&rx),
            None => rx
                .recv_timeout(Duration::from_millis(100))
                .ok()
                .map(|first| latest(&rx).unwrap_or(first)),
        };
        if received.is_some() {
            current = received;
        }

        if let Some(frame) = current.as_ref() {
            let report = retargeter.tick(frame, &mut skeleton, &mut meshes);
            match report.state {
                FrameState::Active => {
                    if !was_active {
                        info!("Tracking active");
                    }
                    was_active = true;
                    #[cfg(feature = "xtralog")]
                    for skipped in &report.skipped {
                        debug!("Skipped {}: {}", skipped.bone, skipped.reason);
                    }

                    let snapshot = PoseSnapshot::capture(frame.timestamp_ms, &skeleton, &meshes);
                    if let Err(e) = sink.send(&snapshot) {
                        error!("Failed to send pose: {}", e);
                    }

                    frame_count += 1;
                    if frame_count.is_multiple_of(log_interval) {
                        let elapsed = last_log.elapsed().as_secs_f32();
                        let fps = log_interval as f32 / elapsed;
                        info!(
                            "Tracking Active: Processed {} frames (approx {:.1} FPS)",
                            frame_count, fps
                        );
                        last_log = Instant::now();

                        if frame_count >= 1_000_000 {
                            log_interval = 1_000_000;
                        } else if frame_count >= 100_000 {
                            log_interval = 100_000;
                        } else if frame_count >= 10_000 {
                            log_interval = 10_000;
                        }
                    }
                }
                FrameState::Idle => {
                    if was_active {
                        info!("Tracking lost");
                    }
                    was_active = false;
                }
                FrameState::Stale => trace!("No new frame since {}", frame.timestamp_ms),
                FrameState::Detached => break,
            }
        }

        if let Some(target_duration) = target_frame_duration {
            let elapsed = last_frame_time.elapsed();
            if elapsed < target_duration {
                thread::sleep(target_duration - elapsed);
            }
            last_frame_time = Instant::now();
        }
    }

    info!("Shutting down...");
    running.store(false, Ordering::SeqCst);
    drop(rx);
    if producer.join().is_err() {
        error!("Producer thread panicked");
    }
    retargeter.teardown();
    Ok(())
}
