use anyhow::{bail, Context, Result};
use api::{FrameInput, LandmarkSource, SourceLogger};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;
use std::time::Instant;

/// Parses a JSON Lines recording, one `FrameInput` per line. Blank lines and
/// lines starting with `#` are ignored.
pub fn parse_recording<R: BufRead>(reader: R) -> Result<Vec<FrameInput>> {
    let mut frames = Vec::new();
    for (number, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("Failed to read line {}", number + 1))?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let frame: FrameInput = serde_json::from_str(trimmed)
            .with_context(|| format!("Invalid frame on line {}", number + 1))?;
        frames.push(frame);
    }
    Ok(frames)
}

/// Plays back a recorded landmark session.
///
/// In real-time mode frames are released when the wall clock since start
/// passes their recorded offset; otherwise every update advances one frame.
/// Looping shifts timestamps by the recording length each pass so time keeps
/// moving forward.
pub struct ReplaySource {
    path: Option<PathBuf>,
    looping: bool,
    realtime: bool,
    frames: Vec<FrameInput>,
    cursor: usize,
    pass: u64,
    started: Option<Instant>,
    logger: Option<SourceLogger>,
}

impl ReplaySource {
    pub fn new(path: PathBuf, looping: bool) -> Self {
        Self {
            path: Some(path),
            looping,
            realtime: true,
            frames: Vec::new(),
            cursor: 0,
            pass: 0,
            started: None,
            logger: None,
        }
    }

    pub fn from_frames(frames: Vec<FrameInput>, looping: bool) -> Self {
        Self {
            path: None,
            looping,
            realtime: false,
            frames,
            cursor: 0,
            pass: 0,
            started: None,
            logger: None,
        }
    }

    pub fn with_realtime(mut self, realtime: bool) -> Self {
        self.realtime = realtime;
        self
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    fn first_timestamp(&self) -> f64 {
        self.frames.first().map_or(0.0, |f| f.timestamp_ms)
    }

    /// Duration of one pass, including one average frame interval so the
    /// first frame of the next pass lands after the last of this one.
    fn pass_length(&self) -> f64 {
        let (Some(first), Some(last)) = (self.frames.first(), self.frames.last()) else {
            return 0.0;
        };
        let span = (last.timestamp_ms - first.timestamp_ms).max(0.0);
        let count = self.frames.len() as f64;
        let interval = if count > 1.0 { span / (count - 1.0) } else { 1.0 };
        span + interval.max(1.0)
    }

    fn emit(&self, index: usize, pass: u64) -> FrameInput {
        let mut frame = self.frames[index].clone();
        frame.timestamp_ms += pass as f64 * self.pass_length();
        frame
    }

    fn wrap(&mut self) -> bool {
        if self.cursor < self.frames.len() {
            return true;
        }
        if !self.looping {
            return false;
        }
        self.cursor = 0;
        self.pass += 1;
        if let Some(logger) = &self.logger {
            logger.debug(&format!("Replay restarting (pass {})", self.pass + 1));
        }
        true
    }
}

impl LandmarkSource for ReplaySource {
    fn initialize(&mut self, logger: SourceLogger) -> Result<()> {
        if let Some(path) = &self.path {
            logger.info(&format!("Loading recording {:?}", path));
            let file =
                File::open(path).with_context(|| format!("Failed to open recording {:?}", path))?;
            self.frames = parse_recording(BufReader::new(file))?;
        }
        if self.frames.is_empty() {
            bail!("Recording contains no frames");
        }
        logger.info(&format!(
            "Replaying {} frames ({})",
            self.frames.len(),
            if self.looping { "looping" } else { "once" }
        ));
        self.cursor = 0;
        self.pass = 0;
        self.started = None;
        self.logger = Some(logger);
        Ok(())
    }

    fn update(&mut self, frame: &mut FrameInput) -> Result<()> {
        if !self.wrap() {
            return Ok(());
        }

        if !self.realtime {
            *frame = self.emit(self.cursor, self.pass);
            self.cursor += 1;
            return Ok(());
        }

        let started = *self.started.get_or_insert_with(Instant::now);
        let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
        let origin = self.first_timestamp();

        let mut released = None;
        while self.wrap() {
            let offset = self.frames[self.cursor].timestamp_ms - origin
                + self.pass as f64 * self.pass_length();
            if offset > elapsed_ms {
                break;
            }
            released = Some((self.cursor, self.pass));
            self.cursor += 1;
        }
        if let Some((index, pass)) = released {
            *frame = self.emit(index, pass);
        }
        Ok(())
    }

    fn unload(&mut self) {
        if let Some(logger) = &self.logger {
            logger.info(&format!(
                "Stopping replay at frame {} of pass {}",
                self.cursor,
                self.pass + 1
            ));
        }
        self.started = None;
    }

    fn finished(&self) -> bool {
        !self.looping && self.cursor >= self.frames.len()
    }
}
