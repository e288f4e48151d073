use glam::Vec3;

/// Fallback sampling rate when no frame interval is known yet.
const DEFAULT_HZ: f32 = 30.0;

/// One Euro filter over a single scalar channel, driven by the real frame
/// interval instead of a fixed rate.
#[derive(Debug, Clone, Copy)]
pub struct EuroFilter {
    min_cutoff: f32,
    beta: f32,
    d_cutoff: f32,
    hz: f32,
    x_prev: f32,
    dx_prev: f32,
    raw_x_prev: f32,
    initialized: bool,
}

impl Default for EuroFilter {
    fn default() -> Self {
        Self {
            min_cutoff: 1.0,
            beta: 0.5,
            d_cutoff: 1.0,
            hz: DEFAULT_HZ,
            x_prev: 0.0,
            dx_prev: 0.0,
            raw_x_prev: 0.0,
            initialized: false,
        }
    }
}

impl EuroFilter {
    pub fn new(min_cutoff: f32, beta: f32) -> Self {
        Self {
            min_cutoff: min_cutoff.max(1e-3),
            beta: beta.max(0.0),
            ..Default::default()
        }
    }

    fn alpha(hz: f32, cutoff: f32) -> f32 {
        let tau = 1.0 / (2.0 * std::f32::consts::PI * cutoff);
        let te = 1.0 / hz;
        1.0 / (1.0 + tau / te)
    }

    fn low_pass(hat_x_prev: &mut f32, x: f32, alpha: f32) -> f32 {
        let hat_x = alpha * x + (1.0 - alpha) * *hat_x_prev;
        *hat_x_prev = hat_x;
        hat_x
    }

    pub fn reset(&mut self) {
        self.initialized = false;
        self.hz = DEFAULT_HZ;
    }

    /// Filters `x` sampled `dt` seconds after the previous sample. A missing
    /// or non-positive `dt` keeps the last known rate. NaN input holds the
    /// previous output.
    pub fn filter(&mut self, x: f32, dt: Option<f32>) -> f32 {
        if x.is_nan() {
            return self.x_prev;
        }

        if let Some(dt) = dt {
            if dt > 0.0 && dt.is_finite() {
                self.hz = 1.0 / dt;
            }
        }

        if !self.initialized {
            self.initialized = true;
            self.raw_x_prev = x;
            self.x_prev = x;
            self.dx_prev = 0.0;
            return x;
        }

        let dx = (x - self.raw_x_prev) * self.hz;
        self.raw_x_prev = x;

        let edx = Self::low_pass(&mut self.dx_prev, dx, Self::alpha(self.hz, self.d_cutoff));
        let cutoff = self.min_cutoff + self.beta * edx.abs();

        Self::low_pass(&mut self.x_prev, x, Self::alpha(self.hz, cutoff))
    }
}

/// Three independent One Euro channels for a landmark position.
#[derive(Debug, Clone, Copy, Default)]
pub struct PointFilter {
    x: EuroFilter,
    y: EuroFilter,
    z: EuroFilter,
}

impl PointFilter {
    pub fn new(min_cutoff: f32, beta: f32) -> Self {
        Self {
            x: EuroFilter::new(min_cutoff, beta),
            y: EuroFilter::new(min_cutoff, beta),
            z: EuroFilter::new(min_cutoff, beta),
        }
    }

    pub fn reset(&mut self) {
        self.x.reset();
        self.y.reset();
        self.z.reset();
    }

    pub fn filter(&mut self, point: Vec3, dt: Option<f32>) -> Vec3 {
        Vec3::new(
            self.x.filter(point.x, dt),
            self.y.filter(point.y, dt),
            self.z.filter(point.z, dt),
        )
    }
}
