//! Light and soil meters
//!
//! Readings are simulated. A [`MeterSession`] is started and stopped by the
//! user; while running it takes a fresh sample from its [`MeterSource`] once
//! per sample interval. Categories and advice are pure functions of the
//! latest reading.

use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::presentation::{IconKind, Rgb};

/// Light intensity on a 0-100 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LightReading {
    pub level: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightCategory {
    Low,
    Medium,
    High,
}

impl LightReading {
    pub fn category(&self) -> LightCategory {
        match self.level {
            0..=29 => LightCategory::Low,
            30..=69 => LightCategory::Medium,
            _ => LightCategory::High,
        }
    }

    pub fn recommendation(&self) -> &'static str {
        match self.category() {
            LightCategory::Low => "Perfect for snake plants, pothos, and ZZ plants",
            LightCategory::Medium => "Great for most houseplants like monstera and rubber plants",
            LightCategory::High => "Ideal for succulents, fiddle leaf figs, and flowering plants",
        }
    }
}

impl LightCategory {
    pub fn label(&self) -> &'static str {
        match self {
            LightCategory::Low => "Low Light",
            LightCategory::Medium => "Medium Light",
            LightCategory::High => "High Light",
        }
    }

    pub fn color(&self) -> Rgb {
        match self {
            LightCategory::Low => Rgb::GREY,
            LightCategory::Medium => Rgb::ORANGE,
            LightCategory::High => Rgb::AMBER,
        }
    }

    pub fn icon(&self) -> IconKind {
        match self {
            LightCategory::Low => IconKind::Cloud,
            LightCategory::Medium => IconKind::CloudSun,
            LightCategory::High => IconKind::Sun,
        }
    }
}

/// Soil moisture (0-100) and pH in tenths (40-100 = pH 4.0-10.0).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SoilReading {
    pub moisture: u8,
    ph_tenths: u8,
}

impl Default for SoilReading {
    fn default() -> Self {
        Self {
            moisture: 0,
            ph_tenths: 70,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoistureCategory {
    Dry,
    Optimal,
    Wet,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhCategory {
    Acidic,
    Neutral,
    Alkaline,
}

impl SoilReading {
    /// pH is clamped into 4.0..=10.0.
    pub fn new(moisture: u8, ph: f32) -> Self {
        let tenths = (ph * 10.0).round().clamp(40.0, 100.0) as u8;
        Self {
            moisture: moisture.min(100),
            ph_tenths: tenths,
        }
    }

    pub fn ph(&self) -> f32 {
        self.ph_tenths as f32 / 10.0
    }

    pub fn moisture_category(&self) -> MoistureCategory {
        match self.moisture {
            0..=29 => MoistureCategory::Dry,
            30..=69 => MoistureCategory::Optimal,
            _ => MoistureCategory::Wet,
        }
    }

    pub fn ph_category(&self) -> PhCategory {
        match self.ph_tenths {
            0..=59 => PhCategory::Acidic,
            60..=80 => PhCategory::Neutral,
            _ => PhCategory::Alkaline,
        }
    }

    pub fn moisture_advice(&self) -> &'static str {
        match self.moisture_category() {
            MoistureCategory::Dry => {
                "Your plant needs watering soon. Check soil depth before watering."
            }
            MoistureCategory::Optimal => "Perfect moisture level! Your plant is happy and healthy.",
            MoistureCategory::Wet => "Soil is quite wet. Avoid watering and ensure good drainage.",
        }
    }

    pub fn ph_advice(&self) -> &'static str {
        match self.ph_category() {
            PhCategory::Acidic => "Acidic soil. Good for blueberries, azaleas, and rhododendrons.",
            PhCategory::Neutral => "Neutral pH. Perfect for most houseplants and vegetables.",
            PhCategory::Alkaline => "Alkaline soil. Consider adding organic matter to lower pH.",
        }
    }
}

impl MoistureCategory {
    pub fn label(&self) -> &'static str {
        match self {
            MoistureCategory::Dry => "Dry",
            MoistureCategory::Optimal => "Optimal",
            MoistureCategory::Wet => "Wet",
        }
    }

    pub fn color(&self) -> Rgb {
        match self {
            MoistureCategory::Dry => Rgb::DEEP_ORANGE,
            MoistureCategory::Optimal => Rgb::GREEN,
            MoistureCategory::Wet => Rgb::BLUE,
        }
    }

    pub fn icon(&self) -> IconKind {
        match self {
            MoistureCategory::Dry => IconKind::AlertTriangle,
            MoistureCategory::Optimal => IconKind::CheckCircle,
            MoistureCategory::Wet => IconKind::Droplets,
        }
    }
}

impl PhCategory {
    pub fn label(&self) -> &'static str {
        match self {
            PhCategory::Acidic => "Acidic",
            PhCategory::Neutral => "Neutral",
            PhCategory::Alkaline => "Alkaline",
        }
    }

    pub fn color(&self) -> Rgb {
        match self {
            PhCategory::Acidic => Rgb::ORANGE,
            PhCategory::Neutral => Rgb::GREEN,
            PhCategory::Alkaline => Rgb::PURPLE,
        }
    }
}

/// Produces readings of type `R`.
pub trait MeterSource<R> {
    fn sample(&mut self) -> R;
}

/// Random readings, seedable for tests.
#[derive(Debug, Clone)]
pub struct SimulatedMeter {
    rng: StdRng,
}

impl SimulatedMeter {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for SimulatedMeter {
    fn default() -> Self {
        Self::new()
    }
}

impl MeterSource<LightReading> for SimulatedMeter {
    fn sample(&mut self) -> LightReading {
        LightReading {
            level: self.rng.gen_range(0..100),
        }
    }
}

impl MeterSource<SoilReading> for SimulatedMeter {
    fn sample(&mut self) -> SoilReading {
        SoilReading {
            moisture: self.rng.gen_range(0..100),
            ph_tenths: self.rng.gen_range(40..=100),
        }
    }
}

/// A start/stop measuring session.
#[derive(Debug, Clone)]
pub struct MeterSession<R> {
    reading: R,
    running: bool,
    interval: Duration,
    last_sample: Option<Instant>,
}

impl<R: Copy + Default> MeterSession<R> {
    pub fn new(interval: Duration) -> Self {
        Self {
            reading: R::default(),
            running: false,
            interval,
            last_sample: None,
        }
    }

    pub fn reading(&self) -> R {
        self.reading
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Start or stop. The last reading stays on screen after stopping.
    pub fn toggle(&mut self) -> bool {
        self.running = !self.running;
        self.last_sample = None;
        tracing::debug!(running = self.running, "Meter toggled");
        self.running
    }

    /// Take a sample if running and the interval has elapsed since the last
    /// one. The first poll after starting samples immediately.
    pub fn poll(&mut self, now: Instant, source: &mut dyn MeterSource<R>) -> Option<R> {
        if !self.running {
            return None;
        }
        let due = match self.last_sample {
            Some(last) => now.saturating_duration_since(last) >= self.interval,
            None => true,
        };
        if !due {
            return None;
        }
        self.reading = source.sample();
        self.last_sample = Some(now);
        Some(self.reading)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(u8);

    impl MeterSource<LightReading> for Fixed {
        fn sample(&mut self) -> LightReading {
            LightReading { level: self.0 }
        }
    }

    #[test]
    fn test_light_thresholds() {
        let cat = |level| LightReading { level }.category();
        assert_eq!(cat(0), LightCategory::Low);
        assert_eq!(cat(29), LightCategory::Low);
        assert_eq!(cat(30), LightCategory::Medium);
        assert_eq!(cat(69), LightCategory::Medium);
        assert_eq!(cat(70), LightCategory::High);
        assert_eq!(LightCategory::High.label(), "High Light");
    }

    #[test]
    fn test_soil_thresholds() {
        assert_eq!(SoilReading::new(10, 7.0).moisture_category(), MoistureCategory::Dry);
        assert_eq!(SoilReading::new(50, 7.0).moisture_category(), MoistureCategory::Optimal);
        assert_eq!(SoilReading::new(70, 7.0).moisture_category(), MoistureCategory::Wet);

        assert_eq!(SoilReading::new(50, 5.9).ph_category(), PhCategory::Acidic);
        assert_eq!(SoilReading::new(50, 6.0).ph_category(), PhCategory::Neutral);
        assert_eq!(SoilReading::new(50, 8.0).ph_category(), PhCategory::Neutral);
        assert_eq!(SoilReading::new(50, 8.1).ph_category(), PhCategory::Alkaline);
    }

    #[test]
    fn test_ph_is_clamped() {
        assert_eq!(SoilReading::new(0, 2.0).ph(), 4.0);
        assert_eq!(SoilReading::new(0, 14.0).ph(), 10.0);
        assert_eq!(SoilReading::default().ph(), 7.0);
    }

    #[test]
    fn test_simulated_readings_stay_in_range() {
        let mut meter = SimulatedMeter::seeded(7);
        for _ in 0..200 {
            let light: LightReading = meter.sample();
            assert!(light.level < 100);
            let soil: SoilReading = meter.sample();
            assert!((4.0..=10.0).contains(&soil.ph()));
        }
    }

    #[test]
    fn test_session_samples_on_interval() {
        let mut session = MeterSession::<LightReading>::new(Duration::from_secs(1));
        let mut source = Fixed(42);
        let start = Instant::now();

        assert_eq!(session.poll(start, &mut source), None);

        session.toggle();
        assert_eq!(session.poll(start, &mut source), Some(LightReading { level: 42 }));
        assert_eq!(session.poll(start + Duration::from_millis(500), &mut source), None);

        source.0 = 80;
        assert!(session.poll(start + Duration::from_secs(1), &mut source).is_some());
        assert_eq!(session.reading().category(), LightCategory::High);

        session.toggle();
        assert_eq!(session.poll(start + Duration::from_secs(5), &mut source), None);
        assert_eq!(session.reading().level, 80);
    }
}
