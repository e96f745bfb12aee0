//! Synthetic household load for trying the comparison without an export.

use chrono::{DateTime, Datelike, TimeDelta, Timelike};
use chrono_tz::Tz;
use rand::{Rng, SeedableRng, rngs::StdRng};
use tracing::warn;

use crate::billing::types::Reading;

/// Seeded hourly load generator.
///
/// Hourly energy is a daily sinusoid around `base_kwh` with an evening
/// peak, scaled up in winter months, plus Gaussian noise. Output is
/// clamped at zero and fully determined by the seed.
///
/// ```
/// use chrono::TimeZone;
/// use tariff_compare::demo::DemoLoad;
///
/// let start = chrono_tz::Tz::UTC.with_ymd_and_hms(2023, 9, 1, 0, 0, 0).unwrap();
/// let readings = DemoLoad::default().generate(start, 2, 42);
/// assert_eq!(readings.len(), 48);
/// ```
#[derive(Debug, Clone)]
pub struct DemoLoad {
    /// Mean hourly energy (kWh).
    pub base_kwh: f64,
    /// Amplitude of the daily swing (kWh).
    pub amp_kwh: f64,
    /// Hour of the daily peak.
    pub peak_hour: u32,
    /// Standard deviation of hourly noise (kWh).
    pub noise_std: f64,
    /// Extra load in December-February as a fraction of the daily shape.
    pub winter_boost: f64,
}

impl Default for DemoLoad {
    fn default() -> Self {
        Self {
            base_kwh: 0.9,
            amp_kwh: 0.5,
            peak_hour: 18,
            noise_std: 0.15,
            winter_boost: 0.35,
        }
    }
}

impl DemoLoad {
    /// Generates `days` of hourly readings beginning at `start`.
    ///
    /// Stops early if an hour would fall past the last representable date.
    pub fn generate(&self, start: DateTime<Tz>, days: u32, seed: u64) -> Vec<Reading> {
        let mut rng = StdRng::seed_from_u64(seed);
        let hours = i64::from(days) * 24;
        let readings: Vec<Reading> = (0..hours)
            .map_while(|h| start.checked_add_signed(TimeDelta::hours(h)))
            .map(|t| {
                let kwh = self.energy_kwh(&t, &mut rng);
                Reading::new(t, 3600, kwh)
            })
            .collect();

        if (readings.len() as i64) < hours {
            warn!(
                requested = hours,
                generated = readings.len(),
                "demo load truncated at the end of the calendar"
            );
        }
        readings
    }

    fn energy_kwh(&self, t: &DateTime<Tz>, rng: &mut StdRng) -> f64 {
        let offset = f64::from(t.hour()) - f64::from(self.peak_hour);
        let angle = 2.0 * std::f64::consts::PI * offset / 24.0;
        let shape = self.base_kwh + self.amp_kwh * angle.cos();
        let seasonal = match t.month() {
            12 | 1 | 2 => 1.0 + self.winter_boost,
            6..=8 => 1.0 + self.winter_boost / 2.0,
            _ => 1.0,
        };
        (shape * seasonal + gaussian_noise(rng, self.noise_std)).max(0.0)
    }
}

/// Gaussian noise with mean 0 via the Box-Muller transform.
pub fn gaussian_noise(rng: &mut StdRng, std_dev: f64) -> f64 {
    if std_dev <= 0.0 {
        return 0.0;
    }

    let u1: f64 = rng.random::<f64>().clamp(1e-9, 1.0);
    let u2: f64 = rng.random::<f64>();
    let z0 = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
    z0 * std_dev
}
