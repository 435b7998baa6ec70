//! Simulador de densidad de multitudes
//!
//! Función determinista de (ubicación, hora local del sitio, jitter) a
//! ocupación, nivel de densidad y desglose por secciones. Las únicas
//! fuentes de azar son los jitters, que se reciben a través de `Rng` para
//! poder fijar la semilla en tests.

use chrono::{DateTime, Datelike, FixedOffset, Timelike, Utc, Weekday};
use rand::Rng;
use tracing::debug;

use crate::models::density::{DensityLevel, DensityReading, SectionReading};
use crate::models::location::{
    base_coordinates, LocationProfile, ARAFAT, JAMARAAT_BRIDGE, LOCATIONS, MASJID_AL_HARAM, MINA,
    MUZDALIFAH,
};

// Modificadores horarios
const NIGHT: f64 = 0.7;
const EARLY_MORNING: f64 = 0.8;
const DURING_PRAYER: f64 = 2.5;
const AFTER_PRAYER: f64 = 1.8;
const BEFORE_PRAYER: f64 = 2.0;
const JAMARAT_PEAK: f64 = 3.0;
const TAWAF_PEAK: f64 = 2.5;
const HAJJ_DAY: f64 = 3.0;

const PRAYER_HOURS: [u32; 4] = [12, 15, 18, 20];
const AFTER_PRAYER_HOURS: [u32; 5] = [6, 13, 16, 19, 21];
const BEFORE_PRAYER_HOURS: [u32; 3] = [11, 14, 17];
const JAMARAT_HOURS: [u32; 7] = [6, 7, 8, 13, 14, 15, 16];
const TAWAF_HOURS: [u32; 6] = [5, 6, 7, 21, 22, 23];

// Modificadores climáticos
const HOT: f64 = 0.9;
const PLEASANT: f64 = 1.2;

const OCCUPANCY_JITTER: (f64, f64) = (0.95, 1.05);
const SECTION_JITTER: (f64, f64) = (0.9, 1.1);
const COORDINATE_JITTER_DEG: f64 = 0.00025;

/// Perfiles de la variedad forzada (índice mod 5), en personas por m².
/// Artefacto de demostración: garantiza que el mapa muestre los cuatro
/// niveles. No es un modelo físico.
const FORCED_PROFILES: [Option<f64>; 5] = [
    Some(1.5),  // high
    Some(0.75), // medium
    Some(3.0),  // critical
    Some(0.25), // low
    None,       // cálculo natural
];

/// Momento del día ya convertido a la hora local de los sitios
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SiteClock {
    pub hour: u32,
    pub minute: u32,
    pub weekday: Weekday,
}

impl SiteClock {
    pub fn at(now: DateTime<Utc>, offset: FixedOffset) -> Self {
        let local = now.with_timezone(&offset);
        Self {
            hour: local.hour(),
            minute: local.minute(),
            weekday: local.weekday(),
        }
    }

    /// Viernes, o cualquier minuto divisible por 3 (forzado para la demo)
    pub fn is_pilgrimage_day(&self) -> bool {
        self.weekday == Weekday::Fri || self.minute % 3 == 0
    }
}

#[derive(Debug, Clone)]
pub struct DensityModel {
    site_offset: FixedOffset,
    forced_variety: bool,
}

impl DensityModel {
    pub fn new(site_offset: FixedOffset, forced_variety: bool) -> Self {
        Self {
            site_offset,
            forced_variety,
        }
    }

    /// Una lectura por ubicación del catálogo, en el orden del catálogo
    pub fn compute_densities<R: Rng + ?Sized>(
        &self,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> Vec<DensityReading> {
        let clock = SiteClock::at(now, self.site_offset);
        let readings: Vec<DensityReading> = LOCATIONS
            .iter()
            .enumerate()
            .map(|(index, location)| self.compute_location(index, location, clock, now, rng))
            .collect();

        for reading in &readings {
            debug!(
                "📊 {}: {} ({:?})",
                reading.location_name, reading.density_level, reading.density
            );
        }

        readings
    }

    fn compute_location<R: Rng + ?Sized>(
        &self,
        index: usize,
        location: &LocationProfile,
        clock: SiteClock,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> DensityReading {
        let (base_occupancy, time_modifier) = match self.forced_profile(index) {
            Some(target_density) => (
                target_density * location.area_m2 / location.capacity as f64,
                1.0,
            ),
            None => (
                base_occupancy(location.name, clock),
                location_time_modifier(location.name, clock),
            ),
        };

        let modified = base_occupancy * time_modifier * weather_modifier(clock.hour);
        let final_occupancy = modified * rng.gen_range(OCCUPANCY_JITTER.0..OCCUPANCY_JITTER.1);

        let crowd_size = (final_occupancy * location.capacity as f64).floor() as i64;
        let density = crowd_size as f64 / location.area_m2;
        let density_level = DensityLevel::from_density(density);

        let sections = location
            .sections
            .iter()
            .map(|section| {
                let section_density =
                    density * rng.gen_range(SECTION_JITTER.0..SECTION_JITTER.1);
                SectionReading {
                    id: section.id.to_string(),
                    name: section.name.to_string(),
                    density: round_to(section_density, 2),
                    density_level: DensityLevel::from_density(section_density),
                    crowd_size: (crowd_size as f64 * section.share).floor() as i64,
                }
            })
            .collect();

        let mut coordinates = base_coordinates(location.name);
        coordinates.lng += rng.gen_range(-COORDINATE_JITTER_DEG..COORDINATE_JITTER_DEG);
        coordinates.lat += rng.gen_range(-COORDINATE_JITTER_DEG..COORDINATE_JITTER_DEG);

        DensityReading {
            location_name: location.name.to_string(),
            coordinates,
            density_level,
            density: Some(round_to(density, 2)),
            crowd_size: Some(crowd_size),
            capacity: Some(location.capacity as i64),
            occupancy_percentage: Some(round_to(
                crowd_size as f64 / location.capacity as f64 * 100.0,
                1,
            )),
            sections,
            updated_at: now,
        }
    }

    fn forced_profile(&self, index: usize) -> Option<f64> {
        if !self.forced_variety {
            return None;
        }
        FORCED_PROFILES[index % FORCED_PROFILES.len()]
    }
}

/// Modificador horario general; gana la primera regla que aplica
pub fn time_modifier(hour: u32) -> f64 {
    if hour >= 22 || hour < 4 {
        NIGHT
    } else if hour < 6 {
        EARLY_MORNING
    } else if PRAYER_HOURS.contains(&hour) {
        DURING_PRAYER
    } else if AFTER_PRAYER_HOURS.contains(&hour) {
        AFTER_PRAYER
    } else if BEFORE_PRAYER_HOURS.contains(&hour) {
        BEFORE_PRAYER
    } else {
        1.0
    }
}

/// Modificador horario con las excepciones por ubicación
pub fn location_time_modifier(location: &str, clock: SiteClock) -> f64 {
    match location {
        JAMARAAT_BRIDGE if JAMARAT_HOURS.contains(&clock.hour) => JAMARAT_PEAK,
        MASJID_AL_HARAM if TAWAF_HOURS.contains(&clock.hour) => TAWAF_PEAK,
        ARAFAT if clock.is_pilgrimage_day() => HAJJ_DAY,
        _ => time_modifier(clock.hour),
    }
}

pub fn weather_modifier(hour: u32) -> f64 {
    match hour {
        11..=15 => HOT,
        16..=18 => PLEASANT,
        _ => 1.0,
    }
}

/// Fracción de ocupación base según el patrón propio de cada ubicación
pub fn base_occupancy(location: &str, clock: SiteClock) -> f64 {
    let pilgrimage_day = clock.is_pilgrimage_day();
    match location {
        MASJID_AL_HARAM => 0.7 + (clock.hour % 3) as f64 * 0.1,
        JAMARAAT_BRIDGE if JAMARAT_HOURS.contains(&clock.hour) => 0.9,
        JAMARAAT_BRIDGE => 0.5,
        MINA if pilgrimage_day => 0.95,
        MINA => 0.6,
        ARAFAT if pilgrimage_day => 0.98,
        ARAFAT => 0.3,
        MUZDALIFAH if (18..=23).contains(&clock.hour) => 0.85,
        MUZDALIFAH => 0.4,
        _ => 0.4 + (clock.minute % 10) as f64 / 10.0,
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn utc_offset() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    // 2024-06-12 es miércoles
    fn wednesday(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 12, hour, minute, 0).unwrap()
    }

    fn clock(hour: u32, minute: u32, weekday: Weekday) -> SiteClock {
        SiteClock { hour, minute, weekday }
    }

    #[test]
    fn test_time_modifier_rules() {
        assert_eq!(time_modifier(23), NIGHT);
        assert_eq!(time_modifier(3), NIGHT);
        assert_eq!(time_modifier(5), EARLY_MORNING);
        assert_eq!(time_modifier(12), DURING_PRAYER);
        assert_eq!(time_modifier(19), AFTER_PRAYER);
        assert_eq!(time_modifier(14), BEFORE_PRAYER);
        assert_eq!(time_modifier(9), 1.0);
    }

    #[test]
    fn test_location_overrides() {
        let peak = clock(7, 1, Weekday::Wed);
        assert_eq!(location_time_modifier(JAMARAAT_BRIDGE, peak), JAMARAT_PEAK);
        assert_eq!(location_time_modifier(MASJID_AL_HARAM, peak), TAWAF_PEAK);
        assert_eq!(location_time_modifier(MINA, peak), time_modifier(7));

        assert_eq!(location_time_modifier(ARAFAT, clock(9, 1, Weekday::Fri)), HAJJ_DAY);
        assert_eq!(location_time_modifier(ARAFAT, clock(9, 3, Weekday::Mon)), HAJJ_DAY);
        assert_eq!(location_time_modifier(ARAFAT, clock(9, 1, Weekday::Mon)), 1.0);
    }

    #[test]
    fn test_weather_modifier() {
        assert_eq!(weather_modifier(11), HOT);
        assert_eq!(weather_modifier(15), HOT);
        assert_eq!(weather_modifier(16), PLEASANT);
        assert_eq!(weather_modifier(18), PLEASANT);
        assert_eq!(weather_modifier(19), 1.0);
    }

    #[test]
    fn test_base_occupancy_rules() {
        let plain_day = clock(10, 1, Weekday::Tue);
        assert!((base_occupancy(MASJID_AL_HARAM, plain_day) - 0.8).abs() < 1e-9);
        assert_eq!(base_occupancy(JAMARAAT_BRIDGE, plain_day), 0.5);
        assert_eq!(base_occupancy(JAMARAAT_BRIDGE, clock(8, 1, Weekday::Tue)), 0.9);
        assert_eq!(base_occupancy(MINA, plain_day), 0.6);
        assert_eq!(base_occupancy(MINA, clock(10, 1, Weekday::Fri)), 0.95);
        assert_eq!(base_occupancy(ARAFAT, plain_day), 0.3);
        assert_eq!(base_occupancy(MUZDALIFAH, clock(20, 1, Weekday::Tue)), 0.85);
        assert!((base_occupancy("Tent City Section A", clock(10, 7, Weekday::Tue)) - 1.1).abs() < 1e-9);
    }

    #[test]
    fn test_one_reading_per_location_in_catalogue_order() {
        let model = DensityModel::new(utc_offset(), true);
        let mut rng = StdRng::seed_from_u64(7);
        let readings = model.compute_densities(wednesday(10, 1), &mut rng);

        let names: Vec<&str> = readings.iter().map(|r| r.location_name.as_str()).collect();
        let expected: Vec<&str> = LOCATIONS.iter().map(|l| l.name).collect();
        assert_eq!(names, expected);
    }

    #[test]
    fn test_forced_variety_tiers_hold_for_every_hour() {
        let model = DensityModel::new(utc_offset(), true);
        let mut rng = StdRng::seed_from_u64(42);
        let expected = [
            Some(DensityLevel::High),
            Some(DensityLevel::Medium),
            Some(DensityLevel::Critical),
            Some(DensityLevel::Low),
            None,
        ];

        for hour in 0..24 {
            for minute in [0, 1, 2] {
                let readings = model.compute_densities(wednesday(hour, minute), &mut rng);
                for (index, reading) in readings.iter().enumerate() {
                    if let Some(level) = expected[index % 5] {
                        assert_eq!(
                            reading.density_level, level,
                            "{} at {}:{:02}",
                            reading.location_name, hour, minute
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_natural_model_is_stable_within_the_hour() {
        // Muzdalifah (índice 4) usa el cálculo natural: 0.85 * 1.8 a las 21h => ~2.46 personas/m²
        let model = DensityModel::new(utc_offset(), true);
        let mut rng = StdRng::seed_from_u64(3);
        for minute in 0..60 {
            let readings = model.compute_densities(wednesday(21, minute), &mut rng);
            assert_eq!(readings[4].location_name, MUZDALIFAH);
            assert_eq!(readings[4].density_level, DensityLevel::Critical);
        }
        // A las 10h: 0.4 * 1.0 => ~0.64, medium
        let readings = model.compute_densities(wednesday(10, 1), &mut rng);
        assert_eq!(readings[4].density_level, DensityLevel::Medium);
    }

    #[test]
    fn test_disabled_variety_uses_natural_model() {
        let model = DensityModel::new(utc_offset(), false);
        let mut rng = StdRng::seed_from_u64(11);
        // 02:01 miércoles: noche, sin día de peregrinación
        let readings = model.compute_densities(wednesday(2, 1), &mut rng);
        // Arafat: 0.3 * 0.7 => ~0.36 personas/m²
        assert_eq!(readings[3].density_level, DensityLevel::Low);
        // Puente: 0.5 * 0.7 * 300000 / 52000 => ~2.0, cerca del umbral
        let bridge = readings[2].density.unwrap();
        assert!((1.8..=2.2).contains(&bridge));
    }

    #[test]
    fn test_derived_fields_are_consistent() {
        let model = DensityModel::new(utc_offset(), true);
        let mut rng = StdRng::seed_from_u64(99);
        let now = wednesday(16, 4);
        for (reading, location) in model.compute_densities(now, &mut rng).iter().zip(LOCATIONS) {
            let crowd = reading.crowd_size.unwrap();
            assert_eq!(reading.capacity, Some(location.capacity as i64));
            assert_eq!(reading.updated_at, now);
            assert_eq!(reading.sections.len(), location.sections.len());
            for (section, profile) in reading.sections.iter().zip(location.sections) {
                assert_eq!(section.crowd_size, (crowd as f64 * profile.share).floor() as i64);
            }
            assert!((reading.coordinates.lng - location.base_point.lng).abs() <= COORDINATE_JITTER_DEG);
            assert!((reading.coordinates.lat - location.base_point.lat).abs() <= COORDINATE_JITTER_DEG);
            let pct = crowd as f64 / location.capacity as f64 * 100.0;
            assert!((reading.occupancy_percentage.unwrap() - pct).abs() <= 0.05 + 1e-9);
        }
    }

    #[test]
    fn test_site_clock_applies_offset() {
        let mecca = FixedOffset::east_opt(3 * 3600).unwrap();
        // jueves 22:30 UTC = viernes 01:30 en La Meca
        let now = Utc.with_ymd_and_hms(2024, 6, 13, 22, 30, 0).unwrap();
        let clock = SiteClock::at(now, mecca);
        assert_eq!(clock.hour, 1);
        assert_eq!(clock.weekday, Weekday::Fri);
        assert!(clock.is_pilgrimage_day());
    }
}
