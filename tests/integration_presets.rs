//! Preset and TOML tariff loading.

mod common;

use std::path::Path;

use approx::assert_abs_diff_eq;
use tariff_compare::Error;
use tariff_compare::billing::engine::Engine;
use tariff_compare::billing::tiered::TieredMethod;
use tariff_compare::billing::types::{Period, Reading, Scheme};
use tariff_compare::config::TariffConfig;

#[test]
fn all_presets_build_engines() {
    for name in TariffConfig::PRESETS {
        let cfg = TariffConfig::from_preset(name).unwrap();
        assert!(Engine::from_config(&cfg).is_ok(), "preset {name}");
    }
}

#[test]
fn bundled_toml_matches_ontario_holidays_preset() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tariffs/ontario.toml");
    let cfg = TariffConfig::from_toml_file(&path).unwrap();
    assert_eq!(cfg, TariffConfig::ontario_holidays());
}

#[test]
fn canada_day_is_off_peak_with_holidays() {
    // Monday 2024-07-01 12:00 in Toronto is 16:00 UTC.
    let reading = [Reading::new(common::utc(2024, 7, 1, 16), 3600, 1.0)];

    let plain = common::ontario_engine().classify(&reading).unwrap();
    assert_eq!(plain[0].tou_period, Period::MidPeak);

    let engine = Engine::from_config(&TariffConfig::ontario_holidays()).unwrap();
    let holiday = engine.classify(&reading).unwrap();
    assert!(holiday[0].is_holiday);
    assert_eq!(holiday[0].hour_of_day, 12);
    assert_eq!(holiday[0].tou_period, Period::OffPeak);
    assert_eq!(holiday[0].ulo_period, Period::OffPeak);
}

#[test]
fn custom_tariff_changes_the_winner() {
    // Flat 5 cent tiered plan beats every time-of-use price.
    let toml = r#"
[tiered]
method = "whole_month"
tier1_cents = 5.0
tier2_cents = 5.0
"#;
    let cfg = TariffConfig::from_toml_str(toml).unwrap();
    assert_eq!(cfg.tiered.method, TieredMethod::WholeMonth);
    let engine = Engine::from_config(&cfg).unwrap();

    let readings = common::hourly(common::utc(2023, 12, 4, 0), 24 * 5, 1.0);
    let report = engine.run(&readings).unwrap();
    let m = &report.months[0];
    assert_eq!(m.best_scheme, Scheme::Tiered);
    assert_abs_diff_eq!(m.tiered_cost, 120.0 * 0.05, epsilon = 1e-9);
}

#[test]
fn tariff_with_missing_rate_is_rejected() {
    let toml = r#"
[ulo.rates]
on_peak = 28.6
mid_peak = 12.2
off_peak = 8.7
"#;
    let cfg = TariffConfig::from_toml_str(toml).unwrap();
    let err = Engine::from_config(&cfg).unwrap_err();
    assert!(matches!(err, Error::Config(_)));
    assert!(err.to_string().contains("ulo.rates"));
}

#[test]
fn tariff_with_unknown_period_fails_to_parse() {
    let toml = r#"
[tou.rates]
super_peak = 40.0
"#;
    assert!(TariffConfig::from_toml_str(toml).is_err());
}
