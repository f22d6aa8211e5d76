use super::*;

fn spectral(num_peaks: u8, peak_magnitude: f32) -> SpectralResult {
    SpectralResult {
        dominant_frequency: Fixed::from_f32(150.0),
        peak_magnitude: Fixed::from_f32(peak_magnitude),
        spectral_centroid: Fixed::from_f32(200.0),
        num_peaks,
    }
}

fn inference(class: u8, confidence: f32) -> InferenceResult {
    InferenceResult {
        confidence: Fixed::from_f32(confidence),
        predicted_class: class,
    }
}

#[test]
fn test_activity_veto_overrides_inference() {
    let config = ThresholdConfig::default();

    // Too few peaks
    assert_eq!(
        evaluate(&spectral(0, 0.5), &inference(1, 0.9), BATTERY_NOMINAL_MV, &config),
        Decision::Sleep
    );
    assert_eq!(
        evaluate(&spectral(1, 0.5), &inference(1, 0.99), BATTERY_NOMINAL_MV, &config),
        Decision::Sleep
    );

    // Peak magnitude at or below the 0.1 floor
    assert_eq!(
        evaluate(&spectral(5, 0.01), &inference(1, 0.9), BATTERY_NOMINAL_MV, &config),
        Decision::Sleep
    );
    assert_eq!(
        evaluate(&spectral(5, 0.1), &inference(1, 0.9), BATTERY_NOMINAL_MV, &config),
        Decision::Sleep
    );

    // The veto is battery-independent
    assert_eq!(
        evaluate(&spectral(0, 0.01), &inference(1, 0.9), 2500, &config),
        Decision::Sleep
    );
}

#[test]
fn test_class_zero_always_sleeps() {
    let config = ThresholdConfig::default();

    for battery_mv in [2500, BATTERY_CRITICAL_MV, BATTERY_LOW_MV, 4100] {
        assert_eq!(
            evaluate(&spectral(5, 0.9), &inference(0, 0.99), battery_mv, &config),
            Decision::Sleep
        );
    }
}

#[test]
fn test_alert_on_high_confidence_anomaly() {
    let config = ThresholdConfig::default();

    let decision = evaluate(
        &spectral(3, 0.5),
        &inference(1, 0.85),
        BATTERY_NOMINAL_MV,
        &config,
    );
    assert_eq!(decision, Decision::TxAlert, "0.85 >= 0.65 at nominal battery");
}

#[test]
fn test_battery_scaling_raises_the_bar() {
    let config = ThresholdConfig::default();
    let result = inference(1, 0.70);

    // Nominal: 0.70 >= 0.65 transmits
    assert_eq!(
        evaluate(&spectral(3, 0.5), &result, 3700, &config),
        Decision::TxAlert
    );

    // Critical: effective threshold 0.65 * 1.5 = 0.975 > 0.70
    let at_critical = evaluate(&spectral(3, 0.5), &result, 2900, &config);
    assert_ne!(at_critical, Decision::TxAlert);
}

#[test]
fn test_uncertain_band_below_threshold() {
    let config = ThresholdConfig::default();

    // Critical battery: threshold 0.975, uncertain band starts at 0.6825.
    // 0.85 falls inside the band
    let decision = evaluate(&spectral(3, 0.5), &inference(1, 0.85), 2900, &config);
    assert_eq!(decision, Decision::TxUncertain);

    // Below the band sleeps
    let decision = evaluate(&spectral(3, 0.5), &inference(1, 0.60), 2900, &config);
    assert_eq!(decision, Decision::Sleep);
}

#[test]
fn test_scenario_a_nominal_alert() {
    let config = ThresholdConfig::default();
    let decision = evaluate(&spectral(3, 0.5), &inference(1, 0.85), 3700, &config);
    assert_eq!(decision, Decision::TxAlert);
}

#[test]
fn test_scenario_b_critical_downgrades_to_uncertain() {
    let config = ThresholdConfig::default();
    let decision = evaluate(&spectral(3, 0.5), &inference(1, 0.85), 2900, &config);
    assert_eq!(decision, Decision::TxUncertain);
}

#[test]
fn test_scenario_c_veto_fires_before_inference() {
    let config = ThresholdConfig::default();
    for battery_mv in [2500, 3100, 3700, 4200] {
        let decision = evaluate(&spectral(0, 0.01), &inference(1, 0.9), battery_mv, &config);
        assert_eq!(decision, Decision::Sleep);
    }
}

#[test]
fn test_model_uncertain_class_gates_on_energy_and_peaks() {
    let config = ThresholdConfig::default();
    let result = inference(2, 0.55);

    // Healthy battery and min_peaks + 1: exploratory transmission
    assert_eq!(
        evaluate(&spectral(3, 0.5), &result, BATTERY_LOW_MV, &config),
        Decision::TxUncertain
    );

    // Below the low tier: energy veto
    assert_eq!(
        evaluate(&spectral(3, 0.5), &result, BATTERY_LOW_MV - 1, &config),
        Decision::Sleep
    );

    // Exactly min_peaks is not enough for an exploratory transmission
    assert_eq!(
        evaluate(&spectral(2, 0.5), &result, BATTERY_NOMINAL_MV, &config),
        Decision::Sleep
    );
}

#[test]
fn test_unknown_class_sleeps() {
    let config = ThresholdConfig::default();
    for class in [3u8, 7, 255] {
        assert_eq!(
            evaluate(&spectral(5, 0.9), &inference(class, 0.99), BATTERY_NOMINAL_MV, &config),
            Decision::Sleep
        );
    }
}

#[test]
fn test_evaluate_is_pure() {
    let config = ThresholdConfig::default();
    let s = spectral(3, 0.5);
    let i = inference(1, 0.72);

    let first = evaluate(&s, &i, 3250, &config);
    for _ in 0..10 {
        assert_eq!(evaluate(&s, &i, 3250, &config), first);
    }
}

#[test]
fn test_effective_threshold_tiers() {
    let config = ThresholdConfig::default();

    assert_eq!(
        effective_threshold(BATTERY_NOMINAL_MV, &config),
        config.base_confidence_threshold
    );
    assert_eq!(
        effective_threshold(BATTERY_LOW_MV, &config),
        config.base_confidence_threshold
    );
    assert_eq!(
        effective_threshold(BATTERY_LOW_MV - 1, &config),
        config
            .base_confidence_threshold
            .mul(config.low_battery_multiplier)
    );
    assert_eq!(
        effective_threshold(BATTERY_CRITICAL_MV - 1, &config),
        config
            .base_confidence_threshold
            .mul(config.critical_battery_multiplier)
    );
}

#[test]
fn test_ratio_constants_match_their_float_values() {
    // The in-path constants are raw Q15.16 values; pin them to the float
    // ratios they encode so the hot path never needs from_f32
    assert_eq!(ACTIVITY_MAGNITUDE_FLOOR, Fixed::from_f32(0.1));
    assert_eq!(UNCERTAIN_BAND_RATIO, Fixed::from_f32(0.7));
}

#[test]
fn test_decision_string_rendering() {
    assert_eq!(Decision::Sleep.as_str(), "SLEEP");
    assert_eq!(Decision::TxAlert.as_str(), "TX_ALERT");
    assert_eq!(Decision::TxUncertain.as_str(), "TX_UNCERTAIN");
    assert_eq!(format!("{}", Decision::TxAlert), "TX_ALERT");
}
