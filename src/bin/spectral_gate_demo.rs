// Energy-adaptive demo for the spectral-gate decision core
//
// `schedule` replays a scripted day of operation showing how the same
// low-confidence data is transmitted at high battery, vetoed at low battery,
// and overridden by a safety-critical alert. `live` runs real acquisition
// cycles against the mock hardware's synthetic vibration.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};

use spectral_gate::decision::{effective_threshold, evaluate, Decision};
use spectral_gate::fixed::Fixed;
use spectral_gate::hal::{Hardware, MockHardware, VibrationPattern};
use spectral_gate::{InferenceResult, NodeConfig, SensorNode, SpectralResult};

#[derive(Parser, Debug)]
#[command(
    name = "spectral_gate_demo",
    about = "Battery-aware anomaly decision demo for the spectral-gate core"
)]
struct Cli {
    /// Path to a JSON node configuration (defaults are used when absent)
    #[arg(long)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Replay the scripted energy-adaptive day
    Schedule {
        /// Emit one JSON object per row instead of the table
        #[arg(long)]
        json: bool,
    },
    /// Run live cycles over synthesized vibration
    Live {
        #[arg(long, value_enum, default_value_t = PatternArg::Anomaly)]
        pattern: PatternArg,
        #[arg(long, default_value_t = 3700)]
        battery_mv: u16,
        #[arg(long, default_value_t = 12)]
        cycles: u32,
        /// Peak amplitude of the synthesized signal
        #[arg(long, default_value_t = 24000)]
        amplitude: i16,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum PatternArg {
    Noise,
    Sinusoid,
    Anomaly,
}

impl std::fmt::Display for PatternArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PatternArg::Noise => "noise",
            PatternArg::Sinusoid => "sinusoid",
            PatternArg::Anomaly => "anomaly",
        };
        f.write_str(name)
    }
}

impl From<PatternArg> for VibrationPattern {
    fn from(arg: PatternArg) -> Self {
        match arg {
            PatternArg::Noise => VibrationPattern::Noise,
            PatternArg::Sinusoid => VibrationPattern::Sinusoid,
            PatternArg::Anomaly => VibrationPattern::Anomaly,
        }
    }
}

fn main() -> ExitCode {
    env_logger::init();
    match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:?}");
            ExitCode::from(1)
        }
    }
}

fn run() -> Result<ExitCode> {
    let cli = Cli::parse();
    let config = cli
        .config
        .as_ref()
        .map(NodeConfig::load_from_file)
        .unwrap_or_default();

    match cli.command {
        Commands::Schedule { json } => run_schedule(&config, json),
        Commands::Live {
            pattern,
            battery_mv,
            cycles,
            amplitude,
        } => run_live(&config, pattern.into(), battery_mv, cycles, amplitude),
    }
}

/// One scripted observation of the day
struct Scenario {
    time: &'static str,
    phase: Option<&'static str>,
    battery_mv: u16,
    confidence: f32,
    predicted_class: u8,
    num_peaks: u8,
    peak_magnitude: f32,
}

const SCENARIOS: &[Scenario] = &[
    // Morning: abundant energy, low-confidence uncertain data is worth
    // transmitting for remote analysis
    Scenario { time: "06:00", phase: Some("MORNING - high energy, active learning"), battery_mv: 4100, confidence: 0.55, predicted_class: 2, num_peaks: 3, peak_magnitude: 0.5 },
    Scenario { time: "07:00", phase: None, battery_mv: 4100, confidence: 0.58, predicted_class: 2, num_peaks: 3, peak_magnitude: 0.5 },
    Scenario { time: "08:00", phase: None, battery_mv: 4050, confidence: 0.52, predicted_class: 2, num_peaks: 3, peak_magnitude: 0.5 },
    Scenario { time: "09:00", phase: None, battery_mv: 4000, confidence: 0.60, predicted_class: 2, num_peaks: 4, peak_magnitude: 0.5 },
    // Evening: same uncertain data, but the battery is critical
    Scenario { time: "17:00", phase: Some("EVENING - low energy, conservation"), battery_mv: 2900, confidence: 0.55, predicted_class: 2, num_peaks: 3, peak_magnitude: 0.5 },
    Scenario { time: "18:00", phase: None, battery_mv: 2850, confidence: 0.58, predicted_class: 2, num_peaks: 3, peak_magnitude: 0.5 },
    Scenario { time: "19:00", phase: None, battery_mv: 2800, confidence: 0.52, predicted_class: 2, num_peaks: 3, peak_magnitude: 0.5 },
    Scenario { time: "20:00", phase: None, battery_mv: 2750, confidence: 0.60, predicted_class: 2, num_peaks: 4, peak_magnitude: 0.5 },
    // Night: confirmed damage overrides energy conservation
    Scenario { time: "21:00", phase: Some("DAMAGE - safety-critical override"), battery_mv: 2700, confidence: 0.98, predicted_class: 1, num_peaks: 5, peak_magnitude: 0.9 },
    Scenario { time: "21:30", phase: None, battery_mv: 2650, confidence: 0.99, predicted_class: 1, num_peaks: 6, peak_magnitude: 0.95 },
    Scenario { time: "22:00", phase: None, battery_mv: 2600, confidence: 0.985, predicted_class: 1, num_peaks: 5, peak_magnitude: 0.85 },
    Scenario { time: "22:30", phase: None, battery_mv: 2550, confidence: 0.995, predicted_class: 1, num_peaks: 7, peak_magnitude: 0.98 },
];

#[derive(serde::Serialize)]
struct ScheduleRow<'a> {
    time: &'a str,
    battery_mv: u16,
    confidence: f32,
    effective_threshold: f32,
    decision: &'static str,
}

fn run_schedule(config: &NodeConfig, json: bool) -> Result<ExitCode> {
    let thresholds = config.thresholds.to_thresholds();
    let mut hw = MockHardware::with_battery(4100);

    if !json {
        println!("Spectral-Gate energy-adaptive schedule");
        println!(
            "base threshold {:.0}% | low x{} | critical x{} | tiers: critical <3000mV, low <3300mV",
            config.thresholds.base_confidence_threshold * 100.0,
            config.thresholds.low_battery_multiplier,
            config.thresholds.critical_battery_multiplier,
        );
        println!();
        println!("{:<8} {:>10} {:>12} {:>11} {:>14}", "time", "V_bat(mV)", "confidence", "threshold", "decision");
    }

    let mut alerts = 0u32;
    let mut uncertain = 0u32;
    let mut sleeps = 0u32;

    for scenario in SCENARIOS {
        if let Some(phase) = scenario.phase {
            if !json {
                println!("--- {} ---", phase);
            }
        }

        let spectral = SpectralResult {
            dominant_frequency: Fixed::from_f32(150.0),
            peak_magnitude: Fixed::from_f32(scenario.peak_magnitude),
            spectral_centroid: Fixed::from_f32(200.0),
            num_peaks: scenario.num_peaks,
        };
        let inference = InferenceResult {
            confidence: Fixed::from_f32(scenario.confidence),
            predicted_class: scenario.predicted_class,
        };

        hw.set_battery_mv(scenario.battery_mv);
        let decision = evaluate(&spectral, &inference, scenario.battery_mv, &thresholds);
        let threshold = effective_threshold(scenario.battery_mv, &thresholds).to_f32();

        match decision {
            Decision::TxAlert => {
                alerts += 1;
                hw.transmit(spectral_gate::AlertKind::Confirmed, (scenario.confidence * 100.0) as u8);
            }
            Decision::TxUncertain => {
                uncertain += 1;
                hw.transmit(spectral_gate::AlertKind::Uncertain, (scenario.confidence * 100.0) as u8);
            }
            Decision::Sleep => {
                sleeps += 1;
                hw.sleep(1000);
            }
        }

        if json {
            let row = ScheduleRow {
                time: scenario.time,
                battery_mv: scenario.battery_mv,
                confidence: scenario.confidence,
                effective_threshold: threshold,
                decision: decision.as_str(),
            };
            println!("{}", serde_json::to_string(&row)?);
        } else {
            println!(
                "{:<8} {:>10} {:>11.1}% {:>10.1}% {:>14}",
                scenario.time,
                scenario.battery_mv,
                scenario.confidence * 100.0,
                threshold * 100.0,
                decision.as_str()
            );
        }
    }

    if !json {
        println!();
        println!(
            "summary: {} TX_ALERT, {} TX_UNCERTAIN, {} SLEEP | {} transmissions, {} ms asleep",
            alerts,
            uncertain,
            sleeps,
            hw.transmit_count(),
            hw.total_sleep_ms()
        );
    }

    Ok(ExitCode::from(0))
}

fn run_live(
    config: &NodeConfig,
    pattern: VibrationPattern,
    battery_mv: u16,
    cycles: u32,
    amplitude: i16,
) -> Result<ExitCode> {
    let node = SensorNode::from_config(config);
    let mut hw = MockHardware::with_battery(battery_mv);
    hw.set_pattern(pattern);
    hw.set_signal_amplitude(amplitude);

    for _ in 0..cycles {
        let report = node.run_cycle(&mut hw);
        println!("{}", serde_json::to_string(&report)?);
    }

    eprintln!(
        "live run: {} transmissions, {} ms asleep",
        hw.transmit_count(),
        hw.total_sleep_ms()
    );

    Ok(ExitCode::from(0))
}
