use std::env;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{anyhow, bail, Result};
use edugesture::cooldown::GateDecision;
use edugesture::finger::FingerStates;
use edugesture::provider::{LandmarkProvider, RecordingProvider};
use edugesture::types::HandLandmarks;
use edugesture::GestureDetector;

struct ReplayOptions {
    per_frame: bool,
}

fn parse_args() -> Result<(PathBuf, ReplayOptions)> {
    let mut per_frame = false;
    let mut csv_path: Option<PathBuf> = None;

    for arg in env::args().skip(1) {
        match arg.as_str() {
            "--per-frame" => per_frame = true,
            _ => {
                if csv_path.is_some() {
                    bail!("Uso: replay_landmarks [--per-frame] <grabacion.csv>");
                }
                csv_path = Some(PathBuf::from(arg));
            }
        }
    }

    let csv_path = csv_path.ok_or_else(|| anyhow!("Debes especificar un archivo CSV"))?;
    Ok((csv_path, ReplayOptions { per_frame }))
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let (csv_path, opts) = parse_args()?;
    println!("🎞️  Reproduciendo landmarks desde {:?}", csv_path);

    let mut provider = RecordingProvider::from_csv(&csv_path)?;
    let mut detector = GestureDetector::default();
    let origin = Instant::now();

    if opts.per_frame {
        println!(
            "\n{:>6} {:>9}  {:<9}  {:<12} {}",
            "frame", "t(s)", "dedos", "crudo", "decisión"
        );
    }

    for pos in 0..provider.len() {
        let frame = &provider.frames()[pos];
        let (index, time) = (frame.index, frame.time);

        let points = provider.detect(&pos)?;
        let fingers = points
            .as_deref()
            .and_then(|p| HandLandmarks::from_points(p).ok())
            .map(|hand| FingerStates::measure(&hand, detector.classifier().config()));

        let decision = detector.decide_points(points.as_deref(), origin + time);

        if opts.per_frame {
            let flags = match (&points, fingers) {
                (None, _) => "sin mano".to_string(),
                (Some(_), None) => "malformado".to_string(),
                (Some(_), Some(f)) => f.to_flags(),
            };
            let (raw, verdict) = match decision {
                GateDecision::NoGesture => ("-".to_string(), ""),
                GateDecision::Suppressed(det) => (det.label.to_string(), "suprimido"),
                GateDecision::Emitted(det) => (det.label.to_string(), "EMITIDO"),
            };
            println!(
                "{:>6} {:>9.3}  {:<9}  {:<12} {}",
                index,
                time.as_secs_f64(),
                flags,
                raw,
                verdict
            );
        } else if let GateDecision::Emitted(det) = decision {
            println!(
                "  {:>9.3}s  {:<12} {:>5.1}%",
                time.as_secs_f64(),
                det.label.display_text(),
                det.confidence * 100.0
            );
        }
    }

    let summary = detector.stats().summary();
    println!(
        "\n🗳️  {} frames, {} con mano, {} gestos emitidos, {} suprimidos",
        summary.frames, summary.frames_with_hand, summary.total_emitted, summary.suppressed
    );
    println!("{}", serde_json::to_string_pretty(&summary.gestures)?);

    Ok(())
}
