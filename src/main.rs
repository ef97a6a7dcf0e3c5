/*
Detector de gestos en tiempo real sobre grabaciones de landmarks.

El detector de mano (cámara + modelo de landmarks) corre fuera de este
programa y deja sus resultados en un CSV frame,time,landmark,x,y,z. Aquí:
1. Un hilo reproduce la grabación y envía cada frame por un canal
2. El hilo principal clasifica cada frame y aplica el cooldown
3. Los gestos aceptados se imprimen y, opcionalmente, se registran en CSV

Uso:
    edugesture <grabacion.csv> [--config detector.json] [--log gesture_log.csv] [--realtime]

RUST_LOG=debug muestra también los gestos suprimidos.
*/

use std::env;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{anyhow, bail, Context, Result};
use crossbeam_channel::{bounded, select};

use edugesture::csv_loader::{load_recording, RecordedFrame};
use edugesture::event_log::CsvGestureLog;
use edugesture::{DetectorConfig, GestureDetector};

const CHANNEL_CAPACITY: usize = 100;
const IDLE_MARGIN: Duration = Duration::from_secs(5);

struct Options {
    recording: PathBuf,
    config: Option<PathBuf>,
    log: Option<PathBuf>,
    realtime: bool,
}

const USAGE: &str =
    "Uso: edugesture <grabacion.csv> [--config detector.json] [--log gesture_log.csv] [--realtime]";

fn parse_args() -> Result<Options> {
    let mut recording: Option<PathBuf> = None;
    let mut config = None;
    let mut log = None;
    let mut realtime = false;

    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                config = Some(PathBuf::from(args.next().ok_or_else(|| anyhow!(USAGE))?));
            }
            "--log" => {
                log = Some(PathBuf::from(args.next().ok_or_else(|| anyhow!(USAGE))?));
            }
            "--realtime" => realtime = true,
            _ => {
                if recording.is_some() {
                    bail!(USAGE);
                }
                recording = Some(PathBuf::from(arg));
            }
        }
    }

    Ok(Options {
        recording: recording.ok_or_else(|| anyhow!(USAGE))?,
        config,
        log,
        realtime,
    })
}

/// Instante de reloj sintético para un frame grabado
fn frame_instant(origin: Instant, time: Duration) -> Result<Instant> {
    origin
        .checked_add(time)
        .ok_or_else(|| anyhow!("Tiempo de frame fuera de rango: {:?}", time))
}

/// Tiempo máximo sin recibir frames antes de abandonar. Cubre tanto el
/// primer frame (que puede no estar en t=0) como el mayor hueco entre frames.
fn idle_timeout(frames: &[RecordedFrame]) -> Duration {
    let lead_in = frames.first().map(|f| f.time).unwrap_or_default();
    let longest_gap = frames
        .windows(2)
        .map(|w| w[1].time.saturating_sub(w[0].time))
        .max()
        .unwrap_or_default();
    lead_in.max(longest_gap).saturating_add(IDLE_MARGIN)
}

/// Envía los frames por el canal; con `realtime` respeta los tiempos grabados
fn spawn_player(
    frames: Vec<RecordedFrame>,
    start: Instant,
    realtime: bool,
) -> crossbeam_channel::Receiver<RecordedFrame> {
    let (tx, rx) = bounded::<RecordedFrame>(CHANNEL_CAPACITY);
    std::thread::spawn(move || {
        for frame in frames {
            if realtime {
                if let Some(due) = start.checked_add(frame.time) {
                    let now = Instant::now();
                    if due > now {
                        std::thread::sleep(due - now);
                    }
                }
            }
            if tx.send(frame).is_err() {
                return;
            }
        }
    });
    rx
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let opts = parse_args()?;

    let config = match &opts.config {
        Some(path) => DetectorConfig::from_json_file(path)
            .with_context(|| format!("No se pudo cargar la configuración {:?}", path))?,
        None => DetectorConfig::default(),
    };
    log::info!(
        "Cooldown {:.2}s, OK < {:.3}, señalar |x| > {:.2}",
        config.cooldown_secs,
        config.ok_touch_distance,
        config.pointing_min_x
    );

    let frames = load_recording(&opts.recording)?;
    log::info!("Grabación {:?}: {} frames", opts.recording, frames.len());

    let mut detector = GestureDetector::new(config);
    if let Some(path) = &opts.log {
        let sink = CsvGestureLog::create(path)
            .with_context(|| format!("No se pudo crear el log {:?}", path))?;
        detector.set_sink(Box::new(sink));
        log::info!("Registrando gestos en {:?}", path);
    }

    // Reloj sintético: el tiempo del frame manda, no el de llegada
    let clock_origin = Instant::now();
    // Los tiempos no decrecen: si el último cabe, caben todos
    if let Some(last) = frames.last() {
        frame_instant(clock_origin, last.time)
            .with_context(|| format!("Grabación demasiado larga (frame {})", last.index))?;
    }
    let timeout = idle_timeout(&frames);

    let rx = spawn_player(frames, clock_origin, opts.realtime);

    println!("🎬 Reconocimiento iniciado\n");

    loop {
        select! {
            recv(rx) -> msg => {
                match msg {
                    Ok(frame) => {
                        let now = frame_instant(clock_origin, frame.time)?;
                        let det = detector.classify_points(frame.points.as_deref(), now);
                        if det.is_gesture() {
                            println!(
                                "[{:>8.3}s] frame {:>5}: {} ({}) conf {:.0}%",
                                frame.time.as_secs_f64(),
                                frame.index,
                                det.label,
                                det.label.display_text(),
                                det.confidence * 100.0
                            );
                        }
                    }
                    // El reproductor terminó
                    Err(_) => break,
                }
            }
            default(timeout) => {
                log::warn!("Sin frames durante {:?}, terminando", timeout);
                break;
            }
        }
    }

    let summary = detector.stats().summary();
    println!("\n📊 Resumen:");
    println!("{}", serde_json::to_string_pretty(&summary)?);

    Ok(())
}
