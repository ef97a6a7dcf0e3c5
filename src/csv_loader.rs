use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;
use std::time::Duration;

use anyhow::{anyhow, bail, ensure, Context, Result};
use csv::ReaderBuilder;

use crate::types::{Landmark, NUM_LANDMARKS};

/// Un frame de una grabación de landmarks
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedFrame {
    pub index: usize,
    /// Tiempo desde el inicio de la grabación
    pub time: Duration,
    /// `None` si el detector no vio ninguna mano en este frame.
    /// Puede tener un número de puntos distinto de 21 (entrada malformada).
    pub points: Option<Vec<Landmark>>,
}

#[derive(Default)]
struct FrameRows {
    time: Duration,
    no_hand: bool,
    points: BTreeMap<usize, Landmark>,
}

/// Carga una grabación en el formato frame,time,landmark,x,y,z.
///
/// Una fila con `landmark` vacío marca un frame sin mano.
pub fn load_recording(path: impl AsRef<Path>) -> Result<Vec<RecordedFrame>> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)
        .with_context(|| format!("No se pudo abrir el CSV {:?}", path))?;
    load_recording_from_reader(file).with_context(|| format!("Grabación inválida {:?}", path))
}

pub fn load_recording_from_reader<R: Read>(reader: R) -> Result<Vec<RecordedFrame>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut frames: BTreeMap<usize, FrameRows> = BTreeMap::new();

    for (row_idx, result) in reader.records().enumerate() {
        let row = row_idx + 1;
        let record = result.with_context(|| format!("Fila {} inválida", row))?;
        if record.len() < 6 {
            bail!("La fila {} no tiene 6 columnas", row);
        }

        let frame_idx: usize = record[0]
            .parse()
            .with_context(|| format!("frame inválido en fila {}", row))?;
        let secs: f64 = record[1]
            .parse()
            .with_context(|| format!("time inválido en fila {}", row))?;
        let time = Duration::try_from_secs_f64(secs)
            .with_context(|| format!("time fuera de rango en fila {}: {}", row, secs))?;

        let is_new = !frames.contains_key(&frame_idx);
        let frame = frames.entry(frame_idx).or_default();
        if is_new {
            frame.time = time;
        } else {
            ensure!(
                frame.time == time,
                "El frame {} tiene tiempos distintos ({:?} y {:?}) en fila {}",
                frame_idx,
                frame.time,
                time,
                row
            );
        }

        if record[2].is_empty() {
            frame.no_hand = true;
            continue;
        }

        let landmark: usize = record[2]
            .parse()
            .with_context(|| format!("landmark inválido en fila {}", row))?;
        if landmark >= NUM_LANDMARKS {
            bail!("Landmark {} fuera de rango (fila {})", landmark, row);
        }

        let x: f32 = record[3].parse().with_context(|| format!("x inválido en fila {}", row))?;
        let y: f32 = record[4].parse().with_context(|| format!("y inválido en fila {}", row))?;
        let z: f32 = record[5].parse().with_context(|| format!("z inválido en fila {}", row))?;

        if frame.points.insert(landmark, Landmark::new(x, y, z)).is_some() {
            bail!(
                "Landmark {} repetido en el frame {} (fila {})",
                landmark,
                frame_idx,
                row
            );
        }
    }

    if frames.is_empty() {
        return Err(anyhow!("La grabación no contiene frames"));
    }

    let mut out = Vec::with_capacity(frames.len());
    let mut last_time = Duration::ZERO;
    for (index, rows) in frames {
        ensure!(
            !(rows.no_hand && !rows.points.is_empty()),
            "El frame {} está marcado sin mano pero tiene landmarks",
            index
        );
        ensure!(
            rows.time >= last_time,
            "El tiempo retrocede en el frame {} ({:?} < {:?})",
            index,
            rows.time,
            last_time
        );
        last_time = rows.time;

        let points = if rows.no_hand {
            None
        } else {
            Some(rows.points.into_values().collect())
        };
        out.push(RecordedFrame {
            index,
            time: rows.time,
            points,
        });
    }

    Ok(out)
}
