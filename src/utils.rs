use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use crate::error::{Error, Result};
use crate::types::{Point, Stroke};

const TRACE_HEADER: &str = "stroke,x,y,t,force";

/// Write strokes as `stroke,x,y,t,force` rows. Missing force is an empty field.
pub fn export_strokes_to_csv(path: impl AsRef<Path>, strokes: &[Stroke]) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    writeln!(writer, "{TRACE_HEADER}")?;
    for (index, stroke) in strokes.iter().enumerate() {
        for p in stroke {
            match p.force {
                Some(force) => writeln!(writer, "{},{},{},{},{}", index, p.x, p.y, p.t, force)?,
                None => writeln!(writer, "{},{},{},{},", index, p.x, p.y, p.t)?,
            }
        }
    }
    writer.flush()?;
    Ok(())
}

/// Read a trace written by [`export_strokes_to_csv`].
///
/// Consecutive rows sharing a stroke index form one stroke.
pub fn load_strokes_from_csv(path: impl AsRef<Path>) -> Result<Vec<Stroke>> {
    let reader = BufReader::new(File::open(path)?);
    let mut strokes: Vec<Stroke> = Vec::new();
    let mut current_index: Option<usize> = None;

    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = i + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() || (line_no == 1 && trimmed == TRACE_HEADER) {
            continue;
        }

        let (index, point) = parse_row(trimmed, line_no)?;
        if current_index == Some(index) {
            if let Some(stroke) = strokes.last_mut() {
                stroke.push(point);
            }
        } else {
            strokes.push(vec![point]);
            current_index = Some(index);
        }
    }

    log::debug!("Loaded {} strokes from trace", strokes.len());
    Ok(strokes)
}

fn parse_row(line: &str, line_no: usize) -> Result<(usize, Point)> {
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    if fields.len() != 5 {
        return Err(Error::TraceParse {
            line: line_no,
            reason: format!("expected 5 fields, got {}", fields.len()),
        });
    }

    let bad = |name: &str, value: &str| Error::TraceParse {
        line: line_no,
        reason: format!("invalid {name}: {value:?}"),
    };

    let index = fields[0].parse::<usize>().map_err(|_| bad("stroke", fields[0]))?;
    let x = fields[1].parse::<f64>().map_err(|_| bad("x", fields[1]))?;
    let y = fields[2].parse::<f64>().map_err(|_| bad("y", fields[2]))?;
    let t = fields[3].parse::<i64>().map_err(|_| bad("t", fields[3]))?;
    let force = if fields[4].is_empty() {
        None
    } else {
        Some(fields[4].parse::<f64>().map_err(|_| bad("force", fields[4]))?)
    };

    Ok((index, Point { x, y, t, force }))
}
