use std::{fs, path::Path};

use anyhow::{bail, Context, Result};
use swipedeck::PointerSample;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerPhase {
    Down,
    Move,
    Up,
    Cancel,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TraceLine {
    Pointer {
        phase: PointerPhase,
        sample: PointerSample,
    },
    Tick {
        ms: u64,
    },
}

impl TraceLine {
    pub fn ms(&self) -> u64 {
        match self {
            Self::Pointer { sample, .. } => sample.t_ms,
            Self::Tick { ms } => *ms,
        }
    }
}

pub fn load_trace(path: &Path) -> Result<Vec<TraceLine>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    parse_trace(&raw).with_context(|| format!("invalid trace {}", path.display()))
}

pub fn parse_trace(raw: &str) -> Result<Vec<TraceLine>> {
    let mut out = Vec::new();
    for (idx, line) in raw.lines().enumerate() {
        let line_no = idx + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let parts: Vec<&str> = trimmed.split(',').map(str::trim).collect();
        let parsed = match parts.as_slice() {
            ["tick", ms] => TraceLine::Tick {
                ms: parse_field(ms, line_no, "ms")?,
            },
            ["pointer", ms, phase, id, x, y] => TraceLine::Pointer {
                phase: parse_phase(phase, line_no)?,
                sample: PointerSample::new(
                    parse_field(id, line_no, "id")?,
                    parse_field(x, line_no, "x")?,
                    parse_field(y, line_no, "y")?,
                    parse_field(ms, line_no, "ms")?,
                ),
            },
            _ => bail!("line {line_no}: expected `pointer,ms,phase,id,x,y` or `tick,ms`"),
        };
        out.push(parsed);
    }
    Ok(out)
}

pub fn load_expected(path: &Path) -> Result<Vec<String>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    Ok(raw
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_owned)
        .collect())
}

fn parse_phase(token: &str, line_no: usize) -> Result<PointerPhase> {
    match token {
        "down" => Ok(PointerPhase::Down),
        "move" => Ok(PointerPhase::Move),
        "up" => Ok(PointerPhase::Up),
        "cancel" => Ok(PointerPhase::Cancel),
        other => bail!("line {line_no}: unknown pointer phase `{other}`"),
    }
}

fn parse_field<T: std::str::FromStr>(token: &str, line_no: usize, name: &str) -> Result<T> {
    token
        .parse()
        .map_err(|_| anyhow::anyhow!("line {line_no}: invalid {name} `{token}`"))
}
