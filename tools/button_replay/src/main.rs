use std::{
    cell::Cell,
    env,
    fs::File,
    io::{BufRead, BufReader},
    path::{Path, PathBuf},
    process,
};

use keytick::{
    ButtonEvent, ButtonOptions, EventQueue, FnSource, GestureMask, Keypad, NoopRawMutex,
    ScanTiming, SourceId, DEFAULT_QUEUE_LEN,
};

/// Released time scanned after the last trace line so pending click windows
/// can close.
const TAIL_MS: u32 = 500;

#[derive(Clone, Copy)]
struct ReplaySample {
    t: u32,
    active: bool,
}

struct ReplayOptions {
    trace_path: PathBuf,
    expect_path: Option<PathBuf>,
    button: ButtonOptions,
    timing: ScanTiming,
    queue_len: usize,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {err}");
        process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let Some(options) = parse_args(env::args().skip(1).collect())? else {
        println!("{}", usage());
        return Ok(());
    };
    let samples = parse_trace(&options.trace_path)?;

    let queue: EventQueue<NoopRawMutex, ButtonEvent> =
        EventQueue::new(options.queue_len).map_err(|e| format!("queue: {e}"))?;
    let level = Cell::new(false);
    let mut keypad: Keypad<'_, NoopRawMutex, 1> = Keypad::with_timing(&queue, options.timing);
    keypad
        .register(
            FnSource::new(SourceId(0), || level.get()),
            options.button,
        )
        .map_err(|e| format!("register: {e}"))?;

    let mut lines: Vec<String> = Vec::new();
    let mut last_t = 0u32;
    let mut last_dt = 10u32;
    for sample in &samples {
        let dt = sample.t.saturating_sub(last_t);
        level.set(sample.active);
        keypad.scan(dt);
        drain(&keypad, sample.t, &mut lines);
        last_t = sample.t;
        if dt > 0 {
            last_dt = dt;
        }
    }

    level.set(false);
    let tail_end = last_t.saturating_add(TAIL_MS);
    while last_t < tail_end {
        last_t = last_t.saturating_add(last_dt);
        keypad.scan(last_dt);
        drain(&keypad, last_t, &mut lines);
    }

    for line in &lines {
        println!("{line}");
    }
    let stats = keypad.stats();
    if stats.dropped > 0 {
        eprintln!("warning: {} events dropped, queue too short", stats.dropped);
    }

    if let Some(expect_path) = options.expect_path {
        let expected = parse_expected(&expect_path)?;
        if lines != expected {
            eprintln!("expected: {}", expected.join(" | "));
            eprintln!("actual:   {}", lines.join(" | "));
            return Err("event sequence mismatch".into());
        }
    }

    Ok(())
}

fn drain(keypad: &Keypad<'_, NoopRawMutex, 1>, t: u32, lines: &mut Vec<String>) {
    while let Some(event) = keypad.read_event() {
        lines.push(format!("{} {} {}", t, event.kind, event.click_count));
    }
}

fn usage() -> String {
    "usage: button_replay <trace> [--mode click,double,long,repeat] [--repeat <n>] \
     [--long <n>] [--window <n>] [--double <n>] [--queue <n>] [--expect <file>]"
        .to_string()
}

fn parse_args(args: Vec<String>) -> Result<Option<ReplayOptions>, String> {
    let mut trace_path: Option<PathBuf> = None;
    let mut expect_path: Option<PathBuf> = None;
    let mut button = ButtonOptions::new(GestureMask::CLICK | GestureMask::DOUBLE_CLICK);
    let mut timing = ScanTiming::default();
    let mut queue_len = DEFAULT_QUEUE_LEN;

    let mut idx = 0usize;
    while idx < args.len() {
        let flag = args[idx].as_str();
        match flag {
            "-h" | "--help" => return Ok(None),
            "--mode" | "--repeat" | "--long" | "--window" | "--double" | "--queue"
            | "--expect" => {
                idx += 1;
                let Some(value) = args.get(idx) else {
                    return Err(format!("missing value after {flag}"));
                };
                match flag {
                    "--mode" => button.mode = parse_mode(value)?,
                    "--repeat" => button.repeat_interval = parse_u32(value, flag)?,
                    "--long" => button.long_press_threshold = parse_u32(value, flag)?,
                    "--window" => timing.filter_window = parse_u32(value, flag)?,
                    "--double" => timing.double_click_interval = parse_u32(value, flag)?,
                    "--queue" => {
                        queue_len = value
                            .parse::<usize>()
                            .map_err(|e| format!("invalid {flag} '{value}': {e}"))?
                    }
                    _ => expect_path = Some(PathBuf::from(value)),
                }
            }
            value if value.starts_with('-') => {
                return Err(format!("unknown argument: {value}"));
            }
            value => {
                if trace_path.is_some() {
                    return Err("multiple trace paths provided".into());
                }
                trace_path = Some(PathBuf::from(value));
            }
        }
        idx += 1;
    }

    let trace_path = trace_path.ok_or_else(usage)?;
    Ok(Some(ReplayOptions {
        trace_path,
        expect_path,
        button,
        timing,
        queue_len,
    }))
}

fn parse_mode(raw: &str) -> Result<GestureMask, String> {
    let mut mode = GestureMask::empty();
    for token in raw.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        mode |= match token.to_ascii_lowercase().as_str() {
            "click" => GestureMask::CLICK,
            "double" => GestureMask::DOUBLE_CLICK,
            "long" => GestureMask::LONG_PRESS,
            "repeat" => GestureMask::REPEAT,
            "none" => GestureMask::empty(),
            other => return Err(format!("unknown gesture '{other}' in --mode")),
        };
    }
    Ok(mode)
}

fn parse_trace(path: &Path) -> Result<Vec<ReplaySample>, String> {
    let file = File::open(path).map_err(|e| format!("failed to open {}: {e}", path.display()))?;
    let reader = BufReader::new(file);

    let mut out: Vec<ReplaySample> = Vec::new();
    for (line_no, line_result) in reader.lines().enumerate() {
        let line_no = line_no + 1;
        let line = line_result
            .map_err(|e| format!("failed to read {}:{}: {e}", path.display(), line_no))?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let mut parts = trimmed.split_whitespace();
        let (Some(t), Some(level), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(format!(
                "{}:{} invalid trace line, expected '<t> <level>'",
                path.display(),
                line_no
            ));
        };
        let t = parse_u32(t, "t").map_err(|e| format!("{}:{} {e}", path.display(), line_no))?;
        let active = match level {
            "1" => true,
            "0" => false,
            other => {
                return Err(format!(
                    "{}:{} invalid level '{}', expected 0 or 1",
                    path.display(),
                    line_no,
                    other
                ))
            }
        };
        if let Some(prev) = out.last() {
            if t < prev.t {
                return Err(format!(
                    "{}:{} time goes backwards ({} after {})",
                    path.display(),
                    line_no,
                    t,
                    prev.t
                ));
            }
        }
        out.push(ReplaySample { t, active });
    }

    Ok(out)
}

fn parse_expected(path: &Path) -> Result<Vec<String>, String> {
    let file = File::open(path).map_err(|e| format!("failed to open {}: {e}", path.display()))?;
    let reader = BufReader::new(file);

    let mut lines = Vec::new();
    for (line_no, line_result) in reader.lines().enumerate() {
        let line = line_result
            .map_err(|e| format!("failed to read {}:{}: {e}", path.display(), line_no + 1))?;
        let token = line.trim();
        if token.is_empty() || token.starts_with('#') {
            continue;
        }
        lines.push(token.split_whitespace().collect::<Vec<_>>().join(" "));
    }

    Ok(lines)
}

fn parse_u32(raw: &str, field: &str) -> Result<u32, String> {
    raw.trim()
        .parse::<u32>()
        .map_err(|e| format!("invalid {} '{}': {}", field, raw.trim(), e))
}
