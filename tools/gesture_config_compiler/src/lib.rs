use std::{fmt, fs, path::Path};

use serde::Deserialize;

#[derive(Debug)]
pub enum ConfigCompilerError {
    Io(String),
    Parse(String),
    Validation(String),
}

impl fmt::Display for ConfigCompilerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(msg) => write!(f, "io error: {msg}"),
            Self::Parse(msg) => write!(f, "parse error: {msg}"),
            Self::Validation(msg) => write!(f, "validation error: {msg}"),
        }
    }
}

impl std::error::Error for ConfigCompilerError {}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct GesturesFile {
    pub filter: FilterSection,
    pub double_click: DoubleClickSection,
    pub button_defaults: ButtonDefaultsSection,
    pub queue: QueueSection,
    pub registry: RegistrySection,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct FilterSection {
    pub window: u32,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct DoubleClickSection {
    pub interval: u32,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ButtonDefaultsSection {
    pub repeat_interval: u32,
    pub long_press_threshold: u32,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct QueueSection {
    pub length: u32,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct RegistrySection {
    pub max_buttons: u32,
}

pub fn parse_gestures_str(source: &str) -> Result<GesturesFile, ConfigCompilerError> {
    toml::from_str(source).map_err(|e| ConfigCompilerError::Parse(e.to_string()))
}

pub fn parse_gestures_file(path: &Path) -> Result<GesturesFile, ConfigCompilerError> {
    let source = fs::read_to_string(path)
        .map_err(|e| ConfigCompilerError::Io(format!("{}: {e}", path.display())))?;
    parse_gestures_str(&source)
}

pub fn validate_config(config: &GesturesFile) -> Result<(), ConfigCompilerError> {
    let fail = |msg: &str| Err(ConfigCompilerError::Validation(msg.to_string()));

    if config.filter.window == 0 {
        return fail("filter.window must be > 0");
    }
    if config.double_click.interval == 0 {
        return fail("double_click.interval must be > 0");
    }
    if config.button_defaults.repeat_interval == 0
        || config.button_defaults.long_press_threshold == 0
    {
        return fail("all button_defaults fields must be positive integers");
    }
    // One slot is reserved to tell full from empty.
    if config.queue.length < 2 {
        return fail("queue.length must be >= 2");
    }
    if config.registry.max_buttons == 0 || config.registry.max_buttons > u32::from(u16::MAX) {
        return fail("registry.max_buttons must be within 1..=65535");
    }
    Ok(())
}

pub fn render_generated_config(config: &GesturesFile) -> String {
    let mut out = String::new();
    out.push_str("// @generated by gesture_config_compiler. Do not edit.\n\n");
    push_const(&mut out, "FILTER_WINDOW", "u32", config.filter.window);
    push_const(
        &mut out,
        "DOUBLE_CLICK_INTERVAL",
        "u32",
        config.double_click.interval,
    );
    push_const(
        &mut out,
        "DEFAULT_REPEAT_INTERVAL",
        "u32",
        config.button_defaults.repeat_interval,
    );
    push_const(
        &mut out,
        "DEFAULT_LONG_PRESS_THRESHOLD",
        "u32",
        config.button_defaults.long_press_threshold,
    );
    push_const(&mut out, "DEFAULT_QUEUE_LEN", "usize", config.queue.length);
    push_const(
        &mut out,
        "DEFAULT_MAX_BUTTONS",
        "usize",
        config.registry.max_buttons,
    );
    out
}

fn push_const(out: &mut String, name: &str, ty: &str, value: u32) {
    out.push_str(&format!("pub const {name}: {ty} = {value};\n"));
}

pub fn generate_from_str(source: &str) -> Result<String, ConfigCompilerError> {
    let config = parse_gestures_str(source)?;
    validate_config(&config)?;
    Ok(render_generated_config(&config))
}

pub fn generate_from_path(path: &Path) -> Result<String, ConfigCompilerError> {
    let config = parse_gestures_file(path)?;
    validate_config(&config)?;
    Ok(render_generated_config(&config))
}
