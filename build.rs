use std::{env, error::Error, fs, path::PathBuf};

const GESTURE_CONFIG: &str = "config/gestures.toml";
const GENERATED: &str = "gesture_config.rs";

fn main() -> Result<(), Box<dyn Error>> {
    let source = PathBuf::from(env::var("CARGO_MANIFEST_DIR")?).join(GESTURE_CONFIG);
    println!("cargo:rerun-if-changed={}", source.display());
    println!("cargo:rerun-if-changed=build.rs");

    let constants = gesture_config_compiler::generate_from_path(&source)
        .map_err(|e| format!("{GESTURE_CONFIG} rejected: {e}"))?;

    let target = PathBuf::from(env::var("OUT_DIR")?).join(GENERATED);
    fs::write(&target, constants)
        .map_err(|e| format!("cannot write {}: {e}", target.display()))?;
    Ok(())
}
