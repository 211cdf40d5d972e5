use std::path::Path;

use loadsim_core::SimulationFile;

pub fn init(path: &str, force: bool) -> anyhow::Result<()> {
    let output = Path::new(path).join("loadsim.toml");
    if output.exists() && !force {
        anyhow::bail!("{} already exists (use --force to overwrite)", output.display());
    }

    std::fs::write(&output, SimulationFile::scaffold().to_toml_string()?)?;
    println!("✓ Generated {}", output.display());
    Ok(())
}
