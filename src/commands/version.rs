use anyhow::Result;

pub fn execute() -> Result<()> {
    println!("hwmon-charts version {}", env!("CARGO_PKG_VERSION"));
    Ok(())
}
