// ABOUTME: List command implementation.
// ABOUTME: Prints the fixtures defined in the loaded config.

use dockfix::config::Config;
use dockfix::output::{Output, OutputMode};

pub fn list(config: &Config, output: &Output) {
    for fixture in config.fixtures.iter() {
        match output.mode() {
            OutputMode::Normal => println!(
                "{:<24} {:<32} {}",
                fixture.name.as_str(),
                fixture.image,
                fixture.port.to_string()
            ),
            OutputMode::Quiet => println!("{}", fixture.name),
            OutputMode::Json => {
                let line = serde_json::json!({
                    "name": fixture.name.as_str(),
                    "image": fixture.image,
                    "port": fixture.port.to_string(),
                });
                println!("{line}");
            }
        }
    }
}
