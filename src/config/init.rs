// ABOUTME: Config scaffolding for new projects.
// ABOUTME: Writes a commented dockfix.yml template.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

use super::CONFIG_FILENAME;

const TEMPLATE: &str = r#"# Disposable container fixtures.
# runtime:
#   runtime: docker            # or podman
#   host_discovery: docker-machine
#   machine_env: DOCKER_MACHINE_NAME
readiness:
  interval: 150ms
  timeout: 2m
stop:
  interrupt_grace: 0s
fixtures:
  - name: postgres-fixture
    image: postgres:16
    port: 5432
    args: ["--rm"]
    env:
      POSTGRES_PASSWORD: postgres
"#;

/// Write the template config into `dir`, returning its path.
pub fn init_config(dir: &Path, force: bool) -> Result<PathBuf> {
    let config_path = dir.join(CONFIG_FILENAME);

    if config_path.exists() && !force {
        return Err(Error::AlreadyExists(config_path));
    }

    std::fs::write(&config_path, TEMPLATE)?;
    Ok(config_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn template_parses() {
        let config = Config::from_yaml(TEMPLATE).unwrap();
        assert_eq!(config.fixtures.len(), 1);
        assert_eq!(config.fixtures.first().name.as_str(), "postgres-fixture");
    }
}
