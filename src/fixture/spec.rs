// ABOUTME: Caller-built description of one container fixture.
// ABOUTME: Image, name, target port, extra run arguments and environment.

use std::collections::BTreeMap;

use crate::types::{ContainerName, ContainerPort};

/// What to run: consumed by a single launch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerSpec {
    image: String,
    name: ContainerName,
    port: ContainerPort,
    args: Vec<String>,
    env: BTreeMap<String, String>,
}

impl ContainerSpec {
    pub fn new(image: impl Into<String>, name: ContainerName, port: ContainerPort) -> Self {
        Self {
            image: image.into(),
            name,
            port,
            args: Vec::new(),
            env: BTreeMap::new(),
        }
    }

    /// Append one argument placed between `run` and `--name`.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, A>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Set one container environment variable. No variables are set by default.
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    pub fn envs<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.env
            .extend(vars.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    pub fn image(&self) -> &str {
        &self.image
    }

    pub fn name(&self) -> &ContainerName {
        &self.name
    }

    pub fn port(&self) -> ContainerPort {
        self.port
    }

    pub fn extra_args(&self) -> &[String] {
        &self.args
    }

    pub fn environment(&self) -> &BTreeMap<String, String> {
        &self.env
    }
}
