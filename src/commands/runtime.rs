// ABOUTME: Runtime helper commands: forced removal, free port, host discovery.
// ABOUTME: Usable without a config file; runtime defaults apply.

use dockfix::error::Result;
use dockfix::output::Output;
use dockfix::runtime::{HostResolver, Removal, RuntimeClient, RuntimeConfig, free_port_for};
use dockfix::types::{ContainerName, Protocol};

pub async fn remove(runtime: &RuntimeConfig, name: &str, output: &Output) -> Result<()> {
    let name = ContainerName::new(name)?;
    let client = RuntimeClient::from_config(runtime);

    match client.remove(&name).await? {
        Removal::Removed => output.success(&format!("Removed {name}")),
        Removal::NotFound => output.success(&format!("No container named {name}")),
    }
    Ok(())
}

pub async fn port(udp: bool, output: &Output) -> Result<()> {
    let protocol = if udp { Protocol::Udp } else { Protocol::Tcp };
    let port = free_port_for(protocol).await?;
    output.value("port", &port.to_string());
    Ok(())
}

pub async fn host(runtime: &RuntimeConfig, output: &Output) {
    let host = HostResolver::from_config(runtime).resolve().await;
    output.value("host", &host);
}
