// SPDX-FileCopyrightText: 2024 Foundation Devices, Inc. <hello@foundation.xyz>
// SPDX-License-Identifier: GPL-3.0-or-later

use btleplug::api::{Central, CentralEvent, Manager as _, Peripheral, ScanFilter};
use btleplug::platform::{Adapter, Manager, PeripheralId};
use clap::Parser;
use futures::stream::StreamExt;
use log::{debug, info};
use std::error::Error;
use std::time::Duration;

#[derive(Debug, Parser)]
struct Args {
    #[arg(short, long)]
    list_adapters: bool,
    #[arg(short, long, default_value_t = String::from("hci0"))]
    adapter: String,
    /// Stop scanning after this many seconds
    #[arg(short, long, default_value_t = 10)]
    timeout: u64,
}

/// The advertisement carries the short name; once the host got a scan response it reports the
/// complete one instead.
fn is_broadcaster(name: &str) -> bool {
    name.starts_with(consts::SHORT_NAME)
}

/// Scan response names only show up after the host stack actively scanned the device.
fn got_scan_response(name: &str) -> bool {
    name == consts::DEVICE_NAME
}

async fn report(central: &Adapter, id: &PeripheralId, event: &str) -> Result<(), Box<dyn Error>> {
    let peripheral = central.peripheral(id).await?;
    let Some(properties) = peripheral.properties().await? else {
        return Ok(());
    };
    let name = properties.local_name.unwrap_or_default();
    if !is_broadcaster(&name) {
        debug!("{}: skipping {} ({})", event, properties.address, name);
        return Ok(());
    }
    println!(
        "{}: {} name: {:?} rssi: {:?} address type: {:?} scan response: {}",
        event,
        properties.address,
        name,
        properties.rssi,
        properties.address_type,
        if got_scan_response(&name) { "yes" } else { "no" }
    );
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    pretty_env_logger::init();

    let args = Args::parse();

    let manager = Manager::new().await?;
    let adapter_list = manager.adapters().await?;
    if adapter_list.is_empty() {
        eprintln!("No Bluetooth adapters found");
        return Ok(());
    }
    if args.list_adapters {
        println!("List of available bluetooth adapters:");
        for adapter in adapter_list.iter() {
            println!("- {}", adapter.adapter_info().await?);
        }
        return Ok(());
    }

    // use the wanted adapter or the first one by default
    let mut wanted_adapter = None;
    for adapter in adapter_list.iter() {
        if let Ok(info) = adapter.adapter_info().await {
            if info.contains(&args.adapter) {
                println!("Wanted adapter found: {}", info);
                wanted_adapter = Some(adapter.clone());
                break;
            }
        }
    }
    let central = match wanted_adapter {
        Some(adapter) => adapter,
        None => {
            let first = adapter_list[0].clone();
            println!(
                "Wanted adapter not found, using first available one: {}",
                first.adapter_info().await?
            );
            first
        }
    };
    println!("CentralState: {:?}", central.adapter_state().await?);

    let mut events = central.events().await?;

    // The broadcaster advertises no service, so there is nothing to filter on here.
    println!("Scanning for {:?} for {} s...", consts::SHORT_NAME, args.timeout);
    central.start_scan(ScanFilter::default()).await?;

    let scan = async {
        while let Some(event) = events.next().await {
            match event {
                CentralEvent::DeviceDiscovered(id) => report(&central, &id, "DeviceDiscovered").await?,
                CentralEvent::DeviceUpdated(id) => report(&central, &id, "DeviceUpdated").await?,
                CentralEvent::StateUpdate(state) => {
                    println!("AdapterStatusUpdate {:?}", state);
                }
                _ => {}
            }
        }
        Ok::<(), Box<dyn Error>>(())
    };

    let res = match tokio::time::timeout(Duration::from_secs(args.timeout), scan).await {
        Ok(res) => res,
        Err(_) => {
            info!("scan timeout reached");
            Ok(())
        }
    };
    central.stop_scan().await?;

    res
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names() {
        assert!(is_broadcaster("blessed"));
        assert!(is_broadcaster("blessed device"));
        assert!(!is_broadcaster("Passport Prime"));

        assert!(got_scan_response("blessed device"));
        assert!(!got_scan_response("blessed"));
    }
}
