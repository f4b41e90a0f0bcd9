use crate::constants::{SERIAL_BAUD_RATE, SERIAL_READ_TIMEOUT_MS};
use crate::logger::log;
use serialport::{SerialPort, SerialPortType};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortInfo {
    /// Name passed to [`open_port`]
    pub name: String,
    /// Name plus whatever the OS knows about the adapter
    pub label: String,
}

/// Enumerate serial ports, sorted by name. Empty if enumeration fails.
pub fn list_ports() -> Vec<PortInfo> {
    let ports = match serialport::available_ports() {
        Ok(ports) => ports,
        Err(e) => {
            log::warn!("Serial port enumeration failed: {}", e);
            return Vec::new();
        }
    };

    let mut out: Vec<PortInfo> = ports
        .into_iter()
        .map(|p| {
            let label = match p.port_type {
                SerialPortType::UsbPort(info) => {
                    let parts: Vec<String> = [info.manufacturer, info.product]
                        .into_iter()
                        .flatten()
                        .collect();
                    if parts.is_empty() {
                        format!("{} (USB)", p.port_name)
                    } else {
                        format!("{} ({})", p.port_name, parts.join(" "))
                    }
                }
                SerialPortType::BluetoothPort => format!("{} (Bluetooth)", p.port_name),
                SerialPortType::PciPort | SerialPortType::Unknown => p.port_name.clone(),
            };
            PortInfo { name: p.port_name, label }
        })
        .collect();

    out.sort_by(|a, b| a.name.cmp(&b.name));
    log::debug!("Found {} serial ports", out.len());
    out
}

/// Bare device names such as `ttyUSB0` are looked up under `/dev` on Unix
pub fn resolve_port_name(name: &str) -> String {
    let name = name.trim();
    if cfg!(unix) && !name.is_empty() && !name.starts_with('/') {
        format!("/dev/{}", name)
    } else {
        name.to_string()
    }
}

/// Open a port with the sensor's line settings (9600 8N1)
///
/// The short read timeout keeps the poll loop responsive to stop requests.
pub fn open_port(name: &str) -> serialport::Result<Box<dyn SerialPort>> {
    let path = resolve_port_name(name);
    log::info!("Opening serial port {} at {} baud", path, SERIAL_BAUD_RATE);

    serialport::new(&path, SERIAL_BAUD_RATE)
        .data_bits(serialport::DataBits::Eight)
        .parity(serialport::Parity::None)
        .stop_bits(serialport::StopBits::One)
        .flow_control(serialport::FlowControl::None)
        .timeout(Duration::from_millis(SERIAL_READ_TIMEOUT_MS))
        .open()
}
