//! Aether CLI
//!
//! Bus tooling for the environmental-control protocol: registry queries
//! everywhere, live dump/send/scan where a SocketCAN interface is
//! available.

use clap::{Parser, Subcommand};

use aether::registry;

#[cfg(all(feature = "socketcan", target_os = "linux"))]
use can_commands::CanCommand;

/// Aether - environmental-control protocol over CAN
#[derive(Parser, Debug)]
#[command(name = "aether", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List registered message classes
    ListMessages {
        /// Emit machine-readable JSON
        #[arg(long)]
        json: bool,
    },

    /// List node classes
    Classes,

    #[cfg(all(feature = "socketcan", target_os = "linux"))]
    #[command(flatten)]
    Can(CanCommand),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = match cli.command {
        Commands::ListMessages { json } => {
            list_messages(json);
            Ok(())
        }
        Commands::Classes => {
            list_classes();
            Ok(())
        }
        #[cfg(all(feature = "socketcan", target_os = "linux"))]
        Commands::Can(command) => can_commands::run(command).await,
    };

    if let Err(e) = result {
        eprintln!("{e}");
        std::process::exit(1);
    }
}

fn list_messages(json: bool) {
    if json {
        let entries: Vec<serde_json::Value> = registry::MESSAGES
            .iter()
            .map(|d| {
                serde_json::json!({
                    "class": d.class.0,
                    "name": d.name,
                    "wire_size": d.wire_size,
                    "reserved": d.decode.is_none(),
                })
            })
            .collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&entries).expect("registry serializes")
        );
        return;
    }

    println!("Registered message classes:");
    println!();
    for descriptor in registry::MESSAGES {
        let size = match descriptor.wire_size {
            Some(size) => format!("{size} bytes"),
            None => "reserved".to_string(),
        };
        println!("  0x{:02x}  {:<22} {}", descriptor.class.0, descriptor.name, size);
    }
}

fn list_classes() {
    println!("Node classes:");
    println!();
    for (class, name) in aether::NodeClass::all() {
        println!("  0x{:02x}  {}", class.0, name);
    }
}

#[cfg(all(feature = "socketcan", target_os = "linux"))]
mod can_commands {
    use std::sync::Arc;
    use std::time::Duration;

    use clap::{Args, Subcommand};
    use tokio::signal;

    use aether::bus::{BusConfig, BusEvent, BusMonitor};
    use aether::prelude::*;
    use aether::network;
    use aether::registry;
    use aether::transport::SocketCanTransport;

    pub type CliResult = std::result::Result<(), Box<dyn std::error::Error>>;

    #[derive(Args, Debug)]
    pub struct BusArgs {
        /// SocketCAN interface to use (e.g. can0, vcan0)
        #[arg(short, long, default_value = "can0")]
        pub interface: String,
    }

    #[derive(Subcommand, Debug)]
    pub enum CanCommand {
        /// Print every decodable frame seen on the bus
        Dump {
            #[command(flatten)]
            bus: BusArgs,
            /// Also print frames the registry rejects
            #[arg(long)]
            errors: bool,
        },

        /// Send a set-point message
        Send {
            #[command(flatten)]
            bus: BusArgs,
            /// Use the high-priority arbitration lane
            #[arg(short = 'P', long)]
            priority: bool,
            /// Target node ID (0 = all nodes of the class)
            #[arg(short = 'I', long, default_value_t = 0)]
            id: u8,
            #[command(subcommand)]
            message: SendMessage,
        },

        /// Poll a node for the current value of a message class
        Request {
            #[command(flatten)]
            bus: BusArgs,
            /// Message class name, e.g. Zeus.Report
            message: String,
            /// Target node ID
            #[arg(short = 'I', long, default_value_t = 0)]
            id: u8,
            /// How long to wait for the reply, in milliseconds
            #[arg(long, default_value_t = 1000)]
            timeout_ms: u64,
        },

        /// Solicit a single heartbeat from every node of a class
        Ping {
            #[command(flatten)]
            bus: BusArgs,
            /// Node class name, e.g. zeus
            class: String,
        },

        /// Request periodic heartbeats from every node of a class
        Heartbeat {
            #[command(flatten)]
            bus: BusArgs,
            class: String,
            /// Heartbeat period in milliseconds
            #[arg(long)]
            period_ms: u64,
        },

        /// Reset one node or a whole class
        Reset {
            #[command(flatten)]
            bus: BusArgs,
            class: String,
            /// Node to reset (0 = all nodes of the class)
            #[arg(short = 'I', long, default_value_t = 0)]
            id: u8,
        },

        /// Reassign a node ID
        ChangeId {
            #[command(flatten)]
            bus: BusArgs,
            class: String,
            old_id: u8,
            new_id: u8,
        },

        /// Ping every class and list the nodes that answered
        Scan {
            #[command(flatten)]
            bus: BusArgs,
            /// How long to collect heartbeats, in milliseconds
            #[arg(long, default_value_t = 2000)]
            timeout_ms: u64,
        },
    }

    #[derive(Subcommand, Debug)]
    pub enum SendMessage {
        /// Climate set-point for Zeus
        ZeusSetPoint {
            /// Relative humidity in percent
            humidity: f32,
            /// Temperature in degrees Celsius
            temperature: f32,
            /// Wind power (0-255)
            wind: u8,
        },
        /// Light set-point for Helios
        HeliosSetPoint { visible: u8, uv: u8 },
        /// Fogging power for Celaeno
        CelaenoSetPoint { power: u8 },
        /// Heating power for Notus
        NotusSetPoint { power: u8 },
    }

    pub async fn run(command: CanCommand) -> CliResult {
        match command {
            CanCommand::Dump { bus, errors } => dump(&bus.interface, errors).await,
            CanCommand::Send {
                bus,
                priority,
                id,
                message,
            } => send(&bus.interface, priority, NodeId(id), message),
            CanCommand::Request {
                bus,
                message,
                id,
                timeout_ms,
            } => request(&bus.interface, &message, NodeId(id), timeout_ms).await,
            CanCommand::Ping { bus, class } => {
                let class = NodeClass::from_name(&class)?;
                transmit(&bus.interface, network::ping_frame(class))
            }
            CanCommand::Heartbeat {
                bus,
                class,
                period_ms,
            } => {
                let class = NodeClass::from_name(&class)?;
                let frame =
                    network::heartbeat_request_frame(class, Duration::from_millis(period_ms))?;
                transmit(&bus.interface, frame)
            }
            CanCommand::Reset { bus, class, id } => {
                let class = NodeClass::from_name(&class)?;
                transmit(&bus.interface, network::reset_frame(class, NodeId(id))?)
            }
            CanCommand::ChangeId {
                bus,
                class,
                old_id,
                new_id,
            } => {
                let class = NodeClass::from_name(&class)?;
                let frame = network::id_change_frame(class, NodeId(old_id), NodeId(new_id))?;
                transmit(&bus.interface, frame)
            }
            CanCommand::Scan { bus, timeout_ms } => scan(&bus.interface, timeout_ms).await,
        }
    }

    fn transmit(interface: &str, frame: CanFrame) -> CliResult {
        let transport = SocketCanTransport::open(interface)?;
        transport.send(&frame)?;
        Ok(())
    }

    fn send(interface: &str, priority: bool, id: NodeId, message: SendMessage) -> CliResult {
        let frame = match message {
            SendMessage::ZeusSetPoint {
                humidity,
                temperature,
                wind,
            } => encode_frame(
                &ZeusSetPoint {
                    humidity,
                    temperature,
                    wind,
                },
                priority,
                id,
            )?,
            SendMessage::HeliosSetPoint { visible, uv } => {
                encode_frame(&HeliosSetPoint { visible, uv }, priority, id)?
            }
            SendMessage::CelaenoSetPoint { power } => {
                encode_frame(&CelaenoSetPoint { power }, priority, id)?
            }
            SendMessage::NotusSetPoint { power } => {
                encode_frame(&NotusSetPoint { power }, priority, id)?
            }
        };
        transmit(interface, frame)
    }

    async fn dump(interface: &str, show_errors: bool) -> CliResult {
        let transport = SocketCanTransport::open(interface)?;
        let mut monitor = BusMonitor::new(BusConfig {
            interface: interface.to_string(),
            ..Default::default()
        });
        let mut events = monitor.subscribe();
        monitor.start(transport);

        eprintln!("listening on {interface}, ctrl-c to stop");
        loop {
            tokio::select! {
                _ = signal::ctrl_c() => break,
                event = events.recv() => match event {
                    Ok(BusEvent::Message { message, node, frame }) => {
                        println!(
                            "{}  0x{:03x} node={}  {}",
                            chrono::Utc::now().format("%H:%M:%S%.3f"),
                            frame.id,
                            node,
                            message
                        );
                    }
                    Ok(BusEvent::DecodeError { frame, error }) => {
                        if show_errors {
                            eprintln!(
                                "{}  0x{:03x}  undecodable ({}): {:02x?}",
                                chrono::Utc::now().format("%H:%M:%S%.3f"),
                                frame.id,
                                error,
                                frame.data()
                            );
                        }
                    }
                    Err(_) => break,
                },
            }
        }
        monitor.stop();
        Ok(())
    }

    async fn request(
        interface: &str,
        message_name: &str,
        id: NodeId,
        timeout_ms: u64,
    ) -> CliResult {
        let class = registry::class_by_name(message_name)
            .ok_or_else(|| format!("unknown message class '{message_name}'"))?;

        let transport = Arc::new(SocketCanTransport::open(interface)?);
        let mut monitor = BusMonitor::new(BusConfig {
            interface: interface.to_string(),
            ..Default::default()
        });
        let mut events = monitor.subscribe();
        monitor.start(Arc::clone(&transport));

        transport.send(&request_frame(class, id)?)?;

        let deadline = tokio::time::sleep(Duration::from_millis(timeout_ms));
        tokio::pin!(deadline);
        loop {
            tokio::select! {
                _ = &mut deadline => {
                    monitor.stop();
                    return Err(format!("no answer for {message_name} within {timeout_ms}ms").into());
                }
                event = events.recv() => {
                    if let Ok(BusEvent::Message { message, node, frame }) = event {
                        let answer = frame.identifier().class == class
                            && (id.is_broadcast() || node == id);
                        if answer && !frame.rtr {
                            println!("{node}: {message}");
                            monitor.stop();
                            return Ok(());
                        }
                    }
                }
            }
        }
    }

    async fn scan(interface: &str, timeout_ms: u64) -> CliResult {
        let transport = Arc::new(SocketCanTransport::open(interface)?);
        let mut monitor = BusMonitor::new(BusConfig {
            interface: interface.to_string(),
            ..Default::default()
        });
        monitor.start(Arc::clone(&transport));

        for (class, _) in NodeClass::all() {
            if class != NodeClass::BROADCAST {
                transport.send(&network::ping_frame(class))?;
            }
        }

        tokio::time::sleep(Duration::from_millis(timeout_ms)).await;
        monitor.stop();

        let records = monitor.directory().snapshot();
        if records.is_empty() {
            println!("no node answered within {timeout_ms}ms");
            return Ok(());
        }

        println!("{:<10} {:>3}  {:<10} last seen", "class", "id", "version");
        for record in records {
            println!(
                "{:<10} {:>3}  {:<10} {}",
                record.class.name(),
                record.id.0,
                record.version.to_string(),
                record.last_seen.format("%H:%M:%S%.3f")
            );
        }
        Ok(())
    }
}
