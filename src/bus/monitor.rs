//! Bus monitor: receive task, event broadcast, diagnostics.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, RwLock};
use tokio::task::JoinHandle;

use crate::bus::directory::NodeDirectory;
use crate::core::error::ProtocolError;
use crate::core::frame::CanFrame;
use crate::core::identifier::NodeId;
use crate::registry::{parse_frame, Message};
use crate::transport::CanTransport;

/// Monitor configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusConfig {
    /// CAN interface name (e.g. "can0"); informational, the transport is
    /// opened by the caller.
    #[serde(default = "default_interface")]
    pub interface: String,

    /// RX polling interval in milliseconds.
    #[serde(default = "default_rx_poll_interval")]
    pub rx_poll_interval_ms: u64,

    /// Capacity of the broadcast event channel.
    #[serde(default = "default_event_capacity")]
    pub event_capacity: usize,
}

fn default_interface() -> String {
    "can0".to_string()
}

fn default_rx_poll_interval() -> u64 {
    5
}

fn default_event_capacity() -> usize {
    1024
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            interface: default_interface(),
            rx_poll_interval_ms: default_rx_poll_interval(),
            event_capacity: default_event_capacity(),
        }
    }
}

/// One decoded (or undecodable) frame observed on the bus.
#[derive(Debug, Clone)]
pub enum BusEvent {
    /// A frame the registry could decode.
    Message {
        message: Message,
        node: NodeId,
        frame: CanFrame,
    },
    /// A frame the registry rejected. The raw frame is preserved so a
    /// caller can still log or count it.
    DecodeError {
        frame: CanFrame,
        error: ProtocolError,
    },
}

pub type BusEventSender = broadcast::Sender<BusEvent>;
pub type BusEventReceiver = broadcast::Receiver<BusEvent>;

/// Callback interface for push-style consumers (broadcast subscription is
/// the pull-style alternative).
#[async_trait]
pub trait BusEventHandler: Send + Sync {
    async fn on_event(&self, event: BusEvent);
}

/// Monitor health counters.
#[derive(Debug, Clone, Serialize)]
pub struct Diagnostics {
    pub running: bool,
    pub read_count: u64,
    pub error_count: u64,
    pub last_error: Option<String>,
    pub extra: serde_json::Value,
}

/// Event-driven receive loop over any [`CanTransport`].
///
/// Polls the transport from a spawned task, parses every frame through the
/// registry, broadcasts the result and keeps the node directory current
/// from heartbeats.
pub struct BusMonitor {
    config: BusConfig,

    is_running: Arc<AtomicBool>,

    // Statistics
    read_count: Arc<AtomicU64>,
    error_count: Arc<AtomicU64>,
    last_error: Arc<RwLock<Option<String>>>,

    receive_handle: Option<JoinHandle<()>>,

    // Event channel (broadcast for multiple subscribers)
    event_tx: BusEventSender,
    event_handler: Option<Arc<dyn BusEventHandler>>,

    directory: Arc<NodeDirectory>,
}

impl BusMonitor {
    /// Create a stopped monitor with the given configuration.
    pub fn new(config: BusConfig) -> Self {
        let (event_tx, _) = broadcast::channel(config.event_capacity.max(1));
        Self {
            config,
            is_running: Arc::new(AtomicBool::new(false)),
            read_count: Arc::new(AtomicU64::new(0)),
            error_count: Arc::new(AtomicU64::new(0)),
            last_error: Arc::new(RwLock::new(None)),
            receive_handle: None,
            event_tx,
            event_handler: None,
            directory: Arc::new(NodeDirectory::new()),
        }
    }

    /// Subscribe to decoded bus events.
    pub fn subscribe(&self) -> BusEventReceiver {
        self.event_tx.subscribe()
    }

    /// Install a push-style event handler. Must be called before `start`.
    pub fn set_event_handler(&mut self, handler: Arc<dyn BusEventHandler>) {
        self.event_handler = Some(handler);
    }

    /// The heartbeat-fed node directory.
    pub fn directory(&self) -> Arc<NodeDirectory> {
        Arc::clone(&self.directory)
    }

    /// True while the receive task runs.
    pub fn is_running(&self) -> bool {
        self.is_running.load(Ordering::SeqCst)
    }

    /// Current health counters.
    pub fn diagnostics(&self) -> Diagnostics {
        Diagnostics {
            running: self.is_running(),
            read_count: self.read_count.load(Ordering::Relaxed),
            error_count: self.error_count.load(Ordering::Relaxed),
            last_error: futures::executor::block_on(self.last_error.read()).clone(),
            extra: serde_json::json!({
                "interface": self.config.interface,
                "rx_poll_interval_ms": self.config.rx_poll_interval_ms,
                "known_nodes": self.directory.len(),
            }),
        }
    }

    /// Spawn the receive task over `transport`.
    pub fn start<T: CanTransport + 'static>(&mut self, transport: T) {
        if self.is_running.swap(true, Ordering::SeqCst) {
            return;
        }

        let is_running = Arc::clone(&self.is_running);
        let read_count = Arc::clone(&self.read_count);
        let error_count = Arc::clone(&self.error_count);
        let last_error = Arc::clone(&self.last_error);
        let event_tx = self.event_tx.clone();
        let event_handler = self.event_handler.clone();
        let directory = Arc::clone(&self.directory);
        let poll_interval = self.config.rx_poll_interval_ms;

        let handle = tokio::spawn(async move {
            #[cfg(feature = "tracing-support")]
            tracing::info!("bus receive task started (poll interval {}ms)", poll_interval);

            let mut interval =
                tokio::time::interval(tokio::time::Duration::from_millis(poll_interval.max(1)));
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

            loop {
                interval.tick().await;

                if !is_running.load(Ordering::SeqCst) {
                    break;
                }

                // Drain everything pending before sleeping again.
                loop {
                    match transport.try_receive() {
                        Ok(Some(frame)) => {
                            read_count.fetch_add(1, Ordering::Relaxed);

                            let event = match parse_frame(&frame) {
                                Ok((message, node)) => {
                                    if let Message::HeartBeat(heartbeat) = &message {
                                        directory.observe(
                                            heartbeat.class,
                                            heartbeat.id,
                                            heartbeat.version,
                                        );
                                    }
                                    BusEvent::Message {
                                        message,
                                        node,
                                        frame,
                                    }
                                }
                                Err(error) => {
                                    #[cfg(feature = "tracing-support")]
                                    tracing::debug!(
                                        "undecodable frame ID=0x{:03X}: {}",
                                        frame.id,
                                        error
                                    );
                                    BusEvent::DecodeError { frame, error }
                                }
                            };

                            let _ = event_tx.send(event.clone());
                            if let Some(handler) = &event_handler {
                                handler.on_event(event).await;
                            }
                        }
                        Ok(None) => break,
                        Err(e) => {
                            #[cfg(feature = "tracing-support")]
                            tracing::error!("CAN read error: {}", e);

                            *last_error.write().await = Some(e.to_string());
                            error_count.fetch_add(1, Ordering::Relaxed);
                            tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;
                            break;
                        }
                    }
                }
            }

            #[cfg(feature = "tracing-support")]
            tracing::info!("bus receive task stopped");
        });

        self.receive_handle = Some(handle);
    }

    /// Stop the receive task.
    pub fn stop(&mut self) {
        self.is_running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.receive_handle.take() {
            handle.abort();
        }
    }
}

impl Drop for BusMonitor {
    fn drop(&mut self) {
        self.stop();
    }
}
