use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{info, warn};

/// In-process domain events emitted by the inventory core.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    PurchaseRecorded {
        purchase_id: i32,
        line_count: usize,
    },
    SaleRecorded {
        sale_id: i32,
        line_count: usize,
    },
    LotCreated {
        lote_id: i32,
        producto_id: i32,
        cantidad: i32,
    },
    LotDeactivated {
        lote_id: i32,
        producto_id: i32,
    },
    ConsumptionRecorded {
        consumo_id: i32,
        lote_id: i32,
        cantidad: i32,
    },
    /// FEFO depletion ran out of eligible lots before satisfying the
    /// pieces the pre-flight check promised. The sale still commits with
    /// the short depletion; this event makes the divergence observable.
    UnderDepletion {
        sale_id: i32,
        producto_id: i32,
        requested: i64,
        depleted: i64,
    },
}

#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Sends an event asynchronously.
    pub async fn send(&self, event: Event) -> Result<(), String> {
        self.sender
            .send(event)
            .await
            .map_err(|e| format!("Failed to send event: {}", e))
    }

    /// Sends an event, logging instead of failing the caller when the
    /// receiver is gone. Write paths must not fail after commit because
    /// nobody is listening.
    pub async fn send_or_log(&self, event: Event) {
        if let Err(e) = self.send(event).await {
            warn!("Event dropped: {}", e);
        }
    }
}

/// Drains the event channel, logging each event. The dashboard and report
/// surfaces poll the database directly, so the loop only needs to make
/// events visible in the logs for now.
pub async fn process_events(mut rx: mpsc::Receiver<Event>) {
    info!("Starting event processing loop");

    while let Some(event) = rx.recv().await {
        match &event {
            Event::UnderDepletion {
                sale_id,
                producto_id,
                requested,
                depleted,
            } => {
                warn!(
                    sale_id,
                    producto_id,
                    requested,
                    depleted,
                    "FEFO depletion fell short of the pre-flight promise"
                );
            }
            other => info!("Event: {:?}", other),
        }
    }

    info!("Event channel closed, stopping event processing loop");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn send_or_log_does_not_error_when_receiver_dropped() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        let sender = EventSender::new(tx);
        sender
            .send_or_log(Event::LotDeactivated {
                lote_id: 1,
                producto_id: 1,
            })
            .await;
    }
}
