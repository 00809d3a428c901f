//! Storage task
//!
//! Writes peer records queued by the link loops. Saves that arrive while a
//! write is in progress collapse into one, since only the latest record
//! matters.

use defmt::*;

use crate::channels::PEER_SAVE;
use crate::storage::{store_record, PeerFlash};

/// Storage task - the only writer of the peer partition
#[embassy_executor::task]
pub async fn storage_task(mut flash: PeerFlash) {
    info!("Storage task started");

    loop {
        let record = PEER_SAVE.wait().await;
        if store_record(&mut flash, &record).await.is_ok() {
            debug!("Peer record saved (paired: {})", record.is_paired());
        }
    }
}
