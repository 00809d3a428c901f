//! Flash-backed peer store
//!
//! The link loops see [`FlashPeerStore`], which reads and updates an
//! in-RAM copy of the [`PeerRecord`] and hands every change to the storage
//! task through [`PEER_SAVE`]. Only the storage task touches flash, using
//! sequential-storage's key-value map in a dedicated partition.

use core::cell::Cell;
use core::ops::Range;

use defmt::*;
use embassy_embedded_hal::adapter::BlockingAsync;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use esp_storage::FlashStorage;
use sequential_storage::cache::NoCache;
use sequential_storage::map::{self, Key, SerializationError};

use pubremote_core::config::{PeerRecord, MAX_PEER_RECORD_SIZE};
use pubremote_core::pairing::PeerIdentity;
use pubremote_core::traits::{PeerStore, StoreError};
use pubremote_protocol::MacAddress;

use crate::channels::PEER_SAVE;

/// Flash driver as seen by sequential-storage
pub type PeerFlash = BlockingAsync<FlashStorage<'static>>;

/// Flash range reserved for the peer record (last 64KB of a 4MB flash)
///
/// Must match the `pubremote` data partition in the partition table.
pub const PEER_FLASH_RANGE: Range<u32> = 0x3F_0000..0x40_0000;

/// Scratch buffer size for sequential-storage item headers plus the record
const DATA_BUFFER_SIZE: usize = 64;

/// Keys in the peer partition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum StorageKey {
    /// The paired vehicle
    Peer = 0,
}

impl Key for StorageKey {
    fn serialize_into(&self, buffer: &mut [u8]) -> Result<usize, SerializationError> {
        if buffer.is_empty() {
            return Err(SerializationError::BufferTooSmall);
        }
        buffer[0] = *self as u8;
        Ok(1)
    }

    fn deserialize_from(buffer: &[u8]) -> Result<(Self, usize), SerializationError> {
        match buffer.first() {
            Some(0) => Ok((StorageKey::Peer, 1)),
            Some(_) => Err(SerializationError::InvalidFormat),
            None => Err(SerializationError::BufferTooSmall),
        }
    }
}

/// In-RAM copy of the persisted record
static RECORD: Mutex<CriticalSectionRawMutex, Cell<PeerRecord>> =
    Mutex::new(Cell::new(PeerRecord::UNPAIRED));

/// Peer store used by the link tasks
#[derive(Debug, Clone, Copy, Default)]
pub struct FlashPeerStore;

impl FlashPeerStore {
    /// Apply `update` to the record and queue it for writing
    fn update(
        &mut self,
        update: impl FnOnce(&mut PeerRecord) -> Result<(), StoreError>,
    ) -> Result<(), StoreError> {
        let record = RECORD.lock(|cell| {
            let mut record = cell.get();
            update(&mut record)?;
            cell.set(record);
            Ok::<_, StoreError>(record)
        })?;
        PEER_SAVE.signal(record);
        Ok(())
    }
}

impl PeerStore for FlashPeerStore {
    fn load_peer(&mut self) -> Result<Option<(MacAddress, u8)>, StoreError> {
        RECORD.lock(|cell| cell.get()).load_peer()
    }

    fn save_peer(&mut self, peer: &PeerIdentity) -> Result<(), StoreError> {
        self.update(|record| record.save_peer(peer))
    }

    fn load_secret_code(&mut self) -> Result<i32, StoreError> {
        RECORD.lock(|cell| cell.get()).load_secret_code()
    }

    fn save_secret_code(&mut self, code: i32) -> Result<(), StoreError> {
        self.update(|record| record.save_secret_code(code))
    }

    fn clear_peer(&mut self) -> Result<(), StoreError> {
        self.update(|record| record.clear_peer())
    }
}

/// Read the stored record into RAM
///
/// Runs once at boot, before the link tasks start. A missing or unreadable
/// record leaves the remote unpaired.
pub async fn load_record(flash: &mut PeerFlash) {
    let mut buffer = [0u8; DATA_BUFFER_SIZE];
    let fetched = map::fetch_item::<StorageKey, &[u8], _>(
        flash,
        PEER_FLASH_RANGE,
        &mut NoCache::new(),
        &mut buffer,
        &StorageKey::Peer,
    )
    .await;

    let record = match fetched {
        Ok(Some(bytes)) => match PeerRecord::decode(bytes) {
            Ok(record) => record,
            Err(e) => {
                warn!("Stored peer record rejected: {:?}", e);
                return;
            }
        },
        Ok(None) => {
            info!("No stored peer record");
            return;
        }
        Err(e) => {
            warn!("Peer flash read failed: {:?}", Debug2Format(&e));
            return;
        }
    };

    RECORD.lock(|cell| cell.set(record));
    info!("Loaded peer record (paired: {})", record.is_paired());
}

/// Write one record to flash
pub async fn store_record(flash: &mut PeerFlash, record: &PeerRecord) -> Result<(), StoreError> {
    let mut encoded = [0u8; MAX_PEER_RECORD_SIZE];
    let data: &[u8] = record.encode(&mut encoded)?;

    let mut buffer = [0u8; DATA_BUFFER_SIZE];
    map::store_item(
        flash,
        PEER_FLASH_RANGE,
        &mut NoCache::new(),
        &mut buffer,
        &StorageKey::Peer,
        &data,
    )
    .await
    .map_err(|e| {
        warn!("Peer flash write failed: {:?}", Debug2Format(&e));
        StoreError::Flash
    })
}
