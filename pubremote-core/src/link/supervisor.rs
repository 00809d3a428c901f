//! Connection supervision loop logic
//!
//! Polls the connection monitor on a fixed tick and reports each state
//! change to the UI. The first Connecting -> Connected of a session also
//! saves the channel the vehicle was found on.

use embassy_sync::blocking_mutex::raw::RawMutex;

use super::shared::LinkState;
use crate::connection::Transition;
use crate::state::ConnectionState;
use crate::traits::{LinkObserver, PeerStore, StoreError};

/// A connection state change seen by the supervisor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SupervisorReport {
    pub transition: Transition,
    /// Result of saving the peer, if this change triggered a save
    pub persisted: Option<Result<(), StoreError>>,
}

pub struct Supervisor<'a, M: RawMutex, S, O> {
    link: &'a LinkState<M>,
    store: S,
    observer: O,
}

impl<'a, M, S, O> Supervisor<'a, M, S, O>
where
    M: RawMutex,
    S: PeerStore,
    O: LinkObserver,
{
    pub fn new(link: &'a LinkState<M>, store: S, observer: O) -> Self {
        Self {
            link,
            store,
            observer,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    /// Run one monitor tick
    pub fn tick(&mut self, now_ms: u64) -> Option<SupervisorReport> {
        let transition = self.link.poll_connection(now_ms)?;
        let pairing = self.link.pairing();

        let persisted = match (transition.from, transition.to) {
            (ConnectionState::Connecting, ConnectionState::Connected) => pairing
                .paired_peer()
                .map(|peer| self.store.save_peer(&peer)),
            _ => None,
        };

        self.observer
            .notify_state_changed(pairing.state, transition.to);

        Some(SupervisorReport {
            transition,
            persisted,
        })
    }
}
