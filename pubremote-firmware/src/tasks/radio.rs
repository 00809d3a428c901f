//! Radio task
//!
//! Owns the ESP-NOW driver. Received datagrams go to the receive task
//! through the overwrite slot; queued commands from the link loops are
//! executed in order.

use defmt::*;
use embassy_futures::select::{select, Either};
use esp_radio::esp_now::{
    EspNowManager, EspNowReceiver, EspNowSender, EspNowWifiInterface, PeerInfo, ReceivedData,
};

use pubremote_core::link::Datagram;
use pubremote_protocol::MacAddress;

use crate::channels::{INBOUND, RADIO_COMMANDS};
use crate::radio::RadioCommand;

/// Radio task - forwards inbound datagrams and executes queued commands
#[embassy_executor::task]
pub async fn radio_task(
    manager: EspNowManager<'static>,
    mut sender: EspNowSender<'static>,
    mut receiver: EspNowReceiver<'static>,
) {
    info!("Radio task started");

    loop {
        match select(receiver.receive_async(), RADIO_COMMANDS.receive()).await {
            Either::First(frame) => forward(&frame),
            Either::Second(command) => execute(&manager, &mut sender, command).await,
        }
    }
}

fn forward(frame: &ReceivedData) {
    let rssi = frame
        .info
        .rx_control
        .rssi
        .clamp(i8::MIN as i32, i8::MAX as i32) as i8;
    let channel = u8::try_from(frame.info.rx_control.channel).unwrap_or(0);

    match Datagram::new(
        MacAddress::new(frame.info.src_address),
        channel,
        rssi,
        frame.data(),
    ) {
        Ok(datagram) => INBOUND.signal(datagram),
        Err(e) => warn!("Dropped inbound datagram: {:?}", e),
    }
}

async fn execute(
    manager: &EspNowManager<'static>,
    sender: &mut EspNowSender<'static>,
    command: RadioCommand,
) {
    match command {
        RadioCommand::Send { peer, payload } => {
            if let Err(e) = sender.send_async(&peer.octets(), &payload).await {
                debug!("Send to {} failed: {:?}", peer, Debug2Format(&e));
            }
        }
        RadioCommand::RegisterPeer {
            peer,
            channel,
            replaces,
        } => {
            if let Some(old) = replaces {
                match manager.remove_peer(&old.octets()) {
                    Ok(()) => debug!("Peer {} removed", old),
                    Err(e) => warn!("Removing peer {} failed: {:?}", old, Debug2Format(&e)),
                }
            }
            let info = PeerInfo {
                interface: EspNowWifiInterface::Station,
                peer_address: peer.octets(),
                lmk: None,
                channel: Some(channel),
                encrypt: false,
            };
            let result = if manager.peer_exists(&peer.octets()) {
                manager.modify_peer(info)
            } else {
                manager.add_peer(info)
            };
            match result {
                Ok(()) => debug!("Peer {} registered on channel {}", peer, channel),
                Err(e) => warn!("Registering peer {} failed: {:?}", peer, Debug2Format(&e)),
            }
        }
        RadioCommand::SetChannel(channel) => {
            if let Err(e) = manager.set_channel(channel) {
                warn!("Switching to channel {} failed: {:?}", channel, Debug2Format(&e));
            }
        }
    }
}
