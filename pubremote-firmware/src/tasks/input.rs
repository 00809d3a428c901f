//! Input task
//!
//! Samples the thumbstick and buttons at a fixed rate and publishes the
//! latest [`ControlSample`] for the transmitter. A long press of the primary
//! button opens or closes the pairing screen while unpaired, and forgets the
//! vehicle while paired.

use defmt::*;
use embassy_time::{Duration, Instant, Ticker};
use esp_hal::analog::adc::{Adc, AdcChannel, AdcPin};
use esp_hal::gpio::Input;
use esp_hal::peripherals::{ADC1, GPIO1, GPIO2};
use esp_hal::Blocking;

use pubremote_core::state::PairingState;
use pubremote_protocol::ControlSample;

use crate::channels::{ACTIVITY, LINK, PAIRING_MODE, UNPAIR};
use crate::config::{STICK_X, STICK_Y};
use crate::input::InputState;

/// Input sampling period
const INPUT_RATE_MS: u64 = 10;

/// Hold time that turns a press into a long press
const LONG_PRESS_MS: u64 = 3000;

/// Thumbstick axes on ADC1
pub struct Thumbstick {
    pub adc: StickAdc,
    pub x: AdcPin<GPIO1<'static>, ADC1<'static>>,
    pub y: AdcPin<GPIO2<'static>, ADC1<'static>>,
}

/// Physical buttons, active low
pub struct Buttons {
    /// Thumbstick press
    pub primary: Input<'static>,
    /// Slide switch that suppresses transmission
    pub pocket: Input<'static>,
}

/// Input task - publishes stick state and handles the long press
#[embassy_executor::task]
pub async fn input_task(mut stick: Thumbstick, buttons: Buttons) {
    info!("Input task started");

    let mut ticker = Ticker::every(Duration::from_millis(INPUT_RATE_MS));
    let mut last = ControlSample::NEUTRAL;
    let mut pressed_at: Option<Instant> = None;
    let mut long_press_handled = false;
    let mut pairing_mode = false;

    loop {
        ticker.next().await;

        let sample = ControlSample {
            js_x: read_axis(&mut stick.adc, &mut stick.x)
                .map_or(last.js_x, |raw| STICK_X.axis(raw)),
            js_y: read_axis(&mut stick.adc, &mut stick.y)
                .map_or(last.js_y, |raw| STICK_Y.axis(raw)),
            bt_c: buttons.primary.is_low(),
            ..last
        };
        if sample != last {
            InputState::publish(sample);
            ACTIVITY.signal(());
            last = sample;
        }

        InputState::set_pocket_mode(buttons.pocket.is_low());

        if !sample.bt_c {
            pressed_at = None;
            long_press_handled = false;
            continue;
        }
        let since = *pressed_at.get_or_insert_with(Instant::now);
        if long_press_handled || since.elapsed() < Duration::from_millis(LONG_PRESS_MS) {
            continue;
        }
        long_press_handled = true;

        match LINK.pairing().state {
            PairingState::Paired => {
                info!("Long press: unpairing");
                pairing_mode = false;
                UNPAIR.signal(());
            }
            PairingState::Unpaired => {
                pairing_mode = !pairing_mode;
                PAIRING_MODE.signal(pairing_mode);
            }
            PairingState::Pairing | PairingState::Pending => {
                pairing_mode = false;
                PAIRING_MODE.signal(false);
            }
        }
    }
}

type StickAdc = Adc<'static, ADC1<'static>, Blocking>;

fn read_axis<P: AdcChannel>(adc: &mut StickAdc, pin: &mut AdcPin<P, ADC1<'static>>) -> Option<u16> {
    match nb::block!(adc.read_oneshot(pin)) {
        Ok(raw) => Some(raw),
        Err(_) => {
            warn!("Stick ADC read failed");
            None
        }
    }
}
