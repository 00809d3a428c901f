//! PubRemote - Handheld EV Remote Firmware
//!
//! Main firmware binary for ESP32-S3 remotes. Pairs with a vehicle over
//! ESP-NOW, streams throttle frames at a fixed rate and displays the
//! telemetry the vehicle sends back.

#![no_std]
#![no_main]

use defmt::*;
use embassy_embedded_hal::adapter::BlockingAsync;
use embassy_executor::Spawner;
use embassy_time::Duration;
use esp_hal::analog::adc::{Adc, AdcConfig, Attenuation};
use esp_hal::clock::CpuClock;
use esp_hal::gpio::{Input, InputConfig, Pull};
use esp_hal::timer::timg::TimerGroup;
use esp_radio::wifi::{ClientConfig, ModeConfig, WifiController};
use esp_storage::FlashStorage;
use static_cell::StaticCell;
use {esp_backtrace as _, esp_println as _};

use pubremote_core::link::{Receiver, Supervisor, Transmitter};

use crate::channels::LINK;
use crate::config::LINK_CONFIG;
use crate::input::InputState;
use crate::radio::EspNowLink;
use crate::storage::FlashPeerStore;
use crate::tasks::{Buttons, Thumbstick};
use crate::ui::{IdleReset, UiNotifier};

mod channels;
mod config;
mod input;
mod radio;
mod storage;
mod tasks;
mod ui;

esp_bootloader_esp_idf::esp_app_desc!();

// Heap for the Wi-Fi driver: 72KB
const HEAP_SIZE: usize = 72 * 1024;

// Radio controller and Wi-Fi controller must live forever; dropping the
// Wi-Fi controller stops the radio
static RADIO: StaticCell<esp_radio::Controller<'static>> = StaticCell::new();
static WIFI: StaticCell<WifiController<'static>> = StaticCell::new();

/// Main entry point
#[esp_rtos::main]
async fn main(spawner: Spawner) {
    let peripherals = esp_hal::init(esp_hal::Config::default().with_cpu_clock(CpuClock::max()));
    esp_alloc::heap_allocator!(size: HEAP_SIZE);

    // Scheduler must run before esp-radio init
    let timg0 = TimerGroup::new(peripherals.TIMG0);
    esp_rtos::start(timg0.timer0);

    info!("PubRemote firmware starting...");
    info!("Link config: {:?}", LINK_CONFIG);

    // The receive task resumes the stored pairing, so load it first
    let mut flash = BlockingAsync::new(FlashStorage::new(peripherals.FLASH));
    storage::load_record(&mut flash).await;

    // ESP-NOW runs on top of the Wi-Fi driver in station mode
    let radio = RADIO.init(unwrap!(esp_radio::init()));
    let (mut wifi, interfaces) =
        unwrap!(esp_radio::wifi::new(radio, peripherals.WIFI, Default::default()));
    unwrap!(wifi.set_config(&ModeConfig::Client(ClientConfig::default())));
    unwrap!(wifi.start());
    WIFI.init(wifi);
    let (manager, sender, esp_receiver) = interfaces.esp_now.split();
    info!("ESP-NOW ready");

    // Thumbstick on GPIO1 (X) / GPIO2 (Y), buttons on GPIO4 / GPIO5
    let mut adc_config = AdcConfig::new();
    let x = adc_config.enable_pin(peripherals.GPIO1, Attenuation::_11dB);
    let y = adc_config.enable_pin(peripherals.GPIO2, Attenuation::_11dB);
    let stick = Thumbstick {
        adc: Adc::new(peripherals.ADC1, adc_config),
        x,
        y,
    };
    let pull_up = InputConfig::default().with_pull(Pull::Up);
    let buttons = Buttons {
        primary: Input::new(peripherals.GPIO4, pull_up),
        pocket: Input::new(peripherals.GPIO5, pull_up),
    };

    let receiver = Receiver::new(
        &LINK,
        &LINK_CONFIG,
        EspNowLink,
        FlashPeerStore,
        UiNotifier,
        IdleReset,
    );
    let transmitter = Transmitter::new(&LINK, &LINK_CONFIG, EspNowLink, InputState);
    let supervisor = Supervisor::new(&LINK, FlashPeerStore, UiNotifier);

    let transmit_period = Duration::from_millis(LINK_CONFIG.transmit_tick_ms.into());
    let monitor_period = Duration::from_millis(LINK_CONFIG.monitor_tick_ms.into());

    spawner.spawn(tasks::storage_task(flash)).unwrap();
    spawner
        .spawn(tasks::radio_task(manager, sender, esp_receiver))
        .unwrap();
    spawner.spawn(tasks::receiver_task(receiver)).unwrap();
    spawner
        .spawn(tasks::transmitter_task(transmitter, transmit_period))
        .unwrap();
    spawner
        .spawn(tasks::supervisor_task(supervisor, monitor_period))
        .unwrap();
    spawner.spawn(tasks::input_task(stick, buttons)).unwrap();
    spawner.spawn(tasks::ui_task()).unwrap();

    info!("All tasks spawned");
}
