//! Host shell around the synthesis core: MIDI input in, audio output out.

use std::time::Duration;

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use midir::{Ignore, MidiInput, MidiInputConnection};
use rtrb::{Producer, RingBuffer};

use polytone::engine::{EngineConfig, SynthEngine};
use polytone::io::midi::MidiEvent;
use polytone::DEFAULT_VOICE_CAPACITY;

/// Only events on this channel reach the router.
const MIDI_CHANNEL: u8 = 0;
/// Pending note events between two event-loop wakeups.
const EVENT_QUEUE_SIZE: usize = 256;

/// Set up both device directions and run the event loop forever.
pub fn run() -> EyreResult<()> {
    let (producer, mut consumer) = RingBuffer::<MidiEvent>::new(EVENT_QUEUE_SIZE);

    // Audio output
    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or_else(|| eyre!("no default output device available"))?;
    let default_config = device
        .default_output_config()
        .wrap_err("failed to fetch default output config")?;

    let sample_rate = default_config.sample_rate().0 as f32;
    let stream_config = cpal::StreamConfig {
        channels: polytone::synth::renderer::CHANNELS as u16,
        sample_rate: default_config.sample_rate(),
        buffer_size: cpal::BufferSize::Default,
    };

    let engine = SynthEngine::new(EngineConfig {
        sample_rate,
        voices: DEFAULT_VOICE_CAPACITY,
    });
    let (mut router, mut renderer) = engine.split();

    println!("=== polytone ===");
    println!("Sample rate: {} Hz", sample_rate);
    println!("Polyphony: {} voices", DEFAULT_VOICE_CAPACITY);
    println!();

    let _midi_connection = connect_midi_input(producer)?;

    let stream = device.build_output_stream(
        &stream_config,
        move |data: &mut [f32], _| renderer.render(data),
        |err| eprintln!("Audio error: {}", err),
        None,
    )?;
    stream.play()?;

    println!();
    println!("Playing... Press Ctrl+C to stop");

    loop {
        router.drain(&mut consumer);
        std::thread::sleep(Duration::from_millis(1));
    }
}

/// List the available MIDI input ports, connect to the first one, and feed
/// its note events into the ring buffer from the driver's callback thread.
fn connect_midi_input(mut producer: Producer<MidiEvent>) -> EyreResult<MidiInputConnection<()>> {
    let mut input = MidiInput::new("polytone").wrap_err("failed to initialize MIDI input")?;
    // Sysex, clock, and active-sense never reach the callback.
    input.ignore(Ignore::All);

    let ports = input.ports();
    println!("MIDI input ports:");
    for (index, port) in ports.iter().enumerate() {
        let name = input
            .port_name(port)
            .unwrap_or_else(|_| "<unknown>".to_string());
        println!("  [{}] {}", index, name);
    }

    let port = ports
        .first()
        .ok_or_else(|| eyre!("no MIDI input ports available"))?;
    let port_name = input
        .port_name(port)
        .unwrap_or_else(|_| "<unknown>".to_string());

    let connection = input
        .connect(
            port,
            "polytone-in",
            move |_timestamp, message, _| {
                if let [status, key, velocity, ..] = *message {
                    if let Some(event) = MidiEvent::from_raw(status, key, velocity) {
                        if event.channel() == MIDI_CHANNEL {
                            // A full queue drops the event; the router never
                            // blocks on the driver thread.
                            let _ = producer.push(event);
                        }
                    }
                }
            },
            (),
        )
        .map_err(|err| eyre!("failed to connect to MIDI port '{port_name}': {err}"))?;

    println!("Listening on '{}' (channel {})", port_name, MIDI_CHANNEL);
    Ok(connection)
}
