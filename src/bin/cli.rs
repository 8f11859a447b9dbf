//! rivulet CLI: stream a generated tone through the engine.
//!
//! Usage:
//!   rivulet --freq 440 --seconds 2
//!   rivulet --wav out.wav --loop --max-seconds 5 --lowpass 1200
//!   rivulet --prebuffer --offset-ms 500

use std::error::Error;
use std::f32::consts::TAU;
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};

use clap::Parser;
use rv_audio::{AudioOutput, CpalOutput};
use rv_master::{
    effects, prebuffered, BufferSource, ChannelMap, EngineConfig, PlaybackDevice, SoundStream,
    Status, StreamSource, Time,
};

/// Command-line arguments for rivulet
#[derive(Parser, Debug)]
#[command(name = "rivulet")]
#[command(about = "Stream a generated tone through the rivulet engine")]
#[command(version)]
struct Args {
    /// Render to this WAV file instead of the default output device
    #[arg(long)]
    wav: Option<PathBuf>,

    /// Tone frequency in Hz
    #[arg(long, default_value_t = 440.0)]
    freq: f32,

    /// Tone length in seconds
    #[arg(long, default_value_t = 2.0)]
    seconds: f32,

    /// Stream channel count (1 or 2)
    #[arg(long, default_value_t = 2)]
    channels: u16,

    /// Sample rate for WAV output; live playback uses the device rate
    #[arg(long, default_value_t = 44100, env = "RIVULET_SAMPLE_RATE")]
    sample_rate: u32,

    /// Loop the stream until --max-seconds elapse
    #[arg(long = "loop")]
    looping: bool,

    /// Low-pass cutoff in Hz applied as a stream effect
    #[arg(long)]
    lowpass: Option<f32>,

    /// Start playback this many milliseconds into the tone
    #[arg(long, default_value_t = 0)]
    offset_ms: i64,

    /// Feed the stream from a producer thread through a lock-free ring
    #[arg(long)]
    prebuffer: bool,

    /// Upper bound on playback or render length
    #[arg(long, default_value_t = 30.0)]
    max_seconds: f32,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    if let Err(e) = run(&args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), Box<dyn Error>> {
    let channel_map = ChannelMap::default_for(args.channels)
        .ok_or_else(|| format!("unsupported channel count {}", args.channels))?;
    match &args.wav {
        Some(path) => render_to_wav(args, channel_map, path),
        None => play_audio(args, channel_map),
    }
}

fn announce_tone(args: &Args, sample_rate: u32) -> Vec<i16> {
    println!(
        "Tone:     {} Hz, {:.2}s, {} ch @ {} Hz",
        args.freq, args.seconds, args.channels, sample_rate
    );
    tone(args.freq, sample_rate, args.seconds, args.channels)
}

fn tone(freq: f32, sample_rate: u32, seconds: f32, channels: u16) -> Vec<i16> {
    let frames = (seconds.max(0.0) * sample_rate as f32) as usize;
    let step = TAU * freq / sample_rate as f32;
    (0..frames)
        .flat_map(|i| {
            let s = ((i as f32 * step).sin() * 0.5 * i16::MAX as f32) as i16;
            std::iter::repeat(s).take(channels as usize)
        })
        .collect()
}

fn open_stream(
    args: &Args,
    device: &PlaybackDevice,
    source: Box<dyn StreamSource>,
    channel_map: ChannelMap,
    sample_rate: u32,
) -> Result<SoundStream<Box<dyn StreamSource>>, Box<dyn Error>> {
    let mut stream = SoundStream::new(device, source, channel_map, sample_rate)?;
    stream.set_looping(args.looping);
    if let Some(cutoff) = args.lowpass {
        stream.set_effect_processor(Some(effects::low_pass(cutoff, device.sample_rate())))?;
        println!("Effect:   low-pass at {} Hz", cutoff);
    }
    stream.play(Time::from_millis(args.offset_ms))?;
    Ok(stream)
}

fn render_to_wav(
    args: &Args,
    channel_map: ChannelMap,
    path: &PathBuf,
) -> Result<(), Box<dyn Error>> {
    let device = PlaybackDevice::new(EngineConfig::default().with_sample_rate(args.sample_rate))?;
    let samples = announce_tone(args, args.sample_rate);

    let source: Box<dyn StreamSource> = if args.prebuffer {
        let frames = samples.len() / args.channels as usize;
        let (mut feeder, source) = prebuffered(frames, args.channels, 1024);
        feeder.push(&samples);
        feeder.close();
        Box::new(source)
    } else {
        Box::new(BufferSource::new(samples, args.channels, args.sample_rate))
    };
    let stream = open_stream(args, &device, source, channel_map, args.sample_rate)?;

    println!("Rendering to {} at {} Hz...", path.display(), args.sample_rate);
    let max_frames = (args.max_seconds * args.sample_rate as f32) as usize;
    let block = 1024;
    let mut rendered = Vec::new();
    let mut frames = 0;
    while frames < max_frames && stream.status() == Status::Playing {
        let n = block.min(max_frames - frames);
        rendered.extend(rv_master::render_offline(&device, n));
        frames += n;
    }

    let mut file = fs::File::create(path)?;
    rv_master::write_wav(&mut file, &rendered, device.channels(), device.sample_rate())?;
    println!("Rendered {} frames", frames);
    println!("Done.");
    Ok(())
}

fn play_audio(args: &Args, channel_map: ChannelMap) -> Result<(), Box<dyn Error>> {
    let mut output = CpalOutput::new(2)?;
    output.build_stream()?;
    output.start()?;
    let device = output.device().clone();
    log::info!(
        "Output device: {} channels at {}Hz",
        device.channels(),
        device.sample_rate()
    );
    // Live output runs at whatever rate the hardware picked.
    let rate = device.sample_rate();
    if rate != args.sample_rate {
        log::debug!("Ignoring --sample-rate {}Hz in favour of the device rate", args.sample_rate);
    }
    let samples = announce_tone(args, rate);

    let mut producer = None;
    let source: Box<dyn StreamSource> = if args.prebuffer {
        let ring_frames = rate as usize / 2;
        let (feeder, source) = prebuffered(ring_frames, args.channels, 1024);
        let channels = args.channels as usize;
        producer = Some(thread::spawn(move || feed(feeder, samples, channels)));
        Box::new(source)
    } else {
        Box::new(BufferSource::new(samples, args.channels, rate))
    };
    let mut stream = open_stream(args, &device, source, channel_map, rate)?;
    println!("Playing...");
    println!();

    let deadline = Instant::now() + Duration::from_secs_f32(args.max_seconds.max(0.0));
    while stream.status() == Status::Playing && Instant::now() < deadline {
        print!("\rOffset: {:>8} ms", stream.playing_offset().as_millis());
        let _ = std::io::stdout().flush();
        thread::sleep(Duration::from_millis(20));
    }
    stream.stop();
    drop(stream);

    if let Some(handle) = producer {
        let _ = handle.join();
    }
    output.stop()?;
    println!("\rDone.                 ");
    Ok(())
}

/// Push `samples` into the ring as space frees up, then close it.
fn feed(mut feeder: rv_master::SampleFeeder, samples: Vec<i16>, channels: usize) {
    let mut pos = 0;
    while pos < samples.len() {
        if feeder.is_detached() {
            return;
        }
        let pushed = feeder.push(&samples[pos..]);
        pos += pushed * channels;
        if pushed == 0 {
            thread::sleep(Duration::from_millis(5));
        }
    }
    feeder.close();
}
