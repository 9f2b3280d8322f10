// Example usage of the DACQ codec: summarize a recording file

use dacq::{CodecOptions, DacqCodec, DacqFile};
use tracing::{info, Level};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .init();

    let mut args = std::env::args().skip(1);
    let path = args.next().unwrap_or_else(|| "data/trial.1".to_string());
    let codec = match args.next() {
        Some(options) => DacqCodec::new(CodecOptions::from_json_file(options)?),
        None => DacqCodec::default(),
    };

    let file = codec.read_any(&path)?;

    info!("{} ({:?})", path, file.format());
    for (key, value) in file.header().iter() {
        info!("  {} = {}", key, value);
    }
    if let Some(start) = file.header().trial_datetime() {
        info!("Trial started at {}", start);
    }

    match &file {
        DacqFile::Tetrode(data) => {
            info!("Spikes: {}", data.len());
            if let Some(first) = data.records().next() {
                info!(
                    "First spike: t={:.6}s, ch1[0..5]={:?}",
                    first.timestamp,
                    &first.waveforms[0][..5]
                );
            }
        }
        DacqFile::Eeg(data) => {
            info!("Samples: {}", data.len());
            if let Some(duration) = data.duration() {
                info!("Duration: {:.2}s", duration);
            }
        }
        DacqFile::Input(data) => {
            info!("Events: {}", data.len());
            for event in data.events().iter().take(10) {
                info!(
                    "  t={:.4}s {:?} state={:#06x}",
                    event.timestamp, event.kind, event.channel_state
                );
            }
        }
    }

    Ok(())
}
