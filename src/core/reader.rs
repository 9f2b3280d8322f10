// File-level read/write surface for DACQ recordings

use crate::core::eeg::EegCodec;
use crate::core::endian::EndianNormalizer;
use crate::core::error::{DacqError, Result};
use crate::core::format::*;
use crate::core::header::Header;
use crate::core::input::InputEventCodec;
use crate::core::tetrode::TetrodeCodec;
use crate::utils::conf_helper::CodecOptions;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

/// Any decoded DACQ file.
#[derive(Debug, Clone)]
pub enum DacqFile {
    Tetrode(TetrodeData),
    Eeg(EegData),
    Input(InputData),
}

impl DacqFile {
    /// Reads a file, picking the codec from its extension.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        DacqCodec::default().read_any(path)
    }

    pub fn header(&self) -> &Header {
        match self {
            DacqFile::Tetrode(data) => &data.header,
            DacqFile::Eeg(data) => &data.header,
            DacqFile::Input(data) => &data.header,
        }
    }

    pub fn format(&self) -> DacqFormat {
        match self {
            DacqFile::Tetrode(_) => DacqFormat::Tetrode,
            DacqFile::Eeg(_) => DacqFormat::Eeg,
            DacqFile::Input(_) => DacqFormat::Input,
        }
    }
}

/// Reads and writes DACQ files with a fixed set of options.
///
/// Each call reads or writes the whole file; no handle outlives the call.
#[derive(Debug, Clone, Copy, Default)]
pub struct DacqCodec {
    options: CodecOptions,
}

impl DacqCodec {
    pub fn new(options: CodecOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &CodecOptions {
        &self.options
    }

    fn endian(&self) -> EndianNormalizer {
        EndianNormalizer::new(self.options.host_order)
    }

    pub fn tetrode(&self) -> TetrodeCodec {
        TetrodeCodec::new(self.endian()).strict_spike_count(self.options.strict_spike_count)
    }

    pub fn eeg(&self) -> EegCodec {
        EegCodec::new(self.endian())
    }

    pub fn input(&self) -> InputEventCodec {
        InputEventCodec::new(self.endian())
    }

    pub fn read_tetrode<P: AsRef<Path>>(&self, path: P) -> Result<TetrodeData> {
        let path = path.as_ref();
        let bytes = read_file(path)?;
        self.tetrode().decode(&bytes).map_err(|e| log_decode_error(path, e))
    }

    pub fn read_eeg<P: AsRef<Path>>(&self, path: P) -> Result<EegData> {
        let path = path.as_ref();
        let bytes = read_file(path)?;
        self.eeg().decode(&bytes).map_err(|e| log_decode_error(path, e))
    }

    pub fn read_input<P: AsRef<Path>>(&self, path: P) -> Result<InputData> {
        let path = path.as_ref();
        let bytes = read_file(path)?;
        self.input().decode(&bytes).map_err(|e| log_decode_error(path, e))
    }

    pub fn read_any<P: AsRef<Path>>(&self, path: P) -> Result<DacqFile> {
        let path = path.as_ref();
        match DacqFormat::from_path(path) {
            Some(DacqFormat::Tetrode) => self.read_tetrode(path).map(DacqFile::Tetrode),
            Some(DacqFormat::Eeg) => self.read_eeg(path).map(DacqFile::Eeg),
            Some(DacqFormat::Input) => self.read_input(path).map(DacqFile::Input),
            None => Err(DacqError::UnrecognizedFormat {
                path: path.to_path_buf(),
            }),
        }
    }

    pub fn write_tetrode<'a, P, T>(
        &self,
        path: P,
        header: &Header,
        timestamps: T,
        waveforms: &[SpikeWaveforms],
    ) -> Result<()>
    where
        P: AsRef<Path>,
        T: Into<SpikeTimestamps<'a>>,
    {
        let bytes = self.tetrode().encode(header, timestamps.into(), waveforms)?;
        write_file(path.as_ref(), &bytes, self.options.overwrite)
    }

    pub fn write_eeg<P: AsRef<Path>>(
        &self,
        path: P,
        header: &Header,
        samples: &[f64],
    ) -> Result<()> {
        let bytes = self.eeg().encode(header, samples)?;
        write_file(path.as_ref(), &bytes, self.options.overwrite)
    }

    pub fn write_input<P: AsRef<Path>>(
        &self,
        path: P,
        header: &Header,
        events: &[EventRecord],
    ) -> Result<()> {
        let bytes = self.input().encode(header, events)?;
        write_file(path.as_ref(), &bytes, self.options.overwrite)
    }
}

pub fn read_tetrode<P: AsRef<Path>>(path: P) -> Result<TetrodeData> {
    DacqCodec::default().read_tetrode(path)
}

pub fn read_eeg<P: AsRef<Path>>(path: P) -> Result<EegData> {
    DacqCodec::default().read_eeg(path)
}

pub fn read_input<P: AsRef<Path>>(path: P) -> Result<InputData> {
    DacqCodec::default().read_input(path)
}

pub fn write_tetrode<'a, P, T>(
    path: P,
    header: &Header,
    timestamps: T,
    waveforms: &[SpikeWaveforms],
    overwrite: bool,
) -> Result<()>
where
    P: AsRef<Path>,
    T: Into<SpikeTimestamps<'a>>,
{
    with_overwrite(overwrite).write_tetrode(path, header, timestamps, waveforms)
}

pub fn write_eeg<P: AsRef<Path>>(
    path: P,
    header: &Header,
    samples: &[f64],
    overwrite: bool,
) -> Result<()> {
    with_overwrite(overwrite).write_eeg(path, header, samples)
}

pub fn write_input<P: AsRef<Path>>(
    path: P,
    header: &Header,
    events: &[EventRecord],
    overwrite: bool,
) -> Result<()> {
    with_overwrite(overwrite).write_input(path, header, events)
}

fn with_overwrite(overwrite: bool) -> DacqCodec {
    DacqCodec::new(CodecOptions {
        overwrite,
        ..CodecOptions::default()
    })
}

fn log_decode_error(path: &Path, e: DacqError) -> DacqError {
    error!("failed to decode {}: {}", path.display(), e);
    e
}

fn read_file(path: &Path) -> Result<Vec<u8>> {
    let bytes = fs::read(path).map_err(|e| DacqError::io(path, e))?;
    debug!("read {} bytes from {}", bytes.len(), path.display());
    Ok(bytes)
}

fn partial_path(path: &Path) -> Result<PathBuf> {
    let mut name = path
        .file_name()
        .ok_or_else(|| DacqError::io(path, ErrorKind::InvalidInput.into()))?
        .to_os_string();
    name.push(".partial");
    Ok(path.with_file_name(name))
}

/// Writes fully-encoded bytes. Without `overwrite` an existing file is left
/// untouched; with it, bytes land in a sibling file that is renamed into place.
fn write_file(path: &Path, bytes: &[u8], overwrite: bool) -> Result<()> {
    if overwrite {
        let tmp = partial_path(path)?;
        if let Err(e) = fs::write(&tmp, bytes).and_then(|_| fs::rename(&tmp, path)) {
            let _ = fs::remove_file(&tmp);
            return Err(DacqError::io(path, e));
        }
    } else {
        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .map_err(|e| match e.kind() {
                ErrorKind::AlreadyExists => DacqError::OverwriteRefused {
                    path: path.to_path_buf(),
                },
                _ => DacqError::io(path, e),
            })?;

        if let Err(e) = file.write_all(bytes).and_then(|_| file.sync_all()) {
            drop(file);
            let _ = fs::remove_file(path);
            return Err(DacqError::io(path, e));
        }
    }

    info!("wrote {} bytes to {}", bytes.len(), path.display());
    Ok(())
}
