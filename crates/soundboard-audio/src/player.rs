use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    thread,
    time::Duration,
};

use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};

use crate::PlayerError;

/// Opens and decodes the clip at `path`.
///
/// Decoding the header up front lets invalid files be reported before any
/// sink is created.
pub fn open_clip(path: &Path) -> Result<Decoder<BufReader<File>>, PlayerError> {
    let file = File::open(path).map_err(|source| PlayerError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Decoder::new(BufReader::new(file))?)
}

/// Handle to a clip started by [`ClipPlayer::play`].
///
/// Stopping is idempotent. A stopped clip never invokes its completion
/// callback.
#[derive(Clone)]
pub struct ClipHandle {
    sink: Arc<Sink>,
    cancelled: Arc<AtomicBool>,
}

impl ClipHandle {
    /// Halts playback and drops whatever remains queued in the sink.
    pub fn stop(&self) {
        if !self.cancelled.swap(true, Ordering::SeqCst) {
            self.sink.stop();
        }
    }

    pub fn is_stopped(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Plays decoded clips on an output stream, one sink per clip.
pub struct ClipPlayer {
    // kept alive for the lifetime of the player
    _stream: OutputStream,
    handle: OutputStreamHandle,
    sounds_dir: PathBuf,
    volume: f32,
}

impl ClipPlayer {
    /// Opens the output stream on the named device (or the default one).
    pub fn new(
        device_name: Option<&str>,
        sounds_dir: PathBuf,
        volume: f32,
    ) -> Result<Self, PlayerError> {
        let (stream, handle) = crate::device::open_output_stream(device_name)?;
        Ok(Self {
            _stream: stream,
            handle,
            sounds_dir,
            volume: volume.clamp(0.0, 1.0),
        })
    }

    /// Starts playing the clip behind `source`.
    ///
    /// `on_finished` is invoked from a watcher thread once the clip has played
    /// to its end. It is never invoked if the returned handle is stopped
    /// first.
    pub fn play(
        &self,
        source: &str,
        on_finished: impl FnOnce() + Send + 'static,
    ) -> Result<ClipHandle, PlayerError> {
        let path = crate::source::resolve_clip_path(&self.sounds_dir, source)?;
        let decoder = open_clip(&path)?;

        let sink = Sink::try_new(&self.handle)?;
        sink.set_volume(self.volume);
        sink.append(decoder);
        log::debug!("Playing clip {path:?}");

        let handle = ClipHandle {
            sink: Arc::new(sink),
            cancelled: Arc::new(AtomicBool::new(false)),
        };

        let watched = handle.clone();
        thread::spawn(move || {
            let interval = Duration::from_millis(crate::WATCH_INTERVAL_MILLISECONDS);
            while !watched.sink.empty() {
                if watched.is_stopped() {
                    return;
                }
                thread::sleep(interval);
            }
            if !watched.is_stopped() {
                on_finished();
            }
        });

        Ok(handle)
    }
}
