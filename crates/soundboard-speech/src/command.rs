use std::{
    io::ErrorKind,
    path::Path,
    process::{Child, Command, Stdio},
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, Ordering},
    },
    thread,
};

use crate::{SpeechCallback, SpeechError, Synthesizer, Utterance};

/// Handle to an utterance started by a [`Synthesizer`].
///
/// Stopping kills the synthesizer process and is idempotent.
#[derive(Clone)]
pub struct UtteranceHandle {
    child: Arc<Mutex<Child>>,
    cancelled: Arc<AtomicBool>,
}

impl Utterance for UtteranceHandle {
    fn stop(&self) {
        if self.cancelled.swap(true, Ordering::SeqCst) {
            return;
        }
        if let Ok(mut child) = self.child.lock() {
            // the process may already be gone
            let _ = child.kill();
            let _ = child.wait();
        }
    }

    fn is_stopped(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Speaks text by running an external synthesizer program with the text as
/// its last argument.
#[derive(Debug, Clone)]
pub struct CommandSynthesizer {
    program: Option<String>,
    args: Vec<String>,
}

impl CommandSynthesizer {
    /// Creates a synthesizer. `None` as a program yields an unsupported
    /// synthesizer.
    pub fn new(program: Option<String>, args: Vec<String>) -> Self {
        Self { program, args }
    }

    fn program(&self) -> Option<&str> {
        self.program.as_deref().filter(|program| !program.trim().is_empty())
    }
}

/// Whether `program` names an existing file, either directly or through
/// one of the directories in `PATH`.
fn program_exists(program: &str) -> bool {
    let path = Path::new(program);
    if path.components().count() > 1 {
        return path.is_file();
    }

    std::env::var_os("PATH").is_some_and(|paths| {
        std::env::split_paths(&paths).any(|dir| {
            let candidate = dir.join(program);
            candidate.is_file() || candidate.with_extension("exe").is_file()
        })
    })
}

impl Synthesizer for CommandSynthesizer {
    fn is_supported(&self) -> bool {
        self.program().is_some_and(program_exists)
    }

    fn speak(
        &self,
        text: &str,
        on_finished: SpeechCallback,
    ) -> Result<Box<dyn Utterance>, SpeechError> {
        let program = self.program().ok_or(SpeechError::Unsupported)?;
        let child = Command::new(program)
            .args(&self.args)
            .arg(text)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|error| match error.kind() {
                ErrorKind::NotFound => SpeechError::Unsupported,
                _ => SpeechError::Spawn(error),
            })?;
        log::debug!("Started synthesizer {program} (pid {})", child.id());

        let handle = UtteranceHandle {
            child: Arc::new(Mutex::new(child)),
            cancelled: Arc::new(AtomicBool::new(false)),
        };

        let watched = handle.clone();
        thread::spawn(move || {
            loop {
                if watched.is_stopped() {
                    return;
                }
                let status = match watched.child.lock() {
                    Ok(mut child) => child.try_wait(),
                    Err(_) => return,
                };
                match status {
                    Ok(Some(status)) => {
                        if watched.is_stopped() {
                            return;
                        }
                        let result = if status.success() {
                            Ok(())
                        } else {
                            Err(SpeechError::Exited(status))
                        };
                        on_finished(result);
                        return;
                    }
                    Ok(None) => thread::sleep(crate::WATCH_INTERVAL),
                    Err(error) => {
                        on_finished(Err(SpeechError::Wait(error)));
                        return;
                    }
                }
            }
        });

        Ok(Box::new(handle))
    }
}

#[cfg(all(test, unix))]
mod tests {
    use std::{sync::mpsc, time::Duration};

    use super::*;

    fn speak_with(
        synthesizer: &CommandSynthesizer,
        text: &str,
    ) -> (
        Result<Box<dyn Utterance>, SpeechError>,
        mpsc::Receiver<Result<(), SpeechError>>,
    ) {
        let (tx, rx) = mpsc::channel();
        let handle = synthesizer.speak(
            text,
            Box::new(move |result| {
                let _ = tx.send(result);
            }),
        );
        (handle, rx)
    }

    #[test]
    fn successful_program_reports_completion() {
        let synthesizer = CommandSynthesizer::new(Some("true".into()), vec![]);
        assert!(synthesizer.is_supported());

        let (handle, rx) = speak_with(&synthesizer, "hello");
        assert!(handle.is_ok());
        let result = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert!(result.is_ok());
    }

    #[test]
    fn failing_program_reports_exit_status() {
        let synthesizer = CommandSynthesizer::new(Some("false".into()), vec![]);
        let (_handle, rx) = speak_with(&synthesizer, "hello");
        let result = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert!(matches!(result, Err(SpeechError::Exited(_))));
    }

    #[test]
    fn missing_program_is_unsupported() {
        let synthesizer =
            CommandSynthesizer::new(Some("no-such-synthesizer-binary".into()), vec![]);
        assert!(!synthesizer.is_supported());
        let (handle, _rx) = speak_with(&synthesizer, "hello");
        assert!(matches!(handle, Err(SpeechError::Unsupported)));

        let synthesizer = CommandSynthesizer::new(None, vec![]);
        assert!(!synthesizer.is_supported());
    }

    #[test]
    fn stopped_utterance_never_completes() {
        let synthesizer = CommandSynthesizer::new(Some("sleep".into()), vec![]);
        let (handle, rx) = speak_with(&synthesizer, "5");
        let handle = handle.unwrap();
        handle.stop();
        handle.stop();
        assert!(handle.is_stopped());
        assert!(rx.recv_timeout(Duration::from_millis(300)).is_err());
    }
}
