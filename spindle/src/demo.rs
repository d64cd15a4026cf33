//!
//! Console Demo
//!
//! `ConsoleWorker` prints every thread message it receives followed by the
//! name of the thread that handled it. `run_demo` drives a whole
//! configuration through the thread lifecycle:
//!
//! 1. register one `ConsoleWorker` per configured thread
//! 2. create every thread (each parks on the start gate)
//! 3. `start_all` once
//! 4. post each thread's messages in order
//! 5. request exit from every thread, joining each in turn
//!

use std::sync::Arc;
use std::time::Duration;

use spindle_std_core::{ConsoleSink, FaultReporter};
use spindle_std_threads::{Tag, ThreadError, ThreadHandle, ThreadRegistry, Worker, WorkerContext};
use tracing::{debug, info};

use crate::config::Config;
use crate::errors::SpindleError;

/// Heap data handed from the posting thread to the worker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextMessage {
    pub text: String,
}

impl TextMessage {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

pub struct ConsoleWorker {
    sink: Arc<dyn ConsoleSink>,
}

impl ConsoleWorker {
    pub fn new(sink: Arc<dyn ConsoleSink>) -> Self {
        Self { sink }
    }
}

impl Worker for ConsoleWorker {
    type Payload = TextMessage;

    fn process(
        &mut self,
        cx: &WorkerContext<'_>,
        tag: Tag,
        payload: TextMessage,
    ) -> Result<(), ThreadError> {
        if tag != Tag::THREAD_MSG {
            return Err(cx.unexpected_tag(tag));
        }
        self.sink.write_line(&format!("{} {}", payload.text, cx.name()));
        Ok(())
    }
}

/// Run every configured thread to completion.
///
/// Returns the first error; handles still alive at that point are shut
/// down as they go out of scope.
pub fn run_demo(
    config: &Config,
    reporter: Arc<dyn FaultReporter>,
    sink: Arc<dyn ConsoleSink>,
) -> Result<(), SpindleError> {
    config.validate()?;

    let registry =
        ThreadRegistry::with_reporter(reporter).with_queue_capacity(config.runtime.queue_capacity);

    let mut handles: Vec<ThreadHandle<ConsoleWorker>> = config
        .threads
        .iter()
        .map(|thread| {
            let worker = ConsoleWorker::new(Arc::clone(&sink));
            registry.register(thread.name.as_str(), worker)
        })
        .collect();

    for handle in handles.iter_mut() {
        handle.create()?;
    }

    let released = registry.start_all();
    info!(released, "all threads started");

    for (handle, thread) in handles.iter().zip(&config.threads) {
        for message in &thread.messages {
            match handle.post_message(message.tag(), TextMessage::new(message.text())) {
                Ok(()) => {}
                // the thread already stopped; joining it below reports why
                Err(ThreadError::Exited { .. }) => break,
                Err(e) => return Err(e.into()),
            }
        }
        debug!(thread = handle.name(), posted = thread.messages.len(), "messages posted");
    }

    if config.runtime.linger_ms > 0 {
        std::thread::sleep(Duration::from_millis(config.runtime.linger_ms));
    }

    let mut first_error = None;
    for handle in handles.iter_mut() {
        if let Err(e) = handle.request_exit() {
            first_error.get_or_insert(e);
        }
    }

    match first_error {
        Some(e) => Err(e.into()),
        None => Ok(()),
    }
}
