use tokio::sync::watch;

/// Owner side of the session-wide stop signal.
///
/// Triggering is idempotent and works from any thread, including the Ctrl-C
/// handler thread.
#[derive(Clone, Debug)]
pub struct ShutdownHandle {
    tx: watch::Sender<bool>,
}

impl Default for ShutdownHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl ShutdownHandle {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self { tx }
    }

    pub fn listener(&self) -> ShutdownListener {
        ShutdownListener {
            rx: self.tx.subscribe(),
        }
    }

    pub fn trigger(&self) {
        // send_replace stores the value even when nobody is subscribed yet
        let already = self.tx.send_replace(true);
        if !already {
            tracing::info!("stop requested");
        }
    }

    pub fn is_triggered(&self) -> bool {
        *self.tx.borrow()
    }

    /// Route Ctrl-C to [`ShutdownHandle::trigger`]. Only one handler may be
    /// installed per process.
    pub fn install_ctrlc(&self) -> Result<(), ctrlc::Error> {
        let handle = self.clone();
        ctrlc::set_handler(move || {
            tracing::info!("interrupt received, shutting down");
            handle.trigger();
        })
    }
}

#[derive(Clone, Debug)]
pub struct ShutdownListener {
    rx: watch::Receiver<bool>,
}

impl ShutdownListener {
    pub fn is_triggered(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once stop is requested, or when the handle is gone.
    pub async fn triggered(&mut self) {
        let _ = self.rx.wait_for(|stop| *stop).await;
    }
}
