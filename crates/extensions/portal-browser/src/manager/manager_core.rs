//! BrowserManager: Chrome discovery, launch, connect and shutdown.

use std::path::PathBuf;
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;

use tokio::process::{Child, Command};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use super::{BrowserError, BrowserManagerConfig};
use crate::cdp::{CdpClient, PageSession};

const LAUNCH_POLL_INTERVAL: Duration = Duration::from_millis(200);
const LAUNCH_MAX_ATTEMPTS: u32 = 30;

/// Owns the CDP connection and, if we started it, the Chrome process.
pub struct BrowserManager {
    config: BrowserManagerConfig,
    client: RwLock<Option<Arc<CdpClient>>>,
    /// Chrome process handle (if we launched it).
    chrome_process: RwLock<Option<Child>>,
}

impl BrowserManager {
    pub fn new(config: BrowserManagerConfig) -> Self {
        Self {
            config,
            client: RwLock::new(None),
            chrome_process: RwLock::new(None),
        }
    }

    pub fn config(&self) -> &BrowserManagerConfig {
        &self.config
    }

    /// Find a Chrome/Chromium executable in the standard locations.
    pub fn find_chrome() -> Option<PathBuf> {
        let paths = [
            "/usr/bin/google-chrome",
            "/usr/bin/google-chrome-stable",
            "/usr/bin/chromium",
            "/usr/bin/chromium-browser",
            "/snap/bin/chromium",
            "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
            "/Applications/Chromium.app/Contents/MacOS/Chromium",
        ];
        paths.iter().map(PathBuf::from).find(|p| p.exists())
    }

    /// The executable that [`connect`](Self::connect) would launch.
    pub fn chrome_executable(&self) -> Option<PathBuf> {
        match &self.config.chrome_path {
            Some(path) => Some(path.clone()),
            None => Self::find_chrome(),
        }
    }

    /// Check if Chrome is already listening on the debug port.
    pub async fn is_chrome_running(&self) -> bool {
        CdpClient::probe(&self.config.endpoint()).await.is_ok()
    }

    async fn launch_chrome(&self) -> Result<Child, BrowserError> {
        let chrome_path = self.chrome_executable().ok_or(BrowserError::ChromeNotFound)?;
        let profile_dir = self.config.get_profile_dir();

        if let Err(e) = std::fs::create_dir_all(&profile_dir) {
            warn!("Failed to create profile directory: {}", e);
        }

        info!("Launching Chrome with profile at: {}", profile_dir.display());

        let mut cmd = Command::new(&chrome_path);
        cmd.args(self.config.chrome_args())
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        let child = cmd
            .spawn()
            .map_err(|e| BrowserError::LaunchFailed(format!("{}: {}", chrome_path.display(), e)))?;

        info!("Chrome launched with PID: {:?}", child.id());
        Ok(child)
    }

    /// Connect to the browser, launching it if necessary.
    pub async fn connect(&self) -> Result<(), BrowserError> {
        if self.client.read().await.is_some() {
            return Ok(());
        }

        if self.is_chrome_running().await {
            info!("Chrome already running on port {}", self.config.debug_port);
        } else {
            info!("Chrome not running on port {}, launching...", self.config.debug_port);

            let child = self.launch_chrome().await?;
            *self.chrome_process.write().await = Some(child);

            let mut attempts = 0;
            while !self.is_chrome_running().await {
                if let Some(status) = self.exited_early().await {
                    return Err(BrowserError::LaunchFailed(format!(
                        "Chrome exited during startup ({}); is another instance using the profile?",
                        status
                    )));
                }
                attempts += 1;
                if attempts >= LAUNCH_MAX_ATTEMPTS {
                    return Err(BrowserError::LaunchFailed(format!(
                        "DevTools did not come up on port {} within {:?}",
                        self.config.debug_port,
                        LAUNCH_POLL_INTERVAL * LAUNCH_MAX_ATTEMPTS
                    )));
                }
                tokio::time::sleep(LAUNCH_POLL_INTERVAL).await;
            }
        }

        let client = CdpClient::connect(&self.config.endpoint()).await?;
        info!(
            "Connected to {} at {}",
            client.version().browser,
            self.config.endpoint()
        );
        *self.client.write().await = Some(Arc::new(client));
        Ok(())
    }

    async fn exited_early(&self) -> Option<std::process::ExitStatus> {
        let mut guard = self.chrome_process.write().await;
        let status = guard.as_mut()?.try_wait().ok().flatten()?;
        guard.take();
        Some(status)
    }

    async fn client(&self) -> Result<Arc<CdpClient>, BrowserError> {
        self.client
            .read()
            .await
            .clone()
            .ok_or(BrowserError::NotConnected)
    }

    /// Open a blank tab sized to the configured viewport.
    pub async fn new_page(&self) -> Result<Arc<PageSession>, BrowserError> {
        self.connect().await?;
        let client = self.client().await?;

        let session = client.new_page().await?;
        if let Err(e) = session
            .set_viewport(self.config.viewport_width, self.config.viewport_height)
            .await
        {
            warn!("Failed to set viewport: {}", e);
        }
        if let Err(e) = session.bring_to_front().await {
            debug!("Failed to bring page to front: {}", e);
        }

        Ok(Arc::new(session))
    }

    /// Close a tab.
    pub async fn close_page(&self, page: &PageSession) -> Result<(), BrowserError> {
        let client = self.client().await?;
        client.close_page(page).await?;
        debug!("Closed page {}", page.target_id());
        Ok(())
    }

    /// Drop the CDP connection.
    pub async fn close(&self) -> Result<(), BrowserError> {
        let _ = self.client.write().await.take();
        info!("Browser connection closed");
        Ok(())
    }

    /// Drop the connection and kill Chrome if we launched it.
    pub async fn shutdown_chrome(&self) -> Result<(), BrowserError> {
        self.close().await?;
        if let Some(mut child) = self.chrome_process.write().await.take() {
            info!("Shutting down Chrome...");
            let _ = child.kill().await;
        }
        Ok(())
    }
}
