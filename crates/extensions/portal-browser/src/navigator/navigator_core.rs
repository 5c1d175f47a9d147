//! CdpPortalNavigator: opens the portal and clicks through to EDS sign-in.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use erap_core::{NavigatorError, PortalNavigator};
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use super::scripts::{locate_control_script, ControlLocation};
use crate::cdp::{CdpError, PageSession};
use crate::manager::BrowserManager;

/// Which controls to click and how long to look for them.
#[derive(Debug, Clone)]
pub struct PortalSettings {
    /// Labels of the optional "enter personal cabinet" control.
    pub entry_labels: Vec<String>,
    /// Labels of the "Sign in with EDS" control.
    pub eds_labels: Vec<String>,
    pub entry_timeout: Duration,
    pub control_timeout: Duration,
    pub load_timeout: Duration,
    /// Pause after a load or the entry click before looking for controls.
    pub load_settle: Duration,
    pub poll_interval: Duration,
}

impl PortalSettings {
    pub fn new(eds_labels: Vec<String>) -> Self {
        Self {
            entry_labels: Vec::new(),
            eds_labels,
            entry_timeout: Duration::from_secs(3),
            control_timeout: Duration::from_secs(10),
            load_timeout: Duration::from_secs(30),
            load_settle: Duration::from_secs(2),
            poll_interval: Duration::from_millis(250),
        }
    }
}

/// [`PortalNavigator`] driving one Chrome tab over CDP.
pub struct CdpPortalNavigator {
    manager: Arc<BrowserManager>,
    settings: PortalSettings,
    page: Mutex<Option<Arc<PageSession>>>,
}

impl CdpPortalNavigator {
    pub fn new(manager: Arc<BrowserManager>, settings: PortalSettings) -> Self {
        Self {
            manager,
            settings,
            page: Mutex::new(None),
        }
    }

    async fn page(&self) -> Result<Arc<PageSession>, NavigatorError> {
        self.page
            .lock()
            .await
            .clone()
            .ok_or_else(|| NavigatorError::Browser("portal page is not open".to_string()))
    }

    /// Poll for a control labelled with any of `labels` and click it.
    /// Returns `None` if nothing matched within `timeout`.
    async fn click_control(
        &self,
        page: &PageSession,
        labels: &[String],
        timeout: Duration,
    ) -> Result<Option<String>, NavigatorError> {
        let script = locate_control_script(labels);
        let deadline = Instant::now() + timeout;

        loop {
            match page.evaluate(&script).await {
                Ok(value) if !value.is_null() => {
                    let location: ControlLocation = serde_json::from_value(value)
                        .map_err(|e| NavigatorError::Browser(format!("bad locate result: {}", e)))?;
                    page.click(location.x, location.y).await.map_err(browser_error)?;
                    info!(
                        "Clicked '{}' at ({:.0}, {:.0})",
                        location.text, location.x, location.y
                    );
                    return Ok(Some(location.text));
                }
                Ok(_) => {}
                // The SPA may be mid-render or mid-navigation.
                Err(e @ (CdpError::JavaScript(_) | CdpError::Protocol { .. })) => {
                    debug!("Locating {:?} failed: {}", labels, e);
                }
                Err(e) => return Err(browser_error(e)),
            }

            if Instant::now() >= deadline {
                return Ok(None);
            }
            tokio::time::sleep(self.settings.poll_interval).await;
        }
    }
}

fn browser_error(e: impl std::fmt::Display) -> NavigatorError {
    NavigatorError::Browser(e.to_string())
}

#[async_trait]
impl PortalNavigator for CdpPortalNavigator {
    async fn open_portal(&self, url: &str) -> Result<(), NavigatorError> {
        let page = self.manager.new_page().await.map_err(browser_error)?;
        *self.page.lock().await = Some(page.clone());

        info!("Opening {}", url);
        page.navigate(url, self.settings.load_timeout)
            .await
            .map_err(|e| NavigatorError::LoadFailed(e.to_string()))?;

        tokio::time::sleep(self.settings.load_settle).await;
        Ok(())
    }

    async fn request_signature(&self) -> Result<(), NavigatorError> {
        let page = self.page().await?;

        if !self.settings.entry_labels.is_empty() {
            match self
                .click_control(&page, &self.settings.entry_labels, self.settings.entry_timeout)
                .await?
            {
                Some(_) => tokio::time::sleep(self.settings.load_settle).await,
                None => debug!("Entry control not shown; continuing"),
            }
        }

        match self
            .click_control(&page, &self.settings.eds_labels, self.settings.control_timeout)
            .await?
        {
            Some(_) => Ok(()),
            None => Err(NavigatorError::ControlNotFound {
                labels: self.settings.eds_labels.clone(),
                waited: self.settings.control_timeout,
            }),
        }
    }

    async fn current_url(&self) -> Result<String, NavigatorError> {
        self.page()
            .await?
            .get_url()
            .await
            .map_err(browser_error)
    }

    async fn shutdown(&self) -> Result<(), NavigatorError> {
        if let Some(page) = self.page.lock().await.take() {
            if let Err(e) = self.manager.close_page(&page).await {
                warn!("Failed to close portal tab: {}", e);
            }
        }
        self.manager.shutdown_chrome().await.map_err(browser_error)
    }
}
