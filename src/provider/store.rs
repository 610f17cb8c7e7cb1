use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{BiopsError, Result};
use crate::provider::Provider;

/// JSON-file-backed provider list. The file holds credentials, so saves
/// tighten permissions to owner-only on Unix.
pub struct ProviderStore {
    path: PathBuf,
}

impl ProviderStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the explicit path when given, otherwise at
    /// `~/.biops/providers.json`.
    pub fn resolve(path: Option<PathBuf>) -> Result<Self> {
        match path {
            Some(p) => Ok(Self::new(p)),
            None => {
                let home = dirs::home_dir().ok_or_else(|| {
                    BiopsError::Configuration("could not determine home directory".into())
                })?;
                Ok(Self::new(home.join(".biops").join("providers.json")))
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<Vec<Provider>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let data = fs::read_to_string(&self.path)?;
        let providers: Vec<Provider> = serde_json::from_str(&data)?;
        Ok(providers)
    }

    pub fn save(&self, providers: &[Provider]) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(providers)?)?;
        self.restrict_permissions()?;
        debug!(path = %self.path.display(), count = providers.len(), "saved providers");
        Ok(())
    }

    #[cfg(unix)]
    fn restrict_permissions(&self) -> Result<()> {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(&self.path, fs::Permissions::from_mode(0o600))?;
        if let Some(dir) = self.path.parent() {
            fs::set_permissions(dir, fs::Permissions::from_mode(0o700))?;
        }
        Ok(())
    }

    #[cfg(not(unix))]
    fn restrict_permissions(&self) -> Result<()> {
        Ok(())
    }

    /// The provider marked current. No marked provider is a configuration
    /// error: every query/datasource command needs an active backend.
    pub fn current(&self) -> Result<Provider> {
        self.load()?
            .into_iter()
            .find(|p| p.current)
            .ok_or_else(|| {
                BiopsError::Configuration(
                    "no active provider; run `biops provider add` or `biops provider use <name>`"
                        .into(),
                )
            })
    }

    /// Adds a provider and makes it current. Duplicate names are rejected.
    pub fn add(&self, provider: Provider) -> Result<Vec<Provider>> {
        let mut providers = self.load()?;
        if providers.iter().any(|p| p.name == provider.name) {
            return Err(BiopsError::Provider(format!(
                "provider {} already exists",
                provider.name
            )));
        }
        for p in &mut providers {
            p.current = false;
        }
        providers.push(Provider {
            current: true,
            ..provider
        });
        self.save(&providers)?;
        Ok(providers)
    }

    pub fn use_provider(&self, name: &str) -> Result<Vec<Provider>> {
        let mut providers = self.load()?;
        if !providers.iter().any(|p| p.name == name) {
            return Err(BiopsError::Provider(format!(
                "provider {} does not exist",
                name
            )));
        }
        for p in &mut providers {
            p.current = p.name == name;
        }
        self.save(&providers)?;
        Ok(providers)
    }

    pub fn delete(&self, name: &str) -> Result<Vec<Provider>> {
        let mut providers = self.load()?;
        if !providers.iter().any(|p| p.name == name) {
            return Err(BiopsError::Provider(format!(
                "provider {} does not exist",
                name
            )));
        }
        providers.retain(|p| p.name != name);
        self.save(&providers)?;
        Ok(providers)
    }
}
